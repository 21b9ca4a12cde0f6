//! # Loadpath CLI
//!
//! Runs the gravity load path for a building and prints the column schedule.
//!
//! ```text
//! loadpath                    # built-in calibration building
//! loadpath tower.json         # BuildingModel JSON
//! loadpath tower.json --json  # full analysis as JSON
//! ```
//!
//! `--verbose` logs every pipeline event; `RUST_LOG` overrides the filter.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use loadpath_core::calculations::{analyze, Analysis, Column, Diagnostic};
use loadpath_core::file_io::load_model;
use loadpath_core::model::{calibration_model, BuildingModel};
use loadpath_core::CalcResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// loadpath - gravity load path and column schedule for RC frames
#[derive(Debug, Parser)]
#[command(name = "loadpath", version, about, long_about = None)]
struct Cli {
    /// BuildingModel JSON file; the calibration building when omitted
    #[arg(value_name = "MODEL")]
    path: Option<PathBuf>,

    /// Print the full analysis as JSON instead of the schedule
    #[arg(long)]
    json: bool,

    /// Log every pipeline event (debug level)
    #[arg(short, long)]
    verbose: bool,
}

fn load(cli: &Cli) -> CalcResult<BuildingModel> {
    match &cli.path {
        Some(path) => load_model(path),
        None => {
            tracing::info!("no model given, using the calibration building");
            Ok(calibration_model())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "loadpath_core=debug" } else { "loadpath_core=warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let model = match load(&cli) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            return ExitCode::FAILURE;
        }
    };

    let analysis = analyze(&model);

    if cli.json {
        match serde_json::to_string_pretty(&analysis) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    print_report(&model, &analysis);
    ExitCode::SUCCESS
}

fn print_report(model: &BuildingModel, analysis: &Analysis) {
    let grid = &analysis.grid;
    println!("═══════════════════════════════════════════════════════════════");
    println!("  GRAVITY LOAD PATH");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!(
        "Grid:    {:.2} m x {:.2} m  ({} x {} bays)",
        grid.width(),
        grid.depth(),
        grid.nx_bays(),
        grid.ny_bays()
    );
    println!(
        "Concrete: f'c = {:.0} MPa, fy = {:.0} MPa, soil q_a = {:.0} kPa",
        model.settings.fc_mpa,
        model.settings.fy_mpa,
        model.settings.effective_soil_bearing_kpa()
    );
    println!();

    println!("Floors:");
    for floor in &analysis.floors {
        println!(
            "  {:<8} q_u = {:>6.2} kPa   slab {:>7.2} m²   beams {:>3}",
            floor.floor_id,
            floor.factored_pressure_kpa,
            floor.loaded_area_m2(),
            floor.beams.len()
        );
    }
    println!();

    println!("Column schedule:");
    let floor_ids: Vec<&str> = analysis.floors.iter().map(|f| f.floor_id.as_str()).collect();
    print!("  {:<8} {:<9}", "Column", "Class");
    for id in &floor_ids {
        print!(" {:>9}", id);
    }
    println!(" {:>9} {:>9} {:>7} {:>10}", "Total kN", "Section", "Util", "Footing");
    for column in &analysis.columns {
        print_column(column, &floor_ids);
    }
    println!();

    println!(
        "Tie beam: {:.0} x {:.0} mm   footing level {:.2} m, max thickness {:.2} m",
        analysis.tie_beam.width_m * 1000.0,
        analysis.tie_beam.depth_m * 1000.0,
        -model.settings.footing_depth_m,
        analysis.max_footing_thickness_m
    );
    let takeoff = &analysis.takeoff;
    println!(
        "Concrete: {:.2} m³ (slab {:.2}, beams {:.2}, columns {:.2}, footings {:.2}, ties {:.2}), {:.0} kN",
        takeoff.total_m3,
        takeoff.slab_m3,
        takeoff.beam_m3,
        takeoff.column_m3,
        takeoff.footing_m3,
        takeoff.tie_beam_m3,
        takeoff.total_weight_kn
    );

    if !analysis.diagnostics.is_empty() {
        println!();
        println!("Diagnostics:");
        for diagnostic in &analysis.diagnostics {
            println!("  - {}", describe(diagnostic));
        }
    }
}

fn print_column(column: &Column, floor_ids: &[&str]) {
    print!("  {:<8} {:<9}", column.id, column.class.name());
    for id in floor_ids {
        match column.floor_load(id) {
            Some(load) if load.skipped.is_none() => print!(" {:>9.1}", load.load_kn),
            _ => print!(" {:>9}", "-"),
        }
    }
    let section = column.section.map_or_else(|| "-".to_string(), |s| s.to_string());
    let util = column.capacity.map_or(0.0, |c| c.utilization);
    let footing = if column.footing.exists() {
        format!("{:.1} m", column.footing.side_m)
    } else {
        "-".to_string()
    };
    println!(
        " {:>9.1} {:>9} {:>7} {:>10}",
        column.total_load_kn,
        section,
        format!("{:.2}{}", util, status_icon(util <= 1.0)),
        footing
    );
}

fn describe(diagnostic: &Diagnostic) -> String {
    match diagnostic {
        Diagnostic::SpanClamped { direction, index, value, replacement } => {
            format!("{} span {} = {} replaced by {} m", direction, index + 1, value, replacement)
        }
        Diagnostic::FloorExcluded { floor_id } => format!("{}: slab on grade, not in load path", floor_id),
        Diagnostic::VoidPanelsPruned { floor_id, panel_ids } => {
            format!("{}: stale voids dropped: {}", floor_id, panel_ids.join(", "))
        }
        Diagnostic::PanelUnderAllocated { floor_id, panel_id, missing_area_m2 } => {
            format!("{}: {:.2} m² of {} reaches no beam", floor_id, missing_area_m2, panel_id)
        }
        Diagnostic::CustomBeamStrip { floor_id, beam_id, panel_id, area_m2 } => {
            format!("{}: {} picks up {:.2} m² strip of {}", floor_id, beam_id, area_m2, panel_id)
        }
        Diagnostic::CustomBeamIgnored { floor_id, beam_id } => {
            format!("{}: custom beam {} has no length, ignored", floor_id, beam_id)
        }
        Diagnostic::CantileverWithoutEdgeBeam { floor_id, panel_id, edge_beam_id } => {
            format!("{}: cantilever {} has no edge beam {}", floor_id, panel_id, edge_beam_id)
        }
        Diagnostic::UnsupportedReaction { floor_id, beam_id, load_kn } => {
            format!("{}: {:.1} kN from {} has no column", floor_id, load_kn, beam_id)
        }
        Diagnostic::ColumnSkipped { floor_id, column_id, reason, dropped_load_kn } => format!(
            "{}: {} skipped ({}), {:.1} kN dropped",
            floor_id,
            column_id,
            reason.description(),
            dropped_load_kn
        ),
        Diagnostic::PlantedColumnMerged { planted_id, column_id } => {
            format!("planted column {} merged onto {}", planted_id, column_id)
        }
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        ""
    } else {
        "!"
    }
}

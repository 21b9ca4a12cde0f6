//! End-to-end load path checks on small buildings.

use approx::assert_relative_eq;
use loadpath_core::calculations::footings::MIN_FOOTING_SIDE_M;
use loadpath_core::calculations::{analyze, ColumnClass, Diagnostic, SkipReason, SpanType};
use loadpath_core::geometry::Side;
use loadpath_core::model::{
    calibration_model, BuildingModel, CantileverConfig, ColumnFloorOverride, FloorConfig, PlantedColumn, SpanConfig,
};
use loadpath_core::Project;

fn three_storey() -> BuildingModel {
    calibration_model()
        .with_floor(FloorConfig::new("L2", 2))
        .with_floor(FloorConfig::new("L3", 3))
}

#[test]
fn test_calibration_building_within_tolerance() {
    let analysis = analyze(&calibration_model());

    let b2 = analysis.column("B2").unwrap();
    assert_eq!(b2.class, ColumnClass::Interior);
    assert!((b2.total_load_kn - 200.0).abs() <= 200.0 * 0.05);

    for id in ["A1", "C1", "A3", "C3"] {
        let column = analysis.column(id).unwrap();
        assert_eq!(column.class, ColumnClass::Corner, "{id}");
        assert!((column.total_load_kn - 50.0).abs() <= 50.0 * 0.05, "{id}");
    }
    for id in ["B1", "A2", "C2", "B3"] {
        let load = analysis.column(id).unwrap().total_load_kn;
        assert!((80.0..=110.0).contains(&load), "{id}: {load}");
    }

    let floor_sum = analysis.floor_column_load_kn("L1");
    assert!((760.0..=840.0).contains(&floor_sum));
    assert_relative_eq!(floor_sum, 793.6, epsilon = 1e-6);
}

#[test]
fn test_slab_area_is_conserved() {
    let model = BuildingModel::new(SpanConfig::new(vec![3.0, 5.5, 4.2], vec![6.0, 2.5]))
        .with_floor(FloorConfig::new("L1", 1).with_cantilevers(CantileverConfig::default().with(Side::Top, 1, 1.5)));
    let analysis = analyze(&model);
    let floor = analysis.floor("L1").unwrap();

    let plan = 12.7 * 8.5;
    let cantilever = 5.5 * 1.5;
    assert_relative_eq!(floor.loaded_area_m2(), plan + cantilever, epsilon = 1e-9);
    assert_relative_eq!(floor.assigned_area_m2(), floor.loaded_area_m2(), epsilon = 1e-6);
    // The cantilever also reaches its root columns through the two bracket beams
    assert_relative_eq!(
        analysis.floor_column_load_kn("L1"),
        floor.factored_pressure_kpa * (plan + 2.0 * cantilever),
        max_relative = 1e-9
    );
}

#[test]
fn test_cantilever_reaction_reaches_root_column() {
    let model = BuildingModel::new(SpanConfig::new(vec![4.0, 4.0], vec![5.0, 5.0])).with_floor(
        FloorConfig::new("L1", 1).with_cantilevers(CantileverConfig::default().with(Side::Bottom, 0, 1.5)),
    );
    let analysis = analyze(&model);
    let floor = analysis.floor("L1").unwrap();

    let bracket = floor.beam("CB-A1-bottom").unwrap();
    assert_relative_eq!(bracket.reactions_kn[0], 29.76, epsilon = 1e-9);
    assert_relative_eq!(bracket.column_load_kn(0), 29.76, epsilon = 1e-9);

    // calibration share + half the edge beam's 6 m² + the bracket's 3 m²
    let a1 = analysis.column("A1").unwrap();
    assert_relative_eq!(a1.total_load_kn, 49.6 + 9.92 * 3.0 + 9.92 * 3.0, epsilon = 1e-6);
    let b1 = analysis.column("B1").unwrap();
    assert_relative_eq!(b1.total_load_kn, 99.2 + 9.92 * 3.0 + 9.92 * 3.0, epsilon = 1e-6);
    assert!(!analysis
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::UnsupportedReaction { .. })));
}

#[test]
fn test_floors_accumulate_by_sum() {
    let analysis = analyze(&three_storey());
    let b2 = analysis.column("B2").unwrap();

    assert_eq!(b2.floor_loads.len(), 3);
    for load in &b2.floor_loads {
        assert_relative_eq!(load.load_kn, 198.4, epsilon = 1e-6);
    }
    assert_relative_eq!(b2.total_load_kn, 3.0 * 198.4, epsilon = 1e-6);
}

#[test]
fn test_deactivated_column_has_no_load_or_footing() {
    let mut project = Project::with_model("Engineer", "T-1", "Client", calibration_model());
    let panels_before = project.analysis().floors[0].panels.clone();
    project.set_column_active("B2", false).unwrap();

    let analysis = project.analysis();
    assert_eq!(analysis.floors[0].panels, panels_before);
    assert_relative_eq!(analysis.floors[0].loaded_area_m2(), 80.0, epsilon = 1e-9);
    let b2 = analysis.column("B2").unwrap();
    assert!(!b2.active);
    assert_relative_eq!(b2.total_load_kn, 0.0);
    assert!(!b2.footing.exists());
    assert!(analysis.diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::ColumnSkipped { column_id, reason: SkipReason::Inactive, dropped_load_kn, .. }
            if column_id == "B2" && (*dropped_load_kn - 198.4).abs() < 1e-6
    )));
}

#[test]
fn test_floor_deactivation_only_affects_that_floor() {
    let mut model = three_storey();
    model.column_override_mut("B2").floors.insert(
        "L2".to_string(),
        ColumnFloorOverride {
            active: Some(false),
            section: None,
        },
    );
    let analysis = analyze(&model);
    let b2 = analysis.column("B2").unwrap();

    assert_eq!(b2.floor_load("L2").unwrap().skipped, Some(SkipReason::InactiveOnFloor));
    assert_relative_eq!(b2.total_load_kn, 2.0 * 198.4, epsilon = 1e-6);
    assert!(b2.footing.exists());
}

#[test]
fn test_overrides_survive_span_edits() {
    let mut project = Project::with_model("Engineer", "T-2", "Client", calibration_model());
    project.set_column_active("A1", false).unwrap();
    project.set_spans(vec![4.0, 4.0, 6.0], vec![5.0, 5.0]);

    let analysis = project.analysis();
    assert!(!analysis.column("A1").unwrap().active);
    assert!(analysis.column("D1").unwrap().active);
    assert_eq!(analysis.column("C1").unwrap().class, ColumnClass::Edge);
    assert_eq!(analysis.column("D1").unwrap().class, ColumnClass::Corner);
}

#[test]
fn test_one_way_boundary_at_ratio_two() {
    let at_two = analyze(&BuildingModel::new(SpanConfig::new(vec![4.0], vec![8.0])).with_floor(FloorConfig::new("L1", 1)));
    assert_eq!(at_two.floors[0].panel("S1-1").unwrap().span_type, SpanType::OneWay);

    let below = analyze(&BuildingModel::new(SpanConfig::new(vec![4.0], vec![7.9])).with_floor(FloorConfig::new("L1", 1)));
    assert_eq!(below.floors[0].panel("S1-1").unwrap().span_type, SpanType::TwoWay);
}

#[test]
fn test_light_building_gets_minimum_footings() {
    let analysis = analyze(&BuildingModel::new(SpanConfig::new(vec![2.0], vec![2.0])).with_floor(FloorConfig::new("L1", 1)));
    assert_eq!(analysis.columns.len(), 4);
    for column in &analysis.columns {
        assert_relative_eq!(column.footing.side_m, MIN_FOOTING_SIDE_M, epsilon = 1e-9);
        assert!(column.footing.top_elevation_m > column.footing.bottom_elevation_m);
    }
}

#[test]
fn test_footings_share_elevations() {
    let analysis = analyze(&three_storey());
    let max = analysis.max_footing_thickness_m;
    for column in analysis.columns.iter().filter(|c| c.footing.exists()) {
        assert_relative_eq!(column.footing.top_elevation_m - column.footing.bottom_elevation_m, max, epsilon = 1e-9);
    }
}

#[test]
fn test_planted_column_starts_above_lower_floors() {
    let mut model = three_storey();
    model
        .planted_columns
        .push(PlantedColumn::new("P-1", 2.0, 2.5, Some("L2".to_string())));
    let analysis = analyze(&model);
    let planted = analysis.column("P-1").unwrap();

    assert!(planted.grid_index.is_none());
    let below = planted.floor_load("L1").unwrap();
    assert_eq!(below.skipped, Some(SkipReason::BelowStartFloor));
    assert_relative_eq!(below.load_kn, 0.0);
    assert!(planted.floor_load("L2").unwrap().skipped.is_none());
    assert!(!planted.footing.exists());
}

#[test]
fn test_off_grid_column_without_start_floor_keeps_footing() {
    let mut model = calibration_model();
    model.planted_columns.push(PlantedColumn::new("P-1", 2.0, 2.5, None));
    let analysis = analyze(&model);
    let column = analysis.column("P-1").unwrap();

    assert!(column.grid_index.is_none());
    assert!(column.footing.exists());
    assert!(column.footing.side_m >= MIN_FOOTING_SIDE_M);
}

#[test]
fn test_analysis_is_deterministic() {
    let model = three_storey().with_floor(
        FloorConfig::new("Roof", 4)
            .with_loads(1.0, 1.0)
            .with_cantilevers(CantileverConfig::default().with(Side::Left, 0, 1.2)),
    );
    let first = serde_json::to_string(&analyze(&model)).unwrap();
    let second = serde_json::to_string(&analyze(&model)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_garbage_input_does_not_panic() {
    let mut model = BuildingModel::new(SpanConfig::new(vec![f64::NAN, -3.0], vec![0.0]))
        .with_floor(FloorConfig::new("L1", 1).with_loads(f64::NAN, -5.0).with_deleted_beam("A1-B1"))
        .with_floor(FloorConfig::new("L1b", 1).with_slab_thickness(-100.0));
    model.column_override_mut("A1").start_floor = Some("nowhere".to_string());
    model.column_override_mut("ZZ9").active = Some(false);

    let analysis = analyze(&model);
    let clamped = analysis
        .diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::SpanClamped { .. }))
        .count();
    assert_eq!(clamped, 3);
    assert_eq!(analysis.grid.width(), 8.0);
    assert!(analysis.columns.iter().all(|c| c.total_load_kn.is_finite()));
    assert!(analysis
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::PanelUnderAllocated { .. })));
}

#[test]
fn test_all_columns_inactive() {
    let mut model = calibration_model();
    for id in ["A1", "B1", "C1", "A2", "B2", "C2", "A3", "B3", "C3"] {
        model.column_override_mut(id).active = Some(false);
    }
    let analysis = analyze(&model);
    assert!(analysis.columns.iter().all(|c| c.total_load_kn == 0.0));
    assert_relative_eq!(analysis.total_footing_load_kn(), 0.0);
    assert_relative_eq!(analysis.max_footing_thickness_m, 0.0);
}

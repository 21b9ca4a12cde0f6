//! # Plan Geometry
//!
//! Axis-aligned plan geometry used by the slab partitioner and the tributary
//! distributor. All coordinates are in metres, origin at grid column `A1`,
//! X increasing to the right and Y increasing upward (toward the `top` edge).

use serde::{Deserialize, Serialize};

/// Matching tolerance for coincident points and collinear members (m)
pub const GEOMETRY_TOLERANCE_M: f64 = 0.05;

/// Plan point (m)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// True when both coordinates agree within [`GEOMETRY_TOLERANCE_M`]
    pub fn coincides(&self, other: &Point) -> bool {
        (self.x - other.x).abs() <= GEOMETRY_TOLERANCE_M && (self.y - other.y).abs() <= GEOMETRY_TOLERANCE_M
    }
}

/// Member or span direction in plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Runs parallel to the X axis
    X,
    /// Runs parallel to the Y axis
    Y,
}

impl Direction {
    pub fn perpendicular(self) -> Direction {
        match self {
            Direction::X => Direction::Y,
            Direction::Y => Direction::X,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::X => write!(f, "X"),
            Direction::Y => write!(f, "Y"),
        }
    }
}

/// One of the four sides of a rectangle (a panel, or the whole grid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bottom,
    Top,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Bottom, Side::Top, Side::Left, Side::Right];

    pub fn name(self) -> &'static str {
        match self {
            Side::Bottom => "bottom",
            Side::Top => "top",
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Bottom => Side::Top,
            Side::Top => Side::Bottom,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Direction of a member lying along this side
    pub fn direction(self) -> Direction {
        match self {
            Side::Bottom | Side::Top => Direction::X,
            Side::Left | Side::Right => Direction::Y,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Axis-aligned rectangle, always stored with `x0 <= x1` and `y0 <= y1`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(xa: f64, ya: f64, xb: f64, yb: f64) -> Self {
        Rect {
            x0: xa.min(xb),
            y0: ya.min(yb),
            x1: xa.max(xb),
            y1: ya.max(yb),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// The segment forming one side, oriented in increasing coordinate
    pub fn side(&self, side: Side) -> Segment {
        match side {
            Side::Bottom => Segment::new(Point::new(self.x0, self.y0), Point::new(self.x1, self.y0)),
            Side::Top => Segment::new(Point::new(self.x0, self.y1), Point::new(self.x1, self.y1)),
            Side::Left => Segment::new(Point::new(self.x0, self.y0), Point::new(self.x0, self.y1)),
            Side::Right => Segment::new(Point::new(self.x1, self.y0), Point::new(self.x1, self.y1)),
        }
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(vec![
            Point::new(self.x0, self.y0),
            Point::new(self.x1, self.y0),
            Point::new(self.x1, self.y1),
            Point::new(self.x0, self.y1),
        ])
    }
}

/// Simple polygon in plan (vertex order either way)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Polygon { vertices }
    }

    /// Unsigned area by the shoelace formula. Degenerate polygons (collapsed
    /// trapezoids that are really triangles) are handled naturally.
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|k| {
                let a = self.vertices[k];
                let b = self.vertices[(k + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() / 2.0
    }
}

/// Straight member line in plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Segment { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Axis direction, or `None` for a zero-length or skewed segment
    pub fn direction(&self) -> Option<Direction> {
        let dx = (self.end.x - self.start.x).abs();
        let dy = (self.end.y - self.start.y).abs();
        if dx <= GEOMETRY_TOLERANCE_M && dy <= GEOMETRY_TOLERANCE_M {
            None
        } else if dy <= GEOMETRY_TOLERANCE_M {
            Some(Direction::X)
        } else if dx <= GEOMETRY_TOLERANCE_M {
            Some(Direction::Y)
        } else {
            None
        }
    }

    /// Coordinate on the perpendicular axis (y for an X segment, x for a Y segment)
    fn offset(&self, direction: Direction) -> f64 {
        match direction {
            Direction::X => (self.start.y + self.end.y) / 2.0,
            Direction::Y => (self.start.x + self.end.x) / 2.0,
        }
    }

    /// Extent along the segment's own axis as `(min, max)`
    fn extent(&self, direction: Direction) -> (f64, f64) {
        let (a, b) = match direction {
            Direction::X => (self.start.x, self.end.x),
            Direction::Y => (self.start.y, self.end.y),
        };
        (a.min(b), a.max(b))
    }

    /// True when `self` lies on the same line as `other` and spans at least
    /// its full length. Used to find the beam bounding a panel side.
    pub fn covers(&self, other: &Segment) -> bool {
        let (Some(dir), Some(other_dir)) = (self.direction(), other.direction()) else {
            return false;
        };
        if dir != other_dir {
            return false;
        }
        if (self.offset(dir) - other.offset(dir)).abs() > GEOMETRY_TOLERANCE_M {
            return false;
        }
        let (a0, a1) = self.extent(dir);
        let (b0, b1) = other.extent(dir);
        a0 <= b0 + GEOMETRY_TOLERANCE_M && a1 >= b1 - GEOMETRY_TOLERANCE_M
    }
}

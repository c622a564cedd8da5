//! Geometric primitives for the 2D plane
//!
//! Points double as vectors. Boxes are axis-aligned and anchored at their
//! top-left corner (y grows downward, as on a canvas).

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Clamp `v` into `[min, max]`. Unlike `f64::clamp` this never panics: when
/// `min > max` the result is `max`.
pub fn clamp_value(v: f64, min: f64, max: f64) -> f64 {
    max.min(min.max(v))
}

/// A point (or vector) on the plane
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(a: Point, b: Point) -> Point {
        Point::new(a.x + b.x, a.y + b.y)
    }

    pub fn subtract(a: Point, b: Point) -> Point {
        Point::add(a, Point::scale(b, -1.0))
    }

    /// Multiply the distance from the origin by `s`, keeping the direction
    pub fn scale(a: Point, s: f64) -> Point {
        Point::new(a.x * s, a.y * s)
    }

    /// Unit vector in the direction of `a`.
    ///
    /// `a` must not be the zero vector.
    pub fn normalize(a: Point) -> Point {
        let len = Point::distance(Point::ZERO, a);
        debug_assert!(len > 0.0, "normalize called on the zero vector");
        Point::scale(a, 1.0 / len)
    }

    pub fn distance(a: Point, b: Point) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    /// Point on the unit circle at `degrees`, measured clockwise from "up"
    /// like a compass: 0° is `(0, 1)`, 90° is `(1, 0)`.
    pub fn on_unit_circle(degrees: f64) -> Point {
        let rad = degrees.to_radians();
        Point::new(rad.sin(), rad.cos())
    }

    /// Length of the vector from the origin
    pub fn length(self) -> f64 {
        Point::distance(Point::ZERO, self)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::add(self, rhs)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::subtract(self, rhs)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::scale(self, rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::scale(self, -1.0)
    }
}

/// Axis-aligned bounding box anchored at its top-left corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        debug_assert!(width >= 0.0 && height >= 0.0, "negative box extent");
        Self {
            origin,
            width,
            height,
        }
    }

    /// Smallest box covering both points
    pub fn covering(a: Point, b: Point) -> Self {
        let origin = Point::new(a.x.min(b.x), a.y.min(b.y));
        let width = (a.x - origin.x).max(b.x - origin.x);
        let height = (a.y - origin.y).max(b.y - origin.y);
        Self::new(origin, width, height)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.width / 2.0,
            self.origin.y + self.height / 2.0,
        )
    }

    /// Inclusive containment test
    pub fn inside(&self, p: Point) -> bool {
        p.x >= self.origin.x
            && p.x <= self.origin.x + self.width
            && p.y >= self.origin.y
            && p.y <= self.origin.y + self.height
    }

    /// Separating-axis overlap test.
    ///
    /// Boxes that merely touch along an edge do not intersect, except when
    /// their centers coincide on that axis (so identical boxes always
    /// intersect, even degenerate ones).
    pub fn intersects(&self, other: &BBox) -> bool {
        let a = self.center();
        let b = other.center();
        axis_overlaps(a.x - b.x, self.width + other.width)
            && axis_overlaps(a.y - b.y, self.height + other.height)
    }

    /// Grow the box by `delta / 4` on every side
    pub fn expanded(&self, delta: f64) -> BBox {
        BBox::new(
            self.origin - Point::new(delta / 4.0, delta / 4.0),
            self.width + delta / 2.0,
            self.height + delta / 2.0,
        )
    }
}

fn axis_overlaps(center_delta: f64, extent_sum: f64) -> bool {
    center_delta == 0.0 || center_delta.abs() * 2.0 < extent_sum
}

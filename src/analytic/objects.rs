//! Points, lines and circles with tolerance-aware semantics
//!
//! Lines are kept in normal form `ax + by + c = 0` with `(a, b)` a unit
//! vector and the sign canonicalized, so that equal lines produced by
//! different constructions compare equal up to epsilon.

use crate::config::ObjectKind;
use serde::{Deserialize, Serialize};

/// Base tolerance of all scalar comparisons.
///
/// Comparisons scale this by the magnitude of the operands, so values far
/// from the origin do not lose equality to representation noise.
pub const EPSILON: f64 = 1e-9;

/// Tolerance-aware scalar equality with relative scaling on large values.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON * 1.0_f64.max(a.abs()).max(b.abs())
}

fn approx_zero(x: f64, scale: f64) -> bool {
    x.abs() <= EPSILON * 1.0_f64.max(scale)
}

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint of the segment to another point.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Reflection of this point over `center`.
    pub fn reflected_over(&self, center: &Point) -> Point {
        Point::new(2.0 * center.x - self.x, 2.0 * center.y - self.y)
    }

    /// Tolerance-aware equality.
    pub fn approx_eq(&self, other: &Point) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }
}

/// Three points lie on one line, up to epsilon.
///
/// The cross product is scaled by the span of the triple so that the test
/// behaves the same for small and large coordinates.
pub fn are_collinear(p: &Point, q: &Point, r: &Point) -> bool {
    let cross = (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x);
    let scale = p.distance(q).max(p.distance(r));
    approx_zero(cross, scale * scale)
}

/// A line in canonical normal form `ax + by + c = 0`.
///
/// `(a, b)` is a unit vector; the sign is fixed so that `a > 0`, or `a = 0`
/// and `b > 0`, judged with the shared tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    a: f64,
    b: f64,
    c: f64,
}

impl Line {
    /// Build a canonical line from raw coefficients. `None` if `(a, b)` is
    /// the zero vector.
    pub fn from_coefficients(a: f64, b: f64, c: f64) -> Option<Line> {
        let norm = a.hypot(b);
        if norm <= EPSILON {
            return None;
        }
        let (mut a, mut b, mut c) = (a / norm, b / norm, c / norm);
        let flip = if a.abs() <= EPSILON { b < 0.0 } else { a < 0.0 };
        if flip {
            a = -a;
            b = -b;
            c = -c;
        }
        Some(Line { a, b, c })
    }

    /// The line through two distinct points. `None` if the points coincide.
    pub fn through(p: &Point, q: &Point) -> Option<Line> {
        if p.approx_eq(q) {
            return None;
        }
        Line::from_coefficients(q.y - p.y, p.x - q.x, q.x * p.y - p.x * q.y)
    }

    /// Unit normal vector of the line.
    pub fn normal(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    /// Canonical coefficients `(a, b, c)`.
    pub fn coefficients(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    /// Signed distance from a point to the line.
    pub fn signed_distance(&self, p: &Point) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }

    /// The point lies on the line, up to epsilon.
    pub fn contains(&self, p: &Point) -> bool {
        approx_zero(self.signed_distance(p), p.x.abs().max(p.y.abs()))
    }

    /// The line through `p` perpendicular to this one.
    pub fn perpendicular_from(&self, p: &Point) -> Line {
        // The normal of the perpendicular is this line's direction.
        Line::from_coefficients(self.b, -self.a, self.a * p.y - self.b * p.x)
            .unwrap_or(*self)
    }

    /// The line through `p` parallel to this one.
    pub fn parallel_from(&self, p: &Point) -> Line {
        Line::from_coefficients(self.a, self.b, -(self.a * p.x + self.b * p.y))
            .unwrap_or(*self)
    }

    /// The two lines never meet (or coincide), up to epsilon.
    pub fn is_parallel_to(&self, other: &Line) -> bool {
        approx_zero(self.a * other.b - other.a * self.b, 1.0)
    }

    /// The two lines meet at a right angle, up to epsilon.
    pub fn is_perpendicular_to(&self, other: &Line) -> bool {
        approx_zero(self.a * other.a + self.b * other.b, 1.0)
    }

    /// The line touches the circle in exactly one point, up to epsilon.
    pub fn is_tangent_to(&self, circle: &Circle) -> bool {
        approx_eq(self.signed_distance(&circle.center).abs(), circle.radius)
    }

    /// Intersection with another line; `None` when parallel or coincident.
    pub fn intersect(&self, other: &Line) -> Option<Point> {
        let det = self.a * other.b - other.a * self.b;
        if approx_zero(det, 1.0) {
            return None;
        }
        Some(Point::new(
            (self.b * other.c - other.b * self.c) / det,
            (other.a * self.c - self.a * other.c) / det,
        ))
    }

    /// Intersections with a circle: zero, one (tangency) or two points.
    pub fn intersect_circle(&self, circle: &Circle) -> Vec<Point> {
        let d = self.signed_distance(&circle.center);
        if d.abs() > circle.radius + EPSILON * 1.0_f64.max(circle.radius) {
            return Vec::new();
        }
        // Foot of the perpendicular from the center, then walk the line.
        let foot = Point::new(circle.center.x - self.a * d, circle.center.y - self.b * d);
        let h2 = circle.radius * circle.radius - d * d;
        let h = h2.max(0.0).sqrt();
        if approx_zero(h, circle.radius) {
            return vec![foot];
        }
        vec![
            Point::new(foot.x - self.b * h, foot.y + self.a * h),
            Point::new(foot.x + self.b * h, foot.y - self.a * h),
        ]
    }

    /// Tolerance-aware equality of canonical forms.
    pub fn approx_eq(&self, other: &Line) -> bool {
        approx_eq(self.a, other.a) && approx_eq(self.b, other.b) && approx_eq(self.c, other.c)
    }
}

/// A circle given by its center and non-negative radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    /// A circle with the given center and radius. `None` for a degenerate
    /// (zero or negative) radius.
    pub fn new(center: Point, radius: f64) -> Option<Circle> {
        if radius <= EPSILON {
            return None;
        }
        Some(Circle { center, radius })
    }

    /// The circumcircle of three points. `None` if they are collinear.
    pub fn through(p: &Point, q: &Point, r: &Point) -> Option<Circle> {
        if are_collinear(p, q, r) {
            return None;
        }
        let d = 2.0 * (p.x * (q.y - r.y) + q.x * (r.y - p.y) + r.x * (p.y - q.y));
        let pp = p.x * p.x + p.y * p.y;
        let qq = q.x * q.x + q.y * q.y;
        let rr = r.x * r.x + r.y * r.y;
        let center = Point::new(
            (pp * (q.y - r.y) + qq * (r.y - p.y) + rr * (p.y - q.y)) / d,
            (pp * (r.x - q.x) + qq * (p.x - r.x) + rr * (q.x - p.x)) / d,
        );
        Circle::new(center, center.distance(p))
    }

    /// The point lies on the circle, up to epsilon.
    pub fn contains(&self, p: &Point) -> bool {
        approx_eq(self.center.distance(p), self.radius)
    }

    /// The circles touch in exactly one point (internally or externally).
    pub fn is_tangent_to(&self, other: &Circle) -> bool {
        let d = self.center.distance(&other.center);
        approx_eq(d, self.radius + other.radius)
            || (!approx_zero(d, self.radius) && approx_eq(d, (self.radius - other.radius).abs()))
    }

    /// Intersections with another circle: zero, one (tangency) or two points.
    pub fn intersect(&self, other: &Circle) -> Vec<Point> {
        let dx = other.center.x - self.center.x;
        let dy = other.center.y - self.center.y;
        let d = dx.hypot(dy);
        let scale = self.radius.max(other.radius);
        if approx_zero(d, scale) {
            return Vec::new();
        }
        if d > self.radius + other.radius + EPSILON * 1.0_f64.max(scale)
            || d < (self.radius - other.radius).abs() - EPSILON * 1.0_f64.max(scale)
        {
            return Vec::new();
        }
        let along = (self.radius * self.radius - other.radius * other.radius + d * d) / (2.0 * d);
        let h = (self.radius * self.radius - along * along).max(0.0).sqrt();
        let mid = Point::new(self.center.x + along * dx / d, self.center.y + along * dy / d);
        if approx_zero(h, scale) {
            return vec![mid];
        }
        vec![
            Point::new(mid.x + h * dy / d, mid.y - h * dx / d),
            Point::new(mid.x - h * dy / d, mid.y + h * dx / d),
        ]
    }

    /// Tolerance-aware equality.
    pub fn approx_eq(&self, other: &Circle) -> bool {
        self.center.approx_eq(&other.center) && approx_eq(self.radius, other.radius)
    }
}

/// An analytic realization of a configuration object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnalyticObject {
    Point(Point),
    Line(Line),
    Circle(Circle),
}

impl AnalyticObject {
    /// The kind tag of the value.
    pub fn kind(&self) -> ObjectKind {
        match self {
            AnalyticObject::Point(_) => ObjectKind::Point,
            AnalyticObject::Line(_) => ObjectKind::Line,
            AnalyticObject::Circle(_) => ObjectKind::Circle,
        }
    }

    /// Tolerance-aware equality; values of different kinds are never equal.
    pub fn approx_eq(&self, other: &AnalyticObject) -> bool {
        match (self, other) {
            (AnalyticObject::Point(a), AnalyticObject::Point(b)) => a.approx_eq(b),
            (AnalyticObject::Line(a), AnalyticObject::Line(b)) => a.approx_eq(b),
            (AnalyticObject::Circle(a), AnalyticObject::Circle(b)) => a.approx_eq(b),
            _ => false,
        }
    }

    /// The point lies on this line or circle; always false for a point.
    pub fn passes_through(&self, p: &Point) -> bool {
        match self {
            AnalyticObject::Point(_) => false,
            AnalyticObject::Line(l) => l.contains(p),
            AnalyticObject::Circle(c) => c.contains(p),
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            AnalyticObject::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            AnalyticObject::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            AnalyticObject::Circle(c) => Some(c),
            _ => None,
        }
    }
}

/// All intersection points of two lines/circles (points have none).
pub fn intersections(a: &AnalyticObject, b: &AnalyticObject) -> Vec<Point> {
    match (a, b) {
        (AnalyticObject::Line(l1), AnalyticObject::Line(l2)) => {
            l1.intersect(l2).into_iter().collect()
        }
        (AnalyticObject::Line(l), AnalyticObject::Circle(c))
        | (AnalyticObject::Circle(c), AnalyticObject::Line(l)) => l.intersect_circle(c),
        (AnalyticObject::Circle(c1), AnalyticObject::Circle(c2)) => c1.intersect(c2),
        _ => Vec::new(),
    }
}

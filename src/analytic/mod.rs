//! Analytic geometry layer
//!
//! Pure tolerance-aware values: points, lines in unit-normal form, circles.
//! All predicates are epsilon-tolerant and all constructed values are
//! canonicalized before they are compared or stored. Degenerate inputs are
//! reported in-band as `None`; no failure escapes this layer.

pub mod index;
pub mod objects;

pub use index::AnalyticIndex;
pub use objects::{
    approx_eq, are_collinear, intersections, AnalyticObject, Circle, Line, Point, EPSILON,
};

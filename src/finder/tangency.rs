//! Tangency candidates: circle-circle and line-circle

use super::{circle_definitions, line_definitions, PotentialTheorem, TheoremProducer};
use crate::contextual::{ContextualPicture, HandleId, ObjectFilter};
use crate::theorem::{Theorem, TheoremType};

/// Unordered pairs of circle handles touching in one point in every
/// picture. Tangency at a picture point is reported like any other.
pub struct TangentCirclesProducer;

impl TheoremProducer for TangentCirclesProducer {
    fn id(&self) -> &'static str {
        "tangent_circles"
    }

    fn produce(&self, contextual: &ContextualPicture) -> Vec<PotentialTheorem> {
        let circles: Vec<HandleId> = contextual.circles(ObjectFilter::All).collect();
        let mut candidates = Vec::new();
        for (index, first) in circles.iter().copied().enumerate() {
            for second in circles.iter().copied().skip(index + 1) {
                let mut theorems = Vec::new();
                for a in circle_definitions(contextual, first) {
                    for b in circle_definitions(contextual, second) {
                        theorems.push(Theorem::new(TheoremType::TangentCircles, vec![a, b]));
                    }
                }
                candidates.push(PotentialTheorem {
                    theorems,
                    verify: Some(Box::new(move |contextual, picture| {
                        let (Some(a), Some(b)) = (
                            contextual.analytic(first, picture).and_then(|v| v.as_circle()),
                            contextual.analytic(second, picture).and_then(|v| v.as_circle()),
                        ) else {
                            return false;
                        };
                        a.is_tangent_to(b)
                    })),
                });
            }
        }
        candidates
    }
}

/// Pairs of a line handle and a circle handle touching in one point in
/// every picture.
pub struct TangentLinesProducer;

impl TheoremProducer for TangentLinesProducer {
    fn id(&self) -> &'static str {
        "tangent_lines"
    }

    fn produce(&self, contextual: &ContextualPicture) -> Vec<PotentialTheorem> {
        let lines: Vec<HandleId> = contextual.lines(ObjectFilter::All).collect();
        let circles: Vec<HandleId> = contextual.circles(ObjectFilter::All).collect();
        let mut candidates = Vec::new();
        for line in lines.iter().copied() {
            for circle in circles.iter().copied() {
                let mut theorems = Vec::new();
                for a in line_definitions(contextual, line) {
                    for b in circle_definitions(contextual, circle) {
                        theorems.push(Theorem::new(TheoremType::TangentLines, vec![a, b]));
                    }
                }
                candidates.push(PotentialTheorem {
                    theorems,
                    verify: Some(Box::new(move |contextual, picture| {
                        let (Some(l), Some(c)) = (
                            contextual.analytic(line, picture).and_then(|v| v.as_line()),
                            contextual.analytic(circle, picture).and_then(|v| v.as_circle()),
                        ) else {
                            return false;
                        };
                        l.is_tangent_to(c)
                    })),
                });
            }
        }
        candidates
    }
}

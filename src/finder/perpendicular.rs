//! Perpendicular-line candidates

use super::{line_definitions, PotentialTheorem, TheoremProducer};
use crate::contextual::{ContextualPicture, HandleId, ObjectFilter};
use crate::theorem::{Theorem, TheoremType};

/// Unordered pairs of line handles meeting at a right angle in every
/// picture.
pub struct PerpendicularLinesProducer;

impl TheoremProducer for PerpendicularLinesProducer {
    fn id(&self) -> &'static str {
        "perpendicular_lines"
    }

    fn produce(&self, contextual: &ContextualPicture) -> Vec<PotentialTheorem> {
        let lines: Vec<HandleId> = contextual.lines(ObjectFilter::All).collect();
        let mut candidates = Vec::new();
        for (index, first) in lines.iter().copied().enumerate() {
            for second in lines.iter().copied().skip(index + 1) {
                let mut theorems = Vec::new();
                for a in line_definitions(contextual, first) {
                    for b in line_definitions(contextual, second) {
                        theorems.push(Theorem::new(TheoremType::PerpendicularLines, vec![a, b]));
                    }
                }
                candidates.push(PotentialTheorem {
                    theorems,
                    verify: Some(Box::new(move |contextual, picture| {
                        let (Some(a), Some(b)) = (
                            contextual.analytic(first, picture).and_then(|v| v.as_line()),
                            contextual.analytic(second, picture).and_then(|v| v.as_line()),
                        ) else {
                            return false;
                        };
                        a.is_perpendicular_to(b)
                    })),
                });
            }
        }
        candidates
    }
}

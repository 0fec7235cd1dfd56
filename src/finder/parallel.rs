//! Parallel-line candidates

use super::{line_definitions, PotentialTheorem, TheoremProducer};
use crate::contextual::{ContextualPicture, HandleId, ObjectFilter};
use crate::theorem::{Theorem, TheoremType};

/// Unordered pairs of line handles that never meet in any picture.
pub struct ParallelLinesProducer;

impl TheoremProducer for ParallelLinesProducer {
    fn id(&self) -> &'static str {
        "parallel_lines"
    }

    fn produce(&self, contextual: &ContextualPicture) -> Vec<PotentialTheorem> {
        let lines: Vec<HandleId> = contextual.lines(ObjectFilter::All).collect();
        let mut candidates = Vec::new();
        for (index, first) in lines.iter().copied().enumerate() {
            for second in lines.iter().copied().skip(index + 1) {
                let mut theorems = Vec::new();
                for a in line_definitions(contextual, first) {
                    for b in line_definitions(contextual, second) {
                        theorems.push(Theorem::new(TheoremType::ParallelLines, vec![a, b]));
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
                        a.is_parallel_to(b)
                    })),
                });
            }
        }
        candidates
    }
}

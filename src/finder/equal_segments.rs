//! Equal-segment candidates

use super::{point_object, PotentialTheorem, TheoremProducer};
use crate::contextual::{ContextualPicture, HandleId, ObjectFilter};
use crate::theorem::{Theorem, TheoremObject, TheoremType};

/// Unordered pairs of point-pair segments with equal length in every
/// picture.
pub struct EqualSegmentsProducer;

fn segment_length(
    contextual: &ContextualPicture,
    segment: (HandleId, HandleId),
    picture: usize,
) -> Option<f64> {
    let a = contextual.analytic(segment.0, picture)?.as_point()?;
    let b = contextual.analytic(segment.1, picture)?.as_point()?;
    Some(a.distance(b))
}

impl TheoremProducer for EqualSegmentsProducer {
    fn id(&self) -> &'static str {
        "equal_line_segments"
    }

    fn produce(&self, contextual: &ContextualPicture) -> Vec<PotentialTheorem> {
        let points: Vec<HandleId> = contextual.points(ObjectFilter::All).collect();
        let mut segments = Vec::new();
        for (index, first) in points.iter().copied().enumerate() {
            for second in points.iter().copied().skip(index + 1) {
                segments.push((first, second));
            }
        }

        let mut candidates = Vec::new();
        for (index, first) in segments.iter().copied().enumerate() {
            for second in segments.iter().copied().skip(index + 1) {
                let (Some(a0), Some(a1), Some(b0), Some(b1)) = (
                    point_object(contextual, first.0),
                    point_object(contextual, first.1),
                    point_object(contextual, second.0),
                    point_object(contextual, second.1),
                ) else {
                    continue;
                };
                let theorem = Theorem::new(
                    TheoremType::EqualLineSegments,
                    vec![
                        TheoremObject::segment(a0, a1),
                        TheoremObject::segment(b0, b1),
                    ],
                );
                candidates.push(PotentialTheorem {
                    theorems: vec![theorem],
                    verify: Some(Box::new(move |contextual, picture| {
                        let (Some(left), Some(right)) = (
                            segment_length(contextual, first, picture),
                            segment_length(contextual, second, picture),
                        ) else {
                            return false;
                        };
                        crate::analytic::approx_eq(left, right)
                    })),
                });
            }
        }
        candidates
    }
}

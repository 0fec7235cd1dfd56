//! Concurrency candidates
//!
//! Triples of carriers (lines and circles) sharing a point that is not a
//! point of the picture. Requiring the common point to be external rules
//! out the pencils through every configuration point, which would otherwise
//! dominate the output.

use super::{carrier_definitions, carriers, PotentialTheorem, TheoremProducer};
use crate::analytic::{intersections, AnalyticObject};
use crate::contextual::{ContextualPicture, HandleId, ObjectFilter};
use crate::theorem::{Theorem, TheoremType};

/// Triples of line/circle handles concurrent at an external point in every
/// picture.
pub struct ConcurrentObjectsProducer;

fn concurrent_outside_picture(
    contextual: &ContextualPicture,
    triple: [HandleId; 3],
    picture: usize,
) -> bool {
    let values: Option<Vec<&AnalyticObject>> = triple
        .iter()
        .map(|handle| contextual.analytic(*handle, picture))
        .collect();
    let Some(values) = values else { return false };
    let points: Vec<_> = contextual
        .points(ObjectFilter::All)
        .filter_map(|point| {
            contextual
                .analytic(point, picture)
                .and_then(AnalyticObject::as_point)
        })
        .collect();
    intersections(values[0], values[1]).iter().any(|candidate| {
        values[2].passes_through(candidate)
            && !points.iter().any(|point| point.approx_eq(candidate))
    })
}

impl TheoremProducer for ConcurrentObjectsProducer {
    fn id(&self) -> &'static str {
        "concurrent_objects"
    }

    fn produce(&self, contextual: &ContextualPicture) -> Vec<PotentialTheorem> {
        let carriers = carriers(contextual);
        let mut candidates = Vec::new();
        for i in 0..carriers.len() {
            for j in i + 1..carriers.len() {
                for k in j + 1..carriers.len() {
                    let triple = [carriers[i], carriers[j], carriers[k]];
                    let mut theorems = Vec::new();
                    for a in carrier_definitions(contextual, triple[0]) {
                        for b in carrier_definitions(contextual, triple[1]) {
                            for c in carrier_definitions(contextual, triple[2]) {
                                theorems.push(Theorem::new(
                                    TheoremType::ConcurrentObjects,
                                    vec![a, b, c],
                                ));
                            }
                        }
                    }
                    candidates.push(PotentialTheorem {
                        theorems,
                        verify: Some(Box::new(move |contextual, picture| {
                            concurrent_outside_picture(contextual, triple, picture)
                        })),
                    });
                }
            }
        }
        candidates
    }
}

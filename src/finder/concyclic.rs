//! Concyclic-point candidates

use super::{point_object, PotentialTheorem, TheoremProducer};
use crate::analytic::Circle;
use crate::contextual::{ContextualPicture, HandleId, ObjectFilter};
use crate::theorem::{Theorem, TheoremObject, TheoremType};

/// Quadruples of point handles on one circle in every picture.
pub struct ConcyclicPointsProducer;

impl TheoremProducer for ConcyclicPointsProducer {
    fn id(&self) -> &'static str {
        "concyclic_points"
    }

    fn produce(&self, contextual: &ContextualPicture) -> Vec<PotentialTheorem> {
        let points: Vec<HandleId> = contextual.points(ObjectFilter::All).collect();
        let mut candidates = Vec::new();
        for i in 0..points.len() {
            for j in i + 1..points.len() {
                for k in j + 1..points.len() {
                    for l in k + 1..points.len() {
                        let quad = [points[i], points[j], points[k], points[l]];
                        let objects: Option<Vec<TheoremObject>> = quad
                            .iter()
                            .map(|point| point_object(contextual, *point).map(TheoremObject::Point))
                            .collect();
                        let Some(objects) = objects else { continue };
                        candidates.push(PotentialTheorem {
                            theorems: vec![Theorem::new(TheoremType::ConcyclicPoints, objects)],
                            verify: Some(Box::new(move |contextual, picture| {
                                let values: Option<Vec<_>> = quad
                                    .iter()
                                    .map(|point| {
                                        contextual
                                            .analytic(*point, picture)
                                            .and_then(|value| value.as_point())
                                            .copied()
                                    })
                                    .collect();
                                match values.as_deref() {
                                    Some([a, b, c, d]) => Circle::through(a, b, c)
                                        .map(|circle| circle.contains(d))
                                        .unwrap_or(false),
                                    _ => false,
                                }
                            })),
                        });
                    }
                }
            }
        }
        candidates
    }
}

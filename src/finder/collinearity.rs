//! Collinear-point candidates

use super::{point_object, PotentialTheorem, TheoremProducer};
use crate::analytic::are_collinear;
use crate::contextual::{ContextualPicture, HandleId, ObjectFilter};
use crate::theorem::{Theorem, TheoremObject, TheoremType};

/// Triples of point handles lying on one line in every picture.
pub struct CollinearProducer;

impl TheoremProducer for CollinearProducer {
    fn id(&self) -> &'static str {
        "collinear_points"
    }

    fn produce(&self, contextual: &ContextualPicture) -> Vec<PotentialTheorem> {
        let points: Vec<HandleId> = contextual.points(ObjectFilter::All).collect();
        let mut candidates = Vec::new();
        for i in 0..points.len() {
            for j in i + 1..points.len() {
                for k in j + 1..points.len() {
                    let triple = [points[i], points[j], points[k]];
                    let objects: Option<Vec<TheoremObject>> = triple
                        .iter()
                        .map(|point| point_object(contextual, *point).map(TheoremObject::Point))
                        .collect();
                    let Some(objects) = objects else { continue };
                    candidates.push(PotentialTheorem {
                        theorems: vec![Theorem::new(TheoremType::Collinear, objects)],
                        verify: Some(Box::new(move |contextual, picture| {
                            let values: Option<Vec<_>> = triple
                                .iter()
                                .map(|point| {
                                    contextual
                                        .analytic(*point, picture)
                                        .and_then(|value| value.as_point())
                                        .copied()
                                })
                                .collect();
                            match values.as_deref() {
                                Some([a, b, c]) => are_collinear(a, b, c),
                                _ => false,
                            }
                        })),
                    });
                }
            }
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic::{AnalyticObject, Point};
    use crate::config::{
        Configuration, ConfigurationObject, ObjectId, ObjectKind, PredefinedConstruction,
    };
    use crate::constructor::GeometryConstructor;
    use crate::finder::TheoremFinder;

    fn p(x: f64, y: f64) -> AnalyticObject {
        AnalyticObject::Point(Point::new(x, y))
    }

    #[test]
    fn test_midpoint_is_collinear_with_its_segment() {
        let configuration = Configuration::new(vec![
            ConfigurationObject::loose(ObjectId(0), ObjectKind::Point),
            ConfigurationObject::loose(ObjectId(1), ObjectKind::Point),
            ConfigurationObject::loose(ObjectId(2), ObjectKind::Point),
            ConfigurationObject::constructed(
                ObjectId(3),
                PredefinedConstruction::Midpoint.into(),
                vec![ObjectId(1), ObjectId(2)],
            ),
        ])
        .unwrap();
        let constructor = GeometryConstructor::default();
        let (pictures, _) = constructor
            .construct_with_loose(
                &configuration,
                &[
                    vec![p(2.0, 5.0), p(-1.0, -1.0), p(7.0, -1.0)],
                    vec![p(1.0, 6.0), p(-3.0, -2.0), p(6.0, -1.0)],
                ],
            )
            .unwrap();
        let contextual = ContextualPicture::new(&pictures, 1).unwrap();
        let theorems = TheoremFinder::new().find_all(&contextual);

        let expected = Theorem::new(
            TheoremType::Collinear,
            vec![
                TheoremObject::Point(ObjectId(1)),
                TheoremObject::Point(ObjectId(2)),
                TheoremObject::Point(ObjectId(3)),
            ],
        );
        assert!(theorems.contains(&expected));
        assert_eq!(theorems.count_of_type(TheoremType::Collinear), 1);
    }
}

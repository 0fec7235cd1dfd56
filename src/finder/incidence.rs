//! Incidence reports
//!
//! Membership sets already guarantee incidence in every picture, so these
//! candidates carry no numeric predicate. Only handles with a backing
//! configuration object take part; incidence with an implicit carrier is
//! expressed by the collinearity and concyclicity types instead.

use super::{carriers, member_objects, PotentialTheorem, TheoremProducer};
use crate::contextual::ContextualPicture;
use crate::theorem::{Theorem, TheoremObject, TheoremType};

/// Point-on-named-carrier reports drawn from the membership sets.
pub struct IncidenceProducer;

impl TheoremProducer for IncidenceProducer {
    fn id(&self) -> &'static str {
        "incidence"
    }

    fn produce(&self, contextual: &ContextualPicture) -> Vec<PotentialTheorem> {
        let mut candidates = Vec::new();
        for carrier in carriers(contextual) {
            let Some(data) = contextual.get(carrier) else { continue };
            let Some(object) = data.configuration_object() else { continue };
            let named = TheoremObject::named(object, data.kind());
            for member in member_objects(contextual, carrier) {
                candidates.push(PotentialTheorem {
                    theorems: vec![Theorem::new(
                        TheoremType::Incidence,
                        vec![TheoremObject::Point(member), named],
                    )],
                    verify: None,
                });
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
    fn test_explicit_line_reports_its_points() {
        let configuration = Configuration::new(vec![
            ConfigurationObject::loose(ObjectId(0), ObjectKind::Point),
            ConfigurationObject::loose(ObjectId(1), ObjectKind::Point),
            ConfigurationObject::loose(ObjectId(2), ObjectKind::Point),
            ConfigurationObject::constructed(
                ObjectId(3),
                PredefinedConstruction::LineFromPoints.into(),
                vec![ObjectId(0), ObjectId(1)],
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

        for point in [ObjectId(0), ObjectId(1)] {
            assert!(theorems.contains(&Theorem::new(
                TheoremType::Incidence,
                vec![
                    TheoremObject::Point(point),
                    TheoremObject::named(ObjectId(3), ObjectKind::Line),
                ],
            )));
        }
        assert_eq!(theorems.count_of_type(TheoremType::Incidence), 2);
    }
}

//! Gradual analysis of extended configurations
//!
//! The top-level contract: given the objects of an already-accepted
//! configuration plus newly appended constructed objects, either report the
//! new theorems of the extension, or report the duplicates that make the
//! extension ambiguous.

use crate::config::{Configuration, ConfigurationObject};
use crate::constructor::GeometryConstructor;
use crate::contextual::ContextualPicture;
use crate::error::{GeoError, GeoResult};
use crate::finder::TheoremFinder;
use crate::theorem::{Theorem, TheoremMap, TheoremObject, TheoremType};
use tracing::debug;

/// What the analyzer found for one extension step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerOutput {
    /// New theorems of the extension; `SameObjects` theorems when the
    /// extension produced duplicates.
    pub theorems: TheoremMap,
    /// False when some appended object was inconstructible or duplicated an
    /// earlier object. The generator prunes on this flag.
    pub unambiguously_constructible: bool,
}

/// Analyzer over a geometry constructor.
#[derive(Debug, Clone, Default)]
pub struct GradualAnalyzer {
    constructor: GeometryConstructor,
}

impl GradualAnalyzer {
    pub fn new(constructor: GeometryConstructor) -> Self {
        Self { constructor }
    }

    /// Analyze the configuration formed by `old_objects` extended with
    /// `new_objects`.
    ///
    /// The old objects must form an unambiguously constructible
    /// configuration; they are realized from scratch, the extension by
    /// cloning. Inconsistent pictures reject the whole configuration.
    pub fn analyze(
        &self,
        old_objects: &[ConfigurationObject],
        new_objects: &[ConfigurationObject],
    ) -> GeoResult<AnalyzerOutput> {
        let old_configuration = Configuration::new(old_objects.to_vec())?;
        let full_configuration = old_configuration.extended(new_objects.to_vec())?;

        let picture_count = self.constructor.config().picture_count;
        let (old_pictures, old_data) =
            self.constructor.construct(&old_configuration, picture_count)?;
        if !old_data.is_unambiguous() {
            return Err(GeoError::InvalidInput(
                "the old objects are not unambiguously constructible".into(),
            ));
        }

        let (pictures, data) = self
            .constructor
            .construct_by_cloning(&old_pictures, &full_configuration)?;

        if let Some(object) = data.inconstructible_object {
            debug!(object = object.0, "extension is inconstructible");
            return Ok(AnalyzerOutput {
                theorems: TheoremMap::new(),
                unambiguously_constructible: false,
            });
        }
        if !data.duplicates.is_empty() {
            // One SameObjects theorem per duplicate; no producers run.
            let mut theorems = TheoremMap::new();
            for (duplicate, canonical) in &data.duplicates {
                let kind = full_configuration
                    .get(*duplicate)
                    .map(|object| object.kind)
                    .ok_or_else(|| {
                        GeoError::InternalInvariantViolation("duplicate of unknown object".into())
                    })?;
                theorems.insert(Theorem::new(
                    TheoremType::SameObjects,
                    vec![
                        TheoremObject::named(*duplicate, kind),
                        TheoremObject::named(*canonical, kind),
                    ],
                ));
            }
            return Ok(AnalyzerOutput {
                theorems,
                unambiguously_constructible: false,
            });
        }

        let contextual = ContextualPicture::new(&pictures, new_objects.len())?;
        let theorems = TheoremFinder::new().find_new(&contextual, &TheoremMap::new());
        Ok(AnalyzerOutput {
            theorems,
            unambiguously_constructible: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ObjectId, ObjectKind, PredefinedConstruction};

    fn triangle() -> Vec<ConfigurationObject> {
        (0..3)
            .map(|i| ConfigurationObject::loose(ObjectId(i), ObjectKind::Point))
            .collect()
    }

    #[test]
    fn test_duplicate_short_circuits() {
        // Reflecting A over the midpoint of A and B gives B again.
        let mut old = triangle();
        old.push(ConfigurationObject::constructed(
            ObjectId(3),
            PredefinedConstruction::Midpoint.into(),
            vec![ObjectId(0), ObjectId(1)],
        ));
        let new = vec![ConfigurationObject::constructed(
            ObjectId(4),
            PredefinedConstruction::PointReflection.into(),
            vec![ObjectId(0), ObjectId(3)],
        )];

        let output = GradualAnalyzer::default().analyze(&old, &new).unwrap();

        assert!(!output.unambiguously_constructible);
        assert_eq!(output.theorems.len(), 1);
        let expected = Theorem::new(
            TheoremType::SameObjects,
            vec![
                TheoremObject::Point(ObjectId(4)),
                TheoremObject::Point(ObjectId(1)),
            ],
        );
        assert!(output.theorems.contains(&expected));
    }

    #[test]
    fn test_unambiguous_extension_reports_theorems() {
        let old = triangle();
        let new = vec![ConfigurationObject::constructed(
            ObjectId(3),
            PredefinedConstruction::Midpoint.into(),
            vec![ObjectId(0), ObjectId(1)],
        )];

        let output = GradualAnalyzer::default().analyze(&old, &new).unwrap();

        assert!(output.unambiguously_constructible);
        // The midpoint is collinear with its segment and splits it evenly.
        assert_eq!(output.theorems.count_of_type(TheoremType::Collinear), 1);
        assert_eq!(
            output.theorems.count_of_type(TheoremType::EqualLineSegments),
            1
        );
        assert_eq!(output.theorems.count_of_type(TheoremType::SameObjects), 0);
    }

    #[test]
    fn test_inconstructible_extension() {
        // The intersection of a line with itself never exists.
        let old = triangle();
        let new = vec![ConfigurationObject::constructed(
            ObjectId(3),
            PredefinedConstruction::IntersectionOfLinesFromPoints.into(),
            vec![ObjectId(0), ObjectId(1), ObjectId(0), ObjectId(1)],
        )];

        let output = GradualAnalyzer::default().analyze(&old, &new).unwrap();

        assert!(!output.unambiguously_constructible);
        assert!(output.theorems.is_empty());
    }
}

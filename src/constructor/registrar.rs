//! Cross-picture registration of constructed objects
//!
//! The registrar applies one symbolic object to every picture through its
//! constructor and enforces that the pictures agree: on constructibility,
//! and on which earlier object (if any) the new value duplicates.

use super::construct_value;
use crate::analytic::AnalyticObject;
use crate::config::{ConfigurationObject, ObjectId, ObjectSource};
use crate::error::{GeoError, GeoResult};
use crate::picture::Pictures;
use tracing::debug;

/// Cross-picture outcome for one constructed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Every picture produced a value. False means every picture agreed the
    /// object has no value.
    pub constructed: bool,
    /// The earlier object this value duplicates, agreed by all pictures.
    pub duplicate_of: Option<ObjectId>,
}

/// Evaluate `object` in a single picture, `None` for degenerate inputs.
pub(crate) fn evaluate_in(
    picture: &crate::picture::Picture,
    object: &ConfigurationObject,
) -> GeoResult<Option<AnalyticObject>> {
    let ObjectSource::Constructed { construction, args } = &object.source else {
        return Err(GeoError::InternalInvariantViolation(format!(
            "registrar got loose object {}",
            object.id
        )));
    };
    let mut inputs = Vec::with_capacity(args.len());
    for arg in args {
        let value = picture.get(*arg).ok_or_else(|| {
            GeoError::InternalInvariantViolation(format!(
                "object {} needs unrealized parent {}",
                object.id, arg
            ))
        })?;
        inputs.push(*value);
    }
    Ok(construct_value(construction, &inputs))
}

/// Apply `object` to every picture and check that the pictures agree on
/// constructibility and on duplicates.
///
/// When `add` is false the pictures are left untouched (probe mode).
pub(crate) fn register_object(
    pictures: &mut Pictures,
    object: &ConfigurationObject,
    add: bool,
) -> GeoResult<Registration> {
    if pictures.iter().any(|picture| picture.contains(object.id)) {
        return Err(GeoError::InternalInvariantViolation(format!(
            "object {} is already registered",
            object.id
        )));
    }

    let mut values = Vec::with_capacity(pictures.len());
    for picture in pictures.iter() {
        values.push(evaluate_in(picture, object)?);
    }

    let constructed = values.iter().filter(|value| value.is_some()).count();
    if constructed == 0 {
        debug!(object = object.id.0, "inconstructible in every picture");
        return Ok(Registration {
            constructed: false,
            duplicate_of: None,
        });
    }
    if constructed < values.len() {
        debug!(object = object.id.0, "constructibility differs between pictures");
        return Err(GeoError::inconsistent(
            object.id,
            "constructible in some pictures only",
        ));
    }

    let values: Vec<AnalyticObject> = values.into_iter().flatten().collect();

    // Every picture must find the same duplicate, or none at all.
    let mut duplicate_of: Option<Option<ObjectId>> = None;
    for (picture, value) in pictures.iter().zip(&values) {
        let found = picture.find_by_value(value);
        match duplicate_of {
            None => duplicate_of = Some(found),
            Some(agreed) if agreed == found => {}
            Some(_) => {
                debug!(object = object.id.0, "duplicate detection differs between pictures");
                return Err(GeoError::inconsistent(
                    object.id,
                    "pictures disagree on duplicates",
                ));
            }
        }
    }
    let duplicate_of = duplicate_of.flatten();
    if let Some(owner) = duplicate_of {
        debug!(object = object.id.0, owner = owner.0, "duplicate of earlier object");
    }

    if add {
        for (picture, value) in pictures.pictures_mut().iter_mut().zip(&values) {
            picture.add(object.id, *value);
        }
    }

    Ok(Registration {
        constructed: true,
        duplicate_of,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic::Point;
    use crate::config::{Configuration, ObjectKind, PredefinedConstruction};
    use crate::picture::Picture;

    fn point(x: f64, y: f64) -> AnalyticObject {
        AnalyticObject::Point(Point::new(x, y))
    }

    fn midpoint_setup(first: [(f64, f64); 2], second: [(f64, f64); 2]) -> (Pictures, ConfigurationObject) {
        let a = ConfigurationObject::loose(ObjectId(0), ObjectKind::Point);
        let b = ConfigurationObject::loose(ObjectId(1), ObjectKind::Point);
        let m = ConfigurationObject::constructed(
            ObjectId(2),
            PredefinedConstruction::Midpoint.into(),
            vec![ObjectId(0), ObjectId(1)],
        );
        let configuration = Configuration::new(vec![a, b, m.clone()]).unwrap();

        let mut pictures = Vec::new();
        for coords in [first, second] {
            let mut picture = Picture::new();
            picture.add(ObjectId(0), point(coords[0].0, coords[0].1));
            picture.add(ObjectId(1), point(coords[1].0, coords[1].1));
            pictures.push(picture);
        }
        (Pictures::new(configuration, pictures).unwrap(), m)
    }

    #[test]
    fn test_registration_adds_to_every_picture() {
        let (mut pictures, m) = midpoint_setup([(0.0, 0.0), (2.0, 0.0)], [(1.0, 1.0), (3.0, 5.0)]);

        let registration = register_object(&mut pictures, &m, true).unwrap();
        assert!(registration.constructed);
        assert!(registration.duplicate_of.is_none());

        let expected = [point(1.0, 0.0), point(2.0, 3.0)];
        for (picture, value) in pictures.iter().zip(expected) {
            assert!(picture.get(ObjectId(2)).unwrap().approx_eq(&value));
        }
    }

    #[test]
    fn test_probe_mode_leaves_pictures_untouched() {
        let (mut pictures, m) = midpoint_setup([(0.0, 0.0), (2.0, 0.0)], [(1.0, 1.0), (3.0, 5.0)]);

        register_object(&mut pictures, &m, false).unwrap();
        assert!(pictures.iter().all(|picture| !picture.contains(ObjectId(2))));
    }

    #[test]
    fn test_consistent_duplicate() {
        // The loose point C sits exactly on the midpoint of A and B in
        // both pictures, so the constructed midpoint duplicates it.
        let a = ConfigurationObject::loose(ObjectId(0), ObjectKind::Point);
        let b = ConfigurationObject::loose(ObjectId(1), ObjectKind::Point);
        let c = ConfigurationObject::loose(ObjectId(2), ObjectKind::Point);
        let m = ConfigurationObject::constructed(
            ObjectId(3),
            PredefinedConstruction::Midpoint.into(),
            vec![ObjectId(0), ObjectId(1)],
        );
        let configuration = Configuration::new(vec![a, b, c, m.clone()]).unwrap();

        let mut pictures = Vec::new();
        for (p, q) in [((0.0, 0.0), (4.0, 2.0)), ((1.0, 1.0), (3.0, 7.0))] {
            let mut picture = Picture::new();
            picture.add(ObjectId(0), point(p.0, p.1));
            picture.add(ObjectId(1), point(q.0, q.1));
            picture.add(
                ObjectId(2),
                point((p.0 + q.0) / 2.0, (p.1 + q.1) / 2.0),
            );
            pictures.push(picture);
        }
        let mut pictures = Pictures::new(configuration, pictures).unwrap();

        let registration = register_object(&mut pictures, &m, true).unwrap();
        assert!(registration.constructed);
        assert_eq!(registration.duplicate_of, Some(ObjectId(2)));
    }

    #[test]
    fn test_disagreeing_duplicate_is_inconsistent() {
        // The third point sits on the midpoint in one picture only.
        let a = ConfigurationObject::loose(ObjectId(0), ObjectKind::Point);
        let b = ConfigurationObject::loose(ObjectId(1), ObjectKind::Point);
        let c = ConfigurationObject::loose(ObjectId(2), ObjectKind::Point);
        let m = ConfigurationObject::constructed(
            ObjectId(3),
            PredefinedConstruction::Midpoint.into(),
            vec![ObjectId(0), ObjectId(1)],
        );
        let configuration = Configuration::new(vec![a, b, c, m.clone()]).unwrap();

        let mut first = Picture::new();
        first.add(ObjectId(0), point(0.0, 0.0));
        first.add(ObjectId(1), point(4.0, 2.0));
        first.add(ObjectId(2), point(2.0, 1.0));
        let mut second = Picture::new();
        second.add(ObjectId(0), point(1.0, 1.0));
        second.add(ObjectId(1), point(3.0, 7.0));
        second.add(ObjectId(2), point(0.0, 5.0));
        let mut pictures = Pictures::new(configuration, vec![first, second]).unwrap();

        assert!(matches!(
            register_object(&mut pictures, &m, true),
            Err(GeoError::InconsistentPictures(_))
        ));
    }

    #[test]
    fn test_consistent_inconstructibility() {
        // Intersection of the lines AB and AB is degenerate everywhere.
        let a = ConfigurationObject::loose(ObjectId(0), ObjectKind::Point);
        let b = ConfigurationObject::loose(ObjectId(1), ObjectKind::Point);
        let x = ConfigurationObject::constructed(
            ObjectId(2),
            PredefinedConstruction::IntersectionOfLinesFromPoints.into(),
            vec![ObjectId(0), ObjectId(1), ObjectId(0), ObjectId(1)],
        );
        let configuration = Configuration::new(vec![a, b, x.clone()]).unwrap();

        let mut pictures = Vec::new();
        for (p, q) in [((0.0, 0.0), (4.0, 2.0)), ((1.0, 1.0), (3.0, 7.0))] {
            let mut picture = Picture::new();
            picture.add(ObjectId(0), point(p.0, p.1));
            picture.add(ObjectId(1), point(q.0, q.1));
            pictures.push(picture);
        }
        let mut pictures = Pictures::new(configuration, pictures).unwrap();

        let registration = register_object(&mut pictures, &x, true).unwrap();
        assert!(!registration.constructed);
    }

    #[test]
    fn test_readding_is_an_invariant_violation() {
        let (mut pictures, m) = midpoint_setup([(0.0, 0.0), (2.0, 0.0)], [(1.0, 1.0), (3.0, 5.0)]);

        register_object(&mut pictures, &m, true).unwrap();
        assert!(matches!(
            register_object(&mut pictures, &m, true),
            Err(GeoError::InternalInvariantViolation(_))
        ));
    }
}

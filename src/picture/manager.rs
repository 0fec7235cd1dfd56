//! Ownership of the independent pictures of one configuration

use super::Picture;
use crate::config::{Configuration, ObjectId};
use crate::error::{GeoError, GeoResult};
use crate::picture::layout::LayoutConfig;
use rustc_hash::FxHashMap;

/// Knobs of picture construction.
#[derive(Debug, Clone, Copy)]
pub struct PicturesConfig {
    /// How many independent pictures realize each configuration.
    pub picture_count: usize,
    /// Reseed budget when drawing a configuration from scratch.
    pub max_attempts: usize,
    /// Seed of the loose-object draws.
    pub seed: u64,
    /// Loose-object sampler configuration.
    pub layout: LayoutConfig,
}

impl Default for PicturesConfig {
    fn default() -> Self {
        Self {
            picture_count: 5,
            max_attempts: 100,
            seed: 0,
            layout: LayoutConfig::default(),
        }
    }
}

/// What the registrar learned while constructing a configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstructionData {
    /// The first object every picture consistently failed to construct,
    /// if any. Construction stops at that object.
    pub inconstructible_object: Option<ObjectId>,
    /// Constructed objects whose value coincides with an earlier object,
    /// mapped to that canonical owner.
    pub duplicates: FxHashMap<ObjectId, ObjectId>,
}

impl ConstructionData {
    /// No inconstructible object and no duplicates.
    pub fn is_unambiguous(&self) -> bool {
        self.inconstructible_object.is_none() && self.duplicates.is_empty()
    }
}

/// The independent pictures of one configuration.
#[derive(Debug, Clone)]
pub struct Pictures {
    configuration: Configuration,
    pictures: Vec<Picture>,
}

impl Pictures {
    /// Wrap already-populated pictures of a configuration. Used by the
    /// geometry constructor and by tests that fix their coordinates.
    pub fn new(configuration: Configuration, pictures: Vec<Picture>) -> GeoResult<Self> {
        if pictures.is_empty() {
            return Err(GeoError::InvalidInput(
                "a configuration needs at least one picture".into(),
            ));
        }
        Ok(Self {
            configuration,
            pictures,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Picture> {
        self.pictures.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Picture> {
        self.pictures.iter()
    }

    /// Reorder the pictures; theorem discovery commutes with this.
    pub fn permuted(&self, order: &[usize]) -> GeoResult<Self> {
        if order.len() != self.pictures.len() {
            return Err(GeoError::InvalidInput(
                "permutation length does not match picture count".into(),
            ));
        }
        let mut pictures = Vec::with_capacity(order.len());
        for &index in order {
            let picture = self.pictures.get(index).ok_or_else(|| {
                GeoError::InvalidInput(format!("permutation index {index} out of range"))
            })?;
            pictures.push(picture.clone());
        }
        Pictures::new(self.configuration.clone(), pictures)
    }

    pub(crate) fn pictures_mut(&mut self) -> &mut [Picture] {
        &mut self.pictures
    }

    pub(crate) fn replace_configuration(&mut self, configuration: Configuration) {
        self.configuration = configuration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic::{AnalyticObject, Point};
    use crate::config::{ConfigurationObject, ObjectKind};

    fn two_point_pictures() -> Pictures {
        let configuration = Configuration::new(vec![
            ConfigurationObject::loose(ObjectId(0), ObjectKind::Point),
            ConfigurationObject::loose(ObjectId(1), ObjectKind::Point),
        ])
        .unwrap();
        let mut first = Picture::new();
        first.add(ObjectId(0), AnalyticObject::Point(Point::new(0.0, 0.0)));
        first.add(ObjectId(1), AnalyticObject::Point(Point::new(1.0, 0.0)));
        let mut second = Picture::new();
        second.add(ObjectId(0), AnalyticObject::Point(Point::new(2.0, 2.0)));
        second.add(ObjectId(1), AnalyticObject::Point(Point::new(5.0, 1.0)));
        Pictures::new(configuration, vec![first, second]).unwrap()
    }

    #[test]
    fn test_iteration() {
        let pictures = two_point_pictures();
        assert_eq!(pictures.len(), 2);
        assert!(pictures.iter().all(|picture| picture.len() == 2));
    }

    #[test]
    fn test_empty_rejected() {
        let configuration = Configuration::new(vec![]).unwrap();
        assert!(Pictures::new(configuration, vec![]).is_err());
    }

    #[test]
    fn test_permutation() {
        let pictures = two_point_pictures();
        let swapped = pictures.permuted(&[1, 0]).unwrap();

        let original: Vec<_> = pictures.get(0).unwrap().iter().map(|(id, _)| id).collect();
        let moved: Vec<_> = swapped.get(1).unwrap().iter().map(|(id, _)| id).collect();
        assert_eq!(original, moved);

        assert!(pictures.permuted(&[0]).is_err());
        assert!(pictures.permuted(&[0, 5]).is_err());
    }
}

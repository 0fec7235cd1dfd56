//! Configuration objects and validated configurations

use super::constructions::Construction;
use crate::error::{GeoError, GeoResult};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a configuration object within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of geometric kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    Point,
    Line,
    Circle,
}

/// How a configuration object comes into being.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectSource {
    /// A free object whose analytic value is drawn randomly per picture.
    Loose,
    /// The output of a construction applied to earlier objects. `args` is
    /// the flattened argument list matching the construction's signature.
    Constructed {
        construction: Construction,
        args: Vec<ObjectId>,
    },
}

/// A symbolic geometric object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub source: ObjectSource,
}

impl ConfigurationObject {
    /// A loose object of the given kind.
    pub fn loose(id: ObjectId, kind: ObjectKind) -> Self {
        Self {
            id,
            kind,
            source: ObjectSource::Loose,
        }
    }

    /// A constructed object; its kind is the construction's output kind.
    pub fn constructed(id: ObjectId, construction: Construction, args: Vec<ObjectId>) -> Self {
        let kind = construction.signature().output;
        Self {
            id,
            kind,
            source: ObjectSource::Constructed { construction, args },
        }
    }

    pub fn is_loose(&self) -> bool {
        matches!(self.source, ObjectSource::Loose)
    }
}

/// An ordered, validated sequence of configuration objects.
///
/// Invariants enforced on construction: ids are unique, every argument of a
/// constructed object refers to an earlier object, argument kinds match the
/// construction's flattened signature and the object's kind matches the
/// construction's output kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<ConfigurationObject>", into = "Vec<ConfigurationObject>")]
pub struct Configuration {
    objects: Vec<ConfigurationObject>,
    positions: FxHashMap<ObjectId, usize>,
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.objects == other.objects
    }
}

impl TryFrom<Vec<ConfigurationObject>> for Configuration {
    type Error = GeoError;

    fn try_from(objects: Vec<ConfigurationObject>) -> GeoResult<Self> {
        Configuration::new(objects)
    }
}

impl From<Configuration> for Vec<ConfigurationObject> {
    fn from(configuration: Configuration) -> Self {
        configuration.objects
    }
}

impl Configuration {
    pub fn new(objects: Vec<ConfigurationObject>) -> GeoResult<Self> {
        let mut positions = FxHashMap::default();
        for (index, object) in objects.iter().enumerate() {
            if positions.insert(object.id, index).is_some() {
                return Err(GeoError::InvalidInput(format!(
                    "duplicate object id {}",
                    object.id
                )));
            }
        }
        for object in &objects {
            if let ObjectSource::Constructed { construction, args } = &object.source {
                let signature = construction.signature();
                if object.kind != signature.output {
                    return Err(GeoError::InvalidInput(format!(
                        "object {} has kind {:?} but construction {} outputs {:?}",
                        object.id,
                        object.kind,
                        construction.name(),
                        signature.output
                    )));
                }
                let expected = signature.flat_kinds();
                if args.len() != expected.len() {
                    return Err(GeoError::InvalidInput(format!(
                        "object {}: construction {} takes {} arguments, got {}",
                        object.id,
                        construction.name(),
                        expected.len(),
                        args.len()
                    )));
                }
                for (arg, kind) in args.iter().zip(expected) {
                    let parent = positions.get(arg).ok_or_else(|| {
                        GeoError::InvalidInput(format!(
                            "object {} refers to unknown object {}",
                            object.id, arg
                        ))
                    })?;
                    if *parent >= positions[&object.id] {
                        return Err(GeoError::InvalidInput(format!(
                            "object {} refers to object {} that does not precede it",
                            object.id, arg
                        )));
                    }
                    if objects[*parent].kind != kind {
                        return Err(GeoError::InvalidInput(format!(
                            "object {}: argument {} is a {:?}, expected {:?}",
                            object.id, arg, objects[*parent].kind, kind
                        )));
                    }
                }
            }
        }
        Ok(Self { objects, positions })
    }

    /// Objects in construction order.
    pub fn objects(&self) -> &[ConfigurationObject] {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&ConfigurationObject> {
        self.positions.get(&id).map(|&index| &self.objects[index])
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The loose objects, in order.
    pub fn loose_objects(&self) -> impl Iterator<Item = &ConfigurationObject> {
        self.objects.iter().filter(|object| object.is_loose())
    }

    /// The constructed objects, in order.
    pub fn constructed_objects(&self) -> impl Iterator<Item = &ConfigurationObject> {
        self.objects.iter().filter(|object| !object.is_loose())
    }

    /// A new configuration with `appended` added at the end.
    pub fn extended(&self, appended: Vec<ConfigurationObject>) -> GeoResult<Self> {
        let mut objects = self.objects.clone();
        objects.extend(appended);
        Configuration::new(objects)
    }

    /// `other` starts with exactly this configuration's objects.
    pub fn is_prefix_of(&self, other: &Configuration) -> bool {
        self.objects.len() <= other.objects.len()
            && self
                .objects
                .iter()
                .zip(other.objects.iter())
                .all(|(a, b)| a == b)
    }
}

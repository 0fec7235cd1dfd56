//! Numerical pictures of a configuration
//!
//! A picture maps every symbolic object to its analytic realization and
//! keeps a reverse value index so duplicates are surfaced on insertion.

pub mod layout;
pub mod manager;

pub use layout::{LayoutConfig, ReplayToken};
pub use manager::{ConstructionData, Pictures, PicturesConfig};

use crate::analytic::{AnalyticIndex, AnalyticObject};
use crate::config::ObjectId;
use rustc_hash::FxHashMap;

/// Outcome of adding an object to a picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Added {
    /// The value was not present before.
    New,
    /// The value equals the one already owned by the given object; the new
    /// object is recorded as its duplicate.
    DuplicateOf(ObjectId),
}

/// One numerical realization of a configuration.
///
/// The symbolic-to-analytic mapping is total for added objects; the value
/// index keeps the first owner of each analytic value canonical, and
/// duplicate relations are preserved for later inspection.
#[derive(Debug, Clone, Default)]
pub struct Picture {
    objects: FxHashMap<ObjectId, AnalyticObject>,
    order: Vec<ObjectId>,
    index: AnalyticIndex<ObjectId>,
    duplicates: FxHashMap<ObjectId, ObjectId>,
}

impl Picture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object with its analytic value. Re-adding an id is an
    /// invariant violation handled by the registrar; here the last value
    /// would win, so callers must not do it.
    pub fn add(&mut self, id: ObjectId, value: AnalyticObject) -> Added {
        let added = match self.index.get(&value) {
            Some(owner) if owner != id => {
                self.duplicates.insert(id, owner);
                Added::DuplicateOf(owner)
            }
            _ => Added::New,
        };
        self.index.insert(value, id);
        self.objects.insert(id, value);
        self.order.push(id);
        added
    }

    /// The analytic value of a symbolic object.
    pub fn get(&self, id: ObjectId) -> Option<&AnalyticObject> {
        self.objects.get(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// The canonical owner of an analytic value, up to epsilon.
    pub fn find_by_value(&self, value: &AnalyticObject) -> Option<ObjectId> {
        self.index.get(value)
    }

    /// Recorded duplicate relations, new object to canonical owner.
    pub fn duplicates(&self) -> &FxHashMap<ObjectId, ObjectId> {
        &self.duplicates
    }

    /// Objects with their values, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &AnalyticObject)> {
        self.order.iter().map(move |id| (*id, &self.objects[id]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

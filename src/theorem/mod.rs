//! Theorems and theorem containers
//!
//! A theorem is a tagged tuple of theorem objects. Lines and circles are
//! rendered at definition level: by their backing configuration object when
//! they have one, or by two (three) of their incident points. Symmetric
//! tuples are normalized by sorting, so structurally equal theorems compare
//! and hash equal.

use crate::config::{ObjectId, ObjectKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The kinds of discovered theorems, in canonical emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TheoremType {
    /// A point lies on an explicit line or circle.
    Incidence,
    /// Two lines never meet.
    ParallelLines,
    /// Two lines meet at a right angle.
    PerpendicularLines,
    /// Two segments have equal length.
    EqualLineSegments,
    /// Two circles touch in one point.
    TangentCircles,
    /// A line touches a circle in one point.
    TangentLines,
    /// Three points lie on one line.
    Collinear,
    /// Three lines or circles share a point that is not in the picture.
    ConcurrentObjects,
    /// Four points lie on one circle.
    ConcyclicPoints,
    /// A constructed object coincides with an earlier one.
    SameObjects,
}

/// A line as it appears inside a theorem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LineDefinition {
    /// An explicit configuration line.
    Object(ObjectId),
    /// The line through two points, unordered.
    Points(ObjectId, ObjectId),
}

/// A circle as it appears inside a theorem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CircleDefinition {
    /// An explicit configuration circle.
    Object(ObjectId),
    /// The circle through three points, unordered.
    Points(ObjectId, ObjectId, ObjectId),
}

/// One object involved in a theorem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TheoremObject {
    Point(ObjectId),
    Line(LineDefinition),
    Circle(CircleDefinition),
    /// A segment between two points, unordered.
    Segment(ObjectId, ObjectId),
}

impl TheoremObject {
    /// A line through two points, normalized.
    pub fn line_through(a: ObjectId, b: ObjectId) -> Self {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        TheoremObject::Line(LineDefinition::Points(a, b))
    }

    /// A circle through three points, normalized.
    pub fn circle_through(a: ObjectId, b: ObjectId, c: ObjectId) -> Self {
        let mut points = [a, b, c];
        points.sort();
        TheoremObject::Circle(CircleDefinition::Points(points[0], points[1], points[2]))
    }

    /// A segment between two points, normalized.
    pub fn segment(a: ObjectId, b: ObjectId) -> Self {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        TheoremObject::Segment(a, b)
    }

    /// An explicit object rendered by its kind.
    pub fn named(id: ObjectId, kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Point => TheoremObject::Point(id),
            ObjectKind::Line => TheoremObject::Line(LineDefinition::Object(id)),
            ObjectKind::Circle => TheoremObject::Circle(CircleDefinition::Object(id)),
        }
    }

    /// The configuration objects this theorem object refers to.
    pub fn referenced(&self, out: &mut Vec<ObjectId>) {
        match self {
            TheoremObject::Point(id) => out.push(*id),
            TheoremObject::Line(LineDefinition::Object(id))
            | TheoremObject::Circle(CircleDefinition::Object(id)) => out.push(*id),
            TheoremObject::Line(LineDefinition::Points(a, b))
            | TheoremObject::Segment(a, b) => out.extend([*a, *b]),
            TheoremObject::Circle(CircleDefinition::Points(a, b, c)) => out.extend([*a, *b, *c]),
        }
    }
}

/// A discovered theorem in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Theorem {
    theorem_type: TheoremType,
    objects: Vec<TheoremObject>,
}

impl Theorem {
    /// Build a theorem, normalizing the object tuple. All theorem types of
    /// this crate are symmetric in their objects, so sorting is canonical.
    pub fn new(theorem_type: TheoremType, mut objects: Vec<TheoremObject>) -> Self {
        objects.sort();
        Self {
            theorem_type,
            objects,
        }
    }

    pub fn theorem_type(&self) -> TheoremType {
        self.theorem_type
    }

    pub fn objects(&self) -> &[TheoremObject] {
        &self.objects
    }

    /// All configuration objects referenced by the theorem.
    pub fn referenced_objects(&self) -> Vec<ObjectId> {
        let mut out = Vec::new();
        for object in &self.objects {
            object.referenced(&mut out);
        }
        out
    }

    /// The theorem refers to at least one of the given objects.
    pub fn references_any(&self, ids: &rustc_hash::FxHashSet<ObjectId>) -> bool {
        let mut out = Vec::new();
        for object in &self.objects {
            object.referenced(&mut out);
        }
        out.iter().any(|id| ids.contains(id))
    }
}

/// Theorems indexed by type, deduplicated, in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoremMap {
    theorems: BTreeMap<TheoremType, BTreeSet<Theorem>>,
}

impl TheoremMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a theorem; false if it was already present.
    pub fn insert(&mut self, theorem: Theorem) -> bool {
        self.theorems
            .entry(theorem.theorem_type())
            .or_default()
            .insert(theorem)
    }

    pub fn contains(&self, theorem: &Theorem) -> bool {
        self.theorems
            .get(&theorem.theorem_type())
            .map(|set| set.contains(theorem))
            .unwrap_or(false)
    }

    /// Theorems of one type, in canonical order.
    pub fn of_type(&self, theorem_type: TheoremType) -> impl Iterator<Item = &Theorem> {
        self.theorems.get(&theorem_type).into_iter().flatten()
    }

    pub fn count_of_type(&self, theorem_type: TheoremType) -> usize {
        self.theorems
            .get(&theorem_type)
            .map(|set| set.len())
            .unwrap_or(0)
    }

    /// All theorems, ordered by type then by object tuple.
    pub fn iter(&self) -> impl Iterator<Item = &Theorem> {
        self.theorems.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.theorems.values().map(|set| set.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.theorems.values().all(|set| set.is_empty())
    }

    /// The theorems of `self` that are not in `known`.
    pub fn difference(&self, known: &TheoremMap) -> TheoremMap {
        let mut out = TheoremMap::new();
        for theorem in self.iter() {
            if !known.contains(theorem) {
                out.insert(theorem.clone());
            }
        }
        out
    }

    /// Absorb every theorem of `other`.
    pub fn merge(&mut self, other: &TheoremMap) {
        for theorem in other.iter() {
            self.insert(theorem.clone());
        }
    }
}

impl FromIterator<Theorem> for TheoremMap {
    fn from_iter<I: IntoIterator<Item = Theorem>>(iter: I) -> Self {
        let mut map = TheoremMap::new();
        for theorem in iter {
            map.insert(theorem);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> ObjectId {
        ObjectId(n)
    }

    #[test]
    fn test_symmetric_normalization() {
        let first = Theorem::new(
            TheoremType::ParallelLines,
            vec![
                TheoremObject::line_through(id(3), id(1)),
                TheoremObject::line_through(id(0), id(2)),
            ],
        );
        let second = Theorem::new(
            TheoremType::ParallelLines,
            vec![
                TheoremObject::line_through(id(2), id(0)),
                TheoremObject::line_through(id(1), id(3)),
            ],
        );

        assert_eq!(first, second);
    }

    #[test]
    fn test_segment_pair_normalization() {
        let first = Theorem::new(
            TheoremType::EqualLineSegments,
            vec![TheoremObject::segment(id(5), id(1)), TheoremObject::segment(id(2), id(0))],
        );
        let second = Theorem::new(
            TheoremType::EqualLineSegments,
            vec![TheoremObject::segment(id(0), id(2)), TheoremObject::segment(id(1), id(5))],
        );

        assert_eq!(first, second);
    }

    #[test]
    fn test_named_and_point_definitions_differ() {
        let named = Theorem::new(
            TheoremType::Incidence,
            vec![
                TheoremObject::Point(id(0)),
                TheoremObject::named(id(6), ObjectKind::Line),
            ],
        );
        let by_points = Theorem::new(
            TheoremType::Incidence,
            vec![
                TheoremObject::Point(id(0)),
                TheoremObject::line_through(id(1), id(2)),
            ],
        );

        assert_ne!(named, by_points);
    }

    #[test]
    fn test_referenced_objects() {
        let theorem = Theorem::new(
            TheoremType::TangentCircles,
            vec![
                TheoremObject::circle_through(id(0), id(3), id(4)),
                TheoremObject::named(id(6), ObjectKind::Circle),
            ],
        );

        let mut referenced = theorem.referenced_objects();
        referenced.sort();
        assert_eq!(referenced, vec![id(0), id(3), id(4), id(6)]);

        let mut new = rustc_hash::FxHashSet::default();
        new.insert(id(6));
        assert!(theorem.references_any(&new));
        new.clear();
        new.insert(id(1));
        assert!(!theorem.references_any(&new));
    }

    #[test]
    fn test_map_dedup_and_difference() {
        let parallel = Theorem::new(
            TheoremType::ParallelLines,
            vec![
                TheoremObject::line_through(id(0), id(1)),
                TheoremObject::line_through(id(2), id(3)),
            ],
        );
        let collinear = Theorem::new(
            TheoremType::Collinear,
            vec![
                TheoremObject::Point(id(0)),
                TheoremObject::Point(id(1)),
                TheoremObject::Point(id(2)),
            ],
        );

        let mut map = TheoremMap::new();
        assert!(map.insert(parallel.clone()));
        assert!(!map.insert(parallel.clone()));
        map.insert(collinear.clone());
        assert_eq!(map.len(), 2);

        let known: TheoremMap = [parallel].into_iter().collect();
        let fresh = map.difference(&known);
        assert_eq!(fresh.len(), 1);
        assert!(fresh.contains(&collinear));
    }

    #[test]
    fn test_canonical_iteration_order() {
        let mut map = TheoremMap::new();
        map.insert(Theorem::new(
            TheoremType::Collinear,
            vec![
                TheoremObject::Point(id(0)),
                TheoremObject::Point(id(1)),
                TheoremObject::Point(id(2)),
            ],
        ));
        map.insert(Theorem::new(
            TheoremType::Incidence,
            vec![
                TheoremObject::Point(id(0)),
                TheoremObject::named(id(5), ObjectKind::Line),
            ],
        ));

        let types: Vec<TheoremType> = map.iter().map(|theorem| theorem.theorem_type()).collect();
        assert_eq!(types, vec![TheoremType::Incidence, TheoremType::Collinear]);
    }
}

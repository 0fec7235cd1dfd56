//! Reverse lookup from analytic values to ids
//!
//! The fast path hashes a quantized canonical key; a lookup that misses the
//! exact bucket falls back to a near-duplicate scan with the tolerance-aware
//! equality, so values straddling a quantization boundary are still found.

use super::objects::AnalyticObject;
use crate::config::ObjectKind;
use rustc_hash::FxHashMap;

/// Quantization step of the hash key. Coarser than the comparison epsilon
/// on purpose: the key only accelerates, the scan decides.
const KEY_QUANTUM: f64 = 1e-6;

fn quantize(x: f64) -> i64 {
    (x / KEY_QUANTUM).round() as i64
}

/// Exact-hash key of a canonicalized analytic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum AnalyticKey {
    Point(i64, i64),
    Line(i64, i64, i64),
    Circle(i64, i64, i64),
}

impl AnalyticKey {
    fn of(value: &AnalyticObject) -> Self {
        match value {
            AnalyticObject::Point(p) => AnalyticKey::Point(quantize(p.x), quantize(p.y)),
            AnalyticObject::Line(l) => {
                let (a, b, c) = l.coefficients();
                AnalyticKey::Line(quantize(a), quantize(b), quantize(c))
            }
            AnalyticObject::Circle(c) => AnalyticKey::Circle(
                quantize(c.center.x),
                quantize(c.center.y),
                quantize(c.radius),
            ),
        }
    }
}

/// Value-to-id index over analytic objects.
///
/// The first id inserted for a value stays its canonical owner; inserting
/// an equal value under another id does not replace it.
#[derive(Debug, Clone)]
pub struct AnalyticIndex<Id> {
    entries: Vec<(AnalyticObject, Id)>,
    buckets: FxHashMap<AnalyticKey, usize>,
}

impl<Id: Copy> Default for AnalyticIndex<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Copy> AnalyticIndex<Id> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            buckets: FxHashMap::default(),
        }
    }

    /// Register a value under an id. The caller is expected to have checked
    /// `get` first; an equal value keeps its original owner.
    pub fn insert(&mut self, value: AnalyticObject, id: Id) {
        let key = AnalyticKey::of(&value);
        let slot = self.entries.len();
        self.entries.push((value, id));
        self.buckets.entry(key).or_insert(slot);
    }

    /// Find the id owning a value equal to `value` up to epsilon.
    pub fn get(&self, value: &AnalyticObject) -> Option<Id> {
        if let Some(&slot) = self.buckets.get(&AnalyticKey::of(value)) {
            let (stored, id) = &self.entries[slot];
            if stored.approx_eq(value) {
                return Some(*id);
            }
        }
        // Near-duplicate path: the quantized key can miss equal values
        // landing in a neighboring bucket.
        self.scan(value)
    }

    fn scan(&self, value: &AnalyticObject) -> Option<Id> {
        let kind = value.kind();
        self.entries
            .iter()
            .find(|(stored, _)| stored.kind() == kind && stored.approx_eq(value))
            .map(|(_, id)| *id)
    }

    /// All registered values of one kind, in insertion order.
    pub fn of_kind(&self, kind: ObjectKind) -> impl Iterator<Item = (&AnalyticObject, Id)> {
        self.entries
            .iter()
            .filter(move |(value, _)| value.kind() == kind)
            .map(|(value, id)| (value, *id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Potential-theorem producers and the verifier runner
//!
//! One producer per theorem family, each enumerating candidates from the
//! contextual picture. A candidate carries its definition-level renderings
//! and a per-picture verification predicate; the runner accepts it only if
//! the predicate holds in every picture.

pub mod collinearity;
pub mod concurrency;
pub mod concyclic;
pub mod equal_segments;
pub mod incidence;
pub mod parallel;
pub mod perpendicular;
pub mod tangency;

pub use collinearity::CollinearProducer;
pub use concurrency::ConcurrentObjectsProducer;
pub use concyclic::ConcyclicPointsProducer;
pub use equal_segments::EqualSegmentsProducer;
pub use incidence::IncidenceProducer;
pub use parallel::ParallelLinesProducer;
pub use perpendicular::PerpendicularLinesProducer;
pub use tangency::{TangentCirclesProducer, TangentLinesProducer};

use crate::config::{ObjectId, ObjectKind};
use crate::contextual::{ContextualPicture, HandleId, ObjectFilter};
use crate::theorem::{Theorem, TheoremMap, TheoremObject};
use tracing::trace;

/// Per-picture verification predicate of a candidate.
pub type VerifyFn = Box<dyn Fn(&ContextualPicture, usize) -> bool + Send + Sync>;

/// A candidate theorem produced during discovery.
pub struct PotentialTheorem {
    /// Definition-level renderings of the candidate; all of them are
    /// emitted when the candidate verifies.
    pub theorems: Vec<Theorem>,
    /// `None` marks a reported fact that needs no numeric check.
    pub verify: Option<VerifyFn>,
}

/// A producer of candidates for one theorem family.
pub trait TheoremProducer: Send + Sync {
    /// Unique identifier for this producer.
    fn id(&self) -> &'static str;

    /// Enumerate candidates over the contextual picture.
    fn produce(&self, contextual: &ContextualPicture) -> Vec<PotentialTheorem>;
}

/// All producers, in canonical order.
pub fn all_producers() -> Vec<Box<dyn TheoremProducer>> {
    vec![
        Box::new(IncidenceProducer),
        Box::new(ParallelLinesProducer),
        Box::new(PerpendicularLinesProducer),
        Box::new(EqualSegmentsProducer),
        Box::new(TangentCirclesProducer),
        Box::new(TangentLinesProducer),
        Box::new(CollinearProducer),
        Box::new(ConcurrentObjectsProducer),
        Box::new(ConcyclicPointsProducer),
    ]
}

/// The theorem-finder contract: run every producer and keep the candidates
/// that verify in every picture.
#[derive(Debug, Clone, Copy, Default)]
pub struct TheoremFinder;

impl TheoremFinder {
    pub fn new() -> Self {
        Self
    }

    /// All theorems of the configuration.
    pub fn find_all(&self, contextual: &ContextualPicture) -> TheoremMap {
        self.run(contextual, None)
    }

    /// Theorems that involve an object of the last extension step and are
    /// not already known.
    pub fn find_new(&self, contextual: &ContextualPicture, known: &TheoremMap) -> TheoremMap {
        self.run(contextual, Some(known))
    }

    fn run(&self, contextual: &ContextualPicture, known: Option<&TheoremMap>) -> TheoremMap {
        let mut accepted = TheoremMap::new();
        for producer in all_producers() {
            let candidates = producer.produce(contextual);
            trace!(producer = producer.id(), candidates = candidates.len(), "verifying");
            for candidate in candidates {
                let holds = match &candidate.verify {
                    None => true,
                    Some(verify) => {
                        (0..contextual.picture_count()).all(|picture| verify(contextual, picture))
                    }
                };
                if !holds {
                    continue;
                }
                for theorem in candidate.theorems {
                    if let Some(known) = known {
                        if !theorem.references_any(contextual.new_objects())
                            || known.contains(&theorem)
                        {
                            continue;
                        }
                    }
                    accepted.insert(theorem);
                }
            }
        }
        accepted
    }
}

/// The backing configuration object of a point handle.
pub(crate) fn point_object(contextual: &ContextualPicture, handle: HandleId) -> Option<ObjectId> {
    contextual.get(handle).and_then(|data| data.configuration_object())
}

/// Sorted configuration objects of a carrier's incident points.
pub(crate) fn member_objects(contextual: &ContextualPicture, carrier: HandleId) -> Vec<ObjectId> {
    let mut members: Vec<ObjectId> = contextual
        .get(carrier)
        .map(|data| {
            data.points()
                .iter()
                .filter_map(|point| point_object(contextual, *point))
                .collect()
        })
        .unwrap_or_default();
    members.sort();
    members
}

/// Definition-level renderings of a line handle: its backing object, if
/// any, and every unordered pair of its incident points.
pub(crate) fn line_definitions(
    contextual: &ContextualPicture,
    line: HandleId,
) -> Vec<TheoremObject> {
    let mut definitions = Vec::new();
    if let Some(object) = contextual.get(line).and_then(|data| data.configuration_object()) {
        definitions.push(TheoremObject::named(object, ObjectKind::Line));
    }
    let members = member_objects(contextual, line);
    for (index, first) in members.iter().enumerate() {
        for second in members.iter().skip(index + 1) {
            definitions.push(TheoremObject::line_through(*first, *second));
        }
    }
    definitions
}

/// Definition-level renderings of a circle handle: its backing object, if
/// any, and every unordered triple of its incident points.
pub(crate) fn circle_definitions(
    contextual: &ContextualPicture,
    circle: HandleId,
) -> Vec<TheoremObject> {
    let mut definitions = Vec::new();
    if let Some(object) = contextual.get(circle).and_then(|data| data.configuration_object()) {
        definitions.push(TheoremObject::named(object, ObjectKind::Circle));
    }
    let members = member_objects(contextual, circle);
    for i in 0..members.len() {
        for j in i + 1..members.len() {
            for k in j + 1..members.len() {
                definitions.push(TheoremObject::circle_through(members[i], members[j], members[k]));
            }
        }
    }
    definitions
}

/// Renderings of a line or circle handle, by its kind.
pub(crate) fn carrier_definitions(
    contextual: &ContextualPicture,
    carrier: HandleId,
) -> Vec<TheoremObject> {
    match contextual.get(carrier).map(|data| data.kind()) {
        Some(ObjectKind::Line) => line_definitions(contextual, carrier),
        Some(ObjectKind::Circle) => circle_definitions(contextual, carrier),
        _ => Vec::new(),
    }
}

/// Handles of both carrier kinds, in insertion order.
pub(crate) fn carriers(contextual: &ContextualPicture) -> Vec<HandleId> {
    contextual
        .lines(ObjectFilter::All)
        .chain(contextual.circles(ObjectFilter::All))
        .collect()
}

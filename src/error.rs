//! Error taxonomy of the reasoning core
//!
//! All recoverable conditions are in-band result variants; nothing in this
//! crate unwinds across a module boundary.

use crate::config::ObjectId;
use thiserror::Error;

/// Errors raised by the reasoning core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeoError {
    /// Too many random draws of the free objects failed to realize the
    /// configuration in every picture.
    #[error("pictures could not be constructed after {attempts} attempts")]
    InconstructiblePictures { attempts: usize },

    /// The pictures disagree on a predicate that should be geometrically
    /// invariant (constructibility, analytic equality, collinearity or
    /// incidence). The configuration is expected to be discarded.
    #[error("pictures are inconsistent: {0}")]
    InconsistentPictures(String),

    /// Ill-formed configuration: duplicate or unknown ids, arguments that
    /// do not precede their object, or a signature mismatch.
    #[error("invalid configuration input: {0}")]
    InvalidInput(String),

    /// A condition that the data-model invariants rule out, e.g. asking the
    /// registrar to re-add an object. Fatal for the current call.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

impl GeoError {
    /// Shorthand for an inconsistency raised while handling `object`.
    pub(crate) fn inconsistent(object: ObjectId, detail: &str) -> Self {
        GeoError::InconsistentPictures(format!("object {}: {}", object.0, detail))
    }
}

/// Result type used throughout the crate
pub type GeoResult<T> = Result<T, GeoError>;

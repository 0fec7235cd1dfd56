//! Symbolic configuration model
//!
//! Configuration objects are identified by stable integer ids; constructed
//! objects name a construction and the ordered ids of their parents.

pub mod constructions;
pub mod objects;

pub use constructions::{
    ComposedConstruction, ComposedStep, Construction, Parameter, PredefinedConstruction, Signature,
};
pub use objects::{Configuration, ConfigurationObject, ObjectId, ObjectKind, ObjectSource};

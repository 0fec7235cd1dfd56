//! GeoGen core
//!
//! Geometric reasoning over symbolic planar configurations: realize each
//! configuration in several independently randomized pictures, keep the
//! pictures consistent, index every implicit line and circle, and accept a
//! theorem only when it verifies in every picture.

pub mod analytic; // Tolerance-aware points, lines, circles
pub mod analyzer; // Gradual analysis of extended configurations
pub mod config; // Symbolic objects and constructions
pub mod constructor; // Analytic constructors and the registrar
pub mod contextual; // Incidence index over all pictures
pub mod error; // Error taxonomy
pub mod finder; // Theorem producers and the verifier runner
pub mod picture; // Numerical pictures and their manager
pub mod theorem; // Theorem model and containers

pub use analytic::{AnalyticObject, Circle, Line, Point, EPSILON};
pub use analyzer::{AnalyzerOutput, GradualAnalyzer};
pub use config::{
    ComposedConstruction, Configuration, ConfigurationObject, Construction, ObjectId, ObjectKind,
    PredefinedConstruction,
};
pub use constructor::GeometryConstructor;
pub use contextual::{ContextualPicture, GeometricObject, HandleId, ObjectFilter};
pub use error::{GeoError, GeoResult};
pub use finder::{all_producers, TheoremFinder, TheoremProducer};
pub use picture::{ConstructionData, Picture, Pictures, PicturesConfig};
pub use theorem::{Theorem, TheoremMap, TheoremObject, TheoremType};

//! Constructions: named operators with typed signatures
//!
//! A signature is an ordered list of parameters, each either a single object
//! of a kind or a set of parameters (sets express argument symmetry, e.g.
//! the two points defining a midpoint). Arguments are passed flattened.

use super::objects::ObjectKind;
use crate::error::{GeoError, GeoResult};
use serde::{Deserialize, Serialize};

/// One parameter of a construction signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Parameter {
    /// A single object of the given kind.
    Object(ObjectKind),
    /// An unordered set of `count` copies of the inner parameter.
    Set { inner: Box<Parameter>, count: usize },
}

impl Parameter {
    /// A set of `count` objects of one kind.
    pub fn set_of(kind: ObjectKind, count: usize) -> Self {
        Parameter::Set {
            inner: Box::new(Parameter::Object(kind)),
            count,
        }
    }

    fn flatten_into(&self, out: &mut Vec<ObjectKind>) {
        match self {
            Parameter::Object(kind) => out.push(*kind),
            Parameter::Set { inner, count } => {
                for _ in 0..*count {
                    inner.flatten_into(out);
                }
            }
        }
    }
}

/// A construction's parameter list and output kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub parameters: Vec<Parameter>,
    pub output: ObjectKind,
}

impl Signature {
    /// The kinds of the flattened argument list, in order.
    pub fn flat_kinds(&self) -> Vec<ObjectKind> {
        let mut kinds = Vec::new();
        for parameter in &self.parameters {
            parameter.flatten_into(&mut kinds);
        }
        kinds
    }

    /// Number of flattened arguments.
    pub fn arity(&self) -> usize {
        self.flat_kinds().len()
    }
}

/// The predefined construction operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredefinedConstruction {
    /// The line through two points.
    LineFromPoints,
    /// The midpoint of two points.
    Midpoint,
    /// The center of the circle through three points.
    Circumcenter,
    /// The circle through three points.
    Circumcircle,
    /// The orthocenter of a triangle.
    Orthocenter,
    /// The reflection of the first point over the second.
    PointReflection,
    /// The internal bisector of the angle at the first point.
    InternalAngleBisector,
    /// The line through the first point perpendicular to the line of the
    /// other two.
    PerpendicularLineFromPoints,
    /// The intersection of the lines given by two point pairs.
    IntersectionOfLinesFromPoints,
}

impl PredefinedConstruction {
    pub fn name(&self) -> &'static str {
        match self {
            PredefinedConstruction::LineFromPoints => "line_from_points",
            PredefinedConstruction::Midpoint => "midpoint",
            PredefinedConstruction::Circumcenter => "circumcenter",
            PredefinedConstruction::Circumcircle => "circumcircle",
            PredefinedConstruction::Orthocenter => "orthocenter",
            PredefinedConstruction::PointReflection => "point_reflection",
            PredefinedConstruction::InternalAngleBisector => "internal_angle_bisector",
            PredefinedConstruction::PerpendicularLineFromPoints => "perpendicular_line_from_points",
            PredefinedConstruction::IntersectionOfLinesFromPoints => {
                "intersection_of_lines_from_points"
            }
        }
    }

    pub fn signature(&self) -> Signature {
        use ObjectKind::*;
        let (parameters, output) = match self {
            PredefinedConstruction::LineFromPoints => (vec![Parameter::set_of(Point, 2)], Line),
            PredefinedConstruction::Midpoint => (vec![Parameter::set_of(Point, 2)], Point),
            PredefinedConstruction::Circumcenter => (vec![Parameter::set_of(Point, 3)], Point),
            PredefinedConstruction::Circumcircle => (vec![Parameter::set_of(Point, 3)], Circle),
            PredefinedConstruction::Orthocenter => (vec![Parameter::set_of(Point, 3)], Point),
            PredefinedConstruction::PointReflection => (
                vec![Parameter::Object(Point), Parameter::Object(Point)],
                Point,
            ),
            PredefinedConstruction::InternalAngleBisector => (
                vec![Parameter::Object(Point), Parameter::set_of(Point, 2)],
                Line,
            ),
            PredefinedConstruction::PerpendicularLineFromPoints => (
                vec![Parameter::Object(Point), Parameter::set_of(Point, 2)],
                Line,
            ),
            PredefinedConstruction::IntersectionOfLinesFromPoints => (
                vec![Parameter::Set {
                    inner: Box::new(Parameter::set_of(Point, 2)),
                    count: 2,
                }],
                Point,
            ),
        };
        Signature { parameters, output }
    }
}

/// One step of a composed construction. Argument indices refer to value
/// slots: `0..arity` are the composed construction's own flattened inputs,
/// followed by the outputs of earlier steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedStep {
    pub construction: PredefinedConstruction,
    pub args: Vec<usize>,
}

/// A construction defined as a sequence of primitive steps.
///
/// The output of the last step is the composed construction's output; the
/// intermediate values never become configuration objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedConstruction {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub steps: Vec<ComposedStep>,
}

impl ComposedConstruction {
    /// Validate slot references and step arities.
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        steps: Vec<ComposedStep>,
    ) -> GeoResult<Self> {
        let name = name.into();
        if steps.is_empty() {
            return Err(GeoError::InvalidInput(format!(
                "composed construction {name} has no steps"
            )));
        }
        let mut slot_kinds = Vec::new();
        for parameter in &parameters {
            parameter.flatten_into(&mut slot_kinds);
        }
        for (index, step) in steps.iter().enumerate() {
            let step_signature = step.construction.signature();
            let expected = step_signature.flat_kinds();
            if step.args.len() != expected.len() {
                return Err(GeoError::InvalidInput(format!(
                    "composed construction {name}, step {index}: arity mismatch"
                )));
            }
            for (slot, kind) in step.args.iter().zip(expected) {
                match slot_kinds.get(*slot) {
                    Some(actual) if *actual == kind => {}
                    Some(actual) => {
                        return Err(GeoError::InvalidInput(format!(
                            "composed construction {name}, step {index}: slot {slot} is {actual:?}, expected {kind:?}"
                        )))
                    }
                    None => {
                        return Err(GeoError::InvalidInput(format!(
                            "composed construction {name}, step {index}: slot {slot} out of range"
                        )))
                    }
                }
            }
            slot_kinds.push(step_signature.output);
        }
        Ok(Self {
            name,
            parameters,
            steps,
        })
    }

    /// Output kind: the last step's output.
    pub fn output(&self) -> ObjectKind {
        self.steps
            .last()
            .map(|step| step.construction.signature().output)
            .unwrap_or(ObjectKind::Point)
    }

    pub fn signature(&self) -> Signature {
        Signature {
            parameters: self.parameters.clone(),
            output: self.output(),
        }
    }
}

/// A predefined or composed construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Construction {
    Predefined(PredefinedConstruction),
    Composed(Box<ComposedConstruction>),
}

impl Construction {
    pub fn name(&self) -> &str {
        match self {
            Construction::Predefined(predefined) => predefined.name(),
            Construction::Composed(composed) => &composed.name,
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            Construction::Predefined(predefined) => predefined.signature(),
            Construction::Composed(composed) => composed.signature(),
        }
    }
}

impl From<PredefinedConstruction> for Construction {
    fn from(predefined: PredefinedConstruction) -> Self {
        Construction::Predefined(predefined)
    }
}

impl From<ComposedConstruction> for Construction {
    fn from(composed: ComposedConstruction) -> Self {
        Construction::Composed(Box::new(composed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_kinds() {
        let signature = PredefinedConstruction::IntersectionOfLinesFromPoints.signature();
        assert_eq!(signature.arity(), 4);
        assert!(signature.flat_kinds().iter().all(|kind| *kind == ObjectKind::Point));
        assert_eq!(signature.output, ObjectKind::Point);
    }

    #[test]
    fn test_ordered_and_set_parameters() {
        let reflection = PredefinedConstruction::PointReflection.signature();
        assert_eq!(reflection.parameters.len(), 2);

        let midpoint = PredefinedConstruction::Midpoint.signature();
        assert_eq!(midpoint.parameters.len(), 1);
        assert_eq!(midpoint.arity(), 2);
    }

    #[test]
    fn test_composed_validation() {
        // Fourth parallelogram vertex: reflect A over the midpoint of B, C.
        let composed = ComposedConstruction::new(
            "parallelogram_point",
            vec![
                Parameter::Object(ObjectKind::Point),
                Parameter::set_of(ObjectKind::Point, 2),
            ],
            vec![
                ComposedStep {
                    construction: PredefinedConstruction::Midpoint,
                    args: vec![1, 2],
                },
                ComposedStep {
                    construction: PredefinedConstruction::PointReflection,
                    args: vec![0, 3],
                },
            ],
        )
        .unwrap();

        assert_eq!(composed.output(), ObjectKind::Point);
        assert_eq!(composed.signature().arity(), 3);
    }

    #[test]
    fn test_composed_bad_slot_rejected() {
        let result = ComposedConstruction::new(
            "broken",
            vec![Parameter::set_of(ObjectKind::Point, 2)],
            vec![ComposedStep {
                construction: PredefinedConstruction::Midpoint,
                args: vec![0, 5],
            }],
        );
        assert!(result.is_err());
    }
}

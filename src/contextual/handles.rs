//! Geometric handles of the contextual picture
//!
//! Handles live in an id arena owned by the contextual picture; membership
//! sets store ids, not references, keeping the point-carrier cycle flat and
//! handle equality id-equality.

use crate::config::{ObjectId, ObjectKind};
use rustc_hash::FxHashSet;

/// Internal identifier of a geometric handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub u32);

/// A point handle with the carriers it lies on.
#[derive(Debug, Clone, Default)]
pub struct PointObject {
    /// The backing configuration object; points are always explicit.
    pub object: Option<ObjectId>,
    /// Lines through this point.
    pub lines: FxHashSet<HandleId>,
    /// Circles through this point.
    pub circles: FxHashSet<HandleId>,
}

/// A line or circle handle with its incident points.
#[derive(Debug, Clone, Default)]
pub struct CarrierObject {
    /// The backing configuration object; absent for implicit carriers.
    pub object: Option<ObjectId>,
    /// Points on this carrier, agreed by every picture.
    pub points: FxHashSet<HandleId>,
}

/// A handle of the contextual picture.
#[derive(Debug, Clone)]
pub enum GeometricObject {
    Point(PointObject),
    Line(CarrierObject),
    Circle(CarrierObject),
}

impl GeometricObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            GeometricObject::Point(_) => ObjectKind::Point,
            GeometricObject::Line(_) => ObjectKind::Line,
            GeometricObject::Circle(_) => ObjectKind::Circle,
        }
    }

    /// The backing configuration object, if this handle has been named.
    pub fn configuration_object(&self) -> Option<ObjectId> {
        match self {
            GeometricObject::Point(point) => point.object,
            GeometricObject::Line(carrier) | GeometricObject::Circle(carrier) => carrier.object,
        }
    }

    pub(crate) fn set_configuration_object(&mut self, id: ObjectId) {
        match self {
            GeometricObject::Point(point) => point.object = Some(id),
            GeometricObject::Line(carrier) | GeometricObject::Circle(carrier) => {
                carrier.object = Some(id)
            }
        }
    }

    /// Incident points of a carrier; empty for a point handle.
    pub fn points(&self) -> &FxHashSet<HandleId> {
        static EMPTY: std::sync::OnceLock<FxHashSet<HandleId>> = std::sync::OnceLock::new();
        match self {
            GeometricObject::Point(_) => EMPTY.get_or_init(FxHashSet::default),
            GeometricObject::Line(carrier) | GeometricObject::Circle(carrier) => &carrier.points,
        }
    }

    pub fn as_point(&self) -> Option<&PointObject> {
        match self {
            GeometricObject::Point(point) => Some(point),
            _ => None,
        }
    }

    pub fn as_carrier(&self) -> Option<&CarrierObject> {
        match self {
            GeometricObject::Line(carrier) | GeometricObject::Circle(carrier) => Some(carrier),
            _ => None,
        }
    }

    pub(crate) fn as_point_mut(&mut self) -> Option<&mut PointObject> {
        match self {
            GeometricObject::Point(point) => Some(point),
            _ => None,
        }
    }

    pub(crate) fn as_carrier_mut(&mut self) -> Option<&mut CarrierObject> {
        match self {
            GeometricObject::Line(carrier) | GeometricObject::Circle(carrier) => Some(carrier),
            _ => None,
        }
    }
}

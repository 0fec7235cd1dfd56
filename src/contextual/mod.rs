//! The contextual picture: an incidence index over all pictures
//!
//! Tracks every point, line and circle of a configuration as an id-based
//! handle, including the *implicit* lines through two known points and
//! circles through three non-collinear known points. Membership edges are
//! added only when every picture agrees; any disagreement rejects the
//! configuration as inconsistent.

pub mod handles;

pub use handles::{CarrierObject, GeometricObject, HandleId, PointObject};

use crate::analytic::{are_collinear, AnalyticIndex, AnalyticObject, Circle, Line, Point};
use crate::config::{ConfigurationObject, ObjectId, ObjectKind};
use crate::error::{GeoError, GeoResult};
use crate::picture::Pictures;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

/// Which handles a query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFilter {
    All,
    /// Handles created or first named during the last extension step.
    New,
    Old,
}

/// Per-picture bidirectional map between handles and analytic values.
#[derive(Debug, Clone, Default)]
struct HandleMap {
    analytic: FxHashMap<HandleId, AnalyticObject>,
    index: AnalyticIndex<HandleId>,
}

impl HandleMap {
    fn register(&mut self, handle: HandleId, value: AnalyticObject) {
        self.index.insert(value, handle);
        self.analytic.insert(handle, value);
    }

    fn find(&self, value: &AnalyticObject) -> Option<HandleId> {
        self.index.get(value)
    }

    fn get(&self, handle: HandleId) -> Option<&AnalyticObject> {
        self.analytic.get(&handle)
    }
}

/// The incidence index over all pictures of one configuration.
#[derive(Debug, Clone)]
pub struct ContextualPicture {
    handles: FxHashMap<HandleId, GeometricObject>,
    points: Vec<HandleId>,
    lines: Vec<HandleId>,
    circles: Vec<HandleId>,
    by_object: FxHashMap<ObjectId, HandleId>,
    maps: Vec<HandleMap>,
    next_id: u32,
    new_handles: FxHashSet<HandleId>,
    new_objects: FxHashSet<ObjectId>,
}

impl ContextualPicture {
    /// Index a fully constructed, duplicate-free configuration. The last
    /// `new_object_count` configuration objects form the extension step
    /// whose handles and theorems count as new.
    pub fn new(pictures: &Pictures, new_object_count: usize) -> GeoResult<Self> {
        let configuration = pictures.configuration();
        let mut contextual = Self {
            handles: FxHashMap::default(),
            points: Vec::new(),
            lines: Vec::new(),
            circles: Vec::new(),
            by_object: FxHashMap::default(),
            maps: (0..pictures.len()).map(|_| HandleMap::default()).collect(),
            next_id: 0,
            new_handles: FxHashSet::default(),
            new_objects: FxHashSet::default(),
        };
        let new_from = configuration.len().saturating_sub(new_object_count);
        for (position, object) in configuration.objects().iter().enumerate() {
            let mut values = Vec::with_capacity(pictures.len());
            for picture in pictures.iter() {
                let value = picture.get(object.id).ok_or_else(|| {
                    GeoError::InternalInvariantViolation(format!(
                        "object {} has no value in some picture",
                        object.id
                    ))
                })?;
                values.push(*value);
            }
            let mark_new = position >= new_from;
            if mark_new {
                contextual.new_objects.insert(object.id);
            }
            contextual.add(object, values, mark_new)?;
        }
        Ok(contextual)
    }

    /// Number of pictures behind this index.
    pub fn picture_count(&self) -> usize {
        self.maps.len()
    }

    /// Handle-exists query for a configuration object.
    pub fn contains(&self, object: ObjectId) -> bool {
        self.by_object.contains_key(&object)
    }

    pub fn handle_of(&self, object: ObjectId) -> Option<HandleId> {
        self.by_object.get(&object).copied()
    }

    pub fn get(&self, handle: HandleId) -> Option<&GeometricObject> {
        self.handles.get(&handle)
    }

    /// The analytic form of a handle in one picture.
    pub fn analytic(&self, handle: HandleId, picture: usize) -> Option<&AnalyticObject> {
        self.maps.get(picture).and_then(|map| map.get(handle))
    }

    /// Configuration objects appended in the last extension step.
    pub fn new_objects(&self) -> &FxHashSet<ObjectId> {
        &self.new_objects
    }

    /// The handle was created or first named in the last extension step.
    pub fn is_new(&self, handle: HandleId) -> bool {
        self.new_handles.contains(&handle)
    }

    pub fn points(&self, filter: ObjectFilter) -> impl Iterator<Item = HandleId> + '_ {
        self.filtered(&self.points, filter)
    }

    pub fn lines(&self, filter: ObjectFilter) -> impl Iterator<Item = HandleId> + '_ {
        self.filtered(&self.lines, filter)
    }

    pub fn circles(&self, filter: ObjectFilter) -> impl Iterator<Item = HandleId> + '_ {
        self.filtered(&self.circles, filter)
    }

    fn filtered<'a>(
        &'a self,
        handles: &'a [HandleId],
        filter: ObjectFilter,
    ) -> impl Iterator<Item = HandleId> + 'a {
        handles.iter().copied().filter(move |handle| match filter {
            ObjectFilter::All => true,
            ObjectFilter::New => self.new_handles.contains(handle),
            ObjectFilter::Old => !self.new_handles.contains(handle),
        })
    }

    /// Install one configuration object, creating or merging handles. The
    /// update is atomic: on error the index is left untouched.
    fn add(
        &mut self,
        object: &ConfigurationObject,
        values: Vec<AnalyticObject>,
        mark_new: bool,
    ) -> GeoResult<()> {
        let mut staged = self.clone();
        staged.add_staged(object, values, mark_new)?;
        *self = staged;
        Ok(())
    }

    fn add_staged(
        &mut self,
        object: &ConfigurationObject,
        values: Vec<AnalyticObject>,
        mark_new: bool,
    ) -> GeoResult<()> {
        trace!(object = object.id.0, kind = ?object.kind, "indexing object");
        // Resolve against every picture first: either all pictures already
        // know this value under one handle, or none of them does.
        let existing = self.resolve(object.id, &values)?;
        if let Some(handle) = existing {
            if object.kind == ObjectKind::Point {
                return Err(GeoError::InternalInvariantViolation(format!(
                    "point {} duplicates an indexed point",
                    object.id
                )));
            }
            // A previously implicit carrier gains its name.
            let data = self.handles.get_mut(&handle).ok_or_else(|| {
                GeoError::InternalInvariantViolation("dangling handle".into())
            })?;
            if data.configuration_object().is_some() {
                return Err(GeoError::InternalInvariantViolation(format!(
                    "object {} redefines a named handle",
                    object.id
                )));
            }
            data.set_configuration_object(object.id);
            self.by_object.insert(object.id, handle);
            if mark_new {
                self.new_handles.insert(handle);
            }
            return Ok(());
        }

        match object.kind {
            ObjectKind::Point => self.add_point(object.id, &values, mark_new),
            ObjectKind::Line | ObjectKind::Circle => {
                self.add_carrier(object.id, object.kind, &values, mark_new)
            }
        }
    }

    /// Per-picture lookup that must agree: `Some(handle)` everywhere (the
    /// same handle) or `None` everywhere.
    fn resolve(&self, object: ObjectId, values: &[AnalyticObject]) -> GeoResult<Option<HandleId>> {
        let mut agreed: Option<Option<HandleId>> = None;
        for (map, value) in self.maps.iter().zip(values) {
            let found = map.find(value);
            match agreed {
                None => agreed = Some(found),
                Some(previous) if previous == found => {}
                Some(_) => {
                    return Err(GeoError::inconsistent(
                        object,
                        "pictures disagree on analytic identity",
                    ))
                }
            }
        }
        Ok(agreed.flatten())
    }

    fn allocate(&mut self, data: GeometricObject, mark_new: bool) -> HandleId {
        let handle = HandleId(self.next_id);
        self.next_id += 1;
        match data.kind() {
            ObjectKind::Point => self.points.push(handle),
            ObjectKind::Line => self.lines.push(handle),
            ObjectKind::Circle => self.circles.push(handle),
        }
        self.handles.insert(handle, data);
        if mark_new {
            self.new_handles.insert(handle);
        }
        handle
    }

    fn register_values(&mut self, handle: HandleId, values: &[AnalyticObject]) {
        for (map, value) in self.maps.iter_mut().zip(values) {
            map.register(handle, *value);
        }
    }

    /// Symmetric membership edge between a point and a carrier.
    fn connect(&mut self, point: HandleId, carrier: HandleId) -> GeoResult<()> {
        let carrier_kind = self
            .handles
            .get(&carrier)
            .map(GeometricObject::kind)
            .ok_or_else(|| GeoError::InternalInvariantViolation("dangling carrier".into()))?;
        let point_data = self
            .handles
            .get_mut(&point)
            .and_then(GeometricObject::as_point_mut)
            .ok_or_else(|| GeoError::InternalInvariantViolation("dangling point".into()))?;
        match carrier_kind {
            ObjectKind::Line => point_data.lines.insert(carrier),
            ObjectKind::Circle => point_data.circles.insert(carrier),
            ObjectKind::Point => {
                return Err(GeoError::InternalInvariantViolation(
                    "point cannot carry a point".into(),
                ))
            }
        };
        let carrier_data = self
            .handles
            .get_mut(&carrier)
            .and_then(GeometricObject::as_carrier_mut)
            .ok_or_else(|| GeoError::InternalInvariantViolation("dangling carrier".into()))?;
        carrier_data.points.insert(point);
        Ok(())
    }

    /// Every picture agrees the point lies on the carrier; mixed answers
    /// are an inconsistency.
    fn agreed_membership(
        &self,
        object: ObjectId,
        carrier: HandleId,
        point_values: &[Point],
    ) -> GeoResult<bool> {
        let mut on_carrier = 0;
        for (map, point) in self.maps.iter().zip(point_values) {
            let value = map.get(carrier).ok_or_else(|| {
                GeoError::InternalInvariantViolation("carrier missing in picture".into())
            })?;
            if value.passes_through(point) {
                on_carrier += 1;
            }
        }
        if on_carrier == 0 || on_carrier == self.maps.len() {
            Ok(on_carrier > 0)
        } else {
            Err(GeoError::inconsistent(
                object,
                "pictures disagree on incidence",
            ))
        }
    }

    fn add_point(
        &mut self,
        object: ObjectId,
        values: &[AnalyticObject],
        mark_new: bool,
    ) -> GeoResult<()> {
        let point_values: Vec<Point> = values
            .iter()
            .map(|value| value.as_point().copied())
            .collect::<Option<_>>()
            .ok_or_else(|| {
                GeoError::InternalInvariantViolation(format!("object {object} is not a point"))
            })?;

        let handle = self.allocate(
            GeometricObject::Point(PointObject {
                object: Some(object),
                ..PointObject::default()
            }),
            mark_new,
        );
        self.by_object.insert(object, handle);
        self.register_values(handle, values);

        // Membership against every existing carrier, agreed by all pictures.
        let carriers: Vec<HandleId> = self
            .lines
            .iter()
            .chain(self.circles.iter())
            .copied()
            .collect();
        for carrier in carriers {
            if self.agreed_membership(object, carrier, &point_values)? {
                self.connect(handle, carrier)?;
            }
        }

        let others: Vec<HandleId> = self
            .points
            .iter()
            .copied()
            .filter(|other| *other != handle)
            .collect();

        // Implicit lines through the new point and every earlier point.
        for other in &others {
            self.resolve_line(object, handle, *other, &point_values, mark_new)?;
        }

        // Implicit circles through the new point and every earlier pair.
        for (index, first) in others.iter().enumerate() {
            for second in others.iter().skip(index + 1) {
                self.resolve_circle(object, handle, *first, *second, &point_values, mark_new)?;
            }
        }
        Ok(())
    }

    fn point_in_picture(&self, handle: HandleId, picture: usize) -> GeoResult<Point> {
        self.maps[picture]
            .get(handle)
            .and_then(AnalyticObject::as_point)
            .copied()
            .ok_or_else(|| {
                GeoError::InternalInvariantViolation("point handle missing in picture".into())
            })
    }

    fn resolve_line(
        &mut self,
        object: ObjectId,
        new_point: HandleId,
        other: HandleId,
        point_values: &[Point],
        mark_new: bool,
    ) -> GeoResult<()> {
        let mut line_values = Vec::with_capacity(self.maps.len());
        for (picture, point) in point_values.iter().enumerate() {
            let anchor = self.point_in_picture(other, picture)?;
            let line = Line::through(point, &anchor).ok_or_else(|| {
                GeoError::InternalInvariantViolation(
                    "distinct point handles share a position".into(),
                )
            })?;
            line_values.push(AnalyticObject::Line(line));
        }
        match self.resolve(object, &line_values)? {
            Some(line) => {
                self.connect(new_point, line)?;
                self.connect(other, line)?;
            }
            None => {
                let line = self.allocate(
                    GeometricObject::Line(CarrierObject::default()),
                    mark_new,
                );
                self.register_values(line, &line_values);
                self.connect(new_point, line)?;
                self.connect(other, line)?;
            }
        }
        Ok(())
    }

    fn resolve_circle(
        &mut self,
        object: ObjectId,
        new_point: HandleId,
        first: HandleId,
        second: HandleId,
        point_values: &[Point],
        mark_new: bool,
    ) -> GeoResult<()> {
        // Collinear triples carry no circle; the pictures must agree on that.
        let mut collinear_in = 0;
        let mut circle_values = Vec::with_capacity(self.maps.len());
        for (picture, point) in point_values.iter().enumerate() {
            let p = self.point_in_picture(first, picture)?;
            let q = self.point_in_picture(second, picture)?;
            if are_collinear(point, &p, &q) {
                collinear_in += 1;
                continue;
            }
            if let Some(circle) = Circle::through(point, &p, &q) {
                circle_values.push(AnalyticObject::Circle(circle));
            } else {
                collinear_in += 1;
            }
        }
        if collinear_in == self.maps.len() {
            return Ok(());
        }
        if collinear_in > 0 {
            return Err(GeoError::inconsistent(
                object,
                "pictures disagree on collinearity",
            ));
        }
        match self.resolve(object, &circle_values)? {
            Some(circle) => {
                self.connect(new_point, circle)?;
                self.connect(first, circle)?;
                self.connect(second, circle)?;
            }
            None => {
                let circle = self.allocate(
                    GeometricObject::Circle(CarrierObject::default()),
                    mark_new,
                );
                self.register_values(circle, &circle_values);
                self.connect(new_point, circle)?;
                self.connect(first, circle)?;
                self.connect(second, circle)?;
            }
        }
        Ok(())
    }

    fn add_carrier(
        &mut self,
        object: ObjectId,
        kind: ObjectKind,
        values: &[AnalyticObject],
        mark_new: bool,
    ) -> GeoResult<()> {
        let data = match kind {
            ObjectKind::Line => GeometricObject::Line(CarrierObject {
                object: Some(object),
                ..CarrierObject::default()
            }),
            ObjectKind::Circle => GeometricObject::Circle(CarrierObject {
                object: Some(object),
                ..CarrierObject::default()
            }),
            ObjectKind::Point => {
                return Err(GeoError::InternalInvariantViolation(
                    "point routed to carrier insertion".into(),
                ))
            }
        };
        let handle = self.allocate(data, mark_new);
        self.by_object.insert(object, handle);
        self.register_values(handle, values);

        // Membership of every existing point, agreed by all pictures.
        let points: Vec<HandleId> = self.points.clone();
        for point in points {
            let mut point_values = Vec::with_capacity(self.maps.len());
            for picture in 0..self.maps.len() {
                point_values.push(self.point_in_picture(point, picture)?);
            }
            if self.agreed_membership(object, handle, &point_values)? {
                self.connect(point, handle)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Configuration, PredefinedConstruction};
    use crate::constructor::GeometryConstructor;

    fn p(x: f64, y: f64) -> AnalyticObject {
        AnalyticObject::Point(Point::new(x, y))
    }

    /// Triangle with the midpoint of one side, fixed in two pictures.
    fn triangle_with_midpoint() -> Pictures {
        let configuration = Configuration::new(vec![
            ConfigurationObject::loose(ObjectId(0), ObjectKind::Point),
            ConfigurationObject::loose(ObjectId(1), ObjectKind::Point),
            ConfigurationObject::loose(ObjectId(2), ObjectKind::Point),
            ConfigurationObject::constructed(
                ObjectId(3),
                PredefinedConstruction::Midpoint.into(),
                vec![ObjectId(1), ObjectId(2)],
            ),
        ])
        .unwrap();
        let constructor = GeometryConstructor::default();
        let (pictures, data) = constructor
            .construct_with_loose(
                &configuration,
                &[
                    vec![p(2.0, 5.0), p(-1.0, -1.0), p(7.0, -1.0)],
                    vec![p(1.0, 6.0), p(-3.0, -2.0), p(6.0, -1.0)],
                ],
            )
            .unwrap();
        assert!(data.is_unambiguous());
        pictures
    }

    #[test]
    fn test_implicit_lines_and_circles() {
        let pictures = triangle_with_midpoint();
        let contextual = ContextualPicture::new(&pictures, 1).unwrap();

        // Four points; the midpoint merges B-C, B-M and C-M into one line:
        // 6 pairs minus 2 redundant pairs leave 4 line handles. Circles
        // exist for the 3 non-collinear triples of the 4 points.
        assert_eq!(contextual.points(ObjectFilter::All).count(), 4);
        assert_eq!(contextual.lines(ObjectFilter::All).count(), 4);
        assert_eq!(contextual.circles(ObjectFilter::All).count(), 3);
    }

    #[test]
    fn test_membership_symmetry_and_minimums() {
        let pictures = triangle_with_midpoint();
        let contextual = ContextualPicture::new(&pictures, 1).unwrap();

        for line in contextual.lines(ObjectFilter::All) {
            let carrier = contextual.get(line).unwrap().as_carrier().unwrap();
            assert!(carrier.points.len() >= 2);
            for point in &carrier.points {
                let point_data = contextual.get(*point).unwrap().as_point().unwrap();
                assert!(point_data.lines.contains(&line), "membership must be symmetric");
            }
        }
        for circle in contextual.circles(ObjectFilter::All) {
            let carrier = contextual.get(circle).unwrap().as_carrier().unwrap();
            assert!(carrier.points.len() >= 3);
            for point in &carrier.points {
                let point_data = contextual.get(*point).unwrap().as_point().unwrap();
                assert!(point_data.circles.contains(&circle));
            }
        }
    }

    #[test]
    fn test_membership_matches_analytic_incidence() {
        let pictures = triangle_with_midpoint();
        let contextual = ContextualPicture::new(&pictures, 1).unwrap();

        for line in contextual.lines(ObjectFilter::All) {
            let members = &contextual.get(line).unwrap().as_carrier().unwrap().points;
            for point in contextual.points(ObjectFilter::All) {
                let everywhere = (0..contextual.picture_count()).all(|picture| {
                    let value = contextual.analytic(line, picture).unwrap();
                    let at = contextual.analytic(point, picture).unwrap().as_point().unwrap();
                    value.passes_through(at)
                });
                assert_eq!(members.contains(&point), everywhere);
            }
        }
    }

    #[test]
    fn test_analytic_identity_unique_per_picture() {
        let pictures = triangle_with_midpoint();
        let contextual = ContextualPicture::new(&pictures, 1).unwrap();

        for picture in 0..contextual.picture_count() {
            let lines: Vec<HandleId> = contextual.lines(ObjectFilter::All).collect();
            for (index, first) in lines.iter().enumerate() {
                for second in lines.iter().skip(index + 1) {
                    let a = contextual.analytic(*first, picture).unwrap();
                    let b = contextual.analytic(*second, picture).unwrap();
                    assert!(!a.approx_eq(b), "two line handles share an analytic value");
                }
            }
        }
    }

    #[test]
    fn test_naming_an_implicit_line() {
        let pictures = triangle_with_midpoint();
        // Extend with the explicit line through B and C.
        let extended = pictures
            .configuration()
            .extended(vec![ConfigurationObject::constructed(
                ObjectId(4),
                PredefinedConstruction::LineFromPoints.into(),
                vec![ObjectId(1), ObjectId(2)],
            )])
            .unwrap();
        let constructor = GeometryConstructor::default();
        let (extended_pictures, data) = constructor
            .construct_by_cloning(&pictures, &extended)
            .unwrap();
        assert!(data.is_unambiguous());

        let contextual = ContextualPicture::new(&extended_pictures, 1).unwrap();

        // No extra line handle appears; the implicit B-C line is named.
        assert_eq!(contextual.lines(ObjectFilter::All).count(), 4);
        let named = contextual.handle_of(ObjectId(4)).unwrap();
        assert!(contextual.is_new(named));
        assert_eq!(
            contextual.get(named).unwrap().configuration_object(),
            Some(ObjectId(4))
        );
        // Its membership carries the three collinear points.
        assert_eq!(contextual.get(named).unwrap().points().len(), 3);
        // Exactly the named handle is new; everything else predates the step.
        assert_eq!(contextual.lines(ObjectFilter::New).count(), 1);
        assert_eq!(contextual.points(ObjectFilter::New).count(), 0);
    }

    #[test]
    fn test_new_handle_tracking_for_points() {
        let pictures = triangle_with_midpoint();
        let contextual = ContextualPicture::new(&pictures, 1).unwrap();

        // The midpoint is the extension step: the point itself is new, and
        // so are the implicit carriers created through it. The midpoint
        // joins the existing B-C line, so only A-M is a new line, while the
        // circles A-B-M and A-C-M are both new.
        assert_eq!(contextual.points(ObjectFilter::New).count(), 1);
        assert_eq!(contextual.lines(ObjectFilter::New).count(), 1);
        assert_eq!(contextual.circles(ObjectFilter::New).count(), 2);
        assert_eq!(contextual.points(ObjectFilter::Old).count(), 3);
    }

    #[test]
    fn test_inconsistent_incidence_rejected() {
        // A fourth loose point lies on line AB in the first picture only.
        let configuration = Configuration::new(vec![
            ConfigurationObject::loose(ObjectId(0), ObjectKind::Point),
            ConfigurationObject::loose(ObjectId(1), ObjectKind::Point),
            ConfigurationObject::loose(ObjectId(2), ObjectKind::Point),
            ConfigurationObject::loose(ObjectId(3), ObjectKind::Point),
        ])
        .unwrap();
        let constructor = GeometryConstructor::default();
        let (pictures, _) = constructor
            .construct_with_loose(
                &configuration,
                &[
                    vec![p(0.0, 0.0), p(4.0, 0.0), p(1.0, 3.0), p(2.0, 0.0)],
                    vec![p(0.0, 0.0), p(4.0, 0.0), p(1.0, 3.0), p(2.0, 1.0)],
                ],
            )
            .unwrap();

        assert!(matches!(
            ContextualPicture::new(&pictures, 1),
            Err(GeoError::InconsistentPictures(_))
        ));
    }
}

//! Object constructors and the geometry-constructor contract
//!
//! One analytic evaluator per predefined construction: realized parents in,
//! analytic output or in-band inconstructibility out. Constructors never
//! mutate state outside their returned value. Composed constructions are
//! translated to their primitive sequence in a scratch buffer; the
//! intermediate values stay invisible.

pub mod registrar;

pub use registrar::Registration;

use crate::analytic::{AnalyticObject, Circle, Line, Point};
use crate::config::{
    ComposedConstruction, Configuration, ConfigurationObject, Construction, PredefinedConstruction,
};
use crate::error::{GeoError, GeoResult};
use crate::picture::layout::{draw_loose_objects, ReplayToken};
use crate::picture::{ConstructionData, Picture, Pictures, PicturesConfig};
use tracing::{debug, trace};

/// Evaluate a construction on realized inputs. `None` means the inputs are
/// degenerate for this construction.
pub fn construct_value(
    construction: &Construction,
    inputs: &[AnalyticObject],
) -> Option<AnalyticObject> {
    match construction {
        Construction::Predefined(predefined) => construct_predefined(*predefined, inputs),
        Construction::Composed(composed) => construct_composed(composed, inputs),
    }
}

fn point_at(inputs: &[AnalyticObject], index: usize) -> Option<Point> {
    inputs.get(index).and_then(AnalyticObject::as_point).copied()
}

fn construct_predefined(
    construction: PredefinedConstruction,
    inputs: &[AnalyticObject],
) -> Option<AnalyticObject> {
    use PredefinedConstruction::*;
    match construction {
        LineFromPoints => {
            let (p, q) = (point_at(inputs, 0)?, point_at(inputs, 1)?);
            Line::through(&p, &q).map(AnalyticObject::Line)
        }
        Midpoint => {
            let (p, q) = (point_at(inputs, 0)?, point_at(inputs, 1)?);
            Some(AnalyticObject::Point(p.midpoint(&q)))
        }
        Circumcenter => {
            let (p, q, r) = (point_at(inputs, 0)?, point_at(inputs, 1)?, point_at(inputs, 2)?);
            Circle::through(&p, &q, &r).map(|circle| AnalyticObject::Point(circle.center))
        }
        Circumcircle => {
            let (p, q, r) = (point_at(inputs, 0)?, point_at(inputs, 1)?, point_at(inputs, 2)?);
            Circle::through(&p, &q, &r).map(AnalyticObject::Circle)
        }
        Orthocenter => {
            let (a, b, c) = (point_at(inputs, 0)?, point_at(inputs, 1)?, point_at(inputs, 2)?);
            let altitude_a = Line::through(&b, &c)?.perpendicular_from(&a);
            let altitude_b = Line::through(&a, &c)?.perpendicular_from(&b);
            altitude_a.intersect(&altitude_b).map(AnalyticObject::Point)
        }
        PointReflection => {
            let (p, center) = (point_at(inputs, 0)?, point_at(inputs, 1)?);
            Some(AnalyticObject::Point(p.reflected_over(&center)))
        }
        InternalAngleBisector => {
            let (a, b, c) = (point_at(inputs, 0)?, point_at(inputs, 1)?, point_at(inputs, 2)?);
            internal_angle_bisector(&a, &b, &c).map(AnalyticObject::Line)
        }
        PerpendicularLineFromPoints => {
            let (a, b, c) = (point_at(inputs, 0)?, point_at(inputs, 1)?, point_at(inputs, 2)?);
            Some(AnalyticObject::Line(
                Line::through(&b, &c)?.perpendicular_from(&a),
            ))
        }
        IntersectionOfLinesFromPoints => {
            let (a, b) = (point_at(inputs, 0)?, point_at(inputs, 1)?);
            let (c, d) = (point_at(inputs, 2)?, point_at(inputs, 3)?);
            let first = Line::through(&a, &b)?;
            let second = Line::through(&c, &d)?;
            first.intersect(&second).map(AnalyticObject::Point)
        }
    }
}

/// Bisector of the internal angle at `a` in the triangle `a b c`.
fn internal_angle_bisector(a: &Point, b: &Point, c: &Point) -> Option<Line> {
    let (db, dc) = (a.distance(b), a.distance(c));
    if db <= crate::analytic::EPSILON || dc <= crate::analytic::EPSILON {
        return None;
    }
    let dir = (
        (b.x - a.x) / db + (c.x - a.x) / dc,
        (b.y - a.y) / db + (c.y - a.y) / dc,
    );
    // A straight angle leaves no internal bisector direction.
    Line::from_coefficients(dir.1, -dir.0, dir.0 * a.y - dir.1 * a.x)
}

/// Run the primitive sequence of a composed construction over a scratch
/// slot buffer seeded with the flattened inputs.
fn construct_composed(
    composed: &ComposedConstruction,
    inputs: &[AnalyticObject],
) -> Option<AnalyticObject> {
    let mut slots: Vec<AnalyticObject> = inputs.to_vec();
    for step in &composed.steps {
        let step_inputs: Option<Vec<AnalyticObject>> = step
            .args
            .iter()
            .map(|slot| slots.get(*slot).copied())
            .collect();
        let value = construct_predefined(step.construction, &step_inputs?)?;
        slots.push(value);
    }
    slots.last().copied()
}

/// The geometry-constructor contract exposed to the configuration driver.
#[derive(Debug, Clone, Default)]
pub struct GeometryConstructor {
    config: PicturesConfig,
}

impl GeometryConstructor {
    pub fn new(config: PicturesConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PicturesConfig {
        &self.config
    }

    /// Build pictures of a configuration from scratch, drawing the loose
    /// objects at random. A draw on which the registrar reports an
    /// inconsistency is thrown away and redrawn; exhausting the budget
    /// yields `InconstructiblePictures`.
    pub fn construct(
        &self,
        configuration: &Configuration,
        picture_count: usize,
    ) -> GeoResult<(Pictures, ConstructionData)> {
        if picture_count == 0 {
            return Err(GeoError::InvalidInput("picture count must be positive".into()));
        }
        let loose: Vec<&ConfigurationObject> = configuration.loose_objects().collect();
        for attempt in 0..self.config.max_attempts {
            let mut drawn = Vec::with_capacity(picture_count);
            for picture_index in 0..picture_count {
                let token = ReplayToken {
                    seed: self.config.seed,
                    index: (attempt * picture_count + picture_index) as u64,
                };
                match draw_loose_objects(&loose, &self.config.layout, token) {
                    Some(values) => drawn.push(values),
                    None => break,
                }
            }
            if drawn.len() < picture_count {
                continue;
            }
            match self.construct_with_loose(configuration, &drawn) {
                Ok(result) => return Ok(result),
                Err(GeoError::InconsistentPictures(detail)) => {
                    debug!(attempt, detail = detail.as_str(), "redrawing pictures");
                    continue;
                }
                Err(error) => return Err(error),
            }
        }
        Err(GeoError::InconstructiblePictures {
            attempts: self.config.max_attempts,
        })
    }

    /// Build pictures from explicitly given loose-object values, one slice
    /// per picture, in configuration order. No reseeding happens here; an
    /// inconsistency propagates.
    pub fn construct_with_loose(
        &self,
        configuration: &Configuration,
        loose_values: &[Vec<AnalyticObject>],
    ) -> GeoResult<(Pictures, ConstructionData)> {
        let loose: Vec<&ConfigurationObject> = configuration.loose_objects().collect();
        let mut pictures = Vec::with_capacity(loose_values.len());
        for values in loose_values {
            if values.len() != loose.len() {
                return Err(GeoError::InvalidInput(format!(
                    "{} loose values given for {} loose objects",
                    values.len(),
                    loose.len()
                )));
            }
            let mut picture = Picture::new();
            for (object, value) in loose.iter().zip(values) {
                if object.kind != value.kind() {
                    return Err(GeoError::InvalidInput(format!(
                        "loose object {} is a {:?}, value is a {:?}",
                        object.id,
                        object.kind,
                        value.kind()
                    )));
                }
                picture.add(object.id, *value);
            }
            pictures.push(picture);
        }
        let mut pictures = Pictures::new(configuration.clone(), pictures)?;
        let constructed: Vec<ConfigurationObject> =
            configuration.constructed_objects().cloned().collect();
        let data = self.apply_constructed(&mut pictures, &constructed)?;
        Ok((pictures, data))
    }

    /// Extend already-populated pictures to a larger configuration by
    /// cloning them and applying just the appended constructions.
    pub fn construct_by_cloning(
        &self,
        old_pictures: &Pictures,
        new_configuration: &Configuration,
    ) -> GeoResult<(Pictures, ConstructionData)> {
        if !old_pictures.configuration().is_prefix_of(new_configuration) {
            return Err(GeoError::InvalidInput(
                "new configuration does not extend the pictured one".into(),
            ));
        }
        let appended: Vec<ConfigurationObject> = new_configuration.objects()
            [old_pictures.configuration().len()..]
            .to_vec();
        if appended.iter().any(|object| object.is_loose()) {
            return Err(GeoError::InvalidInput(
                "an extension may only append constructed objects".into(),
            ));
        }
        let mut pictures = old_pictures.clone();
        pictures.replace_configuration(new_configuration.clone());
        let data = self.apply_constructed(&mut pictures, &appended)?;
        Ok((pictures, data))
    }

    /// Register one extra object against existing pictures. With
    /// `add_to_pictures` false this is a consistency probe only.
    pub fn construct_object(
        &self,
        pictures: &mut Pictures,
        object: &ConfigurationObject,
        add_to_pictures: bool,
    ) -> GeoResult<ConstructionData> {
        let extended = pictures.configuration().extended(vec![object.clone()])?;
        let registration = registrar::register_object(pictures, object, add_to_pictures)?;
        if add_to_pictures {
            pictures.replace_configuration(extended);
        }
        let mut data = ConstructionData::default();
        if !registration.constructed {
            data.inconstructible_object = Some(object.id);
        }
        if let Some(owner) = registration.duplicate_of {
            data.duplicates.insert(object.id, owner);
        }
        Ok(data)
    }

    /// The analytic values a hypothetical object would take, one per
    /// picture, without mutating anything. `None` when any picture cannot
    /// construct it.
    pub fn probe(
        &self,
        pictures: &Pictures,
        object: &ConfigurationObject,
    ) -> Option<Vec<AnalyticObject>> {
        pictures
            .iter()
            .map(|picture| registrar::evaluate_in(picture, object).ok().flatten())
            .collect()
    }

    fn apply_constructed(
        &self,
        pictures: &mut Pictures,
        objects: &[ConfigurationObject],
    ) -> GeoResult<ConstructionData> {
        let mut data = ConstructionData::default();
        for object in objects {
            trace!(object = object.id.0, construction = ?object.source, "registering");
            let registration = registrar::register_object(pictures, object, true)?;
            if !registration.constructed {
                data.inconstructible_object = Some(object.id);
                break;
            }
            if let Some(owner) = registration.duplicate_of {
                data.duplicates.insert(object.id, owner);
            }
        }
        Ok(data)
    }
}

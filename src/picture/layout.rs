//! Random realization of loose objects
//!
//! Every picture draws its free objects from a seeded source; pictures of
//! one configuration differ only in these draws. Points are kept in general
//! position so that degenerate constructions come from geometry, not from
//! unlucky sampling.

use crate::analytic::{AnalyticObject, Circle, Line, Point};
use crate::config::{ConfigurationObject, ObjectKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sampler configuration for loose-object draws.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Points are drawn uniformly from `[-half_extent, half_extent]^2`.
    pub half_extent: f64,
    /// Minimum pairwise distance between drawn points.
    pub min_separation: f64,
    /// Minimum normalized triangle height; triples flatter than this are
    /// redrawn.
    pub min_spread: f64,
    /// Circle radii are drawn uniformly from this range.
    pub radius_range: (f64, f64),
    /// Rejection budget per drawn object.
    pub max_rejects: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            half_extent: 5.0,
            min_separation: 0.5,
            min_spread: 0.05,
            radius_range: (1.0, 4.0),
            max_rejects: 64,
        }
    }
}

/// Replay token making every picture draw reproducible and indexable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    /// SplitMix64-style mixing into a seeded generator.
    pub(crate) fn rng(self) -> StdRng {
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let key = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(key)
    }
}

/// Draw analytic values for the loose objects of a configuration, in their
/// configuration order. `None` when the rejection budget runs out.
pub fn draw_loose_objects(
    loose: &[&ConfigurationObject],
    config: &LayoutConfig,
    token: ReplayToken,
) -> Option<Vec<AnalyticObject>> {
    let mut rng = token.rng();
    let mut points: Vec<Point> = Vec::new();
    let mut values = Vec::with_capacity(loose.len());
    for object in loose {
        let value = match object.kind {
            ObjectKind::Point => {
                let point = draw_point(&mut rng, &points, config)?;
                points.push(point);
                AnalyticObject::Point(point)
            }
            ObjectKind::Line => {
                // Through two auxiliary draws; the auxiliaries are not kept
                // in general position with the real points.
                let p = draw_point(&mut rng, &[], config)?;
                let q = draw_separated(&mut rng, &p, config)?;
                AnalyticObject::Line(Line::through(&p, &q)?)
            }
            ObjectKind::Circle => {
                let center = draw_point(&mut rng, &[], config)?;
                let (low, high) = config.radius_range;
                AnalyticObject::Circle(Circle::new(center, rng.gen_range(low..high))?)
            }
        };
        values.push(value);
    }
    Some(values)
}

fn sample(rng: &mut StdRng, half_extent: f64) -> Point {
    Point::new(
        rng.gen_range(-half_extent..half_extent),
        rng.gen_range(-half_extent..half_extent),
    )
}

fn draw_point(rng: &mut StdRng, existing: &[Point], config: &LayoutConfig) -> Option<Point> {
    'draw: for _ in 0..config.max_rejects {
        let candidate = sample(rng, config.half_extent);
        for point in existing {
            if candidate.distance(point) < config.min_separation {
                continue 'draw;
            }
        }
        for (i, p) in existing.iter().enumerate() {
            for q in existing.iter().skip(i + 1) {
                if triangle_spread(p, q, &candidate) < config.min_spread {
                    continue 'draw;
                }
            }
        }
        return Some(candidate);
    }
    None
}

fn draw_separated(rng: &mut StdRng, from: &Point, config: &LayoutConfig) -> Option<Point> {
    for _ in 0..config.max_rejects {
        let candidate = sample(rng, config.half_extent);
        if candidate.distance(from) >= config.min_separation {
            return Some(candidate);
        }
    }
    None
}

/// Height of the triangle over its longest side, normalized by that side.
fn triangle_spread(p: &Point, q: &Point, r: &Point) -> f64 {
    let cross = ((q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)).abs();
    let longest = p.distance(q).max(p.distance(r)).max(q.distance(r));
    if longest == 0.0 {
        return 0.0;
    }
    cross / (longest * longest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic::are_collinear;
    use crate::config::{ConfigurationObject, ObjectId};

    fn loose(kind: ObjectKind, id: u32) -> ConfigurationObject {
        ConfigurationObject::loose(ObjectId(id), kind)
    }

    #[test]
    fn test_reproducible_draw() {
        let objects = vec![
            loose(ObjectKind::Point, 0),
            loose(ObjectKind::Line, 1),
            loose(ObjectKind::Circle, 2),
        ];
        let refs: Vec<&ConfigurationObject> = objects.iter().collect();
        let token = ReplayToken { seed: 42, index: 7 };

        let first = draw_loose_objects(&refs, &LayoutConfig::default(), token).unwrap();
        let second = draw_loose_objects(&refs, &LayoutConfig::default(), token).unwrap();

        assert_eq!(first.len(), 3);
        for (a, b) in first.iter().zip(second.iter()) {
            assert!(a.approx_eq(b));
        }
    }

    #[test]
    fn test_different_indices_differ() {
        let objects = vec![loose(ObjectKind::Point, 0)];
        let refs: Vec<&ConfigurationObject> = objects.iter().collect();
        let config = LayoutConfig::default();

        let a = draw_loose_objects(&refs, &config, ReplayToken { seed: 1, index: 0 }).unwrap();
        let b = draw_loose_objects(&refs, &config, ReplayToken { seed: 1, index: 1 }).unwrap();

        assert!(!a[0].approx_eq(&b[0]));
    }

    #[test]
    fn test_points_in_general_position() {
        let objects: Vec<ConfigurationObject> =
            (0..6).map(|i| loose(ObjectKind::Point, i)).collect();
        let refs: Vec<&ConfigurationObject> = objects.iter().collect();
        let config = LayoutConfig::default();

        for index in 0..20 {
            let values =
                draw_loose_objects(&refs, &config, ReplayToken { seed: 99, index }).unwrap();
            let points: Vec<_> = values.iter().map(|v| *v.as_point().unwrap()).collect();
            for i in 0..points.len() {
                for j in i + 1..points.len() {
                    assert!(points[i].distance(&points[j]) >= config.min_separation);
                    for k in j + 1..points.len() {
                        assert!(!are_collinear(&points[i], &points[j], &points[k]));
                    }
                }
            }
        }
    }
}

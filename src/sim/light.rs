//! Light rays, the multi-bounce tracer, and light sources
//!
//! A ray is traced as a sequence of long segments. Each leg stops at the
//! nearest segment it crosses: receivers absorb it, opaque edges block it,
//! and mirror faces reflect it into a new leg until the bounce budget runs
//! out.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Segment, distance_squared, intersect, reflect};
use super::objects::{ObjectId, WorldObject};
use crate::error::ZeroDirection;
use crate::polar_to_cartesian;
use crate::settings::Settings;

/// A half-line: origin plus unit direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightRay {
    pub origin: Vec2,
    pub direction: Vec2,
}

impl LightRay {
    /// Build a ray, normalizing `direction`
    ///
    /// A zero (or non-finite) direction has no meaningful intersection and
    /// is rejected here rather than traced.
    pub fn new(origin: Vec2, direction: Vec2) -> Result<Self, ZeroDirection> {
        let direction = direction.try_normalize().ok_or(ZeroDirection)?;
        Ok(Self { origin, direction })
    }

    /// Ray leaving `origin` at `angle` radians
    pub fn from_angle(origin: Vec2, angle: f32) -> Self {
        Self {
            origin,
            direction: polar_to_cartesian(1.0, angle),
        }
    }
}

/// Why a traced ray stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RayTermination {
    /// Left the scene without hitting anything
    Escaped,
    /// Absorbed by a light receiver
    Absorbed { receiver: ObjectId },
    /// Stopped by an opaque segment
    Blocked { object: ObjectId },
    /// Hit a mirror with no bounces left
    BounceLimit { object: ObjectId },
}

/// The visible path of one ray for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TracedRay {
    /// Polyline legs in travel order; each leg starts where the previous ended
    pub path: Vec<Segment>,
    pub termination: Option<RayTermination>,
}

impl TracedRay {
    /// Receiver that absorbed this ray, if any
    pub fn absorbed_by(&self) -> Option<ObjectId> {
        match self.termination {
            Some(RayTermination::Absorbed { receiver }) => Some(receiver),
            _ => None,
        }
    }

    /// Number of reflections along the path
    pub fn bounces(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Final point reached
    pub fn end_point(&self) -> Option<Vec2> {
        self.path.last().map(|s| s.end)
    }
}

/// Nearest segment crossed by a candidate leg
#[derive(Debug, Clone, Copy)]
struct RayHit {
    point: Vec2,
    object: usize,
    segment: Segment,
}

/// Hits on one object closer together than this are the same corner
const CORNER_TOLERANCE: f32 = 1e-3;

/// Find the nearest crossing of `leg` with any object except `exclude`
///
/// Ties keep the first crossing found in object order, then segment order.
/// The one exception is a corner of a mirror face approached from the front:
/// the reflective face wins over the opaque edge sharing that corner.
fn nearest_hit(leg: &Segment, objects: &[WorldObject], exclude: Option<ObjectId>) -> Option<RayHit> {
    let mut best: Option<(f32, RayHit)> = None;

    for (index, object) in objects.iter().enumerate() {
        if Some(object.id) == exclude {
            continue;
        }
        for segment in object.segments() {
            let Some(hit) = intersect(leg, segment) else {
                continue;
            };
            let dist = distance_squared(leg.start, hit.point);
            let better = match &best {
                None => true,
                Some((closest, current)) => {
                    let same_corner = current.object == index
                        && distance_squared(current.point, hit.point)
                            <= CORNER_TOLERANCE * CORNER_TOLERANCE;
                    if same_corner {
                        segment.is_reflective
                            && !current.segment.is_reflective
                            && leg.delta().dot(segment.normal()) < 0.0
                    } else {
                        dist < *closest
                    }
                }
            };
            if better {
                best = Some((
                    dist,
                    RayHit {
                        point: hit.point,
                        object: index,
                        segment: *segment,
                    },
                ));
            }
        }
    }

    best.map(|(_, hit)| hit)
}

/// Trace one ray through the scene
///
/// `exclude` is the ray's own source, whose body never blocks its own
/// light. The object list is only read; charging absorbed energy into
/// receivers is left to the caller.
pub fn trace_ray(
    ray: &LightRay,
    objects: &[WorldObject],
    exclude: Option<ObjectId>,
    settings: &Settings,
) -> TracedRay {
    let mut origin = ray.origin;
    let mut direction = ray.direction;
    let mut leg_start = ray.origin;
    let mut remaining = settings.max_bounces;
    let mut path = Vec::new();

    loop {
        let leg = Segment::new(origin, origin + direction * settings.max_ray_distance);

        let Some(hit) = nearest_hit(&leg, objects, exclude) else {
            path.push(Segment::new(leg_start, leg.end));
            return TracedRay {
                path,
                termination: Some(RayTermination::Escaped),
            };
        };

        path.push(Segment::new(leg_start, hit.point));
        let object = &objects[hit.object];

        let termination = if object.is_receiver() {
            RayTermination::Absorbed {
                receiver: object.id,
            }
        } else if !hit.segment.is_reflective {
            RayTermination::Blocked { object: object.id }
        } else if remaining == 0 {
            log::debug!(
                "Ray from {:?} cut off at {:?} after {} bounces",
                ray.origin,
                hit.point,
                settings.max_bounces
            );
            RayTermination::BounceLimit { object: object.id }
        } else {
            direction = reflect(direction, hit.segment.normal());
            // Step off the face along the new direction so the next leg
            // cannot re-hit the mirror it just left
            origin = hit.point + direction * settings.bounce_offset;
            leg_start = hit.point;
            remaining -= 1;
            continue;
        };

        return TracedRay {
            path,
            termination: Some(termination),
        };
    }
}

/// How a source spreads its rays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightSourceKind {
    /// Every ray leaves along the aim angle from the source position
    Parallel,
    /// Rays fan evenly across `aim ± angular_spread / 2`
    Radial { angular_spread: f32 },
}

/// A light emitter owning a fixed-size fan of rays
#[derive(Debug, Clone)]
pub struct LightSource {
    kind: LightSourceKind,
    position: Vec2,
    aim: f32,
    rays: Vec<LightRay>,
    traced: Vec<TracedRay>,
}

impl LightSource {
    pub fn new(position: Vec2, aim: f32, kind: LightSourceKind, num_rays: usize) -> Self {
        let mut source = Self {
            kind,
            position,
            aim,
            rays: vec![LightRay::from_angle(position, aim); num_rays],
            traced: Vec::with_capacity(num_rays),
        };
        source.regenerate_rays();
        source
    }

    pub fn parallel(position: Vec2, aim: f32, settings: &Settings) -> Self {
        Self::new(
            position,
            aim,
            LightSourceKind::Parallel,
            settings.num_light_rays,
        )
    }

    pub fn radial(position: Vec2, aim: f32, angular_spread: f32, settings: &Settings) -> Self {
        Self::new(
            position,
            aim,
            LightSourceKind::Radial { angular_spread },
            settings.num_light_rays,
        )
    }

    #[inline]
    pub fn kind(&self) -> LightSourceKind {
        self.kind
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn aim(&self) -> f32 {
        self.aim
    }

    #[inline]
    pub fn rays(&self) -> &[LightRay] {
        &self.rays
    }

    /// Paths from the most recent cast
    #[inline]
    pub fn traced_paths(&self) -> &[TracedRay] {
        &self.traced
    }

    /// Angle of ray `index` in the current fan
    pub fn ray_angle(&self, index: usize) -> f32 {
        match self.kind {
            LightSourceKind::Parallel => self.aim,
            LightSourceKind::Radial { angular_spread } => {
                let count = self.rays.len();
                if count <= 1 {
                    return self.aim;
                }
                let t = index as f32 / (count - 1) as f32;
                self.aim - angular_spread * 0.5 + angular_spread * t
            }
        }
    }

    /// Re-derive every ray from the current pose, in place
    fn regenerate_rays(&mut self) {
        for index in 0..self.rays.len() {
            let angle = self.ray_angle(index);
            self.rays[index] = LightRay::from_angle(self.position, angle);
        }
    }

    /// Only the owning [`WorldObject`] moves a placed source, keeping its body in step
    pub(crate) fn set_pose(&mut self, position: Vec2, aim: f32) {
        self.position = position;
        self.aim = aim;
        self.regenerate_rays();
    }

    /// Change the fan width, turning the source radial
    pub(crate) fn set_angular_spread(&mut self, angular_spread: f32) {
        self.kind = LightSourceKind::Radial { angular_spread };
        self.regenerate_rays();
    }

    /// Trace every owned ray against the full object list
    pub fn cast_rays(
        &self,
        objects: &[WorldObject],
        exclude: Option<ObjectId>,
        settings: &Settings,
    ) -> Vec<TracedRay> {
        self.rays
            .iter()
            .map(|ray| trace_ray(ray, objects, exclude, settings))
            .collect()
    }

    /// Store the paths of this tick's cast for rendering
    pub(crate) fn set_traced_paths(&mut self, traced: Vec<TracedRay>) {
        self.traced = traced;
    }
}

//! Line segment geometry
//!
//! Every outline in the scene is a list of straight segments. Rays are
//! traced as long segments and tested against them with the parametric
//! intersection below.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Slack on the parametric range so a ray through an exact corner still hits
pub const INTERSECTION_EPSILON: f32 = 1e-4;
/// Segments whose directions have |sin(angle)| below this are parallel
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// One straight edge of an outline, or one leg of a traced ray
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
    /// Reflective segments bounce rays instead of stopping them
    pub is_reflective: bool,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            is_reflective: false,
        }
    }

    pub fn reflective(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            is_reflective: true,
        }
    }

    /// Vector from start to end
    #[inline]
    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.delta().length()
    }

    /// Unit perpendicular (start -> end rotated a quarter turn counterclockwise)
    pub fn normal(&self) -> Vec2 {
        self.delta().perp().normalize_or_zero()
    }

    /// Point at parameter `t` (0 = start, 1 = end)
    #[inline]
    pub fn at(&self, t: f32) -> Vec2 {
        self.start + self.delta() * t
    }
}

/// Where two segments cross
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: Vec2,
    /// Parameter along the first segment
    pub t_a: f32,
    /// Parameter along the second segment
    pub t_b: f32,
}

/// Intersect two segments in parametric form
///
/// Solves `a.start + t_a * a.delta = b.start + t_b * b.delta`. Returns
/// `None` for parallel or collinear pairs and when either parameter falls
/// outside `[0, 1]` (widened by [`INTERSECTION_EPSILON`]).
pub fn intersect(a: &Segment, b: &Segment) -> Option<Intersection> {
    let r = a.delta();
    let s = b.delta();
    let denom = r.perp_dot(s);

    if denom.abs() <= PARALLEL_EPSILON * r.length() * s.length() {
        return None;
    }

    let qp = b.start - a.start;
    let t_a = qp.perp_dot(s) / denom;
    let t_b = qp.perp_dot(r) / denom;

    let in_range = |t: f32| (-INTERSECTION_EPSILON..=1.0 + INTERSECTION_EPSILON).contains(&t);
    if !in_range(t_a) || !in_range(t_b) {
        return None;
    }

    Some(Intersection {
        point: a.at(t_a),
        t_a,
        t_b,
    })
}

/// Squared euclidean distance; cheaper than `distance` for comparisons
#[inline]
pub fn distance_squared(p1: Vec2, p2: Vec2) -> f32 {
    (p1 - p2).length_squared()
}

/// Reflect a direction off a surface: d' = d - 2(d·n)n
///
/// `normal` does not need to be unit length, but must not be zero.
#[inline]
pub fn reflect(direction: Vec2, normal: Vec2) -> Vec2 {
    let n = normal.normalize_or_zero();
    direction - 2.0 * direction.dot(n) * n
}

/// Closed rectangle outline centered on `center`, rotated by `rotation`
///
/// `half_extents.x` runs along `axis1 = (cos r, sin r)` and `half_extents.y`
/// along `axis2 = (-sin r, cos r)`. Edge 2 is the `+axis1` face.
pub fn rect_outline(center: Vec2, half_extents: Vec2, rotation: f32) -> Vec<Segment> {
    let axis1 = Vec2::new(rotation.cos(), rotation.sin()) * half_extents.x;
    let axis2 = Vec2::new(-rotation.sin(), rotation.cos()) * half_extents.y;

    let corner = |s1: f32, s2: f32| center + axis1 * s1 + axis2 * s2;

    vec![
        Segment::new(corner(-1.0, -1.0), corner(-1.0, 1.0)),
        Segment::new(corner(-1.0, 1.0), corner(1.0, 1.0)),
        Segment::new(corner(1.0, 1.0), corner(1.0, -1.0)),
        Segment::new(corner(1.0, -1.0), corner(-1.0, -1.0)),
    ]
}

//! Collision queries for moving actors
//!
//! A simpler question than ray casting: does an axis-aligned box touch any
//! segment of an outline? No nearest-hit ranking, just a boolean.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Segment;

/// Axis-aligned box around a moving actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Hitbox {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
        }
    }

    /// Square box of side `size`
    pub fn square(center: Vec2, size: f32) -> Self {
        Self::new(center, Vec2::splat(size))
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// The same box shifted by `delta`
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            center: self.center + delta,
            half_extents: self.half_extents,
        }
    }

    /// Whether `segment` touches the box (boundary inclusive)
    ///
    /// Clips the segment's parameter range against each slab of the box.
    pub fn overlaps_segment(&self, segment: &Segment) -> bool {
        let (min, max) = (self.min(), self.max());
        let d = segment.delta();
        let mut t_enter = 0.0_f32;
        let mut t_exit = 1.0_f32;

        for (p, dp, lo, hi) in [
            (segment.start.x, d.x, min.x, max.x),
            (segment.start.y, d.y, min.y, max.y),
        ] {
            if dp == 0.0 {
                // Parallel to this slab: must already be inside it
                if p < lo || p > hi {
                    return false;
                }
                continue;
            }
            let t0 = (lo - p) / dp;
            let t1 = (hi - p) / dp;
            let (near, far) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
            t_enter = t_enter.max(near);
            t_exit = t_exit.min(far);
            if t_enter > t_exit {
                return false;
            }
        }

        true
    }
}

/// Whether `hitbox` overlaps any of `segments`
pub fn check_collision(hitbox: &Hitbox, segments: &[Segment]) -> bool {
    segments.iter().any(|segment| hitbox.overlaps_segment(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::rect_outline;

    #[test]
    fn test_segment_crossing_box() {
        let hitbox = Hitbox::square(Vec2::ZERO, 10.0);
        let segment = Segment::new(Vec2::new(-20.0, 1.0), Vec2::new(20.0, 2.0));
        assert!(hitbox.overlaps_segment(&segment));
    }

    #[test]
    fn test_segment_inside_box() {
        let hitbox = Hitbox::square(Vec2::ZERO, 10.0);
        let segment = Segment::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        assert!(hitbox.overlaps_segment(&segment));
    }

    #[test]
    fn test_segment_missing_box() {
        let hitbox = Hitbox::square(Vec2::ZERO, 10.0);
        // Diagonal passing just outside the top-right corner
        let segment = Segment::new(Vec2::new(0.0, 12.0), Vec2::new(12.0, 0.0));
        assert!(!hitbox.overlaps_segment(&segment));
    }

    #[test]
    fn test_touching_edge_counts() {
        let hitbox = Hitbox::square(Vec2::ZERO, 10.0);
        let segment = Segment::new(Vec2::new(5.0, -20.0), Vec2::new(5.0, 20.0));
        assert!(hitbox.overlaps_segment(&segment));
    }

    #[test]
    fn test_wall_overlap_then_one_unit_away() {
        // Wall occupying x in [100, 132]
        let wall = rect_outline(Vec2::new(116.0, 200.0), Vec2::new(16.0, 64.0), 0.0);

        // Box right edge at x = 102, inside the wall's left face
        let hitbox = Hitbox::square(Vec2::new(78.0, 200.0), 48.0);
        assert!(check_collision(&hitbox, &wall));

        // Right edge exactly on the face still touches
        let touching = Hitbox::square(Vec2::new(76.0, 200.0), 48.0);
        assert!(check_collision(&touching, &wall));

        // One unit further away
        let moved = touching.translated(Vec2::new(-1.0, 0.0));
        assert!(!check_collision(&moved, &wall));
    }
}

//! Illumigator - light ray casting engine for a 2D mirror puzzle
//!
//! Core modules:
//! - `sim`: Geometry, world objects, ray tracing, collision and the level tick
//! - `level`: Serializable level descriptions
//! - `renderer`: Line-list output for an external renderer
//! - `settings`: Engine configuration

pub mod error;
pub mod level;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{LevelError, ZeroDirection};
pub use level::LevelDefinition;
pub use settings::Settings;

use glam::Vec2;

/// Engine configuration defaults
pub mod consts {
    /// Window dimensions (pixels)
    pub const WINDOW_WIDTH: f32 = 1280.0;
    pub const WINDOW_HEIGHT: f32 = 720.0;

    /// Side length of one wall tile (pixels)
    pub const TILE_SIZE: f32 = 32.0;

    /// Rays per light source
    pub const NUM_LIGHT_RAYS: usize = 20;
    /// Reflections allowed before a ray is cut off
    pub const MAX_BOUNCES: u32 = 50;
    /// Distance a reflected ray starts away from the mirror it left
    pub const BOUNCE_OFFSET: f32 = 0.5;

    /// Charge added to a receiver for each ray it absorbs
    pub const RAY_ENERGY: f32 = 0.02;
    /// Per-tick multiplicative receiver charge decay
    pub const CHARGE_DECAY: f32 = 0.99;
    /// Charge at which a receiver counts as lit
    pub const RECEIVER_THRESHOLD: f32 = 10.0;

    /// Half side of the square body around a light source
    pub const LIGHT_SOURCE_BODY_HALF_EXTENT: f32 = 10.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 48.0;
    pub const PLAYER_MOVEMENT_SPEED: f32 = 5.0;
    pub const PLAYER_REACH_DISTANCE: f32 = 100.0;
    /// Base mirror rotation per tick (radians), doubled as the hold ramps up
    pub const OBJECT_ROTATION_AMOUNT: f32 = 0.01;
    /// Rotation ramp: `rotation_factor` grows by this per held tick up to the max
    pub const ROTATION_FACTOR_STEP: f32 = 1.0 / 15.0;
    pub const ROTATION_FACTOR_MAX: f32 = 3.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to exactly TAU
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    /// Same direction on the unit circle
    fn same_angle(a: f32, b: f32) -> bool {
        (a.cos() - b.cos()).abs() < 1e-4 && (a.sin() - b.sin()).abs() < 1e-4
    }

    #[test]
    fn test_normalize_angle_wraps() {
        for angle in [3.0 * PI, -PI / 2.0, 2.5 * PI, -7.0 * PI, PI, -PI, 0.0, 100.0] {
            let wrapped = normalize_angle(angle);
            assert!((-PI..PI).contains(&wrapped), "{angle} wrapped to {wrapped}");
            assert!(same_angle(wrapped, angle), "{angle} wrapped to {wrapped}");
        }
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_huge_angle_terminates() {
        for angle in [1e10, -1e10, f32::MAX, f32::MIN] {
            let wrapped = normalize_angle(angle);
            assert!((-PI..PI).contains(&wrapped), "{angle} wrapped to {wrapped}");
        }
        assert!(normalize_angle(f32::NAN).is_nan());
    }

    #[test]
    fn test_polar_round_trip_angle() {
        let v = polar_to_cartesian(2.0, PI / 3.0);
        let (r, theta) = cartesian_to_polar(v);
        assert!((r - 2.0).abs() < 1e-5);
        assert!((theta - PI / 3.0).abs() < 1e-5);
    }
}

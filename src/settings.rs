//! Engine settings
//!
//! Every tunable the simulation reads lives here and is passed into the
//! level at construction, so tests and tools can run with their own values.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Scene ===
    /// Side length of one tile (pixels)
    pub tile_size: f32,
    /// Window size (pixels), used for boundary walls and ray length
    pub window_width: f32,
    pub window_height: f32,
    /// Mirror size in tiles: thickness along its facing, length of the face
    pub mirror_dimensions: [u32; 2],
    /// Receiver size in tiles
    pub receiver_dimensions: [u32; 2],

    // === Light ===
    /// Rays per light source
    pub num_light_rays: usize,
    /// Length of each ray leg before it is considered off-screen
    pub max_ray_distance: f32,
    /// Reflections allowed before a ray is cut off
    pub max_bounces: u32,
    /// Distance a reflected ray starts away from its mirror
    pub bounce_offset: f32,

    // === Receivers ===
    /// Charge added per absorbed ray
    pub ray_energy: f32,
    /// Per-tick multiplicative decay (0.0 - 1.0)
    pub charge_decay: f32,
    /// Charge at which a receiver counts as lit
    pub receiver_threshold: f32,

    // === Player ===
    pub player_size: f32,
    /// Pixels per tick
    pub player_speed: f32,
    /// Max distance from the player to a mirror it can rotate
    pub player_reach: f32,
    /// Base rotation per tick (radians)
    pub rotation_amount: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            mirror_dimensions: [1, 2],
            receiver_dimensions: [1, 1],

            num_light_rays: NUM_LIGHT_RAYS,
            max_ray_distance: WINDOW_WIDTH.hypot(WINDOW_HEIGHT),
            max_bounces: MAX_BOUNCES,
            bounce_offset: BOUNCE_OFFSET,

            ray_energy: RAY_ENERGY,
            charge_decay: CHARGE_DECAY,
            receiver_threshold: RECEIVER_THRESHOLD,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_MOVEMENT_SPEED,
            player_reach: PLAYER_REACH_DISTANCE,
            rotation_amount: OBJECT_ROTATION_AMOUNT,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Window diagonal, the longest straight path inside the window
    pub fn window_diagonal(&self) -> f32 {
        self.window_width.hypot(self.window_height)
    }

    /// Squared reach, for comparisons against `distance_squared`
    pub fn player_reach_squared(&self) -> f32 {
        self.player_reach * self.player_reach
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ray_distance_is_window_diagonal() {
        let settings = Settings::default();
        assert!((settings.max_ray_distance - settings.window_diagonal()).abs() < 1e-3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "max_bounces": 3, "charge_decay": 0.5 }"#).unwrap();
        assert_eq!(settings.max_bounces, 3);
        assert_eq!(settings.charge_decay, 0.5);
        assert_eq!(settings.tile_size, TILE_SIZE);
        assert_eq!(settings.num_light_rays, NUM_LIGHT_RAYS);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.ray_energy = 0.25;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}

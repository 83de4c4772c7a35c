//! Level descriptions
//!
//! A level is described in JSON as lists of object poses. Building one
//! produces a [`Level`] ready to tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::settings::Settings;
use crate::sim::{Character, ColorTag, Level, LightSource, WallAnimation, WorldObject};

/// A wall, sized in tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallDef {
    pub position: Vec2,
    pub dimensions: [u32; 2],
    #[serde(default)]
    pub rotation: f32,
}

/// A wall that slides back and forth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedWallDef {
    pub position: Vec2,
    pub dimensions: [u32; 2],
    #[serde(default)]
    pub rotation: f32,
    /// Offset of the far end of the path
    pub displacement: Vec2,
    /// Fraction of the path covered per tick
    pub speed: f32,
}

/// A mirror or light receiver pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseDef {
    pub position: Vec2,
    #[serde(default)]
    pub rotation: f32,
}

/// A light source; an angular spread makes it radial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSourceDef {
    pub position: Vec2,
    pub aim: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angular_spread: Option<f32>,
}

fn default_true() -> bool {
    true
}

/// Serializable level layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    /// Seed for cosmetic wall colors
    #[serde(default)]
    pub seed: u64,
    /// Surround the window with walls
    #[serde(default = "default_true")]
    pub boundary_walls: bool,
    /// Character start; the window center when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_start: Option<Vec2>,
    #[serde(default)]
    pub walls: Vec<WallDef>,
    #[serde(default)]
    pub animated_walls: Vec<AnimatedWallDef>,
    #[serde(default)]
    pub mirrors: Vec<PoseDef>,
    #[serde(default)]
    pub light_receivers: Vec<PoseDef>,
    #[serde(default)]
    pub light_sources: Vec<LightSourceDef>,
}

fn check_finite(kind: &'static str, index: usize, values: &[f32]) -> Result<(), LevelError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(LevelError::NonFinite { kind, index })
    }
}

fn check_dimensions(kind: &'static str, index: usize, dimensions: [u32; 2]) -> Result<(), LevelError> {
    if dimensions.contains(&0) {
        return Err(LevelError::EmptyDimensions {
            kind,
            index,
            width: dimensions[0],
            height: dimensions[1],
        });
    }
    Ok(())
}

impl LevelDefinition {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The first puzzle: one parallel source, one receiver, four mirrors to place
    pub fn tutorial(settings: &Settings) -> Self {
        use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

        let (width, height) = (settings.window_width, settings.window_height);
        let wall = |x: f32, y: f32, w: u32, h: u32| WallDef {
            position: Vec2::new(x, y),
            dimensions: [w, h],
            rotation: 0.0,
        };
        let pose = |x: f32, y: f32, rotation: f32| PoseDef {
            position: Vec2::new(x, y),
            rotation,
        };

        Self {
            name: "tutorial".into(),
            seed: 0,
            boundary_walls: true,
            player_start: None,
            walls: vec![
                wall(784.0, 176.0, 1, 9),
                wall(496.0, height - 176.0, 1, 9),
                wall(880.0, height - 176.0, 1, 9),
            ],
            animated_walls: vec![AnimatedWallDef {
                position: Vec2::new(width - 176.0, height - 240.0),
                dimensions: [1, 1],
                rotation: 0.0,
                displacement: Vec2::new(128.0, 0.0),
                speed: 0.02,
            }],
            mirrors: vec![
                pose(width / 4.0, height / 3.0 * 2.0, -FRAC_PI_4),
                pose(width / 2.0 + 50.0, height - 100.0, 0.0),
                pose(width / 2.0, height / 4.0, FRAC_PI_2),
                pose(width / 4.0 * 3.0 + 20.0, height / 5.0, 0.0),
            ],
            light_receivers: vec![pose(width - 128.0, height - 128.0, 0.0)],
            light_sources: vec![LightSourceDef {
                position: Vec2::new(width / 4.0, 48.0),
                aim: FRAC_PI_2,
                angular_spread: None,
            }],
        }
    }

    /// Reject layouts no level could be built from
    pub fn validate(&self) -> Result<(), LevelError> {
        for (index, wall) in self.walls.iter().enumerate() {
            check_finite("wall", index, &[wall.position.x, wall.position.y, wall.rotation])?;
            check_dimensions("wall", index, wall.dimensions)?;
        }
        for (index, wall) in self.animated_walls.iter().enumerate() {
            check_finite(
                "animated wall",
                index,
                &[
                    wall.position.x,
                    wall.position.y,
                    wall.rotation,
                    wall.displacement.x,
                    wall.displacement.y,
                    wall.speed,
                ],
            )?;
            check_dimensions("animated wall", index, wall.dimensions)?;
        }
        for (index, mirror) in self.mirrors.iter().enumerate() {
            check_finite("mirror", index, &[mirror.position.x, mirror.position.y, mirror.rotation])?;
        }
        for (index, receiver) in self.light_receivers.iter().enumerate() {
            check_finite(
                "light receiver",
                index,
                &[receiver.position.x, receiver.position.y, receiver.rotation],
            )?;
        }
        for (index, source) in self.light_sources.iter().enumerate() {
            check_finite(
                "light source",
                index,
                &[
                    source.position.x,
                    source.position.y,
                    source.aim,
                    source.angular_spread.unwrap_or(0.0),
                ],
            )?;
        }
        Ok(())
    }

    /// Walls framing the window, a tile thick
    fn boundary(&self, settings: &Settings) -> Vec<WallDef> {
        let tile = settings.tile_size;
        let (width, height) = (settings.window_width, settings.window_height);
        let columns = (width / tile) as u32;
        let rows = (height / tile) as u32;
        let side_y = height * 0.5 - tile * 0.25;

        vec![
            WallDef {
                position: Vec2::new(tile * 0.5, side_y),
                dimensions: [1, rows + 1],
                rotation: 0.0,
            },
            WallDef {
                position: Vec2::new(width - tile * 0.5, side_y),
                dimensions: [1, rows + 1],
                rotation: 0.0,
            },
            WallDef {
                position: Vec2::new(width * 0.5, tile * 0.5),
                dimensions: [columns.saturating_sub(2).max(1), 1],
                rotation: 0.0,
            },
            WallDef {
                position: Vec2::new(width * 0.5, height - tile * 0.5),
                dimensions: [columns.saturating_sub(2).max(1), 1],
                rotation: 0.0,
            },
        ]
    }

    /// Build a playable level
    ///
    /// Objects are added walls first, then mirrors, receivers and light
    /// sources; that order breaks ties between equally distant ray hits.
    pub fn build(&self, settings: &Settings) -> Result<Level, LevelError> {
        self.validate()?;

        let mut rng = Pcg32::seed_from_u64(self.seed);
        let start = self
            .player_start
            .unwrap_or(Vec2::new(settings.window_width, settings.window_height) * 0.5);
        let mut level = Level::new(self.name.clone(), Character::new(start, settings));

        let boundary = if self.boundary_walls {
            self.boundary(settings)
        } else {
            Vec::new()
        };
        for wall in boundary.iter().chain(&self.walls) {
            let id = level.next_object_id();
            let color = ColorTag::random_wall_color(&mut rng);
            level.add_object(
                WorldObject::wall(id, wall.position, wall.dimensions, wall.rotation, settings)
                    .with_color(color),
            );
        }

        for wall in &self.animated_walls {
            let id = level.next_object_id();
            let color = ColorTag::random_wall_color(&mut rng);
            level.add_object(
                WorldObject::wall(id, wall.position, wall.dimensions, wall.rotation, settings)
                    .with_color(color),
            );
            level.add_animation(WallAnimation::new(id, wall.position, wall.displacement, wall.speed));
        }

        for mirror in &self.mirrors {
            let id = level.next_object_id();
            level.add_object(WorldObject::mirror(id, mirror.position, mirror.rotation, settings));
        }

        for receiver in &self.light_receivers {
            let id = level.next_object_id();
            level.add_object(WorldObject::light_receiver(
                id,
                receiver.position,
                receiver.rotation,
                settings,
            ));
        }

        for source in &self.light_sources {
            let id = level.next_object_id();
            let light = match source.angular_spread {
                Some(spread) => LightSource::radial(source.position, source.aim, spread, settings),
                None => LightSource::parallel(source.position, source.aim, settings),
            };
            level.add_object(WorldObject::light_source(id, light));
        }

        if self.light_receivers.is_empty() {
            log::warn!("Level '{}' has no light receivers and can never be completed", self.name);
        }
        if level.check_collisions(&level.character.hitbox) {
            log::warn!("Level '{}' starts the character inside an object", self.name);
        }

        log::info!(
            "Loaded level '{}': {} walls, {} mirrors, {} receivers, {} light sources",
            self.name,
            level.walls().count(),
            level.mirrors().count(),
            level.receivers().count(),
            level.light_sources().count()
        );

        Ok(level)
    }
}

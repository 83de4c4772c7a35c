//! Per-frame simulation tick
//!
//! One tick runs, in order: character movement (each axis rejected
//! separately on collision), wall animations, rotation of the nearest
//! mirror, light casting, and receiver charge decay.

use glam::Vec2;

use super::objects::ObjectId;
use super::state::Level;
use crate::settings::Settings;

/// Player intent for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// +1 counterclockwise, -1 clockwise, 0 none
    pub rotation_dir: i8,
}

impl TickInput {
    /// Unit movement direction, zero when no key (or opposing keys) is held
    pub fn direction(&self) -> Vec2 {
        let mut direction = Vec2::ZERO;
        if self.right {
            direction.x += 1.0;
        }
        if self.left {
            direction.x -= 1.0;
        }
        if self.up {
            direction.y += 1.0;
        }
        if self.down {
            direction.y -= 1.0;
        }
        direction.normalize_or_zero()
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Whether the character moved along either axis
    pub moved: bool,
    /// Mirror rotated this tick
    pub rotated: Option<ObjectId>,
    /// Rays absorbed per receiver
    pub absorbed: Vec<(ObjectId, usize)>,
    /// Any receiver at or above the threshold after decay
    pub complete: bool,
}

/// Advance the level by one tick
pub fn tick(level: &mut Level, input: &TickInput, settings: &Settings) -> TickReport {
    level.time_ticks += 1;

    let moved = move_character(level, input, settings);
    level.apply_animations();

    level.character.update_rotation(input.rotation_dir);
    let rotated = rotate_surroundings(level, input, settings);

    let absorbed = level.cast_light(settings);
    level.decay_receivers(settings);

    TickReport {
        moved,
        rotated,
        absorbed,
        complete: level.is_complete(settings),
    }
}

/// Move the character, trying x then y so it can slide along walls
fn move_character(level: &mut Level, input: &TickInput, settings: &Settings) -> bool {
    let step = input.direction() * settings.player_speed;
    if step == Vec2::ZERO {
        return false;
    }

    let moved_x = step.x != 0.0 && level.try_move_character(Vec2::new(step.x, 0.0));
    let moved_y = step.y != 0.0 && level.try_move_character(Vec2::new(0.0, step.y));
    moved_x || moved_y
}

/// Rotate the closest mirror in reach, unless that would hit the character
fn rotate_surroundings(level: &mut Level, input: &TickInput, settings: &Settings) -> Option<ObjectId> {
    if input.rotation_dir == 0 {
        return None;
    }
    let mirror = level.nearest_mirror_in_reach(settings)?;
    let angle = level.character.rotation_step(input.rotation_dir, settings);

    level
        .move_object_if_safe(mirror, Vec2::ZERO, angle)
        .then_some(mirror)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::light::{LightSource, RayTermination};
    use crate::sim::objects::WorldObject;
    use crate::sim::state::Character;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    /// Source at (320, 48) aimed up, receiver at (1152, 592), and four mirrors
    /// placed so every ray reaches the receiver. Boundary walls close the scene.
    fn solved_scenario(settings: &Settings) -> (Level, ObjectId, [ObjectId; 4]) {
        let mut level = Level::new("scenario", Character::new(Vec2::new(900.0, 100.0), settings));

        let tile = settings.tile_size;
        let (width, height) = (settings.window_width, settings.window_height);
        let walls = [
            (Vec2::new(tile * 0.5, height * 0.5), [1, 23]),
            (Vec2::new(width - tile * 0.5, height * 0.5), [1, 23]),
            (Vec2::new(width * 0.5, tile * 0.5), [38, 1]),
            (Vec2::new(width * 0.5, height - tile * 0.5), [38, 1]),
        ];
        for (center, dimensions) in walls {
            let id = level.next_object_id();
            level.add_object(WorldObject::wall(id, center, dimensions, 0.0, settings));
        }

        // Each mirror's face center sits on the beam; the face is half a tile
        // from the mirror center along its facing
        let k = settings.tile_size * 0.5 * std::f32::consts::FRAC_1_SQRT_2;
        let poses = [
            (Vec2::new(320.0 - k, 240.0 + k), -FRAC_PI_4),
            (Vec2::new(640.0 + k, 240.0 - k), 3.0 * FRAC_PI_4),
            (Vec2::new(640.0 - k, 640.0 + k), -FRAC_PI_4),
            (Vec2::new(1152.0 + k, 640.0 + k), -3.0 * FRAC_PI_4),
        ];
        let mut mirrors = [ObjectId(0); 4];
        for (slot, (center, rotation)) in mirrors.iter_mut().zip(poses) {
            let id = level.next_object_id();
            level.add_object(WorldObject::mirror(id, center, rotation, settings));
            *slot = id;
        }

        let receiver = level.next_object_id();
        level.add_object(WorldObject::light_receiver(receiver, Vec2::new(1152.0, 592.0), 0.0, settings));

        let source = level.next_object_id();
        level.add_object(WorldObject::light_source(
            source,
            LightSource::parallel(Vec2::new(320.0, 48.0), FRAC_PI_2, settings),
        ));

        (level, receiver, mirrors)
    }

    fn charge(level: &Level, id: ObjectId) -> f32 {
        level.object(id).and_then(|o| o.charge()).unwrap_or_default()
    }

    #[test]
    fn test_scenario_every_ray_reaches_receiver() {
        let settings = Settings::default();
        let (mut level, receiver, _) = solved_scenario(&settings);

        let absorbed = level.cast_light(&settings);
        assert_eq!(absorbed, vec![(receiver, settings.num_light_rays)]);
        let expected = settings.ray_energy * settings.num_light_rays as f32;
        assert!((charge(&level, receiver) - expected).abs() < 1e-5);

        let source = level.light_sources().next().unwrap().as_light_source().unwrap();
        for traced in source.traced_paths() {
            // Four bounces, then absorbed on the receiver's top face
            assert_eq!(traced.path.len(), 5);
            assert!((traced.end_point().unwrap() - Vec2::new(1152.0, 608.0)).length() < 0.05);
        }
    }

    #[test]
    fn test_scenario_full_tick_applies_decay_after_charge() {
        let settings = Settings::default();
        let (mut level, receiver, _) = solved_scenario(&settings);

        let report = tick(&mut level, &TickInput::default(), &settings);
        assert_eq!(report.absorbed, vec![(receiver, settings.num_light_rays)]);
        let expected = settings.ray_energy * settings.num_light_rays as f32 * settings.charge_decay;
        assert!((charge(&level, receiver) - expected).abs() < 1e-5);
        assert_eq!(level.time_ticks, 1);
    }

    #[test]
    fn test_scenario_displaced_mirror_stops_charging() {
        let settings = Settings::default();
        // Any mirror pushed past the player's reach breaks the beam
        let shift = settings.player_reach + 20.0;
        for index in 0..4 {
            for offset in [
                Vec2::new(shift, 0.0),
                Vec2::new(-shift, 0.0),
                Vec2::new(0.0, shift),
                Vec2::new(0.0, -shift),
            ] {
                let (mut level, receiver, mirrors) = solved_scenario(&settings);
                level.object_mut(mirrors[index]).unwrap().move_by(offset, 0.0);

                let absorbed = level.cast_light(&settings);
                assert!(
                    absorbed.is_empty(),
                    "mirror {index} moved by {offset:?} still reached the receiver"
                );
                assert_eq!(charge(&level, receiver), 0.0);
            }
        }
    }

    #[test]
    fn test_receiver_charges_past_threshold_then_decays() {
        let settings = Settings::default();
        let (mut level, receiver, mirrors) = solved_scenario(&settings);

        let mut lit_after = None;
        for n in 1..=200 {
            let report = tick(&mut level, &TickInput::default(), &settings);
            if report.complete {
                lit_after = Some(n);
                break;
            }
        }
        let lit_after = lit_after.expect("receiver never reached threshold");
        assert!(lit_after > 1);

        // Break the beam, then charge must follow c' = c * decay exactly
        level.object_mut(mirrors[0]).unwrap().move_by(Vec2::new(0.0, 200.0), 0.0);
        let mut previous = charge(&level, receiver);
        let mut dark_after = None;
        for n in 1..=1000 {
            let report = tick(&mut level, &TickInput::default(), &settings);
            assert!(report.absorbed.is_empty());
            let current = charge(&level, receiver);
            assert!((current - previous * settings.charge_decay).abs() < 1e-5);
            previous = current;
            if !report.complete {
                dark_after = Some(n);
                break;
            }
        }
        assert!(dark_after.is_some());
    }

    #[test]
    fn test_character_slides_along_wall() {
        let settings = Settings::default();
        let mut level = Level::new("slide", Character::new(Vec2::new(100.0, 100.0), &settings));
        let id = level.next_object_id();
        // Wall face at x = 126, right at the character's edge after 2 px
        level.add_object(WorldObject::wall(id, Vec2::new(142.0, 100.0), [1, 10], 0.0, &settings));

        let input = TickInput {
            right: true,
            up: true,
            ..Default::default()
        };
        let report = tick(&mut level, &input, &settings);
        assert!(report.moved);
        let position = level.character.position();
        // Blocked on x, free on y
        assert_eq!(position.x, 100.0);
        assert!(position.y > 100.0);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let input = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_rotation_input_turns_nearest_mirror() {
        let settings = Settings::default();
        let mut level = Level::new("rotate", Character::new(Vec2::new(0.0, 0.0), &settings));
        let id = level.next_object_id();
        level.add_object(WorldObject::mirror(id, Vec2::new(80.0, 0.0), 0.0, &settings));

        let input = TickInput {
            rotation_dir: 1,
            ..Default::default()
        };
        let report = tick(&mut level, &input, &settings);
        assert_eq!(report.rotated, Some(id));
        let expected = settings.rotation_amount * 2f32.powf(level.character.rotation_factor);
        assert!((level.object(id).unwrap().rotation() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_blocked_by_character() {
        let settings = Settings::default();
        // Mirror just clear of the character; a half turn swings its long
        // side into the character's box
        let mut level = Level::new("blocked", Character::new(Vec2::new(0.0, 0.0), &settings));
        let id = level.next_object_id();
        level.add_object(WorldObject::mirror(id, Vec2::new(0.0, 42.0), FRAC_PI_2, &settings));
        assert!(!level.check_collisions(&level.character.hitbox));

        assert!(!level.move_object_if_safe(id, Vec2::ZERO, PI / 2.0));
        assert!((level.object(id).unwrap().rotation() - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_bounce_limit_between_facing_mirrors_in_level() {
        let mut settings = Settings::default();
        settings.max_bounces = 12;
        let mut level = Level::new("loop", Character::new(Vec2::new(-900.0, -900.0), &settings));
        let left = level.next_object_id();
        level.add_object(WorldObject::mirror(left, Vec2::new(100.0, 300.0), 0.0, &settings));
        let right = level.next_object_id();
        level.add_object(WorldObject::mirror(right, Vec2::new(500.0, 300.0), PI, &settings));
        let source = level.next_object_id();
        level.add_object(WorldObject::light_source(
            source,
            LightSource::parallel(Vec2::new(300.0, 300.0), 0.0, &settings),
        ));

        level.cast_light(&settings);
        let paths = level.object(source).unwrap().as_light_source().unwrap().traced_paths();
        for traced in paths {
            assert!(traced.path.len() <= settings.max_bounces as usize + 1);
            // The beam comes back through the source, whose body does not
            // stop its own light, and keeps bouncing until the cap
            assert!(matches!(
                traced.termination,
                Some(RayTermination::BounceLimit { .. })
            ));
        }
    }
}

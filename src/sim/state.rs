//! Level state
//!
//! A level owns every world object, the player character and the wall
//! animations. Objects live for the lifetime of the level and are dropped
//! with it.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Hitbox;
use super::light::TracedRay;
use super::objects::{ObjectId, ObjectKind, WorldObject};
use crate::consts::{ROTATION_FACTOR_MAX, ROTATION_FACTOR_STEP};
use crate::settings::Settings;

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub hitbox: Hitbox,
    /// Rotation speed exponent; ramps up while a rotate key is held
    pub rotation_factor: f32,
}

impl Character {
    pub fn new(position: Vec2, settings: &Settings) -> Self {
        Self {
            hitbox: Hitbox::square(position, settings.player_size),
            rotation_factor: 0.0,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.hitbox.center
    }

    /// Advance the rotation ramp for this tick's rotate direction
    pub fn update_rotation(&mut self, rotation_dir: i8) {
        if rotation_dir == 0 {
            self.rotation_factor = 0.0;
            return;
        }
        if self.rotation_factor < ROTATION_FACTOR_MAX {
            self.rotation_factor = (self.rotation_factor + ROTATION_FACTOR_STEP).min(ROTATION_FACTOR_MAX);
        }
    }

    /// Rotation applied to a mirror this tick
    pub fn rotation_step(&self, rotation_dir: i8, settings: &Settings) -> f32 {
        rotation_dir as f32 * settings.rotation_amount * 2f32.powf(self.rotation_factor)
    }
}

/// A wall sliding back and forth between its anchor and `anchor + displacement`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallAnimation {
    pub wall: ObjectId,
    pub anchor: Vec2,
    pub displacement: Vec2,
    /// Fraction of the full path covered per tick
    pub speed: f32,
    /// Position along the path (0 = anchor, 1 = anchor + displacement)
    pub progress: f32,
    pub forward: bool,
}

impl WallAnimation {
    pub fn new(wall: ObjectId, anchor: Vec2, displacement: Vec2, speed: f32) -> Self {
        Self {
            wall,
            anchor,
            displacement,
            speed,
            progress: 0.0,
            forward: true,
        }
    }

    /// Progress and direction after one more tick, reversing at either end
    pub fn next_step(&self) -> (f32, bool) {
        let step = if self.forward { self.speed } else { -self.speed };
        let next = self.progress + step;
        if next >= 1.0 {
            (1.0, false)
        } else if next <= 0.0 {
            (0.0, true)
        } else {
            (next, self.forward)
        }
    }

    pub fn position_at(&self, progress: f32) -> Vec2 {
        self.anchor + self.displacement * progress
    }
}

/// A loaded level
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub character: Character,
    /// Simulation tick counter
    pub time_ticks: u64,
    objects: Vec<WorldObject>,
    animations: Vec<WallAnimation>,
    next_id: u32,
}

impl Level {
    pub fn new(name: impl Into<String>, character: Character) -> Self {
        Self {
            name: name.into(),
            character,
            time_ticks: 0,
            objects: Vec::new(),
            animations: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new object ID
    pub fn next_object_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Add an object built with an ID from [`Level::next_object_id`]
    pub fn add_object(&mut self, object: WorldObject) -> ObjectId {
        let id = object.id;
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.objects.push(object);
        id
    }

    pub fn add_animation(&mut self, animation: WallAnimation) {
        self.animations.push(animation);
    }

    /// All objects in iteration order (the tie-break order for rays)
    #[inline]
    pub fn objects(&self) -> &[WorldObject] {
        &self.objects
    }

    pub fn animations(&self) -> &[WallAnimation] {
        &self.animations
    }

    pub fn object(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut WorldObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn walls(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.iter().filter(|o| o.is_wall())
    }

    pub fn mirrors(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.iter().filter(|o| o.is_mirror())
    }

    pub fn receivers(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.iter().filter(|o| o.is_receiver())
    }

    pub fn light_sources(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects
            .iter()
            .filter(|o| matches!(o.kind, ObjectKind::LightSource(_)))
    }

    /// Whether `hitbox` touches any wall, mirror or receiver
    pub fn check_collisions(&self, hitbox: &Hitbox) -> bool {
        self.objects
            .iter()
            .filter(|o| o.blocks_movement())
            .any(|o| o.check_collision(hitbox))
    }

    /// Try to move the character by `delta`; rejected moves leave it in place
    pub fn try_move_character(&mut self, delta: Vec2) -> bool {
        let moved = self.character.hitbox.translated(delta);
        if self.check_collisions(&moved) {
            return false;
        }
        self.character.hitbox = moved;
        true
    }

    /// Move an object unless the result would overlap the character
    ///
    /// Returns `false` (and leaves the object untouched) when blocked or
    /// when `id` is unknown.
    pub fn move_object_if_safe(&mut self, id: ObjectId, delta: Vec2, rotate_delta: f32) -> bool {
        let hitbox = self.character.hitbox;
        let Some(object) = self.object_mut(id) else {
            return false;
        };
        let (position, rotation) = (object.position(), object.rotation());

        object.move_by(delta, rotate_delta);
        if object.blocks_movement() && object.check_collision(&hitbox) {
            object.set_pose(position, rotation);
            return false;
        }
        true
    }

    /// Closest mirror to the character whose center is within reach
    pub fn nearest_mirror_in_reach(&self, settings: &Settings) -> Option<ObjectId> {
        let player = self.character.position();
        self.mirrors()
            .map(|m| (m.distance_squared_to_center(player), m.id))
            .filter(|(dist, _)| *dist <= settings.player_reach_squared())
            .fold(None, |closest: Option<(f32, ObjectId)>, candidate| match closest {
                Some(best) if best.0 <= candidate.0 => Some(best),
                _ => Some(candidate),
            })
            .map(|(_, id)| id)
    }

    /// Advance every wall animation by one tick
    ///
    /// A wall whose next pose would overlap the character holds this tick.
    pub fn apply_animations(&mut self) {
        for index in 0..self.animations.len() {
            let animation = &self.animations[index];
            let (progress, forward) = animation.next_step();
            let target = animation.position_at(progress);
            let wall = animation.wall;

            let Some(current) = self.object(wall).map(|o| o.position()) else {
                continue;
            };
            if self.move_object_if_safe(wall, target - current, 0.0) {
                let animation = &mut self.animations[index];
                animation.progress = progress;
                animation.forward = forward;
            } else {
                log::debug!("Animated wall {:?} held by the character", wall);
            }
        }
    }

    /// Cast every light source's rays, then charge receivers
    ///
    /// All rays are traced against an unchanging object list before any
    /// charge or stored path is written, so the result does not depend on
    /// source order. Returns the absorbed ray count per receiver.
    pub fn cast_light(&mut self, settings: &Settings) -> Vec<(ObjectId, usize)> {
        let objects = &self.objects;
        let casts: Vec<(usize, Vec<TracedRay>)> = objects
            .iter()
            .enumerate()
            .filter_map(|(index, object)| {
                object
                    .as_light_source()
                    .map(|source| (index, source.cast_rays(objects, Some(object.id), settings)))
            })
            .collect();

        let mut absorbed: BTreeMap<ObjectId, usize> = BTreeMap::new();
        for (index, traced) in casts {
            for ray in &traced {
                if let Some(receiver) = ray.absorbed_by() {
                    *absorbed.entry(receiver).or_default() += 1;
                }
            }
            self.objects[index].set_traced_paths(traced);
        }

        for (&receiver, &count) in &absorbed {
            if let Some(object) = self.object_mut(receiver) {
                object.add_charge(settings.ray_energy * count as f32);
            }
        }

        absorbed.into_iter().collect()
    }

    /// Exponential charge decay for every receiver
    pub fn decay_receivers(&mut self, settings: &Settings) {
        for object in &mut self.objects {
            object.decay_charge(settings);
        }
    }

    /// Highest receiver charge, 0 without receivers
    pub fn max_charge(&self) -> f32 {
        self.receivers()
            .filter_map(|r| r.charge())
            .fold(0.0, f32::max)
    }

    /// Won once any receiver reaches the threshold
    pub fn is_complete(&self, settings: &Settings) -> bool {
        self.receivers()
            .filter_map(|r| r.charge())
            .any(|charge| charge >= settings.receiver_threshold)
    }
}

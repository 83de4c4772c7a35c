//! World objects: walls, mirrors, receivers and light sources
//!
//! Every object is a pose plus a segment outline. The outline is always
//! rebuilt from the pose as a whole, never edited segment by segment.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Hitbox, check_collision};
use super::geometry::{Segment, distance_squared, rect_outline};
use super::light::{LightSource, TracedRay};
use crate::consts::LIGHT_SOURCE_BODY_HALF_EXTENT;
use crate::normalize_angle;
use crate::settings::Settings;

/// Index of the reflective face in a mirror outline (the `+axis1` edge)
pub const MIRROR_REFLECTIVE_EDGE: usize = 2;

/// Stable identifier of an object within a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Cosmetic color tag, resolved to RGBA by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTag {
    Aquamarine,
    Blue,
    Cherry,
    Daffodil,
    Eggplant,
    Silver,
    Gold,
    Black,
}

impl ColorTag {
    /// Colors walls are randomly drawn from
    pub const WALL_PALETTE: [ColorTag; 5] = [
        ColorTag::Aquamarine,
        ColorTag::Blue,
        ColorTag::Cherry,
        ColorTag::Daffodil,
        ColorTag::Eggplant,
    ];

    pub fn random_wall_color<R: Rng>(rng: &mut R) -> Self {
        Self::WALL_PALETTE[rng.random_range(0..Self::WALL_PALETTE.len())]
    }
}

/// Variant-specific object data
#[derive(Debug, Clone)]
pub enum ObjectKind {
    Wall {
        dimensions: [u32; 2],
    },
    /// A wall outline whose `reflective_edge` bounces light
    Mirror {
        dimensions: [u32; 2],
        reflective_edge: usize,
    },
    /// Absorbs light; charge grows per ray and decays every tick
    LightReceiver {
        dimensions: [u32; 2],
        charge: f32,
    },
    LightSource(LightSource),
}

/// An object in the level
#[derive(Debug, Clone)]
pub struct WorldObject {
    pub id: ObjectId,
    pub color: ColorTag,
    pub is_interactable: bool,
    pub kind: ObjectKind,
    position: Vec2,
    rotation: f32,
    half_extents: Vec2,
    segments: Vec<Segment>,
}

impl WorldObject {
    fn build(
        id: ObjectId,
        position: Vec2,
        rotation: f32,
        half_extents: Vec2,
        color: ColorTag,
        kind: ObjectKind,
    ) -> Self {
        let mut object = Self {
            id,
            color,
            is_interactable: false,
            kind,
            position,
            rotation: normalize_angle(rotation),
            half_extents,
            segments: Vec::new(),
        };
        object.segments = object.outline();
        object
    }

    fn tile_half_extents(dimensions: [u32; 2], settings: &Settings) -> Vec2 {
        Vec2::new(dimensions[0] as f32, dimensions[1] as f32) * settings.tile_size * 0.5
    }

    /// Opaque rectangle, `dimensions` in tiles
    pub fn wall(
        id: ObjectId,
        center: Vec2,
        dimensions: [u32; 2],
        rotation: f32,
        settings: &Settings,
    ) -> Self {
        Self::build(
            id,
            center,
            rotation,
            Self::tile_half_extents(dimensions, settings),
            ColorTag::Aquamarine,
            ObjectKind::Wall { dimensions },
        )
    }

    /// Mirror facing along `rotation`; only that face reflects
    pub fn mirror(id: ObjectId, center: Vec2, rotation: f32, settings: &Settings) -> Self {
        let dimensions = settings.mirror_dimensions;
        let mut mirror = Self::build(
            id,
            center,
            rotation,
            Self::tile_half_extents(dimensions, settings),
            ColorTag::Silver,
            ObjectKind::Mirror {
                dimensions,
                reflective_edge: MIRROR_REFLECTIVE_EDGE,
            },
        );
        mirror.is_interactable = true;
        mirror
    }

    pub fn light_receiver(id: ObjectId, center: Vec2, rotation: f32, settings: &Settings) -> Self {
        let dimensions = settings.receiver_dimensions;
        Self::build(
            id,
            center,
            rotation,
            Self::tile_half_extents(dimensions, settings),
            ColorTag::Gold,
            ObjectKind::LightReceiver {
                dimensions,
                charge: 0.0,
            },
        )
    }

    /// Wrap a light source; its pose becomes the object's pose
    pub fn light_source(id: ObjectId, source: LightSource) -> Self {
        let mut object = Self::build(
            id,
            source.position(),
            source.aim(),
            Vec2::splat(LIGHT_SOURCE_BODY_HALF_EXTENT),
            ColorTag::Black,
            ObjectKind::LightSource(source),
        );
        object.set_pose(object.position, object.rotation);
        object
    }

    pub fn with_color(mut self, color: ColorTag) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Current outline, consistent with the pose
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Build a fresh outline from the current pose
    fn outline(&self) -> Vec<Segment> {
        let mut segments = rect_outline(self.position, self.half_extents, self.rotation);
        if let ObjectKind::Mirror {
            reflective_edge, ..
        } = self.kind
        {
            if let Some(face) = segments.get_mut(reflective_edge) {
                face.is_reflective = true;
            }
        }
        segments
    }

    /// Translate by `delta` and rotate by `rotate_delta` about the center
    ///
    /// The outline (and a source's ray fan) is regenerated before returning.
    pub fn move_by(&mut self, delta: Vec2, rotate_delta: f32) {
        self.set_pose(self.position + delta, self.rotation + rotate_delta);
    }

    /// Place at an absolute pose
    pub fn set_pose(&mut self, position: Vec2, rotation: f32) {
        self.position = position;
        self.rotation = normalize_angle(rotation);
        self.segments = self.outline();
        if let ObjectKind::LightSource(source) = &mut self.kind {
            source.set_pose(self.position, self.rotation);
        }
    }

    /// Whether `hitbox` touches any segment of this object
    pub fn check_collision(&self, hitbox: &Hitbox) -> bool {
        check_collision(hitbox, &self.segments)
    }

    pub fn distance_squared_to_center(&self, point: Vec2) -> f32 {
        distance_squared(self.position, point)
    }

    pub fn is_wall(&self) -> bool {
        matches!(self.kind, ObjectKind::Wall { .. })
    }

    pub fn is_mirror(&self) -> bool {
        matches!(self.kind, ObjectKind::Mirror { .. })
    }

    pub fn is_receiver(&self) -> bool {
        matches!(self.kind, ObjectKind::LightReceiver { .. })
    }

    /// Objects the player can walk into
    pub fn blocks_movement(&self) -> bool {
        !matches!(self.kind, ObjectKind::LightSource(_))
    }

    /// Receiver charge, `None` for other kinds
    pub fn charge(&self) -> Option<f32> {
        match self.kind {
            ObjectKind::LightReceiver { charge, .. } => Some(charge),
            _ => None,
        }
    }

    /// Add absorbed energy to a receiver; no-op for other kinds
    pub fn add_charge(&mut self, amount: f32) {
        if let ObjectKind::LightReceiver { charge, .. } = &mut self.kind {
            *charge += amount;
        }
    }

    /// Apply one tick of exponential decay to a receiver
    pub fn decay_charge(&mut self, settings: &Settings) {
        if let ObjectKind::LightReceiver { charge, .. } = &mut self.kind {
            *charge *= settings.charge_decay;
        }
    }

    pub fn as_light_source(&self) -> Option<&LightSource> {
        match &self.kind {
            ObjectKind::LightSource(source) => Some(source),
            _ => None,
        }
    }

    /// Widen or narrow a source's fan, turning it radial
    ///
    /// Returns `false` for objects that are not light sources.
    pub fn set_angular_spread(&mut self, angular_spread: f32) -> bool {
        let ObjectKind::LightSource(source) = &mut self.kind else {
            return false;
        };
        source.set_angular_spread(angular_spread);
        self.set_pose(self.position, self.rotation);
        true
    }

    /// Store a source's paths from the latest cast
    pub(crate) fn set_traced_paths(&mut self, traced: Vec<TracedRay>) {
        if let ObjectKind::LightSource(source) = &mut self.kind {
            source.set_traced_paths(traced);
        }
    }
}

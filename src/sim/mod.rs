//! Light simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and input handling:
//! - Single-threaded, one tick per frame
//! - Stable iteration order (object insertion order)
//! - Ray casting only reads the object list; mutations are applied after

pub mod collision;
pub mod geometry;
pub mod light;
pub mod objects;
pub mod state;
pub mod tick;

pub use collision::{Hitbox, check_collision};
pub use geometry::{Intersection, Segment, distance_squared, intersect, reflect, rect_outline};
pub use light::{LightRay, LightSource, LightSourceKind, RayTermination, TracedRay, trace_ray};
pub use objects::{ColorTag, ObjectId, ObjectKind, WorldObject};
pub use state::{Character, Level, WallAnimation};
pub use tick::{TickInput, TickReport, tick};

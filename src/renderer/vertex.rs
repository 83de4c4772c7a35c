//! Vertex types for line rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::ColorTag;

/// 2D line vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl LineVertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride of one vertex in a tightly packed buffer
    pub const STRIDE: usize = std::mem::size_of::<LineVertex>();
}

/// Colors for scene elements
pub mod colors {
    pub const AQUAMARINE: [f32; 4] = [0.5, 1.0, 0.83, 1.0];
    pub const BLUE: [f32; 4] = [0.25, 0.45, 1.0, 1.0];
    pub const CHERRY: [f32; 4] = [0.87, 0.19, 0.39, 1.0];
    pub const DAFFODIL: [f32; 4] = [1.0, 1.0, 0.19, 1.0];
    pub const EGGPLANT: [f32; 4] = [0.38, 0.25, 0.32, 1.0];
    pub const SILVER: [f32; 4] = [0.75, 0.75, 0.75, 1.0];
    pub const GOLD: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const MIRROR_FACE: [f32; 4] = [0.9, 0.95, 1.0, 1.0];
    pub const LIGHT_RAY: [f32; 4] = [1.0, 0.95, 0.6, 0.8];
    pub const CHARACTER: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
}

/// RGBA for a cosmetic color tag
pub fn tag_color(tag: ColorTag) -> [f32; 4] {
    match tag {
        ColorTag::Aquamarine => colors::AQUAMARINE,
        ColorTag::Blue => colors::BLUE,
        ColorTag::Cherry => colors::CHERRY,
        ColorTag::Daffodil => colors::DAFFODIL,
        ColorTag::Eggplant => colors::EGGPLANT,
        ColorTag::Silver => colors::SILVER,
        ColorTag::Gold => colors::GOLD,
        ColorTag::Black => colors::BLACK,
    }
}

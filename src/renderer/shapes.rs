//! Line-list generation for level contents

use glam::Vec2;

use super::vertex::{LineVertex, colors, tag_color};
use crate::settings::Settings;
use crate::sim::{Hitbox, Level, ObjectKind, Segment, WorldObject};

/// Blend `from` toward `to` by `t` in 0..=1
fn mix(from: [f32; 4], to: [f32; 4], t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    std::array::from_fn(|i| from[i] + (to[i] - from[i]) * t)
}

fn push_segment(vertices: &mut Vec<LineVertex>, start: Vec2, end: Vec2, color: [f32; 4]) {
    vertices.push(LineVertex::new(start.x, start.y, color));
    vertices.push(LineVertex::new(end.x, end.y, color));
}

/// Two vertices per segment; mirror faces get their own color
pub fn outline(segments: &[Segment], color: [f32; 4]) -> Vec<LineVertex> {
    let mut vertices = Vec::with_capacity(segments.len() * 2);
    for segment in segments {
        let color = if segment.is_reflective {
            colors::MIRROR_FACE
        } else {
            color
        };
        push_segment(&mut vertices, segment.start, segment.end, color);
    }
    vertices
}

/// Axis-aligned box outline
pub fn hitbox_outline(hitbox: &Hitbox, color: [f32; 4]) -> Vec<LineVertex> {
    let (min, max) = (hitbox.min(), hitbox.max());
    let corners = [
        min,
        Vec2::new(min.x, max.y),
        max,
        Vec2::new(max.x, min.y),
    ];

    let mut vertices = Vec::with_capacity(8);
    for i in 0..corners.len() {
        push_segment(&mut vertices, corners[i], corners[(i + 1) % corners.len()], color);
    }
    vertices
}

/// Receivers start silver and take on their own color as they charge
fn object_color(object: &WorldObject, settings: &Settings) -> [f32; 4] {
    let base = tag_color(object.color);
    match object.kind {
        ObjectKind::LightReceiver { charge, .. } if settings.receiver_threshold > 0.0 => {
            mix(colors::SILVER, base, charge / settings.receiver_threshold)
        }
        _ => base,
    }
}

/// Every outline, the character box and all traced ray paths as a line list
pub fn scene_lines(level: &Level, settings: &Settings) -> Vec<LineVertex> {
    let mut vertices = Vec::new();

    for object in level.objects() {
        vertices.extend(outline(object.segments(), object_color(object, settings)));
    }
    vertices.extend(hitbox_outline(&level.character.hitbox, colors::CHARACTER));

    for source in level.light_sources().filter_map(WorldObject::as_light_source) {
        for traced in source.traced_paths() {
            for leg in &traced.path {
                push_segment(&mut vertices, leg.start, leg.end, colors::LIGHT_RAY);
            }
        }
    }

    vertices
}

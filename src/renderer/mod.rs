//! Render output
//!
//! Flattens a level into a line-list vertex buffer. Drawing happens in
//! whatever frontend consumes the vertices.

pub mod shapes;
pub mod vertex;

pub use shapes::scene_lines;
pub use vertex::LineVertex;

//! Error types

/// Errors raised while turning a [`LevelDefinition`](crate::LevelDefinition) into a level.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LevelError {
    /// The level description is not valid JSON for the level schema.
    #[error("failed to parse level definition: {0}")]
    Parse(#[from] serde_json::Error),
    /// A wall was given zero tiles along one of its axes.
    #[error("{kind} at index {index} has empty dimensions {width}x{height}")]
    EmptyDimensions {
        kind: &'static str,
        index: usize,
        width: u32,
        height: u32,
    },
    /// A position, angle or spread is NaN or infinite.
    #[error("{kind} at index {index} has a non-finite coordinate")]
    NonFinite { kind: &'static str, index: usize },
}

/// A light ray was built with a zero-length direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("light ray direction has zero length")]
pub struct ZeroDirection;

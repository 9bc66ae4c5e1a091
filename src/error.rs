//! Errors and warnings raised while generating a dungeon layout.

use std::path::PathBuf;

use serde::Serialize;

use crate::geometry::Rectangle;

/// Geometric contract violations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// Facing edges only exist for rectangles separated along at least one axis.
    #[error("rectangles {first:?} and {second:?} overlap, so no edges face each other")]
    FacingEdgesUndefined { first: Rectangle, second: Rectangle },

    #[error("a rectangle needs at least one cell on each side, got {width}x{height}")]
    EmptyExtent { width: i32, height: i32 },

    #[error("a {width}x{height} grid exceeds the cell limit")]
    GridTooLarge { width: i64, height: i64 },
}

/// Problems loading or validating a [`GeneratorConfig`](crate::config::GeneratorConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Anything that stops a generation run.
#[derive(Debug, thiserror::Error)]
pub enum DungeonError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Rooms handed to corridor routing don't line up with the partition's leaves.
    #[error("room {index} does not belong to the partition leaf at the same position ({leaves} leaves, {rooms} rooms)")]
    LeafRoomMismatch {
        index: usize,
        leaves: usize,
        rooms: usize,
    },
}

/// Non-fatal conditions noticed during generation. The layout is still usable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum GenerationWarning {
    /// The bounds were too small to split, so the whole area became one room.
    #[error("bounds {bounds:?} are smaller than the minimum split size {min_size}; generated a single room")]
    DegenerateBounds { bounds: Rectangle, min_size: i32 },
}

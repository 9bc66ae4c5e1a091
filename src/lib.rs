//! Binary-space-partition dungeon layouts.
//!
//! A rectangle is split recursively into chunks, each leaf chunk gets a
//! randomly sized room, and rooms are joined by corridors that follow the
//! partition tree. The result is handed to a [`map::MapBuilder`].

pub mod bsp;
pub mod config;
pub mod constants;
pub mod dungeon_gen;
pub mod error;
pub mod geometry;
pub mod map;

pub use bsp::{chunkify, collect_leaves, BinaryTreeNode, Chunk, SplitDirection};
pub use config::GeneratorConfig;
pub use dungeon_gen::{
    get_corridor, join_rooms, place_rooms, Corridor, DungeonGenerator, DungeonLayout, Room,
};
pub use error::{ConfigError, DungeonError, GenerationWarning, GeometryError};
pub use geometry::{Position, Rectangle, Segment};
pub use map::{CollisionQuery, MapBuilder, TileGrid};

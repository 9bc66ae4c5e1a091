//! Dungeon generation constants.

/// Minimum width/height of a partition chunk on either side of a split
pub const DUNGEON_MIN_SPLIT_SIZE: i32 = 2;
/// Largest share of a chunk the bigger child may take (1.0 = any offset the size floor allows)
pub const DUNGEON_MAX_SPLIT_RATIO: f64 = 1.0;
/// Smallest accepted split ratio; below one half the two children would swap roles
pub const DUNGEON_MIN_SPLIT_RATIO: f64 = 0.5;
/// Default dungeon width for the command-line generator
pub const DUNGEON_DEFAULT_WIDTH: i32 = 40;
/// Default dungeon height for the command-line generator
pub const DUNGEON_DEFAULT_HEIGHT: i32 = 20;

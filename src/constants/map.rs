//! Text rendering constants for the reference tile grid.

/// Most cells a [`TileGrid`](crate::map::TileGrid) will allocate
pub const MAP_MAX_CELLS: usize = 1 << 26;

/// Glyph for a solid cell
pub const MAP_WALL_GLYPH: char = '#';
/// Glyph for a carved room cell
pub const MAP_ROOM_GLYPH: char = '.';
/// Glyph for a carved corridor cell outside any room
pub const MAP_CORRIDOR_GLYPH: char = ',';

//! The seam between the generator and whatever builds the playable map.
//!
//! The generator only hands over rectangles and position pairs through
//! [`MapBuilder`]; collision checks are answered by the map through
//! [`CollisionQuery`]. [`TileGrid`] is a small wall/floor grid implementing
//! both, used by the command-line tool and by tests.

use std::fmt;

use crate::constants::*;
use crate::error::GeometryError;
use crate::geometry::{Position, Rectangle};

/// Receives a finished layout.
pub trait MapBuilder {
    /// Make every cell of `footprint` passable
    fn carve_room(&mut self, footprint: &Rectangle);

    /// Make every cell of the straight run from `from` to `to` passable
    fn carve_corridor_run(&mut self, from: Position, to: Position);
}

/// Answers whether a position blocks movement.
pub trait CollisionQuery {
    fn is_collision(&self, position: Position) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Room,
    Corridor,
}

impl Cell {
    pub fn is_walkable(self) -> bool {
        !matches!(self, Cell::Wall)
    }

    fn glyph(self) -> char {
        match self {
            Cell::Wall => MAP_WALL_GLYPH,
            Cell::Room => MAP_ROOM_GLYPH,
            Cell::Corridor => MAP_CORRIDOR_GLYPH,
        }
    }
}

/// A dense grid of cells covering a bounding rectangle.
pub struct TileGrid {
    bounds: Rectangle,
    width: usize,
    cells: Vec<Cell>,
}

impl TileGrid {
    /// A grid of solid wall covering `bounds`
    pub fn new(bounds: Rectangle) -> Result<Self, GeometryError> {
        let len = Self::cell_count(&bounds)?;
        Ok(Self {
            bounds,
            width: (bounds.max_x() as i64 - bounds.min_x() as i64 + 1) as usize,
            cells: vec![Cell::Wall; len],
        })
    }

    /// Number of cells a grid over `bounds` would hold, or an error if that
    /// exceeds [`MAP_MAX_CELLS`]
    pub fn cell_count(bounds: &Rectangle) -> Result<usize, GeometryError> {
        let width = bounds.max_x() as i64 - bounds.min_x() as i64 + 1;
        let height = bounds.max_y() as i64 - bounds.min_y() as i64 + 1;
        let too_large = GeometryError::GridTooLarge { width, height };

        let w = usize::try_from(width).map_err(|_| too_large.clone())?;
        let h = usize::try_from(height).map_err(|_| too_large.clone())?;
        match w.checked_mul(h) {
            Some(len) if len <= MAP_MAX_CELLS => Ok(len),
            _ => Err(too_large),
        }
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn get_index(&self, p: Position) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        // Offsets fit in usize: the whole grid passed `cell_count`
        let x = (p.x as i64 - self.bounds.min_x() as i64) as usize;
        let y = (p.y as i64 - self.bounds.min_y() as i64) as usize;
        Some(y * self.width + x)
    }

    pub fn get(&self, p: Position) -> Option<Cell> {
        self.get_index(p).map(|idx| self.cells[idx])
    }

    fn set(&mut self, p: Position, cell: Cell) {
        if let Some(idx) = self.get_index(p) {
            self.cells[idx] = cell;
        }
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_walkable()).count()
    }
}

impl MapBuilder for TileGrid {
    fn carve_room(&mut self, footprint: &Rectangle) {
        for p in footprint.cells() {
            self.set(p, Cell::Room);
        }
    }

    fn carve_corridor_run(&mut self, from: Position, to: Position) {
        // A run is a single rectangle one cell wide or tall
        for p in Rectangle::new(from, to).cells() {
            // Corridors don't overwrite room floor
            if self.get(p) == Some(Cell::Wall) {
                self.set(p, Cell::Corridor);
            }
        }
    }
}

impl CollisionQuery for TileGrid {
    fn is_collision(&self, position: Position) -> bool {
        !self.get(position).is_some_and(Cell::is_walkable)
    }
}

/// Renders the grid with the top row (largest `y`) first.
impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (self.bounds.min_y()..=self.bounds.max_y()).rev() {
            for x in self.bounds.min_x()..=self.bounds.max_x() {
                let cell = self.get(Position::new(x, y)).unwrap_or(Cell::Wall);
                write!(f, "{}", cell.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

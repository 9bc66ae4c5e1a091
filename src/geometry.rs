//! Grid geometry: positions, directed segments and axis-aligned rectangles.
//!
//! The grid is Cartesian: `y` grows upward, so the "top" of a rectangle is its
//! largest `y` and the "bottom" is its smallest. All sizes are cell-inclusive.

use std::ops::{Add, Sub};

use rand::Rng;
use serde::Serialize;

use crate::error::GeometryError;

/// A cell on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, the number of orthogonal steps between two cells
    pub fn manhattan_distance(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Self) -> Self::Output {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Self) -> Self::Output {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

impl From<glam::IVec2> for Position {
    fn from(v: glam::IVec2) -> Self {
        Position::new(v.x, v.y)
    }
}

impl From<Position> for glam::IVec2 {
    fn from(p: Position) -> Self {
        glam::IVec2::new(p.x, p.y)
    }
}

/// A directed edge from `start` to `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Segment {
    pub start: Position,
    pub end: Position,
}

impl Segment {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.start.x == self.end.x || self.start.y == self.end.y
    }

    /// Middle cell of the segment. Rounds toward negative infinity so the
    /// result always lands on the segment's cells.
    pub fn midpoint(&self) -> Position {
        Position::new(
            (self.start.x + self.end.x).div_euclid(2),
            (self.start.y + self.end.y).div_euclid(2),
        )
    }

    /// Number of cells covered, endpoints included (axis-aligned segments only)
    pub fn length(&self) -> i32 {
        self.start.manhattan_distance(self.end) + 1
    }

    /// Check if a cell lies on this segment. Only meaningful for
    /// axis-aligned segments; diagonal segments contain only their endpoints.
    pub fn contains(&self, p: Position) -> bool {
        if !self.is_axis_aligned() {
            return p == self.start || p == self.end;
        }
        let (min_x, max_x) = (self.start.x.min(self.end.x), self.start.x.max(self.end.x));
        let (min_y, max_y) = (self.start.y.min(self.end.y), self.start.y.max(self.end.y));
        p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y
    }
}

/// An axis-aligned rectangle of grid cells.
///
/// Stored normalized, so any two opposite corners given in any order produce
/// the same rectangle. Never narrower or shorter than one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rectangle {
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

impl Rectangle {
    /// Build a rectangle from any two opposite corners
    pub fn new(a: Position, b: Position) -> Self {
        Self {
            min_x: a.x.min(b.x),
            max_x: a.x.max(b.x),
            min_y: a.y.min(b.y),
            max_y: a.y.max(b.y),
        }
    }

    /// Build a rectangle extending right and up from its lowest corner.
    /// Returns `None` for a width or height below one cell.
    pub fn with_size(min_corner: Position, width: i32, height: i32) -> Option<Self> {
        if width < 1 || height < 1 {
            return None;
        }
        Some(Self {
            min_x: min_corner.x,
            max_x: min_corner.x + width - 1,
            min_y: min_corner.y,
            max_y: min_corner.y + height - 1,
        })
    }

    /// Like [`Rectangle::with_size`], but reports an empty extent as an error
    pub fn try_with_size(min_corner: Position, width: i32, height: i32) -> Result<Self, GeometryError> {
        Self::with_size(min_corner, width, height).ok_or(GeometryError::EmptyExtent { width, height })
    }

    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    pub fn top_left(&self) -> Position {
        Position::new(self.min_x, self.max_y)
    }

    pub fn bottom_right(&self) -> Position {
        Position::new(self.max_x, self.min_y)
    }

    pub fn bottom_left(&self) -> Position {
        Position::new(self.min_x, self.min_y)
    }

    pub fn top_right(&self) -> Position {
        Position::new(self.max_x, self.max_y)
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min_x + self.max_x).div_euclid(2),
            (self.min_y + self.max_y).div_euclid(2),
        )
    }

    /// The four boundary edges, starting at the bottom-left corner:
    /// bottom, right, top, left. Each edge ends where the next one starts.
    pub fn edges(&self) -> [Segment; 4] {
        let bottom_left = self.bottom_left();
        let bottom_right = self.bottom_right();
        let top_right = self.top_right();
        let top_left = self.top_left();
        [
            Segment::new(bottom_left, bottom_right),
            Segment::new(bottom_right, top_right),
            Segment::new(top_right, top_left),
            Segment::new(top_left, bottom_left),
        ]
    }

    /// Check if a cell is inside this rectangle, boundary included
    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Check if `other` fits entirely inside this rectangle; shared edges are allowed
    pub fn contains_rect(&self, other: &Rectangle) -> bool {
        self.contains(other.top_left()) && self.contains(other.bottom_right())
    }

    /// Check if a cell is inside this rectangle and on one of its edges
    pub fn on_boundary(&self, p: Position) -> bool {
        self.contains(p)
            && (p.x == self.min_x || p.x == self.max_x || p.y == self.min_y || p.y == self.max_y)
    }

    /// Check if the two rectangles share at least one cell
    pub fn overlaps(&self, other: &Rectangle) -> bool {
        self.x_overlap(other) >= 1 && self.y_overlap(other) >= 1
    }

    /// Check if the two rectangles sit directly next to each other, with
    /// genuine overlap on one axis and a zero-cell gap on the other.
    /// Diagonal corner contact does not count.
    pub fn touching(&self, other: &Rectangle) -> bool {
        (self.y_overlap(other) >= 1 && self.x_adjacent(other))
            || (self.x_overlap(other) >= 1 && self.y_adjacent(other))
    }

    /// The pair of edges (ours first, theirs second) that face each other
    /// across the gap between two non-overlapping rectangles.
    pub fn facing_edges(&self, other: &Rectangle) -> Result<(Segment, Segment), GeometryError> {
        let ours = self.edges();
        let theirs = other.edges();
        const BOTTOM: usize = 0;
        const RIGHT: usize = 1;
        const TOP: usize = 2;
        const LEFT: usize = 3;

        if self.x_overlap(other) == 0 {
            // Side by side
            if self.max_x < other.min_x {
                Ok((ours[RIGHT], theirs[LEFT]))
            } else {
                Ok((ours[LEFT], theirs[RIGHT]))
            }
        } else if self.y_overlap(other) == 0 {
            // Stacked
            if self.max_y < other.min_y {
                Ok((ours[TOP], theirs[BOTTOM]))
            } else {
                Ok((ours[BOTTOM], theirs[TOP]))
            }
        } else {
            Err(GeometryError::FacingEdgesUndefined {
                first: *self,
                second: *other,
            })
        }
    }

    /// Every cell of the rectangle, bottom row first, left to right
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (self.min_y..=self.max_y)
            .flat_map(move |y| (self.min_x..=self.max_x).map(move |x| Position::new(x, y)))
    }

    /// Build a randomly sized rectangle placed uniformly inside `bounds`.
    ///
    /// Width is drawn from `1..=bounds.width()` and height from
    /// `1..=bounds.height()`, then the position is drawn so the result never
    /// leaves `bounds`.
    pub fn build_random_rectangle(bounds: &Rectangle, rng: &mut impl Rng) -> Rectangle {
        let width = rng.gen_range(1..=bounds.width());
        let height = rng.gen_range(1..=bounds.height());

        let x = rng.gen_range(bounds.min_x..=bounds.max_x - width + 1);
        let y = rng.gen_range(bounds.min_y..=bounds.max_y - height + 1);

        Rectangle {
            min_x: x,
            max_x: x + width - 1,
            min_y: y,
            max_y: y + height - 1,
        }
    }

    fn x_overlap(&self, other: &Rectangle) -> i32 {
        overlap_length(self.min_x, self.max_x, other.min_x, other.max_x)
    }

    fn y_overlap(&self, other: &Rectangle) -> i32 {
        overlap_length(self.min_y, self.max_y, other.min_y, other.max_y)
    }

    fn x_adjacent(&self, other: &Rectangle) -> bool {
        is_adjacent(self.min_x, self.max_x, other.min_x, other.max_x)
    }

    fn y_adjacent(&self, other: &Rectangle) -> bool {
        is_adjacent(self.min_y, self.max_y, other.min_y, other.max_y)
    }
}

/// Shared cell count of two inclusive ranges
fn overlap_length(a_min: i32, a_max: i32, b_min: i32, b_max: i32) -> i32 {
    (a_max.min(b_max) - a_min.max(b_min) + 1).max(0)
}

/// Two inclusive ranges are disjoint with no gap between them
fn is_adjacent(a_min: i32, a_max: i32, b_min: i32, b_max: i32) -> bool {
    a_min.max(b_min) - a_max.min(b_max) - 1 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Rectangle {
        Rectangle::new(Position::new(x0, y0), Position::new(x1, y1))
    }

    fn sized(x: i32, y: i32, width: i32, height: i32) -> Rectangle {
        Rectangle::with_size(Position::new(x, y), width, height).unwrap()
    }

    #[test]
    fn test_position_arithmetic() {
        let a = Position::new(3, 4);
        let b = Position::new(1, -2);
        assert_eq!(a + b, Position::new(4, 2));
        assert_eq!(a - b, Position::new(2, 6));
        assert_eq!(a.manhattan_distance(b), 8);
        assert_eq!(Position::from((3, 4)), a);
        assert_eq!(Position::from(glam::IVec2::from(a)), a);
    }

    #[test]
    fn test_constructor_initializes_corners_and_size() {
        let r = rect(0, 0, 4, 4);
        assert_eq!(r.top_left(), Position::new(0, 4));
        assert_eq!(r.bottom_right(), Position::new(4, 0));
        assert_eq!(r.width(), 5);
        assert_eq!(r.height(), 5);
    }

    #[test]
    fn test_edges_run_bottom_right_top_left() {
        let edges = rect(0, 0, 4, 4).edges();
        assert_eq!(
            edges,
            [
                Segment::new(Position::new(0, 0), Position::new(4, 0)),
                Segment::new(Position::new(4, 0), Position::new(4, 4)),
                Segment::new(Position::new(4, 4), Position::new(0, 4)),
                Segment::new(Position::new(0, 4), Position::new(0, 0)),
            ]
        );
    }

    #[test]
    fn test_with_size() {
        let r = sized(0, 0, 5, 5);
        assert_eq!(r.bottom_left(), Position::new(0, 0));
        assert_eq!(r.top_right(), Position::new(4, 4));
        assert!(Rectangle::with_size(Position::new(0, 0), 0, 3).is_none());
        assert_eq!(
            Rectangle::try_with_size(Position::new(0, 0), 2, -1),
            Err(GeometryError::EmptyExtent { width: 2, height: -1 })
        );
    }

    #[test]
    fn test_any_corner_order_normalizes() {
        // Top-right, bottom-left
        let r = rect(3, 1, 1, 4);
        assert_eq!(r.top_left(), Position::new(1, 4));
        assert_eq!(r.bottom_right(), Position::new(3, 1));

        // Top-left, bottom-right given backwards
        let r = rect(2, 2, 1, 1);
        assert_eq!(r.top_left(), Position::new(1, 2));
        assert_eq!(r.bottom_right(), Position::new(2, 1));

        // Width of one
        let r = rect(4, 4, 4, 1);
        assert_eq!(r.width(), 1);
        assert_eq!(r.height(), 4);

        // Height of one
        let r = rect(4, 3, 1, 3);
        assert_eq!(r.width(), 4);
        assert_eq!(r.height(), 1);
    }

    #[test]
    fn test_contains_position_including_edges() {
        let r = sized(1, 1, 5, 4);
        assert!(r.contains(Position::new(2, 3)));
        assert!(r.contains(Position::new(1, 1)));
        assert!(r.contains(Position::new(5, 1)));
        assert!(r.contains(Position::new(1, 4)));
        assert!(r.contains(Position::new(5, 4)));
    }

    #[test]
    fn test_contains_position_outside() {
        let r = sized(1, 1, 5, 4);
        assert!(!r.contains(Position::new(0, 0)));
        assert!(!r.contains(Position::new(0, 1)));
        assert!(!r.contains(Position::new(6, 1)));
        assert!(!r.contains(Position::new(1, 5)));
        assert!(!r.contains(Position::new(5, 6)));
    }

    #[test]
    fn test_contains_rect_nested_or_edge_sharing() {
        let r = sized(1, 1, 5, 4);
        assert!(r.contains_rect(&sized(2, 2, 2, 1)));
        assert!(r.contains_rect(&sized(1, 1, 2, 1)));
        assert!(r.contains_rect(&sized(3, 1, 2, 1)));
        assert!(r.contains_rect(&sized(3, 4, 2, 1)));
        assert!(r.contains_rect(&sized(1, 4, 2, 1)));
        assert!(r.contains_rect(&r));
    }

    #[test]
    fn test_contains_rect_partially_or_fully_outside() {
        let r = sized(1, 1, 5, 4);
        assert!(!r.contains_rect(&sized(0, 1, 2, 1)));
        assert!(!r.contains_rect(&sized(5, 1, 2, 1)));
        assert!(!r.contains_rect(&sized(1, 4, 2, 2)));
        assert!(!r.contains_rect(&sized(5, 4, 2, 2)));
        assert!(!r.contains_rect(&sized(7, 7, 2, 1)));
        assert!(!r.contains_rect(&sized(0, 0, 7, 7)));
    }

    #[test]
    fn test_touching_along_whole_edge() {
        let left = rect(0, 0, 4, 4);
        let right = rect(5, 0, 9, 4);
        assert!(left.touching(&right));
        assert!(right.touching(&left));

        let above = rect(0, 5, 4, 9);
        let below = rect(0, 0, 4, 4);
        assert!(above.touching(&below));
        assert!(below.touching(&above));
    }

    #[test]
    fn test_touching_at_one_cell_of_an_edge() {
        let first = rect(0, 8, 4, 4);
        let second = rect(5, 0, 5, 4);
        assert!(first.touching(&second));
        assert!(second.touching(&first));

        let first = rect(5, 8, 9, 4);
        let second = rect(0, 0, 4, 4);
        assert!(first.touching(&second));
        assert!(second.touching(&first));
    }

    #[test]
    fn test_diagonal_corners_are_not_touching() {
        let first = rect(0, 9, 4, 5);
        let second = rect(5, 0, 9, 4);
        assert!(!first.touching(&second));
        assert!(!second.touching(&first));

        let first = rect(5, 9, 9, 5);
        let second = rect(0, 0, 4, 4);
        assert!(!first.touching(&second));
        assert!(!second.touching(&first));
    }

    #[test]
    fn test_separated_rectangles_are_not_touching() {
        let first = rect(0, 0, 4, 4);
        let second = rect(6, 0, 10, 4);
        assert!(!first.touching(&second));
        assert!(!second.touching(&first));

        let first = rect(0, 6, 4, 10);
        let second = rect(0, 0, 4, 4);
        assert!(!first.touching(&second));
        assert!(!second.touching(&first));
    }

    #[test]
    fn test_overlapping_rectangles_are_not_touching() {
        let first = rect(0, 0, 4, 4);
        let second = rect(3, 3, 6, 6);
        assert!(first.overlaps(&second));
        assert!(!first.touching(&second));
    }

    #[test]
    fn test_facing_edges_side_by_side() {
        let first = rect(0, 0, 2, 4);
        let second = rect(5, 0, 5, 2);

        let (ours, theirs) = first.facing_edges(&second).unwrap();
        assert_eq!(ours, Segment::new(Position::new(2, 0), Position::new(2, 4)));
        assert_eq!(theirs, Segment::new(Position::new(5, 2), Position::new(5, 0)));

        let (ours, theirs) = second.facing_edges(&first).unwrap();
        assert_eq!(ours, Segment::new(Position::new(5, 2), Position::new(5, 0)));
        assert_eq!(theirs, Segment::new(Position::new(2, 0), Position::new(2, 4)));
    }

    #[test]
    fn test_facing_edges_stacked() {
        let lower = rect(0, 0, 4, 1);
        let upper = rect(2, 4, 6, 6);

        let (ours, theirs) = lower.facing_edges(&upper).unwrap();
        assert_eq!(ours, Segment::new(Position::new(4, 1), Position::new(0, 1)));
        assert_eq!(theirs, Segment::new(Position::new(2, 4), Position::new(6, 4)));
    }

    #[test]
    fn test_facing_edges_diagonal_prefers_horizontal_separation() {
        let first = rect(0, 2, 4, 4);
        let second = rect(5, 0, 8, 1);
        let (ours, theirs) = first.facing_edges(&second).unwrap();
        assert_eq!(ours.start.x, 4);
        assert_eq!(ours.end.x, 4);
        assert_eq!(theirs.start.x, 5);
        assert_eq!(theirs.end.x, 5);
    }

    #[test]
    fn test_facing_edges_undefined_for_overlap() {
        let first = rect(0, 0, 4, 4);
        let second = rect(2, 2, 6, 6);
        assert!(matches!(
            first.facing_edges(&second),
            Err(GeometryError::FacingEdgesUndefined { .. })
        ));
    }

    #[test]
    fn test_segment_midpoint_and_contains() {
        let s = Segment::new(Position::new(4, 4), Position::new(4, -1));
        assert_eq!(s.midpoint(), Position::new(4, 1));
        assert!(s.contains(s.midpoint()));
        assert!(s.contains(Position::new(4, -1)));
        assert!(!s.contains(Position::new(4, 5)));
        assert_eq!(s.length(), 6);
    }

    #[test]
    fn test_cells_cover_area() {
        let r = rect(-1, 2, 2, 4);
        let cells: Vec<Position> = r.cells().collect();
        assert_eq!(cells.len() as i64, r.area());
        assert_eq!(cells[0], r.bottom_left());
        assert_eq!(*cells.last().unwrap(), r.top_right());
        assert!(cells.iter().all(|&p| r.contains(p)));
    }

    #[test]
    fn test_on_boundary() {
        let r = rect(0, 0, 4, 4);
        assert!(r.on_boundary(Position::new(0, 2)));
        assert!(r.on_boundary(Position::new(4, 4)));
        assert!(!r.on_boundary(Position::new(2, 2)));
        assert!(!r.on_boundary(Position::new(5, 2)));
    }

    #[test]
    fn test_build_random_rectangle_stays_in_bounds() {
        let bounds = sized(0, 0, 5, 4);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        for _ in 0..200 {
            let r = Rectangle::build_random_rectangle(&bounds, &mut rng);
            assert!(r.width() >= 1 && r.width() <= 5);
            assert!(r.height() >= 1 && r.height() <= 4);
            assert!(bounds.contains_rect(&r));
        }
    }

    #[test]
    fn test_build_random_rectangle_single_cell_bounds() {
        let bounds = sized(3, 3, 1, 1);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert_eq!(Rectangle::build_random_rectangle(&bounds, &mut rng), bounds);
    }

    proptest! {
        #[test]
        fn prop_corner_order_independent(
            x0 in -50i32..50, y0 in -50i32..50, x1 in -50i32..50, y1 in -50i32..50,
        ) {
            let reference = rect(x0, y0, x1, y1);
            for r in [rect(x1, y1, x0, y0), rect(x0, y1, x1, y0), rect(x1, y0, x0, y1)] {
                prop_assert_eq!(r.top_left(), reference.top_left());
                prop_assert_eq!(r.bottom_right(), reference.bottom_right());
            }
            prop_assert_eq!(reference.width(), reference.max_x() - reference.min_x() + 1);
            prop_assert_eq!(reference.height(), reference.max_y() - reference.min_y() + 1);
        }

        #[test]
        fn prop_edges_form_closed_loop(
            x0 in -50i32..50, y0 in -50i32..50, x1 in -50i32..50, y1 in -50i32..50,
        ) {
            let r = rect(x0, y0, x1, y1);
            let edges = r.edges();
            prop_assert_eq!(edges[0].start, r.bottom_left());
            for i in 0..4 {
                prop_assert_eq!(edges[i].end, edges[(i + 1) % 4].start);
                prop_assert!(edges[i].is_axis_aligned());
            }
        }

        #[test]
        fn prop_boundary_cells_contained(
            x0 in -20i32..20, y0 in -20i32..20, w in 1i32..10, h in 1i32..10,
        ) {
            let r = sized(x0, y0, w, h);
            for edge in r.edges() {
                prop_assert!(r.contains(edge.start));
                prop_assert!(r.contains(edge.midpoint()));
                prop_assert!(r.on_boundary(edge.midpoint()));
            }
            prop_assert!(!r.contains(Position::new(r.min_x() - 1, r.min_y())));
            prop_assert!(!r.contains(Position::new(r.max_x() + 1, r.max_y())));
            prop_assert!(!r.contains(Position::new(r.min_x(), r.min_y() - 1)));
            prop_assert!(!r.contains(Position::new(r.max_x(), r.max_y() + 1)));
        }
    }
}

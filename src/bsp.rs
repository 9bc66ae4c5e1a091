//! Binary space partitioning of a rectangular area into chunks.
//!
//! A [`Chunk`] knows how to cut itself in two. [`chunkify`] keeps cutting,
//! depth-first, until no chunk can be split without going under the size
//! floor, and records the result as a [`BinaryTreeNode`] tree.

use std::ops::RangeInclusive;

use log::trace;
use rand::Rng;
use serde::Serialize;

use crate::config::GeneratorConfig;
use crate::geometry::{Position, Rectangle};

/// A node of a binary tree that has either no children or exactly two.
///
/// Children are owned by their parent; there is no upward or shared link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BinaryTreeNode<T> {
    value: T,
    children: Option<Box<[BinaryTreeNode<T>; 2]>>,
}

impl<T> BinaryTreeNode<T> {
    pub fn leaf(value: T) -> Self {
        Self {
            value,
            children: None,
        }
    }

    pub fn branch(value: T, left: BinaryTreeNode<T>, right: BinaryTreeNode<T>) -> Self {
        Self {
            value,
            children: Some(Box::new([left, right])),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn left(&self) -> Option<&BinaryTreeNode<T>> {
        self.children.as_deref().map(|[left, _]| left)
    }

    pub fn right(&self) -> Option<&BinaryTreeNode<T>> {
        self.children.as_deref().map(|[_, right]| right)
    }

    /// Both children at once, or `None` for a leaf
    pub fn children(&self) -> Option<(&BinaryTreeNode<T>, &BinaryTreeNode<T>)> {
        self.children.as_deref().map(|[left, right]| (left, right))
    }

    /// Leaf values in depth-first, left-then-right order
    pub fn leaves(&self) -> Leaves<'_, T> {
        Leaves { stack: vec![self] }
    }

    /// The left-most leaf of this subtree
    pub fn first_leaf(&self) -> &T {
        let mut node = self;
        while let Some(left) = node.left() {
            node = left;
        }
        &node.value
    }

    /// Total number of nodes, this one included
    pub fn node_count(&self) -> usize {
        match self.children() {
            Some((left, right)) => 1 + left.node_count() + right.node_count(),
            None => 1,
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Number of levels; a lone leaf has depth 1
    pub fn depth(&self) -> usize {
        match self.children() {
            Some((left, right)) => 1 + left.depth().max(right.depth()),
            None => 1,
        }
    }
}

/// Iterator over the leaf values of a [`BinaryTreeNode`].
pub struct Leaves<'a, T> {
    stack: Vec<&'a BinaryTreeNode<T>>,
}

impl<'a, T> Iterator for Leaves<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node.children() {
                Some((left, right)) => {
                    // Right goes on first so left comes off first
                    self.stack.push(right);
                    self.stack.push(left);
                }
                None => return Some(&node.value),
            }
        }
        None
    }
}

/// Orientation of the cut line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SplitDirection {
    /// Horizontal cut: children are the bottom part then the top part
    Horizontal,
    /// Vertical cut: children are the left part then the right part
    Vertical,
}

impl SplitDirection {
    pub fn other(self) -> Self {
        match self {
            SplitDirection::Horizontal => SplitDirection::Vertical,
            SplitDirection::Vertical => SplitDirection::Horizontal,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            SplitDirection::Horizontal
        } else {
            SplitDirection::Vertical
        }
    }
}

/// A rectangular region of the partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Chunk {
    pub bounds: Rectangle,
}

impl Chunk {
    pub fn new(bounds: Rectangle) -> Self {
        Self { bounds }
    }

    /// Size of the chunk across the cut, i.e. the extent being divided
    fn extent(&self, direction: SplitDirection) -> i32 {
        match direction {
            SplitDirection::Horizontal => self.bounds.height(),
            SplitDirection::Vertical => self.bounds.width(),
        }
    }

    /// Offsets a split along `direction` may use so both children keep at
    /// least `min_size` cells and neither takes more than `max_ratio` of the
    /// extent. `None` if no offset qualifies.
    pub fn split_offsets(
        &self,
        direction: SplitDirection,
        min_size: i32,
        max_ratio: f64,
    ) -> Option<RangeInclusive<i32>> {
        let extent = self.extent(direction);
        let ratio_lo = (extent as f64 * (1.0 - max_ratio)).ceil() as i32;
        let ratio_hi = (extent as f64 * max_ratio).floor() as i32;

        let lo = min_size.max(ratio_lo);
        let hi = (extent - min_size).min(ratio_hi);
        (lo <= hi).then_some(lo..=hi)
    }

    /// Check if both sides of the chunk are at least `min_size` cells
    pub fn fits(&self, min_size: i32) -> bool {
        self.bounds.width() >= min_size && self.bounds.height() >= min_size
    }

    /// Cut the chunk in two. `offset` is the size of the first child along
    /// the split axis. Returns `None` if either child would be smaller than
    /// `min_size` on either axis.
    pub fn split(&self, direction: SplitDirection, offset: i32, min_size: i32) -> Option<[Chunk; 2]> {
        let extent = self.extent(direction);
        if !self.fits(min_size) || offset < min_size || extent - offset < min_size {
            return None;
        }

        let b = &self.bounds;
        let (first, second) = match direction {
            SplitDirection::Horizontal => {
                let cut = b.min_y() + offset;
                (
                    Rectangle::new(b.bottom_left(), Position::new(b.max_x(), cut - 1)),
                    Rectangle::new(Position::new(b.min_x(), cut), b.top_right()),
                )
            }
            SplitDirection::Vertical => {
                let cut = b.min_x() + offset;
                (
                    Rectangle::new(b.bottom_left(), Position::new(cut - 1, b.max_y())),
                    Rectangle::new(Position::new(cut, b.min_y()), b.top_right()),
                )
            }
        };
        Some([Chunk::new(first), Chunk::new(second)])
    }

    /// Split in a random direction at a random offset. Falls back to the
    /// other direction when the chosen one has no room. A chunk already
    /// under the size floor on either axis never splits.
    pub fn split_randomly(&self, config: &GeneratorConfig, rng: &mut impl Rng) -> Option<[Chunk; 2]> {
        if !self.fits(config.min_split_size) {
            return None;
        }
        let preferred = SplitDirection::random(rng);
        for direction in [preferred, preferred.other()] {
            if let Some(offsets) =
                self.split_offsets(direction, config.min_split_size, config.max_split_ratio)
            {
                let offset = rng.gen_range(offsets);
                trace!("splitting {:?} {:?} at offset {}", self.bounds, direction, offset);
                return self.split(direction, offset, config.min_split_size);
            }
        }
        None
    }
}

/// Recursively partition `initial_chunk`, depth-first, left then right.
///
/// Splitting stops on a branch once its chunk cannot be cut without leaving a
/// side under `config.min_split_size`.
pub fn chunkify(
    initial_chunk: Chunk,
    config: &GeneratorConfig,
    rng: &mut impl Rng,
) -> BinaryTreeNode<Chunk> {
    puffin::profile_function!();
    chunk_from(initial_chunk, config, rng)
}

fn chunk_from(chunk: Chunk, config: &GeneratorConfig, rng: &mut impl Rng) -> BinaryTreeNode<Chunk> {
    match chunk.split_randomly(config, rng) {
        Some([first, second]) => {
            let left = chunk_from(first, config, rng);
            let right = chunk_from(second, config, rng);
            BinaryTreeNode::branch(chunk, left, right)
        }
        None => BinaryTreeNode::leaf(chunk),
    }
}

/// All leaf chunks, depth-first, left then right
pub fn collect_leaves(tree: &BinaryTreeNode<Chunk>) -> Vec<Chunk> {
    tree.leaves().copied().collect()
}

use log::{debug, trace, warn};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;

use crate::bsp::{chunkify, collect_leaves, BinaryTreeNode, Chunk};
use crate::config::GeneratorConfig;
use crate::error::{DungeonError, GenerationWarning, GeometryError};
use crate::geometry::{Position, Rectangle};
use crate::map::{MapBuilder, TileGrid};

/// A room carved inside one leaf chunk of the partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Room {
    pub chunk: Chunk,
    /// The room's own rectangle; always inside `chunk.bounds`
    pub footprint: Rectangle,
}

impl Room {
    pub fn new(chunk: Chunk, footprint: Rectangle) -> Self {
        debug_assert!(chunk.bounds.contains_rect(&footprint));
        Self { chunk, footprint }
    }
}

/// A passage between two rooms that don't touch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Corridor {
    pub first: Room,
    pub second: Room,
    /// Corners of the passage, from the boundary of `first` to the boundary
    /// of `second`. Consecutive positions differ along one axis only.
    pub path: Vec<Position>,
}

impl Corridor {
    /// Straight runs between consecutive path positions
    pub fn runs(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.path.windows(2).map(|w| (w[0], w[1]))
    }

    /// Every cell the corridor passes through, in order, each listed once
    pub fn cells(&self) -> Vec<Position> {
        let mut cells: Vec<Position> = self.path.first().copied().into_iter().collect();
        for (from, to) in self.runs() {
            let step = Position::new((to.x - from.x).signum(), (to.y - from.y).signum());
            let mut p = from;
            while p != to {
                p = p + step;
                cells.push(p);
            }
        }
        cells
    }
}

/// Everything one generation run produces.
#[derive(Clone, Debug, Serialize)]
pub struct DungeonLayout {
    pub bounds: Rectangle,
    pub seed: u64,
    pub tree: BinaryTreeNode<Chunk>,
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    pub warnings: Vec<GenerationWarning>,
}

impl DungeonLayout {
    /// Hand rooms and corridor runs to a map builder
    pub fn build_into(&self, builder: &mut impl MapBuilder) {
        for room in &self.rooms {
            builder.carve_room(&room.footprint);
        }
        for corridor in &self.corridors {
            for (from, to) in corridor.runs() {
                builder.carve_corridor_run(from, to);
            }
        }
    }

    /// Rasterize the layout onto a wall/floor grid covering its bounds
    pub fn to_tile_grid(&self) -> Result<TileGrid, GeometryError> {
        let mut grid = TileGrid::new(self.bounds)?;
        self.build_into(&mut grid);
        Ok(grid)
    }
}

/// Place one randomly sized room in each chunk, keeping the chunk order.
pub fn place_rooms(chunks: &[Chunk], rng: &mut impl Rng) -> Vec<Room> {
    puffin::profile_function!();
    chunks
        .iter()
        .map(|chunk| Room::new(*chunk, Rectangle::build_random_rectangle(&chunk.bounds, rng)))
        .collect()
}

/// Connect two rooms with an L-shaped corridor between the midpoints of
/// their facing edges. Returns `None` if the rooms already touch.
pub fn get_corridor(first: &Room, second: &Room) -> Result<Option<Corridor>, GeometryError> {
    if first.footprint.touching(&second.footprint) {
        return Ok(None);
    }

    let (first_edge, second_edge) = first.footprint.facing_edges(&second.footprint)?;
    let start = first_edge.midpoint();
    let end = second_edge.midpoint();

    // Walk along the separation axis first, then across it
    let (a, b) = (&first.footprint, &second.footprint);
    let side_by_side = a.max_x() < b.min_x() || b.max_x() < a.min_x();
    let bend = if side_by_side {
        Position::new(end.x, start.y)
    } else {
        Position::new(start.x, end.y)
    };

    let mut path = vec![start, bend, end];
    path.dedup();

    trace!("corridor {:?} -> {:?} via {:?}", start, end, bend);
    Ok(Some(Corridor {
        first: *first,
        second: *second,
        path,
    }))
}

/// Connect rooms following the partition tree, bottom-up.
///
/// `rooms` must hold one room per leaf of `tree`, in leaf order (as produced
/// by [`place_rooms`] over [`collect_leaves`]). At every internal node the
/// first room of the left subtree is joined to the first room of the right
/// subtree, so the result spans all rooms with at most `rooms.len() - 1`
/// corridors; pairs that already touch need none.
pub fn join_rooms(tree: &BinaryTreeNode<Chunk>, rooms: &[Room]) -> Result<Vec<Corridor>, DungeonError> {
    puffin::profile_function!();

    let leaves = tree.leaf_count();
    if leaves != rooms.len() {
        return Err(DungeonError::LeafRoomMismatch {
            index: leaves.min(rooms.len()),
            leaves,
            rooms: rooms.len(),
        });
    }

    let corridors = Vec::with_capacity(rooms.len().saturating_sub(1));
    let mut joiner = RoomJoiner {
        rooms,
        next: 0,
        corridors,
    };
    joiner.connect(tree)?;
    Ok(joiner.corridors)
}

/// Walk state for [`join_rooms`]: rooms are consumed in leaf order.
struct RoomJoiner<'a> {
    rooms: &'a [Room],
    next: usize,
    corridors: Vec<Corridor>,
}

impl RoomJoiner<'_> {
    /// Returns the index of the subtree's representative room.
    fn connect(&mut self, node: &BinaryTreeNode<Chunk>) -> Result<usize, DungeonError> {
        let Some((left, right)) = node.children() else {
            let index = self.next;
            if self.rooms[index].chunk != *node.value() {
                return Err(DungeonError::LeafRoomMismatch {
                    index,
                    leaves: self.rooms.len(),
                    rooms: self.rooms.len(),
                });
            }
            self.next += 1;
            return Ok(index);
        };

        let left_room = self.connect(left)?;
        let right_room = self.connect(right)?;

        if let Some(corridor) = get_corridor(&self.rooms[left_room], &self.rooms[right_room])? {
            self.corridors.push(corridor);
        }
        Ok(left_room)
    }
}

/// Runs the whole pipeline: partition, rooms, corridors.
pub struct DungeonGenerator {
    config: GeneratorConfig,
    seed: u64,
    rng: Xoshiro256PlusPlus,
}

impl DungeonGenerator {
    /// Create a generator. Without a configured seed one is drawn at random;
    /// [`DungeonGenerator::seed`] reports it so the run can be replayed.
    pub fn new(config: GeneratorConfig) -> Result<Self, DungeonError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            seed,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a layout filling `bounds`.
    ///
    /// Successive calls continue the same random stream, so a generator
    /// yields a reproducible sequence of different levels.
    pub fn generate(&mut self, bounds: Rectangle) -> Result<DungeonLayout, DungeonError> {
        puffin::profile_function!();
        let root = Chunk::new(bounds);
        let min_size = self.config.min_split_size;

        if bounds.width() < min_size || bounds.height() < min_size {
            let warning = GenerationWarning::DegenerateBounds { bounds, min_size };
            warn!("{warning}");
            return Ok(DungeonLayout {
                bounds,
                seed: self.seed,
                tree: BinaryTreeNode::leaf(root),
                rooms: vec![Room::new(root, bounds)],
                corridors: Vec::new(),
                warnings: vec![warning],
            });
        }

        let tree = chunkify(root, &self.config, &mut self.rng);
        let chunks = collect_leaves(&tree);
        debug!(
            "partitioned {}x{} into {} chunks, depth {}",
            bounds.width(),
            bounds.height(),
            chunks.len(),
            tree.depth()
        );

        let rooms = place_rooms(&chunks, &mut self.rng);
        let corridors = join_rooms(&tree, &rooms)?;
        debug!("placed {} rooms joined by {} corridors", rooms.len(), corridors.len());

        Ok(DungeonLayout {
            bounds,
            seed: self.seed,
            tree,
            rooms,
            corridors,
            warnings: Vec::new(),
        })
    }
}

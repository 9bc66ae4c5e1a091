//! Generator constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.

mod dungeon;
mod map;

pub use dungeon::*;
pub use map::*;

//! World kernel: the static tile grid, level loading, player movement with
//! collision, and the per-tick simulation session.
//!
//! # Invariants
//! - The grid is immutable after construction and shared by `Arc`.
//! - Every grid read goes through a bounds-checked query.
//! - A simulation step is a pure function of (grid, pose, intent, movement).

pub mod grid;
pub mod level;
pub mod movement;
pub mod world;

pub use grid::{Cell, CellQuery, Grid, GridError, Legend};
pub use level::{Level, LevelError, Spawn};
pub use movement::{MoveOutcome, Movement, Translation};
pub use world::{IntentStream, World, WorldEvent, splitmix64};

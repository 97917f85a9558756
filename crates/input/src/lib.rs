//! Input mapping: key names to actions, held actions to per-tick intents.
//!
//! # Invariants
//! - The simulation only ever receives a [`tilecast_common::MoveIntent`]
//!   snapshot, sampled once per tick.
//! - Key names are backend-neutral strings; no window-system types cross this
//!   crate's API.

pub mod action;
pub mod bindings;

pub use action::{Action, ActionState};
pub use bindings::{InputError, KeyBindings};

pub fn crate_info() -> &'static str {
    "tilecast-input v0.1.0"
}

//! Developer tooling: frame inspector and minimap geometry.
//!
//! # Invariants
//! - Tools are read-only over world and frame state.
//! - Tools are first-class and tested where possible.

pub mod inspector;
pub mod minimap;

pub use inspector::{FrameInspector, FrameSummary, RayInfo};
pub use minimap::{MinimapCell, MinimapLayout, ascii_minimap};

pub fn crate_info() -> &'static str {
    "tilecast-tools v0.1.0"
}

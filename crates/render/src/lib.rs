//! Raycaster and projector: turns (grid, pose) into one vertical [`Slice`] per
//! ray, and renderers that consume those slices.
//!
//! # Invariants
//! - A frame is exactly `ray_count` slices, ordered left to right by ray index.
//! - Casting is a pure function of grid and pose; serial and parallel casts
//!   produce identical frames.
//! - Every grid read goes through the kernel's bounds-checked query.
//! - Renderers never mutate world truth.

pub mod caster;
pub mod framebuffer;
pub mod projection;
pub mod raycaster;
pub mod renderer;
pub mod shading;
pub mod slice;

pub use caster::{Hit, MarchLimits, MissReason, RayOutcome, WallFace, cast_ray};
pub use framebuffer::Framebuffer;
pub use projection::{DEPTH_EPSILON, Projection};
pub use raycaster::{Frame, Raycaster};
pub use renderer::{DebugTextRenderer, Renderer, SoftwareRenderer};
pub use shading::{AxisShade, CheckerShade, ShadeStrategy, TexturedShade, strategy_for};
pub use slice::{Slice, SliceFill, frame_hash};

pub fn crate_info() -> &'static str {
    "tilecast-render v0.1.0"
}

//! wgpu presentation backend.
//!
//! Uploads the CPU-rasterized frame into a texture and blits it to the
//! surface as a letterboxed quad.
//!
//! # Invariants
//! - The presenter never mutates world state or slices.
//! - Frame size and surface size are independent; the blit letterboxes.

mod gpu;
mod shaders;

pub use gpu::{FRAME_FORMAT, WgpuPresenter, letterbox_scale};
pub use shaders::PRESENT_SHADER;

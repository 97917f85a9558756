//! Shared types for the tilecast workspace: pose, tile coordinates, move intents,
//! colours and the engine configuration.
//!
//! # Invariants
//! - Headings handed out by this crate are always in [0, 2π).
//! - Configuration is validated once at startup and never reloaded.

pub mod config;
pub mod types;

pub use config::{CollisionPolicy, ConfigError, EngineConfig, MissPolicy, ShadingMode};
pub use types::{MoveIntent, Pose, Rgb, TileCoord, normalize_angle};

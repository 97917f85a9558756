//! Engine configuration, loaded once from YAML at startup.

use crate::types::Rgb;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound on samples per ray, `max_depth / march_step`.
pub const MAX_MARCH_SAMPLES: f32 = 1_000_000.0;

/// How movement treats the destination tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Reject translation into `Wall` or `OutOfBounds` tiles.
    #[default]
    Strict,
    /// Walk through walls, but never off the grid.
    Ghost,
}

/// Colour-selection scheme for wall slices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    /// One colour for faces crossed along x, another for faces crossed along y.
    #[default]
    Axis,
    /// Alternate colours by `(tile_x + tile_y) mod 2`.
    Checker,
    /// Texture per face axis, sampled at the hit fraction.
    Textured,
}

/// What a ray that finds no wall produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissPolicy {
    /// A zero-height slice with nothing to draw.
    #[default]
    Blank,
    /// A fog-coloured slice projected at `max_depth`.
    FarWall,
}

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Build-time/init-time constants of the renderer. Not reloadable at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    /// Total horizontal field of view.
    pub fov_degrees: f32,
    pub ray_count: u32,
    /// Rays give up once they have travelled this far (world units).
    pub max_depth: f32,
    /// March increment in world units.
    pub march_step: f32,
    /// World units per tick.
    pub move_speed: f32,
    /// Radians per tick.
    pub rotation_speed: f32,
    /// Simulation ticks per second in the desktop driver.
    pub tick_hz: f32,
    pub collision: CollisionPolicy,
    pub shading: ShadingMode,
    pub miss: MissPolicy,
    /// Cast the ray fan on the rayon pool.
    pub parallel: bool,
    pub background: Rgb,
    pub fog: Rgb,
    /// `[x-face, y-face]` colours for axis shading, `[even, odd]` for checker.
    pub wall_colors: [Rgb; 2],
    /// `[x-face, y-face]` texture names for textured shading.
    pub wall_textures: [String; 2],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            fov_degrees: 60.0,
            ray_count: 120,
            max_depth: 800.0,
            march_step: 1.0,
            move_speed: 5.0,
            rotation_speed: 0.05,
            tick_hz: 60.0,
            collision: CollisionPolicy::Strict,
            shading: ShadingMode::Axis,
            miss: MissPolicy::Blank,
            parallel: true,
            background: Rgb::new(135, 206, 235),
            fog: Rgb::new(40, 40, 48),
            wall_colors: [Rgb::new(200, 0, 0), Rgb::new(0, 200, 0)],
            wall_textures: ["brick".into(), "stone".into()],
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };
        if self.screen_width == 0 {
            return invalid("screen_width", "must be at least 1");
        }
        if self.screen_height == 0 {
            return invalid("screen_height", "must be at least 1");
        }
        if self.ray_count == 0 {
            return invalid("ray_count", "must be at least 1");
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return invalid("fov_degrees", "must be inside (0, 180)");
        }
        if !(self.max_depth.is_finite() && self.max_depth > 0.0) {
            return invalid("max_depth", "must be a positive number");
        }
        if !(self.march_step.is_finite() && self.march_step > 0.0) {
            return invalid("march_step", "must be a positive number");
        }
        if self.max_depth / self.march_step > MAX_MARCH_SAMPLES {
            return invalid("march_step", "too small for max_depth");
        }
        if !self.move_speed.is_finite() || !self.rotation_speed.is_finite() {
            return invalid("move_speed", "speeds must be finite");
        }
        if !(self.tick_hz.is_finite() && self.tick_hz > 0.0) {
            return invalid("tick_hz", "must be a positive number");
        }
        Ok(())
    }

    pub fn fov(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    pub fn half_fov(&self) -> f32 {
        0.5 * self.fov()
    }

    /// Tile edge length for a grid of `grid_width` columns: screen width divided
    /// by grid width, integer division, never below 1.
    pub fn tile_size_for(&self, grid_width: usize) -> f32 {
        let width = grid_width.max(1) as u32;
        (self.screen_width / width).max(1) as f32
    }

    /// Distance from the eye to the projection plane, in pixels.
    pub fn plane_distance(&self) -> f32 {
        (self.screen_width as f32 / 2.0) / self.half_fov().tan()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_hz as f64)
    }
}

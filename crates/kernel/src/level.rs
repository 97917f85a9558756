//! Level definitions: grid rows, legend and player spawn, loaded from YAML or
//! plain text.

use crate::grid::{CellQuery, Grid, GridError, Legend};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tilecast_common::{EngineConfig, Pose, TileCoord};

/// Player spawn in tile units (fractional values place the player inside a tile).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub heading_degrees: f32,
}

impl Spawn {
    pub fn tile(&self) -> TileCoord {
        TileCoord::new(self.x.floor() as i32, self.y.floor() as i32)
    }
}

/// Errors from loading a level file.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("failed to read level {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid level: {0}")]
    Grid(#[from] GridError),
}

/// A level as authored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub rows: Vec<String>,
    #[serde(default)]
    pub legend: Legend,
    /// Defaults to the centre of the first empty tile, facing +x.
    #[serde(default)]
    pub spawn: Option<Spawn>,
}

const CLASSIC_ROWS: [&str; 8] = [
    "11111111", "10001001", "10101001", "10000001", "10000001", "10101001", "10000001",
    "11111111",
];

impl Level {
    /// The 8×8 reference map, player at tile corner (3, 3) heading π/2.
    pub fn classic() -> Self {
        Self {
            name: "classic".into(),
            rows: CLASSIC_ROWS.iter().map(|r| r.to_string()).collect(),
            legend: Legend::default(),
            spawn: Some(Spawn {
                x: 3.0,
                y: 3.0,
                heading_degrees: 90.0,
            }),
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, LevelError> {
        let level: Self = serde_yaml::from_str(text)?;
        level.validate()?;
        Ok(level)
    }

    /// Plain rows of symbols, one row per non-blank line, default legend.
    pub fn from_text(name: impl Into<String>, text: &str) -> Result<Self, LevelError> {
        let rows: Vec<String> = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        let level = Self {
            name: name.into(),
            rows,
            legend: Legend::default(),
            spawn: None,
        };
        level.validate()?;
        Ok(level)
    }

    /// Load a level file. `.yaml`/`.yml` files are parsed as YAML documents,
    /// anything else as plain rows.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let level = if is_yaml {
            Self::from_yaml_str(&text)?
        } else {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("level");
            Self::from_text(name, &text)?
        };
        tracing::info!(
            name = %level.name,
            width = level.width(),
            height = level.rows.len(),
            "loaded level"
        );
        Ok(level)
    }

    /// Number of columns, taken from the first row.
    pub fn width(&self) -> usize {
        self.rows.first().map(|r| r.chars().count()).unwrap_or(0)
    }

    /// Check the grid and spawn without keeping the result.
    pub fn validate(&self) -> Result<(), GridError> {
        self.build(1.0).map(|_| ())
    }

    /// Build the grid with the given tile edge and resolve the spawn pose.
    pub fn build(&self, tile_size: f32) -> Result<(Grid, Pose), GridError> {
        let grid = Grid::from_rows(&self.rows, &self.legend, tile_size)?;
        let pose = match self.spawn {
            Some(spawn) => {
                let tile = spawn.tile();
                match grid.query(tile) {
                    CellQuery::Empty => {}
                    CellQuery::Wall => return Err(GridError::SpawnBlocked(tile)),
                    CellQuery::OutOfBounds => return Err(GridError::SpawnOutOfBounds(tile)),
                }
                Pose::new(
                    spawn.x * tile_size,
                    spawn.y * tile_size,
                    spawn.heading_degrees.to_radians(),
                )
            }
            None => {
                let tile = grid.first_empty().ok_or(GridError::SpawnBlocked(TileCoord::new(0, 0)))?;
                let centre = grid.tile_center(tile);
                Pose::new(centre.x, centre.y, 0.0)
            }
        };
        Ok((grid, pose))
    }

    /// Build with the tile edge derived from the configured screen width.
    pub fn build_for(&self, config: &EngineConfig) -> Result<(Grid, Pose), GridError> {
        self.build(config.tile_size_for(self.width()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;
    use std::io::Write;

    #[test]
    fn classic_builds_with_reference_tile() {
        let level = Level::classic();
        let (grid, pose) = level.build_for(&EngineConfig::default()).unwrap();
        assert_eq!(grid.tile_size(), 100.0);
        assert_eq!(grid.width(), 8);
        assert_eq!(pose.position, glam::Vec2::new(300.0, 300.0));
        assert!((pose.heading - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn yaml_level_with_legend_and_spawn() {
        let yaml = r######"
name: hall
legend:
  wall: "#"
  empty: "."
rows:
  - "#####"
  - "#...#"
  - "#####"
spawn:
  x: 2.5
  y: 1.5
  heading_degrees: 180
"######;
        let level = Level::from_yaml_str(yaml).unwrap();
        let (grid, pose) = level.build(10.0).unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(pose.position, glam::Vec2::new(25.0, 15.0));
        assert!((pose.heading - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn spawn_in_wall_rejected() {
        let yaml = "name: bad\nrows: ['111', '101', '111']\nspawn: { x: 0.5, y: 0.5 }\n";
        let err = Level::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(
            err,
            LevelError::Grid(GridError::SpawnBlocked(TileCoord { x: 0, y: 0 }))
        ));
    }

    #[test]
    fn spawn_outside_rejected() {
        let yaml = "name: bad\nrows: ['000']\nspawn: { x: 5.0, y: 0.0 }\n";
        let err = Level::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(
            err,
            LevelError::Grid(GridError::SpawnOutOfBounds(_))
        ));
    }

    #[test]
    fn text_level_defaults_spawn_to_first_empty() {
        let level = Level::from_text("t", "111\n101\n111\n").unwrap();
        let (grid, pose) = level.build(4.0).unwrap();
        assert_eq!(pose.position, grid.tile_center(TileCoord::new(1, 1)));
        assert_eq!(pose.heading, 0.0);
    }

    #[test]
    fn all_walls_has_nowhere_to_spawn() {
        assert!(Level::from_text("t", "11\n11").is_err());
    }

    #[test]
    fn ragged_text_fails_at_load() {
        let err = Level::from_text("t", "111\n10\n111").unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn load_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let text_path = dir.path().join("box.txt");
        std::fs::write(&text_path, "1111\n1001\n1111\n").unwrap();
        let level = Level::load(&text_path).unwrap();
        assert_eq!(level.name, "box");

        let yaml_path = dir.path().join("box.yaml");
        let mut f = std::fs::File::create(&yaml_path).unwrap();
        writeln!(f, "name: yaml-box\nrows: ['111', '101', '111']").unwrap();
        assert_eq!(Level::load(&yaml_path).unwrap().name, "yaml-box");
    }
}

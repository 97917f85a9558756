use crate::grid::{CellQuery, Grid};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilecast_common::{CollisionPolicy, EngineConfig, MoveIntent, Pose, TileCoord, normalize_angle};

/// What happened to the translational part of a move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Translation {
    /// No net forward/backward intent.
    Idle,
    Moved { from: Vec2, to: Vec2 },
    /// Destination tile was not enterable; position unchanged.
    Blocked { target: TileCoord, cell: CellQuery },
}

/// Result of applying one tick of intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    pub pose: Pose,
    pub translation: Translation,
    pub turned: bool,
}

/// Per-tick movement model.
///
/// Collision looks at the destination tile only. A step longer than a wall is
/// thick can pass straight through it; keep `speed` below the tile edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    /// World units per tick.
    pub speed: f32,
    /// Radians per tick.
    pub turn_speed: f32,
    pub collision: CollisionPolicy,
}

impl Default for Movement {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Movement {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            speed: config.move_speed,
            turn_speed: config.rotation_speed,
            collision: config.collision,
        }
    }

    /// Apply one tick of intent to `pose`.
    ///
    /// Translation uses the heading from before this tick's turn. Rotation is
    /// applied unconditionally and wrapped into [0, 2π).
    pub fn apply(&self, grid: &Grid, pose: Pose, intent: MoveIntent) -> MoveOutcome {
        let mut next = pose;

        let sign = intent.translation_sign();
        let translation = if sign == 0.0 {
            Translation::Idle
        } else {
            let step = self.speed * sign;
            let candidate = Vec2::new(
                pose.position.x + step * pose.heading.cos(),
                pose.position.y + step * pose.heading.sin(),
            );
            let target = grid.tile_of(candidate);
            let cell = grid.query(target);
            let allowed = match self.collision {
                CollisionPolicy::Strict => cell.is_passable(),
                CollisionPolicy::Ghost => !matches!(cell, CellQuery::OutOfBounds),
            };
            if allowed {
                next.position = candidate;
                Translation::Moved {
                    from: pose.position,
                    to: candidate,
                }
            } else {
                tracing::trace!(%target, ?cell, "move blocked");
                Translation::Blocked { target, cell }
            }
        };

        let turn = intent.turn_sign();
        let turned = turn != 0.0;
        if turned {
            next.heading = normalize_angle(pose.heading + turn * self.turn_speed);
        }

        MoveOutcome {
            pose: next,
            translation,
            turned,
        }
    }
}

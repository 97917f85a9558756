use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilecast_common::{Pose, TileCoord, normalize_angle};
use tilecast_kernel::{CellQuery, Grid};

/// Side of a wall tile a ray struck. North is the low-y side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallFace {
    West,
    East,
    North,
    South,
}

impl WallFace {
    /// True for faces crossed while travelling along x (West/East).
    pub fn is_x_face(self) -> bool {
        matches!(self, Self::West | Self::East)
    }
}

/// A ray's first wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub tile: TileCoord,
    /// Euclidean distance travelled along the ray.
    pub raw_depth: f32,
    /// Distance projected onto the view direction.
    pub corrected_depth: f32,
    pub point: Vec2,
    pub face: WallFace,
    /// Position along the struck face, in [0, 1).
    pub fraction: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissReason {
    /// Travelled `max_depth` without meeting a wall.
    MaxDepth,
    /// Walked off the grid.
    LeftGrid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayOutcome {
    Hit(Hit),
    Miss(MissReason),
}

impl RayOutcome {
    pub fn hit(&self) -> Option<&Hit> {
        match self {
            Self::Hit(hit) => Some(hit),
            Self::Miss(_) => None,
        }
    }
}

/// How far and how finely rays march.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchLimits {
    pub step: f32,
    pub max_depth: f32,
}

impl Default for MarchLimits {
    fn default() -> Self {
        Self {
            step: 1.0,
            max_depth: 800.0,
        }
    }
}

/// March one ray from `pose` at `offset` radians from the heading.
///
/// Samples depths `k * step` for k = 1, 2, … while the depth is below
/// `max_depth`. Depths are computed by multiplication so long rays do not
/// accumulate rounding. A ray that starts outside the grid keeps marching
/// until it enters; only leaving the grid after being inside ends it early.
pub fn cast_ray(grid: &Grid, pose: &Pose, offset: f32, limits: MarchLimits) -> RayOutcome {
    let angle = normalize_angle(pose.heading + offset);
    let dir = Vec2::new(angle.cos(), angle.sin());
    let origin = pose.position;

    let samples = (limits.max_depth / limits.step).ceil();
    if !(samples.is_finite() && samples >= 1.0) {
        return RayOutcome::Miss(MissReason::MaxDepth);
    }
    let mut inside = grid.query_point(origin) != CellQuery::OutOfBounds;

    for k in 1..=samples as u64 {
        let depth = k as f32 * limits.step;
        if !(depth < limits.max_depth) {
            break;
        }
        let point = origin + dir * depth;
        let tile = grid.tile_of(point);
        match grid.query(tile) {
            CellQuery::Empty => inside = true,
            CellQuery::Wall => {
                let (face, fraction) = face_at(point, tile, grid.tile_size());
                return RayOutcome::Hit(Hit {
                    tile,
                    raw_depth: depth,
                    corrected_depth: depth * offset.cos(),
                    point,
                    face,
                    fraction,
                });
            }
            CellQuery::OutOfBounds if inside => return RayOutcome::Miss(MissReason::LeftGrid),
            CellQuery::OutOfBounds => {}
        }
    }
    RayOutcome::Miss(MissReason::MaxDepth)
}

/// Classify the struck face by the nearest gridline to the hit point, and
/// measure the position along it. Corners count as x-faces.
fn face_at(point: Vec2, tile: TileCoord, tile_size: f32) -> (WallFace, f32) {
    let local_x = point.x - tile.x as f32 * tile_size;
    let local_y = point.y - tile.y as f32 * tile_size;
    let to_vertical = local_x.min(tile_size - local_x);
    let to_horizontal = local_y.min(tile_size - local_y);

    let (face, along) = if to_vertical <= to_horizontal {
        let face = if local_x < tile_size - local_x {
            WallFace::West
        } else {
            WallFace::East
        };
        (face, local_y)
    } else {
        let face = if local_y < tile_size - local_y {
            WallFace::North
        } else {
            WallFace::South
        };
        (face, local_x)
    };
    let fraction = (along / tile_size).clamp(0.0, 1.0 - f32::EPSILON);
    (face, fraction)
}

use crate::caster::{MarchLimits, RayOutcome, cast_ray};
use crate::projection::Projection;
use crate::shading::{ShadeStrategy, strategy_for};
use crate::slice::{Slice, SliceFill};
use rayon::prelude::*;
use std::sync::Arc;
use tilecast_assets::{AssetError, TextureStore};
use tilecast_common::{EngineConfig, MissPolicy, Pose, Rgb};
use tilecast_kernel::{Grid, World};

/// One frame's render input: the slices plus the state they were cast from.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub tick: u64,
    pub pose: Pose,
    pub slices: Vec<Slice>,
}

/// Casts the ray fan and projects each ray into a [`Slice`].
///
/// A frame is a pure function of (grid, pose): casting twice, or serially
/// and in parallel, yields identical slices.
#[derive(Debug, Clone)]
pub struct Raycaster {
    projection: Projection,
    limits: MarchLimits,
    miss: MissPolicy,
    fog: Rgb,
    parallel: bool,
    shade: Arc<dyn ShadeStrategy>,
}

impl Raycaster {
    pub fn new(config: &EngineConfig, shade: Arc<dyn ShadeStrategy>) -> Self {
        Self {
            projection: Projection::from_config(config),
            limits: MarchLimits {
                step: config.march_step,
                max_depth: config.max_depth,
            },
            miss: config.miss,
            fog: config.fog,
            parallel: config.parallel,
            shade,
        }
    }

    /// Build with the shading strategy named in `config`.
    pub fn from_config(config: &EngineConfig, textures: &TextureStore) -> Result<Self, AssetError> {
        let shade = strategy_for(config, textures)?;
        Ok(Self::new(config, Arc::from(shade)))
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn ray_count(&self) -> u32 {
        self.projection.ray_count
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Exactly `ray_count` slices, ordered by ray index.
    pub fn cast_frame(&self, grid: &Grid, pose: &Pose) -> Vec<Slice> {
        let _span = tracing::trace_span!(
            "cast_frame",
            rays = self.ray_count(),
            parallel = self.parallel
        )
        .entered();
        let n = self.ray_count();
        if self.parallel {
            (0..n)
                .into_par_iter()
                .map(|i| self.cast_column(grid, pose, i))
                .collect()
        } else {
            (0..n).map(|i| self.cast_column(grid, pose, i)).collect()
        }
    }

    /// Cast the current state of `world`.
    pub fn frame(&self, world: &World) -> Frame {
        let pose = world.pose();
        Frame {
            tick: world.tick(),
            pose,
            slices: self.cast_frame(world.grid(), &pose),
        }
    }

    /// Cast and project ray `index`.
    pub fn cast_column(&self, grid: &Grid, pose: &Pose, index: u32) -> Slice {
        let p = &self.projection;
        let (x_start, x_end) = p.band(index);
        let offset = p.ray_offset(index);

        match cast_ray(grid, pose, offset, self.limits) {
            RayOutcome::Hit(hit) => {
                let height = p.wall_height(grid.tile_size(), hit.corrected_depth);
                let (top, bottom) = p.vertical_span(height);
                Slice {
                    column: index,
                    x_start,
                    x_end,
                    top,
                    bottom,
                    height,
                    depth: hit.corrected_depth,
                    fill: self.shade.shade(&hit),
                    hit: Some(hit),
                }
            }
            RayOutcome::Miss(_) => {
                let depth = self.limits.max_depth;
                let (height, fill) = match self.miss {
                    MissPolicy::Blank => (0.0, SliceFill::Blank),
                    MissPolicy::FarWall => (
                        p.wall_height(grid.tile_size(), depth),
                        SliceFill::Solid(self.fog),
                    ),
                };
                let (top, bottom) = p.vertical_span(height);
                Slice {
                    column: index,
                    x_start,
                    x_end,
                    top,
                    bottom,
                    height,
                    depth,
                    hit: None,
                    fill,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caster::WallFace;
    use crate::slice::frame_hash;
    use tilecast_common::{ShadingMode, TileCoord};
    use tilecast_kernel::Level;

    fn caster(config: &EngineConfig) -> Raycaster {
        Raycaster::from_config(config, &TextureStore::builtin()).unwrap()
    }

    fn ring() -> Grid {
        Grid::walled(8, 8, 100.0).unwrap()
    }

    #[test]
    fn emits_one_slice_per_ray_in_order() {
        let config = EngineConfig::default();
        let slices = caster(&config).cast_frame(&ring(), &Pose::new(400.0, 400.0, 0.0));
        assert_eq!(slices.len(), 120);
        for (i, s) in slices.iter().enumerate() {
            assert_eq!(s.column, i as u32);
        }
        assert_eq!(slices[0].x_start, 0);
        assert_eq!(slices[119].x_end, 800);
    }

    #[test]
    fn centre_ray_hits_east_wall() {
        let config = EngineConfig::default();
        let pose = Pose::new(400.0, 400.0, 0.0);
        let slices = caster(&config).cast_frame(&ring(), &pose);
        let centre = &slices[60];
        let hit = centre.hit.unwrap();
        assert_eq!(hit.tile.x, 7);
        assert!((hit.raw_depth - 300.0).abs() <= 1.0);
        assert_eq!(hit.corrected_depth, hit.raw_depth);
        assert_eq!(hit.face, WallFace::West);
        assert_eq!(centre.fill, SliceFill::Solid(config.wall_colors[0]));
        let expected = 100.0 * config.plane_distance() / (300.0 + 1e-4);
        assert!((centre.height - expected).abs() < 1e-2);
    }

    #[test]
    fn repeated_casts_are_identical() {
        let config = EngineConfig::default();
        let rc = caster(&config);
        let (grid, pose) = Level::classic().build_for(&config).unwrap();
        let a = rc.cast_frame(&grid, &pose);
        let b = rc.cast_frame(&grid, &pose);
        assert_eq!(a, b);
        assert_eq!(frame_hash(&a), frame_hash(&b));
    }

    #[test]
    fn serial_equals_parallel() {
        let config = EngineConfig {
            shading: ShadingMode::Textured,
            ..EngineConfig::default()
        };
        let (grid, _) = Level::classic().build_for(&config).unwrap();
        let rc = caster(&config);
        for heading in [0.0, 0.7, 2.0, 3.3, 5.9] {
            let pose = Pose::new(350.0, 420.0, heading);
            let serial = rc.clone().with_parallel(false).cast_frame(&grid, &pose);
            let parallel = rc.clone().with_parallel(true).cast_frame(&grid, &pose);
            assert_eq!(serial, parallel);
        }
    }

    #[test]
    fn single_ray_sits_on_heading() {
        let config = EngineConfig {
            ray_count: 1,
            ..EngineConfig::default()
        };
        let slices = caster(&config).cast_frame(&ring(), &Pose::new(400.0, 450.0, 0.0));
        assert_eq!(slices.len(), 1);
        let hit = slices[0].hit.unwrap();
        assert_eq!(hit.tile, TileCoord::new(7, 4));
        assert_eq!(hit.corrected_depth, hit.raw_depth);
        assert_eq!((slices[0].x_start, slices[0].x_end), (0, 800));
    }

    #[test]
    fn open_grid_misses_are_blank() {
        let config = EngineConfig::default();
        let grid = Grid::open(100, 100, 100.0).unwrap();
        let slices = caster(&config).cast_frame(&grid, &Pose::new(5000.0, 5000.0, 1.0));
        assert_eq!(slices.len(), 120);
        assert!(slices.iter().all(|s| s.hit.is_none() && s.is_blank()));
        assert!(slices.iter().all(|s| s.height == 0.0 && s.depth == 800.0));
    }

    #[test]
    fn far_wall_policy_draws_fog() {
        let config = EngineConfig {
            miss: MissPolicy::FarWall,
            ..EngineConfig::default()
        };
        let grid = Grid::open(100, 100, 100.0).unwrap();
        let slices = caster(&config).cast_frame(&grid, &Pose::new(5000.0, 5000.0, 1.0));
        let s = slices[10];
        assert_eq!(s.fill, SliceFill::Solid(config.fog));
        let expected = 100.0 * config.plane_distance() / (800.0 + 1e-4);
        assert!((s.height - expected).abs() < 1e-3);
    }

    #[test]
    fn each_slice_uses_its_own_hit() {
        let config = EngineConfig {
            shading: ShadingMode::Textured,
            ..EngineConfig::default()
        };
        let (grid, pose) = Level::classic().build_for(&config).unwrap();
        let slices = caster(&config).cast_frame(&grid, &pose);
        let us: Vec<f32> = slices
            .iter()
            .filter_map(|s| match s.fill {
                SliceFill::Texture { u, .. } => Some(u),
                _ => None,
            })
            .collect();
        assert_eq!(us.len(), 120);
        for (s, u) in slices.iter().zip(&us) {
            assert_eq!(s.hit.unwrap().fraction, *u);
        }
        assert!(us.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn frame_reads_world_state() {
        let config = EngineConfig::default();
        let (grid, pose) = Level::classic().build_for(&config).unwrap();
        let world = World::new(grid, pose);
        let frame = caster(&config).frame(&world);
        assert_eq!(frame.tick, 0);
        assert_eq!(frame.pose, pose);
        assert_eq!(frame.slices.len(), 120);
    }
}

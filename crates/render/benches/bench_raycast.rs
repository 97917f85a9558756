use std::hint::black_box;
use std::sync::Arc;
use std::time::Instant;

use tilecast_assets::TextureStore;
use tilecast_common::{EngineConfig, Pose, ShadingMode};
use tilecast_kernel::{Grid, Level};
use tilecast_render::{Raycaster, Renderer, SoftwareRenderer};

fn bench_cast(label: &str, config: &EngineConfig, grid: &Grid, pose: Pose, iterations: usize) {
    let caster = Raycaster::from_config(config, &TextureStore::builtin()).unwrap();

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(caster.cast_frame(black_box(grid), black_box(&pose)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  {label} ({} rays, parallel={}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        config.ray_count, config.parallel
    );
}

fn bench_rasterize(config: &EngineConfig, iterations: usize) {
    let (grid, pose) = Level::classic().build_for(config).unwrap();
    let textures = Arc::new(TextureStore::builtin());
    let caster = Raycaster::from_config(config, &textures).unwrap();
    let slices = caster.cast_frame(&grid, &pose);
    let frame = tilecast_render::Frame {
        tick: 0,
        pose,
        slices,
    };
    let mut renderer = SoftwareRenderer::new(config, textures);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(renderer.render(black_box(&frame)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  rasterize ({:?}, {}x{}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        config.shading, config.screen_width, config.screen_height
    );
}

fn main() {
    println!("=== Raycast Benchmarks ===\n");

    let base = EngineConfig::default();
    let (classic, spawn) = Level::classic().build_for(&base).unwrap();
    let open = Grid::walled(64, 64, 100.0).unwrap();
    let open_pose = Pose::new(3200.0, 3200.0, 0.3);

    println!("Classic level:");
    for (rays, parallel) in [(120, false), (120, true), (800, false), (800, true)] {
        let config = EngineConfig {
            ray_count: rays,
            parallel,
            ..base.clone()
        };
        bench_cast("classic", &config, &classic, spawn, 1000);
    }

    println!("\nOpen arena (rays run to max depth):");
    for parallel in [false, true] {
        let config = EngineConfig {
            ray_count: 800,
            parallel,
            ..base.clone()
        };
        bench_cast("open", &config, &open, open_pose, 200);
    }

    println!("\nRasterize:");
    bench_rasterize(&base, 500);
    bench_rasterize(
        &EngineConfig {
            shading: ShadingMode::Textured,
            ..base.clone()
        },
        500,
    );

    println!("\n=== Done ===");
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tilecast_assets::TextureStore;
use tilecast_common::{EngineConfig, MoveIntent};
use tilecast_kernel::{IntentStream, Level, Movement, World};
use tilecast_render::{DebugTextRenderer, Raycaster, Renderer, frame_hash};
use tilecast_tools::{FrameInspector, ascii_minimap};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilecast-cli", about = "CLI tool for tilecast levels and frames")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Engine config (YAML); defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Load a level and check its grid and spawn
    Validate {
        /// Level file (.yaml, or plain rows of 0/1)
        level: PathBuf,
    },
    /// Run a movement script headlessly and print the resulting frame
    Render {
        /// Level file; the built-in classic map when omitted
        #[arg(short, long)]
        level: Option<PathBuf>,
        /// Texture catalog (JSON)
        #[arg(long)]
        textures: Option<PathBuf>,
        /// One tick per character: w forward, s back, a left, d right, . idle
        #[arg(short, long, default_value = "")]
        script: String,
        /// Total ticks; the script repeats to fill them
        #[arg(short, long)]
        ticks: Option<u64>,
        /// Text rows in the ASCII frame
        #[arg(short, long, default_value = "24")]
        rows: u32,
        /// Also print details of this ray
        #[arg(long)]
        ray: Option<u32>,
    },
    /// Run seeded pseudo-random input, replay it, and compare the results
    Replay {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "300")]
        ticks: u64,
        /// Seed for the intent stream
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Level file; the built-in classic map when omitted
        #[arg(short, long)]
        level: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            EngineConfig::load(path).with_context(|| format!("loading config {}", path.display()))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn load_level(path: Option<&Path>) -> Result<Level> {
    match path {
        Some(path) => {
            Level::load(path).with_context(|| format!("loading level {}", path.display()))
        }
        None => Ok(Level::classic()),
    }
}

/// Parse a movement script into one intent per tick.
fn parse_script(script: &str) -> Result<Vec<MoveIntent>> {
    script
        .chars()
        .filter(|c| !c.is_whitespace())
        .enumerate()
        .map(|(i, c)| {
            MoveIntent::from_script_char(c)
                .with_context(|| format!("script step {i}: unknown command {c:?}"))
        })
        .collect()
}

/// The intents for `ticks` ticks, cycling the script. An empty script idles.
fn expand_script(script: &[MoveIntent], ticks: Option<u64>) -> Vec<MoveIntent> {
    match ticks {
        None => script.to_vec(),
        Some(n) if script.is_empty() => vec![MoveIntent::IDLE; n as usize],
        Some(n) => script.iter().copied().cycle().take(n as usize).collect(),
    }
}

fn info() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "tilecast-cli v{}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(out, "render: {}", tilecast_render::crate_info());
    let _ = writeln!(out, "tools: {}", tilecast_tools::crate_info());
    let _ = writeln!(out, "input: {}", tilecast_input::crate_info());
    let _ = writeln!(out, "assets: {}", tilecast_assets::crate_info());
    out
}

fn validate(config: &EngineConfig, level: &Level) -> Result<String> {
    let (grid, spawn) = level
        .build_for(config)
        .with_context(|| format!("level {} is invalid", level.name))?;
    Ok(format!(
        "{}: {}x{} tiles, tile size {}, {} walls, spawn ({:.1}, {:.1}) heading {:.1}deg\n{}",
        level.name,
        grid.width(),
        grid.height(),
        grid.tile_size(),
        grid.wall_count(),
        spawn.position.x,
        spawn.position.y,
        spawn.heading.to_degrees(),
        ascii_minimap(&grid, &spawn),
    ))
}

struct RenderRequest<'a> {
    script: &'a [MoveIntent],
    rows: u32,
    ray: Option<u32>,
}

fn render(
    config: &EngineConfig,
    level: &Level,
    textures: &TextureStore,
    request: &RenderRequest<'_>,
) -> Result<String> {
    let (grid, spawn) = level.build_for(config)?;
    let raycaster = Raycaster::from_config(config, textures).context("resolving wall shading")?;
    let movement = Movement::from_config(config);
    let mut world = World::new(grid, spawn);
    for intent in request.script {
        world.step(*intent, &movement);
    }

    let frame = raycaster.frame(&world);
    let mut out = DebugTextRenderer::from_config(config)
        .with_rows(request.rows)
        .render(&frame);
    out.push_str(&ascii_minimap(world.grid(), &world.pose()));
    let _ = writeln!(out, "{}", FrameInspector::summary(&world, &frame.slices));
    if let Some(column) = request.ray {
        match FrameInspector::inspect_ray(&frame.slices, column) {
            Some(info) => {
                let _ = writeln!(out, "{info}");
            }
            None => anyhow::bail!("ray {column} out of range (0..{})", frame.slices.len()),
        }
    }
    Ok(out)
}

/// Outcome of a seeded run against its replay.
#[derive(Debug, Clone, PartialEq)]
struct ReplayReport {
    ticks: u64,
    events: usize,
    live_hash: u64,
    replay_hash: u64,
    serial_frame: u64,
    parallel_frame: u64,
}

impl ReplayReport {
    fn state_matches(&self) -> bool {
        self.live_hash == self.replay_hash
    }

    fn frames_match(&self) -> bool {
        self.serial_frame == self.parallel_frame
    }
}

fn replay(config: &EngineConfig, level: &Level, ticks: u64, seed: u64) -> Result<ReplayReport> {
    let (grid, spawn) = level.build_for(config)?;
    let movement = Movement::from_config(config);

    let mut live = World::new(grid, spawn);
    for intent in IntentStream::new(seed).take(ticks as usize) {
        live.step(intent, &movement);
    }
    let replayed = World::replay(live.grid_arc(), spawn, live.events(), &movement);

    let raycaster = Raycaster::from_config(config, &TextureStore::builtin())?;
    let pose = live.pose();
    let serial = raycaster
        .clone()
        .with_parallel(false)
        .cast_frame(live.grid(), &pose);
    let parallel = raycaster.with_parallel(true).cast_frame(live.grid(), &pose);

    Ok(ReplayReport {
        ticks: live.tick(),
        events: live.events().len(),
        live_hash: live.state_hash(),
        replay_hash: replayed.state_hash(),
        serial_frame: frame_hash(&serial),
        parallel_frame: frame_hash(&parallel),
    })
}

fn verdict(ok: bool) -> &'static str {
    if ok { "OK" } else { "MISMATCH" }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => print!("{}", info()),
        Commands::Validate { level } => {
            let level = load_level(Some(level.as_path()))?;
            print!("{}", validate(&config, &level)?);
        }
        Commands::Render {
            level,
            textures,
            script,
            ticks,
            rows,
            ray,
        } => {
            let level = load_level(level.as_deref())?;
            let textures = TextureStore::load_or_builtin(textures.as_deref())
                .context("loading texture catalog")?;
            let script = expand_script(&parse_script(&script)?, ticks);
            tracing::debug!(ticks = script.len(), "running script");
            let request = RenderRequest {
                script: &script,
                rows,
                ray,
            };
            print!("{}", render(&config, &level, &textures, &request)?);
        }
        Commands::Replay { ticks, seed, level } => {
            let level = load_level(level.as_deref())?;
            println!(
                "Deterministic replay: level={}, seed={seed}, ticks={ticks}",
                level.name
            );
            let report = replay(&config, &level, ticks, seed)?;
            println!(
                "Run 1:  tick={}, events={}, state={:016x}",
                report.ticks, report.events, report.live_hash
            );
            println!("Replay: state={:016x}", report.replay_hash);
            println!("State match: {}", verdict(report.state_matches()));
            println!(
                "Frame serial={:016x} parallel={:016x}: {}",
                report.serial_frame,
                report.parallel_frame,
                verdict(report.frames_match())
            );
            if !(report.state_matches() && report.frames_match()) {
                anyhow::bail!("replay check failed");
            }
        }
    }

    Ok(())
}

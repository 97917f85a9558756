use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tilecast_assets::TextureStore;
use tilecast_common::EngineConfig;
use tilecast_input::{Action, ActionState, KeyBindings};
use tilecast_kernel::{Level, Movement, World, WorldEvent};
use tilecast_render::{Frame, Framebuffer, Raycaster, Renderer, SoftwareRenderer};

/// Longest frame the tick accumulator will absorb. A stall longer than this
/// (window drag, debugger pause) does not turn into a burst of catch-up ticks.
const MAX_FRAME_TIME: Duration = Duration::from_millis(250);

/// Files the session is built from. `None` selects the built-in default.
#[derive(Debug, Clone, Default)]
pub struct SessionPaths {
    pub config: Option<PathBuf>,
    pub level: Option<PathBuf>,
    pub textures: Option<PathBuf>,
    pub bindings: Option<PathBuf>,
}

/// Everything the desktop driver simulates and draws, minus the window.
pub struct Session {
    config: EngineConfig,
    level_name: String,
    world: World,
    movement: Movement,
    raycaster: Raycaster,
    renderer: SoftwareRenderer,
    bindings: KeyBindings,
    actions: ActionState,
    frame: Frame,
    tick_interval: Duration,
    tick_accumulator: Duration,
    blocked_moves: u64,
    frame_time: Duration,
    show_minimap: bool,
    quit: bool,
}

impl Session {
    pub fn load(paths: &SessionPaths) -> Result<Self> {
        let config = match &paths.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        let level = match &paths.level {
            Some(path) => Level::load(path)
                .with_context(|| format!("loading level {}", path.display()))?,
            None => Level::classic(),
        };
        let textures = TextureStore::load_or_builtin(paths.textures.as_deref())
            .context("loading texture catalog")?;
        let bindings = match &paths.bindings {
            Some(path) => KeyBindings::load(path)
                .with_context(|| format!("loading key bindings {}", path.display()))?,
            None => KeyBindings::default(),
        };
        Self::new(config, &level, textures, bindings)
    }

    pub fn new(
        config: EngineConfig,
        level: &Level,
        textures: TextureStore,
        bindings: KeyBindings,
    ) -> Result<Self> {
        let (grid, spawn) = level
            .build_for(&config)
            .with_context(|| format!("building level {}", level.name))?;
        let raycaster =
            Raycaster::from_config(&config, &textures).context("resolving wall shading")?;
        let renderer = SoftwareRenderer::new(&config, Arc::new(textures));
        let world = World::new(grid, spawn);
        let frame = raycaster.frame(&world);
        tracing::info!(
            level = %level.name,
            rays = raycaster.ray_count(),
            parallel = raycaster.is_parallel(),
            "session ready"
        );
        Ok(Self {
            movement: Movement::from_config(&config),
            tick_interval: config.tick_interval(),
            tick_accumulator: Duration::ZERO,
            level_name: level.name.clone(),
            config,
            world,
            raycaster,
            renderer,
            bindings,
            actions: ActionState::new(),
            frame,
            blocked_moves: 0,
            frame_time: Duration::ZERO,
            show_minimap: true,
            quit: false,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        self.renderer.framebuffer()
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn blocked_moves(&self) -> u64 {
        self.blocked_moves
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    pub fn show_minimap(&self) -> bool {
        self.show_minimap
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Route a key by its code name. Unbound keys are ignored.
    pub fn handle_key(&mut self, key: &str, pressed: bool) {
        let Some(action) = self.bindings.action_for(key) else {
            return;
        };
        if pressed {
            self.actions.press(action);
            self.apply_pressed();
        } else {
            self.actions.release(action);
        }
    }

    /// Release every held action, e.g. on focus loss.
    pub fn release_all(&mut self) {
        self.actions.release_all();
    }

    fn apply_pressed(&mut self) {
        for action in self.actions.take_pressed() {
            match action {
                Action::ToggleMinimap => self.show_minimap = !self.show_minimap,
                Action::Respawn => {
                    self.world.reset();
                    self.tick_accumulator = Duration::ZERO;
                    tracing::info!("respawned");
                }
                Action::Quit => self.quit = true,
                Action::MoveForward
                | Action::MoveBackward
                | Action::TurnLeft
                | Action::TurnRight => {}
            }
        }
    }

    /// Feed `elapsed` wall time into the fixed-rate tick accumulator and step
    /// the world once per whole tick. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.frame_time = elapsed;
        self.tick_accumulator += elapsed.min(MAX_FRAME_TIME);
        let intent = self.actions.intent();
        let mut ticks = 0;
        while self.tick_accumulator >= self.tick_interval {
            self.tick_accumulator -= self.tick_interval;
            self.world.step(intent, &self.movement);
            ticks += 1;
        }
        // The desktop never replays, so the log is folded into counters.
        for event in self.world.drain_events() {
            if matches!(event, WorldEvent::Blocked { .. }) {
                self.blocked_moves += 1;
            }
        }
        ticks
    }

    /// Cast the current pose and rasterize it. Returns wall pixels drawn.
    pub fn render(&mut self) -> usize {
        self.frame = self.raycaster.frame(&self.world);
        self.renderer.render(&self.frame)
    }
}

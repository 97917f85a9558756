use crate::framebuffer::Framebuffer;
use crate::raycaster::Frame;
use crate::slice::SliceFill;
use std::fmt::Write;
use std::sync::Arc;
use tilecast_assets::TextureStore;
use tilecast_common::{EngineConfig, Rgb};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer consumes the slices of one frame and produces output. It never
/// sees the world directly; world truth is kernel-owned.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&mut self, frame: &Frame) -> Self::Output;
}

/// Characters from near to far.
const DEPTH_RAMP: &[u8] = b"@#%*+=-:";

/// ASCII renderer: one character column per slice, `rows` lines high.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Clone)]
pub struct DebugTextRenderer {
    rows: u32,
    screen_height: f32,
    max_depth: f32,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl DebugTextRenderer {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            rows: 24,
            screen_height: config.screen_height as f32,
            max_depth: config.max_depth,
        }
    }

    pub fn with_rows(mut self, rows: u32) -> Self {
        self.rows = rows.max(1);
        self
    }

    fn glyph(&self, depth: f32) -> char {
        let t = (depth / self.max_depth).clamp(0.0, 1.0);
        let i = ((t * DEPTH_RAMP.len() as f32) as usize).min(DEPTH_RAMP.len() - 1);
        DEPTH_RAMP[i] as char
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, frame: &Frame) -> String {
        let mut out = String::new();
        let pose = frame.pose;
        let hits = frame.slices.iter().filter(|s| s.hit.is_some()).count();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Frame (tick={}) pos=({:.1}, {:.1}) heading={:.1}deg ===",
            frame.tick,
            pose.position.x,
            pose.position.y,
            pose.heading.to_degrees()
        );
        for row in 0..self.rows {
            let y = (row as f32 + 0.5) / self.rows as f32 * self.screen_height;
            let line: String = frame
                .slices
                .iter()
                .map(|s| {
                    if matches!(s.fill, SliceFill::Blank) || y < s.top || y >= s.bottom {
                        ' '
                    } else {
                        self.glyph(s.depth)
                    }
                })
                .collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "Slices: {} (hits {}, misses {})",
            frame.slices.len(),
            hits,
            frame.slices.len() - hits
        );
        out
    }
}

/// Rasterizes frames into a [`Framebuffer`] on the CPU.
#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    framebuffer: Framebuffer,
    textures: Arc<TextureStore>,
    background: Rgb,
}

impl SoftwareRenderer {
    pub fn new(config: &EngineConfig, textures: Arc<TextureStore>) -> Self {
        Self {
            framebuffer: Framebuffer::new(config.screen_width, config.screen_height),
            textures,
            background: config.background,
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }
}

impl Renderer for SoftwareRenderer {
    /// Wall pixels written.
    type Output = usize;

    fn render(&mut self, frame: &Frame) -> usize {
        self.framebuffer.clear(self.background);
        self.framebuffer.draw_slices(&frame.slices, &self.textures)
    }
}

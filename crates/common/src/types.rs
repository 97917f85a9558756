use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Wrap an angle in radians into [0, 2π).
///
/// `rem_euclid` can round a tiny negative input up to exactly 2π, so that case
/// is folded back onto 0.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Player pose: continuous position in world units and a heading in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec2,
    /// Always in [0, 2π) once constructed through [`Pose::new`] or movement.
    pub heading: f32,
}

impl Pose {
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            heading: normalize_angle(heading),
        }
    }

    /// Unit vector along the heading.
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.heading.cos(), self.heading.sin())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            heading: 0.0,
        }
    }
}

/// Integer tile coordinate. Values may lie outside the grid; the grid decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Floor-divide a world point by the tile edge length.
    ///
    /// Float-to-int casts saturate, so far-away or non-finite points land on
    /// coordinates that are simply out of bounds.
    pub fn from_world(point: Vec2, tile_size: f32) -> Self {
        Self {
            x: (point.x / tile_size).floor() as i32,
            y: (point.y / tile_size).floor() as i32,
        }
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Input intent sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl MoveIntent {
    pub const IDLE: Self = Self {
        forward: false,
        backward: false,
        turn_left: false,
        turn_right: false,
    };

    pub fn forward() -> Self {
        Self {
            forward: true,
            ..Self::IDLE
        }
    }

    pub fn backward() -> Self {
        Self {
            backward: true,
            ..Self::IDLE
        }
    }

    pub fn turn_left() -> Self {
        Self {
            turn_left: true,
            ..Self::IDLE
        }
    }

    pub fn turn_right() -> Self {
        Self {
            turn_right: true,
            ..Self::IDLE
        }
    }

    /// -1, 0 or +1: forward and backward cancel out.
    pub fn translation_sign(&self) -> f32 {
        (self.forward as i8 - self.backward as i8) as f32
    }

    /// -1 for a net left turn, +1 for a net right turn.
    pub fn turn_sign(&self) -> f32 {
        (self.turn_right as i8 - self.turn_left as i8) as f32
    }

    pub fn is_idle(&self) -> bool {
        self.translation_sign() == 0.0 && self.turn_sign() == 0.0
    }

    /// Parse one scripted step: `w` forward, `s` back, `a` left, `d` right, `.` idle.
    /// Upper-case letters are accepted; anything else is `None`.
    pub fn from_script_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Self::forward()),
            's' => Some(Self::backward()),
            'a' => Some(Self::turn_left()),
            'd' => Some(Self::turn_right()),
            '.' => Some(Self::IDLE),
            _ => None,
        }
    }
}

/// 8-bit RGB colour. Serialized as a `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as `0x00RRGGBB`, which is BGRA8 in little-endian memory.
    #[inline]
    pub fn to_u32(self) -> u32 {
        (self.b as u32) | ((self.g as u32) << 8) | ((self.r as u32) << 16)
    }

    #[inline]
    pub fn from_u32(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    /// Multiply each channel by `factor` (clamped to [0, 1]).
    pub fn scaled(self, factor: f32) -> Self {
        let k = factor.clamp(0.0, 1.0);
        let f = |c: u8| (c as f32 * k).round() as u8;
        Self::new(f(self.r), f(self.g), f(self.b))
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

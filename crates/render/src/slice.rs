use crate::caster::Hit;
use serde::{Deserialize, Serialize};
use tilecast_assets::TextureId;
use tilecast_common::Rgb;

/// How a slice is filled when rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SliceFill {
    /// Nothing to draw; the background shows through.
    Blank,
    Solid(Rgb),
    /// Texture column `u` in [0, 1), stretched over the slice height.
    Texture { id: TextureId, u: f32 },
}

/// Render command for one ray: a vertical band of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    /// Ray index, left to right.
    pub column: u32,
    pub x_start: u32,
    pub x_end: u32,
    /// May be negative or beyond the screen; the rasterizer clips.
    pub top: f32,
    pub bottom: f32,
    pub height: f32,
    /// Fisheye-corrected depth, or `max_depth` for a miss.
    pub depth: f32,
    pub hit: Option<Hit>,
    pub fill: SliceFill,
}

impl Slice {
    pub fn width(&self) -> u32 {
        self.x_end - self.x_start
    }

    pub fn is_blank(&self) -> bool {
        matches!(self.fill, SliceFill::Blank)
    }
}

/// FNV-1a digest of a slice sequence. Equal frames hash equal bit for bit.
pub fn frame_hash(slices: &[Slice]) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    let mut mix = |bytes: &[u8]| {
        for &b in bytes {
            h ^= b as u64;
            h = h.wrapping_mul(0x0100_0000_01b3);
        }
    };
    for s in slices {
        mix(&s.column.to_le_bytes());
        mix(&s.x_start.to_le_bytes());
        mix(&s.x_end.to_le_bytes());
        mix(&s.top.to_bits().to_le_bytes());
        mix(&s.bottom.to_bits().to_le_bytes());
        mix(&s.depth.to_bits().to_le_bytes());
        match s.hit {
            Some(hit) => {
                mix(&[1]);
                mix(&hit.tile.x.to_le_bytes());
                mix(&hit.tile.y.to_le_bytes());
                mix(&hit.raw_depth.to_bits().to_le_bytes());
            }
            None => mix(&[0]),
        }
        match s.fill {
            SliceFill::Blank => mix(&[0]),
            SliceFill::Solid(c) => mix(&[1, c.r, c.g, c.b]),
            SliceFill::Texture { id, u } => {
                mix(&[2]);
                mix(&id.0.to_le_bytes());
                mix(&u.to_bits().to_le_bytes());
            }
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(column: u32) -> Slice {
        Slice {
            column,
            x_start: column * 4,
            x_end: column * 4 + 4,
            top: 300.0,
            bottom: 300.0,
            height: 0.0,
            depth: 800.0,
            hit: None,
            fill: SliceFill::Blank,
        }
    }

    #[test]
    fn hash_depends_on_order_and_fill() {
        let a = [blank(0), blank(1)];
        let b = [blank(1), blank(0)];
        assert_eq!(frame_hash(&a), frame_hash(&a.clone()));
        assert_ne!(frame_hash(&a), frame_hash(&b));

        let mut c = a;
        c[1].fill = SliceFill::Solid(Rgb::WHITE);
        assert_ne!(frame_hash(&a), frame_hash(&c));
    }

    #[test]
    fn width_and_blank() {
        let s = blank(2);
        assert_eq!(s.width(), 4);
        assert!(s.is_blank());
    }
}

use crate::slice::{Slice, SliceFill};
use tilecast_assets::TextureStore;
use tilecast_common::Rgb;

/// Drawn where a slice names a texture the store does not have.
pub const MISSING_TEXTURE: Rgb = Rgb::new(255, 0, 255);

/// CPU pixel buffer, row-major `0x00RRGGBB`.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(Rgb::from_u32(self.pixels[(y * self.width + x) as usize]))
        } else {
            None
        }
    }

    /// Resize, discarding contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color.to_u32());
    }

    /// Rasterize slices over the current contents. Returns pixels written.
    pub fn draw_slices(&mut self, slices: &[Slice], textures: &TextureStore) -> usize {
        slices.iter().map(|s| self.draw_slice(s, textures)).sum()
    }

    /// Fill one slice's band between its clipped top and bottom.
    pub fn draw_slice(&mut self, slice: &Slice, textures: &TextureStore) -> usize {
        let x0 = slice.x_start.min(self.width);
        let x1 = slice.x_end.min(self.width);
        let y0 = slice.top.max(0.0) as u32;
        let y1 = slice.bottom.min(self.height as f32).max(0.0) as u32;
        if x0 >= x1 || y0 >= y1 {
            return 0;
        }

        // One column of colours, copied across the band.
        let column: Vec<u32> = match slice.fill {
            SliceFill::Blank => return 0,
            SliceFill::Solid(color) => vec![color.to_u32(); (y1 - y0) as usize],
            SliceFill::Texture { id, u } => match textures.get(id) {
                Some(texture) => (y0..y1)
                    .map(|y| {
                        let v = (y as f32 + 0.5 - slice.top) / slice.height;
                        texture.sample_packed(u, v)
                    })
                    .collect(),
                None => vec![MISSING_TEXTURE.to_u32(); (y1 - y0) as usize],
            },
        };

        let stride = self.width as usize;
        for (dy, color) in column.iter().enumerate() {
            let row = (y0 as usize + dy) * stride;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(*color);
        }
        column.len() * (x1 - x0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilecast_assets::{TextureId, TextureSpec};

    fn slice(x: (u32, u32), y: (f32, f32), fill: SliceFill) -> Slice {
        Slice {
            column: 0,
            x_start: x.0,
            x_end: x.1,
            top: y.0,
            bottom: y.1,
            height: y.1 - y.0,
            depth: 1.0,
            hit: None,
            fill,
        }
    }

    #[test]
    fn solid_slice_fills_band() {
        let mut fb = Framebuffer::new(8, 8);
        fb.clear(Rgb::BLACK);
        let red = Rgb::new(255, 0, 0);
        let n = fb.draw_slice(&slice((2, 4), (2.0, 6.0), SliceFill::Solid(red)), &TextureStore::new());
        assert_eq!(n, 8);
        assert_eq!(fb.pixel(2, 2), Some(red));
        assert_eq!(fb.pixel(3, 5), Some(red));
        assert_eq!(fb.pixel(4, 2), Some(Rgb::BLACK));
        assert_eq!(fb.pixel(2, 6), Some(Rgb::BLACK));
    }

    #[test]
    fn tall_slice_is_clipped() {
        let mut fb = Framebuffer::new(4, 4);
        let n = fb.draw_slice(
            &slice((0, 10), (-1e9, 1e9), SliceFill::Solid(Rgb::WHITE)),
            &TextureStore::new(),
        );
        assert_eq!(n, 16);
        assert!(fb.pixels().iter().all(|p| *p == Rgb::WHITE.to_u32()));
    }

    #[test]
    fn blank_and_degenerate_draw_nothing() {
        let mut fb = Framebuffer::new(4, 4);
        let store = TextureStore::new();
        assert_eq!(fb.draw_slice(&slice((0, 4), (0.0, 4.0), SliceFill::Blank), &store), 0);
        assert_eq!(
            fb.draw_slice(&slice((2, 2), (0.0, 4.0), SliceFill::Solid(Rgb::WHITE)), &store),
            0
        );
        assert_eq!(
            fb.draw_slice(&slice((0, 4), (2.0, 2.0), SliceFill::Solid(Rgb::WHITE)), &store),
            0
        );
    }

    #[test]
    fn texture_rows_follow_slice_height() {
        let mut store = TextureStore::new();
        let a = Rgb::new(10, 10, 10);
        let b = Rgb::new(20, 20, 20);
        let id = store
            .register("c", &TextureSpec::Checker { a, b, cells: 2 })
            .unwrap();
        let mut fb = Framebuffer::new(1, 8);
        fb.draw_slice(&slice((0, 1), (0.0, 8.0), SliceFill::Texture { id, u: 0.1 }), &store);
        assert_eq!(fb.pixel(0, 0), Some(a));
        assert_eq!(fb.pixel(0, 7), Some(b));
    }

    #[test]
    fn missing_texture_is_magenta() {
        let mut fb = Framebuffer::new(2, 2);
        fb.draw_slice(
            &slice((0, 2), (0.0, 2.0), SliceFill::Texture { id: TextureId(9), u: 0.0 }),
            &TextureStore::new(),
        );
        assert_eq!(fb.pixel(1, 1), Some(MISSING_TEXTURE));
    }

    #[test]
    fn resize_discards() {
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(Rgb::WHITE);
        fb.resize(3, 1);
        assert_eq!(fb.pixels().len(), 3);
        assert_eq!(fb.pixel(0, 0), Some(Rgb::BLACK));
    }
}

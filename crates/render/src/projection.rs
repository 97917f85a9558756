use tilecast_common::EngineConfig;

/// Added to the corrected depth before dividing, so a zero depth still
/// projects to a finite height.
pub const DEPTH_EPSILON: f32 = 1e-4;

/// Screen geometry of the ray fan: angular offsets, column bands and the
/// depth-to-height projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub screen_width: u32,
    pub screen_height: u32,
    pub ray_count: u32,
    pub fov: f32,
    pub plane_distance: f32,
}

impl Projection {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            screen_width: config.screen_width,
            screen_height: config.screen_height,
            ray_count: config.ray_count.max(1),
            fov: config.fov(),
            plane_distance: config.plane_distance(),
        }
    }

    /// Angular spacing between adjacent rays.
    pub fn ray_spacing(&self) -> f32 {
        self.fov / self.ray_count as f32
    }

    /// Offset of ray `i` from the heading: `(i - N/2) * FOV/N`.
    ///
    /// Ray `N/2` (integer division) lies on the heading, so odd and even fans
    /// are both anchored on the view direction.
    pub fn ray_offset(&self, index: u32) -> f32 {
        let centered = index as i64 - (self.ray_count / 2) as i64;
        centered as f32 * self.ray_spacing()
    }

    /// Horizontal pixel band `[start, end)` of ray `i`. Bands tile the screen
    /// exactly; with more rays than pixels some bands are empty.
    pub fn band(&self, index: u32) -> (u32, u32) {
        let w = self.screen_width as u64;
        let n = self.ray_count as u64;
        let start = index as u64 * w / n;
        let end = (index as u64 + 1) * w / n;
        (start as u32, end as u32)
    }

    /// On-screen wall height for a tile of `tile_size` at `corrected_depth`.
    #[inline]
    pub fn wall_height(&self, tile_size: f32, corrected_depth: f32) -> f32 {
        tile_size * self.plane_distance / (corrected_depth + DEPTH_EPSILON)
    }

    /// `(top, bottom)` of a slice of `height` centred on the horizon. Not clipped.
    #[inline]
    pub fn vertical_span(&self, height: f32) -> (f32, f32) {
        let centre = self.screen_height as f32 / 2.0;
        (centre - height / 2.0, centre + height / 2.0)
    }
}

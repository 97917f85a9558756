use glam::Vec2;
use tilecast_common::{Pose, TileCoord};
use tilecast_kernel::{Cell, Grid};
use tilecast_render::Slice;

/// Maps world coordinates onto a minimap rectangle on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapLayout {
    /// Screen position of the grid's top-left corner.
    pub origin: Vec2,
    /// Screen pixels per world unit.
    pub scale: f32,
    /// Screen size of one tile.
    pub tile_px: f32,
}

/// One tile of the minimap, in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapCell {
    pub tile: TileCoord,
    pub min: Vec2,
    pub max: Vec2,
    pub wall: bool,
}

impl MinimapLayout {
    /// Fit `grid` inside a `max_size` box whose top-left corner is `origin`,
    /// keeping tiles square.
    pub fn fit(grid: &Grid, origin: Vec2, max_size: Vec2) -> Self {
        let world = grid.world_size();
        let scale = (max_size.x / world.x).min(max_size.y / world.y).max(0.0);
        Self {
            origin,
            scale,
            tile_px: grid.tile_size() * scale,
        }
    }

    /// Screen size of the whole map.
    pub fn size(&self, grid: &Grid) -> Vec2 {
        grid.world_size() * self.scale
    }

    #[inline]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        self.origin + world * self.scale
    }

    pub fn cells(&self, grid: &Grid) -> Vec<MinimapCell> {
        grid.iter()
            .map(|(tile, cell)| {
                let min = self.origin + Vec2::new(tile.x as f32, tile.y as f32) * self.tile_px;
                MinimapCell {
                    tile,
                    min,
                    max: min + Vec2::splat(self.tile_px),
                    wall: cell == Cell::Wall,
                }
            })
            .collect()
    }

    /// Player dot and the tip of a heading line `length` screen pixels long.
    pub fn player_marker(&self, pose: &Pose, length: f32) -> (Vec2, Vec2) {
        let centre = self.to_screen(pose.position);
        (centre, centre + pose.direction() * length)
    }

    /// Screen-space segments from the player to each ray's end point: the hit
    /// point, or `max_depth` along the ray for a miss.
    pub fn ray_segments(&self, pose: &Pose, slices: &[Slice], fov: f32) -> Vec<(Vec2, Vec2)> {
        let from = self.to_screen(pose.position);
        let n = slices.len().max(1) as f32;
        slices
            .iter()
            .map(|s| {
                let end = match s.hit {
                    Some(hit) => hit.point,
                    None => {
                        let offset = (s.column as f32 - (slices.len() / 2) as f32) * fov / n;
                        let angle = pose.heading + offset;
                        pose.position + Vec2::new(angle.cos(), angle.sin()) * s.depth
                    }
                };
                (from, self.to_screen(end))
            })
            .collect()
    }
}

/// Text minimap: `#` walls, `.` floor, an arrow for the player.
pub fn ascii_minimap(grid: &Grid, pose: &Pose) -> String {
    let player = grid.tile_of(pose.position);
    let arrow = heading_arrow(pose.heading);
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());
    for (tile, cell) in grid.iter() {
        let c = if tile == player {
            arrow
        } else if cell == Cell::Wall {
            '#'
        } else {
            '.'
        };
        out.push(c);
        if tile.x as usize + 1 == grid.width() {
            out.push('\n');
        }
    }
    out
}

/// Nearest of four arrows. y grows downward, so a heading of 90° points down.
fn heading_arrow(heading: f32) -> char {
    let quadrant = ((heading / std::f32::consts::FRAC_PI_2).round() as i64).rem_euclid(4);
    match quadrant {
        0 => '>',
        1 => 'v',
        2 => '<',
        _ => '^',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn fit_keeps_tiles_square() {
        let grid = Grid::walled(8, 4, 100.0).unwrap();
        let layout = MinimapLayout::fit(&grid, Vec2::new(10.0, 10.0), Vec2::new(160.0, 160.0));
        assert_eq!(layout.tile_px, 20.0);
        assert_eq!(layout.size(&grid), Vec2::new(160.0, 80.0));
        assert_eq!(layout.to_screen(Vec2::new(100.0, 100.0)), Vec2::new(30.0, 30.0));
    }

    #[test]
    fn cells_mark_walls() {
        let grid = Grid::walled(3, 3, 10.0).unwrap();
        let layout = MinimapLayout::fit(&grid, Vec2::ZERO, Vec2::splat(30.0));
        let cells = layout.cells(&grid);
        assert_eq!(cells.len(), 9);
        assert_eq!(cells.iter().filter(|c| c.wall).count(), 8);
        let centre = cells[4];
        assert!(!centre.wall);
        assert_eq!(centre.min, Vec2::new(10.0, 10.0));
        assert_eq!(centre.max, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn player_marker_points_along_heading() {
        let grid = Grid::walled(3, 3, 10.0).unwrap();
        let layout = MinimapLayout::fit(&grid, Vec2::ZERO, Vec2::splat(30.0));
        let (centre, tip) = layout.player_marker(&Pose::new(15.0, 15.0, 0.0), 5.0);
        assert_eq!(centre, Vec2::new(15.0, 15.0));
        assert_eq!(tip, Vec2::new(20.0, 15.0));
    }

    #[test]
    fn ascii_shows_player_arrow() {
        let grid = Grid::walled(4, 3, 10.0).unwrap();
        let map = ascii_minimap(&grid, &Pose::new(15.0, 15.0, FRAC_PI_2));
        assert_eq!(map, "####\n#v.#\n####\n");
        let map = ascii_minimap(&grid, &Pose::new(25.0, 15.0, PI));
        assert_eq!(map, "####\n#.<#\n####\n");
    }

    #[test]
    fn arrows_cover_all_quadrants() {
        assert_eq!(heading_arrow(0.0), '>');
        assert_eq!(heading_arrow(1.5 * PI), '^');
        assert_eq!(heading_arrow(2.0 * PI - 0.1), '>');
    }
}

use crate::caster::Hit;
use crate::slice::SliceFill;
use std::fmt::Debug;
use tilecast_assets::{AssetError, TextureId, TextureStore};
use tilecast_common::{EngineConfig, Rgb, ShadingMode};

/// Picks a slice fill from a hit.
///
/// Implementations must be pure functions of the hit: the same hit always
/// shades the same way, on any thread.
pub trait ShadeStrategy: Debug + Send + Sync {
    fn shade(&self, hit: &Hit) -> SliceFill;
}

/// One colour for x-faces, another for y-faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisShade {
    pub x_face: Rgb,
    pub y_face: Rgb,
}

impl ShadeStrategy for AxisShade {
    fn shade(&self, hit: &Hit) -> SliceFill {
        SliceFill::Solid(if hit.face.is_x_face() {
            self.x_face
        } else {
            self.y_face
        })
    }
}

/// Alternates by tile parity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckerShade {
    pub even: Rgb,
    pub odd: Rgb,
}

impl ShadeStrategy for CheckerShade {
    fn shade(&self, hit: &Hit) -> SliceFill {
        let parity = (hit.tile.x as i64 + hit.tile.y as i64).rem_euclid(2);
        SliceFill::Solid(if parity == 0 { self.even } else { self.odd })
    }
}

/// Texture per face axis, sampled at the hit fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedShade {
    pub x_face: TextureId,
    pub y_face: TextureId,
}

impl ShadeStrategy for TexturedShade {
    fn shade(&self, hit: &Hit) -> SliceFill {
        let id = if hit.face.is_x_face() {
            self.x_face
        } else {
            self.y_face
        };
        SliceFill::Texture {
            id,
            u: hit.fraction,
        }
    }
}

/// Build the strategy named by `config.shading`. Texture names are resolved
/// against `textures` here, once.
pub fn strategy_for(
    config: &EngineConfig,
    textures: &TextureStore,
) -> Result<Box<dyn ShadeStrategy>, AssetError> {
    let [first, second] = config.wall_colors;
    Ok(match config.shading {
        ShadingMode::Axis => Box::new(AxisShade {
            x_face: first,
            y_face: second,
        }),
        ShadingMode::Checker => Box::new(CheckerShade {
            even: first,
            odd: second,
        }),
        ShadingMode::Textured => Box::new(TexturedShade {
            x_face: textures.resolve(&config.wall_textures[0])?,
            y_face: textures.resolve(&config.wall_textures[1])?,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caster::WallFace;
    use glam::Vec2;
    use tilecast_common::TileCoord;

    fn hit(tile: (i32, i32), face: WallFace, fraction: f32) -> Hit {
        Hit {
            tile: TileCoord::new(tile.0, tile.1),
            raw_depth: 10.0,
            corrected_depth: 10.0,
            point: Vec2::ZERO,
            face,
            fraction,
        }
    }

    #[test]
    fn axis_uses_face() {
        let s = AxisShade {
            x_face: Rgb::new(1, 0, 0),
            y_face: Rgb::new(0, 1, 0),
        };
        assert_eq!(
            s.shade(&hit((0, 0), WallFace::East, 0.0)),
            SliceFill::Solid(Rgb::new(1, 0, 0))
        );
        assert_eq!(
            s.shade(&hit((0, 0), WallFace::North, 0.0)),
            SliceFill::Solid(Rgb::new(0, 1, 0))
        );
    }

    #[test]
    fn checker_uses_tile_parity() {
        let s = CheckerShade {
            even: Rgb::BLACK,
            odd: Rgb::WHITE,
        };
        assert_eq!(
            s.shade(&hit((3, 5), WallFace::West, 0.0)),
            SliceFill::Solid(Rgb::BLACK)
        );
        assert_eq!(
            s.shade(&hit((-1, 0), WallFace::West, 0.0)),
            SliceFill::Solid(Rgb::WHITE)
        );
    }

    #[test]
    fn textured_carries_fraction() {
        let s = TexturedShade {
            x_face: TextureId(0),
            y_face: TextureId(1),
        };
        assert_eq!(
            s.shade(&hit((1, 1), WallFace::South, 0.25)),
            SliceFill::Texture {
                id: TextureId(1),
                u: 0.25
            }
        );
    }

    #[test]
    fn strategy_for_resolves_textures() {
        let config = EngineConfig {
            shading: ShadingMode::Textured,
            ..EngineConfig::default()
        };
        let store = TextureStore::builtin();
        let s = strategy_for(&config, &store).unwrap();
        let brick = store.resolve("brick").unwrap();
        assert_eq!(
            s.shade(&hit((1, 1), WallFace::West, 0.5)),
            SliceFill::Texture { id: brick, u: 0.5 }
        );
    }

    #[test]
    fn strategy_for_unknown_texture_fails() {
        let config = EngineConfig {
            shading: ShadingMode::Textured,
            wall_textures: ["brick".into(), "marble".into()],
            ..EngineConfig::default()
        };
        assert!(strategy_for(&config, &TextureStore::builtin()).is_err());
    }

    #[test]
    fn same_hit_same_fill() {
        let config = EngineConfig::default();
        let s = strategy_for(&config, &TextureStore::new()).unwrap();
        let h = hit((2, 3), WallFace::South, 0.7);
        assert_eq!(s.shade(&h), s.shade(&h));
    }
}

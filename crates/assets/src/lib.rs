//! Wall texture registry: procedural textures addressed by id or name.
//!
//! Textures are generated from small [`TextureSpec`] descriptions instead of
//! image files. The renderer consumes textures by [`TextureId`], never by name;
//! names are resolved once when a shading strategy is built.
//!
//! # Layout
//! A catalog is a JSON array of `{ "name", "spec" }` entries, overlaid on the
//! built-in set so a catalog only needs to list what it changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tilecast_common::Rgb;

/// Edge length of generated textures, in texels.
pub const TEXTURE_SIZE: u32 = 64;

/// Index into a [`TextureStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// Procedural texture description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextureSpec {
    Solid {
        color: Rgb,
    },
    /// `cells` × `cells` squares alternating between `a` and `b`.
    Checker { a: Rgb, b: Rgb, cells: u32 },
    /// Running-bond brick rows separated by mortar lines.
    Brick { brick: Rgb, mortar: Rgb, rows: u32 },
}

/// A catalog entry as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureEntry {
    pub name: String,
    pub spec: TextureSpec,
}

/// Errors from texture operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read texture catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("texture not found: {0:?}")]
    UnknownTexture(String),
    #[error("invalid texture {name:?}: {reason}")]
    InvalidSpec { name: String, reason: String },
}

/// A generated texture, row-major `0x00RRGGBB` texels.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    name: String,
    width: u32,
    height: u32,
    texels: Vec<u32>,
}

impl Texture {
    /// Rasterize `spec` into a `size` × `size` texture.
    pub fn generate(name: impl Into<String>, spec: &TextureSpec, size: u32) -> Self {
        let size = size.max(1);
        let mut texels = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                texels.push(texel(spec, x, y, size).to_u32());
            }
        }
        Self {
            name: name.into(),
            width: size,
            height: size,
            texels,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel column for a horizontal coordinate in [0, 1). Out-of-range input is
    /// clamped to the edge columns.
    #[inline]
    pub fn column(&self, u: f32) -> u32 {
        let x = (u * self.width as f32) as i64;
        x.clamp(0, self.width as i64 - 1) as u32
    }

    /// Texel row for a vertical coordinate in [0, 1), clamped like [`Texture::column`].
    #[inline]
    pub fn row(&self, v: f32) -> u32 {
        let y = (v * self.height as f32) as i64;
        y.clamp(0, self.height as i64 - 1) as u32
    }

    /// Packed texel at normalized coordinates.
    #[inline]
    pub fn sample_packed(&self, u: f32, v: f32) -> u32 {
        let x = self.column(u);
        let y = self.row(v);
        self.texels[(y * self.width + x) as usize]
    }

    pub fn sample(&self, u: f32, v: f32) -> Rgb {
        Rgb::from_u32(self.sample_packed(u, v))
    }
}

fn texel(spec: &TextureSpec, x: u32, y: u32, size: u32) -> Rgb {
    match *spec {
        TextureSpec::Solid { color } => color,
        TextureSpec::Checker { a, b, cells } => {
            let cell = (size / cells.max(1)).max(1);
            if ((x / cell) + (y / cell)) % 2 == 0 { a } else { b }
        }
        TextureSpec::Brick {
            brick,
            mortar,
            rows,
        } => {
            let row_height = (size / rows.max(1)).max(2);
            let brick_width = (size / 2).max(2);
            let mortar_width = (row_height / 8).max(1);
            let row = y / row_height;
            let offset = if row % 2 == 0 { 0 } else { brick_width / 2 };
            let in_row = y % row_height;
            let in_brick = (x + offset) % brick_width;
            if in_row < mortar_width || in_brick < mortar_width {
                mortar
            } else {
                brick
            }
        }
    }
}

fn validate(name: &str, spec: &TextureSpec) -> Result<(), AssetError> {
    let invalid = |reason: &str| {
        Err(AssetError::InvalidSpec {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };
    if name.is_empty() {
        return invalid("name must not be empty");
    }
    match *spec {
        TextureSpec::Checker { cells, .. } if cells == 0 || cells > TEXTURE_SIZE => {
            invalid("checker cells must be in 1..=64")
        }
        TextureSpec::Brick { rows, .. } if rows == 0 || rows > TEXTURE_SIZE / 2 => {
            invalid("brick rows must be in 1..=32")
        }
        _ => Ok(()),
    }
}

/// Registry of generated textures.
///
/// Ids are dense indices in registration order. Registering a name twice
/// replaces the texture but keeps its id.
#[derive(Debug, Clone, Default)]
pub struct TextureStore {
    textures: Vec<Texture>,
    names: BTreeMap<String, TextureId>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The textures every build ships with.
    pub fn builtin() -> Self {
        let mut store = Self::new();
        for entry in builtin_entries() {
            // Built-in specs are always valid.
            store.insert(&entry.name, &entry.spec);
        }
        store
    }

    /// Built-ins overlaid with the entries of a JSON catalog string.
    pub fn from_json_str(text: &str) -> Result<Self, AssetError> {
        let entries: Vec<TextureEntry> = serde_json::from_str(text)?;
        let mut store = Self::builtin();
        for entry in &entries {
            store.register(&entry.name, &entry.spec)?;
        }
        Ok(store)
    }

    /// Load a JSON catalog file on top of the built-ins.
    pub fn load_catalog(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), textures = store.len(), "loaded texture catalog");
        Ok(store)
    }

    /// Load `path` if given, otherwise fall back to the built-ins.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, AssetError> {
        match path {
            Some(path) => Self::load_catalog(path),
            None => {
                tracing::debug!("no texture catalog given, using built-ins");
                Ok(Self::builtin())
            }
        }
    }

    /// Register or replace a texture. Returns its id.
    pub fn register(&mut self, name: &str, spec: &TextureSpec) -> Result<TextureId, AssetError> {
        validate(name, spec)?;
        Ok(self.insert(name, spec))
    }

    fn insert(&mut self, name: &str, spec: &TextureSpec) -> TextureId {
        let texture = Texture::generate(name, spec, TEXTURE_SIZE);
        match self.names.get(name) {
            Some(&id) => {
                self.textures[id.0 as usize] = texture;
                id
            }
            None => {
                let id = TextureId(self.textures.len() as u32);
                self.textures.push(texture);
                self.names.insert(name.to_string(), id);
                id
            }
        }
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0 as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<TextureId> {
        self.names.get(name).copied()
    }

    /// Like [`TextureStore::by_name`], but a missing name is an error.
    pub fn resolve(&self, name: &str) -> Result<TextureId, AssetError> {
        self.by_name(name)
            .ok_or_else(|| AssetError::UnknownTexture(name.to_string()))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// The built-in catalog, also useful as a starting point for a custom one.
pub fn builtin_entries() -> Vec<TextureEntry> {
    vec![
        TextureEntry {
            name: "brick".into(),
            spec: TextureSpec::Brick {
                brick: Rgb::new(150, 52, 40),
                mortar: Rgb::new(196, 190, 178),
                rows: 8,
            },
        },
        TextureEntry {
            name: "stone".into(),
            spec: TextureSpec::Checker {
                a: Rgb::new(112, 112, 118),
                b: Rgb::new(88, 88, 96),
                cells: 4,
            },
        },
        TextureEntry {
            name: "red".into(),
            spec: TextureSpec::Solid {
                color: Rgb::new(200, 0, 0),
            },
        },
        TextureEntry {
            name: "green".into(),
            spec: TextureSpec::Solid {
                color: Rgb::new(0, 200, 0),
            },
        },
    ]
}

pub fn crate_info() -> &'static str {
    "tilecast-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_default_wall_textures() {
        let store = TextureStore::builtin();
        assert!(store.by_name("brick").is_some());
        assert!(store.by_name("stone").is_some());
        assert_eq!(store.len(), builtin_entries().len());
    }

    #[test]
    fn register_replaces_but_keeps_id() {
        let mut store = TextureStore::builtin();
        let before = store.resolve("brick").unwrap();
        let red = Rgb::new(255, 0, 0);
        let after = store
            .register("brick", &TextureSpec::Solid { color: red })
            .unwrap();
        assert_eq!(before, after);
        assert_eq!(store.get(after).unwrap().sample(0.5, 0.5), red);
        assert_eq!(store.len(), builtin_entries().len());
    }

    #[test]
    fn unknown_name_is_error() {
        let store = TextureStore::builtin();
        assert!(matches!(
            store.resolve("marble"),
            Err(AssetError::UnknownTexture(_))
        ));
    }

    #[test]
    fn checker_alternates() {
        let a = Rgb::new(1, 1, 1);
        let b = Rgb::new(2, 2, 2);
        let t = Texture::generate("c", &TextureSpec::Checker { a, b, cells: 2 }, 64);
        assert_eq!(t.sample(0.1, 0.1), a);
        assert_eq!(t.sample(0.9, 0.1), b);
        assert_eq!(t.sample(0.9, 0.9), a);
    }

    #[test]
    fn brick_has_mortar_on_row_boundary() {
        let brick = Rgb::new(150, 50, 40);
        let mortar = Rgb::new(200, 200, 200);
        let t = Texture::generate(
            "b",
            &TextureSpec::Brick {
                brick,
                mortar,
                rows: 4,
            },
            64,
        );
        assert_eq!(t.sample(0.3, 0.0), mortar);
        assert_eq!(t.sample(0.3, 0.125), brick);
    }

    #[test]
    fn sampling_clamps_out_of_range() {
        let t = TextureStore::builtin();
        let tex = t.get(t.resolve("stone").unwrap()).unwrap();
        assert_eq!(tex.column(-1.0), 0);
        assert_eq!(tex.column(1.0), TEXTURE_SIZE - 1);
        assert_eq!(tex.row(f32::NAN), 0);
    }

    #[test]
    fn invalid_spec_rejected() {
        let mut store = TextureStore::new();
        let err = store
            .register(
                "bad",
                &TextureSpec::Checker {
                    a: Rgb::BLACK,
                    b: Rgb::WHITE,
                    cells: 0,
                },
            )
            .unwrap_err();
        assert!(err.to_string().contains("bad"));
        assert!(store.is_empty());
    }

    #[test]
    fn catalog_overlays_builtins() {
        let json = r#"[
            { "name": "moss", "spec": { "kind": "solid", "color": [20, 90, 30] } },
            { "name": "stone", "spec": { "kind": "checker", "a": [0, 0, 0], "b": [9, 9, 9], "cells": 8 } }
        ]"#;
        let store = TextureStore::from_json_str(json).unwrap();
        assert_eq!(store.len(), builtin_entries().len() + 1);
        let moss = store.get(store.resolve("moss").unwrap()).unwrap();
        assert_eq!(moss.sample(0.5, 0.5), Rgb::new(20, 90, 30));
    }

    #[test]
    fn load_catalog_from_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let entries = vec![TextureEntry {
            name: "sand".into(),
            spec: TextureSpec::Solid {
                color: Rgb::new(220, 200, 150),
            },
        }];
        std::fs::write(tmp.path(), serde_json::to_string_pretty(&entries).unwrap()).unwrap();
        let store = TextureStore::load_catalog(tmp.path()).unwrap();
        assert!(store.by_name("sand").is_some());
        assert!(store.by_name("brick").is_some());
    }

    #[test]
    fn missing_catalog_reports_path() {
        let err = TextureStore::load_catalog("/no/such/textures.json").unwrap_err();
        assert!(err.to_string().contains("textures.json"));
        assert_eq!(
            TextureStore::load_or_builtin(None).unwrap().len(),
            builtin_entries().len()
        );
    }

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}

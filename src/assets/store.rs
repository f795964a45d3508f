use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::decode::{PreparedImage, decode_image},
    foundation::error::{CircuitarError, CircuitarResult},
    session::classify::ComponentKind,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
/// Opaque handle to a sprite held by an [`AssetResolver`].
pub struct AssetHandle(pub(crate) u32);

impl AssetHandle {
    pub fn from_u32(raw: u32) -> Self {
        Self(raw)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Maps a component family to a sprite. A missing sprite is not an error.
pub trait AssetResolver {
    fn resolve(&self, kind: ComponentKind) -> Option<AssetHandle>;
}

/// Resolver with no sprites; render plans contain only text and wires.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAssets;

impl AssetResolver for NoAssets {
    fn resolve(&self, _kind: ComponentKind) -> Option<AssetHandle> {
        None
    }
}

#[derive(Clone, Debug, Default)]
/// Decoded component sprites keyed by asset tag (`V`, `R`, `LED`, ...).
pub struct SpriteStore {
    sprites: Vec<PreparedImage>,
    by_tag: HashMap<String, AssetHandle>,
}

impl SpriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `<TAG>.png` in `dir`. The file stem is the tag.
    pub fn load_dir(dir: &Path, key_threshold: Option<u8>) -> CircuitarResult<Self> {
        let mut store = Self::new();
        let rd = std::fs::read_dir(dir)
            .with_context(|| format!("read sprite dir '{}'", dir.display()))?;

        let mut paths: Vec<PathBuf> = rd
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|s| s.to_str())
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
            })
            .collect();
        paths.sort();

        for path in paths {
            let Some(tag) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read sprite '{}'", path.display()))?;
            let img = decode_image(&bytes, key_threshold)
                .map_err(|e| CircuitarError::load(format!("{}: {e}", path.display())))?;
            tracing::debug!(tag, width = img.width, height = img.height, "loaded sprite");
            store.insert(tag, img);
        }
        Ok(store)
    }

    /// Register `img` under `tag`, replacing any previous sprite for that tag.
    pub fn insert(&mut self, tag: impl Into<String>, img: PreparedImage) -> AssetHandle {
        let tag = tag.into();
        if let Some(&handle) = self.by_tag.get(&tag) {
            self.sprites[handle.0 as usize] = img;
            return handle;
        }
        let handle = AssetHandle(self.sprites.len() as u32);
        self.sprites.push(img);
        self.by_tag.insert(tag, handle);
        handle
    }

    pub fn get(&self, handle: AssetHandle) -> Option<&PreparedImage> {
        self.sprites.get(handle.0 as usize)
    }

    pub fn handle_for_tag(&self, tag: &str) -> Option<AssetHandle> {
        self.by_tag.get(tag).copied()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl AssetResolver for SpriteStore {
    fn resolve(&self, kind: ComponentKind) -> Option<AssetHandle> {
        self.handle_for_tag(&kind.tag())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;

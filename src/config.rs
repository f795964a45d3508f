use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::store::SpriteStore,
    experiment::catalog::{ExperimentCatalog, FsDefinitionSource},
    foundation::core::Canvas,
    foundation::error::{CircuitarError, CircuitarResult},
    session::layout::LayoutParams,
    session::state::ExperimentSession,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Engine settings loaded from JSON. Every field has a default.
pub struct EngineConfig {
    /// Directory holding experiment definition files.
    pub experiments_dir: PathBuf,
    /// Directory of component sprites (`<TAG>.png`).
    pub assets_dir: Option<PathBuf>,
    pub catalog: ExperimentCatalog,
    pub layout: LayoutParams,
    /// Light-background keying threshold applied to sprites on load.
    pub sprite_key_threshold: Option<u8>,
    /// Frame size used for offline rendering when no background is given.
    pub canvas: Canvas,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            experiments_dir: PathBuf::from("experiments"),
            assets_dir: None,
            catalog: ExperimentCatalog::default(),
            layout: LayoutParams::default(),
            sprite_key_threshold: None,
            canvas: Canvas::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> CircuitarResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a config file.
    ///
    /// Relative directories in the file are resolved against the file's parent directory.
    pub fn from_json_path(path: &Path) -> CircuitarResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&s).map_err(|e| match e {
            CircuitarError::Serde(msg) => {
                CircuitarError::serde(format!("{}: {msg}", path.display()))
            }
            CircuitarError::Validation(msg) => {
                CircuitarError::validation(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        if cfg.experiments_dir.is_relative() {
            cfg.experiments_dir = base.join(&cfg.experiments_dir);
        }
        if let Some(dir) = cfg.assets_dir.as_mut().filter(|d| d.is_relative()) {
            *dir = base.join(&*dir);
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> CircuitarResult<()> {
        if self.experiments_dir.as_os_str().is_empty() {
            return Err(CircuitarError::validation("experiments_dir must not be empty"));
        }
        Canvas::new(self.canvas.width, self.canvas.height)?;
        self.layout.validate()?;
        self.catalog.validate()?;
        Ok(())
    }

    /// Session reading definitions from [`EngineConfig::experiments_dir`].
    pub fn build_session(&self) -> ExperimentSession {
        ExperimentSession::new(
            self.catalog.clone(),
            Box::new(FsDefinitionSource::new(self.experiments_dir.clone())),
            self.layout,
        )
    }

    /// Load sprites from [`EngineConfig::assets_dir`]; empty when unset.
    pub fn load_sprites(&self) -> CircuitarResult<SpriteStore> {
        match &self.assets_dir {
            Some(dir) => SpriteStore::load_dir(dir, self.sprite_key_threshold),
            None => Ok(SpriteStore::new()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

use crate::assets::{DirectoryAssets, DEFAULT_TEXTURE_DIR, DEFAULT_TEXTURE_EXTENSION};
use crate::error::OptionsError;
use crate::geometry::GeometryOptions;
use crate::scene::SceneSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything a caller can tune about an import. Every field has a default,
/// so `{}` is a valid options document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Directory the texture directory is resolved against.
    #[serde(default = "default_project_root")]
    pub project_root: PathBuf,
    #[serde(default = "default_texture_dir")]
    pub texture_dir: PathBuf,
    #[serde(default = "default_texture_extension")]
    pub texture_extension: String,
    #[serde(default)]
    pub geometry: GeometryOptions,
    #[serde(default)]
    pub scene: SceneSettings,
}

fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_texture_dir() -> PathBuf {
    PathBuf::from(DEFAULT_TEXTURE_DIR)
}
fn default_texture_extension() -> String {
    DEFAULT_TEXTURE_EXTENSION.to_string()
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            project_root: default_project_root(),
            texture_dir: default_texture_dir(),
            texture_extension: default_texture_extension(),
            geometry: GeometryOptions::default(),
            scene: SceneSettings::default(),
        }
    }
}

impl ImportOptions {
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, OptionsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// Texture source reading from this project's texture directory.
    pub fn assets(&self) -> DirectoryAssets {
        DirectoryAssets::new(&self.project_root)
            .with_texture_dir(&self.texture_dir)
            .with_extension(&self.texture_extension)
    }
}

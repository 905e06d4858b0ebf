//! Block texture lookup.

use crate::error::AssetError;
use rustc_hash::FxHashMap;
use std::cell::Cell;
use std::path::{Path, PathBuf};

pub const DEFAULT_TEXTURE_DIR: &str = "textures/blocks";
pub const DEFAULT_TEXTURE_EXTENSION: &str = "png";

/// Decoded RGBA8 texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Single-colour square, handy as a placeholder.
    pub fn solid(size: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take((size * size * 4) as usize)
            .collect();
        Self::from_rgba(size, size, pixels)
    }

    /// True when any pixel is not fully opaque.
    pub fn has_alpha(&self) -> bool {
        self.pixels.chunks_exact(4).any(|px| px[3] != u8::MAX)
    }
}

pub trait AssetSource {
    fn load(&self, texture: &str) -> Result<TextureImage, AssetError>;
}

/// Resolves `<root>/<texture_dir>/<name>.<extension>` and decodes it with
/// the `image` crate.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
    texture_dir: PathBuf,
    extension: String,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            texture_dir: PathBuf::from(DEFAULT_TEXTURE_DIR),
            extension: DEFAULT_TEXTURE_EXTENSION.to_string(),
        }
    }

    pub fn with_texture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.texture_dir = dir.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn texture_path(&self, texture: &str) -> PathBuf {
        self.root
            .join(&self.texture_dir)
            .join(format!("{}.{}", texture, self.extension))
    }
}

impl AssetSource for DirectoryAssets {
    fn load(&self, texture: &str) -> Result<TextureImage, AssetError> {
        let path = self.texture_path(texture);
        if !path.is_file() {
            return Err(AssetError::NotFound {
                name: texture.to_string(),
                path,
            });
        }

        let img = image::open(&path).map_err(|e| AssetError::Unreadable {
            name: texture.to_string(),
            reason: e.to_string(),
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(TextureImage::from_rgba(width, height, rgba.into_raw()))
    }
}

/// In-memory textures keyed by name. Counts loads so callers can check how
/// often a texture was requested.
#[derive(Debug, Default)]
pub struct MemoryAssets {
    textures: FxHashMap<String, TextureImage>,
    loads: Cell<usize>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_texture(mut self, name: impl Into<String>, image: TextureImage) -> Self {
        self.insert(name, image);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, image: TextureImage) {
        self.textures.insert(name.into(), image);
    }

    pub fn load_count(&self) -> usize {
        self.loads.get()
    }
}

impl AssetSource for MemoryAssets {
    fn load(&self, texture: &str) -> Result<TextureImage, AssetError> {
        self.loads.set(self.loads.get() + 1);
        self.textures
            .get(texture)
            .cloned()
            .ok_or_else(|| AssetError::NotFound {
                name: texture.to_string(),
                path: PathBuf::from(texture),
            })
    }
}

//! The host scene the importer builds into.
//!
//! The importer never owns scene data. It drives a [`Scene`] through opaque
//! handles, so any host (a DCC tool's scripting bridge, a game editor, or the
//! headless [`MemoryScene`]) can sit behind it.

pub mod memory;

pub use memory::MemoryScene;

use crate::assets::TextureImage;
use crate::shader::ShaderGraph;
use serde::{Deserialize, Serialize};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);
    };
}

handle!(MeshHandle);
handle!(
    /// A placed block object (the geometry handle).
    ObjectHandle
);
handle!(MaterialHandle);
handle!(TextureHandle);

/// Identifies which schematic cell an object came from, so it can be mapped
/// back to `(id, metadata)` later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectTag {
    pub block_id: u8,
    pub metadata: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub location: [f32; 3],
    pub scale: [f32; 3],
}

impl Placement {
    pub fn at(location: [f32; 3]) -> Self {
        Self {
            location,
            scale: [1.0; 3],
        }
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = [scale; 3];
        self
    }
}

/// Scene-wide settings applied once before blocks are placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSettings {
    #[serde(default = "default_render_engine")]
    pub render_engine: String,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_fps_base")]
    pub fps_base: f32,
    /// Mipmaps blur 16x16 block textures at a distance.
    #[serde(default)]
    pub use_mipmaps: bool,
}

fn default_render_engine() -> String {
    "CYCLES".to_string()
}
fn default_fps() -> u32 {
    20
}
fn default_fps_base() -> f32 {
    1.0
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            render_engine: default_render_engine(),
            fps: default_fps(),
            fps_base: default_fps_base(),
            use_mipmaps: false,
        }
    }
}

pub trait Scene {
    fn create_mesh(&mut self, vertices: &[[f32; 3]], faces: &[[u32; 4]]) -> MeshHandle;

    /// Creates an object for `mesh` and links it into the active scene.
    fn place_object(&mut self, mesh: MeshHandle, placement: Placement, tag: ObjectTag)
        -> ObjectHandle;

    /// The material called `name`, if the scene has one. Never creates.
    fn material_by_name(&self, name: &str) -> Option<MaterialHandle>;

    /// The texture called `name`, if the scene has one. Never creates.
    fn texture_by_name(&self, name: &str) -> Option<TextureHandle>;

    /// Returns the material called `name`, creating it if needed. The flag is
    /// `true` when it already existed.
    fn create_or_get_material(&mut self, name: &str) -> (MaterialHandle, bool);

    /// Returns the texture called `name`, creating an empty one if needed.
    /// The flag is `true` when it already existed.
    fn create_or_get_texture(&mut self, name: &str) -> (TextureHandle, bool);

    fn set_texture_image(&mut self, texture: TextureHandle, image: TextureImage);

    fn build_shader_graph(&mut self, material: MaterialHandle, graph: ShaderGraph);

    fn assign_material(&mut self, object: ObjectHandle, material: MaterialHandle);

    /// Makes face winding consistent so every normal points outward.
    fn recompute_normals(&mut self, object: ObjectHandle);

    fn apply_settings(&mut self, settings: &SceneSettings);
}

//! Imports classic MCEdit `.schematic` files into a 3D scene: one textured,
//! shaded cube per non-air block.
//!
//! The scene itself sits behind the [`Scene`] trait and textures behind
//! [`AssetSource`], so the importer runs the same against a real host or the
//! headless [`MemoryScene`].

pub mod assets;
pub mod config;
pub mod coords;
pub mod document;
pub mod error;
pub mod formats;
pub mod geometry;
pub mod import;
pub mod material;
pub mod registry;
pub mod scene;
pub mod shader;

pub use assets::{AssetSource, DirectoryAssets, MemoryAssets, TextureImage};
pub use config::ImportOptions;
pub use coords::{CoordinateMapper, Position};
pub use document::SchematicDocument;
pub use error::{AssetError, OptionsError, SchematicError};
pub use formats::manager::{get_manager, FormatManager, SchematicImporter};
pub use formats::schematic::{decode_path, from_schematic};
pub use geometry::{GeometryBuilder, GeometryOptions};
pub use import::{CellError, ImportReport, Importer, PlacedBlock};
pub use material::{MaterialBuilder, MaterialStats};
pub use registry::{BlockDefinition, BlockRegistry, RegistryError, Strategy};
pub use scene::{
    MaterialHandle, MemoryScene, MeshHandle, ObjectHandle, ObjectTag, Placement, Scene,
    SceneSettings, TextureHandle,
};
pub use shader::{NodeKind, PreviewShape, ShaderGraph};

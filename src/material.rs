//! Block materials: one shading graph per block internal name.
//!
//! Opaque blocks sample their texture twice through box projection, once
//! flipped on Y and once rotated a quarter turn and flipped on X, and mix
//! the two diffuse responses by the squared Z component of the surface
//! normal. Top and bottom faces end up with a differently oriented tile than
//! the sides without a second texture asset.
//!
//! Transparent blocks sample their texture through the mesh UVs and use its
//! alpha to mix between a transparent shader and the diffuse response.

use crate::assets::AssetSource;
use crate::error::AssetError;
use crate::registry::{BlockDefinition, Strategy};
use crate::scene::{MaterialHandle, Scene, TextureHandle};
use crate::shader::{
    socket, Interpolation, MathOperation, NodeKind, PreviewShape, Projection, ShaderGraph,
};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::f32::consts::FRAC_PI_2;
use tracing::{debug, warn};

pub const DEFAULT_UV_MAP: &str = "UVMap";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterialStats {
    /// Graphs handed to the scene.
    pub built: usize,
    /// Requests answered from the cache.
    pub reused: usize,
    /// Materials the scene already had before this builder asked for them.
    pub adopted: usize,
    pub textures_loaded: usize,
    pub texture_failures: usize,
}

/// Builds block materials at most once per internal name and hands out the
/// same handle on every later request.
#[derive(Debug, Default)]
pub struct MaterialBuilder {
    materials: FxHashMap<SmolStr, MaterialHandle>,
    textures: FxHashMap<SmolStr, TextureHandle>,
    failed_textures: FxHashMap<SmolStr, AssetError>,
    stats: MaterialStats,
}

impl MaterialBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> MaterialStats {
        self.stats
    }

    pub fn cached(&self, internal_name: &str) -> Option<MaterialHandle> {
        self.materials.get(internal_name).copied()
    }

    pub fn cached_texture(&self, internal_name: &str) -> Option<TextureHandle> {
        self.textures.get(internal_name).copied()
    }

    pub fn get_or_build(
        &mut self,
        scene: &mut dyn Scene,
        assets: &dyn AssetSource,
        definition: &BlockDefinition,
    ) -> Result<MaterialHandle, AssetError> {
        if let Some(&handle) = self.materials.get(&definition.internal_name) {
            self.stats.reused += 1;
            return Ok(handle);
        }

        if let Some(existing) = scene.material_by_name(&definition.internal_name) {
            debug!(material = %definition.internal_name, "reusing material already in scene");
            self.stats.adopted += 1;
            self.materials
                .insert(definition.internal_name.clone(), existing);
            return Ok(existing);
        }

        // Texture first: a failed load must not leave an empty material behind.
        let texture = self.texture(scene, assets, definition)?;

        let (material, _) = scene.create_or_get_material(&definition.internal_name);
        let graph = match definition.strategy {
            Strategy::Opaque => opaque_graph(texture),
            Strategy::Transparent => transparent_graph(texture, DEFAULT_UV_MAP),
        };
        debug!(
            material = %definition.internal_name,
            strategy = ?definition.strategy,
            nodes = graph.nodes().len(),
            "built material"
        );
        scene.build_shader_graph(material, graph);
        self.stats.built += 1;

        self.materials
            .insert(definition.internal_name.clone(), material);
        Ok(material)
    }

    /// The block's texture. A texture the scene already has is used as is;
    /// otherwise the image is loaded through `assets`. A failed load is
    /// remembered and not retried.
    fn texture(
        &mut self,
        scene: &mut dyn Scene,
        assets: &dyn AssetSource,
        definition: &BlockDefinition,
    ) -> Result<TextureHandle, AssetError> {
        let name = &definition.internal_name;
        if let Some(&handle) = self.textures.get(name) {
            return Ok(handle);
        }
        if let Some(err) = self.failed_textures.get(name) {
            return Err(err.clone());
        }
        if let Some(existing) = scene.texture_by_name(name) {
            self.textures.insert(name.clone(), existing);
            return Ok(existing);
        }

        let image = match assets.load(&definition.texture) {
            Ok(image) => image,
            Err(err) => {
                warn!(block = %name, texture = %definition.texture, error = %err, "texture unavailable");
                self.stats.texture_failures += 1;
                self.failed_textures.insert(name.clone(), err.clone());
                return Err(err);
            }
        };
        self.stats.textures_loaded += 1;

        let (handle, existed) = scene.create_or_get_texture(name);
        if !existed {
            scene.set_texture_image(handle, image);
        }
        self.textures.insert(name.clone(), handle);
        Ok(handle)
    }
}

fn image_node(texture: TextureHandle, projection: Projection) -> NodeKind {
    NodeKind::ImageTexture {
        texture,
        interpolation: Interpolation::Closest,
        projection,
    }
}

/// Box-projected texture, two orientations blended by `normal.z²`.
pub fn opaque_graph(texture: TextureHandle) -> ShaderGraph {
    let mut g = ShaderGraph::new();

    let output = g.add_node(NodeKind::MaterialOutput, [600.0, 0.0]);
    let mix = g.add_node(NodeKind::MixShader, [400.0, 0.0]);
    let multiply = g.add_node(
        NodeKind::Math {
            operation: MathOperation::Multiply,
            clamp: true,
        },
        [200.0, 200.0],
    );
    let diffuse = g.add_node(NodeKind::DiffuseBsdf, [200.0, 0.0]);
    let diffuse_rotated = g.add_node(NodeKind::DiffuseBsdf, [200.0, -150.0]);
    let image = g.add_node(image_node(texture, Projection::Box), [0.0, 50.0]);
    let image_rotated = g.add_node(image_node(texture, Projection::Box), [0.0, -250.0]);
    let separate = g.add_node(NodeKind::SeparateXyz, [-300.0, 200.0]);
    let mapping = g.add_node(
        NodeKind::Mapping {
            rotation: [0.0; 3],
            scale: [1.0, -1.0, 1.0],
        },
        [-400.0, 0.0],
    );
    let mapping_rotated = g.add_node(
        NodeKind::Mapping {
            rotation: [0.0, 0.0, -FRAC_PI_2],
            scale: [-1.0, 1.0, 1.0],
        },
        [-400.0, -300.0],
    );
    let coords = g.add_node(NodeKind::TextureCoordinate, [-600.0, 0.0]);

    g.link(mix, socket::MIX_OUT_SHADER, output, socket::OUTPUT_IN_SURFACE);
    g.link(multiply, socket::MATH_OUT_VALUE, mix, socket::MIX_IN_FAC);
    g.link(diffuse, socket::BSDF_OUT, mix, socket::MIX_IN_SHADER_A);
    g.link(diffuse_rotated, socket::BSDF_OUT, mix, socket::MIX_IN_SHADER_B);
    g.link(image, socket::IMAGE_OUT_COLOR, diffuse, socket::BSDF_IN_COLOR);
    g.link(image_rotated, socket::IMAGE_OUT_COLOR, diffuse_rotated, socket::BSDF_IN_COLOR);
    g.link(separate, socket::SEPARATE_OUT_Z, multiply, socket::MATH_IN_A);
    g.link(separate, socket::SEPARATE_OUT_Z, multiply, socket::MATH_IN_B);
    g.link(mapping, socket::MAPPING_OUT_VECTOR, image, socket::IMAGE_IN_VECTOR);
    g.link(mapping_rotated, socket::MAPPING_OUT_VECTOR, image_rotated, socket::IMAGE_IN_VECTOR);
    g.link(coords, socket::TEXCOORD_OUT_GENERATED, mapping, socket::MAPPING_IN_VECTOR);
    g.link(coords, socket::TEXCOORD_OUT_GENERATED, mapping_rotated, socket::MAPPING_IN_VECTOR);
    g.link(coords, socket::TEXCOORD_OUT_NORMAL, separate, socket::SEPARATE_IN_VECTOR);

    g
}

/// UV-mapped texture whose alpha cuts through to a transparent shader.
pub fn transparent_graph(texture: TextureHandle, uv_map: &str) -> ShaderGraph {
    let mut g = ShaderGraph::new();
    // a sphere preview hides the cut-out pattern
    g.set_preview(PreviewShape::Cube);

    let output = g.add_node(NodeKind::MaterialOutput, [400.0, 0.0]);
    let diffuse = g.add_node(NodeKind::DiffuseBsdf, [0.0, -75.0]);
    let mix = g.add_node(NodeKind::MixShader, [200.0, 0.0]);
    let transparent = g.add_node(NodeKind::TransparentBsdf, [0.0, 100.0]);
    let image = g.add_node(image_node(texture, Projection::Flat), [-200.0, 75.0]);
    let uv = g.add_node(
        NodeKind::UvMap {
            uv_map: uv_map.to_string(),
        },
        [-400.0, 0.0],
    );

    g.link(diffuse, socket::BSDF_OUT, mix, socket::MIX_IN_SHADER_B);
    g.link(mix, socket::MIX_OUT_SHADER, output, socket::OUTPUT_IN_SURFACE);
    g.link(transparent, socket::BSDF_OUT, mix, socket::MIX_IN_SHADER_A);
    g.link(image, socket::IMAGE_OUT_COLOR, diffuse, socket::BSDF_IN_COLOR);
    g.link(image, socket::IMAGE_OUT_ALPHA, mix, socket::MIX_IN_FAC);
    g.link(uv, socket::UVMAP_OUT_UV, image, socket::IMAGE_IN_VECTOR);

    g
}

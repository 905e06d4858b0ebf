//! Node-based shading graphs handed to the host scene.
//!
//! A graph is a list of named nodes (named the way a node editor names them:
//! `Image Texture`, `Image Texture.001`, ...) and links from one node's
//! output socket to another node's input socket. Socket indices follow the
//! host's node layout and are spelled out in [`socket`].

use crate::scene::TextureHandle;
use serde::{Deserialize, Serialize};

pub mod socket {
    //! Socket indices, `OUT_*` for outputs and `IN_*` for inputs.

    pub const OUTPUT_IN_SURFACE: usize = 0;

    pub const MIX_IN_FAC: usize = 0;
    pub const MIX_IN_SHADER_A: usize = 1;
    pub const MIX_IN_SHADER_B: usize = 2;
    pub const MIX_OUT_SHADER: usize = 0;

    pub const MATH_IN_A: usize = 0;
    pub const MATH_IN_B: usize = 1;
    pub const MATH_OUT_VALUE: usize = 0;

    pub const BSDF_IN_COLOR: usize = 0;
    pub const BSDF_OUT: usize = 0;

    pub const IMAGE_IN_VECTOR: usize = 0;
    pub const IMAGE_OUT_COLOR: usize = 0;
    pub const IMAGE_OUT_ALPHA: usize = 1;

    pub const SEPARATE_IN_VECTOR: usize = 0;
    pub const SEPARATE_OUT_X: usize = 0;
    pub const SEPARATE_OUT_Y: usize = 1;
    pub const SEPARATE_OUT_Z: usize = 2;

    pub const MAPPING_IN_VECTOR: usize = 0;
    pub const MAPPING_OUT_VECTOR: usize = 0;

    pub const TEXCOORD_OUT_GENERATED: usize = 0;
    pub const TEXCOORD_OUT_NORMAL: usize = 1;

    pub const UVMAP_OUT_UV: usize = 0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    Linear,
    /// Nearest texel, keeps 16x16 block textures crisp.
    Closest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    /// Uses the incoming vector as-is (UV mapping).
    Flat,
    /// Projects along the dominant normal axis onto each cube face.
    Box,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MathOperation {
    Add,
    Multiply,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    MaterialOutput,
    MixShader,
    Math {
        operation: MathOperation,
        clamp: bool,
    },
    DiffuseBsdf,
    TransparentBsdf,
    ImageTexture {
        texture: TextureHandle,
        interpolation: Interpolation,
        projection: Projection,
    },
    SeparateXyz,
    Mapping {
        /// Euler XYZ, radians.
        rotation: [f32; 3],
        scale: [f32; 3],
    },
    TextureCoordinate,
    UvMap {
        uv_map: String,
    },
}

impl NodeKind {
    /// Editor name of the first node of this kind; later ones get `.001`, ...
    pub fn base_name(&self) -> &'static str {
        match self {
            NodeKind::MaterialOutput => "Material Output",
            NodeKind::MixShader => "Mix Shader",
            NodeKind::Math { .. } => "Math",
            NodeKind::DiffuseBsdf => "Diffuse BSDF",
            NodeKind::TransparentBsdf => "Transparent BSDF",
            NodeKind::ImageTexture { .. } => "Image Texture",
            NodeKind::SeparateXyz => "Separate XYZ",
            NodeKind::Mapping { .. } => "Mapping",
            NodeKind::TextureCoordinate => "Texture Coordinate",
            NodeKind::UvMap { .. } => "UV Map",
        }
    }

    pub fn input_count(&self) -> usize {
        match self {
            NodeKind::MaterialOutput => 3,
            NodeKind::MixShader => 3,
            NodeKind::Math { .. } => 2,
            NodeKind::DiffuseBsdf => 3,
            NodeKind::TransparentBsdf => 1,
            NodeKind::ImageTexture { .. } => 1,
            NodeKind::SeparateXyz => 1,
            NodeKind::Mapping { .. } => 1,
            NodeKind::TextureCoordinate => 0,
            NodeKind::UvMap { .. } => 0,
        }
    }

    pub fn output_count(&self) -> usize {
        match self {
            NodeKind::MaterialOutput => 0,
            NodeKind::ImageTexture { .. } => 2,
            NodeKind::SeparateXyz => 3,
            NodeKind::TextureCoordinate => 7,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderNode {
    pub name: String,
    pub kind: NodeKind,
    /// Editor placement; cosmetic, but hosts lay the graph out with it.
    pub location: [f32; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLink {
    pub from: NodeId,
    pub output: usize,
    pub to: NodeId,
    pub input: usize,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GraphError {
    #[error("Link references missing node {0:?}")]
    MissingNode(NodeId),
    #[error("Node '{node}' has no output socket {socket}")]
    NoSuchOutput { node: String, socket: usize },
    #[error("Node '{node}' has no input socket {socket}")]
    NoSuchInput { node: String, socket: usize },
    #[error("Input {socket} of '{node}' is linked more than once")]
    InputLinkedTwice { node: String, socket: usize },
    #[error("Graph has no material output")]
    NoOutput,
}

/// Shape the host renders the material's preview thumbnail on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewShape {
    #[default]
    Sphere,
    Cube,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShaderGraph {
    nodes: Vec<ShaderNode>,
    links: Vec<NodeLink>,
    #[serde(default)]
    preview: PreviewShape,
}

impl ShaderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, naming it after its kind with the editor's `.NNN`
    /// suffix for repeats.
    pub fn add_node(&mut self, kind: NodeKind, location: [f32; 2]) -> NodeId {
        let base = kind.base_name();
        let repeats = self
            .nodes
            .iter()
            .filter(|n| n.kind.base_name() == base)
            .count();
        let name = if repeats == 0 {
            base.to_string()
        } else {
            format!("{}.{:03}", base, repeats)
        };

        self.nodes.push(ShaderNode {
            name,
            kind,
            location,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn link(&mut self, from: NodeId, output: usize, to: NodeId, input: usize) {
        self.links.push(NodeLink {
            from,
            output,
            to,
            input,
        });
    }

    pub fn preview(&self) -> PreviewShape {
        self.preview
    }

    pub fn set_preview(&mut self, preview: PreviewShape) {
        self.preview = preview;
    }

    pub fn nodes(&self) -> &[ShaderNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[NodeLink] {
        &self.links
    }

    pub fn node(&self, id: NodeId) -> Option<&ShaderNode> {
        self.nodes.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// True when `from_name.output` feeds `to_name.input`.
    pub fn is_linked(&self, from_name: &str, output: usize, to_name: &str, input: usize) -> bool {
        match (self.find(from_name), self.find(to_name)) {
            (Some(from), Some(to)) => self.links.contains(&NodeLink {
                from,
                output,
                to,
                input,
            }),
            _ => false,
        }
    }

    /// Textures sampled by any node of the graph.
    pub fn textures(&self) -> impl Iterator<Item = TextureHandle> + '_ {
        self.nodes.iter().filter_map(|n| match n.kind {
            NodeKind::ImageTexture { texture, .. } => Some(texture),
            _ => None,
        })
    }

    /// Checks every link against the socket layout of its nodes.
    pub fn validate(&self) -> Result<(), GraphError> {
        if !self
            .nodes
            .iter()
            .any(|n| n.kind == NodeKind::MaterialOutput)
        {
            return Err(GraphError::NoOutput);
        }

        let mut used_inputs = Vec::with_capacity(self.links.len());
        for link in &self.links {
            let from = self.node(link.from).ok_or(GraphError::MissingNode(link.from))?;
            let to = self.node(link.to).ok_or(GraphError::MissingNode(link.to))?;

            if link.output >= from.kind.output_count() {
                return Err(GraphError::NoSuchOutput {
                    node: from.name.clone(),
                    socket: link.output,
                });
            }
            if link.input >= to.kind.input_count() {
                return Err(GraphError::NoSuchInput {
                    node: to.name.clone(),
                    socket: link.input,
                });
            }
            if used_inputs.contains(&(link.to, link.input)) {
                return Err(GraphError::InputLinkedTwice {
                    node: to.name.clone(),
                    socket: link.input,
                });
            }
            used_inputs.push((link.to, link.input));
        }
        Ok(())
    }
}

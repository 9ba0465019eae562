//! Material descriptions consumed by the network assembler.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::Role;
use crate::scene::NodeType;

/// Supported shader families. Closed set: requests outside it never reach
/// the scene graph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ShaderType {
    Standard,
    TwoSided,
    Blend,
}

impl ShaderType {
    pub fn as_str(self) -> &'static str {
        match self {
            ShaderType::Standard => "standard",
            ShaderType::TwoSided => "two_sided",
            ShaderType::Blend => "blend",
        }
    }

    pub fn parse(s: &str) -> Option<ShaderType> {
        match s {
            "standard" => Some(ShaderType::Standard),
            "two_sided" => Some(ShaderType::TwoSided),
            "blend" => Some(ShaderType::Blend),
            _ => None,
        }
    }

    pub fn node_type(self) -> NodeType {
        match self {
            ShaderType::Standard => NodeType::StandardShader,
            ShaderType::TwoSided => NodeType::TwoSidedShader,
            ShaderType::Blend => NodeType::BlendShader,
        }
    }

    pub fn from_node_type(ty: NodeType) -> Option<ShaderType> {
        match ty {
            NodeType::StandardShader => Some(ShaderType::Standard),
            NodeType::TwoSidedShader => Some(ShaderType::TwoSided),
            NodeType::BlendShader => Some(ShaderType::Blend),
            _ => None,
        }
    }

    /// The shader family whose connection rules textures resolve against.
    /// Two-sided networks carry their textures on the embedded standard
    /// sub-network.
    pub fn texture_carrier(self) -> ShaderType {
        match self {
            ShaderType::TwoSided => ShaderType::Standard,
            other => other,
        }
    }
}

impl fmt::Display for ShaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the assembler needs to build one material: the shader family,
/// the name generated node names derive from, and at most one texture path
/// per channel role. Roles without a texture are simply absent.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDescription {
    pub name: String,
    pub shader: ShaderType,
    pub textures: BTreeMap<Role, String>,
}

impl MaterialDescription {
    pub fn new(name: impl Into<String>, shader: ShaderType) -> Self {
        MaterialDescription {
            name: name.into(),
            shader,
            textures: BTreeMap::new(),
        }
    }

    pub fn with_texture(mut self, role: Role, path: impl Into<String>) -> Self {
        self.textures.insert(role, path.into());
        self
    }
}

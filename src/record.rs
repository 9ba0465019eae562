//! Persisted records exchanged with the asset library.
//!
//! This crate consumes and produces these shapes in memory; reading and
//! writing the JSON files is the asset library's job, with thin helpers
//! here for batch tools.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::classify::Role;
use crate::error::BuildError;
use crate::material::{MaterialDescription, ShaderType};

/// One material as the asset library stores it: a name, a shader family
/// string, and a role-to-path texture mapping. Paths that matched no role
/// during scanning ride along as `unknown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub material_name: String,
    pub material_shader: String,
    #[serde(default)]
    pub textures: BTreeMap<Role, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<String>,
}

impl MaterialRecord {
    pub fn new(material_name: impl Into<String>, material_shader: impl Into<String>) -> Self {
        MaterialRecord {
            material_name: material_name.into(),
            material_shader: material_shader.into(),
            textures: BTreeMap::new(),
            unknown: Vec::new(),
        }
    }
}

impl TryFrom<&MaterialRecord> for MaterialDescription {
    type Error = BuildError;

    fn try_from(record: &MaterialRecord) -> Result<Self, Self::Error> {
        let shader = ShaderType::parse(&record.material_shader).ok_or_else(|| {
            BuildError::UnsupportedShaderType {
                shader: record.material_shader.clone(),
            }
        })?;
        Ok(MaterialDescription {
            name: record.material_name.clone(),
            shader,
            textures: record.textures.clone(),
        })
    }
}

impl From<&MaterialDescription> for MaterialRecord {
    fn from(desc: &MaterialDescription) -> Self {
        MaterialRecord {
            material_name: desc.name.clone(),
            material_shader: desc.shader.to_string(),
            textures: desc.textures.clone(),
            unknown: Vec::new(),
        }
    }
}

/// The slice of an asset's published record this pipeline consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub asset_name: String,
    #[serde(default)]
    pub asset_type: String,
    #[serde(default)]
    pub materials: Vec<MaterialRecord>,
    #[serde(default)]
    pub tags: Vec<String>,
}

pub fn load_asset_record(path: impl AsRef<Path>) -> Result<AssetRecord> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read asset record {}", path.display()))?;
    let record: AssetRecord = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse asset record {}", path.display()))?;
    Ok(record)
}

pub fn save_asset_record(path: impl AsRef<Path>, record: &AssetRecord) -> Result<()> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(record).context("failed to serialize asset record")?;
    std::fs::write(path, text)
        .with_context(|| format!("failed to write asset record {}", path.display()))?;
    Ok(())
}

//! Connection-rule table: which texture channel wires into which shader
//! attribute, per shader family.
//!
//! The table is authoring-time constant data shipped with the crate as a
//! JSON asset; studios can override it with an externally authored file.
//! Lookups for (shader, role) pairs the table does not cover are an error,
//! never a silent no-op.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::classify::Role;
use crate::error::BuildError;
use crate::material::ShaderType;

const DEFAULT_RULES_JSON: &str = include_str!("../assets/connection-rules.json");

static DEFAULT_TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    RuleTable::from_json(DEFAULT_RULES_JSON).expect("embedded connection-rule table is valid")
});

/// Which generated node a rule's target attribute lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSite {
    Shader,
    Group,
}

/// Wiring target for one (shader family, channel role) pair: read `source`
/// on the texture stage, drive `target` on the shader or its grouping
/// object.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionRule {
    pub source: String,
    pub target: String,
    #[serde(default = "default_site")]
    pub site: RuleSite,
}

fn default_site() -> RuleSite {
    RuleSite::Shader
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleTable {
    pub version: u32,
    pub shaders: BTreeMap<ShaderType, BTreeMap<Role, ConnectionRule>>,
}

/// The table shipped with the crate.
pub fn default_table() -> &'static RuleTable {
    &DEFAULT_TABLE
}

impl RuleTable {
    pub fn from_json(text: &str) -> Result<RuleTable> {
        let table: RuleTable =
            serde_json::from_str(text).context("failed to parse connection-rule table")?;
        table.validate()?;
        Ok(table)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<RuleTable> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rule table {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("invalid rule table {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        for (shader, roles) in &self.shaders {
            for (role, rule) in roles {
                if rule.source.is_empty() || rule.target.is_empty() {
                    bail!("rule for ({shader}, {role}) has an empty attribute name");
                }
            }
        }
        Ok(())
    }

    /// Resolve the rule for a texture role, following the shader family's
    /// texture carrier (two-sided resolves against standard).
    pub fn lookup(&self, shader: ShaderType, role: Role) -> Option<&ConnectionRule> {
        self.shaders
            .get(&shader.texture_carrier())
            .and_then(|roles| roles.get(&role))
    }

    /// Validate a whole description's roles before any node is created, so
    /// a missing rule can never surface mid-build with part of the network
    /// already wired.
    pub fn preflight(
        &self,
        shader: ShaderType,
        roles: impl IntoIterator<Item = Role>,
    ) -> Result<(), BuildError> {
        let carrier = shader.texture_carrier();
        if !self.shaders.contains_key(&carrier) {
            return Err(BuildError::UnsupportedShaderType {
                shader: carrier.to_string(),
            });
        }
        for role in roles {
            if self.lookup(shader, role).is_none() {
                return Err(BuildError::UnknownConnectionRule {
                    shader: carrier,
                    role,
                });
            }
        }
        Ok(())
    }
}

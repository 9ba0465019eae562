//! Shading-network assembly from a material description.
//!
//! The assembler is stateless: one [`MaterialBuilder::build`] call turns a
//! [`MaterialDescription`] plus a [`RuleTable`] into scene-side node
//! creation and wiring, returning the handles the caller assigns to
//! geometry. All roles are validated against the rule table before the
//! first node is created, so a build either fails with nothing mutated or
//! stops at a host-call failure.

pub mod displacement;
pub mod projection;
pub mod texture;

use crate::classify::Role;
use crate::error::BuildError;
use crate::material::{MaterialDescription, ShaderType};
use crate::rules::{RuleSite, RuleTable, default_table};
use crate::scene::{AttrValue, NodeId, NodeType, Plug, SceneGraph};

use displacement::{DisplacementOptions, create_displacement_node};
use texture::{TextureOptions, create_texture, is_ptex_path};

/// Handles of one built network. Two-sided networks carry their embedded
/// standard sub-network in `inner`; its displacement handle (if any) stays
/// with the sub-network.
#[derive(Debug)]
pub struct BuiltNetwork {
    pub shader: NodeId,
    pub group: NodeId,
    pub displacement: Option<NodeId>,
    pub inner: Option<Box<BuiltNetwork>>,
}

pub struct MaterialBuilder<'a, S: SceneGraph> {
    scene: &'a mut S,
    rules: &'a RuleTable,
}

impl<'a, S: SceneGraph> MaterialBuilder<'a, S> {
    pub fn new(scene: &'a mut S, rules: &'a RuleTable) -> Self {
        MaterialBuilder { scene, rules }
    }

    pub fn build(&mut self, desc: &MaterialDescription) -> Result<BuiltNetwork, BuildError> {
        match desc.shader {
            ShaderType::Blend => Err(BuildError::NotImplemented),
            ShaderType::Standard => {
                self.rules
                    .preflight(desc.shader, desc.textures.keys().copied())?;
                self.build_standard(desc)
            }
            ShaderType::TwoSided => {
                self.rules
                    .preflight(desc.shader, desc.textures.keys().copied())?;
                self.build_two_sided(desc)
            }
        }
    }

    fn build_standard(&mut self, desc: &MaterialDescription) -> Result<BuiltNetwork, BuildError> {
        log::debug!("building standard network `{}`", desc.name);

        let shader = self
            .scene
            .create_node(NodeType::StandardShader, &format!("{}_mtl", desc.name))?;
        let group = self
            .scene
            .create_node(NodeType::ShadingGroup, &format!("{}_sg", desc.name))?;
        self.scene.connect(
            Plug::new(shader, "out_color"),
            Plug::new(group, "surface_shader"),
        )?;

        if desc.textures.is_empty() {
            return Ok(BuiltNetwork {
                shader,
                group,
                displacement: None,
                inner: None,
            });
        }

        // One UV provider is shared by every 2D texture channel.
        let uv = self
            .scene
            .create_node(NodeType::Place2d, &format!("{}_uv", desc.name))?;

        let carrier = desc.shader.texture_carrier();
        let mut displacement = None;

        for (role, path) in &desc.textures {
            let rule =
                self.rules
                    .lookup(carrier, *role)
                    .ok_or(BuildError::UnknownConnectionRule {
                        shader: carrier,
                        role: *role,
                    })?;
            let ptex = is_ptex_path(path);
            let base = format!("{}_{role}", desc.name);

            if *role == Role::Displacement {
                // Displacement bypasses color correction and the shared UV
                // provider; its raw output drives the grouping object.
                let created = create_texture(
                    self.scene,
                    &TextureOptions {
                        name: Some(&base),
                        path: Some(path),
                        color_correct: false,
                        own_uv: false,
                        ptex,
                    },
                )?;
                let disp = create_displacement_node(
                    self.scene,
                    &DisplacementOptions {
                        name: Some(&desc.name),
                        source: Some(created.texture),
                        member: None,
                    },
                )?;
                self.scene.connect(
                    Plug::new(created.texture, &rule.source),
                    Plug::new(group, &rule.target),
                )?;
                displacement = Some(disp);
                continue;
            }

            let created = create_texture(
                self.scene,
                &TextureOptions {
                    name: Some(&base),
                    path: Some(path),
                    color_correct: !ptex,
                    own_uv: false,
                    ptex,
                },
            )?;
            let stage = created.color_correct.unwrap_or(created.texture);

            let target = match rule.site {
                RuleSite::Shader => Plug::new(shader, &rule.target),
                RuleSite::Group => Plug::new(group, &rule.target),
            };
            self.scene
                .connect(Plug::new(stage, &rule.source), target)?;

            if !ptex {
                self.scene.connect(
                    Plug::new(uv, "out_uv"),
                    Plug::new(created.texture, "uv_coord"),
                )?;
            }

            match role {
                Role::Roughness => {
                    self.scene
                        .set_attr(shader, "use_roughness", AttrValue::Bool(true))?;
                }
                Role::Normal => {
                    self.scene
                        .set_attr(shader, "bump_map_type", AttrValue::Int(1))?;
                }
                _ => {}
            }
        }

        Ok(BuiltNetwork {
            shader,
            group,
            displacement,
            inner: None,
        })
    }

    fn build_two_sided(&mut self, desc: &MaterialDescription) -> Result<BuiltNetwork, BuildError> {
        log::debug!("building two-sided network `{}`", desc.name);

        let shader = self.scene.create_node(
            NodeType::TwoSidedShader,
            &format!("{}_2sided_mtl", desc.name),
        )?;
        let group = self
            .scene
            .create_node(NodeType::ShadingGroup, &format!("{}_2sided_sg", desc.name))?;
        self.scene.connect(
            Plug::new(shader, "out_color"),
            Plug::new(group, "surface_shader"),
        )?;

        let inner_desc = MaterialDescription {
            shader: ShaderType::Standard,
            ..desc.clone()
        };
        let inner = self.build_standard(&inner_desc)?;

        // The same sub-shader output feeds both faces.
        self.scene.connect(
            Plug::new(inner.shader, "out_color"),
            Plug::new(shader, "front_material"),
        )?;
        self.scene.connect(
            Plug::new(inner.shader, "out_color"),
            Plug::new(shader, "back_material"),
        )?;

        Ok(BuiltNetwork {
            shader,
            group,
            displacement: None,
            inner: Some(Box::new(inner)),
        })
    }
}

/// Build one material with the crate's default rule table.
pub fn build_material<S: SceneGraph>(
    scene: &mut S,
    desc: &MaterialDescription,
) -> Result<BuiltNetwork, BuildError> {
    let built = MaterialBuilder::new(scene, default_table()).build(desc)?;
    log::info!("created material `{}`", desc.name);
    Ok(built)
}

//! Displacement-shader construction with the pipeline's fixed subdivision
//! defaults.

use crate::scene::{AttrValue, NodeId, NodeType, Plug, SceneError, SceneGraph};

/// Extension attribute groups every displacement node needs activated
/// before its subdivision controls exist.
const ATTR_GROUPS: &[&str] = &["subdivision", "subdivision_quality", "displacement"];

#[derive(Debug, Clone, Copy, Default)]
pub struct DisplacementOptions<'a> {
    pub name: Option<&'a str>,
    /// Texture node whose color output drives the displacement.
    pub source: Option<NodeId>,
    /// Object to add to the displacement set.
    pub member: Option<NodeId>,
}

/// Create a displacement node pre-configured with the pipeline defaults,
/// optionally renamed, wired from a source texture, and applied to an
/// object.
pub fn create_displacement_node<S: SceneGraph>(
    scene: &mut S,
    opts: &DisplacementOptions<'_>,
) -> Result<NodeId, SceneError> {
    let base = opts.name.unwrap_or("displacement");
    let node = scene.create_node(NodeType::Displacement, &format!("{base}_disp"))?;

    for group in ATTR_GROUPS {
        scene.enable_attr_group(node, group)?;
    }

    scene.set_attr(node, "override_global", AttrValue::Bool(true))?;
    scene.set_attr(node, "edge_length", AttrValue::Float(1.0))?;
    scene.set_attr(node, "max_subdivs", AttrValue::Int(128))?;
    scene.set_attr(node, "shift", AttrValue::Float(-0.5))?;

    if let Some(source) = opts.source {
        scene.connect(
            Plug::new(source, "out_color"),
            Plug::new(node, "displacement"),
        )?;
    }

    if let Some(member) = opts.member {
        scene.add_to_set(node, member)?;
    }

    log::debug!("created displacement node `{}`", scene.node_name(node)?);

    Ok(node)
}

//! Camera-projection texture rigs for matte and cleanup work.

use crate::builder::texture::{TextureOptions, create_texture};
use crate::scene::{AttrValue, NodeId, NodeType, Plug, SceneError, SceneGraph};

#[derive(Debug, Clone, Copy)]
pub struct ProjectionRig {
    pub texture: NodeId,
    pub uv: NodeId,
    pub color_correct: NodeId,
    pub placement: NodeId,
    pub projection: NodeId,
    pub composite: Option<NodeId>,
}

/// Build a 3D projection rig around a file texture: clamped UVs, black
/// defaults, a placement node driving the projection matrix, and optionally
/// a compositing node keyed by the projection's red channel.
pub fn create_projection<S: SceneGraph>(
    scene: &mut S,
    name: &str,
    path: &str,
    composite: bool,
) -> Result<ProjectionRig, SceneError> {
    let created = create_texture(
        scene,
        &TextureOptions {
            name: Some(name),
            path: Some(path),
            ..Default::default()
        },
    )?;
    let uv = created.uv.expect("projection textures always carry a uv provider");
    let color_correct = created
        .color_correct
        .expect("projection textures always carry a color-correct stage");

    scene.set_attr(uv, "wrap_u", AttrValue::Bool(false))?;
    scene.set_attr(uv, "wrap_v", AttrValue::Bool(false))?;
    scene.set_attr(
        created.texture,
        "default_color",
        AttrValue::Vec3([0.0, 0.0, 0.0]),
    )?;

    let placement = scene.create_node(NodeType::Place3d, &format!("{name}_place3d"))?;
    let projection = scene.create_node(NodeType::Projection, &format!("{name}_projection"))?;

    scene.connect(
        Plug::new(placement, "world_inverse_matrix"),
        Plug::new(projection, "placement_matrix"),
    )?;
    scene.connect(
        Plug::new(color_correct, "out_color"),
        Plug::new(projection, "image"),
    )?;
    scene.set_attr(projection, "default_color", AttrValue::Vec3([0.0, 0.0, 0.0]))?;

    let composite = if composite {
        let comp = scene.create_node(NodeType::ColorComposite, &format!("{name}_composite"))?;
        scene.connect(
            Plug::new(projection, "out_color_r"),
            Plug::new(comp, "factor"),
        )?;
        scene.set_attr(comp, "operation", AttrValue::Int(2))?;
        Some(comp)
    } else {
        None
    };

    Ok(ProjectionRig {
        texture: created.texture,
        uv,
        color_correct,
        placement,
        projection,
        composite,
    })
}

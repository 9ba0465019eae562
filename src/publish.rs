//! Publish-side material harvesting.
//!
//! Scans live shading networks into records the asset library persists,
//! re-paths file textures to their published locations, and assigns built
//! groups to geometry. The scan's roughness handling carries one scene side
//! effect: recognizing a roughness map severs the texture's auto-link into
//! the shader's scalar roughness so the map drives the channel alone.

use std::path::Path;

use crate::builder::texture::attach_color_correct;
use crate::classify::Role;
use crate::graph::upstream_nodes_of_type;
use crate::material::ShaderType;
use crate::record::MaterialRecord;
use crate::scene::{AttrValue, NodeId, NodeType, Plug, SceneError, SceneGraph};

/// File-texture nodes feeding a material, in upstream discovery order.
pub fn file_texture_nodes<S: SceneGraph>(
    scene: &S,
    material: NodeId,
) -> Result<Vec<NodeId>, SceneError> {
    upstream_nodes_of_type(scene, material, NodeType::FileTexture)
}

/// Scan a material node into a persistable record: classify every upstream
/// file texture into a channel role, collecting unrecognized paths as
/// unknowns. Roles hit by several textures keep the last one discovered.
pub fn describe_material<S: SceneGraph>(
    scene: &mut S,
    material: NodeId,
) -> Result<MaterialRecord, SceneError> {
    let material_name = scene.node_name(material)?;
    let node_ty = scene.node_type(material)?;
    let material_shader = match ShaderType::from_node_type(node_ty) {
        Some(shader) => shader.to_string(),
        None => node_ty.type_name().to_string(),
    };

    let mut record = MaterialRecord::new(material_name, material_shader);

    for file_node in file_texture_nodes(scene, material)? {
        let Some(AttrValue::Str(path)) = scene.get_attr(file_node, "file_path")? else {
            log::debug!(
                "file node `{}` has no path set, skipping",
                scene.node_name(file_node)?
            );
            continue;
        };
        match Role::match_path(&path) {
            Some(role) => {
                if role == Role::Roughness {
                    sever_roughness_auto_link(scene, file_node, material)?;
                }
                record.textures.insert(role, path);
            }
            None => record.unknown.push(path),
        }
    }

    Ok(record)
}

/// Remove the default scalar-roughness link a host import leaves between a
/// roughness texture and its shader. Networks without the link are left
/// alone; only that specific absence is tolerated.
fn sever_roughness_auto_link<S: SceneGraph>(
    scene: &mut S,
    file_node: NodeId,
    material: NodeId,
) -> Result<(), SceneError> {
    match scene.disconnect(
        Plug::new(file_node, "out_color_r"),
        Plug::new(material, "roughness_amount"),
    ) {
        Ok(()) => Ok(()),
        Err(err @ (SceneError::NotConnected { .. } | SceneError::MissingAttribute { .. })) => {
            log::debug!("no roughness auto-link to sever: {err}");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Point a material's file textures at their published copies.
///
/// A texture is re-pathed only when `publish_root/<material>/<file name>`
/// exists on disk. Every file texture additionally gets a color-correct
/// stage if it lacks one, and the material's reflection color is reset to
/// the publish default; both steps are best-effort. Returns the number of
/// re-pathed textures.
pub fn repath_file_textures<S: SceneGraph>(
    scene: &mut S,
    material: NodeId,
    publish_root: &Path,
) -> Result<usize, SceneError> {
    let material_name = scene.node_name(material)?;

    set_reflection_default(scene, material)?;

    let mut repathed = 0;
    for file_node in file_texture_nodes(scene, material)? {
        let Some(AttrValue::Str(path)) = scene.get_attr(file_node, "file_path")? else {
            continue;
        };
        let Some(file_name) = Path::new(&path).file_name() else {
            continue;
        };

        let candidate = publish_root.join(&material_name).join(file_name);
        if candidate.is_file() {
            scene.set_attr(
                file_node,
                "file_path",
                AttrValue::Str(candidate.to_string_lossy().into_owned()),
            )?;
            log::debug!("re-pathed `{}`", file_name.to_string_lossy());
            repathed += 1;
        }

        ensure_color_correct(scene, file_node)?;
    }

    Ok(repathed)
}

fn ensure_color_correct<S: SceneGraph>(scene: &mut S, file_node: NodeId) -> Result<(), SceneError> {
    let outgoing = scene.outgoing_connections(file_node)?;
    for conn in &outgoing {
        if scene.node_type(conn.dst.node)? == NodeType::ColorCorrect {
            return Ok(());
        }
    }
    match attach_color_correct(scene, file_node, None) {
        Ok(_) => Ok(()),
        Err(err @ SceneError::AlreadyConnected { .. }) => {
            log::debug!("skipping color-correct retrofit: {err}");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn set_reflection_default<S: SceneGraph>(
    scene: &mut S,
    material: NodeId,
) -> Result<(), SceneError> {
    match scene.set_attr(material, "reflection_color", AttrValue::Vec3([0.7, 0.7, 0.7])) {
        Ok(()) => Ok(()),
        Err(err @ SceneError::MissingAttribute { .. }) => {
            log::debug!("shader variant has no reflection color: {err}");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Assign a built shading group to a piece of geometry.
pub fn assign_material<S: SceneGraph>(
    scene: &mut S,
    group: NodeId,
    geometry: NodeId,
) -> Result<(), SceneError> {
    scene.add_to_set(group, geometry)
}

//! Texture-node creation shared by the network assembler and publish tools.

use std::path::Path;

use crate::scene::{AttrValue, NodeId, NodeType, Plug, SceneError, SceneGraph};

/// Paint-tool-native per-face textures use a dedicated node type with no UV
/// indirection.
pub fn is_ptex_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tex"))
}

#[derive(Debug, Clone)]
pub struct TextureOptions<'a> {
    pub name: Option<&'a str>,
    pub path: Option<&'a str>,
    /// Create a downstream color-correction stage.
    pub color_correct: bool,
    /// Create a dedicated UV provider for this texture. The assembler passes
    /// `false` and shares one provider across the whole material.
    pub own_uv: bool,
    pub ptex: bool,
}

impl Default for TextureOptions<'_> {
    fn default() -> Self {
        TextureOptions {
            name: None,
            path: None,
            color_correct: true,
            own_uv: true,
            ptex: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CreatedTexture {
    pub texture: NodeId,
    pub uv: Option<NodeId>,
    pub color_correct: Option<NodeId>,
}

/// Create a file or ptex texture node, optionally with its own UV provider
/// and color-correction stage.
pub fn create_texture<S: SceneGraph>(
    scene: &mut S,
    opts: &TextureOptions<'_>,
) -> Result<CreatedTexture, SceneError> {
    let base = opts.name.unwrap_or("texture");
    let (ty, suffix, path_attr) = if opts.ptex {
        (NodeType::PtexTexture, "_ptex", "ptex_file")
    } else {
        (NodeType::FileTexture, "_tex", "file_path")
    };

    let texture = scene.create_node(ty, &format!("{base}{suffix}"))?;
    if let Some(path) = opts.path {
        scene.set_attr(texture, path_attr, AttrValue::Str(path.to_string()))?;
    }

    let uv = if opts.own_uv && !opts.ptex {
        let uv = scene.create_node(NodeType::Place2d, &format!("{base}_uv"))?;
        scene.connect(Plug::new(uv, "out_uv"), Plug::new(texture, "uv_coord"))?;
        Some(uv)
    } else {
        None
    };

    let color_correct = if opts.color_correct {
        Some(attach_color_correct(scene, texture, Some(base))?)
    } else {
        None
    };

    log::debug!("created texture node `{}`", scene.node_name(texture)?);

    Ok(CreatedTexture {
        texture,
        uv,
        color_correct,
    })
}

/// Insert a color-correction node downstream of `source`.
///
/// Existing consumers of the source's `out_color*`/`out_alpha` plugs are
/// re-routed through the new node, so this also retrofits textures that are
/// already wired into a shader. The gamma channel is self-linked across the
/// three color components: a single scalar on X drives Y and Z.
pub fn attach_color_correct<S: SceneGraph>(
    scene: &mut S,
    source: NodeId,
    name: Option<&str>,
) -> Result<NodeId, SceneError> {
    let base = match name {
        Some(n) => n.to_string(),
        None => scene.node_name(source)?,
    };

    // Snapshot downstream consumers before any new wiring appears.
    let downstream = scene.outgoing_connections(source)?;

    let cc = scene.create_node(NodeType::ColorCorrect, &format!("{base}_cc"))?;
    scene.connect(
        Plug::new(cc, "color_gamma_x"),
        Plug::new(cc, "color_gamma_y"),
    )?;
    scene.connect(
        Plug::new(cc, "color_gamma_x"),
        Plug::new(cc, "color_gamma_z"),
    )?;

    for conn in &downstream {
        let attr = conn.src.attr.as_str();
        if attr.starts_with("out_color") || attr == "out_alpha" {
            scene.connect_force(Plug::new(cc, attr), conn.dst.clone())?;
        }
    }

    scene.connect(Plug::new(source, "out_color"), Plug::new(cc, "in_color"))?;
    scene.connect(Plug::new(source, "out_alpha"), Plug::new(cc, "in_alpha"))?;

    log::debug!("created color-correct node `{}`", scene.node_name(cc)?);

    Ok(cc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::InMemoryScene;

    #[test]
    fn ptex_detection_checks_the_extension_only() {
        assert!(is_ptex_path("/maps/skin.tex"));
        assert!(is_ptex_path("/maps/skin.TEX"));
        assert!(!is_ptex_path("/maps/skin.tex.png"));
        assert!(!is_ptex_path("/maps/texture.png"));
        assert!(!is_ptex_path("tex"));
    }

    #[test]
    fn default_texture_gets_uv_and_color_correct() {
        let mut scene = InMemoryScene::new();
        let created = create_texture(
            &mut scene,
            &TextureOptions {
                name: Some("wood_diffuse"),
                path: Some("/maps/wood_diffuse.png"),
                ..Default::default()
            },
        )
        .unwrap();

        let uv = created.uv.unwrap();
        let cc = created.color_correct.unwrap();

        assert_eq!(scene.node_name(created.texture).unwrap(), "wood_diffuse_tex");
        assert_eq!(scene.node_name(uv).unwrap(), "wood_diffuse_uv");
        assert_eq!(scene.node_name(cc).unwrap(), "wood_diffuse_cc");
        assert_eq!(
            scene.get_attr(created.texture, "file_path").unwrap(),
            Some(AttrValue::Str("/maps/wood_diffuse.png".to_string()))
        );
        assert!(scene.has_connection(
            &Plug::new(uv, "out_uv"),
            &Plug::new(created.texture, "uv_coord")
        ));
        assert!(scene.has_connection(
            &Plug::new(created.texture, "out_color"),
            &Plug::new(cc, "in_color")
        ));
        assert!(scene.has_connection(
            &Plug::new(created.texture, "out_alpha"),
            &Plug::new(cc, "in_alpha")
        ));
    }

    #[test]
    fn ptex_texture_skips_uv_and_stores_path_on_ptex_attr() {
        let mut scene = InMemoryScene::new();
        let created = create_texture(
            &mut scene,
            &TextureOptions {
                name: Some("skin"),
                path: Some("/maps/skin.tex"),
                color_correct: false,
                own_uv: true,
                ptex: true,
            },
        )
        .unwrap();

        assert!(created.uv.is_none());
        assert!(created.color_correct.is_none());
        assert_eq!(scene.node_name(created.texture).unwrap(), "skin_ptex");
        assert_eq!(
            scene.get_attr(created.texture, "ptex_file").unwrap(),
            Some(AttrValue::Str("/maps/skin.tex".to_string()))
        );
    }

    #[test]
    fn gamma_scalar_drives_all_three_components() {
        let mut scene = InMemoryScene::new();
        let tex = scene.create_node(NodeType::FileTexture, "tex").unwrap();
        let cc = attach_color_correct(&mut scene, tex, None).unwrap();

        assert!(scene.has_connection(
            &Plug::new(cc, "color_gamma_x"),
            &Plug::new(cc, "color_gamma_y")
        ));
        assert!(scene.has_connection(
            &Plug::new(cc, "color_gamma_x"),
            &Plug::new(cc, "color_gamma_z")
        ));
    }

    #[test]
    fn retrofit_reroutes_existing_consumers_through_the_new_node() {
        let mut scene = InMemoryScene::new();
        let tex = scene.create_node(NodeType::FileTexture, "tex").unwrap();
        let shader = scene.create_node(NodeType::StandardShader, "m").unwrap();

        scene
            .connect(Plug::new(tex, "out_color"), Plug::new(shader, "color"))
            .unwrap();
        scene
            .connect(
                Plug::new(tex, "out_color_r"),
                Plug::new(shader, "metalness"),
            )
            .unwrap();
        scene
            .connect(Plug::new(tex, "out_size"), Plug::new(shader, "color_amount"))
            .unwrap();

        let cc = attach_color_correct(&mut scene, tex, None).unwrap();

        // Color and alpha consumers now read from the color-correct node.
        assert!(scene.has_connection(&Plug::new(cc, "out_color"), &Plug::new(shader, "color")));
        assert!(scene.has_connection(
            &Plug::new(cc, "out_color_r"),
            &Plug::new(shader, "metalness")
        ));
        assert!(!scene.has_connection(&Plug::new(tex, "out_color"), &Plug::new(shader, "color")));

        // Non-color plugs keep their original wiring.
        assert!(scene.has_connection(
            &Plug::new(tex, "out_size"),
            &Plug::new(shader, "color_amount")
        ));

        // The texture itself feeds the new node.
        assert!(scene.has_connection(&Plug::new(tex, "out_color"), &Plug::new(cc, "in_color")));
    }

    #[test]
    fn retrofit_names_derive_from_the_source_node() {
        let mut scene = InMemoryScene::new();
        let tex = scene.create_node(NodeType::FileTexture, "brick_tex").unwrap();
        let cc = attach_color_correct(&mut scene, tex, None).unwrap();
        assert_eq!(scene.node_name(cc).unwrap(), "brick_tex_cc");
    }
}

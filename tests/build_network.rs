use material_forge::builder::{BuiltNetwork, build_material};
use material_forge::classify::Role;
use material_forge::error::BuildError;
use material_forge::material::{MaterialDescription, ShaderType};
use material_forge::record::AssetRecord;
use material_forge::scene::{InMemoryScene, NodeType, SceneGraph};

const CRATE_ASSET_JSON: &str = r#"{
    "asset_name": "crate",
    "asset_type": "prop",
    "materials": [
        {
            "material_name": "crate_wood",
            "material_shader": "standard",
            "textures": {
                "diffuse": "/publish/crate/crate_wood_basecolor.png",
                "roughness": "/publish/crate/crate_wood_roughness.png",
                "normal": "/publish/crate/crate_wood_normal.png",
                "displacement": "/publish/crate/crate_wood_height.png"
            }
        },
        {
            "material_name": "crate_label",
            "material_shader": "two_sided",
            "textures": {
                "diffuse": "/publish/crate/crate_label_albedo.png"
            }
        }
    ],
    "tags": ["kitbash"]
}"#;

fn build_from_record(scene: &mut InMemoryScene, json: &str) -> Vec<BuiltNetwork> {
    let asset: AssetRecord = serde_json::from_str(json).unwrap();
    asset
        .materials
        .iter()
        .map(|m| {
            let desc = MaterialDescription::try_from(m).unwrap();
            build_material(scene, &desc).unwrap()
        })
        .collect()
}

#[test]
fn asset_record_builds_every_listed_material() {
    let mut scene = InMemoryScene::new();
    let built = build_from_record(&mut scene, CRATE_ASSET_JSON);
    assert_eq!(built.len(), 2);

    let wood = &built[0];
    assert_eq!(scene.node_name(wood.shader).unwrap(), "crate_wood_mtl");
    assert_eq!(scene.node_name(wood.group).unwrap(), "crate_wood_sg");
    assert!(wood.displacement.is_some());

    let label = &built[1];
    assert_eq!(
        scene.node_type(label.shader).unwrap(),
        NodeType::TwoSidedShader
    );
    let inner = label.inner.as_ref().unwrap();
    assert_eq!(scene.node_name(inner.shader).unwrap(), "crate_label_mtl");
}

#[test]
fn standard_network_shape_matches_the_connection_rules() {
    let mut scene = InMemoryScene::new();
    let built = build_from_record(&mut scene, CRATE_ASSET_JSON);
    let wood = &built[0];

    // Diffuse through color correction into the shader's color slot.
    let diffuse = scene
        .incoming_connection(wood.shader, "color")
        .unwrap()
        .unwrap();
    assert_eq!(
        scene.node_type(diffuse.src.node).unwrap(),
        NodeType::ColorCorrect
    );

    // Roughness reads the red component and flips the roughness toggle.
    let roughness = scene
        .incoming_connection(wood.shader, "reflection_glossiness")
        .unwrap()
        .unwrap();
    assert_eq!(roughness.src.attr, "out_color_r");

    // Displacement drives the grouping object, never the shader, and skips
    // color correction entirely.
    let displacement = scene
        .incoming_connection(wood.group, "displacement_shader")
        .unwrap()
        .unwrap();
    assert_eq!(
        scene.node_type(displacement.src.node).unwrap(),
        NodeType::FileTexture
    );
    assert!(
        scene
            .incoming_connection(wood.shader, "displacement_shader")
            .unwrap()
            .is_none()
    );
}

#[test]
fn two_sided_wrapper_feeds_front_and_back_from_the_same_plug() {
    let mut scene = InMemoryScene::new();
    let built = build_from_record(&mut scene, CRATE_ASSET_JSON);
    let label = &built[1];

    let front = scene
        .incoming_connection(label.shader, "front_material")
        .unwrap()
        .unwrap();
    let back = scene
        .incoming_connection(label.shader, "back_material")
        .unwrap()
        .unwrap();
    assert_eq!(front.src, back.src);
    assert_eq!(front.src.node, label.inner.as_ref().unwrap().shader);
}

#[test]
fn blend_materials_are_rejected_with_an_untouched_scene() {
    let mut scene = InMemoryScene::new();
    let desc = MaterialDescription::new("mix", ShaderType::Blend)
        .with_texture(Role::Diffuse, "/maps/mix_diffuse.png");

    let err = build_material(&mut scene, &desc).unwrap_err();
    assert!(matches!(err, BuildError::NotImplemented));
    assert_eq!(scene.node_count(), 0);
}

#[test]
fn every_generated_node_participates_in_the_network() {
    let mut scene = InMemoryScene::new();
    build_from_record(&mut scene, CRATE_ASSET_JSON);

    // No orphans: every node is an endpoint of at least one connection or a
    // grouping/displacement node holding the network together.
    for node in scene.node_ids() {
        let wired = !scene.incoming_connections(node).unwrap().is_empty()
            || !scene.outgoing_connections(node).unwrap().is_empty();
        assert!(
            wired,
            "node `{}` is not wired into any network",
            scene.node_name(node).unwrap()
        );
    }
}

#[test]
fn gloss_and_roughness_compete_for_the_same_slot() {
    // Both roles target reflection_glossiness; a description carrying both
    // fails at the second connection like the host would.
    let mut scene = InMemoryScene::new();
    let desc = MaterialDescription::new("worn", ShaderType::Standard)
        .with_texture(Role::Gloss, "/maps/worn_gloss.png")
        .with_texture(Role::Roughness, "/maps/worn_roughness.png");

    let err = build_material(&mut scene, &desc).unwrap_err();
    assert!(matches!(err, BuildError::Scene(_)));
}

//! Standalone batch build: read a published asset record and rebuild every
//! material network it lists into an in-memory scene, reporting what would
//! be created. Useful for validating records outside the host application.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use material_forge::builder::MaterialBuilder;
use material_forge::material::MaterialDescription;
use material_forge::record::load_asset_record;
use material_forge::rules::{RuleTable, default_table};
use material_forge::scene::{InMemoryScene, SceneGraph};

#[derive(Debug, Default)]
struct Cli {
    asset_json: Option<PathBuf>,
    rules: Option<PathBuf>,
}

fn parse_cli(args: &[String]) -> Result<Cli> {
    let mut cli = Cli::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--rules" => {
                let Some(v) = args.get(i + 1) else {
                    return Err(anyhow!("missing value for --rules"));
                };
                cli.rules = Some(PathBuf::from(v));
                i += 2;
            }
            other if cli.asset_json.is_none() && !other.starts_with('-') => {
                cli.asset_json = Some(PathBuf::from(other));
                i += 1;
            }
            other => {
                return Err(anyhow!(
                    "unknown argument: {other} (usage: material_build <asset.json> [--rules <rules.json>])"
                ));
            }
        }
    }
    Ok(cli)
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_cli(&args)?;
    let asset_json = cli
        .asset_json
        .ok_or_else(|| anyhow!("usage: material_build <asset.json> [--rules <rules.json>]"))?;

    let record = load_asset_record(&asset_json)?;
    let rules = match &cli.rules {
        Some(path) => RuleTable::load_from_path(path)?,
        None => default_table().clone(),
    };

    let mut scene = InMemoryScene::new();

    for material in &record.materials {
        let desc = MaterialDescription::try_from(material)
            .with_context(|| format!("material `{}`", material.material_name))?;
        let built = MaterialBuilder::new(&mut scene, &rules)
            .build(&desc)
            .with_context(|| format!("material `{}`", material.material_name))?;

        let shader_name = scene.node_name(built.shader)?;
        let group_name = scene.node_name(built.group)?;
        match built.displacement {
            Some(disp) => println!(
                "built `{}`: shader `{shader_name}`, group `{group_name}`, displacement `{}`",
                desc.name,
                scene.node_name(disp)?
            ),
            None => println!("built `{}`: shader `{shader_name}`, group `{group_name}`", desc.name),
        }
    }

    println!(
        "{}: {} materials, {} nodes, {} connections",
        record.asset_name,
        record.materials.len(),
        scene.node_count(),
        scene.connections().len()
    );

    Ok(())
}

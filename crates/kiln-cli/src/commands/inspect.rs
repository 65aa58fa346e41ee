//! Inspect command - lists entities by priority and the clip library

use super::{build_engine, check_format};
use anyhow::{Context, Result};
use kiln_core::ClipLibrary;
use kiln_ecs::EntityInfo;
use kiln_scene::load_scene;

pub fn run(path: &str, format: &str) -> Result<()> {
    check_format(format)?;
    let engine = build_engine();
    let (scene, _) = load_scene(path, &engine).context("Failed to load scene")?;
    let entities = scene.all_entities();

    if format == "json" {
        let output = serde_json::json!({
            "scene": scene.name(),
            "entities": entities,
            "animations": clip_summaries(scene.clips()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Scene: {}", scene.name());
    println!("Entities ({}):", entities.len());
    for info in &entities {
        print_entity(info);
    }

    let clips = scene.clips();
    println!("Animations ({}):", clips.len());
    for name in clips.names() {
        if let Some(clip) = clips.get(name) {
            println!(
                "  {:<16} fps={:<4} loop={:<5} frames={}",
                clip.name,
                clip.fps,
                clip.looping,
                clip.frame_count()
            );
        }
    }
    Ok(())
}

fn print_entity(info: &EntityInfo) {
    let state = if info.enabled { "" } else { " (disabled)" };
    println!("  [{:>4}] {}{}", info.order, info.name, state);
    for component in &info.components {
        println!(
            "         - {}: {}",
            component.slot,
            component.type_name.as_deref().unwrap_or("?")
        );
    }
}

fn clip_summaries(clips: &ClipLibrary) -> Vec<serde_json::Value> {
    clips
        .names()
        .into_iter()
        .filter_map(|name| clips.get(name))
        .map(|clip| {
            serde_json::json!({
                "name": clip.name,
                "fps": clip.fps,
                "loop": clip.looping,
                "frames": clip.frame_count(),
            })
        })
        .collect()
}

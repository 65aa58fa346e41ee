//! Validate command - checks a scene description without running it

use super::build_engine;
use anyhow::{Context, Result};
use kiln_scene::{parse_scene, validate_scene};
use std::fs;

pub fn run(path: &str) -> Result<()> {
    let engine = build_engine();
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let file = parse_scene(&content).with_context(|| format!("Failed to parse {}", path))?;
    validate_scene(&file, &engine).with_context(|| format!("{} is invalid", path))?;

    println!(
        "Scene '{}' is valid ({} object(s), {} animation(s))",
        file.scene.name,
        file.objects.len(),
        file.animations.len()
    );
    Ok(())
}

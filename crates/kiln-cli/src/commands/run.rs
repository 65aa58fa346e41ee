//! Run command - advances a scene headlessly with a fixed clock

use super::{build_engine, check_format};
use anyhow::{Context, Result};
use kiln_animation::loader::{clip_files_in, load_clips_from_file};
use kiln_ecs::EntityInfo;
use kiln_runtime::{Engine, FrameClock, Scene};
use kiln_scene::load_scene;
use std::path::Path;

pub struct RunArgs {
    pub scene: String,
    pub frames: u32,
    pub fps: f64,
    pub clips: Option<String>,
    pub format: String,
}

pub fn run(args: RunArgs) -> Result<()> {
    check_format(&args.format)?;
    let mut engine = build_engine();
    let scene = simulate(&args, &mut engine)?;
    let entities = scene.all_entities();

    if args.format == "json" {
        let output = serde_json::json!({
            "scene": scene.name(),
            "frames": args.frames,
            "time": scene.last_time(),
            "stats": engine.stats().last_frame(),
            "entities": entities,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "Scene '{}' after {} frame(s) ({:.3}s)",
            scene.name(),
            args.frames,
            scene.last_time()
        );
        for info in &entities {
            print_transform(info);
        }
    }
    Ok(())
}

/// Load the scene (plus any extra clips) and advance it `frames` times
pub fn simulate(args: &RunArgs, engine: &mut Engine) -> Result<Scene> {
    let (mut scene, _) = load_scene(&args.scene, engine).context("Failed to load scene")?;

    if let Some(dir) = &args.clips {
        let added = add_clip_dir(&mut scene, Path::new(dir))
            .with_context(|| format!("Failed to load clips from {}", dir))?;
        log::info!("Added {} clip(s) from {}", added, dir);
    }

    let mut clock = FrameClock::fixed(args.fps).context("Invalid --fps")?;
    for _ in 0..args.frames {
        let now = clock.tick();
        scene.advance(now, engine);
    }
    Ok(scene)
}

fn add_clip_dir(scene: &mut Scene, dir: &Path) -> kiln_core::Result<usize> {
    let mut added = 0;
    for path in clip_files_in(dir)? {
        for clip in load_clips_from_file(&path)? {
            scene.add_clip(clip)?;
            added += 1;
        }
    }
    Ok(added)
}

fn print_transform(info: &EntityInfo) {
    let state = if info.enabled { "" } else { " (disabled)" };
    println!(
        "  [{:>4}] {:<16} pos=({:.3}, {:.3}) rot={:.1} scale=({:.3}, {:.3}){}",
        info.order,
        info.name,
        info.position[0],
        info.position[1],
        info.rotation,
        info.scale[0],
        info.scale[1],
        state
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SCENE: &str = r#"
[scene]
name = "walker"

[[objects]]
name = "hero"

[[objects.components]]
name = "anim"
type = "Animator"
args = ["stride", true]
"#;

    const CLIPS: &str = r#"
[[animations]]
name = "stride"
fps = 2
loop = false
frames = [
  [ { component = "", key = "positionX", value = 1.0 } ],
  [ { component = "", key = "positionX", value = 3.0 } ],
]
"#;

    #[test]
    fn test_simulate_with_external_clips() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("walker.toml");
        fs::write(&scene_path, SCENE).unwrap();
        let clip_dir = dir.path().join("clips");
        fs::create_dir(&clip_dir).unwrap();
        fs::write(clip_dir.join("stride.anim.toml"), CLIPS).unwrap();

        let args = RunArgs {
            scene: scene_path.display().to_string(),
            frames: 10,
            fps: 4.0,
            clips: Some(clip_dir.display().to_string()),
            format: "text".into(),
        };
        let mut engine = build_engine();
        let scene = simulate(&args, &mut engine).unwrap();

        let hero = scene.entity_by_name("hero").unwrap();
        assert_eq!(hero.position().x, 3.0);
        assert!((scene.last_time() - 2.25).abs() < 1e-9);
    }

    #[test]
    fn test_simulate_rejects_bad_fps() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("walker.toml");
        fs::write(&scene_path, SCENE).unwrap();
        let args = RunArgs {
            scene: scene_path.display().to_string(),
            frames: 1,
            fps: 0.0,
            clips: None,
            format: "text".into(),
        };
        assert!(simulate(&args, &mut build_engine()).is_err());
    }
}

//! Scene loading from TOML files

use crate::format::{ObjectDef, SceneFile};
use kiln_core::{KilnError, Result, BAG_SLOT, BUILTIN_SLOT};
use kiln_runtime::{Engine, Scene};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse a scene description without validating it
pub fn parse_scene(content: &str) -> Result<SceneFile> {
    Ok(toml::from_str(content)?)
}

/// Check a scene description against the engine's component registry.
///
/// Every component is instantiated once and thrown away, so factory argument
/// errors surface here rather than halfway through populating a scene.
pub fn validate_scene(file: &SceneFile, engine: &Engine) -> Result<()> {
    if file.scene.name.is_empty() {
        return Err(config("scene requires a name"));
    }

    let mut names = HashSet::new();
    for (index, object) in file.objects.iter().enumerate() {
        if object.name.is_empty() {
            return Err(config(format!("object #{} requires a name", index)));
        }
        if !names.insert(object.name.as_str()) {
            return Err(config(format!("object '{}' is defined more than once", object.name)));
        }
        validate_object(object, engine)?;
    }

    let mut clips = HashSet::new();
    for clip in &file.animations {
        clip.validate()?;
        if !clips.insert(clip.name.as_str()) {
            return Err(config(format!("animation '{}' is defined more than once", clip.name)));
        }
    }

    Ok(())
}

fn validate_object(object: &ObjectDef, engine: &Engine) -> Result<()> {
    let mut slots = HashSet::new();
    for component in &object.components {
        if component.name.is_empty() {
            return Err(config(format!(
                "component of type '{}' on '{}' requires a name",
                component.type_name, object.name
            )));
        }
        if component.name == BUILTIN_SLOT || component.name == BAG_SLOT {
            return Err(config(format!(
                "component slot '{}' on '{}' is reserved",
                component.name, object.name
            )));
        }
        if !slots.insert(component.name.as_str()) {
            return Err(config(format!(
                "component slot '{}' on '{}' is used more than once",
                component.name, object.name
            )));
        }
        engine
            .registry()
            .create(&component.type_name, &component.args)
            .map_err(|e| config(format!("object '{}', component '{}': {}", object.name, component.name, e)))?;
    }

    for attr in &object.attrs {
        if attr.key.is_empty() {
            return Err(config(format!("attribute on '{}' requires a key", object.name)));
        }
    }
    Ok(())
}

/// Create the described clips and objects in `scene`.
///
/// Attribute assignments that the bus rejects are logged and skipped.
pub fn populate_scene(scene: &mut Scene, file: &SceneFile, engine: &Engine) -> Result<()> {
    scene.set_name(file.scene.name.clone());

    for clip in &file.animations {
        scene.add_clip(clip.clone())?;
    }

    for object in &file.objects {
        let id = scene.add_entity(object.name.clone())?;
        if let Some(order) = object.order {
            scene.reassign_priority(id, order);
        }
        if let Some(enabled) = object.enabled {
            scene.set_attribute(id, BUILTIN_SLOT, "enabled", enabled)?;
        }
        for component in &object.components {
            scene.add_component_by_type(engine, id, &component.name, &component.type_name, &component.args)?;
        }
        for attr in &object.attrs {
            if let Err(e) = scene.set_attribute(id, &attr.slot, &attr.key, attr.value.clone()) {
                log::warn!(
                    "Scene '{}': could not set {}.{} on '{}': {}",
                    file.scene.name,
                    attr.slot,
                    attr.key,
                    object.name,
                    e
                );
            }
        }
    }

    log::info!(
        "Loaded scene '{}' ({} objects, {} animations)",
        file.scene.name,
        file.objects.len(),
        file.animations.len()
    );
    Ok(())
}

/// Load a scene from a TOML file
pub fn load_scene<P: AsRef<Path>>(path: P, engine: &Engine) -> Result<(Scene, SceneFile)> {
    let content = fs::read_to_string(path)?;
    load_scene_string(&content, engine)
}

/// Load a scene from a TOML string
pub fn load_scene_string(content: &str, engine: &Engine) -> Result<(Scene, SceneFile)> {
    let file = parse_scene(content)?;
    validate_scene(&file, engine)?;

    let mut scene = Scene::new(file.scene.name.clone());
    populate_scene(&mut scene, &file, engine)?;
    Ok((scene, file))
}

/// Reload a scene file, replacing the contents of `scene`
pub fn reload_scene<P: AsRef<Path>>(path: P, scene: &mut Scene, engine: &Engine) -> Result<SceneFile> {
    let content = fs::read_to_string(path)?;
    reload_scene_string(&content, scene, engine)
}

/// Reload a scene from a string, replacing the contents of `scene`.
///
/// Entities and clips from the previous description are discarded. The
/// current scene is left untouched if the new description is invalid.
pub fn reload_scene_string(content: &str, scene: &mut Scene, engine: &Engine) -> Result<SceneFile> {
    let file = parse_scene(content)?;
    validate_scene(&file, engine)?;

    scene.clear();
    scene.clear_clips();
    populate_scene(scene, &file, engine)?;
    Ok(file)
}

fn config(message: impl Into<String>) -> KilnError {
    KilnError::ConfigurationError(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::{AttributeValue, Vec2};

    fn engine() -> Engine {
        let mut engine = Engine::new();
        kiln_animation::register(engine.registry_mut());
        engine
    }

    const DEMO: &str = r#"
[scene]
name = "demo"

[[objects]]
name = "hero"
order = 10

[[objects.components]]
name = "anim"
type = "Animator"
args = ["walk", true]

[[objects.components]]
name = "cage"
type = "Cage"
args = [100.0, 0.0, 0.0, 6.0]

[[objects.attrs]]
component = ""
key = "positionY"
value = 4.0

[[objects.attrs]]
component = "{}"
key = "team"
value = "blue"

[[objects.attrs]]
component = "missing"
key = "x"
value = 1

[[objects]]
name = "camera"
order = -5

[[animations]]
name = "walk"
fps = 4
loop = true
frames = [
  [ { component = "", key = "positionX", value = 0.0 } ],
  [ { component = "", key = "positionX", value = 8.0 } ],
]
"#;

    #[test]
    fn test_load_scene_string() {
        let engine = engine();
        let (scene, file) = load_scene_string(DEMO, &engine).unwrap();
        assert_eq!(scene.name(), "demo");
        assert_eq!(file.objects.len(), 2);
        assert_eq!(scene.entity_count(), 2);
        assert_eq!(scene.priorities(), vec![-5, 0, 10]);

        let hero = scene.find("hero").unwrap();
        assert_eq!(scene.bucket(10), Some(&[hero][..]));
        assert_eq!(scene.get_attribute(hero, "", "positionY").unwrap(), AttributeValue::Float(4.0));
        assert_eq!(
            scene.get_attribute(hero, "{}", "team").unwrap(),
            AttributeValue::Text("blue".into())
        );
        assert_eq!(
            scene.get_attribute(hero, "anim", "animation").unwrap(),
            AttributeValue::Text("walk".into())
        );
        assert!(scene.clips().contains("walk"));
    }

    #[test]
    fn test_loaded_scene_runs() {
        let mut engine = engine();
        let (mut scene, _) = load_scene_string(DEMO, &engine).unwrap();
        let hero = scene.find("hero").unwrap();

        scene.advance(0.0, &mut engine);
        assert_eq!(scene.entity(hero).unwrap().position(), Vec2::new(0.0, 4.0));
        scene.advance(0.25, &mut engine);
        // The cage runs after the animator and holds x at 6
        assert_eq!(scene.entity(hero).unwrap().position(), Vec2::new(6.0, 4.0));
        assert_eq!(engine.stats().last_frame().get("animator.frames_applied"), Some(&1.0));
    }

    #[test]
    fn test_unknown_component_type_creates_nothing() {
        let engine = engine();
        let content = r#"
[scene]
name = "bad"

[[objects]]
name = "a"

[[objects]]
name = "b"

[[objects.components]]
name = "x"
type = "Teleporter"
"#;
        assert!(matches!(
            load_scene_string(content, &engine),
            Err(KilnError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_missing_factory_args_rejected() {
        let engine = engine();
        let content = r#"
[scene]
name = "bad"

[[objects]]
name = "box"

[[objects.components]]
name = "cage"
type = "Cage"
args = [1.0, 2.0]
"#;
        assert!(matches!(
            load_scene_string(content, &engine),
            Err(KilnError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_validation_errors() {
        let engine = engine();
        let dup = SceneFile::new("s")
            .with_object(ObjectDef::new("a"))
            .with_object(ObjectDef::new("a"));
        assert!(validate_scene(&dup, &engine).is_err());

        let reserved = SceneFile::new("s").with_object(ObjectDef::new("a").with_component("{}", "Rewind", vec![]));
        assert!(validate_scene(&reserved, &engine).is_err());

        let slots = SceneFile::new("s").with_object(
            ObjectDef::new("a")
                .with_component("r", "Rewind", vec![])
                .with_component("r", "Rewind", vec![]),
        );
        assert!(validate_scene(&slots, &engine).is_err());

        assert!(validate_scene(&SceneFile::new(""), &engine).is_err());
    }

    #[test]
    fn test_zero_fps_clip_rejected() {
        let engine = engine();
        let content = r#"
[scene]
name = "bad"

[[animations]]
name = "still"
fps = 0
"#;
        assert!(matches!(
            load_scene_string(content, &engine),
            Err(KilnError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        let engine = engine();
        assert!(matches!(
            load_scene_string("[scene\nname = 1", &engine),
            Err(KilnError::TomlParseError(_))
        ));
    }

    #[test]
    fn test_load_and_reload_from_file() {
        let engine = engine();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.scene.toml");
        fs::write(&path, DEMO).unwrap();

        let (mut scene, _) = load_scene(&path, &engine).unwrap();
        assert_eq!(scene.entity_count(), 2);

        fs::write(&path, "[scene]\nname = \"empty\"\n\n[[objects]]\nname = \"solo\"\n").unwrap();
        let file = reload_scene(&path, &mut scene, &engine).unwrap();
        assert_eq!(file.scene.name, "empty");
        assert_eq!(scene.name(), "empty");
        assert_eq!(scene.entity_count(), 1);
        assert!(scene.find("hero").is_none());

        // Invalid reloads leave the scene alone
        fs::write(&path, "[scene]\nname = \"\"\n").unwrap();
        assert!(reload_scene(&path, &mut scene, &engine).is_err());
        assert!(scene.find("solo").is_some());
    }

    #[test]
    fn test_reload_drops_previous_clips() {
        let mut engine = engine();
        let (mut scene, _) = load_scene_string(DEMO, &engine).unwrap();
        assert!(scene.clips().contains("walk"));

        let content = r#"
[scene]
name = "no_clips"

[[objects]]
name = "hero"

[[objects.components]]
name = "anim"
type = "Animator"
args = ["walk", true]

[[objects.attrs]]
component = ""
key = "positionX"
value = 9.0
"#;
        reload_scene_string(content, &mut scene, &engine).unwrap();
        assert!(scene.clips().is_empty());

        let now = scene.last_time() + 0.25;
        scene.advance(now, &mut engine);
        let hero = scene.find("hero").unwrap();
        assert_eq!(scene.entity(hero).unwrap().position().x, 9.0);
        assert_eq!(
            scene.get_attribute(hero, "anim", "frame").unwrap(),
            AttributeValue::Int(-1)
        );
    }

    #[test]
    fn test_missing_file() {
        let engine = engine();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_scene(dir.path().join("nope.toml"), &engine),
            Err(KilnError::IoError(_))
        ));
    }
}

//! Kiln Scene - TOML scene descriptions
//!
//! A scene file lists objects (with their components and attribute
//! assignments) and animation clips. Loading validates the whole description
//! against the engine's component registry before any entity is created.

mod format;
mod loader;

pub use format::{AttrDef, ComponentDef, ObjectDef, SceneFile, SceneMetadata};
pub use loader::{
    load_scene, load_scene_string, parse_scene, populate_scene, reload_scene, reload_scene_string,
    validate_scene,
};

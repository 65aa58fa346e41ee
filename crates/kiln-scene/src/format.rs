//! Scene file format definitions

use kiln_core::{AnimationClip, AttributeValue, BUILTIN_SLOT};
use serde::{Deserialize, Serialize};

/// Root structure of a scene TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    pub scene: SceneMetadata,
    #[serde(default)]
    pub objects: Vec<ObjectDef>,
    #[serde(default)]
    pub animations: Vec<AnimationClip>,
}

/// Scene metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Definition of an object (entity) in a scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDef {
    pub name: String,
    /// Scheduling priority; 0 when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Components, attached in the listed order
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    /// Attribute writes applied after every component is attached
    #[serde(default)]
    pub attrs: Vec<AttrDef>,
}

/// A component to instantiate through the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDef {
    /// Slot name on the owning object
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub args: Vec<AttributeValue>,
}

/// One attribute bus write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttrDef {
    #[serde(rename = "component", default)]
    pub slot: String,
    pub key: String,
    pub value: AttributeValue,
}

impl ObjectDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: None,
            enabled: None,
            components: Vec::new(),
            attrs: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_component(mut self, slot: impl Into<String>, type_name: impl Into<String>, args: Vec<AttributeValue>) -> Self {
        self.components.push(ComponentDef {
            name: slot.into(),
            type_name: type_name.into(),
            args,
        });
        self
    }

    pub fn with_attr(mut self, slot: impl Into<String>, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attrs.push(AttrDef {
            slot: slot.into(),
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Convenience for a built-in attribute write
    pub fn with_builtin(self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.with_attr(BUILTIN_SLOT, key, value)
    }
}

impl SceneFile {
    /// Create an empty scene file
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scene: SceneMetadata {
                name: name.into(),
                description: None,
            },
            objects: Vec::new(),
            animations: Vec::new(),
        }
    }

    pub fn with_object(mut self, object: ObjectDef) -> Self {
        self.objects.push(object);
        self
    }

    pub fn with_animation(mut self, clip: AnimationClip) -> Self {
        self.animations.push(clip);
        self
    }

    /// Find an object definition by name
    pub fn object(&self, name: &str) -> Option<&ObjectDef> {
        self.objects.iter().find(|o| o.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scene_file() {
        let toml_str = r#"
[scene]
name = "demo"

[[objects]]
name = "hero"
order = 10

[[objects.components]]
name = "anim"
type = "Animator"
args = ["walk", true]

[[objects.attrs]]
component = ""
key = "positionX"
value = 4.0

[[objects]]
name = "wall"

[[animations]]
name = "walk"
fps = 4
loop = true
frames = [
  [ { component = "", key = "positionX", value = 0.0, interpolate = true } ],
]
"#;
        let file: SceneFile = toml::from_str(toml_str).unwrap();
        assert_eq!(file.scene.name, "demo");
        assert_eq!(file.objects.len(), 2);

        let hero = file.object("hero").unwrap();
        assert_eq!(hero.order, Some(10));
        assert_eq!(hero.components[0].type_name, "Animator");
        assert_eq!(
            hero.components[0].args,
            vec![AttributeValue::Text("walk".into()), AttributeValue::Bool(true)]
        );
        assert_eq!(hero.attrs[0].value, AttributeValue::Float(4.0));

        let wall = file.object("wall").unwrap();
        assert_eq!(wall.order, None);
        assert!(wall.components.is_empty());

        assert_eq!(file.animations[0].frame_count(), 1);
    }

    #[test]
    fn test_builder_round_trips_through_toml() {
        let file = SceneFile::new("built").with_object(
            ObjectDef::new("crate")
                .with_order(2)
                .with_component("cage", "Cage", vec![
                    AttributeValue::Float(10.0),
                    AttributeValue::Float(0.0),
                    AttributeValue::Float(0.0),
                    AttributeValue::Float(10.0),
                ])
                .with_builtin("positionY", 3.0),
        );
        let text = toml::to_string(&file).unwrap();
        let parsed: SceneFile = toml::from_str(&text).unwrap();
        let object = parsed.object("crate").unwrap();
        assert_eq!(object.order, Some(2));
        assert_eq!(object.components[0].args.len(), 4);
        assert_eq!(object.attrs[0].slot, "");
    }
}

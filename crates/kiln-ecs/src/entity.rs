//! Entities and the attribute bus

use crate::component::{Component, FrameContext};
use kiln_core::{
    AttributeValue, ClipLibrary, EntityId, FrameStats, KilnError, Result, Transform2D, Vec2,
    BAG_SLOT, BUILTIN_SLOT,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A component together with the slot key it was registered under.
/// `component` is `None` only while one of its hooks is running.
struct ComponentSlot {
    key: String,
    component: Option<Box<dyn Component>>,
}

/// An addressable object owning components and a 2D transform.
///
/// The attribute bus routes `(slot, key)` pairs: the empty slot reaches the
/// built-in fields, `"{}"` reaches the free-form bag, and every other slot
/// reaches the component registered under it.
///
/// `order` and `name` are plain fields here; the owning scene notices changes
/// and updates its buckets and name index accordingly.
pub struct Entity {
    id: EntityId,
    name: String,
    enabled: bool,
    order: i32,
    pub transform: Transform2D,
    delta_time: f32,
    slots: Vec<ComponentSlot>,
    bag: HashMap<String, AttributeValue>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            enabled: true,
            order: 0,
            transform: Transform2D::IDENTITY,
            delta_time: 0.0,
            slots: Vec::new(),
            bag: HashMap::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Scheduling priority
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Request a new scheduling priority. Bucket membership follows once the
    /// scene reconciles this entity.
    pub fn set_order(&mut self, order: i32) {
        self.order = order;
    }

    /// Seconds since the previous frame, as stamped by the scheduler
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn stamp_delta_time(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.transform.position = Vec2::new(x, y);
    }

    pub fn add_position(&mut self, dx: f32, dy: f32) {
        self.transform.position = self.transform.position + Vec2::new(dx, dy);
    }

    pub fn set_scale(&mut self, x: f32, y: f32) {
        self.transform.scale = Vec2::new(x, y);
    }

    /// Attach a component under `key` and run its `start` hook.
    ///
    /// A slot holds at most one component; reusing a key is a configuration
    /// error.
    pub fn add_component(&mut self, key: impl Into<String>, mut component: Box<dyn Component>) -> Result<()> {
        let key = key.into();
        if self.has_component(&key) {
            return Err(KilnError::ConfigurationError(format!(
                "entity '{}' already has a component in slot '{}'",
                self.name, key
            )));
        }

        let index = self.slots.len();
        self.slots.push(ComponentSlot {
            key,
            component: None,
        });
        component.start(self);
        self.slots[index].component = Some(component);
        Ok(())
    }

    pub fn has_component(&self, key: &str) -> bool {
        self.slots.iter().any(|s| s.key == key)
    }

    pub fn component(&self, key: &str) -> Option<&dyn Component> {
        self.slots
            .iter()
            .find(|s| s.key == key)
            .and_then(|s| s.component.as_deref())
    }

    pub fn component_mut(&mut self, key: &str) -> Option<&mut (dyn Component + 'static)> {
        self.slots
            .iter_mut()
            .find(|s| s.key == key)
            .and_then(|s| s.component.as_deref_mut())
    }

    /// First component, in registration order, reporting `type_name`
    pub fn component_by_type(&self, type_name: &str) -> Option<&dyn Component> {
        self.slots
            .iter()
            .filter_map(|s| s.component.as_deref())
            .find(|c| c.type_name() == Some(type_name))
    }

    /// Slot keys in registration order
    pub fn component_keys(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.key.as_str())
    }

    pub fn component_count(&self) -> usize {
        self.slots.len()
    }

    /// Run `update` on every component in registration order.
    ///
    /// Components attached during this pass are first updated next frame.
    pub fn update_components(&mut self, clips: &ClipLibrary, stats: &mut FrameStats) {
        let count = self.slots.len();
        for index in 0..count {
            let Some(mut component) = self.slots[index].component.take() else {
                continue;
            };
            let slot = self.slots[index].key.clone();
            let mut ctx = FrameContext {
                slot: &slot,
                delta_time: self.delta_time,
                clips,
                stats: &mut *stats,
            };
            component.update(self, &mut ctx);
            self.slots[index].component = Some(component);
        }
    }

    /// Run every component's `destroy` hook in registration order
    pub fn destroy(&mut self) {
        for index in 0..self.slots.len() {
            let Some(mut component) = self.slots[index].component.take() else {
                continue;
            };
            component.destroy(self);
            self.slots[index].component = Some(component);
        }
    }

    /// Write an attribute through the bus
    pub fn set_attribute(&mut self, slot: &str, key: &str, value: impl Into<AttributeValue>) -> Result<()> {
        let value = value.into();
        match slot {
            BUILTIN_SLOT => self.set_builtin(key, value),
            BAG_SLOT => {
                self.bag.insert(key.to_string(), value);
                Ok(())
            }
            _ => {
                let component = self
                    .component_mut(slot)
                    .ok_or_else(|| KilnError::ComponentNotFound(slot.to_string()))?;
                let target = component.writable().ok_or_else(|| KilnError::CapabilityMissing {
                    slot: slot.to_string(),
                })?;
                target.set_attribute(key, value)
            }
        }
    }

    /// Read an attribute through the bus
    pub fn get_attribute(&self, slot: &str, key: &str) -> Result<AttributeValue> {
        match slot {
            BUILTIN_SLOT => self.get_builtin(key),
            BAG_SLOT => self
                .bag
                .get(key)
                .cloned()
                .ok_or_else(|| KilnError::attribute_not_found(format!("'{}' custom attributes", self.name), key)),
            _ => {
                let component = self
                    .component(slot)
                    .ok_or_else(|| KilnError::ComponentNotFound(slot.to_string()))?;
                let source = component.readable().ok_or_else(|| KilnError::CapabilityMissing {
                    slot: slot.to_string(),
                })?;
                source.get_attribute(key)
            }
        }
    }

    /// The free-form attribute bag
    pub fn custom_attributes(&self) -> &HashMap<String, AttributeValue> {
        &self.bag
    }

    fn set_builtin(&mut self, key: &str, value: AttributeValue) -> Result<()> {
        match key {
            "enabled" => self.enabled = value.coerce_bool(key)?,
            "positionX" => self.transform.position.x = value.coerce_f32(key)?,
            "positionY" => self.transform.position.y = value.coerce_f32(key)?,
            "positionAddX" => self.transform.position.x += value.coerce_f32(key)?,
            "positionAddY" => self.transform.position.y += value.coerce_f32(key)?,
            "scaleX" => self.transform.scale.x = value.coerce_f32(key)?,
            "scaleY" => self.transform.scale.y = value.coerce_f32(key)?,
            "euler" | "rotation" => self.transform.set_rotation_degrees(value.coerce_f32(key)?),
            "order" => self.order = value.coerce_i32(key)?,
            "name" => self.name = value.coerce_str(key)?.to_string(),
            "deltaTime" => return Err(KilnError::ReadOnlyAttribute(key.to_string())),
            _ => return Err(KilnError::attribute_not_found(format!("entity '{}'", self.name), key)),
        }
        Ok(())
    }

    fn get_builtin(&self, key: &str) -> Result<AttributeValue> {
        let value = match key {
            "enabled" => AttributeValue::Bool(self.enabled),
            "positionX" => AttributeValue::Float(self.transform.position.x),
            "positionY" => AttributeValue::Float(self.transform.position.y),
            "scaleX" => AttributeValue::Float(self.transform.scale.x),
            "scaleY" => AttributeValue::Float(self.transform.scale.y),
            "euler" | "rotation" => AttributeValue::Float(self.transform.rotation_degrees()),
            "deltaTime" => AttributeValue::Float(self.delta_time),
            "order" => AttributeValue::Int(self.order as i64),
            "name" => AttributeValue::Text(self.name.clone()),
            _ => return Err(KilnError::attribute_not_found(format!("entity '{}'", self.name), key)),
        };
        Ok(value)
    }

    /// Snapshot for listings and serialization
    pub fn info(&self) -> EntityInfo {
        EntityInfo {
            id: self.id,
            name: self.name.clone(),
            order: self.order,
            enabled: self.enabled,
            position: self.transform.position.to_array(),
            rotation: self.transform.rotation_degrees(),
            scale: self.transform.scale.to_array(),
            components: self
                .slots
                .iter()
                .map(|s| ComponentInfo {
                    slot: s.key.clone(),
                    type_name: s
                        .component
                        .as_deref()
                        .and_then(|c| c.type_name())
                        .map(String::from),
                })
                .collect(),
        }
    }
}

/// Information about an entity for listings and serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityInfo {
    pub id: EntityId,
    pub name: String,
    pub order: i32,
    pub enabled: bool,
    pub position: [f32; 2],
    /// Rotation in degrees
    pub rotation: f32,
    pub scale: [f32; 2],
    pub components: Vec<ComponentInfo>,
}

/// A component slot and the type tag of its occupant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub slot: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

//! Rewind: restores the transform an entity had on the previous frame

use crate::component::{AttributeReadable, AttributeWritable, Component, FrameContext};
use crate::entity::Entity;
use crate::registry::ComponentRegistry;
use kiln_core::{AttributeValue, KilnError, Result, Transform2D};

/// Snapshots the entity transform at the end of each of its updates.
///
/// Writing `rewind = true` through the bus arms a restore: on its next
/// update the component puts the last snapshot back before taking a new one.
/// Place it after the components that move the entity.
#[derive(Default)]
pub struct Rewind {
    snapshot: Option<Transform2D>,
    pending: bool,
}

impl Rewind {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for Rewind {
    fn update(&mut self, entity: &mut Entity, _ctx: &mut FrameContext<'_>) {
        if self.pending {
            if let Some(previous) = self.snapshot {
                entity.transform = previous;
            }
            self.pending = false;
        }
        self.snapshot = Some(entity.transform);
    }

    fn type_name(&self) -> Option<&str> {
        Some("Rewind")
    }

    fn readable(&self) -> Option<&dyn AttributeReadable> {
        Some(self)
    }

    fn writable(&mut self) -> Option<&mut dyn AttributeWritable> {
        Some(self)
    }
}

impl AttributeReadable for Rewind {
    fn get_attribute(&self, key: &str) -> Result<AttributeValue> {
        match key {
            "rewind" => Ok(AttributeValue::Bool(self.pending)),
            "armed" => Ok(AttributeValue::Bool(self.snapshot.is_some())),
            _ => Err(KilnError::attribute_not_found("Rewind", key)),
        }
    }
}

impl AttributeWritable for Rewind {
    fn set_attribute(&mut self, key: &str, value: AttributeValue) -> Result<()> {
        match key {
            "rewind" => self.pending = value.coerce_bool(key)?,
            "armed" => return Err(KilnError::ReadOnlyAttribute(key.to_string())),
            _ => return Err(KilnError::attribute_not_found("Rewind", key)),
        }
        Ok(())
    }
}

pub(crate) fn register(registry: &mut ComponentRegistry) {
    registry.register("Rewind", |_args: &[AttributeValue]| -> Result<Box<dyn Component>> {
        Ok(Box::new(Rewind::new()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::{ClipLibrary, EntityId, FrameStats, Vec2};

    fn run(entity: &mut Entity) {
        let clips = ClipLibrary::new();
        let mut stats = FrameStats::new();
        entity.update_components(&clips, &mut stats);
    }

    #[test]
    fn test_restores_previous_transform() {
        let mut entity = Entity::new(EntityId::from_raw(1), "crate");
        entity.add_component("rewind", Box::new(Rewind::new())).unwrap();
        assert_eq!(entity.get_attribute("rewind", "armed").unwrap(), AttributeValue::Bool(false));

        entity.set_position(1.0, 1.0);
        run(&mut entity);
        assert_eq!(entity.get_attribute("rewind", "armed").unwrap(), AttributeValue::Bool(true));

        // Moved into a wall; ask for the previous frame back
        entity.set_position(4.0, 1.0);
        entity.set_attribute("rewind", "rewind", true).unwrap();
        run(&mut entity);
        assert_eq!(entity.position(), Vec2::new(1.0, 1.0));
        assert_eq!(entity.get_attribute("rewind", "rewind").unwrap(), AttributeValue::Bool(false));
    }

    #[test]
    fn test_rewind_without_snapshot_is_noop() {
        let mut entity = Entity::new(EntityId::from_raw(1), "crate");
        entity.add_component("rewind", Box::new(Rewind::new())).unwrap();
        entity.set_position(2.0, 0.0);
        entity.set_attribute("rewind", "rewind", true).unwrap();
        run(&mut entity);
        assert_eq!(entity.position(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_armed_is_read_only() {
        let mut rewind = Rewind::new();
        assert!(matches!(
            rewind.set_attribute("armed", AttributeValue::Bool(true)),
            Err(KilnError::ReadOnlyAttribute(_))
        ));
    }
}

//! Scene - entity ownership and the ordered frame scheduler

use crate::engine::Engine;
use bimap::BiMap;
use kiln_core::{
    AnimationAction, AnimationClip, AttributeValue, ClipLibrary, EntityId, IdAllocator, KilnError,
    Result, BUILTIN_SLOT,
};
use kiln_ecs::{Component, Entity, EntityInfo};
use std::collections::{BTreeMap, HashMap};

/// Owns every entity and drives them forward one frame per `advance`.
///
/// Entities are bucketed by their integer `order`. A frame visits buckets in
/// ascending order and, within a bucket, entities in the order they joined
/// it. Bucket membership is tracked by `EntityId`, so removing one entity
/// never disturbs the bookkeeping of its neighbours.
///
/// An entity's `order` and `name` can change through the attribute bus
/// while the scene is not looking (for instance from inside a component's
/// update). The scene reconciles those fields after each entity's pass,
/// after every `Scene::set_attribute`, and at the start of each frame.
pub struct Scene {
    name: String,
    ids: IdAllocator,
    entities: HashMap<EntityId, Entity>,
    /// Entity name <-> EntityId
    names: BiMap<String, EntityId>,
    /// Priority -> entities in insertion order
    buckets: BTreeMap<i32, Vec<EntityId>>,
    /// Priority bucket each entity currently sits in
    placement: HashMap<EntityId, i32>,
    clips: ClipLibrary,
    last_time: f64,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ids: IdAllocator::new(),
            entities: HashMap::new(),
            names: BiMap::new(),
            buckets: BTreeMap::new(),
            placement: HashMap::new(),
            clips: ClipLibrary::new(),
            last_time: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Create an entity at priority 0
    pub fn add_entity(&mut self, name: impl Into<String>) -> Result<EntityId> {
        let name = name.into();
        if self.names.contains_left(&name) {
            return Err(KilnError::DuplicateEntityName(name));
        }

        let id = self.ids.allocate();
        self.names.insert(name.clone(), id);
        self.entities.insert(id, Entity::new(id, name));
        self.reassign_priority(id, 0);
        Ok(id)
    }

    /// Destroy an entity: run its components' destroy hooks and drop it from
    /// every index.
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<()> {
        let mut entity = self
            .entities
            .remove(&id)
            .ok_or_else(|| KilnError::EntityNotFound(id.to_string()))?;
        entity.destroy();

        if let Some(order) = self.placement.remove(&id) {
            if let Some(bucket) = self.buckets.get_mut(&order) {
                bucket.retain(|e| *e != id);
            }
        }
        self.names.remove_by_right(&id);
        Ok(())
    }

    /// Destroy an entity by name
    pub fn destroy_by_name(&mut self, name: &str) -> Result<()> {
        let id = self
            .find(name)
            .ok_or_else(|| KilnError::EntityNotFound(name.to_string()))?;
        self.destroy_entity(id)
    }

    /// Destroy every entity
    pub fn clear(&mut self) {
        let ids: Vec<EntityId> = self.buckets.values().flatten().copied().collect();
        for id in ids {
            if let Err(e) = self.destroy_entity(id) {
                log::warn!("Scene '{}': failed to destroy entity {}: {}", self.name, id, e);
            }
        }
        self.buckets.clear();
    }

    /// Forget every registered animation clip
    pub fn clear_clips(&mut self) {
        self.clips.clear();
    }

    /// Get entity ID by name
    pub fn find(&self, name: &str) -> Option<EntityId> {
        self.names.get_by_left(name).copied()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutable access to an entity.
    ///
    /// Changes to `order` or `name` made through this reference take effect
    /// at the start of the next frame, or earlier via `sync_entity`.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.find(name).and_then(|id| self.entities.get(&id))
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Attach a component to an entity
    pub fn add_component(&mut self, id: EntityId, slot: &str, component: Box<dyn Component>) -> Result<()> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or_else(|| KilnError::EntityNotFound(id.to_string()))?;
        entity.add_component(slot, component)?;
        // start() may have touched order or name
        self.sync_entity(id);
        Ok(())
    }

    /// Instantiate a registered component type and attach it
    pub fn add_component_by_type(
        &mut self,
        engine: &Engine,
        id: EntityId,
        slot: &str,
        type_name: &str,
        args: &[AttributeValue],
    ) -> Result<()> {
        let component = engine.registry().create(type_name, args)?;
        self.add_component(id, slot, component)
    }

    /// Write an attribute on an entity, applying priority and name changes
    /// immediately.
    pub fn set_attribute(
        &mut self,
        id: EntityId,
        slot: &str,
        key: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        let value = value.into();
        if slot == BUILTIN_SLOT && key == "name" {
            if let Some(new_name) = value.as_str() {
                if matches!(self.find(new_name), Some(owner) if owner != id) {
                    return Err(KilnError::DuplicateEntityName(new_name.to_string()));
                }
            }
        }

        let entity = self
            .entities
            .get_mut(&id)
            .ok_or_else(|| KilnError::EntityNotFound(id.to_string()))?;
        entity.set_attribute(slot, key, value)?;
        self.sync_entity(id);
        Ok(())
    }

    /// Read an attribute from an entity
    pub fn get_attribute(&self, id: EntityId, slot: &str, key: &str) -> Result<AttributeValue> {
        let entity = self
            .entities
            .get(&id)
            .ok_or_else(|| KilnError::EntityNotFound(id.to_string()))?;
        entity.get_attribute(slot, key)
    }

    /// Move an entity to the tail of the `order` bucket, creating the bucket
    /// if needed.
    pub fn reassign_priority(&mut self, id: EntityId, order: i32) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        entity.set_order(order);

        if let Some(previous) = self.placement.insert(id, order) {
            if let Some(bucket) = self.buckets.get_mut(&previous) {
                if let Some(position) = bucket.iter().position(|e| *e == id) {
                    bucket.remove(position);
                }
            }
        }
        self.buckets.entry(order).or_default().push(id);
        log::debug!("Entity {} moved to priority {}", id, order);
    }

    /// Bring bucket membership and the name index in line with the entity's
    /// own `order` and `name` fields.
    ///
    /// A rename that collides with another entity is reverted.
    pub fn sync_entity(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };

        let indexed = self.names.get_by_right(&id).cloned();
        if indexed.as_deref() != Some(entity.name()) {
            if self.names.contains_left(entity.name()) {
                log::warn!(
                    "Rename of entity {} to '{}' rejected: name already in use",
                    id,
                    entity.name()
                );
                if let Some(previous) = indexed {
                    entity.set_name(previous);
                }
            } else {
                self.names.insert(entity.name().to_string(), id);
            }
        }

        let order = entity.order();
        if self.placement.get(&id) != Some(&order) {
            self.reassign_priority(id, order);
        }
    }

    /// Reconcile every entity, in visiting order so that entities moving to
    /// the same bucket keep their relative order.
    fn sync_all(&mut self) {
        let ids = self.visit_order();
        for id in ids {
            self.sync_entity(id);
        }
    }

    /// Drop buckets that no longer hold any entity
    pub fn prune_empty_buckets(&mut self) {
        self.buckets.retain(|_, bucket| !bucket.is_empty());
    }

    /// Distinct priorities, ascending (empty buckets included until pruned)
    pub fn priorities(&self) -> Vec<i32> {
        self.buckets.keys().copied().collect()
    }

    /// Entities in the `order` bucket, in visiting order
    pub fn bucket(&self, order: i32) -> Option<&[EntityId]> {
        self.buckets.get(&order).map(|b| b.as_slice())
    }

    /// Position of an entity inside its bucket
    pub fn bucket_position(&self, id: EntityId) -> Option<usize> {
        let order = self.placement.get(&id)?;
        self.buckets.get(order)?.iter().position(|e| *e == id)
    }

    /// Entity ids in the order a frame visits them
    pub fn visit_order(&self) -> Vec<EntityId> {
        self.buckets.values().flatten().copied().collect()
    }

    /// Info about all entities, in visiting order
    pub fn all_entities(&self) -> Vec<EntityInfo> {
        self.visit_order()
            .into_iter()
            .filter_map(|id| self.entities.get(&id).map(|e| e.info()))
            .collect()
    }

    pub fn clips(&self) -> &ClipLibrary {
        &self.clips
    }

    /// Register an animation clip, replacing any clip with the same name
    pub fn add_clip(&mut self, clip: AnimationClip) -> Result<()> {
        clip.validate()?;
        self.clips.add(clip);
        Ok(())
    }

    /// Append a frame to a registered clip, returning the frame index
    pub fn add_frame(&mut self, clip: &str, actions: Vec<AnimationAction>) -> Result<usize> {
        let clip = self
            .clips
            .get_mut(clip)
            .ok_or_else(|| KilnError::AnimationError(format!("unknown animation clip '{}'", clip)))?;
        Ok(clip.add_frame(actions))
    }

    /// Timestamp of the previous `advance`
    pub fn last_time(&self) -> f64 {
        self.last_time
    }

    /// Set the timestamp the next `advance` measures its delta from
    pub fn reset_clock(&mut self, now: f64) {
        self.last_time = now;
    }

    /// Run one frame at timestamp `now` (seconds).
    ///
    /// Enabled entities get the frame's delta time stamped on them and their
    /// components updated in registration order; disabled entities are
    /// skipped entirely. Frame systems run once every entity has been
    /// visited. Priority changes requested during the pass move the entity
    /// right after its own update but do not alter this frame's visiting
    /// order.
    pub fn advance(&mut self, now: f64, engine: &mut Engine) {
        let delta = (now - self.last_time) as f32;
        self.last_time = now;

        self.sync_all();
        self.prune_empty_buckets();

        for id in self.visit_order() {
            let Some(entity) = self.entities.get_mut(&id) else {
                continue;
            };
            if !entity.is_enabled() {
                continue;
            }
            entity.stamp_delta_time(delta);
            entity.update_components(&self.clips, engine.stats_mut());
            self.sync_entity(id);
        }

        engine.finish_frame(self, delta);
    }
}

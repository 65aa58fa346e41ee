//! Engine context shared by scenes, loaders and systems

use crate::scene::Scene;
use crate::system::{FnSystem, FrameSystem};
use kiln_core::{AttributeValue, FrameStats, Result};
use kiln_ecs::{Component, ComponentRegistry};

/// Process-level state, constructed once at startup and passed by reference.
///
/// Holds the component registry used to instantiate components from data,
/// the frame systems run after each object pass, and the per-frame counters.
pub struct Engine {
    registry: ComponentRegistry,
    systems: Vec<Box<dyn FrameSystem>>,
    stats: FrameStats,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine whose registry holds the built-in components
    pub fn new() -> Self {
        Self::with_registry(ComponentRegistry::with_builtins())
    }

    pub fn with_registry(registry: ComponentRegistry) -> Self {
        Self {
            registry,
            systems: Vec::new(),
            stats: FrameStats::new(),
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    /// Register a component factory by type name
    pub fn register_component<F>(&mut self, type_name: impl Into<String>, factory: F)
    where
        F: Fn(&[AttributeValue]) -> Result<Box<dyn Component>> + 'static,
    {
        self.registry.register(type_name, factory);
    }

    /// Append a frame system; systems run in registration order
    pub fn add_system(&mut self, system: Box<dyn FrameSystem>) {
        log::debug!("Registered frame system '{}'", system.name());
        self.systems.push(system);
    }

    /// Append a closure as a frame system
    pub fn add_system_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: FnMut(&mut Scene, f32) + 'static,
    {
        self.add_system(Box::new(FnSystem::new(name, f)));
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut FrameStats {
        &mut self.stats
    }

    /// Run every frame system, then close the frame's counters
    pub(crate) fn finish_frame(&mut self, scene: &mut Scene, dt: f32) {
        for system in self.systems.iter_mut() {
            system.run(scene, dt);
        }
        self.stats.end_frame();
    }
}

//! Frame system trait

use crate::scene::Scene;

/// A system run once per frame, after every entity has been updated.
///
/// Systems run in registration order. This is the extension point for work
/// that lives outside the entity graph, such as stepping a physics world.
pub trait FrameSystem {
    /// Human-readable name for this system
    fn name(&self) -> &str;

    /// Called after the object pass with the frame's delta time
    fn run(&mut self, scene: &mut Scene, dt: f32);
}

/// Adapts a closure into a `FrameSystem`
pub struct FnSystem<F> {
    name: String,
    f: F,
}

impl<F> FnSystem<F>
where
    F: FnMut(&mut Scene, f32),
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> FrameSystem for FnSystem<F>
where
    F: FnMut(&mut Scene, f32),
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, scene: &mut Scene, dt: f32) {
        (self.f)(scene, dt)
    }
}

//! Component lifecycle and attribute capability traits

use crate::entity::Entity;
use kiln_core::{AttributeValue, ClipLibrary, FrameStats, Result};

/// Read side of the attribute capability
pub trait AttributeReadable {
    /// Read `key`. Unknown keys are an error, never a default.
    fn get_attribute(&self, key: &str) -> Result<AttributeValue>;
}

/// Write side of the attribute capability
pub trait AttributeWritable {
    /// Write `key`. Values of the wrong kind are a `TypeMismatch`.
    fn set_attribute(&mut self, key: &str, value: AttributeValue) -> Result<()>;
}

/// Per-component view of the frame being run
pub struct FrameContext<'a> {
    /// Slot the updating component occupies on its entity
    pub slot: &'a str,
    /// Seconds since the previous frame
    pub delta_time: f32,
    /// Clips of the owning scene
    pub clips: &'a ClipLibrary,
    /// Diagnostic counters for this frame
    pub stats: &'a mut FrameStats,
}

/// A behavior unit attached to an entity under a named slot.
///
/// While one of its hooks runs, a component is detached from its slot, so the
/// `entity` it receives can be freely mutated (including through the bus)
/// without aliasing the component itself. Bus calls addressing the running
/// component's own slot report `ComponentNotFound`; use `FrameContext::slot`
/// to recognise and handle them locally.
pub trait Component {
    /// Called once when the component is attached to an entity
    fn start(&mut self, _entity: &mut Entity) {}

    /// Called once per frame for enabled entities, in registration order
    fn update(&mut self, entity: &mut Entity, ctx: &mut FrameContext<'_>);

    /// Called when the owning entity is destroyed
    fn destroy(&mut self, _entity: &mut Entity) {}

    /// Self-reported type tag, if any
    fn type_name(&self) -> Option<&str> {
        None
    }

    /// Attribute read capability
    fn readable(&self) -> Option<&dyn AttributeReadable> {
        None
    }

    /// Attribute write capability
    fn writable(&mut self) -> Option<&mut dyn AttributeWritable> {
        None
    }
}

//! Kiln ECS - Entities, components and the attribute bus
//!
//! An `Entity` owns a 2D transform and an ordered set of named component
//! slots. Components implement `Component` and may opt into the attribute
//! capability (`AttributeReadable` / `AttributeWritable`) so they can be read
//! and written by name through `Entity::get_attribute` / `set_attribute`.

mod cage;
mod component;
mod entity;
mod registry;
mod rewind;

pub use cage::Cage;
pub use component::{AttributeReadable, AttributeWritable, Component, FrameContext};
pub use entity::{ComponentInfo, Entity, EntityInfo};
pub use registry::{float_arg, require_args, ComponentFactory, ComponentRegistry};
pub use rewind::Rewind;

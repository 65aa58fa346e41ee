//! Kiln Core - Foundational types for the Kiln runtime
//!
//! This crate provides the core types that all other Kiln crates depend on:
//! - `AttributeValue` - The closed value type carried by the attribute bus
//! - `EntityId` - Scene-local entity identifiers
//! - `Transform2D`, `Vec2` - Spatial types
//! - `AnimationClip`, `ClipLibrary` - Keyframe clip data
//! - `FrameStats` - Per-frame diagnostic counters
//! - Error types and Result alias

mod clip;
mod error;
mod id;
mod stats;
mod types;
mod value;

pub use clip::{AnimationAction, AnimationClip, AnimationFrame, ClipLibrary};
pub use error::{KilnError, Result};
pub use id::{EntityId, IdAllocator};
pub use stats::FrameStats;
pub use types::{Transform2D, Vec2};
pub use value::AttributeValue;

/// Slot name addressing an entity's built-in fields
pub const BUILTIN_SLOT: &str = "";

/// Slot name addressing an entity's free-form attribute bag
pub const BAG_SLOT: &str = "{}";

//! Kiln Runtime - Frame loop infrastructure
//!
//! Provides the pieces that drive a simulation forward:
//! - `Scene` - owns entities and visits them in priority order each frame
//! - `Engine` - component registry, frame systems and per-frame statistics
//! - `FrameSystem` - trait for work run after every entity has updated
//! - `FrameClock` - fixed-step or wall-clock timestamps for `Scene::advance`

mod clock;
mod engine;
mod scene;
mod system;

pub use clock::FrameClock;
pub use engine::Engine;
pub use scene::Scene;
pub use system::{FnSystem, FrameSystem};

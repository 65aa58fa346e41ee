//! Kiln Animation - Frame-based clip playback
//!
//! Clips are ordered lists of frames, each a set of attribute writes. The
//! `Animator` component walks its entity through a clip from the scene's
//! clip library, optionally blending numeric attributes between frames.
//! Clips can be authored in code or loaded from `.anim.toml` files.

mod animator;
pub mod loader;
pub mod sampler;

pub use animator::{register, Animator, AnimatorPhase};
pub use loader::{load_clip_dir, load_clips_from_file, load_clips_from_str};

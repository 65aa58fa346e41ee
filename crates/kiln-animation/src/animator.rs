//! Animator component - steps an entity through a clip's frames

use crate::sampler::sample_action;
use kiln_core::{AnimationClip, AttributeValue, KilnError, Result};
use kiln_ecs::{AttributeReadable, AttributeWritable, Component, ComponentRegistry, Entity, FrameContext};

/// Coarse playback phase, derived from the animator's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorPhase {
    /// Not playing, or no clip bound
    Idle,
    /// Clip bound but no frame entered yet
    Entering,
    /// Holding `frame`, interpolating toward its neighbour where asked
    Playing { frame: usize },
    /// Non-looping clip ran off its end; `frame` stays applied
    Frozen { frame: usize },
}

/// Plays a named clip from the scene's clip library on its entity.
///
/// Each frame boundary writes the frame's actions through the attribute bus.
/// Between boundaries, actions flagged `interpolate` are blended toward the
/// matching action of the neighbouring frame. Bus failures are logged and
/// playback carries on.
///
/// Bus surface: `play` (bool), `animation` (string; assigning rewinds to the
/// entry frame), `frame` (read-only, `-1` before the first boundary).
#[derive(Debug, Default)]
pub struct Animator {
    clip: String,
    playing: bool,
    /// Seconds left until the next frame boundary
    accumulator: f32,
    frame: Option<usize>,
    frame_applied: bool,
    frozen: bool,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Animator bound to `clip`, optionally already playing
    pub fn with_clip(clip: impl Into<String>, autoplay: bool) -> Self {
        let mut animator = Self::new();
        animator.set_animation(clip);
        animator.playing = autoplay;
        animator
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Bind a clip and rewind to its entry frame
    pub fn set_animation(&mut self, clip: impl Into<String>) {
        self.clip = clip.into();
        self.frame = None;
        self.accumulator = 0.0;
        self.frozen = false;
    }

    pub fn animation(&self) -> &str {
        &self.clip
    }

    /// Index of the frame currently held
    pub fn current_frame(&self) -> Option<usize> {
        self.frame
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn phase(&self) -> AnimatorPhase {
        if !self.playing || self.clip.is_empty() {
            return AnimatorPhase::Idle;
        }
        match self.frame {
            None => AnimatorPhase::Entering,
            Some(frame) if self.frozen => AnimatorPhase::Frozen { frame },
            Some(frame) => AnimatorPhase::Playing { frame },
        }
    }

    /// Cross a frame boundary. Returns `false` when a non-looping clip has
    /// run out of frames, in which case nothing more happens this tick.
    fn step_frame(&mut self, clip: &AnimationClip) -> bool {
        self.frame_applied = false;
        let count = clip.frame_count();

        let next = match self.frame {
            None if clip.is_reversed() => count - 1,
            None => 0,
            // Reversed clips also step forward here; only entry and
            // interpolation look at the sign of the rate.
            Some(index) => index + 1,
        };

        if next >= count {
            if !clip.looping {
                self.frame = Some(count - 1);
                self.frozen = true;
                return false;
            }
            self.frame = Some(0);
        } else {
            self.frame = Some(next);
        }

        self.accumulator = clip.frame_time();
        log::debug!("Animator entered frame {:?} of '{}'", self.frame, clip.name);
        true
    }

    /// Write through the bus, routing our own slot back to ourselves
    fn write(
        &mut self,
        entity: &mut Entity,
        own_slot: &str,
        slot: &str,
        key: &str,
        value: AttributeValue,
    ) -> Result<()> {
        if slot == own_slot {
            AttributeWritable::set_attribute(self, key, value)
        } else {
            entity.set_attribute(slot, key, value)
        }
    }

    fn apply_frame(&mut self, entity: &mut Entity, ctx: &mut FrameContext<'_>, clip: &AnimationClip, index: usize) {
        let Some(frame) = clip.frame(index) else {
            return;
        };
        for (_, action) in frame.actions() {
            if let Err(e) = self.write(entity, ctx.slot, &action.slot, &action.key, action.value.clone()) {
                log::warn!(
                    "Animator on '{}' failed to apply {}.{} from '{}': {}",
                    entity.name(),
                    action.slot,
                    action.key,
                    clip.name,
                    e
                );
            }
        }
        self.frame_applied = true;
        ctx.stats.inc("animator.frames_applied", 1.0);
    }

    fn interpolate_frame(&mut self, entity: &mut Entity, ctx: &FrameContext<'_>, clip: &AnimationClip, index: usize) {
        let Some(frame) = clip.frame(index) else {
            return;
        };
        for (position, action) in frame.actions() {
            if !action.interpolate {
                continue;
            }
            let Some(value) = sample_action(clip, index, position, self.accumulator) else {
                continue;
            };
            if let Err(e) = self.write(entity, ctx.slot, &action.slot, &action.key, value) {
                log::warn!(
                    "Animator on '{}' failed to interpolate {}.{}: {}",
                    entity.name(),
                    action.slot,
                    action.key,
                    e
                );
            }
        }
    }
}

impl Component for Animator {
    fn update(&mut self, entity: &mut Entity, ctx: &mut FrameContext<'_>) {
        if !self.playing || self.clip.is_empty() {
            return;
        }
        let clips = ctx.clips;
        let Some(clip) = clips.get(&self.clip) else {
            return;
        };
        if clip.frame_count() == 0 {
            return;
        }

        if self.accumulator > 0.0 {
            self.accumulator -= ctx.delta_time;
        }

        if self.accumulator <= 0.0 && !self.step_frame(clip) {
            return;
        }

        let Some(index) = self.frame else {
            return;
        };
        if !self.frame_applied {
            self.apply_frame(entity, ctx, clip, index);
        } else {
            self.interpolate_frame(entity, ctx, clip, index);
        }
    }

    fn type_name(&self) -> Option<&str> {
        Some("Animator")
    }

    fn readable(&self) -> Option<&dyn AttributeReadable> {
        Some(self)
    }

    fn writable(&mut self) -> Option<&mut dyn AttributeWritable> {
        Some(self)
    }
}

impl AttributeReadable for Animator {
    fn get_attribute(&self, key: &str) -> Result<AttributeValue> {
        match key {
            "play" => Ok(AttributeValue::Bool(self.playing)),
            "animation" => Ok(AttributeValue::Text(self.clip.clone())),
            "frame" => Ok(AttributeValue::Int(self.frame.map_or(-1, |f| f as i64))),
            _ => Err(KilnError::attribute_not_found("Animator", key)),
        }
    }
}

impl AttributeWritable for Animator {
    fn set_attribute(&mut self, key: &str, value: AttributeValue) -> Result<()> {
        match key {
            "play" => self.playing = value.coerce_bool(key)?,
            "animation" => {
                let clip = value.coerce_str(key)?.to_string();
                self.set_animation(clip);
            }
            "frame" => return Err(KilnError::ReadOnlyAttribute(key.to_string())),
            _ => return Err(KilnError::attribute_not_found("Animator", key)),
        }
        Ok(())
    }
}

/// Register the `Animator` factory.
///
/// Arguments are optional: a clip name, then an autoplay flag.
pub fn register(registry: &mut ComponentRegistry) {
    registry.register("Animator", |args: &[AttributeValue]| -> Result<Box<dyn Component>> {
        let clip = match args.first() {
            None => return Ok(Box::new(Animator::new())),
            Some(value) => value.as_str().ok_or_else(|| {
                KilnError::ConfigurationError(format!(
                    "Animator expects a clip name as its first argument, got {}",
                    value.type_name()
                ))
            })?,
        };
        let autoplay = match args.get(1) {
            None => false,
            Some(AttributeValue::Bool(flag)) => *flag,
            Some(value) => {
                return Err(KilnError::ConfigurationError(format!(
                    "Animator expects an autoplay flag as its second argument, got {}",
                    value.type_name()
                )))
            }
        };
        Ok(Box::new(Animator::with_clip(clip, autoplay)))
    });
}

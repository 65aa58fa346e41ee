//! Keyframe animation clip data

use crate::error::{KilnError, Result};
use crate::value::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One attribute write performed when a frame is entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationAction {
    /// Component slot on the animated entity (`""` for built-ins, `"{}"` for the bag)
    #[serde(rename = "component")]
    pub slot: String,
    /// Attribute key within the slot
    pub key: String,
    /// Value written when the frame is applied
    pub value: AttributeValue,
    /// Blend toward the neighbouring frame's value between boundaries
    #[serde(default)]
    pub interpolate: bool,
}

impl AnimationAction {
    pub fn new(slot: impl Into<String>, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            slot: slot.into(),
            key: key.into(),
            value: value.into(),
            interpolate: false,
        }
    }

    pub fn interpolated(mut self) -> Self {
        self.interpolate = true;
        self
    }

    /// Whether `other` drives the same attribute
    pub fn same_target(&self, other: &AnimationAction) -> bool {
        self.slot == other.slot && self.key == other.key
    }
}

/// An ordered list of actions. Positions matter: interpolation pairs the
/// action at index `i` with the action at index `i` of the neighbouring frame,
/// so a frame may leave a position empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationFrame {
    actions: Vec<Option<AnimationAction>>,
}

impl AnimationFrame {
    pub fn new(actions: Vec<Option<AnimationAction>>) -> Self {
        Self { actions }
    }

    /// Action at `index`, if that position is filled
    pub fn action(&self, index: usize) -> Option<&AnimationAction> {
        self.actions.get(index).and_then(|a| a.as_ref())
    }

    /// All positions, including empty ones
    pub fn slots(&self) -> &[Option<AnimationAction>] {
        &self.actions
    }

    /// Filled positions with their index
    pub fn actions(&self) -> impl Iterator<Item = (usize, &AnimationAction)> {
        self.actions
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.as_ref().map(|a| (i, a)))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// A named sequence of frames played at a signed frame rate.
///
/// The sign of `fps` picks the entry frame (first for positive, last for
/// negative) and the neighbour used for interpolation; its magnitude is the
/// number of frames per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub fps: i32,
    #[serde(rename = "loop", default)]
    pub looping: bool,
    #[serde(default)]
    frames: Vec<AnimationFrame>,
}

impl AnimationClip {
    /// Create an empty clip. A zero frame rate is rejected.
    pub fn new(name: impl Into<String>, fps: i32, looping: bool) -> Result<Self> {
        let clip = Self {
            name: name.into(),
            fps,
            looping,
            frames: Vec::new(),
        };
        clip.validate()?;
        Ok(clip)
    }

    /// Check authoring-time invariants
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(KilnError::ConfigurationError(
                "animation clip requires a name".to_string(),
            ));
        }
        if self.fps == 0 {
            return Err(KilnError::ConfigurationError(format!(
                "animation clip '{}' has a zero frame rate",
                self.name
            )));
        }
        Ok(())
    }

    /// Append a frame, returning its index
    pub fn add_frame(&mut self, actions: Vec<AnimationAction>) -> usize {
        self.push_frame(AnimationFrame::new(actions.into_iter().map(Some).collect()))
    }

    /// Append a frame that may leave positions empty
    pub fn add_sparse_frame(&mut self, actions: Vec<Option<AnimationAction>>) -> usize {
        self.push_frame(AnimationFrame::new(actions))
    }

    /// Append a frame holding a single action
    pub fn add_simple_frame(
        &mut self,
        slot: &str,
        key: &str,
        value: impl Into<AttributeValue>,
        interpolate: bool,
    ) -> usize {
        let mut action = AnimationAction::new(slot, key, value);
        action.interpolate = interpolate;
        self.add_frame(vec![action])
    }

    fn push_frame(&mut self, frame: AnimationFrame) -> usize {
        self.frames.push(frame);
        self.frames.len() - 1
    }

    pub fn frame(&self, index: usize) -> Option<&AnimationFrame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Seconds each frame is held: `|1 / fps|`
    pub fn frame_time(&self) -> f32 {
        (1.0 / self.fps as f64).abs() as f32
    }

    /// Whether playback runs from the last frame toward the first
    pub fn is_reversed(&self) -> bool {
        self.fps < 0
    }
}

/// All clips known to a scene, addressed by name
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    clips: HashMap<String, AnimationClip>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip. Overwrites any existing clip with the same name.
    pub fn add(&mut self, clip: AnimationClip) {
        self.clips.insert(clip.name.clone(), clip);
    }

    pub fn get(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AnimationClip> {
        self.clips.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn clear(&mut self) {
        self.clips.clear();
    }

    /// Clip names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clips.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

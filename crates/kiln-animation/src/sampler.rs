//! Pure interpolation between neighbouring frames

use kiln_core::{AnimationAction, AnimationClip, AttributeValue};

/// Linear interpolation between two scalars
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Fraction of the current frame already elapsed, given the time left on the
/// frame accumulator. `0.0` right after a boundary, `1.0` at the next one.
pub fn frame_gradient(frame_time: f32, remaining: f32) -> f32 {
    (1.0 / frame_time) * (frame_time - remaining)
}

/// Index of the frame playback is heading toward from `index`.
///
/// Forward clips look at `index + 1`, reversed clips at `index - 1`. Out of
/// range neighbours wrap for looping clips and are `None` otherwise.
pub fn neighbour_frame(clip: &AnimationClip, index: usize) -> Option<usize> {
    let count = clip.frame_count();
    if count == 0 {
        return None;
    }
    if clip.is_reversed() {
        match index.checked_sub(1) {
            Some(prev) => Some(prev),
            None if clip.looping => Some(count - 1),
            None => None,
        }
    } else if index + 1 >= count {
        clip.looping.then_some(0)
    } else {
        Some(index + 1)
    }
}

/// Blended value for the action at `position` of frame `index`.
///
/// Returns `None` when the neighbouring frame has no matching action at the
/// same position (different slot or key) or either value is not numeric.
pub fn sample_action(
    clip: &AnimationClip,
    index: usize,
    position: usize,
    remaining: f32,
) -> Option<AttributeValue> {
    let current = clip.frame(index)?.action(position)?;
    let next = clip.frame(neighbour_frame(clip, index)?)?.action(position)?;
    blend(current, next, clip.frame_time(), remaining)
}

fn blend(
    current: &AnimationAction,
    next: &AnimationAction,
    frame_time: f32,
    remaining: f32,
) -> Option<AttributeValue> {
    if !current.same_target(next) {
        return None;
    }
    let a = current.value.as_f32()?;
    let b = next.value.as_f32()?;
    let t = frame_gradient(frame_time, remaining);
    Some(AttributeValue::Float(lerp(a, b, t)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(fps: i32, looping: bool) -> AnimationClip {
        let mut clip = AnimationClip::new("c", fps, looping).unwrap();
        clip.add_frame(vec![AnimationAction::new("", "positionX", 10.0).interpolated()]);
        clip.add_frame(vec![AnimationAction::new("", "positionX", 20.0).interpolated()]);
        clip
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
        assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
    }

    #[test]
    fn test_gradient() {
        assert_eq!(frame_gradient(1.0, 1.0), 0.0);
        assert_eq!(frame_gradient(1.0, 0.5), 0.5);
        assert!((frame_gradient(0.25, 0.0625) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_neighbours() {
        let forward = clip(4, false);
        assert_eq!(neighbour_frame(&forward, 0), Some(1));
        assert_eq!(neighbour_frame(&forward, 1), None);
        assert_eq!(neighbour_frame(&clip(4, true), 1), Some(0));

        let reversed = clip(-4, false);
        assert_eq!(neighbour_frame(&reversed, 1), Some(0));
        assert_eq!(neighbour_frame(&reversed, 0), None);
        assert_eq!(neighbour_frame(&clip(-4, true), 0), Some(1));
    }

    #[test]
    fn test_sample_action() {
        let clip = clip(1, false);
        assert_eq!(sample_action(&clip, 0, 0, 0.5), Some(AttributeValue::Float(15.0)));
        assert_eq!(sample_action(&clip, 1, 0, 0.5), None);
        assert_eq!(sample_action(&clip, 0, 3, 0.5), None);
    }

    #[test]
    fn test_mismatched_target_not_blended() {
        let mut clip = AnimationClip::new("c", 1, true).unwrap();
        clip.add_frame(vec![AnimationAction::new("", "positionX", 0.0).interpolated()]);
        clip.add_frame(vec![AnimationAction::new("", "positionY", 5.0)]);
        assert_eq!(sample_action(&clip, 0, 0, 0.5), None);

        let mut clip = AnimationClip::new("c", 1, true).unwrap();
        clip.add_frame(vec![AnimationAction::new("{}", "mood", "calm").interpolated()]);
        clip.add_frame(vec![AnimationAction::new("{}", "mood", "angry")]);
        assert_eq!(sample_action(&clip, 0, 0, 0.5), None);
    }

    #[test]
    fn test_integers_blend_as_floats() {
        let mut clip = AnimationClip::new("c", 2, false).unwrap();
        clip.add_frame(vec![AnimationAction::new("", "order", 0).interpolated()]);
        clip.add_frame(vec![AnimationAction::new("", "order", 10)]);
        assert_eq!(sample_action(&clip, 0, 0, 0.25), Some(AttributeValue::Float(5.0)));
    }
}

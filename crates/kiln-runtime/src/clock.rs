//! Frame clock producing the timestamps fed to `Scene::advance`

use kiln_core::{KilnError, Result};
use std::time::Instant;

enum Source {
    /// Deterministic step in seconds
    Fixed(f64),
    /// Monotonic wall clock
    Realtime(Instant),
}

/// Yields monotonically increasing timestamps in seconds.
///
/// The first `tick` always returns `0.0`, so a scene driven from a fresh
/// clock sees a zero delta on its first frame.
pub struct FrameClock {
    source: Source,
    now: f64,
    frame_count: u64,
}

impl FrameClock {
    /// A clock advancing exactly `1 / hz` seconds per tick
    pub fn fixed(hz: f64) -> Result<Self> {
        if hz <= 0.0 || !hz.is_finite() {
            return Err(KilnError::ConfigurationError(format!(
                "frame clock rate must be positive, got {}",
                hz
            )));
        }
        Ok(Self {
            source: Source::Fixed(1.0 / hz),
            now: 0.0,
            frame_count: 0,
        })
    }

    /// A clock reading elapsed wall time since construction
    pub fn realtime() -> Self {
        Self {
            source: Source::Realtime(Instant::now()),
            now: 0.0,
            frame_count: 0,
        }
    }

    /// Advance to the next frame and return its timestamp
    pub fn tick(&mut self) -> f64 {
        if self.frame_count > 0 {
            self.now = match &self.source {
                Source::Fixed(step) => self.now + step,
                Source::Realtime(start) => start.elapsed().as_secs_f64(),
            };
        }
        self.frame_count += 1;
        self.now
    }

    /// Timestamp returned by the most recent tick
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of ticks taken so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Step size for fixed clocks
    pub fn step(&self) -> Option<f64> {
        match self.source {
            Source::Fixed(step) => Some(step),
            Source::Realtime(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_steps() {
        let mut clock = FrameClock::fixed(4.0).unwrap();
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(clock.tick(), 0.25);
        assert_eq!(clock.tick(), 0.5);
        assert_eq!(clock.frame_count(), 3);
        assert_eq!(clock.now(), 0.5);
        assert_eq!(clock.step(), Some(0.25));
    }

    #[test]
    fn test_invalid_rate() {
        assert!(matches!(
            FrameClock::fixed(0.0),
            Err(KilnError::ConfigurationError(_))
        ));
        assert!(FrameClock::fixed(-30.0).is_err());
        assert!(FrameClock::fixed(f64::NAN).is_err());
    }

    #[test]
    fn test_realtime_is_monotonic() {
        let mut clock = FrameClock::realtime();
        assert_eq!(clock.tick(), 0.0);
        let a = clock.tick();
        let b = clock.tick();
        assert!(b >= a);
        assert_eq!(clock.step(), None);
    }
}

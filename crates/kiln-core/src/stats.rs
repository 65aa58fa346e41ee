//! Per-frame diagnostic counters

use std::collections::BTreeMap;

/// Named counters that accumulate during one frame and reset afterwards.
///
/// Counters spring into existence at zero on first touch. `end_frame` copies
/// the current values into the last-frame snapshot and zeroes every counter.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    current: BTreeMap<String, f64>,
    last_frame: BTreeMap<String, f64>,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&mut self, name: &str) -> &mut f64 {
        self.current.entry(name.to_string()).or_insert(0.0)
    }

    pub fn inc(&mut self, name: &str, value: f64) {
        *self.counter(name) += value;
    }

    pub fn dec(&mut self, name: &str, value: f64) {
        *self.counter(name) -= value;
    }

    pub fn set(&mut self, name: &str, value: f64) {
        *self.counter(name) = value;
    }

    /// Current value, zero for counters never touched
    pub fn get(&self, name: &str) -> f64 {
        self.current.get(name).copied().unwrap_or(0.0)
    }

    /// Counters as they stood when the previous frame ended
    pub fn last_frame(&self) -> &BTreeMap<String, f64> {
        &self.last_frame
    }

    /// Close the frame: snapshot and zero all counters
    pub fn end_frame(&mut self) {
        self.last_frame = self.current.clone();
        for value in self.current.values_mut() {
            *value = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut stats = FrameStats::new();
        stats.inc("draw_calls", 2.0);
        stats.inc("draw_calls", 3.0);
        stats.dec("draw_calls", 1.0);
        assert_eq!(stats.get("draw_calls"), 4.0);
        assert_eq!(stats.get("never_touched"), 0.0);
    }

    #[test]
    fn test_end_frame_resets_and_snapshots() {
        let mut stats = FrameStats::new();
        stats.set("sprites", 12.0);
        stats.end_frame();
        assert_eq!(stats.get("sprites"), 0.0);
        assert_eq!(stats.last_frame().get("sprites"), Some(&12.0));
    }
}

//! Adaptive frame pacing
//!
//! The pacing tick period starts at `target / frames` and is corrected after
//! every completed pass by the per-frame share of the pass error:
//!
//! ```text
//! interval += floor((target - observed) / frames)     (never below 1 ms)
//! ```

/// Shortest tick period
pub const MIN_INTERVAL_MS: u32 = 1;

/// Pacing interval integrator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pacer {
    interval_ms: Option<u32>,
}

impl Pacer {
    /// Create a pacer with no interval established
    pub const fn new() -> Self {
        Self { interval_ms: None }
    }

    /// Current interval, if one is established
    pub fn interval_ms(&self) -> Option<u32> {
        self.interval_ms
    }

    /// Interval for the coming pass
    ///
    /// Keeps the established interval; otherwise derives one from the target
    /// pass duration and the frame count.
    pub fn interval_for_pass(&mut self, target_ms: u32, frames: usize) -> u32 {
        *self.interval_ms.get_or_insert_with(|| {
            let frames = u32::try_from(frames.max(1)).unwrap_or(u32::MAX);
            (target_ms / frames).max(MIN_INTERVAL_MS)
        })
    }

    /// Correct the interval from a completed pass
    ///
    /// Passes without frames, or before any interval exists, leave it
    /// unchanged. Returns the interval for the next pass.
    pub fn record_pass(&mut self, target_ms: u32, observed_ms: u64, frames: usize) -> Option<u32> {
        let interval = self.interval_ms?;
        if frames == 0 {
            return Some(interval);
        }

        let error = i64::from(target_ms) - i64::try_from(observed_ms).unwrap_or(i64::MAX);
        let correction = error.div_euclid(frames as i64);
        let next = (i64::from(interval) + correction).clamp(i64::from(MIN_INTERVAL_MS), i64::from(u32::MAX));

        self.interval_ms = Some(next as u32);
        self.interval_ms
    }

    /// Forget the interval so the next pass derives a fresh one
    pub fn reset(&mut self) {
        self.interval_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_interval() {
        let mut pacer = Pacer::new();
        assert_eq!(pacer.interval_ms(), None);
        assert_eq!(pacer.interval_for_pass(1160, 10), 116);

        // Established interval survives a new frame count
        assert_eq!(pacer.interval_for_pass(1160, 20), 116);
    }

    #[test]
    fn test_interval_floor() {
        let mut pacer = Pacer::new();
        assert_eq!(pacer.interval_for_pass(100, 500), 1);

        let mut pacer = Pacer::new();
        assert_eq!(pacer.interval_for_pass(1160, 0), 1160);
    }

    #[test]
    fn test_record_pass_rounds_down() {
        let mut pacer = Pacer::new();
        pacer.interval_for_pass(1000, 10);

        // Too slow by 35 ms: -3.5 per frame floors to -4
        assert_eq!(pacer.record_pass(1000, 1035, 10), Some(96));
        // Too fast by 35 ms: +3.5 per frame floors to +3
        assert_eq!(pacer.record_pass(1000, 965, 10), Some(99));
    }

    #[test]
    fn test_record_pass_clamps_to_minimum() {
        let mut pacer = Pacer::new();
        pacer.interval_for_pass(10, 10);
        assert_eq!(pacer.record_pass(10, 5_000, 10), Some(MIN_INTERVAL_MS));
    }

    #[test]
    fn test_record_pass_without_interval_or_frames() {
        let mut pacer = Pacer::new();
        assert_eq!(pacer.record_pass(1000, 2000, 10), None);

        pacer.interval_for_pass(1000, 10);
        assert_eq!(pacer.record_pass(1000, 2000, 0), Some(100));
    }

    #[test]
    fn test_reset() {
        let mut pacer = Pacer::new();
        pacer.interval_for_pass(1000, 10);
        pacer.reset();
        assert_eq!(pacer.interval_ms(), None);
        assert_eq!(pacer.interval_for_pass(1000, 4), 250);
    }

    #[test]
    fn test_converges_on_target() {
        // A tick-bound pass takes one interval per frame plus fixed overhead
        let target = 1160;
        let frames = 24;
        let overhead = 90;
        let mut pacer = Pacer::new();
        let mut interval = pacer.interval_for_pass(target, frames);

        let mut last_error = u64::MAX;
        for _ in 0..8 {
            let observed = u64::from(interval) * frames as u64 + overhead;
            let error = observed.abs_diff(u64::from(target));
            if last_error != 0 {
                assert!(error < last_error || error < frames as u64, "error grew: {error}");
            }
            last_error = error;
            interval = pacer.record_pass(target, observed, frames).unwrap();
        }
        assert!(last_error < frames as u64);
    }

    #[test]
    fn test_error_strictly_shrinks_while_correctable() {
        let target = 1000u32;
        let frames = 10usize;
        let mut pacer = Pacer::new();
        let mut interval = pacer.interval_for_pass(target, frames);

        let observe = |interval: u32| u64::from(interval) * frames as u64 + 250;
        let mut error = observe(interval).abs_diff(u64::from(target));
        while error >= frames as u64 {
            interval = pacer.record_pass(target, observe(interval), frames).unwrap();
            let next = observe(interval).abs_diff(u64::from(target));
            assert!(next < error);
            error = next;
        }
    }
}

//! Time management utilities
//!
//! Tick rate conversions plus a pluggable high-resolution performance counter.
//! The engine loop only ever talks to [`PerformanceCounter`], so tests and
//! replays can drive it with a [`ManualCounter`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Convert a tick rate (ticks per second) into a tick interval in seconds
pub fn ticks_rate_to_interval(ticks_per_second: f32) -> f32 {
    1.0 / ticks_per_second
}

/// Convert a tick interval in seconds back into a tick rate
pub fn ticks_interval_to_rate(tick_interval_seconds: f32) -> f32 {
    1.0 / tick_interval_seconds
}

/// Source of monotonically increasing counter samples
///
/// Values are only meaningful relative to other values of the same counter.
pub trait PerformanceCounter {
    /// Current counter value
    fn value(&self) -> u64;

    /// Counter ticks per second
    fn frequency(&self) -> u64;

    /// Seconds elapsed between two samples of this counter
    fn seconds_between(&self, start_value: u64, end_value: u64) -> f32 {
        let ticks = end_value.saturating_sub(start_value);
        (ticks as f64 / self.frequency() as f64) as f32
    }

    /// Seconds elapsed since an earlier sample
    fn seconds_since(&self, start_value: u64) -> f32 {
        self.seconds_between(start_value, self.value())
    }
}

/// Wall-clock counter with nanosecond resolution
#[derive(Debug, Clone, Copy)]
pub struct SystemCounter {
    origin: Instant,
}

impl SystemCounter {
    /// Create a counter whose zero is "now"
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceCounter for SystemCounter {
    fn value(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    fn frequency(&self) -> u64 {
        1_000_000_000
    }
}

/// Hand-driven counter for deterministic loops
///
/// Clones share the same underlying value, so a test can keep one clone and
/// hand the other to the engine. An optional auto-step advances the counter
/// every time it is sampled.
#[derive(Debug, Clone)]
pub struct ManualCounter {
    value: Rc<Cell<u64>>,
    auto_step: Rc<Cell<u64>>,
    frequency: u64,
}

impl ManualCounter {
    /// Counter with the given frequency, starting at zero
    pub fn new(frequency: u64) -> Self {
        Self {
            value: Rc::new(Cell::new(0)),
            auto_step: Rc::new(Cell::new(0)),
            frequency: frequency.max(1),
        }
    }

    /// Nanosecond counter that advances by `step_seconds` on every sample
    pub fn stepping(step_seconds: f64) -> Self {
        let counter = Self::new(1_000_000_000);
        counter.set_auto_step_seconds(step_seconds);
        counter
    }

    /// Advance the counter by a number of seconds
    pub fn advance_seconds(&self, seconds: f64) {
        let ticks = self.seconds_to_ticks(seconds);
        self.value.set(self.value.get().saturating_add(ticks));
    }

    /// Change how far every sample advances the counter
    pub fn set_auto_step_seconds(&self, seconds: f64) {
        self.auto_step.set(self.seconds_to_ticks(seconds));
    }

    fn seconds_to_ticks(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.frequency as f64).round() as u64
    }
}

impl PerformanceCounter for ManualCounter {
    fn value(&self) -> u64 {
        let current = self.value.get();
        self.value.set(current.saturating_add(self.auto_step.get()));
        current
    }

    fn frequency(&self) -> u64 {
        self.frequency
    }
}

/// Frame interval tracker built on a performance counter
///
/// Takes exactly one sample per [`FrameTimer::sample`] so no time is lost
/// between consecutive frames.
pub struct FrameTimer {
    counter: Box<dyn PerformanceCounter>,
    last_sample: u64,
    frame_interval: f32,
    total_time: f64,
    frame_count: u64,
}

impl FrameTimer {
    /// Create a timer, taking the initial sample immediately
    pub fn new(counter: Box<dyn PerformanceCounter>) -> Self {
        let last_sample = counter.value();
        Self {
            counter,
            last_sample,
            frame_interval: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Re-anchor the timer so the next frame measures from "now"
    pub fn reset(&mut self) {
        self.last_sample = self.counter.value();
        self.frame_interval = 0.0;
    }

    /// Sample the counter and return the seconds since the previous sample
    pub fn sample(&mut self) -> f32 {
        let now = self.counter.value();
        self.frame_interval = self.counter.seconds_between(self.last_sample, now);
        self.last_sample = now;
        self.total_time += f64::from(self.frame_interval);
        self.frame_count += 1;
        self.frame_interval
    }

    /// Interval measured by the most recent sample
    pub fn frame_interval(&self) -> f32 {
        self.frame_interval
    }

    /// Total time measured since creation
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Number of samples taken
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second since creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            (self.frame_count as f64 / self.total_time) as f32
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rate_interval_round_trip() {
        for rate in [1.0_f32, 24.0, 30.0, 32.0, 60.0, 144.0, 1000.0] {
            let interval = ticks_rate_to_interval(rate);
            assert_relative_eq!(interval, 1.0 / rate);
            assert_relative_eq!(ticks_interval_to_rate(interval), rate, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_manual_counter_seconds() {
        let counter = ManualCounter::new(1000);
        let start = counter.value();
        counter.advance_seconds(0.25);
        assert_relative_eq!(counter.seconds_since(start), 0.25);
    }

    #[test]
    fn test_counter_never_goes_negative() {
        let counter = ManualCounter::new(1000);
        assert_eq!(counter.seconds_between(10, 5), 0.0);
    }

    #[test]
    fn test_clones_share_value() {
        let counter = ManualCounter::new(1_000_000_000);
        let handle = counter.clone();
        handle.advance_seconds(1.0);
        assert_eq!(counter.value(), 1_000_000_000);
    }

    #[test]
    fn test_frame_timer_with_stepping_counter() {
        let mut timer = FrameTimer::new(Box::new(ManualCounter::stepping(1.0 / 32.0)));
        for _ in 0..4 {
            assert_eq!(timer.sample(), 0.03125);
        }
        assert_eq!(timer.frame_count(), 4);
        assert_relative_eq!(timer.total_time(), 0.125);
        assert_relative_eq!(timer.average_fps(), 32.0);
    }

    #[test]
    fn test_system_counter_is_monotonic() {
        let counter = SystemCounter::new();
        let first = counter.value();
        let second = counter.value();
        assert!(second >= first);
        assert_eq!(counter.frequency(), 1_000_000_000);
    }
}

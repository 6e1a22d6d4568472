//! Frame clocks
//!
//! The scheduler never reads the wall clock itself. A frame clock hands it the
//! time elapsed since the previous frame, so the same code runs against real
//! time in a host and against a fixed step in tests and simulations.

use std::time::{Duration, Instant};

/// Source of per-frame time deltas
pub trait FrameClock {
    /// Time elapsed since the previous call
    fn delta(&mut self) -> Duration;
}

/// Highest frame rate a [`ManualClock`] can represent with a whole-microsecond step
pub const MAX_FPS: u32 = 1_000_000;

/// Fixed-step clock, every frame is exactly `step` long
#[derive(Clone, Copy, Debug)]
pub struct ManualClock {
    step: Duration,
    frames: u64,
}

impl ManualClock {
    pub fn new(step: Duration) -> Self {
        Self { step, frames: 0 }
    }

    /// A clock ticking at `fps` frames per second
    ///
    /// The step is rounded to whole microseconds. `fps` is clamped to
    /// `1..=MAX_FPS`, so the step is never zero.
    pub fn from_fps(fps: u32) -> Self {
        let fps = fps.clamp(1, MAX_FPS);
        Self::new(Duration::from_micros(1_000_000 / u64::from(fps)))
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Frames produced so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Total simulated time so far
    pub fn now(&self) -> Duration {
        let frames = u32::try_from(self.frames).unwrap_or(u32::MAX);
        self.step.saturating_mul(frames)
    }
}

impl FrameClock for ManualClock {
    fn delta(&mut self) -> Duration {
        self.frames += 1;
        self.step
    }
}

/// Wall clock backed by [`Instant`]
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    last_frame: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }

    /// Restart the measurement so the next delta doesn't include idle time
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn delta(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_fixed_step() {
        let mut clock = ManualClock::new(Duration::from_millis(16));
        assert_eq!(clock.delta(), Duration::from_millis(16));
        assert_eq!(clock.delta(), Duration::from_millis(16));
        assert_eq!(clock.frames(), 2);
        assert_eq!(clock.now(), Duration::from_millis(32));
    }

    #[test]
    fn test_manual_clock_from_fps() {
        assert_eq!(ManualClock::from_fps(50).step(), Duration::from_millis(20));
        assert_eq!(ManualClock::from_fps(0).step(), Duration::from_secs(1));
    }

    #[test]
    fn test_manual_clock_step_never_zero() {
        let mut clock = ManualClock::from_fps(2_000_000);
        assert_eq!(clock.step(), Duration::from_micros(1));
        clock.delta();
        clock.delta();
        assert_eq!(clock.now(), Duration::from_micros(2));
        assert_eq!(ManualClock::from_fps(u32::MAX).step(), Duration::from_micros(1));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let a = clock.delta();
        let b = clock.delta();
        assert!(a >= Duration::ZERO && b >= Duration::ZERO);
    }
}

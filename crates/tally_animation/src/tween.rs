//! Time-based tweens
//!
//! A [`Tween`] owns nothing but time: a start delay, a duration, an easing
//! curve and the elapsed clock. Callers advance it once per frame and map
//! the reported progress onto whatever values they animate.
//!
//! ```
//! use std::time::Duration;
//! use tally_animation::{Easing, Tween, TweenStep};
//!
//! let mut tween = Tween::new(Duration::from_millis(100), Easing::Linear);
//! let step = tween.advance(Duration::from_millis(50));
//! assert!(matches!(step, TweenStep::Update(f) if f.progress == 0.5));
//! assert!(matches!(tween.advance(Duration::from_millis(50)), TweenStep::Complete(_)));
//! assert_eq!(tween.sample(&0.0f32, &30.0), 30.0);
//! ```

use std::time::Duration;

use crate::easing::Easing;
use crate::values::Interpolate;

/// Lifecycle phase of a tween
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenPhase {
    /// Counting down the start delay
    Delayed,
    /// Progress is advancing
    Running,
    /// Progress reached 1 and the end value was applied
    Completed,
    /// Stopped early; never reports again
    Cancelled,
}

/// Progress snapshot for one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenFrame {
    /// Linear progress in `[0, 1]`
    pub progress: f32,
    /// Progress after the easing curve
    pub eased: f32,
    /// True on the tick the start delay ran out
    pub just_started: bool,
}

/// Result of advancing a tween by one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenStep {
    /// Still inside the start delay
    Waiting,
    /// Progress advanced but has not reached 1
    Update(TweenFrame),
    /// Final tick, progress is exactly 1
    Complete(TweenFrame),
    /// Completed or cancelled earlier, nothing happened
    Idle,
}

/// A one-shot tween from progress 0 to progress 1
#[derive(Clone, Debug)]
pub struct Tween {
    duration: Duration,
    delay: Duration,
    easing: Easing,
    /// Time since the tween was created, delay included
    elapsed: Duration,
    phase: TweenPhase,
}

impl Tween {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            easing,
            elapsed: Duration::ZERO,
            phase: TweenPhase::Delayed,
        }
    }

    /// Set the delay before progress starts advancing
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn phase(&self) -> TweenPhase {
        self.phase
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whether the tween will still report progress
    pub fn is_active(&self) -> bool {
        matches!(self.phase, TweenPhase::Delayed | TweenPhase::Running)
    }

    pub fn is_complete(&self) -> bool {
        self.phase == TweenPhase::Completed
    }

    /// Current linear progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        match self.phase {
            TweenPhase::Delayed => 0.0,
            TweenPhase::Completed => 1.0,
            TweenPhase::Running | TweenPhase::Cancelled => {
                self.progress_at(self.elapsed.saturating_sub(self.delay))
            }
        }
    }

    /// Current eased progress
    pub fn eased(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    /// Advance the clock by `dt`
    pub fn advance(&mut self, dt: Duration) -> TweenStep {
        if !self.is_active() {
            return TweenStep::Idle;
        }

        self.elapsed += dt;
        if self.elapsed < self.delay {
            return TweenStep::Waiting;
        }

        let just_started = self.phase == TweenPhase::Delayed;
        self.phase = TweenPhase::Running;

        let progress = self.progress_at(self.elapsed - self.delay);
        let frame = TweenFrame {
            progress,
            eased: self.easing.apply(progress),
            just_started,
        };

        if progress >= 1.0 {
            self.phase = TweenPhase::Completed;
            TweenStep::Complete(frame)
        } else {
            TweenStep::Update(frame)
        }
    }

    /// Stop the tween; returns false if it had already finished or been cancelled
    pub fn cancel(&mut self) -> bool {
        if self.is_active() {
            self.phase = TweenPhase::Cancelled;
            true
        } else {
            false
        }
    }

    /// Interpolate between `from` and `to` at the current eased progress
    ///
    /// A completed tween returns `to` itself rather than an interpolation.
    pub fn sample<T: Interpolate>(&self, from: &T, to: &T) -> T {
        match self.phase {
            TweenPhase::Completed => to.clone(),
            TweenPhase::Delayed => from.clone(),
            _ => from.lerp(to, self.eased()),
        }
    }

    fn progress_at(&self, active: Duration) -> f32 {
        if active >= self.duration {
            1.0
        } else {
            (active.as_secs_f64() / self.duration.as_secs_f64()) as f32
        }
    }
}

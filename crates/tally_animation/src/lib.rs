//! Tally Animation Core
//!
//! Easing curves, tweens, counters, and the frame-driven tween scheduler
//! underneath the scroll reveal engine.
//!
//! # Features
//!
//! - **Easing**: named curves that pin their endpoints exactly
//! - **Tweens**: one-shot, delay-aware progress from 0 to 1
//! - **Counters**: floor-then-snap integer displays driven by a tween
//! - **Frame Clocks**: fixed-step for tests, wall clock for hosts
//! - **Scheduler**: explicit instance with weak handles, no global state

pub mod clock;
pub mod counter;
pub mod easing;
pub mod error;
pub mod scheduler;
pub mod tween;
pub mod values;

pub use clock::{FrameClock, ManualClock, SystemClock, MAX_FPS};
pub use counter::CounterState;
pub use easing::{Easing, DEFAULT_OVERSHOOT};
pub use error::{AnimationError, Result};
pub use scheduler::{
    AnimationScheduler, CompleteCallback, SchedulerHandle, TweenEvent, TweenId, UpdateCallback,
};
pub use tween::{Tween, TweenFrame, TweenPhase, TweenStep};
pub use values::Interpolate;

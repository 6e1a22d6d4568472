//! Counting number displays
//!
//! A counter shows an integer counting up from 0 to its target while a tween
//! runs. The display is floored on every tick so it never runs ahead of the
//! tween, then snaps to the exact target when progress reaches 1.

use std::fmt;

/// Display state of a counting number
#[derive(Clone, Debug, PartialEq)]
pub struct CounterState {
    target: u32,
    display: u32,
    progress: f32,
    suffix: String,
}

impl CounterState {
    pub fn new(target: u32) -> Self {
        Self {
            target,
            display: 0,
            progress: 0.0,
            suffix: String::new(),
        }
    }

    /// Text appended after the number, e.g. `%` or `+`
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn display(&self) -> u32 {
        self.display
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    /// Update the display from linear tween progress
    ///
    /// Progress is clamped to `[0, 1]` and never moves backwards.
    pub fn apply_progress(&mut self, progress: f32) -> u32 {
        self.apply_frame(progress, progress)
    }

    /// Update the display from a tween frame with its own easing
    ///
    /// `progress` is the tween's linear progress and decides when the
    /// counter finishes. `eased` shapes the count on the way there, clamped
    /// to `[0, 1]`. An overshooting curve can't show the target early:
    /// until progress reaches 1 the display stays below it.
    pub fn apply_frame(&mut self, progress: f32, eased: f32) -> u32 {
        let progress = progress.clamp(0.0, 1.0).max(self.progress);
        self.progress = progress;
        self.display = if progress >= 1.0 {
            self.target
        } else {
            let eased = f64::from(eased.clamp(0.0, 1.0));
            let raw = (f64::from(self.target) * eased).floor() as u32;
            raw.min(self.target.saturating_sub(1)).max(self.display)
        };
        self.display
    }

    /// Jump straight to the target
    pub fn finish(&mut self) -> u32 {
        self.apply_progress(1.0)
    }

    /// Rendered text, number then suffix
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CounterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.display, self.suffix)
    }
}

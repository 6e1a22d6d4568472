//! Reveal targets
//!
//! A [`RevealTarget`] is the declarative half of a reveal: which element,
//! where in the viewport it triggers, what it animates, and optionally a
//! counter to drive alongside. The engine owns the runtime half and tracks
//! it through [`RevealPhase`].

use std::time::Duration;

use tally_animation::Easing;

use crate::animation::AnimationSpec;
use crate::layout::ElementId;
use crate::viewport::ActivationThreshold;

/// Lifecycle of a target within one registration
///
/// Phases only move forward. `Settled` is permanent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RevealPhase {
    /// Declared but not registered with a view
    Unarmed,
    /// Observer waiting for the element to enter
    Armed,
    /// Entered; counting down the start delay
    Triggered,
    /// Tweens running
    Animating,
    /// Every tween finished, end state applied
    Settled,
}

impl RevealPhase {
    /// Move to `next` if it is later than the current phase
    pub fn advance_to(&mut self, next: RevealPhase) -> bool {
        if next > *self {
            *self = next;
            true
        } else {
            false
        }
    }

    pub fn is_settled(&self) -> bool {
        *self == RevealPhase::Settled
    }

    pub fn name(&self) -> &'static str {
        match self {
            RevealPhase::Unarmed => "unarmed",
            RevealPhase::Armed => "armed",
            RevealPhase::Triggered => "triggered",
            RevealPhase::Animating => "animating",
            RevealPhase::Settled => "settled",
        }
    }
}

/// Default length of a counting number tween
pub const DEFAULT_COUNTER_DURATION: Duration = Duration::from_millis(1500);

/// Counting number driven alongside a reveal
#[derive(Clone, Debug, PartialEq)]
pub struct CounterSpec {
    pub target: u32,
    pub suffix: String,
    pub duration: Duration,
    pub easing: Easing,
}

impl CounterSpec {
    pub fn new(target: u32) -> Self {
        Self {
            target,
            suffix: String::new(),
            duration: DEFAULT_COUNTER_DURATION,
            easing: Easing::Linear,
        }
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// An element that animates into view once
#[derive(Clone, Debug, PartialEq)]
pub struct RevealTarget {
    pub element: ElementId,
    pub threshold: ActivationThreshold,
    pub animation: AnimationSpec,
    pub counter: Option<CounterSpec>,
}

impl RevealTarget {
    pub fn new(
        element: impl Into<ElementId>,
        threshold: ActivationThreshold,
        animation: AnimationSpec,
    ) -> Self {
        Self {
            element: element.into(),
            threshold,
            animation,
            counter: None,
        }
    }

    pub fn with_counter(mut self, counter: CounterSpec) -> Self {
        self.counter = Some(counter);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_only_moves_forward() {
        let mut phase = RevealPhase::Unarmed;
        assert!(phase.advance_to(RevealPhase::Armed));
        assert!(phase.advance_to(RevealPhase::Animating));
        assert!(!phase.advance_to(RevealPhase::Triggered));
        assert_eq!(phase, RevealPhase::Animating);
        assert!(phase.advance_to(RevealPhase::Settled));
        assert!(!phase.advance_to(RevealPhase::Armed));
        assert!(phase.is_settled());
    }

    #[test]
    fn test_counter_defaults() {
        let counter = CounterSpec::new(98).suffix("%");
        assert_eq!(counter.duration, Duration::from_millis(1500));
        assert_eq!(counter.easing, Easing::Linear);
        assert_eq!(counter.suffix, "%");
    }
}

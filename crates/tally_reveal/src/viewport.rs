//! Viewport observer
//!
//! Detects the single moment an element's top edge crosses an activation
//! line in the viewport. An observation fires at most once and is then spent;
//! scrolling back up and down again never fires it a second time.

use tracing::{trace, warn};

use crate::error::{Result, RevealError};
use crate::layout::{ElementId, LayoutProvider};

/// Fraction of the viewport height, measured from the top, where an element
/// counts as entered
///
/// `0.8` fires when the element's top edge is 80% of the way down the
/// viewport.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct ActivationThreshold(f32);

impl ActivationThreshold {
    pub fn new(fraction: f32) -> Result<Self> {
        if fraction.is_finite() && fraction > 0.0 && fraction <= 1.0 {
            Ok(Self(fraction))
        } else {
            Err(RevealError::InvalidThreshold(fraction))
        }
    }

    pub fn fraction(&self) -> f32 {
        self.0
    }
}

impl Default for ActivationThreshold {
    fn default() -> Self {
        Self(0.8)
    }
}

impl TryFrom<f32> for ActivationThreshold {
    type Error = RevealError;

    fn try_from(fraction: f32) -> Result<Self> {
        Self::new(fraction)
    }
}

/// Outcome of polling an observation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObservationPoll {
    /// Not reached the activation line yet
    Pending,
    /// Crossed the line on this poll
    Entered,
    /// Fired earlier; the observation is torn down
    Spent,
}

/// Watches one element against one threshold
#[derive(Clone, Debug)]
pub struct Observation {
    element: ElementId,
    threshold: ActivationThreshold,
    spent: bool,
}

impl Observation {
    pub fn element(&self) -> &ElementId {
        &self.element
    }

    pub fn threshold(&self) -> ActivationThreshold {
        self.threshold
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Check the element against the current layout
    ///
    /// An element that is already past the line fires on its first poll.
    /// An element that vanished from the layout stays pending.
    pub fn poll(&mut self, layout: &dyn LayoutProvider) -> ObservationPoll {
        if self.spent {
            return ObservationPoll::Spent;
        }

        let Some(bounds) = layout.bounds(&self.element) else {
            trace!(element = %self.element, "observed element has no layout");
            return ObservationPoll::Pending;
        };

        let line = layout.viewport().line_at(self.threshold.fraction());
        if bounds.top() <= line {
            self.spent = true;
            ObservationPoll::Entered
        } else {
            ObservationPoll::Pending
        }
    }
}

/// Creates observations, skipping elements the layout doesn't know
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportObserver;

impl ViewportObserver {
    /// Start observing `element`
    ///
    /// Returns `None` (and logs a warning) when the element isn't in the
    /// layout. That is never an error, the reveal simply doesn't happen.
    pub fn observe(
        layout: &dyn LayoutProvider,
        element: &ElementId,
        threshold: ActivationThreshold,
    ) -> Option<Observation> {
        if !layout.contains(element) {
            warn!(element = %element, "reveal target not found in layout, skipping");
            return None;
        }
        Some(Observation {
            element: element.clone(),
            threshold,
            spent: false,
        })
    }
}

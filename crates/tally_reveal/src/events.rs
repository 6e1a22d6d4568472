//! Per-frame reveal events

use std::time::Duration;

use crate::layout::ElementId;
use crate::particles::ParticleId;

/// Something that happened during one engine tick
#[derive(Clone, Debug, PartialEq)]
pub enum RevealEvent {
    /// The element crossed its activation line; start state applied
    Triggered { element: ElementId, at: Duration },
    /// The start delay ran out and the visual tween began
    Started { element: ElementId, at: Duration },
    /// All tweens finished and the end state is in place
    Settled { element: ElementId, at: Duration },
    ParticleSpawned {
        container: ElementId,
        particle: ParticleId,
    },
    /// The particle faded out and left the render tree
    ParticleExpired { particle: ParticleId },
}

impl RevealEvent {
    /// The reveal target the event is about, if any
    pub fn element(&self) -> Option<&ElementId> {
        match self {
            RevealEvent::Triggered { element, .. }
            | RevealEvent::Started { element, .. }
            | RevealEvent::Settled { element, .. } => Some(element),
            RevealEvent::ParticleSpawned { .. } | RevealEvent::ParticleExpired { .. } => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, RevealEvent::Settled { .. })
    }
}

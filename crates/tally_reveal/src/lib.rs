//! Tally Reveal
//!
//! A headless scroll reveal engine. Elements animate into view once, the
//! first time they cross an activation line in the viewport, optionally
//! staggered across siblings and with a counting number alongside. A
//! particle spawner adds drifting glyph backdrops.
//!
//! The engine reads geometry from a [`LayoutProvider`] and writes every
//! visual change to a [`Presentation`], so the same code drives a browser
//! host, a native host, or a test.
//!
//! ```
//! use std::time::Duration;
//! use tally_animation::Easing;
//! use tally_reveal::*;
//!
//! let engine = RevealEngine::with_seed(1);
//! let layout = StaticLayout::new(Viewport::new(1280.0, 800.0))
//!     .with("about/headline", Rect::new(0.0, 200.0, 800.0, 60.0));
//! let mut sink = RecordingPresentation::new();
//!
//! let view = engine.mount("about").unwrap();
//! let target = RevealTarget::new(
//!     "about/headline",
//!     ActivationThreshold::new(0.8).unwrap(),
//!     AnimationSpec::fade_up(30.0, Duration::from_millis(800), Easing::EaseOutQuart),
//! );
//! let key = view.register_one(&layout, target).unwrap().unwrap();
//!
//! for _ in 0..60 {
//!     engine.tick(Duration::from_millis(16), &layout, &mut sink);
//! }
//! assert!(engine.is_fired(key));
//! assert_eq!(sink.property("about/headline", VisualProperty::Opacity), Some(1.0));
//! ```

pub mod animation;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod layout;
pub mod particles;
pub mod presentation;
pub mod scope;
pub mod stagger;
pub mod target;
pub mod viewport;

#[cfg(test)]
mod tests;

pub use animation::{AnimationSpec, PropertyDelta, PropertyValues, VisualProperty};
pub use engine::{EngineHandle, RevealEngine, SpawnerId, TargetKey, ViewId};
pub use error::{Result, RevealError};
pub use events::RevealEvent;
pub use geometry::{Rect, Viewport};
pub use layout::{ElementId, LayoutProvider, StaticLayout};
pub use particles::{
    ParticleConfig, ParticleFrame, ParticleId, ParticleInstance, ParticleSpawner, DEFAULT_GLYPHS,
};
pub use presentation::{NodeState, ParticleNode, Presentation, RecordingPresentation};
pub use scope::{RevealGroup, SpawnerHandle, ViewScope};
pub use stagger::StaggerConfig;
pub use target::{CounterSpec, RevealPhase, RevealTarget, DEFAULT_COUNTER_DURATION};
pub use viewport::{ActivationThreshold, Observation, ObservationPoll, ViewportObserver};

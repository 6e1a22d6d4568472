//! Reveal animations
//!
//! An [`AnimationSpec`] lists the visual properties a reveal moves, each
//! from a start value to an end value, plus the duration, easing and delay
//! shared by all of them. The constructors cover the entrance animations
//! the page sections use; `with` adds further properties to any of them.

use std::fmt;
use std::time::Duration;

use smallvec::SmallVec;
use tally_animation::{Easing, Interpolate};

/// Presentation properties a reveal can drive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VisualProperty {
    Opacity,
    /// Horizontal offset in pixels
    TranslateX,
    /// Vertical offset in pixels
    TranslateY,
    Scale,
    /// In-plane rotation in degrees
    Rotation,
    /// Tilt around the horizontal axis in degrees
    RotateX,
    /// Width as a percentage of the parent
    Width,
}

impl VisualProperty {
    pub fn name(&self) -> &'static str {
        match self {
            VisualProperty::Opacity => "opacity",
            VisualProperty::TranslateX => "translateX",
            VisualProperty::TranslateY => "translateY",
            VisualProperty::Scale => "scale",
            VisualProperty::Rotation => "rotation",
            VisualProperty::RotateX => "rotateX",
            VisualProperty::Width => "width",
        }
    }
}

impl fmt::Display for VisualProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One property moving from `from` to `to`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyDelta {
    pub property: VisualProperty,
    pub from: f32,
    pub to: f32,
}

impl PropertyDelta {
    pub fn new(property: VisualProperty, from: f32, to: f32) -> Self {
        Self { property, from, to }
    }

    /// Value at eased progress `eased`
    pub fn at(&self, eased: f32) -> f32 {
        self.from.lerp(&self.to, eased)
    }
}

/// Property values to write in one step
pub type PropertyValues = SmallVec<[(VisualProperty, f32); 4]>;

/// What a reveal animates and how
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationSpec {
    deltas: SmallVec<[PropertyDelta; 4]>,
    duration: Duration,
    easing: Easing,
    delay: Duration,
}

impl AnimationSpec {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            deltas: SmallVec::new(),
            duration,
            easing,
            delay: Duration::ZERO,
        }
    }

    /// Fade in while rising `rise` pixels into place
    pub fn fade_up(rise: f32, duration: Duration, easing: Easing) -> Self {
        Self::new(duration, easing)
            .with(VisualProperty::Opacity, 0.0, 1.0)
            .with(VisualProperty::TranslateY, rise, 0.0)
    }

    /// Fade up while tilting back from `tilt` degrees
    pub fn tilt_up(rise: f32, tilt: f32, duration: Duration, easing: Easing) -> Self {
        Self::fade_up(rise, duration, easing).with(VisualProperty::RotateX, tilt, 0.0)
    }

    /// Fade in while sliding `distance` pixels in from the left
    pub fn slide_from_left(distance: f32, duration: Duration, easing: Easing) -> Self {
        Self::new(duration, easing)
            .with(VisualProperty::Opacity, 0.0, 1.0)
            .with(VisualProperty::TranslateX, -distance, 0.0)
    }

    /// Fade in while scaling up from `from_scale`
    pub fn pop_in(from_scale: f32, duration: Duration, easing: Easing) -> Self {
        Self::new(duration, easing)
            .with(VisualProperty::Opacity, 0.0, 1.0)
            .with(VisualProperty::Scale, from_scale, 1.0)
    }

    /// Grow a bar from zero to `percent` width
    pub fn grow_width(percent: f32, duration: Duration, easing: Easing) -> Self {
        Self::new(duration, easing).with(VisualProperty::Width, 0.0, percent)
    }

    /// Add or replace a property
    pub fn with(mut self, property: VisualProperty, from: f32, to: f32) -> Self {
        let delta = PropertyDelta::new(property, from, to);
        match self.deltas.iter_mut().find(|d| d.property == property) {
            Some(existing) => *existing = delta,
            None => self.deltas.push(delta),
        }
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn deltas(&self) -> &[PropertyDelta] {
        &self.deltas
    }

    pub fn delta(&self, property: VisualProperty) -> Option<&PropertyDelta> {
        self.deltas.iter().find(|d| d.property == property)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn start_values(&self) -> PropertyValues {
        self.deltas.iter().map(|d| (d.property, d.from)).collect()
    }

    /// End values, exactly as given
    pub fn end_values(&self) -> PropertyValues {
        self.deltas.iter().map(|d| (d.property, d.to)).collect()
    }

    pub fn sample(&self, eased: f32) -> PropertyValues {
        self.deltas.iter().map(|d| (d.property, d.at(eased))).collect()
    }
}

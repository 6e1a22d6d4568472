//! Easing curves
//!
//! Each curve remaps linear progress in `[0, 1]` onto a visual curve. All
//! curves pin their endpoints: `apply(0.0) == 0.0` and `apply(1.0) == 1.0`
//! exactly, so a completed tween lands on its end value with no residue.
//!
//! Curves are named in configuration files by their snake_case name. The
//! overshooting `back_out` curve optionally takes its overshoot in parentheses:
//!
//! ```
//! use tally_animation::Easing;
//!
//! let ease: Easing = "back_out(1.7)".parse().unwrap();
//! assert_eq!(ease, Easing::BackOut { overshoot: 1.7 });
//! assert_eq!(ease.apply(1.0), 1.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// Overshoot used by `back_out` when none is given
pub const DEFAULT_OVERSHOOT: f32 = 1.70158;

/// Easing functions for tweens
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseOutQuart,
    /// Ease out past the end value, then settle back onto it
    BackOut {
        overshoot: f32,
    },
}

impl Easing {
    /// `back_out` with the standard overshoot
    pub const fn back_out() -> Self {
        Easing::BackOut {
            overshoot: DEFAULT_OVERSHOOT,
        }
    }

    /// Apply the curve to linear progress `t`
    ///
    /// `t` is clamped to `[0, 1]` first.
    pub fn apply(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match *self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::BackOut { overshoot } => {
                let c3 = overshoot + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u * u * u + overshoot * u * u
            }
        }
    }

    /// Whether the curve leaves `[0, 1]` on the way to its end value
    pub fn overshoots(&self) -> bool {
        matches!(self, Easing::BackOut { overshoot } if *overshoot > 0.0)
    }

    fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "ease_in_quad",
            Easing::EaseOutQuad => "ease_out_quad",
            Easing::EaseInOutQuad => "ease_in_out_quad",
            Easing::EaseInCubic => "ease_in_cubic",
            Easing::EaseOutCubic => "ease_out_cubic",
            Easing::EaseInOutCubic => "ease_in_out_cubic",
            Easing::EaseOutQuart => "ease_out_quart",
            Easing::BackOut { .. } => "back_out",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::BackOut { overshoot } if *overshoot != DEFAULT_OVERSHOOT => {
                write!(f, "back_out({})", overshoot)
            }
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(args) = s
            .strip_prefix("back_out(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let overshoot: f32 = args
                .trim()
                .parse()
                .map_err(|_| AnimationError::InvalidOvershoot(args.to_string()))?;
            if !overshoot.is_finite() || overshoot < 0.0 {
                return Err(AnimationError::InvalidOvershoot(args.to_string()));
            }
            return Ok(Easing::BackOut { overshoot });
        }

        match s {
            "linear" => Ok(Easing::Linear),
            "ease_in_quad" => Ok(Easing::EaseInQuad),
            "ease_out_quad" => Ok(Easing::EaseOutQuad),
            "ease_in_out_quad" => Ok(Easing::EaseInOutQuad),
            "ease_in_cubic" => Ok(Easing::EaseInCubic),
            "ease_out_cubic" => Ok(Easing::EaseOutCubic),
            "ease_in_out_cubic" => Ok(Easing::EaseInOutCubic),
            "ease_out_quart" => Ok(Easing::EaseOutQuart),
            "back_out" => Ok(Easing::back_out()),
            other => Err(AnimationError::UnknownEasing(other.to_string())),
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = AnimationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 9] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseOutQuart,
        Easing::back_out(),
    ];

    #[test]
    fn test_endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing} at 0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing} at 1");
        }
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::EaseOutCubic.apply(-0.5), 0.0);
        assert_eq!(Easing::EaseOutCubic.apply(3.0), 1.0);
    }

    #[test]
    fn test_ease_out_is_ahead_of_linear() {
        for easing in [Easing::EaseOutQuad, Easing::EaseOutCubic, Easing::EaseOutQuart] {
            assert!(easing.apply(0.3) > 0.3, "{easing}");
        }
        assert!(Easing::EaseInCubic.apply(0.3) < 0.3);
    }

    #[test]
    fn test_back_out_overshoots() {
        let ease = Easing::BackOut { overshoot: 1.7 };
        assert!(ease.overshoots());
        let peak = (1..100)
            .map(|i| ease.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
        assert!(!Easing::EaseOutQuart.overshoots());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("linear".parse::<Easing>().unwrap(), Easing::Linear);
        assert_eq!(
            "ease_out_quart".parse::<Easing>().unwrap(),
            Easing::EaseOutQuart
        );
        assert_eq!("back_out".parse::<Easing>().unwrap(), Easing::back_out());
        assert_eq!(
            " back_out( 1.7 ) ".parse::<Easing>().unwrap(),
            Easing::BackOut { overshoot: 1.7 }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "power3.out".parse::<Easing>(),
            Err(AnimationError::UnknownEasing("power3.out".into()))
        );
        assert!(matches!(
            "back_out(-1)".parse::<Easing>(),
            Err(AnimationError::InvalidOvershoot(_))
        ));
        assert!(matches!(
            "back_out(abc)".parse::<Easing>(),
            Err(AnimationError::InvalidOvershoot(_))
        ));
    }

    #[test]
    fn test_display_parses_back() {
        for easing in ALL.into_iter().chain([Easing::BackOut { overshoot: 1.7 }]) {
            assert_eq!(easing.to_string().parse::<Easing>().unwrap(), easing);
        }
    }

    #[test]
    fn test_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Doc {
            ease: Easing,
        }

        let doc: Doc = toml::from_str(r#"ease = "back_out(1.7)""#).unwrap();
        assert_eq!(doc.ease, Easing::BackOut { overshoot: 1.7 });

        let bad = toml::from_str::<Doc>(r#"ease = "bouncy""#);
        assert!(bad.is_err());
    }
}

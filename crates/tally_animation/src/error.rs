//! Error types for tally_animation

use thiserror::Error;

/// Errors raised while building animation primitives
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// An easing curve name that no curve answers to
    #[error("unknown easing curve '{0}'")]
    UnknownEasing(String),

    /// `back_out(..)` with an unparsable or negative overshoot
    #[error("invalid overshoot '{0}' for back_out (expected a non-negative number)")]
    InvalidOvershoot(String),
}

/// Result type for tally_animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;

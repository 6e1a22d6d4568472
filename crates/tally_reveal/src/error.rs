//! Error types for tally_reveal

use thiserror::Error;

/// Errors raised while configuring reveals and particle backdrops
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RevealError {
    /// Activation thresholds are fractions of the viewport height in `(0, 1]`
    #[error("activation threshold {0} is outside (0, 1]")]
    InvalidThreshold(f32),

    #[error("particle glyph set is empty")]
    EmptyGlyphSet,

    /// A random range whose bounds are reversed or not finite
    #[error("invalid {name} range {start}..{end}")]
    InvalidRange {
        name: &'static str,
        start: f32,
        end: f32,
    },

    #[error("particle spawn interval must be greater than zero")]
    ZeroSpawnInterval,

    /// The engine was shut down or dropped
    #[error("reveal engine has shut down")]
    EngineShutDown,
}

/// Result type for tally_reveal operations
pub type Result<T> = std::result::Result<T, RevealError>;

//! Error types for tally_site

use std::path::PathBuf;

use tally_reveal::RevealError;
use thiserror::Error;

/// Errors raised while loading site configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax, a missing field, or a value of the wrong shape
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Well-formed but unusable content
    #[error("invalid content: {0}")]
    Invalid(String),

    /// Engine settings the reveal engine refuses
    #[error("invalid engine settings")]
    Engine(#[from] RevealError),
}

/// Result type for tally_site operations
pub type Result<T> = std::result::Result<T, ConfigError>;

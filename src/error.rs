//! Error types for configuration and random-range construction

use std::path::PathBuf;

/// Rejected inclusive sampling range
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("range minimum {min} is greater than maximum {max}")]
    Inverted { min: i32, max: i32 },
}

/// Anything that can go wrong while loading or validating a [`crate::SessionConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid range for `{field}`: {source}")]
    Range {
        field: &'static str,
        #[source]
        source: RangeError,
    },

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

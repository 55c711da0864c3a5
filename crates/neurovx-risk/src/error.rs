//! Error types for the risk stratifier.
//!
//! Stratification itself cannot fail: missing or sentinel inputs become
//! `uncertain` domains. Errors only arise when thresholds are configured
//! or loaded from disk.

#[cfg(feature = "serde")]
use std::path::PathBuf;

use thiserror::Error;

/// Convenient `Result` alias for risk operations.
pub type Result<T> = std::result::Result<T, RiskError>;

/// Errors produced while configuring the stratifier.
#[derive(Debug, Error)]
pub enum RiskError {
    /// A threshold has an unusable value.
    #[error("Invalid threshold `{field}`: {reason}")]
    InvalidThreshold {
        /// Name of the threshold field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// A thresholds or metrics file could not be read.
    #[cfg(feature = "serde")]
    #[error("Cannot read `{path}`: {source}")]
    FileRead {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A thresholds or metrics file contains malformed JSON.
    #[cfg(feature = "serde")]
    #[error("Cannot parse `{path}`: {source}")]
    ParseError {
        /// Path that was being parsed.
        path: PathBuf,
        /// Underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl RiskError {
    /// Construct a [`RiskError::InvalidThreshold`].
    pub fn invalid_threshold<S: Into<String>>(field: &'static str, reason: S) -> Self {
        RiskError::InvalidThreshold {
            field,
            reason: reason.into(),
        }
    }
}

/// Read and parse a JSON file into `T`.
#[cfg(feature = "serde")]
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(|source| RiskError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| RiskError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_threshold_message_names_field() {
        let err = RiskError::invalid_threshold("bpm_high", "must exceed bpm_low");
        assert_eq!(err.to_string(), "Invalid threshold `bpm_high`: must exceed bpm_low");
    }
}

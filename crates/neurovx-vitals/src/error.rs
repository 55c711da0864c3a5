//! Error types for the rPPG vitals pipeline.
//!
//! Per-frame processing never returns these: every failure on the frame
//! path degrades to "no new estimate this cycle". They surface only when
//! a pipeline is configured or a filter is designed.

#[cfg(feature = "serde")]
use std::path::PathBuf;

use thiserror::Error;

/// Convenient `Result` alias for vitals operations.
pub type Result<T> = std::result::Result<T, VitalsError>;

/// Top-level error type for the vitals crate.
#[derive(Debug, Error)]
pub enum VitalsError {
    /// Filter design or application failed.
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// Configuration is invalid or could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors produced while designing or applying a band-pass filter.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// Cut-off frequencies do not describe a usable pass band.
    #[error("Invalid band {low_hz}-{high_hz} Hz at {sample_rate} Hz sampling")]
    InvalidBand {
        /// Lower cut-off in Hz.
        low_hz: f64,
        /// Upper cut-off in Hz.
        high_hz: f64,
        /// Sampling rate in Hz.
        sample_rate: f64,
    },

    /// Butterworth order must be even and non-zero.
    #[error("Unsupported filter order {0}: must be even and at least 2")]
    UnsupportedOrder(usize),

    /// Signal is shorter than the forward-backward padding requires.
    #[error("Signal too short for filtering: {len} samples, need more than {required}")]
    SignalTooShort {
        /// Samples supplied.
        len: usize,
        /// Padding length that must be exceeded.
        required: usize,
    },
}

/// Errors produced while validating or loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field has an invalid value.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Name of the field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// A configuration file could not be read from disk.
    #[cfg(feature = "serde")]
    #[error("Cannot read config file `{path}`: {source}")]
    FileRead {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file contains malformed JSON.
    #[cfg(feature = "serde")]
    #[error("Cannot parse config file `{path}`: {source}")]
    ParseError {
        /// Path that was being parsed.
        path: PathBuf,
        /// Underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Construct a [`ConfigError::InvalidValue`].
    pub fn invalid_value<S: Into<String>>(field: &'static str, reason: S) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

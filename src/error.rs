//! Error types for detector construction.

use thiserror::Error;

/// Errors that can occur while building a [`Detector`](crate::Detector).
///
/// Classification itself never fails: a User-Agent that matches nothing
/// yields absent sub-results, not an error.
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("io error reading rule corpus {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rule file {file} is malformed: {source}")]
    Rules {
        file: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid {group} pattern '{pattern}': {source}")]
    Pattern {
        group: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown device type: {0}")]
    UnknownDeviceType(String),
}

impl DetectorError {
    /// Returns true if construction failed because a compiled pattern
    /// exceeded the regex size limit.
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(
            self,
            DetectorError::Pattern {
                source: regex::Error::CompiledTooBig(_),
                ..
            }
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = DetectorError> = std::result::Result<T, E>;

//! Error types for the tracking/zone/activity core.

use thiserror::Error;

/// Result type for floortrack-core operations.
pub type FloortrackResult<T> = Result<T, FloortrackError>;

/// Errors the core can raise, per the taxonomy in the system design.
///
/// `ConfigError` is the only variant raised from a constructor and is
/// fatal: callers should not attempt to run a tracker, zone engine, or
/// classifier built from invalid configuration. `InputError`,
/// `PoseUnavailable`, and `AdapterFailure` are recoverable per-frame
/// conditions; they are logged via `tracing` and handled inline rather
/// than returned from `update()` calls, so they appear here mainly as a
/// documented taxonomy and for callers who want to construct one
/// explicitly (e.g. an adapter wrapper reporting its own failures).
#[derive(Debug, Error)]
pub enum FloortrackError {
    #[error("zone {index} has a malformed polygon: {reason}")]
    BadPolygon { index: usize, reason: String },

    #[error("invalid configuration: {0}")]
    ConfigError(String),

    #[error("invalid bbox ({x1}, {y1}, {x2}, {y2}): {reason}")]
    InvalidBbox {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        reason: String,
    },

    #[error("input error: {0}")]
    InputError(String),

    #[error("pose unavailable for track {0}")]
    PoseUnavailable(u64),

    #[error("adapter failure: {0}")]
    AdapterFailure(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl FloortrackError {
    pub fn bad_polygon(index: usize, reason: impl Into<String>) -> Self {
        Self::BadPolygon {
            index,
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    pub fn invalid_bbox(x1: f64, y1: f64, x2: f64, y2: f64, reason: impl Into<String>) -> Self {
        Self::InvalidBbox {
            x1,
            y1,
            x2,
            y2,
            reason: reason.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::InputError(message.into())
    }

    pub fn adapter_failure(message: impl Into<String>) -> Self {
        Self::AdapterFailure(message.into())
    }
}

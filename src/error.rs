//! Error types for Wildtrack

use thiserror::Error;

/// Errors surfaced by configuration loading, wire parsing and sound dispatch.
///
/// Session operations themselves never fail; these only appear at the edges.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("Failed to parse telemetry payload: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Sound playback failed: {0}")]
    Sound(String),
}

//! Event envelope for replay and streaming input
//!
//! Each line of input is one event tagged by `type`: a telemetry sample, a
//! location fix or fix failure, or an operator command.

use crate::error::TrackError;
use crate::location::FixSource;
use crate::schema::sample::RawSample;
use crate::types::GeoPoint;
use serde::{Deserialize, Serialize};

/// One input event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackEvent {
    /// New telemetry record from the collar
    Sample { data: RawSample },
    /// Successful location fix
    Fix {
        latitude_deg: f64,
        longitude_deg: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accuracy_m: Option<f64>,
        #[serde(default)]
        timestamp_ms: i64,
        #[serde(default)]
        source: FixSource,
    },
    /// A fix attempt failed
    FixError { message: String },
    /// The host has no geolocation capability
    LocationUnavailable,
    /// Operator command: move the base to the current location
    ResetBase,
    /// Cancel the location watch
    StopWatch,
}

impl TrackEvent {
    pub fn sample(data: RawSample) -> Self {
        TrackEvent::Sample { data }
    }

    pub fn fix(point: GeoPoint, source: FixSource) -> Self {
        TrackEvent::Fix {
            latitude_deg: point.latitude_deg,
            longitude_deg: point.longitude_deg,
            accuracy_m: point.accuracy_m,
            timestamp_ms: point.timestamp_ms,
            source,
        }
    }

    /// Short name of the event type, matching the wire tag
    pub fn kind(&self) -> &'static str {
        match self {
            TrackEvent::Sample { .. } => "sample",
            TrackEvent::Fix { .. } => "fix",
            TrackEvent::FixError { .. } => "fix_error",
            TrackEvent::LocationUnavailable => "location_unavailable",
            TrackEvent::ResetBase => "reset_base",
            TrackEvent::StopWatch => "stop_watch",
        }
    }

    /// Check the event carries usable numbers.
    ///
    /// Health values are never range-checked here; only non-finite numbers and
    /// negative accuracies are rejected.
    pub fn validate(&self) -> Result<(), TrackError> {
        match self {
            TrackEvent::Sample { data } => {
                for (key, value) in data.numeric_fields() {
                    if let Some(v) = value {
                        if !v.is_finite() {
                            return Err(TrackError::InvalidEvent(format!(
                                "sample field {} is not finite",
                                key
                            )));
                        }
                    }
                }
                Ok(())
            }
            TrackEvent::Fix {
                latitude_deg,
                longitude_deg,
                accuracy_m,
                ..
            } => {
                if !latitude_deg.is_finite() || !longitude_deg.is_finite() {
                    return Err(TrackError::InvalidEvent(
                        "fix coordinates must be finite".to_string(),
                    ));
                }
                if let Some(acc) = accuracy_m {
                    if !acc.is_finite() || *acc < 0.0 {
                        return Err(TrackError::InvalidEvent(format!(
                            "fix accuracy {} must be a non-negative number",
                            acc
                        )));
                    }
                }
                Ok(())
            }
            TrackEvent::FixError { .. }
            | TrackEvent::LocationUnavailable
            | TrackEvent::ResetBase
            | TrackEvent::StopWatch => Ok(()),
        }
    }
}

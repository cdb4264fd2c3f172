//! Snapshot encoding
//!
//! Renders a session's derived state into the serializable snapshot consumed
//! by dashboards and the CLI.

use crate::error::TrackError;
use crate::session::TelemetrySession;
use crate::types::{SessionSnapshot, SnapshotProducer};
use crate::{PRODUCER_NAME, TRACK_VERSION};
use chrono::Utc;
use uuid::Uuid;

/// Snapshot encoder tagged with a per-process instance id
pub struct SnapshotEncoder {
    instance_id: String,
}

impl Default for SnapshotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn encode(&self, session: &TelemetrySession) -> SessionSnapshot {
        SessionSnapshot {
            producer: SnapshotProducer {
                name: PRODUCER_NAME.to_string(),
                version: TRACK_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            sample: session.current_sample().cloned(),
            vitals: session.classifications(),
            alerts: session.alerts().to_vec(),
            history: session.history().to_vec(),
            boundary: session.boundary_state().cloned(),
            distance_km: session.distance_km(),
            base_location: session.base_location().copied(),
            current_location: session.current_location().copied(),
            location_error: session.location_error().cloned(),
            struggle_detected: session.struggle_detected(),
            watch_active: session.is_watch_active(),
            samples_received: session.samples_received(),
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(&self, session: &TelemetrySession) -> Result<String, TrackError> {
        let snapshot = self.encode(session);
        Ok(serde_json::to_string(&snapshot)?)
    }
}

//! Location feed state
//!
//! Tracks the watch subscription and the location-error condition surfaced to
//! the renderer. Fix errors never drop the last known good location.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a fix came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixSource {
    /// One-shot fix requested at startup
    Initial,
    /// Continuous watch stream
    #[default]
    Watch,
}

/// Location-error condition shown to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationError {
    /// The device has no geolocation capability; no fix will ever arrive
    Unavailable,
    /// A single fix failed; tracking continues on the last good fix
    Fix { message: String },
}

impl LocationError {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LocationError::Unavailable)
    }
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::Unavailable => write!(f, "Geolocation is not supported on this device"),
            LocationError::Fix { message } => write!(f, "Location error: {}", message),
        }
    }
}

/// Cancelable watch subscription
#[derive(Debug, Clone)]
pub struct LocationWatch {
    active: bool,
}

impl Default for LocationWatch {
    fn default() -> Self {
        Self { active: true }
    }
}

impl LocationWatch {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Cancel the watch. Safe to call repeatedly; returns whether it was active.
    pub fn cancel(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    /// Whether a fix from `source` should be accepted
    pub fn accepts(&self, source: FixSource) -> bool {
        match source {
            FixSource::Initial => true,
            FixSource::Watch => self.active,
        }
    }
}

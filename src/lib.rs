//! Wildtrack - telemetry classification and geofence tracking for animal collars
//!
//! Wildtrack turns a live stream of collar telemetry and location fixes into the
//! state a monitoring dashboard renders: per-vital health classifications,
//! ordered alerts, a bounded trend history, and a boundary status relative to a
//! base location.
//!
//! ## Modules
//!
//! - **Classification**: threshold table, health classifier, alert deriver
//! - **Tracking**: haversine distance, boundary tracker, location feed state
//! - **Session**: the orchestrator that sequences both on every event

pub mod alerts;
pub mod boundary;
pub mod classifier;
pub mod config;
pub mod encoder;
pub mod error;
pub mod geo;
pub mod history;
pub mod location;
pub mod schema;
pub mod session;
pub mod sound;
pub mod thresholds;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use alerts::derive_alerts;
pub use classifier::classify;
pub use config::EngineConfig;
pub use error::TrackError;
pub use geo::distance_km;
pub use session::TelemetrySession;

// Schema exports
pub use schema::{EventAdapter, RawSample, TrackEvent};

/// Wildtrack version embedded in every snapshot
pub const TRACK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for snapshots
pub const PRODUCER_NAME: &str = "wildtrack";

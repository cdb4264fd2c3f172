//! Core types for the Wildtrack engine
//!
//! This module defines the data that flows through the engine: telemetry
//! samples and location fixes coming in, classifications, alerts, history
//! points and boundary states going out.

use crate::location::LocationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One telemetry reading from the collar.
///
/// Every numeric field is already defaulted (absent upstream keys become 0),
/// so nothing downstream has to reason about missing values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Heart rate (beats per minute)
    pub heart_rate_bpm: f64,
    /// Blood oxygen saturation (percentage, 0-100)
    pub spo2_pct: f64,
    /// Systolic blood pressure (mmHg)
    pub bp_systolic_mmhg: f64,
    /// Diastolic blood pressure (mmHg)
    pub bp_diastolic_mmhg: f64,
    /// Core body temperature (celsius)
    pub core_temp_c: f64,
    /// Surface temperature (celsius)
    pub surface_temp_c: f64,
    /// Respiratory surrogate percentage, passed through untouched
    pub respiratory_pct: f64,
    /// Motion magnitude (m/s²)
    pub motion_mps2: f64,
    /// Raw blood pressure signal amplitude
    pub bp_signal_amplitude: f64,
    /// Set when the collar detects the animal struggling
    pub struggle_flag: bool,
    /// Upstream update time (epoch milliseconds)
    pub last_update_ms: i64,
}

/// The four classified vital signs, in alert order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    HeartRate,
    Spo2,
    BpSystolic,
    Temperature,
}

impl VitalKind {
    /// All vital kinds in the fixed alert order.
    pub const ALL: [VitalKind; 4] = [
        VitalKind::HeartRate,
        VitalKind::Spo2,
        VitalKind::BpSystolic,
        VitalKind::Temperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VitalKind::HeartRate => "heart_rate",
            VitalKind::Spo2 => "spo2",
            VitalKind::BpSystolic => "bp_systolic",
            VitalKind::Temperature => "temperature",
        }
    }

    /// Human-readable name used in alerts
    pub fn display_name(&self) -> &'static str {
        match self {
            VitalKind::HeartRate => "Heart Rate",
            VitalKind::Spo2 => "SpO2",
            VitalKind::BpSystolic => "Blood Pressure",
            VitalKind::Temperature => "Temperature",
        }
    }

    /// Read this vital's value out of a sample
    pub fn value_of(&self, sample: &TelemetrySample) -> f64 {
        match self {
            VitalKind::HeartRate => sample.heart_rate_bpm,
            VitalKind::Spo2 => sample.spo2_pct,
            VitalKind::BpSystolic => sample.bp_systolic_mmhg,
            VitalKind::Temperature => sample.core_temp_c,
        }
    }
}

/// Tri-state health category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthStatus {
    Healthy,
    AtRisk,
    Critical,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::AtRisk => "At Risk",
            HealthStatus::Critical => "Critical",
        }
    }

    /// Display color (hex) for dashboards
    pub fn color(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "#4caf50",
            HealthStatus::AtRisk => "#ff9800",
            HealthStatus::Critical => "#f44336",
        }
    }
}

/// Classification of one vital value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthClassification {
    pub status: HealthStatus,
    pub label: String,
    pub color: String,
}

impl From<HealthStatus> for HealthClassification {
    fn from(status: HealthStatus) -> Self {
        Self {
            status,
            label: status.label().to_string(),
            color: status.color().to_string(),
        }
    }
}

/// Classifications for all four vitals of a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalClassifications {
    pub heart_rate: HealthClassification,
    pub spo2: HealthClassification,
    pub blood_pressure: HealthClassification,
    pub temperature: HealthClassification,
}

impl VitalClassifications {
    pub fn get(&self, kind: VitalKind) -> &HealthClassification {
        match kind {
            VitalKind::HeartRate => &self.heart_rate,
            VitalKind::Spo2 => &self.spo2,
            VitalKind::BpSystolic => &self.blood_pressure,
            VitalKind::Temperature => &self.temperature,
        }
    }
}

/// Alert severity, also used to parameterize sound requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

/// A vital-sign alert for the current snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: VitalKind,
    /// Display name of the vital ("Heart Rate", "SpO2", ...)
    pub vital_type: String,
    pub value: f64,
    pub severity: Severity,
    pub message: String,
}

/// A geographic fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Reported horizontal accuracy (meters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_m: Option<f64>,
    /// Fix time (epoch milliseconds)
    #[serde(default)]
    pub timestamp_ms: i64,
}

impl GeoPoint {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            accuracy_m: None,
            timestamp_ms: 0,
        }
    }
}

/// One entry of the trend history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Receipt time of the sample
    pub timestamp: DateTime<Utc>,
    pub heart_rate: f64,
    pub spo2: f64,
    pub bp_sys: f64,
    pub bp_dia: f64,
    pub temp: f64,
    pub respiratory_rate: f64,
}

impl HistoryPoint {
    pub fn from_sample(sample: &TelemetrySample, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            heart_rate: sample.heart_rate_bpm,
            spo2: sample.spo2_pct,
            bp_sys: sample.bp_systolic_mmhg,
            bp_dia: sample.bp_diastolic_mmhg,
            temp: sample.core_temp_c,
            respiratory_rate: sample.respiratory_pct,
        }
    }
}

/// Discrete distance-from-base classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Safe,
    Caution,
    Warning,
    Critical,
}

/// Boundary status derived on each tracker update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryState {
    pub zone: Zone,
    pub distance_km: f64,
    pub is_moving: bool,
    pub is_accelerating: bool,
    /// Operator-facing boundary message; absent in the safe zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Sound the audio collaborator should play for this update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<Severity>,
}

/// Snapshot producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Derived session state handed to the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub producer: SnapshotProducer,
    pub computed_at_utc: String,
    /// Latest sample, absent until the first one arrives
    pub sample: Option<TelemetrySample>,
    pub vitals: Option<VitalClassifications>,
    pub alerts: Vec<Alert>,
    /// Chronological trend history
    pub history: Vec<HistoryPoint>,
    /// Null while boundary tracking is inactive
    pub boundary: Option<BoundaryState>,
    pub distance_km: f64,
    pub base_location: Option<GeoPoint>,
    pub current_location: Option<GeoPoint>,
    pub location_error: Option<LocationError>,
    pub struggle_detected: bool,
    pub watch_active: bool,
    pub samples_received: u64,
}

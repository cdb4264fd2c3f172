//! Health threshold table
//!
//! One entry per vital kind, each holding a closed `healthy` range and a closed
//! `at_risk` range that contains it. Values outside `at_risk` are critical.

use crate::error::TrackError;
use crate::types::VitalKind;
use serde::{Deserialize, Serialize};

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive on both ends. NaN is contained in no range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Whether `other` lies entirely within this range
    pub fn covers(&self, other: &Range) -> bool {
        self.min <= other.min && other.max <= self.max
    }
}

/// Healthy and at-risk bounds for one vital kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalThreshold {
    pub healthy: Range,
    pub at_risk: Range,
}

impl VitalThreshold {
    pub const fn new(healthy: Range, at_risk: Range) -> Self {
        Self { healthy, at_risk }
    }
}

/// Threshold table for all classified vitals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthThresholds {
    pub heart_rate: VitalThreshold,
    pub spo2: VitalThreshold,
    pub bp_systolic: VitalThreshold,
    pub temperature: VitalThreshold,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            // bpm
            heart_rate: VitalThreshold::new(Range::new(60.0, 100.0), Range::new(45.0, 130.0)),
            // percent saturation; at-risk extends down to 90
            spo2: VitalThreshold::new(Range::new(95.0, 100.0), Range::new(90.0, 100.0)),
            // systolic mmHg
            bp_systolic: VitalThreshold::new(Range::new(110.0, 140.0), Range::new(90.0, 160.0)),
            // core celsius
            temperature: VitalThreshold::new(Range::new(36.5, 38.5), Range::new(35.5, 39.5)),
        }
    }
}

impl HealthThresholds {
    pub fn get(&self, kind: VitalKind) -> &VitalThreshold {
        match kind {
            VitalKind::HeartRate => &self.heart_rate,
            VitalKind::Spo2 => &self.spo2,
            VitalKind::BpSystolic => &self.bp_systolic,
            VitalKind::Temperature => &self.temperature,
        }
    }

    /// Check that every range is well formed and `healthy ⊆ at_risk`
    pub fn validate(&self) -> Result<(), TrackError> {
        for kind in VitalKind::ALL {
            let threshold = self.get(kind);
            for range in [&threshold.healthy, &threshold.at_risk] {
                if !(range.min.is_finite() && range.max.is_finite()) || range.min > range.max {
                    return Err(TrackError::InvalidConfig(format!(
                        "{}: range [{}, {}] is not a valid closed interval",
                        kind.as_str(),
                        range.min,
                        range.max
                    )));
                }
            }
            if !threshold.at_risk.covers(&threshold.healthy) {
                return Err(TrackError::InvalidConfig(format!(
                    "{}: healthy range must lie within the at-risk range",
                    kind.as_str()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(HealthThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_range_is_closed() {
        let range = Range::new(60.0, 100.0);
        assert!(range.contains(60.0));
        assert!(range.contains(100.0));
        assert!(!range.contains(59.999));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn test_healthy_outside_at_risk_rejected() {
        let mut thresholds = HealthThresholds::default();
        thresholds.spo2.at_risk = Range::new(90.0, 94.0);

        let err = thresholds.validate().unwrap_err();
        assert!(err.to_string().contains("spo2"));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut thresholds = HealthThresholds::default();
        thresholds.temperature.healthy = Range::new(38.5, 36.5);

        assert!(thresholds.validate().is_err());
    }
}

//! Health classification
//!
//! Maps a vital value to healthy / at-risk / critical against the threshold
//! table. The healthy range is checked first, so at-risk only fires for
//! values inside the at-risk range but outside the healthy one.

use crate::thresholds::HealthThresholds;
use crate::types::{
    HealthClassification, HealthStatus, TelemetrySample, VitalClassifications, VitalKind,
};

/// Classifier for vital-sign values
pub struct HealthClassifier;

impl HealthClassifier {
    /// Classify a value against an explicit threshold table
    pub fn status_with(value: f64, kind: VitalKind, thresholds: &HealthThresholds) -> HealthStatus {
        let threshold = thresholds.get(kind);

        if threshold.healthy.contains(value) {
            HealthStatus::Healthy
        } else if threshold.at_risk.contains(value) {
            HealthStatus::AtRisk
        } else {
            HealthStatus::Critical
        }
    }

    pub fn classify_with(
        value: f64,
        kind: VitalKind,
        thresholds: &HealthThresholds,
    ) -> HealthClassification {
        Self::status_with(value, kind, thresholds).into()
    }

    /// Classify all four vitals of a sample
    pub fn classify_sample(
        sample: &TelemetrySample,
        thresholds: &HealthThresholds,
    ) -> VitalClassifications {
        let classify = |kind: VitalKind| Self::classify_with(kind.value_of(sample), kind, thresholds);

        VitalClassifications {
            heart_rate: classify(VitalKind::HeartRate),
            spo2: classify(VitalKind::Spo2),
            blood_pressure: classify(VitalKind::BpSystolic),
            temperature: classify(VitalKind::Temperature),
        }
    }
}

/// Classify a value against the default threshold table
pub fn classify(value: f64, kind: VitalKind) -> HealthClassification {
    HealthClassifier::classify_with(value, kind, &HealthThresholds::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heart_rate_healthy() {
        let result = classify(75.0, VitalKind::HeartRate);
        assert_eq!(result.status, HealthStatus::Healthy);
        assert_eq!(result.label, "Healthy");
        assert_eq!(result.color, "#4caf50");
    }

    #[test]
    fn test_heart_rate_critical_below_at_risk() {
        let result = classify(40.0, VitalKind::HeartRate);
        assert_eq!(result.status, HealthStatus::Critical);
        assert_eq!(result.color, "#f44336");
    }

    #[test]
    fn test_heart_rate_at_risk_band() {
        let result = classify(50.0, VitalKind::HeartRate);
        assert_eq!(result.status, HealthStatus::AtRisk);
        assert_eq!(result.label, "At Risk");
        assert_eq!(result.color, "#ff9800");
    }

    #[test]
    fn test_range_edges_are_inclusive() {
        assert_eq!(classify(60.0, VitalKind::HeartRate).status, HealthStatus::Healthy);
        assert_eq!(classify(100.0, VitalKind::HeartRate).status, HealthStatus::Healthy);
        assert_eq!(classify(45.0, VitalKind::HeartRate).status, HealthStatus::AtRisk);
        assert_eq!(classify(130.0, VitalKind::HeartRate).status, HealthStatus::AtRisk);
        assert_eq!(classify(130.5, VitalKind::HeartRate).status, HealthStatus::Critical);
    }

    #[test]
    fn test_other_vitals() {
        assert_eq!(classify(97.0, VitalKind::Spo2).status, HealthStatus::Healthy);
        assert_eq!(classify(92.0, VitalKind::Spo2).status, HealthStatus::AtRisk);
        assert_eq!(classify(85.0, VitalKind::Spo2).status, HealthStatus::Critical);

        assert_eq!(classify(120.0, VitalKind::BpSystolic).status, HealthStatus::Healthy);
        assert_eq!(classify(150.0, VitalKind::BpSystolic).status, HealthStatus::AtRisk);
        assert_eq!(classify(170.0, VitalKind::BpSystolic).status, HealthStatus::Critical);

        assert_eq!(classify(37.5, VitalKind::Temperature).status, HealthStatus::Healthy);
        assert_eq!(classify(39.0, VitalKind::Temperature).status, HealthStatus::AtRisk);
        assert_eq!(classify(40.1, VitalKind::Temperature).status, HealthStatus::Critical);
    }

    #[test]
    fn test_physically_impossible_values_still_classified() {
        assert_eq!(classify(-1000.0, VitalKind::Temperature).status, HealthStatus::Critical);
        assert_eq!(classify(1e9, VitalKind::Spo2).status, HealthStatus::Critical);
        assert_eq!(classify(f64::NAN, VitalKind::HeartRate).status, HealthStatus::Critical);
    }

    #[test]
    fn test_healthy_implies_within_at_risk() {
        let thresholds = HealthThresholds::default();
        for kind in VitalKind::ALL {
            let mut value = -50.0;
            while value <= 250.0 {
                if HealthClassifier::status_with(value, kind, &thresholds) == HealthStatus::Healthy {
                    assert!(thresholds.get(kind).at_risk.contains(value));
                }
                value += 0.25;
            }
        }
    }

    #[test]
    fn test_zero_sample_is_all_critical() {
        let classes = HealthClassifier::classify_sample(
            &TelemetrySample::default(),
            &HealthThresholds::default(),
        );
        for kind in VitalKind::ALL {
            assert_eq!(classes.get(kind).status, HealthStatus::Critical);
        }
    }
}

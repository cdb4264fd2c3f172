//! Alert derivation
//!
//! Turns a sample's vital classifications into the ordered list of active
//! alerts: heart rate, SpO2, blood pressure, temperature. Healthy vitals
//! produce nothing; every non-healthy vital produces exactly one alert.

use crate::classifier::HealthClassifier;
use crate::thresholds::HealthThresholds;
use crate::types::{Alert, HealthStatus, Severity, TelemetrySample, VitalKind};

/// Deriver for per-sample vital alerts
pub struct AlertDeriver;

impl AlertDeriver {
    /// Derive alerts for a sample against an explicit threshold table
    pub fn derive(sample: &TelemetrySample, thresholds: &HealthThresholds) -> Vec<Alert> {
        VitalKind::ALL
            .iter()
            .filter_map(|&kind| {
                let value = kind.value_of(sample);
                let severity = match HealthClassifier::status_with(value, kind, thresholds) {
                    HealthStatus::Healthy => return None,
                    HealthStatus::AtRisk => Severity::Warning,
                    HealthStatus::Critical => Severity::Critical,
                };

                Some(Alert {
                    kind,
                    vital_type: kind.display_name().to_string(),
                    value,
                    severity,
                    message: alert_message(kind, severity).to_string(),
                })
            })
            .collect()
    }
}

/// Derive alerts against the default threshold table
pub fn derive_alerts(sample: &TelemetrySample) -> Vec<Alert> {
    AlertDeriver::derive(sample, &HealthThresholds::default())
}

fn alert_message(kind: VitalKind, severity: Severity) -> &'static str {
    match (kind, severity) {
        (VitalKind::HeartRate, Severity::Critical) => "Critical heart rate detected!",
        (VitalKind::HeartRate, Severity::Warning) => "Heart rate at risk level",
        (VitalKind::Spo2, Severity::Critical) => "Critical oxygen saturation!",
        (VitalKind::Spo2, Severity::Warning) => "Low oxygen saturation",
        (VitalKind::BpSystolic, Severity::Critical) => "Critical blood pressure!",
        (VitalKind::BpSystolic, Severity::Warning) => "Blood pressure abnormal",
        (VitalKind::Temperature, Severity::Critical) => "Critical temperature level!",
        (VitalKind::Temperature, Severity::Warning) => "Temperature abnormal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn healthy_sample() -> TelemetrySample {
        TelemetrySample {
            heart_rate_bpm: 75.0,
            spo2_pct: 98.0,
            bp_systolic_mmhg: 120.0,
            bp_diastolic_mmhg: 80.0,
            core_temp_c: 37.5,
            ..Default::default()
        }
    }

    #[test]
    fn test_healthy_sample_has_no_alerts() {
        assert!(derive_alerts(&healthy_sample()).is_empty());
    }

    #[test]
    fn test_alerts_follow_fixed_order() {
        let sample = TelemetrySample {
            heart_rate_bpm: 140.0,  // critical
            spo2_pct: 92.0,         // at risk
            bp_systolic_mmhg: 80.0, // critical
            core_temp_c: 39.0,      // at risk
            ..Default::default()
        };

        let alerts = derive_alerts(&sample);
        let summary: Vec<(&str, Severity)> = alerts
            .iter()
            .map(|a| (a.vital_type.as_str(), a.severity))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Heart Rate", Severity::Critical),
                ("SpO2", Severity::Warning),
                ("Blood Pressure", Severity::Critical),
                ("Temperature", Severity::Warning),
            ]
        );
    }

    #[test]
    fn test_single_vital_out_of_range() {
        let sample = TelemetrySample {
            core_temp_c: 41.0,
            ..healthy_sample()
        };

        let alerts = derive_alerts(&sample);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, VitalKind::Temperature);
        assert_eq!(alerts[0].value, 41.0);
        assert_eq!(alerts[0].message, "Critical temperature level!");
    }

    #[test]
    fn test_warning_messages() {
        let sample = TelemetrySample {
            heart_rate_bpm: 50.0,
            ..healthy_sample()
        };

        let alerts = derive_alerts(&sample);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert_eq!(alerts[0].message, "Heart rate at risk level");
    }

    #[test]
    fn test_secondary_fields_never_alert() {
        let sample = TelemetrySample {
            surface_temp_c: 80.0,
            respiratory_pct: 500.0,
            motion_mps2: 40.0,
            bp_signal_amplitude: -3.0,
            bp_diastolic_mmhg: 300.0,
            struggle_flag: true,
            ..healthy_sample()
        };

        assert!(derive_alerts(&sample).is_empty());
    }

    #[test]
    fn test_zero_alerts_iff_all_healthy() {
        let thresholds = HealthThresholds::default();
        let values = [0.0, 40.0, 50.0, 75.0, 92.0, 97.0, 120.0, 150.0, 37.0, 39.0];
        for &hr in &values {
            for &spo2 in &values {
                let sample = TelemetrySample {
                    heart_rate_bpm: hr,
                    spo2_pct: spo2,
                    ..healthy_sample()
                };
                let all_healthy = VitalKind::ALL.iter().all(|&k| {
                    HealthClassifier::status_with(k.value_of(&sample), k, &thresholds)
                        == HealthStatus::Healthy
                });
                assert_eq!(AlertDeriver::derive(&sample, &thresholds).is_empty(), all_healthy);
            }
        }
    }
}

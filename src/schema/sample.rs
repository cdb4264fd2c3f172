//! Upstream telemetry record
//!
//! The collar gateway publishes one flat record with fixed keys. Any key may be
//! absent or null; absent numerics become 0 before they reach the engine.

use crate::types::TelemetrySample;
use serde::{Deserialize, Serialize};

/// `struggle_flag` arrives either as a boolean or as a 0/1 number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Number(f64),
}

impl FlagValue {
    pub fn is_set(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Number(n) => *n != 0.0 && !n.is_nan(),
        }
    }
}

/// Sample record exactly as published upstream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr_bpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spo2_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bp_sys: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bp_dia: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcore_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsurr_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsurr_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion_mps2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpsig_amp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub struggle_flag: Option<FlagValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_ms: Option<f64>,
}

impl RawSample {
    /// Parse a single upstream record
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Numeric fields paired with their wire keys, for validation
    pub fn numeric_fields(&self) -> [(&'static str, Option<f64>); 10] {
        [
            ("hr_bpm", self.hr_bpm),
            ("spo2_pct", self.spo2_pct),
            ("bp_sys", self.bp_sys),
            ("bp_dia", self.bp_dia),
            ("tcore_c", self.tcore_c),
            ("tsurr_c", self.tsurr_c),
            ("hsurr_pct", self.hsurr_pct),
            ("motion_mps2", self.motion_mps2),
            ("bpsig_amp", self.bpsig_amp),
            ("last_update_ms", self.last_update_ms),
        ]
    }
}

impl From<RawSample> for TelemetrySample {
    fn from(raw: RawSample) -> Self {
        Self::from(&raw)
    }
}

impl From<&RawSample> for TelemetrySample {
    fn from(raw: &RawSample) -> Self {
        TelemetrySample {
            heart_rate_bpm: raw.hr_bpm.unwrap_or(0.0),
            spo2_pct: raw.spo2_pct.unwrap_or(0.0),
            bp_systolic_mmhg: raw.bp_sys.unwrap_or(0.0),
            bp_diastolic_mmhg: raw.bp_dia.unwrap_or(0.0),
            core_temp_c: raw.tcore_c.unwrap_or(0.0),
            surface_temp_c: raw.tsurr_c.unwrap_or(0.0),
            respiratory_pct: raw.hsurr_pct.unwrap_or(0.0),
            motion_mps2: raw.motion_mps2.unwrap_or(0.0),
            bp_signal_amplitude: raw.bpsig_amp.unwrap_or(0.0),
            struggle_flag: raw.struggle_flag.map(|f| f.is_set()).unwrap_or(false),
            last_update_ms: raw.last_update_ms.map(|ms| ms as i64).unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_record() {
        let raw = RawSample::from_json(
            r#"{
                "hr_bpm": 72, "spo2_pct": 97, "bp_sys": 118, "bp_dia": 76,
                "tcore_c": 37.8, "tsurr_c": 31.2, "hsurr_pct": 44,
                "motion_mps2": 0.35, "bpsig_amp": 512, "struggle_flag": 0,
                "last_update_ms": 1700000000123
            }"#,
        )
        .unwrap();

        let sample = TelemetrySample::from(raw);
        assert_eq!(
            sample,
            TelemetrySample {
                heart_rate_bpm: 72.0,
                spo2_pct: 97.0,
                bp_systolic_mmhg: 118.0,
                bp_diastolic_mmhg: 76.0,
                core_temp_c: 37.8,
                surface_temp_c: 31.2,
                respiratory_pct: 44.0,
                motion_mps2: 0.35,
                bp_signal_amplitude: 512.0,
                struggle_flag: false,
                last_update_ms: 1_700_000_000_123,
            }
        );
    }

    #[test]
    fn test_missing_and_null_fields_default_to_zero() {
        let raw = RawSample::from_json(r#"{"hr_bpm": 80, "spo2_pct": null}"#).unwrap();
        let sample = TelemetrySample::from(raw);

        assert_eq!(sample.heart_rate_bpm, 80.0);
        assert_eq!(sample.spo2_pct, 0.0);
        assert_eq!(sample.core_temp_c, 0.0);
        assert_eq!(sample.motion_mps2, 0.0);
        assert!(!sample.struggle_flag);
        assert_eq!(sample.last_update_ms, 0);
    }

    #[test]
    fn test_struggle_flag_forms() {
        for (json, expected) in [
            (r#"{"struggle_flag": 1}"#, true),
            (r#"{"struggle_flag": 0}"#, false),
            (r#"{"struggle_flag": true}"#, true),
            (r#"{"struggle_flag": false}"#, false),
        ] {
            let sample = TelemetrySample::from(RawSample::from_json(json).unwrap());
            assert_eq!(sample.struggle_flag, expected, "input: {}", json);
        }
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let raw = RawSample::from_json(r#"{"hr_bpm": 66, "battery_pct": 81}"#).unwrap();
        assert_eq!(raw.hr_bpm, Some(66.0));
    }
}

//! Engine configuration
//!
//! Everything tunable about the engine lives in [`EngineConfig`]. Hosts load it
//! from JSON; missing sections fall back to the built-in defaults.

use crate::boundary::{BoundaryConfig, DEFAULT_MOTION_THRESHOLD_MPS2};
use crate::error::TrackError;
use crate::history::{DEFAULT_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY};
use crate::thresholds::HealthThresholds;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub thresholds: HealthThresholds,
    pub boundary: BoundaryConfig,
    /// Number of history points kept for trends
    pub history_capacity: usize,
    /// Motion magnitude above which the animal counts as moving (m/s²)
    pub motion_threshold_mps2: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: HealthThresholds::default(),
            boundary: BoundaryConfig::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            motion_threshold_mps2: DEFAULT_MOTION_THRESHOLD_MPS2,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), TrackError> {
        self.thresholds.validate()?;
        self.boundary.validate()?;

        if self.history_capacity == 0 {
            return Err(TrackError::InvalidConfig(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        if self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(TrackError::InvalidConfig(format!(
                "history_capacity must not exceed {}",
                MAX_HISTORY_CAPACITY
            )));
        }
        if !self.motion_threshold_mps2.is_finite() {
            return Err(TrackError::InvalidConfig(
                "motion_threshold_mps2 must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Load and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, TrackError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, TrackError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_is_default() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json(
            r#"{"boundary": {"boundary_radius_km": 2.0, "warning_distance_km": 1.5}, "history_capacity": 50}"#,
        )
        .unwrap();

        assert_eq!(config.boundary.boundary_radius_km, 2.0);
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.thresholds, HealthThresholds::default());
    }

    #[test]
    fn test_invalid_boundary_rejected() {
        let result = EngineConfig::from_json(
            r#"{"boundary": {"boundary_radius_km": 0.5, "warning_distance_km": 0.8}}"#,
        );
        assert!(matches!(result, Err(TrackError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_history_rejected() {
        let result = EngineConfig::from_json(r#"{"history_capacity": 0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_oversized_history_rejected() {
        let json = format!(r#"{{"history_capacity": {}}}"#, usize::MAX);
        let result = EngineConfig::from_json(&json);
        assert!(matches!(result, Err(TrackError::InvalidConfig(_))));

        let at_limit = format!(r#"{{"history_capacity": {}}}"#, MAX_HISTORY_CAPACITY);
        assert!(EngineConfig::from_json(&at_limit).is_ok());
    }

    #[test]
    fn test_round_trip() {
        let json = EngineConfig::default().to_json().unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), EngineConfig::default());
    }
}

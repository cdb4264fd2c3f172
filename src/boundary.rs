//! Boundary tracking
//!
//! Combines the distance from base with the latest motion reading to place the
//! animal in a zone, and decides when the audio collaborator should sound.
//!
//! Zones are evaluated in priority order, first match wins:
//! 1. `distance >= boundary_radius_km` → critical (always sounds)
//! 2. `distance >= warning_distance_km` and moving → warning (sounds when accelerating)
//! 3. `distance >= warning_distance_km` → caution (message only)
//! 4. otherwise → safe
//!
//! The tracker keeps one sample of motion memory. Acceleration is a strict
//! comparison against the motion seen on the previous update, and that memory
//! is overwritten on every update, including location-only ones.

use crate::error::TrackError;
use crate::geo::distance_km;
use crate::types::{BoundaryState, GeoPoint, Severity, TelemetrySample, Zone};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default geofence radius (km)
pub const DEFAULT_BOUNDARY_RADIUS_KM: f64 = 1.0;

/// Default distance at which approach warnings start (km)
pub const DEFAULT_WARNING_DISTANCE_KM: f64 = 0.8;

/// Default motion magnitude above which the animal counts as moving (m/s²)
pub const DEFAULT_MOTION_THRESHOLD_MPS2: f64 = 0.5;

/// Geofence geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    pub boundary_radius_km: f64,
    pub warning_distance_km: f64,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            boundary_radius_km: DEFAULT_BOUNDARY_RADIUS_KM,
            warning_distance_km: DEFAULT_WARNING_DISTANCE_KM,
        }
    }
}

impl BoundaryConfig {
    pub fn validate(&self) -> Result<(), TrackError> {
        if !(self.boundary_radius_km.is_finite() && self.warning_distance_km.is_finite()) {
            return Err(TrackError::InvalidConfig(
                "boundary distances must be finite".to_string(),
            ));
        }
        if self.warning_distance_km < 0.0 {
            return Err(TrackError::InvalidConfig(
                "warning_distance_km must not be negative".to_string(),
            ));
        }
        if self.warning_distance_km >= self.boundary_radius_km {
            return Err(TrackError::InvalidConfig(format!(
                "warning_distance_km ({}) must be less than boundary_radius_km ({})",
                self.warning_distance_km, self.boundary_radius_km
            )));
        }
        Ok(())
    }
}

/// Stateful zone tracker
#[derive(Debug, Clone)]
pub struct BoundaryTracker {
    config: BoundaryConfig,
    motion_threshold_mps2: f64,
    /// Motion seen on the previous update
    previous_motion: f64,
    /// Zone a sound was last requested for; cleared when the zone changes
    sounded_zone: Option<Zone>,
}

impl Default for BoundaryTracker {
    fn default() -> Self {
        Self::new(BoundaryConfig::default(), DEFAULT_MOTION_THRESHOLD_MPS2)
    }
}

impl BoundaryTracker {
    pub fn new(config: BoundaryConfig, motion_threshold_mps2: f64) -> Self {
        Self {
            config,
            motion_threshold_mps2,
            previous_motion: 0.0,
            sounded_zone: None,
        }
    }

    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    pub fn previous_motion(&self) -> f64 {
        self.previous_motion
    }

    /// Recompute the boundary state.
    ///
    /// Returns `None`, leaving the tracker untouched, until a current fix, a
    /// base location and at least one sample all exist.
    pub fn update(
        &mut self,
        current: Option<&GeoPoint>,
        base: Option<&GeoPoint>,
        sample: Option<&TelemetrySample>,
    ) -> Option<BoundaryState> {
        let (current, base, sample) = match (current, base, sample) {
            (Some(c), Some(b), Some(s)) => (c, b, s),
            _ => return None,
        };

        let distance = distance_km(base, current);
        let motion = sample.motion_mps2;
        let is_moving = motion > self.motion_threshold_mps2;
        let is_accelerating = motion > self.previous_motion;
        self.previous_motion = motion;

        let (zone, message, wants_sound) = if distance >= self.config.boundary_radius_km {
            (
                Zone::Critical,
                Some(format!("Boundary crossed! {:.2} km from base", distance)),
                Some(Severity::Critical),
            )
        } else if distance >= self.config.warning_distance_km && is_moving {
            let remaining = self.config.boundary_radius_km - distance;
            (
                Zone::Warning,
                Some(format!(
                    "Approaching boundary while moving: {:.2} km remaining",
                    remaining
                )),
                is_accelerating.then_some(Severity::Warning),
            )
        } else if distance >= self.config.warning_distance_km {
            (
                Zone::Caution,
                Some(format!(
                    "Near boundary: {:.2} km from base (stationary)",
                    distance
                )),
                None,
            )
        } else {
            (Zone::Safe, None, None)
        };

        if self.sounded_zone.is_some_and(|z| z != zone) {
            self.sounded_zone = None;
        }
        let sound = match wants_sound {
            Some(severity) if self.sounded_zone.is_none() => {
                self.sounded_zone = Some(zone);
                Some(severity)
            }
            _ => None,
        };

        if zone == Zone::Critical && sound.is_some() {
            warn!(distance_km = distance, "boundary crossed");
        }
        debug!(
            ?zone,
            distance_km = distance,
            is_moving,
            is_accelerating,
            "boundary updated"
        );

        Some(BoundaryState {
            zone,
            distance_km: distance,
            is_moving,
            is_accelerating,
            message,
            sound,
        })
    }

    /// Forget sound memory; used when the base is reset
    pub fn reset(&mut self) {
        self.sounded_zone = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving(motion: f64) -> TelemetrySample {
        TelemetrySample {
            motion_mps2: motion,
            ..Default::default()
        }
    }

    fn east(lon: f64) -> GeoPoint {
        GeoPoint::new(0.0, lon)
    }

    #[test]
    fn test_uninitialized_returns_none() {
        let mut tracker = BoundaryTracker::default();
        let base = east(0.0);
        let sample = moving(1.0);

        assert!(tracker.update(None, Some(&base), Some(&sample)).is_none());
        assert!(tracker.update(Some(&base), None, Some(&sample)).is_none());
        assert!(tracker.update(Some(&base), Some(&base), None).is_none());
        assert_eq!(tracker.previous_motion(), 0.0);
    }

    #[test]
    fn test_safe_at_base() {
        let mut tracker = BoundaryTracker::default();
        let base = east(0.0);
        let state = tracker.update(Some(&base), Some(&base), Some(&moving(2.0))).unwrap();

        assert_eq!(state.zone, Zone::Safe);
        assert_eq!(state.distance_km, 0.0);
        assert!(state.message.is_none());
        assert!(state.sound.is_none());
    }

    #[test]
    fn test_crossing_one_kilometre_is_critical() {
        let mut tracker = BoundaryTracker::default();
        let state = tracker
            .update(Some(&east(0.009)), Some(&east(0.0)), Some(&moving(0.0)))
            .unwrap();

        assert!((state.distance_km - 1.0).abs() < 0.01);
        assert_eq!(state.zone, Zone::Critical);
        assert_eq!(state.sound, Some(Severity::Critical));
        assert!(state.message.unwrap().starts_with("Boundary crossed!"));
    }

    #[test]
    fn test_accelerating_approach_is_warning_with_sound() {
        let mut tracker = BoundaryTracker::default();
        let base = east(0.0);
        let current = east(0.0072);

        // Establish previous motion of 0.4 while still at base
        tracker.update(Some(&base), Some(&base), Some(&moving(0.4)));
        let state = tracker.update(Some(&current), Some(&base), Some(&moving(0.6))).unwrap();

        assert!(state.is_moving);
        assert!(state.is_accelerating);
        assert_eq!(state.zone, Zone::Warning);
        assert_eq!(state.sound, Some(Severity::Warning));
        assert!(state.message.unwrap().contains("remaining"));
    }

    #[test]
    fn test_decelerating_approach_is_silent_warning() {
        let mut tracker = BoundaryTracker::default();
        let base = east(0.0);
        tracker.update(Some(&base), Some(&base), Some(&moving(0.9)));

        let state = tracker.update(Some(&east(0.0076)), Some(&base), Some(&moving(0.6))).unwrap();
        assert_eq!(state.zone, Zone::Warning);
        assert!(!state.is_accelerating);
        assert!(state.sound.is_none());
    }

    #[test]
    fn test_zone_monotonic_in_distance() {
        let base = east(0.0);
        let near_edge = east(0.00765); // ~0.85 km

        let mut stationary = BoundaryTracker::default();
        let state = stationary.update(Some(&near_edge), Some(&base), Some(&moving(0.1))).unwrap();
        assert_eq!(state.zone, Zone::Caution);
        assert!(state.sound.is_none());
        assert!(state.message.unwrap().contains("stationary"));

        let mut walking = BoundaryTracker::default();
        let state = walking.update(Some(&near_edge), Some(&base), Some(&moving(0.8))).unwrap();
        assert_eq!(state.zone, Zone::Warning);

        let mut far = BoundaryTracker::default();
        let state = far.update(Some(&east(0.02)), Some(&base), Some(&moving(0.1))).unwrap();
        assert_eq!(state.zone, Zone::Critical);
    }

    #[test]
    fn test_motion_threshold_is_strict() {
        let mut tracker = BoundaryTracker::default();
        let base = east(0.0);
        let state = tracker.update(Some(&base), Some(&base), Some(&moving(0.5))).unwrap();
        assert!(!state.is_moving);
    }

    #[test]
    fn test_previous_motion_updated_after_comparison() {
        let mut tracker = BoundaryTracker::default();
        let base = east(0.0);
        let sample = moving(0.7);

        let first = tracker.update(Some(&base), Some(&base), Some(&sample)).unwrap();
        assert!(first.is_accelerating);
        assert_eq!(tracker.previous_motion(), 0.7);

        // Same motion again (e.g. a location-only event) reads as not accelerating
        let second = tracker.update(Some(&base), Some(&base), Some(&sample)).unwrap();
        assert!(!second.is_accelerating);
    }

    #[test]
    fn test_critical_sound_once_per_entry() {
        let mut tracker = BoundaryTracker::default();
        let base = east(0.0);
        let outside = east(0.01);
        let sample = moving(0.0);

        let first = tracker.update(Some(&outside), Some(&base), Some(&sample)).unwrap();
        let second = tracker.update(Some(&outside), Some(&base), Some(&sample)).unwrap();
        assert_eq!(first.sound, Some(Severity::Critical));
        assert!(second.sound.is_none());
        assert_eq!(second.zone, Zone::Critical);

        // Return inside and cross again
        tracker.update(Some(&base), Some(&base), Some(&sample));
        let again = tracker.update(Some(&outside), Some(&base), Some(&sample)).unwrap();
        assert_eq!(again.sound, Some(Severity::Critical));
    }

    #[test]
    fn test_reset_clears_sound_memory() {
        let mut tracker = BoundaryTracker::default();
        let base = east(0.0);
        let outside = east(0.01);
        let sample = moving(0.0);

        tracker.update(Some(&outside), Some(&base), Some(&sample));
        tracker.reset();
        let state = tracker.update(Some(&outside), Some(&base), Some(&sample)).unwrap();
        assert_eq!(state.sound, Some(Severity::Critical));
    }

    #[test]
    fn test_config_validation() {
        assert!(BoundaryConfig::default().validate().is_ok());

        let inverted = BoundaryConfig {
            boundary_radius_km: 0.5,
            warning_distance_km: 0.8,
        };
        assert!(inverted.validate().is_err());

        let equal = BoundaryConfig {
            boundary_radius_km: 0.8,
            warning_distance_km: 0.8,
        };
        assert!(equal.validate().is_err());
    }

    #[test]
    fn test_antipodal_fix_is_critical() {
        let mut tracker = BoundaryTracker::default();
        let base = GeoPoint::new(62.545655693062145, 64.97240236869834);
        let current = GeoPoint::new(-62.545655692132065, -115.02759763130166);

        let state = tracker.update(Some(&current), Some(&base), Some(&moving(0.0))).unwrap();
        assert!(state.distance_km.is_finite());
        assert_eq!(state.zone, Zone::Critical);
        assert_eq!(state.sound, Some(Severity::Critical));
    }
}

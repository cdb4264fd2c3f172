//! Session orchestration
//!
//! [`TelemetrySession`] holds the minimal state each computation needs and
//! sequences the pure stages on every event:
//!
//! - sample → alerts, history append, boundary refresh
//! - fix → base initialization (first fix only), boundary refresh
//!
//! Every mutating operation takes `&mut self`, so events are processed one at
//! a time. No operation here can fail; bad input is handled at the edges.

use crate::alerts::AlertDeriver;
use crate::boundary::BoundaryTracker;
use crate::classifier::HealthClassifier;
use crate::config::EngineConfig;
use crate::error::TrackError;
use crate::history::HistoryBuffer;
use crate::location::{FixSource, LocationError, LocationWatch};
use crate::schema::TrackEvent;
use crate::sound::{self, SoundPlayer};
use crate::types::{
    Alert, BoundaryState, GeoPoint, HistoryPoint, Severity, TelemetrySample,
    VitalClassifications,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Live monitoring session for one collar
#[derive(Debug, Clone)]
pub struct TelemetrySession {
    config: EngineConfig,
    current_sample: Option<TelemetrySample>,
    alerts: Vec<Alert>,
    history: HistoryBuffer,
    base_location: Option<GeoPoint>,
    current_location: Option<GeoPoint>,
    tracker: BoundaryTracker,
    boundary: Option<BoundaryState>,
    /// Reported distance from base; zeroed on base reset
    distance_km: f64,
    location_error: Option<LocationError>,
    watch: LocationWatch,
    /// Latest sound request not yet handed to a player
    pending_sound: Option<Severity>,
    samples_received: u64,
}

impl Default for TelemetrySession {
    fn default() -> Self {
        Self::from_valid_config(EngineConfig::default())
    }
}

impl TelemetrySession {
    /// Create a session with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with a validated configuration
    pub fn with_config(config: EngineConfig) -> Result<Self, TrackError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EngineConfig) -> Self {
        Self {
            history: HistoryBuffer::new(config.history_capacity),
            tracker: BoundaryTracker::new(config.boundary, config.motion_threshold_mps2),
            config,
            current_sample: None,
            alerts: Vec::new(),
            base_location: None,
            current_location: None,
            boundary: None,
            distance_km: 0.0,
            location_error: None,
            watch: LocationWatch::default(),
            pending_sound: None,
            samples_received: 0,
        }
    }

    // ------------------------------------------------------------------
    // Event handling
    // ------------------------------------------------------------------

    /// Route one wire event to the matching operation.
    ///
    /// Returns the sound requested by this event, if any.
    pub fn apply(&mut self, event: TrackEvent) -> Option<Severity> {
        match event {
            TrackEvent::Sample { data } => self.ingest_sample(TelemetrySample::from(data)),
            TrackEvent::Fix {
                latitude_deg,
                longitude_deg,
                accuracy_m,
                timestamp_ms,
                source,
            } => self.ingest_fix_from(
                GeoPoint {
                    latitude_deg,
                    longitude_deg,
                    accuracy_m,
                    timestamp_ms,
                },
                source,
            ),
            TrackEvent::FixError { message } => {
                self.report_fix_error(message);
                None
            }
            TrackEvent::LocationUnavailable => {
                self.report_location_unavailable();
                None
            }
            TrackEvent::ResetBase => {
                self.reset_base_to_current();
                None
            }
            TrackEvent::StopWatch => {
                self.stop_location_watch();
                None
            }
        }
    }

    /// Ingest a sample received now
    pub fn ingest_sample(&mut self, sample: TelemetrySample) -> Option<Severity> {
        self.ingest_sample_at(sample, Utc::now())
    }

    /// Ingest a sample with an explicit receipt time
    pub fn ingest_sample_at(
        &mut self,
        sample: TelemetrySample,
        received_at: DateTime<Utc>,
    ) -> Option<Severity> {
        self.alerts = AlertDeriver::derive(&sample, &self.config.thresholds);
        self.history
            .append(HistoryPoint::from_sample(&sample, received_at));
        self.samples_received += 1;

        debug!(
            hr = sample.heart_rate_bpm,
            spo2 = sample.spo2_pct,
            motion = sample.motion_mps2,
            alerts = self.alerts.len(),
            "sample ingested"
        );
        if sample.struggle_flag {
            warn!("struggle detected");
        }

        self.current_sample = Some(sample);
        self.refresh_boundary()
    }

    /// Ingest a fix from the watch stream
    pub fn ingest_fix(&mut self, fix: GeoPoint) -> Option<Severity> {
        self.ingest_fix_from(fix, FixSource::Watch)
    }

    /// Ingest a fix, dropping watch fixes that arrive after the watch is cancelled
    pub fn ingest_fix_from(&mut self, fix: GeoPoint, source: FixSource) -> Option<Severity> {
        if !self.watch.accepts(source) {
            debug!(?source, "fix ignored, location watch cancelled");
            return None;
        }

        if matches!(self.location_error, Some(LocationError::Fix { .. })) {
            self.location_error = None;
        }
        self.current_location = Some(fix);
        self.initialize_base_if_unset();
        self.refresh_boundary()
    }

    /// Adopt the current fix as base if no base exists yet.
    ///
    /// Returns whether the base was set.
    pub fn initialize_base_if_unset(&mut self) -> bool {
        match (self.base_location, self.current_location) {
            (None, Some(current)) => {
                info!(
                    lat = current.latitude_deg,
                    lon = current.longitude_deg,
                    "base location initialized"
                );
                self.base_location = Some(current);
                true
            }
            _ => false,
        }
    }

    /// Operator command: move the base to the current fix.
    ///
    /// Clears boundary state and zeroes the reported distance. Returns `false`
    /// and changes nothing when no fix exists yet.
    pub fn reset_base_to_current(&mut self) -> bool {
        let Some(current) = self.current_location else {
            warn!("base reset requested before any location fix");
            return false;
        };

        info!(
            lat = current.latitude_deg,
            lon = current.longitude_deg,
            "base location reset"
        );
        self.base_location = Some(current);
        self.boundary = None;
        self.distance_km = 0.0;
        self.pending_sound = None;
        self.tracker.reset();
        true
    }

    /// Record a failed fix; the last good location stays in use
    pub fn report_fix_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "location fix failed");
        if self.location_error.as_ref().is_some_and(LocationError::is_terminal) {
            return;
        }
        self.location_error = Some(LocationError::Fix { message });
    }

    /// Record that geolocation is not available at all
    pub fn report_location_unavailable(&mut self) {
        warn!("geolocation unavailable, boundary tracking disabled");
        self.location_error = Some(LocationError::Unavailable);
    }

    /// Cancel the location watch. Idempotent; returns whether it was active.
    pub fn stop_location_watch(&mut self) -> bool {
        let was_active = self.watch.cancel();
        if was_active {
            info!("location watch stopped");
        }
        was_active
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn refresh_boundary(&mut self) -> Option<Severity> {
        let state = self.tracker.update(
            self.current_location.as_ref(),
            self.base_location.as_ref(),
            self.current_sample.as_ref(),
        )?;

        self.distance_km = state.distance_km;
        let sound = state.sound;
        if sound.is_some() {
            self.pending_sound = sound;
        }
        self.boundary = Some(state);
        sound
    }

    // ------------------------------------------------------------------
    // Sound
    // ------------------------------------------------------------------

    /// Take the outstanding sound request, if any
    pub fn take_pending_sound(&mut self) -> Option<Severity> {
        self.pending_sound.take()
    }

    /// Play the outstanding sound request through the host's player.
    ///
    /// Playback failures are logged and never affect session state. Returns the
    /// severity that was handed to the player.
    pub fn play_pending_sound(&mut self, player: &mut dyn SoundPlayer) -> Option<Severity> {
        let severity = self.pending_sound.take()?;
        sound::dispatch(player, severity);
        Some(severity)
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current_sample(&self) -> Option<&TelemetrySample> {
        self.current_sample.as_ref()
    }

    /// Classifications of the latest sample
    pub fn classifications(&self) -> Option<VitalClassifications> {
        self.current_sample
            .as_ref()
            .map(|s| HealthClassifier::classify_sample(s, &self.config.thresholds))
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Current boundary state; `None` means tracking is not active
    pub fn boundary_state(&self) -> Option<&BoundaryState> {
        self.boundary.as_ref()
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn base_location(&self) -> Option<&GeoPoint> {
        self.base_location.as_ref()
    }

    pub fn current_location(&self) -> Option<&GeoPoint> {
        self.current_location.as_ref()
    }

    pub fn location_error(&self) -> Option<&LocationError> {
        self.location_error.as_ref()
    }

    pub fn is_watch_active(&self) -> bool {
        self.watch.is_active()
    }

    /// Struggle flag of the latest sample, passed through for display
    pub fn struggle_detected(&self) -> bool {
        self.current_sample
            .as_ref()
            .map(|s| s.struggle_flag)
            .unwrap_or(false)
    }

    pub fn samples_received(&self) -> u64 {
        self.samples_received
    }
}

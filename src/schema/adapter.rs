//! Parsing of event batches

use crate::error::TrackError;
use crate::schema::event::TrackEvent;

/// Adapter for turning raw text into validated events
pub struct EventAdapter;

impl EventAdapter {
    /// Parse a JSON string containing an array of events
    pub fn parse_array(json: &str) -> Result<Vec<TrackEvent>, TrackError> {
        let events: Vec<TrackEvent> = serde_json::from_str(json)?;
        Ok(events)
    }

    /// Parse NDJSON (newline-delimited JSON) containing events
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<TrackEvent>, TrackError> {
        let mut events = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match Self::parse_line(trimmed) {
                Ok(event) => events.push(event),
                Err(e) => {
                    return Err(TrackError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(events)
    }

    /// Parse one NDJSON line
    pub fn parse_line(line: &str) -> Result<TrackEvent, TrackError> {
        Ok(serde_json::from_str(line)?)
    }

    /// Validate a batch of events, returning only the failures
    pub fn validate_events(events: &[TrackEvent]) -> Vec<ValidationResult> {
        events
            .iter()
            .enumerate()
            .filter_map(|(idx, event)| {
                event.validate().err().map(|error| ValidationResult {
                    index: idx,
                    kind: event.kind(),
                    error,
                })
            })
            .collect()
    }
}

/// A failed event validation
#[derive(Debug)]
pub struct ValidationResult {
    pub index: usize,
    pub kind: &'static str,
    pub error: TrackError,
}

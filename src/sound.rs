//! Sound dispatch
//!
//! The engine only decides *that* a sound should play and at which severity.
//! Playback belongs to the host; failures there are logged and swallowed so
//! they can never interrupt state updates.

use crate::error::TrackError;
use crate::types::Severity;
use tracing::warn;

/// Audio collaborator supplied by the host
pub trait SoundPlayer {
    fn play(&mut self, severity: Severity) -> Result<(), TrackError>;
}

/// Player that discards every request; used by headless hosts
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play(&mut self, _severity: Severity) -> Result<(), TrackError> {
        Ok(())
    }
}

/// Hand a request to the player, logging a failure instead of returning it.
///
/// Returns whether playback succeeded.
pub fn dispatch(player: &mut dyn SoundPlayer, severity: Severity) -> bool {
    match player.play(severity) {
        Ok(()) => true,
        Err(e) => {
            warn!(severity = severity.as_str(), error = %e, "alert sound failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    struct BrokenSpeaker;

    impl SoundPlayer for BrokenSpeaker {
        fn play(&mut self, _severity: Severity) -> Result<(), TrackError> {
            Err(TrackError::Sound("device busy".to_string()))
        }
    }

    #[test]
    fn test_silent_player_succeeds() {
        assert!(dispatch(&mut SilentPlayer, Severity::Critical));
    }

    #[traced_test]
    #[test]
    fn test_failure_is_logged_not_raised() {
        assert!(!dispatch(&mut BrokenSpeaker, Severity::Warning));
        assert!(logs_contain("alert sound failed"));
    }
}

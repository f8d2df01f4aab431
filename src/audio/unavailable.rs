//! Stand-in output used when no audio device could be opened

use std::time::Duration;

use super::{AudioEvent, AudioEventSender, AudioOutput};
use crate::error::AudioError;
use crate::model::MountId;

/// Fails every load with the startup error, so the engine stays paused
/// and the player is still usable for browsing and tipping
pub struct UnavailableOutput {
    events: AudioEventSender,
    error: AudioError,
}

impl UnavailableOutput {
    pub fn new(events: AudioEventSender, error: AudioError) -> Self {
        Self { events, error }
    }

    fn fail(&self, mount: MountId) {
        let _ = self.events.send(AudioEvent::Failed {
            mount,
            error: self.error.clone(),
        });
    }
}

impl AudioOutput for UnavailableOutput {
    fn load(&mut self, mount: MountId, _url: &str, _fallback_duration: f64) {
        self.fail(mount);
    }

    fn rewind(&mut self, mount: MountId) {
        self.fail(mount);
    }

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn seek(&mut self, _position: Duration) {}

    fn stop(&mut self) {}
}

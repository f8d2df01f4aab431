//! Audio module - the single audio output resource and the driver that
//! binds engine directives onto it.
//!
//! - `driver`: `AudioDriver`, applies mount/play/pause/seek directives
//! - `rodio_output`: rodio-backed output running on its own thread
//! - `unavailable`: fallback when no output device can be opened
//!
//! Events flow upward through an unbounded channel, each tagged with the
//! mount it belongs to:
//!
//! ```text
//! AppController --[AudioDirective]--> AudioDriver --> AudioOutput
//! AppController <----------[AudioEvent]------------- AudioOutput
//! ```

mod driver;
mod rodio_output;
mod unavailable;

use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::AudioError;
use crate::model::MountId;

pub use driver::AudioDriver;
pub use rodio_output::RodioOutput;
pub use unavailable::UnavailableOutput;

/// Upward notifications from the audio resource
#[derive(Clone, Debug, PartialEq)]
pub enum AudioEvent {
    DurationKnown { mount: MountId, duration: f64 },
    TimeUpdate { mount: MountId, position: f64 },
    Ended { mount: MountId },
    Failed { mount: MountId, error: AudioError },
}

impl AudioEvent {
    pub fn mount(&self) -> MountId {
        match self {
            Self::DurationKnown { mount, .. }
            | Self::TimeUpdate { mount, .. }
            | Self::Ended { mount }
            | Self::Failed { mount, .. } => *mount,
        }
    }
}

pub type AudioEventSender = mpsc::UnboundedSender<AudioEvent>;
pub type AudioEventReceiver = mpsc::UnboundedReceiver<AudioEvent>;

pub fn audio_event_channel() -> (AudioEventSender, AudioEventReceiver) {
    mpsc::unbounded_channel()
}

/// The exclusive audio output resource. At most one source is loaded at a
/// time; loading a new one replaces the old.
pub trait AudioOutput: Send {
    /// Replace the current source. The output starts paused.
    fn load(&mut self, mount: MountId, url: &str, fallback_duration: f64);

    /// Restart the current source from 0 under a new mount. Starts paused.
    fn rewind(&mut self, mount: MountId);

    fn play(&mut self);

    fn pause(&mut self);

    fn seek(&mut self, position: Duration);

    /// Silence and drop the current source
    fn stop(&mut self);
}

//! Applies engine directives onto the audio output resource

use std::time::Duration;

use super::AudioOutput;
use crate::model::{AudioDirective, Clip, MountId};

/// Owns the one audio output. The engine never talks to the output
/// directly; everything goes through here.
pub struct AudioDriver {
    output: Box<dyn AudioOutput>,
    source: Option<String>,
    mount: Option<MountId>,
    playing: bool,
}

impl AudioDriver {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self {
            output,
            source: None,
            mount: None,
            playing: false,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn mounted(&self) -> Option<MountId> {
        self.mount
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn apply(&mut self, directive: &AudioDirective) {
        match directive {
            AudioDirective::Mount {
                clip,
                mount,
                autoplay,
            } => self.mount(clip, *mount, *autoplay),
            AudioDirective::Unmount => self.unmount(),
            AudioDirective::Play => self.play(),
            AudioDirective::Pause => self.pause(),
            AudioDirective::SeekTo(seconds) => self.seek_to(*seconds),
        }
    }

    /// Bind the output to `clip`. Swapping sources stops the old one first,
    /// so two clips are never audible together.
    pub fn mount(&mut self, clip: &Clip, mount: MountId, autoplay: bool) {
        if self.source.as_deref() == Some(clip.audio_url.as_str()) {
            tracing::debug!(%mount, clip_id = %clip.id, "Same source, rewinding");
            self.output.rewind(mount);
        } else {
            if self.source.is_some() {
                self.output.stop();
            }
            tracing::debug!(%mount, clip_id = %clip.id, url = %clip.audio_url, "Mounting clip");
            self.output.load(mount, &clip.audio_url, clip.duration_seconds);
            self.source = Some(clip.audio_url.clone());
        }

        self.mount = Some(mount);
        self.playing = false;
        if autoplay {
            self.play();
        }
    }

    pub fn unmount(&mut self) {
        if self.source.take().is_some() {
            self.output.stop();
        }
        self.mount = None;
        self.playing = false;
    }

    pub fn play(&mut self) {
        if self.playing || self.mount.is_none() {
            return;
        }
        self.output.play();
        self.playing = true;
    }

    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.output.pause();
        self.playing = false;
    }

    /// Move the playhead; play/pause state is left alone
    pub fn seek_to(&mut self, seconds: f64) {
        if self.mount.is_none() {
            return;
        }
        self.output.seek(Duration::from_secs_f64(seconds.max(0.0)));
    }
}

impl Drop for AudioDriver {
    fn drop(&mut self) {
        self.output.stop();
    }
}

//! Playback engine: the single source of truth for what is playing and where.
//!
//! The engine never touches the audio resource. Every command returns a
//! [`Transition`] describing the engagement event to report (if any) and the
//! directives the audio driver must apply, in order. The controller applies
//! them while it still holds the engine, so directives from two transitions
//! never interleave.

use std::fmt;

use super::clip::{Clip, Playlist};
use super::engagement::EngagementEvent;

/// Identity of one mount of a clip into the audio resource.
/// Every upward audio event carries the mount it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId(u64);

impl MountId {
    #[cfg(test)]
    pub(crate) fn from_raw(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceReason {
    EndOfClip,
    UserSkipNext,
    UserSkipPrevious,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerStatus {
    Empty,
    Ready,
    Playing,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackState {
    /// `None` means no clip is loaded
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub current_time: f64,
    /// 0 until the resource metadata loads
    pub duration: f64,
}

/// What the audio driver has to do as a result of a transition
#[derive(Clone, Debug, PartialEq)]
pub enum AudioDirective {
    Mount {
        clip: Clip,
        mount: MountId,
        autoplay: bool,
    },
    Unmount,
    Play,
    Pause,
    SeekTo(f64),
}

/// Side effects of one engine command
#[derive(Debug, Default, PartialEq)]
pub struct Transition {
    pub engagement: Option<EngagementEvent>,
    pub audio: Vec<AudioDirective>,
}

impl Transition {
    pub fn none() -> Self {
        Self::default()
    }

    fn audio(directive: AudioDirective) -> Self {
        Self {
            engagement: None,
            audio: vec![directive],
        }
    }

    fn with_engagement(mut self, event: impl Into<Option<EngagementEvent>>) -> Self {
        self.engagement = event.into();
        self
    }

    pub fn is_noop(&self) -> bool {
        self.engagement.is_none() && self.audio.is_empty()
    }
}

/// Read-only view handed to the presentation layer
#[derive(Clone, Debug, Default)]
pub struct PlaybackSnapshot {
    pub playlist: Playlist,
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub mount: Option<MountId>,
    pub at_end: bool,
    /// The current mount could not be loaded or played
    pub failed: bool,
}

impl PlaybackSnapshot {
    pub fn current_clip(&self) -> Option<&Clip> {
        self.current_index.and_then(|i| self.playlist.get(i))
    }
}

#[derive(Debug, Default)]
pub struct PlaybackEngine {
    playlist: Playlist,
    state: PlaybackState,
    mount: Option<MountId>,
    mount_counter: u64,
    /// The current mount already took its end-of-clip transition
    settled: bool,
    /// The current mount reported a resource failure
    failed: bool,
}

impl PlaybackEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn current_mount(&self) -> Option<MountId> {
        self.mount
    }

    pub fn current_clip(&self) -> Option<&Clip> {
        self.state.current_index.and_then(|i| self.playlist.get(i))
    }

    pub fn status(&self) -> PlayerStatus {
        match (self.state.current_index, self.state.is_playing) {
            (None, _) => PlayerStatus::Empty,
            (Some(_), true) => PlayerStatus::Playing,
            (Some(_), false) => PlayerStatus::Ready,
        }
    }

    /// Paused on the last clip after it played to the end
    pub fn is_at_end(&self) -> bool {
        self.settled
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            playlist: self.playlist.clone(),
            current_index: self.state.current_index,
            is_playing: self.state.is_playing,
            current_time: self.state.current_time,
            duration: self.state.duration,
            mount: self.mount,
            at_end: self.settled,
            failed: self.failed,
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Replace the playlist and reset playback to a paused first clip
    pub fn load(&mut self, playlist: Playlist) -> Transition {
        self.playlist = playlist;
        self.state = PlaybackState::default();
        self.settled = false;
        self.failed = false;

        match self.playlist.get(0).cloned() {
            Some(clip) => {
                self.state.current_index = Some(0);
                let mount = self.next_mount();
                tracing::info!(clips = self.playlist.len(), %mount, "Playlist loaded");
                Transition::audio(AudioDirective::Mount {
                    clip,
                    mount,
                    autoplay: false,
                })
            }
            None => {
                self.mount = None;
                tracing::info!("Empty playlist loaded");
                Transition::audio(AudioDirective::Unmount)
            }
        }
    }

    pub fn toggle_play(&mut self) -> Transition {
        let Some(index) = self.state.current_index else {
            tracing::debug!("Toggle ignored, no clip loaded");
            return Transition::none();
        };

        if self.failed {
            // Drop the broken source so the retry fetches it again
            tracing::debug!(index, "Retrying clip that failed to load");
            let mut transition = self.move_to(index);
            transition.audio.insert(0, AudioDirective::Unmount);
            return transition;
        }

        if self.settled {
            // Last clip already ran out; start it over
            tracing::debug!(index, "Replaying finished clip");
            return self.move_to(index);
        }

        self.state.is_playing = !self.state.is_playing;
        tracing::debug!(index, is_playing = self.state.is_playing, "Playback toggled");
        Transition::audio(if self.state.is_playing {
            AudioDirective::Play
        } else {
            AudioDirective::Pause
        })
    }

    pub fn seek(&mut self, to_seconds: f64) -> Transition {
        if self.state.current_index.is_none() || self.settled || !to_seconds.is_finite() {
            return Transition::none();
        }

        let target = to_seconds.clamp(0.0, self.state.duration);
        self.state.current_time = target;
        tracing::debug!(requested = to_seconds, target, "Seek");
        Transition::audio(AudioDirective::SeekTo(target))
    }

    pub fn advance(&mut self, reason: AdvanceReason) -> Transition {
        match reason {
            AdvanceReason::EndOfClip => self.end_of_clip(),
            AdvanceReason::UserSkipNext => self.step_forward(),
            AdvanceReason::UserSkipPrevious => self.step_back(),
        }
    }

    /// Advance only if `mount` is still the mounted clip
    pub fn advance_from(&mut self, mount: MountId, reason: AdvanceReason) -> Transition {
        if self.mount != Some(mount) {
            tracing::debug!(%mount, current = ?self.mount, ?reason, "Dropping stale advance");
            return Transition::none();
        }
        self.advance(reason)
    }

    pub fn jump_to(&mut self, target: usize) -> Transition {
        let Some(index) = self.state.current_index else {
            return Transition::none();
        };
        if target == index || target >= self.playlist.len() {
            return Transition::none();
        }

        if target > index {
            let event = self.classify_departure(index);
            self.move_to(target).with_engagement(event)
        } else {
            self.move_to(target)
        }
    }

    /// Jump only if `mount` is still the mounted clip
    pub fn jump_from(&mut self, mount: MountId, target: usize) -> Transition {
        if self.mount != Some(mount) {
            tracing::debug!(%mount, current = ?self.mount, target, "Dropping stale jump");
            return Transition::none();
        }
        self.jump_to(target)
    }

    // ========================================================================
    // Upward events from the audio driver
    // ========================================================================

    pub fn on_ended(&mut self, mount: MountId) -> Transition {
        self.advance_from(mount, AdvanceReason::EndOfClip)
    }

    /// Time/duration tick for a mount. Never triggers a transition.
    pub fn report_progress(&mut self, mount: MountId, current_time: f64, duration: f64) {
        if self.mount != Some(mount) || self.settled {
            return;
        }
        if duration.is_finite() && duration >= 0.0 {
            self.state.duration = duration;
        }
        if current_time.is_finite() {
            self.state.current_time = current_time.clamp(0.0, self.state.duration);
        }
    }

    pub fn on_time_update(&mut self, mount: MountId, current_time: f64) {
        let duration = self.state.duration;
        self.report_progress(mount, current_time, duration);
    }

    pub fn on_duration_known(&mut self, mount: MountId, duration: f64) {
        let current_time = self.state.current_time;
        self.report_progress(mount, current_time, duration);
    }

    /// The resource could not load or play; fall back to paused.
    /// The next toggle re-mounts the clip instead of resuming it.
    pub fn on_resource_failed(&mut self, mount: MountId) -> Transition {
        if self.mount != Some(mount) {
            return Transition::none();
        }
        self.failed = true;
        if !self.state.is_playing {
            tracing::warn!(%mount, "Audio resource failed while paused");
            return Transition::none();
        }
        self.state.is_playing = false;
        tracing::warn!(%mount, "Audio resource failed, pausing");
        Transition::audio(AudioDirective::Pause)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    fn end_of_clip(&mut self) -> Transition {
        let Some(index) = self.state.current_index else {
            return Transition::none();
        };
        if self.settled {
            return Transition::none();
        }
        let Some(clip) = self.playlist.get(index) else {
            return Transition::none();
        };

        let event = EngagementEvent::played(clip.id.clone());
        tracing::info!(clip_id = %clip.id, index, "Clip played to the end");

        if Some(index) == self.playlist.last_index() {
            self.state.is_playing = false;
            self.state.current_time = self.state.duration;
            self.settled = true;
            Transition::audio(AudioDirective::Pause).with_engagement(event)
        } else {
            self.move_to(index + 1).with_engagement(event)
        }
    }

    fn step_forward(&mut self) -> Transition {
        let Some(index) = self.state.current_index else {
            return Transition::none();
        };
        if Some(index) == self.playlist.last_index() {
            tracing::debug!(index, "Already at the last clip");
            return Transition::none();
        }

        let event = self.classify_departure(index);
        self.move_to(index + 1).with_engagement(event)
    }

    fn step_back(&mut self) -> Transition {
        match self.state.current_index {
            Some(index) if index > 0 => self.move_to(index - 1),
            _ => Transition::none(),
        }
    }

    fn classify_departure(&self, index: usize) -> Option<EngagementEvent> {
        let clip = self.playlist.get(index)?;
        let event = EngagementEvent::classify_departure(
            clip.id.clone(),
            self.state.current_time,
            self.state.duration,
        );
        tracing::info!(
            clip_id = %event.clip_id(),
            kind = event.kind(),
            at_seconds = self.state.current_time,
            duration = self.state.duration,
            "Leaving clip"
        );
        Some(event)
    }

    /// Mount `target` under a fresh mount id and start playing it
    fn move_to(&mut self, target: usize) -> Transition {
        let Some(clip) = self.playlist.get(target).cloned() else {
            return Transition::none();
        };

        self.state.current_index = Some(target);
        self.state.is_playing = true;
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
        self.settled = false;
        self.failed = false;
        let mount = self.next_mount();

        tracing::debug!(index = target, clip_id = %clip.id, %mount, "Moved to clip");
        Transition::audio(AudioDirective::Mount {
            clip,
            mount,
            autoplay: true,
        })
    }

    fn next_mount(&mut self) -> MountId {
        self.mount_counter += 1;
        let mount = MountId(self.mount_counter);
        self.mount = Some(mount);
        mount
    }
}

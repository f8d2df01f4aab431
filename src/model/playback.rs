//! Playback info handed to the view, with a smoothed progress clock

use std::time::Instant;

use super::engine::PlaybackSnapshot;

/// Interpolates the playhead between the output's time-update ticks so the
/// progress bar moves smoothly
#[derive(Clone, Debug)]
pub struct ProgressClock {
    pub position: f64,
    pub last_update: Instant,
    pub is_playing: bool,
}

impl Default for ProgressClock {
    fn default() -> Self {
        Self {
            position: 0.0,
            last_update: Instant::now(),
            is_playing: false,
        }
    }
}

impl ProgressClock {
    pub fn current_position(&self, duration: f64) -> f64 {
        let position = if self.is_playing {
            self.position + self.last_update.elapsed().as_secs_f64()
        } else {
            self.position
        };
        position.clamp(0.0, duration.max(0.0))
    }

    /// Accept a fresh position unless it would make the bar jitter backwards
    pub fn sync(&mut self, position: f64, duration: f64, is_playing: bool) {
        let diff = position - self.current_position(duration);

        let state_changed = self.is_playing != is_playing;
        let significant_jump = diff.abs() > 2.0;
        let acceptable_sync = diff >= -0.1;

        if state_changed || significant_jump || !self.is_playing || acceptable_sync {
            self.position = position;
            self.last_update = Instant::now();
        }
        self.is_playing = is_playing;
    }

    /// Hard reset after a clip change or seek
    pub fn reset(&mut self, position: f64, is_playing: bool) {
        self.position = position;
        self.last_update = Instant::now();
        self.is_playing = is_playing;
    }
}

/// Complete playback information for rendering the UI
#[derive(Clone, Debug, Default)]
pub struct PlaybackInfo {
    pub snapshot: PlaybackSnapshot,
    pub display_time: f64,
}

impl PlaybackInfo {
    pub fn progress_ratio(&self) -> f64 {
        if self.snapshot.duration > 0.0 {
            (self.display_time / self.snapshot.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_clock_does_not_move() {
        let mut clock = ProgressClock::default();
        clock.reset(12.0, false);
        assert_eq!(clock.current_position(100.0), 12.0);
    }

    #[test]
    fn small_backward_correction_is_ignored_while_playing() {
        let mut clock = ProgressClock::default();
        clock.reset(10.0, true);
        clock.sync(9.5, 100.0, true);
        assert!(clock.current_position(100.0) >= 10.0);
    }

    #[test]
    fn large_jump_is_accepted() {
        let mut clock = ProgressClock::default();
        clock.reset(10.0, true);
        clock.sync(50.0, 100.0, true);
        assert!(clock.current_position(100.0) >= 50.0);
    }

    #[test]
    fn position_never_exceeds_duration() {
        let mut clock = ProgressClock::default();
        clock.reset(150.0, false);
        assert_eq!(clock.current_position(120.0), 120.0);
        assert_eq!(clock.current_position(0.0), 0.0);
    }
}

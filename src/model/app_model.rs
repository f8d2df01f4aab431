//! Main application model with state management

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, MutexGuard};

use super::engine::{PlaybackEngine, PlaybackState};
use super::playback::{PlaybackInfo, ProgressClock};
use super::types::{LoadState, TipNotice, TipStatus, UiState};

const ERROR_TIMEOUT: Duration = Duration::from_secs(5);
const TIP_NOTICE_TIMEOUT: Duration = Duration::from_secs(3);

/// Main application model containing all state
pub struct AppModel {
    engine: Arc<Mutex<PlaybackEngine>>,
    progress_clock: Arc<Mutex<ProgressClock>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            engine: Arc::new(Mutex::new(PlaybackEngine::new())),
            progress_clock: Arc::new(Mutex::new(ProgressClock::default())),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Lock the engine. Callers that mutate it must apply the resulting
    /// audio directives before releasing the guard.
    pub async fn engine(&self) -> MutexGuard<'_, PlaybackEngine> {
        self.engine.lock().await
    }

    /// Snap the progress clock to the engine after a transition
    pub async fn reset_progress(&self, state: &PlaybackState) {
        let mut clock = self.progress_clock.lock().await;
        clock.reset(state.current_time, state.is_playing);
    }

    /// Feed a time update into the progress clock
    pub async fn sync_progress(&self, state: &PlaybackState) {
        let mut clock = self.progress_clock.lock().await;
        clock.sync(state.current_time, state.duration, state.is_playing);
    }

    pub async fn get_playback_info(&self) -> PlaybackInfo {
        let snapshot = self.engine.lock().await.snapshot();
        let clock = self.progress_clock.lock().await;
        let display_time = if snapshot.at_end {
            snapshot.duration
        } else {
            clock.current_position(snapshot.duration)
        };

        PlaybackInfo {
            snapshot,
            display_time,
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    // ========================================================================
    // Session
    // ========================================================================

    pub async fn set_load_state(&self, load_state: LoadState) {
        self.ui_state.lock().await.load_state = load_state;
    }

    pub async fn load_state(&self) -> LoadState {
        self.ui_state.lock().await.load_state
    }

    /// Mark a fetch as started. Returns false if one is already running.
    pub async fn begin_loading(&self) -> bool {
        let mut ui_state = self.ui_state.lock().await;
        if ui_state.load_state == LoadState::Loading {
            return false;
        }
        ui_state.load_state = LoadState::Loading;
        true
    }

    pub async fn set_user_email(&self, email: Option<String>) {
        self.ui_state.lock().await.user_email = email;
    }

    // ========================================================================
    // Overlays
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    /// Drop the error overlay and the tip notice once they have been up
    /// long enough
    pub async fn auto_clear_old_notices(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed() > ERROR_TIMEOUT {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
        let tip_expired = state
            .tip
            .as_ref()
            .is_some_and(|tip| tip.status != TipStatus::Sending && tip.timestamp.elapsed() > TIP_NOTICE_TIMEOUT);
        if tip_expired {
            state.tip = None;
        }
    }

    pub async fn set_tip_status(&self, status: TipStatus, clip_title: String, amount: f64) {
        self.ui_state.lock().await.tip = Some(TipNotice {
            status,
            clip_title,
            amount,
            timestamp: Instant::now(),
        });
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    pub async fn set_swipe_offset(&self, rows: i32) {
        self.ui_state.lock().await.swipe_offset = rows;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }
}

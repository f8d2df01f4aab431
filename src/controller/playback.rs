//! Session loading and playback commands

use crate::model::{AdvanceReason, EngagementEvent, LoadState, MountId, Playlist, TipStatus};

use super::AppController;

impl AppController {
    /// Fetch a playlist for a new session (or a refresh) and load it.
    /// A failed fetch leaves an empty playlist behind.
    pub async fn load_session(&self) {
        self.model.set_load_state(LoadState::Loading).await;
        let budget = self.settings.session_budget_seconds;
        tracing::info!(budget_seconds = budget, "Fetching playlist");

        let clips = match self.source.fetch_playlist(budget).await {
            Ok(clips) => {
                tracing::info!(clips = clips.len(), "Playlist fetched");
                self.model.set_load_state(LoadState::Loaded).await;
                clips
            }
            Err(e) => {
                tracing::error!(error = %e, "Playlist fetch failed");
                self.model.set_load_state(LoadState::Failed).await;
                self.model.set_error(Self::format_error(&e.into())).await;
                Vec::new()
            }
        };

        let mut engine = self.model.engine().await;
        let transition = engine.load(Playlist::from(clips));
        if engine.playlist().is_empty() {
            tracing::warn!("Session has no clips");
        }
        self.apply_transition(&engine, transition).await;
    }

    pub async fn toggle_playback(&self) {
        let mut engine = self.model.engine().await;
        let replay = engine.is_at_end();
        let transition = engine.toggle_play();
        tracing::info!(status = ?engine.status(), replay, "Playback toggled");
        self.apply_transition(&engine, transition).await;
    }

    /// Seek relative to the current position
    pub async fn seek_by(&self, delta_seconds: f64) {
        let mut engine = self.model.engine().await;
        let target = engine.state().current_time + delta_seconds;
        let transition = engine.seek(target);
        self.apply_transition(&engine, transition).await;
    }

    /// Skip forward or back, as long as `mount` is still the one playing
    pub async fn skip_from(&self, mount: MountId, reason: AdvanceReason) {
        let mut engine = self.model.engine().await;
        let transition = engine.advance_from(mount, reason);
        if transition.is_noop() {
            tracing::debug!(%mount, ?reason, "Skip had no effect");
        }
        self.apply_transition(&engine, transition).await;
    }

    /// Tip the clip on screen. The notice overlay tracks the outcome; a
    /// failed tip never blocks playback.
    pub async fn tip_current_clip(&self) {
        let Some(clip) = self.model.engine().await.current_clip().cloned() else {
            return;
        };
        let amount = self.settings.tip_amount;
        let event = EngagementEvent::tipped(clip.id.clone(), amount);
        self.model
            .set_tip_status(TipStatus::Sending, clip.title.clone(), amount)
            .await;
        tracing::info!(clip_id = %clip.id, amount, "Sending tip");

        let reporter = self.reporter.clone();
        let model = self.model.clone();
        tokio::spawn(async move {
            let status = match reporter.report(&event).await {
                Ok(()) => TipStatus::Sent,
                Err(e) => {
                    tracing::warn!(clip_id = %event.clip_id(), error = %e, "Tip failed");
                    TipStatus::Failed
                }
            };
            model.set_tip_status(status, clip.title, amount).await;
        });
    }

    /// Silence the output before the process exits
    pub async fn shutdown(&self) {
        self.driver.lock().await.unmount();
        tracing::debug!("Audio unmounted for shutdown");
    }
}

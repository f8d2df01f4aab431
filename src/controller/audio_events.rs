//! Listener for events coming up from the audio output

use tokio::task::JoinHandle;

use crate::audio::{AudioEvent, AudioEventReceiver};
use super::AppController;

impl AppController {
    pub fn start_audio_event_listener(&self, mut events: AudioEventReceiver) -> JoinHandle<()> {
        let controller = self.clone();
        tracing::info!("Starting audio event listener");

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if controller.model.should_quit().await {
                    break;
                }
                controller.handle_audio_event(event).await;
            }
            tracing::debug!("Audio event listener shutting down");
        })
    }

    pub(crate) async fn handle_audio_event(&self, event: AudioEvent) {
        let mut engine = self.model.engine().await;
        let is_current = engine.current_mount() == Some(event.mount());

        match event {
            AudioEvent::DurationKnown { mount, duration } => {
                tracing::debug!(%mount, duration, "AudioEvent::DurationKnown");
                engine.on_duration_known(mount, duration);
                self.model.sync_progress(engine.state()).await;
            }
            AudioEvent::TimeUpdate { mount, position } => {
                tracing::trace!(%mount, position, "AudioEvent::TimeUpdate");
                engine.on_time_update(mount, position);
                self.model.sync_progress(engine.state()).await;
            }
            AudioEvent::Ended { mount } => {
                tracing::debug!(%mount, "AudioEvent::Ended");
                let transition = engine.on_ended(mount);
                self.apply_transition(&engine, transition).await;
            }
            AudioEvent::Failed { mount, error } => {
                tracing::warn!(%mount, %error, "AudioEvent::Failed");
                let transition = engine.on_resource_failed(mount);
                self.apply_transition(&engine, transition).await;
                drop(engine);

                if is_current {
                    self.model.set_error(Self::format_error(&error.into())).await;
                }
            }
        }
    }
}

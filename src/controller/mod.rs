//! Controller module - Application logic and event handling
//!
//! The controller is the only place that mutates the playback engine. It
//! owns the audio driver, the clip source and the engagement reporter, and
//! turns engine transitions into driver calls and background reports.
//!
//! - `input`: key event handling
//! - `gesture`: vertical mouse drag recognised as a swipe
//! - `playback`: session loading and playback commands
//! - `audio_events`: listener for upward audio output events

mod input;
mod gesture;
mod playback;
mod audio_events;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::audio::AudioDriver;
use crate::config::Config;
use crate::model::{AppModel, ClipSource, EngagementEvent, EngagementReporter, MountId, PlaybackEngine, Transition};

use gesture::SwipeTracker;

/// Seek step for the `[` / `]` keys
pub const SEEK_STEP_SECONDS: f64 = 10.0;

/// Tunables the controller reads from the configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSettings {
    pub session_budget_seconds: u32,
    pub tip_amount: f64,
    pub swipe_threshold: u16,
}

impl From<&Config> for PlayerSettings {
    fn from(config: &Config) -> Self {
        Self {
            session_budget_seconds: config.session_budget_seconds(),
            tip_amount: config.tip_amount,
            swipe_threshold: config.swipe_threshold,
        }
    }
}

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<AppModel>,
    driver: Arc<Mutex<AudioDriver>>,
    source: Arc<dyn ClipSource>,
    reporter: Arc<dyn EngagementReporter>,
    swipe: Arc<Mutex<SwipeTracker>>,
    /// Mount showing when the current drag started
    swipe_origin: Arc<Mutex<Option<MountId>>>,
    settings: PlayerSettings,
}

impl AppController {
    pub fn new(
        model: Arc<AppModel>,
        driver: AudioDriver,
        source: Arc<dyn ClipSource>,
        reporter: Arc<dyn EngagementReporter>,
        settings: PlayerSettings,
    ) -> Self {
        Self {
            model,
            driver: Arc::new(Mutex::new(driver)),
            source,
            reporter,
            swipe: Arc::new(Mutex::new(SwipeTracker::new(settings.swipe_threshold))),
            swipe_origin: Arc::new(Mutex::new(None)),
            settings,
        }
    }

    /// Carry out the side effects of one engine transition.
    ///
    /// Takes the engine by reference so the caller still holds its lock:
    /// directives from two transitions never interleave on the driver.
    pub(crate) async fn apply_transition(&self, engine: &PlaybackEngine, transition: Transition) {
        if transition.is_noop() {
            return;
        }

        if !transition.audio.is_empty() {
            let mut driver = self.driver.lock().await;
            for directive in &transition.audio {
                driver.apply(directive);
            }
            tracing::trace!(
                mount = ?driver.mounted(),
                source = ?driver.source(),
                playing = driver.is_playing(),
                "Audio driver updated"
            );
        }
        self.model.reset_progress(engine.state()).await;

        if let Some(event) = transition.engagement {
            self.spawn_report(event);
        }
    }

    /// Send an engagement event in the background. Failures are logged and
    /// dropped; the engine never waits on the network.
    pub(crate) fn spawn_report(&self, event: EngagementEvent) {
        let reporter = self.reporter.clone();
        tokio::spawn(async move {
            tracing::debug!(kind = event.kind(), clip_id = %event.clip_id(), "Reporting engagement");
            if let Err(e) = reporter.report(&event).await {
                tracing::warn!(
                    kind = event.kind(),
                    clip_id = %event.clip_id(),
                    at_seconds = ?event.skipped_at(),
                    error = %e,
                    "Engagement report failed"
                );
            }
        });
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        crate::error::user_message(error)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;
    use std::time::Duration;

    use futures::future::BoxFuture;
    use tokio::sync::mpsc;

    use super::{AppController, PlayerSettings};
    use crate::audio::testing::RecordingOutput;
    use crate::audio::{AudioDriver, AudioOutput};
    use crate::error::ClientError;
    use crate::model::{AppModel, Clip, ClipId, ClipSource, EngagementEvent, EngagementReporter};

    /// Source that hands out the same clips every time, or fails
    pub struct CannedSource {
        clips: Option<Vec<Clip>>,
    }

    impl CannedSource {
        pub fn with(clips: Vec<Clip>) -> Self {
            Self { clips: Some(clips) }
        }

        pub fn failing() -> Self {
            Self { clips: None }
        }
    }

    impl ClipSource for CannedSource {
        fn fetch_playlist(&self, _session_budget_seconds: u32) -> BoxFuture<'_, Result<Vec<Clip>, ClientError>> {
            let result = self.clips.clone().ok_or(ClientError::Status {
                status: 503,
                url: "http://octopod.test/api/content/playlist".to_string(),
            });
            Box::pin(async move { result })
        }
    }

    /// Reporter that forwards every event it is asked to send
    pub struct ChannelReporter {
        events: mpsc::UnboundedSender<EngagementEvent>,
        fail: bool,
    }

    impl ChannelReporter {
        fn forward(&self, event: EngagementEvent) -> BoxFuture<'static, Result<(), ClientError>> {
            let _ = self.events.send(event);
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    Err(ClientError::Status {
                        status: 500,
                        url: "http://octopod.test/api/content/podclip".to_string(),
                    })
                } else {
                    Ok(())
                }
            })
        }
    }

    impl EngagementReporter for ChannelReporter {
        fn report_played<'a>(&'a self, clip_id: &'a ClipId) -> BoxFuture<'a, Result<(), ClientError>> {
            self.forward(EngagementEvent::played(clip_id.clone()))
        }

        fn report_skipped<'a>(
            &'a self,
            clip_id: &'a ClipId,
            at_seconds: f64,
        ) -> BoxFuture<'a, Result<(), ClientError>> {
            self.forward(EngagementEvent::skipped(clip_id.clone(), at_seconds))
        }

        fn report_tip<'a>(&'a self, clip_id: &'a ClipId, amount: f64) -> BoxFuture<'a, Result<(), ClientError>> {
            self.forward(EngagementEvent::tipped(clip_id.clone(), amount))
        }
    }

    /// Controller over an arbitrary output, plus the reports it sends
    pub fn controller_with_output(
        source: CannedSource,
        output: Box<dyn AudioOutput>,
        fail_reports: bool,
    ) -> (AppController, mpsc::UnboundedReceiver<EngagementEvent>) {
        let (tx, reports) = mpsc::unbounded_channel();
        let controller = AppController::new(
            Arc::new(AppModel::new()),
            AudioDriver::new(output),
            Arc::new(source),
            Arc::new(ChannelReporter {
                events: tx,
                fail: fail_reports,
            }),
            PlayerSettings {
                session_budget_seconds: 1800,
                tip_amount: 100.0,
                swipe_threshold: 3,
            },
        );
        (controller, reports)
    }

    pub struct Harness {
        pub controller: AppController,
        pub output: RecordingOutput,
        pub reports: mpsc::UnboundedReceiver<EngagementEvent>,
    }

    impl Harness {
        pub fn new(source: CannedSource) -> Self {
            Self::build(source, false)
        }

        pub fn with_failing_reporter(source: CannedSource) -> Self {
            Self::build(source, true)
        }

        fn build(source: CannedSource, fail_reports: bool) -> Self {
            let output = RecordingOutput::default();
            let (controller, reports) = controller_with_output(source, Box::new(output.clone()), fail_reports);
            Self {
                controller,
                output,
                reports,
            }
        }

        /// Wait for the next background report
        pub async fn next_report(&mut self) -> EngagementEvent {
            tokio::time::timeout(Duration::from_secs(1), self.reports.recv())
                .await
                .expect("report within a second")
                .expect("reporter alive")
        }

        /// Give spawned report tasks a chance to run, then drain them
        pub async fn drain_reports(&mut self) -> Vec<EngagementEvent> {
            tokio::task::yield_now().await;
            tokio::time::sleep(Duration::from_millis(20)).await;
            let mut events = Vec::new();
            while let Ok(event) = self.reports.try_recv() {
                events.push(event);
            }
            events
        }
    }
}

//! rodio-backed audio output.
//!
//! The output stream lives on a dedicated `audio-output` thread that owns at
//! most one sink. Clip bytes are downloaded on the tokio runtime and handed
//! to the thread tagged with a load id; anything that is not for the latest
//! load is dropped.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tokio::runtime::Handle;

use super::{AudioEvent, AudioEventSender, AudioOutput};
use crate::error::AudioError;
use crate::model::MountId;

const TICK: Duration = Duration::from_millis(250);

enum Command {
    /// A new source was requested; drop the current one
    Begin { mount: MountId, load: u64 },
    Loaded { load: u64, bytes: Arc<[u8]>, fallback_duration: f64 },
    LoadFailed { load: u64, error: AudioError },
    Rewind { mount: MountId },
    Play,
    Pause,
    Seek(Duration),
    Stop,
    Shutdown,
}

pub struct RodioOutput {
    commands: Sender<Command>,
    http: reqwest::Client,
    runtime: Handle,
    next_load: u64,
    download: Option<tokio::task::JoinHandle<()>>,
    thread: Option<JoinHandle<()>>,
}

impl RodioOutput {
    /// Open the default output device on a new thread.
    /// Must be called from within the tokio runtime.
    pub fn spawn(http: reqwest::Client, events: AudioEventSender) -> Result<Self, AudioError> {
        let (command_tx, command_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), AudioError>>(1);

        let thread = thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || {
                let mut stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(AudioError::Device(e.to_string())));
                        return;
                    }
                };
                // rodio prints to stderr on drop otherwise, which garbles the TUI
                stream.log_on_drop(false);
                let _ = ready_tx.send(Ok(()));
                OutputThread::new(stream, events).run(command_rx);
            })
            .map_err(|e| AudioError::Device(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(AudioError::Device("audio thread exited during startup".to_string())),
        }

        tracing::info!("Audio output ready");
        Ok(Self {
            commands: command_tx,
            http,
            runtime: Handle::current(),
            next_load: 0,
            download: None,
            thread: Some(thread),
        })
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::error!("Audio output thread is gone");
        }
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, mount: MountId, url: &str, fallback_duration: f64) {
        self.next_load += 1;
        let load = self.next_load;
        self.send(Command::Begin { mount, load });

        if let Some(previous) = self.download.take() {
            previous.abort();
        }

        let http = self.http.clone();
        let commands = self.commands.clone();
        let url = url.to_string();
        self.download = Some(self.runtime.spawn(async move {
            let started = Instant::now();
            let command = match fetch(&http, &url).await {
                Ok(bytes) => {
                    tracing::debug!(
                        load,
                        bytes = bytes.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Clip downloaded"
                    );
                    Command::Loaded { load, bytes, fallback_duration }
                }
                Err(error) => {
                    tracing::warn!(load, %url, %error, "Clip download failed");
                    Command::LoadFailed { load, error }
                }
            };
            let _ = commands.send(command);
        }));
    }

    fn rewind(&mut self, mount: MountId) {
        self.send(Command::Rewind { mount });
    }

    fn play(&mut self) {
        self.send(Command::Play);
    }

    fn pause(&mut self) {
        self.send(Command::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.send(Command::Seek(position));
    }

    fn stop(&mut self) {
        if let Some(download) = self.download.take() {
            download.abort();
        }
        self.send(Command::Stop);
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        if let Some(download) = self.download.take() {
            download.abort();
        }
        let _ = self.commands.send(Command::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        tracing::debug!("Audio output shut down");
    }
}

async fn fetch(http: &reqwest::Client, url: &str) -> Result<Arc<[u8]>, AudioError> {
    let response = http
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AudioError::Fetch(e.to_string()))?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AudioError::Fetch(e.to_string()))?;
    Ok(Arc::from(bytes.as_ref()))
}

struct LoadedClip {
    sink: Sink,
    bytes: Arc<[u8]>,
    duration: f64,
    ended: bool,
}

struct OutputThread {
    stream: OutputStream,
    events: AudioEventSender,
    mount: Option<MountId>,
    load: Option<u64>,
    clip: Option<LoadedClip>,
    want_playing: bool,
    pending_seek: Option<Duration>,
    /// Why the latest load produced no clip
    load_error: Option<AudioError>,
}

impl OutputThread {
    fn new(stream: OutputStream, events: AudioEventSender) -> Self {
        Self {
            stream,
            events,
            mount: None,
            load: None,
            clip: None,
            want_playing: false,
            pending_seek: None,
            load_error: None,
        }
    }

    fn run(mut self, commands: Receiver<Command>) {
        let mut last_tick = Instant::now();
        loop {
            match commands.recv_timeout(TICK) {
                Ok(Command::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Ok(command) => self.handle(command),
                Err(RecvTimeoutError::Timeout) => {}
            }
            if last_tick.elapsed() >= TICK {
                last_tick = Instant::now();
                self.tick();
            }
        }
        self.drop_clip();
        tracing::debug!("Audio output thread exiting");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Begin { mount, load } => {
                self.drop_clip();
                self.mount = Some(mount);
                self.load = Some(load);
                self.want_playing = false;
                self.pending_seek = None;
                self.load_error = None;
            }
            Command::Loaded { load, bytes, fallback_duration } => {
                if self.load != Some(load) {
                    tracing::debug!(load, current = ?self.load, "Discarding stale clip bytes");
                    return;
                }
                self.install(bytes, fallback_duration);
            }
            Command::LoadFailed { load, error } => {
                if self.load == Some(load) {
                    self.want_playing = false;
                    self.load_error = Some(error.clone());
                    self.emit_failure(error);
                }
            }
            Command::Rewind { mount } => {
                self.mount = Some(mount);
                self.want_playing = false;
                self.pending_seek = None;
                // Still downloading: the bytes will install under the new mount
                if let Some(clip) = self.clip.take() {
                    clip.sink.stop();
                    self.install(clip.bytes, clip.duration);
                } else {
                    self.refail();
                }
            }
            Command::Play => {
                if let Some(clip) = &self.clip {
                    self.want_playing = true;
                    clip.sink.play();
                } else if self.load_error.is_some() {
                    self.refail();
                } else {
                    self.want_playing = true;
                }
            }
            Command::Pause => {
                self.want_playing = false;
                if let Some(clip) = &self.clip {
                    clip.sink.pause();
                }
            }
            Command::Seek(position) => match &self.clip {
                Some(clip) if !clip.ended => {
                    if let Err(e) = clip.sink.try_seek(position) {
                        tracing::warn!(error = %e, "Seek failed");
                    }
                    self.emit_position();
                }
                Some(_) => {}
                None => self.pending_seek = Some(position),
            },
            Command::Stop => {
                self.drop_clip();
                self.mount = None;
                self.load = None;
                self.want_playing = false;
                self.pending_seek = None;
                self.load_error = None;
            }
            Command::Shutdown => {}
        }
    }

    /// Decode `bytes` into a fresh sink for the current mount
    fn install(&mut self, bytes: Arc<[u8]>, fallback_duration: f64) {
        let source = match Decoder::new(Cursor::new(bytes.clone())) {
            Ok(source) => source,
            Err(e) => {
                let error = AudioError::Decode(e.to_string());
                self.want_playing = false;
                self.load_error = Some(error.clone());
                self.emit_failure(error);
                return;
            }
        };
        let duration = source
            .total_duration()
            .map(|d| d.as_secs_f64())
            .unwrap_or(fallback_duration);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        sink.append(source);
        if let Some(position) = self.pending_seek.take() {
            if let Err(e) = sink.try_seek(position) {
                tracing::warn!(error = %e, "Deferred seek failed");
            }
        }
        if self.want_playing {
            sink.play();
        }

        self.clip = Some(LoadedClip {
            sink,
            bytes,
            duration,
            ended: false,
        });
        if let Some(mount) = self.mount {
            tracing::debug!(%mount, duration, "Clip ready");
            self.emit(AudioEvent::DurationKnown { mount, duration });
        }
    }

    fn tick(&mut self) {
        let Some(mount) = self.mount else { return };
        let Some(clip) = self.clip.as_mut() else { return };
        if clip.ended {
            return;
        }
        if clip.sink.empty() {
            clip.ended = true;
            tracing::debug!(%mount, "Clip ended");
            self.emit(AudioEvent::Ended { mount });
        } else if !clip.sink.is_paused() {
            self.emit_position();
        }
    }

    fn emit_position(&self) {
        if let (Some(mount), Some(clip)) = (self.mount, &self.clip) {
            let position = clip.sink.get_pos().as_secs_f64();
            self.emit(AudioEvent::TimeUpdate { mount, position });
        }
    }

    /// Report the latest load failure again for the current mount
    fn refail(&mut self) {
        if let Some(error) = self.load_error.clone() {
            self.want_playing = false;
            self.emit_failure(error);
        }
    }

    fn emit_failure(&self, error: AudioError) {
        if let Some(mount) = self.mount {
            tracing::warn!(%mount, %error, "Clip failed to load");
            self.emit(AudioEvent::Failed { mount, error });
        }
    }

    fn emit(&self, event: AudioEvent) {
        // Receiver gone means the player is shutting down
        let _ = self.events.send(event);
    }

    fn drop_clip(&mut self) {
        if let Some(clip) = self.clip.take() {
            clip.sink.stop();
        }
    }
}

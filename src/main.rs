mod audio;
mod auth;
mod config;
mod controller;
mod error;
mod logging;
mod model;
mod terminal;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};

use audio::{audio_event_channel, AudioDriver, AudioOutput, RodioOutput, UnavailableOutput};
use config::Config;
use controller::{AppController, PlayerSettings};
use model::{AppModel, OctopodClient};
use terminal::TerminalGuard;
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let _log_guard = match logging::init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!(api_url = %config.api_url, "=== Octopod Player Starting ===");

    let token = auth::resolve_token(config.token.as_deref())?;
    let client = Arc::new(OctopodClient::new(config.api_url.clone(), token));
    let model = Arc::new(AppModel::new());

    // Show who is signed in; a failure here only costs the header line
    let profile_client = client.clone();
    let profile_model = model.clone();
    tokio::spawn(async move {
        match profile_client.profile().await {
            Ok(profile) => {
                tracing::info!(user_id = %profile.id, "Signed in");
                profile_model.set_user_email(Some(profile.email)).await;
            }
            Err(e) => tracing::warn!(error = %e, "Could not fetch user profile"),
        }
    });

    let (events_tx, events_rx) = audio_event_channel();
    let output: Box<dyn AudioOutput> = match RodioOutput::spawn(client.http(), events_tx.clone()) {
        Ok(output) => Box::new(output),
        Err(e) => {
            tracing::error!(error = %e, "Audio output unavailable");
            model.set_error(e.to_string()).await;
            Box::new(UnavailableOutput::new(events_tx.clone(), e))
        }
    };
    drop(events_tx);

    let controller = AppController::new(
        model.clone(),
        AudioDriver::new(output),
        client.clone(),
        client,
        PlayerSettings::from(&config),
    );
    let listener = controller.start_audio_event_listener(events_rx);

    let mut terminal = TerminalGuard::acquire()?;

    let session_controller = controller.clone();
    tokio::spawn(async move {
        session_controller.load_session().await;
    });

    let res = run_app(&mut terminal, model, controller.clone()).await;
    drop(terminal);

    controller.shutdown().await;
    listener.abort();

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Octopod Player shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut TerminalGuard,
    model: Arc<AppModel>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        // Error overlay clears after 5 s, tip notice after 3 s
        model.auto_clear_old_notices().await;

        let playback = model.get_playback_info().await;
        let ui_state = model.get_ui_state().await;
        let should_quit = model.should_quit().await;

        terminal.draw(|f| {
            AppView::render(f, &playback, &ui_state);
        })?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => controller.handle_key_event(key).await,
                Event::Mouse(mouse) => controller.handle_mouse_event(mouse).await,
                _ => {}
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}

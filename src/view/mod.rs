//! View module - UI rendering
//!
//! - `utils`: shared formatting helpers
//! - `layout`: header bar
//! - `feed`: clip cards (previous, current, next) and empty states
//! - `progress`: progress bar
//! - `overlays`: error notification, tip notice, help popup

mod utils;
mod layout;
mod feed;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{PlaybackInfo, UiState};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, playback: &PlaybackInfo, ui_state: &UiState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Feed
                Constraint::Length(3), // Progress bar
            ])
            .split(frame.area());

        layout::render_header(frame, chunks[0], playback, ui_state);
        feed::render_feed(frame, chunks[1], playback, ui_state);
        progress::render_progress_bar(frame, chunks[2], playback);

        if let Some(tip) = &ui_state.tip {
            overlays::render_tip_notice(frame, tip);
        }

        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::model::clip::test_playlist;
    use crate::model::{LoadState, PlaybackEngine};

    fn draw(playback: &PlaybackInfo, ui_state: &UiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("test terminal");
        terminal
            .draw(|frame| AppView::render(frame, playback, ui_state))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn loading_state_is_shown_before_the_playlist_arrives() {
        let screen = draw(&PlaybackInfo::default(), &UiState::default());
        assert!(screen.contains(feed::LOADING_TEXT));
    }

    #[test]
    fn empty_playlist_shows_empty_state() {
        let ui_state = UiState {
            load_state: LoadState::Loaded,
            ..UiState::default()
        };
        let screen = draw(&PlaybackInfo::default(), &ui_state);
        assert!(screen.contains(feed::EMPTY_TEXT));
    }

    #[test]
    fn current_clip_and_position_are_rendered() {
        let mut engine = PlaybackEngine::new();
        let _ = engine.load(test_playlist(3));
        let playback = PlaybackInfo {
            snapshot: engine.snapshot(),
            display_time: 0.0,
        };
        let ui_state = UiState {
            load_state: LoadState::Loaded,
            ..UiState::default()
        };

        let screen = draw(&playback, &ui_state);
        let first = engine.current_clip().expect("first clip");
        assert!(screen.contains(&first.title));
        assert!(screen.contains("1/3"));
    }

    #[test]
    fn failed_clip_offers_a_retry() {
        let mut engine = PlaybackEngine::new();
        let _ = engine.load(test_playlist(2));
        let mount = engine.current_mount().expect("mounted");
        let _ = engine.on_resource_failed(mount);
        let playback = PlaybackInfo {
            snapshot: engine.snapshot(),
            display_time: 0.0,
        };
        let ui_state = UiState {
            load_state: LoadState::Loaded,
            ..UiState::default()
        };

        let screen = draw(&playback, &ui_state);
        assert!(screen.contains("Could not load, press Space to retry"));
    }
}

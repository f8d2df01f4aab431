//! Key event handling

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::AdvanceReason;
use super::{AppController, SEEK_STEP_SECONDS};

/// What a key press asks for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Previous,
    Next,
    TogglePlay,
    SeekBack,
    SeekForward,
    Tip,
    Refresh,
    ToggleHelp,
    Dismiss,
    Quit,
}

/// Map a key event to a command. Only presses count.
pub fn key_command(key: &KeyEvent) -> Option<KeyCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(KeyCommand::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Left => Some(KeyCommand::Previous),
        KeyCode::Down | KeyCode::Right => Some(KeyCommand::Next),
        KeyCode::Char(' ') => Some(KeyCommand::TogglePlay),
        KeyCode::Char('[') => Some(KeyCommand::SeekBack),
        KeyCode::Char(']') => Some(KeyCommand::SeekForward),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(KeyCommand::Tip),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(KeyCommand::Refresh),
        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => Some(KeyCommand::ToggleHelp),
        KeyCode::Esc | KeyCode::Enter => Some(KeyCommand::Dismiss),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(KeyCommand::Quit),
        _ => None,
    }
}

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) {
        let Some(command) = key_command(&key) else {
            return;
        };

        if command == KeyCommand::Quit {
            tracing::info!("Quit requested");
            self.model.set_should_quit(true).await;
            return;
        }

        // Esc while dragging only cancels the swipe
        if command == KeyCommand::Dismiss && self.cancel_swipe().await {
            return;
        }

        // Error message blocks all other interactions
        if self.model.has_error().await {
            if command == KeyCommand::Dismiss {
                self.model.clear_error().await;
            }
            return;
        }

        if self.model.is_help_popup_open().await {
            if matches!(command, KeyCommand::Dismiss | KeyCommand::ToggleHelp) {
                self.model.hide_help_popup().await;
            }
            return;
        }

        // Navigation applies to the clip on screen right now
        let observed = self.model.engine().await.current_mount();

        match command {
            KeyCommand::Previous => {
                if let Some(mount) = observed {
                    self.skip_from(mount, AdvanceReason::UserSkipPrevious).await;
                }
            }
            KeyCommand::Next => {
                if let Some(mount) = observed {
                    self.skip_from(mount, AdvanceReason::UserSkipNext).await;
                }
            }
            KeyCommand::TogglePlay => self.toggle_playback().await,
            KeyCommand::SeekBack => self.seek_by(-SEEK_STEP_SECONDS).await,
            KeyCommand::SeekForward => self.seek_by(SEEK_STEP_SECONDS).await,
            KeyCommand::Tip => self.tip_current_clip().await,
            KeyCommand::Refresh => {
                if !self.model.begin_loading().await {
                    tracing::debug!("Refresh ignored, playlist already loading");
                    return;
                }
                // Fetch in the background so the UI keeps drawing the loading state
                let controller = self.clone();
                tokio::spawn(async move {
                    controller.load_session().await;
                });
            }
            KeyCommand::ToggleHelp => self.model.show_help_popup().await,
            KeyCommand::Dismiss | KeyCommand::Quit => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    use crate::audio::testing::OutputCall;
    use crate::controller::testing::{CannedSource, Harness};
    use crate::model::clip::test_clip;
    use crate::model::LoadState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrow_keys_navigate() {
        assert_eq!(key_command(&press(KeyCode::Up)), Some(KeyCommand::Previous));
        assert_eq!(key_command(&press(KeyCode::Left)), Some(KeyCommand::Previous));
        assert_eq!(key_command(&press(KeyCode::Down)), Some(KeyCommand::Next));
        assert_eq!(key_command(&press(KeyCode::Right)), Some(KeyCommand::Next));
    }

    #[test]
    fn space_toggles_and_brackets_seek() {
        assert_eq!(key_command(&press(KeyCode::Char(' '))), Some(KeyCommand::TogglePlay));
        assert_eq!(key_command(&press(KeyCode::Char('['))), Some(KeyCommand::SeekBack));
        assert_eq!(key_command(&press(KeyCode::Char(']'))), Some(KeyCommand::SeekForward));
    }

    #[test]
    fn ctrl_c_quits_but_plain_c_does_nothing() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_command(&ctrl_c), Some(KeyCommand::Quit));
        assert_eq!(key_command(&press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn releases_and_repeats_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Down,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        let repeat = KeyEvent {
            kind: KeyEventKind::Repeat,
            ..release
        };
        assert_eq!(key_command(&release), None);
        assert_eq!(key_command(&repeat), None);
    }

    #[tokio::test]
    async fn down_key_moves_to_next_clip() {
        let mut harness = Harness::new(CannedSource::with((0..3).map(test_clip).collect()));
        let controller = harness.controller.clone();
        controller.load_session().await;

        controller.handle_key_event(press(KeyCode::Down)).await;
        assert_eq!(controller.model.get_playback_info().await.snapshot.current_index, Some(1));
        assert_eq!(harness.next_report().await.clip_id(), &test_clip(0).id);
    }

    #[tokio::test]
    async fn down_key_on_last_clip_does_nothing() {
        let mut harness = Harness::new(CannedSource::with(vec![test_clip(0)]));
        let controller = harness.controller.clone();
        controller.load_session().await;
        harness.output.clear();

        controller.handle_key_event(press(KeyCode::Down)).await;
        assert_eq!(controller.model.get_playback_info().await.snapshot.current_index, Some(0));
        assert!(harness.output.calls().is_empty());
        assert!(harness.drain_reports().await.is_empty());
    }

    #[tokio::test]
    async fn error_overlay_swallows_keys_until_dismissed() {
        let harness = Harness::new(CannedSource::with((0..2).map(test_clip).collect()));
        let controller = harness.controller.clone();
        controller.load_session().await;
        controller.model.set_error("Network error".to_string()).await;

        controller.handle_key_event(press(KeyCode::Char(' '))).await;
        assert!(!controller.model.get_playback_info().await.snapshot.is_playing);

        controller.handle_key_event(press(KeyCode::Esc)).await;
        assert!(!controller.model.has_error().await);
        controller.handle_key_event(press(KeyCode::Char(' '))).await;
        assert!(controller.model.get_playback_info().await.snapshot.is_playing);
    }

    #[tokio::test]
    async fn help_popup_opens_and_closes() {
        let harness = Harness::new(CannedSource::with(vec![test_clip(0)]));
        let controller = harness.controller.clone();

        controller.handle_key_event(press(KeyCode::Char('h'))).await;
        assert!(controller.model.is_help_popup_open().await);
        controller.handle_key_event(press(KeyCode::Down)).await;
        assert!(controller.model.is_help_popup_open().await);
        controller.handle_key_event(press(KeyCode::Esc)).await;
        assert!(!controller.model.is_help_popup_open().await);
    }

    #[tokio::test]
    async fn quit_works_even_with_error_shown() {
        let harness = Harness::new(CannedSource::with(vec![test_clip(0)]));
        let controller = harness.controller.clone();
        controller.model.set_error("boom".to_string()).await;

        controller.handle_key_event(press(KeyCode::Char('q'))).await;
        assert!(controller.model.should_quit().await);
    }

    #[tokio::test]
    async fn refresh_reloads_the_playlist() {
        let harness = Harness::new(CannedSource::with((0..2).map(test_clip).collect()));
        let controller = harness.controller.clone();
        controller.load_session().await;
        controller.handle_key_event(press(KeyCode::Down)).await;
        harness.output.clear();

        controller.handle_key_event(press(KeyCode::Char('r'))).await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(controller.model.load_state().await, LoadState::Loaded);
        assert_eq!(controller.model.get_playback_info().await.snapshot.current_index, Some(0));
        assert_eq!(harness.output.calls().len(), 2);
    }

    #[tokio::test]
    async fn refresh_is_ignored_while_loading() {
        let harness = Harness::new(CannedSource::with((0..2).map(test_clip).collect()));
        let controller = harness.controller.clone();
        controller.load_session().await;
        controller.model.set_load_state(LoadState::Loading).await;
        harness.output.clear();

        controller.handle_key_event(press(KeyCode::Char('r'))).await;
        controller.handle_key_event(press(KeyCode::Char('r'))).await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert!(harness.output.calls().is_empty());
        assert_eq!(controller.model.load_state().await, LoadState::Loading);
    }

    #[tokio::test]
    async fn repeated_refresh_fetches_once() {
        let harness = Harness::new(CannedSource::with((0..2).map(test_clip).collect()));
        let controller = harness.controller.clone();
        controller.load_session().await;
        harness.output.clear();

        controller.handle_key_event(press(KeyCode::Char('r'))).await;
        controller.handle_key_event(press(KeyCode::Char('r'))).await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        // Same first clip, so the one reload rewinds the mounted source
        let calls = harness.output.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], OutputCall::Rewind { .. }));
    }
}

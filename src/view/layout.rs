//! Header bar rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{PlaybackInfo, UiState};
use super::utils::format_duration;

pub fn render_header(frame: &mut Frame, area: Rect, playback: &PlaybackInfo, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Product name + user
            Constraint::Length(20), // Cursor position + session length
        ])
        .split(area);

    let mut spans = vec![Span::styled(
        "🐙 Octopod",
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    )];
    if let Some(email) = &ui_state.user_email {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(email.clone(), Style::default().fg(Color::Gray)));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(title, chunks[0]);

    let snapshot = &playback.snapshot;
    let position = match snapshot.current_index {
        Some(index) => format!(
            "{}/{} · {}",
            index + 1,
            snapshot.playlist.len(),
            format_duration(snapshot.playlist.total_seconds())
        ),
        None => "-/-".to_string(),
    };
    let cursor = Paragraph::new(position)
        .style(Style::default().fg(Color::Cyan))
        .centered()
        .block(Block::default().borders(Borders::ALL).title(" Clip "));
    frame.render_widget(cursor, chunks[1]);
}

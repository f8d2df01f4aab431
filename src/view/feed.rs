//! Clip feed: previous, current and next clip stacked as cards

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{Clip, LoadState, PlaybackInfo, UiState};
use super::utils::{format_duration, truncate_string};

pub const LOADING_TEXT: &str = "Loading your personalized playlist...";
pub const EMPTY_TEXT: &str = "No clips available at the moment.";

const CARD_HEIGHT: u16 = 5;
const PEEK_HEIGHT: u16 = 3;

pub fn render_feed(frame: &mut Frame, area: Rect, playback: &PlaybackInfo, ui_state: &UiState) {
    let snapshot = &playback.snapshot;

    let Some(index) = snapshot.current_index else {
        let text = if ui_state.load_state == LoadState::Loading {
            LOADING_TEXT
        } else {
            EMPTY_TEXT
        };
        render_placeholder(frame, area, text);
        return;
    };

    let area = shifted(area, ui_state.swipe_offset);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PEEK_HEIGHT), // Previous clip
            Constraint::Min(CARD_HEIGHT),    // Current clip
            Constraint::Length(PEEK_HEIGHT), // Next clip
        ])
        .split(area);

    if let Some(previous) = index.checked_sub(1).and_then(|i| snapshot.playlist.get(i)) {
        render_peek(frame, chunks[0], previous, "▲");
    }
    if let Some(current) = snapshot.playlist.get(index) {
        render_current(frame, chunks[1], current, playback);
    }
    if let Some(next) = snapshot.playlist.get(index + 1) {
        render_peek(frame, chunks[2], next, "▼");
    }
}

/// Nudge the feed by the drag offset, keeping it on screen
fn shifted(area: Rect, offset: i32) -> Rect {
    let limit = i32::from(PEEK_HEIGHT);
    let offset = offset.clamp(-limit, limit);
    let mut area = area;
    if offset >= 0 {
        let down = (offset as u16).min(area.height);
        area.y += down;
        area.height -= down;
    } else {
        let up = (offset.unsigned_abs() as u16).min(area.height);
        area.height -= up;
    }
    area
}

fn render_placeholder(frame: &mut Frame, area: Rect, text: &str) {
    let inner = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(Block::default().borders(Borders::ALL), area);
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .centered();
    frame.render_widget(paragraph, inner[1]);
}

fn render_peek(frame: &mut Frame, area: Rect, clip: &Clip, arrow: &str) {
    let width = area.width.saturating_sub(12) as usize;
    let line = Line::from(vec![
        Span::styled(format!("{} ", arrow), Style::default().fg(Color::DarkGray)),
        Span::styled(truncate_string(&clip.title, width), Style::default().fg(Color::Gray)),
        Span::styled(
            format!("  {}", format_duration(clip.duration_seconds)),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let card = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(card, area);
}

fn render_current(frame: &mut Frame, area: Rect, clip: &Clip, playback: &PlaybackInfo) {
    let width = area.width.saturating_sub(6) as usize;
    let status = if playback.snapshot.failed {
        "Could not load, press Space to retry"
    } else if playback.snapshot.at_end {
        "Finished, press Space to replay"
    } else if playback.snapshot.is_playing {
        "Playing"
    } else {
        "Paused"
    };

    let mut lines = vec![
        Line::from(Span::styled(
            truncate_string(&clip.title, width),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_string(&clip.creator_name, width),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format_duration(clip.duration_seconds), Style::default().fg(Color::Gray)),
            Span::raw("  "),
            Span::styled(status, Style::default().fg(Color::Green)),
        ]),
    ];
    if let Some(cover) = &clip.cover_image_url {
        lines.push(Line::from(Span::styled(
            truncate_string(cover, width),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Green))
            .padding(Padding::new(2, 2, 1, 0)),
    );
    frame.render_widget(card, area);
}

//! Progress bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::PlaybackInfo;
use super::utils::{format_duration, truncate_string};

pub fn render_progress_bar(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let snapshot = &playback.snapshot;
    let width = area.width.saturating_sub(8) as usize;

    let status_text = match snapshot.current_clip() {
        None => " Nothing to play".to_string(),
        Some(clip) if snapshot.is_playing => {
            format!(" ▶ {} ", truncate_string(&format!("{} | {}", clip.title, clip.creator_name), width))
        }
        Some(clip) => {
            format!("⏸  {} ", truncate_string(&format!("{} | {}", clip.title, clip.creator_name), width))
        }
    };

    let time_str = format!(
        "{} / {}",
        format_duration(playback.display_time),
        format_duration(snapshot.duration)
    );

    let hints = " Space play/pause | ↑↓ clips | [ ] seek | T tip | H help ";

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(status_text)
                .title_bottom(Line::from(hints).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(playback.progress_ratio())
        .label(time_str);

    frame.render_widget(gauge, area);
}

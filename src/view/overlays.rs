//! Overlay rendering (error notification, tip notice, help popup)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::{TipNotice, TipStatus, UiState};
use super::utils::{centered_rect, truncate_string};

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref error_msg) = ui_state.error_message {
        let area = frame.area();

        let popup_width = 52.min(area.width.saturating_sub(4));
        let inner_width = popup_width.saturating_sub(4).max(1) as usize;

        // Wrapped lines plus top and bottom border
        let error_line_count = error_msg.chars().count().div_ceil(inner_width) as u16;
        let popup_area = centered_rect(area, popup_width, 2 + error_line_count.max(1));

        frame.render_widget(Clear, popup_area);

        let error_widget = Paragraph::new(error_msg.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error (Esc to dismiss) ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(Color::Black)),
            );

        frame.render_widget(error_widget, popup_area);
    }
}

/// Small notice in the top right corner
pub fn render_tip_notice(frame: &mut Frame, tip: &TipNotice) {
    let area = frame.area();
    let (text, color) = match tip.status {
        TipStatus::Sending => (format!("Sending tip of {}...", tip.amount), Color::Yellow),
        TipStatus::Sent => (format!("Tipped {} to \"{}\"", tip.amount, tip.clip_title), Color::Green),
        TipStatus::Failed => ("Tip failed, try again".to_string(), Color::Red),
    };

    let width = 40.min(area.width);
    let text = truncate_string(&text, width.saturating_sub(4) as usize);
    let popup_area = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 3,
        width,
        height: 3.min(area.height),
    };

    frame.render_widget(Clear, popup_area);
    let notice = Paragraph::new(text).style(Style::default().fg(color)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(" Tip ")
            .style(Style::default().bg(Color::Black)),
    );
    frame.render_widget(notice, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    let keybindings = [
        ("", "── Playback ──"),
        ("Space", "Play / Pause"),
        ("[ / ]", "Seek back / forward 10s"),
        ("", ""),
        ("", "── Clips ──"),
        ("↓ / →", "Next clip"),
        ("↑ / ←", "Previous clip"),
        ("Drag up / down", "Swipe to next / previous"),
        ("R", "Fetch a new playlist"),
        ("", ""),
        ("", "── Actions ──"),
        ("T", "Tip the creator"),
        ("", ""),
        ("", "── General ──"),
        ("H", "Toggle this help"),
        ("Q", "Quit"),
    ];

    let popup_area = centered_rect(area, 52, keybindings.len() as u16 + 2);

    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    format!("{:^44}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>16}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}

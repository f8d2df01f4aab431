//! Utility functions for rendering UI components

use ratatui::layout::Rect;

/// `m:ss` for a position in seconds
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Centre a popup of the given size inside `area`, shrinking it to fit
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_format_as_minutes_and_seconds() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(59.9), "0:59");
        assert_eq!(format_duration(61.0), "1:01");
        assert_eq!(format_duration(3600.0), "60:00");
    }

    #[test]
    fn bad_durations_show_zero() {
        assert_eq!(format_duration(-3.0), "0:00");
        assert_eq!(format_duration(f64::NAN), "0:00");
    }

    #[test]
    fn long_titles_are_truncated() {
        assert_eq!(truncate_string("Short", 10), "Short");
        assert_eq!(truncate_string("A very long clip title", 10), "A very ...");
    }

    #[test]
    fn popup_fits_inside_small_screens() {
        let area = Rect::new(0, 0, 30, 10);
        let popup = centered_rect(area, 60, 20);
        assert_eq!(popup, Rect::new(2, 2, 26, 6));
    }
}

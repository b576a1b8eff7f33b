//! Status bar rendering with keybindings and playback indicators

use crate::engine::RunMode;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Data needed to render the status bar
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    /// Steps applied so far
    pub current_step: usize,
    pub total_steps: usize,
    pub mode: RunMode,
    pub speed: f64,
    pub language: &'a str,
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: StatusRenderData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let bar_bg = Style::default().bg(DEFAULT_THEME.current_line_bg);
    let sep_style = bar_bg.fg(DEFAULT_THEME.comment);

    // Left side: step counter, speed, language and message
    let left_spans = vec![
        Span::styled(
            format!(" Step {}/{} ", data.current_step, data.total_steps),
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}x ", format_speed(data.speed)),
            Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black),
        ),
        Span::styled(
            format!(" {} ", data.language),
            bar_bg.fg(DEFAULT_THEME.type_name),
        ),
        Span::styled("│", sep_style),
        Span::styled(format!(" {} ", data.message), bar_bg.fg(DEFAULT_THEME.fg)),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(bar_bg)
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    // Right side: keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar_bg.fg(DEFAULT_THEME.fg);

    let mut right_spans = Vec::new();
    for (i, (key, desc)) in [
        (" ←/→ ", " step "),
        (" ⎵ ", " play "),
        (" +/- ", " speed "),
        (" ↵ / ⌫ ", " end/start "),
        (" l ", " language "),
        ("q", " quit "),
    ]
    .into_iter()
    .enumerate()
    {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(key, key_style));
        right_spans.push(Span::styled(desc, desc_style));
    }

    let badge = |text: &'static str, color: Color| {
        Span::styled(
            text,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    };

    let indicator = if data.mode == RunMode::Playing {
        Some(badge(" ▶ PLAYING ", DEFAULT_THEME.secondary))
    } else if data.total_steps > 0 && data.current_step >= data.total_steps {
        Some(badge(" END ", DEFAULT_THEME.error))
    } else if data.current_step == 0 {
        Some(badge(" START ", DEFAULT_THEME.success))
    } else if data.mode == RunMode::Paused {
        Some(badge(" ⏸ PAUSED ", DEFAULT_THEME.primary))
    } else {
        None
    };

    if let Some(indicator) = indicator {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(indicator);
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(bar_bg)
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}

/// `1`, `1.5`, `0.25`: no trailing zeros
fn format_speed(speed: f64) -> String {
    let text = format!("{:.2}", speed);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(1.0), "1");
        assert_eq!(format_speed(1.5), "1.5");
        assert_eq!(format_speed(0.25), "0.25");
        assert_eq!(format_speed(2.0), "2");
    }
}

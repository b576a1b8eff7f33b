//! Narration pane: the last step's description plus the solution's complexity

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Data needed to render the narration pane
pub struct NarrationRenderData<'a> {
    pub narration: Option<&'a str>,
    /// Set while the narration update cue is visible
    pub fresh: bool,
    pub time_complexity: Option<&'a str>,
    pub space_complexity: Option<&'a str>,
}

pub fn render_narration_pane(
    frame: &mut Frame,
    area: Rect,
    data: NarrationRenderData,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Explanation ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut lines = Vec::new();
    match data.narration {
        Some(text) => {
            let style = if data.fresh {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            lines.push(Line::from(Span::styled(text, style)));
        }
        None => lines.push(Line::from(Span::styled(
            "Press ⎵ to play or → to step.",
            Style::default().fg(DEFAULT_THEME.comment),
        ))),
    }

    if data.time_complexity.is_some() || data.space_complexity.is_some() {
        lines.push(Line::from(""));
        let mut spans = Vec::new();
        if let Some(time) = data.time_complexity {
            spans.push(Span::styled("Time ", Style::default().fg(DEFAULT_THEME.comment)));
            spans.push(Span::styled(time, Style::default().fg(DEFAULT_THEME.type_name)));
            spans.push(Span::raw("  "));
        }
        if let Some(space) = data.space_complexity {
            spans.push(Span::styled("Space ", Style::default().fg(DEFAULT_THEME.comment)));
            spans.push(Span::styled(space, Style::default().fg(DEFAULT_THEME.type_name)));
        }
        lines.push(Line::from(spans));
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    *scroll_offset = (*scroll_offset).min(lines.len().saturating_sub(visible_height));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll(((*scroll_offset).min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);
}

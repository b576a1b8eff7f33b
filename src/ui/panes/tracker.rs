//! Variable tracker pane rendering

use crate::ui::theme::DEFAULT_THEME;
use crate::view::VariableTracker;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the variable tracker pane. Rows whose value just changed are
/// flagged until their cue expires.
pub fn render_tracker_pane(
    frame: &mut Frame,
    area: Rect,
    tracker: &VariableTracker,
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
        .title(" Variables ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if tracker.is_empty() {
        let paragraph = Paragraph::new("(no variables)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let name_width = tracker
        .rows()
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0);

    let all_items: Vec<ListItem> = tracker
        .rows()
        .iter()
        .map(|row| {
            let value_style = if row.changed {
                Style::default()
                    .bg(DEFAULT_THEME.success)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.number)
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<width$}", row.name, width = name_width),
                    Style::default().fg(DEFAULT_THEME.fg),
                ),
                Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(row.shown.as_str(), value_style),
            ]))
        })
        .collect();

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

//! Data structure pane rendering
//!
//! Draws the view's [`ViewContent`]:
//!
//! - Linear structures as rows of cells. Arrays get an index row above and a
//!   pointer row below; linked lists are joined by arrows and end in `null`;
//!   queues are framed by Front and Rear; stacks are drawn top-down with the
//!   top slot marked.
//! - Trees and graphs on a braille [`Canvas`], with bounds fitted to the
//!   element positions.
//! - The generic step listing, or the placeholder when no script exists.

use crate::script::DataStructureKind;
use crate::ui::theme::DEFAULT_THEME;
use crate::view::{ElementKind, PointerMarkers, View, ViewContent, VisualElementSet};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, List, ListItem, Paragraph, Wrap,
    },
    Frame,
};

/// Data needed to render the structure pane
pub struct StructureRenderData<'a> {
    pub view: &'a View,
    pub kind: DataStructureKind,
    /// Steps applied so far
    pub current_index: usize,
    /// Node radius on the canvas, in layout units
    pub node_radius: f32,
}

/// Render the structure pane
pub fn render_structure_pane(
    frame: &mut Frame,
    area: Rect,
    data: StructureRenderData,
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
        .title(format!(" {} ", data.kind))
        .borders(Borders::ALL)
        .border_style(border_style);

    match &data.view.content {
        ViewContent::Unavailable => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Visualization Not Available",
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Interactive animation for this problem is coming soon.",
                    Style::default().fg(DEFAULT_THEME.comment),
                )),
            ];
            let paragraph = Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
        }
        ViewContent::StepListing(descriptions) => {
            let items = step_listing(descriptions, data.current_index);
            render_scrolled_list(frame, area, block, items, scroll_offset);
        }
        ViewContent::Structure(set) if set.is_empty() => {
            let paragraph = Paragraph::new("(empty)")
                .block(block)
                .style(Style::default().fg(DEFAULT_THEME.comment));
            frame.render_widget(paragraph, area);
        }
        ViewContent::Structure(set) => match data.kind {
            DataStructureKind::Tree | DataStructureKind::Graph => {
                render_canvas(frame, area, block, set, data.node_radius);
            }
            DataStructureKind::Stack => {
                let items = stack_rows(set).into_iter().map(ListItem::new).collect();
                render_scrolled_list(frame, area, block, items, scroll_offset);
            }
            _ => {
                let lines = linear_rows(set, &data.view.pointers);
                let paragraph = Paragraph::new(lines)
                    .block(block)
                    .scroll((0, (*scroll_offset).min(u16::MAX as usize) as u16));
                frame.render_widget(paragraph, area);
            }
        },
    }
}

fn render_scrolled_list(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    items: Vec<ListItem>,
    scroll_offset: &mut usize,
) {
    let total_items = items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();
    frame.render_widget(List::new(visible_items).block(block), area);
}

/// "Step i: description" rows; applied steps are dimmed, the last one marked
fn step_listing(descriptions: &[String], current_index: usize) -> Vec<ListItem<'_>> {
    descriptions
        .iter()
        .enumerate()
        .map(|(i, description)| {
            let step = i + 1;
            let (marker, style) = if step == current_index {
                (
                    "▸ ",
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                )
            } else if step < current_index {
                ("  ", Style::default().fg(DEFAULT_THEME.comment))
            } else {
                ("  ", Style::default().fg(DEFAULT_THEME.fg))
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.secondary)),
                Span::styled(format!("Step {}: ", step), style),
                Span::styled(description.as_str(), style),
            ]))
        })
        .collect()
}

/// Rows for arrays, linked lists and queues
fn linear_rows(set: &VisualElementSet, pointers: &PointerMarkers) -> Vec<Line<'static>> {
    let cells: Vec<(String, Vec<&str>, Style)> = set
        .iter()
        .map(|element| {
            let names: Vec<&str> = pointers
                .iter()
                .filter(|(_, anchor)| *anchor == Some(element.id.as_str()))
                .map(|(name, _)| name)
                .collect();
            (
                element.label.clone(),
                names,
                DEFAULT_THEME.element_style(element.styles),
            )
        })
        .collect();

    let kind = set.kind();
    let mut index_row = Vec::new();
    let mut value_row = Vec::new();
    let mut pointer_row = Vec::new();

    if kind == DataStructureKind::Queue {
        let label = "Front → ";
        value_row.push(Span::styled(label, Style::default().fg(DEFAULT_THEME.comment)));
        index_row.push(Span::raw(" ".repeat(label.chars().count())));
        pointer_row.push(Span::raw(" ".repeat(label.chars().count())));
    }

    for (slot, (label, names, style)) in cells.iter().enumerate() {
        let pointer_text = names.join(",");
        let width = label
            .chars()
            .count()
            .max(slot.to_string().len())
            .max(pointer_text.chars().count().saturating_sub(2))
            + 2;

        index_row.push(Span::styled(
            format!(" {:^width$} ", slot, width = width),
            Style::default().fg(DEFAULT_THEME.comment),
        ));
        value_row.push(Span::styled("[", Style::default().fg(DEFAULT_THEME.primary)));
        value_row.push(Span::styled(format!("{:^width$}", label, width = width), *style));
        value_row.push(Span::styled("]", Style::default().fg(DEFAULT_THEME.primary)));
        pointer_row.push(Span::styled(
            format!(" {:^width$} ", pointer_text, width = width),
            Style::default()
                .fg(DEFAULT_THEME.pointer)
                .add_modifier(Modifier::BOLD),
        ));

        if kind == DataStructureKind::LinkedList {
            let arrow = " → ";
            value_row.push(Span::styled(arrow, Style::default().fg(DEFAULT_THEME.comment)));
            index_row.push(Span::raw("   "));
            pointer_row.push(Span::raw("   "));
        } else {
            value_row.push(Span::raw(" "));
            index_row.push(Span::raw(" "));
            pointer_row.push(Span::raw(" "));
        }
    }

    match kind {
        DataStructureKind::LinkedList => {
            value_row.push(Span::styled("null", Style::default().fg(DEFAULT_THEME.number)));
        }
        DataStructureKind::Queue => {
            value_row.push(Span::styled("← Rear", Style::default().fg(DEFAULT_THEME.comment)));
        }
        _ => {}
    }

    let mut rows = Vec::new();
    if kind == DataStructureKind::Array {
        rows.push(Line::from(index_row));
    }
    rows.push(Line::from(value_row));
    if !pointers.is_empty() {
        rows.push(Line::from(pointer_row));
    }
    rows
}

/// Stack slots top-down; slot 0 is the bottom
fn stack_rows(set: &VisualElementSet) -> Vec<Line<'static>> {
    let width = set
        .iter()
        .map(|element| element.label.chars().count())
        .max()
        .unwrap_or(1)
        + 2;
    let border = Style::default().fg(DEFAULT_THEME.primary);

    let mut rows: Vec<Line> = set
        .iter()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .enumerate()
        .map(|(depth, element)| {
            let mut spans = vec![
                Span::styled("│", border),
                Span::styled(
                    format!("{:^width$}", element.label, width = width),
                    DEFAULT_THEME.element_style(element.styles),
                ),
                Span::styled("│", border),
            ];
            if depth == 0 {
                spans.push(Span::styled(
                    " ← Top",
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                ));
            }
            Line::from(spans)
        })
        .collect();
    rows.push(Line::from(Span::styled(
        format!("└{}┘", "─".repeat(width)),
        border,
    )));
    rows
}

/// Canvas bounds covering every element, padded by the node radius
fn canvas_bounds(set: &VisualElementSet, radius: f64) -> ([f64; 2], [f64; 2]) {
    let mut x = [f64::MAX, f64::MIN];
    let mut y = [f64::MAX, f64::MIN];
    for element in set.iter() {
        let (ex, ey) = (element.position.x as f64, -(element.position.y as f64));
        x = [x[0].min(ex), x[1].max(ex)];
        y = [y[0].min(ey), y[1].max(ey)];
    }
    let pad = radius * 2.0;
    ([x[0] - pad, x[1] + pad], [y[0] - pad, y[1] + pad])
}

fn render_canvas(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    set: &VisualElementSet,
    node_radius: f32,
) {
    let radius = node_radius as f64;
    let (x_bounds, y_bounds) = canvas_bounds(set, radius);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            // Layout y grows downwards; canvas y grows upwards
            let at = |id: &str| {
                set.get(id)
                    .map(|e| (e.position.x as f64, -(e.position.y as f64)))
            };

            for element in set.iter() {
                let link = match &element.kind {
                    ElementKind::TreeNode {
                        parent: Some(parent),
                    } => at(parent).zip(at(&element.id)),
                    ElementKind::Edge { from, to } => at(from).zip(at(to)),
                    _ => None,
                };
                if let Some(((x1, y1), (x2, y2))) = link {
                    let color = DEFAULT_THEME
                        .element_color(element.styles)
                        .unwrap_or(DEFAULT_THEME.comment);
                    ctx.draw(&CanvasLine {
                        x1,
                        y1,
                        x2,
                        y2,
                        color,
                    });
                }
            }

            ctx.layer();

            for element in set.iter() {
                if matches!(element.kind, ElementKind::Edge { .. }) {
                    continue;
                }
                let (x, y) = (element.position.x as f64, -(element.position.y as f64));
                let color = DEFAULT_THEME
                    .element_color(element.styles)
                    .unwrap_or(DEFAULT_THEME.primary);
                ctx.draw(&Circle {
                    x,
                    y,
                    radius,
                    color,
                });
                ctx.print(
                    x - radius / 4.0,
                    y,
                    Span::styled(
                        element.label.clone(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });

    frame.render_widget(canvas, area);
}

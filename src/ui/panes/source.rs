//! Source code pane rendering with syntax highlighting
//!
//! Displays the selected solution's code with the line marked by the last
//! `codeHighlight` step.
//!
//! # Features
//!
//! - Keyword highlighting shared across the solution languages (Python,
//!   JavaScript, Java, C++)
//! - Current line highlighting with arrow indicator
//! - The current line stays at a fixed visual row while stepping
//!
//! # Rendering
//!
//! The pane uses a simple character-by-character tokenizer to apply syntax
//! highlighting styles without requiring a full lexer.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Simple syntax highlighting for C-family and Python code
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (byte, c) = chars[i];

        // Line comments: `//` or `#`
        let starts_comment =
            c == '#' || (c == '/' && chars.get(i + 1).is_some_and(|(_, next)| *next == '/'));
        if starts_comment {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            spans.push(Span::styled(
                line[byte..].to_string(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }

        // Strings
        if c == '"' || c == '\'' {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            let mut end = i + 1;
            while end < chars.len() && chars[end].1 != c {
                if chars[end].1 == '\\' {
                    end += 2;
                } else {
                    end += 1;
                }
            }
            if end < chars.len() {
                end += 1;
            }
            let end_byte = chars.get(end).map_or(line.len(), |(b, _)| *b);
            spans.push(Span::styled(
                line[byte..end_byte].to_string(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        // Delimiters
        if !c.is_alphanumeric() && c != '_' {
            if !current_word.is_empty() {
                let style = keyword_style(&current_word, c == '(');
                spans.push(Span::styled(std::mem::take(&mut current_word), style));
            }

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = keyword_style(&current_word, false);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn keyword_style(word: &str, is_function: bool) -> Style {
    match word {
        "int" | "char" | "void" | "bool" | "boolean" | "float" | "double" | "long" | "string"
        | "String" | "vector" | "auto" | "List" | "var" | "let" | "const" => {
            Style::default().fg(DEFAULT_THEME.type_name)
        }
        "def" | "function" | "class" | "return" | "if" | "elif" | "else" | "while" | "for"
        | "in" | "do" | "switch" | "case" | "break" | "continue" | "new" | "public"
        | "private" | "static" | "and" | "or" | "not" | "import" | "from" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "None" | "null" | "nullptr" | "true" | "false" | "True" | "False" => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        _ if word.chars().all(|c| c.is_ascii_digit()) => Style::default().fg(DEFAULT_THEME.number),
        _ if is_function => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    /// Visual row the current line is kept at; `None` centres it on first draw
    pub target_line_row: Option<usize>,
}

/// Render the source code pane. `current_line` is 1-based.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: Option<&str>,
    current_line: Option<usize>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let Some(source_code) = source_code else {
        let paragraph = Paragraph::new("(no code for this language)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Keep the current line at the target visual row
    if let Some(line) = current_line.filter(|line| (1..=total_lines).contains(line)) {
        scroll_state.offset = (line - 1).saturating_sub(target_row);
    }
    if total_lines > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = current_line == Some(line_num);

            let (marker, num_style) = if is_current {
                (
                    "▶",
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (" ", Style::default().fg(DEFAULT_THEME.comment))
            };

            let mut content_line = highlight_source_code(line);
            if is_current {
                for span in &mut content_line.spans {
                    span.style = span.style.bg(DEFAULT_THEME.current_line_bg);
                }
            }

            let mut spans = vec![Span::styled(format!("{}{:3} ", marker, line_num), num_style)];
            spans.extend(content_line.spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

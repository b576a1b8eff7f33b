use crate::script::HighlightStyle;
use crate::view::StyleSet;
use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub function: Color,
    pub type_name: Color, // Cyan for type names
    pub pointer: Color,   // Pink for pointer markers

    // Element highlight styles
    pub current: Color,
    pub comparing: Color,
    pub swapping: Color,
    pub visited: Color,
    pub sorted: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    keyword: Color::Rgb(137, 180, 250),        // Blue for keywords
    string: Color::Rgb(250, 179, 135),         // Orange for strings
    number: Color::Rgb(250, 179, 135),         // Orange for numbers
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for current line
    function: Color::Rgb(249, 226, 175),       // Yellow for functions
    type_name: Color::Rgb(148, 226, 213),      // Cyan/teal for type names
    pointer: Color::Rgb(245, 194, 231),
    current: Color::Rgb(249, 226, 175),   // Yellow
    comparing: Color::Rgb(137, 180, 250), // Blue
    swapping: Color::Rgb(243, 139, 168),  // Red
    visited: Color::Rgb(203, 166, 247),   // Mauve
    sorted: Color::Rgb(166, 227, 161),    // Green
};

impl Theme {
    pub fn highlight(&self, style: HighlightStyle) -> Color {
        match style {
            HighlightStyle::Current => self.current,
            HighlightStyle::Comparing => self.comparing,
            HighlightStyle::Swapping => self.swapping,
            HighlightStyle::Visited => self.visited,
            HighlightStyle::Sorted => self.sorted,
        }
    }

    /// Color of the most prominent style in `styles`. Transient styles win
    /// over persistent ones.
    pub fn element_color(&self, styles: StyleSet) -> Option<Color> {
        [
            HighlightStyle::Swapping,
            HighlightStyle::Comparing,
            HighlightStyle::Current,
            HighlightStyle::Visited,
            HighlightStyle::Sorted,
        ]
        .into_iter()
        .find(|style| styles.contains(*style))
        .map(|style| self.highlight(style))
    }

    /// Text style for an element carrying `styles`
    pub fn element_style(&self, styles: StyleSet) -> Style {
        match self.element_color(styles) {
            Some(color) => Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            None => Style::default().fg(self.fg),
        }
    }
}

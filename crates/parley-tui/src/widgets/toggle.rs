//! Labeled on/off toggle widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

/// A labeled toggle rendered as `label ( ON)` / `label (OFF)`.
pub struct Toggle<'a> {
    label: &'a str,
    on: bool,
    theme: &'a Theme,
}

impl<'a> Toggle<'a> {
    /// Create a new toggle with the given label and state.
    pub fn new(label: &'a str, on: bool, theme: &'a Theme) -> Self {
        Self { label, on, theme }
    }
}

impl Widget for Toggle<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (state_text, state_color) = if self.on {
            (" ON", self.theme.success)
        } else {
            ("OFF", self.theme.muted)
        };

        let line = Line::from(vec![
            Span::styled(self.label, Style::default().fg(self.theme.subtext)),
            Span::styled(" (", Style::default().fg(self.theme.muted)),
            Span::styled(
                state_text,
                Style::default()
                    .fg(state_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(")", Style::default().fg(self.theme.muted)),
        ]);

        Paragraph::new(line)
            .style(Style::default().bg(self.theme.surface))
            .render(area, buf);
    }
}

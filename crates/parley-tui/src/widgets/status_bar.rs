//! Status bar widget for the bottom row of the TUI.
//!
//! Format: `endpoint │ key hint │ key hint │ ...`

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

/// A single key binding hint.
#[derive(Debug, Clone)]
pub struct KeyHint {
    /// Key label (e.g., "Enter").
    pub key: &'static str,
    /// What the key does (e.g., "send").
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

/// Status bar widget showing the endpoint and key hints.
pub struct StatusBar<'a> {
    endpoint: &'a str,
    hints: &'a [KeyHint],
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar widget.
    pub fn new(endpoint: &'a str, hints: &'a [KeyHint], theme: &'a Theme) -> Self {
        Self {
            endpoint,
            hints,
            theme,
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(
            self.endpoint,
            Style::default().fg(self.theme.subtext),
        )];

        for hint in self.hints {
            spans.push(Span::styled(" │ ", Style::default().fg(self.theme.muted)));
            spans.push(Span::styled(
                hint.key,
                Style::default().fg(self.theme.secondary),
            ));
            spans.push(Span::styled(
                format!(" {}", hint.action),
                Style::default().fg(self.theme.muted),
            ));
        }

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(self.theme.surface))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_status_bar_shows_endpoint_and_hints() {
        let theme = Theme::default();
        let hints = [KeyHint::new("Enter", "send"), KeyHint::new("Ctrl+C", "quit")];
        let backend = TestBackend::new(70, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let bar = StatusBar::new("http://localhost:8000", &hints, &theme);
                frame.render_widget(bar, frame.area());
            })
            .unwrap();
        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("http://localhost:8000"));
        assert!(content.contains("Enter"));
        assert!(content.contains("quit"));
    }
}

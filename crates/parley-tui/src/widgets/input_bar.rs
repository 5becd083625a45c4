//! Full-width input bar widget.
//!
//! Always visible at the bottom of the screen for text entry.
//! Supports multi-line input with Ctrl+J (or Ctrl+Enter) for newlines.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::theme::Theme;
use crate::widgets::TextInputState;

/// Placeholder shown while the input is empty.
const PLACEHOLDER: &str = "Type your message...";

/// Full-width input bar for text entry.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    focused: bool,
    sending: bool,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            input,
            theme,
            focused: false,
            sending: false,
        }
    }

    /// Set whether the input bar is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Disable editing hints while a request is in flight.
    #[must_use]
    pub fn sending(mut self, sending: bool) -> Self {
        self.sending = sending;
        self
    }

    /// Number of rows this bar wants for the current content, borders
    /// included, clamped so the transcript keeps most of the screen.
    pub fn desired_height(input: &TextInputState) -> u16 {
        let content_rows = input.content().split('\n').count().max(1);
        u16::try_from(content_rows + 2).unwrap_or(u16::MAX).clamp(3, 6)
    }

    /// Build display lines and the index of the line holding the cursor.
    fn build_input_lines(&self) -> (Vec<Line<'static>>, usize) {
        let content = self.input.content();
        let cursor_pos = self.input.cursor();

        let text_lines: Vec<&str> = content.split('\n').collect();

        // Locate the cursor line and column in character terms.
        let mut char_count = 0;
        let mut cursor_line = 0;
        let mut cursor_col = 0;
        for (line_idx, line) in text_lines.iter().enumerate() {
            let line_len = line.chars().count();
            if cursor_pos <= char_count + line_len {
                cursor_line = line_idx;
                cursor_col = cursor_pos - char_count;
                break;
            }
            char_count += line_len + 1;
            cursor_line = line_idx;
            cursor_col = 0;
        }

        let text_style = Style::default().fg(self.theme.text);
        let mut lines = Vec::with_capacity(text_lines.len());

        for (line_idx, line_text) in text_lines.iter().enumerate() {
            let prefix = if line_idx == 0 { "> " } else { "  " };

            if self.focused && line_idx == cursor_line {
                let mut spans = vec![Span::styled(prefix.to_string(), text_style)];
                let chars: Vec<char> = line_text.chars().collect();

                if cursor_col < chars.len() {
                    let before: String = chars[..cursor_col].iter().collect();
                    let after: String = chars[cursor_col..].iter().collect();
                    spans.push(Span::styled(before, text_style));
                    spans.push(Span::styled("█", text_style));
                    spans.push(Span::styled(after, text_style));
                } else {
                    spans.push(Span::styled(line_text.to_string(), text_style));
                    spans.push(Span::styled("█", text_style));
                }
                if line_idx == 0 && line_text.is_empty() {
                    spans.push(Span::styled(
                        PLACEHOLDER,
                        Style::default().fg(self.theme.muted),
                    ));
                }
                lines.push(Line::from(spans));
            } else if line_idx == 0 && line_text.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled(prefix.to_string(), text_style),
                    Span::styled(PLACEHOLDER, Style::default().fg(self.theme.muted)),
                ]));
            } else {
                lines.push(Line::from(Span::styled(
                    format!("{prefix}{line_text}"),
                    text_style,
                )));
            }
        }

        (lines, cursor_line)
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };

        let title = if self.sending {
            " Message (sending) "
        } else {
            " Message "
        };

        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.base));

        let inner_height = area.height.saturating_sub(2) as usize;

        let (lines, cursor_line) = self.build_input_lines();

        // Scroll so the cursor line stays visible.
        let scroll_offset = if lines.len() <= inner_height {
            0
        } else {
            cursor_line.saturating_sub(inner_height.saturating_sub(1))
        };

        Paragraph::new(lines)
            .block(block)
            .scroll((scroll_offset as u16, 0))
            .render(area, buf);
    }
}

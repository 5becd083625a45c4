//! Transcript pane widget.
//!
//! Renders the ordered conversation: user turns as plain styled text,
//! assistant turns as rendered markdown, plus the waiting indicator and
//! the current error line when present.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use parley_engine::{Message, Role};

use crate::text::{render_markdown, wrap_lines, wrap_text};
use crate::theme::Theme;

use super::state::TranscriptState;

/// Animation frames for the waiting indicator.
const WAIT_FRAMES: [&str; 4] = ["⠋", "⠙", "⠸", "⠴"];

/// Transcript pane widget.
///
/// ```text
/// ┌─ Conversation ──────────────────────┐
/// │ You                                  │
/// │ What does the indexer do?            │
/// │                                      │
/// │ Assistant                            │
/// │ It splits documents into chunks...   │
/// └──────────────────────────────────────┘
/// ```
pub struct TranscriptWidget<'a> {
    messages: &'a [Message],
    error: Option<&'a str>,
    waiting: bool,
    tick: usize,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> TranscriptWidget<'a> {
    /// Create a new transcript widget over the given messages.
    pub fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self {
            messages,
            error: None,
            waiting: false,
            tick: 0,
            theme,
            focused: false,
        }
    }

    /// Set the error line to display, if any.
    #[must_use]
    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    /// Show the animated waiting indicator.
    #[must_use]
    pub fn waiting(mut self, waiting: bool, tick: usize) -> Self {
        self.waiting = waiting;
        self.tick = tick;
        self
    }

    /// Set whether this pane is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn speaker_line(&self, role: Role) -> Line<'static> {
        let (name, color) = match role {
            Role::User => ("You", self.theme.user),
            Role::Assistant => ("Assistant", self.theme.assistant),
        };
        Line::from(Span::styled(
            name,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    }

    /// Build all display rows, pre-wrapped to the given width.
    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                lines.push(Line::from(""));
            }
            lines.push(self.speaker_line(message.role));

            match message.role {
                Role::User => {
                    let style = Style::default().fg(self.theme.text);
                    for raw in message.content.lines() {
                        if raw.is_empty() {
                            lines.push(Line::from(""));
                            continue;
                        }
                        for wrapped in wrap_text(raw, width) {
                            lines.push(Line::from(Span::styled(wrapped, style)));
                        }
                    }
                }
                Role::Assistant => {
                    lines.extend(wrap_lines(
                        render_markdown(&message.content, self.theme),
                        width,
                    ));
                }
            }
        }

        if self.waiting {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            let frame = WAIT_FRAMES[self.tick % WAIT_FRAMES.len()];
            lines.push(Line::from(Span::styled(
                format!("{frame} Waiting for reply"),
                Style::default().fg(self.theme.muted),
            )));
        }

        if let Some(error) = self.error {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.extend(wrap_lines(
                vec![Line::from(Span::styled(
                    format!("✗ {error}"),
                    Style::default().fg(self.theme.error),
                ))],
                width,
            ));
        }

        lines
    }

    /// Render the placeholder shown before the first message.
    fn render_empty_state(&self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(Span::styled(
                "Start a conversation",
                Style::default()
                    .fg(self.theme.subtext)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Ask me anything to get started",
                Style::default().fg(self.theme.muted),
            )),
        ];

        let y = area.y + area.height.saturating_sub(2) / 2;
        let centered = Rect::new(area.x, y, area.width, area.height.min(2));
        Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center)
            .render(centered, buf);
    }
}

impl StatefulWidget for TranscriptWidget<'_> {
    type State = TranscriptState;

    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TranscriptState) {
        let border_style = if self.focused {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };

        let block = Block::default()
            .title(" Conversation ")
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.messages.is_empty() && self.error.is_none() && !self.waiting {
            self.render_empty_state(inner, buf);
            return;
        }

        let lines = self.build_lines(inner.width as usize);
        state.clamp(lines.len(), inner.height as usize);

        Paragraph::new(lines)
            .scroll((state.scroll as u16, 0))
            .render(inner, buf);
    }
}

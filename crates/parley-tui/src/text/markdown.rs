//! Markdown rendering using pulldown-cmark.
//!
//! Provides [`render_markdown`] to convert assistant replies to styled
//! ratatui Lines. Fenced code blocks are syntax-highlighted by language
//! tag; unrecognized or missing tags fall back to plain code styling.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

use crate::theme::Theme;

use super::highlight::{highlight_code, CODE_INDENT};
use super::styles::MarkdownStyles;

/// Render markdown text to styled ratatui Lines.
pub fn render_markdown(input: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(input, options);
    let styles = MarkdownStyles::from_theme(theme);

    let mut renderer = MarkdownRenderer::new(styles);
    renderer.run(parser);
    renderer.lines
}

/// Fenced code block being captured for highlighting.
struct CodeCapture {
    lang: String,
    buffer: String,
}

/// Internal renderer that processes pulldown-cmark events.
struct MarkdownRenderer {
    /// Accumulated output lines.
    lines: Vec<Line<'static>>,
    /// Style configuration.
    styles: MarkdownStyles,
    /// Stack of active styles for nested formatting.
    style_stack: Vec<Style>,
    /// Current line being built.
    current_spans: Vec<Span<'static>>,
    /// Current indentation level (for nested lists).
    indent_level: usize,
    /// Code block currently being captured, if any.
    code_block: Option<CodeCapture>,
    /// Whether we're inside a blockquote.
    in_blockquote: bool,
    /// Pending list marker to prepend to next text.
    pending_list_marker: Option<String>,
    /// Task list checkbox state (Some(checked) if in task item).
    task_checkbox: Option<bool>,
}

impl MarkdownRenderer {
    fn new(styles: MarkdownStyles) -> Self {
        Self {
            lines: Vec::new(),
            styles,
            style_stack: Vec::new(),
            current_spans: Vec::new(),
            indent_level: 0,
            code_block: None,
            in_blockquote: false,
            pending_list_marker: None,
            task_checkbox: None,
        }
    }

    fn run<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            self.handle_event(event);
        }
        self.flush_line();
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            // Headings
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_line();
                let style = self.heading_style(level);
                self.style_stack.push(style);
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush_line();
                self.style_stack.pop();
            }

            // Inline formatting
            Event::Start(Tag::Emphasis) => {
                self.style_stack.push(self.styles.emphasis);
            }
            Event::Start(Tag::Strong) => {
                self.style_stack.push(self.styles.strong);
            }
            Event::Start(Tag::Strikethrough) => {
                self.style_stack.push(self.styles.strikethrough);
            }
            Event::Start(Tag::Link { .. }) => {
                self.style_stack.push(self.styles.link);
            }
            Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link) => {
                self.style_stack.pop();
            }

            // Code blocks are captured whole, then highlighted at the end tag
            Event::Start(Tag::CodeBlock(kind)) => {
                self.flush_line();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .unwrap_or("")
                        .to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code_block = Some(CodeCapture {
                    lang,
                    buffer: String::new(),
                });
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(capture) = self.code_block.take() {
                    self.emit_code_block(&capture);
                }
            }

            // Lists
            Event::Start(Tag::List(_)) => {
                self.flush_line();
                self.indent_level += 1;
            }
            Event::End(TagEnd::List(_)) => {
                self.indent_level = self.indent_level.saturating_sub(1);
            }
            Event::Start(Tag::Item) => {
                self.flush_line();
                let indent = "  ".repeat(self.indent_level.saturating_sub(1));
                self.pending_list_marker = Some(format!("{indent}• "));
            }
            Event::End(TagEnd::Item) => {
                self.flush_line();
                self.task_checkbox = None;
            }
            Event::TaskListMarker(checked) => {
                self.task_checkbox = Some(checked);
            }

            // Blockquotes
            Event::Start(Tag::BlockQuote) => {
                self.flush_line();
                self.in_blockquote = true;
            }
            Event::End(TagEnd::BlockQuote) => {
                self.flush_line();
                self.in_blockquote = false;
            }

            // Paragraphs
            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
                self.lines.push(Line::from(""));
            }

            // Text content
            Event::Text(text) => {
                self.add_text(&text);
            }

            // Inline code
            Event::Code(code) => {
                self.current_spans
                    .push(Span::styled(format!("`{code}`"), self.styles.code));
            }

            // Line breaks
            Event::SoftBreak => {
                self.add_text(" ");
            }
            Event::HardBreak => {
                self.flush_line();
            }

            // Events we don't handle specially (ignore)
            Event::Start(
                Tag::Paragraph
                | Tag::Image { .. }
                | Tag::Table(_)
                | Tag::TableHead
                | Tag::TableRow
                | Tag::TableCell
                | Tag::FootnoteDefinition(_)
                | Tag::MetadataBlock(_)
                | Tag::HtmlBlock,
            )
            | Event::End(
                TagEnd::Image
                | TagEnd::Table
                | TagEnd::TableHead
                | TagEnd::TableRow
                | TagEnd::TableCell
                | TagEnd::FootnoteDefinition
                | TagEnd::MetadataBlock(_)
                | TagEnd::HtmlBlock,
            )
            | Event::Html(_)
            | Event::InlineHtml(_)
            | Event::FootnoteReference(_)
            | Event::Rule => {}
        }
    }

    /// Emit a completed code block, highlighted when the language tag is
    /// recognized, plain code styling otherwise.
    fn emit_code_block(&mut self, capture: &CodeCapture) {
        match highlight_code(&capture.buffer, &capture.lang) {
            Some(lines) => self.lines.extend(lines),
            None => {
                for line in capture.buffer.lines() {
                    self.lines.push(Line::from(Span::styled(
                        format!("{CODE_INDENT}{line}"),
                        self.styles.code_block,
                    )));
                }
            }
        }
        self.lines.push(Line::from(""));
    }

    fn add_text(&mut self, text: &str) {
        if let Some(capture) = &mut self.code_block {
            capture.buffer.push_str(text);
            return;
        }

        // Handle list marker if pending
        if let Some(marker) = self.pending_list_marker.take() {
            self.current_spans
                .push(Span::styled(marker, self.styles.list_marker));
            if let Some(checked) = self.task_checkbox.take() {
                let checkbox = if checked { "[x] " } else { "[ ] " };
                self.current_spans
                    .push(Span::styled(checkbox, self.styles.list_marker));
            }
        }

        // Blockquote prefix
        if self.in_blockquote && self.current_spans.is_empty() {
            self.current_spans
                .push(Span::styled("> ".to_string(), self.styles.blockquote));
        }

        let style = self.current_style();
        self.current_spans
            .push(Span::styled(text.to_string(), style));
    }

    fn current_style(&self) -> Style {
        let mut style = self.styles.text;
        for s in &self.style_stack {
            style = style.patch(*s);
        }
        style
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 => self.styles.h1,
            HeadingLevel::H2 => self.styles.h2,
            _ => self.styles.h3,
        }
    }

    fn flush_line(&mut self) {
        if !self.current_spans.is_empty() {
            let spans = std::mem::take(&mut self.current_spans);
            self.lines.push(Line::from(spans));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_theme() -> Theme {
        Theme::default()
    }

    fn all_text(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_simple_text() {
        let lines = render_markdown("Hello, world!", &test_theme());
        assert!(!lines.is_empty());
        assert!(all_text(&lines).contains("Hello, world!"));
    }

    #[test]
    fn test_render_heading() {
        let lines = render_markdown("# Title", &test_theme());
        assert!(all_text(&lines).contains("Title"));
    }

    #[test]
    fn test_render_bold_and_italic() {
        let lines = render_markdown("**bold** and *italic*", &test_theme());
        assert!(all_text(&lines).contains("bold"));
        assert!(all_text(&lines).contains("italic"));
    }

    #[test]
    fn test_render_inline_code() {
        let lines = render_markdown("Use `code` here", &test_theme());
        assert!(all_text(&lines).contains("`code`"));
    }

    #[test]
    fn test_render_highlighted_code_block() {
        let md = "```rust\nfn main() {}\n```";
        let lines = render_markdown(md, &test_theme());
        assert!(all_text(&lines).contains("fn main() {}"));
        // Highlighted lines carry multiple colored spans.
        let code_line = lines
            .iter()
            .find(|l| {
                l.spans
                    .iter()
                    .any(|s| s.content.as_ref().contains("main"))
            })
            .unwrap();
        assert!(code_line.spans.len() > 1);
    }

    #[test]
    fn test_render_unknown_language_falls_back() {
        let md = "```notalanguage\nsome code\n```";
        let lines = render_markdown(md, &test_theme());
        assert!(all_text(&lines).contains("some code"));
    }

    #[test]
    fn test_render_untagged_code_block_falls_back() {
        let md = "```\nplain fence\n```";
        let lines = render_markdown(md, &test_theme());
        assert!(all_text(&lines).contains("plain fence"));
    }

    #[test]
    fn test_render_list() {
        let lines = render_markdown("- Item 1\n- Item 2", &test_theme());
        let text = all_text(&lines);
        assert!(text.contains("Item 1"));
        assert!(text.contains("• "));
    }

    #[test]
    fn test_render_blockquote() {
        let lines = render_markdown("> quoted words", &test_theme());
        assert!(all_text(&lines).contains("quoted words"));
    }

    #[test]
    fn test_render_empty() {
        let lines = render_markdown("", &test_theme());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_render_multiple_paragraphs() {
        let lines = render_markdown("First paragraph.\n\nSecond paragraph.", &test_theme());
        assert!(lines.len() >= 3);
    }
}

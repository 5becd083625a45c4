//! Width-aware wrapping for plain and styled text.
//!
//! Transcript content is pre-wrapped so scroll arithmetic works on real
//! display rows; `Paragraph`'s own wrapping would make the row count
//! unknowable to the scroll state.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap a plain text string to the specified width.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    textwrap::wrap(text, width)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}

/// Wrap styled lines to the specified width, preserving span styles.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }

    let mut result = Vec::new();
    for line in lines {
        result.extend(wrap_line(line, width));
    }
    result
}

/// Wrap a single styled line, breaking at the last space where possible.
fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    let total: usize = line
        .spans
        .iter()
        .map(|span| UnicodeWidthStr::width(span.content.as_ref()))
        .sum();
    if total <= width {
        return vec![line];
    }

    let mut chars: Vec<(char, Style)> = Vec::new();
    for span in &line.spans {
        for ch in span.content.chars() {
            chars.push((ch, span.style));
        }
    }

    let mut rows: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<(char, Style)> = Vec::new();
    let mut current_width = 0usize;
    let mut last_space: Option<usize> = None;

    for (ch, style) in chars {
        let ch_width = ch.width().unwrap_or(0);

        if current_width + ch_width > width && !current.is_empty() {
            if let Some(idx) = last_space {
                // Break at the space; it does not carry over.
                let mut rest = current.split_off(idx);
                rest.remove(0);
                rows.push(line_from_chars(&current));
                current = rest;
            } else {
                rows.push(line_from_chars(&current));
                current = Vec::new();
            }
            current_width = current
                .iter()
                .map(|(c, _)| c.width().unwrap_or(0))
                .sum();
            last_space = current.iter().rposition(|(c, _)| *c == ' ');
        }

        if ch == ' ' {
            last_space = Some(current.len());
        }
        current.push((ch, style));
        current_width += ch_width;
    }

    if !current.is_empty() {
        rows.push(line_from_chars(&current));
    }
    rows
}

/// Rebuild a line from styled characters, merging runs of the same style.
fn line_from_chars(chars: &[(char, Style)]) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style: Option<Style> = None;

    for &(ch, style) in chars {
        match run_style {
            Some(current) if current == style => run.push(ch),
            Some(current) => {
                spans.push(Span::styled(std::mem::take(&mut run), current));
                run.push(ch);
                run_style = Some(style);
            }
            None => {
                run.push(ch);
                run_style = Some(style);
            }
        }
    }
    if let Some(style) = run_style {
        spans.push(Span::styled(run, style));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_wrap_text_plain() {
        let wrapped = wrap_text("the quick brown fox jumps over the lazy dog", 15);
        assert!(wrapped.len() > 1);
        assert!(wrapped.iter().all(|l| l.len() <= 15));
    }

    #[test]
    fn test_short_line_is_untouched() {
        let line = Line::from("short");
        let wrapped = wrap_lines(vec![line], 20);
        assert_eq!(wrapped.len(), 1);
        assert_eq!(line_text(&wrapped[0]), "short");
    }

    #[test]
    fn test_wrap_breaks_at_spaces() {
        let line = Line::from("alpha beta gamma delta");
        let wrapped = wrap_lines(vec![line], 11);
        assert!(wrapped.len() >= 2);
        for row in &wrapped {
            let text = line_text(row);
            assert!(text.chars().count() <= 11, "row too wide: {text:?}");
            assert!(!text.starts_with(' '));
        }
    }

    #[test]
    fn test_wrap_hard_splits_unbreakable_runs() {
        let line = Line::from("abcdefghijklmnop");
        let wrapped = wrap_lines(vec![line], 5);
        assert_eq!(wrapped.len(), 4);
        assert_eq!(line_text(&wrapped[0]), "abcde");
    }

    #[test]
    fn test_wrap_preserves_styles() {
        let red = Style::default().fg(Color::Red);
        let blue = Style::default().fg(Color::Blue);
        let line = Line::from(vec![
            Span::styled("red text here ", red),
            Span::styled("blue text here", blue),
        ]);

        let wrapped = wrap_lines(vec![line], 10);
        assert!(wrapped.len() > 1);
        let styles: Vec<Style> = wrapped
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.style))
            .collect();
        assert!(styles.contains(&red));
        assert!(styles.contains(&blue));
    }

    #[test]
    fn test_zero_width_passthrough() {
        let line = Line::from("anything at all");
        let wrapped = wrap_lines(vec![line], 0);
        assert_eq!(wrapped.len(), 1);
    }
}

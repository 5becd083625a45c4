//! Syntax highlighting for fenced code blocks via syntect.

use std::sync::OnceLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme as SyntectTheme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Indentation prefix for code block lines.
pub const CODE_INDENT: &str = "  ";

/// Lazily loaded syntect assets (syntax definitions plus a color theme).
struct HighlightAssets {
    syntax_set: SyntaxSet,
    theme: SyntectTheme,
}

fn assets() -> &'static HighlightAssets {
    static ASSETS: OnceLock<HighlightAssets> = OnceLock::new();
    ASSETS.get_or_init(|| {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .get("base16-eighties.dark")
            .cloned()
            .unwrap_or_else(|| {
                theme_set
                    .themes
                    .values()
                    .next()
                    .cloned()
                    .expect("syntect ships with at least one theme")
            });
        HighlightAssets { syntax_set, theme }
    })
}

/// Highlight a fenced code block by its language tag.
///
/// Returns `None` when the tag is missing or unrecognized so the caller
/// can fall back to unstyled code rendering.
pub fn highlight_code(code: &str, lang: &str) -> Option<Vec<Line<'static>>> {
    if lang.is_empty() {
        return None;
    }
    let assets = assets();
    let syntax = assets.syntax_set.find_syntax_by_token(lang)?;

    let mut highlighter = HighlightLines::new(syntax, &assets.theme);
    let mut lines = Vec::new();

    for raw in LinesWithEndings::from(code) {
        let regions = highlighter.highlight_line(raw, &assets.syntax_set).ok()?;
        let mut spans = vec![Span::raw(CODE_INDENT)];
        for (style, text) in regions {
            let text = text.trim_end_matches('\n');
            if text.is_empty() {
                continue;
            }
            spans.push(Span::styled(
                text.to_string(),
                Style::default().fg(to_ratatui_color(style.foreground)),
            ));
        }
        lines.push(Line::from(spans));
    }

    Some(lines)
}

fn to_ratatui_color(color: syntect::highlighting::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_language_is_highlighted() {
        let lines = highlight_code("fn main() {}\n", "rust").unwrap();
        assert_eq!(lines.len(), 1);
        // More than the indent span means some region got a color.
        assert!(lines[0].spans.len() > 1);
    }

    #[test]
    fn test_unknown_language_falls_back() {
        assert!(highlight_code("whatever\n", "notalanguage").is_none());
    }

    #[test]
    fn test_missing_language_falls_back() {
        assert!(highlight_code("plain text\n", "").is_none());
    }

    #[test]
    fn test_multiline_block_keeps_line_count() {
        let code = "let a = 1;\nlet b = 2;\nlet c = 3;\n";
        let lines = highlight_code(code, "rust").unwrap();
        assert_eq!(lines.len(), 3);
    }
}

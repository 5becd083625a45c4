//! Text rendering utilities: markdown, syntax highlighting, wrapping.

pub mod highlight;
pub mod markdown;
pub mod styles;
pub mod wrap;

pub use markdown::render_markdown;
pub use wrap::{wrap_lines, wrap_text};

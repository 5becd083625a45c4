//! Theme for the parley TUI.

mod colors;

pub use colors::Theme;

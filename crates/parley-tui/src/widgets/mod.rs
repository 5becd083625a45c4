//! Reusable TUI widgets.

mod input_bar;
mod status_bar;
mod text_input;
mod toggle;

pub use input_bar::InputBar;
pub use status_bar::{KeyHint, StatusBar};
pub use text_input::TextInputState;
pub use toggle::Toggle;

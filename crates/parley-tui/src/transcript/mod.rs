//! Conversation transcript: scroll state and rendering.

mod state;
mod widget;

pub use state::{TranscriptState, SCROLL_SPEED};
pub use widget::TranscriptWidget;

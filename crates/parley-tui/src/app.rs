//! Application state and update logic for the parley TUI.

use parley_engine::{ChatClient, ChatState, ClientError, Message};

use crate::event::Action;
use crate::transcript::{TranscriptState, SCROLL_SPEED};
use crate::widgets::TextInputState;

/// Rows scrolled per page up/down.
const PAGE_SCROLL: usize = 10;

/// Application state.
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Conversation state.
    pub chat: ChatState,
    /// HTTP client for the completion endpoint.
    pub client: ChatClient,
    /// Text input state for the message input.
    pub input: TextInputState,
    /// Scroll state for the transcript pane.
    pub transcript: TranscriptState,
    /// Whether the knowledge base is consulted for the next message.
    pub use_rag: bool,
    /// Tick counter for animations.
    pub tick: usize,
}

impl App {
    /// Create a new application around the given client.
    pub fn new(client: ChatClient) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            chat: ChatState::new(),
            client,
            input: TextInputState::new(),
            transcript: TranscriptState::new(),
            use_rag: false,
            tick: 0,
        }
    }

    /// Advance the animation tick.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Handle a global action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.show_help = !self.show_help,
            Action::Back => self.show_help = false,
            Action::ToggleRag => self.use_rag = !self.use_rag,
            Action::ClearChat => self.clear_chat(),
            Action::ScrollUp => self.transcript.scroll_up(SCROLL_SPEED),
            Action::ScrollDown => self.transcript.scroll_down(SCROLL_SPEED),
            Action::PageUp => self.transcript.scroll_up(PAGE_SCROLL),
            Action::PageDown => self.transcript.scroll_down(PAGE_SCROLL),
            Action::JumpToEnd => self.transcript.jump_to_end(),
            Action::None => {}
        }
    }

    /// Clear the conversation. Ignored while a request is in flight so
    /// the pending reply cannot land in an emptied transcript.
    pub fn clear_chat(&mut self) {
        if self.chat.is_loading() {
            return;
        }
        self.chat.clear_messages();
        self.transcript.reset();
    }

    /// Submit the current input.
    ///
    /// Returns the history to send when submission is accepted: the input
    /// must be non-blank and no request may be in flight. The input box
    /// is only consumed on acceptance.
    pub fn submit_input(&mut self) -> Option<Vec<Message>> {
        if self.input.is_blank() || self.chat.is_loading() {
            return None;
        }
        let content = self.input.submit();
        let history = self.chat.begin_send(content).ok()?;
        self.transcript.jump_to_end();
        Some(history)
    }

    /// Settle the in-flight request with the endpoint's result.
    pub fn settle(&mut self, result: Result<String, ClientError>) {
        self.chat.complete_send(result);
    }

    /// Settle the in-flight request after the task itself failed.
    pub fn settle_aborted(&mut self) {
        self.chat.fail_send("the request was interrupted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_engine::{Config, Role};

    fn test_app() -> App {
        let config = Config::default();
        App::new(ChatClient::new(&config).unwrap())
    }

    #[test]
    fn test_rag_defaults_off_and_toggles() {
        let mut app = test_app();
        assert!(!app.use_rag);

        app.handle_action(Action::ToggleRag);
        assert!(app.use_rag);

        app.handle_action(Action::ToggleRag);
        assert!(!app.use_rag);
    }

    #[test]
    fn test_submit_rejects_blank_input() {
        let mut app = test_app();
        app.input.insert_str("   ");
        assert!(app.submit_input().is_none());
        // The draft is kept for the user to fix up.
        assert_eq!(app.input.content(), "   ");
    }

    #[test]
    fn test_submit_appends_user_message_and_loads() {
        let mut app = test_app();
        app.input.insert_str("Hello");

        let history = app.submit_input().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, Role::User);
        assert!(app.chat.is_loading());
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_submit_rejected_while_loading() {
        let mut app = test_app();
        app.input.insert_str("first");
        app.submit_input().unwrap();

        app.input.insert_str("second");
        assert!(app.submit_input().is_none());
        assert_eq!(app.input.content(), "second");
    }

    #[test]
    fn test_settle_success_appends_reply() {
        let mut app = test_app();
        app.input.insert_str("Hello");
        app.submit_input().unwrap();

        app.settle(Ok("Hi there".into()));
        assert!(!app.chat.is_loading());
        assert_eq!(app.chat.messages().len(), 2);
        assert_eq!(app.chat.messages()[1].role, Role::Assistant);
    }

    #[test]
    fn test_settle_aborted_sets_error() {
        let mut app = test_app();
        app.input.insert_str("Hello");
        app.submit_input().unwrap();

        app.settle_aborted();
        assert!(!app.chat.is_loading());
        assert!(app.chat.error().is_some());
        assert_eq!(app.chat.messages().len(), 1);
    }

    #[test]
    fn test_clear_chat_ignored_while_loading() {
        let mut app = test_app();
        app.input.insert_str("Hello");
        app.submit_input().unwrap();

        app.handle_action(Action::ClearChat);
        assert_eq!(app.chat.messages().len(), 1);

        app.settle(Ok("Hi".into()));
        app.handle_action(Action::ClearChat);
        assert!(app.chat.messages().is_empty());
    }

    #[test]
    fn test_help_overlay_toggle_and_dismiss() {
        let mut app = test_app();
        app.handle_action(Action::Help);
        assert!(app.show_help);

        app.handle_action(Action::Back);
        assert!(!app.show_help);
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }
}

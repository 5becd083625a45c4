//! parley-tui: Terminal UI for the parley chat client.
//!
//! This crate provides the TUI layer for parley, including:
//! - Conversation transcript with markdown rendering
//! - Multi-line message input with history recall
//! - Knowledge base toggle and status bar
//! - Help overlay

mod app;
mod event;
pub mod text;
pub mod theme;
pub mod transcript;
pub mod widgets;

pub use app::App;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use parley_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame, Terminal,
};
use std::io::{self, stdout};

use parley_engine::{ChatClient, ClientError, Config};
use theme::Theme;
use transcript::{TranscriptWidget, SCROLL_SPEED};
use widgets::{InputBar, KeyHint, StatusBar, Toggle};

/// Key hints shown in the status bar.
const KEY_HINTS: [KeyHint; 5] = [
    KeyHint::new("Enter", "send"),
    KeyHint::new("Ctrl+J", "newline"),
    KeyHint::new("Ctrl+R", "knowledge base"),
    KeyHint::new("Ctrl+L", "clear"),
    KeyHint::new("F1", "help"),
];

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// runs the event loop, and restores the terminal on exit.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = ChatClient::new(config)?;

    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client);

    // Create event handler (4 Hz tick rate = 250ms)
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

/// In-flight completion request.
type RequestHandle = tokio::task::JoinHandle<Result<String, ClientError>>;

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    let theme = Theme::default();

    // At most one completion request is in flight at a time.
    let mut request: Option<RequestHandle> = None;

    loop {
        terminal.draw(|frame| draw(frame, app, &theme))?;

        // Handle events
        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if !handle_chat_key(app, key, &mut request) {
                        let action = event::key_to_action(key);
                        app.handle_action(action);
                    }
                }
                Event::Mouse(mouse) => {
                    use crossterm::event::MouseEventKind;
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.transcript.scroll_up(SCROLL_SPEED),
                        MouseEventKind::ScrollDown => app.transcript.scroll_down(SCROLL_SPEED),
                        _ => {}
                    }
                }
                Event::Tick => {
                    app.tick();
                }
                Event::Resize(_, _) => {
                    // Terminal handles resize on the next draw
                }
            }
        }

        // Settle the in-flight request once its task finishes
        if request.as_ref().is_some_and(tokio::task::JoinHandle::is_finished) {
            if let Some(handle) = request.take() {
                match handle.await {
                    Ok(result) => app.settle(result),
                    Err(_) => app.settle_aborted(),
                }
            }
        }

        if app.should_quit {
            // Abort the pending request so no reply lands after teardown
            if let Some(handle) = request.take() {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Handle key input for the message input field.
///
/// Returns true if the key was consumed by the input (should not be
/// processed as a global action).
fn handle_chat_key(app: &mut App, key: KeyEvent, request: &mut Option<RequestHandle>) -> bool {
    if app.show_help {
        return false;
    }

    // Ctrl+Enter / Ctrl+J insert a newline
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Enter || key.code == KeyCode::Char('j') {
            app.input.insert_newline();
            return true;
        }
        // Let the action handler deal with Ctrl+C, Ctrl+R, etc.
        return false;
    }

    match key.code {
        KeyCode::Enter => {
            if let Some(history) = app.submit_input() {
                let client = app.client.clone();
                let use_rag = app.use_rag;
                *request = Some(tokio::spawn(async move {
                    client.complete(&history, use_rag).await
                }));
            }
            true
        }
        KeyCode::Char(c) => {
            app.input.insert(c);
            true
        }
        KeyCode::Backspace => {
            app.input.backspace();
            true
        }
        KeyCode::Delete => {
            app.input.delete();
            true
        }
        KeyCode::Left => {
            app.input.move_left();
            true
        }
        KeyCode::Right => {
            app.input.move_right();
            true
        }
        KeyCode::Home => {
            app.input.move_home();
            true
        }
        KeyCode::Up => {
            app.input.history_prev();
            true
        }
        KeyCode::Down => {
            app.input.history_next();
            true
        }
        _ => false,
    }
}

/// Draw the full screen: transcript, input bar, status row.
fn draw(frame: &mut Frame<'_>, app: &mut App, theme: &Theme) {
    let input_height = InputBar::desired_height(&app.input);
    let [transcript_area, input_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(input_height),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let transcript = TranscriptWidget::new(app.chat.messages(), theme)
        .error(app.chat.error())
        .waiting(app.chat.is_loading(), app.tick);
    frame.render_stateful_widget(transcript, transcript_area, &mut app.transcript);

    let input_bar = InputBar::new(&app.input, theme)
        .focused(!app.show_help)
        .sending(app.chat.is_loading());
    frame.render_widget(input_bar, input_area);

    let toggle_label = "Knowledge base";
    let toggle_width = u16::try_from(toggle_label.len() + 6).unwrap_or(20);
    let [status_left, status_right] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(toggle_width)])
            .areas(status_area);

    let status = StatusBar::new(app.client.base_url(), &KEY_HINTS, theme);
    frame.render_widget(status, status_left);
    frame.render_widget(Toggle::new(toggle_label, app.use_rag, theme), status_right);

    if app.show_help {
        render_help_overlay(frame.area(), frame.buffer_mut(), theme);
    }
}

/// Render the help overlay centered over the screen.
fn render_help_overlay(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let bindings: [(&str, &str); 10] = [
        ("Enter", "Send message"),
        ("Ctrl+J / Ctrl+Enter", "Insert newline"),
        ("Up / Down", "Recall input history"),
        ("PageUp / PageDown", "Scroll transcript"),
        ("End", "Jump to latest message"),
        ("Ctrl+R", "Toggle knowledge base"),
        ("Ctrl+L", "Clear conversation"),
        ("F1", "Toggle this help"),
        ("Esc", "Close help"),
        ("Ctrl+C", "Quit"),
    ];

    let width = 46.min(area.width);
    let height = u16::try_from(bindings.len() + 2)
        .unwrap_or(u16::MAX)
        .min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let popup = Rect::new(x, y, width, height);

    Clear.render(popup, buf);

    let lines: Vec<Line<'_>> = bindings
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!(" {key:<20}"),
                    Style::default()
                        .fg(theme.secondary)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(*action, Style::default().fg(theme.text)),
            ])
        })
        .collect();

    Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Help ")
                .title_style(Style::default().fg(theme.text))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focused))
                .style(Style::default().bg(theme.surface)),
        )
        .render(popup, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn test_app() -> App {
        let config = Config::default();
        App::new(ChatClient::new(&config).unwrap())
    }

    fn draw_to_content(app: &mut App, width: u16, height: u16) -> String {
        let theme = Theme::default();
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app, &theme)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_initial_screen_shows_placeholder_and_toggle() {
        let mut app = test_app();
        let content = draw_to_content(&mut app, 80, 24);
        assert!(content.contains("Start a conversation"));
        assert!(content.contains("Type your message..."));
        assert!(content.contains("Knowledge base"));
        assert!(content.contains("OFF"));
    }

    #[test]
    fn test_toggle_state_reflected_in_status_row() {
        let mut app = test_app();
        app.handle_action(Action::ToggleRag);
        let content = draw_to_content(&mut app, 80, 24);
        assert!(content.contains(" ON"));
    }

    #[test]
    fn test_conversation_rendered() {
        let mut app = test_app();
        app.input.insert_str("What is a monad?");
        app.submit_input().unwrap();
        app.settle(Ok("A monoid in the category of endofunctors.".into()));

        let content = draw_to_content(&mut app, 80, 24);
        assert!(content.contains("What is a monad?"));
        assert!(content.contains("monoid in the category"));
    }

    #[test]
    fn test_help_overlay_rendered() {
        let mut app = test_app();
        app.handle_action(Action::Help);
        let content = draw_to_content(&mut app, 80, 24);
        assert!(content.contains("Help"));
        assert!(content.contains("Toggle knowledge base"));
    }

    #[test]
    fn test_typing_flows_into_input() {
        let mut app = test_app();
        let mut request = None;
        for c in "hi".chars() {
            let consumed = handle_chat_key(
                &mut app,
                KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE),
                &mut request,
            );
            assert!(consumed);
        }
        assert_eq!(app.input.content(), "hi");
        assert!(request.is_none());
    }

    #[test]
    fn test_ctrl_j_inserts_newline() {
        let mut app = test_app();
        let mut request = None;
        handle_chat_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE),
            &mut request,
        );
        handle_chat_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL),
            &mut request,
        );
        assert_eq!(app.input.content(), "a\n");
    }

    #[test]
    fn test_ctrl_keys_fall_through_to_actions() {
        let mut app = test_app();
        let mut request = None;
        let consumed = handle_chat_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL),
            &mut request,
        );
        assert!(!consumed);
    }

    #[tokio::test]
    async fn test_enter_spawns_request() {
        let mut app = test_app();
        let mut request = None;
        app.input.insert_str("hello");
        let consumed = handle_chat_key(
            &mut app,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            &mut request,
        );
        assert!(consumed);
        assert!(request.is_some());
        assert!(app.chat.is_loading());

        if let Some(handle) = request.take() {
            handle.abort();
        }
    }

    #[tokio::test]
    async fn test_enter_on_blank_input_spawns_nothing() {
        let mut app = test_app();
        let mut request = None;
        let consumed = handle_chat_key(
            &mut app,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            &mut request,
        );
        assert!(consumed);
        assert!(request.is_none());
        assert!(!app.chat.is_loading());
    }
}

//! Transcript scroll state.
//!
//! Follow mode keeps the latest message in view whenever the conversation
//! grows; manual scrolling disengages it, and scrolling back to the bottom
//! (or jumping there) re-engages it. Clamping happens at render time,
//! where the viewport height is known.

/// Rows scrolled per mouse wheel tick.
pub const SCROLL_SPEED: usize = 3;

/// Scroll state for the transcript pane.
#[derive(Debug)]
pub struct TranscriptState {
    /// First visible display row. Clamped during render.
    pub(crate) scroll: usize,
    /// Whether to auto-scroll to the newest content.
    pub(crate) follow: bool,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self {
            scroll: 0,
            follow: true,
        }
    }
}

impl TranscriptState {
    /// Create a new transcript state with follow mode on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether follow mode is engaged.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Current scroll offset (first visible row).
    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    /// Scroll up by `rows`. Disengages follow mode.
    pub fn scroll_up(&mut self, rows: usize) {
        self.follow = false;
        self.scroll = self.scroll.saturating_sub(rows);
    }

    /// Scroll down by `rows`. Follow mode re-engages once the bottom is
    /// reached (detected at render time).
    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_add(rows);
    }

    /// Jump to the newest content and re-engage follow mode.
    pub fn jump_to_end(&mut self) {
        self.follow = true;
    }

    /// Reset to the initial state (used when the conversation is cleared).
    pub fn reset(&mut self) {
        self.scroll = 0;
        self.follow = true;
    }

    /// Clamp the offset against the rendered content and settle follow
    /// mode. Called by the widget once the viewport is known.
    pub(crate) fn clamp(&mut self, total_rows: usize, viewport_rows: usize) {
        let max_scroll = total_rows.saturating_sub(viewport_rows);
        if self.follow {
            self.scroll = max_scroll;
        } else {
            self.scroll = self.scroll.min(max_scroll);
            if self.scroll == max_scroll {
                self.follow = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_following() {
        let state = TranscriptState::new();
        assert!(state.is_following());
        assert_eq!(state.scroll_offset(), 0);
    }

    #[test]
    fn test_scroll_up_disengages_follow() {
        let mut state = TranscriptState::new();
        state.clamp(50, 10);
        assert_eq!(state.scroll_offset(), 40);

        state.scroll_up(5);
        assert!(!state.is_following());
        assert_eq!(state.scroll_offset(), 35);
    }

    #[test]
    fn test_follow_tracks_new_content() {
        let mut state = TranscriptState::new();
        state.clamp(50, 10);
        assert_eq!(state.scroll_offset(), 40);

        // More content arrives; follow keeps the bottom in view.
        state.clamp(60, 10);
        assert_eq!(state.scroll_offset(), 50);
    }

    #[test]
    fn test_scrolling_back_to_bottom_reengages_follow() {
        let mut state = TranscriptState::new();
        state.clamp(50, 10);
        state.scroll_up(5);
        assert!(!state.is_following());

        state.scroll_down(100);
        state.clamp(50, 10);
        assert!(state.is_following());
        assert_eq!(state.scroll_offset(), 40);
    }

    #[test]
    fn test_jump_to_end() {
        let mut state = TranscriptState::new();
        state.clamp(50, 10);
        state.scroll_up(20);

        state.jump_to_end();
        state.clamp(50, 10);
        assert!(state.is_following());
        assert_eq!(state.scroll_offset(), 40);
    }

    #[test]
    fn test_clamp_with_short_content() {
        let mut state = TranscriptState::new();
        state.scroll_down(99);
        state.clamp(5, 10);
        assert_eq!(state.scroll_offset(), 0);
    }

    #[test]
    fn test_reset() {
        let mut state = TranscriptState::new();
        state.clamp(50, 10);
        state.scroll_up(7);

        state.reset();
        assert!(state.is_following());
        assert_eq!(state.scroll_offset(), 0);
    }
}

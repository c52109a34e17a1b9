/// Command history with shell-style up/down recall
///
/// The cursor ranges over `[0, len]`; `len` means "fresh line, not
/// recalling". Recall never wraps and never underflows.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a submitted command and park the cursor on the fresh line
    pub fn record(&mut self, command: &str) {
        self.entries.push(command.to_string());
        self.cursor = self.entries.len();
    }

    /// Step back one entry (Up)
    ///
    /// Stays on the oldest entry once reached. Returns `None` when there is
    /// no history at all.
    pub fn previous(&mut self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        Some(self.entries[self.cursor].clone())
    }

    /// Step forward one entry (Down)
    ///
    /// Past the newest entry the cursor parks on the fresh line and the
    /// input goes blank.
    pub fn next(&mut self) -> String {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            self.entries[self.cursor].clone()
        } else {
            self.cursor = self.entries.len();
            String::new()
        }
    }

    /// Park the cursor on the fresh line
    pub fn reset_cursor(&mut self) {
        self.cursor = self.entries.len();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recall_walks_back_and_clamps_at_oldest() {
        let mut history = History::new();
        history.record("ls");
        history.record("pwd");
        assert_eq!(history.cursor(), 2);

        assert_eq!(history.previous().as_deref(), Some("pwd"));
        assert_eq!(history.cursor(), 1);
        assert_eq!(history.previous().as_deref(), Some("ls"));
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.previous().as_deref(), Some("ls"));
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn recall_walks_forward_then_blanks_the_line() {
        let mut history = History::new();
        history.record("ls");
        history.record("pwd");
        history.previous();
        history.previous();
        assert_eq!(history.cursor(), 0);

        assert_eq!(history.next(), "pwd");
        assert_eq!(history.cursor(), 1);
        assert_eq!(history.next(), "");
        assert_eq!(history.cursor(), 2);
    }

    #[test]
    fn previous_on_empty_history_is_none() {
        let mut history = History::new();
        assert_eq!(history.previous(), None);
        assert_eq!(history.next(), "");
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn record_resets_cursor_to_fresh_line() {
        let mut history = History::new();
        history.record("ls");
        history.previous();
        assert_eq!(history.cursor(), 0);
        history.record("pwd");
        assert_eq!(history.cursor(), 2);
    }

    #[test]
    fn cursor_stays_in_range_over_mixed_use() {
        let mut history = History::new();
        for i in 0..5 {
            history.record(&format!("cmd-{i}"));
            history.previous();
            history.next();
            assert!(history.cursor() <= history.len());
        }
    }
}

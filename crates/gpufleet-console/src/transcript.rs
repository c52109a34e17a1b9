use super::MAX_TRANSCRIPT_CHARS;

/// Bounded transcript of a console session
///
/// Holds a single normalized text blob. Appends join with one line feed and
/// the oldest content is silently dropped once the cap is exceeded, so the
/// most recent output always survives.
#[derive(Debug, Default)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk, normalizing line endings first
    ///
    /// An empty chunk still counts as an append: the caller gets a fresh
    /// render even when a command produced no output.
    pub fn append(&mut self, chunk: &str) {
        let normalized = normalize_newlines(chunk);
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(&normalized);
        self.enforce_cap();
    }

    /// Reset to an empty transcript
    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Keep only the trailing `MAX_TRANSCRIPT_CHARS` characters
    fn enforce_cap(&mut self) {
        let total = self.text.chars().count();
        if total <= MAX_TRANSCRIPT_CHARS {
            return;
        }
        let drop = total - MAX_TRANSCRIPT_CHARS;
        let cut = self
            .text
            .char_indices()
            .nth(drop)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        self.text = self.text.split_off(cut);
    }
}

/// Collapse all line-ending styles to a single `\n` convention
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

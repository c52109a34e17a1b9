/// Events surfaced to the presentation layer
///
/// The console core owns no rendering; it reports state changes keyed by
/// host and the presentation layer draws them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// The prompt should re-render with this working directory
    PromptChanged { host: String, cwd: String },
    /// Full transcript text to render (placeholder when empty)
    TranscriptChanged { host: String, text: String },
    /// A dispatch started or finished for this session
    BusyChanged { host: String, busy: bool },
    /// Exit code of the last completed dispatch, `None` when unknown
    ExitCodeReported { host: String, exit_code: Option<i32> },
    /// Lightweight user-facing notice (failures, rejected input)
    Notice { host: String, message: String },
}

impl ConsoleEvent {
    /// Host this event belongs to
    pub fn host(&self) -> &str {
        match self {
            Self::PromptChanged { host, .. }
            | Self::TranscriptChanged { host, .. }
            | Self::BusyChanged { host, .. }
            | Self::ExitCodeReported { host, .. }
            | Self::Notice { host, .. } => host,
        }
    }
}

/// Receiver for console events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ConsoleEvent);
}

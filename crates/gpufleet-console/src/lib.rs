// Remote command console module
//
// This module turns user keystrokes into a well-ordered series of remote
// command executions against a stateful per-host working directory, with
// history recall, shell-style tab completion, at most one dispatch in
// flight per session, and bounded transcript retention.

pub mod completion;
mod error;
mod events;
mod history;
mod http_remote;
mod logger;
mod manager;
pub mod remote;
mod session;
mod transcript;

// Re-export public API
pub use error::RemoteError;
pub use events::{ConsoleEvent, EventSink};
pub use http_remote::HttpRemoteShell;
pub use manager::{ConsoleManager, SubmitOutcome, TabOutcome};
pub use remote::RemoteShell;

// Constants
pub const MAX_TRANSCRIPT_CHARS: usize = 60_000;
pub const OUTPUT_PLACEHOLDER: &str = "Output will appear here.";

//! Shared wire types for the gpufleet dashboard
//!
//! This crate provides the request and response shapes exchanged with the
//! dashboard server's remote command endpoints.

use serde::{Deserialize, Serialize};

// ============================================================================
// Command execution
// ============================================================================

/// Request body for `/api/command`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub host: String,
    pub command: String,
    /// Known working directory, or empty when the server should pick the
    /// login directory.
    #[serde(default)]
    pub cwd: String,
}

/// Result of a single remote command execution
///
/// `ok` is authoritative for `exit_code`; a nonzero exit with `ok: true` is a
/// normal result, while `ok: false` signals the server refused or failed to
/// run the command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutcome {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub exit_code: Option<i32>,
    /// Directory the shell ended up in, so `cd` is observable.
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

// ============================================================================
// Tab completion
// ============================================================================

/// What the token under the caret is completed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionMode {
    /// Executables and shell builtins
    Command,
    /// Filesystem entries relative to the session cwd
    File,
}

impl std::fmt::Display for CompletionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Request body for `/api/command-complete`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteRequest {
    pub host: String,
    #[serde(default)]
    pub cwd: String,
    pub prefix: String,
    pub mode: CompletionMode,
}

/// Candidate set returned by the completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOutcome {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub matches: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

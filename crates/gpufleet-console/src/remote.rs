/// Remote shell abstraction over the dashboard's command endpoints
use async_trait::async_trait;

use gpufleet_types::{CommandOutcome, CompletionMode, CompletionOutcome};

use super::error::RemoteError;

/// Remote command collaborator
///
/// Runs commands and lists completion candidates on a fleet host over the
/// existing remote-shell channel. Implementations own framing, timeouts and
/// retries; the console core only sequences calls.
#[async_trait]
pub trait RemoteShell: Send + Sync {
    /// Run `command` in a shell on `host`
    ///
    /// `cwd` is the known working directory, or empty when the server
    /// should fall back to the login directory. The outcome reports the
    /// directory the shell ended up in so `cd` is observable.
    async fn execute(
        &self,
        host: &str,
        command: &str,
        cwd: &str,
    ) -> Result<CommandOutcome, RemoteError>;

    /// List completion candidates for `prefix` on `host`
    async fn complete(
        &self,
        host: &str,
        cwd: &str,
        prefix: &str,
        mode: CompletionMode,
    ) -> Result<CompletionOutcome, RemoteError>;

    /// Collaborator name for diagnostics
    fn shell_name(&self) -> &str;
}

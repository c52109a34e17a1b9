/// HTTP remote shell backed by the dashboard server's command endpoints
use async_trait::async_trait;

use gpufleet_types::{
    CommandOutcome, CompleteRequest, CompletionMode, CompletionOutcome, ExecuteRequest,
};

use super::error::RemoteError;
use super::remote::RemoteShell;

pub struct HttpRemoteShell {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemoteShell {
    /// Point at a dashboard server, e.g. `http://127.0.0.1:8000`
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl RemoteShell for HttpRemoteShell {
    async fn execute(
        &self,
        host: &str,
        command: &str,
        cwd: &str,
    ) -> Result<CommandOutcome, RemoteError> {
        let request = ExecuteRequest {
            host: host.to_string(),
            command: command.to_string(),
            cwd: cwd.to_string(),
        };

        let response = self
            .client
            .post(self.endpoint("/api/command"))
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let raw = response.text().await?;

        let parsed: Option<CommandOutcome> = if raw.is_empty() {
            None
        } else {
            serde_json::from_str(&raw).ok()
        };
        match parsed {
            Some(outcome) if status.is_success() => Ok(outcome),
            _ => Err(RemoteError::Api(error_message(&raw, "Command failed."))),
        }
    }

    async fn complete(
        &self,
        host: &str,
        cwd: &str,
        prefix: &str,
        mode: CompletionMode,
    ) -> Result<CompletionOutcome, RemoteError> {
        let request = CompleteRequest {
            host: host.to_string(),
            cwd: cwd.to_string(),
            prefix: prefix.to_string(),
            mode,
        };

        let response = self
            .client
            .post(self.endpoint("/api/command-complete"))
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RemoteError::Api("Completion failed.".to_string()));
        }

        let raw = response.text().await?;
        let outcome: CompletionOutcome = serde_json::from_str(&raw)?;
        Ok(outcome)
    }

    fn shell_name(&self) -> &str {
        "http"
    }
}

/// Best message for a failed call: the server's `error` field, else the raw
/// body, else the fallback
fn error_message(raw: &str, fallback: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) {
        if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }
    if raw.trim().is_empty() {
        fallback.to_string()
    } else {
        raw.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_server_error_field() {
        assert_eq!(
            error_message(r#"{"ok": false, "error": "host unreachable"}"#, "Command failed."),
            "host unreachable"
        );
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(
            error_message("502 Bad Gateway\n", "Command failed."),
            "502 Bad Gateway"
        );
    }

    #[test]
    fn error_message_uses_fallback_for_empty_body() {
        assert_eq!(error_message("", "Command failed."), "Command failed.");
        assert_eq!(error_message("  \n", "Command failed."), "Command failed.");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let shell = HttpRemoteShell::new("http://localhost:8000/");
        assert_eq!(shell.endpoint("/api/command"), "http://localhost:8000/api/command");
    }
}

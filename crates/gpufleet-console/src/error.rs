use thiserror::Error;

/// Failure talking to the remote shell collaborator
///
/// A command that ran and exited nonzero is NOT an error here; that comes
/// back as a normal `CommandOutcome`. These variants cover the transport
/// and protocol layer only.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Network-level failure reaching the dashboard server
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status or explicit server rejection, with the
    /// human-readable message the server supplied
    #[error("{0}")]
    Api(String),

    /// Response body that could not be parsed
    #[error("unparsable response: {0}")]
    Malformed(#[from] serde_json::Error),
}

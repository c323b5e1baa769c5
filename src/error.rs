use reqwest::StatusCode;

/// Failure taxonomy for the audit pipeline.
///
/// Empty results (zero followers, zero followed channels) are valid
/// terminal states, not errors. Nothing here is fatal to the process —
/// every failure path returns control to the CLI.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No token was captured: listener bind failure, browser launch
    /// failure, a redirect without an access token, or a timeout.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network/DNS/TLS fault before a response arrived.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-2xx response. The body is kept as the diagnostic.
    #[error("API returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// The response arrived but its body could not be deserialized.
    #[error("failed to parse response: {0}")]
    Parse(#[source] reqwest::Error),
}

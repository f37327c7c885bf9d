use thiserror::Error;

/// Errors returned by the ad-library API client.
#[derive(Debug, Error)]
pub enum AdLibraryError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 — the remote throttled us. Retried with a long cooldown.
    #[error("rate limited by remote (HTTP 429)")]
    RateLimited,

    /// HTTP 500/503 — transient remote failure. Retried with a short delay.
    #[error("transient server error (HTTP {status})")]
    ServerError { status: u16 },

    /// HTTP 400/401/403 — misconfigured credential or request. Never
    /// retried; aborts the current run's fetch phase.
    #[error("request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Any other non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AdLibraryError {
    /// `true` for the misconfiguration class (400/401/403) that must fail
    /// the whole run rather than degrade to a partial page result.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, AdLibraryError::Rejected { .. })
    }
}

use thiserror::Error;

/// Top-level error type for the `wirelesstag-api` crate.
///
/// Covers every failure mode of the cloud transport: sign-in, HTTP,
/// ASP.NET service faults and payload decoding. `wirelesstag-core`
/// passes these through unchanged.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Sign-in rejected, or the session cookie is missing or expired.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Service ─────────────────────────────────────────────────────
    /// Fault raised by the vendor web service.
    ///
    /// ASP.NET services report faults as
    /// `{"Message": "...", "ExceptionType": "..."}` with HTTP 500.
    #[error("API error: {message}")]
    Api {
        message: String,
        exception: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and signing in again might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// The .NET exception type reported by the service, if any.
    pub fn exception_type(&self) -> Option<&str> {
        match self {
            Self::Api { exception, .. } => exception.as_deref(),
            _ => None,
        }
    }
}

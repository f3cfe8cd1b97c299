// ── Runtime account configuration ──
//
// Describes how to reach and sign in to the cloud. Built by the CLI from a
// profile; the core never reads config files.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Configuration for one account session.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// Service base URL (e.g., `https://www.mytaglist.com`).
    pub url: Url,
    pub email: String,
    pub password: SecretString,
    /// Request timeout.
    pub timeout: Duration,
}

impl AccountConfig {
    pub fn new(url: Url, email: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            email: email.into(),
            password,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

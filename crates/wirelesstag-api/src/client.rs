// Cloud API HTTP client
//
// Wraps `reqwest::Client` with service URL construction and envelope
// unwrapping. Account-level calls (sign-in, tag managers, tag lists) are
// inherent methods in separate files to keep this module focused on
// transport mechanics.

use std::time::Duration;

use futures_util::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Production endpoint of the Wireless Sensor Tags cloud.
pub const DEFAULT_BASE_URL: &str = "https://www.mytaglist.com";

/// The single primitive the core consumes: one service call.
///
/// Implementations resolve to the payload already unwrapped from the
/// transport envelope, or fail with a transport/API error. They do not
/// retry on their own.
pub trait CallApi: Send + Sync {
    fn call_api<'a>(&'a self, endpoint: &'a str, body: Value) -> BoxFuture<'a, Result<Value, Error>>;
}

/// ASP.NET fault body, returned with HTTP 500.
#[derive(serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ServiceFault {
    message: Option<String>,
    exception_type: Option<String>,
}

/// Raw HTTP client for the Wireless Sensor Tags JSON web services.
///
/// Every service method is a `POST` of a JSON body; responses come back
/// wrapped as `{ "d": payload }`. All methods return the unwrapped
/// payload -- the envelope is stripped before the caller sees it.
pub struct WirelessTagClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl WirelessTagClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (the session lives in a cookie).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: config.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        }
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the full URL for a service path such as `/ethClient.asmx/GetTagList`.
    pub(crate) fn service_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// POST a JSON body to a service path and unwrap the `d` envelope.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, Error> {
        let url = self.service_url(path)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        Self::parse_envelope(resp).await
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Parse the `{ "d": ... }` envelope, returning the payload on success.
    ///
    /// Service faults arrive as HTTP 500 with a `{Message, ExceptionType}`
    /// body; authentication failures as 401/403 or as a fault whose
    /// exception type names an authentication problem.
    async fn parse_envelope(resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("session expired or not signed in (HTTP {status})"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            if let Ok(fault) = serde_json::from_str::<ServiceFault>(&body) {
                let message = fault.message.unwrap_or_else(|| format!("HTTP {status}"));
                let is_auth = fault
                    .exception_type
                    .as_deref()
                    .is_some_and(|t| t.contains("Authentication") || t.contains("Unauthorized"));
                return Err(if is_auth {
                    Error::Authentication { message }
                } else {
                    Error::Api {
                        message,
                        exception: fault.exception_type,
                    }
                });
            }
            return Err(Error::Api {
                message: format!("HTTP {status}: {}", preview(&body)),
                exception: None,
            });
        }

        if body.trim().is_empty() {
            trace!("empty response body");
            return Ok(Value::Null);
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;

        match value {
            Value::Object(mut map) if map.contains_key("d") => {
                trace!("unwrapped service envelope");
                Ok(map.remove("d").unwrap_or(Value::Null))
            }
            other => Ok(other),
        }
    }
}

impl CallApi for WirelessTagClient {
    fn call_api<'a>(&'a self, endpoint: &'a str, body: Value) -> BoxFuture<'a, Result<Value, Error>> {
        Box::pin(async move { self.post(endpoint, &body).await })
    }
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use wirelesstag_api::Error as ApiError;
use wirelesstag_config::ConfigError;
use wirelesstag_core::{CoreError, SensorType};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const INCOMPLETE: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Wireless Tag service")]
    #[diagnostic(
        code(wtag::connection_failed),
        help("Check your network connection and the profile's url.")
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(wtag::timeout),
        help("Raise `timeout` in your profile or check that the tag manager is online.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(wtag::auth_failed),
        help("Verify the profile's email and its password source (password_env, keyring or config).")
    )]
    AuthFailed { message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(wtag::no_credentials),
        help(
            "Store one in the system keyring under service 'wirelesstag',\n\
             set password_env in the profile, or export WTAG_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(wtag::not_found),
        help("Run: wtag {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Sensor operations ────────────────────────────────────────────
    #[error("'{operation}' is not supported by {sensor_type} sensors")]
    #[diagnostic(code(wtag::unsupported))]
    Unsupported {
        operation: String,
        sensor_type: SensorType,
    },

    #[error("{operation} on {entity} was sent but not confirmed after {attempts} checks")]
    #[diagnostic(
        code(wtag::incomplete),
        help("The tag may be out of range or asleep. Check again with: wtag sensors <tag>")
    )]
    Incomplete {
        operation: String,
        entity: String,
        attempts: u32,
    },

    #[error("API error: {message}")]
    #[diagnostic(code(wtag::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wtag::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(wtag::profile_not_found),
        help("Add a [profiles.{name}] table to {path}")
    )]
    ProfileNotFound { name: String, path: String },

    #[error("{0}")]
    #[diagnostic(code(wtag::config))]
    Config(String),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Incomplete { .. } => exit_code::INCOMPLETE,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Api { .. } | Self::Config(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unsupported {
                operation,
                sensor_type,
            } => Self::Unsupported {
                operation,
                sensor_type,
            },

            CoreError::Incomplete {
                operation,
                entity,
                attempts,
            } => Self::Incomplete {
                operation,
                entity,
                attempts,
            },

            CoreError::UnknownProperty { name, sensor_type } => Self::NotFound {
                resource_type: format!("{sensor_type} property"),
                identifier: name,
                list_command: "config show <tag> <sensor>".into(),
            },

            CoreError::Range { message } => Self::Validation {
                field: "value".into(),
                reason: message,
            },

            CoreError::ReadOnly { name } => Self::Validation {
                field: name,
                reason: "property is read-only".into(),
            },

            CoreError::WriteOnly { name } => Self::Validation {
                field: name,
                reason: "property is write-only".into(),
            },

            CoreError::Schema { message } | CoreError::Payload { message } => {
                Self::Api { message }
            }

            CoreError::Api(api) => api.into(),
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Authentication { message } => Self::AuthFailed { message },
            ApiError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            ApiError::Transport(e) => Self::ConnectionFailed {
                source: Box::new(e),
            },
            ApiError::Tls(message) => Self::ConnectionFailed {
                source: message.into(),
            },
            ApiError::InvalidUrl(e) => Self::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },
            ApiError::Api { message, .. } | ApiError::Deserialization { message, .. } => {
                Self::Api { message }
            }
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { profile } => Self::ProfileNotFound {
                name: profile,
                path: wirelesstag_config::config_path().display().to_string(),
            },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Figment(e) => Self::Config(e.to_string()),
        }
    }
}

// ── Core error types ──
//
// Errors surfaced by sensors, monitoring configs and the account facade.
// Transport failures pass through untouched in `Api`; everything else is
// a statement about this crate's own contract.

use thiserror::Error;

use crate::model::SensorType;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Operation errors ─────────────────────────────────────────────
    /// The sensor type has no endpoint for this operation.
    #[error("Operation not supported: {operation} on {sensor_type} sensor")]
    Unsupported {
        operation: String,
        sensor_type: SensorType,
    },

    /// The call went through but the expected state never showed up.
    #[error("Operation incomplete: {operation} on {entity} unconfirmed after {attempts} attempts")]
    Incomplete {
        operation: String,
        entity: String,
        attempts: u32,
    },

    // ── Value errors ─────────────────────────────────────────────────
    /// Value outside a lookup table, or not convertible.
    #[error("Value out of range: {message}")]
    Range { message: String },

    // ── Schema errors ────────────────────────────────────────────────
    #[error("Unknown property '{name}' for {sensor_type}")]
    UnknownProperty {
        name: String,
        sensor_type: SensorType,
    },

    #[error("Property '{name}' is read-only")]
    ReadOnly { name: String },

    #[error("Property '{name}' is write-only")]
    WriteOnly { name: String },

    #[error("Schema error: {message}")]
    Schema { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    /// A response or tag record did not have the expected shape.
    #[error("Unexpected payload: {message}")]
    Payload { message: String },

    // ── Transport (passed through) ───────────────────────────────────
    #[error(transparent)]
    Api(#[from] wirelesstag_api::Error),
}

impl CoreError {
    pub(crate) fn range(message: impl Into<String>) -> Self {
        Self::Range {
            message: message.into(),
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    pub(crate) fn payload(message: impl Into<String>) -> Self {
        Self::Payload {
            message: message.into(),
        }
    }

    /// Returns `true` for failures a caller can avoid by checking
    /// `can_arm()` / `can_disarm()` first.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Returns `true` when retries were exhausted without confirmation.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete { .. })
    }
}

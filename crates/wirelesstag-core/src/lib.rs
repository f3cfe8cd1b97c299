// wirelesstag-core: Property mapping, monitoring configuration and arming
// for Wireless Sensor Tags.
//
// Raw vendor records flow in through `wirelesstag-api`; tags hold them,
// sensors expose typed, unit-aware properties over them, and monitoring
// configs track local edits until they are saved.

pub mod account;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod model;
pub mod monitoring;
pub mod property;
pub mod schema;
pub mod sensor;
pub mod tag;
pub mod xforms;

mod arming;
mod retry;

// ── Primary re-exports ──────────────────────────────────────────────
pub use account::Account;
pub use config::AccountConfig;
pub use endpoints::ApiEndpoints;
pub use error::CoreError;
pub use model::{RawStore, SensorType, TagCapabilities, TempUnit};
pub use monitoring::{ConfigAction, ConfigEvent, MonitoringConfig};
pub use property::{PropertyGroup, PropertyHost};
pub use sensor::Sensor;
pub use tag::Tag;

// Transport types callers need when injecting their own collaborator.
pub use wirelesstag_api::{CallApi, TagManagerInfo};

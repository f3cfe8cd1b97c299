// ── Domain model ──
//
// Closed enums and value types shared by the schema tables, entities
// and the CLI.

pub mod sensor_type;
pub mod tag_type;

// ── Re-exports ──────────────────────────────────────────────────────

pub use sensor_type::{SensorType, TempUnit};
pub use tag_type::TagCapabilities;

/// A raw vendor attribute map, replaced wholesale on every fetch.
pub type RawStore = serde_json::Map<String, serde_json::Value>;

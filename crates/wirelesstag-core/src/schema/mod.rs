// ── Schema tables ──
//
// Initialization-time property tables per sensor kind: one table for
// sensor properties (backed by the tag's store), one for monitoring
// config properties (backed by the config's store).

mod config;
mod sensor;

use serde_json::Value;

use crate::error::CoreError;
use crate::model::{SensorType, TagCapabilities, TempUnit};
use crate::property::PropertySchema;
use crate::xforms::{EnumTable, Label};

pub use config::CONFIG_SCHEMAS;
pub use sensor::SENSOR_SCHEMAS;

/// Event-state labels that mean the sensor is not being monitored.
pub const UNMONITORED_STATES: &[&str] = &["Disarmed", "Not Monitoring", "N.A."];

// ── Enum tables ─────────────────────────────────────────────────────

pub static TEMP_EVENT_STATES: EnumTable = EnumTable {
    name: "temperature event state",
    entries: &[
        (0, Label::Text("Disarmed")),
        (1, Label::Text("Normal")),
        (2, Label::Text("Too Hot")),
        (3, Label::Text("Too Cold")),
    ],
};

pub static CAP_EVENT_STATES: EnumTable = EnumTable {
    name: "humidity event state",
    entries: &[
        (0, Label::Text("Disarmed")),
        (1, Label::Text("Normal")),
        (2, Label::Text("Too Dry")),
        (3, Label::Text("Too Humid")),
    ],
};

pub static MOTION_EVENT_STATES: EnumTable = EnumTable {
    name: "motion event state",
    entries: &[
        (0, Label::Text("Disarmed")),
        (1, Label::Text("Armed")),
        (2, Label::Text("Moved")),
        (3, Label::Text("Opened")),
        (4, Label::Text("Closed")),
        (5, Label::Text("Detected")),
        (6, Label::Text("Timed Out")),
        (7, Label::Text("Stabilizing")),
        (8, Label::Text("Carried Away")),
        (9, Label::Text("In Free Fall")),
    ],
};

pub static LIGHT_EVENT_STATES: EnumTable = EnumTable {
    name: "light event state",
    entries: &[
        (0, Label::Text("Not Monitoring")),
        (1, Label::Text("Normal")),
        (2, Label::Text("Too Dark")),
        (3, Label::Text("Too Bright")),
    ],
};

pub static WATER_EVENT_STATES: EnumTable = EnumTable {
    name: "water event state",
    entries: &[(0, Label::Text("Normal")), (1, Label::Text("Water Detected"))],
};

pub static OUT_OF_RANGE_STATES: EnumTable = EnumTable {
    name: "out-of-range state",
    entries: &[(0, Label::Text("In Range")), (1, Label::Text("Out Of Range"))],
};

pub static CURRENT_EVENT_STATES: EnumTable = EnumTable {
    name: "current event state",
    entries: &[
        (0, Label::Text("Disarmed")),
        (1, Label::Text("Normal")),
        (2, Label::Text("Too High")),
        (3, Label::Text("Too Low")),
    ],
};

/// Out-of-range grace period: code to seconds.
pub static GRACE_PERIODS: EnumTable = EnumTable {
    name: "grace period",
    entries: &[
        (0, Label::Int(0)),
        (1, Label::Int(120)),
        (2, Label::Int(240)),
        (3, Label::Int(360)),
        (4, Label::Int(480)),
        (5, Label::Int(600)),
        (6, Label::Int(900)),
        (7, Label::Int(1200)),
        (8, Label::Int(1800)),
    ],
};

pub static TEMP_UNITS: EnumTable = EnumTable {
    name: "temperature unit",
    entries: &[(0, Label::Text("degC")), (1, Label::Text("degF"))],
};

pub static RESPONSIVENESS: EnumTable = EnumTable {
    name: "responsiveness",
    entries: &[
        (1, Label::Text("Highest")),
        (2, Label::Text("Medium high")),
        (3, Label::Text("Medium")),
        (4, Label::Text("Medium low")),
        (5, Label::Text("Lowest")),
    ],
};

// ── Lookup ──────────────────────────────────────────────────────────

/// Sensor property schema for `kind`.
pub fn sensor_schema(kind: SensorType) -> Result<&'static PropertySchema, CoreError> {
    SENSOR_SCHEMAS.resolve(kind).map(|(_, schema)| schema)
}

/// Monitoring config schema for `kind` on a tag with `caps`.
///
/// Motion-family configs on tags with an accelerometer get the
/// sensitivity and orientation properties merged in.
pub fn config_schema(
    kind: SensorType,
    caps: &TagCapabilities,
) -> Result<&'static PropertySchema, CoreError> {
    let (resolved, schema) = CONFIG_SCHEMAS.resolve(kind)?;
    if resolved == SensorType::Motion && caps.accelerometer {
        return Ok(&*config::MOTION_ACCELEROMETER);
    }
    Ok(schema)
}

/// Decode a raw `temp_unit` code. A missing code means no conversion.
pub(crate) fn unit_from_raw(raw: Option<&Value>) -> Result<Option<TempUnit>, CoreError> {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    match TEMP_UNITS.lookup(Some(raw)) {
        Value::String(label) => label
            .parse()
            .map(Some)
            .map_err(|_| CoreError::range(format!("invalid temperature unit '{label}'"))),
        _ => Err(CoreError::range(format!("invalid temperature unit code {raw}"))),
    }
}

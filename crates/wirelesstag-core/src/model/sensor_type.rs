// ── Sensor kinds and temperature units ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Logical measurement facet of a tag.
///
/// The lowercase name doubles as the key into the schema and endpoint
/// tables (`"outofrange"`, not `"out_of_range"`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SensorType {
    Temp,
    Humidity,
    Moisture,
    Motion,
    Event,
    Light,
    Water,
    Battery,
    #[strum(serialize = "outofrange")]
    #[serde(rename = "outofrange")]
    OutOfRange,
    Current,
    Signal,
}

impl SensorType {
    /// Whether arming a sensor of this kind also closes the door-mode latch.
    pub(crate) fn arms_door_mode(self) -> bool {
        matches!(self, Self::Motion | Self::Event)
    }
}

/// Temperature unit configured on a temperature sensor.
///
/// The vendor stores `temp_unit` as `0` for Celsius and `1` for Fahrenheit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum TempUnit {
    #[strum(serialize = "degC")]
    #[serde(rename = "degC")]
    DegC,
    #[strum(serialize = "degF")]
    #[serde(rename = "degF")]
    DegF,
}

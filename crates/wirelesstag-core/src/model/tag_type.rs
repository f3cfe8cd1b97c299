// ── Hardware capabilities by tag type ──
//
// The cloud reports a numeric `tagType` per tag. Which sensors a tag
// carries follows from that number alone.

use super::SensorType;

const MOTION: &[i64] = &[12, 13, 21, 26, 52, 72];
const ACCELEROMETER: &[i64] = &[12, 13, 21, 26, 52];
const HUMIDITY: &[i64] = &[13, 21, 26, 52, 62, 72];
const MOISTURE: &[i64] = &[32, 33];
const LIGHT: &[i64] = &[26];
const CURRENT: &[i64] = &[42];
const HIGH_PRECISION_TEMP: &[i64] = &[21, 26, 52, 62, 72];
const NO_TEMPERATURE: &[i64] = &[42];

/// Hardware feature flags derived from a tag's `tagType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagCapabilities {
    pub motion: bool,
    pub accelerometer: bool,
    pub temperature: bool,
    pub high_precision_temp: bool,
    pub humidity: bool,
    pub moisture: bool,
    pub water: bool,
    pub light: bool,
    pub current: bool,
}

impl TagCapabilities {
    pub fn for_tag_type(tag_type: i64) -> Self {
        Self {
            motion: MOTION.contains(&tag_type),
            accelerometer: ACCELEROMETER.contains(&tag_type),
            temperature: !NO_TEMPERATURE.contains(&tag_type),
            high_precision_temp: HIGH_PRECISION_TEMP.contains(&tag_type),
            humidity: HUMIDITY.contains(&tag_type),
            moisture: MOISTURE.contains(&tag_type),
            water: MOISTURE.contains(&tag_type),
            light: LIGHT.contains(&tag_type),
            current: CURRENT.contains(&tag_type),
        }
    }

    /// Sensor kinds present on a tag with these capabilities, in a stable
    /// order. Battery, signal and out-of-range apply to every tag.
    pub fn sensor_types(&self) -> Vec<SensorType> {
        let mut kinds = Vec::new();
        if self.temperature {
            kinds.push(SensorType::Temp);
        }
        if self.humidity {
            kinds.push(SensorType::Humidity);
        }
        if self.moisture {
            kinds.push(SensorType::Moisture);
        }
        if self.water {
            kinds.push(SensorType::Water);
        }
        if self.motion {
            kinds.push(SensorType::Motion);
        }
        if self.accelerometer {
            kinds.push(SensorType::Event);
        }
        if self.light {
            kinds.push(SensorType::Light);
        }
        if self.current {
            kinds.push(SensorType::Current);
        }
        kinds.extend([SensorType::Battery, SensorType::Signal, SensorType::OutOfRange]);
        kinds
    }
}

// ── Per-kind service endpoints ──
//
// Which `/ethClient.asmx/` methods arm, disarm, load and save each kind
// of sensor. A `None` means the operation is not available for that kind.

use crate::model::SensorType;

/// Saves the out-of-range grace period, which lives on the tag rather
/// than in the out-of-range config.
pub const SET_OUT_OF_RANGE_GRACE: &str = "/ethClient.asmx/SetOutOfRangeGrace";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApiEndpoints {
    pub arm: Option<&'static str>,
    pub disarm: Option<&'static str>,
    pub load: Option<&'static str>,
    pub save: Option<&'static str>,
    /// Key the load response nests the config under, if any.
    pub payload_key: Option<&'static str>,
}

const TEMP: ApiEndpoints = ApiEndpoints {
    arm: Some("/ethClient.asmx/ArmTempSensor"),
    disarm: Some("/ethClient.asmx/DisarmTempSensor"),
    load: Some("/ethClient.asmx/LoadTempSensorConfig"),
    save: Some("/ethClient.asmx/SaveTempSensorConfig"),
    payload_key: None,
};

const CAP: ApiEndpoints = ApiEndpoints {
    arm: Some("/ethClient.asmx/ArmCapSensor"),
    disarm: Some("/ethClient.asmx/DisarmCapSensor"),
    load: Some("/ethClient.asmx/LoadCapSensorConfig2"),
    save: Some("/ethClient.asmx/SaveCapSensorConfig2"),
    payload_key: Some("rhEvent"),
};

const WATER: ApiEndpoints = ApiEndpoints {
    arm: None,
    disarm: None,
    load: Some("/ethClient.asmx/LoadCapSensorConfig2"),
    save: Some("/ethClient.asmx/SaveCapSensorConfig2"),
    payload_key: Some("shortedEvent"),
};

const MOTION: ApiEndpoints = ApiEndpoints {
    arm: Some("/ethClient.asmx/Arm"),
    disarm: Some("/ethClient.asmx/Disarm"),
    load: Some("/ethClient.asmx/LoadMotionSensorConfig"),
    save: Some("/ethClient.asmx/SaveMotionSensorConfig"),
    payload_key: None,
};

const LIGHT: ApiEndpoints = ApiEndpoints {
    arm: Some("/ethClient.asmx/ArmLightSensor"),
    disarm: Some("/ethClient.asmx/DisarmLightSensor"),
    load: Some("/ethClient.asmx/LoadLightSensorConfig"),
    save: Some("/ethClient.asmx/SaveLightSensorConfig"),
    payload_key: None,
};

const BATTERY: ApiEndpoints = ApiEndpoints {
    arm: None,
    disarm: None,
    load: Some("/ethClient.asmx/LoadLowBatteryConfig"),
    save: Some("/ethClient.asmx/SaveLowBatteryConfig"),
    payload_key: None,
};

const OUT_OF_RANGE: ApiEndpoints = ApiEndpoints {
    arm: None,
    disarm: None,
    load: Some("/ethClient.asmx/LoadOutOfRangeConfig"),
    save: Some("/ethClient.asmx/SaveOutOfRangeConfig"),
    payload_key: None,
};

const CURRENT: ApiEndpoints = ApiEndpoints {
    arm: Some("/ethClient.asmx/ArmCurrentSensor"),
    disarm: Some("/ethClient.asmx/DisarmCurrentSensor"),
    load: Some("/ethClient.asmx/LoadCurrentSensorConfig"),
    save: Some("/ethClient.asmx/SaveCurrentSensorConfig"),
    payload_key: None,
};

const NONE: ApiEndpoints = ApiEndpoints {
    arm: None,
    disarm: None,
    load: None,
    save: None,
    payload_key: None,
};

impl ApiEndpoints {
    pub fn for_kind(kind: SensorType) -> &'static Self {
        match kind {
            SensorType::Temp => &TEMP,
            SensorType::Humidity | SensorType::Moisture => &CAP,
            SensorType::Water => &WATER,
            SensorType::Motion | SensorType::Event => &MOTION,
            SensorType::Light => &LIGHT,
            SensorType::Battery => &BATTERY,
            SensorType::OutOfRange => &OUT_OF_RANGE,
            SensorType::Current => &CURRENT,
            SensorType::Signal => &NONE,
        }
    }

    pub(crate) fn transition(&self, arm: bool) -> Option<&'static str> {
        if arm { self.arm } else { self.disarm }
    }
}

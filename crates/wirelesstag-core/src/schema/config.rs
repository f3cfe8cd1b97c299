// Monitoring config schemas (backed by the config's own raw store)

use std::sync::LazyLock;

use crate::model::SensorType;
use crate::property::{PropertySchema, PropertySpec, SchemaTable};
use crate::xforms;

use super::{RESPONSIVENESS, TEMP_UNITS};

fn notify_settings() -> PropertySpec {
    PropertySpec::group(
        "notifySettings",
        vec![
            PropertySpec::plain("email", "email"),
            PropertySpec::plain("sendEmail", "send_email"),
            PropertySpec::plain("sendPush", "send_push"),
            PropertySpec::plain("sound", "apnsSound"),
            PropertySpec::plain("speech", "beep_pc_tts"),
            PropertySpec::plain("vibrate", "beep_pc_vibrate"),
            PropertySpec::plain("loopSound", "beep_pc_loop"),
        ],
    )
}

/// Thresholds stored in the sensor's own unit.
fn thresholds() -> PropertySpec {
    PropertySpec::group(
        "thresholds",
        vec![
            PropertySpec::plain("lowValue", "th_low"),
            PropertySpec::plain("highValue", "th_high"),
            PropertySpec::plain("hysteresis", "th_window"),
        ],
    )
}

/// Thresholds stored in Celsius, exposed in the configured unit.
fn temp_thresholds() -> PropertySpec {
    PropertySpec::group(
        "thresholds",
        vec![
            PropertySpec::read_write(
                "lowValue",
                "th_low",
                xforms::to_native_temp(false),
                xforms::from_native_temp(false),
            ),
            PropertySpec::read_write(
                "highValue",
                "th_high",
                xforms::to_native_temp(false),
                xforms::from_native_temp(false),
            ),
            PropertySpec::read_write(
                "hysteresis",
                "th_window",
                xforms::to_native_temp(true),
                xforms::from_native_temp(true),
            ),
        ],
    )
}

fn interval() -> PropertySpec {
    PropertySpec::plain("monitoringInterval", "interval")
}

fn motion() -> PropertySchema {
    PropertySchema::new(vec![
        PropertySpec::read_write(
            "responsiveness",
            "interval",
            xforms::enum_get(&RESPONSIVENESS),
            xforms::enum_set(&RESPONSIVENESS),
        ),
        PropertySpec::plain("resetDelay", "auto_reset_delay"),
        PropertySpec::group(
            "doorMode",
            vec![
                PropertySpec::plain("enabled", "door_mode"),
                PropertySpec::plain("delay", "door_mode_delay"),
                PropertySpec::plain("angle", "door_mode_angle"),
            ],
        ),
        notify_settings(),
    ])
}

/// Motion config for tags with an accelerometer.
pub(super) static MOTION_ACCELEROMETER: LazyLock<PropertySchema> = LazyLock::new(|| {
    motion().overlay(vec![
        PropertySpec::plain("sensitivity", "sensitivity"),
        PropertySpec::group(
            "orientation",
            vec![
                PropertySpec::plain("x", "axis_x"),
                PropertySpec::plain("y", "axis_y"),
                PropertySpec::plain("z", "axis_z"),
            ],
        ),
    ])
});

pub static CONFIG_SCHEMAS: LazyLock<SchemaTable> = LazyLock::new(|| {
    let mut table = SchemaTable::new();
    table
        .insert(
            SensorType::Temp,
            PropertySchema::new(vec![
                PropertySpec::read_write(
                    "unit",
                    "temp_unit",
                    xforms::enum_get(&TEMP_UNITS),
                    xforms::enum_set(&TEMP_UNITS),
                ),
                temp_thresholds(),
                interval(),
                notify_settings(),
            ]),
        )
        .insert(
            SensorType::Humidity,
            PropertySchema::new(vec![thresholds(), interval(), notify_settings()]),
        )
        .alias(SensorType::Moisture, SensorType::Humidity)
        .insert(
            SensorType::Water,
            PropertySchema::new(vec![
                PropertySpec::plain("notifyOnClear", "notify_normal"),
                notify_settings(),
            ]),
        )
        .insert(SensorType::Motion, motion())
        .alias(SensorType::Event, SensorType::Motion)
        .insert(
            SensorType::Light,
            PropertySchema::new(vec![thresholds(), interval(), notify_settings()]),
        )
        .insert(
            SensorType::Battery,
            PropertySchema::new(vec![
                PropertySpec::plain("lowBatteryThreshold", "LBTh"),
                PropertySpec::plain("enabled", "enLBN"),
                notify_settings(),
            ]),
        )
        .insert(
            SensorType::OutOfRange,
            PropertySchema::new(vec![
                PropertySpec::delegate("gracePeriod", "gracePeriod"),
                PropertySpec::plain("notifyOnReturn", "notify_back_in_range"),
                notify_settings(),
            ]),
        )
        .insert(
            SensorType::Current,
            PropertySchema::new(vec![thresholds(), interval(), notify_settings()]),
        )
        .insert(SensorType::Signal, PropertySchema::default());
    table
});

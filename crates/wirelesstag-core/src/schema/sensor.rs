// Sensor property schemas (backed by the tag's raw store)

use std::sync::LazyLock;

use crate::model::SensorType;
use crate::property::{PropertySchema, PropertySpec, SchemaTable};
use crate::xforms::{self, EnumTable};

use super::{
    CAP_EVENT_STATES, CURRENT_EVENT_STATES, GRACE_PERIODS, LIGHT_EVENT_STATES,
    MOTION_EVENT_STATES, OUT_OF_RANGE_STATES, TEMP_EVENT_STATES, WATER_EVENT_STATES,
};

fn event_state(source: &'static str, table: &'static EnumTable) -> [PropertySpec; 2] {
    [
        PropertySpec::read_only("eventState", source, xforms::enum_get(table)),
        PropertySpec::derived("eventStateValues", xforms::enum_values(table)),
    ]
}

fn schema<const N: usize>(reading: PropertySpec, rest: [PropertySpec; N]) -> PropertySchema {
    let mut entries = vec![reading];
    entries.extend(rest);
    PropertySchema::new(entries)
}

pub static SENSOR_SCHEMAS: LazyLock<SchemaTable> = LazyLock::new(|| {
    let mut table = SchemaTable::new();
    table
        .insert(
            SensorType::Temp,
            schema(
                PropertySpec::read_only("reading", "temperature", xforms::temp_reading()),
                event_state("tempEventState", &TEMP_EVENT_STATES),
            ),
        )
        .insert(
            SensorType::Humidity,
            schema(
                PropertySpec::read_only("reading", "cap", xforms::rounded(1)),
                event_state("capEventState", &CAP_EVENT_STATES),
            ),
        )
        .alias(SensorType::Moisture, SensorType::Humidity)
        .insert(
            SensorType::Motion,
            schema(
                PropertySpec::read_only(
                    "reading",
                    "eventState",
                    xforms::enum_get(&MOTION_EVENT_STATES),
                ),
                event_state("eventState", &MOTION_EVENT_STATES),
            ),
        )
        .alias(SensorType::Event, SensorType::Motion)
        .insert(
            SensorType::Light,
            schema(
                PropertySpec::read_only("reading", "lux", xforms::rounded(2)),
                event_state("lightEventState", &LIGHT_EVENT_STATES),
            ),
        )
        .insert(
            SensorType::Water,
            schema(
                PropertySpec::read_only("reading", "shorted", xforms::flag()),
                event_state("shorted", &WATER_EVENT_STATES),
            ),
        )
        .insert(
            SensorType::Battery,
            schema(
                PropertySpec::read_only("reading", "batteryVolt", xforms::rounded(2)),
                [PropertySpec::read_only(
                    "remaining",
                    "batteryRemaining",
                    xforms::rounded(2),
                )],
            ),
        )
        .insert(
            SensorType::OutOfRange,
            schema(
                PropertySpec::read_only("reading", "OutOfRange", xforms::flag()),
                [
                    PropertySpec::read_only(
                        "eventState",
                        "OutOfRange",
                        xforms::enum_get(&OUT_OF_RANGE_STATES),
                    ),
                    PropertySpec::derived(
                        "eventStateValues",
                        xforms::enum_values(&OUT_OF_RANGE_STATES),
                    ),
                    PropertySpec::read_write(
                        "gracePeriod",
                        "oorGrace",
                        xforms::enum_get(&GRACE_PERIODS),
                        xforms::enum_set(&GRACE_PERIODS),
                    ),
                ],
            ),
        )
        .insert(
            SensorType::Current,
            schema(
                PropertySpec::read_only("reading", "amp", xforms::rounded(2)),
                event_state("ampEventState", &CURRENT_EVENT_STATES),
            ),
        )
        .insert(
            SensorType::Signal,
            schema(
                PropertySpec::read_only("reading", "signaldBm", xforms::identity()),
                [],
            ),
        );
    table
});

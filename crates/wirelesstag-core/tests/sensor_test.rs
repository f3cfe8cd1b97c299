#![allow(clippy::unwrap_used)]
// Sensor property mapping against a tag's raw store.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;

use common::{StubApi, object, tag};
use wirelesstag_core::{CoreError, SensorType};

fn f64_of(value: &serde_json::Value) -> f64 {
    value.as_f64().unwrap()
}

// ── Temperature ─────────────────────────────────────────────────────

#[test]
fn test_reading_follows_configured_fahrenheit() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 1, "tagType": 13, "temperature": 20.0 }));
    let temp = t.sensor(SensorType::Temp).unwrap();
    temp.set_monitoring_config(object(json!({ "temp_unit": 1 })));

    assert!((f64_of(&temp.reading().unwrap()) - 68.0).abs() < 1e-9);
}

#[test]
fn test_reading_uses_tag_unit_without_config() {
    let api = StubApi::new();
    let t = tag(
        &api,
        json!({ "slaveId": 1, "tagType": 13, "temperature": 20.0, "temp_unit": 1 }),
    );
    let temp = t.sensor(SensorType::Temp).unwrap();

    assert!((f64_of(&temp.reading().unwrap()) - 68.0).abs() < 1e-9);
}

#[test]
fn test_reading_precision_depends_on_hardware() {
    let api = StubApi::new();
    let basic = tag(&api, json!({ "slaveId": 1, "tagType": 13, "temperature": 21.456 }));
    let precise = tag(&api, json!({ "slaveId": 2, "tagType": 21, "temperature": 21.456 }));

    let basic = basic.sensor(SensorType::Temp).unwrap().reading().unwrap();
    let precise = precise.sensor(SensorType::Temp).unwrap().reading().unwrap();

    assert!((f64_of(&basic) - 21.5).abs() < 1e-9);
    assert!((f64_of(&precise) - 21.46).abs() < 1e-9);
}

#[test]
fn test_celsius_passes_through() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 1, "tagType": 13, "temperature": 20.04 }));
    let temp = t.sensor(SensorType::Temp).unwrap();
    temp.set_monitoring_config(object(json!({ "temp_unit": 0 })));

    assert!((f64_of(&temp.reading().unwrap()) - 20.0).abs() < 1e-9);
}

// ── Event state ─────────────────────────────────────────────────────

#[test]
fn test_event_state_decodes_and_arms() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 1, "tagType": 13, "tempEventState": 2 }));
    let temp = t.sensor(SensorType::Temp).unwrap();

    assert_eq!(temp.event_state().unwrap(), json!("Too Hot"));
    assert_eq!(temp.is_armed(), Some(true));
    assert_eq!(
        temp.event_state_values(),
        vec![json!("Disarmed"), json!("Normal"), json!("Too Hot"), json!("Too Cold")]
    );

    t.set_data(object(json!({ "slaveId": 1, "tagType": 13, "tempEventState": 0 })));
    assert_eq!(temp.is_armed(), Some(false));
}

#[test]
fn test_light_not_monitoring_is_disarmed() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 1, "tagType": 26, "lightEventState": 0, "lux": 12.3456 }));
    let light = t.sensor(SensorType::Light).unwrap();

    assert_eq!(light.is_armed(), Some(false));
    assert!((f64_of(&light.reading().unwrap()) - 12.35).abs() < 1e-9);
}

#[test]
fn test_sensor_without_event_state() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 1, "signaldBm": -72 }));
    let signal = t.sensor(SensorType::Signal).unwrap();

    assert_eq!(signal.reading().unwrap(), json!(-72));
    assert_eq!(signal.is_armed(), None);
    assert!(signal.event_state_values().is_empty());
    assert!(matches!(
        signal.event_state(),
        Err(CoreError::UnknownProperty { .. })
    ));
}

#[test]
fn test_water_state_from_boolean() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 1, "tagType": 32, "shorted": true }));
    let water = t.sensor(SensorType::Water).unwrap();

    assert_eq!(water.reading().unwrap(), json!(true));
    assert_eq!(water.event_state().unwrap(), json!("Water Detected"));
}

#[test]
fn test_reading_is_read_only() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 1, "temperature": 20.0 }));
    let temp = t.sensor(SensorType::Temp).unwrap();

    assert!(matches!(
        temp.set("reading", json!(30)),
        Err(CoreError::ReadOnly { .. })
    ));
    assert_eq!(t.raw("temperature"), Some(json!(20.0)));
}

// ── Aliases ─────────────────────────────────────────────────────────

#[test]
fn test_moisture_aliases_humidity() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 1, "tagType": 32, "cap": 41.26, "capEventState": 3 }));
    let humidity = t.sensor(SensorType::Humidity).unwrap();
    let moisture = t.sensor(SensorType::Moisture).unwrap();

    assert_eq!(humidity.property_names(), moisture.property_names());
    assert_eq!(
        humidity.monitoring_config().property_names(),
        moisture.monitoring_config().property_names()
    );
    assert_eq!(moisture.event_state().unwrap(), json!("Too Humid"));
    assert!((f64_of(&moisture.reading().unwrap()) - 41.3).abs() < 1e-9);
    assert_ne!(humidity, moisture);
}

#[test]
fn test_event_aliases_motion() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 1, "tagType": 13, "eventState": 3 }));
    let event = t.sensor(SensorType::Event).unwrap();

    assert_eq!(event.reading().unwrap(), json!("Opened"));
    assert_eq!(event.is_armed(), Some(true));
    assert_eq!(
        event.property_names(),
        t.sensor(SensorType::Motion).unwrap().property_names()
    );
}

// ── Out of range ────────────────────────────────────────────────────

#[test]
fn test_grace_period_on_sensor() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 1, "oorGrace": 4, "OutOfRange": false }));
    let oor = t.sensor(SensorType::OutOfRange).unwrap();

    assert_eq!(oor.get("gracePeriod").unwrap(), json!(480));
    assert_eq!(oor.event_state().unwrap(), json!("In Range"));

    oor.set("gracePeriod", json!(1800)).unwrap();
    assert_eq!(t.raw("oorGrace"), Some(json!(8)));
}

#![allow(clippy::unwrap_used)]
// Monitoring config: dirty tracking, load/save/update and events.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;

use common::{GET_TAG, StubApi, object, tag};
use wirelesstag_core::{ConfigAction, CoreError, SensorType};

const LOAD_TEMP: &str = "/ethClient.asmx/LoadTempSensorConfig";
const SAVE_TEMP: &str = "/ethClient.asmx/SaveTempSensorConfig";
const LOAD_CAP: &str = "/ethClient.asmx/LoadCapSensorConfig2";
const SAVE_OOR: &str = "/ethClient.asmx/SaveOutOfRangeConfig";
const SET_GRACE: &str = "/ethClient.asmx/SetOutOfRangeGrace";

fn temp_config_data() -> serde_json::Value {
    json!({
        "__type": "MyTagList.TempSensorConfig",
        "temp_unit": 1,
        "th_low": 10.0,
        "th_high": 30.0,
        "th_window": 1.0,
        "interval": 1800,
        "email": "me@example.com",
        "send_email": true,
        "send_push": false,
        "apnsSound": "default",
    })
}

// ── Loading ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_replaces_stub_and_is_clean() {
    let api = StubApi::new();
    api.respond(LOAD_TEMP, temp_config_data());
    let t = tag(&api, json!({ "slaveId": 7, "tagType": 13 }));
    let temp = t.sensor(SensorType::Temp).unwrap();

    assert!(temp.monitoring_config().is_stub());
    let config = temp.load_monitoring_config().await.unwrap();

    assert!(!config.is_stub());
    assert!(!config.is_modified());
    assert_eq!(config.get("unit").unwrap(), json!("degF"));
    assert_eq!(api.last_body(LOAD_TEMP), Some(json!({ "id": 7 })));
}

#[tokio::test]
async fn test_load_unwraps_payload_key() {
    let api = StubApi::new();
    api.respond(
        LOAD_CAP,
        json!({ "rhEvent": { "th_low": 30, "th_high": 70 }, "shortedEvent": { "notify_normal": true } }),
    );
    let t = tag(&api, json!({ "slaveId": 3, "tagType": 32 }));

    let humidity = t.sensor(SensorType::Humidity).unwrap();
    let config = humidity.load_monitoring_config().await.unwrap();
    assert_eq!(config.get("thresholds.highValue").unwrap(), json!(70));

    let water = t.sensor(SensorType::Water).unwrap();
    let config = water.load_monitoring_config().await.unwrap();
    assert_eq!(config.get("notifyOnClear").unwrap(), json!(true));
}

#[tokio::test]
async fn test_load_rejects_non_object() {
    let api = StubApi::new();
    api.respond(LOAD_TEMP, json!("oops"));
    let t = tag(&api, json!({ "slaveId": 7 }));

    let err = t
        .sensor(SensorType::Temp)
        .unwrap()
        .load_monitoring_config()
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Payload { .. }));
}

#[tokio::test]
async fn test_signal_config_cannot_load() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 7 }));

    let err = t
        .sensor(SensorType::Signal)
        .unwrap()
        .load_monitoring_config()
        .await
        .unwrap_err();
    assert!(err.is_unsupported());
    assert_eq!(api.call_count(), 0);
}

// ── Dirty tracking ──────────────────────────────────────────────────

#[test]
fn test_write_marks_property_and_raw_key() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 7, "tagType": 13 }));
    let config = t
        .sensor(SensorType::Temp)
        .unwrap()
        .set_monitoring_config(object(temp_config_data()));

    config.set("monitoringInterval", json!(600)).unwrap();

    assert!(config.is_modified());
    assert!(config.is_field_modified("monitoringInterval"));
    assert!(config.is_field_modified("interval"));
    assert!(!config.is_field_modified("unit"));

    config.reset_modified();
    assert!(!config.is_modified());
    assert!(config.modified_fields().is_empty());
}

#[test]
fn test_leaf_write_marks_group() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 7, "tagType": 13 }));
    let config = t
        .sensor(SensorType::Temp)
        .unwrap()
        .set_monitoring_config(object(temp_config_data()));

    config.set("notifySettings.sound", json!("chime")).unwrap();

    assert_eq!(
        config.modified_fields(),
        vec!["apnsSound", "notifySettings", "notifySettings.sound"]
    );
    assert_eq!(config.data()["apnsSound"], json!("chime"));
}

#[test]
fn test_mark_modified_covers_everything() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 7, "tagType": 13 }));
    let config = t
        .sensor(SensorType::Temp)
        .unwrap()
        .set_monitoring_config(object(temp_config_data()));

    config.mark_modified().unwrap();

    for key in config.data().keys() {
        assert!(config.is_field_modified(key), "raw key {key}");
    }
    for name in config.property_names() {
        assert!(config.is_field_modified(&name), "property {name}");
    }
}

#[test]
fn test_mark_field_modified_validates() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 7, "tagType": 13 }));
    let config = t
        .sensor(SensorType::Temp)
        .unwrap()
        .set_monitoring_config(object(temp_config_data()));

    config.mark_field_modified("thresholds.lowValue").unwrap();
    config.mark_field_modified("send_push").unwrap();
    let err = config.mark_field_modified("thresholds.lowvalue").unwrap_err();
    assert!(matches!(err, CoreError::UnknownProperty { .. }));

    config.reset_modified();
    config.mark_group_modified("thresholds").unwrap();
    assert!(config.is_field_modified("thresholds.hysteresis"));
    assert!(config.is_field_modified("th_window"));
    assert!(config.mark_group_modified("unit").is_err());
}

// ── Units ───────────────────────────────────────────────────────────

#[test]
fn test_thresholds_follow_config_unit() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 7, "tagType": 13 }));
    let config = t
        .sensor(SensorType::Temp)
        .unwrap()
        .set_monitoring_config(object(temp_config_data()));

    let thresholds = config.group("thresholds").unwrap();
    assert!((thresholds.get("lowValue").unwrap().as_f64().unwrap() - 50.0).abs() < 1e-9);
    assert!((thresholds.get("hysteresis").unwrap().as_f64().unwrap() - 1.8).abs() < 1e-9);

    thresholds.set("highValue", json!(95.0)).unwrap();
    let stored = config.data()["th_high"].as_f64().unwrap();
    assert!((stored - 35.0).abs() < 1e-9);

    config.set("unit", json!("degC")).unwrap();
    assert_eq!(config.data()["temp_unit"], json!(0));
    assert!((thresholds.get("lowValue").unwrap().as_f64().unwrap() - 10.0).abs() < 1e-9);
}

#[test]
fn test_accelerometer_overlay_on_motion_config() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 7, "tagType": 13 }));
    let config = t
        .sensor(SensorType::Motion)
        .unwrap()
        .set_monitoring_config(object(json!({ "interval": 3, "sensitivity": 40, "axis_x": 12 })));

    assert_eq!(config.get("responsiveness").unwrap(), json!("Medium"));
    assert_eq!(config.get("sensitivity").unwrap(), json!(40));
    assert_eq!(config.get("orientation.x").unwrap(), json!(12));

    let err = config.set("responsiveness", json!("Sluggish")).unwrap_err();
    assert!(matches!(err, CoreError::Range { .. }));
    assert!(!config.is_modified());
}

// ── Save / update ───────────────────────────────────────────────────

#[tokio::test]
async fn test_save_when_clean_makes_no_call() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 7, "tagType": 13 }));
    let config = t
        .sensor(SensorType::Temp)
        .unwrap()
        .set_monitoring_config(object(temp_config_data()));

    config.save(false, false).await.unwrap();
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_save_stub_makes_no_call() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 7, "tagType": 13 }));
    let config = t.sensor(SensorType::Temp).unwrap().monitoring_config();

    config.mark_modified().unwrap();
    config.save(false, false).await.unwrap();
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_save_posts_config_without_type_marker() {
    let api = StubApi::new();
    api.respond(SAVE_TEMP, json!(null));
    let t = tag(&api, json!({ "slaveId": 7, "tagType": 13 }));
    let temp = t.sensor(SensorType::Temp).unwrap();
    let config = temp.set_monitoring_config(object(temp_config_data()));
    let mut events = temp.subscribe_config_events();

    config.set("notifySettings.sendPush", json!(true)).unwrap();
    config.save(true, false).await.unwrap();

    let body = api.last_body(SAVE_TEMP).unwrap();
    assert_eq!(body["id"], json!(7));
    assert_eq!(body["applyAll"], json!(true));
    assert_eq!(body["allMac"], json!(false));
    assert_eq!(body["config"]["send_push"], json!(true));
    assert!(body["config"].get("__type").is_none());

    assert!(!config.is_modified());
    let event = events.try_recv().unwrap();
    assert_eq!(event.action, ConfigAction::Save);
    assert_eq!(event.slave_id, Some(7));
}

#[tokio::test]
async fn test_update_when_modified_keeps_local_edits() {
    let api = StubApi::new();
    api.respond(LOAD_TEMP, json!({ "temp_unit": 0, "interval": 60 }));
    let t = tag(&api, json!({ "slaveId": 7, "tagType": 13 }));
    let config = t
        .sensor(SensorType::Temp)
        .unwrap()
        .set_monitoring_config(object(temp_config_data()));

    config.set("monitoringInterval", json!(600)).unwrap();
    config.update().await.unwrap();

    assert_eq!(api.call_count(), 0);
    assert_eq!(config.get("monitoringInterval").unwrap(), json!(600));

    config.reset_modified().update().await.unwrap();
    assert_eq!(api.calls_to(LOAD_TEMP), 1);
    assert_eq!(config.get("monitoringInterval").unwrap(), json!(60));
}

#[tokio::test]
async fn test_load_when_modified_keeps_local_edits() {
    let api = StubApi::new();
    api.respond(LOAD_TEMP, json!({ "temp_unit": 0, "interval": 60 }));
    let t = tag(&api, json!({ "slaveId": 7, "tagType": 13 }));
    let temp = t.sensor(SensorType::Temp).unwrap();
    let config = temp.set_monitoring_config(object(temp_config_data()));

    config.set("monitoringInterval", json!(600)).unwrap();
    let loaded = temp.load_monitoring_config().await.unwrap();

    assert_eq!(api.call_count(), 0);
    assert!(loaded.is_modified());
    assert_eq!(loaded.get("monitoringInterval").unwrap(), json!(600));

    config.reset_modified();
    let loaded = temp.load_monitoring_config().await.unwrap();
    assert_eq!(api.calls_to(LOAD_TEMP), 1);
    assert_eq!(loaded.get("monitoringInterval").unwrap(), json!(60));
}

#[tokio::test]
async fn test_discover_sensors_keeps_local_edits() {
    let api = StubApi::new();
    api.respond(LOAD_TEMP, json!({ "temp_unit": 0, "interval": 60 }));
    let t = tag(&api, json!({ "slaveId": 7, "tagType": 13 }));
    let config = t
        .sensor(SensorType::Temp)
        .unwrap()
        .set_monitoring_config(object(temp_config_data()));
    config.set("monitoringInterval", json!(600)).unwrap();
    for load in [
        "/ethClient.asmx/LoadMotionSensorConfig",
        LOAD_CAP,
        "/ethClient.asmx/LoadLightSensorConfig",
        "/ethClient.asmx/LoadLowBatteryConfig",
        "/ethClient.asmx/LoadOutOfRangeConfig",
        "/ethClient.asmx/LoadCurrentSensorConfig",
    ] {
        api.respond(load, json!({}));
    }

    t.discover_sensors().await.unwrap();

    assert_eq!(api.calls_to(LOAD_TEMP), 0);
    assert_eq!(config.get("monitoringInterval").unwrap(), json!(600));
}

#[tokio::test]
async fn test_save_without_endpoint_is_unsupported() {
    let api = StubApi::new();
    let t = tag(&api, json!({ "slaveId": 7 }));
    let config = t
        .sensor(SensorType::Signal)
        .unwrap()
        .set_monitoring_config(object(json!({ "note": "local" })));

    config.mark_modified().unwrap();
    let err = config.save(false, false).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Unsupported {
            sensor_type: SensorType::Signal,
            ..
        }
    ));
    assert!(config.is_modified());
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_events_for_set_and_update() {
    let api = StubApi::new();
    api.respond(LOAD_TEMP, json!({ "temp_unit": 0 }));
    let t = tag(&api, json!({ "uuid": "abc", "slaveId": 7, "tagType": 13 }));
    let temp = t.sensor(SensorType::Temp).unwrap();
    let mut events = temp.subscribe_config_events();

    temp.set_monitoring_config(object(json!({ "temp_unit": 1 })));
    temp.set_monitoring_config(object(json!({ "temp_unit": 1 })));
    temp.monitoring_config().update().await.unwrap();

    let first = events.try_recv().unwrap();
    assert_eq!(first.action, ConfigAction::Set);
    assert_eq!(first.tag_uuid.as_deref(), Some("abc"));
    assert_eq!(first.sensor_type, SensorType::Temp);

    let second = events.try_recv().unwrap();
    assert_eq!(second.action, ConfigAction::Update);
    assert_eq!(second.data["temp_unit"], json!(0));
    assert!(events.try_recv().is_err());
}

// ── Grace period ────────────────────────────────────────────────────

#[tokio::test]
async fn test_grace_period_delegates_to_sensor() {
    let api = StubApi::new();
    api.respond(SET_GRACE, json!(null)).respond(SAVE_OOR, json!(null));
    let t = tag(&api, json!({ "slaveId": 9, "oorGrace": 4 }));
    let oor = t.sensor(SensorType::OutOfRange).unwrap();
    let config = oor.set_monitoring_config(object(json!({ "notify_back_in_range": true })));

    assert_eq!(config.get("gracePeriod").unwrap(), json!(480));

    let err = config.set("gracePeriod", json!(10_000)).unwrap_err();
    assert!(matches!(err, CoreError::Range { .. }));
    assert!(!config.is_modified());
    assert_eq!(t.raw("oorGrace"), Some(json!(4)));

    config.set("gracePeriod", json!(1800)).unwrap();
    assert!(config.is_field_modified("gracePeriod"));
    assert!(!config.is_field_modified("oorGrace"));
    assert_eq!(oor.get("gracePeriod").unwrap(), json!(1800));

    config.save(false, false).await.unwrap();
    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, SET_GRACE);
    assert_eq!(calls[0].1, json!({ "id": 9, "oorGrace": 8 }));
    assert_eq!(calls[1].0, SAVE_OOR);
}

#[tokio::test]
async fn test_pending_grace_period_survives_tag_refresh() {
    let api = StubApi::new();
    api.respond(GET_TAG, json!({ "slaveId": 9, "oorGrace": 4 }))
        .respond(SET_GRACE, json!(null))
        .respond(SAVE_OOR, json!(null));
    let t = tag(&api, json!({ "slaveId": 9, "oorGrace": 4 }));
    let oor = t.sensor(SensorType::OutOfRange).unwrap();
    let config = oor.set_monitoring_config(object(json!({ "notify_back_in_range": true })));

    config.set("gracePeriod", json!(1800)).unwrap();
    t.refresh().await.unwrap();
    assert_eq!(t.raw("oorGrace"), Some(json!(4)));

    config.save(false, false).await.unwrap();

    assert_eq!(
        api.last_body(SET_GRACE),
        Some(json!({ "id": 9, "oorGrace": 8 }))
    );
    assert_eq!(t.raw("oorGrace"), Some(json!(8)));
    assert!(!config.is_modified());
}

// ── Monitoring configuration ──
//
// Per-sensor threshold and notification settings. The data lives in the
// sensor's slot so every `MonitoringConfig` handle of a sensor sees the
// same store and the same dirty set. `save` and `update` are mutually
// exclusive: a modified config never reloads, a clean one never saves.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::RwLock;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, trace};

use crate::endpoints::SET_OUT_OF_RANGE_GRACE;
use crate::error::CoreError;
use crate::model::{RawStore, SensorType, TempUnit};
use crate::property::{self, PropertyGroup, PropertyHost, PropertySchema};
use crate::schema;
use crate::sensor::Sensor;

/// Key the service adds to config objects; never sent back on save.
const TYPE_MARKER: &str = "__type";

// ── Events ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigAction {
    Set,
    Update,
    Save,
}

/// Broadcast whenever a sensor's config is replaced, reloaded or saved.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigEvent {
    pub tag_uuid: Option<String>,
    pub slave_id: Option<i64>,
    pub sensor_type: SensorType,
    pub action: ConfigAction,
    pub data: RawStore,
}

// ── Store ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub(crate) struct ConfigStore {
    state: RwLock<ConfigState>,
}

#[derive(Debug, Default)]
struct ConfigState {
    /// `false` for the empty stub a sensor starts with.
    populated: bool,
    data: RawStore,
    dirty: DirtySet,
}

#[derive(Debug, Default)]
struct DirtySet {
    keys: BTreeSet<String>,
    whole: bool,
    /// Raw `oorGrace` code written through `gracePeriod`. The tag store
    /// it lands in is replaced on every tag refresh, so the pending code
    /// is kept here until saved.
    grace: Option<Value>,
}

impl DirtySet {
    fn is_empty(&self) -> bool {
        !self.whole && self.keys.is_empty()
    }

    fn clear(&mut self) {
        self.keys.clear();
        self.whole = false;
        self.grace = None;
    }
}

impl ConfigStore {
    fn read(&self) -> std::sync::RwLockReadGuard<'_, ConfigState> {
        self.state.read().expect("config lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, ConfigState> {
        self.state.write().expect("config lock poisoned")
    }

    pub(crate) fn raw(&self, key: &str) -> Option<Value> {
        self.read().data.get(key).cloned()
    }

    /// Replace the data and clear the dirty set. Returns whether the data
    /// changed.
    pub(crate) fn replace(&self, data: RawStore) -> bool {
        let mut state = self.write();
        let changed = !state.populated || state.data != data;
        state.data = data;
        state.populated = true;
        state.dirty.clear();
        changed
    }
}

// ── Handle ──────────────────────────────────────────────────────────

/// Handle to a sensor's monitoring config.
#[derive(Clone)]
pub struct MonitoringConfig {
    sensor: Sensor,
}

impl MonitoringConfig {
    pub(crate) fn new(sensor: Sensor) -> Self {
        Self { sensor }
    }

    fn store(&self) -> &ConfigStore {
        &self.sensor.slot().config
    }

    pub fn sensor(&self) -> &Sensor {
        &self.sensor
    }

    pub fn kind(&self) -> SensorType {
        self.sensor.kind()
    }

    pub fn schema(&self) -> Result<&'static PropertySchema, CoreError> {
        schema::config_schema(self.kind(), &self.sensor.tag().capabilities())
    }

    /// `true` until data has been loaded or set.
    pub fn is_stub(&self) -> bool {
        !self.store().read().populated
    }

    /// Snapshot of the raw config data.
    pub fn data(&self) -> RawStore {
        self.store().read().data.clone()
    }

    // ── Properties ───────────────────────────────────────────────────

    pub fn get(&self, name: &str) -> Result<Value, CoreError> {
        property::get(self, self.schema()?, name)
    }

    pub fn set(&self, name: &str, value: Value) -> Result<(), CoreError> {
        property::set(self, self.schema()?, name, value)
    }

    pub fn group(&self, name: &str) -> Result<PropertyGroup<'_>, CoreError> {
        PropertyGroup::new(self, self.schema()?, name)
    }

    pub fn property_names(&self) -> Vec<String> {
        self.schema().map(PropertySchema::names).unwrap_or_default()
    }

    /// Configured temperature unit, if this config carries one.
    pub fn unit(&self) -> Result<Option<TempUnit>, CoreError> {
        self.temp_unit()
    }

    // ── Dirty tracking ───────────────────────────────────────────────

    pub fn is_modified(&self) -> bool {
        !self.store().read().dirty.is_empty()
    }

    pub fn is_field_modified(&self, key: &str) -> bool {
        self.store().read().dirty.keys.contains(key)
    }

    /// Mark every data key, every property name and the whole object.
    pub fn mark_modified(&self) -> Result<&Self, CoreError> {
        let names = self.schema()?.names();
        let mut state = self.store().write();
        let keys: Vec<String> = state.data.keys().cloned().collect();
        state.dirty.keys.extend(keys);
        state.dirty.keys.extend(names);
        state.dirty.whole = true;
        Ok(self)
    }

    /// Mark one property, dotted leaf or raw key.
    pub fn mark_field_modified(&self, key: &str) -> Result<&Self, CoreError> {
        let schema = self.schema()?;
        let known = schema.has(key)
            || schema.raw_keys().iter().any(|k| *k == key)
            || self.store().read().data.contains_key(key);
        if !known {
            return Err(CoreError::UnknownProperty {
                name: key.to_owned(),
                sensor_type: self.kind(),
            });
        }
        self.note_modified(key);
        Ok(self)
    }

    /// Mark a group, each of its dotted leaves and their raw keys.
    pub fn mark_group_modified(&self, group: &str) -> Result<&Self, CoreError> {
        let spec = self
            .schema()?
            .find(group)
            .filter(|spec| spec.is_group())
            .ok_or_else(|| CoreError::UnknownProperty {
                name: group.to_owned(),
                sensor_type: self.kind(),
            })?;
        let mut state = self.store().write();
        state.dirty.keys.insert(spec.name.to_owned());
        for leaf in spec.leaves() {
            state.dirty.keys.insert(format!("{}.{}", spec.name, leaf.name));
            if let Some(source) = leaf.source {
                state.dirty.keys.insert(source.to_owned());
            }
        }
        Ok(self)
    }

    pub fn reset_modified(&self) -> &Self {
        self.store().write().dirty.clear();
        self
    }

    pub fn modified_fields(&self) -> Vec<String> {
        self.store().read().dirty.keys.iter().cloned().collect()
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Persist a modified config. No-op for a stub or a clean config.
    ///
    /// A dirty `gracePeriod` is saved first through its own endpoint,
    /// since the grace period is stored on the tag. The code sent is the
    /// one set through this config, even if the tag was refreshed since.
    pub async fn save(&self, apply_all: bool, all_mac: bool) -> Result<(), CoreError> {
        if self.is_stub() || !self.is_modified() {
            trace!(sensor = %self.sensor, "config not modified, skipping save");
            return Ok(());
        }
        let tag = self.sensor.tag();
        let id = tag.require_slave_id()?;

        if self.is_field_modified("gracePeriod") {
            let pending = self.store().read().dirty.grace.clone();
            let grace = pending
                .or_else(|| tag.raw("oorGrace"))
                .ok_or_else(|| CoreError::payload(format!("{tag} has no oorGrace")))?;
            debug!(id, %grace, "saving out-of-range grace period");
            let _ = tag
                .api()
                .call_api(
                    SET_OUT_OF_RANGE_GRACE,
                    json!({ "id": id, "oorGrace": grace.clone() }),
                )
                .await?;
            tag.write_raw("oorGrace", grace);
        }

        let Some(path) = self.sensor.endpoints().save else {
            return Err(CoreError::Unsupported {
                operation: "save monitoring config".into(),
                sensor_type: self.kind(),
            });
        };

        let mut config = self.data();
        config.remove(TYPE_MARKER);
        debug!(id, sensor = %self.sensor, apply_all, all_mac, "saving monitoring config");
        let _ = tag
            .api()
            .call_api(
                path,
                json!({
                    "id": id,
                    "config": config,
                    "applyAll": apply_all,
                    "allMac": all_mac,
                }),
            )
            .await?;

        self.reset_modified();
        self.sensor.emit(ConfigAction::Save, self.data());
        Ok(())
    }

    /// Reload from the service. No-op for a stub or a modified config;
    /// call `reset_modified()` first to discard local changes.
    pub async fn update(&self) -> Result<(), CoreError> {
        if self.is_stub() || self.is_modified() {
            trace!(sensor = %self.sensor, "config stub or modified, skipping update");
            return Ok(());
        }
        let data = fetch(&self.sensor, "update monitoring config").await?;
        self.store().replace(data.clone());
        self.sensor.emit(ConfigAction::Update, data);
        Ok(())
    }
}

/// Fetch a sensor's config through its load endpoint, unwrapped from the
/// kind's payload key.
pub(crate) async fn fetch(sensor: &Sensor, operation: &str) -> Result<RawStore, CoreError> {
    let endpoints = sensor.endpoints();
    let Some(path) = endpoints.load else {
        return Err(CoreError::Unsupported {
            operation: operation.to_owned(),
            sensor_type: sensor.kind(),
        });
    };
    let id = sensor.tag().require_slave_id()?;
    debug!(id, sensor = %sensor, "loading monitoring config");

    let mut payload = sensor.tag().api().call_api(path, json!({ "id": id })).await?;
    if let Some(key) = endpoints.payload_key {
        payload = match payload {
            Value::Object(mut map) => map.remove(key).unwrap_or(Value::Null),
            other => other,
        };
    }
    match payload {
        Value::Object(data) => Ok(data),
        other => Err(CoreError::payload(format!(
            "{} config is not an object: {other}",
            sensor.kind()
        ))),
    }
}

impl PropertyHost for MonitoringConfig {
    fn sensor_type(&self) -> SensorType {
        self.kind()
    }

    fn raw(&self, key: &str) -> Option<Value> {
        self.store().raw(key)
    }

    fn write_raw(&self, key: &str, value: Value) {
        self.store().write().data.insert(key.to_owned(), value);
    }

    fn note_modified(&self, key: &str) {
        self.store().write().dirty.keys.insert(key.to_owned());
    }

    fn temp_unit(&self) -> Result<Option<TempUnit>, CoreError> {
        schema::unit_from_raw(self.store().raw("temp_unit").as_ref())
    }

    fn high_precision_temp(&self) -> bool {
        self.sensor.tag().capabilities().high_precision_temp
    }

    fn delegate_get(&self, target: &str) -> Result<Value, CoreError> {
        self.sensor.get(target)
    }

    fn delegate_set(&self, target: &str, value: Value) -> Result<(), CoreError> {
        self.sensor.set(target, value)?;
        if target == "gracePeriod" {
            let code = self.sensor.tag().raw("oorGrace");
            self.store().write().dirty.grace = code;
        }
        Ok(())
    }
}

impl fmt::Debug for MonitoringConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitoringConfig")
            .field("sensor", &self.sensor)
            .field("stub", &self.is_stub())
            .field("modified", &self.modified_fields())
            .finish()
    }
}

// ── Tag entity ──
//
// A tag owns one raw store shared by all of its sensors. Refreshes replace
// the store wholesale but never the `Tag` itself, so every outstanding
// handle observes the new state.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, trace};
use wirelesstag_api::{CallApi, tags};

use crate::endpoints::ApiEndpoints;
use crate::error::CoreError;
use crate::model::{RawStore, SensorType, TagCapabilities};
use crate::schema;
use crate::sensor::{Sensor, SensorSlot};

/// Shared handle to a tag. Clones refer to the same tag.
#[derive(Clone)]
pub struct Tag {
    inner: Arc<TagInner>,
}

struct TagInner {
    api: Arc<dyn CallApi>,
    data: RwLock<RawStore>,
    sensors: RwLock<HashMap<SensorType, Arc<SensorSlot>>>,
}

impl Tag {
    pub fn new(api: Arc<dyn CallApi>, data: RawStore) -> Self {
        Self {
            inner: Arc::new(TagInner {
                api,
                data: RwLock::new(data),
                sensors: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Build a tag from a raw JSON record, which must be an object.
    pub fn from_value(api: Arc<dyn CallApi>, value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(data) => Ok(Self::new(api, data)),
            other => Err(CoreError::payload(format!("tag record is not an object: {other}"))),
        }
    }

    // ── Identity ─────────────────────────────────────────────────────

    pub fn uuid(&self) -> Option<String> {
        self.raw("uuid")
            .and_then(|v| v.as_str().map(str::to_owned))
    }

    pub fn slave_id(&self) -> Option<i64> {
        self.raw("slaveId").and_then(|v| v.as_i64())
    }

    pub(crate) fn require_slave_id(&self) -> Result<i64, CoreError> {
        self.slave_id()
            .ok_or_else(|| CoreError::payload(format!("{self} has no slaveId")))
    }

    pub fn name(&self) -> Option<String> {
        self.raw("name").and_then(|v| v.as_str().map(str::to_owned))
    }

    pub fn tag_type(&self) -> Option<i64> {
        self.raw("tagType").and_then(|v| v.as_i64())
    }

    /// Whether both handles refer to the same tag instance.
    pub fn same_tag(&self, other: &Tag) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ── Raw store ────────────────────────────────────────────────────

    /// Snapshot of the raw store.
    pub fn data(&self) -> RawStore {
        self.inner.data.read().expect("tag data lock poisoned").clone()
    }

    pub fn raw(&self, key: &str) -> Option<Value> {
        self.inner
            .data
            .read()
            .expect("tag data lock poisoned")
            .get(key)
            .cloned()
    }

    pub(crate) fn write_raw(&self, key: &str, value: Value) {
        self.inner
            .data
            .write()
            .expect("tag data lock poisoned")
            .insert(key.to_owned(), value);
    }

    /// Replace the raw store wholesale.
    pub fn set_data(&self, data: RawStore) {
        trace!(tag = %self, keys = data.len(), "replacing tag data");
        *self.inner.data.write().expect("tag data lock poisoned") = data;
    }

    pub(crate) fn api(&self) -> &Arc<dyn CallApi> {
        &self.inner.api
    }

    // ── Sensors ──────────────────────────────────────────────────────

    pub fn capabilities(&self) -> TagCapabilities {
        self.tag_type()
            .map(TagCapabilities::for_tag_type)
            .unwrap_or_default()
    }

    /// Kinds of sensor this tag's hardware carries.
    pub fn sensor_types(&self) -> Vec<SensorType> {
        self.capabilities().sensor_types()
    }

    /// Get or create the sensor of `kind`. Per-sensor state lives as long
    /// as the tag does.
    pub fn sensor(&self, kind: SensorType) -> Result<Sensor, CoreError> {
        schema::sensor_schema(kind)?;
        schema::config_schema(kind, &self.capabilities())?;

        let slot = {
            let mut sensors = self.inner.sensors.write().expect("sensor map lock poisoned");
            Arc::clone(sensors.entry(kind).or_insert_with(|| Arc::new(SensorSlot::new())))
        };
        Ok(Sensor::new(self.clone(), kind, slot))
    }

    /// Sensors created so far, ordered by kind.
    pub fn sensors(&self) -> Vec<Sensor> {
        let sensors = self.inner.sensors.read().expect("sensor map lock poisoned");
        let mut list: Vec<Sensor> = sensors
            .iter()
            .map(|(kind, slot)| Sensor::new(self.clone(), *kind, Arc::clone(slot)))
            .collect();
        list.sort_by_key(Sensor::kind);
        list
    }

    // ── Remote operations ────────────────────────────────────────────

    /// Re-fetch this tag and replace its store.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let slave_id = self.require_slave_id()?;
        debug!(slave_id, "refreshing tag");
        let data = tags::get_tag(self.inner.api.as_ref(), slave_id).await?;
        self.set_data(data);
        Ok(())
    }

    /// Create a sensor for every capability of this tag and load the
    /// monitoring config of each one that has a load endpoint.
    pub async fn discover_sensors(&self) -> Result<Vec<Sensor>, CoreError> {
        let mut found = Vec::new();
        for kind in self.sensor_types() {
            let sensor = self.sensor(kind)?;
            if ApiEndpoints::for_kind(kind).load.is_some() {
                sensor.load_monitoring_config().await?;
            }
            found.push(sensor);
        }
        debug!(tag = %self, count = found.len(), "discovered sensors");
        Ok(found)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.slave_id()) {
            (Some(name), _) => write!(f, "tag '{name}'"),
            (None, Some(id)) => write!(f, "tag #{id}"),
            (None, None) => f.write_str("unidentified tag"),
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("uuid", &self.uuid())
            .field("slave_id", &self.slave_id())
            .field("name", &self.name())
            .field("tag_type", &self.tag_type())
            .finish_non_exhaustive()
    }
}

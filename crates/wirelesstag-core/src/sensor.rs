// ── Sensor entity ──
//
// A sensor is a `(tag, kind)` handle. Readings come straight from the
// tag's raw store; the monitoring config and its event channel live in a
// per-sensor slot the tag keeps for its whole lifetime.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;

use crate::arming;
use crate::endpoints::ApiEndpoints;
use crate::error::CoreError;
use crate::model::{RawStore, SensorType, TempUnit};
use crate::monitoring::{self, ConfigAction, ConfigEvent, ConfigStore, MonitoringConfig};
use crate::property::{self, PropertyHost, PropertySchema};
use crate::schema::{self, UNMONITORED_STATES};
use crate::tag::Tag;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Per-sensor state owned by the tag.
pub(crate) struct SensorSlot {
    pub(crate) config: ConfigStore,
    events: broadcast::Sender<ConfigEvent>,
}

impl SensorSlot {
    pub(crate) fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config: ConfigStore::default(),
            events,
        }
    }
}

/// Handle to one sensor of a tag.
#[derive(Clone)]
pub struct Sensor {
    tag: Tag,
    kind: SensorType,
    slot: Arc<SensorSlot>,
}

impl Sensor {
    pub(crate) fn new(tag: Tag, kind: SensorType, slot: Arc<SensorSlot>) -> Self {
        Self { tag, kind, slot }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn kind(&self) -> SensorType {
        self.kind
    }

    pub(crate) fn slot(&self) -> &SensorSlot {
        &self.slot
    }

    pub fn endpoints(&self) -> &'static ApiEndpoints {
        ApiEndpoints::for_kind(self.kind)
    }

    fn schema(&self) -> Result<&'static PropertySchema, CoreError> {
        schema::sensor_schema(self.kind)
    }

    // ── Properties ───────────────────────────────────────────────────

    pub fn get(&self, name: &str) -> Result<Value, CoreError> {
        property::get(self, self.schema()?, name)
    }

    pub fn set(&self, name: &str, value: Value) -> Result<(), CoreError> {
        property::set(self, self.schema()?, name, value)
    }

    pub fn property_names(&self) -> Vec<String> {
        self.schema().map(PropertySchema::names).unwrap_or_default()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.schema().is_ok_and(|s| s.has(name))
    }

    pub fn reading(&self) -> Result<Value, CoreError> {
        self.get("reading")
    }

    pub fn event_state(&self) -> Result<Value, CoreError> {
        self.get("eventState")
    }

    /// Every label `event_state()` can take, in table order.
    pub fn event_state_values(&self) -> Vec<Value> {
        match self.get("eventStateValues") {
            Ok(Value::Array(values)) => values,
            _ => Vec::new(),
        }
    }

    /// `None` when this kind has no event state; otherwise whether the
    /// current state is a monitoring one.
    pub fn is_armed(&self) -> Option<bool> {
        if !self.has_property("eventState") {
            return None;
        }
        let state = self.event_state().ok()?;
        Some(!state
            .as_str()
            .is_some_and(|label| UNMONITORED_STATES.contains(&label)))
    }

    // ── Arming ───────────────────────────────────────────────────────

    pub fn can_arm(&self) -> bool {
        self.endpoints().arm.is_some()
    }

    pub fn can_disarm(&self) -> bool {
        self.endpoints().disarm.is_some()
    }

    /// Enable event monitoring and wait until the tag confirms it.
    ///
    /// Resolves immediately when already armed. Concurrent state changes
    /// on the same sensor are the caller's responsibility.
    pub async fn arm(&self) -> Result<Sensor, CoreError> {
        arming::transition(self, true).await
    }

    /// Disable event monitoring and wait until the tag confirms it.
    pub async fn disarm(&self) -> Result<Sensor, CoreError> {
        arming::transition(self, false).await
    }

    // ── Monitoring config ────────────────────────────────────────────

    /// The cached monitoring config; an empty stub until one is loaded
    /// or set.
    pub fn monitoring_config(&self) -> MonitoringConfig {
        MonitoringConfig::new(self.clone())
    }

    /// Replace the cached config data. Emits `Set` when the data differs
    /// from what was cached.
    pub fn set_monitoring_config(&self, data: RawStore) -> MonitoringConfig {
        if self.slot.config.replace(data.clone()) {
            self.emit(ConfigAction::Set, data);
        }
        self.monitoring_config()
    }

    /// Fetch the config through this kind's load endpoint and cache it.
    ///
    /// A loaded config with unsaved changes is returned as is, without a
    /// call; `reset_modified()` first to discard the changes.
    pub async fn load_monitoring_config(&self) -> Result<MonitoringConfig, CoreError> {
        let cached = self.monitoring_config();
        if !cached.is_stub() && cached.is_modified() {
            debug!(sensor = %self, "config has unsaved changes, skipping load");
            return Ok(cached);
        }
        let data = monitoring::fetch(self, "load monitoring config").await?;
        Ok(self.set_monitoring_config(data))
    }

    pub fn subscribe_config_events(&self) -> broadcast::Receiver<ConfigEvent> {
        self.slot.events.subscribe()
    }

    pub(crate) fn emit(&self, action: ConfigAction, data: RawStore) {
        let event = ConfigEvent {
            tag_uuid: self.tag.uuid(),
            slave_id: self.tag.slave_id(),
            sensor_type: self.kind,
            action,
            data,
        };
        // No subscribers is not an error.
        if self.slot.events.send(event).is_err() {
            debug!(sensor = %self, ?action, "config event had no subscribers");
        }
    }
}

impl PropertyHost for Sensor {
    fn sensor_type(&self) -> SensorType {
        self.kind
    }

    fn raw(&self, key: &str) -> Option<Value> {
        self.tag.raw(key)
    }

    fn write_raw(&self, key: &str, value: Value) {
        self.tag.write_raw(key, value);
    }

    /// The config's unit wins; a unit on the tag record is the fallback.
    fn temp_unit(&self) -> Result<Option<TempUnit>, CoreError> {
        let raw = self
            .slot
            .config
            .raw("temp_unit")
            .or_else(|| self.tag.raw("temp_unit"));
        schema::unit_from_raw(raw.as_ref())
    }

    fn high_precision_temp(&self) -> bool {
        self.tag.capabilities().high_precision_temp
    }
}

impl PartialEq for Sensor {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.tag.same_tag(&other.tag)
    }
}

impl Eq for Sensor {}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sensor on {}", self.kind, self.tag)
    }
}

impl fmt::Debug for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("kind", &self.kind)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

//! Sensor listing for one tag.

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use wirelesstag_core::{Account, Sensor, SensorType};

use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::util;

/// Point-in-time view of a sensor, shared with the arm/disarm handlers.
#[derive(Serialize)]
pub struct SensorSummary {
    pub sensor: SensorType,
    pub reading: Option<Value>,
    pub event_state: Option<Value>,
    pub armed: Option<bool>,
    pub can_arm: bool,
}

impl From<&Sensor> for SensorSummary {
    fn from(s: &Sensor) -> Self {
        let has_state = s.has_property("eventState");
        Self {
            sensor: s.kind(),
            reading: s.reading().ok(),
            event_state: has_state.then(|| s.event_state().ok()).flatten(),
            armed: s.is_armed(),
            can_arm: s.can_arm(),
        }
    }
}

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "Sensor")]
    sensor: String,
    #[tabled(rename = "Reading")]
    reading: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Armed")]
    armed: String,
}

impl From<&SensorSummary> for SensorRow {
    fn from(s: &SensorSummary) -> Self {
        Self {
            sensor: s.sensor.to_string(),
            reading: s.reading.as_ref().map_or_else(|| "-".into(), output::cell),
            state: s.event_state.as_ref().map_or_else(|| "-".into(), output::cell),
            armed: match s.armed {
                Some(true) => "yes".into(),
                Some(false) => "no".into(),
                None => "-".into(),
            },
        }
    }
}

pub(super) fn detail(s: &SensorSummary) -> String {
    [
        format!("Sensor:   {}", s.sensor),
        format!(
            "State:    {}",
            s.event_state.as_ref().map_or_else(|| "-".into(), output::cell)
        ),
        format!(
            "Reading:  {}",
            s.reading.as_ref().map_or_else(|| "-".into(), output::cell)
        ),
    ]
    .join("\n")
}

pub async fn handle(account: &Account, tag: &str, out: OutputOpts) -> Result<(), CliError> {
    let tag = util::resolve_tag(account, tag).await?;
    let summaries = tag
        .sensor_types()
        .into_iter()
        .map(|kind| tag.sensor(kind).map(|s| SensorSummary::from(&s)))
        .collect::<Result<Vec<_>, _>>()?;

    let rendered = output::render_list(out.format, &summaries, |s| SensorRow::from(s));
    output::print_output(&rendered, out.quiet);
    Ok(())
}

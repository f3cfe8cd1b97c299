//! Shared helpers for command handlers.

use serde_json::Value;

use wirelesstag_core::{Account, Sensor, SensorType, Tag};

use crate::error::CliError;

/// Refresh the tag list and resolve a tag by name, uuid or slave id.
pub async fn resolve_tag(account: &Account, query: &str) -> Result<Tag, CliError> {
    account.tags().await?;
    account.find_tag(query).ok_or_else(|| CliError::NotFound {
        resource_type: "tag".into(),
        identifier: query.into(),
        list_command: "tags".into(),
    })
}

/// Resolve a sensor the tag actually carries.
pub fn resolve_sensor(tag: &Tag, kind: SensorType) -> Result<Sensor, CliError> {
    if !tag.sensor_types().contains(&kind) {
        return Err(CliError::NotFound {
            resource_type: format!("sensor on {tag}"),
            identifier: kind.to_string(),
            list_command: format!("sensors {}", tag_ref(tag)),
        });
    }
    Ok(tag.sensor(kind)?)
}

/// The identifier a user would type back to address `tag`.
pub fn tag_ref(tag: &Tag) -> String {
    tag.name()
        .or_else(|| tag.uuid())
        .or_else(|| tag.slave_id().map(|id| id.to_string()))
        .unwrap_or_default()
}

/// Parse a command-line value as JSON, falling back to a plain string.
///
/// `25` becomes a number and `true` a boolean, while `degF` stays text.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

//! Tag listing.

use serde::Serialize;
use tabled::Tabled;

use wirelesstag_core::{Account, SensorType, Tag};

use crate::error::CliError;
use crate::output::{self, OutputOpts};

#[derive(Serialize)]
struct TagSummary {
    uuid: Option<String>,
    slave_id: Option<i64>,
    name: Option<String>,
    tag_type: Option<i64>,
    sensors: Vec<SensorType>,
}

impl From<&Tag> for TagSummary {
    fn from(tag: &Tag) -> Self {
        Self {
            uuid: tag.uuid(),
            slave_id: tag.slave_id(),
            name: tag.name(),
            tag_type: tag.tag_type(),
            sensors: tag.sensor_types(),
        }
    }
}

#[derive(Tabled)]
struct TagRow {
    #[tabled(rename = "ID")]
    slave_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    tag_type: String,
    #[tabled(rename = "Sensors")]
    sensors: String,
    #[tabled(rename = "UUID")]
    uuid: String,
}

impl From<&TagSummary> for TagRow {
    fn from(t: &TagSummary) -> Self {
        Self {
            slave_id: t.slave_id.map(|id| id.to_string()).unwrap_or_default(),
            name: t.name.clone().unwrap_or_default(),
            tag_type: t.tag_type.map(|ty| ty.to_string()).unwrap_or_default(),
            sensors: t
                .sensors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            uuid: t.uuid.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(account: &Account, out: OutputOpts) -> Result<(), CliError> {
    let tags = account.tags().await?;
    let summaries: Vec<TagSummary> = tags.iter().map(TagSummary::from).collect();
    let rendered = output::render_list(out.format, &summaries, |t| TagRow::from(t));
    output::print_output(&rendered, out.quiet);
    Ok(())
}

//! Monitoring config handlers: show and set.

use serde::Serialize;
use serde_json::{Map, Value};
use tabled::Tabled;

use wirelesstag_core::{Account, CoreError, MonitoringConfig, SensorType};

use crate::cli::{ConfigArgs, ConfigCommand, SensorRef};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::util;

#[derive(Serialize)]
struct ConfigView {
    tag: String,
    sensor: SensorType,
    properties: Map<String, Value>,
}

#[derive(Tabled)]
struct PropertyRow {
    #[tabled(rename = "Property")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl ConfigView {
    /// Top-level properties only; groups come out as nested objects.
    fn new(tag: String, config: &MonitoringConfig) -> Self {
        let properties = config
            .property_names()
            .into_iter()
            .filter(|name| !name.contains('.'))
            .filter_map(|name| displayed(config.get(&name)).map(|value| (name, value)))
            .collect();
        Self {
            tag,
            sensor: config.kind(),
            properties,
        }
    }

    /// Flatten groups into dotted rows.
    fn rows(&self) -> Vec<PropertyRow> {
        let mut rows = Vec::new();
        for (name, value) in &self.properties {
            match value {
                Value::Object(leaves) => {
                    rows.extend(leaves.iter().map(|(leaf, v)| PropertyRow {
                        name: format!("{name}.{leaf}"),
                        value: output::cell(v),
                    }));
                }
                other => rows.push(PropertyRow {
                    name: name.clone(),
                    value: output::cell(other),
                }),
            }
        }
        rows
    }
}

/// Write-only properties have nothing to show; any other read failure
/// is shown in place of the value.
fn displayed(result: Result<Value, CoreError>) -> Option<Value> {
    match result {
        Ok(value) => Some(value),
        Err(CoreError::WriteOnly { .. }) => None,
        Err(e) => Some(Value::String(format!("<error: {e}>"))),
    }
}

fn detail(view: &ConfigView) -> String {
    if view.properties.is_empty() {
        return format!("{} sensor on {} has no monitoring settings", view.sensor, view.tag);
    }
    tabled::Table::new(view.rows())
        .with(tabled::settings::Style::rounded())
        .to_string()
}

async fn load(account: &Account, target: &SensorRef) -> Result<(String, MonitoringConfig), CliError> {
    let tag = util::resolve_tag(account, &target.tag).await?;
    let sensor = util::resolve_sensor(&tag, target.sensor)?;
    let config = if sensor.endpoints().load.is_some() {
        sensor.load_monitoring_config().await?
    } else {
        sensor.monitoring_config()
    };
    Ok((util::tag_ref(&tag), config))
}

pub async fn handle(account: &Account, args: ConfigArgs, out: OutputOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show(target) => {
            let (tag, config) = load(account, &target).await?;
            let view = ConfigView::new(tag, &config);
            let rendered = output::render_single(out.format, &view, detail);
            output::print_output(&rendered, out.quiet);
            Ok(())
        }

        ConfigCommand::Set {
            target,
            property,
            value,
            apply_all,
            all_mac,
        } => {
            let (tag, config) = load(account, &target).await?;
            config.set(&property, util::parse_value(&value))?;
            config.save(apply_all, all_mac).await?;

            output::status(
                &format!("{} saved ({property})", config.sensor()),
                out.quiet,
            );

            let view = ConfigView::new(tag, &config);
            let rendered = output::render_single(out.format, &view, detail);
            output::print_output(&rendered, out.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn failed_reads_show_the_error() {
        let shown = displayed(Err(CoreError::Range {
            message: "invalid temperature unit code 7".into(),
        }));
        let text = shown.as_ref().and_then(Value::as_str).unwrap_or_default();
        assert!(text.contains("invalid temperature unit code 7"), "{text}");
    }

    #[test]
    fn write_only_properties_are_skipped() {
        let shown = displayed(Err(CoreError::WriteOnly {
            name: "sound".into(),
        }));
        assert_eq!(shown, None);
        assert_eq!(displayed(Ok(json!(25))), Some(json!(25)));
    }
}

//! Arm and disarm handlers.

use wirelesstag_core::Account;

use crate::cli::SensorRef;
use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::sensors::{self, SensorSummary};
use super::util;

pub async fn handle(
    account: &Account,
    target: &SensorRef,
    arm: bool,
    out: OutputOpts,
) -> Result<(), CliError> {
    let tag = util::resolve_tag(account, &target.tag).await?;
    let sensor = util::resolve_sensor(&tag, target.sensor)?;

    let sensor = if arm {
        sensor.arm().await?
    } else {
        sensor.disarm().await?
    };

    let verb = if arm { "armed" } else { "disarmed" };
    output::status(&format!("{sensor} {verb}"), out.quiet);

    let summary = SensorSummary::from(&sensor);
    let rendered = output::render_single(out.format, &summary, sensors::detail);
    output::print_output(&rendered, out.quiet);
    Ok(())
}

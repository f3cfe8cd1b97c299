//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod arm;
pub mod config_cmd;
pub mod managers;
pub mod sensors;
pub mod tags;
pub mod util;

use wirelesstag_core::Account;

use crate::cli::Command;
use crate::error::CliError;
use crate::output::OutputOpts;

/// Dispatch an account-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, account: &Account, out: OutputOpts) -> Result<(), CliError> {
    match cmd {
        Command::Managers(args) => managers::handle(account, args, out).await,
        Command::Tags => tags::handle(account, out).await,
        Command::Sensors { tag } => sensors::handle(account, &tag, out).await,
        Command::Arm(target) => arm::handle(account, &target, true, out).await,
        Command::Disarm(target) => arm::handle(account, &target, false, out).await,
        Command::Config(args) => config_cmd::handle(account, args, out).await,
        // Completions never reach the service
        Command::Completions { .. } => Ok(()),
    }
}

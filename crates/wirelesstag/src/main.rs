mod cli;
mod commands;
mod error;
mod output;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use wirelesstag_core::Account;

use crate::cli::{Cli, Command, OutputFormat};
use crate::error::CliError;
use crate::output::OutputOpts;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.quiet);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, quiet: bool) {
    let filter = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Completions { shell } => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "wtag", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the service
        cmd => {
            let cfg = wirelesstag_config::load_config()?;
            let (profile_name, profile) = cfg.profile(cli.global.profile.as_deref())?;
            let account_config = wirelesstag_config::profile_to_account_config(
                profile,
                &profile_name,
                cfg.defaults.timeout,
            )?;

            let out = OutputOpts {
                format: resolve_format(cli.global.output, &cfg.defaults.output)?,
                quiet: cli.global.quiet,
            };

            tracing::debug!(profile = %profile_name, "signing in");
            let account = Account::connect(&account_config).await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &account, out).await;

            if let Err(e) = account.disconnect().await {
                tracing::debug!(error = %e, "sign-out failed");
            }
            result
        }
    }
}

/// `--output` wins; otherwise the config file's `defaults.output`.
fn resolve_format(flag: Option<OutputFormat>, configured: &str) -> Result<OutputFormat, CliError> {
    match flag {
        Some(format) => Ok(format),
        None => OutputFormat::from_str(configured, true).map_err(|reason| CliError::Validation {
            field: "defaults.output".into(),
            reason,
        }),
    }
}

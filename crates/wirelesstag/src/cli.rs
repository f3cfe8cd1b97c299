//! Clap derive structures for the `wtag` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use wirelesstag_core::SensorType;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wtag -- inspect and arm Wireless Sensor Tags from the command line
#[derive(Debug, Parser)]
#[command(
    name = "wtag",
    version,
    about = "Manage Wireless Sensor Tags from the command line",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "WTAG_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Output format (defaults to the config file's `defaults.output`)
    #[arg(long, short = 'o', env = "WTAG_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default)
    Table,
    /// Pretty-printed JSON
    Json,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List or select tag managers
    #[command(alias = "m")]
    Managers(ManagersArgs),

    /// List tags on the selected tag manager
    #[command(alias = "t")]
    Tags,

    /// Show the sensors of a tag with readings and arm state
    #[command(alias = "s")]
    Sensors {
        /// Tag name, uuid or slave id
        tag: String,
    },

    /// Arm a sensor
    Arm(SensorRef),

    /// Disarm a sensor
    Disarm(SensorRef),

    /// Show or change a sensor's monitoring configuration
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Debug, Args)]
pub struct SensorRef {
    /// Tag name, uuid or slave id
    pub tag: String,

    /// Sensor type (temp, humidity, motion, ...)
    pub sensor: SensorType,
}

// ── Managers ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ManagersArgs {
    #[command(subcommand)]
    pub command: Option<ManagersCommand>,
}

#[derive(Debug, Subcommand)]
pub enum ManagersCommand {
    /// List tag managers on the account
    List,

    /// Make a tag manager the active one
    Select {
        /// Tag manager MAC address
        mac: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Load and print a sensor's monitoring configuration
    Show(SensorRef),

    /// Set one property and save the configuration
    Set {
        #[command(flatten)]
        target: SensorRef,

        /// Property name; group leaves use dots (e.g. thresholds.highValue)
        property: String,

        /// New value, parsed as JSON when possible
        value: String,

        /// Apply the change to every tag of the same type
        #[arg(long)]
        apply_all: bool,

        /// Apply across all tag managers of the account
        #[arg(long, requires = "apply_all")]
        all_mac: bool,
    },
}

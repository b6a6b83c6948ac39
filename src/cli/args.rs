//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Condition/action rule engine with host resource alerting
///
/// Manage rules, submit events for evaluation, and watch CPU and memory usage.
#[derive(Parser, Debug)]
#[command(name = "rulewatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "RULEWATCH_CONFIG")]
    pub config: Option<String>,

    /// Path to the rule store file
    #[arg(long, global = true, env = "RULEWATCH_STORE")]
    pub store: Option<String>,

    /// Keep rules in memory only (nothing is persisted)
    #[arg(long, global = true, conflicts_with = "store")]
    pub in_memory: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage rules
    Rules(RulesArgs),

    /// Submit an event for rule evaluation
    Event(EventArgs),

    /// Show current CPU and memory usage
    Stats,

    /// Show or change alert thresholds
    Thresholds(ThresholdsArgs),

    /// Sample resources in the foreground and raise threshold alerts
    Monitor(MonitorArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for rule management commands
#[derive(Parser, Debug)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommands,
}

/// Rule subcommands
#[derive(Subcommand, Debug)]
pub enum RulesCommands {
    /// Add a rule
    Add {
        /// Boolean condition over event fields, e.g. "temperature > 100"
        #[arg(long)]
        condition: String,

        /// Action to run when the condition holds, e.g. "alert('High Temp')"
        #[arg(long)]
        action: String,

        /// Rule id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// List all rules
    List,

    /// Show one rule
    Get {
        /// Rule id
        id: String,
    },

    /// Replace a rule's condition and action
    Update {
        /// Rule id
        id: String,

        /// New condition
        #[arg(long)]
        condition: String,

        /// New action
        #[arg(long)]
        action: String,
    },

    /// Delete a rule
    Delete {
        /// Rule id
        id: String,
    },
}

/// Arguments for the event command
#[derive(Parser, Debug)]
pub struct EventArgs {
    /// Event as a flat JSON object, e.g. '{"temperature": 120}'
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub json: Option<String>,

    /// Read the event from a file ("-" for stdin)
    #[arg(short, long)]
    pub file: Option<String>,
}

/// Arguments for threshold commands
#[derive(Parser, Debug)]
pub struct ThresholdsArgs {
    #[command(subcommand)]
    pub command: ThresholdsCommands,
}

/// Threshold subcommands
#[derive(Subcommand, Debug)]
pub enum ThresholdsCommands {
    /// Show the effective thresholds
    Show,

    /// Set thresholds and save them to the config file
    Set {
        /// CPU threshold in percent (0-100)
        #[arg(long)]
        cpu: f64,

        /// Memory threshold in percent (0-100)
        #[arg(long)]
        memory: f64,
    },
}

/// Arguments for the monitor command
#[derive(Parser, Debug)]
pub struct MonitorArgs {
    /// Sampling interval in milliseconds (overrides config)
    #[arg(short, long, value_name = "MS")]
    pub interval: Option<u64>,

    /// Stop after this many seconds instead of waiting for Ctrl+C
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Only alert when a resource crosses its threshold
    #[arg(long)]
    pub rising_edge: bool,

    /// Print alerts without ANSI colors
    #[arg(long)]
    pub no_color: bool,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

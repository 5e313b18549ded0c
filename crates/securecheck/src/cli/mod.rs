//! Command-line interface for securecheck.
//!
//! Each subcommand maps to one section of the dashboard. The binary turns
//! the parsed command into a [`Request`] and renders the resulting page.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, AnalyticsCommand, ConfigCommand, DurationArg, GenderArg, LogsCommand,
    OutcomeArg, OutputFormat,
};

use crate::dashboard::{AnalysisChoice, Request};
use crate::error::Result;
use crate::logging::Verbosity;

/// securecheck - Police post dashboard
///
/// Browse, analyse and append traffic stop logs kept in a local `SQLite`
/// database.
#[derive(Debug, Parser)]
#[command(name = "securecheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the welcome page and database statistics
    Home,

    /// Browse stop logs, optionally filtered
    Logs(LogsCommand),

    /// Run a predefined analysis
    Analytics(AnalyticsCommand),

    /// Add a stop log
    Add(AddCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// What the binary should do after parsing.
#[derive(Debug)]
pub enum Action {
    /// Serve a dashboard request.
    Dashboard(Request),
    /// Print the analysis catalog.
    ListAnalyses,
    /// Run a configuration command.
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

impl Command {
    /// Resolve the command into an action.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown analysis name or a rejected stop
    /// record.
    pub fn into_action(self) -> Result<Action> {
        let action = match self {
            Self::Home => Action::Dashboard(Request::Home),
            Self::Logs(cmd) => Action::Dashboard(Request::ViewLogs(cmd.into())),
            Self::Analytics(
                AnalyticsCommand { list: true, .. } | AnalyticsCommand { analysis: None, .. },
            ) => Action::ListAnalyses,
            Self::Analytics(AnalyticsCommand {
                analysis: Some(name),
                ..
            }) => Action::Dashboard(Request::Analytics(name.parse::<AnalysisChoice>()?)),
            Self::Add(cmd) => Action::Dashboard(Request::AddLog(cmd.into_stop()?)),
            Self::Config(cmd) => Action::Config(cmd),
        };
        Ok(action)
    }
}

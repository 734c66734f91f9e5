//! Command-line interface for meeting-minutes.
//!
//! This module provides the CLI structure for the `minutes` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    parse_participant, ClearCommand, ConfigCommand, CreateCommand, DeleteCommand, EditCommand,
    ExportCommand, ListCommand, OutputFormat, ShowCommand, StatusCommand,
};

/// minutes - Record, keep and export meeting minutes
///
/// Meetings are stored locally as a single collection and can be exported
/// to paginated A4 PDFs.
#[derive(Debug, Parser)]
#[command(name = "minutes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List meetings, newest first
    List(ListCommand),

    /// Show one meeting
    Show(ShowCommand),

    /// Create a meeting
    Create(CreateCommand),

    /// Replace a meeting's contents from a draft file
    Edit(EditCommand),

    /// Delete a meeting
    Delete(DeleteCommand),

    /// Delete every meeting
    Clear(ClearCommand),

    /// Export a meeting to PDF
    Export(ExportCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

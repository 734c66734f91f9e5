//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::draft::{MeetingDraft, ParticipantDraft};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Meeting id
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Create command arguments.
///
/// Either `--file` or the `--title`, `--date` and `--start` trio is required.
#[derive(Debug, Args)]
pub struct CreateCommand {
    /// Read the meeting from a TOML or JSON draft file
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["title", "date", "start"])]
    pub file: Option<PathBuf>,

    /// Meeting title
    #[arg(long, required_unless_present = "file")]
    pub title: Option<String>,

    /// Meeting date (yyyy-MM-dd)
    #[arg(long, required_unless_present = "file")]
    pub date: Option<String>,

    /// Start time (HH:mm)
    #[arg(long, required_unless_present = "file")]
    pub start: Option<String>,

    /// End time (HH:mm)
    #[arg(long)]
    pub end: Option<String>,

    /// Where the meeting took place
    #[arg(long)]
    pub location: Option<String>,

    /// Agenda item (repeatable)
    #[arg(long = "agenda", value_name = "ITEM")]
    pub agenda: Vec<String>,

    /// Participant as "Name[,email[,role]]" (repeatable)
    #[arg(long = "participant", value_name = "NAME[,EMAIL[,ROLE]]")]
    pub participants: Vec<String>,

    /// General notes
    #[arg(long)]
    pub notes: Option<String>,
}

impl CreateCommand {
    /// Build a draft from the inline flags.
    #[must_use]
    pub fn flag_draft(&self) -> MeetingDraft {
        MeetingDraft {
            title: self.title.clone().unwrap_or_default(),
            date: self.date.clone().unwrap_or_default(),
            start_time: self.start.clone().unwrap_or_default(),
            end_time: self.end.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
            participants: self
                .participants
                .iter()
                .map(|p| parse_participant(p))
                .collect(),
            agenda: self.agenda.clone(),
            general_notes: self.notes.clone().unwrap_or_default(),
            ..MeetingDraft::default()
        }
    }
}

/// Parse `"Name[,email[,role]]"`.
#[must_use]
pub fn parse_participant(value: &str) -> ParticipantDraft {
    let mut parts = value.splitn(3, ',').map(str::trim);
    ParticipantDraft {
        id: None,
        name: parts.next().unwrap_or_default().to_string(),
        email: parts.next().unwrap_or_default().to_string(),
        role: parts.next().unwrap_or_default().to_string(),
    }
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Meeting id
    pub id: String,

    /// Draft file with the new contents
    #[arg(short, long, value_name = "FILE")]
    pub file: PathBuf,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Meeting id
    pub id: String,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Meeting id
    pub id: String,

    /// Output directory (defaults to the configured export directory)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per meeting
    Plain,
    /// Aligned columns
    #[default]
    Table,
    /// JSON array
    Json,
}

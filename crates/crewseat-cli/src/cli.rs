use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crewseat::RosterOptions;

/// Turn crew roster PDFs into seat-reservation messages.
#[derive(Debug, Parser)]
#[command(name = "crewseat", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the seat-reservation message for a roster
    Message {
        /// Path to the roster PDF
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Ignore text positions and split the joined text at markers
        #[arg(long)]
        flat: bool,

        /// Local time used for dating the message, as "YYYY-MM-DD HH:MM". Default: now
        #[arg(long, value_name = "TIME", value_parser = parse_local_time)]
        at: Option<NaiveDateTime>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        template: TemplateArgs,
    },

    /// Print the reconstructed roster lines
    Lines {
        /// Path to the roster PDF
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Ignore text positions and split the joined text at markers
        #[arg(long)]
        flat: bool,

        #[command(flatten)]
        template: TemplateArgs,
    },

    /// Print the flight blocks without header and footer
    Blocks {
        /// Path to the roster PDF
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Ignore text positions and split the joined text at markers
        #[arg(long)]
        flat: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        template: TemplateArgs,
    },
}

/// Roster template overrides shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct TemplateArgs {
    /// Departure station code that opens flight lines (default: CZL)
    #[arg(long, value_name = "CODE")]
    pub station: Option<String>,

    /// Character ending a crew label (default: '#')
    #[arg(long, value_name = "CHAR")]
    pub terminator: Option<char>,

    /// Crew rank code; repeat to replace the default set
    #[arg(long = "role", value_name = "CODE")]
    pub roles: Vec<String>,

    /// Keep the airport statistics section instead of stripping it
    #[arg(long)]
    pub keep_statistics: bool,
}

impl TemplateArgs {
    /// Defaults with any given overrides applied.
    pub fn to_options(&self) -> RosterOptions {
        let mut options = RosterOptions::default();
        if let Some(station) = &self.station {
            options.station = station.clone();
        }
        if let Some(terminator) = self.terminator {
            options.terminator = terminator;
        }
        if !self.roles.is_empty() {
            options.role_codes = self.roles.clone();
        }
        options.strip_statistics = !self.keep_statistics;
        options
    }
}

/// Output format for structured subcommands.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON
    Json,
}

fn parse_local_time(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM\": {e}"))
}

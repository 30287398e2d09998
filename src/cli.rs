//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::scout::QuickAction;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Brickyard Scout - campus food-run companion for BrickyardBytes
///
/// Summarizes the live run list, answers questions about runs and
/// hotspots, and shows the current peak bonus window.
///
/// Examples:
///   brickyard-scout ask "where should I broadcast tonight?"
///   brickyard-scout insights
///   brickyard-scout --runs-file runs.json seats
///   brickyard-scout load 42
///   brickyard-scout --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// BrickyardBytes API base URL
    #[arg(long, value_name = "URL", env = "BRICKYARD_API_BASE", global = true)]
    pub api_base: Option<String>,

    /// Bearer token for the API
    #[arg(long, value_name = "TOKEN", env = "BRICKYARD_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Read the run list from a JSON file instead of the API
    #[arg(long, value_name = "FILE", global = true)]
    pub runs_file: Option<PathBuf>,

    /// Transcript file location
    #[arg(long, value_name = "FILE", global = true)]
    pub transcript: Option<PathBuf>,

    /// Keep this conversation in memory only (nothing is read or written)
    #[arg(long, global = true, conflicts_with = "transcript")]
    pub no_history: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .brickyard.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT", global = true)]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .brickyard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Scout commands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Ask the scout a question about runs, seats, hotspots or broadcasts
    Ask {
        /// The question (words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Live snapshot of all open runs
    Insights,
    /// Runs that are almost full
    Seats,
    /// Broadcast game plan around the current hotspots
    Broadcast,
    /// Print the stored chat transcript
    History,
    /// Reset the chat transcript
    ClearHistory,
    /// Show the current peak bonus window
    Peak,
    /// Peak window plus the run snapshot, without touching the transcript
    Status,
    /// Ask the backend how heavy a run's load looks
    Load {
        /// Run identifier
        run_id: String,
    },
    /// Ask the backend for a run description
    Describe {
        #[arg(long)]
        restaurant: String,
        #[arg(long)]
        drop_point: String,
        #[arg(long)]
        eta: String,
    },
}

impl Command {
    /// The quick action this command maps to, if any.
    pub fn quick_action(&self) -> Option<QuickAction> {
        match self {
            Command::Insights => Some(QuickAction::Insights),
            Command::Seats => Some(QuickAction::SeatAlerts),
            Command::Broadcast => Some(QuickAction::Broadcast),
            _ => None,
        }
    }

    /// Whether the command needs the live run list.
    pub fn needs_runs(&self) -> bool {
        matches!(
            self,
            Command::Ask { .. }
                | Command::Insights
                | Command::Seats
                | Command::Broadcast
                | Command::Status
        )
    }
}

/// Output format for replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain terminal text (default)
    #[default]
    Text,
    /// JSON
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.command.is_none() {
            return Err("A command is required (try --help)".to_string());
        }

        if let Some(ref base) = self.api_base {
            if !base.starts_with("http://") && !base.starts_with("https://") {
                return Err("API base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref runs_file) = self.runs_file {
            if !runs_file.is_file() {
                return Err(format!("Runs file does not exist: {}", runs_file.display()));
            }
        }

        if let Some(Command::Load { ref run_id }) = self.command {
            if run_id.trim().is_empty() {
                return Err("Run id must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            command: Some(Command::Insights),
            api_base: None,
            token: None,
            timeout: None,
            runs_file: None,
            transcript: None,
            no_history: false,
            config: None,
            format: OutputFormat::Text,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_ask_joins_words() {
        let args = Args::try_parse_from(["brickyard-scout", "ask", "where", "should", "I", "go"])
            .unwrap();
        assert_eq!(
            args.command,
            Some(Command::Ask {
                text: vec!["where", "should", "I", "go"]
                    .into_iter()
                    .map(String::from)
                    .collect()
            })
        );
    }

    #[test]
    fn test_parse_global_flags_after_command() {
        let args =
            Args::try_parse_from(["brickyard-scout", "seats", "--format", "json", "-v"]).unwrap();
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.verbose);
        assert_eq!(
            args.command.as_ref().and_then(Command::quick_action),
            Some(QuickAction::SeatAlerts)
        );
    }

    #[test]
    fn test_validation_requires_command() {
        let mut args = make_args();
        args.command = None;
        assert!(args.validate().is_err());

        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_api_base() {
        let mut args = make_args();
        args.api_base = Some("localhost:5050".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_needs_runs() {
        assert!(Command::Insights.needs_runs());
        assert!(Command::Status.needs_runs());
        assert!(!Command::History.needs_runs());
        assert!(!Command::Peak.needs_runs());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}

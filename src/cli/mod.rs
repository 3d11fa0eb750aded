//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Tourmark using clap.

pub mod commands;

use crate::domain::{ErrorKind, TourmarkError};
use clap::{Parser, Subcommand};

/// Tourmark - tourism registry browser with bookmark sync
#[derive(Parser, Debug)]
#[command(name = "tourmark")]
#[command(version, about, long_about = None)]
#[command(author = "Tourmark Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "tourmark.toml", env = "TOURMARK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TOURMARK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse points of interest from the registry
    #[command(subcommand)]
    Places(commands::places::PlacesCommand),

    /// Manage bookmarks
    #[command(subcommand)]
    Bookmarks(commands::bookmarks::BookmarksCommand),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Process exit code for a failed operation
///
/// 2 for configuration and input problems, 4 for anything involving the
/// registry or a store, 5 otherwise.
pub fn exit_code_for(error: &TourmarkError) -> i32 {
    match error.kind() {
        ErrorKind::Configuration | ErrorKind::InvalidInput => 2,
        ErrorKind::Transport
        | ErrorKind::Connection
        | ErrorKind::Domain
        | ErrorKind::UnresolvedIdentity
        | ErrorKind::StoreConflict
        | ErrorKind::Store => 4,
        ErrorKind::Serialization | ErrorKind::Io | ErrorKind::Failure => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::bookmarks::BookmarksCommand;
    use commands::places::PlacesCommand;

    #[test]
    fn test_cli_parse_places_list() {
        let cli = Cli::parse_from(["tourmark", "places", "list", "--area", "1"]);
        assert_eq!(cli.config, "tourmark.toml");
        match cli.command {
            Commands::Places(PlacesCommand::List(args)) => {
                assert_eq!(args.filters.area.as_deref(), Some("1"));
                assert_eq!(args.filters.page, 1);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["tourmark", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["tourmark", "--log-level", "debug", "init"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_search_requires_keyword() {
        assert!(Cli::try_parse_from(["tourmark", "places", "search"]).is_err());
        let cli = Cli::parse_from(["tourmark", "places", "search", "palace", "--sort", "name"]);
        assert!(matches!(cli.command, Commands::Places(PlacesCommand::Search(_))));
    }

    #[test]
    fn test_cli_rejects_page_zero() {
        assert!(Cli::try_parse_from(["tourmark", "places", "list", "--page", "0"]).is_err());
    }

    #[test]
    fn test_cli_parse_bookmarks_delete() {
        let cli = Cli::parse_from([
            "tourmark", "bookmarks", "delete", "1", "2", "--subject", "sub",
        ]);
        match cli.command {
            Commands::Bookmarks(BookmarksCommand::Delete(args)) => {
                assert_eq!(args.ids, vec!["1", "2"]);
                assert_eq!(args.identity.subject.as_deref(), Some("sub"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code_for(&TourmarkError::Configuration("x".to_string())),
            2
        );
        assert_eq!(
            exit_code_for(&TourmarkError::Domain {
                code: "30".to_string(),
                message: "x".to_string()
            }),
            4
        );
        assert_eq!(exit_code_for(&TourmarkError::Failure("x".to_string())), 5);
    }
}

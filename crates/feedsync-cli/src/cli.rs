use std::path::PathBuf;

use clap::{Parser, Subcommand};
use feedsync_types::SyncType;

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(
    name = "feedsync",
    about = "Sync a product export into a spreadsheet product feed",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[arg(short, long, global = true, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Plan the writes without touching the sheet
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Sync stock levels of the configured warehouse
    Inventory,
    /// Sync sales prices
    Price,
    /// Sync titles and descriptions
    Text,
    /// Sync color and size attributes
    #[command(alias = "attr")]
    Attribute,
}

impl Command {
    pub fn sync_type(&self) -> SyncType {
        match self {
            Self::Inventory => SyncType::Inventory,
            Self::Price => SyncType::Price,
            Self::Text => SyncType::Text,
            Self::Attribute => SyncType::Attr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_inventory() {
        let cli = Cli::try_parse_from(["feedsync", "inventory"]).unwrap();
        assert!(matches!(cli.command, Command::Inventory));
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(cli.log_level, LogLevel::Info);
        assert!(!cli.dry_run);
    }

    #[test]
    fn parse_attribute_alias() {
        let cli = Cli::try_parse_from(["feedsync", "attr"]).unwrap();
        assert_eq!(cli.command.sync_type(), SyncType::Attr);
        let cli = Cli::try_parse_from(["feedsync", "attribute"]).unwrap();
        assert_eq!(cli.command.sync_type(), SyncType::Attr);
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "feedsync",
            "price",
            "--config",
            "/tmp/feedsync.toml",
            "--log-level",
            "debug",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.command.sync_type(), SyncType::Price);
        assert_eq!(cli.config, PathBuf::from("/tmp/feedsync.toml"));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert!(cli.dry_run);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["feedsync", "--format", "json", "text"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn sync_type_is_required() {
        assert!(Cli::try_parse_from(["feedsync"]).is_err());
        assert!(Cli::try_parse_from(["feedsync", "stock"]).is_err());
    }

    #[test]
    fn log_level_maps_to_tracing() {
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
    }
}

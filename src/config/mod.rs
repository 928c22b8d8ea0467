pub mod file;

use crate::core::dispatcher::{DispatchLimits, DEFAULT_MAX_TOTAL, DEFAULT_SYNC_THRESHOLD};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_positive_number, validate_range, validate_socket_addr, Validate,
};
use clap::Parser;
use self::file::FileConfig;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, Parser)]
#[command(name = "dose-count")]
#[command(about = "Counts ordered 1-or-2 pill dose sequences for a total, over HTTP")]
pub struct CliConfig {
    /// Address to serve on
    #[arg(long)]
    pub bind: Option<String>,

    /// Largest total accepted by the request boundary
    #[arg(long)]
    pub max_total: Option<u32>,

    /// Largest total computed synchronously; anything above is deferred
    #[arg(long)]
    pub sync_threshold: Option<u32>,

    /// Capacity of the task-creation notification channel
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Emit JSON logs instead of human-readable ones
    #[arg(long)]
    pub json_logs: bool,
}

/// Fully resolved runtime settings. Precedence: CLI flag, then config file,
/// then built-in default.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: String,
    pub max_total: u32,
    pub sync_threshold: u32,
    pub queue_capacity: usize,
}

impl Settings {
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                tracing::debug!("Loading config file: {}", path);
                FileConfig::load(path)?
            }
            None => FileConfig::default(),
        };
        Ok(Self::merge(cli, &file))
    }

    fn merge(cli: &CliConfig, file: &FileConfig) -> Self {
        let server = file.server.clone().unwrap_or_default();
        let dispatch = file.dispatch.clone().unwrap_or_default();

        Self {
            bind: cli
                .bind
                .clone()
                .or(server.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            max_total: cli
                .max_total
                .or(dispatch.max_total)
                .unwrap_or(DEFAULT_MAX_TOTAL),
            sync_threshold: cli
                .sync_threshold
                .or(dispatch.sync_threshold)
                .unwrap_or(DEFAULT_SYNC_THRESHOLD),
            queue_capacity: cli
                .queue_capacity
                .or(server.queue_capacity)
                .unwrap_or(DEFAULT_QUEUE_CAPACITY),
        }
    }

    pub fn limits(&self) -> DispatchLimits {
        DispatchLimits {
            max_total: self.max_total,
            sync_threshold: self.sync_threshold,
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("bind", &self.bind)?;
        validate_range("max_total", self.max_total, 1, u32::MAX)?;
        validate_range("sync_threshold", self.sync_threshold, 1, self.max_total)?;
        validate_positive_number("queue_capacity", self.queue_capacity, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file::{DispatchSection, ServerSection};

    fn empty_cli() -> CliConfig {
        CliConfig {
            bind: None,
            max_total: None,
            sync_threshold: None,
            queue_capacity: None,
            config: None,
            verbose: false,
            json_logs: false,
        }
    }

    #[test]
    fn test_defaults_when_nothing_given() {
        let settings = Settings::merge(&empty_cli(), &FileConfig::default());
        assert_eq!(settings.bind, DEFAULT_BIND);
        assert_eq!(settings.max_total, 47);
        assert_eq!(settings.sync_threshold, 43);
        assert_eq!(settings.queue_capacity, 64);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_cli_wins_over_file() {
        let mut cli = empty_cli();
        cli.sync_threshold = Some(30);

        let file = FileConfig {
            server: Some(ServerSection {
                bind: Some("0.0.0.0:9000".to_string()),
                queue_capacity: None,
            }),
            dispatch: Some(DispatchSection {
                max_total: None,
                sync_threshold: Some(40),
            }),
        };

        let settings = Settings::merge(&cli, &file);
        assert_eq!(settings.sync_threshold, 30);
        assert_eq!(settings.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_threshold_above_max_total_rejected() {
        let mut cli = empty_cli();
        cli.max_total = Some(40);
        cli.sync_threshold = Some(45);

        let settings = Settings::merge(&cli, &FileConfig::default());
        assert!(settings.validate().is_err());
    }
}

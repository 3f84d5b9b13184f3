//! Service configuration.
//!
//! Loaded from a YAML file with per-field defaults; the database path can
//! also be overridden by `TASK_REMINDER_DB_PATH` or the CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default scan interval between due-reminder cycles.
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 60;

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database: PathBuf,

    /// Scanner settings.
    #[serde(default)]
    pub scan: ScanConfig,

    /// SMTP settings for the email transport. When absent, email
    /// notifications are logged instead of sent.
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

/// Reminder scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Seconds between scan cycles (default: 60).
    #[serde(default = "default_scan_interval_secs")]
    pub interval_secs: u64,
}

/// SMTP relay settings for the email transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender mailbox, e.g. `Task Reminder <noreply@example.com>`.
    pub from: String,
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("task-reminder")
        .join("tasks.db")
}

fn default_scan_interval_secs() -> u64 {
    DEFAULT_SCAN_INTERVAL_SECS
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            scan: ScanConfig::default(),
            smtp: None,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_scan_interval_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.apply_env();
        Ok(config)
    }

    /// Load from a file if given, otherwise use defaults. Environment
    /// overrides apply in both cases.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let mut config = Self::default();
                config.apply_env();
                Ok(config)
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(db) = std::env::var("TASK_REMINDER_DB_PATH") {
            self.database = PathBuf::from(db);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_for_missing_fields() {
        let config: Config = serde_yaml::from_str("database: /tmp/t.db").unwrap();
        assert_eq!(config.database, PathBuf::from("/tmp/t.db"));
        assert_eq!(config.scan.interval_secs, DEFAULT_SCAN_INTERVAL_SECS);
        assert!(config.smtp.is_none());
    }

    #[test]
    fn full_config_parses() {
        let yaml = "
database: /tmp/t.db
scan:
  interval_secs: 5
smtp:
  host: smtp.example.com
  username: user
  password: secret
  from: noreply@example.com
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.scan.interval_secs, 5);
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.host, "smtp.example.com");
        assert_eq!(smtp.port, 587);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scan:\n  interval_secs: 10").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.scan.interval_secs, 10);
    }
}

//! Configuration file support for the wellness services.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/wellness/config.toml`, then
//! individual settings may be overridden from the environment (the Lambda
//! deployment configures itself that way).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub tables: TableConfig,

    #[serde(default)]
    pub lookup: LookupConfig,

    #[serde(default)]
    pub notifier: NotifierConfig,

    #[serde(default)]
    pub aws: AwsConfig,
}

/// Local data storage configuration (JSONL stores used by the CLI)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Names of the tables backing each endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_diet_table")]
    pub diet_report: String,

    #[serde(default = "default_posture_table")]
    pub posture_report: String,

    #[serde(default = "default_questions_table")]
    pub questions: String,

    #[serde(default = "default_newsletter_table")]
    pub newsletter: String,

    #[serde(default = "default_register_table")]
    pub registrations: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            diet_report: default_diet_table(),
            posture_report: default_posture_table(),
            questions: default_questions_table(),
            newsletter: default_newsletter_table(),
            registrations: default_register_table(),
        }
    }
}

/// Recommendation lookup parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_lookup_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_lookup_timeout_ms(),
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Outbound notification settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default = "default_sender_email")]
    pub sender_email: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            sender_email: default_sender_email(),
        }
    }
}

/// AWS settings; the region falls back to the SDK's own resolution when unset
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AwsConfig {
    #[serde(default)]
    pub region: Option<String>,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wellness")
}

fn default_diet_table() -> String {
    "dietreport".into()
}

fn default_posture_table() -> String {
    "posturereport".into()
}

fn default_questions_table() -> String {
    "QuestionsTable".into()
}

fn default_newsletter_table() -> String {
    "landingnewsletter".into()
}

fn default_register_table() -> String {
    "Register_Data".into()
}

fn default_lookup_timeout_ms() -> u64 {
    2000
}

fn default_sender_email() -> String {
    "info@dyadic.health".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Defaults overlaid with process environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay settings from a key lookup (normally the process environment)
    ///
    /// Recognised keys: `DIET_TABLE`, `POSTURE_TABLE`, `QUESTIONS_TABLE`,
    /// `NEWSLETTER_TABLE`, `REGISTER_TABLE`, `LOOKUP_TIMEOUT_MS`,
    /// `SENDER_EMAIL`, `AWS_REGION`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tables = [
            ("DIET_TABLE", &mut self.tables.diet_report),
            ("POSTURE_TABLE", &mut self.tables.posture_report),
            ("QUESTIONS_TABLE", &mut self.tables.questions),
            ("NEWSLETTER_TABLE", &mut self.tables.newsletter),
            ("REGISTER_TABLE", &mut self.tables.registrations),
        ];
        for (key, slot) in tables {
            if let Some(value) = lookup(key) {
                *slot = value;
            }
        }

        if let Some(raw) = lookup("LOOKUP_TIMEOUT_MS") {
            self.lookup.timeout_ms = raw.trim().parse().map_err(|e| {
                Error::Config(format!("LOOKUP_TIMEOUT_MS must be an integer: {}", e))
            })?;
        }
        if let Some(sender) = lookup("SENDER_EMAIL") {
            self.notifier.sender_email = sender;
        }
        if let Some(region) = lookup("AWS_REGION") {
            self.aws.region = Some(region);
        }

        self.validate()
    }

    /// Reject settings no request could succeed with
    pub fn validate(&self) -> Result<()> {
        if self.lookup.timeout_ms == 0 {
            return Err(Error::Config("lookup timeout must be non-zero".into()));
        }
        let tables = [
            &self.tables.diet_report,
            &self.tables.posture_report,
            &self.tables.questions,
            &self.tables.newsletter,
            &self.tables.registrations,
        ];
        if tables.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::Config("table names must not be empty".into()));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wellness")
            .join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

//! Configuration management for feestatus
//!
//! This module handles loading, validation, and management of
//! feestatus configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

/// Column keys accepted by `display.sort_column`
pub const SORT_COLUMN_KEYS: [&str; 8] = [
    "enrollmentNo",
    "fullName",
    "email",
    "mobile",
    "year",
    "modeOfPayment",
    "amount",
    "feeStatus",
];

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

// ==================== Configuration Types ====================

/// Remote FeeStatus API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API server, without the `/api/FeeStatus` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Accept self-signed TLS certificates (local development server)
    #[serde(default = "default_false")]
    pub accept_invalid_certs: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            accept_invalid_certs: false,
        }
    }
}

fn default_base_url() -> String {
    "https://localhost:7209".to_string()
}

fn default_false() -> bool {
    false
}

/// Officer shown in the module header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficerConfig {
    #[serde(default = "default_officer_name")]
    pub name: String,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub email: String,
}

impl Default for OfficerConfig {
    fn default() -> Self {
        Self {
            name: default_officer_name(),
            designation: None,
            email: String::new(),
        }
    }
}

fn default_officer_name() -> String {
    "Accounts Officer".to_string()
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Asc
    }
}

impl SortDirection {
    /// The opposite direction
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Table display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Column sorted on first activation
    #[serde(default = "default_sort_column")]
    pub sort_column: String,
    /// Initial sort direction
    #[serde(default)]
    pub sort_direction: SortDirection,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            sort_column: default_sort_column(),
            sort_direction: SortDirection::Asc,
        }
    }
}

fn default_sort_column() -> String {
    "enrollmentNo".to_string()
}

/// Proof-of-payment download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory downloaded proofs are written to
    #[serde(default = "default_download_dir")]
    pub directory: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: default_download_dir(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Officer identity
    #[serde(default)]
    pub officer: OfficerConfig,
    /// Table display settings
    #[serde(default)]
    pub display: DisplayConfig,
    /// Download settings
    #[serde(default)]
    pub download: DownloadConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "api.base_url".to_string(),
            });
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: "Base URL must start with http:// or https://".to_string(),
            });
        }

        let sort_column = self.display.sort_column.trim();
        if !SORT_COLUMN_KEYS.iter().any(|key| key.eq_ignore_ascii_case(sort_column)) {
            return Err(ConfigError::InvalidValue {
                field: "display.sort_column".to_string(),
                reason: format!("Sort column must be one of: {}", SORT_COLUMN_KEYS.join(", ")),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}

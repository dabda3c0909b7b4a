//! CLI configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration, stored at `~/.keycloak/kcc.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Server URL (e.g., http://localhost:8080).
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Realm the admin user logs into.
    #[serde(default = "default_login_realm")]
    pub login_realm: String,

    /// Client used for the password grant.
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Admin username.
    pub username: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Output format.
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_login_realm() -> String {
    "master".to_string()
}

fn default_client_id() -> String {
    "admin-cli".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            login_realm: default_login_realm(),
            client_id: default_client_id(),
            username: None,
            timeout_secs: default_timeout_secs(),
            output_format: OutputFormat::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from file, or the defaults when there is none.
    pub fn load() -> crate::CliResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses a TOML configuration. Missing keys take their defaults.
    pub fn parse(content: &str) -> crate::CliResult<Self> {
        toml::from_str(content)
            .map_err(|e| crate::CliError::Config(format!("failed to parse config: {e}")))
    }

    /// Saves configuration to file.
    pub fn save(&self) -> crate::CliResult<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            crate::CliError::Config(format!("failed to serialize config: {e}"))
        })?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Gets the configuration file path.
    pub fn config_path() -> crate::CliResult<PathBuf> {
        let home = dirs_next::home_dir().ok_or_else(|| {
            crate::CliError::Config("could not determine home directory".to_string())
        })?;
        Ok(home.join(".keycloak").join("kcc.toml"))
    }
}

/// Output format.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
    /// Quiet (errors only).
    Quiet,
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::CliError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "quiet" => Ok(Self::Quiet),
            _ => Err(crate::CliError::InvalidArgument(format!(
                "Unknown output format: {value}. Supported: table, json, quiet"
            ))),
        }
    }
}

/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed application configuration
[POS]:    Configuration layer - backend endpoints and local paths
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use taskdeck_adapter::{BackendClient, ClientConfig, Endpoints};

/// Top-level configuration for the taskdeck client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Identity provider base URL
    #[serde(default = "default_base_url")]
    pub auth_base_url: String,
    /// Object store base URL
    #[serde(default = "default_base_url")]
    pub storage_base_url: String,
    /// Structured-data API base URL
    #[serde(default = "default_base_url")]
    pub data_base_url: String,
    #[serde(default)]
    pub http: HttpConfig,
    /// Lifetime of resolved file URLs, in seconds
    #[serde(default = "default_url_expires_secs")]
    pub url_expires_secs: u64,
    /// Preference file (avatar pointer, saved session)
    #[serde(default)]
    pub prefs_path: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// HTTP client timeouts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth_base_url: default_base_url(),
            storage_base_url: default_base_url(),
            data_base_url: default_base_url(),
            http: HttpConfig::default(),
            url_expires_secs: default_url_expires_secs(),
            prefs_path: None,
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content).context("parse config yaml")?;
        Ok(config)
    }

    /// Load `path` when given, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.http.timeout_secs),
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
        }
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        Endpoints::new(
            &self.auth_base_url,
            &self.storage_base_url,
            &self.data_base_url,
        )
        .context("invalid backend endpoint")
    }

    pub fn build_client(&self) -> Result<BackendClient> {
        BackendClient::with_config_and_endpoints(self.client_config(), self.endpoints()?)
            .context("build backend client")
    }

    pub fn url_expires_in(&self) -> Duration {
        Duration::from_secs(self.url_expires_secs)
    }

    /// Configured preference file, else `{data_dir}/taskdeck/prefs.json`.
    pub fn resolved_prefs_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.prefs_path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir().context("could not determine data directory")?;
        Ok(data_dir.join("taskdeck").join("prefs.json"))
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:4000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_url_expires_secs() -> u64 {
    900
}

fn default_log_level() -> String {
    "info".to_string()
}

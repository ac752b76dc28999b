//! Configuration file model and loading

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{ConfigError, Result};
use crate::http::Endpoints;
use crate::iaas::NETWORK_TIMEOUT;
use crate::skcf::{CLUSTER_TIMEOUT, SERVICE_TIMEOUT};
use crate::wait::DEFAULT_INTERVAL;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// STACKIT region, used to build the default API endpoints
    #[serde(default = "default_region")]
    pub region: String,
    /// Override for the SKCF API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skcf_url: Option<String>,
    /// Override for the IaaS API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iaas_url: Option<String>,
    /// Bearer token sent with every status read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub wait: WaitSettings,
}

/// Default polling settings, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitSettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_cluster_timeout_secs")]
    pub cluster_timeout_secs: u64,
    #[serde(default = "default_service_timeout_secs")]
    pub service_timeout_secs: u64,
    #[serde(default = "default_network_timeout_secs")]
    pub network_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: default_region(),
            skcf_url: None,
            iaas_url: None,
            token: None,
            wait: WaitSettings::default(),
        }
    }
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            cluster_timeout_secs: default_cluster_timeout_secs(),
            service_timeout_secs: default_service_timeout_secs(),
            network_timeout_secs: default_network_timeout_secs(),
        }
    }
}

impl WaitSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn cluster_timeout(&self) -> Duration {
        Duration::from_secs(self.cluster_timeout_secs)
    }

    pub fn service_timeout(&self) -> Duration {
        Duration::from_secs(self.service_timeout_secs)
    }

    pub fn network_timeout(&self) -> Duration {
        Duration::from_secs(self.network_timeout_secs)
    }
}

impl Config {
    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// A missing file is not an error; it yields the defaults.
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        let expanded_content = Self::expand_env_vars(&content);
        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Base URL of the SKCF API
    pub fn skcf_endpoint(&self) -> Result<String> {
        match &self.skcf_url {
            Some(url) => Ok(trim_url(url)),
            None => Ok(regional_endpoint("skcf", self.checked_region()?)),
        }
    }

    /// Base URL of the IaaS API
    pub fn iaas_endpoint(&self) -> Result<String> {
        match &self.iaas_url {
            Some(url) => Ok(trim_url(url)),
            None => Ok(regional_endpoint("iaas", self.checked_region()?)),
        }
    }

    /// Both API base URLs, ready for [`StackitClient`](crate::StackitClient)
    pub fn endpoints(&self) -> Result<Endpoints> {
        Ok(Endpoints {
            skcf: self.skcf_endpoint()?,
            iaas: self.iaas_endpoint()?,
        })
    }

    fn checked_region(&self) -> Result<&str> {
        let region = self.region.trim();
        if region.is_empty() || !region.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidRegion(self.region.clone()));
        }
        Ok(region)
    }

    /// Get the path to the configuration file
    ///
    /// On Linux: ~/.config/stackctl/config.toml
    /// On macOS: ~/.config/stackctl/config.toml when that directory exists,
    /// otherwise ~/Library/Application Support/cloud.stackit.stackctl/config.toml
    /// On Windows: %APPDATA%\stackit\stackctl\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_dir = base_dirs.home_dir().join(".config").join("stackctl");
                if linux_style_dir.exists() {
                    return Ok(linux_style_dir.join("config.toml"));
                }
            }
        }

        let proj_dirs =
            ProjectDirs::from("cloud", "stackit", "stackctl").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand environment variables in configuration content
    ///
    /// Supports `${VAR}` and `${VAR:-default}`. Unset variables without a
    /// default are left as written.
    ///
    /// ```toml
    /// token = "${STACKIT_SERVICE_ACCOUNT_TOKEN}"
    /// region = "${STACKIT_REGION:-eu01}"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok()).to_string()
    }
}

fn regional_endpoint(service: &str, region: &str) -> String {
    format!("https://{service}.api.{region}.stackit.cloud")
}

fn trim_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn default_region() -> String {
    "eu01".to_string()
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL.as_secs()
}

fn default_cluster_timeout_secs() -> u64 {
    CLUSTER_TIMEOUT.as_secs()
}

fn default_service_timeout_secs() -> u64 {
    SERVICE_TIMEOUT.as_secs()
}

fn default_network_timeout_secs() -> u64 {
    NETWORK_TIMEOUT.as_secs()
}

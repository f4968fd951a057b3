/**
 * config.rs
 * Parser for switchboard.yaml
 *
 * Format:
 * ```yaml
 * storeDir: /home/me/.config/switchboard/store
 * addressBook:
 *   deploymentUrl: https://happy-otter-123.convex.cloud
 * impersonation:
 *   tool: a3g
 *   unimpersonateTool: impersonation_banner
 * http:
 *   timeoutSecs: 30
 * ```
 *
 * Every section is optional. Environment overrides, applied after the file:
 * - SWITCHBOARD_STORE_DIR
 * - SWITCHBOARD_CONVEX_URL
 */

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::errors::{Result, SwitchError};

pub const CONFIG_FILE_NAME: &str = "switchboard.yaml";
pub const ENV_STORE_DIR: &str = "SWITCHBOARD_STORE_DIR";
pub const ENV_CONVEX_URL: &str = "SWITCHBOARD_CONVEX_URL";

/// switchboard.yaml structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SwitchboardConfig {
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_book: Option<AddressBookSettings>,
    #[serde(default)]
    pub impersonation: ImpersonationSettings,
    #[serde(default)]
    pub http: HttpSettings,
}

/// Hosted partner address book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddressBookSettings {
    pub deployment_url: String,
}

/// Tool names sent with the impersonation calls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImpersonationSettings {
    #[serde(default = "default_tool")]
    pub tool: String,
    #[serde(default = "default_unimpersonate_tool")]
    pub unimpersonate_tool: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn config_home() -> Option<PathBuf> {
    env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("switchboard"))
}

fn default_store_dir() -> PathBuf {
    config_home()
        .map(|dir| dir.join("store"))
        .unwrap_or_else(|| PathBuf::from(".switchboard"))
}

fn default_tool() -> String {
    "a3g".to_string()
}

fn default_unimpersonate_tool() -> String {
    "impersonation_banner".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ImpersonationSettings {
    fn default() -> Self {
        ImpersonationSettings {
            tool: default_tool(),
            unimpersonate_tool: default_unimpersonate_tool(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SwitchboardConfig {
    fn default() -> Self {
        SwitchboardConfig {
            store_dir: default_store_dir(),
            address_book: None,
            impersonation: ImpersonationSettings::default(),
            http: HttpSettings::default(),
        }
    }
}

impl SwitchboardConfig {
    /// Load and validate a config file
    ///
    /// # Errors
    /// - `Config` if the file is missing or not valid YAML
    /// - `Validation` if a value is out of range
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SwitchError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let config: SwitchboardConfig = serde_yaml::from_str(&content).map_err(|e| {
            SwitchError::Config(format!("Invalid {} YAML: {}", path.display(), e))
        })?;

        config.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Resolve the config the CLI runs with
    ///
    /// An explicit path must exist. Otherwise `./switchboard.yaml`, then
    /// `~/.config/switchboard/switchboard.yaml`, then defaults. Environment
    /// overrides are applied last.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => {
                let candidates = std::iter::once(PathBuf::from(CONFIG_FILE_NAME))
                    .chain(config_home().map(|dir| dir.join(CONFIG_FILE_NAME)));
                match candidates.into_iter().find(|p| p.exists()) {
                    Some(path) => Self::load(path)?,
                    None => Self::default(),
                }
            }
        };

        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_STORE_DIR).filter(|v| !v.is_empty()) {
            self.store_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup(ENV_CONVEX_URL).filter(|v| !v.is_empty()) {
            self.address_book = Some(AddressBookSettings {
                deployment_url: url,
            });
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.store_dir.as_os_str().is_empty() {
            return Err(SwitchError::Validation(
                "storeDir cannot be empty".to_string(),
            ));
        }

        if self.impersonation.tool.is_empty() {
            return Err(SwitchError::Validation(
                "impersonation.tool cannot be empty".to_string(),
            ));
        }

        if self.http.timeout_secs == 0 {
            return Err(SwitchError::Validation(
                "http.timeoutSecs must be greater than 0".to_string(),
            ));
        }

        if let Some(book) = &self.address_book {
            let url = &book.deployment_url;
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(SwitchError::Validation(format!(
                    "addressBook.deploymentUrl must be an http(s) URL, got '{}'",
                    url
                )));
            }
        }

        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    /// Address book deployment URL, required by the partner commands
    pub fn deployment_url(&self) -> Result<&str> {
        self.address_book
            .as_ref()
            .map(|b| b.deployment_url.as_str())
            .ok_or_else(|| {
                SwitchError::Config(format!(
                    "no address book configured (set addressBook.deploymentUrl or {})",
                    ENV_CONVEX_URL
                ))
            })
    }
}

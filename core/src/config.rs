//! Client configuration, loaded from `config.yaml` in the vault config
//! directory. Missing directory or file is bootstrapped with defaults on
//! first load, so a fresh install works without manual setup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::SortOrder;


fn default_base_url() -> String {
    "http://localhost:3000/".to_string()
}

fn default_token_file() -> String {
    "token".to_string()
}


/// Settings for the REST client and the work-order list default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the HTM Vault backend, with trailing slash.
    #[serde(default = "default_base_url")]
    pub api_base_url: String,
    /// Name of the bearer-token file inside the config directory. The
    /// `HTM_VAULT_TOKEN` environment variable takes precedence.
    #[serde(default = "default_token_file")]
    pub token_file: String,
    /// Order applied to work-order lists when none is requested.
    #[serde(default)]
    pub default_order: SortOrder,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_base_url: default_base_url(),
            token_file: default_token_file(),
            default_order: SortOrder::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from `config_dir/config.yaml`, creating the
    /// directory and writing defaults first when the file is missing.
    pub fn load(config_dir: &Path) -> Result<ClientConfig, ConfigError> {
        let path = config_dir.join("config.yaml");
        if !path.exists() {
            fs::create_dir_all(config_dir)?;
            let defaults = ClientConfig::default();
            let yaml = serde_yaml::to_string(&defaults).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;
            fs::write(&path, yaml)?;
            return Ok(defaults);
        }

        let raw = fs::read_to_string(&path)?;
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path,
            message: e.to_string(),
        })
    }

    /// Absolute path of the token file for this configuration.
    pub fn token_path(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(&self.token_file)
    }
}


/// Resolve the vault config directory: `$HTM_VAULT_CONFIG_DIR` if set,
/// otherwise `~/.htm-vault`.
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("HTM_VAULT_CONFIG_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    match std::env::var("HOME") {
        Ok(home) => Path::new(&home).join(".htm-vault"),
        Err(_) => PathBuf::from(".htm-vault"),
    }
}

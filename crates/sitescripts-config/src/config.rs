use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Entry-point groups that produce launchers unless configured otherwise
pub const DEFAULT_GROUPS: &[&str] = &["console_scripts", "gui_scripts"];

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "SITESCRIPTS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// How long an interpreter path may be before the `/bin/sh` fallback is used
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShebangPolicy {
    /// 127 bytes, the limit before Linux 5.1
    #[default]
    Legacy,
    /// 255 bytes, Linux 5.1 and later
    Modern,
    /// Ask the running kernel
    Detect,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_prefix: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_base: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_user_site: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_system_site: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shebang_limit: Option<ShebangPolicy>,
}

impl Config {
    /// Config file location.
    ///
    /// `SITESCRIPTS_CONFIG` wins when set and non-empty, otherwise
    /// `<config dir>/sitescripts/sitescripts.toml`.
    pub fn path() -> Option<PathBuf> {
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }

        dirs::config_dir().map(|dir| dir.join("sitescripts").join("sitescripts.toml"))
    }

    /// Load the config file, or defaults when it does not exist
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn include_user_site(&self) -> bool {
        self.include_user_site.unwrap_or(true)
    }

    pub fn require_system_site(&self) -> bool {
        self.require_system_site.unwrap_or(true)
    }

    pub fn groups(&self) -> Vec<String> {
        self.groups.clone().unwrap_or_else(|| {
            DEFAULT_GROUPS
                .iter()
                .map(|group| (*group).to_string())
                .collect()
        })
    }

    pub fn shebang_limit(&self) -> ShebangPolicy {
        self.shebang_limit.unwrap_or_default()
    }
}

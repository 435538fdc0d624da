// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Provisioner Configuration
//
// Process-wide settings read once at startup:
// - NFS server address and export base path
// - Local mount root of the export
// - Provisioner identity and leader election toggle
// - Default directory mode and ownership
//
// Values come from an optional YAML file and are overridden by environment
// variables. `ProvisionerConfig` holds the raw strings; `ProvisionerSettings`
// is the validated, typed form handed to the provisioner.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::parameters::{parse_bool, parse_id, parse_mode, ParameterError};
use crate::domain::paths::DEFAULT_MOUNT_ROOT;

pub const CONFIG_PATH_ENV: &str = "NFS_PROVISIONER_CONFIG";
pub const SERVER_ENV: &str = "NFS_SERVER";
pub const PATH_ENV: &str = "NFS_PATH";
pub const MOUNT_ROOT_ENV: &str = "NFS_MOUNT_ROOT";
pub const PROVISIONER_NAME_ENV: &str = "PROVISIONER_NAME";
pub const DEFAULT_MODE_ENV: &str = "NFS_DEFAULT_MODE";
pub const DEFAULT_UID_ENV: &str = "NFS_DEFAULT_UID";
pub const DEFAULT_GID_ENV: &str = "NFS_DEFAULT_GID";
pub const LEADER_ELECTION_ENV: &str = "ENABLE_LEADER_ELECTION";

/// Raw provisioner configuration as read from file and environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionerConfig {
    /// NFS server address
    #[serde(default)]
    pub server: String,

    /// Export base path on the server
    #[serde(default)]
    pub path: String,

    /// Where the export is mounted inside this process
    #[serde(default = "default_mount_root")]
    pub mount_root: String,

    #[serde(default)]
    pub provisioner_name: String,

    /// Octal mode; empty means 0777
    #[serde(default)]
    pub default_mode: String,

    /// Decimal uid; empty means 0
    #[serde(default)]
    pub default_uid: String,

    /// Decimal gid; empty means 0
    #[serde(default)]
    pub default_gid: String,

    /// Boolean string; empty means enabled
    #[serde(default)]
    pub leader_election: String,
}

/// Validated process settings. Immutable after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionerSettings {
    pub server: String,
    pub export_path: PathBuf,
    pub mount_root: PathBuf,
    pub provisioner_name: String,
    pub default_mode: u32,
    pub default_uid: u32,
    pub default_gid: u32,
    pub leader_election: bool,
}

/// Startup configuration errors; all of them are fatal
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("failed to parse {key}: {source}")]
    InvalidValue {
        key: &'static str,
        #[source]
        source: ParameterError,
    },

    #[error("failed to load configuration from {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },
}

fn default_mount_root() -> String {
    DEFAULT_MOUNT_ROOT.to_string()
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            path: String::new(),
            mount_root: default_mount_root(),
            provisioner_name: String::new(),
            default_mode: String::new(),
            default_uid: String::new(),
            default_gid: String::new(),
            leader_election: String::new(),
        }
    }
}

impl ProvisionerConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Discover a configuration file
    /// 1. NFS_PROVISIONER_CONFIG environment variable
    /// 2. ./nfs-provisioner.yaml
    /// 3. /etc/nfs-subdir-provisioner/config.yaml
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./nfs-provisioner.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        let system_config = PathBuf::from("/etc/nfs-subdir-provisioner/config.yaml");
        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, falling back to defaults, then
    /// apply environment overrides
    pub fn load_or_default(cli_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            Self::from_yaml_file(&path)?
        } else if let Some(path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", path);
            Self::from_yaml_file(&path)?
        } else {
            tracing::debug!("No configuration file found, using environment only");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source. Empty values do
    /// not override.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut String); 8] = [
            (SERVER_ENV, &mut self.server),
            (PATH_ENV, &mut self.path),
            (MOUNT_ROOT_ENV, &mut self.mount_root),
            (PROVISIONER_NAME_ENV, &mut self.provisioner_name),
            (DEFAULT_MODE_ENV, &mut self.default_mode),
            (DEFAULT_UID_ENV, &mut self.default_uid),
            (DEFAULT_GID_ENV, &mut self.default_gid),
            (LEADER_ELECTION_ENV, &mut self.leader_election),
        ];

        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                tracing::debug!("Environment override: {}", key);
                *field = value;
            }
        }
    }

    /// Validate and convert into typed settings
    pub fn settings(&self) -> Result<ProvisionerSettings, ConfigError> {
        if self.server.is_empty() {
            return Err(ConfigError::Missing(SERVER_ENV));
        }
        if self.path.is_empty() {
            return Err(ConfigError::Missing(PATH_ENV));
        }
        if self.provisioner_name.is_empty() {
            return Err(ConfigError::Missing(PROVISIONER_NAME_ENV));
        }

        let invalid = |key: &'static str| move |source| ConfigError::InvalidValue { key, source };

        let default_mode = parse_mode(&self.default_mode).map_err(invalid(DEFAULT_MODE_ENV))?;
        let default_uid = parse_id(&self.default_uid).map_err(invalid(DEFAULT_UID_ENV))?;
        let default_gid = parse_id(&self.default_gid).map_err(invalid(DEFAULT_GID_ENV))?;
        let leader_election = if self.leader_election.is_empty() {
            true
        } else {
            parse_bool(&self.leader_election).map_err(invalid(LEADER_ELECTION_ENV))?
        };

        let mount_root = if self.mount_root.is_empty() {
            PathBuf::from(DEFAULT_MOUNT_ROOT)
        } else {
            PathBuf::from(&self.mount_root)
        };

        Ok(ProvisionerSettings {
            server: self.server.clone(),
            export_path: PathBuf::from(&self.path),
            mount_root,
            provisioner_name: self.provisioner_name.clone(),
            default_mode,
            default_uid,
            default_gid,
            leader_election,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.settings()?;
        Ok(())
    }
}

// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Provisioner bootstrap
//!
//! Turns configuration and a storage-class file into a ready
//! `NfsSubdirProvisioner`, and reports the volume events it emits.
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Wires core services for one-shot CLI invocations

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::info;

use nfs_subdir_core::application::NfsSubdirProvisioner;
use nfs_subdir_core::domain::config::{
    ConfigError, ProvisionerConfig, ProvisionerSettings, DEFAULT_GID_ENV, DEFAULT_MODE_ENV,
    DEFAULT_UID_ENV, LEADER_ELECTION_ENV, MOUNT_ROOT_ENV, PATH_ENV, PROVISIONER_NAME_ENV,
    SERVER_ENV,
};
use nfs_subdir_core::infrastructure::EventReceiver;
use nfs_subdir_core::infrastructure::{LocalVolumeFilesystem, StaticStorageClassRegistry};

/// Process configuration flags. Each one falls back to its environment
/// variable and, when given, wins over the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ProcessArgs {
    /// NFS server address
    #[arg(long, global = true, env = "NFS_SERVER")]
    pub nfs_server: Option<String>,

    /// Export base path on the NFS server
    #[arg(long, global = true, env = "NFS_PATH")]
    pub nfs_path: Option<String>,

    /// Local mount point of the export
    #[arg(long, global = true, env = "NFS_MOUNT_ROOT")]
    pub mount_root: Option<String>,

    /// Provisioner identity
    #[arg(long, global = true, env = "PROVISIONER_NAME")]
    pub provisioner_name: Option<String>,

    /// Default directory mode (octal)
    #[arg(long, global = true, env = "NFS_DEFAULT_MODE")]
    pub default_mode: Option<String>,

    /// Default directory owner uid
    #[arg(long, global = true, env = "NFS_DEFAULT_UID")]
    pub default_uid: Option<String>,

    /// Default directory owner gid
    #[arg(long, global = true, env = "NFS_DEFAULT_GID")]
    pub default_gid: Option<String>,

    /// Enable leader election
    #[arg(long, global = true, env = "ENABLE_LEADER_ELECTION")]
    pub leader_election: Option<String>,
}

impl ProcessArgs {
    fn lookup(&self, key: &str) -> Option<String> {
        let value = match key {
            SERVER_ENV => &self.nfs_server,
            PATH_ENV => &self.nfs_path,
            MOUNT_ROOT_ENV => &self.mount_root,
            PROVISIONER_NAME_ENV => &self.provisioner_name,
            DEFAULT_MODE_ENV => &self.default_mode,
            DEFAULT_UID_ENV => &self.default_uid,
            DEFAULT_GID_ENV => &self.default_gid,
            LEADER_ELECTION_ENV => &self.leader_election,
            _ => return None,
        };
        value.clone()
    }

    pub fn apply(&self, config: &mut ProvisionerConfig) {
        config.apply_overrides_from(|key| self.lookup(key));
    }
}

/// Load the file and environment, then apply flags
pub fn load_config(
    config_path: Option<PathBuf>,
    process: &ProcessArgs,
) -> Result<ProvisionerConfig, ConfigError> {
    let mut config = ProvisionerConfig::load_or_default(config_path)?;
    process.apply(&mut config);
    Ok(config)
}

/// Load and validate process settings. Any error here is a startup failure.
pub fn load_settings(
    config_path: Option<PathBuf>,
    process: &ProcessArgs,
) -> Result<ProvisionerSettings, ConfigError> {
    load_config(config_path, process)?.settings()
}

/// Load the storage classes served by this provisioner
pub fn load_storage_classes(
    path: Option<&Path>,
    provisioner_name: &str,
) -> Result<StaticStorageClassRegistry> {
    let Some(path) = path else {
        return Ok(StaticStorageClassRegistry::new());
    };

    let registry = StaticStorageClassRegistry::from_yaml_file(path, provisioner_name)
        .with_context(|| format!("Failed to load storage classes from {:?}", path))?;
    info!("Loaded {} storage classes from {:?}", registry.len(), path);
    Ok(registry)
}

/// Provisioner plus a subscription to its events
pub struct ProvisionerContext {
    pub provisioner: NfsSubdirProvisioner,
    pub storage_classes: Arc<StaticStorageClassRegistry>,
    events: EventReceiver,
}

impl ProvisionerContext {
    pub fn new(settings: ProvisionerSettings, storage_classes: StaticStorageClassRegistry) -> Self {
        info!(
            "NFS provisioner {} serving {}:{} (mount root {}, leader election {})",
            settings.provisioner_name,
            settings.server,
            settings.export_path.display(),
            settings.mount_root.display(),
            if settings.leader_election { "enabled" } else { "disabled" }
        );

        let storage_classes = Arc::new(storage_classes);
        let provisioner = NfsSubdirProvisioner::new(
            settings,
            Arc::new(LocalVolumeFilesystem::new()),
            storage_classes.clone(),
        );
        let events = provisioner.event_bus().subscribe();

        Self {
            provisioner,
            storage_classes,
            events,
        }
    }

    /// Log every event published so far
    pub fn flush_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => info!(target: "volume_events", "{}", json),
                    Err(e) => tracing::warn!("Failed to serialize event: {}", e),
                },
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("{} volume events were dropped before logging", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_values() {
        let mut config = ProvisionerConfig {
            server: "file-server".to_string(),
            path: "/export/file".to_string(),
            provisioner_name: "example.com/nfs".to_string(),
            default_mode: "0777".to_string(),
            ..Default::default()
        };
        let process = ProcessArgs {
            nfs_server: Some("10.0.0.9".to_string()),
            default_mode: Some("0750".to_string()),
            default_uid: Some("1000".to_string()),
            leader_election: Some("false".to_string()),
            ..Default::default()
        };

        process.apply(&mut config);
        let settings = config.settings().unwrap();
        assert_eq!(settings.server, "10.0.0.9");
        assert_eq!(settings.export_path, PathBuf::from("/export/file"));
        assert_eq!(settings.default_mode, 0o750);
        assert_eq!(settings.default_uid, 1000);
        assert!(!settings.leader_election);
    }

    #[test]
    fn test_absent_flags_leave_config_untouched() {
        let mut config = ProvisionerConfig {
            mount_root: "/mnt/nfs".to_string(),
            ..Default::default()
        };
        let before = config.clone();
        ProcessArgs::default().apply(&mut config);
        assert_eq!(config, before);
    }
}

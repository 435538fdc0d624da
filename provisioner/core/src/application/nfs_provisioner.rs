// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! NFS Subdirectory Provisioner Application Service
//!
//! Implements the [`Provisioner`] port on top of:
//! - Domain policy: path layout, parameter parsing, deletion policy
//! - [`VolumeFilesystem`]: the NFS export mounted under the mount root
//! - [`StorageClassLookup`]: storage classes consulted on deletion
//! - Event bus: publishing [`VolumeEvent`]s for observability
//!
//! Mode errors abort provisioning before the directory exists. Owner id
//! errors surface only after the directory exists and fall back to the
//! process defaults instead of failing the call.

use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::claim::PvcMetadata;
use crate::domain::config::ProvisionerSettings;
use crate::domain::deletion_policy::{DeletionAction, DeletionPolicy};
use crate::domain::events::VolumeEvent;
use crate::domain::filesystem::VolumeFilesystem;
use crate::domain::parameters::{
    parse_id, parse_mode, DIRECTORY_GID_ANNOTATION, DIRECTORY_MODE_ANNOTATION,
    DIRECTORY_UID_ANNOTATION,
};
use crate::domain::paths::PathBuilder;
use crate::domain::provisioner::{ProvisionOptions, Provisioner, ProvisionerError};
use crate::domain::storage_class::{StorageClassLookup, StorageClassLookupError};
use crate::domain::volume::{NfsVolumeSource, ProvisionedVolume};
use crate::infrastructure::event_bus::EventBus;

pub struct NfsSubdirProvisioner {
    settings: Arc<ProvisionerSettings>,
    paths: PathBuilder,
    filesystem: Arc<dyn VolumeFilesystem>,
    storage_classes: Arc<dyn StorageClassLookup>,
    event_bus: EventBus,
}

impl NfsSubdirProvisioner {
    pub fn new(
        settings: ProvisionerSettings,
        filesystem: Arc<dyn VolumeFilesystem>,
        storage_classes: Arc<dyn StorageClassLookup>,
    ) -> Self {
        let paths = PathBuilder::new(&settings.export_path, &settings.mount_root);
        Self {
            settings: Arc::new(settings),
            paths,
            filesystem,
            storage_classes,
            event_bus: EventBus::with_default_capacity(),
        }
    }

    /// Publish events on a shared bus instead of a private one
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn settings(&self) -> &ProvisionerSettings {
        &self.settings
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Resolve an owner id annotation, falling back to `default` when the
    /// annotation is absent or invalid. Never fails: by the time ownership is
    /// resolved the directory already exists.
    fn owner_id(
        &self,
        metadata: &PvcMetadata,
        annotation: &str,
        default: u32,
        volume_name: &str,
    ) -> u32 {
        let Some(value) = metadata.annotation(annotation).filter(|v| !v.is_empty()) else {
            return default;
        };

        match parse_id(value) {
            Ok(id) => id,
            Err(e) => {
                error!(
                    volume = %volume_name,
                    annotation = %annotation,
                    "Invalid owner annotation {}: {}, using default {}",
                    value, e, default
                );
                self.event_bus.publish(VolumeEvent::OwnershipFallback {
                    volume_name: volume_name.to_string(),
                    annotation: annotation.to_string(),
                    value: value.to_string(),
                    reason: e.to_string(),
                    occurred_at: Utc::now(),
                });
                default
            }
        }
    }

    async fn remove(&self, volume: &ProvisionedVolume, local_path: &Path) -> Result<(), ProvisionerError> {
        self.filesystem.remove_dir_all(local_path).await?;
        info!(volume = %volume.name, "Deleted volume directory {}", local_path.display());
        self.event_bus.publish(VolumeEvent::VolumeDeleted {
            volume_name: volume.name.clone(),
            server_path: volume.path().to_string(),
            deleted_at: Utc::now(),
        });
        Ok(())
    }

    async fn archive(&self, volume: &ProvisionedVolume, local_path: &Path) -> Result<(), ProvisionerError> {
        let archive_path = self.paths.archive_path_for(volume.path());
        debug!("archiving path {} to {}", local_path.display(), archive_path.display());
        self.filesystem.rename(local_path, &archive_path).await?;
        info!(volume = %volume.name, "Archived volume directory to {}", archive_path.display());
        self.event_bus.publish(VolumeEvent::VolumeArchived {
            volume_name: volume.name.clone(),
            server_path: volume.path().to_string(),
            archive_path: archive_path.display().to_string(),
            archived_at: Utc::now(),
        });
        Ok(())
    }
}

#[async_trait]
impl Provisioner for NfsSubdirProvisioner {
    async fn provision(&self, options: ProvisionOptions) -> Result<ProvisionedVolume, ProvisionerError> {
        if options.claim.has_selector() {
            return Err(ProvisionerError::UnsupportedSelector);
        }
        debug!("nfs provisioner: options {:?}", options);

        let metadata = options.claim.snapshot();
        let parameters = &options.storage_class.parameters;
        let paths = self
            .paths
            .build(&metadata, &options.volume_name, parameters.path_pattern())?;

        let mode = match metadata.annotation(DIRECTORY_MODE_ANNOTATION).filter(|v| !v.is_empty()) {
            Some(value) => parse_mode(value)?,
            None => self.settings.default_mode,
        };

        debug!("creating path {}", paths.local_path.display());
        self.filesystem.create_dir_all(&paths.local_path, mode).await?;
        // Creation mode is masked by the process umask
        self.filesystem.set_mode(&paths.local_path, mode).await?;

        let uid = self.owner_id(
            &metadata,
            DIRECTORY_UID_ANNOTATION,
            self.settings.default_uid,
            &options.volume_name,
        );
        let gid = self.owner_id(
            &metadata,
            DIRECTORY_GID_ANNOTATION,
            self.settings.default_gid,
            &options.volume_name,
        );
        self.filesystem.chown(&paths.local_path, uid, gid).await?;

        let class = options.storage_class;
        let volume = ProvisionedVolume {
            name: options.volume_name,
            storage_class_name: Some(class.name).filter(|name| !name.is_empty()),
            reclaim_policy: class.reclaim_policy,
            access_modes: options.claim.spec.access_modes,
            mount_options: class.mount_options,
            capacity: options.claim.spec.storage_request,
            nfs: NfsVolumeSource {
                server: self.settings.server.clone(),
                path: paths.server_path,
                read_only: false,
            },
        };

        info!(
            volume = %volume.name,
            claim = %metadata.name(),
            namespace = %metadata.namespace(),
            "Provisioned {}:{} (mode {:o}, owner {}:{})",
            volume.server(), volume.path(), mode, uid, gid
        );
        self.event_bus.publish(VolumeEvent::VolumeProvisioned {
            volume_name: volume.name.clone(),
            claim: metadata.name().to_string(),
            namespace: metadata.namespace().to_string(),
            server_path: volume.path().to_string(),
            mode,
            uid,
            gid,
            provisioned_at: Utc::now(),
        });

        Ok(volume)
    }

    async fn delete(&self, volume: &ProvisionedVolume) -> Result<(), ProvisionerError> {
        let local_path = self.paths.local_path_for(volume.path());

        if !self.filesystem.exists(&local_path).await? {
            warn!("path {} does not exist, deletion skipped", local_path.display());
            self.event_bus.publish(VolumeEvent::DeletionSkipped {
                volume_name: volume.name.clone(),
                local_path: local_path.display().to_string(),
                skipped_at: Utc::now(),
            });
            return Ok(());
        }

        let class_name = volume
            .storage_class_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(StorageClassLookupError::MissingClassName)?;
        let class = self.storage_classes.get_storage_class(class_name).await?;

        let policy = DeletionPolicy::from_parameters(&class.parameters)?;
        debug!(volume = %volume.name, class = %class.name, "Deletion policy {:?}", policy);

        match policy.action() {
            DeletionAction::Remove => self.remove(volume, &local_path).await,
            DeletionAction::Keep => {
                info!(volume = %volume.name, "Retaining volume directory {}", local_path.display());
                self.event_bus.publish(VolumeEvent::VolumeRetained {
                    volume_name: volume.name.clone(),
                    server_path: volume.path().to_string(),
                    retained_at: Utc::now(),
                });
                Ok(())
            }
            DeletionAction::Archive => self.archive(volume, &local_path).await,
        }
    }
}

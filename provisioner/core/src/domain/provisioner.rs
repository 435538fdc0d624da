// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Provisioner port
//!
//! The contract a host controller drives: one call to realize a claim as a
//! volume, one call to release a volume. Retries, leader election and
//! watching the cluster stay with the host.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::claim::PersistentVolumeClaim;
use crate::domain::filesystem::FilesystemError;
use crate::domain::parameters::ParameterError;
use crate::domain::storage_class::{StorageClass, StorageClassLookupError};
use crate::domain::volume::ProvisionedVolume;

/// Everything the host knows about a pending claim
#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    pub claim: PersistentVolumeClaim,
    /// Name generated by the host for the new volume
    pub volume_name: String,
    pub storage_class: StorageClass,
}

/// Provisioning errors surfaced to the host controller
#[derive(Debug, Error)]
pub enum ProvisionerError {
    #[error("claim Selector is not supported")]
    UnsupportedSelector,

    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    #[error("storage class lookup failed: {0}")]
    ClassLookup(#[from] StorageClassLookupError),

    #[error(transparent)]
    Io(#[from] FilesystemError),
}

#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Create the backing directory for a claim and describe the new volume
    async fn provision(&self, options: ProvisionOptions) -> Result<ProvisionedVolume, ProvisionerError>;

    /// Release a volume according to its storage class's deletion policy.
    ///
    /// Deleting a volume whose directory is already gone succeeds.
    async fn delete(&self, volume: &ProvisionedVolume) -> Result<(), ProvisionerError>;
}

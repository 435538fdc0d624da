// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Provisioned volume descriptor
//!
//! The only state that outlives a provisioning call. The host controller
//! embeds it in the cluster's PersistentVolume object and hands it back on
//! deletion.

use serde::{Deserialize, Serialize};

use crate::domain::claim::AccessMode;
use crate::domain::storage_class::ReclaimPolicy;

/// NFS source of a provisioned volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfsVolumeSource {
    /// NFS server address
    pub server: String,
    /// Server-visible directory path
    pub path: String,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedVolume {
    /// Generated volume name
    pub name: String,

    /// Storage class the volume was provisioned from; used to look the class
    /// up again on deletion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class_name: Option<String>,

    #[serde(default)]
    pub reclaim_policy: ReclaimPolicy,

    #[serde(default)]
    pub access_modes: Vec<AccessMode>,

    #[serde(default)]
    pub mount_options: Vec<String>,

    /// Requested capacity carried over from the claim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,

    pub nfs: NfsVolumeSource,
}

impl ProvisionedVolume {
    pub fn server(&self) -> &str {
        &self.nfs.server
    }

    pub fn path(&self) -> &str {
        &self.nfs.path
    }
}

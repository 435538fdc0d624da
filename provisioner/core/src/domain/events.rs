// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Domain Events - volume lifecycle facts published by the provisioner
//
// Events are informational: nothing in the provisioning path depends on a
// subscriber receiving them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VolumeEvent {
    VolumeProvisioned {
        volume_name: String,
        claim: String,
        namespace: String,
        server_path: String,
        mode: u32,
        uid: u32,
        gid: u32,
        provisioned_at: DateTime<Utc>,
    },
    /// An ownership annotation was invalid and the process default was used
    OwnershipFallback {
        volume_name: String,
        annotation: String,
        value: String,
        reason: String,
        occurred_at: DateTime<Utc>,
    },
    VolumeDeleted {
        volume_name: String,
        server_path: String,
        deleted_at: DateTime<Utc>,
    },
    VolumeRetained {
        volume_name: String,
        server_path: String,
        retained_at: DateTime<Utc>,
    },
    VolumeArchived {
        volume_name: String,
        server_path: String,
        archive_path: String,
        archived_at: DateTime<Utc>,
    },
    /// The directory was already gone when deletion ran
    DeletionSkipped {
        volume_name: String,
        local_path: String,
        skipped_at: DateTime<Utc>,
    },
}

impl VolumeEvent {
    pub fn volume_name(&self) -> &str {
        match self {
            Self::VolumeProvisioned { volume_name, .. }
            | Self::OwnershipFallback { volume_name, .. }
            | Self::VolumeDeleted { volume_name, .. }
            | Self::VolumeRetained { volume_name, .. }
            | Self::VolumeArchived { volume_name, .. }
            | Self::DeletionSkipped { volume_name, .. } => volume_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = VolumeEvent::VolumeRetained {
            volume_name: "pvc-1".to_string(),
            server_path: "/export/default-data-pvc-1".to_string(),
            retained_at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "volume_retained");
        assert_eq!(event.volume_name(), "pvc-1");
    }
}

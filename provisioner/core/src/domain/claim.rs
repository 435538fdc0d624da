// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Persistent Volume Claim model
//!
//! The subset of a cluster PersistentVolumeClaim the provisioner needs:
//! identity, labels, annotations and the parts of the spec that are copied
//! onto the provisioned volume.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Value Objects
// ============================================================================

/// Volume access mode requested by a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessMode {
    /// Mounted read-write by a single node
    ReadWriteOnce,
    /// Mounted read-only by many nodes
    ReadOnlyMany,
    /// Mounted read-write by many nodes
    ReadWriteMany,
    /// Mounted read-write by a single pod
    ReadWriteOncePod,
}

/// Label selector on a claim.
///
/// Selectors bind a claim to pre-existing volumes; dynamic provisioning
/// never honours them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    #[serde(default)]
    pub match_labels: BTreeMap<String, String>,
}

/// Object metadata of a claim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimMetadata {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

/// Claim spec fields relevant to provisioning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<LabelSelector>,

    #[serde(default)]
    pub access_modes: Vec<AccessMode>,

    /// Requested storage quantity (e.g. "1Gi"), copied verbatim onto the volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_request: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class_name: Option<String>,
}

/// A persistent volume claim as handed over by the host controller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentVolumeClaim {
    pub metadata: ClaimMetadata,
    #[serde(default)]
    pub spec: ClaimSpec,
}

impl PersistentVolumeClaim {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: ClaimMetadata {
                name: name.into(),
                namespace: namespace.into(),
                ..Default::default()
            },
            spec: ClaimSpec::default(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.annotations.insert(key.into(), value.into());
        self
    }

    pub fn has_selector(&self) -> bool {
        self.spec.selector.is_some()
    }

    /// Take an immutable metadata snapshot for template resolution
    pub fn snapshot(&self) -> PvcMetadata {
        PvcMetadata::from_claim(self)
    }
}

/// Flat, immutable view of a claim used for path template substitution.
///
/// `data` holds the scalar fields addressable as `${.PVC.<field>}`; only
/// `name` and `namespace` are populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PvcMetadata {
    data: BTreeMap<String, String>,
    labels: BTreeMap<String, String>,
    annotations: BTreeMap<String, String>,
}

impl PvcMetadata {
    pub fn from_claim(claim: &PersistentVolumeClaim) -> Self {
        let data = BTreeMap::from([
            ("name".to_string(), claim.metadata.name.clone()),
            ("namespace".to_string(), claim.metadata.namespace.clone()),
        ]);

        Self {
            data,
            labels: claim.metadata.labels.clone(),
            annotations: claim.metadata.annotations.clone(),
        }
    }

    pub fn name(&self) -> &str {
        self.field("name").unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.field("namespace").unwrap_or_default()
    }

    pub fn field(&self, field: &str) -> Option<&str> {
        self.data.get(field).map(String::as_str)
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}

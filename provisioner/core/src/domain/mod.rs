// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Claim and storage-class models, path and parameter policy, and the ports
//! the provisioner depends on.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Pure provisioning policy, free of I/O

pub mod claim;
pub mod config;
pub mod deletion_policy;
pub mod events;
pub mod filesystem;
pub mod parameters;
pub mod path_template;
pub mod paths;
pub mod provisioner;
pub mod storage_class;
pub mod volume;

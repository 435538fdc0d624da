// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! NFS subdirectory provisioner core
//!
//! Realizes persistent volume claims as subdirectories of a single NFS
//! export and decides whether released volumes are deleted, retained or
//! archived.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Provisioning and deletion decisions behind the `Provisioner` trait

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;

// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the provisioner CLI

pub mod config;
pub mod delete;
pub mod provision;

pub use self::config::ConfigCommand;
pub use self::delete::DeleteArgs;
pub use self::provision::ProvisionArgs;

// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod event_bus;
pub mod local_fs;
pub mod storage_class_registry;

pub use event_bus::{EventBus, EventReceiver};
pub use local_fs::LocalVolumeFilesystem;
pub use storage_class_registry::StaticStorageClassRegistry;

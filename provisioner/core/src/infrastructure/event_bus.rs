// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Event Bus - fan-out of volume lifecycle events
//
// Backed by a tokio broadcast channel. Publishing never blocks and never
// fails; with no subscribers events are dropped. Receivers that fall more than
// `capacity` events behind lose the oldest ones and see `Lagged`.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::events::VolumeEvent;

/// Subscription handle returned by [`EventBus::subscribe`]
pub type EventReceiver = broadcast::Receiver<VolumeEvent>;

#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<VolumeEvent>>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }

    pub fn publish(&self, event: VolumeEvent) {
        let volume = event.volume_name().to_string();
        match self.sender.send(event) {
            Ok(receivers) => debug!(volume = %volume, receivers, "Published volume event"),
            Err(_) => debug!(volume = %volume, "Volume event dropped, no subscribers"),
        }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

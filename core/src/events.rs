//! Container open/close events for UI and audio layers.
//!
//! Each subscriber gets its own `mpsc` channel. Publishing never blocks, and
//! subscribers whose receiver was dropped are pruned on the next publish.

use std::sync::mpsc;

use crate::types::ContainerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerEvent {
    Opened(ContainerId),
    Closed(ContainerId),
}

impl ContainerEvent {
    pub fn container(self) -> ContainerId {
        match self {
            ContainerEvent::Opened(container) | ContainerEvent::Closed(container) => container,
        }
    }
}

#[derive(Debug, Default)]
pub struct ContainerEvents {
    subscribers: Vec<mpsc::Sender<ContainerEvent>>,
}

impl ContainerEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<ContainerEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn publish(&mut self, event: ContainerEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

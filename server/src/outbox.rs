//! Outgoing notification queue.
//!
//! The authority never talks to the transport directly. Every state change
//! queues its notifications here with explicit recipients, and the apply
//! loop flushes the queue once per tick, preserving queue order.

use satchel_core::protocol::ServerNotification;
use satchel_core::types::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Actor(ActorId),
    /// Every connected client.
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub recipient: Recipient,
    pub notification: ServerNotification,
}

impl Envelope {
    pub fn is_for(&self, actor: ActorId) -> bool {
        match self.recipient {
            Recipient::Actor(recipient) => recipient == actor,
            Recipient::All => true,
        }
    }
}

#[derive(Debug, Default)]
pub struct Outbox {
    queue: Vec<Envelope>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send_to(&mut self, actor: ActorId, notification: ServerNotification) {
        self.queue.push(Envelope {
            recipient: Recipient::Actor(actor),
            notification,
        });
    }

    pub fn send_to_each(
        &mut self,
        actors: impl IntoIterator<Item = ActorId>,
        notification: &ServerNotification,
    ) {
        for actor in actors {
            self.send_to(actor, notification.clone());
        }
    }

    pub fn broadcast(&mut self, notification: ServerNotification) {
        self.queue.push(Envelope {
            recipient: Recipient::All,
            notification,
        });
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending(&self) -> &[Envelope] {
        &self.queue
    }

    pub fn drain(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.queue)
    }
}

//! In-process reliable, ordered transport.
//!
//! All connections feed one inbound `mpsc` queue. Each sender's frames stay
//! in the order they were sent; frames from different connections interleave
//! in arrival order, which is the order the apply loop handles them in.
//! Outbound frames go through one channel per connection.

use std::collections::BTreeMap;
use std::sync::mpsc;

use satchel_core::protocol::{ClientIntent, ServerNotification};
use satchel_core::types::ActorId;
use satchel_core::ProtocolError;

use crate::error::TransportError;
use crate::outbox::{Envelope, Recipient};

/// An encoded intent tagged with the connection it arrived on.
#[derive(Debug, Clone)]
pub struct Inbound {
    pub actor: ActorId,
    pub bytes: Vec<u8>,
}

pub struct Transport {
    inbound_tx: mpsc::Sender<Inbound>,
    inbound_rx: mpsc::Receiver<Inbound>,
    outbound: BTreeMap<ActorId, mpsc::Sender<Vec<u8>>>,
    lost: Vec<ActorId>,
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport {
    pub fn new() -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel();
        Self {
            inbound_tx,
            inbound_rx,
            outbound: BTreeMap::new(),
            lost: Vec::new(),
        }
    }

    /// Opens a connection for `actor`, replacing any previous one.
    pub fn connect(&mut self, actor: ActorId) -> ClientConnection {
        let (tx, rx) = mpsc::channel();
        if self.outbound.insert(actor, tx).is_some() {
            log::warn!("{actor} reconnected, dropping previous connection");
        }
        ClientConnection {
            actor,
            tx: self.inbound_tx.clone(),
            rx,
        }
    }

    pub fn disconnect(&mut self, actor: ActorId) -> bool {
        self.outbound.remove(&actor).is_some()
    }

    pub fn is_connected(&self, actor: ActorId) -> bool {
        self.outbound.contains_key(&actor)
    }

    /// Everything that arrived since the last call, in arrival order.
    pub fn receive(&self) -> Vec<Inbound> {
        self.inbound_rx.try_iter().collect()
    }

    /// Encodes and sends one envelope.
    ///
    /// Connections whose client side was dropped are closed and remembered
    /// for [`Transport::take_lost`].
    pub fn deliver(&mut self, envelope: &Envelope) -> Result<(), ProtocolError> {
        let bytes = envelope.notification.to_bytes()?;
        let recipients: Vec<ActorId> = match envelope.recipient {
            Recipient::Actor(actor) => vec![actor],
            Recipient::All => self.outbound.keys().copied().collect(),
        };
        for actor in recipients {
            let Some(tx) = self.outbound.get(&actor) else {
                log::trace!("Dropping notification for disconnected {actor}");
                continue;
            };
            if tx.send(bytes.clone()).is_err() {
                log::info!("Connection to {actor} lost");
                self.outbound.remove(&actor);
                self.lost.push(actor);
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn inbound_sender(&self) -> mpsc::Sender<Inbound> {
        self.inbound_tx.clone()
    }

    /// Connections found dead since the last call.
    pub fn take_lost(&mut self) -> Vec<ActorId> {
        std::mem::take(&mut self.lost)
    }
}

/// The client end of a connection.
pub struct ClientConnection {
    actor: ActorId,
    tx: mpsc::Sender<Inbound>,
    rx: mpsc::Receiver<Vec<u8>>,
}

impl ClientConnection {
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Fire-and-forget: there is no reply to a request.
    pub fn send(&self, intent: &ClientIntent) -> Result<(), TransportError> {
        let bytes = intent.to_bytes()?;
        self.tx
            .send(Inbound {
                actor: self.actor,
                bytes,
            })
            .map_err(|_| TransportError::Disconnected)
    }

    /// Decodes every notification received so far. Undecodable frames are
    /// logged and skipped.
    pub fn poll(&self) -> Vec<ServerNotification> {
        self.rx
            .try_iter()
            .filter_map(|bytes| match ServerNotification::from_bytes(&bytes) {
                Ok(notification) => Some(notification),
                Err(e) => {
                    log::warn!("{} received a bad frame: {e}", self.actor);
                    None
                }
            })
            .collect()
    }
}

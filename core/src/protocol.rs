//! Wire messages exchanged between clients and the authority.
//!
//! Clients only ever send [`ClientIntent`]s; the authority answers with
//! [`ServerNotification`]s. Nothing is acknowledged: a rejected intent simply
//! produces no notification.
//!
//! Messages are encoded with bincode's standard configuration through serde.
//! A frame holds exactly one message; leftover bytes are a decode error.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::types::{ActorId, ContainerId, ItemId, Position, Transform};

/// Client -> server requests.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ClientIntent {
    /// Open a world container the sender can reach.
    OpenContainer { container: ContainerId },
    /// Move `item` to `position` inside `target`.
    TransferItem {
        item: ItemId,
        position: Position,
        target: ContainerId,
    },
    /// Take `item` out of its container and leave it in the world.
    DropItem { item: ItemId },
    /// Stop accessing a container.
    CloseContainer { container: ContainerId },
    /// Make one of the sender's hand slots the selected one.
    SelectHand { hand: ContainerId },
}

/// Who performed a world mutation.
///
/// Receivers compare it with their own role to decide whether a broadcast
/// still has to be applied locally: the originator already applied it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Authority,
    Client(ActorId),
}

impl Origin {
    /// `true` if a receiver acting as `local` must apply the mutation.
    pub fn should_apply(self, local: Origin) -> bool {
        self != local
    }
}

/// Server -> client notifications.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ServerNotification {
    /// Sent to the actor that just gained access to `container`.
    ContainerOpened { container: ContainerId },
    /// Sent to the actor that just lost access to `container`.
    ContainerClosed { container: ContainerId },
    /// Open/closed visual of a container changed.
    ContainerVisualState { container: ContainerId, open: bool },
    /// Full slot listing of a container after a change.
    ContainerContents {
        container: ContainerId,
        slots: Vec<(Position, ItemId)>,
    },
    /// An item appeared loose in the world.
    Spawn {
        item: ItemId,
        transform: Transform,
        origin: Origin,
    },
}

fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(bincode::serde::encode_to_vec(
        message,
        bincode::config::standard(),
    )?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    let (message, consumed) =
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
    if consumed != bytes.len() {
        return Err(ProtocolError::TrailingBytes(bytes.len() - consumed));
    }
    Ok(message)
}

impl ClientIntent {
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        decode(bytes)
    }
}

impl ServerNotification {
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec3;

    #[test]
    fn transfer_intent_survives_the_wire() {
        let intent = ClientIntent::TransferItem {
            item: ItemId(3),
            position: Position::new(1, 2),
            target: ContainerId(8),
        };
        let bytes = intent.to_bytes().unwrap();
        assert_eq!(ClientIntent::from_bytes(&bytes).unwrap(), intent);
    }

    #[test]
    fn spawn_keeps_origin() {
        let note = ServerNotification::Spawn {
            item: ItemId(1),
            transform: Transform::at(Vec3::new(1.0, 2.0, 3.0)),
            origin: Origin::Client(ActorId(4)),
        };
        let bytes = note.to_bytes().unwrap();
        assert_eq!(ServerNotification::from_bytes(&bytes).unwrap(), note);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = ClientIntent::DropItem { item: ItemId(1) }.to_bytes().unwrap();
        bytes.push(0);
        assert!(matches!(
            ClientIntent::from_bytes(&bytes),
            Err(ProtocolError::TrailingBytes(1))
        ));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            ClientIntent::from_bytes(&[0xff, 0xff, 0xff]),
            Err(ProtocolError::Decode(_))
        ));
    }

    /// The originator of a mutation never re-applies its own broadcast.
    #[test]
    fn origin_decides_who_applies() {
        let from_server = Origin::Authority;
        assert!(!from_server.should_apply(Origin::Authority));
        assert!(from_server.should_apply(Origin::Client(ActorId(1))));

        let from_client = Origin::Client(ActorId(1));
        assert!(!from_client.should_apply(Origin::Client(ActorId(1))));
        assert!(from_client.should_apply(Origin::Client(ActorId(2))));
        assert!(from_client.should_apply(Origin::Authority));
    }
}

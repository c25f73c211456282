use thiserror::Error;

use crate::types::{ActorId, ContainerId, ItemId, Position};

/// Why a container mutation was refused.
///
/// A refused mutation never leaves partial state behind: every check runs
/// before the first write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    #[error("unknown item {0}")]
    UnknownItem(ItemId),
    #[error("unknown container {0}")]
    UnknownContainer(ContainerId),
    #[error("unknown actor {0}")]
    UnknownActor(ActorId),
    #[error("{position} in {container} is occupied by {occupant}")]
    SlotOccupied {
        container: ContainerId,
        position: Position,
        occupant: ItemId,
    },
    #[error("{position} is outside the grid of {container}")]
    OutOfBounds {
        container: ContainerId,
        position: Position,
    },
    #[error("{0} is not in any container")]
    NotContained(ItemId),
    #[error("{item} claims {container} but is not listed there")]
    Inconsistent { item: ItemId, container: ContainerId },
}

/// Wire codec failures.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("failed to encode message: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode message: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),
}

use satchel_core::ContainerError;
use satchel_core::ProtocolError;
use thiserror::Error;

/// Why the authority discarded a client request.
///
/// None of these reach the client. The apply loop logs them and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// An item, container or actor reference did not resolve.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    /// The actor may not modify one of the containers involved.
    #[error("not authorized to modify {0}")]
    Unauthorized(String),
    /// The target is out of the actor's reach right now.
    #[error("{0} is out of reach")]
    Unreachable(String),
    /// The target slot holds a different item or lies outside the grid.
    #[error("slot unavailable: {0}")]
    SlotOccupied(String),
    /// An item and its container disagree about where the item is.
    #[error("inconsistent container state: {0}")]
    Inconsistent(String),
}

impl RequestError {
    /// Only inconsistent state is worth an error-level log line.
    pub fn is_internal(&self) -> bool {
        matches!(self, RequestError::Inconsistent(_))
    }
}

impl From<ContainerError> for RequestError {
    fn from(error: ContainerError) -> Self {
        match error {
            ContainerError::UnknownItem(_)
            | ContainerError::UnknownContainer(_)
            | ContainerError::UnknownActor(_)
            | ContainerError::NotContained(_) => RequestError::InvalidReference(error.to_string()),
            ContainerError::SlotOccupied { .. } | ContainerError::OutOfBounds { .. } => {
                RequestError::SlotOccupied(error.to_string())
            }
            ContainerError::Inconsistent { .. } => RequestError::Inconsistent(error.to_string()),
        }
    }
}

/// Failures of the in-process transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("connection to the authority is closed")]
    Disconnected,
}

//! Shared data model for the container authority and its clients.
//!
//! [`world::World`] owns items, containers and actors and is the only place
//! container contents change. [`protocol`] defines what crosses the wire and
//! [`client_view::ClientView`] is the client's mirror of it.

pub mod client_view;
pub mod constants;
pub mod error;
pub mod events;
mod logging;
pub mod protocol;
pub mod types;
pub mod world;

pub use error::{ContainerError, ProtocolError};
pub use logging::initialize_logger;

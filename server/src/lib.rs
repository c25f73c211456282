//! Server-authoritative container access and item transfer.
//!
//! Clients submit [`satchel_core::protocol::ClientIntent`]s over the
//! [`transport`]; the [`game_loop::GameLoop`] applies them one at a time
//! through the [`authority::Authority`], which validates access against each
//! actor's [`inventory::Inventory`], mutates the world, keeps container
//! visuals in sync and queues notifications for the clients.

pub mod authority;
pub mod config;
pub mod error;
pub mod game_loop;
pub mod hands;
pub mod inventory;
pub mod outbox;
pub mod placement;
pub mod transport;
pub mod visibility;

pub use authority::Authority;
pub use config::ServerConfig;
pub use error::{RequestError, TransportError};
pub use game_loop::GameLoop;

//! Network-resolvable identifiers.
//!
//! Everything that crosses the wire refers to world records by one of these
//! ids, never by address. Resolving an id against the [`crate::world::World`]
//! may fail, and callers treat a failed lookup as an invalid request.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $name {
            pub fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// A connected player (or NPC) that can own hands and open containers.
    ActorId,
    "actor"
);

define_id!(
    /// An item living in the world or inside exactly one container.
    ItemId,
    "item"
);

define_id!(
    /// An [`crate::types::AttachedContainer`] and the container it wraps.
    ContainerId,
    "container"
);

/// A cell in a container grid.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

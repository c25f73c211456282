//! Actor record

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{ActorId, ContainerId, Transform};

/// An embodied actor.
///
/// `body` lists the containers that are part of the actor itself (hands,
/// pockets, organs). An actor may always act on its own body, whether or not
/// it has explicitly opened those containers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub transform: Transform,
    pub body: BTreeSet<ContainerId>,
}

impl Actor {
    pub fn new(id: ActorId, name: impl Into<String>, transform: Transform) -> Self {
        Self {
            id,
            name: name.into(),
            transform,
            body: BTreeSet::new(),
        }
    }

    pub fn embodies(&self, container: ContainerId) -> bool {
        self.body.contains(&container)
    }
}

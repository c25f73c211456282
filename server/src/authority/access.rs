use std::time::Duration;

use satchel_core::protocol::ServerNotification;
use satchel_core::types::{ActorId, ContainerId};

use super::Authority;
use crate::error::RequestError;
use crate::visibility;

impl Authority {
    /// Whether `actor` has `container` in its access registry.
    pub fn has_container(&self, actor: ActorId, container: ContainerId) -> bool {
        self.inventories
            .get(&actor)
            .is_some_and(|inventory| inventory.has_container(container))
    }

    /// Whether `actor` may act on `container`: opened it, or it is part of
    /// the actor's body.
    pub fn can_modify_container(&self, actor: ActorId, container: ContainerId) -> bool {
        self.inventories
            .get(&actor)
            .is_some_and(|inventory| inventory.can_modify_container(&self.world, container))
    }

    /// Grants `actor` access to `container`.
    ///
    /// Registers the actor as an observer, adds the container to its registry,
    /// lets the visibility synchronizer open the container and tells the
    /// owning client. Opening a container twice changes nothing. Another
    /// actor's body containers can never be opened.
    pub fn open_container(&mut self, actor: ActorId, container: ContainerId) -> Result<(), RequestError> {
        if let Some(owner) = self.world.body_owner(container) {
            if owner != actor {
                return Err(RequestError::Unauthorized(format!("{container} belongs to {owner}")));
            }
        }
        let attached = self
            .world
            .container_mut(container)
            .ok_or_else(|| RequestError::InvalidReference(container.to_string()))?;
        let inventory = self
            .inventories
            .get_mut(&actor)
            .ok_or_else(|| RequestError::InvalidReference(actor.to_string()))?;

        attached.add_observer(actor);
        if !inventory.insert(container) {
            return Ok(());
        }
        log::debug!("{actor} opened {container}");

        visibility::synchronize(&mut self.world, &self.inventories, container, &mut self.outbox);
        self.outbox
            .send_to(actor, ServerNotification::ContainerOpened { container });
        self.send_contents_to(actor, container);
        Ok(())
    }

    /// Client-issued open: the container must be within reach right now.
    pub fn request_open(&mut self, actor: ActorId, container: ContainerId) -> Result<(), RequestError> {
        if self.world.container(container).is_none() {
            return Err(RequestError::InvalidReference(container.to_string()));
        }
        if self.world.body_owner(container).is_some_and(|owner| owner != actor) {
            return Err(RequestError::Unauthorized(container.to_string()));
        }
        let reachable = self
            .inventories
            .get(&actor)
            .and_then(|inventory| inventory.hands())
            .is_some_and(|hands| hands.can_interact(&self.world, container));
        if !reachable {
            return Err(RequestError::Unreachable(container.to_string()));
        }
        self.open_container(actor, container)
    }

    /// Revokes `actor`'s access to `container`.
    ///
    /// A no-op if the container is not in the registry. Otherwise the actor
    /// stops observing, the synchronizer may close the container, and the
    /// owning client is told. Returns whether anything was removed.
    pub fn remove_container(&mut self, actor: ActorId, container: ContainerId) -> bool {
        let removed = self
            .inventories
            .get_mut(&actor)
            .is_some_and(|inventory| inventory.remove(container));
        if !removed {
            return false;
        }
        if let Some(attached) = self.world.container_mut(container) {
            attached.remove_observer(actor);
        }
        log::debug!("{actor} closed {container}");

        visibility::synchronize(&mut self.world, &self.inventories, container, &mut self.outbox);
        self.outbox
            .send_to(actor, ServerNotification::ContainerClosed { container });
        true
    }

    /// Advances every registry's sweep timer by `dt` and prunes containers
    /// that are no longer reachable.
    ///
    /// Stale entries are collected before any are removed, so removal never
    /// skips a neighbour. Returns the pruned `(actor, container)` pairs.
    pub fn update(&mut self, dt: Duration) -> Vec<(ActorId, ContainerId)> {
        let mut stale = Vec::new();
        for inventory in self.inventories.values_mut() {
            if !inventory.advance_sweep(dt) {
                continue;
            }
            let actor = inventory.actor();
            stale.extend(
                inventory
                    .unreachable(&self.world)
                    .into_iter()
                    .map(|container| (actor, container)),
            );
        }
        for (actor, container) in &stale {
            log::debug!("{actor} can no longer reach {container}");
            self.remove_container(*actor, *container);
        }
        stale
    }
}

//! The single writer of shared container state.
//!
//! [`Authority`] owns the world, every actor's access registry and the
//! outgoing notification queue. It is driven by exactly one apply loop, so
//! requests are applied one at a time in arrival order and that order is the
//! global order of container mutations.
//!
//! Request handlers return `Result<(), RequestError>` for diagnostics and
//! tests only. Nothing about a rejection is ever sent back to the client.

mod access;
mod transfer;

use std::collections::BTreeMap;
use std::time::Duration;

use satchel_core::protocol::{ClientIntent, Origin, ServerNotification};
use satchel_core::types::{ActorId, ContainerId};
use satchel_core::world::World;

use crate::config::ServerConfig;
use crate::error::RequestError;
use crate::hands::Hands;
use crate::inventory::Inventory;
use crate::outbox::{Envelope, Outbox};
use crate::placement::{Placement, ScatterAtFeet};

pub struct Authority {
    world: World,
    inventories: BTreeMap<ActorId, Inventory>,
    outbox: Outbox,
    placement: Box<dyn Placement>,
    sweep_interval: Duration,
}

impl Authority {
    pub fn new(world: World, config: &ServerConfig) -> Self {
        Self {
            world,
            inventories: BTreeMap::new(),
            outbox: Outbox::new(),
            placement: Box::new(ScatterAtFeet::new(config.drop_scatter)),
            sweep_interval: config.sweep_interval,
        }
    }

    pub fn with_placement(mut self, placement: Box<dyn Placement>) -> Self {
        self.placement = placement;
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for server-side systems (movement, spawning).
    /// Client requests never come through here.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn inventory(&self, actor: ActorId) -> Option<&Inventory> {
        self.inventories.get(&actor)
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn drain_outbox(&mut self) -> Vec<Envelope> {
        self.outbox.drain()
    }

    // ---------------------------------------------------------------------
    //  Connections
    // ---------------------------------------------------------------------

    /// Creates the access registry for a newly connected actor.
    ///
    /// `hands` may be `None` for actors without an interaction collaborator;
    /// such actors never lose access through the sweep and cannot transfer.
    pub fn connect_actor(&mut self, actor: ActorId, hands: Option<Box<dyn Hands>>) -> bool {
        if self.world.actor(actor).is_none() {
            log::warn!("Refusing registry for unknown {actor}");
            return false;
        }
        if self.inventories.contains_key(&actor) {
            log::warn!("{actor} is already connected");
            return false;
        }
        let body: Vec<ContainerId> = hands
            .as_ref()
            .map(|hands| hands.hand_slots().to_vec())
            .unwrap_or_default();
        self.inventories
            .insert(actor, Inventory::new(actor, hands, self.sweep_interval));
        for slot in body {
            self.send_contents_to(actor, slot);
        }
        log::info!("{actor} connected");
        true
    }

    /// Drops an actor's registry, closing everything it had open first.
    pub fn disconnect_actor(&mut self, actor: ActorId) -> bool {
        let Some(open) = self
            .inventories
            .get(&actor)
            .map(|inventory| inventory.accessible().to_vec())
        else {
            return false;
        };
        for container in open {
            self.remove_container(actor, container);
        }
        self.inventories.remove(&actor);
        log::info!("{actor} disconnected");
        true
    }

    pub fn connected_actors(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.inventories.keys().copied()
    }

    // ---------------------------------------------------------------------
    //  Intents
    // ---------------------------------------------------------------------

    /// Applies one client intent on behalf of `actor`.
    pub fn handle_intent(&mut self, actor: ActorId, intent: &ClientIntent) -> Result<(), RequestError> {
        if !self.inventories.contains_key(&actor) {
            return Err(RequestError::InvalidReference(format!(
                "{actor} is not connected"
            )));
        }
        match *intent {
            ClientIntent::OpenContainer { container } => self.request_open(actor, container),
            ClientIntent::TransferItem {
                item,
                position,
                target,
            } => self.request_transfer(actor, item, position, target),
            ClientIntent::DropItem { item } => self.request_drop(actor, item),
            ClientIntent::CloseContainer { container } => {
                self.remove_container(actor, container);
                Ok(())
            }
            ClientIntent::SelectHand { hand } => self.select_hand(actor, hand),
        }
    }

    // ---------------------------------------------------------------------
    //  World lifecycle
    // ---------------------------------------------------------------------

    /// Destroys a container, revoking it from every registry first.
    ///
    /// Items inside fall into the world where the container stood and are
    /// announced with `Spawn`.
    pub fn despawn_container(&mut self, container: ContainerId) -> bool {
        let holders: Vec<ActorId> = self
            .inventories
            .values()
            .filter(|inventory| inventory.has_container(container))
            .map(Inventory::actor)
            .collect();
        for actor in holders {
            self.remove_container(actor, container);
        }
        let Some(released) = self.world.despawn_container(container) else {
            return false;
        };
        for item in released {
            if let Some(record) = self.world.item(item) {
                self.outbox.broadcast(ServerNotification::Spawn {
                    item,
                    transform: record.transform,
                    origin: Origin::Authority,
                });
            }
        }
        true
    }

    // ---------------------------------------------------------------------
    //  Fan-out helpers
    // ---------------------------------------------------------------------

    fn contents_of(&self, container: ContainerId) -> Option<ServerNotification> {
        let attached = self.world.container(container)?;
        Some(ServerNotification::ContainerContents {
            container,
            slots: attached.container().items().collect(),
        })
    }

    fn send_contents_to(&mut self, actor: ActorId, container: ContainerId) {
        if let Some(contents) = self.contents_of(container) {
            self.outbox.send_to(actor, contents);
        }
    }

    /// Sends the current listing of `container` to its observers and, for a
    /// body container, to the actor it belongs to.
    fn publish_contents(&mut self, container: ContainerId) {
        let Some(contents) = self.contents_of(container) else {
            return;
        };
        let mut recipients: Vec<ActorId> = self
            .world
            .container(container)
            .map(|attached| attached.observers().collect())
            .unwrap_or_default();
        if let Some(owner) = self.world.body_owner(container) {
            if !recipients.contains(&owner) {
                recipients.push(owner);
            }
        }
        self.outbox.send_to_each(recipients, &contents);
    }
}

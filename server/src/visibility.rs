//! Open/closed visual state of containers.
//!
//! A container flagged `OpenWhenContainerViewed` shows open for as long as at
//! least one registry lists it. The state is recomputed from all registries
//! after every open or close, so it reflects the union of viewers rather
//! than whoever touched the container last.

use std::collections::BTreeMap;

use satchel_core::protocol::ServerNotification;
use satchel_core::types::{ActorId, ContainerId};
use satchel_core::world::World;

use crate::inventory::Inventory;
use crate::outbox::Outbox;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualTransition {
    Opened,
    Closed,
}

/// Number of registries that currently list `container`.
pub fn viewer_count(inventories: &BTreeMap<ActorId, Inventory>, container: ContainerId) -> usize {
    inventories
        .values()
        .filter(|inventory| inventory.has_container(container))
        .count()
}

/// Brings the visual state of `container` in line with its viewers.
///
/// On a transition the container's boolean setter is called and the new state
/// is broadcast. Containers without the `OpenWhenContainerViewed` flag, and
/// unknown containers, are left alone.
pub fn synchronize(
    world: &mut World,
    inventories: &BTreeMap<ActorId, Inventory>,
    container: ContainerId,
    outbox: &mut Outbox,
) -> Option<VisualTransition> {
    let viewers = viewer_count(inventories, container);
    let attached = world.container_mut(container)?;
    if !attached.descriptor().open_when_container_viewed() {
        return None;
    }

    let should_be_open = viewers > 0;
    if attached.is_visually_open() == should_be_open {
        return None;
    }
    attached.set_visually_open(should_be_open);
    log::debug!(
        "{container} is now {} ({viewers} viewer(s))",
        if should_be_open { "open" } else { "closed" }
    );
    outbox.broadcast(ServerNotification::ContainerVisualState {
        container,
        open: should_be_open,
    });

    Some(if should_be_open {
        VisualTransition::Opened
    } else {
        VisualTransition::Closed
    })
}

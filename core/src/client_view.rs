//! Client-side mirror of the authority's notifications.
//!
//! The view never decides anything on its own: it records what the server
//! reported and raises [`ContainerEvent`]s for whoever renders the UI.

use std::collections::{BTreeSet, HashMap};
use std::sync::mpsc;

use crate::events::{ContainerEvent, ContainerEvents};
use crate::protocol::{Origin, ServerNotification};
use crate::types::{ActorId, ContainerId, ItemId, Position, Transform};

#[derive(Debug)]
pub struct ClientView {
    actor: ActorId,
    open: BTreeSet<ContainerId>,
    contents: HashMap<ContainerId, Vec<(Position, ItemId)>>,
    visuals: HashMap<ContainerId, bool>,
    loose: HashMap<ItemId, Transform>,
    events: ContainerEvents,
}

impl ClientView {
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            open: BTreeSet::new(),
            contents: HashMap::new(),
            visuals: HashMap::new(),
            loose: HashMap::new(),
            events: ContainerEvents::new(),
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Receives `ContainerOpened` / `ContainerClosed` events for this client.
    pub fn subscribe(&mut self) -> mpsc::Receiver<ContainerEvent> {
        self.events.subscribe()
    }

    pub fn apply(&mut self, notification: &ServerNotification) {
        match notification {
            ServerNotification::ContainerOpened { container } => {
                if self.open.insert(*container) {
                    self.events.publish(ContainerEvent::Opened(*container));
                }
            }
            ServerNotification::ContainerClosed { container } => {
                if self.open.remove(container) {
                    self.events.publish(ContainerEvent::Closed(*container));
                }
            }
            ServerNotification::ContainerVisualState { container, open } => {
                self.visuals.insert(*container, *open);
            }
            ServerNotification::ContainerContents { container, slots } => {
                for (_, item) in slots {
                    self.loose.remove(item);
                }
                for (other, listed) in self.contents.iter_mut() {
                    if other != container {
                        listed.retain(|(_, item)| !slots.iter().any(|(_, moved)| moved == item));
                    }
                }
                self.contents.insert(*container, slots.clone());
            }
            ServerNotification::Spawn {
                item,
                transform,
                origin,
            } => {
                if !origin.should_apply(Origin::Client(self.actor)) {
                    log::trace!("Skipping own spawn of {item}");
                    return;
                }
                for listed in self.contents.values_mut() {
                    listed.retain(|(_, listed_item)| listed_item != item);
                }
                self.loose.insert(*item, *transform);
            }
        }
    }

    pub fn is_open(&self, container: ContainerId) -> bool {
        self.open.contains(&container)
    }

    pub fn open_containers(&self) -> impl Iterator<Item = ContainerId> + '_ {
        self.open.iter().copied()
    }

    pub fn item_at(&self, container: ContainerId, position: Position) -> Option<ItemId> {
        self.contents
            .get(&container)?
            .iter()
            .find_map(|(slot, item)| (*slot == position).then_some(*item))
    }

    /// Last reported visual state; unknown containers read as closed.
    pub fn is_visually_open(&self, container: ContainerId) -> bool {
        self.visuals.get(&container).copied().unwrap_or(false)
    }

    pub fn loose_item(&self, item: ItemId) -> Option<Transform> {
        self.loose.get(&item).copied()
    }
}

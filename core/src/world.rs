//! The world store.
//!
//! Owns every item, attached container and actor record. Any operation that
//! has to keep two records in agreement (an item and the container slot that
//! lists it) lives here, so the exclusivity invariant is maintained in one
//! place: an item is listed by at most one container, and that container is
//! the one named by `Item::container`.

use std::collections::{BTreeMap, HashMap};

use crate::error::ContainerError;
use crate::types::{
    Actor, ActorId, AttachedContainer, ContainerDescriptor, ContainerId, Item, ItemId, Position,
    Transform,
};

#[derive(Debug, Default)]
pub struct World {
    items: HashMap<ItemId, Item>,
    containers: BTreeMap<ContainerId, AttachedContainer>,
    actors: BTreeMap<ActorId, Actor>,
    next_item: u32,
    next_container: u32,
    next_actor: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    //  Spawning
    // ---------------------------------------------------------------------

    pub fn spawn_actor(&mut self, name: &str, transform: Transform) -> ActorId {
        self.next_actor += 1;
        let id = ActorId(self.next_actor);
        self.actors.insert(id, Actor::new(id, name, transform));
        log::debug!("Spawned {id} ({name})");
        id
    }

    pub fn spawn_container(
        &mut self,
        descriptor: ContainerDescriptor,
        transform: Transform,
    ) -> ContainerId {
        self.next_container += 1;
        let id = ContainerId(self.next_container);
        log::debug!("Spawned {id} ({})", descriptor.name);
        self.containers
            .insert(id, AttachedContainer::new(id, descriptor, transform));
        id
    }

    pub fn spawn_item(&mut self, name: &str, transform: Transform) -> ItemId {
        self.next_item += 1;
        let id = ItemId(self.next_item);
        self.items.insert(id, Item::new(id, name, transform));
        id
    }

    /// Makes `container` part of `actor`'s body.
    pub fn attach_to_body(
        &mut self,
        actor: ActorId,
        container: ContainerId,
    ) -> Result<(), ContainerError> {
        if !self.containers.contains_key(&container) {
            return Err(ContainerError::UnknownContainer(container));
        }
        let record = self
            .actors
            .get_mut(&actor)
            .ok_or(ContainerError::UnknownActor(actor))?;
        record.body.insert(container);
        let transform = record.transform;
        if let Some(attached) = self.containers.get_mut(&container) {
            attached.mark_embodied();
            attached.set_transform(transform);
        }
        Ok(())
    }

    /// Destroys a container together with the grid it wraps.
    ///
    /// Contained items are released into the world at the container's
    /// transform. Returns the released items, or `None` if the container did
    /// not exist.
    pub fn despawn_container(&mut self, id: ContainerId) -> Option<Vec<ItemId>> {
        let attached = self.containers.remove(&id)?;
        let transform = attached.transform();
        let released: Vec<ItemId> = attached.container().items().map(|(_, item)| item).collect();
        for item in &released {
            if let Some(record) = self.items.get_mut(item) {
                record.container = None;
                record.active = true;
                record.transform = transform;
            }
        }
        for actor in self.actors.values_mut() {
            actor.body.remove(&id);
        }
        log::debug!("Despawned {id}, released {} item(s)", released.len());
        Some(released)
    }

    /// Removes an item from the world, unbinding it from its container first.
    pub fn despawn_item(&mut self, id: ItemId) -> Option<Item> {
        let item = self.items.remove(&id)?;
        if let Some(attached) = item.container.and_then(|c| self.containers.get_mut(&c)) {
            attached.container_mut().unbind(id);
        }
        Some(item)
    }

    // ---------------------------------------------------------------------
    //  Lookups
    // ---------------------------------------------------------------------

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn container(&self, id: ContainerId) -> Option<&AttachedContainer> {
        self.containers.get(&id)
    }

    /// Mutable access for observer and visual bookkeeping. The slot map itself
    /// can only change through [`World::add_item_position`] and
    /// [`World::detach_item`].
    pub fn container_mut(&mut self, id: ContainerId) -> Option<&mut AttachedContainer> {
        self.containers.get_mut(&id)
    }

    pub fn containers(&self) -> impl Iterator<Item = &AttachedContainer> {
        self.containers.values()
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    /// Moves an actor together with every container of its body.
    pub fn move_actor(&mut self, id: ActorId, transform: Transform) -> bool {
        let Some(actor) = self.actors.get_mut(&id) else {
            return false;
        };
        actor.transform = transform;
        for container in &actor.body {
            if let Some(attached) = self.containers.get_mut(container) {
                attached.set_transform(transform);
            }
        }
        true
    }

    pub fn move_container(&mut self, id: ContainerId, transform: Transform) -> bool {
        match self.containers.get_mut(&id) {
            Some(attached) => {
                attached.set_transform(transform);
                true
            }
            None => false,
        }
    }

    /// Whether `container` is part of `actor`'s own body.
    pub fn is_embodied(&self, actor: ActorId, container: ContainerId) -> bool {
        self.actors
            .get(&actor)
            .is_some_and(|record| record.embodies(container))
    }

    /// Owner of a body container, if it belongs to anyone.
    pub fn body_owner(&self, container: ContainerId) -> Option<ActorId> {
        if !self.containers.get(&container)?.descriptor().embodied() {
            return None;
        }
        self.actors
            .values()
            .find(|actor| actor.embodies(container))
            .map(|actor| actor.id)
    }

    // ---------------------------------------------------------------------
    //  Container mutation
    // ---------------------------------------------------------------------

    /// Binds `item` at `position` in `target`, removing it from whichever
    /// container held it before.
    ///
    /// All checks run before the first write, so on error nothing changed.
    /// On success the item is listed by `target` only and is deactivated in
    /// the world.
    pub fn add_item_position(
        &mut self,
        item: ItemId,
        target: ContainerId,
        position: Position,
    ) -> Result<(), ContainerError> {
        let source = self
            .items
            .get(&item)
            .ok_or(ContainerError::UnknownItem(item))?
            .container;
        self.containers
            .get(&target)
            .ok_or(ContainerError::UnknownContainer(target))?
            .container()
            .check_slot(item, position)?;
        if let Some(source) = source {
            self.check_listed(item, source)?;
        }

        if let Some(source) = source.filter(|source| *source != target) {
            if let Some(attached) = self.containers.get_mut(&source) {
                attached.container_mut().unbind(item);
            }
        }
        if let Some(attached) = self.containers.get_mut(&target) {
            attached.container_mut().bind(item, position);
        }
        if let Some(record) = self.items.get_mut(&item) {
            record.container = Some(target);
            record.active = false;
        }
        Ok(())
    }

    /// Takes `item` out of its container and leaves it loose in the world.
    ///
    /// Returns the container it was taken from. The caller decides the final
    /// resting transform with [`World::place_item`].
    pub fn detach_item(&mut self, item: ItemId) -> Result<ContainerId, ContainerError> {
        let source = self
            .items
            .get(&item)
            .ok_or(ContainerError::UnknownItem(item))?
            .container
            .ok_or(ContainerError::NotContained(item))?;
        self.check_listed(item, source)?;

        if let Some(attached) = self.containers.get_mut(&source) {
            attached.container_mut().unbind(item);
        }
        if let Some(record) = self.items.get_mut(&item) {
            record.container = None;
            record.active = true;
        }
        Ok(source)
    }

    /// Sets the world transform of a loose item. Contained items keep theirs.
    pub fn place_item(&mut self, item: ItemId, transform: Transform) -> bool {
        match self.items.get_mut(&item) {
            Some(record) if !record.is_contained() => {
                record.transform = transform;
                true
            }
            _ => false,
        }
    }

    fn check_listed(&self, item: ItemId, container: ContainerId) -> Result<(), ContainerError> {
        let listed = self
            .containers
            .get(&container)
            .is_some_and(|attached| attached.container().contains(item));
        if listed {
            Ok(())
        } else {
            Err(ContainerError::Inconsistent { item, container })
        }
    }

    /// Verifies the exclusivity invariant across the whole world.
    ///
    /// Every slot must point at an item whose back-reference names the slot's
    /// container, and every contained item must be listed exactly once.
    pub fn check_consistency(&self) -> Result<(), ContainerError> {
        let mut listings: HashMap<ItemId, usize> = HashMap::new();
        for attached in self.containers.values() {
            for (_, item) in attached.container().items() {
                let record = self
                    .items
                    .get(&item)
                    .ok_or(ContainerError::UnknownItem(item))?;
                if record.container != Some(attached.id()) {
                    return Err(ContainerError::Inconsistent {
                        item,
                        container: attached.id(),
                    });
                }
                *listings.entry(item).or_default() += 1;
            }
        }
        for record in self.items.values() {
            let count = listings.get(&record.id).copied().unwrap_or(0);
            match record.container {
                Some(container) if count != 1 => {
                    return Err(ContainerError::Inconsistent {
                        item: record.id,
                        container,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

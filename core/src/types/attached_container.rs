//! A container bound to a place in the world.

use std::collections::BTreeSet;

use bitflags::bitflags;

use super::{ActorId, Container, ContainerId, GridSize, Transform};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Behaviour switches carried by a [`ContainerDescriptor`].
    pub struct DescriptorFlags: u32 {
        /// The container shows an open visual while anyone has it open.
        const OpenWhenContainerViewed = 1 << 0;
        /// The container is part of an actor's body (hands, pockets).
        const Embodied = 1 << 1;
    }
}

/// Static configuration of an attached container.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerDescriptor {
    pub name: String,
    pub size: GridSize,
    pub flags: DescriptorFlags,
}

impl ContainerDescriptor {
    pub fn new(name: impl Into<String>, size: GridSize) -> Self {
        Self {
            name: name.into(),
            size,
            flags: DescriptorFlags::empty(),
        }
    }

    pub fn with_flags(mut self, flags: DescriptorFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn open_when_container_viewed(&self) -> bool {
        self.flags.contains(DescriptorFlags::OpenWhenContainerViewed)
    }

    pub fn embodied(&self) -> bool {
        self.flags.contains(DescriptorFlags::Embodied)
    }
}

/// Binds a [`Container`] to a world location and tracks who is looking at it.
///
/// The wrapped container is created and destroyed together with this record.
/// Observers are referenced by id only; actors are owned elsewhere.
#[derive(Debug, Clone)]
pub struct AttachedContainer {
    id: ContainerId,
    descriptor: ContainerDescriptor,
    container: Container,
    transform: Transform,
    observers: BTreeSet<ActorId>,
    visually_open: bool,
}

impl AttachedContainer {
    pub fn new(id: ContainerId, descriptor: ContainerDescriptor, transform: Transform) -> Self {
        let container = Container::new(id, descriptor.size);
        Self {
            id,
            descriptor,
            container,
            transform,
            observers: BTreeSet::new(),
            visually_open: false,
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn descriptor(&self) -> &ContainerDescriptor {
        &self.descriptor
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub(crate) fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    pub(crate) fn mark_embodied(&mut self) {
        self.descriptor.flags |= DescriptorFlags::Embodied;
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Registers `actor` as an observer. Returns `false` if it already was one.
    pub fn add_observer(&mut self, actor: ActorId) -> bool {
        self.observers.insert(actor)
    }

    /// Returns `false` if `actor` was not observing.
    pub fn remove_observer(&mut self, actor: ActorId) -> bool {
        self.observers.remove(&actor)
    }

    pub fn is_observed_by(&self, actor: ActorId) -> bool {
        self.observers.contains(&actor)
    }

    pub fn observers(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.observers.iter().copied()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn is_visually_open(&self) -> bool {
        self.visually_open
    }

    /// Boolean setter driving the open/closed visual.
    pub fn set_visually_open(&mut self, open: bool) {
        self.visually_open = open;
    }
}

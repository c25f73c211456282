//! Data types module - the records the world is made of

mod actor;
mod attached_container;
mod container;
mod ids;
mod item;
mod transform;

pub use actor::Actor;
pub use attached_container::{AttachedContainer, ContainerDescriptor, DescriptorFlags};
pub use container::{Container, GridSize};
pub use ids::{ActorId, ContainerId, ItemId, Position};
pub use item::Item;
pub use transform::{Rotation, Transform, Vec3};

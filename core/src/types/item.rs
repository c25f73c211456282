//! Item record

use serde::{Deserialize, Serialize};

use super::{ContainerId, ItemId, Transform, Vec3};

/// An item in the world.
///
/// Items are owned by the [`crate::world::World`]. A container only refers to
/// them by id, and `container` is the back-reference that must agree with the
/// container's slot map. `None` means the item lies loose in the world.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub container: Option<ContainerId>,
    pub transform: Transform,
    /// Half-size of the item's bounding box.
    pub extents: Vec3,
    /// Inactive items are hidden from the world simulation (they are stowed).
    pub active: bool,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, transform: Transform) -> Self {
        Self {
            id,
            name: name.into(),
            container: None,
            transform,
            extents: Vec3::new(0.25, 0.25, 0.25),
            active: true,
        }
    }

    pub fn is_contained(&self) -> bool {
        self.container.is_some()
    }

    pub fn is_in(&self, container: ContainerId) -> bool {
        self.container == Some(container)
    }
}

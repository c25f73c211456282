//! Sparse, position-indexed item storage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ContainerId, ItemId, Position};
use crate::error::ContainerError;

/// Dimensions of a container grid.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }
}

/// The item grid wrapped by an [`super::AttachedContainer`].
///
/// Only the item ids are stored here. The items themselves live in the
/// [`crate::world::World`], and every id in `slots` has its
/// `Item::container` pointing back at `owner`. Moving an item between two
/// containers touches both maps and the item, so the mutating methods are
/// crate-private and driven from [`crate::world::World::add_item_position`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Container {
    owner: ContainerId,
    size: GridSize,
    slots: BTreeMap<Position, ItemId>,
}

impl Container {
    pub fn new(owner: ContainerId, size: GridSize) -> Self {
        Self {
            owner,
            size,
            slots: BTreeMap::new(),
        }
    }

    pub fn owner(&self) -> ContainerId {
        self.owner
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Item bound at `position`, if any.
    pub fn item_at(&self, position: Position) -> Option<ItemId> {
        self.slots.get(&position).copied()
    }

    pub fn position_of(&self, item: ItemId) -> Option<Position> {
        self.slots
            .iter()
            .find_map(|(position, id)| (*id == item).then_some(*position))
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.position_of(item).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Occupied slots in position order.
    pub fn items(&self) -> impl Iterator<Item = (Position, ItemId)> + '_ {
        self.slots.iter().map(|(position, item)| (*position, *item))
    }

    /// The only item in the container, if it holds exactly one.
    pub fn sole_item(&self) -> Option<ItemId> {
        let mut items = self.slots.values();
        match (items.next(), items.next()) {
            (Some(item), None) => Some(*item),
            _ => None,
        }
    }

    /// First free cell in row-major order.
    pub fn first_free_position(&self) -> Option<Position> {
        (0..self.size.height)
            .flat_map(|y| (0..self.size.width).map(move |x| Position::new(x, y)))
            .find(|position| !self.slots.contains_key(position))
    }

    /// Checks whether `item` may be bound at `position` without writing.
    ///
    /// Re-binding an item to the slot it already occupies is allowed.
    pub fn check_slot(&self, item: ItemId, position: Position) -> Result<(), ContainerError> {
        if !self.size.contains(position) {
            return Err(ContainerError::OutOfBounds {
                container: self.owner,
                position,
            });
        }
        match self.item_at(position) {
            Some(occupant) if occupant != item => Err(ContainerError::SlotOccupied {
                container: self.owner,
                position,
                occupant,
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn bind(&mut self, item: ItemId, position: Position) {
        self.unbind(item);
        self.slots.insert(position, item);
    }

    pub(crate) fn unbind(&mut self, item: ItemId) -> Option<Position> {
        let position = self.position_of(item)?;
        self.slots.remove(&position);
        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chest() -> Container {
        Container::new(ContainerId(1), GridSize::new(4, 2))
    }

    #[test]
    fn item_at_reads_bound_slots_only() {
        let mut container = chest();
        container.bind(ItemId(9), Position::new(2, 1));

        assert_eq!(container.item_at(Position::new(2, 1)), Some(ItemId(9)));
        assert_eq!(container.item_at(Position::ORIGIN), None);
        assert_eq!(container.position_of(ItemId(9)), Some(Position::new(2, 1)));
    }

    #[test]
    fn empty_iff_no_entries() {
        let mut container = chest();
        assert!(container.is_empty());
        container.bind(ItemId(1), Position::ORIGIN);
        assert!(!container.is_empty());
        container.unbind(ItemId(1));
        assert!(container.is_empty());
    }

    #[test]
    fn check_slot_rejects_other_occupant() {
        let mut container = chest();
        container.bind(ItemId(1), Position::ORIGIN);

        assert_eq!(
            container.check_slot(ItemId(2), Position::ORIGIN),
            Err(ContainerError::SlotOccupied {
                container: ContainerId(1),
                position: Position::ORIGIN,
                occupant: ItemId(1),
            })
        );
        assert_eq!(container.check_slot(ItemId(1), Position::ORIGIN), Ok(()));
    }

    #[test]
    fn check_slot_rejects_out_of_bounds() {
        let container = chest();
        assert!(matches!(
            container.check_slot(ItemId(1), Position::new(4, 0)),
            Err(ContainerError::OutOfBounds { .. })
        ));
        assert!(matches!(
            container.check_slot(ItemId(1), Position::new(0, 2)),
            Err(ContainerError::OutOfBounds { .. })
        ));
    }

    /// Binding an item that is already in the container moves it instead of
    /// duplicating it.
    #[test]
    fn rebinding_moves_within_container() {
        let mut container = chest();
        container.bind(ItemId(5), Position::ORIGIN);
        container.bind(ItemId(5), Position::new(3, 1));

        assert_eq!(container.len(), 1);
        assert_eq!(container.item_at(Position::ORIGIN), None);
        assert_eq!(container.item_at(Position::new(3, 1)), Some(ItemId(5)));
    }

    #[test]
    fn sole_item_requires_exactly_one() {
        let mut container = chest();
        assert_eq!(container.sole_item(), None);
        container.bind(ItemId(1), Position::ORIGIN);
        assert_eq!(container.sole_item(), Some(ItemId(1)));
        container.bind(ItemId(2), Position::new(1, 0));
        assert_eq!(container.sole_item(), None);
    }

    #[test]
    fn first_free_position_scans_rows() {
        let mut container = chest();
        container.bind(ItemId(1), Position::new(0, 0));
        container.bind(ItemId(2), Position::new(1, 0));
        assert_eq!(container.first_free_position(), Some(Position::new(2, 0)));

        let mut hand = Container::new(ContainerId(2), GridSize::new(1, 1));
        hand.bind(ItemId(3), Position::ORIGIN);
        assert_eq!(hand.first_free_position(), None);
    }

    #[test]
    fn items_iterates_in_position_order() {
        let mut container = chest();
        container.bind(ItemId(7), Position::new(1, 1));
        container.bind(ItemId(8), Position::new(0, 1));
        let listed: Vec<_> = container.items().collect();
        assert_eq!(
            listed,
            vec![(Position::new(0, 1), ItemId(8)), (Position::new(1, 1), ItemId(7))]
        );
    }
}

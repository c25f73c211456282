use satchel_core::protocol::{Origin, ServerNotification};
use satchel_core::types::{ActorId, ContainerId, ItemId, Position};

use super::Authority;
use crate::error::RequestError;
use crate::hands::Hands;
use crate::inventory::Inventory;

impl Authority {
    fn registry(&self, actor: ActorId) -> Result<&Inventory, RequestError> {
        self.inventories
            .get(&actor)
            .ok_or_else(|| RequestError::InvalidReference(actor.to_string()))
    }

    fn hands_of(&self, actor: ActorId) -> Result<&dyn Hands, RequestError> {
        self.registry(actor)?
            .hands()
            .map(|hands| hands as &dyn Hands)
            .ok_or_else(|| RequestError::Unreachable(format!("{actor} has no hands")))
    }

    /// Resolves the container currently holding `item`.
    ///
    /// An item whose back-reference names a container that does not list it
    /// is reported as inconsistent rather than invalid.
    fn source_of(&self, item: ItemId) -> Result<ContainerId, RequestError> {
        let record = self
            .world
            .item(item)
            .ok_or_else(|| RequestError::InvalidReference(item.to_string()))?;
        let source = record
            .container
            .ok_or_else(|| RequestError::InvalidReference(format!("{item} is not contained")))?;
        let listed = self
            .world
            .container(source)
            .is_some_and(|attached| attached.container().contains(item));
        if !listed {
            return Err(RequestError::Inconsistent(format!(
                "{item} claims {source} but is not listed there"
            )));
        }
        Ok(source)
    }

    /// Moves `item` to `position` in `target` on behalf of `actor`.
    ///
    /// Every reference is resolved before anything is checked. The actor must
    /// be allowed to modify both the source and the target, and the target
    /// must be within reach right now. An occupied slot rejects the request;
    /// there is no swap.
    pub fn request_transfer(
        &mut self,
        actor: ActorId,
        item: ItemId,
        position: Position,
        target: ContainerId,
    ) -> Result<(), RequestError> {
        let inventory = self.registry(actor)?;
        let source = self.source_of(item)?;
        if self.world.container(target).is_none() {
            return Err(RequestError::InvalidReference(target.to_string()));
        }

        for container in [source, target] {
            if !inventory.can_modify_container(&self.world, container) {
                return Err(RequestError::Unauthorized(container.to_string()));
            }
        }
        if !self.hands_of(actor)?.can_interact(&self.world, target) {
            return Err(RequestError::Unreachable(target.to_string()));
        }

        self.world.add_item_position(item, target, position)?;
        log::debug!("{actor} moved {item} from {source} to {target} at {position}");

        self.publish_contents(source);
        if source != target {
            self.publish_contents(target);
        }
        Ok(())
    }

    /// Takes `item` out of its container and leaves it in the world.
    ///
    /// Only the source needs to be modifiable. Where the item ends up is the
    /// placement collaborator's call; the result is broadcast as a `Spawn`
    /// originating from the authority.
    pub fn request_drop(&mut self, actor: ActorId, item: ItemId) -> Result<(), RequestError> {
        let inventory = self.registry(actor)?;
        let source = self.source_of(item)?;
        if !inventory.can_modify_container(&self.world, source) {
            return Err(RequestError::Unauthorized(source.to_string()));
        }

        self.world.detach_item(item)?;
        let transform = self.placement.resting_transform(&self.world, actor, item);
        self.world.place_item(item, transform);
        log::debug!("{actor} dropped {item} from {source}");

        self.publish_contents(source);
        self.outbox.broadcast(ServerNotification::Spawn {
            item,
            transform,
            origin: Origin::Authority,
        });
        Ok(())
    }

    /// Moves the only item in `container` into the selected hand.
    pub fn take_sole_item(&mut self, actor: ActorId, container: ContainerId) -> Result<(), RequestError> {
        let item = self
            .world
            .container(container)
            .ok_or_else(|| RequestError::InvalidReference(container.to_string()))?
            .container()
            .sole_item()
            .ok_or_else(|| RequestError::InvalidReference(format!("{container} has no sole item")))?;
        let hand = self.hands_of(actor)?.selected_hand();
        self.request_transfer(actor, item, Position::ORIGIN, hand)
    }

    /// Moves the item in the selected hand into `target`.
    ///
    /// Without an explicit `position` the first free cell is used.
    pub fn place_held_item(
        &mut self,
        actor: ActorId,
        target: ContainerId,
        position: Option<Position>,
    ) -> Result<(), RequestError> {
        let item = self
            .hands_of(actor)?
            .item_in_hand(&self.world)
            .ok_or_else(|| RequestError::InvalidReference(format!("{actor} holds nothing")))?;
        let position = match position {
            Some(position) => position,
            None => self
                .world
                .container(target)
                .ok_or_else(|| RequestError::InvalidReference(target.to_string()))?
                .container()
                .first_free_position()
                .ok_or_else(|| RequestError::SlotOccupied(format!("{target} is full")))?,
        };
        self.request_transfer(actor, item, position, target)
    }

    pub fn select_hand(&mut self, actor: ActorId, hand: ContainerId) -> Result<(), RequestError> {
        let hands = self
            .inventories
            .get_mut(&actor)
            .ok_or_else(|| RequestError::InvalidReference(actor.to_string()))?
            .hands_mut()
            .ok_or_else(|| RequestError::InvalidReference(format!("{actor} has no hands")))?;
        if hands.set_active_hand(hand) {
            Ok(())
        } else {
            Err(RequestError::Unauthorized(hand.to_string()))
        }
    }
}

//! The hands/interaction collaborator.
//!
//! The authority only consumes this interface: which hand is selected, what
//! it holds, and whether the actor can interact with a container right now.
//! [`ActorHands`] is the reference implementation, a distance check against
//! the actor's position.

use satchel_core::constants::{HAND_COUNT, HAND_GRID_HEIGHT, HAND_GRID_WIDTH};
use satchel_core::types::{
    ActorId, ContainerDescriptor, ContainerId, DescriptorFlags, GridSize, ItemId,
};
use satchel_core::world::World;
use satchel_core::ContainerError;

pub trait Hands {
    fn actor(&self) -> ActorId;

    /// Hand slot containers, in order.
    fn hand_slots(&self) -> &[ContainerId];

    fn selected_hand(&self) -> ContainerId;

    /// Selects `hand` if it is one of this actor's slots.
    fn set_active_hand(&mut self, hand: ContainerId) -> bool;

    /// Live interaction-reachability predicate.
    fn can_interact(&self, world: &World, target: ContainerId) -> bool;

    fn selected_hand_empty(&self, world: &World) -> bool {
        world
            .container(self.selected_hand())
            .is_none_or(|hand| hand.container().is_empty())
    }

    fn item_in_hand(&self, world: &World) -> Option<ItemId> {
        world
            .container(self.selected_hand())?
            .container()
            .items()
            .next()
            .map(|(_, item)| item)
    }
}

/// Two 1x1 hand slots and a reach radius around the actor.
#[derive(Debug, Clone)]
pub struct ActorHands {
    actor: ActorId,
    slots: [ContainerId; HAND_COUNT],
    selected: usize,
    reach: f32,
}

impl ActorHands {
    /// Spawns the hand slot containers and makes them part of `actor`'s body.
    pub fn equip(world: &mut World, actor: ActorId, reach: f32) -> Result<Self, ContainerError> {
        if world.actor(actor).is_none() {
            return Err(ContainerError::UnknownActor(actor));
        }
        let transform = world
            .actor(actor)
            .map(|record| record.transform)
            .unwrap_or_default();
        let mut slots = [ContainerId(0); HAND_COUNT];
        for (n, slot) in slots.iter_mut().enumerate() {
            let descriptor = ContainerDescriptor::new(
                format!("hand-{n}"),
                GridSize::new(HAND_GRID_WIDTH, HAND_GRID_HEIGHT),
            )
            .with_flags(DescriptorFlags::Embodied);
            *slot = world.spawn_container(descriptor, transform);
            world.attach_to_body(actor, *slot)?;
        }
        Ok(Self {
            actor,
            slots,
            selected: 0,
            reach,
        })
    }

    pub fn reach(&self) -> f32 {
        self.reach
    }
}

impl Hands for ActorHands {
    fn actor(&self) -> ActorId {
        self.actor
    }

    fn hand_slots(&self) -> &[ContainerId] {
        &self.slots
    }

    fn selected_hand(&self) -> ContainerId {
        self.slots[self.selected]
    }

    fn set_active_hand(&mut self, hand: ContainerId) -> bool {
        match self.slots.iter().position(|slot| *slot == hand) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    fn can_interact(&self, world: &World, target: ContainerId) -> bool {
        if world.is_embodied(self.actor, target) {
            return true;
        }
        let (Some(actor), Some(container)) = (world.actor(self.actor), world.container(target))
        else {
            return false;
        };
        actor
            .transform
            .position
            .distance(container.transform().position)
            <= self.reach
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchel_core::types::{Position, Transform, Vec3};

    fn setup() -> (World, ActorId, ActorHands) {
        let mut world = World::new();
        let actor = world.spawn_actor("alice", Transform::default());
        let hands = ActorHands::equip(&mut world, actor, 2.0).unwrap();
        (world, actor, hands)
    }

    #[test]
    fn equip_creates_embodied_one_slot_hands() {
        let (world, actor, hands) = setup();
        assert_eq!(hands.hand_slots().len(), HAND_COUNT);
        for slot in hands.hand_slots() {
            assert!(world.is_embodied(actor, *slot));
            assert_eq!(world.container(*slot).unwrap().container().size(), GridSize::new(1, 1));
        }
        assert_eq!(hands.selected_hand(), hands.hand_slots()[0]);
    }

    #[test]
    fn equip_unknown_actor_fails() {
        let mut world = World::new();
        assert!(ActorHands::equip(&mut world, ActorId(7), 1.0).is_err());
    }

    #[test]
    fn set_active_hand_only_accepts_own_slots() {
        let (_, _, mut hands) = setup();
        let second = hands.hand_slots()[1];
        assert!(hands.set_active_hand(second));
        assert_eq!(hands.selected_hand(), second);
        assert!(!hands.set_active_hand(ContainerId(999)));
        assert_eq!(hands.selected_hand(), second);
    }

    #[test]
    fn item_in_hand_reads_selected_slot() {
        let (mut world, _, hands) = setup();
        assert!(hands.selected_hand_empty(&world));
        assert_eq!(hands.item_in_hand(&world), None);

        let x = world.spawn_item("knife", Transform::default());
        world
            .add_item_position(x, hands.selected_hand(), Position::ORIGIN)
            .unwrap();

        assert!(!hands.selected_hand_empty(&world));
        assert_eq!(hands.item_in_hand(&world), Some(x));
    }

    #[test]
    fn can_interact_within_reach_or_with_own_body() {
        let (mut world, _, hands) = setup();
        let near = world.spawn_container(
            ContainerDescriptor::new("near", GridSize::new(2, 2)),
            Transform::at(Vec3::new(1.5, 0.0, 0.0)),
        );
        let far = world.spawn_container(
            ContainerDescriptor::new("far", GridSize::new(2, 2)),
            Transform::at(Vec3::new(10.0, 0.0, 0.0)),
        );

        assert!(hands.can_interact(&world, near));
        assert!(!hands.can_interact(&world, far));
        assert!(hands.can_interact(&world, hands.hand_slots()[1]));
        assert!(!hands.can_interact(&world, ContainerId(999)));
    }
}

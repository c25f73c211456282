//! Per-actor access registry.
//!
//! An [`Inventory`] records which containers its actor has explicitly opened
//! and not yet lost. It is the authority's answer to "may this actor act on
//! this container". Entries go stale when the actor walks away; the periodic
//! sweep finds them and [`crate::authority::Authority`] removes them.

use std::time::Duration;

use satchel_core::types::{ActorId, ContainerId};
use satchel_core::world::World;

use crate::hands::Hands;

/// Wall-clock gate for the reachability sweep.
///
/// Elapsed time accumulates across ticks, so the sweep rate stays bounded no
/// matter how fast the loop runs.
#[derive(Debug, Clone)]
pub struct SweepTimer {
    interval: Duration,
    elapsed: Duration,
}

impl SweepTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Adds `dt` and reports whether a sweep is due. Resets when it is.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return false;
        }
        self.elapsed = Duration::ZERO;
        true
    }
}

pub struct Inventory {
    actor: ActorId,
    hands: Option<Box<dyn Hands>>,
    accessible: Vec<ContainerId>,
    sweep: SweepTimer,
}

impl Inventory {
    pub fn new(actor: ActorId, hands: Option<Box<dyn Hands>>, sweep_interval: Duration) -> Self {
        Self {
            actor,
            hands,
            accessible: Vec::new(),
            sweep: SweepTimer::new(sweep_interval),
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn hands(&self) -> Option<&(dyn Hands + 'static)> {
        self.hands.as_deref()
    }

    pub fn hands_mut(&mut self) -> Option<&mut (dyn Hands + 'static)> {
        self.hands.as_deref_mut()
    }

    /// Containers currently accessible, in the order they were opened.
    pub fn accessible(&self) -> &[ContainerId] {
        &self.accessible
    }

    pub fn has_container(&self, container: ContainerId) -> bool {
        self.accessible.contains(&container)
    }

    /// Explicitly opened, or part of the actor's own body.
    pub fn can_modify_container(&self, world: &World, container: ContainerId) -> bool {
        self.has_container(container) || world.is_embodied(self.actor, container)
    }

    /// Appends `container`. Returns `false` if it was already accessible.
    pub(crate) fn insert(&mut self, container: ContainerId) -> bool {
        if self.has_container(container) {
            return false;
        }
        self.accessible.push(container);
        true
    }

    /// Returns `false` if `container` was not accessible.
    pub(crate) fn remove(&mut self, container: ContainerId) -> bool {
        let before = self.accessible.len();
        self.accessible.retain(|c| *c != container);
        self.accessible.len() != before
    }

    pub(crate) fn advance_sweep(&mut self, dt: Duration) -> bool {
        self.sweep.advance(dt)
    }

    /// Accessible containers that fail the hands' reachability predicate.
    ///
    /// Collected in one pass so the caller can remove them afterwards without
    /// disturbing the iteration. An actor without hands yields nothing.
    pub fn unreachable(&self, world: &World) -> Vec<ContainerId> {
        let Some(hands) = self.hands() else {
            return Vec::new();
        };
        self.accessible
            .iter()
            .copied()
            .filter(|container| !hands.can_interact(world, *container))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hands::ActorHands;
    use satchel_core::types::{ContainerDescriptor, GridSize, Transform, Vec3};

    #[test]
    fn sweep_timer_fires_once_per_interval() {
        let mut timer = SweepTimer::new(Duration::from_millis(500));
        assert!(!timer.advance(Duration::from_millis(200)));
        assert!(!timer.advance(Duration::from_millis(200)));
        assert!(timer.advance(Duration::from_millis(200)));
        assert!(!timer.advance(Duration::from_millis(100)));
    }

    /// Many fast ticks still only sweep at the configured cadence.
    #[test]
    fn sweep_timer_is_independent_of_tick_rate() {
        let mut timer = SweepTimer::new(Duration::from_millis(500));
        let fired = (0..1000)
            .filter(|_| timer.advance(Duration::from_millis(1)))
            .count();
        assert_eq!(fired, 2);
    }

    #[test]
    fn insert_and_remove_are_idempotent() {
        let mut inventory = Inventory::new(ActorId(1), None, Duration::from_millis(500));
        assert!(inventory.insert(ContainerId(3)));
        assert!(!inventory.insert(ContainerId(3)));
        assert_eq!(inventory.accessible(), &[ContainerId(3)]);

        assert!(inventory.remove(ContainerId(3)));
        assert!(!inventory.remove(ContainerId(3)));
        assert!(inventory.accessible().is_empty());
    }

    #[test]
    fn can_modify_own_body_without_opening_it() {
        let mut world = World::new();
        let actor = world.spawn_actor("alice", Transform::default());
        let pocket = world.spawn_container(
            ContainerDescriptor::new("pocket", GridSize::new(1, 1)),
            Transform::default(),
        );
        let chest = world.spawn_container(
            ContainerDescriptor::new("chest", GridSize::new(1, 1)),
            Transform::default(),
        );
        world.attach_to_body(actor, pocket).unwrap();

        let mut inventory = Inventory::new(actor, None, Duration::from_millis(500));
        assert!(inventory.can_modify_container(&world, pocket));
        assert!(!inventory.can_modify_container(&world, chest));
        inventory.insert(chest);
        assert!(inventory.can_modify_container(&world, chest));
    }

    #[test]
    fn unreachable_lists_only_failing_containers() {
        let mut world = World::new();
        let actor = world.spawn_actor("alice", Transform::default());
        let hands = ActorHands::equip(&mut world, actor, 2.0).unwrap();
        let spawn = |world: &mut World, x: f32| {
            world.spawn_container(
                ContainerDescriptor::new("box", GridSize::new(2, 2)),
                Transform::at(Vec3::new(x, 0.0, 0.0)),
            )
        };
        let c1 = spawn(&mut world, 1.0);
        let c2 = spawn(&mut world, 8.0);
        let c3 = spawn(&mut world, 1.5);

        let mut inventory = Inventory::new(actor, Some(Box::new(hands)), Duration::from_millis(500));
        for c in [c1, c2, c3] {
            inventory.insert(c);
        }

        assert_eq!(inventory.unreachable(&world), vec![c2]);
    }

    #[test]
    fn without_hands_nothing_is_unreachable() {
        let world = World::new();
        let mut inventory = Inventory::new(ActorId(1), None, Duration::from_millis(500));
        inventory.insert(ContainerId(1));
        assert!(inventory.unreachable(&world).is_empty());
    }
}

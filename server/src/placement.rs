//! World placement of dropped items.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use satchel_core::types::{ActorId, ItemId, Transform};
use satchel_core::world::World;

/// Decides where a detached item comes to rest.
pub trait Placement {
    fn resting_transform(&mut self, world: &World, actor: ActorId, item: ItemId) -> Transform;
}

/// Drops items at the actor's feet, scattered a little on the ground plane.
pub struct ScatterAtFeet {
    scatter: f32,
    rng: StdRng,
}

impl ScatterAtFeet {
    pub fn new(scatter: f32) -> Self {
        Self {
            scatter: scatter.max(0.0),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(scatter: f32, seed: u64) -> Self {
        Self {
            scatter: scatter.max(0.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn jitter(&mut self) -> f32 {
        if self.scatter > 0.0 {
            self.rng.gen_range(-self.scatter..=self.scatter)
        } else {
            0.0
        }
    }
}

impl Placement for ScatterAtFeet {
    fn resting_transform(&mut self, world: &World, actor: ActorId, item: ItemId) -> Transform {
        let base = match world.actor(actor) {
            Some(record) => record.transform,
            None => world
                .item(item)
                .map(|record| record.transform)
                .unwrap_or_default(),
        };
        let (dx, dz) = (self.jitter(), self.jitter());
        Transform {
            position: base.position.offset(dx, 0.0, dz),
            rotation: base.rotation,
        }
    }
}

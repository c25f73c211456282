//! Constants module - tunables shared by the authority and its clients

use std::time::Duration;

// =============================================================================
// Hands
// =============================================================================

/// Number of hand slots an actor carries.
pub const HAND_COUNT: usize = 2;

/// Hand slots are 1x1 grids, which gives them a capacity of one.
pub const HAND_GRID_WIDTH: u16 = 1;
pub const HAND_GRID_HEIGHT: u16 = 1;

/// Default interaction distance (world units) used by the reference hands.
pub const DEFAULT_REACH: f32 = 2.5;

// =============================================================================
// Access registry
// =============================================================================

/// Milliseconds between reachability sweeps of an actor's accessible containers.
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 500;

/// [`DEFAULT_SWEEP_INTERVAL_MS`] as a [`Duration`], the default registry sweep cadence.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS);

// =============================================================================
// Apply loop
// =============================================================================

/// Authoritative loop ticks per second.
pub const DEFAULT_TICK_RATE: u32 = 30;

/// Maximum horizontal scatter applied to items dropped into the world.
pub const DEFAULT_DROP_SCATTER: f32 = 0.25;

//! Neon Snake - A grid snake arcade game with lasers and power-ups
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, power-ups, timers)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input binding and UI live outside this crate. They drive
//! [`sim::GameEngine`] through `tick`/`set_intent`/`reset` and consume its
//! events and read-only accessors.

pub mod sim;
pub mod tuning;

pub use sim::{Cell, Direction, GameEngine, GameEvent, GamePhase};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Grid is GRID_SIZE x GRID_SIZE cells
    pub const GRID_SIZE: i32 = 20;
    /// Segments in a freshly spawned snake
    pub const INITIAL_SNAKE_LENGTH: usize = 4;

    /// Movement interval at session start (ms between steps)
    pub const INITIAL_SPEED: u32 = 100;
    /// Interval reduction per food eaten (ms)
    pub const SPEED_DECREMENT: u32 = 2;
    /// Fastest allowed movement interval (ms)
    pub const MIN_SPEED: u32 = 40;

    /// Status effect duration after pickup (ms)
    pub const POWER_UP_DURATION: u64 = 5000;
    /// Power-up spawn cadence, wall-clock (ms)
    pub const POWER_UP_SPAWN_INTERVAL: u64 = 10_000;
    /// How long an uncollected power-up stays on the grid (ms)
    pub const POWER_UP_LIFETIME: u64 = 8000;
    /// Concurrent power-up cap
    pub const MAX_POWER_UPS: usize = 2;

    /// Points for any power-up pickup
    pub const SHIELD_SCORE: u32 = 50;
    /// Points per food
    pub const FOOD_SCORE: u32 = 10;

    /// Random probes before falling back to a full grid scan
    pub const MAX_CREATION_ATTEMPTS: u32 = 100;
}

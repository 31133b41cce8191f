//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through `tick(now)`
//! - Seeded RNG only
//! - Stable iteration order (power-ups keyed by id)
//! - No rendering or platform dependencies

pub mod grid;
pub mod hazard;
pub mod placement;
pub mod powerup;
pub mod schedule;
pub mod snake;
pub mod state;
pub mod tick;

pub use grid::{Cell, Direction, Grid};
pub use hazard::{Hazard, HazardField, Orientation};
pub use placement::{Occupancy, PlacementError, PositionFinder};
pub use powerup::{PowerUp, PowerUpId, PowerUpKind, PowerUpManager, StatusEffects};
pub use schedule::{Scheduler, TimerEvent};
pub use snake::Snake;
pub use state::{DeathReason, GameEngine, GameEvent, GamePhase, PlacementTarget, Snapshot};

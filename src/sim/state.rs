//! Game engine state, events and read-only snapshots
//!
//! [`GameEngine`] owns every piece of session state. Presentation layers only
//! see it through the accessors and the event queue here; the per-frame logic
//! lives in `tick.rs`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Direction, Grid};
use super::hazard::{Hazard, HazardField};
use super::placement::{Occupancy, PositionFinder};
use super::powerup::{PowerUp, PowerUpId, PowerUpKind, PowerUpManager, StatusEffects};
use super::snake::Snake;
use crate::tuning::{Tuning, TuningError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Snake is moving
    Running,
    /// Run ended, waiting for `reset`
    GameOver,
}

/// What killed the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeathReason {
    Wall,
    #[serde(rename = "self")]
    SelfCollision,
    Hazard,
}

/// Entity that could not be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementTarget {
    Food,
    PowerUp,
}

/// Outcome notifications for presentation layers (fire-and-forget)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u32),
    GameOverChanged(bool),
    FoodEaten(Cell),
    FoodPlaced(Cell),
    PowerUpSpawned {
        id: PowerUpId,
        kind: PowerUpKind,
        position: Cell,
    },
    PowerUpExpired {
        id: PowerUpId,
        position: Cell,
    },
    PowerUpCollected {
        kind: PowerUpKind,
        position: Cell,
    },
    EffectExpired(PowerUpKind),
    Died(DeathReason),
    /// A segment was added at `head_added`; `tail_removed` is where one left
    MovementCompleted {
        head_added: Cell,
        tail_removed: Option<Cell>,
    },
    PlacementFailed {
        target: PlacementTarget,
    },
}

/// Owned copy of everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub snake: Vec<Cell>,
    pub direction: Direction,
    pub food: Option<Cell>,
    pub hazards: Vec<Hazard>,
    pub power_ups: Vec<(PowerUpId, PowerUp)>,
    pub effects: StatusEffects,
    pub score: u32,
    pub speed: u32,
}

/// One game session
#[derive(Debug, Clone)]
pub struct GameEngine {
    pub(crate) tuning: Tuning,
    pub(crate) grid: Grid,
    pub(crate) finder: PositionFinder,
    /// Session seed; `reset` re-seeds from it
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) phase: GamePhase,
    pub(crate) snake: Snake,
    pub(crate) direction: Direction,
    /// Queued by `set_intent`, committed at the next movement step
    pub(crate) pending_direction: Direction,
    pub(crate) hazards: HazardField,
    pub(crate) food: Option<Cell>,
    pub(crate) power_ups: PowerUpManager,
    pub(crate) score: u32,
    /// Movement interval (ms)
    pub(crate) speed: u32,
    /// Time of the last committed step; `None` until the first tick anchors it
    pub(crate) last_move_time: Option<u64>,
    pub(crate) events: Vec<GameEvent>,
}

impl GameEngine {
    /// New session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// New session with custom tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let grid = tuning.grid();
        let mut engine = Self {
            grid,
            finder: PositionFinder::new(grid, tuning.max_creation_attempts),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            snake: tuning.starting_snake(),
            direction: Direction::Right,
            pending_direction: Direction::Right,
            hazards: HazardField::new(tuning.hazard_layout()),
            food: None,
            power_ups: PowerUpManager::new(tuning.power_up_config()),
            score: 0,
            speed: tuning.initial_speed,
            last_move_time: None,
            events: Vec::new(),
            tuning,
        };
        engine.reset();
        engine
    }

    /// Start over with the session seed. Cancels every pending timer.
    pub fn reset(&mut self) {
        self.reset_with_seed(self.seed);
    }

    /// Start over with a new seed
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.power_ups.clear();

        self.phase = GamePhase::Running;
        self.snake = self.tuning.starting_snake();
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.hazards = HazardField::new(self.tuning.hazard_layout());
        self.food = None;
        self.score = 0;
        self.speed = self.tuning.initial_speed;
        self.last_move_time = None;

        log::info!("New session with seed: {seed}");
        // Nothing from the previous session reaches listeners
        self.events.clear();
        self.events.push(GameEvent::ScoreChanged(0));
        self.events.push(GameEvent::GameOverChanged(false));
        self.place_food();
    }

    /// Put food on a free cell, or report that none exists
    pub(crate) fn place_food(&mut self) {
        let occupancy = Occupancy {
            snake: &self.snake,
            hazards: &self.hazards,
            food: self.food,
        };
        let exclude = self.power_ups.cells();
        match self.finder.find(&mut self.rng, &occupancy, &exclude) {
            Ok(cell) => {
                log::debug!("food placed at {cell:?}");
                self.food = Some(cell);
                self.events.push(GameEvent::FoodPlaced(cell));
            }
            Err(err) => {
                log::warn!("could not place food: {err}");
                self.events.push(GameEvent::PlacementFailed {
                    target: PlacementTarget::Food,
                });
            }
        }
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn hazards(&self) -> &[Hazard] {
        self.hazards.hazards()
    }

    pub fn power_ups(&self) -> impl Iterator<Item = (PowerUpId, PowerUp)> + '_ {
        self.power_ups.power_ups().iter().map(|(&id, &p)| (id, p))
    }

    pub fn effects(&self) -> StatusEffects {
        *self.power_ups.effects()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            snake: self.snake.segments().collect(),
            direction: self.direction,
            food: self.food,
            hazards: self.hazards.hazards().to_vec(),
            power_ups: self.power_ups().collect(),
            effects: self.effects(),
            score: self.score,
            speed: self.speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_new_session_layout() {
        let engine = GameEngine::new(12345);
        assert_eq!(engine.phase(), GamePhase::Running);
        let snake: Vec<_> = engine.snake().segments().collect();
        assert_eq!(
            snake,
            vec![Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10), Cell::new(7, 10)]
        );
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.speed(), INITIAL_SPEED);
        assert_eq!(engine.hazards().len(), 4);
        assert_eq!(engine.power_ups().count(), 0);
        assert_eq!(engine.effects(), StatusEffects::default());

        let food = engine.food().unwrap();
        assert!(!engine.snake().occupies(food));
        assert!(!engine.hazards.contains(food));
    }

    #[test]
    fn test_reset_emits_initial_events() {
        let mut engine = GameEngine::new(1);
        let events = engine.drain_events();
        assert_eq!(events[0], GameEvent::ScoreChanged(0));
        assert_eq!(events[1], GameEvent::GameOverChanged(false));
        assert!(matches!(events[2], GameEvent::FoodPlaced(_)));
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_reset_discards_undrained_events() {
        let mut engine = GameEngine::new(3);
        engine.food = Some(Cell::new(0, 0));
        engine.tick(0);
        engine.speed = 60_000;
        engine.tick(10_000);
        assert_eq!(engine.power_ups().count(), 1);

        engine.reset();
        let events = engine.drain_events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], GameEvent::ScoreChanged(0));
        assert_eq!(events[1], GameEvent::GameOverChanged(false));
        assert!(matches!(events[2], GameEvent::FoodPlaced(_)));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut engine = GameEngine::new(777);
        engine.reset();
        let first = engine.snapshot();
        engine.reset();
        let second = engine.snapshot();
        assert_eq!(first, second);
        assert_eq!(first.snake.len(), INITIAL_SNAKE_LENGTH);
        assert!(first.food.is_some());
        assert!(first.power_ups.is_empty());
    }

    #[test]
    fn test_reset_with_seed_changes_seed() {
        let mut engine = GameEngine::new(1);
        engine.reset_with_seed(2);
        assert_eq!(engine.seed(), 2);
        assert_eq!(engine.snapshot(), GameEngine::new(2).snapshot());
    }

    #[test]
    fn test_snapshot_serializes() {
        let engine = GameEngine::new(5);
        let json = serde_json::to_string(&engine.snapshot()).unwrap();
        assert!(json.contains("\"score\":0"));
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, engine.snapshot());
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let tuning = Tuning {
            max_power_ups: 0,
            ..Tuning::default()
        };
        assert!(GameEngine::with_tuning(1, tuning).is_err());
    }
}

//! Neon Snake entry point
//!
//! Runs a headless session with a simple autopilot so the simulation can be
//! exercised without a renderer.
//!
//! Usage: `neon-snake [SEED] [TUNING.json]`

use anyhow::{Context, Result};

use neon_snake::sim::{Cell, Direction, GameEngine, GameEvent};
use neon_snake::Tuning;

/// Simulated frame time (ms), ~60 Hz
const FRAME_MS: u64 = 16;
/// Stop after this many frames even if the snake survives (5 minutes)
const MAX_FRAMES: u64 = 60 * 60 * 5;

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Neon Snake (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse::<u64>().with_context(|| format!("invalid seed '{s}'"))?,
        None => 12345,
    };
    let tuning = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading tuning file {path}"))?;
            Tuning::from_json(&json).with_context(|| format!("loading tuning from {path}"))?
        }
        None => Tuning::default(),
    };

    let mut engine = GameEngine::with_tuning(seed, tuning)?;
    log::info!("Game initialized with seed: {seed}");

    let mut now = 0;
    for _ in 0..MAX_FRAMES {
        if let Some(dir) = autopilot(&engine) {
            engine.set_intent(dir);
        }
        engine.tick(now);

        for event in engine.drain_events() {
            match event {
                GameEvent::FoodEaten(cell) => log::debug!("ate food at {cell:?}"),
                GameEvent::PowerUpCollected { kind, .. } => log::info!("picked up {kind:?}"),
                GameEvent::Died(reason) => log::info!("died: {reason:?}"),
                GameEvent::PlacementFailed { target } => {
                    log::warn!("no room for {target:?}")
                }
                _ => {}
            }
        }

        if engine.is_game_over() {
            break;
        }
        now += FRAME_MS;
    }

    println!(
        "seed {seed}: score {} length {} after {:.1}s{}",
        engine.score(),
        engine.snake().len(),
        now as f64 / 1000.0,
        if engine.is_game_over() { "" } else { " (time limit)" }
    );
    Ok(())
}

/// Greedy autopilot: head for a power-up if one is closer than the food,
/// otherwise the food, never stepping straight into something fatal
fn autopilot(engine: &GameEngine) -> Option<Direction> {
    let head = engine.snake().head();
    let target = nearest_target(engine, head)?;
    let invulnerable = engine.effects().invulnerable();

    Direction::ALL
        .into_iter()
        .filter(|&d| d != engine.direction().opposite())
        .filter(|&d| {
            let next = head.step(d);
            engine.grid().in_bounds(next)
                && !engine.snake().collides_with_body(next)
                && (invulnerable || !engine.hazards().iter().any(|h| h.contains(next)))
        })
        .min_by_key(|&d| manhattan(head.step(d), target))
}

fn nearest_target(engine: &GameEngine, head: Cell) -> Option<Cell> {
    engine
        .food()
        .into_iter()
        .chain(engine.power_ups().map(|(_, p)| p.position))
        .min_by_key(|&c| manhattan(head, c))
}

fn manhattan(a: Cell, b: Cell) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

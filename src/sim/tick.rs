//! Frame-driven simulation tick
//!
//! The host calls [`GameEngine::tick`] every frame with a wall-clock
//! timestamp. Due timers are fired first, then the movement gate decides
//! whether the snake takes a step.

use super::grid::Direction;
use super::placement::Occupancy;
use super::state::{DeathReason, GameEngine, GameEvent, GamePhase};

impl GameEngine {
    /// Queue a direction change. Reversing onto the committed direction is
    /// ignored, even if another intent was queued this tick.
    pub fn set_intent(&mut self, direction: Direction) {
        if direction == self.direction.opposite() {
            return;
        }
        self.pending_direction = direction;
    }

    /// Movement interval after the speed boost, never below the floor
    pub fn effective_interval(&self) -> u32 {
        if self.power_ups.effects().speed_boost() {
            (self.speed / 2).max(self.tuning.min_speed)
        } else {
            self.speed
        }
    }

    /// Advance the session to `now` (ms)
    pub fn tick(&mut self, now: u64) {
        if self.phase == GamePhase::GameOver {
            return;
        }

        // First tick after reset anchors the clocks
        let Some(last_move) = self.last_move_time else {
            self.last_move_time = Some(now);
            self.power_ups.start(now);
            return;
        };

        // Expire/spawn before moving so a pickup never sees a dead power-up
        let occupancy = Occupancy {
            snake: &self.snake,
            hazards: &self.hazards,
            food: self.food,
        };
        self.power_ups
            .update(now, &mut self.rng, &self.finder, &occupancy, &mut self.events);

        if now.saturating_sub(last_move) > u64::from(self.effective_interval()) {
            self.last_move_time = Some(now);
            self.direction = self.pending_direction;
            self.step(now);
        }
    }

    /// One discrete movement step. Checks run wall, body, laser, in that order.
    fn step(&mut self, now: u64) {
        if self.food.is_none() {
            self.place_food();
        }

        let candidate = self.snake.peek_next_head(self.direction);

        if !self.grid.in_bounds(candidate) {
            self.die(DeathReason::Wall);
            return;
        }
        if self.snake.collides_with_body(candidate) {
            self.die(DeathReason::SelfCollision);
            return;
        }
        if !self.power_ups.effects().invulnerable() && self.hazards.contains(candidate) {
            self.die(DeathReason::Hazard);
            return;
        }

        let grow = self.food == Some(candidate);
        let tail_removed = self.snake.advance(candidate, grow);

        if grow {
            self.score += self.tuning.food_score;
            self.speed = self
                .speed
                .saturating_sub(self.tuning.speed_decrement)
                .max(self.tuning.min_speed);
            self.food = None;
            self.events.push(GameEvent::ScoreChanged(self.score));
            self.events.push(GameEvent::FoodEaten(candidate));
            self.place_food();
        }

        if let Some(power_up) = self.power_ups.collect_at(candidate, now) {
            self.score += self.power_ups.config().pickup_score;
            self.events.push(GameEvent::ScoreChanged(self.score));
            self.events.push(GameEvent::PowerUpCollected {
                kind: power_up.kind,
                position: candidate,
            });
        }

        self.events.push(GameEvent::MovementCompleted {
            head_added: candidate,
            tail_removed,
        });

        debug_assert!(!self.snake.is_empty());
        debug_assert!(self.food.is_none_or(|f| !self.snake.occupies(f)));
    }

    fn die(&mut self, reason: DeathReason) {
        log::info!(
            "Game over ({reason:?}) with score {} and length {}",
            self.score,
            self.snake.len()
        );
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::Died(reason));
        self.events.push(GameEvent::GameOverChanged(true));
    }
}

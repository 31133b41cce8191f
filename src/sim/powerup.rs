//! Power-up lifecycle and timed status effects
//!
//! A power-up is `absent -> spawned -> (collected | expired)`. Both exits
//! remove it from the map; nothing is kept afterwards. Spawning runs on a
//! wall-clock cadence independent of snake speed, and every spawned power-up
//! carries its own expiry timer.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::Cell;
use super::placement::{Occupancy, PositionFinder};
use super::schedule::{Scheduler, TimerEvent};
use super::state::{GameEvent, PlacementTarget};
use crate::consts::*;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    /// Temporary immunity to lasers
    Shield,
    /// Temporarily halves the movement interval
    Speed,
}

/// Opaque power-up handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PowerUpId(pub u32);

/// A power-up waiting on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub position: Cell,
    pub kind: PowerUpKind,
    /// Spawn time (ms)
    pub spawned_at: u64,
}

/// Timed flags granted by pickups. `Some(t)` means active until `t` (ms).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub invulnerable_until: Option<u64>,
    pub speed_boost_until: Option<u64>,
}

impl StatusEffects {
    pub fn invulnerable(&self) -> bool {
        self.invulnerable_until.is_some()
    }

    pub fn speed_boost(&self) -> bool {
        self.speed_boost_until.is_some()
    }

    fn slot(&mut self, kind: PowerUpKind) -> &mut Option<u64> {
        match kind {
            PowerUpKind::Shield => &mut self.invulnerable_until,
            PowerUpKind::Speed => &mut self.speed_boost_until,
        }
    }

    /// (Re)arm an effect. Re-activation replaces the expiry, it does not stack.
    pub fn activate(&mut self, kind: PowerUpKind, until: u64) {
        *self.slot(kind) = Some(until);
    }

    /// Clear an effect if `due` is its current expiry. Stale timers from a
    /// re-armed effect return false.
    pub fn expire(&mut self, kind: PowerUpKind, due: u64) -> bool {
        let slot = self.slot(kind);
        if *slot == Some(due) {
            *slot = None;
            true
        } else {
            false
        }
    }
}

/// Timing and capacity knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerUpConfig {
    pub spawn_interval: u64,
    pub lifetime: u64,
    pub effect_duration: u64,
    pub max_active: usize,
    pub pickup_score: u32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            spawn_interval: POWER_UP_SPAWN_INTERVAL,
            lifetime: POWER_UP_LIFETIME,
            effect_duration: POWER_UP_DURATION,
            max_active: MAX_POWER_UPS,
            pickup_score: SHIELD_SCORE,
        }
    }
}

/// Owns live power-ups, status effects and every pending timer
#[derive(Debug, Clone)]
pub struct PowerUpManager {
    config: PowerUpConfig,
    power_ups: BTreeMap<PowerUpId, PowerUp>,
    effects: StatusEffects,
    timers: Scheduler,
    next_id: u32,
}

impl PowerUpManager {
    pub fn new(config: PowerUpConfig) -> Self {
        Self {
            config,
            power_ups: BTreeMap::new(),
            effects: StatusEffects::default(),
            timers: Scheduler::new(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &PowerUpConfig {
        &self.config
    }

    /// Drop all power-ups, effects and pending timers
    pub fn clear(&mut self) {
        self.power_ups.clear();
        self.effects = StatusEffects::default();
        self.timers.clear();
        self.next_id = 1;
    }

    /// Arm the spawn cadence with `now` as its origin
    pub fn start(&mut self, now: u64) {
        let due = now.saturating_add(self.config.spawn_interval);
        self.timers.schedule(due, TimerEvent::SpawnPowerUp);
    }

    pub fn effects(&self) -> &StatusEffects {
        &self.effects
    }

    pub fn power_ups(&self) -> &BTreeMap<PowerUpId, PowerUp> {
        &self.power_ups
    }

    pub fn len(&self) -> usize {
        self.power_ups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power_ups.is_empty()
    }

    pub fn cells(&self) -> Vec<Cell> {
        self.power_ups.values().map(|p| p.position).collect()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Fire every timer due at or before `now`, in due order
    pub fn update<R: Rng>(
        &mut self,
        now: u64,
        rng: &mut R,
        finder: &PositionFinder,
        occupancy: &Occupancy<'_>,
        events: &mut Vec<GameEvent>,
    ) {
        while let Some((due, event)) = self.timers.pop_due(now) {
            match event {
                TimerEvent::SpawnPowerUp => {
                    let next = due.saturating_add(self.config.spawn_interval);
                    // A saturated clock has no later firing
                    if next > due {
                        self.timers.schedule(next, TimerEvent::SpawnPowerUp);
                    }
                    self.try_spawn(due, rng, finder, occupancy, events);
                }
                TimerEvent::ExpirePowerUp(id) => {
                    if let Some(p) = self.power_ups.remove(&id) {
                        log::debug!("power-up {:?} expired at {:?}", p.kind, p.position);
                        events.push(GameEvent::PowerUpExpired {
                            id,
                            position: p.position,
                        });
                    }
                }
                TimerEvent::ExpireEffect(kind) => {
                    if self.effects.expire(kind, due) {
                        log::debug!("{kind:?} effect ended");
                        events.push(GameEvent::EffectExpired(kind));
                    }
                }
            }
        }
    }

    /// One spawn attempt at logical time `at`. No-op at capacity.
    pub fn try_spawn<R: Rng>(
        &mut self,
        at: u64,
        rng: &mut R,
        finder: &PositionFinder,
        occupancy: &Occupancy<'_>,
        events: &mut Vec<GameEvent>,
    ) -> Option<PowerUpId> {
        if self.power_ups.len() >= self.config.max_active {
            return None;
        }

        let exclude = self.cells();
        let position = match finder.find(rng, occupancy, &exclude) {
            Ok(cell) => cell,
            Err(err) => {
                log::warn!("could not place power-up: {err}");
                events.push(GameEvent::PlacementFailed {
                    target: PlacementTarget::PowerUp,
                });
                return None;
            }
        };

        let kind = if rng.random_bool(0.5) {
            PowerUpKind::Shield
        } else {
            PowerUpKind::Speed
        };
        let id = PowerUpId(self.next_id);
        self.next_id += 1;

        self.power_ups.insert(
            id,
            PowerUp {
                position,
                kind,
                spawned_at: at,
            },
        );
        let expires = at.saturating_add(self.config.lifetime);
        self.timers.schedule(expires, TimerEvent::ExpirePowerUp(id));
        debug_assert!(self.power_ups.len() <= self.config.max_active);

        log::debug!("spawned {kind:?} power-up at {position:?}");
        events.push(GameEvent::PowerUpSpawned { id, kind, position });
        Some(id)
    }

    /// Pick up whatever sits on `cell`, arming its effect from `now`
    pub fn collect_at(&mut self, cell: Cell, now: u64) -> Option<PowerUp> {
        let id = self
            .power_ups
            .iter()
            .find(|(_, p)| p.position == cell)
            .map(|(&id, _)| id)?;
        let power_up = self.power_ups.remove(&id)?;

        let until = now.saturating_add(self.config.effect_duration);
        self.effects.activate(power_up.kind, until);
        self.timers
            .schedule(until, TimerEvent::ExpireEffect(power_up.kind));

        log::info!("collected {:?} power-up", power_up.kind);
        Some(power_up)
    }

    #[cfg(test)]
    pub(crate) fn effects_mut_for_test(&mut self) -> &mut StatusEffects {
        &mut self.effects
    }

    #[cfg(test)]
    pub(crate) fn schedule_for_test(&mut self, due: u64, event: TimerEvent) {
        self.timers.schedule(due, event);
    }

    /// Place a power-up by hand, with its expiry timer armed
    #[cfg(test)]
    pub(crate) fn insert_for_test(
        &mut self,
        position: Cell,
        kind: PowerUpKind,
        at: u64,
    ) -> PowerUpId {
        let id = PowerUpId(self.next_id);
        self.next_id += 1;
        self.power_ups.insert(
            id,
            PowerUp {
                position,
                kind,
                spawned_at: at,
            },
        );
        let expires = at.saturating_add(self.config.lifetime);
        self.timers.schedule(expires, TimerEvent::ExpirePowerUp(id));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Direction;
    use crate::sim::hazard::{HazardField, default_layout};
    use crate::sim::snake::Snake;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Fixture {
        snake: Snake,
        hazards: HazardField,
        finder: PositionFinder,
        rng: Pcg32,
        events: Vec<GameEvent>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                snake: Snake::spawn(Cell::new(10, 10), Direction::Right, 4),
                hazards: HazardField::new(default_layout()),
                finder: PositionFinder::default(),
                rng: Pcg32::seed_from_u64(42),
                events: Vec::new(),
            }
        }

        fn update(&mut self, mgr: &mut PowerUpManager, now: u64) {
            let occupancy = Occupancy {
                snake: &self.snake,
                hazards: &self.hazards,
                food: None,
            };
            mgr.update(now, &mut self.rng, &self.finder, &occupancy, &mut self.events);
        }

        fn spawn(&mut self, mgr: &mut PowerUpManager, at: u64) -> Option<PowerUpId> {
            let occupancy = Occupancy {
                snake: &self.snake,
                hazards: &self.hazards,
                food: None,
            };
            mgr.try_spawn(at, &mut self.rng, &self.finder, &occupancy, &mut self.events)
        }
    }

    #[test]
    fn test_spawn_cadence_is_wall_clock() {
        let mut fx = Fixture::new();
        let mut mgr = PowerUpManager::new(PowerUpConfig::default());
        mgr.start(0);

        fx.update(&mut mgr, 9_999);
        assert!(mgr.is_empty());

        fx.update(&mut mgr, 10_000);
        assert_eq!(mgr.len(), 1);
        let p = *mgr.power_ups().values().next().unwrap();
        assert_eq!(p.spawned_at, 10_000);
        assert!(!fx.snake.occupies(p.position));
        assert!(!fx.hazards.contains(p.position));
    }

    #[test]
    fn test_power_up_expires_after_lifetime() {
        let mut fx = Fixture::new();
        let mut mgr = PowerUpManager::new(PowerUpConfig::default());
        mgr.start(0);

        fx.update(&mut mgr, 10_000);
        assert_eq!(mgr.len(), 1);
        fx.update(&mut mgr, 17_999);
        assert_eq!(mgr.len(), 1);
        fx.update(&mut mgr, 18_000);
        assert!(mgr.is_empty());
        assert!(
            fx.events
                .iter()
                .any(|e| matches!(e, GameEvent::PowerUpExpired { .. }))
        );
    }

    #[test]
    fn test_cap_blocks_third_spawn() {
        let mut fx = Fixture::new();
        let mut mgr = PowerUpManager::new(PowerUpConfig::default());
        assert!(fx.spawn(&mut mgr, 0).is_some());
        assert!(fx.spawn(&mut mgr, 0).is_some());
        assert_eq!(mgr.len(), 2);
        assert!(fx.spawn(&mut mgr, 0).is_none());
        assert_eq!(mgr.len(), 2);

        let cells = mgr.cells();
        assert_ne!(cells[0], cells[1]);
    }

    #[test]
    fn test_collect_arms_effect_and_removes() {
        let mut fx = Fixture::new();
        let mut mgr = PowerUpManager::new(PowerUpConfig::default());
        let id = fx.spawn(&mut mgr, 0).unwrap();
        let p = mgr.power_ups()[&id];

        assert!(mgr.collect_at(Cell::new(-5, -5), 100).is_none());
        let got = mgr.collect_at(p.position, 100).unwrap();
        assert_eq!(got.kind, p.kind);
        assert!(mgr.is_empty());

        let active = match p.kind {
            PowerUpKind::Shield => mgr.effects().invulnerable(),
            PowerUpKind::Speed => mgr.effects().speed_boost(),
        };
        assert!(active);

        // The collected power-up's own expiry timer must not fire anything
        fx.update(&mut mgr, 8_000);
        assert!(
            !fx.events
                .iter()
                .any(|e| matches!(e, GameEvent::PowerUpExpired { .. }))
        );
    }

    #[test]
    fn test_recollect_resets_duration() {
        let mut fx = Fixture::new();
        let mut mgr = PowerUpManager::new(PowerUpConfig::default());

        mgr.effects.activate(PowerUpKind::Shield, 5_000);
        mgr.timers.schedule(5_000, TimerEvent::ExpireEffect(PowerUpKind::Shield));
        // Second pickup at t=3000 re-arms to t=8000
        mgr.effects.activate(PowerUpKind::Shield, 8_000);
        mgr.timers.schedule(8_000, TimerEvent::ExpireEffect(PowerUpKind::Shield));

        fx.update(&mut mgr, 5_000);
        assert!(mgr.effects().invulnerable(), "stale timer must not end shield");
        fx.update(&mut mgr, 8_000);
        assert!(!mgr.effects().invulnerable());
    }

    #[test]
    fn test_clear_cancels_timers() {
        let mut fx = Fixture::new();
        let mut mgr = PowerUpManager::new(PowerUpConfig::default());
        mgr.start(0);
        fx.spawn(&mut mgr, 0);
        assert!(mgr.pending_timers() > 0);

        mgr.clear();
        assert_eq!(mgr.pending_timers(), 0);
        fx.update(&mut mgr, 100_000);
        assert!(mgr.is_empty());
    }

    #[test]
    fn test_timers_saturate_at_end_of_clock() {
        let mut fx = Fixture::new();
        let mut mgr = PowerUpManager::new(PowerUpConfig::default());
        mgr.start(u64::MAX - 10);

        fx.update(&mut mgr, u64::MAX);
        assert!(fx
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::PowerUpSpawned { .. })));
        assert_eq!(mgr.pending_timers(), 0);

        let cell = Cell::new(0, 0);
        mgr.insert_for_test(cell, PowerUpKind::Speed, u64::MAX - 1);
        mgr.collect_at(cell, u64::MAX - 1);
        assert_eq!(mgr.effects().speed_boost_until, Some(u64::MAX));
    }
}

//! Game state tracker: Earth's health, the aliens' mined resources, the
//! player's kill count, and the win/lose conditions over them.
//!
//! Owned by `SimulationEngine`, NOT stored in the ECS world.

use invaders_core::config::GameConfig;
use invaders_core::constants::TOTALS_WINDOW_SECS;
use invaders_core::enums::GameOutcome;
use invaders_core::types::secs_to_ticks;

/// Session counters. Every mutator returns `Some(outcome)` only on the call
/// that ends the session; once ended, further updates are ignored.
#[derive(Debug, Clone)]
pub struct GameTracker {
    health: f64,
    max_health: f64,
    resources: f64,
    target_resources: f64,
    destroyed: u32,
    ships_to_destroy: u32,
    shots_fired: u32,
    outcome: Option<GameOutcome>,

    // --- Per-second totals ---
    damage_accum: f64,
    mining_accum: f64,
    damage_per_sec: f64,
    mining_per_sec: f64,
    window_ticks: u64,
    window_elapsed: u64,
}

impl GameTracker {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            health: config.max_health,
            max_health: config.max_health,
            resources: 0.0,
            target_resources: config.target_resources,
            destroyed: 0,
            ships_to_destroy: config.ships_to_destroy,
            shots_fired: 0,
            outcome: None,
            damage_accum: 0.0,
            mining_accum: 0.0,
            damage_per_sec: 0.0,
            mining_per_sec: 0.0,
            window_ticks: secs_to_ticks(TOTALS_WINDOW_SECS),
            window_elapsed: 0,
        }
    }

    /// Remove health from Earth. Loses the session at zero health.
    pub fn apply_damage(&mut self, amount: f64) -> Option<GameOutcome> {
        if self.is_over() {
            return None;
        }
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        if amount > 0.0 {
            self.damage_accum += amount;
        }
        if self.health <= 0.0 {
            return self.finish(GameOutcome::LostHealth);
        }
        None
    }

    /// Restore health, capped at the maximum.
    pub fn heal(&mut self, amount: f64) {
        if self.is_over() {
            return;
        }
        self.health = (self.health + amount).clamp(0.0, self.max_health);
    }

    /// Add mined resources. Loses the session once the target is reached.
    pub fn add_resources(&mut self, amount: f64) -> Option<GameOutcome> {
        if self.is_over() {
            return None;
        }
        self.resources += amount;
        self.mining_accum += amount;
        if self.resources >= self.target_resources {
            return self.finish(GameOutcome::LostResources);
        }
        None
    }

    /// Count a destroyed ship. Wins the session once the target is reached.
    pub fn add_destroyed(&mut self) -> Option<GameOutcome> {
        if self.is_over() {
            return None;
        }
        self.destroyed += 1;
        if self.destroyed >= self.ships_to_destroy {
            return self.finish(GameOutcome::Won);
        }
        None
    }

    pub fn record_shot(&mut self) {
        self.shots_fired += 1;
    }

    /// Advance the totals window by one tick, publishing and resetting the
    /// accumulated damage and mining when it elapses.
    pub fn advance_totals(&mut self) {
        self.window_elapsed += 1;
        if self.window_elapsed < self.window_ticks {
            return;
        }
        self.window_elapsed = 0;
        self.damage_per_sec = std::mem::take(&mut self.damage_accum);
        self.mining_per_sec = std::mem::take(&mut self.mining_accum);
    }

    fn finish(&mut self, outcome: GameOutcome) -> Option<GameOutcome> {
        self.outcome = Some(outcome);
        Some(outcome)
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn max_health(&self) -> f64 {
        self.max_health
    }

    pub fn resources(&self) -> f64 {
        self.resources
    }

    pub fn target_resources(&self) -> f64 {
        self.target_resources
    }

    pub fn destroyed(&self) -> u32 {
        self.destroyed
    }

    pub fn ships_to_destroy(&self) -> u32 {
        self.ships_to_destroy
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    pub fn damage_per_sec(&self) -> f64 {
        self.damage_per_sec
    }

    pub fn mining_per_sec(&self) -> f64 {
        self.mining_per_sec
    }

    pub fn health_fraction(&self) -> f64 {
        self.health / self.max_health
    }

    pub fn resource_fraction(&self) -> f64 {
        self.resources / self.target_resources
    }
}

//! Session tuning loaded from TOML, with defaults for every field.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::CandidateScan;
use crate::error::ConfigError;

/// Gameplay tuning for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Delay between follow-up spawn attempts (seconds).
    pub spawn_interval_secs: f64,
    /// Maximum ships per stack, root included.
    pub max_stack_size: u32,
    pub initial_roots_min: u32,
    pub initial_roots_max: u32,
    /// Time between task executions (seconds).
    pub task_cooldown_secs: f64,
    /// Multiplier added to a root per joined ship.
    pub multiplier_step: f64,
    pub destroyer_base_damage: f64,
    pub miner_base_output: f64,
    pub max_health: f64,
    pub target_resources: f64,
    pub ships_to_destroy: u32,
    pub cannonball_damage: f64,
    pub health_pack_amount: f64,
    /// Distance a joining ship is nudged away from its root.
    pub stack_offset: f64,
    pub candidate_scan: CandidateScan,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            max_stack_size: MAX_STACK_SIZE,
            initial_roots_min: INITIAL_ROOTS_MIN,
            initial_roots_max: INITIAL_ROOTS_MAX,
            task_cooldown_secs: TASK_COOLDOWN_SECS,
            multiplier_step: MULTIPLIER_STEP,
            destroyer_base_damage: DESTROYER_BASE_DAMAGE,
            miner_base_output: MINER_BASE_OUTPUT,
            max_health: MAX_HEALTH,
            target_resources: TARGET_RESOURCES,
            ships_to_destroy: SHIPS_TO_DESTROY,
            cannonball_damage: CANNONBALL_DAMAGE,
            health_pack_amount: HEALTH_PACK_AMOUNT,
            stack_offset: STACK_OFFSET,
            candidate_scan: CandidateScan::default(),
        }
    }
}

impl GameConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("spawn_interval_secs", self.spawn_interval_secs)?;
        positive("task_cooldown_secs", self.task_cooldown_secs)?;
        positive("max_health", self.max_health)?;
        positive("target_resources", self.target_resources)?;
        non_negative("multiplier_step", self.multiplier_step)?;
        non_negative("destroyer_base_damage", self.destroyer_base_damage)?;
        non_negative("miner_base_output", self.miner_base_output)?;
        non_negative("cannonball_damage", self.cannonball_damage)?;
        non_negative("health_pack_amount", self.health_pack_amount)?;
        non_negative("stack_offset", self.stack_offset)?;

        if self.max_stack_size < 1 {
            return Err(invalid("max_stack_size", "must be at least 1"));
        }
        if self.ships_to_destroy < 1 {
            return Err(invalid("ships_to_destroy", "must be at least 1"));
        }
        if self.initial_roots_min > self.initial_roots_max {
            return Err(invalid(
                "initial_roots_min",
                format!(
                    "{} exceeds initial_roots_max {}",
                    self.initial_roots_min, self.initial_roots_max
                ),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be non-negative, got {value}")))
    }
}

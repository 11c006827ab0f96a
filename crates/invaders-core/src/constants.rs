//! Simulation constants and default tuning parameters.
//!
//! The tuning values here are the defaults behind `GameConfig`; anything a
//! session may want to change is read from the config, not from these.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Spawning ---

/// Delay between follow-up spawn attempts (seconds).
pub const SPAWN_INTERVAL_SECS: f64 = 3.0;

/// Maximum ships per stack, root included.
pub const MAX_STACK_SIZE: u32 = 5;

/// Fewest roots created when a session starts.
pub const INITIAL_ROOTS_MIN: u32 = 6;

/// Most roots created when a session starts.
pub const INITIAL_ROOTS_MAX: u32 = 10;

/// Distance a joining ship is nudged away from its root (unit-sphere units).
pub const STACK_OFFSET: f64 = 0.05;

// --- Ship tasks ---

/// Time between task executions for every ship (seconds).
pub const TASK_COOLDOWN_SECS: f64 = 1.0;

/// Multiplier added to a root for every ship that joins its stack.
pub const MULTIPLIER_STEP: f64 = 0.5;

/// Multiplier of a fresh root with no children.
pub const BASE_MULTIPLIER: f64 = 1.0;

/// Health removed from Earth per destroyer task at multiplier 1.
pub const DESTROYER_BASE_DAMAGE: f64 = 1.0;

/// Resources mined per miner task at multiplier 1.
pub const MINER_BASE_OUTPUT: f64 = 1.0;

// --- Session ---

/// Earth's health at the start of a session.
pub const MAX_HEALTH: f64 = 100.0;

/// Resources the aliens must mine to win.
pub const TARGET_RESOURCES: f64 = 100.0;

/// Ships the player must destroy to win.
pub const SHIPS_TO_DESTROY: u32 = 30;

/// Damage dealt to Earth when the player's own shot hits it.
pub const CANNONBALL_DAMAGE: f64 = 5.0;

/// Health restored by shooting a health pack.
pub const HEALTH_PACK_AMOUNT: f64 = 10.0;

/// Period over which damage and mining totals are reported (seconds).
pub const TOTALS_WINDOW_SECS: f64 = 1.0;

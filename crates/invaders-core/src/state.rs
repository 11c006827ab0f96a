//! Game state snapshot: the complete visible state produced each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Position, SimTime};

/// Complete game state handed to the presenter after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    /// Set once the session has ended.
    pub outcome: Option<GameOutcome>,
    pub earth: EarthView,
    pub score: ScoreView,
    /// One entry per roster slot, in roster order.
    pub stacks: Vec<StackView>,
    pub health_packs: Vec<HealthPackView>,
    pub events: Vec<GameEvent>,
}

/// Earth's health and resources, with fractions for bar rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EarthView {
    pub health: f64,
    pub max_health: f64,
    /// `health / max_health`, 0.0 to 1.0.
    pub health_fraction: f64,
    pub resources_mined: f64,
    pub target_resources: f64,
    /// `resources_mined / target_resources`; may exceed 1.0 on the final tick.
    pub resource_fraction: f64,
    /// Damage dealt during the last full second.
    pub damage_per_sec: f64,
    /// Resources mined during the last full second.
    pub mining_per_sec: f64,
}

/// Player progress toward the win condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub ships_destroyed: u32,
    pub ships_to_destroy: u32,
    pub shots_fired: u32,
    pub ships_alive: u32,
}

/// A stack as seen from its root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackView {
    pub root_number: u32,
    pub kind: ShipKind,
    pub multiplier: f64,
    pub position: Position,
    /// Ship numbers of the children, in promotion order.
    pub children: Vec<u32>,
}

/// A health pack waiting to be shot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthPackView {
    pub pack_number: u32,
    pub position: Position,
    pub heal_amount: f64,
}

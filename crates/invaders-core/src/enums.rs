//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Alien ship variant. Determines the task a stack root performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipKind {
    /// Damages Earth's health every task cycle.
    Destroyer,
    /// Mines Earth's resources every task cycle.
    Miner,
}

/// Effect of a stack root's task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    Damage,
    Mine,
}

impl ShipKind {
    pub fn task(self) -> TaskKind {
        match self {
            ShipKind::Destroyer => TaskKind::Damage,
            ShipKind::Miner => TaskKind::Mine,
        }
    }
}

/// How the spawner walks the roster when looking for a stack with room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateScan {
    /// Visit every roster index exactly once, in random order.
    #[default]
    WithoutReplacement,
    /// Draw from a shrinking range but index the full roster; candidates are
    /// removed by value. Can overlook a stack that still has room.
    Legacy,
}

/// What a cannon shot hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ShotTarget {
    Ship { ship_number: u32 },
    HealthPack { pack_number: u32 },
    Earth,
    Miss,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Enough ships destroyed.
    Won,
    /// Earth's health reached zero.
    LostHealth,
    /// The aliens mined their resource target.
    LostResources,
}

impl GameOutcome {
    pub fn is_win(self) -> bool {
        matches!(self, GameOutcome::Won)
    }
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Active,
    Paused,
    GameOver,
}

//! Events emitted by the simulation for UI and audio feedback.

use serde::{Deserialize, Serialize};

use crate::enums::{GameOutcome, ShipKind, ShotTarget};

/// Everything noteworthy that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A new stack root appeared.
    StackSpawned { ship_number: u32, kind: ShipKind },
    /// A ship joined an existing stack.
    ShipJoined {
        ship_number: u32,
        root_number: u32,
        multiplier: f64,
    },
    /// The cannon fired.
    ShotFired { target: ShotTarget },
    /// A ship was destroyed.
    ShipDestroyed { ship_number: u32, was_root: bool },
    /// A child took over a stack whose root was destroyed.
    RootPromoted {
        old_root: u32,
        new_root: u32,
        multiplier: f64,
    },
    /// The last ship of a stack was destroyed.
    StackCleared { ship_number: u32 },
    /// A health pack appeared.
    HealthPackSpawned { pack_number: u32 },
    /// A health pack was shot and restored health.
    HealthRestored { pack_number: u32, amount: f64 },
    /// The session ended.
    GameOver { outcome: GameOutcome },
}

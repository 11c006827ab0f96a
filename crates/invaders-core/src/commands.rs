//! Player commands sent from a driver to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::ShotTarget;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Combat ---
    /// Fire the cannon; the shot resolves against `target`.
    Fire { target: ShotTarget },

    // --- Session control ---
    /// Start a session from the main menu or the game-over screen.
    StartGame,
    /// Tear down the current session (if any) and start a fresh one.
    Restart,
    /// Leave the game-over screen (or an active session) for the main menu.
    ReturnToMenu,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
    /// Set time scale (1.0 = normal, 2.0 = double).
    SetTimeScale { scale: f64 },
}

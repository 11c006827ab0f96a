//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components. Stack links reference
//! other entities and therefore live in the sim crate.

use serde::{Deserialize, Serialize};

use crate::enums::ShipKind;

/// An alien ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ship {
    pub kind: ShipKind,
    /// Stable number assigned at spawn; how commands and snapshots refer to
    /// the ship.
    pub ship_number: u32,
}

/// Repeating per-ship task timer, counted in ticks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TaskTimer {
    /// Ticks between firings.
    pub period_ticks: u64,
    /// Ticks left until the next firing.
    pub remaining_ticks: u64,
}

/// A health pack floating around Earth, dropped when a stack is wiped out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HealthPack {
    pub pack_number: u32,
    /// Health restored when shot.
    pub heal_amount: f64,
}

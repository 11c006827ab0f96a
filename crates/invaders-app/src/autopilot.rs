//! Scripted player. Reads snapshots and fires on a fixed cadence: at a
//! health pack when Earth is hurt, otherwise at the root of the strongest
//! stack.

use invaders_core::commands::PlayerCommand;
use invaders_core::enums::{GamePhase, ShotTarget};
use invaders_core::state::GameStateSnapshot;

/// Below this health fraction the autopilot goes for health packs first.
pub const HEAL_THRESHOLD: f64 = 0.5;

/// Default ticks between shots (three shots per second at 30 Hz).
pub const DEFAULT_CADENCE_TICKS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Autopilot {
    cadence_ticks: u64,
    next_fire_tick: u64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(DEFAULT_CADENCE_TICKS)
    }
}

impl Autopilot {
    pub fn new(cadence_ticks: u64) -> Self {
        Self {
            cadence_ticks: cadence_ticks.max(1),
            next_fire_tick: 0,
        }
    }

    /// Decide on a shot for this snapshot. Polling the same tick twice
    /// never fires twice.
    pub fn choose(&mut self, snapshot: &GameStateSnapshot) -> Option<PlayerCommand> {
        if snapshot.phase != GamePhase::Active {
            // A new session restarts the tick counter.
            self.next_fire_tick = 0;
            return None;
        }
        let tick = snapshot.time.tick;
        if tick < self.next_fire_tick {
            return None;
        }
        let target = pick_target(snapshot)?;
        self.next_fire_tick = tick + self.cadence_ticks;
        Some(PlayerCommand::Fire { target })
    }
}

/// Best target on the field, or `None` when there is nothing to shoot.
pub fn pick_target(snapshot: &GameStateSnapshot) -> Option<ShotTarget> {
    if snapshot.earth.health_fraction < HEAL_THRESHOLD {
        if let Some(pack) = snapshot.health_packs.first() {
            return Some(ShotTarget::HealthPack {
                pack_number: pack.pack_number,
            });
        }
    }
    snapshot
        .stacks
        .iter()
        .max_by(|a, b| a.multiplier.total_cmp(&b.multiplier))
        .map(|stack| ShotTarget::Ship {
            ship_number: stack.root_number,
        })
}

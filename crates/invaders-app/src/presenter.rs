//! Presentation sinks. The game loop hands every snapshot to a `Presenter`;
//! a UI, a logger, or a test recorder can sit behind it.

use invaders_core::constants::TICK_RATE;
use invaders_core::events::GameEvent;
use invaders_core::state::GameStateSnapshot;

/// Receives every snapshot the engine produces, in tick order.
pub trait Presenter: Send {
    fn present(&mut self, snapshot: &GameStateSnapshot);
}

/// Discards snapshots.
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _snapshot: &GameStateSnapshot) {}
}

/// Writes game events and a once-per-second status line to the log.
#[derive(Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn present(&mut self, snapshot: &GameStateSnapshot) {
        for event in &snapshot.events {
            match event {
                GameEvent::StackSpawned { ship_number, kind } => {
                    log::debug!("stack {ship_number} spawned ({kind:?})");
                }
                GameEvent::ShipJoined {
                    ship_number,
                    root_number,
                    multiplier,
                } => {
                    log::debug!("ship {ship_number} joined stack {root_number} (x{multiplier})");
                }
                GameEvent::ShotFired { .. } => {}
                GameEvent::ShipDestroyed {
                    ship_number,
                    was_root,
                } => {
                    let role = if *was_root { "root" } else { "child" };
                    log::info!("{role} ship {ship_number} destroyed");
                }
                GameEvent::RootPromoted {
                    old_root,
                    new_root,
                    multiplier,
                } => {
                    log::info!("ship {new_root} took over stack {old_root} (x{multiplier})");
                }
                GameEvent::StackCleared { ship_number } => {
                    log::info!("stack {ship_number} wiped out");
                }
                GameEvent::HealthPackSpawned { pack_number } => {
                    log::debug!("health pack {pack_number} dropped");
                }
                GameEvent::HealthRestored {
                    pack_number,
                    amount,
                } => {
                    log::info!("health pack {pack_number} restored {amount}");
                }
                GameEvent::GameOver { outcome } => {
                    log::info!("game over: {outcome:?}");
                }
            }
        }

        let tick = snapshot.time.tick;
        if tick > 0 && tick % TICK_RATE as u64 == 0 {
            let earth = &snapshot.earth;
            log::info!(
                "t={:.0}s health {:.0}/{:.0} resources {:.0}/{:.0} stacks {} kills {}/{} ({:.1} dmg/s, {:.1} mined/s)",
                snapshot.time.elapsed_secs,
                earth.health,
                earth.max_health,
                earth.resources_mined,
                earth.target_resources,
                snapshot.stacks.len(),
                snapshot.score.ships_destroyed,
                snapshot.score.ships_to_destroy,
                earth.damage_per_sec,
                earth.mining_per_sec,
            );
        }
    }
}

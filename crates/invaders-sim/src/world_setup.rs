//! Entity spawn factories for setting up the simulation world.
//!
//! Creates ship and health pack entities with appropriate component bundles.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use invaders_core::components::{HealthPack, Ship, TaskTimer};
use invaders_core::enums::ShipKind;
use invaders_core::types::Position;

use crate::stack::StackLink;

/// Uniformly random point on the unit sphere around Earth.
pub fn random_unit_sphere(rng: &mut ChaCha8Rng) -> Position {
    let z: f64 = rng.gen_range(-1.0..=1.0);
    let theta: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Position::new(r * theta.cos(), r * theta.sin(), z)
}

/// Destroyer or Miner with equal probability.
pub fn random_kind(rng: &mut ChaCha8Rng) -> ShipKind {
    if rng.gen_bool(0.5) {
        ShipKind::Destroyer
    } else {
        ShipKind::Miner
    }
}

/// Spawn a ship as the root of its own one-ship stack.
/// Its task timer first fires `task_period_ticks` after spawn.
pub fn spawn_ship(
    world: &mut World,
    kind: ShipKind,
    ship_number: u32,
    position: Position,
    task_period_ticks: u64,
) -> hecs::Entity {
    world.spawn((
        Ship { kind, ship_number },
        position,
        StackLink::default(),
        TaskTimer {
            period_ticks: task_period_ticks,
            remaining_ticks: task_period_ticks,
        },
    ))
}

/// Spawn a health pack at `position`.
pub fn spawn_health_pack(
    world: &mut World,
    pack_number: u32,
    position: Position,
    heal_amount: f64,
) -> hecs::Entity {
    world.spawn((
        HealthPack {
            pack_number,
            heal_amount,
        },
        position,
    ))
}

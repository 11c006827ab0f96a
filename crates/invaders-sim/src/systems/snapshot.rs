//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use invaders_core::components::{HealthPack, Ship};
use invaders_core::enums::GamePhase;
use invaders_core::events::GameEvent;
use invaders_core::state::*;
use invaders_core::types::{Position, SimTime};

use crate::stack::StackLink;
use crate::systems::spawner::Spawner;
use crate::tracker::GameTracker;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    spawner: &Spawner,
    tracker: &GameTracker,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        outcome: tracker.outcome(),
        earth: build_earth(tracker),
        score: ScoreView {
            ships_destroyed: tracker.destroyed(),
            ships_to_destroy: tracker.ships_to_destroy(),
            shots_fired: tracker.shots_fired(),
            ships_alive: world.query::<&Ship>().iter().count() as u32,
        },
        stacks: build_stacks(world, spawner),
        health_packs: build_health_packs(world),
        events,
    }
}

fn build_earth(tracker: &GameTracker) -> EarthView {
    EarthView {
        health: tracker.health(),
        max_health: tracker.max_health(),
        health_fraction: tracker.health_fraction(),
        resources_mined: tracker.resources(),
        target_resources: tracker.target_resources(),
        resource_fraction: tracker.resource_fraction(),
        damage_per_sec: tracker.damage_per_sec(),
        mining_per_sec: tracker.mining_per_sec(),
    }
}

/// One StackView per roster entry, in roster order.
fn build_stacks(world: &World, spawner: &Spawner) -> Vec<StackView> {
    spawner
        .roster()
        .iter()
        .filter_map(|&root| {
            let ship = *world.get::<&Ship>(root).ok()?;
            let position = *world.get::<&Position>(root).ok()?;
            let link = world.get::<&StackLink>(root).ok()?;
            let children = link
                .children
                .iter()
                .filter_map(|&child| world.get::<&Ship>(child).ok().map(|s| s.ship_number))
                .collect();
            Some(StackView {
                root_number: ship.ship_number,
                kind: ship.kind,
                multiplier: link.multiplier,
                position,
                children,
            })
        })
        .collect()
}

fn build_health_packs(world: &World) -> Vec<HealthPackView> {
    let mut packs: Vec<HealthPackView> = world
        .query::<(&HealthPack, &Position)>()
        .iter()
        .map(|(_, (pack, pos))| HealthPackView {
            pack_number: pack.pack_number,
            position: *pos,
            heal_amount: pack.heal_amount,
        })
        .collect();
    packs.sort_by_key(|p| p.pack_number);
    packs
}

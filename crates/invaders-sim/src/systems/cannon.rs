//! Cannon system: resolves player shots against ships, health packs and
//! Earth, and routes ship destruction to the spawner and tracker.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use invaders_core::components::{HealthPack, Ship};
use invaders_core::config::GameConfig;
use invaders_core::enums::{GameOutcome, ShotTarget};
use invaders_core::error::SimError;
use invaders_core::events::GameEvent;

use crate::stack::{self, DestroyOutcome, StackLink};
use crate::systems::spawner::Spawner;
use crate::tracker::GameTracker;

/// Find the live ship carrying `ship_number`.
pub fn find_ship(world: &World, ship_number: u32) -> Option<Entity> {
    world
        .query::<&Ship>()
        .iter()
        .find(|(_, ship)| ship.ship_number == ship_number)
        .map(|(entity, _)| entity)
}

/// Find the live health pack carrying `pack_number`.
pub fn find_health_pack(world: &World, pack_number: u32) -> Option<Entity> {
    world
        .query::<&HealthPack>()
        .iter()
        .find(|(_, pack)| pack.pack_number == pack_number)
        .map(|(entity, _)| entity)
}

/// Resolve one shot. Returns the outcome if the shot ended the session.
/// Shots at ships or packs that no longer exist hit nothing.
#[allow(clippy::too_many_arguments)]
pub fn fire(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    spawner: &mut Spawner,
    tracker: &mut GameTracker,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
    target: ShotTarget,
) -> Result<Option<GameOutcome>, SimError> {
    tracker.record_shot();
    events.push(GameEvent::ShotFired { target });

    match target {
        ShotTarget::Ship { ship_number } => match find_ship(world, ship_number) {
            Some(entity) => destroy_ship(world, rng, spawner, tracker, config, events, entity),
            None => {
                log::warn!("cannon: no ship {ship_number} to hit");
                Ok(None)
            }
        },
        ShotTarget::HealthPack { pack_number } => {
            let Some(entity) = find_health_pack(world, pack_number) else {
                log::warn!("cannon: no health pack {pack_number} to hit");
                return Ok(None);
            };
            let amount = world
                .get::<&HealthPack>(entity)
                .map(|pack| pack.heal_amount)
                .unwrap_or_default();
            tracker.heal(amount);
            let _ = world.despawn(entity);
            events.push(GameEvent::HealthRestored {
                pack_number,
                amount,
            });
            Ok(None)
        }
        ShotTarget::Earth => Ok(tracker.apply_damage(config.cannonball_damage)),
        ShotTarget::Miss => Ok(None),
    }
}

/// Destroy a ship and apply every consequence: stack resolution, roster
/// update, health pack drop for a wiped-out stack, and the kill count.
#[allow(clippy::too_many_arguments)]
pub fn destroy_ship(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    spawner: &mut Spawner,
    tracker: &mut GameTracker,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
    entity: Entity,
) -> Result<Option<GameOutcome>, SimError> {
    let destruction = stack::destroy(world, entity, config.multiplier_step)?;
    let ship_number = destruction.ship.ship_number;

    let was_root = match destruction.outcome {
        DestroyOutcome::ChildRemoved { .. } => false,
        DestroyOutcome::RootPromoted { old_root, new_root } => {
            spawner.on_root_destroyed(old_root, Some(new_root));
            let new_number = world
                .get::<&Ship>(new_root)
                .map(|ship| ship.ship_number)
                .map_err(|e| stack::component_error(new_root, e))?;
            let multiplier = world
                .get::<&StackLink>(new_root)
                .map(|link| link.multiplier)
                .map_err(|e| stack::component_error(new_root, e))?;
            log::debug!("stack {ship_number}: ship {new_number} promoted (x{multiplier})");
            events.push(GameEvent::RootPromoted {
                old_root: ship_number,
                new_root: new_number,
                multiplier,
            });
            true
        }
        DestroyOutcome::StackCleared { old_root } => {
            spawner.on_root_destroyed(old_root, None);
            events.push(GameEvent::StackCleared { ship_number });
            spawner.spawn_health_pack(world, rng, config, events);
            true
        }
    };

    events.push(GameEvent::ShipDestroyed {
        ship_number,
        was_root,
    });
    Ok(tracker.add_destroyed())
}

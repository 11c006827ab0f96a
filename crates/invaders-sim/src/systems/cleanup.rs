//! Cleanup system: tears the session down when the game ends.

use hecs::{Entity, World};

use invaders_core::components::{HealthPack, Ship};

/// Despawn every ship and health pack. Dropping a ship drops its task timer
/// with it. Uses a pre-allocated buffer to avoid per-call allocation.
pub fn teardown(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, _ship) in world.query_mut::<&Ship>() {
        despawn_buffer.push(entity);
    }
    for (entity, _pack) in world.query_mut::<&HealthPack>() {
        despawn_buffer.push(entity);
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

//! Alien ship spawner: owns the roster of stack roots and grows the fleet
//! on a fixed-delay cadence.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use invaders_core::components::Ship;
use invaders_core::config::GameConfig;
use invaders_core::enums::CandidateScan;
use invaders_core::error::SimError;
use invaders_core::events::GameEvent;
use invaders_core::types::{secs_to_ticks, Position};

use crate::stack;
use crate::world_setup;

/// Spawner state for one session.
#[derive(Debug, Clone)]
pub struct Spawner {
    /// Current stack roots, in spawn order.
    roster: Vec<Entity>,
    /// Ticks until the next follow-up attempt; `None` when stopped.
    countdown: Option<u64>,
    interval_ticks: u64,
    next_ship_number: u32,
    next_pack_number: u32,
}

impl Spawner {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            roster: Vec::new(),
            countdown: None,
            interval_ticks: secs_to_ticks(config.spawn_interval_secs),
            next_ship_number: 0,
            next_pack_number: 0,
        }
    }

    pub fn roster(&self) -> &[Entity] {
        &self.roster
    }

    /// Whether follow-up spawning is armed.
    pub fn is_running(&self) -> bool {
        self.countdown.is_some()
    }

    /// Ticks until the next follow-up attempt.
    pub fn countdown(&self) -> Option<u64> {
        self.countdown
    }

    /// Create the opening fleet of roots and arm the follow-up timer.
    pub fn spawn_initial(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        config: &GameConfig,
        events: &mut Vec<GameEvent>,
    ) {
        let count = rng.gen_range(config.initial_roots_min..=config.initial_roots_max);
        for _ in 0..count {
            self.spawn_root(world, rng, config, events);
        }
        self.countdown = Some(self.interval_ticks);
        log::debug!("spawner: {count} initial stacks");
    }

    /// Add a ship to a stack with room, or start a new stack when none has
    /// room.
    pub fn spawn_follow_up(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        config: &GameConfig,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), SimError> {
        let max = config.max_stack_size as usize;
        let roster = &self.roster;
        let pick = pick_stack(rng, roster.len(), config.candidate_scan, |i| {
            stack::stack_size(world, roster[i]).is_ok_and(|size| size < max)
        });

        let Some(index) = pick else {
            self.spawn_root(world, rng, config, events);
            return Ok(());
        };

        let root = self.roster[index];
        let root_ship = *world
            .get::<&Ship>(root)
            .map_err(|e| stack::component_error(root, e))?;
        let root_pos = *world
            .get::<&Position>(root)
            .map_err(|e| stack::component_error(root, e))?;

        let ship_number = self.take_ship_number();
        let child = world_setup::spawn_ship(
            world,
            root_ship.kind,
            ship_number,
            root_pos,
            secs_to_ticks(config.task_cooldown_secs),
        );
        stack::join(
            world,
            child,
            root,
            config.multiplier_step,
            config.stack_offset,
        )?;

        let multiplier = world
            .get::<&stack::StackLink>(root)
            .map(|link| link.multiplier)
            .unwrap_or_default();
        log::debug!(
            "spawner: ship {ship_number} joined stack {} (x{multiplier})",
            root_ship.ship_number
        );
        events.push(GameEvent::ShipJoined {
            ship_number,
            root_number: root_ship.ship_number,
            multiplier,
        });
        Ok(())
    }

    /// Replace the roster entry for `old` with `new`, or drop it when there
    /// is no successor. Unknown roots are ignored.
    pub fn on_root_destroyed(&mut self, old: Entity, new: Option<Entity>) {
        let Some(index) = self.roster.iter().position(|&e| e == old) else {
            return;
        };
        match new {
            Some(new_root) => self.roster[index] = new_root,
            None => {
                self.roster.remove(index);
            }
        }
    }

    /// Drop a health pack at a random point around Earth.
    pub fn spawn_health_pack(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        config: &GameConfig,
        events: &mut Vec<GameEvent>,
    ) -> Entity {
        let pack_number = self.next_pack_number;
        self.next_pack_number += 1;
        let position = world_setup::random_unit_sphere(rng);
        events.push(GameEvent::HealthPackSpawned { pack_number });
        world_setup::spawn_health_pack(world, pack_number, position, config.health_pack_amount)
    }

    /// Cancel the follow-up timer and forget every root.
    pub fn stop(&mut self) {
        self.countdown = None;
        self.roster.clear();
    }

    fn spawn_root(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        config: &GameConfig,
        events: &mut Vec<GameEvent>,
    ) -> Entity {
        let kind = world_setup::random_kind(rng);
        let position = world_setup::random_unit_sphere(rng);
        let ship_number = self.take_ship_number();
        let entity = world_setup::spawn_ship(
            world,
            kind,
            ship_number,
            position,
            secs_to_ticks(config.task_cooldown_secs),
        );
        self.roster.push(entity);
        events.push(GameEvent::StackSpawned { ship_number, kind });
        entity
    }

    fn take_ship_number(&mut self) -> u32 {
        let n = self.next_ship_number;
        self.next_ship_number += 1;
        n
    }
}

/// Pick a roster index whose stack has room, walking indices in random order.
///
/// `CandidateScan::Legacy` keeps the historical behavior: every attempt
/// draws from `[0, remaining)` but indexes the full roster, and a failed
/// index is removed from the candidates by value. It may return `None`
/// while a stack with room exists.
pub fn pick_stack(
    rng: &mut ChaCha8Rng,
    roster_len: usize,
    scan: CandidateScan,
    mut has_room: impl FnMut(usize) -> bool,
) -> Option<usize> {
    let mut candidates: Vec<usize> = (0..roster_len).collect();
    match scan {
        CandidateScan::WithoutReplacement => {
            while !candidates.is_empty() {
                let pick = rng.gen_range(0..candidates.len());
                let index = candidates.swap_remove(pick);
                if has_room(index) {
                    return Some(index);
                }
            }
            None
        }
        CandidateScan::Legacy => {
            for _ in 0..roster_len {
                let index = rng.gen_range(0..candidates.len().max(1));
                if has_room(index) {
                    return Some(index);
                }
                if let Some(pos) = candidates.iter().position(|&c| c == index) {
                    candidates.remove(pos);
                }
            }
            None
        }
    }
}

/// Advance the follow-up timer and spawn when it expires. The timer is
/// re-armed after every attempt, successful or not.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    spawner: &mut Spawner,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) -> Result<(), SimError> {
    let Some(remaining) = spawner.countdown else {
        return Ok(());
    };
    if remaining > 1 {
        spawner.countdown = Some(remaining - 1);
        return Ok(());
    }
    spawner.countdown = Some(spawner.interval_ticks);
    spawner.spawn_follow_up(world, rng, config, events)
}

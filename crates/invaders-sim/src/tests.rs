//! Tests for the simulation engine, stack resolution, spawner and cannon.

use hecs::{Entity, World};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use invaders_core::commands::PlayerCommand;
use invaders_core::config::GameConfig;
use invaders_core::enums::*;
use invaders_core::error::SimError;
use invaders_core::events::GameEvent;
use invaders_core::state::GameStateSnapshot;
use invaders_core::types::Position;

use crate::engine::{SimConfig, SimulationEngine};
use crate::stack::{self, DestroyOutcome, StackLink};
use crate::systems::cannon;
use crate::systems::spawner::{pick_stack, Spawner};
use crate::tracker::GameTracker;
use crate::world_setup;

fn engine_with(seed: u64, game: GameConfig) -> SimulationEngine {
    SimulationEngine::new(SimConfig {
        seed,
        game,
        ..Default::default()
    })
}

/// One root at start, no follow-up spawns within a test's horizon.
fn single_root_config() -> GameConfig {
    GameConfig {
        initial_roots_min: 1,
        initial_roots_max: 1,
        spawn_interval_secs: 1000.0,
        ..Default::default()
    }
}

fn started(engine: &mut SimulationEngine) -> GameStateSnapshot {
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick()
}

fn link(world: &World, entity: Entity) -> StackLink {
    (*world.get::<&StackLink>(entity).unwrap()).clone()
}

fn spawn_test_ship(world: &mut World, number: u32, position: Position) -> Entity {
    world_setup::spawn_ship(world, ShipKind::Destroyer, number, position, 30)
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = engine_with(12345, GameConfig::default());
    let mut engine_b = engine_with(12345, GameConfig::default());

    engine_a.queue_command(PlayerCommand::StartGame);
    engine_b.queue_command(PlayerCommand::StartGame);

    for _ in 0..300 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = engine_with(111, GameConfig::default());
    let mut engine_b = engine_with(222, GameConfig::default());

    let snap_a = started(&mut engine_a);
    let snap_b = started(&mut engine_b);

    // Initial roots are placed at random points, so the first snapshot
    // already differs.
    let json_a = serde_json::to_string(&snap_a).unwrap();
    let json_b = serde_json::to_string(&snap_b).unwrap();
    assert_ne!(json_a, json_b, "Different seeds should produce divergent output");
}

// ---- Session lifecycle ----

#[test]
fn test_start_game_spawns_initial_roots() {
    for seed in 0..20 {
        let mut engine = engine_with(seed, GameConfig::default());
        let snap = started(&mut engine);

        assert_eq!(snap.phase, GamePhase::Active);
        let count = snap.stacks.len();
        assert!(
            (6..=10).contains(&count),
            "seed {seed}: expected 6-10 initial stacks, got {count}"
        );
        assert!(snap.stacks.iter().all(|s| s.children.is_empty()));
        assert!(snap.stacks.iter().all(|s| s.multiplier == 1.0));
        assert_eq!(snap.score.ships_alive as usize, count);

        for stack in &snap.stacks {
            assert!(
                (stack.position.length() - 1.0).abs() < 1e-9,
                "roots spawn on the unit sphere"
            );
        }
    }
}

#[test]
fn test_tick_timing_30_ticks_one_second() {
    let mut engine = engine_with(1, GameConfig::default());
    engine.queue_command(PlayerCommand::StartGame);

    for _ in 0..30 {
        engine.tick();
    }

    assert_eq!(engine.time().tick, 30);
    assert!(
        (engine.time().elapsed_secs - 1.0).abs() < 1e-10,
        "30 ticks should equal 1.0 seconds, got {}",
        engine.time().elapsed_secs
    );
}

#[test]
fn test_main_menu_does_not_advance() {
    let mut engine = engine_with(1, GameConfig::default());
    for _ in 0..10 {
        let snap = engine.tick();
        assert_eq!(snap.phase, GamePhase::MainMenu);
        assert!(snap.stacks.is_empty());
    }
    assert_eq!(engine.time().tick, 0);
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = engine_with(1, GameConfig::default());
    engine.queue_command(PlayerCommand::StartGame);

    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 10);
    assert_eq!(engine.phase(), GamePhase::Active);

    engine.queue_command(PlayerCommand::Pause);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 10, "Time should not advance while paused");
    assert_eq!(engine.phase(), GamePhase::Paused);

    engine.queue_command(PlayerCommand::Resume);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 20);
    assert_eq!(engine.phase(), GamePhase::Active);
}

#[test]
fn test_return_to_menu_clears_field() {
    let mut engine = engine_with(3, GameConfig::default());
    started(&mut engine);
    engine.queue_command(PlayerCommand::ReturnToMenu);
    let snap = engine.tick();

    assert_eq!(snap.phase, GamePhase::MainMenu);
    assert!(snap.stacks.is_empty());
    assert_eq!(snap.score.ships_alive, 0);
    assert!(!engine.spawner().is_running());

    let snap = started(&mut engine);
    assert_eq!(snap.phase, GamePhase::Active);
    assert!(!snap.stacks.is_empty());
}

#[test]
fn test_restart_resets_counters() {
    let mut engine = engine_with(3, GameConfig::default());
    started(&mut engine);
    engine.queue_command(PlayerCommand::Fire {
        target: ShotTarget::Earth,
    });
    let snap = engine.tick();
    assert!(snap.earth.health < snap.earth.max_health);

    engine.queue_command(PlayerCommand::Restart);
    let snap = engine.tick();
    assert_eq!(snap.earth.health, snap.earth.max_health);
    assert_eq!(snap.score.shots_fired, 0);
    assert_eq!(engine.time().tick, 1);
}

// ---- Stack resolution ----

#[test]
fn test_join_updates_parent_and_child() {
    let mut world = World::new();
    let root = spawn_test_ship(&mut world, 0, Position::new(0.0, 0.0, 1.0));
    let child = spawn_test_ship(&mut world, 1, Position::new(0.0, 0.0, 1.0));

    stack::join(&mut world, child, root, 0.5, 0.05).unwrap();

    let root_link = link(&world, root);
    assert_eq!(root_link.children, vec![child]);
    assert_eq!(root_link.multiplier, 1.5);
    assert_eq!(link(&world, child).parent, Some(root));
    assert!(!stack::is_root(&world, child).unwrap());
    assert_eq!(stack::stack_size(&world, root).unwrap(), 2);

    let root_pos = *world.get::<&Position>(root).unwrap();
    let child_pos = *world.get::<&Position>(child).unwrap();
    assert!(child_pos.distance_to(&root_pos) > 0.01, "child must not overlap its root");
    assert!((child_pos.length() - 1.0).abs() < 1e-9, "child stays on the sphere");
}

#[test]
fn test_join_alternates_offset_direction() {
    let root = Position::new(1.0, 0.0, 0.0);
    let first = stack::offset_position(&root, 0, 0.05);
    let second = stack::offset_position(&root, 1, 0.05);
    assert!(first.distance_to(&second) > 0.01);
    assert!(first.distance_to(&root) > 0.0);
    assert!(second.distance_to(&root) > 0.0);
}

#[test]
fn test_join_through_child_rejected() {
    let mut world = World::new();
    let pos = Position::new(1.0, 0.0, 0.0);
    let root = spawn_test_ship(&mut world, 0, pos);
    let child = spawn_test_ship(&mut world, 1, pos);
    let late = spawn_test_ship(&mut world, 2, pos);
    stack::join(&mut world, child, root, 0.5, 0.05).unwrap();

    let err = stack::join(&mut world, late, child, 0.5, 0.05).unwrap_err();
    assert_eq!(err, SimError::ParentNotRoot { child: 2, parent: 1 });
    assert_eq!(link(&world, root).multiplier, 1.5, "failed join leaves the stack alone");
}

#[test]
fn test_destroy_root_promotes_first_child() {
    let mut world = World::new();
    let pos = Position::new(0.0, 1.0, 0.0);
    let root = spawn_test_ship(&mut world, 0, pos);
    let a = spawn_test_ship(&mut world, 1, pos);
    let b = spawn_test_ship(&mut world, 2, pos);
    let c = spawn_test_ship(&mut world, 3, pos);
    for child in [a, b, c] {
        stack::join(&mut world, child, root, 0.5, 0.05).unwrap();
    }
    let old_multiplier = link(&world, root).multiplier;
    assert_eq!(old_multiplier, 2.5);

    let destruction = stack::destroy(&mut world, root, 0.5).unwrap();
    assert_eq!(destruction.ship.ship_number, 0);
    assert_eq!(
        destruction.outcome,
        DestroyOutcome::RootPromoted {
            old_root: root,
            new_root: a
        }
    );
    assert!(!world.contains(root));

    let new_link = link(&world, a);
    assert_eq!(new_link.parent, None);
    assert_eq!(new_link.children, vec![b, c]);
    assert_eq!(new_link.multiplier, old_multiplier - 0.5);
    assert_eq!(link(&world, b).parent, Some(a));
    assert_eq!(link(&world, c).parent, Some(a));
}

#[test]
fn test_destroy_child_decrements_parent() {
    let mut world = World::new();
    let pos = Position::new(0.0, 1.0, 0.0);
    let root = spawn_test_ship(&mut world, 0, pos);
    let a = spawn_test_ship(&mut world, 1, pos);
    let b = spawn_test_ship(&mut world, 2, pos);
    stack::join(&mut world, a, root, 0.5, 0.05).unwrap();
    stack::join(&mut world, b, root, 0.5, 0.05).unwrap();

    let destruction = stack::destroy(&mut world, b, 0.5).unwrap();
    assert_eq!(
        destruction.outcome,
        DestroyOutcome::ChildRemoved { parent: root }
    );
    let root_link = link(&world, root);
    assert_eq!(root_link.children, vec![a]);
    assert_eq!(root_link.multiplier, 1.5);
}

#[test]
fn test_destroy_lone_root_clears_stack() {
    let mut world = World::new();
    let root = spawn_test_ship(&mut world, 4, Position::new(1.0, 0.0, 0.0));
    let destruction = stack::destroy(&mut world, root, 0.5).unwrap();
    assert_eq!(
        destruction.outcome,
        DestroyOutcome::StackCleared { old_root: root }
    );
    assert!(!world.contains(root));
}

#[test]
fn test_destroy_stale_entity_is_error() {
    let mut world = World::new();
    let root = spawn_test_ship(&mut world, 0, Position::new(1.0, 0.0, 0.0));
    stack::destroy(&mut world, root, 0.5).unwrap();
    let err = stack::destroy(&mut world, root, 0.5).unwrap_err();
    assert!(matches!(err, SimError::StaleEntity(_)));
}

// ---- Spawner ----

#[test]
fn test_full_stack_forces_new_root() {
    for scan in [CandidateScan::WithoutReplacement, CandidateScan::Legacy] {
        let config = GameConfig {
            initial_roots_min: 1,
            initial_roots_max: 1,
            max_stack_size: 3,
            candidate_scan: scan,
            ..Default::default()
        };
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut events = Vec::new();
        let mut spawner = Spawner::new(&config);

        spawner.spawn_initial(&mut world, &mut rng, &config, &mut events);
        let root = spawner.roster()[0];

        spawner
            .spawn_follow_up(&mut world, &mut rng, &config, &mut events)
            .unwrap();
        spawner
            .spawn_follow_up(&mut world, &mut rng, &config, &mut events)
            .unwrap();
        assert_eq!(stack::stack_size(&world, root).unwrap(), 3);
        assert_eq!(spawner.roster().len(), 1);
        assert_eq!(link(&world, root).multiplier, 2.0);

        spawner
            .spawn_follow_up(&mut world, &mut rng, &config, &mut events)
            .unwrap();
        assert_eq!(
            stack::stack_size(&world, root).unwrap(),
            3,
            "{scan:?}: a full stack must not take a third child"
        );
        assert_eq!(spawner.roster().len(), 2, "{scan:?}: expected a new root");
        assert_eq!(stack::stack_size(&world, spawner.roster()[1]).unwrap(), 1);
    }
}

#[test]
fn test_child_inherits_root_kind() {
    let config = GameConfig {
        initial_roots_min: 1,
        initial_roots_max: 1,
        ..Default::default()
    };
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut events = Vec::new();
    let mut spawner = Spawner::new(&config);
    spawner.spawn_initial(&mut world, &mut rng, &config, &mut events);
    spawner
        .spawn_follow_up(&mut world, &mut rng, &config, &mut events)
        .unwrap();

    let root = spawner.roster()[0];
    let child = link(&world, root).children[0];
    let root_kind = world.get::<&invaders_core::components::Ship>(root).unwrap().kind;
    let child_kind = world.get::<&invaders_core::components::Ship>(child).unwrap().kind;
    assert_eq!(root_kind, child_kind);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::ShipJoined { multiplier, .. } if *multiplier == 1.5)));
}

#[test]
fn test_roster_replace_and_remove() {
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut events = Vec::new();
    let config = GameConfig {
        initial_roots_min: 3,
        initial_roots_max: 3,
        ..Default::default()
    };
    let mut spawner = Spawner::new(&config);
    spawner.spawn_initial(&mut world, &mut rng, &config, &mut events);
    let [a, b, c] = [spawner.roster()[0], spawner.roster()[1], spawner.roster()[2]];
    let stranger = spawn_test_ship(&mut world, 99, Position::new(1.0, 0.0, 0.0));

    spawner.on_root_destroyed(b, Some(stranger));
    assert_eq!(spawner.roster(), &[a, stranger, c]);

    spawner.on_root_destroyed(a, None);
    assert_eq!(spawner.roster(), &[stranger, c]);

    spawner.on_root_destroyed(a, None);
    assert_eq!(spawner.roster().len(), 2, "unknown roots are ignored");

    spawner.stop();
    assert!(spawner.roster().is_empty());
    assert!(!spawner.is_running());
}

#[test]
fn test_scan_without_replacement_always_finds_room() {
    for seed in 0..64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut visited = Vec::new();
        let pick = pick_stack(&mut rng, 5, CandidateScan::WithoutReplacement, |i| {
            visited.push(i);
            i == 3
        });
        assert_eq!(pick, Some(3), "seed {seed}");
        let mut unique = visited.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), visited.len(), "seed {seed}: an index was visited twice");
    }
}

#[test]
fn test_scan_without_replacement_exhausts_full_roster() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut calls = 0;
    let pick = pick_stack(&mut rng, 4, CandidateScan::WithoutReplacement, |_| {
        calls += 1;
        false
    });
    assert_eq!(pick, None);
    assert_eq!(calls, 4);
}

/// The legacy scan draws from a shrinking range but indexes the full roster,
/// so a stack with room at the end of the roster can be skipped entirely.
#[test]
fn test_legacy_scan_can_overlook_room() {
    let mut misses = 0;
    for seed in 0..64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        match pick_stack(&mut rng, 3, CandidateScan::Legacy, |i| i == 2) {
            Some(index) => assert_eq!(index, 2, "legacy scan must only return open stacks"),
            None => misses += 1,
        }
    }
    assert!(
        misses > 0,
        "legacy scan should miss the open stack for some seeds"
    );
}

#[test]
fn test_empty_roster_picks_nothing() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    for scan in [CandidateScan::WithoutReplacement, CandidateScan::Legacy] {
        assert_eq!(pick_stack(&mut rng, 0, scan, |_| true), None);
    }
}

#[test]
fn test_follow_up_spawns_on_interval() {
    let config = GameConfig {
        spawn_interval_secs: 3.0,
        ..single_root_config()
    };
    let mut engine = engine_with(8, config);
    engine.queue_command(PlayerCommand::StartGame);

    let mut snap = engine.tick();
    for _ in 1..89 {
        snap = engine.tick();
    }
    assert_eq!(snap.score.ships_alive, 1);

    let snap = engine.tick();
    assert_eq!(
        snap.score.ships_alive, 2,
        "the 90th tick should bring one follow-up ship"
    );
    assert_eq!(engine.spawner().countdown(), Some(90), "timer re-armed after spawning");
}

// ---- Tasks ----

#[test]
fn test_root_task_fires_each_second() {
    let mut engine = engine_with(21, single_root_config());
    engine.queue_command(PlayerCommand::StartGame);

    for _ in 0..29 {
        engine.tick();
    }
    assert_eq!(engine.tracker().health(), 100.0);
    assert_eq!(engine.tracker().resources(), 0.0);

    engine.tick();
    let damage = 100.0 - engine.tracker().health();
    let mined = engine.tracker().resources();
    assert_eq!(damage + mined, 1.0, "exactly one task at multiplier 1");
}

#[test]
fn test_task_scales_with_multiplier_and_children_are_idle() {
    let config = GameConfig {
        destroyer_base_damage: 2.0,
        miner_base_output: 2.0,
        ..single_root_config()
    };
    let mut engine = engine_with(4, config);
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick();
    engine.force_follow_up().unwrap();
    engine.force_follow_up().unwrap();

    let snap = engine.tick();
    assert_eq!(snap.stacks.len(), 1);
    assert_eq!(snap.stacks[0].children.len(), 2);
    assert_eq!(snap.stacks[0].multiplier, 2.0);

    for _ in 0..28 {
        engine.tick();
    }
    let damage = 100.0 - engine.tracker().health();
    let mined = engine.tracker().resources();
    assert_eq!(
        damage + mined,
        4.0,
        "one root task of base 2 at x2; children add nothing themselves"
    );
}

// ---- Cannon ----

#[test]
fn test_shooting_lone_root_drops_health_pack() {
    let mut engine = engine_with(10, single_root_config());
    let snap = started(&mut engine);
    let root = snap.stacks[0].root_number;

    engine.queue_command(PlayerCommand::Fire {
        target: ShotTarget::Ship { ship_number: root },
    });
    let snap = engine.tick();

    assert!(snap.stacks.is_empty());
    assert_eq!(snap.score.ships_destroyed, 1);
    assert_eq!(snap.score.shots_fired, 1);
    assert_eq!(snap.health_packs.len(), 1);
    assert!(snap
        .events
        .contains(&GameEvent::StackCleared { ship_number: root }));
    assert!(snap.events.contains(&GameEvent::ShipDestroyed {
        ship_number: root,
        was_root: true
    }));
}

#[test]
fn test_shooting_root_promotes_in_roster() {
    let mut engine = engine_with(11, single_root_config());
    started(&mut engine);
    engine.force_follow_up().unwrap();
    engine.force_follow_up().unwrap();
    let snap = engine.tick();
    let stack = snap.stacks[0].clone();
    assert_eq!(stack.children.len(), 2);

    engine.queue_command(PlayerCommand::Fire {
        target: ShotTarget::Ship {
            ship_number: stack.root_number,
        },
    });
    let snap = engine.tick();

    assert_eq!(snap.stacks.len(), 1, "the roster slot is taken over, not removed");
    assert_eq!(snap.stacks[0].root_number, stack.children[0]);
    assert_eq!(snap.stacks[0].children, vec![stack.children[1]]);
    assert_eq!(snap.stacks[0].multiplier, stack.multiplier - 0.5);
    assert!(snap.health_packs.is_empty());
}

#[test]
fn test_shooting_health_pack_heals() {
    let mut engine = engine_with(12, single_root_config());
    let snap = started(&mut engine);
    let root = snap.stacks[0].root_number;

    engine.queue_commands([
        PlayerCommand::Fire {
            target: ShotTarget::Earth,
        },
        PlayerCommand::Fire {
            target: ShotTarget::Earth,
        },
        PlayerCommand::Fire {
            target: ShotTarget::Ship { ship_number: root },
        },
    ]);
    let snap = engine.tick();
    assert_eq!(snap.earth.health, 90.0);
    let pack = snap.health_packs[0].pack_number;

    engine.queue_command(PlayerCommand::Fire {
        target: ShotTarget::HealthPack { pack_number: pack },
    });
    let snap = engine.tick();
    assert_eq!(snap.earth.health, 100.0);
    assert!(snap.health_packs.is_empty());
    assert!(snap.events.contains(&GameEvent::HealthRestored {
        pack_number: pack,
        amount: 10.0
    }));
}

#[test]
fn test_shot_at_unknown_ship_hits_nothing() {
    let mut engine = engine_with(13, GameConfig::default());
    let snap = started(&mut engine);
    let alive = snap.score.ships_alive;

    engine.queue_command(PlayerCommand::Fire {
        target: ShotTarget::Ship { ship_number: 9999 },
    });
    let snap = engine.tick();
    assert_eq!(snap.score.ships_alive, alive);
    assert_eq!(snap.score.ships_destroyed, 0);
    assert_eq!(snap.score.shots_fired, 1);
}

#[test]
fn test_fire_ignored_while_paused() {
    let mut engine = engine_with(14, GameConfig::default());
    started(&mut engine);
    engine.queue_commands([
        PlayerCommand::Pause,
        PlayerCommand::Fire {
            target: ShotTarget::Earth,
        },
    ]);
    let snap = engine.tick();
    assert_eq!(snap.score.shots_fired, 0);
    assert_eq!(snap.earth.health, snap.earth.max_health);
}

// ---- Win / loss ----

#[test]
fn test_win_when_destroyed_reaches_target() {
    let config = GameConfig {
        ships_to_destroy: 2,
        initial_roots_min: 3,
        initial_roots_max: 3,
        ..Default::default()
    };
    let mut engine = engine_with(15, config);
    let snap = started(&mut engine);
    let first = snap.stacks[0].root_number;
    let second = snap.stacks[1].root_number;

    engine.queue_command(PlayerCommand::Fire {
        target: ShotTarget::Ship { ship_number: first },
    });
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active, "one kill of two must not win");
    assert_eq!(snap.outcome, None);

    engine.queue_command(PlayerCommand::Fire {
        target: ShotTarget::Ship { ship_number: second },
    });
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert_eq!(snap.outcome, Some(GameOutcome::Won));
    assert!(snap.events.contains(&GameEvent::GameOver {
        outcome: GameOutcome::Won
    }));

    // Teardown: field cleared, timers gone, time frozen.
    assert!(snap.stacks.is_empty());
    assert!(snap.health_packs.is_empty());
    assert_eq!(snap.score.ships_alive, 0);
    assert!(!engine.spawner().is_running());
    let frozen = engine.time().tick;
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, frozen);
}

#[test]
fn test_loss_by_resources() {
    let config = GameConfig {
        destroyer_base_damage: 0.0,
        miner_base_output: 1.0,
        target_resources: 5.0,
        spawn_interval_secs: 0.5,
        ..Default::default()
    };
    let mut engine = engine_with(16, config);
    engine.queue_command(PlayerCommand::StartGame);

    let mut last = engine.tick();
    for _ in 0..5_000 {
        if last.phase == GamePhase::GameOver {
            break;
        }
        last = engine.tick();
    }
    assert_eq!(last.outcome, Some(GameOutcome::LostResources));
    assert!(last.earth.resources_mined >= 5.0);
    assert_eq!(last.earth.health, last.earth.max_health);
}

#[test]
fn test_loss_by_health() {
    let config = GameConfig {
        destroyer_base_damage: 1.0,
        miner_base_output: 0.0,
        max_health: 5.0,
        spawn_interval_secs: 0.5,
        ..Default::default()
    };
    let mut engine = engine_with(17, config);
    engine.queue_command(PlayerCommand::StartGame);

    let mut last = engine.tick();
    for _ in 0..5_000 {
        if last.phase == GamePhase::GameOver {
            break;
        }
        last = engine.tick();
    }
    assert_eq!(last.outcome, Some(GameOutcome::LostHealth));
    assert_eq!(last.earth.health, 0.0);
}

#[test]
fn test_start_again_after_game_over() {
    let config = GameConfig {
        ships_to_destroy: 1,
        ..single_root_config()
    };
    let mut engine = engine_with(18, config);
    let snap = started(&mut engine);
    engine.queue_command(PlayerCommand::Fire {
        target: ShotTarget::Ship {
            ship_number: snap.stacks[0].root_number,
        },
    });
    assert_eq!(engine.tick().phase, GamePhase::GameOver);

    let snap = started(&mut engine);
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.outcome, None);
    assert_eq!(snap.score.ships_destroyed, 0);
    assert_eq!(snap.stacks.len(), 1);
}

// ---- Invariants ----

fn check_invariants(world: &World, spawner: &Spawner, step: f64) {
    let roots: Vec<Entity> = world
        .query::<&StackLink>()
        .iter()
        .filter(|(_, link)| link.parent.is_none())
        .map(|(entity, _)| entity)
        .collect();
    assert_eq!(spawner.roster().len(), roots.len(), "roster must hold every root");
    for root in spawner.roster() {
        assert!(roots.contains(root), "roster holds a non-root");
    }

    for (entity, link) in world.query::<&StackLink>().iter() {
        match link.parent {
            None => {
                let expected = 1.0 + step * link.children.len() as f64;
                assert_eq!(link.multiplier, expected);
                for &child in &link.children {
                    let child_link = world.get::<&StackLink>(child).unwrap();
                    assert_eq!(child_link.parent, Some(entity));
                }
            }
            Some(parent) => {
                let parent_link = world.get::<&StackLink>(parent).unwrap();
                assert!(parent_link.children.contains(&entity));
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_stacks_stay_consistent(
        seed in 0u64..10_000,
        ops in proptest::collection::vec((any::<bool>(), any::<usize>()), 1..80),
    ) {
        let config = GameConfig {
            initial_roots_min: 2,
            initial_roots_max: 4,
            max_stack_size: 4,
            ships_to_destroy: 10_000,
            ..Default::default()
        };
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut events = Vec::new();
        let mut spawner = Spawner::new(&config);
        let mut tracker = GameTracker::new(&config);
        spawner.spawn_initial(&mut world, &mut rng, &config, &mut events);
        check_invariants(&world, &spawner, config.multiplier_step);

        for (spawn, pick) in ops {
            let ships: Vec<Entity> = world.query::<&StackLink>().iter().map(|(e, _)| e).collect();
            if spawn || ships.is_empty() {
                spawner.spawn_follow_up(&mut world, &mut rng, &config, &mut events).unwrap();
            } else {
                let target = ships[pick % ships.len()];
                cannon::destroy_ship(
                    &mut world,
                    &mut rng,
                    &mut spawner,
                    &mut tracker,
                    &config,
                    &mut events,
                    target,
                )
                .unwrap();
            }
            check_invariants(&world, &spawner, config.multiplier_step);
            for &root in spawner.roster() {
                prop_assert!(stack::stack_size(&world, root).unwrap() <= 4);
            }
        }
    }
}

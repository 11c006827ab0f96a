//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems, and produces `GameStateSnapshot`s. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use invaders_core::commands::PlayerCommand;
use invaders_core::config::GameConfig;
use invaders_core::enums::{GameOutcome, GamePhase, ShotTarget, TaskKind};
use invaders_core::error::SimError;
use invaders_core::events::GameEvent;
use invaders_core::state::GameStateSnapshot;
use invaders_core::types::SimTime;

use crate::systems;
use crate::systems::spawner::Spawner;
use crate::systems::tasks::TaskEffect;
use crate::tracker::GameTracker;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    /// Gameplay tuning.
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            game: GameConfig::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    config: GameConfig,
    spawner: Spawner,
    tracker: GameTracker,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    task_effects: Vec<TaskEffect>,
    events: Vec<GameEvent>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            spawner: Spawner::new(&config.game),
            tracker: GameTracker::new(&config.game),
            config: config.game,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            task_effects: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.spawner,
            &self.tracker,
            events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Get the session's gameplay config.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get the spawner (roster of stack roots).
    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    /// Get the session counters.
    pub fn tracker(&self) -> &GameTracker {
        &self.tracker
    }

    /// Force a follow-up spawn attempt outside the timer (for tests).
    #[cfg(test)]
    pub fn force_follow_up(&mut self) -> Result<(), SimError> {
        self.spawner.spawn_follow_up(
            &mut self.world,
            &mut self.rng,
            &self.config,
            &mut self.events,
        )
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartGame => {
                if matches!(self.phase, GamePhase::MainMenu | GamePhase::GameOver) {
                    self.start_session();
                } else {
                    log::warn!("engine: StartGame ignored in {:?}", self.phase);
                }
            }
            PlayerCommand::Restart => self.start_session(),
            PlayerCommand::ReturnToMenu => {
                if self.phase != GamePhase::MainMenu {
                    self.teardown();
                    self.tracker = GameTracker::new(&self.config);
                    self.phase = GamePhase::MainMenu;
                    log::info!("engine: returned to main menu");
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, 4.0);
            }
            PlayerCommand::Fire { target } => self.fire(target),
        }
    }

    fn fire(&mut self, target: ShotTarget) {
        if self.phase != GamePhase::Active {
            log::warn!("engine: shot at {target:?} ignored in {:?}", self.phase);
            return;
        }
        let result = systems::cannon::fire(
            &mut self.world,
            &mut self.rng,
            &mut self.spawner,
            &mut self.tracker,
            &self.config,
            &mut self.events,
            target,
        );
        match result {
            Ok(Some(outcome)) => self.end_game(outcome),
            Ok(None) => {}
            Err(err) => log::warn!("engine: shot at {target:?} failed: {err}"),
        }
    }

    /// Reset all session state and spawn the opening fleet.
    fn start_session(&mut self) {
        self.world.clear();
        self.time = SimTime::default();
        self.spawner = Spawner::new(&self.config);
        self.tracker = GameTracker::new(&self.config);
        self.spawner.spawn_initial(
            &mut self.world,
            &mut self.rng,
            &self.config,
            &mut self.events,
        );
        self.phase = GamePhase::Active;
        log::info!(
            "engine: session started with {} stacks",
            self.spawner.roster().len()
        );
    }

    /// Stop spawning, drop every timer, and clear the field.
    fn teardown(&mut self) {
        self.spawner.stop();
        systems::cleanup::teardown(&mut self.world, &mut self.despawn_buffer);
    }

    fn end_game(&mut self, outcome: GameOutcome) {
        self.teardown();
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { outcome });
        log::info!(
            "engine: game over at tick {} ({outcome:?}), {} ships destroyed",
            self.time.tick,
            self.tracker.destroyed()
        );
    }

    /// Run all systems in order. Stops as soon as the session ends.
    fn run_systems(&mut self) {
        // 1. Follow-up spawning
        if let Err(err) = systems::spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.spawner,
            &self.config,
            &mut self.events,
        ) {
            log::warn!("engine: follow-up spawn failed: {err}");
        }

        // 2. Ship tasks, applied in firing order
        let mut effects = std::mem::take(&mut self.task_effects);
        effects.clear();
        systems::tasks::run(&mut self.world, &self.config, &mut effects);
        let tracker = &mut self.tracker;
        let ended = effects.iter().find_map(|effect| match effect.kind {
            TaskKind::Damage => tracker.apply_damage(effect.amount),
            TaskKind::Mine => tracker.add_resources(effect.amount),
        });
        self.task_effects = effects;
        if let Some(outcome) = ended {
            self.end_game(outcome);
            return;
        }

        // 3. Per-second totals
        self.tracker.advance_totals();
    }
}

//! Game loop: runs the simulation engine at 30Hz and hands snapshots to a
//! presenter.
//!
//! The engine is created inside the loop thread so it never crosses threads.
//! Commands arrive via `mpsc` channel. The latest snapshot is stored in
//! shared state for polling. `run_headless` drives an engine directly, as
//! fast as possible, for batch runs and tests.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use invaders_core::constants::TICK_RATE;
use invaders_core::enums::GamePhase;
use invaders_core::state::GameStateSnapshot;
use invaders_sim::engine::{SimConfig, SimulationEngine};

use crate::autopilot::Autopilot;
use crate::presenter::Presenter;
use crate::state::GameLoopCommand;

/// Nominal duration of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    presenter: Box<dyn Presenter>,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("invaders-game-loop".into())
        .spawn(move || {
            run_game_loop(config, presenter, cmd_rx, &latest_snapshot);
        })?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    mut presenter: Box<dyn Presenter>,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    log::info!("game loop: started (seed {})", config.seed);
    let mut engine = SimulationEngine::new(config);
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    log::info!("game loop: stopped at tick {}", engine.time().tick);
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();

        // 3. Present
        presenter.present(&snapshot);

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until next tick, adjusting for time_scale
        let effective = effective_tick_duration(engine.time_scale());
        next_tick_time += effective;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective * 2 {
            // Too far behind: reset instead of catching up
            next_tick_time = now;
        }
    }
}

/// Wall-clock duration of one tick at the given time scale.
pub fn effective_tick_duration(time_scale: f64) -> Duration {
    if time_scale > 0.001 {
        TICK_DURATION.div_f64(time_scale)
    } else {
        TICK_DURATION
    }
}

/// Tick `engine` up to `max_ticks` times without pacing, stopping early at
/// game over. Returns the last snapshot.
pub fn run_headless(
    engine: &mut SimulationEngine,
    max_ticks: u64,
    mut autopilot: Option<&mut Autopilot>,
    presenter: &mut dyn Presenter,
) -> Option<GameStateSnapshot> {
    let mut last = None;
    for _ in 0..max_ticks {
        let snapshot = engine.tick();
        presenter.present(&snapshot);
        if let Some(pilot) = autopilot.as_deref_mut() {
            if let Some(command) = pilot.choose(&snapshot) {
                engine.queue_command(command);
            }
        }
        let over = snapshot.phase == GamePhase::GameOver;
        last = Some(snapshot);
        if over {
            break;
        }
    }
    last
}

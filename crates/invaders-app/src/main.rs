use std::path::PathBuf;
use std::thread;

use anyhow::Context;
use clap::Parser;

use invaders_app::autopilot::Autopilot;
use invaders_app::game_loop::{self, TICK_DURATION};
use invaders_app::presenter::LogPresenter;
use invaders_app::state::AppState;
use invaders_core::commands::PlayerCommand;
use invaders_core::config::GameConfig;
use invaders_core::enums::GamePhase;
use invaders_core::state::GameStateSnapshot;
use invaders_sim::engine::{SimConfig, SimulationEngine};

#[derive(Parser, Debug)]
#[command(name = "invaders")]
#[command(about = "Earth Invaders: defend Earth from stacking alien ships")]
struct Args {
    /// RNG seed; the same seed and inputs replay the same game
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Gameplay config (TOML); missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run headless for at most this many ticks instead of in real time
    #[arg(long)]
    ticks: Option<u64>,

    /// Let the scripted autopilot fire the cannon
    #[arg(long)]
    autopilot: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Real-time speed multiplier (0-4)
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let game = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => GameConfig::default(),
    };
    let sim_config = SimConfig {
        seed: args.seed,
        time_scale: args.time_scale.clamp(0.0, 4.0),
        game,
    };

    let last = match args.ticks {
        Some(ticks) => run_headless(sim_config, ticks, args.autopilot),
        None => run_realtime(sim_config, args.autopilot)?,
    };

    let Some(last) = last else {
        log::warn!("no ticks were run");
        return Ok(());
    };
    match last.outcome {
        Some(outcome) => log::info!(
            "finished at t={:.1}s: {outcome:?} ({} ships destroyed)",
            last.time.elapsed_secs,
            last.score.ships_destroyed
        ),
        None => log::info!(
            "stopped at t={:.1}s with no winner",
            last.time.elapsed_secs
        ),
    }
    if args.json {
        let json = serde_json::to_string_pretty(&last).context("serialize final snapshot")?;
        println!("{json}");
    }
    Ok(())
}

fn run_headless(config: SimConfig, ticks: u64, autopilot: bool) -> Option<GameStateSnapshot> {
    let mut engine = SimulationEngine::new(config);
    engine.queue_command(PlayerCommand::StartGame);
    let mut pilot = autopilot.then(Autopilot::default);
    game_loop::run_headless(&mut engine, ticks, pilot.as_mut(), &mut LogPresenter)
}

/// Run the game loop thread at wall-clock pace until the game ends.
fn run_realtime(config: SimConfig, autopilot: bool) -> anyhow::Result<Option<GameStateSnapshot>> {
    let state = AppState::new();
    state.start_simulation(config, Box::new(LogPresenter))?;
    state.send_command(PlayerCommand::StartGame)?;
    let mut pilot = autopilot.then(Autopilot::default);

    let last = loop {
        thread::sleep(TICK_DURATION);
        let Some(snapshot) = state.get_snapshot() else {
            continue;
        };
        if snapshot.phase == GamePhase::GameOver {
            break snapshot;
        }
        if let Some(command) = pilot.as_mut().and_then(|p| p.choose(&snapshot)) {
            state.send_command(command)?;
        }
    };

    state.shutdown()?;
    Ok(Some(last))
}

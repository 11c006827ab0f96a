//! Earth Invaders application shell.
//!
//! Runs the simulation on a game loop thread (or headless), feeds snapshots
//! to a presenter, and optionally plays with a scripted autopilot.

pub mod autopilot;
pub mod game_loop;
pub mod presenter;
pub mod state;

pub use invaders_core as core;

//! Simulation engine for Earth Invaders.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for presentation.

pub mod engine;
pub mod stack;
pub mod systems;
pub mod tracker;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use invaders_core as core;

#[cfg(test)]
mod tests;

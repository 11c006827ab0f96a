//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! Session-level state (roster, counters) is passed in by the engine.

pub mod cannon;
pub mod cleanup;
pub mod snapshot;
pub mod spawner;
pub mod tasks;

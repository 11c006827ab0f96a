//! Fundamental geometric and simulation types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::TICK_RATE;

/// Position in simulation space. Ships and pickups live on the unit sphere
/// around the Earth's center at the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn from_dvec3(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// Distance from the origin.
    pub fn length(&self) -> f64 {
        self.as_dvec3().length()
    }

    /// Distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.as_dvec3().distance(other.as_dvec3())
    }

    /// Tangent basis `(right, up)` of a ship at this position looking at the
    /// origin. Falls back to the world axes at the poles.
    pub fn tangent_basis(&self) -> (DVec3, DVec3) {
        let forward = (-self.as_dvec3()).normalize_or_zero();
        if forward == DVec3::ZERO {
            return (DVec3::X, DVec3::Y);
        }
        let mut right = DVec3::Y.cross(forward);
        if right.length_squared() < 1e-12 {
            right = DVec3::X;
        }
        let right = right.normalize();
        let up = forward.cross(right).normalize();
        (right, up)
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        1.0 / TICK_RATE as f64
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Convert a duration in seconds to whole ticks, never less than one.
pub fn secs_to_ticks(secs: f64) -> u64 {
    ((secs * TICK_RATE as f64).round() as u64).max(1)
}

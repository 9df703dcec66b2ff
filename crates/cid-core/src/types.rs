//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position on the play field (field units, origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of simulation updates run so far.
    pub tick: u64,
    /// Elapsed simulated seconds while playing.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.as_vec().distance(other.as_vec())
    }

    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Move toward `target` by at most `step` units.
    ///
    /// Returns the new position and whether the target was reached.
    /// A zero-length offset leaves the position unchanged.
    pub fn step_toward(&self, target: &Position, step: f64) -> (Position, bool) {
        let offset = target.as_vec() - self.as_vec();
        let distance = offset.length();
        if distance <= step {
            return (*target, true);
        }
        let moved = self.as_vec() + offset.normalize_or_zero() * step;
        (Position::from(moved), false)
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl SimTime {
    /// Advance by one update of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

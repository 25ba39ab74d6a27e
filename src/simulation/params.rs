//! Runtime settings for the simulation
//!
//! `Settings` holds the tunable constants:
//! - gravitational constant and speed ceiling (`gravity`, `speed_limit`),
//! - tree approximation knobs (`theta`, `epsilon`),
//! - body-vector capacity and worker count,
//! - whether bodies record motion trails

use crate::simulation::octree::{DEFAULT_EPSILON, DEFAULT_THETA};
use crate::simulation::parallel;

/// Frame pacing target: one tick every 33 ms.
pub const FRAME_INTERVAL_MS: u64 = 33;

/// Upper bound on the smoothed FPS readout.
pub const FPS_MAX: f64 = 999.9;

/// Blend factor for the smoothed FPS readout.
pub const FPS_SMOOTHING: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct Settings {
    pub gravity: f64,     // gravitational constant G
    pub speed_limit: f64, // speed ceiling C, also the relativistic denominator
    pub theta: f64,       // multipole acceptance threshold (cell width / distance)
    pub epsilon: f64,     // softening length in the force denominator
    pub capacity: usize,  // body-vector allocation capacity
    pub trails: bool,     // record recent positions per body
    pub workers: usize,   // worker threads for the acceleration phase
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity: 67.0,
            speed_limit: 1e4,
            theta: DEFAULT_THETA,
            epsilon: DEFAULT_EPSILON,
            capacity: 1000,
            trails: false,
            workers: parallel::default_workers(),
        }
    }
}

//! Configuration types for loading simulation scenarios from YAML.
//!
//! A scenario names the preset to generate plus the runtime constants the
//! engine starts with. The types here are the thin `serde`-facing layer;
//! [`ScenarioConfig::into_settings`] maps them onto the runtime
//! [`Settings`].
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   system: "orbital_system"   # preset to generate on startup
//!   trails: false              # record per-body motion trails
//!   workers: null              # worker threads; null -> 2x hardware
//!
//! parameters:
//!   gravity: 67.0              # gravitational constant G
//!   speed_limit: 1.0e4         # speed ceiling C
//!   theta: 0.5                 # multipole acceptance threshold
//!   epsilon: 700.0             # softening length
//!   capacity: 1000             # body allocation capacity
//! ```

use serde::Deserialize;

use crate::simulation::params::Settings;
use crate::simulation::systems::SystemType;

/// Engine-level options: which preset to start from and how to run it.
#[derive(Deserialize, Debug)]
pub struct EngineConfig {
    pub system: SystemType,   // preset generated on startup
    pub trails: bool,         // record recent positions per body
    pub workers: Option<usize>, // acceleration worker threads; None -> default
}

/// Numerical and physical constants for a scenario.
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub gravity: f64,     // gravitational constant G
    pub speed_limit: f64, // speed ceiling C
    pub theta: f64,       // multipole acceptance threshold
    pub epsilon: f64,     // softening length
    pub capacity: usize,  // body allocation capacity
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
}

impl ScenarioConfig {
    /// Map the YAML-facing config onto runtime settings.
    pub fn into_settings(self) -> Settings {
        let defaults = Settings::default();
        Settings {
            gravity: self.parameters.gravity,
            speed_limit: self.parameters.speed_limit,
            theta: self.parameters.theta,
            epsilon: self.parameters.epsilon,
            capacity: self.parameters.capacity,
            trails: self.engine.trails,
            workers: self.engine.workers.unwrap_or(defaults.workers),
        }
    }
}

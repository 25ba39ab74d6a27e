pub mod benchmark;
pub mod configuration;
pub mod simulation;
pub mod visualization;

pub use simulation::params::Settings;
pub use simulation::states::Body;
pub use simulation::systems::SystemType;
pub use simulation::vectors::NVec3;
pub use simulation::world::{BodySnapshot, Camera, Simulation, SimulationError};

pub use configuration::config::{EngineConfig, ParametersConfig, ScenarioConfig};

pub use visualization::render::{draw_bodies, Surface};

pub use benchmark::benchmark::{bench_acceleration, bench_parallel};

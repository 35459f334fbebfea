pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{Body, BodyId, IdAllocator, NVec3};
pub use simulation::errors::{Result, SimError};
pub use simulation::params::{HistoryMode, Parameters, SeparationPolicy};
pub use simulation::kepler::{keplerian_to_cartesian, specific_orbital_energy, KeplerianElements};
pub use simulation::forces::{AccelSet, Acceleration, NewtonianGravity};
pub use simulation::history::PoseHistory;
pub use simulation::system::{Observer, PlanetarySystem};
pub use simulation::generator::{Entity, GeneratorConfig, SystemGenerator};
pub use simulation::engine::Engine;
pub use simulation::scenario::Scenario;

pub use configuration::config::{EngineConfig, ParametersConfig, GeneratorSettings, BodyConfig, OrbitConfig, ScenarioConfig};

pub use benchmark::benchmark::{bench_accelerate, bench_predict_path};

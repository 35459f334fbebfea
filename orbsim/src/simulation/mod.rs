pub mod states;
pub mod errors;
pub mod params;
pub mod engine;
pub mod kepler;
pub mod forces;
pub mod integrator;
pub mod history;
pub mod system;
pub mod generator;
pub mod scenario;

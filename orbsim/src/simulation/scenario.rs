//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle:
//! - engine settings (`Engine`)
//! - physical parameters (`Parameters`)
//! - the generator owning the planetary system, either grown procedurally
//!   or filled from the explicit body list

use log::info;

use crate::configuration::config::{BodyConfig, ScenarioConfig};
use crate::simulation::engine::Engine;
use crate::simulation::errors::{Result, SimError};
use crate::simulation::generator::SystemGenerator;
use crate::simulation::kepler::KeplerianElements;
use crate::simulation::params::Parameters;
use crate::simulation::states::{BodyId, NVec3};

#[derive(Debug)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub generator: SystemGenerator,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        let engine = Engine::from_config(&cfg.engine)?;
        let parameters = cfg.parameters.to_parameters();
        parameters.validate()?;

        let gen_cfg = cfg
            .generator
            .as_ref()
            .map(|g| g.to_generator_config())
            .unwrap_or_default();
        let procedural = cfg.generator.is_some();

        let mut generator = SystemGenerator::new(parameters.clone(), gen_cfg)?;

        if procedural {
            generator.randomize_from_config()?;
        }

        // Explicit bodies go on top of (or instead of) the generated ones.
        // `orbit.around` indexes this list, so only earlier bodies qualify.
        let mut placed: Vec<BodyId> = Vec::with_capacity(cfg.bodies.len());
        for (index, bc) in cfg.bodies.iter().enumerate() {
            let id = add_configured_body(&mut generator, &placed, index, bc)?;
            placed.push(id);
        }

        info!(
            "scenario ready: {} bodies, dt = {}, {} steps",
            generator.system().len(),
            engine.dt,
            engine.steps
        );

        Ok(Self {
            engine,
            parameters,
            generator,
        })
    }
}

fn add_configured_body(
    generator: &mut SystemGenerator,
    placed: &[BodyId],
    index: usize,
    bc: &BodyConfig,
) -> Result<BodyId> {
    match &bc.orbit {
        Some(orbit) => {
            let parent = placed.get(orbit.around).copied().ok_or_else(|| {
                SimError::InvalidParameter(format!(
                    "body {index} orbits body {} which is not defined before it",
                    orbit.around
                ))
            })?;
            let elements = KeplerianElements::from_degrees(
                orbit.e,
                orbit.a,
                orbit.i,
                orbit.node,
                orbit.periapsis,
                orbit.anomaly,
            );
            generator.add_planet(bc.m, parent, elements)
        }
        None => {
            let x = bc.x.map(NVec3::from).unwrap_or_else(NVec3::zeros);
            let v = bc.v.map(NVec3::from).unwrap_or_else(NVec3::zeros);
            generator.add_body(bc.m, x, v, bc.stationary)
        }
    }
}

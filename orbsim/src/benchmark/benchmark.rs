use std::time::Instant;

use crate::simulation::errors::Result;
use crate::simulation::generator::{GeneratorConfig, SystemGenerator};
use crate::simulation::params::Parameters;
use crate::simulation::states::NVec3;
use crate::simulation::system::PlanetarySystem;

/// Helper to build a system of `n` bodies on a deterministic spiral
fn make_system(n: usize) -> Result<PlanetarySystem> {
    let mut system = PlanetarySystem::new(Parameters::default())?;
    system.construct_body(10000.0, NVec3::zeros(), NVec3::zeros(), true)?;

    for i in 1..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec3::new(
            (i_f * 0.37).sin() * 50.0 * i_f,
            (i_f * 0.13).cos() * 50.0 * i_f,
            (i_f * 0.07).sin() * 5.0,
        );
        system.construct_body(1.0, x, NVec3::zeros(), false)?;
    }
    Ok(system)
}

/// Time one accelerate + update tick for growing body counts
pub fn bench_accelerate() -> Result<()> {
    let ns = [10, 20, 40, 80, 160, 320, 640];
    let steps = 50; // ticks per size

    println!("N,tick_us");
    for n in ns {
        let mut system = make_system(n)?;

        // Warm up
        system.step(1.0)?;

        let t0 = Instant::now();
        for _ in 0..steps {
            system.step(1.0)?;
        }
        let per_tick = t0.elapsed().as_secs_f64() * 1e6 / steps as f64;

        println!("{},{:.3}", n, per_tick);
    }
    Ok(())
}

/// Time path prediction on generated systems, which clones then integrates
pub fn bench_predict_path() -> Result<()> {
    let counts = [5, 10, 20, 40];
    let steps = 1000; // predicted ticks

    println!("bodies,predict_ms");
    for count in counts {
        let config = GeneratorConfig {
            planet_count: count,
            seed: 42,
            ..GeneratorConfig::default()
        };
        let mut generator = SystemGenerator::new(Parameters::default(), config)?;
        generator.randomize_from_config()?;

        let system = generator.system();
        let target = system.bodies()[system.len() - 1].id();

        let t0 = Instant::now();
        let path = system.predict_path(target, 1.0, steps)?;
        let ms = t0.elapsed().as_secs_f64() * 1000.0;

        println!("{},{:.3} ({} samples)", system.len(), ms, path.len());
    }
    Ok(())
}

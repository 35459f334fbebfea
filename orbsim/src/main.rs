use orbsim::{bench_accelerate, bench_predict_path};
use orbsim::{specific_orbital_energy, BodyId, Scenario, ScenarioConfig};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file inside the crate's `scenarios/` directory
    #[arg(short, default_value = "random_system.yaml")]
    file_name: String,

    /// Override the number of ticks from the scenario
    #[arg(long)]
    steps: Option<usize>,

    /// Print the predicted path of a body after the run, as ID:STEPS
    #[arg(long)]
    predict: Option<String>,

    /// Run the wall-clock benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("failed to open {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;
    Ok(scenario_cfg)
}

fn parse_predict(arg: &str) -> Result<(BodyId, usize)> {
    let Some((id, steps)) = arg.split_once(':') else {
        bail!("--predict expects ID:STEPS, got {arg}");
    };
    let id = id.trim_start_matches('#').parse().context("invalid body id")?;
    let steps = steps.parse().context("invalid step count")?;
    Ok((BodyId(id), steps))
}

/// Total energy plus each body's specific orbital energy around its parent
fn log_diagnostics(scenario: &Scenario, tick: usize) -> Result<()> {
    let generator = &scenario.generator;
    let system = generator.system();
    info!("tick {tick}: total energy {:.6e}", system.total_energy());

    for entity in generator.entities() {
        let Some(parent) = entity.parent else {
            continue;
        };
        let body = system.body(entity.body)?;
        let central = system.body(parent)?;
        let energy = specific_orbital_energy(scenario.parameters.G, central, body)?;
        let state = if energy < 0.0 { "bound" } else { "escaping" };
        info!("  {} around {}: {:.6e} ({state})", entity.body, parent, energy);
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(cfg).context("failed to build scenario")?;
    if let Some(steps) = args.steps {
        scenario.engine.steps = steps;
    }

    let dt = scenario.engine.dt;
    if scenario.engine.warmup {
        scenario.generator.system_mut().warmup(dt)?;
    }

    for tick in 1..=scenario.engine.steps {
        scenario
            .generator
            .system_mut()
            .step(dt)
            .with_context(|| format!("tick {tick} failed"))?;
        if scenario.engine.should_log(tick) {
            log_diagnostics(&scenario, tick)?;
        }
    }

    let system = scenario.generator.system();
    println!("id,m,x,y,z,vx,vy,vz");
    for b in system.bodies() {
        println!(
            "{},{},{},{},{},{},{},{}",
            b.id().0, b.m, b.x.x, b.x.y, b.x.z, b.v.x, b.v.y, b.v.z
        );
    }

    if let Some(arg) = &args.predict {
        let (id, steps) = parse_predict(arg)?;
        let path = system.predict_path(id, dt, steps)?;
        println!("step,x,y,z");
        for (i, p) in path.iter().enumerate() {
            println!("{},{},{},{}", i, p.x, p.y, p.z);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        bench_accelerate()?;
        bench_predict_path()?;
        return Ok(());
    }

    run(&args)
}

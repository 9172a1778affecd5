use nbody::{Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file, looked up in `scenarios/` unless it is an existing path
    #[arg(short, default_value = "sun_and_planet.yaml")]
    file_name: String,

    /// Write the recorded trajectory here as YAML
    #[arg(long)]
    output: Option<PathBuf>,

    /// Run the direct vs Barnes–Hut benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,
}

fn scenario_path(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.is_file() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = scenario_path(file_name);
    let file = File::open(&config_path).with_context(|| format!("opening {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg = ScenarioConfig::from_reader(reader).with_context(|| format!("parsing {}", config_path.display()))?;
    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        nbody::benchmark::benchmark::run_all()?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let scenario = Scenario::build_scenario(scenario_cfg)?;
    info!(
        "{}: {} bodies, {:?} forces, {:?} integrator",
        args.file_name,
        scenario.system.bodies.len(),
        scenario.engine.method,
        scenario.engine.integrator
    );

    let mut sim = scenario.into_simulation()?;
    let trajectory = sim.run()?;

    if let Some(last) = trajectory.last() {
        println!("t = {}", last.t);
        for (i, x) in last.positions.iter().enumerate() {
            println!("body {i}: ({:.6}, {:.6})", x.x, x.y);
        }
    }
    if let Some(d) = trajectory.closest_distance() {
        println!("closest approach: {d:.6}");
    }

    if let Some(path) = args.output {
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        trajectory
            .write_yaml(file)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {} snapshots to {}", trajectory.len(), path.display());
    }

    Ok(())
}

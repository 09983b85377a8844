use clustersim::{ScenarioConfig, Scenario};
use clustersim::{run_2d, run_headless};
use clustersim::{bench_insert, bench_query, bench_tick};

use clap::Parser;
use anyhow::Result;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under the crate's `scenarios/` directory
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run the tree benchmarks instead of the viewer
    #[arg(long)]
    bench: bool,

    /// Run the simulation without a window for this many seconds
    #[arg(long)]
    headless: Option<f64>,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

// bevy installs its own logger in the viewer
fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        init_logger();
        bench_insert();
        bench_query();
        bench_tick();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;

    match args.headless {
        Some(seconds) => {
            init_logger();
            let scenario = Scenario::build_scenario(scenario_cfg);
            run_headless(&scenario, seconds)?;
        }
        None => {
            let scenario = Scenario::build_scenario(scenario_cfg);
            run_2d(scenario)?;
        }
    }

    Ok(())
}

use gravnode::{bench_forces, Scenario, ScenarioConfig, Snapshot};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file, looked up under `scenarios/` when not a path
    #[arg(short, default_value = "solar_system.yaml")]
    file_name: String,

    /// Number of ticks, overriding `parameters.ticks`
    #[arg(short = 'n')]
    ticks: Option<u64>,

    /// Print body states every k ticks
    #[arg(long, default_value_t = 60)]
    every: u64,

    /// Time the force model instead of running a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let direct = PathBuf::from(file_name);
    let config_path = if direct.is_file() {
        direct
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };

    let file = File::open(&config_path)
        .with_context(|| format!("failed to open scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_snapshot(scenario: &Scenario, snap: &Snapshot) {
    for b in &snap.bodies {
        let name = scenario.name_of(b.handle).unwrap_or("-");
        println!(
            "{:6} {:9.4} {:8} {:10.5} {:10.5} {:10.5} {:10.5}",
            snap.tick,
            snap.t,
            name,
            b.x.x,
            b.x.y,
            b.x.z,
            b.x.norm()
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        init_tracing(false);
        bench_forces(&[100, 200, 400, 800, 1600, 3200])?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    init_tracing(scenario_cfg.engine.debug);

    let mut scenario = Scenario::build(scenario_cfg).context("invalid scenario")?;
    let ticks = args.ticks.unwrap_or(scenario.ticks);
    let every = args.every.max(1);

    info!(file = %args.file_name, ticks, "running scenario");
    println!("{:>6} {:>9} {:8} {:>10} {:>10} {:>10} {:>10}", "tick", "t", "body", "x", "y", "z", "|x|");

    for _ in 0..ticks {
        let snap = scenario.simulation.tick().context("tick failed")?;
        if snap.tick % every == 0 || snap.tick == ticks {
            print_snapshot(&scenario, &snap);
        }
    }

    info!(
        ticks = scenario.simulation.tick_count(),
        t = scenario.simulation.time(),
        "scenario finished"
    );
    scenario.simulation.stop();
    Ok(())
}

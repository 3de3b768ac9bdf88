use anyhow::{Context, Result};
use rflock::{ExecutionMode, FlockSimulation, SimulationConfig};
use tracing::info;

const DEMO_TICKS: usize = 300;

fn main() -> Result<()> {
    init_tracing();

    // Optional first argument: path to a JSON SimulationConfig.
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {path}"))?;
            SimulationConfig::from_json(&text)?
        }
        None => SimulationConfig { rng_seed: Some(0x5EED_F10C), ..SimulationConfig::default() },
    };

    for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
        let mut sim = FlockSimulation::new(config.clone())?;
        sim.set_mode(mode);

        let mut last = None;
        for _ in 0..DEMO_TICKS {
            last = Some(sim.step()?);
        }

        if let Some(report) = last {
            info!(
                mode = report.mode.label(),
                agents = sim.len(),
                ticks = DEMO_TICKS,
                average_ms = report.average_ms,
                "finished demo run"
            );
            println!("{report}");
        }
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

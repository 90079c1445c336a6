use tapf_rust::config::{Cli, Config};
use tapf_rust::planner::Planner;
use tapf_rust::scenario::Scenario;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::{error, info, Level};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();
    let cli = Cli::parse();
    let config = Config::new(&cli);
    config.validate()?;

    let scenario = match config.scenario_path.as_ref() {
        Some(path) => Scenario::load_from_file(path)?,
        None => {
            info!("No scenario file specified, generating a random instance");
            let mut rng = StdRng::seed_from_u64(config.seed as u64);
            Scenario::generate_random(
                config.num_agents,
                config.num_jobs,
                config.width,
                config.height,
                config.horizon,
                &mut rng,
            )
        }
    };
    let condition = scenario.into_condition()?;

    let cache_file = (!config.no_cache).then(|| PathBuf::from(&config.cache_path));
    let mut planner = Planner::new(condition, cache_file);

    if let Some(plan) = planner.plan() {
        info!("job assignments: {:?}", plan.agent_jobs);
        info!("idle assignments: {:?}", plan.agent_idle);
        for (agent, legs) in plan.trajectories.iter().enumerate() {
            info!("agent {agent} trajectory: {legs:?}");
        }
    } else {
        error!("planning failed: search space exhausted");
    }

    Ok(())
}

use anyhow::anyhow;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "Rust TAPF",
    about = "Joint transport-job assignment and conflict-based path planning.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(long, help = "Path to the YAML scenario file")]
    pub scenario_path: Option<String>,

    #[arg(
        long,
        help = "Path to the persistent path cache",
        default_value = "path_cache.json"
    )]
    pub cache_path: String,

    #[arg(long, help = "Disable the persistent path cache", default_value_t = false)]
    pub no_cache: bool,

    #[arg(long, help = "Number of agents for random instances", default_value_t = 2)]
    pub num_agents: usize,

    #[arg(long, help = "Number of jobs for random instances", default_value_t = 2)]
    pub num_jobs: usize,

    #[arg(long, help = "Grid width for random instances", default_value_t = 10)]
    pub width: usize,

    #[arg(long, help = "Grid height for random instances", default_value_t = 10)]
    pub height: usize,

    #[arg(long, help = "Time extent of the volume", default_value_t = 51)]
    pub horizon: usize,

    #[arg(
        long,
        help = "Seed for the random number generator",
        default_value_t = 0
    )]
    pub seed: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub scenario_path: Option<String>,
    pub cache_path: String,
    pub no_cache: bool,
    pub num_agents: usize,
    pub num_jobs: usize,
    pub width: usize,
    pub height: usize,
    pub horizon: usize,
    pub seed: usize,
}

impl Config {
    pub fn new(cli: &Cli) -> Self {
        Self {
            scenario_path: cli.scenario_path.clone(),
            cache_path: cli.cache_path.clone(),
            no_cache: cli.no_cache,
            num_agents: cli.num_agents,
            num_jobs: cli.num_jobs,
            width: cli.width,
            height: cli.height,
            horizon: cli.horizon,
            seed: cli.seed,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.scenario_path.is_none() {
            if self.num_agents == 0 {
                return Err(anyhow!("a random instance needs at least one agent"));
            }
            if self.width == 0 || self.height == 0 || self.horizon == 0 {
                return Err(anyhow!(
                    "volume dimensions must be positive, got {}x{}x{}",
                    self.width,
                    self.height,
                    self.horizon
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_volume() {
        let cli = Cli::parse_from(["tapf", "--width", "0"]);
        let config = Config::new(&cli);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_skips_random_checks_with_scenario() {
        let cli = Cli::parse_from(["tapf", "--scenario-path", "demo.yaml", "--width", "0"]);
        let config = Config::new(&cli);
        assert!(config.validate().is_ok());
    }
}

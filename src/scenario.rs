use crate::common::{IdleGoal, Job};
use crate::grid::Grid;
use crate::planner::Condition;

use anyhow::{Context, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSpec {
    pub width: usize,
    pub height: usize,
    pub horizon: usize,
    #[serde(default)]
    pub obstacles: Vec<[usize; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    pub pickup: [usize; 2],
    pub delivery: [usize; 2],
    #[serde(default)]
    pub release: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleGoalSpec {
    pub position: [usize; 2],
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub map: MapSpec,
    pub agents: Vec<[usize; 2]>,
    #[serde(default)]
    pub jobs: Vec<JobSpec>,
    #[serde(default)]
    pub preallocated: Vec<[usize; 2]>,
    #[serde(default)]
    pub idle_goals: Vec<IdleGoalSpec>,
}

impl Scenario {
    pub fn load_from_file(path: &str) -> Result<Scenario> {
        let file = File::open(path).with_context(|| format!("failed to open {path}"))?;
        let reader = BufReader::new(file);
        let scenario = serde_yaml::from_reader(reader)
            .with_context(|| format!("failed to parse scenario {path}"))?;
        Ok(scenario)
    }

    pub fn into_condition(self) -> Result<Condition> {
        let grid = Grid::with_obstacles(
            self.map.width,
            self.map.height,
            self.map.horizon,
            &self
                .map
                .obstacles
                .iter()
                .map(|&[x, y]| (x, y))
                .collect::<Vec<_>>(),
        );
        Condition::new(
            self.agents.iter().map(|&[x, y]| (x, y)).collect(),
            self.jobs
                .iter()
                .map(|job| Job {
                    pickup: (job.pickup[0], job.pickup[1]),
                    delivery: (job.delivery[0], job.delivery[1]),
                    release: job.release,
                })
                .collect(),
            self.preallocated.iter().map(|&[a, j]| (a, j)).collect(),
            self.idle_goals
                .iter()
                .map(|goal| IdleGoal {
                    position: (goal.position[0], goal.position[1]),
                    mean: goal.mean,
                    std_dev: goal.std_dev,
                })
                .collect(),
            grid,
        )
    }

    /// A random obstacle-free instance on the given volume. Agents, job
    /// endpoints and idle goals land on distinct cells; one idle goal is laid
    /// out per agent so the instance always has a full cover.
    pub fn generate_random<R: Rng + ?Sized>(
        num_agents: usize,
        num_jobs: usize,
        width: usize,
        height: usize,
        horizon: usize,
        rng: &mut R,
    ) -> Scenario {
        let mut cells: Vec<[usize; 2]> = (0..width)
            .flat_map(|x| (0..height).map(move |y| [x, y]))
            .collect();
        cells.shuffle(rng);
        assert!(
            cells.len() >= num_agents * 2 + num_jobs * 2,
            "volume too small for the requested instance"
        );

        let mut cells = cells.into_iter();
        let agents: Vec<[usize; 2]> = cells.by_ref().take(num_agents).collect();
        let jobs: Vec<JobSpec> = (0..num_jobs)
            .map(|_| JobSpec {
                pickup: cells.next().unwrap(),
                delivery: cells.next().unwrap(),
                release: -rng.gen_range(0..5),
            })
            .collect();
        let idle_goals: Vec<IdleGoalSpec> = (0..num_agents)
            .map(|_| IdleGoalSpec {
                position: cells.next().unwrap(),
                mean: (horizon / 2) as f64,
                std_dev: 3.0,
            })
            .collect();

        let scenario = Scenario {
            map: MapSpec {
                width,
                height,
                horizon,
                obstacles: Vec::new(),
            },
            agents,
            jobs,
            preallocated: Vec::new(),
            idle_goals,
        };
        info!("Generate scen: {scenario:?}");
        scenario
    }
}

mod collision;
mod cost;
mod heuristic;
mod problem;
mod reconstruct;
mod state;
mod successor;

pub use problem::goal_test;
pub use state::{unassigned, Block, Condition, State, Unassigned};

use crate::cache::PathCache;
use crate::common::Plan;
use crate::search::best_first;
use crate::stat::Stats;

use problem::Allocation;
use reconstruct::reconstruct_paths;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// One planning call: joint job/idle allocation and conflict-free trajectory
/// construction over a single immutable condition.
///
/// The path cache is loaded when the planner is built and flushed after every
/// `plan` call. Planners running concurrently against the same store file are
/// not synchronized; the last writer wins.
pub struct Planner {
    condition: Condition,
    cache: PathCache,
    cache_file: Option<PathBuf>,
    stats: Stats,
}

impl Planner {
    pub fn new(condition: Condition, cache_file: Option<PathBuf>) -> Self {
        let cache = match cache_file.as_deref() {
            Some(path) => PathCache::load(path),
            None => PathCache::new(),
        };
        Planner {
            condition,
            cache,
            cache_file,
            stats: Stats::default(),
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Solve the condition from scratch. Returns `None` when the assignment
    /// space is exhausted without a conflict-free full cover; no partial
    /// result is produced.
    pub fn plan(&mut self) -> Option<Plan> {
        let solve_start_time = Instant::now();
        let root = State::root(&self.condition.preallocated);
        debug!("root state {root:?}");

        let mut allocation = Allocation {
            condition: &self.condition,
            cache: &mut self.cache,
            stats: &mut self.stats,
        };
        let solution = best_first(&mut allocation, root);

        let plan = solution.and_then(|(goal, cost)| {
            let trajectories =
                reconstruct_paths(&self.condition, &goal, &mut self.cache, &mut self.stats)?;
            Some(Plan {
                agent_jobs: goal.agent_jobs,
                agent_idle: goal.agent_idle,
                trajectories,
                cost,
            })
        });

        if let Some(path) = &self.cache_file {
            self.cache.save(path);
            info!("path cache flushed: {} entries", self.cache.len());
        }

        self.stats.time_us = solve_start_time.elapsed().as_micros() as usize;
        if let Some(plan) = &plan {
            self.stats.cost = plan.cost;
        }
        self.stats.print();
        plan
    }
}

use crate::common::{IdleGoal, Job, Position, Waypoint};
use crate::grid::Grid;

use anyhow::{anyhow, Result};

/// The immutable per-call problem input.
#[derive(Debug, Clone)]
pub struct Condition {
    pub agent_pos: Vec<Position>,
    pub jobs: Vec<Job>,
    /// (agent index, job index) pairs already committed before the call.
    pub preallocated: Vec<(usize, usize)>,
    pub idle_goals: Vec<IdleGoal>,
    pub grid: Grid,
}

impl Condition {
    pub fn new(
        agent_pos: Vec<Position>,
        jobs: Vec<Job>,
        preallocated: Vec<(usize, usize)>,
        idle_goals: Vec<IdleGoal>,
        grid: Grid,
    ) -> Result<Self> {
        for &position in &agent_pos {
            if !grid.contains(position) {
                return Err(anyhow!("agent position {position:?} outside the grid"));
            }
        }
        for job in &jobs {
            if !grid.contains(job.pickup) || !grid.contains(job.delivery) {
                return Err(anyhow!("job endpoints {job:?} outside the grid"));
            }
        }
        for &(agent, job) in &preallocated {
            if agent >= agent_pos.len() || job >= jobs.len() {
                return Err(anyhow!("preallocation ({agent}, {job}) out of range"));
            }
        }
        for goal in &idle_goals {
            if !grid.contains(goal.position) {
                return Err(anyhow!("idle goal {goal:?} outside the grid"));
            }
            if goal.std_dev <= 0.0 {
                return Err(anyhow!(
                    "idle goal {goal:?} must have a positive standard deviation"
                ));
            }
        }
        Ok(Condition {
            agent_pos,
            jobs,
            preallocated,
            idle_goals,
            grid,
        })
    }
}

/// A blocking constraint: either a hard single-agent exclusion from one
/// space-time cell, or an unresolved conflict between two named agents there,
/// pending a split.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Block {
    Exclusion { point: Waypoint, agent: usize },
    Conflict { point: Waypoint, agents: (usize, usize) },
}

/// One search state: a partial assignment plus the blocking constraints
/// accumulated on the way here. States are values; children are new states,
/// never in-place edits of a parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct State {
    /// Agent index -> ordered job sequence.
    pub agent_jobs: Vec<(usize, Vec<usize>)>,
    /// (agent index, idle goal index) pairs.
    pub agent_idle: Vec<(usize, usize)>,
    pub blocked: Vec<Block>,
}

impl State {
    /// The search root: preallocated jobs are already committed, everything
    /// else is open.
    pub fn root(preallocated: &[(usize, usize)]) -> Self {
        let mut agent_jobs: Vec<(usize, Vec<usize>)> = Vec::new();
        for &(agent, job) in preallocated {
            match agent_jobs.iter_mut().find(|(a, _)| *a == agent) {
                Some((_, sequence)) => sequence.push(job),
                None => agent_jobs.push((agent, vec![job])),
            }
        }
        State {
            agent_jobs,
            agent_idle: Vec::new(),
            blocked: Vec::new(),
        }
    }

    pub fn job_sequence(&self, agent: usize) -> Option<&[usize]> {
        self.agent_jobs
            .iter()
            .find(|(a, _)| *a == agent)
            .map(|(_, sequence)| sequence.as_slice())
    }

    pub fn idle_goal(&self, agent: usize) -> Option<usize> {
        self.agent_idle
            .iter()
            .find(|(a, _)| *a == agent)
            .map(|&(_, goal)| goal)
    }

    pub fn has_unresolved_conflict(&self) -> bool {
        self.blocked
            .iter()
            .any(|block| matches!(block, Block::Conflict { .. }))
    }

    /// Hard exclusions in force for one agent, in blocking-set order. The
    /// order matters: it is part of the path-cache key.
    pub fn exclusions_for(&self, agent: usize) -> Vec<Waypoint> {
        self.blocked
            .iter()
            .filter_map(|block| match block {
                Block::Exclusion { point, agent: a } if *a == agent => Some(*point),
                _ => None,
            })
            .collect()
    }
}

/// The condition sets with everything already referenced by `state` removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unassigned {
    pub agents: Vec<usize>,
    pub jobs: Vec<usize>,
    pub idle_goals: Vec<usize>,
}

pub fn unassigned(condition: &Condition, state: &State) -> Unassigned {
    let mut agents: Vec<usize> = (0..condition.agent_pos.len()).collect();
    let mut jobs: Vec<usize> = (0..condition.jobs.len()).collect();
    let mut idle_goals: Vec<usize> = (0..condition.idle_goals.len()).collect();

    for (agent, sequence) in &state.agent_jobs {
        agents.retain(|a| a != agent);
        jobs.retain(|job| !sequence.contains(job));
    }
    for &(agent, goal) in &state.agent_idle {
        agents.retain(|&a| a != agent);
        idle_goals.retain(|&g| g != goal);
    }

    Unassigned {
        agents,
        jobs,
        idle_goals,
    }
}

use crate::cache::PathCache;
use crate::planner::{cost, heuristic, successor};
use crate::planner::state::{Condition, State};
use crate::search::Problem;
use crate::stat::Stats;

/// The allocation problem as the generic search driver sees it: successor
/// generation, incremental cost, remaining-cost estimate, and the goal
/// predicate, all closed over one immutable condition and the shared path
/// cache.
pub(crate) struct Allocation<'a> {
    pub(crate) condition: &'a Condition,
    pub(crate) cache: &'a mut PathCache,
    pub(crate) stats: &'a mut Stats,
}

impl Problem for Allocation<'_> {
    type State = State;

    fn successors(&mut self, state: &State) -> Vec<State> {
        self.stats.expanded_states += 1;
        successor::children(self.condition, state)
    }

    fn evaluate(&mut self, state: State) -> (f64, State) {
        cost::evaluate(self.condition, self.cache, self.stats, state)
    }

    fn estimate(&mut self, state: &State) -> f64 {
        heuristic::estimate(self.condition, self.cache, state)
    }

    fn is_goal(&self, state: &State) -> bool {
        goal_test(self.condition, state)
    }
}

/// True iff every agent holds exactly one assignment, every job is covered,
/// and no blocking entry is an unresolved two-agent conflict.
pub fn goal_test(condition: &Condition, state: &State) -> bool {
    let assigned_jobs: usize = state
        .agent_jobs
        .iter()
        .map(|(_, sequence)| sequence.len())
        .sum();

    state.agent_jobs.len() + state.agent_idle.len() == condition.agent_pos.len()
        && assigned_jobs == condition.jobs.len()
        && !state.has_unresolved_conflict()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{IdleGoal, Job};
    use crate::grid::Grid;
    use crate::planner::state::Block;

    fn condition() -> Condition {
        Condition::new(
            vec![(0, 0), (5, 5)],
            vec![Job {
                pickup: (0, 1),
                delivery: (0, 5),
                release: 0,
            }],
            Vec::new(),
            vec![IdleGoal {
                position: (9, 9),
                mean: 10.0,
                std_dev: 2.0,
            }],
            Grid::open(10, 10, 51),
        )
        .unwrap()
    }

    #[test]
    fn test_goal_requires_full_coverage() {
        let condition = condition();
        let mut state = State::root(&[]);
        assert!(!goal_test(&condition, &state));

        state.agent_jobs.push((0, vec![0]));
        assert!(!goal_test(&condition, &state));

        state.agent_idle.push((1, 0));
        assert!(goal_test(&condition, &state));
    }

    #[test]
    fn test_goal_rejects_unresolved_conflicts() {
        let condition = condition();
        let mut state = State::root(&[]);
        state.agent_jobs.push((0, vec![0]));
        state.agent_idle.push((1, 0));
        state.blocked.push(Block::Conflict {
            point: (1, 1, 1),
            agents: (0, 1),
        });
        assert!(!goal_test(&condition, &state));

        // A resolved split is fine.
        state.blocked[0] = Block::Exclusion {
            point: (1, 1, 1),
            agent: 0,
        };
        assert!(goal_test(&condition, &state));
    }
}

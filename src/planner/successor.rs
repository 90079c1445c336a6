use crate::planner::state::{unassigned, Block, Condition, State};

use tracing::debug;

/// Expand one state.
///
/// While the blocking set holds an unresolved two-agent conflict, assignment
/// is put on hold and the conflict is split: two children identical to the
/// parent except every conflict entry becomes a hard exclusion -- on the
/// conflict's first agent in one child, on its second agent in the other.
/// The branches explore "A avoids this cell at this time" against "B avoids
/// it" separately, the way conflict-based search resolves contention.
///
/// Otherwise the assignment is extended: one child per (open job, agent)
/// pair while jobs remain, then one child per open agent taking the first
/// open idle goal, and no children once everything is covered.
pub fn children(condition: &Condition, state: &State) -> Vec<State> {
    if state.has_unresolved_conflict() {
        return split_conflicts(state);
    }

    let free = unassigned(condition, state);
    if !free.jobs.is_empty() {
        let mut result = Vec::new();
        for &job in &free.jobs {
            // Every agent is a candidate, assigned or not; the cost and the
            // estimate rank the siblings.
            for agent in 0..condition.agent_pos.len() {
                let mut child = state.clone();
                match child.agent_jobs.iter_mut().find(|(a, _)| *a == agent) {
                    Some((_, sequence)) => sequence.push(job),
                    None => child.agent_jobs.push((agent, vec![job])),
                }
                result.push(child);
            }
        }
        debug!("{} assignment children", result.len());
        result
    } else if !free.idle_goals.is_empty() {
        let goal = free.idle_goals[0];
        free.agents
            .iter()
            .map(|&agent| {
                let mut child = state.clone();
                child.agent_idle.push((agent, goal));
                child
            })
            .collect()
    } else {
        Vec::new()
    }
}

fn split_conflicts(state: &State) -> Vec<State> {
    let mut first = state.clone();
    let mut second = state.clone();

    for (i, block) in state.blocked.iter().enumerate() {
        if let Block::Conflict { point, agents } = block {
            first.blocked[i] = Block::Exclusion {
                point: *point,
                agent: agents.0,
            };
            second.blocked[i] = Block::Exclusion {
                point: *point,
                agent: agents.1,
            };
        }
    }

    vec![first, second]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{IdleGoal, Job};
    use crate::grid::Grid;

    fn condition(n_jobs: usize, n_idle: usize) -> Condition {
        let jobs = (0..n_jobs)
            .map(|i| Job {
                pickup: (i, 0),
                delivery: (i, 4),
                release: 0,
            })
            .collect();
        let idle_goals = (0..n_idle)
            .map(|i| IdleGoal {
                position: (9, i),
                mean: 8.0,
                std_dev: 2.0,
            })
            .collect();
        Condition::new(
            vec![(0, 0), (5, 5)],
            jobs,
            Vec::new(),
            idle_goals,
            Grid::open(10, 10, 51),
        )
        .unwrap()
    }

    #[test]
    fn test_job_children_cover_all_pairs() {
        let condition = condition(2, 0);
        let state = State::root(&[]);
        let result = children(&condition, &state);
        // 2 open jobs x 2 agents.
        assert_eq!(result.len(), 4);
        for child in &result {
            let assigned: usize = child.agent_jobs.iter().map(|(_, s)| s.len()).sum();
            assert_eq!(assigned, 1);
        }
    }

    #[test]
    fn test_job_appends_to_existing_sequence() {
        let condition = condition(2, 0);
        let mut state = State::root(&[]);
        state.agent_jobs.push((0, vec![0]));
        let result = children(&condition, &state);
        // Only job 1 is open, for both agents.
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].job_sequence(0), Some(&[0, 1][..]));
        assert_eq!(result[1].job_sequence(0), Some(&[0][..]));
        assert_eq!(result[1].job_sequence(1), Some(&[1][..]));
    }

    #[test]
    fn test_idle_children_after_jobs_are_covered() {
        let condition = condition(1, 2);
        let mut state = State::root(&[]);
        state.agent_jobs.push((1, vec![0]));
        let result = children(&condition, &state);
        // Agent 0 is the only open agent; it takes the first open idle goal.
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].idle_goal(0), Some(0));
    }

    #[test]
    fn test_no_children_when_fully_assigned() {
        let condition = condition(1, 1);
        let mut state = State::root(&[]);
        state.agent_jobs.push((0, vec![0]));
        state.agent_idle.push((1, 0));
        assert!(children(&condition, &state).is_empty());
    }

    #[test]
    fn test_conflict_split_produces_two_exclusion_children() {
        let condition = condition(2, 0);
        let mut state = State::root(&[]);
        state.agent_jobs.push((0, vec![0]));
        state.agent_jobs.push((1, vec![1]));
        state.blocked.push(Block::Exclusion {
            point: (4, 4, 4),
            agent: 1,
        });
        state.blocked.push(Block::Conflict {
            point: (2, 2, 3),
            agents: (1, 0),
        });

        let result = children(&condition, &state);
        assert_eq!(result.len(), 2);

        // Assignments are untouched; only the conflict entry differs.
        for child in &result {
            assert_eq!(child.agent_jobs, state.agent_jobs);
            assert_eq!(child.blocked.len(), 2);
            assert_eq!(child.blocked[0], state.blocked[0]);
            assert!(!child.has_unresolved_conflict());
        }
        assert_eq!(
            result[0].blocked[1],
            Block::Exclusion {
                point: (2, 2, 3),
                agent: 1
            }
        );
        assert_eq!(
            result[1].blocked[1],
            Block::Exclusion {
                point: (2, 2, 3),
                agent: 0
            }
        );
    }
}

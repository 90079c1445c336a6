use crate::cache::PathCache;
use crate::planner::collision::find_collision;
use crate::planner::reconstruct::reconstruct_paths;
use crate::planner::state::{Block, Condition, State};
use crate::stat::Stats;

use tracing::debug;

/// Charge for the state's most recent assignment and lazily surface the first
/// collision the reconstructed trajectories expose.
///
/// Exactly one agent is billed per evaluation: the first one (by index)
/// carrying an assignment. For a job sequence the billed legs alternate with
/// the sequence layout -- odd leg positions when the first job is
/// preallocated, even positions otherwise -- each contributing its arrival
/// time. An idle assignment is billed `reclaim probability x travel time`.
/// The search driver accumulates these charges along the root-to-state path.
///
/// If a collision is found it is appended to the returned state's blocking
/// set as an unresolved two-agent conflict; this is how conflicts enter the
/// search, only once a concrete trajectory set makes them observable.
pub fn evaluate(
    condition: &Condition,
    cache: &mut PathCache,
    stats: &mut Stats,
    state: State,
) -> (f64, State) {
    let Some(paths) = reconstruct_paths(condition, &state, cache, stats) else {
        // A required leg is unreachable; the branch is unusable.
        return (f64::INFINITY, state);
    };

    let mut cost = 0.0;
    for agent in 0..condition.agent_pos.len() {
        if let Some(sequence) = state.job_sequence(agent) {
            let legs = &paths[agent];
            let preallocated_first = sequence
                .first()
                .is_some_and(|&job| condition.preallocated.contains(&(agent, job)));
            if preallocated_first {
                assert!(
                    legs.len() % 2 == 1,
                    "a preallocated first job must leave an odd leg count"
                );
                for leg in legs.iter().skip(1).step_by(2) {
                    cost += leg.last().unwrap().2 as f64;
                }
            } else {
                assert!(
                    legs.len() % 2 == 0,
                    "alternating pickup and delivery legs must leave an even leg count"
                );
                for leg in legs.iter().step_by(2) {
                    cost += leg.last().unwrap().2 as f64;
                }
            }
            break;
        }
        if let Some(goal_index) = state.idle_goal(agent) {
            let legs = &paths[agent];
            assert_eq!(legs.len(), 1, "an idle agent carries exactly one leg");
            let duration = legs[0].last().unwrap().2;
            let probability = condition.idle_goals[goal_index].reclaim_probability(duration);
            cost += probability * duration as f64;
            break;
        }
    }

    let mut state = state;
    if let Some((point, agents)) = find_collision(&paths) {
        debug!("collision at {point:?} between agents {agents:?}");
        state.blocked.push(Block::Conflict { point, agents });
    }
    (cost, state)
}

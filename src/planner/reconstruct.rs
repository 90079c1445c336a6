use crate::cache::{CachedPath, PathCache};
use crate::common::{Leg, Position, Waypoint};
use crate::planner::state::{Condition, State};
use crate::stat::Stats;

/// Rebuild every agent's trajectory legs for one assignment state. Returns
/// `None` when a required leg is unreachable; the caller treats that branch as
/// effectively infinite cost.
///
/// An agent with job assignments walks its sequence: a preallocated first job
/// contributes only the pickup-to-delivery leg, every other job contributes
/// the trip to its pickup followed by the pickup-to-delivery leg. Legs are
/// computed on a local clock starting at 0 and shifted to start one step after
/// the predecessor ends. An idle-assigned agent contributes a single leg; an
/// agent with neither assignment contributes none.
pub fn reconstruct_paths(
    condition: &Condition,
    state: &State,
    cache: &mut PathCache,
    stats: &mut Stats,
) -> Option<Vec<Vec<Leg>>> {
    let mut paths = Vec::with_capacity(condition.agent_pos.len());

    for agent in 0..condition.agent_pos.len() {
        let block = state.exclusions_for(agent);
        let mut legs: Vec<Leg> = Vec::new();

        if let Some(sequence) = state.job_sequence(agent) {
            assert!(
                state.idle_goal(agent).is_none(),
                "agent {agent} holds both a job and an idle assignment"
            );

            let mut pose = condition.agent_pos[agent];
            let mut t_shift = 0;
            for (i, &job_index) in sequence.iter().enumerate() {
                let job = &condition.jobs[job_index];
                if i == 0 && condition.preallocated.contains(&(agent, job_index)) {
                    // Already committed: the agent travels to the delivery only.
                    let leg = require(cache.find_path(
                        &condition.grid,
                        pose,
                        job.delivery,
                        &block,
                        stats,
                    ))?;
                    legs.push(timeshift_leg(leg, t_shift));
                } else {
                    if let Some(last) = legs.last() {
                        (pose, t_shift) = last_pose_and_time(last);
                    }
                    let pickup_leg = require(cache.find_path(
                        &condition.grid,
                        pose,
                        job.pickup,
                        &block,
                        stats,
                    ))?;
                    let pickup_end = pickup_leg.last().unwrap().2;
                    legs.push(timeshift_leg(pickup_leg, t_shift));

                    // Exclusions past the pickup's local end, re-based to the
                    // delivery leg's own clock.
                    let rebased: Vec<Waypoint> = block
                        .iter()
                        .filter(|&&(_, _, t)| t > pickup_end)
                        .map(|&(x, y, t)| (x, y, t - pickup_end))
                        .collect();
                    let (_, delivery_shift) = last_pose_and_time(legs.last().unwrap());
                    let delivery_leg = require(cache.find_path(
                        &condition.grid,
                        job.pickup,
                        job.delivery,
                        &rebased,
                        stats,
                    ))?;
                    legs.push(timeshift_leg(delivery_leg, delivery_shift));
                }
            }
        } else if let Some(goal_index) = state.idle_goal(agent) {
            let leg = require(cache.find_path(
                &condition.grid,
                condition.agent_pos[agent],
                condition.idle_goals[goal_index].position,
                &block,
                stats,
            ))?;
            legs.push(leg);
        }

        paths.push(legs);
    }

    assert_eq!(
        paths.len(),
        condition.agent_pos.len(),
        "one leg sequence per agent"
    );
    Some(paths)
}

fn require(result: CachedPath) -> Option<Leg> {
    match result {
        CachedPath::Found(leg) => Some(leg),
        CachedPath::Unreachable => None,
    }
}

fn timeshift_leg(leg: Leg, t: usize) -> Leg {
    assert_eq!(leg[0].2, 0, "leg must start its local clock at zero");
    leg.into_iter().map(|(x, y, lt)| (x, y, lt + t)).collect()
}

fn last_pose_and_time(leg: &Leg) -> (Position, usize) {
    let &(x, y, t) = leg.last().unwrap();
    ((x, y), t + 1)
}

use crate::cache::{CachedPath, PathCache};
use crate::common::distance_manhattan;
use crate::planner::state::{unassigned, Condition, State};

/// Fast lower-bound style estimate of the remaining assignment cost.
///
/// Preallocated jobs still open in this state contribute the Manhattan
/// distance from their agent to the delivery. Every other open job is
/// weighted by its squared cached duration when a pickup-to-delivery path is
/// already known (favoring short, already explored jobs), falling back to the
/// raw pickup-to-delivery Manhattan distance. The smallest `k` weights are
/// summed, `k` being the number of agents still without an assignment. Agents
/// beyond the open job count would take idle goals; their share is left at
/// zero, which keeps the estimate conservative.
pub fn estimate(condition: &Condition, cache: &PathCache, state: &State) -> f64 {
    let free = unassigned(condition, state);
    if free.agents.is_empty() {
        return 0.0;
    }

    let mut cost = 0.0;
    let mut weights: Vec<f64> = Vec::new();
    for &job_index in &free.jobs {
        let job = &condition.jobs[job_index];
        match condition
            .preallocated
            .iter()
            .find(|&&(_, j)| j == job_index)
        {
            Some(&(agent, _)) => {
                cost += distance_manhattan(condition.agent_pos[agent], job.delivery) as f64;
            }
            None => match cache.lookup(job.pickup, job.delivery, &[]) {
                Some(CachedPath::Found(leg)) => {
                    let duration = (leg.len() - 1) as f64;
                    weights.push(duration * duration);
                }
                _ => weights.push(distance_manhattan(job.pickup, job.delivery) as f64),
            },
        }
    }

    weights.sort_by(f64::total_cmp);
    cost + weights.iter().take(free.agents.len()).sum::<f64>()
}

use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

/// The search-facing view of a planning problem. The driver below is generic:
/// it only ever sees states through these four operations.
///
/// `evaluate` takes the state by value and returns it possibly updated, since
/// costing a state may discover new information that must travel with it (a
/// freshly observed conflict). The returned value is the per-step charge; the
/// driver accumulates charges along the root-to-state path.
pub trait Problem {
    type State: Clone + Ord;

    fn successors(&mut self, state: &Self::State) -> Vec<Self::State>;
    fn evaluate(&mut self, state: Self::State) -> (f64, Self::State);
    fn estimate(&mut self, state: &Self::State) -> f64;
    fn is_goal(&self, state: &Self::State) -> bool;
}

#[derive(Clone, Debug)]
struct OpenNode<S> {
    total: f64,
    cost: f64,
    state: S,
}

impl<S: Ord> Ord for OpenNode<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total
            .total_cmp(&other.total)
            .then_with(|| self.cost.total_cmp(&other.cost))
            // States must participate in the order so the open set stays
            // deterministic under cost ties.
            .then_with(|| self.state.cmp(&other.state))
    }
}

impl<S: Ord> PartialOrd for OpenNode<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: Ord> PartialEq for OpenNode<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S: Ord> Eq for OpenNode<S> {}

/// Best-first search over `problem` starting at `start`. Explores states in
/// nondecreasing accumulated-cost-plus-estimate order and returns the first
/// state satisfying the goal predicate together with its accumulated cost, or
/// `None` once the state space is exhausted.
pub fn best_first<P: Problem>(problem: &mut P, start: P::State) -> Option<(P::State, f64)> {
    let mut open_list = BTreeSet::new();
    let mut closed_list: BTreeSet<P::State> = BTreeSet::new();

    let (start_cost, start) = problem.evaluate(start);
    let start_estimate = problem.estimate(&start);
    open_list.insert(OpenNode {
        total: start_cost + start_estimate,
        cost: start_cost,
        state: start,
    });

    while let Some(current) = open_list.pop_first() {
        if closed_list.contains(&current.state) {
            continue;
        }
        if problem.is_goal(&current.state) {
            debug!("goal reached with accumulated cost {}", current.cost);
            return Some((current.state, current.cost));
        }
        closed_list.insert(current.state.clone());

        for child in problem.successors(&current.state) {
            let (step_cost, child) = problem.evaluate(child);
            if closed_list.contains(&child) {
                continue;
            }
            let cost = current.cost + step_cost;
            let estimate = problem.estimate(&child);
            open_list.insert(OpenNode {
                total: cost + estimate,
                cost,
                state: child,
            });
        }
    }

    None
}

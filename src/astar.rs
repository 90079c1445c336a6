use crate::common::{distance_manhattan, Position, Waypoint};
use crate::grid::Grid;

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::trace;

#[derive(Clone, Eq, PartialEq, Debug)]
struct OpenNode {
    f_cost: usize,
    time: usize,
    position: Position,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .cmp(&other.f_cost)
            .then_with(|| self.time.cmp(&other.time))
            .then_with(|| self.position.cmp(&other.position))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest timed path on the time-expanded volume, from `start` at t = 0 to
/// the first arrival at `goal`. Moves are the four neighbors plus waiting, one
/// time step each; expansion is bounded by the volume's time extent. Returns
/// `None` if the goal cannot be reached within the horizon.
pub fn find_path(grid: &Grid, start: Position, goal: Position) -> Option<Vec<Waypoint>> {
    if !grid.contains(start) || !grid.contains(goal) || !grid.is_free(start.0, start.1, 0) {
        return None;
    }

    let mut open_list = BTreeSet::new();
    let mut discovered = HashSet::new();
    let mut trace_map: HashMap<(Position, usize), (Position, usize)> = HashMap::new();

    open_list.insert(OpenNode {
        f_cost: distance_manhattan(start, goal),
        time: 0,
        position: start,
    });
    discovered.insert((start, 0));

    while let Some(current) = open_list.pop_first() {
        if current.position == goal {
            return Some(construct_path(&trace_map, (current.position, current.time)));
        }

        // Time step increases as we move to the next node.
        let next_time = current.time + 1;
        if next_time >= grid.horizon() {
            continue;
        }

        for &neighbor in &grid.neighbors(current.position) {
            if discovered.contains(&(neighbor, next_time)) {
                continue;
            }
            if !grid.is_free(neighbor.0, neighbor.1, next_time) {
                continue;
            }

            discovered.insert((neighbor, next_time));
            trace_map.insert((neighbor, next_time), (current.position, current.time));
            open_list.insert(OpenNode {
                f_cost: next_time + distance_manhattan(neighbor, goal),
                time: next_time,
                position: neighbor,
            });
        }
        trace!("open list {open_list:?}");
    }

    None
}

fn construct_path(
    trace_map: &HashMap<(Position, usize), (Position, usize)>,
    mut current: (Position, usize),
) -> Vec<Waypoint> {
    let mut path = vec![(current.0 .0, current.0 .1, current.1)];
    while let Some(&(position, time)) = trace_map.get(&current) {
        path.push((position.0, position.1, time));
        current = (position, time);
    }
    path.reverse();
    path
}

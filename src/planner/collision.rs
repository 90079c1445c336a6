use crate::common::{Leg, Waypoint};

use std::collections::HashMap;

/// First shared space-time point across all agents' trajectory legs, scanning
/// agents in index order and legs in order. Reports the point together with
/// (later agent, earlier agent). Only exact (x, y, t) equality counts; agents
/// swapping cells between consecutive time steps are not detected.
pub fn find_collision(paths: &[Vec<Leg>]) -> Option<(Waypoint, (usize, usize))> {
    let mut seen: HashMap<Waypoint, usize> = HashMap::new();

    for (agent, legs) in paths.iter().enumerate() {
        for leg in legs {
            for &point in leg {
                match seen.get(&point) {
                    Some(&earlier) => return Some((point, (agent, earlier))),
                    None => {
                        seen.insert(point, agent);
                    }
                }
            }
        }
    }

    None
}

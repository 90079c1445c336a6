use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// A 2D grid cell.
pub type Position = (usize, usize);

/// A space-time point (x, y, t).
pub type Waypoint = (usize, usize, usize);

/// One uninterrupted timed sub-trip, e.g. agent to pickup. A freshly computed
/// leg starts its local clock at t = 0.
pub type Leg = Vec<Waypoint>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Job {
    pub pickup: Position,
    pub delivery: Position,
    /// Release-time offset; negative means the job has already been waiting.
    pub release: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdleGoal {
    pub position: Position,
    /// Mean of the time until this parking spot is needed again.
    pub mean: f64,
    pub std_dev: f64,
}

impl IdleGoal {
    /// Cumulative probability that the spot is reclaimed at or before `duration`.
    pub fn reclaim_probability(&self, duration: usize) -> f64 {
        let normal = Normal::new(self.mean, self.std_dev)
            .expect("distribution parameters are validated on construction");
        normal.cdf(duration as f64)
    }
}

/// Result of one planning call: final assignments plus the per-agent
/// reconstructed trajectory legs.
#[derive(Debug, Clone)]
pub struct Plan {
    pub agent_jobs: Vec<(usize, Vec<usize>)>,
    pub agent_idle: Vec<(usize, usize)>,
    pub trajectories: Vec<Vec<Leg>>,
    pub cost: f64,
}

pub fn distance_manhattan(a: Position, b: Position) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_manhattan() {
        assert_eq!(distance_manhattan((0, 0), (3, 4)), 7);
        assert_eq!(distance_manhattan((3, 4), (0, 0)), 7);
        assert_eq!(distance_manhattan((2, 2), (2, 2)), 0);
    }

    #[test]
    fn test_reclaim_probability_bounds() {
        let goal = IdleGoal {
            position: (0, 0),
            mean: 5.0,
            std_dev: 1.0,
        };
        let early = goal.reclaim_probability(3);
        let at_mean = goal.reclaim_probability(5);
        let late = goal.reclaim_probability(9);
        assert!(early < 0.5);
        assert!((at_mean - 0.5).abs() < 1e-9);
        assert!(late > 0.99);
    }
}

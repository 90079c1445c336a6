use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub cost: f64,
    pub time_us: usize,
    pub expanded_states: usize,
    pub pathfinder_calls: usize,
    pub cache_hits: usize,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Cost {:?} Time(microseconds) {:?} Expanded states number: {:?} Pathfinder calls number {:?} Cache hits number {:?}",
            self.cost, self.time_us, self.expanded_states, self.pathfinder_calls, self.cache_hits
        );
    }
}

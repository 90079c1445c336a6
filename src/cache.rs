use crate::astar;
use crate::common::{Leg, Position, Waypoint};
use crate::grid::Grid;
use crate::stat::Stats;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// Memoization key for one single-agent query: where from, where to, and the
/// exact ordered list of space-time exclusions in force for that agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathKey {
    pub start: Position,
    pub goal: Position,
    pub exclusions: Vec<Waypoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CachedPath {
    Found(Leg),
    Unreachable,
}

/// Memoized adapter around the single-agent pathfinder, persisted across
/// planning calls. Concurrent planning calls sharing one store file are not
/// synchronized: the last writer wins.
#[derive(Debug, Default)]
pub struct PathCache {
    entries: HashMap<PathKey, CachedPath>,
}

impl PathCache {
    pub fn new() -> Self {
        PathCache::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a persisted store. A missing or corrupt file is not fatal; the
    /// cache simply starts empty.
    pub fn load(path: &Path) -> Self {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                warn!("WARN: cache file {path:?} could not be opened: {err}");
                return PathCache::new();
            }
        };
        let entries: Vec<(PathKey, CachedPath)> = match serde_json::from_reader(BufReader::new(file))
        {
            Ok(entries) => entries,
            Err(err) => {
                warn!("WARN: cache file {path:?} could not be parsed: {err}");
                return PathCache::new();
            }
        };
        PathCache {
            entries: entries.into_iter().collect(),
        }
    }

    /// Flush the store. Failure does not abort the already computed result.
    pub fn save(&self, path: &Path) {
        let file = match File::create(path) {
            Ok(file) => file,
            Err(err) => {
                warn!("WARN: cache file {path:?} could not be created: {err}");
                return;
            }
        };
        let entries: Vec<(&PathKey, &CachedPath)> = self.entries.iter().collect();
        let mut writer = BufWriter::new(file);
        if let Err(err) = serde_json::to_writer(&mut writer, &entries) {
            warn!("WARN: cache file {path:?} could not be written: {err}");
            return;
        }
        if let Err(err) = writer.flush() {
            warn!("WARN: cache file {path:?} could not be written: {err}");
        }
    }

    /// Cache-only lookup: never invokes the pathfinder. Returns `None` when
    /// the key has not been computed yet.
    pub fn lookup(
        &self,
        start: Position,
        goal: Position,
        exclusions: &[Waypoint],
    ) -> Option<&CachedPath> {
        self.entries.get(&PathKey {
            start,
            goal,
            exclusions: exclusions.to_vec(),
        })
    }

    /// Compute-or-return the path from `start` to `goal` with the given
    /// exclusions marked impassable in a private copy of the volume.
    pub fn find_path(
        &mut self,
        grid: &Grid,
        start: Position,
        goal: Position,
        exclusions: &[Waypoint],
        stats: &mut Stats,
    ) -> CachedPath {
        let key = PathKey {
            start,
            goal,
            exclusions: exclusions.to_vec(),
        };

        let result = match self.entries.get(&key) {
            Some(cached) => {
                stats.cache_hits += 1;
                cached.clone()
            }
            None => {
                let mut seen = HashSet::new();
                for &point in exclusions {
                    assert!(seen.insert(point), "duplicate exclusion entries");
                }

                let mut private = grid.clone();
                for &(x, y, t) in exclusions {
                    // Past the horizon the pathfinder cannot reach the cell
                    // anyway; the exclusion still participates in the key.
                    if t < private.horizon() {
                        private.block(x, y, t);
                    }
                }

                stats.pathfinder_calls += 1;
                let computed = match astar::find_path(&private, start, goal) {
                    Some(leg) => CachedPath::Found(leg),
                    None => CachedPath::Unreachable,
                };
                self.entries.insert(key, computed.clone());
                computed
            }
        };

        if let CachedPath::Found(leg) = &result {
            for point in leg {
                assert!(
                    !exclusions.contains(point),
                    "path still contains an excluded point"
                );
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_call_does_not_invoke_pathfinder() {
        let grid = Grid::open(10, 10, 51);
        let mut cache = PathCache::new();
        let mut stats = Stats::default();

        let first = cache.find_path(&grid, (0, 0), (0, 5), &[], &mut stats);
        assert_eq!(stats.pathfinder_calls, 1);
        assert_eq!(stats.cache_hits, 0);

        let second = cache.find_path(&grid, (0, 0), (0, 5), &[], &mut stats);
        assert_eq!(stats.pathfinder_calls, 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_exclusion_changes_key_and_path() {
        let grid = Grid::open(10, 10, 51);
        let mut cache = PathCache::new();
        let mut stats = Stats::default();

        let free = cache.find_path(&grid, (0, 0), (0, 3), &[], &mut stats);
        let excluded = cache.find_path(&grid, (0, 0), (0, 3), &[(0, 1, 1)], &mut stats);
        assert_eq!(stats.pathfinder_calls, 2);

        match (free, excluded) {
            (CachedPath::Found(a), CachedPath::Found(b)) => {
                assert_eq!(a.last().unwrap().2, 3);
                assert_eq!(b.last().unwrap().2, 4);
                assert!(!b.contains(&(0, 1, 1)));
            }
            other => panic!("expected two found paths, got {other:?}"),
        }
    }

    #[test]
    fn test_unreachable_is_cached() {
        let grid = Grid::with_obstacles(3, 3, 20, &[(1, 0), (1, 1), (1, 2)]);
        let mut cache = PathCache::new();
        let mut stats = Stats::default();

        let result = cache.find_path(&grid, (0, 0), (2, 2), &[], &mut stats);
        assert_eq!(result, CachedPath::Unreachable);
        let again = cache.find_path(&grid, (0, 0), (2, 2), &[], &mut stats);
        assert_eq!(again, CachedPath::Unreachable);
        assert_eq!(stats.pathfinder_calls, 1);
    }

    #[test]
    fn test_lookup_never_computes() {
        let grid = Grid::open(5, 5, 20);
        let mut cache = PathCache::new();
        let mut stats = Stats::default();

        assert!(cache.lookup((0, 0), (4, 4), &[]).is_none());
        assert_eq!(stats.pathfinder_calls, 0);

        cache.find_path(&grid, (0, 0), (4, 4), &[], &mut stats);
        assert!(matches!(
            cache.lookup((0, 0), (4, 4), &[]),
            Some(CachedPath::Found(_))
        ));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let grid = Grid::open(5, 5, 20);
        let mut cache = PathCache::new();
        let mut stats = Stats::default();
        cache.find_path(&grid, (0, 0), (2, 2), &[], &mut stats);
        cache.find_path(&grid, (1, 1), (3, 3), &[(2, 1, 1)], &mut stats);

        let file = std::env::temp_dir().join("tapf_cache_roundtrip.json");
        cache.save(&file);
        let restored = PathCache::load(&file);
        assert_eq!(restored.len(), 2);
        assert_eq!(
            restored.lookup((0, 0), (2, 2), &[]),
            cache.lookup((0, 0), (2, 2), &[])
        );
        std::fs::remove_file(&file).ok();
    }

    #[test]
    fn test_missing_store_is_empty_cache() {
        let cache = PathCache::load(Path::new("definitely_not_here.json"));
        assert!(cache.is_empty());
    }
}

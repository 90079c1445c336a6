use crate::common::Position;

/// Time-expanded occupancy volume over (x, y, t). A cell value of -1 marks the
/// cell impassable at that time step, used both for static obstacles and for
/// injected blocking constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    horizon: usize,
    cells: Vec<i8>,
}

impl Grid {
    pub fn open(width: usize, height: usize, horizon: usize) -> Self {
        Grid {
            width,
            height,
            horizon,
            cells: vec![0; width * height * horizon],
        }
    }

    /// An open volume with the given cells blocked over the full time extent.
    pub fn with_obstacles(
        width: usize,
        height: usize,
        horizon: usize,
        obstacles: &[Position],
    ) -> Self {
        let mut grid = Grid::open(width, height, horizon);
        for &(x, y) in obstacles {
            grid.block_column(x, y);
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    fn index(&self, x: usize, y: usize, t: usize) -> usize {
        (x * self.height + y) * self.horizon + t
    }

    pub fn contains(&self, position: Position) -> bool {
        position.0 < self.width && position.1 < self.height
    }

    pub fn is_free(&self, x: usize, y: usize, t: usize) -> bool {
        self.cells[self.index(x, y, t)] != -1
    }

    /// Mark a single space-time cell impassable.
    pub fn block(&mut self, x: usize, y: usize, t: usize) {
        assert!(
            x < self.width && y < self.height && t < self.horizon,
            "blocked cell ({x}, {y}, {t}) outside the volume"
        );
        let index = self.index(x, y, t);
        self.cells[index] = -1;
    }

    /// Mark a cell impassable at every time step (a static obstacle).
    pub fn block_column(&mut self, x: usize, y: usize) {
        for t in 0..self.horizon {
            self.block(x, y, t);
        }
    }

    /// Spatially reachable successor cells: the four neighbors plus waiting in
    /// place. Per-time passability is checked by the caller.
    pub fn neighbors(&self, position: Position) -> Vec<Position> {
        let directions = [(-1, 0), (1, 0), (0, -1), (0, 1), (0, 0)];
        let mut neighbors = Vec::new();

        for &(dx, dy) in &directions {
            let new_x = position.0 as i64 + dx;
            let new_y = position.1 as i64 + dy;
            if new_x >= 0 && new_y >= 0 && new_x < self.width as i64 && new_y < self.height as i64 {
                neighbors.push((new_x as usize, new_y as usize));
            }
        }

        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_and_query() {
        let mut grid = Grid::open(4, 4, 10);
        assert!(grid.is_free(2, 3, 5));
        grid.block(2, 3, 5);
        assert!(!grid.is_free(2, 3, 5));
        assert!(grid.is_free(2, 3, 4));
        assert!(grid.is_free(2, 3, 6));
    }

    #[test]
    fn test_static_obstacle_blocks_all_times() {
        let grid = Grid::with_obstacles(4, 4, 10, &[(1, 1)]);
        for t in 0..10 {
            assert!(!grid.is_free(1, 1, t));
        }
        assert!(grid.is_free(0, 1, 0));
    }

    #[test]
    fn test_neighbors() {
        let grid = Grid::open(3, 3, 5);
        let center = grid.neighbors((1, 1));
        assert_eq!(center.len(), 5);
        assert!(center.contains(&(1, 1)));

        let corner = grid.neighbors((0, 0));
        assert_eq!(corner.len(), 3);
        assert!(corner.contains(&(1, 0)));
        assert!(corner.contains(&(0, 1)));
        assert!(corner.contains(&(0, 0)));
    }
}

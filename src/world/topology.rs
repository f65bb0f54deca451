use crate::types::{Direction, Edge, Location};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    pub wrap: bool,
}

impl Grid {
    pub fn new(rows: usize, cols: usize, wrap: bool) -> Self {
        Self { rows, cols, wrap }
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn contains(&self, location: Location) -> bool {
        location.row < self.rows && location.col < self.cols
    }

    pub fn index_of(&self, location: Location) -> usize {
        location.row * self.cols + location.col
    }

    pub fn location_at(&self, index: usize) -> Location {
        Location::new(index / self.cols, index % self.cols)
    }

    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        (0..self.cell_count()).map(|index| self.location_at(index))
    }

    pub fn step(&self, from: Location, direction: Direction) -> Option<Location> {
        let (dr, dc) = direction.offset();
        let row = from.row as isize + dr;
        let col = from.col as isize + dc;
        if self.wrap {
            return Some(Location::new(
                row.rem_euclid(self.rows as isize) as usize,
                col.rem_euclid(self.cols as isize) as usize,
            ));
        }
        if row < 0 || col < 0 || row >= self.rows as isize || col >= self.cols as isize {
            return None;
        }
        Some(Location::new(row as usize, col as usize))
    }

    pub fn direction_between(&self, from: Location, to: Location) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.step(from, *direction) == Some(to))
    }
}

pub fn candidate_edges(grid: &Grid) -> Vec<Edge> {
    let mut edges = Vec::new();
    let horizontal_limit = if grid.wrap { grid.cols } else { grid.cols - 1 };
    let vertical_limit = if grid.wrap { grid.rows } else { grid.rows - 1 };

    for row in 0..grid.rows {
        for col in 0..horizontal_limit {
            edges.push(Edge::new(
                Location::new(row, col),
                Location::new(row, (col + 1) % grid.cols),
            ));
        }
    }
    for row in 0..vertical_limit {
        for col in 0..grid.cols {
            edges.push(Edge::new(
                Location::new(row, col),
                Location::new((row + 1) % grid.rows, col),
            ));
        }
    }
    edges
}

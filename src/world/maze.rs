use tracing::trace;

use crate::rng::RandomSource;
use crate::types::Edge;
use crate::world::topology::Grid;

#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    sets: usize,
}

impl DisjointSet {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
            sets: size,
        }
    }

    pub fn find(&mut self, node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cursor = node;
        while self.parent[cursor] != root {
            let next = self.parent[cursor];
            self.parent[cursor] = root;
            cursor = next;
        }
        root
    }

    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
        self.sets -= 1;
        true
    }

    pub fn set_count(&self) -> usize {
        self.sets
    }
}

#[derive(Clone, Debug, Default)]
pub struct Maze {
    pub edges: Vec<Edge>,
    pub pool: Vec<Edge>,
}

pub fn build_spanning_maze(grid: &Grid, candidates: Vec<Edge>, rng: &mut dyn RandomSource) -> Maze {
    let mut remaining = candidates;
    let mut sets = DisjointSet::new(grid.cell_count());
    let mut maze = Maze {
        edges: Vec::with_capacity(grid.cell_count().saturating_sub(1)),
        pool: Vec::new(),
    };

    while !remaining.is_empty() {
        let index = rng.next_int(0, remaining.len());
        let edge = remaining.remove(index);
        if sets.union(grid.index_of(edge.a), grid.index_of(edge.b)) {
            maze.edges.push(edge);
        } else {
            maze.pool.push(edge);
        }
    }

    trace!(
        kept = maze.edges.len(),
        pooled = maze.pool.len(),
        components = sets.set_count(),
        "spanning maze built"
    );
    maze
}

pub fn apply_interconnectivity(maze: &mut Maze, count: usize, rng: &mut dyn RandomSource) {
    for _ in 0..count {
        if maze.pool.is_empty() {
            break;
        }
        let index = rng.next_int(0, maze.pool.len());
        let edge = maze.pool.remove(index);
        maze.edges.push(edge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{Rng, ScriptedRandom};
    use crate::types::Location;
    use crate::world::topology::candidate_edges;

    fn components(grid: &Grid, edges: &[Edge]) -> usize {
        let mut sets = DisjointSet::new(grid.cell_count());
        for edge in edges {
            sets.union(grid.index_of(edge.a), grid.index_of(edge.b));
        }
        sets.set_count()
    }

    #[test]
    fn disjoint_set_tracks_components() {
        let mut sets = DisjointSet::new(5);
        assert!(sets.union(0, 1));
        assert!(sets.union(3, 4));
        assert!(!sets.union(1, 0));
        assert!(sets.union(1, 4));
        assert_eq!(sets.find(0), sets.find(3));
        assert_ne!(sets.find(2), sets.find(0));
        assert_eq!(sets.set_count(), 2);
    }

    #[test]
    fn spanning_maze_is_a_tree_over_every_cell() {
        for seed in 0..50u32 {
            for wrap in [false, true] {
                let grid = Grid::new(5, 6, wrap);
                let candidates = candidate_edges(&grid);
                let total = candidates.len();
                let mut rng = Rng::new(seed);
                let maze = build_spanning_maze(&grid, candidates, &mut rng);
                assert_eq!(maze.edges.len(), grid.cell_count() - 1);
                assert_eq!(maze.edges.len() + maze.pool.len(), total);
                assert_eq!(components(&grid, &maze.edges), 1);
            }
        }
    }

    #[test]
    fn draws_once_per_candidate() {
        let grid = Grid::new(3, 3, false);
        let candidates = candidate_edges(&grid);
        let mut rng = ScriptedRandom::new(vec![0; candidates.len()]);
        let maze = build_spanning_maze(&grid, candidates, &mut rng);
        assert_eq!(rng.remaining(), 0);
        // Always taking the head keeps every row edge, then the first column
        // link of each row pair.
        assert!(maze.edges.contains(&Edge::new(Location::new(0, 0), Location::new(0, 1))));
        assert!(maze.edges.contains(&Edge::new(Location::new(0, 0), Location::new(1, 0))));
        assert!(maze.pool.contains(&Edge::new(Location::new(0, 1), Location::new(1, 1))));
        assert_eq!(maze.edges.len(), 8);
    }

    #[test]
    fn interconnectivity_moves_pooled_edges() {
        let grid = Grid::new(4, 4, false);
        let mut rng = Rng::new(9);
        let mut maze = build_spanning_maze(&grid, candidate_edges(&grid), &mut rng);
        let pooled = maze.pool.len();
        apply_interconnectivity(&mut maze, 3, &mut rng);
        assert_eq!(maze.edges.len(), grid.cell_count() - 1 + 3);
        assert_eq!(maze.pool.len(), pooled - 3);
        assert_eq!(components(&grid, &maze.edges), 1);
    }
}

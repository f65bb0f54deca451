pub mod maze;
pub mod placement;
pub mod topology;

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::actors::Otyugh;
use crate::config::DungeonConfig;
use crate::constants::{MIN_TERMINAL_DISTANCE, TERMINAL_ATTEMPTS};
use crate::error::DungeonError;
use crate::rng::RandomSource;
use crate::types::{Direction, DungeonOverview, Edge, Location, LocationKind, Stock};

use self::maze::{apply_interconnectivity, build_spanning_maze};
use self::placement::{allocate_arrows, allocate_treasure, place_monsters};
use self::topology::{candidate_edges, Grid};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Doors {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl Doors {
    pub fn is_open(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }

    fn open(&mut self, direction: Direction) {
        match direction {
            Direction::North => self.north = true,
            Direction::South => self.south = true,
            Direction::East => self.east = true,
            Direction::West => self.west = true,
        }
    }

    pub fn open_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.is_open(*direction))
            .collect()
    }

    pub fn count(&self) -> usize {
        [self.north, self.south, self.east, self.west]
            .into_iter()
            .filter(|open| *open)
            .count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cave {
    pub location: Location,
    pub doors: Doors,
    pub stock: Stock,
}

impl Cave {
    pub fn new(location: Location, doors: Doors) -> Self {
        Self {
            location,
            doors,
            stock: Stock::default(),
        }
    }

    pub fn is_tunnel(&self) -> bool {
        self.doors.count() == 2
    }

    pub fn kind(&self) -> LocationKind {
        if self.is_tunnel() {
            LocationKind::Tunnel
        } else {
            LocationKind::Cave
        }
    }
}

#[derive(Clone, Debug)]
pub struct GeneratedDungeon {
    pub config: DungeonConfig,
    pub grid: Grid,
    pub edges: Vec<Edge>,
    // Row-major, indexed by `Grid::index_of`.
    pub cells: Vec<Cave>,
    pub monsters: Vec<Otyugh>,
    pub start: Location,
    pub end: Location,
}

impl GeneratedDungeon {
    pub fn cell(&self, location: Location) -> Option<&Cave> {
        if !self.grid.contains(location) {
            return None;
        }
        self.cells.get(self.grid.index_of(location))
    }

    pub fn cave_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_tunnel()).count()
    }

    pub fn tunnel_count(&self) -> usize {
        self.cells.len() - self.cave_count()
    }

    pub fn hop_distances(&self, from: Location) -> Vec<Option<usize>> {
        hop_distances(&self.grid, &self.cells, from)
    }

    pub fn overview(&self) -> DungeonOverview {
        DungeonOverview {
            rows: self.grid.rows,
            cols: self.grid.cols,
            wrap: self.grid.wrap,
            start: self.start,
            end: self.end,
            edges: self.edges.iter().map(Edge::endpoints).collect(),
            cave_count: self.cave_count(),
            tunnel_count: self.tunnel_count(),
        }
    }
}

/// Runs the full generation pipeline. Every random draw goes through `rng`
/// in a fixed order: maze, interconnectivity, terminals, monsters, treasure,
/// arrows.
pub fn generate_dungeon(
    config: &DungeonConfig,
    rng: &mut dyn RandomSource,
) -> Result<GeneratedDungeon, DungeonError> {
    config.validate()?;
    let grid = Grid::new(config.rows, config.cols, config.wrap);

    let mut maze = build_spanning_maze(&grid, candidate_edges(&grid), rng);
    apply_interconnectivity(&mut maze, config.interconnectivity, rng);

    let mut cells = classify_cells(&grid, &maze.edges);
    let (start, end) = select_terminals(&grid, &cells, rng)?;
    let monsters = place_monsters(&cells, start, end, config.monster_count, rng)?;
    let treasure_caves = allocate_treasure(&mut cells, config.resource_percentage, rng)?;
    let arrow_cells = allocate_arrows(&mut cells, config.resource_percentage, rng)?;

    let dungeon = GeneratedDungeon {
        config: config.clone(),
        grid,
        edges: maze.edges,
        cells,
        monsters,
        start,
        end,
    };
    debug!(
        rows = grid.rows,
        cols = grid.cols,
        wrap = grid.wrap,
        edges = dungeon.edges.len(),
        caves = dungeon.cave_count(),
        tunnels = dungeon.tunnel_count(),
        start = %start,
        end = %end,
        treasure_caves,
        arrow_cells,
        "dungeon generated"
    );
    Ok(dungeon)
}

pub fn classify_cells(grid: &Grid, edges: &[Edge]) -> Vec<Cave> {
    let linked: HashSet<(Location, Location)> = edges
        .iter()
        .flat_map(|edge| [(edge.a, edge.b), (edge.b, edge.a)])
        .collect();

    grid.locations()
        .map(|location| {
            let mut doors = Doors::default();
            for direction in Direction::ALL {
                if let Some(next) = grid.step(location, direction) {
                    if linked.contains(&(location, next)) {
                        doors.open(direction);
                    }
                }
            }
            Cave::new(location, doors)
        })
        .collect()
}

pub fn hop_distances(grid: &Grid, cells: &[Cave], from: Location) -> Vec<Option<usize>> {
    let mut distances = vec![None; cells.len()];
    if !grid.contains(from) {
        return distances;
    }

    let mut queue = VecDeque::new();
    distances[grid.index_of(from)] = Some(0);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        let index = grid.index_of(current);
        let Some(distance) = distances[index] else {
            continue;
        };
        for direction in cells[index].doors.open_directions() {
            let Some(next) = grid.step(current, direction) else {
                continue;
            };
            let slot = &mut distances[grid.index_of(next)];
            if slot.is_none() {
                *slot = Some(distance + 1);
                queue.push_back(next);
            }
        }
    }

    distances
}

pub fn select_terminals(
    grid: &Grid,
    cells: &[Cave],
    rng: &mut dyn RandomSource,
) -> Result<(Location, Location), DungeonError> {
    for attempt in 1..=TERMINAL_ATTEMPTS {
        let candidate = &cells[rng.next_int(0, cells.len())];
        if candidate.is_tunnel() {
            continue;
        }
        let start = candidate.location;
        let distances = hop_distances(grid, cells, start);
        let end = cells.iter().find(|cell| {
            !cell.is_tunnel()
                && cell.location != start
                && distances[grid.index_of(cell.location)]
                    .is_some_and(|distance| distance >= MIN_TERMINAL_DISTANCE)
        });
        if let Some(end) = end {
            debug!(attempt, start = %start, end = %end.location, "terminals selected");
            return Ok((start, end.location));
        }
    }
    Err(DungeonError::UnreachableTerminals {
        attempts: TERMINAL_ATTEMPTS,
        min_distance: MIN_TERMINAL_DISTANCE,
    })
}

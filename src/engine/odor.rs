use crate::actors::{Monster, Otyugh};
use crate::types::{Location, Odor};
use crate::world::topology::Grid;
use crate::world::Cave;

pub(super) fn odor_at(grid: &Grid, cells: &[Cave], monsters: &[Otyugh], location: Location) -> Odor {
    if adjacent_live_monsters(grid, cells, monsters, location) > 0 {
        return Odor::Terrible;
    }
    let two_away: usize = neighbours(grid, cells, location)
        .map(|next| adjacent_live_monsters(grid, cells, monsters, next))
        .sum();
    match two_away {
        0 => Odor::None,
        1 => Odor::Bad,
        _ => Odor::Terrible,
    }
}

fn neighbours<'a>(
    grid: &'a Grid,
    cells: &'a [Cave],
    location: Location,
) -> impl Iterator<Item = Location> + 'a {
    cells[grid.index_of(location)]
        .doors
        .open_directions()
        .into_iter()
        .filter_map(move |direction| grid.step(location, direction))
}

fn adjacent_live_monsters(
    grid: &Grid,
    cells: &[Cave],
    monsters: &[Otyugh],
    location: Location,
) -> usize {
    neighbours(grid, cells, location)
        .filter(|next| {
            monsters
                .iter()
                .any(|monster| monster.location() == *next && monster.is_alive())
        })
        .count()
}

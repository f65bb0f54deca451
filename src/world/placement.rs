use std::collections::HashSet;

use tracing::trace;

use crate::actors::Otyugh;
use crate::constants::{percentage_of, ARROWS_MAX, ARROWS_MIN, TREASURE_MAX, TREASURE_MIN};
use crate::error::DungeonError;
use crate::rng::RandomSource;
use crate::types::Location;
use crate::world::Cave;

pub fn place_monsters(
    cells: &[Cave],
    start: Location,
    end: Location,
    count: usize,
    rng: &mut dyn RandomSource,
) -> Result<Vec<Otyugh>, DungeonError> {
    let cave_count = cells.iter().filter(|cell| !cell.is_tunnel()).count();
    if count == 0 || count > cave_count.saturating_sub(1) {
        return Err(DungeonError::invalid_configuration(format!(
            "{count} monsters do not fit in {cave_count} caves (at most {})",
            cave_count.saturating_sub(1)
        )));
    }

    let mut occupied = HashSet::from([end]);
    let mut monsters = vec![Otyugh::new(end)];
    while monsters.len() < count {
        let cell = &cells[rng.next_int(0, cells.len())];
        if cell.is_tunnel() || cell.location == start || occupied.contains(&cell.location) {
            continue;
        }
        occupied.insert(cell.location);
        monsters.push(Otyugh::new(cell.location));
    }
    trace!(count = monsters.len(), "monsters placed");
    Ok(monsters)
}

pub fn allocate_treasure(
    cells: &mut [Cave],
    percentage: u32,
    rng: &mut dyn RandomSource,
) -> Result<usize, DungeonError> {
    let cave_count = cells.iter().filter(|cell| !cell.is_tunnel()).count();
    let target = percentage_of(percentage, cave_count);
    if target == 0 {
        return Err(DungeonError::invalid_configuration(format!(
            "resource percentage {percentage} is too low to place treasure in {cave_count} caves"
        )));
    }

    let mut filled = HashSet::new();
    while filled.len() < target {
        let index = rng.next_int(0, cells.len());
        if cells[index].is_tunnel() || !filled.insert(index) {
            continue;
        }
        let stock = &mut cells[index].stock;
        stock.diamonds = draw_quantity(rng, TREASURE_MIN, TREASURE_MAX);
        stock.sapphires = draw_quantity(rng, TREASURE_MIN, TREASURE_MAX);
        stock.rubies = draw_quantity(rng, TREASURE_MIN, TREASURE_MAX);
    }
    trace!(target, "treasure allocated");
    Ok(target)
}

pub fn allocate_arrows(
    cells: &mut [Cave],
    percentage: u32,
    rng: &mut dyn RandomSource,
) -> Result<usize, DungeonError> {
    let target = percentage_of(percentage, cells.len());
    if target == 0 {
        return Err(DungeonError::invalid_configuration(format!(
            "resource percentage {percentage} is too low to place arrows in {} locations",
            cells.len()
        )));
    }

    let mut filled = HashSet::new();
    while filled.len() < target {
        let index = rng.next_int(0, cells.len());
        if !filled.insert(index) {
            continue;
        }
        cells[index].stock.arrows = draw_quantity(rng, ARROWS_MIN, ARROWS_MAX);
    }
    trace!(target, "arrows allocated");
    Ok(target)
}

fn draw_quantity(rng: &mut dyn RandomSource, min: usize, max: usize) -> u32 {
    rng.next_int(min, max + 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::Monster;
    use crate::rng::{Rng, ScriptedRandom};
    use crate::world::Doors;

    fn strip() -> Vec<Cave> {
        (0..5)
            .map(|col| {
                let doors = if col % 2 == 1 {
                    Doors {
                        east: true,
                        west: true,
                        ..Doors::default()
                    }
                } else {
                    Doors {
                        east: true,
                        ..Doors::default()
                    }
                };
                Cave::new(Location::new(0, col), doors)
            })
            .collect()
    }

    #[test]
    fn monsters_skip_tunnels_start_and_occupied_cells() {
        let cells = strip();
        // 1 is a tunnel, 0 is the start, 4 already holds the end monster.
        let mut rng = ScriptedRandom::new([1, 0, 4, 2]);
        let monsters = place_monsters(
            &cells,
            Location::new(0, 0),
            Location::new(0, 4),
            2,
            &mut rng,
        )
        .expect("two monsters fit");
        let spots: Vec<Location> = monsters.iter().map(Monster::location).collect();
        assert_eq!(spots, vec![Location::new(0, 4), Location::new(0, 2)]);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn too_many_monsters_is_a_configuration_error() {
        let cells = strip();
        let mut rng = Rng::new(1);
        let result = place_monsters(
            &cells,
            Location::new(0, 0),
            Location::new(0, 4),
            3,
            &mut rng,
        );
        assert!(matches!(
            result,
            Err(DungeonError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn treasure_lands_only_in_caves() {
        let mut cells = strip();
        // 3 caves at 70% -> 2 filled; index 3 is a tunnel, second 2 repeats.
        let mut rng = ScriptedRandom::new([3, 2, 1, 2, 3, 2, 0, 4, 5, 6]);
        let placed = allocate_treasure(&mut cells, 70, &mut rng).expect("treasure placed");
        assert_eq!(placed, 2);
        assert_eq!(cells[2].stock.treasure_total(), 6);
        assert_eq!(cells[0].stock.diamonds, 4);
        assert_eq!(cells[0].stock.rubies, 6);
        assert!(!cells[1].stock.has_treasure());
        assert!(!cells[3].stock.has_treasure());
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn arrows_may_land_in_tunnels() {
        let mut cells = strip();
        // 5 cells at 40% -> 2 filled; the second draw of index 1 is skipped.
        let mut rng = ScriptedRandom::new([1, 3, 1, 3, 1]);
        let placed = allocate_arrows(&mut cells, 40, &mut rng).expect("arrows placed");
        assert_eq!(placed, 2);
        assert_eq!(cells[1].stock.arrows, 3);
        assert_eq!(cells[3].stock.arrows, 1);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn zero_target_is_rejected() {
        let mut cells = strip();
        let mut rng = Rng::new(3);
        assert!(allocate_treasure(&mut cells, 10, &mut rng).is_err());
        assert!(allocate_arrows(&mut cells, 0, &mut rng).is_err());
    }
}

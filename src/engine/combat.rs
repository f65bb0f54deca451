use crate::actors::{Monster, Otyugh};
use crate::types::{Direction, Health, Location, ShotOutcome};
use crate::world::topology::Grid;
use crate::world::Cave;

pub(super) fn trace_arrow(
    grid: &Grid,
    cells: &[Cave],
    from: Location,
    mut heading: Direction,
    distance: u32,
) -> Option<Location> {
    let mut remaining = distance;
    let mut current = grid.step(from, heading)?;
    if !cells[grid.index_of(current)].is_tunnel() {
        remaining = remaining.saturating_sub(1);
    }

    while remaining > 0 {
        let cell = &cells[grid.index_of(current)];
        if cell.is_tunnel() {
            let back = heading.opposite();
            heading = cell
                .doors
                .open_directions()
                .into_iter()
                .find(|direction| *direction != back)?;
        } else if !cell.doors.is_open(heading) {
            return None;
        }
        current = grid.step(current, heading)?;
        if !cells[grid.index_of(current)].is_tunnel() {
            remaining = remaining.saturating_sub(1);
        }
    }
    Some(current)
}

pub(super) fn strike(monsters: &mut [Otyugh], target: Option<Location>) -> ShotOutcome {
    let Some(target) = target else {
        return ShotOutcome::Miss;
    };
    let Some(monster) = monsters
        .iter_mut()
        .find(|monster| monster.location() == target && monster.is_alive())
    else {
        return ShotOutcome::Miss;
    };
    if monster.take_hit() == Health::Healthy {
        ShotOutcome::FirstHit
    } else {
        ShotOutcome::Kill
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;
    use crate::world::tests::{flat_config, wrap_config, FLAT_SCRIPT, WRAP_SCRIPT};
    use crate::world::{generate_dungeon, GeneratedDungeon};

    fn loc(raw: &str) -> Location {
        raw.parse().expect("test location")
    }

    fn flat() -> GeneratedDungeon {
        let mut rng = ScriptedRandom::new(FLAT_SCRIPT);
        generate_dungeon(&flat_config(), &mut rng).expect("generation succeeds")
    }

    #[test]
    fn straight_shot_counts_each_cave() {
        let dungeon = flat();
        let trace = |distance| {
            trace_arrow(&dungeon.grid, &dungeon.cells, loc("2-2"), Direction::West, distance)
        };
        assert_eq!(trace(1), Some(loc("2-1")));
        assert_eq!(trace(2), Some(loc("2-0")));
        // 2-0 has no west door.
        assert_eq!(trace(3), None);
    }

    #[test]
    fn arrow_bends_through_tunnels_without_counting_them() {
        let dungeon = flat();
        // 0-3, then cave 0-2, then tunnels 0-1, 0-0, 1-0, 1-1 into cave 2-1.
        assert_eq!(
            trace_arrow(&dungeon.grid, &dungeon.cells, loc("1-3"), Direction::North, 1),
            Some(loc("0-2"))
        );
        assert_eq!(
            trace_arrow(&dungeon.grid, &dungeon.cells, loc("1-3"), Direction::North, 2),
            Some(loc("2-1"))
        );
    }

    #[test]
    fn arrow_follows_tunnels_across_the_wrap() {
        let mut rng = ScriptedRandom::new(WRAP_SCRIPT);
        let dungeon = generate_dungeon(&wrap_config(), &mut rng).expect("generation succeeds");
        // 3-1 bends south over the border into 0-1, then 0-0 turns it into 1-0.
        assert_eq!(
            trace_arrow(&dungeon.grid, &dungeon.cells, loc("3-2"), Direction::West, 1),
            Some(loc("1-0"))
        );
        assert_eq!(
            trace_arrow(&dungeon.grid, &dungeon.cells, loc("1-2"), Direction::East, 1),
            Some(loc("2-3"))
        );
    }

    #[test]
    fn strike_wounds_then_kills() {
        let mut monsters = vec![Otyugh::new(loc("2-1"))];
        assert_eq!(strike(&mut monsters, Some(loc("2-0"))), ShotOutcome::Miss);
        assert_eq!(strike(&mut monsters, None), ShotOutcome::Miss);
        assert_eq!(strike(&mut monsters, Some(loc("2-1"))), ShotOutcome::FirstHit);
        assert_eq!(strike(&mut monsters, Some(loc("2-1"))), ShotOutcome::Kill);
        assert_eq!(strike(&mut monsters, Some(loc("2-1"))), ShotOutcome::Miss);
        assert_eq!(monsters[0].health(), Health::Dead);
    }
}

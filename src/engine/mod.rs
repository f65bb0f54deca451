use tracing::debug;

use crate::actors::{Explorer, Monster, Otyugh, Player};
use crate::config::DungeonConfig;
use crate::constants::{MAX_SHOT_DISTANCE, MIN_SHOT_DISTANCE};
use crate::error::DungeonError;
use crate::rng::RandomSource;
use crate::types::{
    Direction, DungeonOverview, Health, Location, LocationKind, MoveOutcome, Odor, PickTarget,
    PlayerView, Resource, ShotOutcome, Stock,
};
use crate::world::{generate_dungeon, Cave, Doors, GeneratedDungeon};

mod combat;
mod odor;

const TREASURE_PICK_ORDER: [Resource; 3] = [Resource::Ruby, Resource::Diamond, Resource::Sapphire];

#[derive(Clone, Debug)]
pub struct DungeonGame {
    layout: GeneratedDungeon,
    cells: Vec<Cave>,
    monsters: Vec<Otyugh>,
    player: Option<Explorer>,
    player_dead: bool,
}

impl DungeonGame {
    pub fn new(config: &DungeonConfig, rng: &mut dyn RandomSource) -> Result<Self, DungeonError> {
        let layout = generate_dungeon(config, rng)?;
        Ok(Self::from_layout(layout))
    }

    pub fn from_layout(layout: GeneratedDungeon) -> Self {
        let cells = layout.cells.clone();
        let monsters = layout.monsters.clone();
        Self {
            layout,
            cells,
            monsters,
            player: None,
            player_dead: false,
        }
    }

    pub fn layout(&self) -> &GeneratedDungeon {
        &self.layout
    }

    pub fn create_player(&mut self) -> Result<(), DungeonError> {
        if self.player.is_some() {
            return Err(DungeonError::illegal_session_state(
                "player is already created for this game",
            ));
        }
        self.player = Some(Explorer::new());
        debug!("player created");
        Ok(())
    }

    pub fn attach_player(&mut self) -> Result<(), DungeonError> {
        let start = self.layout.start;
        let player = self.player.as_mut().ok_or_else(|| {
            DungeonError::illegal_session_state("player does not exist for this game")
        })?;
        if player.location().is_some() {
            return Err(DungeonError::illegal_session_state(
                "player is already in the dungeon",
            ));
        }
        player.relocate(start);
        debug!(start = %start, "player attached");
        Ok(())
    }

    pub fn restart(&mut self) {
        self.cells = self.layout.cells.clone();
        self.monsters = self.layout.monsters.clone();
        self.player = None;
        self.player_dead = false;
        debug!("session restarted");
    }

    pub fn next_possible_moves(&self, location: &str) -> Result<String, DungeonError> {
        let doors = self.session_cell(location)?.doors;
        Ok(doors
            .open_directions()
            .into_iter()
            .map(|direction| format!("{direction} "))
            .collect())
    }

    pub fn doors_at(&self, location: Location) -> Result<Doors, DungeonError> {
        self.cell_at(location).map(|cell| cell.doors)
    }

    pub fn odor_at(&self, location: &str) -> Result<Odor, DungeonError> {
        let location = self.session_cell(location)?.location;
        Ok(odor::odor_at(
            &self.layout.grid,
            &self.cells,
            &self.monsters,
            location,
        ))
    }

    pub fn resources_at(&self, location: &str) -> Result<Stock, DungeonError> {
        Ok(self.session_cell(location)?.stock)
    }

    pub fn resource_count(&self, location: &str, resource: Resource) -> Result<u32, DungeonError> {
        Ok(self.session_cell(location)?.stock.get(resource))
    }

    pub fn available_items(&self, location: &str) -> Result<String, DungeonError> {
        Ok(self.session_cell(location)?.stock.describe_available())
    }

    pub fn location_kind(&self, location: &str) -> Result<LocationKind, DungeonError> {
        Ok(self.cell(location)?.kind())
    }

    pub fn start_location(&self) -> String {
        self.layout.start.to_string()
    }

    pub fn end_location(&self) -> String {
        self.layout.end.to_string()
    }

    pub fn edges(&self) -> Vec<(String, String)> {
        self.layout.edges.iter().map(|edge| edge.endpoints()).collect()
    }

    pub fn monster_locations(&self) -> Vec<String> {
        self.monsters
            .iter()
            .filter(|monster| monster.is_alive())
            .map(|monster| monster.location().to_string())
            .collect()
    }

    pub fn overview(&self) -> DungeonOverview {
        self.layout.overview()
    }

    pub fn is_player_dead(&self) -> bool {
        self.player_dead
    }

    pub fn is_game_over(&self) -> Result<bool, DungeonError> {
        let location = self.player_location()?;
        Ok(self.player_dead || location == self.layout.end)
    }

    pub fn player_location(&self) -> Result<Location, DungeonError> {
        let player = self.attached_player()?;
        player
            .location()
            .ok_or_else(|| DungeonError::illegal_session_state("player is not in the dungeon"))
    }

    pub fn visited_locations(&self) -> Result<Vec<String>, DungeonError> {
        Ok(self
            .attached_player()?
            .visited()
            .iter()
            .map(Location::to_string)
            .collect())
    }

    pub fn player_inventory(&self) -> Result<Stock, DungeonError> {
        Ok(*self.attached_player()?.inventory())
    }

    pub fn player_description(&self) -> Result<String, DungeonError> {
        Ok(self.attached_player()?.inventory().describe())
    }

    pub fn player_view(&self) -> Result<PlayerView, DungeonError> {
        self.attached_player()?
            .view(self.player_dead)
            .ok_or_else(|| DungeonError::illegal_session_state("player is not in the dungeon"))
    }

    /// Moves through an open door and resolves the monster encounter at the
    /// destination. An injured monster eats the player when `rng` draws 1
    /// from `[0, 2)`; nothing is drawn otherwise.
    pub fn move_player(
        &mut self,
        direction: Direction,
        rng: &mut dyn RandomSource,
    ) -> Result<MoveOutcome, DungeonError> {
        let from = self.active_location()?;
        let grid = self.layout.grid;
        let destination = self
            .cell_at(from)?
            .doors
            .is_open(direction)
            .then(|| grid.step(from, direction))
            .flatten()
            .ok_or(DungeonError::InvalidMove { from, direction })?;

        if let Some(player) = self.player.as_mut() {
            player.relocate(destination);
        }

        let encounter = self
            .monsters
            .iter()
            .find(|monster| monster.location() == destination)
            .map(Otyugh::health);
        let eaten = match encounter {
            Some(Health::Healthy) => true,
            Some(Health::Injured) => rng.next_int(0, 2) == 1,
            Some(Health::Dead) | None => false,
        };
        if eaten {
            self.player_dead = true;
        }
        debug!(from = %from, to = %destination, direction = %direction, eaten, "player moved");

        Ok(if eaten {
            MoveOutcome::Eaten
        } else {
            MoveOutcome::Survived
        })
    }

    pub fn pick_item(&mut self, target: PickTarget, count: u32) -> Result<Stock, DungeonError> {
        let location = self.active_location()?;
        let index = self.layout.grid.index_of(location);
        let available = self.cells[index].stock;
        let mut taken = Stock::default();

        match target {
            PickTarget::Item(resource) => {
                let present = available.get(resource);
                if count == 0 || count > present {
                    return Err(DungeonError::InvalidPickup {
                        location,
                        resource,
                        requested: count,
                        available: present,
                    });
                }
                *taken.slot_mut(resource) = count;
            }
            PickTarget::AllTreasure => {
                for resource in TREASURE_PICK_ORDER {
                    *taken.slot_mut(resource) = available.get(resource);
                }
            }
            PickTarget::AllArrows => taken.arrows = available.arrows,
        }
        if taken.is_empty() {
            return Err(DungeonError::NothingToPick { location });
        }

        let cell = &mut self.cells[index];
        let player = self.player.as_mut().ok_or_else(|| {
            DungeonError::illegal_session_state("player does not exist for this game")
        })?;
        for resource in TREASURE_PICK_ORDER.into_iter().chain([Resource::Arrow]) {
            let amount = taken.get(resource);
            if amount > 0 {
                *cell.stock.slot_mut(resource) -= amount;
                player.stash(resource, amount);
            }
        }
        debug!(location = %location, picked = %taken.describe(), "items picked");
        Ok(taken)
    }

    pub fn shoot(&mut self, direction: Direction, distance: u32) -> Result<ShotOutcome, DungeonError> {
        let from = self.active_location()?;
        if !(MIN_SHOT_DISTANCE..=MAX_SHOT_DISTANCE).contains(&distance) {
            return Err(DungeonError::invalid_shot(format!(
                "distance {distance} is outside {MIN_SHOT_DISTANCE}-{MAX_SHOT_DISTANCE}"
            )));
        }
        if self.attached_player()?.inventory().arrows == 0 {
            return Ok(ShotOutcome::NoAmmunition);
        }
        if !self.cell_at(from)?.doors.is_open(direction) {
            return Err(DungeonError::invalid_shot(format!(
                "no door {direction} from {from}"
            )));
        }

        let landing = combat::trace_arrow(&self.layout.grid, &self.cells, from, direction, distance);
        if let Some(player) = self.player.as_mut() {
            player.spend_arrow();
        }
        let outcome = combat::strike(&mut self.monsters, landing);
        debug!(
            from = %from,
            direction = %direction,
            distance,
            landing = ?landing,
            outcome = ?outcome,
            "arrow shot"
        );
        Ok(outcome)
    }

    fn attached_player(&self) -> Result<&Explorer, DungeonError> {
        let player = self.player.as_ref().ok_or_else(|| {
            DungeonError::illegal_session_state("player does not exist for this game")
        })?;
        if player.location().is_none() {
            return Err(DungeonError::illegal_session_state(
                "player is not in the dungeon",
            ));
        }
        Ok(player)
    }

    fn active_location(&self) -> Result<Location, DungeonError> {
        let location = self.player_location()?;
        if self.player_dead {
            return Err(DungeonError::illegal_session_state("player is dead"));
        }
        Ok(location)
    }

    fn cell(&self, location: &str) -> Result<&Cave, DungeonError> {
        let parsed: Location = location.parse()?;
        self.layout
            .cell(parsed)
            .and_then(|cell| self.cells.get(self.layout.grid.index_of(cell.location)))
            .ok_or_else(|| DungeonError::UnknownLocation(location.to_string()))
    }

    fn session_cell(&self, location: &str) -> Result<&Cave, DungeonError> {
        self.attached_player()?;
        self.cell(location)
    }

    fn cell_at(&self, location: Location) -> Result<&Cave, DungeonError> {
        if !self.layout.grid.contains(location) {
            return Err(DungeonError::UnknownLocation(location.to_string()));
        }
        Ok(&self.cells[self.layout.grid.index_of(location)])
    }
}

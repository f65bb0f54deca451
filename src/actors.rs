use crate::constants::STARTING_ARROWS;
use crate::types::{Health, Location, PlayerView, Resource, Stock};

pub trait Player {
    fn location(&self) -> Option<Location>;
    fn relocate(&mut self, to: Location);
    fn inventory(&self) -> &Stock;
    fn stash(&mut self, resource: Resource, count: u32);
    fn spend_arrow(&mut self) -> bool;
    fn visited(&self) -> &[Location];
}

pub trait Monster {
    fn location(&self) -> Location;
    fn health(&self) -> Health;
    fn take_hit(&mut self) -> Health;

    fn is_alive(&self) -> bool {
        self.health().is_alive()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Explorer {
    location: Option<Location>,
    inventory: Stock,
    visited: Vec<Location>,
}

impl Explorer {
    pub fn new() -> Self {
        Self {
            location: None,
            inventory: Stock {
                arrows: STARTING_ARROWS,
                ..Stock::default()
            },
            visited: Vec::new(),
        }
    }

    pub fn view(&self, dead: bool) -> Option<PlayerView> {
        self.location.map(|location| PlayerView {
            location,
            inventory: self.inventory,
            visited: self.visited.clone(),
            dead,
        })
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for Explorer {
    fn location(&self) -> Option<Location> {
        self.location
    }

    fn relocate(&mut self, to: Location) {
        self.location = Some(to);
        if !self.visited.contains(&to) {
            self.visited.push(to);
        }
    }

    fn inventory(&self) -> &Stock {
        &self.inventory
    }

    fn stash(&mut self, resource: Resource, count: u32) {
        *self.inventory.slot_mut(resource) += count;
    }

    fn spend_arrow(&mut self) -> bool {
        if self.inventory.arrows == 0 {
            return false;
        }
        self.inventory.arrows -= 1;
        true
    }

    fn visited(&self) -> &[Location] {
        &self.visited
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Otyugh {
    location: Location,
    health: Health,
}

impl Otyugh {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            health: Health::Healthy,
        }
    }
}

impl Monster for Otyugh {
    fn location(&self) -> Location {
        self.location
    }

    fn health(&self) -> Health {
        self.health
    }

    fn take_hit(&mut self) -> Health {
        let before = self.health;
        self.health = before.weakened();
        before
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DungeonError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "W")]
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::North => 'N',
            Self::East => 'E',
            Self::South => 'S',
            Self::West => 'W',
        }
    }

    pub(crate) fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (-1, 0),
            Self::South => (1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Direction {
    type Err = DungeonError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(Self::North),
            "E" => Ok(Self::East),
            "S" => Ok(Self::South),
            "W" => Ok(Self::West),
            _ => Err(DungeonError::UnknownDirection(value.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub row: usize,
    pub col: usize,
}

impl Location {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl FromStr for Location {
    type Err = DungeonError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let unknown = || DungeonError::UnknownLocation(value.to_string());
        let (row, col) = value.trim().split_once('-').ok_or_else(unknown)?;
        let row = row.parse::<usize>().map_err(|_| unknown())?;
        let col = col.parse::<usize>().map_err(|_| unknown())?;
        Ok(Self::new(row, col))
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: Location,
    pub b: Location,
}

impl Edge {
    pub const fn new(a: Location, b: Location) -> Self {
        Self { a, b }
    }

    pub fn other(&self, location: Location) -> Option<Location> {
        if self.a == location {
            Some(self.b)
        } else if self.b == location {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn connects(&self, x: Location, y: Location) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    pub fn endpoints(&self) -> (String, String) {
        (self.a.to_string(), self.b.to_string())
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.a, self.b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Diamond,
    Sapphire,
    Ruby,
    Arrow,
}

impl Resource {
    pub const TREASURE: [Resource; 3] = [Resource::Diamond, Resource::Sapphire, Resource::Ruby];

    pub fn plural(self) -> &'static str {
        match self {
            Self::Diamond => "diamonds",
            Self::Sapphire => "sapphires",
            Self::Ruby => "rubies",
            Self::Arrow => "arrows",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickTarget {
    Item(Resource),
    AllTreasure,
    AllArrows,
}

impl FromStr for PickTarget {
    type Err = DungeonError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "D" | "d" => Ok(Self::Item(Resource::Diamond)),
            "S" | "s" => Ok(Self::Item(Resource::Sapphire)),
            "R" | "r" => Ok(Self::Item(Resource::Ruby)),
            "A" | "a" => Ok(Self::Item(Resource::Arrow)),
            "AllTreasure" => Ok(Self::AllTreasure),
            "AllArrows" => Ok(Self::AllArrows),
            _ => Err(DungeonError::UnknownItem(value.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stock {
    pub diamonds: u32,
    pub sapphires: u32,
    pub rubies: u32,
    pub arrows: u32,
}

impl Stock {
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Diamond => self.diamonds,
            Resource::Sapphire => self.sapphires,
            Resource::Ruby => self.rubies,
            Resource::Arrow => self.arrows,
        }
    }

    pub(crate) fn slot_mut(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Diamond => &mut self.diamonds,
            Resource::Sapphire => &mut self.sapphires,
            Resource::Ruby => &mut self.rubies,
            Resource::Arrow => &mut self.arrows,
        }
    }

    pub fn has_treasure(&self) -> bool {
        Resource::TREASURE.iter().any(|kind| self.get(*kind) > 0)
    }

    pub fn treasure_total(&self) -> u32 {
        self.diamonds + self.sapphires + self.rubies
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn describe(&self) -> String {
        format!(
            "Diamonds- {} | Sapphires- {} | Rubies- {} | Arrows- {}",
            self.diamonds, self.sapphires, self.rubies, self.arrows
        )
    }

    pub fn describe_available(&self) -> String {
        let mut out = String::new();
        for (label, count) in [
            ("Diamonds", self.diamonds),
            ("Sapphires", self.sapphires),
            ("Rubies", self.rubies),
            ("Arrows", self.arrows),
        ] {
            if count > 0 {
                out.push_str(&format!("{label}- {count} | "));
            }
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LocationKind {
    Cave,
    Tunnel,
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cave => f.write_str("Cave"),
            Self::Tunnel => f.write_str("Tunnel"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Health {
    Dead,
    Injured,
    Healthy,
}

impl Health {
    pub fn level(self) -> u8 {
        match self {
            Self::Dead => 0,
            Self::Injured => 1,
            Self::Healthy => 2,
        }
    }

    pub fn is_alive(self) -> bool {
        self != Self::Dead
    }

    pub fn weakened(self) -> Self {
        match self {
            Self::Healthy => Self::Injured,
            Self::Injured | Self::Dead => Self::Dead,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Odor {
    None,
    Bad,
    Terrible,
}

impl Odor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Bad => "Bad",
            Self::Terrible => "Terrible",
        }
    }
}

impl fmt::Display for Odor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    Survived,
    Eaten,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotOutcome {
    NoAmmunition,
    Miss,
    FirstHit,
    Kill,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub location: Location,
    pub inventory: Stock,
    pub visited: Vec<Location>,
    pub dead: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DungeonOverview {
    pub rows: usize,
    pub cols: usize,
    pub wrap: bool,
    pub start: Location,
    pub end: Location,
    pub edges: Vec<(String, String)>,
    #[serde(rename = "caveCount")]
    pub cave_count: usize,
    #[serde(rename = "tunnelCount")]
    pub tunnel_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_round_trips_through_front_end_format() {
        let location: Location = "12-3".parse().expect("valid location");
        assert_eq!(location, Location::new(12, 3));
        assert_eq!(location.to_string(), "12-3");
    }

    #[test]
    fn malformed_locations_are_rejected() {
        for raw in ["", "3", "a-1", "1-", "-1-2", "1_2"] {
            assert_eq!(
                raw.parse::<Location>(),
                Err(DungeonError::UnknownLocation(raw.to_string()))
            );
        }
    }

    #[test]
    fn direction_parses_either_case() {
        assert_eq!("n".parse::<Direction>(), Ok(Direction::North));
        assert_eq!("W".parse::<Direction>(), Ok(Direction::West));
        assert!("up".parse::<Direction>().is_err());
        assert_eq!(Direction::East.opposite(), Direction::West);
    }

    #[test]
    fn pick_targets_follow_front_end_tokens() {
        assert_eq!("r".parse(), Ok(PickTarget::Item(Resource::Ruby)));
        assert_eq!("A".parse(), Ok(PickTarget::Item(Resource::Arrow)));
        assert_eq!("AllTreasure".parse(), Ok(PickTarget::AllTreasure));
        assert_eq!("AllArrows".parse(), Ok(PickTarget::AllArrows));
        assert!("gold".parse::<PickTarget>().is_err());
    }

    #[test]
    fn edge_reports_other_endpoint() {
        let edge = Edge::new(Location::new(0, 3), Location::new(0, 0));
        assert_eq!(edge.other(Location::new(0, 0)), Some(Location::new(0, 3)));
        assert_eq!(edge.other(Location::new(1, 1)), None);
        assert!(edge.connects(Location::new(0, 0), Location::new(0, 3)));
        assert_eq!(edge.to_string(), "0-3=0-0");
    }

    #[test]
    fn stock_descriptions_match_front_end_layout() {
        let stock = Stock {
            diamonds: 1,
            sapphires: 0,
            rubies: 3,
            arrows: 2,
        };
        assert_eq!(
            stock.describe(),
            "Diamonds- 1 | Sapphires- 0 | Rubies- 3 | Arrows- 2"
        );
        assert_eq!(stock.describe_available(), "Diamonds- 1 | Rubies- 3 | Arrows- 2 | ");
        assert_eq!(stock.treasure_total(), 4);
        assert!(Stock::default().is_empty());
    }

    #[test]
    fn health_steps_down_to_dead() {
        assert_eq!(Health::Healthy.weakened(), Health::Injured);
        assert_eq!(Health::Injured.weakened(), Health::Dead);
        assert!(!Health::Dead.is_alive());
        assert_eq!(Health::Healthy.level(), 2);
    }
}

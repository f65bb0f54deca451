use thiserror::Error;

use crate::types::{Direction, Location, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DungeonError {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("no pair of caves at least {min_distance} moves apart after {attempts} attempts")]
    UnreachableTerminals { attempts: usize, min_distance: usize },

    #[error("cannot move {direction} from {from}")]
    InvalidMove { from: Location, direction: Direction },

    #[error("cannot pick {requested} {resource} at {location}, {available} available")]
    InvalidPickup {
        location: Location,
        resource: Resource,
        requested: u32,
        available: u32,
    },

    #[error("nothing to pick up at {location}")]
    NothingToPick { location: Location },

    #[error("invalid shot: {reason}")]
    InvalidShot { reason: String },

    #[error("illegal session state: {reason}")]
    IllegalSessionState { reason: String },

    #[error("unknown location: {0}")]
    UnknownLocation(String),

    #[error("unknown direction: {0}")]
    UnknownDirection(String),

    #[error("unknown item: {0}")]
    UnknownItem(String),
}

impl DungeonError {
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    pub fn invalid_shot(reason: impl Into<String>) -> Self {
        Self::InvalidShot {
            reason: reason.into(),
        }
    }

    pub fn illegal_session_state(reason: impl Into<String>) -> Self {
        Self::IllegalSessionState {
            reason: reason.into(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidMove { .. }
                | Self::InvalidPickup { .. }
                | Self::NothingToPick { .. }
                | Self::InvalidShot { .. }
                | Self::UnknownLocation(_)
                | Self::UnknownDirection(_)
                | Self::UnknownItem(_)
        )
    }
}

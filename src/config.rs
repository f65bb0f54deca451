use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{max_interconnectivity, MIN_DIMENSION};
use crate::error::DungeonError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DungeonConfig {
    pub rows: usize,
    pub cols: usize,
    pub interconnectivity: usize,
    pub wrap: bool,
    pub resource_percentage: u32,
    pub monster_count: usize,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 4,
            interconnectivity: 3,
            wrap: false,
            resource_percentage: 40,
            monster_count: 2,
        }
    }
}

impl DungeonConfig {
    pub fn new(
        rows: usize,
        cols: usize,
        interconnectivity: usize,
        wrap: bool,
        resource_percentage: u32,
        monster_count: usize,
    ) -> Self {
        Self {
            rows,
            cols,
            interconnectivity,
            wrap,
            resource_percentage,
            monster_count,
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, DungeonError> {
        let text = fs::read_to_string(path).map_err(|error| {
            DungeonError::invalid_configuration(format!(
                "cannot read {}: {error}",
                path.display()
            ))
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|error| {
            DungeonError::invalid_configuration(format!(
                "cannot parse {}: {error}",
                path.display()
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn validate(&self) -> Result<(), DungeonError> {
        if self.rows < MIN_DIMENSION || self.cols < MIN_DIMENSION {
            return Err(DungeonError::invalid_configuration(format!(
                "minimum dimension is {MIN_DIMENSION}x{MIN_DIMENSION}, got {}x{}",
                self.rows, self.cols
            )));
        }
        let max = max_interconnectivity(self.rows, self.cols, self.wrap);
        if self.interconnectivity > max {
            return Err(DungeonError::invalid_configuration(format!(
                "interconnectivity {} exceeds maximum {max}",
                self.interconnectivity
            )));
        }
        if self.resource_percentage > 100 {
            return Err(DungeonError::invalid_configuration(format!(
                "resource percentage {} is outside 0-100",
                self.resource_percentage
            )));
        }
        if self.monster_count < 1 {
            return Err(DungeonError::invalid_configuration(
                "at least one monster is required",
            ));
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

use crate::{Base, BaseId, Field, HeadingUnits, Position, SimulationError};

/// Identity and placement of one base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseConfig {
    pub id: BaseId,
    pub x: i32,
    pub y: i32,
}

impl BaseConfig {
    pub fn to_base(self) -> Base {
        Base::new(self.id, Position::new(self.x, self.y))
    }
}

/// Construction-time settings for a [`crate::Simulation`].
///
/// Missing fields fall back to [`SimulationConfig::default`] when
/// deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of agents rolled at construction.
    pub agent_count: usize,
    /// Width of the field; x is valid in `0..=width`.
    pub width: u32,
    /// Height of the field; y is valid in `0..=height`.
    pub height: u32,
    pub base_a: BaseConfig,
    pub base_b: BaseConfig,
    /// Shout range given to every generated agent.
    pub shout_range: u32,
    /// Inclusive lower bound of generated speeds.
    pub min_speed: u32,
    /// Exclusive upper bound of generated speeds.
    pub max_speed: u32,
    pub heading_units: HeadingUnits,
    /// Seed used by [`crate::Simulation::seeded`].
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            agent_count: 1_000,
            width: 500,
            height: 500,
            base_a: BaseConfig {
                id: BaseId::Yellow,
                x: 100,
                y: 100,
            },
            base_b: BaseConfig {
                id: BaseId::Blue,
                x: 400,
                y: 400,
            },
            shout_range: 10,
            min_speed: 2,
            max_speed: 5,
            heading_units: HeadingUnits::Raw,
            seed: 0x5EED_BA5E,
        }
    }
}

impl SimulationConfig {
    /// Checks the settings, returning the field they describe.
    pub fn validate(&self) -> Result<Field, SimulationError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimulationError::InvalidConfig(
                "field dimensions must be non-zero",
            ));
        }
        let (Ok(width), Ok(height)) = (i32::try_from(self.width), i32::try_from(self.height))
        else {
            return Err(SimulationError::InvalidConfig(
                "field dimensions must fit in i32",
            ));
        };
        if self.base_a.id == self.base_b.id {
            return Err(SimulationError::DuplicateBase(self.base_a.id));
        }
        if self.shout_range == 0 {
            return Err(SimulationError::InvalidConfig(
                "shout_range must be positive",
            ));
        }
        if self.min_speed >= self.max_speed {
            return Err(SimulationError::InvalidConfig(
                "min_speed must be below max_speed",
            ));
        }

        let field = Field::new(width, height);
        for base in [self.base_a, self.base_b] {
            if !field.contains(&Position::new(base.x, base.y)) {
                return Err(SimulationError::InvalidConfig(
                    "bases must lie inside the field",
                ));
            }
        }
        Ok(field)
    }
}

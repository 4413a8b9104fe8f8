use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod agent;
pub mod base;
pub mod config;
pub mod error;
pub mod field;
pub mod gossip;
pub mod render;
pub mod simulation;

pub use agent::{Agent, HeadingUnits};
pub use base::Base;
pub use config::{BaseConfig, SimulationConfig};
pub use error::SimulationError;
pub use field::Field;
pub use render::{Renderer, Rgb};
pub use simulation::{PopulationStats, Simulation, Snapshot, TickReport};

/// Represents a 2D coordinate in screen units.
///
/// Signed because agents may overshoot the field edge by one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Box (Chebyshev) proximity: both axis offsets strictly below `reach`.
    #[inline]
    pub fn within_box(&self, other: &Position, reach: u32) -> bool {
        self.x.abs_diff(other.x) < reach && self.y.abs_diff(other.y) < reach
    }
}

/// Identity of a base, doubling as its display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseId {
    Red,
    Blue,
    Green,
    Yellow,
}

impl BaseId {
    pub const ALL: [BaseId; 4] = [BaseId::Red, BaseId::Blue, BaseId::Green, BaseId::Yellow];

    /// Display color for this identifier.
    pub const fn color(self) -> Rgb {
        match self {
            BaseId::Red => Rgb::new(255, 25, 25),
            BaseId::Blue => Rgb::new(25, 25, 255),
            BaseId::Green => Rgb::new(25, 255, 25),
            BaseId::Yellow => Rgb::new(255, 255, 25),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BaseId::Red => "red",
            BaseId::Blue => "blue",
            BaseId::Green => "green",
            BaseId::Yellow => "yellow",
        }
    }
}

impl fmt::Display for BaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BaseId {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaseId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SimulationError::UnsupportedBase(s.to_string()))
    }
}

impl TryFrom<u8> for BaseId {
    type Error = SimulationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        BaseId::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| SimulationError::UnsupportedBase(value.to_string()))
    }
}

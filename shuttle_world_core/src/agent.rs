use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Base, BaseId, Field, Position};

/// How an agent's stored heading is turned into an angle for `cos`/`sin`.
///
/// Headings are always stored and mutated in degree-like units (random in
/// `0..360`, `+180` on reversal). `Raw` feeds that number to the trig
/// functions as if it were radians, so a "reversal" is really a turn by
/// `180 mod 2π` radians. `Degrees` converts first and makes `+180` an
/// actual about-face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingUnits {
    #[default]
    Raw,
    Degrees,
}

impl HeadingUnits {
    #[inline]
    pub fn to_radians(self, heading: f64) -> f64 {
        match self {
            HeadingUnits::Raw => heading,
            HeadingUnits::Degrees => heading.to_radians(),
        }
    }
}

/// What happened when an agent checked both bases after moving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Arrival {
    pub at_a: bool,
    pub at_b: bool,
    /// Number of times the agent reached its destination and turned back.
    pub turnarounds: u8,
}

/// A mobile entity shuttling between the two bases of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub(crate) position: Position,
    pub(crate) speed: f64,
    pub(crate) direction: f64,
    pub(crate) shout_range: u32,
    pub(crate) counter_a: u32,
    pub(crate) counter_b: u32,
    pub(crate) target: BaseId,
}

impl Agent {
    pub const DEFAULT_SHOUT_RANGE: u32 = 10;

    pub fn new(position: Position, speed: f64, direction: f64, target: BaseId) -> Self {
        Self {
            position,
            speed,
            direction,
            shout_range: Self::DEFAULT_SHOUT_RANGE,
            counter_a: 0,
            counter_b: 0,
            target,
        }
    }

    /// Rolls a fresh agent somewhere inside `field`.
    ///
    /// Speed and heading are whole numbers; the target is A or B with equal
    /// odds.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        field: &Field,
        speeds: Range<u32>,
        bases: (BaseId, BaseId),
    ) -> Self {
        let x = rng.random_range(0..field.width());
        let y = rng.random_range(0..field.height());
        let speed = rng.random_range(speeds);
        let direction = rng.random_range(0..360u32);
        let target = if rng.random_bool(0.5) { bases.0 } else { bases.1 };
        Self::new(Position::new(x, y), f64::from(speed), f64::from(direction), target)
    }

    pub fn with_shout_range(mut self, shout_range: u32) -> Self {
        self.shout_range = shout_range;
        self
    }

    pub fn with_counters(mut self, counter_a: u32, counter_b: u32) -> Self {
        self.counter_a = counter_a;
        self.counter_b = counter_b;
        self
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[inline]
    pub fn direction(&self) -> f64 {
        self.direction
    }

    #[inline]
    pub fn shout_range(&self) -> u32 {
        self.shout_range
    }

    /// Ticks since this agent last believed base A was visited.
    #[inline]
    pub fn counter_a(&self) -> u32 {
        self.counter_a
    }

    /// Ticks since this agent last believed base B was visited.
    #[inline]
    pub fn counter_b(&self) -> u32 {
        self.counter_b
    }

    #[inline]
    pub fn target(&self) -> BaseId {
        self.target
    }

    /// Displacement for one tick at the current heading and speed.
    pub fn step_vector(&self, units: HeadingUnits) -> (i32, i32) {
        let angle = units.to_radians(self.direction);
        let dx = (angle.cos() * self.speed).round() as i32;
        let dy = (angle.sin() * self.speed).round() as i32;
        (dx, dy)
    }

    pub(crate) fn reverse(&mut self) {
        self.direction += 180.0;
    }

    /// Moves one step, reflecting the heading if the step leaves `field`.
    ///
    /// The step computed before reflection is still applied, so the agent
    /// can end up one step outside the field. Returns how many axes
    /// reflected.
    pub(crate) fn advance(&mut self, field: &Field, units: HeadingUnits) -> u8 {
        let (dx, dy) = self.step_vector(units);
        let next_x = self.position.x.saturating_add(dx);
        let next_y = self.position.y.saturating_add(dy);

        let mut reflections = 0;
        if !field.contains_x(next_x) {
            self.reverse();
            reflections += 1;
        }
        if !field.contains_y(next_y) {
            self.reverse();
            reflections += 1;
        }

        self.position = Position::new(next_x, next_y);
        reflections
    }

    /// Both freshness counters grow stale by one tick.
    pub(crate) fn age(&mut self) {
        self.counter_a = self.counter_a.saturating_add(1);
        self.counter_b = self.counter_b.saturating_add(1);
    }

    /// Refreshes counters for any base the agent is standing on and turns
    /// around if that base was its destination.
    ///
    /// A is checked before B; with overlapping bases both can fire.
    pub(crate) fn arrive(&mut self, base_a: &Base, base_b: &Base) -> Arrival {
        let at_a = base_a.contains(&self.position);
        let at_b = base_b.contains(&self.position);
        let mut turnarounds = 0;

        if at_a {
            self.counter_a = 0;
            if self.target == base_a.id() {
                self.reverse();
                self.target = base_b.id();
                turnarounds += 1;
            }
        }

        if at_b {
            self.counter_b = 0;
            if self.target == base_b.id() {
                self.reverse();
                self.target = base_a.id();
                turnarounds += 1;
            }
        }

        Arrival {
            at_a,
            at_b,
            turnarounds,
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::Position;

/// The rectangular area agents move in.
///
/// Both edges are inclusive: an agent may stand exactly on `width` or
/// `height` without being reflected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    width: i32,
    height: i32,
}

impl Field {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn contains_x(&self, x: i32) -> bool {
        (0..=self.width).contains(&x)
    }

    #[inline]
    pub fn contains_y(&self, y: i32) -> bool {
        (0..=self.height).contains(&y)
    }

    #[inline]
    pub fn contains(&self, position: &Position) -> bool {
        self.contains_x(position.x) && self.contains_y(position.y)
    }
}

use serde::{Deserialize, Serialize};

use crate::{BaseId, Position};

/// A fixed rally point agents travel toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base {
    id: BaseId,
    position: Position,
}

impl Base {
    /// Half-width of the square arrival zone around every base.
    pub const RADIUS: u32 = 20;

    pub const fn new(id: BaseId, position: Position) -> Self {
        Self { id, position }
    }

    #[inline]
    pub fn id(&self) -> BaseId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether `position` lies inside the arrival box of this base.
    ///
    /// This is a box test on each axis, not a Euclidean distance.
    #[inline]
    pub fn contains(&self, position: &Position) -> bool {
        self.position.within_box(position, Self::RADIUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Base {
        Base::new(BaseId::Yellow, Position::new(100, 100))
    }

    #[test]
    fn inside_the_box_counts_as_arrived() {
        assert!(base().contains(&Position::new(100, 100)));
        assert!(base().contains(&Position::new(119, 81)));
    }

    #[test]
    fn box_edge_is_exclusive() {
        assert!(!base().contains(&Position::new(120, 100)));
        assert!(!base().contains(&Position::new(100, 80)));
    }

    #[test]
    fn corner_of_the_box_is_inside_even_beyond_euclidean_radius() {
        // (19, 19) is ~26.9 units away but still inside the square.
        assert!(base().contains(&Position::new(119, 119)));
    }

    #[test]
    fn one_axis_outside_rejects() {
        let r = Base::RADIUS as i32;
        assert!(!base().contains(&Position::new(100 + r - 1, 100 + r + 5)));
    }
}

//! Room-local grid positions.
//!
//! A room is a 50x50 tile grid. Distances use the Chebyshev metric:
//! diagonal steps cost the same as straight ones.

use serde::{Deserialize, Serialize};

/// Width and height of a room in tiles.
pub const ROOM_SIZE: u8 = 50;

/// A tile inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column, `0..ROOM_SIZE`.
    pub x: u8,
    /// Row, `0..ROOM_SIZE`.
    pub y: u8,
}

impl Position {
    /// Create a position, clamping both coordinates into the room.
    pub const fn new(x: u8, y: u8) -> Self {
        let max = ROOM_SIZE.saturating_sub(1);
        Self {
            x: if x > max { max } else { x },
            y: if y > max { max } else { y },
        }
    }

    /// Chebyshev distance to another tile.
    pub const fn range_to(self, other: Self) -> u8 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }

    /// Whether `other` is within `range` tiles.
    pub const fn in_range_to(self, other: Self, range: u8) -> bool {
        self.range_to(other) <= range
    }

    /// The neighbouring tile one step closer to `goal` (or `self` when
    /// already there).
    pub const fn step_toward(self, goal: Self) -> Self {
        Self {
            x: step_axis(self.x, goal.x),
            y: step_axis(self.y, goal.y),
        }
    }
}

const fn step_axis(from: u8, to: u8) -> u8 {
    if from < to {
        from.saturating_add(1)
    } else if from > to {
        from.saturating_sub(1)
    } else {
        from
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_chebyshev() {
        let a = Position::new(10, 10);
        assert_eq!(a.range_to(Position::new(13, 11)), 3);
        assert_eq!(a.range_to(Position::new(10, 10)), 0);
        assert_eq!(a.range_to(Position::new(7, 14)), 4);
    }

    #[test]
    fn new_clamps_into_room() {
        let p = Position::new(80, 49);
        assert_eq!(p, Position { x: 49, y: 49 });
    }

    #[test]
    fn step_moves_diagonally() {
        let p = Position::new(5, 5).step_toward(Position::new(9, 2));
        assert_eq!(p, Position::new(6, 4));
        let here = Position::new(3, 3);
        assert_eq!(here.step_toward(here), here);
    }
}

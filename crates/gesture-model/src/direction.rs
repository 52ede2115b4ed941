//! Direction flags for flicks and swipes.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// A set of direction flags.
///
/// Horizontal and vertical flags are independent, so a diagonal motion
/// carries one of each. An empty set means the motion stayed within the
/// noise threshold on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Direction(u8);

impl Direction {
    pub const NONE: Direction = Direction(0);
    pub const UP: Direction = Direction(1);
    pub const DOWN: Direction = Direction(2);
    pub const LEFT: Direction = Direction(4);
    pub const RIGHT: Direction = Direction(8);

    /// Build from raw bits, dropping unknown ones.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Direction) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_up(self) -> bool {
        self.contains(Self::UP)
    }

    pub fn is_down(self) -> bool {
        self.contains(Self::DOWN)
    }

    pub fn is_left(self) -> bool {
        self.contains(Self::LEFT)
    }

    pub fn is_right(self) -> bool {
        self.contains(Self::RIGHT)
    }

    /// No UP or DOWN flag.
    pub fn has_no_vertical(self) -> bool {
        self.0 & (Self::UP.0 | Self::DOWN.0) == 0
    }

    /// No LEFT or RIGHT flag.
    pub fn has_no_horizontal(self) -> bool {
        self.0 & (Self::LEFT.0 | Self::RIGHT.0) == 0
    }

    /// Direction of travel from `start` to `end`.
    ///
    /// An axis whose displacement is smaller than `correction` in magnitude
    /// is treated as drift and contributes no flag.
    pub fn between(start: Point, end: Point, correction: f64) -> Self {
        let dx = suppress_drift(end.x - start.x, correction);
        let dy = suppress_drift(end.y - start.y, correction);

        let mut dir = Self::NONE;
        if dx != 0.0 {
            dir |= if dx < 0.0 { Self::LEFT } else { Self::RIGHT };
        }
        if dy != 0.0 {
            dir |= if dy < 0.0 { Self::DOWN } else { Self::UP };
        }
        dir
    }
}

fn suppress_drift(delta: f64, correction: f64) -> f64 {
    if delta.abs() < correction {
        0.0
    } else {
        delta
    }
}

impl BitOr for Direction {
    type Output = Direction;

    fn bitor(self, rhs: Direction) -> Direction {
        Direction(self.0 | rhs.0)
    }
}

impl BitOrAssign for Direction {
    fn bitor_assign(&mut self, rhs: Direction) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names = [
            (Self::UP, "up"),
            (Self::DOWN, "down"),
            (Self::LEFT, "left"),
            (Self::RIGHT, "right"),
        ];
        let parts: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&parts.join("+"))
    }
}

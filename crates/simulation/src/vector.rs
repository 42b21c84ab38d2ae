//! Integer 2D vectors: grid positions, offsets, and the gravity direction
//! all share this one type.

use std::fmt;
use std::ops::Add;

/// Signed grid vector. Doubles as a position and as a direction offset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    /// Default gravity: positive y is "down" in bitmap coordinates.
    pub const DOWN: Vec2 = Vec2::new(0, 1);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 90° clockwise rotation in bitmap coordinates: (x, y) → (-y, x).
    #[must_use]
    pub const fn rotate_cw(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// 90° counter-clockwise rotation, derived as three clockwise turns
    /// so the two rotations can never drift apart.
    #[must_use]
    pub const fn rotate_ccw(self) -> Self {
        self.rotate_cw().rotate_cw().rotate_cw()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

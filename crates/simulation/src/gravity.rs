//! Gravity-relative target computation over the occupancy field.
//!
//! "Left" and "right" are always relative to the current gravity vector:
//! LEFT is gravity rotated 90° clockwise, RIGHT counter-clockwise. A grain
//! therefore needs no notion of orientation — it only asks for straight and
//! side targets and the answers follow gravity wherever it points.

use crate::field::OccupancyField;
use crate::vector::Vec2;
use std::fmt;

/// Rotation command issued by the host (keyboard, auto-rotate timer).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rotation {
    Cw,
    Ccw,
}

/// Gravity-relative side of a diagonal fall target.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    Left,
    Right,
}

/// Sideways reach of a diagonal target: one cell, or two (the skip move
/// that lets grains slide off steep piles).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Skip {
    One,
    Two,
}

/// Compass-style gravity label, reported to the host on every rotation so
/// it can spin the UI and log the new orientation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GravityDirection {
    Down,
    Left,
    Up,
    Right,
}

impl GravityDirection {
    /// Label for an axis-aligned unit vector, None for anything else.
    #[must_use]
    pub fn from_vector(v: Vec2) -> Option<Self> {
        match (v.x, v.y) {
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (0, -1) => Some(Self::Up),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }
}

impl fmt::Display for GravityDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Down => write!(f, "down"),
            Self::Left => write!(f, "left"),
            Self::Up => write!(f, "up"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Occupancy field plus the current gravity vector.
#[derive(Debug)]
pub struct GravityField {
    field: OccupancyField,
    gravity: Vec2,
}

impl GravityField {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            field: OccupancyField::new(width, height),
            gravity: Vec2::DOWN,
        }
    }

    #[must_use]
    pub fn field(&self) -> &OccupancyField {
        &self.field
    }

    #[must_use]
    pub fn field_mut(&mut self) -> &mut OccupancyField {
        &mut self.field
    }

    #[must_use]
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Replace the gravity vector unconditionally. Callers are expected to
    /// pass axis-aligned unit vectors only.
    pub fn set_gravity(&mut self, v: Vec2) {
        self.gravity = v;
    }

    /// Rotate gravity 90° and report the new orientation. The returned
    /// label is the gravity-change event the host forwards to its
    /// orientation display.
    pub fn rotate(&mut self, rotation: Rotation) -> Option<GravityDirection> {
        self.gravity = match rotation {
            Rotation::Cw => self.gravity.rotate_cw(),
            Rotation::Ccw => self.gravity.rotate_ccw(),
        };
        GravityDirection::from_vector(self.gravity)
    }

    /// Target one cell straight along gravity, or None at the grid edge.
    #[must_use]
    pub fn straight_target(&self, pos: Vec2) -> Option<Vec2> {
        let target = pos + self.gravity;
        self.field.in_bounds(target).then_some(target)
    }

    /// Diagonal target: full gravity step plus one or two sideways steps.
    /// Skip::Two doubles the side vector but never the gravity component.
    #[must_use]
    pub fn side_target(&self, pos: Vec2, side: Side, skip: Skip) -> Option<Vec2> {
        let sideways = match side {
            Side::Left => self.gravity.rotate_cw(),
            Side::Right => self.gravity.rotate_ccw(),
        };
        let sideways = match skip {
            Skip::One => sideways,
            Skip::Two => sideways + sideways,
        };
        let target = pos + self.gravity + sideways;
        self.field.in_bounds(target).then_some(target)
    }

    /// Back to default down-gravity with an all-empty field.
    pub fn reset_state(&mut self) {
        self.gravity = Vec2::DOWN;
        self.field.clear();
    }
}

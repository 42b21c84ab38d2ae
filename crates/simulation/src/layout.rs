//! Start layouts: where grains are placed on reinitialization.
//!
//! Placement is policy, not core mechanics — `Simulation::reinitialize`
//! only sees a `FnMut(usize) -> Vec2` callback. The three layouts here are
//! the stock policies: a seeded uniform scatter, a diagonal dune line, and
//! an organised row-major fill spaced by the fill ratio.

use crate::vector::Vec2;
use rand::rngs::SmallRng;
use rand::Rng;

/// Default fraction of grid cells populated at reinitialization.
pub const DEFAULT_FILL: f64 = 0.62;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum StartLayout {
    #[default]
    Messy,
    Dune,
    Organised,
}

impl StartLayout {
    /// Parse a host-supplied layout name; unknown names fall back to Messy.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "dune" => Self::Dune,
            "organised" => Self::Organised,
            _ => Self::Messy,
        }
    }
}

/// Grain count for a grid at the given fill ratio. Fractional counts round
/// up, so any nonzero fill yields at least one grain.
#[must_use]
pub fn grain_count(width: i32, height: i32, fill: f64) -> usize {
    ((width as f64) * (height as f64) * fill).ceil() as usize
}

/// Build the placement callback for a layout. `rng` drives the Messy
/// scatter only; the other layouts are fully deterministic in the grain
/// index.
pub fn placer(
    layout: StartLayout,
    width: i32,
    height: i32,
    fill: f64,
    rng: &mut SmallRng,
) -> impl FnMut(usize) -> Vec2 + '_ {
    move |i| match layout {
        StartLayout::Messy => Vec2::new(rng.gen_range(0..width), rng.gen_range(0..height)),
        StartLayout::Dune => {
            let d = (i as i32) % width;
            Vec2::new(d, d)
        }
        StartLayout::Organised => {
            let x = (i as i32) % width;
            let row = (i as f64 / f64::from(width)).ceil();
            let y = (row * (1.0 / fill)).ceil() as i32;
            Vec2::new(x, y)
        }
    }
}

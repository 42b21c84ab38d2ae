//! Falling sand simulation with rotatable gravity.
//!
//! Grains settle on a discrete occupancy grid under a gravity vector the
//! host can rotate in 90° steps. The host drives the loop: call
//! [`Simulation::advance`] once per animation frame and stop scheduling
//! frames once [`Simulation::all_settled`] reports true; any rotation or
//! reinitialization wakes the grains and the loop starts again.

pub mod field;
pub mod grain;
pub mod gravity;
pub mod layout;
pub mod vector;
pub mod wasm;

use grain::{Alternator, Grain};
use gravity::{GravityDirection, GravityField, Rotation};
use vector::Vec2;

/// Grains that fail to move for more than this many consecutive ticks are
/// settled; floor of the width-derived threshold.
const MIN_SETTLE_THRESHOLD: i32 = 32;

/// Simulation ticks batched into one animation frame, one per 64 columns.
const COLUMNS_PER_STEP: i32 = 64;

/// The simulation driver: grain list, gravity field, and the shared
/// left/right alternator, advanced tick by tick.
#[derive(Debug)]
pub struct Simulation {
    field: GravityField,
    grains: Vec<Grain>,
    alternator: Alternator,
    settle_threshold: u32,
    steps_per_frame: u32,
}

impl Simulation {
    /// Empty simulation sized to the render surface. The settle threshold
    /// is `max(width, 32)` and the per-frame tick batch grows with width so
    /// large grids settle in comparable wall time.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            field: GravityField::new(width, height),
            grains: Vec::new(),
            alternator: Alternator::new(),
            settle_threshold: width.max(MIN_SETTLE_THRESHOLD) as u32,
            steps_per_frame: ((width + COLUMNS_PER_STEP - 1) / COLUMNS_PER_STEP).max(1) as u32,
        }
    }

    #[must_use]
    pub fn field(&self) -> &GravityField {
        &self.field
    }

    #[must_use]
    pub fn grains(&self) -> &[Grain] {
        &self.grains
    }

    #[must_use]
    pub fn settle_threshold(&self) -> u32 {
        self.settle_threshold
    }

    #[must_use]
    pub fn steps_per_frame(&self) -> u32 {
        self.steps_per_frame
    }

    /// One fall attempt for every grain, in creation order. Later grains
    /// see earlier grains' completed moves (sequential semantics).
    pub fn tick(&mut self) {
        for grain in &mut self.grains {
            grain.fall(&mut self.field, &mut self.alternator, self.settle_threshold);
        }
    }

    /// Run `steps` ticks back to back — the per-frame batch.
    pub fn advance(&mut self, steps: u32) {
        for _ in 0..steps {
            self.tick();
        }
    }

    /// True once every grain is settled (vacuously true with no grains).
    /// The host stops scheduling frames when this holds.
    #[must_use]
    pub fn all_settled(&self) -> bool {
        self.grains
            .iter()
            .all(|grain| grain.is_settled(self.settle_threshold))
    }

    /// Reset every grain's settle counter. Called on any external restart
    /// trigger: rotation, reinitialization, click, sensor update.
    pub fn wake(&mut self) {
        for grain in &mut self.grains {
            grain.reset_settled_counter();
        }
    }

    /// Rotate gravity 90° and wake all grains. Returns the new orientation
    /// for the host's display.
    pub fn rotate(&mut self, rotation: Rotation) -> Option<GravityDirection> {
        let direction = self.field.rotate(rotation);
        self.wake();
        direction
    }

    /// Set gravity from a sensor angle, quantized to the nearest 90°.
    /// 0° is down; each quarter turn adds one clockwise rotation to the
    /// down vector (90°→CW, 180°→CW², 270°→CW³).
    pub fn set_gravity_from_angle(&mut self, degrees: f64) -> Option<GravityDirection> {
        let quarter = ((degrees.rem_euclid(360.0) / 90.0).round() as i32 * 90) % 360;
        let mut gravity = Vec2::DOWN;
        for _ in 0..quarter / 90 {
            gravity = gravity.rotate_cw();
        }
        self.field.set_gravity(gravity);
        self.wake();
        GravityDirection::from_vector(gravity)
    }

    /// Discard all grains, reset gravity and occupancy, and spawn `count`
    /// grains from the placement and color callbacks. Spawning marks the
    /// grain's cell occupied; a placement that lands out of bounds or on an
    /// already occupied cell is skipped, keeping positions injective.
    pub fn reinitialize<P, C>(&mut self, count: usize, mut place: P, mut color: C)
    where
        P: FnMut(usize) -> Vec2,
        C: FnMut(Vec2) -> u32,
    {
        self.grains.clear();
        self.field.reset_state();
        for i in 0..count {
            let pos = place(i);
            if !self.field.field().is_empty(pos) {
                continue;
            }
            self.field.field_mut().set(pos, true);
            self.grains.push(Grain::new(pos, color(pos)));
        }
    }
}

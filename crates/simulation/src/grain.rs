//! One sand grain and its fall resolution.
//!
//! The diagonal left/right preference comes from a single [`Alternator`]
//! shared by every grain in the simulation. It flips on every consultation,
//! so the apparent randomness is a deterministic flip-flop over the global
//! sequence of fall attempts — two consultations in the same tick (skip-1
//! failed, trying skip-2) land on opposite sides of the flip.

use crate::gravity::{GravityField, Side, Skip};
use crate::vector::Vec2;

/// Shared left/right flip-flop. One per simulation, threaded through every
/// fall attempt; never per-grain and never random.
#[derive(Debug, Default)]
pub struct Alternator {
    toggle: bool,
}

impl Alternator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip, then read: the first consultation yields Left.
    pub fn next_side(&mut self) -> Side {
        self.toggle = !self.toggle;
        if self.toggle {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// A single particle: grid position, an opaque color payload for the
/// renderer, and a counter of consecutive ticks spent unable to move.
#[derive(Debug)]
pub struct Grain {
    pos: Vec2,
    color: u32,
    settled_ticks: u32,
}

impl Grain {
    #[must_use]
    pub fn new(pos: Vec2, color: u32) -> Self {
        Self {
            pos,
            color,
            settled_ticks: 0,
        }
    }

    #[must_use]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[must_use]
    pub fn color(&self) -> u32 {
        self.color
    }

    #[must_use]
    pub fn settled_ticks(&self) -> u32 {
        self.settled_ticks
    }

    /// Settled means the grain has exceeded the threshold of consecutive
    /// failed moves and is skipped until woken.
    #[must_use]
    pub fn is_settled(&self, settle_threshold: u32) -> bool {
        self.settled_ticks > settle_threshold
    }

    /// Restart the settle countdown, e.g. after gravity changed.
    pub fn reset_settled_counter(&mut self) {
        self.settled_ticks = 0;
    }

    /// One fall attempt. At most three target cells are probed, in fixed
    /// preference order:
    ///
    /// 1. straight along gravity;
    /// 2. the alternator's side, one cell sideways;
    /// 3. the alternator's *next* side (a fresh flip — the opposite side is
    ///    deliberately not retried at skip 1), two cells sideways.
    ///
    /// A successful move vacates the old cell and occupies the new one in
    /// the same call, and resets the settle counter. If all three probes
    /// fail the counter increments. Returns whether the grain moved.
    pub fn fall(
        &mut self,
        field: &mut GravityField,
        alternator: &mut Alternator,
        settle_threshold: u32,
    ) -> bool {
        if self.is_settled(settle_threshold) {
            return false;
        }

        if let Some(target) = field.straight_target(self.pos) {
            if self.attempt_fall(field, target) {
                return true;
            }
        }

        let side = alternator.next_side();
        if let Some(target) = field.side_target(self.pos, side, Skip::One) {
            if self.attempt_fall(field, target) {
                return true;
            }
        }

        let side = alternator.next_side();
        if let Some(target) = field.side_target(self.pos, side, Skip::Two) {
            if self.attempt_fall(field, target) {
                return true;
            }
        }

        self.settled_ticks += 1;
        false
    }

    /// Move into `target` if it is empty: vacate, occupy, update position.
    /// Both field writes happen inside this one call, so no observer ever
    /// sees a half-applied move.
    fn attempt_fall(&mut self, field: &mut GravityField, target: Vec2) -> bool {
        if !field.field().is_empty(target) {
            return false;
        }
        field.field_mut().set(self.pos, false);
        field.field_mut().set(target, true);
        self.pos = target;
        self.settled_ticks = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: u32 = 32;

    fn spawn(field: &mut GravityField, pos: Vec2) -> Grain {
        field.field_mut().set(pos, true);
        Grain::new(pos, 0)
    }

    #[test]
    fn alternator_flips_starting_left() {
        let mut alt = Alternator::new();
        assert_eq!(alt.next_side(), Side::Left);
        assert_eq!(alt.next_side(), Side::Right);
        assert_eq!(alt.next_side(), Side::Left);
        assert_eq!(alt.next_side(), Side::Right);
    }

    #[test]
    fn falls_straight_when_below_is_empty() {
        let mut field = GravityField::new(5, 5);
        let mut alt = Alternator::new();
        let mut grain = spawn(&mut field, Vec2::new(2, 0));

        assert!(grain.fall(&mut field, &mut alt, THRESHOLD));
        assert_eq!(grain.pos(), Vec2::new(2, 1));
        assert!(field.field().is_empty(Vec2::new(2, 0)));
        assert!(!field.field().is_empty(Vec2::new(2, 1)));
        // Straight fall never consults the alternator.
        assert_eq!(alt.next_side(), Side::Left);
    }

    #[test]
    fn blocked_below_falls_diagonally_left_first() {
        let mut field = GravityField::new(5, 5);
        let mut alt = Alternator::new();
        field.field_mut().set(Vec2::new(2, 2), true); // blocker below
        let mut grain = spawn(&mut field, Vec2::new(2, 1));

        assert!(grain.fall(&mut field, &mut alt, THRESHOLD));
        // Fresh alternator chooses Left = down-left in bitmap coordinates.
        assert_eq!(grain.pos(), Vec2::new(1, 2));
        assert!(!field.field().is_empty(Vec2::new(2, 2)));
    }

    #[test]
    fn skip_one_failure_retoggles_for_skip_two() {
        let mut field = GravityField::new(7, 7);
        let mut alt = Alternator::new();
        // Block straight down and down-left (the first toggle's pick), and
        // leave down-right-2 open: the second toggle picks Right, skip 2.
        field.field_mut().set(Vec2::new(3, 3), true);
        field.field_mut().set(Vec2::new(2, 3), true);
        let mut grain = spawn(&mut field, Vec2::new(3, 2));

        assert!(grain.fall(&mut field, &mut alt, THRESHOLD));
        assert_eq!(grain.pos(), Vec2::new(5, 3));
    }

    #[test]
    fn opposite_side_at_skip_one_is_never_probed() {
        let mut field = GravityField::new(7, 7);
        let mut alt = Alternator::new();
        // Straight, down-left-1 and down-right-2 blocked; down-right-1 is
        // open but must NOT be taken — the algorithm retries only at skip 2.
        field.field_mut().set(Vec2::new(3, 3), true);
        field.field_mut().set(Vec2::new(2, 3), true);
        field.field_mut().set(Vec2::new(5, 3), true);
        let mut grain = spawn(&mut field, Vec2::new(3, 2));

        assert!(!grain.fall(&mut field, &mut alt, THRESHOLD));
        assert_eq!(grain.pos(), Vec2::new(3, 2));
        assert_eq!(grain.settled_ticks(), 1);
        assert!(field.field().is_empty(Vec2::new(4, 3)));
    }

    #[test]
    fn settle_counter_increments_while_stuck_and_resets_on_move() {
        let mut field = GravityField::new(3, 3);
        let mut alt = Alternator::new();
        let mut grain = spawn(&mut field, Vec2::new(1, 2)); // on the floor

        for expected in 1..=4 {
            assert!(!grain.fall(&mut field, &mut alt, THRESHOLD));
            assert_eq!(grain.settled_ticks(), expected);
        }

        grain.reset_settled_counter();
        assert_eq!(grain.settled_ticks(), 0);
    }

    #[test]
    fn settled_grain_skips_fall_and_stops_counting() {
        let mut field = GravityField::new(3, 3);
        let mut alt = Alternator::new();
        let mut grain = spawn(&mut field, Vec2::new(1, 2));
        grain.settled_ticks = THRESHOLD + 1;

        assert!(grain.is_settled(THRESHOLD));
        assert!(!grain.fall(&mut field, &mut alt, THRESHOLD));
        assert_eq!(grain.settled_ticks(), THRESHOLD + 1);
        // A settled grain never consults the alternator either.
        assert_eq!(alt.next_side(), Side::Left);
    }

    #[test]
    fn move_is_atomic_in_the_occupancy_field() {
        let mut field = GravityField::new(5, 5);
        let mut alt = Alternator::new();
        let mut grain = spawn(&mut field, Vec2::new(2, 0));
        assert_eq!(field.field().occupied_count(), 1);

        grain.fall(&mut field, &mut alt, THRESHOLD);
        assert_eq!(field.field().occupied_count(), 1);
        assert!(!field.field().is_empty(grain.pos()));
    }
}

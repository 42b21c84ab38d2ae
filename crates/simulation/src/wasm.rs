//! WASM host boundary.
//!
//! The browser owns the canvas, the event wiring, and the frame scheduler;
//! this facade owns everything else. Per frame the host calls
//! [`SandMixer::advance_frame`] and then reads [`SandMixer::positions`] and
//! [`SandMixer::colors`] to draw each grain as a unit pixel, until
//! [`SandMixer::all_settled`] reports the simulation has gone quiet.
//!
//! Gravity changes are echoed to the browser console so the host's
//! orientation display and logs stay in step with the grid.

use crate::gravity::Rotation;
use crate::layout::{self, StartLayout};
use crate::vector::Vec2;
use crate::Simulation;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

/// Grain color ramp: hue runs along the gravity axis of the start field.
/// Mirrors of the host's palette presets arrive as plain numbers.
#[derive(Debug, Clone, Copy)]
struct Palette {
    hue_rotate: f64,
    hue_range: f64,
    saturation: f64,
    lightness: f64,
    hue_reverse: bool,
}

#[wasm_bindgen]
#[derive(Debug)]
pub struct SandMixer {
    sim: Simulation,
    rng: SmallRng,
}

#[wasm_bindgen]
impl SandMixer {
    /// Simulation sized to the canvas. `seed` drives the messy scatter so
    /// hosts can replay a run.
    #[wasm_bindgen(constructor)]
    pub fn new(width: i32, height: i32, seed: u32) -> SandMixer {
        SandMixer {
            sim: Simulation::new(width, height),
            rng: SmallRng::seed_from_u64(u64::from(seed)),
        }
    }

    /// Throw away the current sand and repopulate. `layout` is one of
    /// "messy", "dune", "organised" (anything else falls back to messy);
    /// `fill` is the fraction of cells to populate; the remaining arguments
    /// are the palette preset in HSL terms.
    #[allow(clippy::too_many_arguments)]
    pub fn reinitialize(
        &mut self,
        layout: &str,
        fill: f64,
        hue_rotate: f64,
        hue_range: f64,
        saturation: f64,
        lightness: f64,
        hue_reverse: bool,
    ) {
        let width = self.sim.field().field().width();
        let height = self.sim.field().field().height();
        let count = layout::grain_count(width, height, fill);
        let palette = Palette {
            hue_rotate,
            hue_range,
            saturation,
            lightness,
            hue_reverse,
        };
        let place = layout::placer(
            StartLayout::from_name(layout),
            width,
            height,
            fill,
            &mut self.rng,
        );
        self.sim
            .reinitialize(count, place, |pos| grain_color(pos, height, palette));
    }

    /// One animation frame's worth of simulation ticks.
    pub fn advance_frame(&mut self) {
        self.sim.advance(self.sim.steps_per_frame());
    }

    /// A single simulation tick, for hosts that do their own batching.
    pub fn tick(&mut self) {
        self.sim.tick();
    }

    #[must_use]
    pub fn all_settled(&self) -> bool {
        self.sim.all_settled()
    }

    pub fn rotate_cw(&mut self) {
        let direction = self.sim.rotate(Rotation::Cw);
        notify_gravity(direction.map(|d| d.to_string()));
    }

    pub fn rotate_ccw(&mut self) {
        let direction = self.sim.rotate(Rotation::Ccw);
        notify_gravity(direction.map(|d| d.to_string()));
    }

    /// Sensor-driven gravity: quantized to the nearest quarter turn.
    pub fn set_gravity_from_angle(&mut self, degrees: f64) {
        let direction = self.sim.set_gravity_from_angle(degrees);
        notify_gravity(direction.map(|d| d.to_string()));
    }

    /// Compass label of the current gravity, for the orientation display.
    #[must_use]
    pub fn gravity_label(&self) -> String {
        crate::gravity::GravityDirection::from_vector(self.sim.field().gravity())
            .map_or_else(|| "unknown".into(), |d| d.to_string())
    }

    /// Wake all grains without changing anything else (canvas click).
    pub fn wake(&mut self) {
        self.sim.wake();
    }

    /// Grain coordinates in creation order, interleaved x,y — one unit
    /// pixel each for the renderer.
    #[must_use]
    pub fn positions(&self) -> Vec<i32> {
        let mut out = Vec::with_capacity(self.sim.grains().len() * 2);
        for grain in self.sim.grains() {
            out.push(grain.pos().x);
            out.push(grain.pos().y);
        }
        out
    }

    /// Packed 0xRRGGBB grain colors, parallel to `positions()`.
    #[must_use]
    pub fn colors(&self) -> Vec<u32> {
        self.sim.grains().iter().map(|g| g.color()).collect()
    }

    #[must_use]
    pub fn grain_count(&self) -> usize {
        self.sim.grains().len()
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.sim.field().field().width()
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.sim.field().field().height()
    }

    #[must_use]
    pub fn steps_per_frame(&self) -> u32 {
        self.sim.steps_per_frame()
    }
}

/// Echo a gravity change to the browser console.
fn notify_gravity(label: Option<String>) {
    #[cfg(target_arch = "wasm32")]
    if let Some(label) = label {
        web_sys::console::log_1(&format!("gravity {label}").into());
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = label;
}

/// Hue ramps along y (or reversed for palettes that read bottom-up).
fn grain_color(pos: Vec2, height: i32, palette: Palette) -> u32 {
    let max_y = f64::from(height);
    let y = if palette.hue_reverse {
        max_y - f64::from(pos.y)
    } else {
        f64::from(pos.y)
    };
    let hue = palette.hue_rotate + (y / max_y) * palette.hue_range;
    hsl_to_rgb(hue, palette.saturation, palette.lightness)
}

/// HSL (degrees, percent, percent) to packed 0xRRGGBB.
fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> u32 {
    let h = hue.rem_euclid(360.0);
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 / 60 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u32;
    (to_byte(r) << 16) | (to_byte(g) << 8) | to_byte(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_primaries_convert_exactly() {
        assert_eq!(hsl_to_rgb(0.0, 100.0, 50.0), 0x00FF_0000);
        assert_eq!(hsl_to_rgb(120.0, 100.0, 50.0), 0x0000_FF00);
        assert_eq!(hsl_to_rgb(240.0, 100.0, 50.0), 0x0000_00FF);
        assert_eq!(hsl_to_rgb(0.0, 0.0, 100.0), 0x00FF_FFFF);
        assert_eq!(hsl_to_rgb(0.0, 0.0, 0.0), 0);
    }

    #[test]
    fn hsl_hue_wraps_past_360() {
        assert_eq!(hsl_to_rgb(360.0, 100.0, 50.0), hsl_to_rgb(0.0, 100.0, 50.0));
        assert_eq!(hsl_to_rgb(480.0, 70.0, 60.0), hsl_to_rgb(120.0, 70.0, 60.0));
    }

    #[test]
    fn color_ramp_follows_y_and_reverses() {
        let palette = Palette {
            hue_rotate: 10.0,
            hue_range: 40.0,
            saturation: 60.0,
            lightness: 60.0,
            hue_reverse: false,
        };
        let top = grain_color(Vec2::new(0, 0), 100, palette);
        assert_eq!(top, hsl_to_rgb(10.0, 60.0, 60.0));
        let bottom = grain_color(Vec2::new(0, 100), 100, palette);
        assert_eq!(bottom, hsl_to_rgb(50.0, 60.0, 60.0));

        let reversed = Palette {
            hue_reverse: true,
            ..palette
        };
        assert_eq!(grain_color(Vec2::new(0, 100), 100, reversed), top);
    }

    #[test]
    fn facade_reinitialize_populates_and_reports_buffers() {
        let mut mixer = SandMixer::new(16, 16, 42);
        mixer.reinitialize("organised", 0.5, 180.0, 100.0, 50.0, 50.0, false);

        let count = mixer.grain_count();
        assert!(count > 0);
        assert_eq!(mixer.positions().len(), count * 2);
        assert_eq!(mixer.colors().len(), count);
        for pair in mixer.positions().chunks(2) {
            assert!((0..16).contains(&pair[0]));
            assert!((0..16).contains(&pair[1]));
        }
    }

    #[test]
    fn facade_seed_makes_messy_runs_reproducible() {
        let mut a = SandMixer::new(24, 24, 7);
        let mut b = SandMixer::new(24, 24, 7);
        a.reinitialize("messy", 0.3, 0.0, 350.0, 70.0, 60.0, false);
        b.reinitialize("messy", 0.3, 0.0, 350.0, 70.0, 60.0, false);
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.colors(), b.colors());

        a.advance_frame();
        b.advance_frame();
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn facade_rotation_updates_label_and_wakes() {
        let mut mixer = SandMixer::new(8, 8, 1);
        assert_eq!(mixer.gravity_label(), "down");
        mixer.rotate_cw();
        assert_eq!(mixer.gravity_label(), "left");
        mixer.rotate_ccw();
        assert_eq!(mixer.gravity_label(), "down");
        mixer.set_gravity_from_angle(180.0);
        assert_eq!(mixer.gravity_label(), "up");
    }

    #[test]
    fn facade_run_settles_a_small_grid() {
        let mut mixer = SandMixer::new(16, 16, 3);
        mixer.reinitialize("dune", 0.62, 40.0, 15.0, 30.0, 80.0, true);
        assert!(!mixer.all_settled());

        for _ in 0..200 {
            if mixer.all_settled() {
                break;
            }
            mixer.advance_frame();
        }
        assert!(mixer.all_settled());
    }
}

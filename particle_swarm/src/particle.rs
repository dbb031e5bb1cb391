//! A single particle and its update rule.
//!
//! Particles are plain `Copy` records; [`Particle::step`] is a pure function
//! of the particle, the gesture snapshot, the canvas extent and an RNG, so
//! the physics can be tested without a window.
//!
//! ## Converge (fist)
//!
//! ```text
//! v += (target - p) * attract_gain      spring toward the palm
//! v *= attract_damping                  kills the orbit
//! hue → converge_hue at converge_blend
//! ```
//!
//! ## Disperse (open hand)
//!
//! ```text
//! v += uniform(-0.5, 0.5) * jitter                  ambient drift
//! v += (p - target) * repel_gain   if |p - target| < repel_radius
//! v *= disperse_damping
//! hue → disperse_hue at disperse_blend
//! ```
//!
//! Then `p += v` (one unit step per render tick) and edges bounce with
//! `v *= -bounce`, clamping the position back onto the canvas.

use rand::Rng;
use serde::{Deserialize, Serialize};

use hand_pose::{GestureMode, Point2};

use crate::canvas::{hsv_to_argb, Canvas, Extent};
use crate::shared::GestureSnapshot;

// ════════════════════════════════════════════════════════════════════════════
// Tunables
// ════════════════════════════════════════════════════════════════════════════

/// Force, damping and colour constants for both modes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    pub attract_gain:     f32,
    pub attract_damping:  f32,
    /// Hue (degrees) particles warm toward while converging.
    pub converge_hue:     f32,
    pub converge_blend:   f32,

    pub jitter:           f32,
    /// Pixels; particles closer than this to the target are pushed out.
    pub repel_radius:     f32,
    pub repel_gain:       f32,
    pub disperse_damping: f32,
    /// Hue (degrees) particles cool toward while dispersing.
    pub disperse_hue:     f32,
    pub disperse_blend:   f32,

    /// Fraction of velocity kept (and reversed) at a canvas edge.
    pub bounce:           f32,
}

impl Default for Physics {
    fn default() -> Self {
        Physics {
            attract_gain:     0.07,
            attract_damping:  0.86,
            converge_hue:     10.0,
            converge_blend:   0.1,
            jitter:           0.5,
            repel_radius:     120.0,
            repel_gain:       0.04,
            disperse_damping: 0.98,
            disperse_hue:     200.0,
            disperse_blend:   0.05,
            bounce:           0.9,
        }
    }
}

/// Ranges new particles are drawn from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnRange {
    /// Initial velocity per axis is uniform in `[-speed, speed]`.
    pub speed:    f32,
    pub hue_min:  f32,
    pub hue_max:  f32,
    /// Disc radius in pixels.
    pub size_min: f32,
    pub size_max: f32,
}

impl Default for SpawnRange {
    fn default() -> Self {
        SpawnRange {
            speed:    1.0,
            hue_min:  180.0,
            hue_max:  230.0,
            size_min: 1.0,
            size_max: 2.6,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Particle
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x:    f32,
    pub y:    f32,
    pub vx:   f32,
    pub vy:   f32,
    /// Colour phase in degrees.
    pub hue:  f32,
    /// Disc radius in pixels.
    pub size: f32,
}

impl Particle {
    /// A fresh particle somewhere on the canvas.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, extent: Extent, range: &SpawnRange) -> Self {
        let s = range.speed.abs();
        Particle {
            x:    rng.gen_range(0.0..=extent.w()),
            y:    rng.gen_range(0.0..=extent.h()),
            vx:   rng.gen_range(-s..=s),
            vy:   rng.gen_range(-s..=s),
            hue:  rng.gen_range(range.hue_min..=range.hue_max),
            size: rng.gen_range(range.size_min..=range.size_max),
        }
    }

    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Advance one render tick.
    ///
    /// `extent` is the canvas size for *this* tick; particles never cache it.
    pub fn step<R: Rng + ?Sized>(
        mut self,
        snap:    &GestureSnapshot,
        extent:  Extent,
        physics: &Physics,
        rng:     &mut R,
    ) -> Self {
        let target = snap.target;

        match snap.mode {
            GestureMode::Converge => {
                self.vx += (target.x - self.x) * physics.attract_gain;
                self.vy += (target.y - self.y) * physics.attract_gain;
                self.vx *= physics.attract_damping;
                self.vy *= physics.attract_damping;
                self.hue = blend_hue(self.hue, physics.converge_hue, physics.converge_blend);
            }
            GestureMode::Disperse => {
                self.vx += (rng.gen::<f32>() - 0.5) * physics.jitter;
                self.vy += (rng.gen::<f32>() - 0.5) * physics.jitter;

                let dx = self.x - target.x;
                let dy = self.y - target.y;
                if dx.hypot(dy) < physics.repel_radius {
                    self.vx += dx * physics.repel_gain;
                    self.vy += dy * physics.repel_gain;
                }

                self.vx *= physics.disperse_damping;
                self.vy *= physics.disperse_damping;
                self.hue = blend_hue(self.hue, physics.disperse_hue, physics.disperse_blend);
            }
        }

        self.x += self.vx;
        self.y += self.vy;

        let (w, h) = (extent.w(), extent.h());
        if self.x < 0.0 {
            self.x = 0.0;
            self.vx *= -physics.bounce;
        } else if self.x > w {
            self.x = w;
            self.vx *= -physics.bounce;
        }
        if self.y < 0.0 {
            self.y = 0.0;
            self.vy *= -physics.bounce;
        } else if self.y > h {
            self.y = h;
            self.vy *= -physics.bounce;
        }

        self
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        canvas.fill_disc(self.x, self.y, self.size, hsv_to_argb(self.hue, 0.85, 1.0));
    }
}

/// Exponential blend, no wrap-around: 200° → 10° sweeps through green.
fn blend_hue(hue: f32, toward: f32, rate: f32) -> f32 {
    hue * (1.0 - rate) + toward * rate
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

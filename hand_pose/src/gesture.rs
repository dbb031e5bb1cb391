//! Open/fist state machine with a hysteresis dead zone.
//!
//! | Extended fingers | Transition |
//! |---|---|
//! | 0–1 | → [`GestureMode::Converge`] (fist) |
//! | 2   | none (dead zone) |
//! | 3–4 | → [`GestureMode::Disperse`] (open hand) |
//!
//! Without the dead zone a hand hovering around two fingers would flip the
//! mode on every detection.

use serde::{Deserialize, Serialize};

use crate::landmarks::Point2;

// ════════════════════════════════════════════════════════════════════════════
// GestureMode
// ════════════════════════════════════════════════════════════════════════════

/// The two-state classification that drives particle behaviour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureMode {
    /// Closed fist: particles are pulled into a cluster at the target.
    Converge,
    /// Open hand: ambient drift with soft repulsion around the target.
    #[default]
    Disperse,
}

impl GestureMode {
    /// Downstream tag: `"fist"` or `"open"`.
    pub fn tag(self) -> &'static str {
        match self {
            GestureMode::Converge => "fist",
            GestureMode::Disperse => "open",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Hysteresis
// ════════════════════════════════════════════════════════════════════════════

/// Count thresholds.  Counts strictly between the two leave the mode alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hysteresis {
    /// At or below this many extended fingers the hand is a fist.
    pub fist_max: usize,
    /// At or above this many extended fingers the hand is open.
    pub open_min: usize,
}

impl Default for Hysteresis {
    fn default() -> Self {
        Hysteresis { fist_max: 1, open_min: 3 }
    }
}

impl Hysteresis {
    /// The mode `count` asks for, or `None` inside the dead zone.
    pub fn classify(&self, count: usize) -> Option<GestureMode> {
        if count <= self.fist_max {
            Some(GestureMode::Converge)
        } else if count >= self.open_min {
            Some(GestureMode::Disperse)
        } else {
            None
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureState
// ════════════════════════════════════════════════════════════════════════════

/// The `{mode, target}` pair shared between the detection and render loops.
///
/// `mode` only moves through [`GestureState::update_gesture`] (or the
/// explicit [`GestureState::force_mode`] used by an opt-in staleness
/// timeout).  `target` is overwritten verbatim on every detection; any
/// smoothing happens in the particles, not here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureState {
    mode:       GestureMode,
    target:     Point2,
    hysteresis: Hysteresis,
}

impl GestureState {
    /// Initial state: open hand, target at `center`.
    pub fn new(center: Point2, hysteresis: Hysteresis) -> Self {
        GestureState {
            mode: GestureMode::Disperse,
            target: center,
            hysteresis,
        }
    }

    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    pub fn target(&self) -> Point2 {
        self.target
    }

    /// Apply one successful detection.
    ///
    /// Returns `Some(new_mode)` only when the mode actually changed.
    pub fn update_gesture(&mut self, extended_count: usize, palm_px: Point2) -> Option<GestureMode> {
        self.target = palm_px;
        match self.hysteresis.classify(extended_count) {
            Some(next) if next != self.mode => {
                log::debug!("gesture {} → {} (count={})", self.mode.tag(), next.tag(), extended_count);
                self.mode = next;
                Some(next)
            }
            _ => None,
        }
    }

    /// Set the mode outside the hysteresis rule.  Returns `Some` on change.
    pub fn force_mode(&mut self, mode: GestureMode) -> Option<GestureMode> {
        if mode == self.mode {
            return None;
        }
        self.mode = mode;
        Some(mode)
    }

    /// Move the target without touching the mode (resize).
    pub fn reset_target(&mut self, center: Point2) {
        self.target = center;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

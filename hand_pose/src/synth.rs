//! Synthetic landmark sets.
//!
//! Builds an upright, plausible-looking hand around a palm point with a
//! chosen number of extended fingers.  Used by the keyboard/mouse simulator
//! in place of a camera estimator, and by tests that need real geometry.

use crate::landmarks::{Finger, LandmarkSet, Point2, LANDMARK_COUNT, WRIST};

/// Offsets of each MCP from the wrist for a hand of scale 1.0 (normalized
/// image units; negative y points up the image).
const MCP_OFFSETS: [(f32, f32); 4] = [
    (-0.040, -0.110), // index
    ( 0.000, -0.120), // middle
    ( 0.035, -0.110), // ring
    ( 0.065, -0.095), // pinky
];

/// Straight length from MCP to tip.
const FINGER_LEN: [f32; 4] = [0.095, 0.105, 0.095, 0.080];

/// Thumb joints 1–4 relative to the wrist.
const THUMB_OFFSETS: [(f32, f32); 4] = [
    (-0.040, -0.030),
    (-0.075, -0.055),
    (-0.100, -0.075),
    (-0.120, -0.095),
];

/// Build a hand whose middle-finger MCP sits at `palm`.
///
/// The first `extended` fingers of [`Finger::ALL`] are straight, the rest are
/// curled back toward the wrist.  `extended` is clamped to `0..=4`.
pub fn synthetic_hand(palm: Point2, extended: usize, scale: f32) -> LandmarkSet {
    let extended = extended.min(4);
    let wrist = Point2::new(palm.x, palm.y - MCP_OFFSETS[1].1 * scale);
    let at = |dx: f32, dy: f32| Point2::new(wrist.x + dx * scale, wrist.y + dy * scale);

    let mut pts = vec![Point2::default(); LANDMARK_COUNT];
    pts[WRIST] = wrist;

    for (i, &(dx, dy)) in THUMB_OFFSETS.iter().enumerate() {
        pts[1 + i] = at(dx, dy);
    }

    for (i, finger) in Finger::ALL.iter().enumerate() {
        let (dx, dy) = MCP_OFFSETS[i];
        let len = (dx * dx + dy * dy).sqrt();
        let (ux, uy) = (dx / len, dy / len);
        let along = |t: f32| at(dx + ux * t, dy + uy * t);

        // PIP, DIP, TIP as distances along the wrist→MCP ray.
        let joints = if i < extended {
            let l = FINGER_LEN[i];
            [l * 0.45, l * 0.75, l]
        } else {
            [0.030, 0.005, -0.030]
        };

        let mcp = finger.mcp();
        pts[mcp] = at(dx, dy);
        for (k, &t) in joints.iter().enumerate() {
            pts[mcp + 1 + k] = along(t);
        }
    }

    // Every point is finite and the count is fixed, so this cannot fail.
    LandmarkSet::new(pts).unwrap_or_else(|e| unreachable!("synthetic hand rejected: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::PALM;

    #[test]
    fn palm_lands_on_requested_point() {
        let palm = Point2::new(0.3, 0.6);
        let h = synthetic_hand(palm, 4, 1.0);
        let p = h.get(PALM).unwrap();
        assert!((p.x - palm.x).abs() < 1e-6);
        assert!((p.y - palm.y).abs() < 1e-6);
    }

    #[test]
    fn wrist_below_palm() {
        let h = synthetic_hand(Point2::new(0.5, 0.5), 0, 1.0);
        assert!(h.wrist().y > h.palm().y);
    }

    #[test]
    fn extended_is_clamped() {
        let a = synthetic_hand(Point2::new(0.5, 0.5), 9, 1.0);
        let b = synthetic_hand(Point2::new(0.5, 0.5), 4, 1.0);
        assert_eq!(a, b);
    }
}

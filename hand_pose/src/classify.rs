//! Geometric finger-extension classifier.
//!
//! A straight finger's tip lies farther from the wrist than its MCP root; a
//! curled finger folds the tip back toward the palm.  Comparing the two
//! wrist distances gives a rotation-insensitive curl test without any joint
//! angle computation.  The thumb does not fit the tip/root/wrist triangle and
//! is ignored.

use crate::landmarks::{Finger, LandmarkSet, WRIST};

/// Tip distance must exceed the MCP distance by this factor to count as
/// extended.  The comparison is strict: exactly 1.2× is *not* extended.
pub const EXTENSION_RATIO: f32 = 1.2;

/// True iff `dist(wrist, tip) > dist(wrist, mcp) * EXTENSION_RATIO`.
///
/// Indices outside the set yield `false`.
pub fn is_extended(landmarks: &LandmarkSet, tip: usize, mcp: usize) -> bool {
    let (Some(wrist), Some(tip), Some(mcp)) =
        (landmarks.get(WRIST), landmarks.get(tip), landmarks.get(mcp))
    else {
        return false;
    };
    wrist.distance(tip) > wrist.distance(mcp) * EXTENSION_RATIO
}

/// Per-finger decisions in [`Finger::ALL`] order.
pub fn extended_fingers(landmarks: &LandmarkSet) -> [bool; 4] {
    Finger::ALL.map(|f| is_extended(landmarks, f.tip(), f.mcp()))
}

/// Number of extended non-thumb fingers, `0..=4`.
pub fn extended_count(landmarks: &LandmarkSet) -> usize {
    extended_fingers(landmarks).iter().filter(|&&e| e).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Point2, LANDMARK_COUNT};
    use crate::synth::synthetic_hand;

    /// Wrist at origin, every MCP at distance 1.0 on the y axis, tips placed
    /// at `tip_dist` along the same ray.
    fn ray_hand(tip_dist: f32) -> LandmarkSet {
        let mut pts = vec![Point2::new(0.0, 0.0); LANDMARK_COUNT];
        for f in Finger::ALL {
            pts[f.mcp()] = Point2::new(0.0, 1.0);
            pts[f.tip()] = Point2::new(0.0, tip_dist);
        }
        LandmarkSet::new(pts).unwrap()
    }

    #[test]
    fn clearly_extended() {
        let h = ray_hand(1.8);
        assert!(is_extended(&h, 8, 5));
        assert_eq!(extended_count(&h), 4);
    }

    #[test]
    fn curled_below_root() {
        let h = ray_hand(0.7);
        assert!(!is_extended(&h, 8, 5));
        assert_eq!(extended_count(&h), 0);
    }

    #[test]
    fn exact_ratio_is_not_extended() {
        // Tip placed at mcp * ratio, computed the same way the classifier does.
        let mut pts = vec![Point2::new(0.0, 0.0); LANDMARK_COUNT];
        pts[5] = Point2::new(2.5, 0.0);
        pts[8] = Point2::new(2.5 * EXTENSION_RATIO, 0.0);
        let h = LandmarkSet::new(pts).unwrap();
        assert!(!is_extended(&h, 8, 5));
    }

    #[test]
    fn just_above_ratio_is_extended() {
        let h = ray_hand(1.21);
        assert!(is_extended(&h, 12, 9));
    }

    #[test]
    fn rotation_does_not_matter() {
        // Same geometry pointing sideways.
        let mut pts = vec![Point2::new(0.5, 0.5); LANDMARK_COUNT];
        pts[9]  = Point2::new(0.6, 0.5);
        pts[12] = Point2::new(0.8, 0.5);
        let h = LandmarkSet::new(pts).unwrap();
        assert!(is_extended(&h, 12, 9));
    }

    #[test]
    fn out_of_range_index_is_false() {
        let h = ray_hand(2.0);
        assert!(!is_extended(&h, 42, 5));
        assert!(!is_extended(&h, 8, 99));
    }

    #[test]
    fn synthetic_hands_round_trip_their_count() {
        for n in 0..=4 {
            let h = synthetic_hand(Point2::new(0.5, 0.5), n, 1.0);
            assert_eq!(extended_count(&h), n, "synthetic hand with {} fingers", n);
        }
    }

    #[test]
    fn extended_fingers_order() {
        let h = synthetic_hand(Point2::new(0.4, 0.6), 2, 1.0);
        assert_eq!(extended_fingers(&h), [true, true, false, false]);
    }
}

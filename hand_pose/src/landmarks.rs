//! The 21-point hand landmark set and its fixed anatomical indices.
//!
//! Indices follow the MediaPipe hand model: the wrist is 0, then four joints
//! per digit running from the root outward (thumb 1–4, index 5–8, middle
//! 9–12, ring 13–16, pinky 17–20).

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Indices
// ════════════════════════════════════════════════════════════════════════════

/// Number of points in a well-formed landmark set.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_TIP:  usize = 20;

/// The palm landmark the particles chase.  The middle-finger MCP sits in the
/// centre of the palm and moves less than the wrist or any fingertip.
pub const PALM: usize = MIDDLE_MCP;

/// The four non-thumb digits used by the open/fist classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Landmark index of the fingertip.
    pub fn tip(self) -> usize {
        match self {
            Finger::Index  => INDEX_TIP,
            Finger::Middle => MIDDLE_TIP,
            Finger::Ring   => RING_TIP,
            Finger::Pinky  => PINKY_TIP,
        }
    }

    /// Landmark index of the MCP (knuckle) joint at the finger root.
    pub fn mcp(self) -> usize {
        match self {
            Finger::Index  => INDEX_MCP,
            Finger::Middle => MIDDLE_MCP,
            Finger::Ring   => RING_MCP,
            Finger::Pinky  => PINKY_MCP,
        }
    }
}

/// Bone connections between landmarks, for drawing a hand skeleton.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    // thumb
    (0, 1), (1, 2), (2, 3), (3, 4),
    // index
    (0, 5), (5, 6), (6, 7), (7, 8),
    // middle
    (9, 10), (10, 11), (11, 12),
    // ring
    (13, 14), (14, 15), (15, 16),
    // pinky
    (0, 17), (17, 18), (18, 19), (19, 20),
    // palm knuckle line
    (5, 9), (9, 13), (13, 17),
];

// ════════════════════════════════════════════════════════════════════════════
// Point2
// ════════════════════════════════════════════════════════════════════════════

/// A 2D point.  Landmarks use normalized image coordinates in `[0, 1]`;
/// the same type carries pixel coordinates once scaled to a canvas.
///
/// Extra fields on the wire (MediaPipe also sends `z`) are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Point2 { x, y }
    }

    pub fn distance(self, other: Point2) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Scale a normalized point onto a `width × height` pixel surface.
    /// With `mirror` the x axis is flipped, matching a selfie-view camera.
    pub fn to_pixels(self, width: f32, height: f32, mirror: bool) -> Point2 {
        let x = if mirror { 1.0 - self.x } else { self.x };
        Point2::new(x * width, self.y * height)
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSet
// ════════════════════════════════════════════════════════════════════════════

/// Rejection reasons for raw estimator output.
#[derive(Debug, Error, PartialEq)]
pub enum LandmarkError {
    #[error("expected {expected} landmarks, got {found}")]
    WrongCount { expected: usize, found: usize },

    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// Exactly [`LANDMARK_COUNT`] finite points for one detected hand.
///
/// The only way to build one is through [`LandmarkSet::new`] (or serde, which
/// goes through the same check), so every index in `0..21` is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point2>", into = "Vec<Point2>")]
pub struct LandmarkSet {
    points: Vec<Point2>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point2>) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount {
                expected: LANDMARK_COUNT,
                found:    points.len(),
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        Ok(LandmarkSet { points })
    }

    /// Bounds-checked access.
    pub fn get(&self, index: usize) -> Option<Point2> {
        self.points.get(index).copied()
    }

    pub fn wrist(&self) -> Point2 {
        self.points[WRIST]
    }

    pub fn palm(&self) -> Point2 {
        self.points[PALM]
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }
}

impl TryFrom<Vec<Point2>> for LandmarkSet {
    type Error = LandmarkError;

    fn try_from(points: Vec<Point2>) -> Result<Self, Self::Error> {
        LandmarkSet::new(points)
    }
}

impl From<LandmarkSet> for Vec<Point2> {
    fn from(set: LandmarkSet) -> Self {
        set.points
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

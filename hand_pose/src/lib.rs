//! # hand_pose
//!
//! Turns a 21-point hand landmark set into a binary open/fist gesture.
//!
//! * [`classify`] — per-finger extension test and extended-finger count.
//! * [`gesture`] — hysteresis state machine holding `{mode, target}`.
//! * [`landmarks`] — the validated landmark set and its fixed indices.
//! * [`synth`] — synthetic hands for simulation and tests.
//!
//! ```rust
//! use hand_pose::{extended_count, synthetic_hand, GestureMode, GestureState, Hysteresis, Point2};
//!
//! let mut state = GestureState::new(Point2::new(320.0, 240.0), Hysteresis::default());
//! let fist = synthetic_hand(Point2::new(0.5, 0.5), 0, 1.0);
//! let palm = fist.palm().to_pixels(640.0, 480.0, false);
//!
//! state.update_gesture(extended_count(&fist), palm);
//! assert_eq!(state.mode(), GestureMode::Converge);
//! ```

pub mod classify;
pub mod gesture;
pub mod landmarks;
pub mod synth;

pub use classify::{extended_count, extended_fingers, is_extended, EXTENSION_RATIO};
pub use gesture::{GestureMode, GestureState, Hysteresis};
pub use landmarks::{Finger, LandmarkError, LandmarkSet, Point2, HAND_CONNECTIONS, LANDMARK_COUNT, PALM};
pub use synth::synthetic_hand;

//! # particle_swarm
//!
//! A particle field steered by a single hand.  A closed fist pulls every
//! particle toward the palm; an open hand scatters them and pushes them away
//! from it.  Between the two (two extended fingers) the last gesture holds.
//!
//! ## Threads
//!
//! | Thread | Owns | Talks through |
//! |---|---|---|
//! | render (main) | window, canvas, particles | [`shared::SharedGesture`] snapshot once per tick |
//! | detection | a [`detection::LandmarkSource`] | [`detection::DetectionAdapter`] writes the board |
//! | notifier | a [`notify::GestureSink`] | [`notify::Notifier`] channel |
//!
//! ## Landmark sources
//!
//! * **simulation** (default): mouse is the palm, `0`–`4` set extended
//!   fingers, `H` hides the hand.
//! * **stdin** / **command**: one JSON result per line from an external
//!   hand estimator, see [`detection::parse_frame`].

pub mod app;
pub mod canvas;
pub mod config;
pub mod detection;
pub mod error;
pub mod field;
pub mod notify;
pub mod particle;
pub mod render;
pub mod shared;
pub mod visualizer;

pub use app::{run, DetectorChoice, Session};
pub use config::SwarmConfig;
pub use error::{ConfigError, SwarmError};

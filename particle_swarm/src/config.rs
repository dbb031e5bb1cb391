//! Static configuration, resolved once at startup.
//!
//! Every field has a default; a JSON file given with `--config` only needs
//! the keys it changes:
//!
//! ```json
//! { "population": 1500, "trail_alpha": null, "physics": { "repel_radius": 150 } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use hand_pose::Hysteresis;

use crate::canvas::Extent;
use crate::error::ConfigError;
use crate::notify::NotifyKind;
use crate::particle::{Physics, SpawnRange};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Initial canvas size in pixels.
    pub width:          usize,
    pub height:         usize,
    /// Particles in the field.
    pub population:     usize,
    /// Per-tick overlay alpha for fading trails; `None` clears every frame.
    pub trail_alpha:    Option<f32>,
    /// Clear/trail colour, `0xRRGGBB`.
    pub background:     u32,
    /// Render cadence.
    pub fps:            u32,
    /// Flip landmark x (selfie camera).
    pub mirror:         bool,
    /// Draw the detected hand skeleton over the particles.
    pub show_skeleton:  bool,
    /// Estimator results scoring below this are treated as "no hand".
    pub min_confidence: f32,
    /// Revert to an open hand after this long without a detection.
    /// `None` holds the last gesture indefinitely.
    pub stale_after_ms: Option<u64>,
    /// Fixed RNG seed for reproducible runs.
    pub seed:           Option<u64>,
    pub hysteresis:     Hysteresis,
    pub physics:        Physics,
    pub spawn:          SpawnRange,
    /// Where gesture changes are announced.
    pub notify:         NotifyKind,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        SwarmConfig {
            width:          1280,
            height:         720,
            population:     900,
            trail_alpha:    Some(0.22),
            background:     0x0B0B14,
            fps:            60,
            mirror:         true,
            show_skeleton:  true,
            min_confidence: 0.6,
            stale_after_ms: None,
            seed:           None,
            hysteresis:     Hysteresis::default(),
            physics:        Physics::default(),
            spawn:          SpawnRange::default(),
            notify:         NotifyKind::default(),
        }
    }
}

impl SwarmConfig {
    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: SwarmConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        log::info!("loaded config from {:?}", path);
        Ok(cfg)
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bad = |msg: String| Err(ConfigError::Invalid(msg));

        if self.width == 0 || self.height == 0 {
            return bad(format!("canvas must be non-empty, got {}x{}", self.width, self.height));
        }
        if self.population == 0 {
            return bad("population must be at least 1".into());
        }
        if self.fps == 0 {
            return bad("fps must be at least 1".into());
        }
        if let Some(a) = self.trail_alpha {
            if !(a > 0.0 && a <= 1.0) {
                return bad(format!("trail_alpha must be in (0, 1], got {}", a));
            }
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return bad(format!("min_confidence must be in [0, 1], got {}", self.min_confidence));
        }
        if self.hysteresis.fist_max >= self.hysteresis.open_min {
            return bad(format!(
                "hysteresis fist_max ({}) must be below open_min ({})",
                self.hysteresis.fist_max, self.hysteresis.open_min
            ));
        }
        let s = &self.spawn;
        if !(s.size_min > 0.0 && s.size_min <= s.size_max) {
            return bad(format!("spawn size range [{}, {}] is empty or non-positive", s.size_min, s.size_max));
        }
        if s.hue_min > s.hue_max {
            return bad(format!("spawn hue range [{}, {}] is empty", s.hue_min, s.hue_max));
        }
        if !s.speed.is_finite() {
            return bad("spawn speed must be finite".into());
        }
        let p = &self.physics;
        if !(p.bounce >= 0.0 && p.bounce <= 1.0) {
            return bad(format!("physics bounce must be in [0, 1], got {}", p.bounce));
        }
        Ok(())
    }
}

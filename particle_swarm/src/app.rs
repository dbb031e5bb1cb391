//! Top-level wiring.
//!
//! `Session` owns everything the render side needs (shared gesture board,
//! notifier, render loop, canvas) and advances one frame at a time given the
//! window's current size.  `run` adds the window and a detection thread.

use std::sync::mpsc;

use hand_pose::GestureMode;

use crate::canvas::{Canvas, Extent};
use crate::config::SwarmConfig;
use crate::detection::{spawn_detection, DetectionAdapter, DetectionHandle, JsonLinesSource, SimInput, SimLandmarkSource};
use crate::error::SwarmError;
use crate::notify::Notifier;
use crate::render::RenderLoop;
use crate::shared::SharedGesture;
use crate::visualizer::Visualizer;

const STATUS_COLOR: u32 = 0xFFB8B8C8;

// ════════════════════════════════════════════════════════════════════════════
// Detector choice
// ════════════════════════════════════════════════════════════════════════════

/// Where landmark results come from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DetectorChoice {
    /// Synthetic hand driven by the window's mouse and number keys.
    #[default]
    Simulation,
    /// JSON result lines on our own stdin.
    Stdin,
    /// JSON result lines from a spawned estimator process.
    Command { program: String, args: Vec<String> },
}

// ════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════

pub struct Session {
    shared:   SharedGesture,
    notifier: Notifier,
    render:   RenderLoop,
    canvas:   Canvas,
    cfg:      SwarmConfig,
}

impl Session {
    pub fn new(cfg: SwarmConfig) -> Result<Self, SwarmError> {
        cfg.validate()?;
        let extent   = cfg.extent();
        let shared   = SharedGesture::new(extent, cfg.hysteresis);
        let notifier = Notifier::spawn(cfg.notify.build());
        let render   = RenderLoop::new(&cfg, shared.clone(), notifier.clone());
        let canvas   = Canvas::new(extent, cfg.background);
        Ok(Session { shared, notifier, render, canvas, cfg })
    }

    /// A fresh adapter bound to this session's board and notifier.
    pub fn adapter(&self) -> DetectionAdapter {
        DetectionAdapter::new(self.shared.clone(), self.notifier.clone(), self.cfg.mirror, self.cfg.show_skeleton)
    }

    /// Advance one frame.  A `size` different from the canvas is the resize
    /// signal; a zero-area size (minimized window) is ignored.
    pub fn frame(&mut self, size: Extent, source: &str) {
        if size != self.canvas.extent() && !size.is_empty() {
            self.render.resize(size, &mut self.canvas);
        }
        let snap = self.render.tick(&mut self.canvas);

        let status = self.status_line(snap.mode, source);
        let y = self.canvas.extent().height.saturating_sub(12);
        self.canvas.draw_label(&status, 8, y, STATUS_COLOR);
    }

    fn status_line(&self, mode: GestureMode, source: &str) -> String {
        let (visible, count) = self.shared.read(|b| (b.hand_visible, b.extended_count));
        let hand = match (visible, count) {
            (true, Some(n)) => format!("fingers {}", n),
            _               => "no hand".to_string(),
        };
        format!(
            "{}  {}  particles {}  source {}  q quit",
            mode.tag(), hand, self.render.field().len(), source
        )
    }

    pub fn canvas(&self) -> &Canvas          { &self.canvas }
    pub fn shared(&self) -> &SharedGesture   { &self.shared }
    pub fn render(&self) -> &RenderLoop      { &self.render }
}

// ════════════════════════════════════════════════════════════════════════════
// run
// ════════════════════════════════════════════════════════════════════════════

fn start_detection(
    choice:  DetectorChoice,
    session: &Session,
    sim_rx:  mpsc::Receiver<SimInput>,
) -> Result<DetectionHandle, SwarmError> {
    let cfg = &session.cfg;
    let adapter = session.adapter();
    let handle = match choice {
        DetectorChoice::Simulation => {
            spawn_detection(SimLandmarkSource::new(sim_rx, cfg.mirror, cfg.seed), adapter)
        }
        DetectorChoice::Stdin => {
            spawn_detection(JsonLinesSource::stdin(cfg.min_confidence), adapter)
        }
        DetectorChoice::Command { program, args } => {
            spawn_detection(JsonLinesSource::spawn(&program, &args, cfg.min_confidence)?, adapter)
        }
    };
    Ok(handle)
}

/// Open the window, start detection and render until the window closes.
pub fn run(cfg: SwarmConfig, choice: DetectorChoice) -> Result<(), SwarmError> {
    let mut session = Session::new(cfg)?;

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let mut vis = Visualizer::new(session.canvas().extent(), session.cfg.fps, sim_tx)?;

    // ── Detection thread ─────────────────────────────────────────────────
    let detection = start_detection(choice, &session, sim_rx)?;
    let mut reported_end = false;

    // ── Main loop ────────────────────────────────────────────────────────
    while vis.is_open() {
        if !vis.poll_input() { break; }

        if detection.is_finished() && !reported_end {
            log::warn!("{} feed ended; holding the last gesture", detection.name());
            reported_end = true;
        }

        session.frame(vis.size(), detection.name());
        vis.present(session.canvas());
    }

    detection.stop();
    log::info!("window closed after {} ticks", session.render().ticks());
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

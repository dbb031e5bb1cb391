//! `minifb` window: input polling and frame presentation.
//!
//! The window is resizable; the app polls [`Visualizer::size`] every tick
//! and treats a change as the resize signal.  The frame limiter set here is
//! what paces the render loop.

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, MouseMode, ScaleMode, Window, WindowOptions};

use hand_pose::Point2;

use crate::canvas::{Canvas, Extent};
use crate::detection::SimInput;
use crate::error::SwarmError;

const FINGER_KEYS: [(Key, usize); 5] = [
    (Key::Key0, 0),
    (Key::Key1, 1),
    (Key::Key2, 2),
    (Key::Key3, 3),
    (Key::Key4, 4),
];

pub struct Visualizer {
    window:     Window,
    sim_tx:     Sender<SimInput>,
    last_mouse: Option<(f32, f32)>,
}

impl Visualizer {
    /// Open the window.  Failing here is fatal: there is no surface to draw on.
    pub fn new(extent: Extent, fps: u32, sim_tx: Sender<SimInput>) -> Result<Self, SwarmError> {
        let mut window = Window::new(
            "Particle Swarm — fist gathers, open hand scatters",
            extent.width, extent.height,
            WindowOptions {
                resize: true,
                scale_mode: ScaleMode::UpperLeft,
                ..WindowOptions::default()
            },
        ).map_err(|e| SwarmError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_micros(1_000_000 / fps.max(1) as u64)));

        Ok(Visualizer { window, sim_tx, last_mouse: None })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Current drawable size, read fresh every call.
    pub fn size(&self) -> Extent {
        let (w, h) = self.window.get_size();
        Extent::new(w, h)
    }

    /// Poll keyboard and mouse, forwarding simulation input.
    /// Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            return false;
        }
        for (key, n) in FINGER_KEYS {
            if one_shot(key) {
                let _ = self.sim_tx.send(SimInput::Fingers(n));
            }
        }
        if one_shot(Key::H) {
            let _ = self.sim_tx.send(SimInput::ToggleHand);
        }

        if let Some(pos) = self.window.get_mouse_pos(MouseMode::Clamp) {
            if self.last_mouse != Some(pos) {
                self.last_mouse = Some(pos);
                let size = self.size();
                if !size.is_empty() {
                    let p = Point2::new(pos.0 / size.w(), pos.1 / size.h());
                    let _ = self.sim_tx.send(SimInput::Palm(p));
                }
            }
        }

        true
    }

    /// Push the canvas to the window and wait out the frame limiter.
    pub fn present(&mut self, canvas: &Canvas) {
        let e = canvas.extent();
        if let Err(err) = self.window.update_with_buffer(canvas.buffer(), e.width, e.height) {
            log::warn!("frame dropped: {}", err);
        }
    }
}

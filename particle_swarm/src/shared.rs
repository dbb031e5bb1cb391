//! The state handed between the detection thread and the render loop.
//!
//! One [`SharedGesture`] handle is cloned into the detection adapter and the
//! render loop.  The adapter is the only writer of `{mode, target}`; the
//! render loop takes one [`GestureSnapshot`] per tick so every particle in a
//! tick sees the same values.  A single mutex guards the board; neither side
//! holds it for longer than a field copy.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use hand_pose::{GestureMode, GestureState, Hysteresis, Point2};

use crate::canvas::Extent;

/// Everything behind the lock.
#[derive(Clone, Debug)]
pub struct GestureBoard {
    pub state:          GestureState,
    /// Canvas size the target is projected onto.
    pub extent:         Extent,
    /// Pixel-space skeleton of the last detected hand; `None` when the last
    /// callback saw no hand.
    pub overlay:        Option<Vec<Point2>>,
    /// Whether the most recent estimator callback found a hand.
    pub hand_visible:   bool,
    pub extended_count: Option<usize>,
    pub last_detection: Option<Instant>,
}

/// What one render tick reads.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureSnapshot {
    pub mode:    GestureMode,
    pub target:  Point2,
    pub overlay: Option<Vec<Point2>>,
}

#[derive(Clone, Debug)]
pub struct SharedGesture {
    inner: Arc<Mutex<GestureBoard>>,
}

impl SharedGesture {
    /// Open hand, target at the canvas center.
    pub fn new(extent: Extent, hysteresis: Hysteresis) -> Self {
        let board = GestureBoard {
            state:          GestureState::new(extent.center(), hysteresis),
            extent,
            overlay:        None,
            hand_visible:   false,
            extended_count: None,
            last_detection: None,
        };
        SharedGesture { inner: Arc::new(Mutex::new(board)) }
    }

    fn lock(&self) -> MutexGuard<'_, GestureBoard> {
        // The board is plain data; a panic elsewhere cannot leave it torn.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the board.
    pub fn write<T>(&self, f: impl FnOnce(&mut GestureBoard) -> T) -> T {
        f(&mut self.lock())
    }

    pub fn read<T>(&self, f: impl FnOnce(&GestureBoard) -> T) -> T {
        f(&self.lock())
    }

    pub fn snapshot(&self) -> GestureSnapshot {
        self.read(|b| GestureSnapshot {
            mode:    b.state.mode(),
            target:  b.state.target(),
            overlay: b.overlay.clone(),
        })
    }

    pub fn mode(&self) -> GestureMode {
        self.read(|b| b.state.mode())
    }

    pub fn target(&self) -> Point2 {
        self.read(|b| b.state.target())
    }

    pub fn extent(&self) -> Extent {
        self.read(|b| b.extent)
    }

    /// Resize signal: new extent, target back to the center, stale skeleton
    /// dropped.  The mode is kept.
    pub fn resize(&self, extent: Extent) {
        self.write(|b| {
            b.extent = extent;
            b.state.reset_target(extent.center());
            b.overlay = None;
        });
    }

    /// Opt-in staleness policy: once `after` has passed since the last
    /// detection (or since `now` was first checked with none yet), fall back
    /// to an open hand.  Returns `Some` when this changed the mode.
    pub fn expire_stale(&self, now: Instant, after: Duration) -> Option<GestureMode> {
        self.write(|b| {
            let last = *b.last_detection.get_or_insert(now);
            if now.saturating_duration_since(last) < after {
                return None;
            }
            b.overlay = None;
            b.state.force_mode(GestureMode::Disperse)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> SharedGesture {
        SharedGesture::new(Extent::new(640, 480), Hysteresis::default())
    }

    #[test]
    fn starts_disperse_at_center() {
        let s = shared();
        let snap = s.snapshot();
        assert_eq!(snap.mode, GestureMode::Disperse);
        assert_eq!(snap.target, Point2::new(320.0, 240.0));
        assert!(snap.overlay.is_none());
    }

    #[test]
    fn resize_resets_target_keeps_mode() {
        let s = shared();
        s.write(|b| b.state.update_gesture(0, Point2::new(5.0, 5.0)));
        s.resize(Extent::new(1280, 720));
        assert_eq!(s.target(), Point2::new(640.0, 360.0));
        assert_eq!(s.mode(), GestureMode::Converge);
        assert_eq!(s.extent(), Extent::new(1280, 720));
    }

    #[test]
    fn clones_share_one_board() {
        let a = shared();
        let b = a.clone();
        a.write(|board| board.state.update_gesture(4, Point2::new(1.0, 1.0)));
        assert_eq!(b.target(), Point2::new(1.0, 1.0));
    }

    #[test]
    fn stale_timeout_reverts_to_open() {
        let s = shared();
        let t0 = Instant::now();
        s.write(|b| {
            b.state.update_gesture(0, Point2::new(1.0, 1.0));
            b.last_detection = Some(t0);
        });
        let after = Duration::from_millis(500);
        assert_eq!(s.expire_stale(t0 + Duration::from_millis(100), after), None);
        assert_eq!(s.mode(), GestureMode::Converge);
        assert_eq!(s.expire_stale(t0 + Duration::from_millis(600), after), Some(GestureMode::Disperse));
        assert_eq!(s.mode(), GestureMode::Disperse);
        // Target is held.
        assert_eq!(s.target(), Point2::new(1.0, 1.0));
    }

    #[test]
    fn concurrent_writer_and_reader() {
        // Square canvas: the initial centre also has x == y.
        let s = SharedGesture::new(Extent::new(480, 480), Hysteresis::default());
        assert_eq!(s.target(), Point2::new(240.0, 240.0));
        let w = s.clone();
        let writer = std::thread::spawn(move || {
            for i in 0..1000 {
                let c = if i % 2 == 0 { 0 } else { 4 };
                w.write(|b| b.state.update_gesture(c, Point2::new(i as f32, i as f32)));
            }
        });
        for _ in 0..1000 {
            let snap = s.snapshot();
            assert_eq!(snap.target.x, snap.target.y);
        }
        writer.join().unwrap();
        assert_eq!(s.target(), Point2::new(999.0, 999.0));
    }
}

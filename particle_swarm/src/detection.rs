//! Estimator boundary: landmark sources and the detection callback adapter.
//!
//! A [`LandmarkSource`] runs on its own thread at whatever cadence the
//! estimator manages (a real model delivers ~20–30 results a second, in
//! bursts).  For every result it calls [`DetectionAdapter::on_results`],
//! which classifies the hand and writes `{mode, target}` into the
//! [`SharedGesture`].  The adapter never renders and never waits on the
//! render loop.
//!
//! Sources:
//!
//! * [`SimLandmarkSource`] — synthetic hands driven by the visualizer's mouse
//!   and number keys.  Always available.
//! * [`JsonLinesSource`] — one JSON result per line from a detector
//!   subprocess (e.g. a MediaPipe wrapper script) or from stdin.

use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;

use hand_pose::{extended_count, synthetic_hand, GestureMode, LandmarkError, LandmarkSet, Point2};

use crate::error::SwarmError;
use crate::notify::Notifier;
use crate::shared::SharedGesture;

// ════════════════════════════════════════════════════════════════════════════
// DetectionAdapter
// ════════════════════════════════════════════════════════════════════════════

/// The estimator callback.  Owned by the detection thread.
pub struct DetectionAdapter {
    shared:        SharedGesture,
    notifier:      Notifier,
    mirror:        bool,
    show_skeleton: bool,
}

impl DetectionAdapter {
    pub fn new(shared: SharedGesture, notifier: Notifier, mirror: bool, show_skeleton: bool) -> Self {
        DetectionAdapter { shared, notifier, mirror, show_skeleton }
    }

    /// Handle one estimator result.
    ///
    /// * `Some(hand)` — classify, overwrite the target with the palm, apply
    ///   hysteresis.  A mode change is announced once.
    /// * `None` — no hand this frame: `{mode, target}` are left exactly as
    ///   they were; only the skeleton overlay is withdrawn.
    ///
    /// Returns the new mode when this call changed it.
    pub fn on_results(&mut self, hand: Option<&LandmarkSet>) -> Option<GestureMode> {
        let Some(landmarks) = hand else {
            self.shared.write(|b| {
                b.hand_visible = false;
                b.overlay = None;
            });
            return None;
        };

        let count = extended_count(landmarks);
        let (mirror, show_skeleton) = (self.mirror, self.show_skeleton);

        let change = self.shared.write(|b| {
            // Extent is read under the same lock as the write, so a resize
            // cannot slip between projection and update.
            let (w, h) = (b.extent.w(), b.extent.h());
            let palm = landmarks.palm().to_pixels(w, h, mirror);

            b.overlay = show_skeleton.then(|| {
                landmarks.points().iter().map(|p| p.to_pixels(w, h, mirror)).collect()
            });
            b.hand_visible   = true;
            b.extended_count = Some(count);
            b.last_detection = Some(Instant::now());

            log::debug!("hand: {} extended, palm=({:.0}, {:.0})", count, palm.x, palm.y);
            b.state.update_gesture(count, palm)
        });

        if let Some(mode) = change {
            self.notifier.notify(mode);
        }
        change
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait + spawn helper
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can feed estimator results to a [`DetectionAdapter`].
pub trait LandmarkSource: Send + 'static {
    fn name(&self) -> &'static str;

    /// Run until the feed ends or `stop` is raised.
    fn run(self: Box<Self>, adapter: DetectionAdapter, stop: Arc<AtomicBool>);

    /// External process behind the feed, if any.  Stopping the handle
    /// kills it, which also unblocks a thread waiting on its output.
    fn process(&self) -> Option<DetectorProcess> { None }
}

/// The running detection thread.
pub struct DetectionHandle {
    stop:    Arc<AtomicBool>,
    thread:  JoinHandle<()>,
    name:    &'static str,
    process: Option<DetectorProcess>,
}

impl DetectionHandle {
    /// Deregister the feed.  Sources check the flag between results; a
    /// detector subprocess is killed so its reader sees EOF.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(process) = &self.process {
            process.kill();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Spawn a landmark source on its own thread.
pub fn spawn_detection<S: LandmarkSource>(source: S, adapter: DetectionAdapter) -> DetectionHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let name = source.name();
    let process = source.process();
    log::info!("detection source: {}", name);
    let thread = thread::spawn(move || Box::new(source).run(adapter, flag));
    DetectionHandle { stop, thread, name, process }
}

impl Drop for DetectionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource — mouse/keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Mouse position, normalized to the window (`[0,1]²`, screen space).
    Palm(Point2),
    /// Number of extended non-thumb fingers, 0–4.
    Fingers(usize),
    /// Show/hide the hand (simulates the estimator losing it).
    ToggleHand,
}

/// Emits synthetic landmark sets at an irregular estimator-like cadence.
pub struct SimLandmarkSource {
    pub rx:       Receiver<SimInput>,
    /// Mean interval between results.
    pub interval: Duration,
    /// The adapter mirrors x for a selfie camera; pre-flip so the hand lands
    /// under the mouse.
    pub mirror:   bool,
    pub seed:     Option<u64>,
}

impl SimLandmarkSource {
    pub fn new(rx: Receiver<SimInput>, mirror: bool, seed: Option<u64>) -> Self {
        SimLandmarkSource { rx, interval: Duration::from_millis(40), mirror, seed }
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn name(&self) -> &'static str { "simulation" }

    fn run(self: Box<Self>, mut adapter: DetectionAdapter, stop: Arc<AtomicBool>) {
        let mut rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None    => StdRng::from_entropy(),
        };

        let mut palm    = Point2::new(0.5, 0.5);
        let mut fingers = 4usize;
        let mut visible = true;
        let mut next    = Instant::now() + self.interval;

        loop {
            if stop.load(Ordering::Relaxed) { return; }

            let wait = next.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(wait) {
                Ok(SimInput::Palm(p)) => {
                    let x = if self.mirror { 1.0 - p.x } else { p.x };
                    palm = Point2::new(x.clamp(0.0, 1.0), p.y.clamp(0.0, 1.0));
                }
                Ok(SimInput::Fingers(n)) => fingers = n.min(4),
                Ok(SimInput::ToggleHand) => visible = !visible,
                Err(RecvTimeoutError::Timeout) => {
                    if visible {
                        let hand = jitter(&synthetic_hand(palm, fingers, 1.4), &mut rng);
                        adapter.on_results(hand.as_ref());
                    } else {
                        adapter.on_results(None);
                    }
                    // ±50% cadence wobble, like a real model under load.
                    let ms = self.interval.as_millis() as f32 * rng.gen_range(0.5..1.5);
                    next = Instant::now() + Duration::from_millis(ms as u64);
                }
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }
}

/// Small per-point noise, as a real estimator would produce.
fn jitter<R: Rng>(hand: &LandmarkSet, rng: &mut R) -> Option<LandmarkSet> {
    let pts = hand
        .points()
        .iter()
        .map(|p| Point2::new(p.x + rng.gen_range(-0.002..0.002), p.y + rng.gen_range(-0.002..0.002)))
        .collect();
    LandmarkSet::new(pts).ok()
}

// ════════════════════════════════════════════════════════════════════════════
// JSON-lines wire format
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("unparsable detector line: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed landmark set: {0}")]
    Landmarks(#[from] LandmarkError),

    #[error("detector reported: {0}")]
    Estimator(String),
}

fn full_confidence() -> f32 { 1.0 }

#[derive(Debug, Deserialize)]
struct WireHand {
    #[serde(default = "full_confidence")]
    score:     f32,
    landmarks: Vec<Point2>,
}

/// Accepted shapes, tried in order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireFrame {
    /// `{"hands":[{"score":0.9,"landmarks":[...]}], "error":null}`
    Hands {
        hands: Vec<WireHand>,
        #[serde(default)]
        error: Option<String>,
    },
    /// MediaPipe JS results: `{"multiHandLandmarks":[[{"x":..,"y":..,"z":..}, ...]]}`
    MediaPipe {
        #[serde(rename = "multiHandLandmarks")]
        multi_hand_landmarks: Vec<Vec<Point2>>,
    },
    /// A single hand object.
    Single(WireHand),
    /// A bare array of hands; `[]` means no hand.
    Bare(Vec<WireHand>),
    /// Any other object.  MediaPipe drops `multiHandLandmarks` entirely when
    /// it tracks nothing, so this is its no-hand frame.
    Empty {},
}

/// Parse one detector line.
///
/// `Ok(None)` is a frame with no hand above `min_confidence`.  Only the
/// first qualifying hand is used.
pub fn parse_frame(line: &str, min_confidence: f32) -> Result<Option<LandmarkSet>, FrameError> {
    let hands = match serde_json::from_str::<WireFrame>(line)? {
        WireFrame::Hands { error: Some(e), .. } => return Err(FrameError::Estimator(e)),
        WireFrame::Hands { hands, .. } => hands,
        WireFrame::MediaPipe { multi_hand_landmarks } => multi_hand_landmarks
            .into_iter()
            .map(|landmarks| WireHand { score: full_confidence(), landmarks })
            .collect(),
        WireFrame::Single(hand) => vec![hand],
        WireFrame::Bare(hands) => hands,
        WireFrame::Empty {} => return Ok(None),
    };

    match hands.into_iter().find(|h| h.score >= min_confidence) {
        Some(hand) => Ok(Some(LandmarkSet::new(hand.landmarks)?)),
        None => Ok(None),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JsonLinesSource
// ════════════════════════════════════════════════════════════════════════════

/// Shared handle on a detector subprocess.  Whoever kills it first reaps
/// it; later calls are no-ops.
#[derive(Clone)]
pub struct DetectorProcess(Arc<Mutex<Option<Child>>>);

impl DetectorProcess {
    fn new(child: Child) -> Self {
        DetectorProcess(Arc::new(Mutex::new(Some(child))))
    }

    pub fn kill(&self) {
        let taken = self.0.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(mut child) = taken {
            let _ = child.kill();
            let _ = child.wait();
            log::info!("detector process {} stopped", child.id());
        }
    }

    pub fn is_running(&self) -> bool {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None        => false,
        }
    }
}

/// Reads detector results, one JSON object per line.
///
/// A `READY` handshake line is skipped.  Unparsable lines and malformed
/// landmark sets are logged and dropped: no update that cycle, no retry.
pub struct JsonLinesSource<R: BufRead + Send + 'static> {
    reader:         R,
    min_confidence: f32,
    child:          Option<DetectorProcess>,
}

impl<R: BufRead + Send + 'static> JsonLinesSource<R> {
    pub fn new(reader: R, min_confidence: f32) -> Self {
        JsonLinesSource { reader, min_confidence, child: None }
    }
}

impl JsonLinesSource<BufReader<std::io::Stdin>> {
    pub fn stdin(min_confidence: f32) -> Self {
        JsonLinesSource::new(BufReader::new(std::io::stdin()), min_confidence)
    }
}

impl JsonLinesSource<BufReader<ChildStdout>> {
    /// Spawn `program args…` and read its stdout.  Its stderr passes through.
    pub fn spawn(program: &str, args: &[String], min_confidence: f32) -> Result<Self, SwarmError> {
        log::info!("starting detector: {} {}", program, args.join(" "));
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| SwarmError::Detector(format!("cannot start {program}: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SwarmError::Detector("detector stdout not captured".into()))?;

        Ok(JsonLinesSource {
            reader: BufReader::new(stdout),
            min_confidence,
            child: Some(DetectorProcess::new(child)),
        })
    }
}

impl<R: BufRead + Send + 'static> LandmarkSource for JsonLinesSource<R> {
    fn name(&self) -> &'static str {
        if self.child.is_some() { "detector subprocess" } else { "json lines" }
    }

    fn process(&self) -> Option<DetectorProcess> {
        self.child.clone()
    }

    fn run(mut self: Box<Self>, mut adapter: DetectionAdapter, stop: Arc<AtomicBool>) {
        let mut bytes = Vec::new();
        loop {
            if stop.load(Ordering::Relaxed) { break; }

            bytes.clear();
            match self.reader.read_until(b'\n', &mut bytes) {
                Ok(0) => {
                    log::info!("detector stream ended");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("detector read failed: {}", e);
                    break;
                }
            }

            // A line that is not UTF-8 is one bad frame, not a dead feed.
            let Ok(text) = std::str::from_utf8(&bytes) else {
                log::warn!("detector line is not UTF-8 ({} bytes), skipped", bytes.len());
                continue;
            };
            let text = text.trim();
            if text.is_empty() { continue; }
            if text == "READY" {
                log::info!("detector ready");
                continue;
            }

            match parse_frame(text, self.min_confidence) {
                Ok(hand) => { adapter.on_results(hand.as_ref()); }
                Err(e)   => log::warn!("{}", e),
            }
        }

        if let Some(process) = &self.child {
            process.kill();
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Extent;
    use crate::notify::{GestureChange, GestureSink};
    use hand_pose::Hysteresis;
    use std::io::Cursor;
    use std::sync::mpsc::{self, Sender};

    struct Forward(Sender<GestureChange>);

    impl GestureSink for Forward {
        fn emit(&mut self, change: &GestureChange) {
            let _ = self.0.send(change.clone());
        }
    }

    fn rig(extent: Extent) -> (DetectionAdapter, SharedGesture, Receiver<GestureChange>) {
        let shared = SharedGesture::new(extent, Hysteresis::default());
        let (tx, rx) = mpsc::channel();
        let adapter = DetectionAdapter::new(shared.clone(), Notifier::spawn(Box::new(Forward(tx))), false, true);
        (adapter, shared, rx)
    }

    fn hand_json(palm: Point2, fingers: usize) -> String {
        let hand = synthetic_hand(palm, fingers, 1.0);
        serde_json::to_string(&hand).unwrap()
    }

    #[test]
    fn fist_converges_on_palm() {
        let (mut adapter, shared, rx) = rig(Extent::new(640, 480));
        let fist = synthetic_hand(Point2::new(0.25, 0.5), 0, 1.0);
        assert_eq!(adapter.on_results(Some(&fist)), Some(GestureMode::Converge));
        let snap = shared.snapshot();
        assert_eq!(snap.mode, GestureMode::Converge);
        assert!((snap.target.x - 160.0).abs() < 1e-3);
        assert!((snap.target.y - 240.0).abs() < 1e-3);
        assert_eq!(snap.overlay.as_ref().map(Vec::len), Some(21));
        let change = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(change.wire().starts_with("fist_"));
    }

    #[test]
    fn mirrored_target() {
        let shared = SharedGesture::new(Extent::new(640, 480), Hysteresis::default());
        let notifier = Notifier::spawn(Box::new(crate::notify::NullSink));
        let mut adapter = DetectionAdapter::new(shared.clone(), notifier, true, false);
        adapter.on_results(Some(&synthetic_hand(Point2::new(0.25, 0.5), 4, 1.0)));
        assert!((shared.target().x - 480.0).abs() < 1e-3);
        assert!(shared.snapshot().overlay.is_none());
    }

    #[test]
    fn no_hand_holds_state_for_100_callbacks() {
        let (mut adapter, shared, _rx) = rig(Extent::new(640, 480));
        adapter.on_results(Some(&synthetic_hand(Point2::new(0.1, 0.9), 1, 1.0)));
        let mode = shared.mode();
        let target = shared.target();
        for _ in 0..100 {
            assert_eq!(adapter.on_results(None), None);
        }
        assert_eq!(shared.mode(), mode);
        assert_eq!(shared.target(), target);
        assert!(shared.snapshot().overlay.is_none());
        assert!(!shared.read(|b| b.hand_visible));
    }

    #[test]
    fn dead_zone_count_moves_target_only() {
        let (mut adapter, shared, rx) = rig(Extent::new(100, 100));
        adapter.on_results(Some(&synthetic_hand(Point2::new(0.5, 0.5), 2, 1.0)));
        assert_eq!(shared.mode(), GestureMode::Disperse);
        assert!((shared.target().x - 50.0).abs() < 1e-3);
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn parse_hands_shape() {
        let line = format!(r#"{{"hands":[{{"score":0.9,"landmarks":{}}}]}}"#, hand_json(Point2::new(0.5, 0.5), 4));
        let hand = parse_frame(&line, 0.6).unwrap().unwrap();
        assert_eq!(extended_count(&hand), 4);
    }

    #[test]
    fn parse_low_confidence_is_no_hand() {
        let line = format!(r#"{{"hands":[{{"score":0.3,"landmarks":{}}}]}}"#, hand_json(Point2::new(0.5, 0.5), 4));
        assert!(parse_frame(&line, 0.6).unwrap().is_none());
        assert!(parse_frame(r#"{"hands":[]}"#, 0.6).unwrap().is_none());
        assert!(parse_frame("[]", 0.6).unwrap().is_none());
    }

    #[test]
    fn parse_mediapipe_and_single_shapes() {
        let pts = hand_json(Point2::new(0.4, 0.4), 0);
        let mp = format!(r#"{{"multiHandLandmarks":[{}]}}"#, pts);
        assert_eq!(extended_count(&parse_frame(&mp, 0.6).unwrap().unwrap()), 0);
        let single = format!(r#"{{"landmarks":{}}}"#, pts);
        assert!(parse_frame(&single, 0.6).unwrap().is_some());
    }

    #[test]
    fn parse_rejects_malformed() {
        let short = r#"{"landmarks":[{"x":0.1,"y":0.1},{"x":0.2,"y":0.2}]}"#;
        assert!(matches!(
            parse_frame(short, 0.0),
            Err(FrameError::Landmarks(LandmarkError::WrongCount { found: 2, .. }))
        ));
        assert!(matches!(parse_frame("not json", 0.0), Err(FrameError::Json(_))));
        assert!(matches!(
            parse_frame(r#"{"hands":[],"error":"camera lost"}"#, 0.0),
            Err(FrameError::Estimator(_))
        ));
    }

    #[test]
    fn json_source_feeds_adapter_and_skips_garbage() {
        let (adapter, shared, rx) = rig(Extent::new(640, 480));
        let input = format!(
            "READY\n{}\ngarbage\n{{\"landmarks\":[]}}\n\n{}\n",
            format!(r#"{{"landmarks":{}}}"#, hand_json(Point2::new(0.5, 0.5), 0)),
            format!(r#"{{"landmarks":{}}}"#, hand_json(Point2::new(0.75, 0.25), 4)),
        );
        let source = JsonLinesSource::new(Cursor::new(input.into_bytes()), 0.5);
        Box::new(source).run(adapter, Arc::new(AtomicBool::new(false)));

        assert_eq!(shared.mode(), GestureMode::Disperse);
        assert!((shared.target().x - 480.0).abs() < 1e-3);
        assert!((shared.target().y - 120.0).abs() < 1e-3);
        let wait = Duration::from_secs(2);
        assert_eq!(rx.recv_timeout(wait).unwrap().mode, GestureMode::Converge);
        assert_eq!(rx.recv_timeout(wait).unwrap().mode, GestureMode::Disperse);
    }

    #[test]
    fn parse_object_without_hands_is_no_hand() {
        assert!(parse_frame("{}", 0.6).unwrap().is_none());
        assert!(parse_frame(r#"{"image":{"width":640,"height":480}}"#, 0.6).unwrap().is_none());
    }

    #[test]
    fn empty_mediapipe_frame_withdraws_skeleton() {
        let (adapter, shared, _rx) = rig(Extent::new(640, 480));
        let input = format!(
            "{}\n{{\"image\":{{}}}}\n",
            format!(r#"{{"multiHandLandmarks":[{}]}}"#, hand_json(Point2::new(0.5, 0.5), 4)),
        );
        let source = JsonLinesSource::new(Cursor::new(input.into_bytes()), 0.5);
        Box::new(source).run(adapter, Arc::new(AtomicBool::new(false)));
        assert!(shared.snapshot().overlay.is_none());
        assert!(!shared.read(|b| b.hand_visible));
    }

    #[test]
    fn json_source_survives_invalid_utf8_line() {
        let (adapter, shared, _rx) = rig(Extent::new(640, 480));
        let mut input = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(format!(r#"{{"landmarks":{}}}"#, hand_json(Point2::new(0.5, 0.5), 0)).as_bytes());
        input.push(b'\n');
        let source = JsonLinesSource::new(Cursor::new(input), 0.5);
        Box::new(source).run(adapter, Arc::new(AtomicBool::new(false)));
        assert_eq!(shared.mode(), GestureMode::Converge);
    }

    #[cfg(unix)]
    #[test]
    fn stopping_kills_detector_process() {
        let (adapter, _shared, _rx) = rig(Extent::new(640, 480));
        let source = JsonLinesSource::spawn("sleep", &["30".to_string()], 0.5).unwrap();
        let process = source.process().unwrap();
        assert!(process.is_running());

        let handle = spawn_detection(source, adapter);
        handle.stop();
        assert!(!process.is_running());

        let deadline = Instant::now() + Duration::from_secs(3);
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(handle.is_finished());
    }

    #[test]
    fn json_source_honours_stop() {
        let (adapter, shared, _rx) = rig(Extent::new(640, 480));
        let input = format!(r#"{{"landmarks":{}}}"#, hand_json(Point2::new(0.1, 0.1), 0));
        let source = JsonLinesSource::new(Cursor::new(input.into_bytes()), 0.5);
        Box::new(source).run(adapter, Arc::new(AtomicBool::new(true)));
        assert_eq!(shared.mode(), GestureMode::Disperse);
    }

    #[test]
    fn sim_source_emits_at_its_own_cadence() {
        let (adapter, shared, _rx) = rig(Extent::new(200, 100));
        let (tx, sim_rx) = mpsc::channel();
        let source = SimLandmarkSource {
            rx: sim_rx,
            interval: Duration::from_millis(5),
            mirror: false,
            seed: Some(7),
        };
        let handle = spawn_detection(source, adapter);
        tx.send(SimInput::Palm(Point2::new(0.5, 0.5))).unwrap();
        tx.send(SimInput::Fingers(0)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(3);
        while shared.mode() != GestureMode::Converge && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(shared.mode(), GestureMode::Converge);
        let t = shared.target();
        assert!((t.x - 100.0).abs() < 2.0 && (t.y - 50.0).abs() < 2.0, "{:?}", t);

        handle.stop();
        drop(tx);
        let deadline = Instant::now() + Duration::from_secs(3);
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(handle.is_finished());
    }
}

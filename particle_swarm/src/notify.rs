//! One-way gesture change notifications.
//!
//! Every confirmed mode transition is announced once to a [`GestureSink`].
//! The payload carries a random token so a downstream consumer that
//! de-duplicates identical values still sees `fist → open → fist` as three
//! distinct events.  Sinks never report back; failures are dropped.

use std::io::Write;
use std::sync::mpsc::{self, Sender};
use std::thread;

use rand::Rng;
use serde::{Deserialize, Serialize};

use hand_pose::GestureMode;

#[derive(Clone, Debug, PartialEq)]
pub struct GestureChange {
    pub mode:  GestureMode,
    pub token: u64,
}

impl GestureChange {
    pub fn new(mode: GestureMode) -> Self {
        GestureChange { mode, token: rand::thread_rng().gen() }
    }

    /// Wire form: `fist_<token>` / `open_<token>`.
    pub fn wire(&self) -> String {
        format!("{}_{:016x}", self.mode.tag(), self.token)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sinks
// ════════════════════════════════════════════════════════════════════════════

pub trait GestureSink: Send {
    fn emit(&mut self, change: &GestureChange);
}

/// Which sink `main` builds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyKind {
    #[default]
    Log,
    Stdout,
    None,
}

impl NotifyKind {
    pub fn build(self) -> Box<dyn GestureSink> {
        match self {
            NotifyKind::Log    => Box::new(LogSink),
            NotifyKind::Stdout => Box::new(JsonLineSink::new(std::io::stdout())),
            NotifyKind::None   => Box::new(NullSink),
        }
    }
}

pub struct LogSink;

impl GestureSink for LogSink {
    fn emit(&mut self, change: &GestureChange) {
        log::info!("gesture → {}", change.wire());
    }
}

pub struct NullSink;

impl GestureSink for NullSink {
    fn emit(&mut self, _change: &GestureChange) {}
}

/// Writes `{"gesture_input":"fist_…"}` per transition.
pub struct JsonLineSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonLineSink<W> {
    pub fn new(out: W) -> Self {
        JsonLineSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> GestureSink for JsonLineSink<W> {
    fn emit(&mut self, change: &GestureChange) {
        let line = serde_json::json!({ "gesture_input": change.wire() });
        let _ = writeln!(self.out, "{}", line);
        let _ = self.out.flush();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Notifier — fire-and-forget handle to the sink thread
// ════════════════════════════════════════════════════════════════════════════

/// Cloneable handle; each clone feeds the same sink thread.  Emitting never
/// blocks the caller on sink I/O.
#[derive(Clone)]
pub struct Notifier {
    tx: Sender<GestureChange>,
}

impl Notifier {
    /// Spawn the sink on its own thread.  The thread exits once every
    /// `Notifier` clone is dropped.
    pub fn spawn(mut sink: Box<dyn GestureSink>) -> Self {
        let (tx, rx) = mpsc::channel::<GestureChange>();
        thread::spawn(move || {
            for change in rx {
                sink.emit(&change);
            }
        });
        Notifier { tx }
    }

    pub fn notify(&self, mode: GestureMode) {
        let _ = self.tx.send(GestureChange::new(mode));
    }
}

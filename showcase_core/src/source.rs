//! Landmark producers.
//!
//! A detector runs on its own thread and pushes one result per detection
//! cycle into a [`LandmarkSink`].  The session never polls a detector.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use hand_landmarks::Landmark;

use crate::session::SessionMessage;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSink
// ════════════════════════════════════════════════════════════════════════════

/// Where a source delivers detections.
#[derive(Clone)]
pub struct LandmarkSink {
    tx: Sender<SessionMessage>,
}

impl LandmarkSink {
    pub fn new(tx: Sender<SessionMessage>) -> Self {
        LandmarkSink { tx }
    }

    /// Deliver one detection cycle; `None` means no hand.  Returns `false`
    /// once the session is gone.
    pub fn emit(&self, points: Option<Vec<Landmark>>) -> bool {
        self.tx.send(SessionMessage::Detection { points }).is_ok()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource
// ════════════════════════════════════════════════════════════════════════════

/// Anything that produces hand landmarks: hardware, a simulator, a recording.
pub trait LandmarkSource: Send + 'static {
    /// Produce detections until `stop` is set or the sink is closed.
    fn run(self: Box<Self>, sink: LandmarkSink, stop: Arc<AtomicBool>);
}

/// A source running on its own thread.
pub struct SourceHandle {
    stop: Arc<AtomicBool>,
    join: JoinHandle<()>,
}

impl SourceHandle {
    /// Ask the source to stop and wait for its thread.
    pub fn stop(self) {
        self.stop.store(true, Ordering::SeqCst);
        let _ = self.join.join();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

pub fn spawn_landmark_source<S: LandmarkSource>(source: S, sink: LandmarkSink) -> SourceHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let join = thread::spawn(move || Box::new(source).run(sink, flag));
    SourceHandle { stop, join }
}

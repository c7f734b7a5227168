//! Cancellable periodic timers.
//!
//! A ticker thread waits on a cancel channel with a timeout; each timeout is
//! a tick.  Sending on the channel, or dropping its sender, stops the thread.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::trace;

// ════════════════════════════════════════════════════════════════════════════
// CadenceHandle — owned by the controller while Auto is active
// ════════════════════════════════════════════════════════════════════════════

/// A running auto-advance cadence.
///
/// Ticks carry the handle's generation; the controller ignores ticks whose
/// generation no longer matches the live handle.
#[derive(Debug)]
pub struct CadenceHandle {
    generation: u64,
    cancel_tx:  Sender<()>,
    thread:     Option<JoinHandle<()>>,
}

impl CadenceHandle {
    pub fn new(generation: u64, cancel_tx: Sender<()>) -> Self {
        CadenceHandle { generation, cancel_tx, thread: None }
    }

    /// Attach the ticker thread so [`cancel`](Self::cancel) joins it.
    pub fn with_thread(mut self, thread: JoinHandle<()>) -> Self {
        self.thread = Some(thread);
        self
    }

    pub fn generation(&self) -> u64 { self.generation }

    /// Stop the cadence.  Returns once its ticker thread, if any, has exited.
    pub fn cancel(self) {
        trace!("cadence {} cancelled", self.generation);
        let _ = self.cancel_tx.send(());
        if let Some(thread) = self.thread {
            let _ = thread.join();
        }
    }
}

/// Starts cadences for the controller.
pub trait CadenceScheduler: Send {
    /// Arm a cadence firing every `every`, tagged with `generation`.
    fn start(&mut self, every: Duration, generation: u64) -> CadenceHandle;
}

// ════════════════════════════════════════════════════════════════════════════
// spawn_ticker
// ════════════════════════════════════════════════════════════════════════════

/// Run `on_tick` every `every` on a new thread until cancelled or until
/// `on_tick` returns `false`.
///
/// Returns the cancel sender and the thread's join handle.
pub fn spawn_ticker<F>(every: Duration, mut on_tick: F) -> (Sender<()>, JoinHandle<()>)
where
    F: FnMut() -> bool + Send + 'static,
{
    let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
    let join = thread::spawn(move || loop {
        match cancel_rx.recv_timeout(every) {
            Err(RecvTimeoutError::Timeout) => {
                if !on_tick() {
                    break;
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    });
    (cancel_tx, join)
}

// ════════════════════════════════════════════════════════════════════════════
// RecordingScheduler — test double
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::mpsc::{Receiver, TryRecvError};
    use std::sync::{Arc, Mutex};

    /// Records every cadence started; never ticks on its own.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingScheduler {
        started: Arc<Mutex<Vec<(u64, Duration, Receiver<()>)>>>,
    }

    impl RecordingScheduler {
        pub(crate) fn started(&self) -> Vec<u64> {
            self.started.lock().unwrap().iter().map(|(g, _, _)| *g).collect()
        }

        pub(crate) fn interval(&self, generation: u64) -> Option<Duration> {
            self.started.lock().unwrap().iter()
                .find(|(g, _, _)| *g == generation)
                .map(|(_, d, _)| *d)
        }

        /// Whether the cadence with `generation` has been cancelled.
        pub(crate) fn cancelled(&self, generation: u64) -> bool {
            self.started.lock().unwrap().iter()
                .find(|(g, _, _)| *g == generation)
                .map(|(_, _, rx)| !matches!(rx.try_recv(), Err(TryRecvError::Empty)))
                .unwrap_or(false)
        }
    }

    impl CadenceScheduler for RecordingScheduler {
        fn start(&mut self, every: Duration, generation: u64) -> CadenceHandle {
            let (tx, rx) = mpsc::channel();
            self.started.lock().unwrap().push((generation, every, rx));
            CadenceHandle::new(generation, tx)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

//! The showcase session: pipeline, controller and dispatcher behind one
//! message queue.
//!
//! ```text
//!  LandmarkSource ──Detection──┐
//!  idle ticker ─────IdleCheck──┤
//!  cadence ticker ──CadenceTick┼──► session thread ──► ActionDispatcher
//!  SessionHandle ───Ready/…────┘         │
//!                                        └──► Notifier ──► subscribers
//! ```
//!
//! Only the session thread touches controller state.  Each message is
//! handled to completion before the next is read.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use gesture_pipeline::{GesturePipeline, GestureSymbol};
use hand_landmarks::{Landmark, LandmarkFrame};

use crate::cadence::{spawn_ticker, CadenceHandle, CadenceScheduler};
use crate::clock::Clock;
use crate::config::ShowcaseConfig;
use crate::dispatch::ActionDispatcher;
use crate::mode::{InteractionMode, InteractionModeController, Outcome};
use crate::notify::{Notification, Notifier};
use crate::source::LandmarkSink;

// ════════════════════════════════════════════════════════════════════════════
// SessionMessage
// ════════════════════════════════════════════════════════════════════════════

pub enum SessionMessage {
    /// One detection cycle.  `None` means no hand was found.
    Detection { points: Option<Vec<Landmark>> },
    IdleCheck,
    CadenceTick { generation: u64 },
    /// Setup finished; enter the initial mode and start the idle clock.
    Ready,
    Subscribe(Sender<Notification>),
    /// Reply once every earlier message has been handled.
    Flush(Sender<()>),
    Shutdown,
}

/// Point-in-time view of session state for observers.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub mode:            InteractionMode,
    pub page:            usize,
    pub page_count:      usize,
    pub camera_distance: f32,
    pub hand_present:    bool,
    /// Raw classifier output for the latest frame.
    pub last_symbol:     Option<GestureSymbol>,
    pub ready:           bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Session — synchronous core, driven by messages
// ════════════════════════════════════════════════════════════════════════════

pub struct Session {
    pipeline:   GesturePipeline,
    controller: InteractionModeController,
    dispatcher: ActionDispatcher,
    notifier:   Notifier,
    clock:      Arc<dyn Clock>,
}

impl Session {
    pub fn new(
        config:     &ShowcaseConfig,
        dispatcher: ActionDispatcher,
        clock:      Arc<dyn Clock>,
        scheduler:  Box<dyn CadenceScheduler>,
    ) -> Self {
        let page_count = dispatcher.page_count();
        Session {
            pipeline:   GesturePipeline::new(config.gesture.clone(), &config.debounce),
            controller: InteractionModeController::new(config.mode.clone(), page_count, scheduler),
            dispatcher,
            notifier:   Notifier::new(),
            clock,
        }
    }

    /// Handle one message.  Returns `false` once the session should stop.
    pub fn handle(&mut self, msg: SessionMessage) -> bool {
        match msg {
            SessionMessage::Detection { points } => self.on_detection(points),
            SessionMessage::IdleCheck => {
                let now = self.clock.now_ms();
                let outcome = self.controller.check_idle(now);
                self.apply(outcome);
                let s = self.controller.state();
                debug!(
                    "state: mode={} page={}/{} hand={} idle={}ms",
                    s.mode(),
                    s.page(),
                    s.page_count(),
                    self.pipeline.hand_present(),
                    now.saturating_sub(s.last_interaction_ms()),
                );
            }
            SessionMessage::CadenceTick { generation } => {
                let outcome = self.controller.on_cadence_tick(generation);
                self.apply(outcome);
            }
            SessionMessage::Ready => {
                let outcome = self.controller.start(self.clock.now_ms());
                self.apply(outcome);
            }
            SessionMessage::Subscribe(tx) => self.notifier.add(tx),
            SessionMessage::Flush(reply) => {
                let _ = reply.send(());
            }
            SessionMessage::Shutdown => {
                self.controller.shutdown();
                return false;
            }
        }
        true
    }

    pub fn subscribe(&mut self) -> Receiver<Notification> {
        self.notifier.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let s = self.controller.state();
        SessionSnapshot {
            mode:            s.mode(),
            page:            s.page(),
            page_count:      s.page_count(),
            camera_distance: s.camera_distance(),
            hand_present:    self.pipeline.hand_present(),
            last_symbol:     self.pipeline.last_symbol(),
            ready:           self.controller.is_ready(),
        }
    }

    fn on_detection(&mut self, points: Option<Vec<Landmark>>) {
        let now = self.clock.now_ms();
        let frame = match points.map(|p| LandmarkFrame::new(p, now)).transpose() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("skipping malformed frame: {}", e);
                return;
            }
        };

        let Some(event) = self.pipeline.ingest(frame.as_ref(), now) else {
            return;
        };
        self.notifier.publish(Notification::GestureConfirmed(event));
        let outcome = self.controller.handle_gesture(&event);
        self.apply(outcome);
    }

    fn apply(&mut self, outcome: Outcome) {
        if let Some((from, to)) = outcome.mode_change {
            self.notifier.publish(Notification::ModeChanged { from, to });
        }
        for action in outcome.actions {
            let ok = self.dispatcher.dispatch(action);
            self.notifier.publish(Notification::ActionDispatched { action, ok });
        }
    }

    /// Run the session on its own thread with real tickers.
    pub fn spawn(config: ShowcaseConfig, dispatcher: ActionDispatcher, clock: Arc<dyn Clock>) -> SessionHandle {
        let (tx, rx) = mpsc::channel::<SessionMessage>();

        let scheduler = ThreadCadence { tx: tx.clone() };
        let mut session = Session::new(&config, dispatcher, clock, Box::new(scheduler));
        let shared = Arc::new(Mutex::new(session.snapshot()));

        let snapshot_out = Arc::clone(&shared);
        let session_thread = thread::spawn(move || {
            while let Ok(msg) = rx.recv() {
                let keep_going = session.handle(msg);
                *snapshot_out.lock().unwrap_or_else(PoisonError::into_inner) = session.snapshot();
                if !keep_going {
                    break;
                }
            }
            debug!("session thread exiting");
        });

        let idle_tx = tx.clone();
        let (idle_cancel, idle_thread) = spawn_ticker(
            Duration::from_millis(config.mode.idle_check_ms),
            move || idle_tx.send(SessionMessage::IdleCheck).is_ok(),
        );

        SessionHandle {
            tx,
            shared,
            session_thread: Some(session_thread),
            idle_cancel:    Some(idle_cancel),
            idle_thread:    Some(idle_thread),
        }
    }
}

/// Cadence ticks delivered as session messages.
struct ThreadCadence {
    tx: Sender<SessionMessage>,
}

impl CadenceScheduler for ThreadCadence {
    fn start(&mut self, every: Duration, generation: u64) -> CadenceHandle {
        let tx = self.tx.clone();
        let (cancel_tx, join) = spawn_ticker(every, move || {
            tx.send(SessionMessage::CadenceTick { generation }).is_ok()
        });
        CadenceHandle::new(generation, cancel_tx).with_thread(join)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SessionHandle
// ════════════════════════════════════════════════════════════════════════════

/// Handle to a running session.  Dropping it shuts the session down.
pub struct SessionHandle {
    tx:             Sender<SessionMessage>,
    shared:         Arc<Mutex<SessionSnapshot>>,
    session_thread: Option<JoinHandle<()>>,
    idle_cancel:    Option<Sender<()>>,
    idle_thread:    Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Deliver one detection cycle.  `None` means no hand.
    pub fn on_landmark_frame(&self, points: Option<Vec<Landmark>>) {
        let _ = self.tx.send(SessionMessage::Detection { points });
    }

    pub fn mark_ready(&self) {
        let _ = self.tx.send(SessionMessage::Ready);
    }

    pub fn subscribe(&self) -> Receiver<Notification> {
        let (tx, rx) = mpsc::channel();
        let _ = self.tx.send(SessionMessage::Subscribe(tx));
        rx
    }

    /// Block until every message sent so far has been handled.
    pub fn flush(&self) {
        let (tx, rx) = mpsc::channel();
        if self.tx.send(SessionMessage::Flush(tx)).is_ok() {
            let _ = rx.recv();
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn current_mode(&self) -> InteractionMode {
        self.snapshot().mode
    }

    pub fn current_page(&self) -> usize {
        self.snapshot().page
    }

    /// A sink for a [`LandmarkSource`](crate::source::LandmarkSource).
    pub fn sink(&self) -> LandmarkSink {
        LandmarkSink::new(self.tx.clone())
    }

    /// Stop the tickers and join the session thread.  Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(cancel) = self.idle_cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(join) = self.idle_thread.take() {
            let _ = join.join();
        }
        if let Some(join) = self.session_thread.take() {
            let _ = self.tx.send(SessionMessage::Shutdown);
            let _ = join.join();
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

//! Top-level application loop.
//!
//! Wires a landmark source into a showcase session whose actions land on a
//! [`ShowcaseView`], then renders the view, the tracked hand and the
//! session's notifications each frame.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use gesture_pipeline::GestureSymbol;
use showcase_core::{
    spawn_landmark_source, ActionDispatcher, MonotonicClock, Notification, Session,
    ShowcaseConfig, SourceHandle,
};

use crate::landmark_source::{HandMonitor, SimInput, SimLandmarkSource};
use crate::view::{default_catalogue, Product, ShowcaseView};
use crate::visualizer::{Scene, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Mouse and keyboard in the window.
    Simulated,
    /// LeapMotion hardware (`leap` feature).
    Leap,
}

/// Configuration for the full application.
pub struct AppConfig {
    pub showcase:     ShowcaseConfig,
    pub catalogue:    Vec<Product>,
    pub source:       SourceKind,
    /// Detection cycle of the simulated hand.
    pub frame_period: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            showcase:     ShowcaseConfig::default(),
            catalogue:    default_catalogue(),
            source:       SourceKind::Simulated,
            frame_period: Duration::from_millis(33),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState — what the window shows besides the view itself
// ════════════════════════════════════════════════════════════════════════════

/// Frames a confirmed gesture stays on screen.
const GESTURE_FRAMES: u32 = 90;

pub struct AppState {
    pub status:   String,
    last_gesture: Option<(GestureSymbol, u32)>,
    failures:     usize,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            status:       "Starting…".to_string(),
            last_gesture: None,
            failures:     0,
        }
    }

    pub fn handle_notification(&mut self, n: &Notification) {
        match n {
            Notification::GestureConfirmed(ev) => {
                self.last_gesture = Some((ev.symbol, GESTURE_FRAMES));
            }
            Notification::ActionDispatched { ok: false, .. } => {
                self.failures += 1;
            }
            _ => {}
        }
        self.status = n.to_string();
    }

    /// Per-frame bookkeeping.
    pub fn tick(&mut self) {
        if let Some((symbol, frames)) = self.last_gesture {
            self.last_gesture = (frames > 1).then_some((symbol, frames - 1));
        }
    }

    /// Last confirmed gesture with its remaining visibility in 0–1.
    pub fn gesture(&self) -> Option<(GestureSymbol, f32)> {
        self.last_gesture
            .map(|(s, frames)| (s, frames as f32 / GESTURE_FRAMES as f32))
    }

    pub fn failures(&self) -> usize { self.failures }
}

impl Default for AppState {
    fn default() -> Self { Self::new() }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It creates the session,
/// the view, the landmark source and the visualizer, marks the session ready
/// once all of them exist, and renders at ~60 fps until the window closes.
pub fn run(cfg: AppConfig) -> anyhow::Result<()> {
    if cfg.catalogue.is_empty() {
        anyhow::bail!("the catalogue has no products");
    }
    let page_count = cfg.catalogue.len();
    let view = ShowcaseView::new(page_count, &cfg.showcase.mode);
    let dispatcher = ActionDispatcher::new(Box::new(view.clone()), Box::new(view.clone()));

    let mut session = Session::spawn(cfg.showcase, dispatcher, Arc::new(MonotonicClock::new()));
    let notifications = session.subscribe();

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let mut vis = Visualizer::new(sim_tx)?;

    // ── Landmark source ───────────────────────────────────────────────────
    let monitor = HandMonitor::default();
    let source = start_source(cfg.source, sim_rx, cfg.frame_period, &monitor, &session)?;

    session.mark_ready();
    info!("showcase running with {} pages", page_count);

    let mut app = AppState::new();
    while vis.is_open() {
        if !vis.poll_input() { break; }

        if !drain(&notifications, &mut app) {
            break;
        }
        app.tick();
        view.tick();

        let snapshot = session.snapshot();
        let view_state = view.snapshot();
        let product = &cfg.catalogue[view_state.page.min(cfg.catalogue.len() - 1)];
        let hand = monitor.latest();
        vis.render(&Scene {
            session: &snapshot,
            view:    &view_state,
            product,
            hand:    hand.as_deref(),
            gesture: app.gesture(),
            status:  &app.status,
        });
    }

    source.stop();
    session.shutdown();
    info!("showcase closed ({} failed actions)", app.failures());
    Ok(())
}

/// Feed pending notifications to `app`.  False once the session is gone.
fn drain(rx: &Receiver<Notification>, app: &mut AppState) -> bool {
    loop {
        match rx.try_recv() {
            Ok(n) => app.handle_notification(&n),
            Err(TryRecvError::Empty)        => return true,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}

fn start_source(
    kind:    SourceKind,
    sim_rx:  Receiver<SimInput>,
    period:  Duration,
    monitor: &HandMonitor,
    session: &showcase_core::SessionHandle,
) -> anyhow::Result<SourceHandle> {
    match kind {
        SourceKind::Simulated => {
            let source = SimLandmarkSource { rx: sim_rx, period, monitor: monitor.clone() };
            Ok(spawn_landmark_source(source, session.sink()))
        }
        #[cfg(feature = "leap")]
        SourceKind::Leap => {
            let source = crate::landmark_source::LeapLandmarkSource { monitor: monitor.clone() };
            Ok(spawn_landmark_source(source, session.sink()))
        }
        #[cfg(not(feature = "leap"))]
        SourceKind::Leap => anyhow::bail!("built without the `leap` feature"),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_pipeline::GestureEvent;
    use showcase_core::{Action, InteractionMode};

    fn confirmed(symbol: GestureSymbol) -> Notification {
        Notification::GestureConfirmed(GestureEvent { symbol, confirmed_at_ms: 0 })
    }

    #[test]
    fn gesture_label_fades_out() {
        let mut app = AppState::new();
        app.handle_notification(&confirmed(GestureSymbol::Pinch));
        assert_eq!(app.gesture(), Some((GestureSymbol::Pinch, 1.0)));
        for _ in 0..GESTURE_FRAMES - 1 {
            app.tick();
        }
        assert!(app.gesture().is_some());
        app.tick();
        assert_eq!(app.gesture(), None);
    }

    #[test]
    fn status_follows_notifications() {
        let mut app = AppState::new();
        app.handle_notification(&Notification::ModeChanged {
            from: InteractionMode::Auto,
            to:   InteractionMode::Selection,
        });
        assert_eq!(app.status, "mode auto -> selection");
    }

    #[test]
    fn failed_actions_are_counted() {
        let mut app = AppState::new();
        app.handle_notification(&Notification::ActionDispatched { action: Action::ResetView, ok: false });
        app.handle_notification(&Notification::ActionDispatched { action: Action::SetPage(1), ok: true });
        assert_eq!(app.failures(), 1);
    }

    #[test]
    fn drain_reports_disconnect() {
        let (tx, rx) = mpsc::channel();
        let mut app = AppState::new();
        tx.send(confirmed(GestureSymbol::SwipeUp)).unwrap();
        assert!(drain(&rx, &mut app));
        drop(tx);
        assert!(!drain(&rx, &mut app));
        assert!(app.gesture().is_some());
    }

    #[test]
    fn session_drives_view_end_to_end() {
        use crate::landmark_source::synthesize_hand;
        use showcase_core::ManualClock;

        let view = ShowcaseView::new(3, &showcase_core::ModeConfig::default());
        let dispatcher = ActionDispatcher::new(Box::new(view.clone()), Box::new(view.clone()));
        let clock = ManualClock::new(0);
        let mut session = Session::spawn(ShowcaseConfig::default(), dispatcher, Arc::new(clock.clone()));
        session.mark_ready();

        // palm sweeping left, then a pinch
        for i in 0..9u64 {
            session.flush();
            clock.set(i * 100);
            session.on_landmark_frame(Some(synthesize_hand(0.8 - i as f32 * 0.04, 0.5, false)));
        }
        for i in 0..6u64 {
            session.flush();
            clock.set(1_500 + i * 100);
            session.on_landmark_frame(Some(synthesize_hand(0.5, 0.5, true)));
        }
        session.flush();

        assert_eq!(view.snapshot().page, 1);
        assert_eq!(session.current_mode(), InteractionMode::Inspection);
        session.shutdown();
    }
}

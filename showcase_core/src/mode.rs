//! Interaction mode state machine.
//!
//! ```text
//!            any gesture                 SwipeUp / Pinch
//!   Auto ───────────────► Selection ─────────────────────► Inspection
//!    ▲                     ▲   │  ▲                           │
//!    │   idle timeout      │   │  └────────── Pinch ──────────┘
//!    └─────────────────────┴───┴──── idle timeout ◄───────────┘
//! ```
//!
//! The controller decides; it never calls collaborators itself.  Each input
//! returns an [`Outcome`] listing the mode change (if any) and the
//! [`Action`]s the session hands to the dispatcher.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use gesture_pipeline::{GestureEvent, GestureSymbol};

use crate::cadence::{CadenceHandle, CadenceScheduler};
use crate::config::ModeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Unattended; pages advance on a timer.
    Auto,
    /// Browsing pages by swiping.
    Selection,
    /// Close-up of the current page's object.
    Inspection,
}

impl InteractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionMode::Auto       => "auto",
            InteractionMode::Selection  => "selection",
            InteractionMode::Inspection => "inspection",
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A collaborator call decided by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    SetPage(usize),
    /// Turn the object to this azimuth, degrees in (-180, 180].
    Rotate(f32),
    /// Multiply magnification by this factor.
    Zoom(f32),
    ResetView,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::SetPage(p) => write!(f, "set-page({})", p),
            Action::Rotate(a)  => write!(f, "rotate({:.1}°)", a),
            Action::Zoom(z)    => write!(f, "zoom(×{:.3})", z),
            Action::ResetView  => f.write_str("reset-view"),
        }
    }
}

/// What one controller input produced.
#[derive(Debug, Default, PartialEq)]
pub struct Outcome {
    pub mode_change: Option<(InteractionMode, InteractionMode)>,
    pub actions:     Vec<Action>,
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        self.mode_change.is_none() && self.actions.is_empty()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ControllerState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct ControllerState {
    mode:                InteractionMode,
    page:                usize,
    page_count:          usize,
    last_interaction_ms: u64,
    camera_distance:     f32,
    cadence:             Option<CadenceHandle>,
    generation:          u64,
}

impl ControllerState {
    pub fn mode(&self) -> InteractionMode { self.mode }
    pub fn page(&self) -> usize { self.page }
    pub fn page_count(&self) -> usize { self.page_count }
    pub fn last_interaction_ms(&self) -> u64 { self.last_interaction_ms }
    pub fn camera_distance(&self) -> f32 { self.camera_distance }

    /// Generation of the live cadence, if one is armed.
    pub fn cadence_generation(&self) -> Option<u64> {
        self.cadence.as_ref().map(CadenceHandle::generation)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// InteractionModeController
// ════════════════════════════════════════════════════════════════════════════

pub struct InteractionModeController {
    config:    ModeConfig,
    state:     ControllerState,
    scheduler: Box<dyn CadenceScheduler>,
    ready:     bool,
}

impl InteractionModeController {
    /// `page_count` below 1 is treated as 1.
    pub fn new(config: ModeConfig, page_count: usize, scheduler: Box<dyn CadenceScheduler>) -> Self {
        let state = ControllerState {
            mode:                config.initial_mode.into(),
            page:                0,
            page_count:          page_count.max(1),
            last_interaction_ms: 0,
            camera_distance:     config.initial_camera_distance,
            cadence:             None,
            generation:          0,
        };
        InteractionModeController { config, state, scheduler, ready: false }
    }

    pub fn state(&self) -> &ControllerState { &self.state }
    pub fn mode(&self) -> InteractionMode { self.state.mode }
    pub fn page(&self) -> usize { self.state.page }
    pub fn is_ready(&self) -> bool { self.ready }

    /// Mark the controller ready and enter the initial mode.  The idle clock
    /// starts at `now_ms`.  Calling it again does nothing.
    pub fn start(&mut self, now_ms: u64) -> Outcome {
        if self.ready {
            return Outcome::default();
        }
        self.ready = true;
        self.state.last_interaction_ms = now_ms;
        info!("showcase ready in {} mode", self.state.mode);

        let mut out = Outcome::default();
        match self.state.mode {
            InteractionMode::Auto => self.enter_auto(&mut out),
            _ => out.actions.push(Action::SetPage(self.state.page)),
        }
        out
    }

    /// Apply one confirmed gesture.  Dropped before [`start`](Self::start).
    pub fn handle_gesture(&mut self, event: &GestureEvent) -> Outcome {
        use GestureSymbol::*;
        use InteractionMode::*;

        let mut out = Outcome::default();
        if !self.ready {
            debug!("{} dropped: showcase not ready", event.symbol);
            return out;
        }
        self.state.last_interaction_ms = event.confirmed_at_ms;

        match (self.state.mode, event.symbol) {
            (Auto, _) => {
                self.cancel_cadence();
                self.set_mode(Selection, &mut out);
            }

            (Selection, SwipeLeft) => {
                if self.state.page + 1 < self.state.page_count {
                    self.state.page += 1;
                    out.actions.push(Action::SetPage(self.state.page));
                }
            }
            (Selection, SwipeRight) => {
                if self.state.page > 0 {
                    self.state.page -= 1;
                    out.actions.push(Action::SetPage(self.state.page));
                }
            }
            (Selection, SwipeUp) | (Selection, Pinch) => {
                self.state.camera_distance = self.config.initial_camera_distance;
                out.actions.push(Action::ResetView);
                self.set_mode(Inspection, &mut out);
            }
            (Selection, SwipeDown) => {}

            (Inspection, SwipeLeft) => {
                out.actions.push(Action::Rotate(normalize_azimuth(self.config.rotate_left_deg)));
            }
            (Inspection, SwipeRight) => {
                out.actions.push(Action::Rotate(normalize_azimuth(self.config.rotate_right_deg)));
            }
            (Inspection, SwipeUp) => self.zoom(self.config.zoom_in_factor, &mut out),
            (Inspection, SwipeDown) => self.zoom(self.config.zoom_out_factor, &mut out),
            (Inspection, Pinch) => self.set_mode(Selection, &mut out),
        }
        out
    }

    /// Revert to Auto when nothing was confirmed for the idle timeout.
    pub fn check_idle(&mut self, now_ms: u64) -> Outcome {
        let mut out = Outcome::default();
        if !self.ready || self.state.mode == InteractionMode::Auto {
            return out;
        }
        let idle = now_ms.saturating_sub(self.state.last_interaction_ms);
        if idle < self.config.idle_timeout_ms {
            return out;
        }

        info!("idle for {}ms, returning to auto", idle);
        if self.state.mode == InteractionMode::Inspection {
            self.state.camera_distance = self.config.initial_camera_distance;
            out.actions.push(Action::ResetView);
        }
        self.enter_auto(&mut out);
        out
    }

    /// One auto-advance tick.  Ticks from a cancelled cadence are ignored.
    pub fn on_cadence_tick(&mut self, generation: u64) -> Outcome {
        let mut out = Outcome::default();
        if self.state.mode != InteractionMode::Auto
            || self.state.cadence_generation() != Some(generation)
        {
            debug!("stale cadence tick {} ignored", generation);
            return out;
        }
        self.state.page = (self.state.page + 1) % self.state.page_count;
        out.actions.push(Action::SetPage(self.state.page));
        out
    }

    /// Cancel any running cadence.
    pub fn shutdown(&mut self) {
        self.cancel_cadence();
    }

    // ── internals ────────────────────────────────────────────────────────

    fn enter_auto(&mut self, out: &mut Outcome) {
        self.state.page = 0;
        out.actions.push(Action::SetPage(0));

        self.cancel_cadence();
        self.state.generation += 1;
        let every = Duration::from_millis(self.config.auto_advance_ms);
        self.state.cadence = Some(self.scheduler.start(every, self.state.generation));

        self.set_mode(InteractionMode::Auto, out);
    }

    fn cancel_cadence(&mut self) {
        if let Some(handle) = self.state.cadence.take() {
            handle.cancel();
        }
    }

    fn set_mode(&mut self, to: InteractionMode, out: &mut Outcome) {
        let from = self.state.mode;
        if from == to {
            return;
        }
        info!("mode {} -> {}", from, to);
        self.state.mode = to;
        out.mode_change = Some((from, to));
    }

    fn zoom(&mut self, factor: f32, out: &mut Outcome) {
        let d = self.state.camera_distance;
        let target = (d / factor)
            .clamp(self.config.min_camera_distance, self.config.max_camera_distance);
        if target == d {
            debug!("zoom ×{} clamped away at distance {}", factor, d);
            return;
        }
        self.state.camera_distance = target;
        out.actions.push(Action::Zoom(d / target));
    }
}

impl Drop for InteractionModeController {
    fn drop(&mut self) {
        self.cancel_cadence();
    }
}

/// Fold an angle in degrees into (-180, 180].
pub fn normalize_azimuth(deg: f32) -> f32 {
    let r = deg.rem_euclid(360.0);
    if r > 180.0 { r - 360.0 } else { r }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cadence::testing::RecordingScheduler;
    use crate::config::InitialMode;
    use GestureSymbol::*;
    use InteractionMode::*;

    fn controller(initial: InitialMode, pages: usize) -> (InteractionModeController, RecordingScheduler) {
        let sched = RecordingScheduler::default();
        let config = ModeConfig { initial_mode: initial, ..ModeConfig::default() };
        let c = InteractionModeController::new(config, pages, Box::new(sched.clone()));
        (c, sched)
    }

    fn ev(symbol: GestureSymbol, t: u64) -> GestureEvent {
        GestureEvent { symbol, confirmed_at_ms: t }
    }

    fn selection_at_page(page: usize, pages: usize) -> InteractionModeController {
        let (mut c, _) = controller(InitialMode::Selection, pages);
        c.start(0);
        for i in 0..page {
            c.handle_gesture(&ev(SwipeLeft, i as u64));
        }
        assert_eq!(c.page(), page);
        c
    }

    #[test]
    fn gestures_before_ready_are_dropped() {
        let (mut c, _) = controller(InitialMode::Selection, 3);
        assert!(c.handle_gesture(&ev(SwipeLeft, 10)).is_empty());
        assert_eq!(c.page(), 0);
        assert_eq!(c.state().last_interaction_ms(), 0);
    }

    #[test]
    fn start_in_selection_shows_first_page() {
        let (mut c, sched) = controller(InitialMode::Selection, 3);
        let out = c.start(1_000);
        assert_eq!(out.actions, vec![Action::SetPage(0)]);
        assert_eq!(c.mode(), Selection);
        assert_eq!(c.state().last_interaction_ms(), 1_000);
        assert!(sched.started().is_empty());
        assert!(c.start(2_000).is_empty());
    }

    #[test]
    fn start_in_auto_arms_cadence() {
        let (mut c, sched) = controller(InitialMode::Auto, 3);
        let out = c.start(0);
        assert_eq!(out.actions, vec![Action::SetPage(0)]);
        assert_eq!(sched.started(), vec![1]);
        assert_eq!(sched.interval(1), Some(Duration::from_millis(5_000)));
        assert_eq!(c.state().cadence_generation(), Some(1));
    }

    #[test]
    fn cadence_wraps_pages() {
        let (mut c, _) = controller(InitialMode::Auto, 3);
        c.start(0);
        let pages: Vec<usize> = (0..4)
            .map(|_| {
                c.on_cadence_tick(1);
                c.page()
            })
            .collect();
        assert_eq!(pages, vec![1, 2, 0, 1]);
    }

    #[test]
    fn auto_gesture_cancels_cadence_and_later_ticks_do_nothing() {
        let (mut c, sched) = controller(InitialMode::Auto, 3);
        c.start(0);
        c.on_cadence_tick(1);
        let out = c.handle_gesture(&ev(SwipeDown, 100));
        assert_eq!(out.mode_change, Some((Auto, Selection)));
        assert!(out.actions.is_empty());
        assert!(sched.cancelled(1));
        assert_eq!(c.state().cadence_generation(), None);

        assert!(c.on_cadence_tick(1).is_empty());
        assert_eq!(c.page(), 1);
        assert_eq!(c.mode(), Selection);
    }

    #[test]
    fn swipe_left_three_times_clamps_at_last_page() {
        let (mut c, _) = controller(InitialMode::Selection, 3);
        c.start(0);
        let mut pages = Vec::new();
        for t in 0..3 {
            c.handle_gesture(&ev(SwipeLeft, t));
            pages.push(c.page());
        }
        assert_eq!(pages, vec![1, 2, 2]);
    }

    #[test]
    fn swipe_right_at_first_page_is_silent() {
        let (mut c, _) = controller(InitialMode::Selection, 3);
        c.start(0);
        assert!(c.handle_gesture(&ev(SwipeRight, 1)).is_empty());
        assert_eq!(c.page(), 0);
    }

    #[test]
    fn swipe_down_in_selection_does_nothing() {
        let mut c = selection_at_page(1, 3);
        assert!(c.handle_gesture(&ev(SwipeDown, 50)).is_empty());
        assert_eq!(c.mode(), Selection);
        assert_eq!(c.state().last_interaction_ms(), 50);
    }

    #[test]
    fn pinch_enters_inspection_with_one_reset() {
        let mut c = selection_at_page(1, 3);
        let out = c.handle_gesture(&ev(Pinch, 10));
        assert_eq!(out.mode_change, Some((Selection, Inspection)));
        assert_eq!(out.actions, vec![Action::ResetView]);
        assert_eq!(c.page(), 1);
    }

    #[test]
    fn swipe_up_also_enters_inspection() {
        let mut c = selection_at_page(0, 3);
        let out = c.handle_gesture(&ev(SwipeUp, 10));
        assert_eq!(c.mode(), Inspection);
        assert_eq!(out.actions, vec![Action::ResetView]);
    }

    #[test]
    fn inspection_rotates_to_fixed_azimuths() {
        let mut c = selection_at_page(0, 3);
        c.handle_gesture(&ev(Pinch, 1));
        assert_eq!(c.handle_gesture(&ev(SwipeLeft, 2)).actions, vec![Action::Rotate(90.0)]);
        assert_eq!(c.handle_gesture(&ev(SwipeRight, 3)).actions, vec![Action::Rotate(-90.0)]);
        assert_eq!(c.mode(), Inspection);
    }

    #[test]
    fn repeated_zoom_in_never_crosses_min_distance() {
        let mut c = selection_at_page(0, 3);
        c.handle_gesture(&ev(Pinch, 0));
        let mut zooms = 0;
        for t in 1..60 {
            let out = c.handle_gesture(&ev(SwipeUp, t));
            for a in out.actions {
                match a {
                    Action::Zoom(f) => {
                        assert!(f > 1.0, "zoom in must magnify, got {}", f);
                        zooms += 1;
                    }
                    other => panic!("unexpected {:?}", other),
                }
            }
            assert!(c.state().camera_distance() >= 2.0);
        }
        assert_eq!(c.state().camera_distance(), 2.0);
        // 8 → 2 at ÷1.1 per step takes 15 steps, the last one clamped
        assert_eq!(zooms, 15);
        assert!(c.handle_gesture(&ev(SwipeUp, 100)).actions.is_empty());
    }

    #[test]
    fn zoom_out_clamps_at_max_distance() {
        let mut c = selection_at_page(0, 3);
        c.handle_gesture(&ev(Pinch, 0));
        for t in 1..40 {
            c.handle_gesture(&ev(SwipeDown, t));
            assert!(c.state().camera_distance() <= 15.0);
        }
        assert_eq!(c.state().camera_distance(), 15.0);
    }

    #[test]
    fn effective_zoom_factor_reflects_clamp() {
        let mut c = selection_at_page(0, 3);
        c.handle_gesture(&ev(Pinch, 0));
        // walk down to 2.1-ish then check the final clamped step
        let mut last = None;
        for t in 1..60 {
            if let Some(Action::Zoom(f)) = c.handle_gesture(&ev(SwipeUp, t)).actions.first() {
                last = Some(*f);
            }
        }
        let f = last.unwrap();
        assert!(f > 1.0 && f <= 1.1);
    }

    #[test]
    fn pinch_in_inspection_returns_to_selection() {
        let mut c = selection_at_page(2, 3);
        c.handle_gesture(&ev(Pinch, 10));
        let out = c.handle_gesture(&ev(Pinch, 700));
        assert_eq!(out.mode_change, Some((Inspection, Selection)));
        assert!(out.actions.is_empty());
        assert_eq!(c.page(), 2);
    }

    #[test]
    fn reentering_inspection_resets_distance() {
        let mut c = selection_at_page(0, 3);
        c.handle_gesture(&ev(Pinch, 0));
        c.handle_gesture(&ev(SwipeUp, 1));
        assert!(c.state().camera_distance() < 8.0);
        c.handle_gesture(&ev(Pinch, 2));
        c.handle_gesture(&ev(Pinch, 3));
        assert_eq!(c.state().camera_distance(), 8.0);
    }

    #[test]
    fn idle_timeout_returns_to_auto_at_page_zero() {
        let (mut c, sched) = controller(InitialMode::Selection, 3);
        c.start(0);
        c.handle_gesture(&ev(SwipeLeft, 1_000));
        c.handle_gesture(&ev(SwipeLeft, 2_000));

        assert!(c.check_idle(31_999).is_empty());
        let out = c.check_idle(32_000);
        assert_eq!(out.mode_change, Some((Selection, Auto)));
        assert_eq!(out.actions, vec![Action::SetPage(0)]);
        assert_eq!(c.page(), 0);
        assert_eq!(sched.started(), vec![1]);
        assert!(c.check_idle(90_000).is_empty());
    }

    #[test]
    fn idle_in_inspection_exits_inspection_first() {
        let mut c = selection_at_page(1, 3);
        c.handle_gesture(&ev(Pinch, 100));
        c.handle_gesture(&ev(SwipeUp, 200));
        let out = c.check_idle(30_200);
        assert_eq!(out.mode_change, Some((Inspection, Auto)));
        assert_eq!(out.actions, vec![Action::ResetView, Action::SetPage(0)]);
        assert_eq!(c.state().camera_distance(), 8.0);
    }

    #[test]
    fn every_gesture_refreshes_idle_clock() {
        let (mut c, _) = controller(InitialMode::Selection, 3);
        c.start(0);
        for t in (10_000..100_000).step_by(20_000) {
            c.handle_gesture(&ev(SwipeDown, t));
            assert!(c.check_idle(t + 29_999).is_empty());
        }
    }

    #[test]
    fn reentering_auto_bumps_generation() {
        let (mut c, sched) = controller(InitialMode::Auto, 3);
        c.start(0);
        c.handle_gesture(&ev(Pinch, 10));
        c.check_idle(40_000);
        assert_eq!(sched.started(), vec![1, 2]);
        assert!(sched.cancelled(1));
        assert!(!sched.cancelled(2));
        assert!(c.on_cadence_tick(1).is_empty());
        assert_eq!(c.on_cadence_tick(2).actions, vec![Action::SetPage(1)]);
    }

    #[test]
    fn shutdown_cancels_cadence() {
        let (mut c, sched) = controller(InitialMode::Auto, 3);
        c.start(0);
        c.shutdown();
        assert!(sched.cancelled(1));
    }

    #[test]
    fn page_always_in_range() {
        // small LCG so the sequence is fixed
        let mut seed: u32 = 0x2545_f491;
        let mut next = move || {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            seed >> 16
        };
        for pages in 1..5 {
            let (mut c, _) = controller(InitialMode::Auto, pages);
            c.start(0);
            for t in 0..500u64 {
                let gen = c.state().cadence_generation().unwrap_or(0);
                match next() % 8 {
                    0 => { c.on_cadence_tick(gen); }
                    1 => { c.check_idle(t * 1_000); }
                    n => {
                        let s = GestureSymbol::ALL[(n as usize) % 5];
                        c.handle_gesture(&ev(s, t * 100));
                    }
                }
                assert!(c.page() < pages);
            }
        }
    }

    #[test]
    fn azimuth_normalization() {
        assert_eq!(normalize_azimuth(90.0), 90.0);
        assert_eq!(normalize_azimuth(-90.0), -90.0);
        assert_eq!(normalize_azimuth(270.0), -90.0);
        assert_eq!(normalize_azimuth(180.0), 180.0);
        assert_eq!(normalize_azimuth(-180.0), 180.0);
    }
}

//! Frame-by-frame gesture classification.
//!
//! # Algorithm
//!
//! * **Pinch**: thumb tip to index tip distance `< pinch_threshold`.
//!   Checked first; a pinch clears the motion window so the hand movement
//!   that accompanied it cannot complete a swipe afterwards.
//! * **Swipe**: the tracked landmark is pushed into a [`MotionWindow`].  Once
//!   the window is full, the oldest→newest vector `(dx, dy)` must exceed
//!   `displacement_threshold` on its dominant axis and cover the window at
//!   `min_swipe_speed` or faster.  Direction follows the dominant axis; ties
//!   go to the vertical axis.
//!
//! The window slides: a sustained swipe keeps producing the same symbol on
//! every frame, which is what the debouncer's consistency check counts.
//!
//! Once a pinch has been confirmed it is latched: further pinching frames
//! classify as nothing until the fingers open or the hand is lost, so a held
//! pinch is one gesture.

use tracing::trace;

use hand_landmarks::{LandmarkFrame, MotionSample, MotionWindow};

use crate::config::GestureConfig;
use crate::symbol::GestureSymbol;

pub struct GestureClassifier {
    config:        GestureConfig,
    window:        MotionWindow,
    pinch_latched: bool,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        let window = MotionWindow::new(config.window_size.max(2));
        GestureClassifier { config, window, pinch_latched: false }
    }

    pub fn window(&self) -> &MotionWindow { &self.window }

    /// Classify one frame.  `None` means nothing recognisable yet.
    pub fn classify(&mut self, frame: &LandmarkFrame) -> Option<GestureSymbol> {
        let pinch = frame.pinch_distance();
        if pinch < self.config.pinch_threshold {
            trace!("pinch at {:.3} (threshold {:.3})", pinch, self.config.pinch_threshold);
            self.window.clear();
            return (!self.pinch_latched).then_some(GestureSymbol::Pinch);
        }
        self.pinch_latched = false;

        let p = frame.point(self.config.tracked_landmark.index());
        self.window.push(MotionSample {
            x:            p.x,
            y:            p.y,
            timestamp_ms: frame.timestamp_ms(),
        });

        let d = self.window.displacement()?;
        if d.dominant_magnitude() < self.config.displacement_threshold {
            return None;
        }
        if d.speed_per_sec() < self.config.min_swipe_speed {
            trace!("slow drift rejected: {:.3}/s", d.speed_per_sec());
            return None;
        }
        Some(swipe_direction(d.dx, d.dy))
    }

    /// No hand in the current detection cycle.
    pub fn hand_lost(&mut self) {
        self.window.clear();
        self.pinch_latched = false;
    }

    /// `symbol` was just confirmed: forget the motion behind it, and hold a
    /// pinch until it is released.
    pub fn settle(&mut self, symbol: GestureSymbol) {
        self.window.clear();
        self.pinch_latched = symbol == GestureSymbol::Pinch;
    }
}

fn swipe_direction(dx: f32, dy: f32) -> GestureSymbol {
    if dx.abs() > dy.abs() {
        if dx > 0.0 { GestureSymbol::SwipeRight } else { GestureSymbol::SwipeLeft }
    } else if dy > 0.0 {
        GestureSymbol::SwipeDown
    } else {
        GestureSymbol::SwipeUp
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use hand_landmarks::{index, Landmark, LANDMARK_COUNT};

    /// An open hand with the wrist at (wx, wy): every point sits on the
    /// wrist except the thumb and index tips, which are far apart.
    pub(crate) fn hand_at(wx: f32, wy: f32, t: u64) -> LandmarkFrame {
        let mut pts = vec![Landmark::new(wx, wy); LANDMARK_COUNT];
        pts[index::THUMB_TIP] = Landmark::new(wx - 0.2, wy);
        pts[index::INDEX_TIP] = Landmark::new(wx, wy - 0.3);
        LandmarkFrame::new(pts, t).unwrap()
    }

    fn hand_with_tips(thumb: (f32, f32), index_tip: (f32, f32)) -> LandmarkFrame {
        let mut pts = vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        pts[index::THUMB_TIP] = Landmark::new(thumb.0, thumb.1);
        pts[index::INDEX_TIP] = Landmark::new(index_tip.0, index_tip.1);
        LandmarkFrame::new(pts, 0).unwrap()
    }

    fn run(c: &mut GestureClassifier, path: &[(f32, f32)], step_ms: u64) -> Vec<Option<GestureSymbol>> {
        path.iter()
            .enumerate()
            .map(|(i, &(x, y))| c.classify(&hand_at(x, y, i as u64 * step_ms)))
            .collect()
    }

    fn line(from: (f32, f32), step: (f32, f32), n: usize) -> Vec<(f32, f32)> {
        (0..n).map(|i| (from.0 + step.0 * i as f32, from.1 + step.1 * i as f32)).collect()
    }

    #[test]
    fn pinch_at_threshold_is_not_pinch() {
        let mut c = GestureClassifier::new(GestureConfig {
            pinch_threshold: 0.125,
            ..GestureConfig::default()
        });
        // exactly 0.125 apart (representable in binary)
        let frame = hand_with_tips((0.25, 0.5), (0.375, 0.5));
        assert_eq!(frame.pinch_distance(), 0.125);
        assert_eq!(c.classify(&frame), None);
    }

    #[test]
    fn pinch_just_below_threshold() {
        let mut c = GestureClassifier::new(GestureConfig {
            pinch_threshold: 0.125,
            ..GestureConfig::default()
        });
        let frame = hand_with_tips((0.25, 0.5), (0.37, 0.5));
        assert_eq!(c.classify(&frame), Some(GestureSymbol::Pinch));
    }

    #[test]
    fn pinch_clears_motion_window() {
        let mut c = GestureClassifier::new(GestureConfig::default());
        run(&mut c, &line((0.2, 0.5), (0.01, 0.0), 3), 100);
        assert_eq!(c.window().len(), 3);
        let frame = hand_with_tips((0.5, 0.5), (0.51, 0.5));
        assert_eq!(c.classify(&frame), Some(GestureSymbol::Pinch));
        assert!(c.window().is_empty());
    }

    #[test]
    fn settled_pinch_latches_until_release() {
        let mut c = GestureClassifier::new(GestureConfig::default());
        let pinch = hand_with_tips((0.5, 0.5), (0.51, 0.5));
        assert_eq!(c.classify(&pinch), Some(GestureSymbol::Pinch));
        c.settle(GestureSymbol::Pinch);
        assert_eq!(c.classify(&pinch), None);
        assert_eq!(c.classify(&hand_at(0.5, 0.5, 0)), None);
        assert_eq!(c.classify(&pinch), Some(GestureSymbol::Pinch));
    }

    #[test]
    fn settled_swipe_does_not_latch_pinch() {
        let mut c = GestureClassifier::new(GestureConfig::default());
        c.settle(GestureSymbol::SwipeLeft);
        let pinch = hand_with_tips((0.5, 0.5), (0.51, 0.5));
        assert_eq!(c.classify(&pinch), Some(GestureSymbol::Pinch));
    }

    #[test]
    fn needs_full_window() {
        let mut c = GestureClassifier::new(GestureConfig::default());
        let out = run(&mut c, &line((0.2, 0.5), (0.05, 0.0), 5), 100);
        assert_eq!(&out[..4], &[None, None, None, None]);
        assert_eq!(out[4], Some(GestureSymbol::SwipeRight));
    }

    #[test]
    fn each_direction_by_dominant_axis() {
        let cases = [
            ((0.05, 0.01),  GestureSymbol::SwipeRight),
            ((-0.05, 0.01), GestureSymbol::SwipeLeft),
            ((0.01, 0.05),  GestureSymbol::SwipeDown),
            ((0.01, -0.05), GestureSymbol::SwipeUp),
        ];
        for (step, expected) in cases {
            let mut c = GestureClassifier::new(GestureConfig::default());
            let out = run(&mut c, &line((0.5, 0.5), step, 5), 100);
            assert_eq!(out[4], Some(expected), "step {:?}", step);
        }
    }

    #[test]
    fn small_displacement_ignored() {
        let mut c = GestureClassifier::new(GestureConfig::default());
        // 4 × 0.01 = 0.04 < 0.06
        let out = run(&mut c, &line((0.5, 0.5), (0.01, 0.0), 5), 100);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn slow_drift_rejected_by_speed_gate() {
        let mut c = GestureClassifier::new(GestureConfig::default());
        // 0.08 over 4 s = 0.02/s, below 0.1/s
        let out = run(&mut c, &line((0.3, 0.5), (0.02, 0.0), 5), 1_000);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn speed_gate_can_be_disabled() {
        let mut c = GestureClassifier::new(GestureConfig {
            min_swipe_speed: 0.0,
            ..GestureConfig::default()
        });
        let out = run(&mut c, &line((0.3, 0.5), (0.02, 0.0), 5), 1_000);
        assert_eq!(out[4], Some(GestureSymbol::SwipeRight));
    }

    #[test]
    fn sustained_swipe_repeats_while_window_slides() {
        let mut c = GestureClassifier::new(GestureConfig::default());
        let out = run(&mut c, &line((0.1, 0.5), (0.04, 0.0), 9), 100);
        assert!(out[4..].iter().all(|s| *s == Some(GestureSymbol::SwipeRight)));
    }

    #[test]
    fn hand_loss_splits_episodes() {
        let mut c = GestureClassifier::new(GestureConfig::default());
        run(&mut c, &line((0.1, 0.5), (0.05, 0.0), 3), 100);
        c.hand_lost();
        assert!(c.window().is_empty());
        // Two more frames cannot complete a window started before the loss.
        assert_eq!(c.classify(&hand_at(0.30, 0.5, 500)), None);
        assert_eq!(c.classify(&hand_at(0.35, 0.5, 600)), None);
        assert_eq!(c.window().len(), 2);
    }

    #[test]
    fn index_tip_can_be_tracked() {
        let mut c = GestureClassifier::new(GestureConfig {
            tracked_landmark: crate::config::TrackedLandmark::IndexTip,
            ..GestureConfig::default()
        });
        // index tip sits 0.3 above the wrist, so motion is identical
        let out = run(&mut c, &line((0.5, 0.8), (0.0, -0.05), 5), 100);
        assert_eq!(out[4], Some(GestureSymbol::SwipeUp));
    }
}

//! Bounded history of one tracked landmark.
//!
//! The window holds the most recent `capacity` positions, oldest first.
//! Pushing into a full window evicts the oldest sample.

use std::collections::VecDeque;

/// Position of the tracked landmark at one detection cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    pub x:            f32,
    pub y:            f32,
    pub timestamp_ms: u64,
}

/// Net motion between the oldest and newest sample of a full window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Displacement {
    pub dx:         f32,
    pub dy:         f32,
    pub elapsed_ms: u64,
}

impl Displacement {
    /// Largest single-axis component, the quantity compared against a
    /// displacement threshold.
    pub fn dominant_magnitude(&self) -> f32 {
        self.dx.abs().max(self.dy.abs())
    }

    /// Path-length speed in normalized units per second.
    /// A zero-length time span has no defined speed and reports 0.
    pub fn speed_per_sec(&self) -> f32 {
        if self.elapsed_ms == 0 {
            return 0.0;
        }
        self.dx.hypot(self.dy) / (self.elapsed_ms as f32 / 1000.0)
    }
}

#[derive(Clone, Debug)]
pub struct MotionWindow {
    samples:  VecDeque<MotionSample>,
    capacity: usize,
}

impl MotionWindow {
    /// # Panics
    /// If `capacity < 2`; a displacement needs two samples.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "motion window needs at least two samples");
        MotionWindow {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: MotionSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn clear(&mut self) { self.samples.clear(); }

    pub fn len(&self) -> usize { self.samples.len() }

    pub fn is_empty(&self) -> bool { self.samples.is_empty() }

    pub fn is_full(&self) -> bool { self.samples.len() == self.capacity }


    pub fn oldest(&self) -> Option<&MotionSample> { self.samples.front() }

    pub fn newest(&self) -> Option<&MotionSample> { self.samples.back() }

    /// Newest minus oldest, only once the window is full.
    pub fn displacement(&self) -> Option<Displacement> {
        if !self.is_full() {
            return None;
        }
        let (first, last) = (self.oldest()?, self.newest()?);
        Some(Displacement {
            dx:         last.x - first.x,
            dy:         last.y - first.y,
            elapsed_ms: last.timestamp_ms.saturating_sub(first.timestamp_ms),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn s(x: f32, y: f32, t: u64) -> MotionSample {
        MotionSample { x, y, timestamp_ms: t }
    }

    #[test]
    fn no_displacement_until_full() {
        let mut w = MotionWindow::new(3);
        w.push(s(0.0, 0.0, 0));
        w.push(s(0.1, 0.0, 100));
        assert!(w.displacement().is_none());
        w.push(s(0.2, 0.0, 200));
        assert!(w.is_full());
        assert!(w.displacement().is_some());
    }

    #[test]
    fn oldest_is_evicted_first() {
        let mut w = MotionWindow::new(3);
        for i in 0..5 {
            w.push(s(i as f32, 0.0, i * 100));
        }
        assert_eq!(w.len(), 3);
        assert_eq!(w.oldest().unwrap().x, 2.0);
        assert_eq!(w.newest().unwrap().x, 4.0);
    }

    #[test]
    fn displacement_spans_oldest_to_newest() {
        let mut w = MotionWindow::new(2);
        w.push(s(0.2, 0.6, 1_000));
        w.push(s(0.5, 0.2, 1_400));
        let d = w.displacement().unwrap();
        assert!((d.dx - 0.3).abs() < 1e-6);
        assert!((d.dy + 0.4).abs() < 1e-6);
        assert_eq!(d.elapsed_ms, 400);
        assert!((d.dominant_magnitude() - 0.4).abs() < 1e-6);
        // 0.5 units over 0.4 s
        assert!((d.speed_per_sec() - 1.25).abs() < 1e-4);
    }

    #[test]
    fn zero_span_has_zero_speed() {
        let d = Displacement { dx: 0.3, dy: 0.0, elapsed_ms: 0 };
        assert_eq!(d.speed_per_sec(), 0.0);
    }

    #[test]
    fn clear_empties_window() {
        let mut w = MotionWindow::new(2);
        w.push(s(0.0, 0.0, 0));
        w.clear();
        assert!(w.is_empty());
        assert!(w.oldest().is_none());
    }

    #[test]
    #[should_panic]
    fn capacity_one_is_rejected() {
        let _ = MotionWindow::new(1);
    }
}

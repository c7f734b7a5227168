//! Turns a noisy stream of per-frame symbols into confirmed gesture events.
//!
//! Two rules, applied in order:
//!
//! 1. **Cooldown** — nothing is confirmed within `cooldown_ms` of the last
//!    confirmation.  Symbols arriving during the cooldown are discarded, not
//!    buffered.
//! 2. **Consistency** — the last `consistency_frames` symbols must all be the
//!    same before that symbol is confirmed.
//!
//! A confirmation records its time and empties the consistency buffer.  The
//! caller clears the buffer whenever a frame yields no symbol, so the streak
//! is over consecutive frames.

use std::collections::VecDeque;

use crate::config::DebounceConfig;
use crate::symbol::{GestureEvent, GestureSymbol};

pub struct GestureDebouncer {
    cooldown_ms:       u64,
    consistency:       usize,
    recent:            VecDeque<GestureSymbol>,
    last_confirmed_ms: Option<u64>,
}

impl GestureDebouncer {
    pub fn new(config: &DebounceConfig) -> Self {
        let consistency = config.consistency_frames.max(1);
        GestureDebouncer {
            cooldown_ms: config.cooldown_ms,
            consistency,
            recent: VecDeque::with_capacity(consistency),
            last_confirmed_ms: None,
        }
    }

    pub fn confirm(&mut self, symbol: GestureSymbol, now_ms: u64) -> Option<GestureEvent> {
        if self.in_cooldown(now_ms) {
            return None;
        }

        if self.recent.len() == self.consistency {
            self.recent.pop_front();
        }
        self.recent.push_back(symbol);

        if self.recent.len() < self.consistency || self.recent.iter().any(|s| *s != symbol) {
            return None;
        }

        self.recent.clear();
        self.last_confirmed_ms = Some(now_ms);
        Some(GestureEvent { symbol, confirmed_at_ms: now_ms })
    }

    pub fn in_cooldown(&self, now_ms: u64) -> bool {
        match self.last_confirmed_ms {
            Some(last) => now_ms.saturating_sub(last) < self.cooldown_ms,
            None       => false,
        }
    }

    /// Drop partially accumulated symbols (hand lost, or a frame with no
    /// gesture).
    pub fn clear_pending(&mut self) {
        self.recent.clear();
    }

    pub fn pending(&self) -> usize { self.recent.len() }

    pub fn last_confirmed_ms(&self) -> Option<u64> { self.last_confirmed_ms }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use GestureSymbol::*;

    fn debouncer(cooldown_ms: u64, consistency_frames: usize) -> GestureDebouncer {
        GestureDebouncer::new(&DebounceConfig { cooldown_ms, consistency_frames })
    }

    #[test]
    fn confirms_after_k_identical_outputs() {
        let mut d = debouncer(500, 5);
        for t in 0..4 {
            assert_eq!(d.confirm(SwipeLeft, t * 10), None);
        }
        let ev = d.confirm(SwipeLeft, 40).unwrap();
        assert_eq!(ev, GestureEvent { symbol: SwipeLeft, confirmed_at_ms: 40 });
        assert_eq!(d.pending(), 0);
        assert_eq!(d.last_confirmed_ms(), Some(40));
    }

    #[test]
    fn burst_within_cooldown_confirms_at_most_once() {
        let mut d = debouncer(500, 5);
        let confirmed = (0..40u64)
            .filter_map(|i| d.confirm(Pinch, i * 10))
            .count();
        // 40 outputs spread over 390 ms
        assert_eq!(confirmed, 1);
    }

    #[test]
    fn one_frame_noise_resets_streak() {
        let mut d = debouncer(0, 3);
        assert_eq!(d.confirm(SwipeUp, 0), None);
        assert_eq!(d.confirm(SwipeUp, 1), None);
        assert_eq!(d.confirm(SwipeDown, 2), None);
        assert_eq!(d.confirm(SwipeUp, 3), None);
        assert_eq!(d.confirm(SwipeUp, 4), None);
        assert!(d.confirm(SwipeUp, 5).is_some());
    }

    #[test]
    fn alternating_symbols_never_confirm() {
        let mut d = debouncer(0, 2);
        for t in 0..20 {
            let s = if t % 2 == 0 { SwipeLeft } else { SwipeRight };
            assert_eq!(d.confirm(s, t), None);
        }
    }

    #[test]
    fn cooldown_expiry_allows_next_gesture() {
        let mut d = debouncer(500, 1);
        assert!(d.confirm(SwipeLeft, 1_000).is_some());
        assert!(d.in_cooldown(1_499));
        assert_eq!(d.confirm(SwipeLeft, 1_499), None);
        assert!(!d.in_cooldown(1_500));
        assert!(d.confirm(SwipeLeft, 1_500).is_some());
    }

    #[test]
    fn symbols_during_cooldown_are_not_buffered() {
        let mut d = debouncer(500, 3);
        for t in 0..3 {
            d.confirm(Pinch, t);
        }
        assert_eq!(d.last_confirmed_ms(), Some(2));
        for t in 3..100 {
            assert_eq!(d.confirm(Pinch, t), None);
        }
        assert_eq!(d.pending(), 0);
    }

    #[test]
    fn clear_pending_drops_partial_streak() {
        let mut d = debouncer(0, 3);
        d.confirm(SwipeRight, 0);
        d.confirm(SwipeRight, 1);
        d.clear_pending();
        assert_eq!(d.confirm(SwipeRight, 2), None);
        assert_eq!(d.pending(), 1);
    }

    #[test]
    fn zero_consistency_treated_as_one() {
        let mut d = debouncer(0, 0);
        assert!(d.confirm(SwipeDown, 0).is_some());
    }
}

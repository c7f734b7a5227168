//! Classifier and debouncer chained behind a single ingestion call.

use tracing::{debug, info};

use hand_landmarks::LandmarkFrame;

use crate::classifier::GestureClassifier;
use crate::config::{DebounceConfig, GestureConfig};
use crate::debouncer::GestureDebouncer;
use crate::symbol::{GestureEvent, GestureSymbol};

pub struct GesturePipeline {
    classifier:   GestureClassifier,
    debouncer:    GestureDebouncer,
    hand_present: bool,
    last_symbol:  Option<GestureSymbol>,
}

impl GesturePipeline {
    pub fn new(gesture: GestureConfig, debounce: &DebounceConfig) -> Self {
        GesturePipeline {
            classifier:   GestureClassifier::new(gesture),
            debouncer:    GestureDebouncer::new(debounce),
            hand_present: false,
            last_symbol:  None,
        }
    }

    /// Feed one detection cycle.  `None` means no hand was found.
    pub fn ingest(&mut self, frame: Option<&LandmarkFrame>, now_ms: u64) -> Option<GestureEvent> {
        let Some(frame) = frame else {
            self.hand_lost();
            return None;
        };
        if !self.hand_present {
            self.hand_present = true;
            info!("hand found");
        }

        let symbol = self.classifier.classify(frame);
        self.last_symbol = symbol;
        let Some(symbol) = symbol else {
            // A still frame breaks the streak.
            self.debouncer.clear_pending();
            return None;
        };
        let event = self.debouncer.confirm(symbol, now_ms)?;

        // The motion that produced this gesture must not seed the next one.
        self.classifier.settle(event.symbol);
        debug!("gesture confirmed: {} at {}ms", event.symbol, event.confirmed_at_ms);
        Some(event)
    }

    fn hand_lost(&mut self) {
        if self.hand_present {
            self.hand_present = false;
            info!("hand lost");
        }
        self.classifier.hand_lost();
        self.debouncer.clear_pending();
        self.last_symbol = None;
    }

    pub fn hand_present(&self) -> bool { self.hand_present }

    /// Raw classifier output for the most recent frame, before debouncing.
    pub fn last_symbol(&self) -> Option<GestureSymbol> { self.last_symbol }

    pub fn classifier(&self) -> &GestureClassifier { &self.classifier }

    pub fn debouncer(&self) -> &GestureDebouncer { &self.debouncer }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

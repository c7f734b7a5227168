//! Classifier and debouncer thresholds.
//!
//! Distances are in normalized image units (the frame is 1.0 wide and 1.0
//! tall), speeds in normalized units per second, times in milliseconds.

use serde::{Deserialize, Serialize};

use hand_landmarks::index;

/// Which landmark's motion is used for swipe detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedLandmark {
    /// Palm base; steadier than a fingertip.
    #[default]
    Wrist,
    IndexTip,
}

impl TrackedLandmark {
    pub fn index(self) -> usize {
        match self {
            TrackedLandmark::Wrist    => index::WRIST,
            TrackedLandmark::IndexTip => index::INDEX_TIP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Thumb-to-index distance strictly below this is a pinch.
    pub pinch_threshold:        f32,
    /// Minimum single-axis travel across the motion window for a swipe.
    pub displacement_threshold: f32,
    /// Minimum speed across the motion window; 0 disables the gate.
    pub min_swipe_speed:        f32,
    /// Samples in the motion window.
    pub window_size:            usize,
    pub tracked_landmark:       TrackedLandmark,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            pinch_threshold:        0.05,
            displacement_threshold: 0.06,
            min_swipe_speed:        0.1,
            window_size:            5,
            tracked_landmark:       TrackedLandmark::Wrist,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Minimum spacing between two confirmed gestures.
    pub cooldown_ms:        u64,
    /// Consecutive identical classifier outputs required to confirm.
    pub consistency_frames: usize,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        DebounceConfig {
            cooldown_ms:        500,
            consistency_frames: 5,
        }
    }
}

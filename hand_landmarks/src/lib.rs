//! # hand_landmarks
//!
//! The hand skeleton as a detector reports it: 21 anatomically indexed 2D
//! points per detection cycle, in normalized image coordinates (x right,
//! y down, both nominally 0.0–1.0).
//!
//! ```text
//!            8   12  16  20        tips
//!            |   |   |   |
//!        4   7   11  15  19
//!        |   |   |   |   |
//!        3   6   10  14  18
//!         \  |   |   |   |
//!          2 5---9---13--17
//!           \ \  |  /   /
//!            1 \ | /   /
//!             \ \|/   /
//!              ---0---            wrist / palm base
//! ```
//!
//! A [`LandmarkFrame`] can only be built from a complete, finite set of
//! points, so everything downstream works on actionable frames.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod window;

pub use window::{Displacement, MotionSample, MotionWindow};

/// Number of points in one hand skeleton.
pub const LANDMARK_COUNT: usize = 21;

/// Anatomical landmark indices.
pub mod index {
    pub const WRIST:      usize = 0;
    pub const THUMB_CMC:  usize = 1;
    pub const THUMB_MCP:  usize = 2;
    pub const THUMB_IP:   usize = 3;
    pub const THUMB_TIP:  usize = 4;
    pub const INDEX_MCP:  usize = 5;
    pub const INDEX_PIP:  usize = 6;
    pub const INDEX_DIP:  usize = 7;
    pub const INDEX_TIP:  usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP:   usize = 13;
    pub const RING_PIP:   usize = 14;
    pub const RING_DIP:   usize = 15;
    pub const RING_TIP:   usize = 16;
    pub const PINKY_MCP:  usize = 17;
    pub const PINKY_PIP:  usize = 18;
    pub const PINKY_DIP:  usize = 19;
    pub const PINKY_TIP:  usize = 20;
}

/// Bones of the hand wireframe, as (from, to) landmark pairs.
pub const HAND_CONNECTIONS: [(usize, usize); 20] = [
    (0, 1),  (1, 2),   (2, 3),   (3, 4),    // thumb
    (0, 5),  (5, 6),   (6, 7),   (7, 8),    // index
    (0, 9),  (9, 10),  (10, 11), (11, 12),  // middle
    (0, 13), (13, 14), (14, 15), (15, 16),  // ring
    (0, 17), (17, 18), (18, 19), (19, 20),  // pinky
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One tracked point of the hand.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Per-point detector score, when the model provides one.
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, confidence: None }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Euclidean distance in the x/y plane.
    pub fn distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.confidence.map_or(true, f32::is_finite)
    }
}

impl From<[f32; 2]> for Landmark {
    fn from([x, y]: [f32; 2]) -> Self {
        Landmark::new(x, y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameError
// ════════════════════════════════════════════════════════════════════════════

/// Why a detector output could not become a [`LandmarkFrame`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("expected 21 landmarks, got {got}")]
    WrongCount { got: usize },

    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkFrame
// ════════════════════════════════════════════════════════════════════════════

/// One hand skeleton from one detection cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkFrame {
    points:       [Landmark; LANDMARK_COUNT],
    timestamp_ms: u64,
}

impl LandmarkFrame {
    /// Validate raw detector points and stamp them with the cycle time.
    pub fn new(points: Vec<Landmark>, timestamp_ms: u64) -> Result<Self, FrameError> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(FrameError::NonFinite { index });
        }
        let got = points.len();
        let points: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| FrameError::WrongCount { got })?;
        Ok(LandmarkFrame { points, timestamp_ms })
    }

    pub fn timestamp_ms(&self) -> u64 { self.timestamp_ms }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] { &self.points }

    /// The landmark at an anatomical index (see [`index`]).
    ///
    /// # Panics
    /// If `i >= LANDMARK_COUNT`.
    pub fn point(&self, i: usize) -> Landmark { self.points[i] }

    pub fn wrist(&self)     -> Landmark { self.points[index::WRIST] }
    pub fn thumb_tip(&self) -> Landmark { self.points[index::THUMB_TIP] }
    pub fn index_tip(&self) -> Landmark { self.points[index::INDEX_TIP] }

    /// Distance between thumb tip and index fingertip.
    pub fn pinch_distance(&self) -> f32 {
        self.thumb_tip().distance(&self.index_tip())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

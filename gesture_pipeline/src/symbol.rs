//! Gesture vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A discrete gesture recognised from hand motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureSymbol {
    /// Tracked landmark moved toward the image's left edge.
    SwipeLeft,
    SwipeRight,
    /// Toward the top of the image (y decreasing).
    SwipeUp,
    SwipeDown,
    /// Thumb tip and index fingertip brought together.
    Pinch,
}

impl GestureSymbol {
    pub const ALL: [GestureSymbol; 5] = [
        GestureSymbol::SwipeLeft,
        GestureSymbol::SwipeRight,
        GestureSymbol::SwipeUp,
        GestureSymbol::SwipeDown,
        GestureSymbol::Pinch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SwipeLeft  => "swipe-left",
            Self::SwipeRight => "swipe-right",
            Self::SwipeUp    => "swipe-up",
            Self::SwipeDown  => "swipe-down",
            Self::Pinch      => "pinch",
        }
    }
}

impl fmt::Display for GestureSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A gesture the debouncer has let through, stamped with the confirmation
/// time (milliseconds on the session clock).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub symbol:          GestureSymbol,
    pub confirmed_at_ms: u64,
}

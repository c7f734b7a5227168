//! # gesture_pipeline
//!
//! Hand landmark frames in, debounced gesture events out.
//!
//! ```text
//! LandmarkFrame ─► GestureClassifier ─► GestureSymbol ─► GestureDebouncer ─► GestureEvent
//!      │                  ▲
//!      └─ no hand ────────┴── clears motion window and pending symbols
//! ```
//!
//! ## Gestures
//!
//! | Symbol | Recognised from |
//! |---|---|
//! | `SwipeLeft` / `SwipeRight` | horizontal-dominant travel of the tracked landmark |
//! | `SwipeUp` / `SwipeDown` | vertical-dominant travel (image y grows downward) |
//! | `Pinch` | thumb tip within `pinch_threshold` of the index fingertip |

pub mod classifier;
pub mod config;
pub mod debouncer;
pub mod pipeline;
pub mod symbol;

pub use classifier::GestureClassifier;
pub use config::{DebounceConfig, GestureConfig, TrackedLandmark};
pub use debouncer::GestureDebouncer;
pub use pipeline::GesturePipeline;
pub use symbol::{GestureEvent, GestureSymbol};

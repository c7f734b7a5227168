//! # leap_showcase
//!
//! Gesture-controlled product showcase.  A tracked hand browses a small
//! catalogue and inspects the current product; when nobody is around the
//! showcase plays itself.
//!
//! ## Modes
//!
//! | Mode | Gesture | Action |
//! |---|---|---|
//! | Auto | any | Stop auto-advance, switch to Selection |
//! | Selection | Swipe left / right | Next / previous product |
//! | Selection | Swipe up or Pinch | Reset the view, switch to Inspection |
//! | Inspection | Swipe left / right | Turn the product 90° |
//! | Inspection | Swipe up / down | Zoom in / out |
//! | Inspection | Pinch | Back to Selection |
//!
//! After the idle timeout without a confirmed gesture the showcase returns
//! to the first product and Auto mode.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: mouse and keyboard drive a synthetic hand.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse over the camera panel | Move the hand |
//! | Arrow keys | Glide the hand (a clean swipe) |
//! | Left button / `P` (hold) | Pinch |
//! | `H` | Hide / show the hand |
//! | `Q` / `Escape` | Quit |

pub mod app;
pub mod landmark_source;
pub mod view;
pub mod visualizer;

//! # showcase_core
//!
//! Drives a product showcase from confirmed hand gestures.
//!
//! ```text
//! LandmarkSource ─► Session ─► GesturePipeline ─► InteractionModeController
//!                      │                                    │ Outcome
//!                      │                                    ▼
//!                      └──── Notifier ◄──────────── ActionDispatcher ─► Renderable / Navigation
//! ```
//!
//! ## Modes
//!
//! | Mode | Gesture | Effect |
//! |---|---|---|
//! | Auto | any | stop the page cadence, enter Selection |
//! | Selection | SwipeLeft / SwipeRight | next / previous page, clamped |
//! | Selection | SwipeUp / Pinch | reset the object view, enter Inspection |
//! | Inspection | SwipeLeft / SwipeRight | rotate to a fixed azimuth |
//! | Inspection | SwipeUp / SwipeDown | zoom in / out within the distance bounds |
//! | Inspection | Pinch | back to Selection |
//!
//! Without a confirmed gesture for `idle_timeout_ms`, Selection and
//! Inspection fall back to Auto at page 0.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use showcase_core::{ActionDispatcher, MonotonicClock, Session, ShowcaseConfig};
//! # use showcase_core::{Navigation, Renderable};
//! # struct View;
//! # impl Renderable for View {
//! #     fn rotate(&mut self, _: f32) -> anyhow::Result<()> { Ok(()) }
//! #     fn zoom(&mut self, _: f32) -> anyhow::Result<()> { Ok(()) }
//! #     fn reset_view(&mut self) -> anyhow::Result<()> { Ok(()) }
//! # }
//! # struct Pages;
//! # impl Navigation for Pages {
//! #     fn set_page(&mut self, _: usize) -> anyhow::Result<()> { Ok(()) }
//! #     fn page_count(&self) -> usize { 3 }
//! # }
//!
//! let config = ShowcaseConfig::load_or_default(None)?;
//! let dispatcher = ActionDispatcher::new(Box::new(View), Box::new(Pages));
//! let mut session = Session::spawn(config, dispatcher, Arc::new(MonotonicClock::new()));
//!
//! let events = session.subscribe();
//! session.mark_ready();
//! session.on_landmark_frame(None);
//! # drop(events);
//! session.shutdown();
//! # Ok::<(), showcase_core::ConfigError>(())
//! ```

pub mod cadence;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod mode;
pub mod notify;
pub mod session;
pub mod source;
pub mod trace;

pub use cadence::{spawn_ticker, CadenceHandle, CadenceScheduler};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{InitialMode, ModeConfig, ShowcaseConfig};
pub use dispatch::{ActionDispatcher, Navigation, Renderable};
pub use error::ConfigError;
pub use mode::{Action, ControllerState, InteractionMode, InteractionModeController, Outcome};
pub use notify::{Notification, Notifier};
pub use session::{Session, SessionHandle, SessionMessage, SessionSnapshot};
pub use source::{spawn_landmark_source, LandmarkSink, LandmarkSource, SourceHandle};
pub use trace::{parse_trace, replay, Replay, ReplayEntry, TraceRecord};

/// Install the `tracing` subscriber used by the binaries: `RUST_LOG` if set,
/// otherwise `default_filter`.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

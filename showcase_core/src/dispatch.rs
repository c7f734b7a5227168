//! Controller actions → collaborator calls.

use tracing::{trace, warn};

use crate::mode::Action;

/// The 3D view of the current page's object.
pub trait Renderable: Send {
    /// Turn the object to `angle_deg` azimuth.
    fn rotate(&mut self, angle_deg: f32) -> anyhow::Result<()>;
    /// Multiply magnification by `factor`.
    fn zoom(&mut self, factor: f32) -> anyhow::Result<()>;
    fn reset_view(&mut self) -> anyhow::Result<()>;
}

/// Page/section navigation.
pub trait Navigation: Send {
    fn set_page(&mut self, index: usize) -> anyhow::Result<()>;
    fn page_count(&self) -> usize;
}

pub struct ActionDispatcher {
    renderer:   Box<dyn Renderable>,
    navigation: Box<dyn Navigation>,
}

impl ActionDispatcher {
    pub fn new(renderer: Box<dyn Renderable>, navigation: Box<dyn Navigation>) -> Self {
        ActionDispatcher { renderer, navigation }
    }

    pub fn page_count(&self) -> usize {
        self.navigation.page_count()
    }

    /// Forward one action.  Returns `false` if the collaborator failed; the
    /// failure is logged and goes no further.
    pub fn dispatch(&mut self, action: Action) -> bool {
        trace!("dispatch {}", action);
        let result = match action {
            Action::SetPage(i) => self.navigation.set_page(i),
            Action::Rotate(a)  => self.renderer.rotate(a),
            Action::Zoom(f)    => self.renderer.zoom(f),
            Action::ResetView  => self.renderer.reset_view(),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("{} failed: {:#}", action, e);
                false
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Recording collaborators — test doubles shared with the session tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

    pub(crate) struct RecordingView {
        pub(crate) log:  CallLog,
        pub(crate) fail: bool,
    }

    impl RecordingView {
        fn record(&self, call: String) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(call);
            if self.fail {
                anyhow::bail!("renderer offline");
            }
            Ok(())
        }
    }

    impl Renderable for RecordingView {
        fn rotate(&mut self, angle_deg: f32) -> anyhow::Result<()> {
            self.record(format!("rotate {}", angle_deg))
        }
        fn zoom(&mut self, factor: f32) -> anyhow::Result<()> {
            self.record(format!("zoom {:.4}", factor))
        }
        fn reset_view(&mut self) -> anyhow::Result<()> {
            self.record("reset".to_string())
        }
    }

    pub(crate) struct RecordingPages {
        pub(crate) log:   CallLog,
        pub(crate) count: usize,
    }

    impl Navigation for RecordingPages {
        fn set_page(&mut self, index: usize) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(format!("page {}", index));
            Ok(())
        }
        fn page_count(&self) -> usize { self.count }
    }

    /// Dispatcher over recording collaborators sharing one call log.
    pub(crate) fn recording_dispatcher(pages: usize, renderer_fails: bool) -> (ActionDispatcher, CallLog) {
        let log = CallLog::default();
        let view = RecordingView { log: Arc::clone(&log), fail: renderer_fails };
        let nav = RecordingPages { log: Arc::clone(&log), count: pages };
        (ActionDispatcher::new(Box::new(view), Box::new(nav)), log)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

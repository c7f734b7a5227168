//! Recorded landmark traces and headless replay.
//!
//! A trace is JSON lines, one detection cycle per line:
//!
//! ```text
//! {"t": 0,   "points": [[0.52, 0.61], [0.55, 0.58], ...]}   21 points
//! {"t": 33,  "points": null}                               no hand
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.  Replay runs the
//! whole session on a virtual clock: frames at their recorded times, idle
//! checks and auto-advance ticks at the times they would have fired.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::info;

use hand_landmarks::Landmark;

use crate::cadence::{CadenceHandle, CadenceScheduler};
use crate::clock::{Clock, ManualClock};
use crate::config::ShowcaseConfig;
use crate::dispatch::{ActionDispatcher, Navigation, Renderable};
use crate::notify::Notification;
use crate::session::{Session, SessionMessage, SessionSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Milliseconds since the trace started.
    pub t:      u64,
    #[serde(default)]
    pub points: Option<Vec<[f32; 2]>>,
}

impl TraceRecord {
    pub fn landmarks(&self) -> Option<Vec<Landmark>> {
        self.points
            .as_ref()
            .map(|pts| pts.iter().copied().map(Landmark::from).collect())
    }
}

/// Read a JSON-lines trace.  Timestamps must not go backwards.
pub fn parse_trace<R: BufRead>(reader: R) -> anyhow::Result<Vec<TraceRecord>> {
    let mut records: Vec<TraceRecord> = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading trace line {}", n + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let record: TraceRecord = serde_json::from_str(line)
            .with_context(|| format!("trace line {}", n + 1))?;
        if let Some(prev) = records.last() {
            if record.t < prev.t {
                bail!("trace line {}: t={} goes back in time (previous {})", n + 1, record.t, prev.t);
            }
        }
        records.push(record);
    }
    Ok(records)
}

// ════════════════════════════════════════════════════════════════════════════
// Replay
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayEntry {
    pub at_ms:        u64,
    pub notification: Notification,
}

pub struct Replay {
    pub entries: Vec<ReplayEntry>,
    pub final_state: SessionSnapshot,
}

/// Run `records` through a fresh session and collect its notifications.
///
/// The session is marked ready at the first record's time; simulation
/// continues `tail_ms` past the last record so idle reversion and the auto
/// cadence can show up.
pub fn replay(records: &[TraceRecord], config: &ShowcaseConfig, page_count: usize, tail_ms: u64) -> Replay {
    let start = records.first().map_or(0, |r| r.t);
    let end = records.last().map_or(start, |r| r.t).saturating_add(tail_ms);

    let clock = ManualClock::new(start);
    let timers = VirtualTimers::default();
    let scheduler = VirtualCadence { clock: clock.clone(), timers: timers.clone() };
    let dispatcher = ActionDispatcher::new(
        Box::new(LoggedRenderer),
        Box::new(LoggedPages { count: page_count }),
    );

    let mut session = Session::new(config, dispatcher, Arc::new(clock.clone()), Box::new(scheduler));
    let rx = session.subscribe();
    let mut entries = Vec::new();

    session.handle(SessionMessage::Ready);
    collect(&rx, clock.now_ms(), &mut entries);

    let idle_every = config.mode.idle_check_ms.max(1);
    let mut next_idle = start + idle_every;
    let mut frames = records.iter().peekable();

    loop {
        let frame_at = frames.peek().map(|r| r.t);
        let tick = timers.next_due();
        let next = [frame_at, tick.map(|(at, _)| at), Some(next_idle)]
            .into_iter()
            .flatten()
            .min();
        let Some(now) = next.filter(|t| *t <= end) else {
            break;
        };
        clock.set(now);

        // same instant: frames, then cadence, then idle check
        let msg = if frame_at == Some(now) {
            let record = frames.next().map(TraceRecord::landmarks);
            SessionMessage::Detection { points: record.flatten() }
        } else if let Some((_, generation)) = tick.filter(|(at, _)| *at == now) {
            timers.fired(generation);
            SessionMessage::CadenceTick { generation }
        } else {
            next_idle += idle_every;
            SessionMessage::IdleCheck
        };
        session.handle(msg);
        collect(&rx, now, &mut entries);
    }

    session.handle(SessionMessage::Shutdown);
    Replay { entries, final_state: session.snapshot() }
}

fn collect(rx: &Receiver<Notification>, at_ms: u64, out: &mut Vec<ReplayEntry>) {
    out.extend(rx.try_iter().map(|notification| ReplayEntry { at_ms, notification }));
}

// ── virtual cadence ──────────────────────────────────────────────────────

struct VirtualTimer {
    generation: u64,
    every_ms:   u64,
    next_at:    u64,
    cancel_rx:  Receiver<()>,
}

#[derive(Clone, Default)]
struct VirtualTimers(Arc<Mutex<Vec<VirtualTimer>>>);

impl VirtualTimers {
    /// Earliest pending tick among live timers, as (time, generation).
    fn next_due(&self) -> Option<(u64, u64)> {
        let mut timers = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        timers.retain(|t| matches!(t.cancel_rx.try_recv(), Err(TryRecvError::Empty)));
        timers.iter().map(|t| (t.next_at, t.generation)).min()
    }

    fn fired(&self, generation: u64) {
        let mut timers = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(t) = timers.iter_mut().find(|t| t.generation == generation) {
            t.next_at += t.every_ms;
        }
    }
}

struct VirtualCadence {
    clock:  ManualClock,
    timers: VirtualTimers,
}

impl CadenceScheduler for VirtualCadence {
    fn start(&mut self, every: Duration, generation: u64) -> CadenceHandle {
        let (cancel_tx, cancel_rx) = mpsc::channel();
        let every_ms = (every.as_millis() as u64).max(1);
        self.timers.0.lock().unwrap_or_else(PoisonError::into_inner).push(VirtualTimer {
            generation,
            every_ms,
            next_at: self.clock.now_ms() + every_ms,
            cancel_rx,
        });
        CadenceHandle::new(generation, cancel_tx)
    }
}

// ── collaborators that only log ──────────────────────────────────────────

struct LoggedRenderer;

impl Renderable for LoggedRenderer {
    fn rotate(&mut self, angle_deg: f32) -> anyhow::Result<()> {
        info!("view: rotate to {:.0}°", angle_deg);
        Ok(())
    }
    fn zoom(&mut self, factor: f32) -> anyhow::Result<()> {
        info!("view: zoom ×{:.3}", factor);
        Ok(())
    }
    fn reset_view(&mut self) -> anyhow::Result<()> {
        info!("view: reset");
        Ok(())
    }
}

struct LoggedPages {
    count: usize,
}

impl Navigation for LoggedPages {
    fn set_page(&mut self, index: usize) -> anyhow::Result<()> {
        info!("pages: show {}/{}", index + 1, self.count);
        Ok(())
    }
    fn page_count(&self) -> usize { self.count }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

//! Landmark sources: LeapMotion hardware and a mouse/keyboard simulator.
//!
//! Both push 21-point hands into the session through a [`LandmarkSink`] and
//! publish the same points to a [`HandMonitor`] so the visualizer can draw
//! the wireframe.  The session can't tell them apart.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use hand_landmarks::{index, Landmark, LANDMARK_COUNT};
use showcase_core::{LandmarkSink, LandmarkSource};

// ════════════════════════════════════════════════════════════════════════════
// HandMonitor — latest detection, for drawing
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Default)]
pub struct HandMonitor {
    latest: Arc<Mutex<Option<Vec<Landmark>>>>,
}

impl HandMonitor {
    pub fn update(&self, points: Option<&[Landmark]>) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = points.map(<[Landmark]>::to_vec);
    }

    pub fn latest(&self) -> Option<Vec<Landmark>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

fn deliver(sink: &LandmarkSink, monitor: &HandMonitor, points: Option<Vec<Landmark>>) -> bool {
    monitor.update(points.as_deref());
    sink.emit(points)
}

// ════════════════════════════════════════════════════════════════════════════
// Synthetic hand
// ════════════════════════════════════════════════════════════════════════════

/// Finger base offset from the palm centre and per-joint step toward the tip.
const FINGERS: [((f32, f32), (f32, f32)); 4] = [
    ((-0.030,  0.000), (-0.005, -0.035)),  // index
    (( 0.000, -0.005), ( 0.000, -0.040)),  // middle
    (( 0.030,  0.000), ( 0.005, -0.035)),  // ring
    (( 0.055,  0.020), ( 0.010, -0.028)),  // pinky
];

/// An upright open hand with its palm centre at (cx, cy).  With `pinch`,
/// the thumb tip touches the index fingertip.
pub fn synthesize_hand(cx: f32, cy: f32, pinch: bool) -> Vec<Landmark> {
    let mut pts = vec![Landmark::new(cx, cy); LANDMARK_COUNT];
    pts[index::WRIST] = Landmark::new(cx, cy + 0.15);

    for j in 0..4 {
        let k = j as f32;
        pts[index::THUMB_CMC + j] = Landmark::new(cx - 0.04 - 0.02 * k, cy + 0.11 - 0.04 * k);
    }
    for (f, &((ox, oy), (sx, sy))) in FINGERS.iter().enumerate() {
        for j in 0..4 {
            let k = j as f32;
            pts[index::INDEX_MCP + f * 4 + j] = Landmark::new(cx + ox + sx * k, cy + oy + sy * k);
        }
    }

    if pinch {
        let tip = pts[index::INDEX_TIP];
        pts[index::THUMB_TIP] = Landmark::new(tip.x - 0.01, tip.y + 0.01);
        pts[index::THUMB_IP] = Landmark::new(tip.x - 0.03, tip.y + 0.04);
    }
    pts
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource — driven by the visualizer window
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position, normalized to the camera panel.
    Pointer { x: f32, y: f32 },
    /// Move the hand smoothly by (dx, dy) over the next frames.
    Glide { dx: f32, dy: f32 },
    Pinch(bool),
    ToggleHand,
}

/// Frames a glide is spread over; enough for the window and the
/// consistency check to fill.
const GLIDE_FRAMES: u32 = 12;

pub struct SimLandmarkSource {
    pub rx:     Receiver<SimInput>,
    pub period: Duration,
    pub monitor: HandMonitor,
}

#[derive(Debug, Clone, PartialEq)]
struct SimHand {
    x:       f32,
    y:       f32,
    pinch:   bool,
    visible: bool,
    /// Remaining glide: per-frame step and frames left.
    glide:   Option<((f32, f32), u32)>,
}

impl Default for SimHand {
    fn default() -> Self {
        SimHand { x: 0.5, y: 0.5, pinch: false, visible: true, glide: None }
    }
}

impl SimHand {
    fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer { x, y } if self.glide.is_none() => {
                self.x = x;
                self.y = y;
            }
            SimInput::Pointer { .. } => {}
            SimInput::Glide { dx, dy } => {
                let n = GLIDE_FRAMES as f32;
                self.glide = Some(((dx / n, dy / n), GLIDE_FRAMES));
            }
            SimInput::Pinch(on) => self.pinch = on,
            SimInput::ToggleHand => {
                self.visible = !self.visible;
                info!("simulated hand {}", if self.visible { "shown" } else { "hidden" });
            }
        }
    }

    /// Detection for this cycle.
    fn step(&mut self) -> Option<Vec<Landmark>> {
        if let Some(((sx, sy), left)) = self.glide {
            self.x += sx;
            self.y += sy;
            self.glide = (left > 1).then_some(((sx, sy), left - 1));
        }
        self.visible.then(|| synthesize_hand(self.x, self.y, self.pinch))
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, sink: LandmarkSink, stop: Arc<AtomicBool>) {
        let mut hand = SimHand::default();
        let mut next = Instant::now() + self.period;

        while !stop.load(Ordering::SeqCst) {
            let wait = next.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(wait) {
                Ok(input) => {
                    hand.apply(input);
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            next += self.period;
            if !deliver(&sink, &self.monitor, hand.step()) {
                break;
            }
        }
        debug!("simulated landmark source stopped");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmarks from a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// The first tracked hand is projected onto the device's x/y plane: x in
/// [-200, 200] mm and height in [100, 500] mm map onto the unit square.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource {
    pub monitor: HandMonitor,
}

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, sink: LandmarkSink, stop: Arc<AtomicBool>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("failed to create LeapC connection: {:?}", e);
                return;
            }
        };
        if let Err(e) = connection.open() {
            tracing::error!("failed to open LeapMotion device: {:?}", e);
            return;
        }
        info!("LeapMotion connected");

        while !stop.load(Ordering::SeqCst) {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };
            if let Event::Tracking(frame) = msg.event() {
                let points = frame.hands().next().map(|hand| {
                    let mut pts = Vec::with_capacity(LANDMARK_COUNT);
                    let palm = hand.palm().position();
                    pts.push(project(palm.x, palm.y));
                    for digit in hand.digits() {
                        for joint in [
                            digit.proximal().prev_joint(),
                            digit.intermediate().prev_joint(),
                            digit.distal().prev_joint(),
                            digit.distal().next_joint(),
                        ] {
                            pts.push(project(joint.x, joint.y));
                        }
                    }
                    pts
                });
                if !deliver(&sink, &self.monitor, points) {
                    break;
                }
            }
        }
        debug!("LeapMotion source stopped");
    }
}

#[cfg(feature = "leap")]
fn project(x_mm: f32, height_mm: f32) -> Landmark {
    Landmark::new((x_mm + 200.0) / 400.0, (500.0 - height_mm) / 400.0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

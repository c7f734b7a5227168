//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  MODE: SELECTION                                    gesture: <-      │
//! ├──────────────────────┬───────────────────────────────────────────────┤
//! │  camera panel        │  product title / tagline / price              │
//! │  (hand wireframe)    │                                               │
//! │                      │          ┌──────┐                             │
//! │                      │          │object│  rotation + distance        │
//! │                      │          └──────┘                             │
//! │                      │  ● ○ ○   page dots                            │
//! ├──────────────────────┴───────────────────────────────────────────────┤
//! │  status bar / key legend                                             │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;

use anyhow::anyhow;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use gesture_pipeline::GestureSymbol;
use hand_landmarks::{Landmark, HAND_CONNECTIONS, index};
use showcase_core::{InteractionMode, SessionSnapshot};

use crate::landmark_source::SimInput;
use crate::view::{Product, ProductShape, ViewState};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:    usize = 1100;
pub const WIN_H:    usize = 560;
const HEADER_H:     usize = 44;
const CAM_X:        usize = 20;
const CAM_Y:        usize = HEADER_H + 20;
const CAM_W:        usize = 400;
const CAM_H:        usize = 300;
const STAGE_X:      usize = CAM_X + CAM_W + 30;
const STAGE_W:      usize = WIN_W - STAGE_X - 20;
const STAGE_H:      usize = STATUS_Y - CAM_Y - 20;
const STATUS_Y:     usize = WIN_H - 56;
const BG_COLOR:     u32   = 0xFF1A1A2E;
const PANEL_BG:     u32   = 0xFF16213E;
const TEXT_BG:      u32   = 0xFF0F3460;
const BONE_COLOR:   u32   = 0xFF7FDBFF;
const JOINT_COLOR:  u32   = 0xFFFFFFFF;
const PINCH_COLOR:  u32   = 0xFFFFD700;  // gold
const TEXT_COLOR:   u32   = 0xFFEEEEEE;
const DIM_TEXT:     u32   = 0xFF888888;

fn mode_color(mode: InteractionMode) -> u32 {
    match mode {
        InteractionMode::Auto       => 0xFF3D9970,
        InteractionMode::Selection  => 0xFF0074D9,
        InteractionMode::Inspection => 0xFFB10DC9,
    }
}

fn gesture_glyph(symbol: GestureSymbol) -> &'static str {
    match symbol {
        GestureSymbol::SwipeLeft  => "<- swipe left",
        GestureSymbol::SwipeRight => "-> swipe right",
        GestureSymbol::SwipeUp    => "^ swipe up",
        GestureSymbol::SwipeDown  => "v swipe down",
        GestureSymbol::Pinch      => "() pinch",
    }
}

/// Everything drawn in one frame.
pub struct Scene<'a> {
    pub session: &'a SessionSnapshot,
    pub view:    &'a ViewState,
    pub product: &'a Product,
    pub hand:    Option<&'a [Landmark]>,
    /// Last confirmed gesture and how visible its label still is (0–1).
    pub gesture: Option<(GestureSymbol, f32)>,
    pub status:  &'a str,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    buf:        Vec<u32>,
    sim_tx:     Sender<SimInput>,
    last_mouse: Option<(f32, f32)>,
    pinching:   bool,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> anyhow::Result<Self> {
        let mut window = Window::new(
            "Gesture Showcase",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("cannot open window: {}", e))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            last_mouse: None,
            pinching: false,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll mouse and keyboard and forward them to the simulated hand.
    /// Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        if one_shot(Key::Q) || one_shot(Key::Escape) {
            return false;
        }

        let mut inputs = Vec::new();
        if one_shot(Key::H) {
            inputs.push(SimInput::ToggleHand);
        }
        for (key, dx, dy) in [
            (Key::Left,  -0.3,  0.0),
            (Key::Right,  0.3,  0.0),
            (Key::Up,     0.0, -0.3),
            (Key::Down,   0.0,  0.3),
        ] {
            if one_shot(key) {
                inputs.push(SimInput::Glide { dx, dy });
            }
        }

        // Pointer inside the camera panel drives the palm; only movement is sent.
        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Discard) {
            let inside = (mx as usize) >= CAM_X && (mx as usize) < CAM_X + CAM_W
                && (my as usize) >= CAM_Y && (my as usize) < CAM_Y + CAM_H;
            if inside && self.last_mouse != Some((mx, my)) {
                self.last_mouse = Some((mx, my));
                inputs.push(SimInput::Pointer {
                    x: (mx - CAM_X as f32) / CAM_W as f32,
                    y: (my - CAM_Y as f32) / CAM_H as f32,
                });
            }
        }

        let pinch = self.window.get_mouse_down(MouseButton::Left) || self.window.is_key_down(Key::P);
        if pinch != self.pinching {
            self.pinching = pinch;
            inputs.push(SimInput::Pinch(pinch));
        }

        for input in inputs {
            let _ = self.sim_tx.send(input);
        }
        true
    }

    /// Render one frame.
    pub fn render(&mut self, scene: &Scene<'_>) {
        // Clear
        self.buf.fill(BG_COLOR);

        self.draw_header(scene);

        // ── Camera panel ──────────────────────────────────────────────────
        self.fill_rect(CAM_X, CAM_Y, CAM_W, CAM_H, PANEL_BG);
        self.draw_border(CAM_X, CAM_Y, CAM_W, CAM_H, DIM_TEXT);
        match scene.hand {
            Some(points) => {
                let pinched = scene.session.last_symbol == Some(GestureSymbol::Pinch);
                self.draw_hand(points, pinched);
            }
            None => self.draw_text("no hand", CAM_X + CAM_W / 2 - 28, CAM_Y + CAM_H / 2, 2, DIM_TEXT),
        }
        let raw = scene.session.last_symbol.map_or("-", |s| s.as_str());
        self.draw_text(&format!("raw: {}", raw), CAM_X + 6, CAM_Y + CAM_H + 8, 2, DIM_TEXT);

        // ── Product stage ─────────────────────────────────────────────────
        self.fill_rect(STAGE_X, CAM_Y, STAGE_W, STAGE_H, PANEL_BG);
        self.draw_text(scene.product.name, STAGE_X + 16, CAM_Y + 14, 3, TEXT_COLOR);
        self.draw_text(scene.product.tagline, STAGE_X + 16, CAM_Y + 40, 2, DIM_TEXT);
        if scene.product.price > 0 {
            self.draw_text(&format!("${}", scene.product.price), STAGE_X + 16, CAM_Y + 58, 2, PINCH_COLOR);
        }
        self.draw_object(scene.product, scene.view, scene.session.mode);
        self.draw_page_dots(scene.view.page, scene.view.page_count);

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        self.draw_text(scene.status, 10, STATUS_Y + 10, 2, TEXT_COLOR);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_text(
            "mouse=move hand  click/P=pinch  arrows=swipe  H=hide hand  Q=quit",
            10, WIN_H - 18, 2, DIM_TEXT,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Header: mode + gesture indicator ──────────────────────────────────

    fn draw_header(&mut self, scene: &Scene<'_>) {
        let mode = scene.session.mode;
        self.fill_rect(0, 0, WIN_W, HEADER_H, mode_color(mode));
        let label = format!("MODE: {}", mode.as_str());
        self.draw_text(&label, 16, 14, 3, 0xFFFFFFFF);

        if !scene.session.ready {
            self.draw_text("starting", 300, 16, 2, 0xFFFFFFFF);
        }
        if let Some((symbol, fade)) = scene.gesture {
            let color = blend(mode_color(mode), 0xFFFFFFFF, fade);
            self.draw_text(gesture_glyph(symbol), WIN_W - 260, 14, 3, color);
        }
    }

    // ── Hand wireframe ────────────────────────────────────────────────────

    fn draw_hand(&mut self, points: &[Landmark], pinched: bool) {
        let to_px = |p: &Landmark| {
            (
                CAM_X as f32 + p.x.clamp(0.0, 1.0) * (CAM_W - 1) as f32,
                CAM_Y as f32 + p.y.clamp(0.0, 1.0) * (CAM_H - 1) as f32,
            )
        };
        for &(a, b) in HAND_CONNECTIONS.iter() {
            if let (Some(pa), Some(pb)) = (points.get(a), points.get(b)) {
                let (x0, y0) = to_px(pa);
                let (x1, y1) = to_px(pb);
                self.draw_line(x0, y0, x1, y1, BONE_COLOR);
            }
        }
        for (i, p) in points.iter().enumerate() {
            let (x, y) = to_px(p);
            let tip = i == index::THUMB_TIP || i == index::INDEX_TIP;
            let color = if tip && pinched { PINCH_COLOR } else { JOINT_COLOR };
            let r = if tip { 3 } else { 2 };
            self.fill_rect((x as usize).saturating_sub(r), (y as usize).saturating_sub(r), 2 * r + 1, 2 * r + 1, color);
        }
    }

    // ── Inspected object ──────────────────────────────────────────────────

    fn draw_object(&mut self, product: &Product, view: &ViewState, mode: InteractionMode) {
        let (base_w, base_h) = match product.shape {
            ProductShape::Phone => (70.0, 140.0),
            ProductShape::Shoe  => (160.0, 70.0),
            ProductShape::Cube  => (100.0, 100.0),
        };
        let scale = view.magnification();
        let turn = view.shown_rotation.to_radians();
        let front = base_w * scale * turn.cos().abs().max(0.12);
        let side = base_w * 0.35 * scale * turn.sin().abs();
        let h = base_h * scale;

        let cx = (STAGE_X + STAGE_W / 2) as f32;
        let cy = (CAM_Y + STAGE_H / 2 + 20) as f32;
        let max_h = (STAGE_H - 100) as f32;
        let h = h.min(max_h);
        let total_w = (front + side).min((STAGE_W - 40) as f32);
        let x0 = (cx - total_w / 2.0).max(STAGE_X as f32) as usize;
        let y0 = (cy - h / 2.0).max(CAM_Y as f32 + 80.0) as usize;

        let front_w = (front.min(total_w)) as usize;
        let side_w = (total_w as usize).saturating_sub(front_w);
        let (front_x, side_x) = if view.shown_rotation >= 0.0 {
            (x0, x0 + front_w)
        } else {
            (x0 + side_w, x0)
        };

        self.fill_rect(front_x, y0, front_w, h as usize, product.color);
        if side_w > 0 {
            self.fill_rect(side_x, y0, side_w, h as usize, blend(product.color, 0xFF000000, 0.35));
        }
        if mode == InteractionMode::Inspection {
            self.draw_border(x0.saturating_sub(4), y0.saturating_sub(4), total_w as usize + 8, h as usize + 8, mode_color(mode));
            let info = format!("rot {:.0}  zoom x{:.2}", view.target_rotation, scale);
            self.draw_text(&info, STAGE_X + 16, CAM_Y + STAGE_H - 48, 2, TEXT_COLOR);
        }
    }

    fn draw_page_dots(&mut self, page: usize, count: usize) {
        let spacing = 22;
        let x0 = STAGE_X + STAGE_W / 2 - (count * spacing) / 2;
        let y = CAM_Y + STAGE_H - 20;
        for i in 0..count {
            let x = x0 + i * spacing;
            if i == page {
                self.fill_rect(x, y, 12, 12, TEXT_COLOR);
            } else {
                self.draw_border(x, y, 12, 12, DIM_TEXT);
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x+w).min(WIN_W) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y+h).min(WIN_H) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: u32) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
        for s in 0..=steps {
            let t = s as f32 / steps as f32;
            let x = x0 + (x1 - x0) * t;
            let y = y0 + (y1 - y0) * t;
            self.set_pixel(x as usize, y as usize, color);
            self.set_pixel(x as usize + 1, y as usize, color);
        }
    }

    /// Minimal 3×5 bitmap font, each pixel drawn as a `scale`×`scale` block.
    fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > WIN_W { break; }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '^' => [0b010, 0b101, 0b000, 0b000, 0b000],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '$' => [0b011, 0b110, 0b010, 0b011, 0b110],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

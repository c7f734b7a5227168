//! Showcase view state: the product pages and the inspected object.
//!
//! [`ShowcaseView`] is the collaborator the session dispatches into.  It
//! only records what should be shown; the visualizer reads a
//! [`ViewState`] snapshot each frame and animates toward it.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::bail;
use tracing::debug;

use showcase_core::{ModeConfig, Navigation, Renderable};

// ════════════════════════════════════════════════════════════════════════════
// Product catalogue
// ════════════════════════════════════════════════════════════════════════════

/// Silhouette drawn for a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductShape {
    Phone,
    Shoe,
    Cube,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    pub name:     &'static str,
    pub tagline:  &'static str,
    pub price:    u32,
    pub shape:    ProductShape,
    /// ARGB body color.
    pub color:    u32,
}

pub fn default_catalogue() -> Vec<Product> {
    vec![
        Product {
            name:    "Premium Smartphone",
            tagline: "6.7 in display - 5G - 48MP camera",
            price:   999,
            shape:   ProductShape::Phone,
            color:   0xFF2B2D42,
        },
        Product {
            name:    "Trail Runner",
            tagline: "Lightweight - breathable - all terrain",
            price:   149,
            shape:   ProductShape::Shoe,
            color:   0xFFE07A5F,
        },
        Product {
            name:    "Sample Cube",
            tagline: "Reference object for calibration",
            price:   0,
            shape:   ProductShape::Cube,
            color:   0xFF3D9970,
        },
    ]
}

// ════════════════════════════════════════════════════════════════════════════
// ViewState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub page:             usize,
    pub page_count:       usize,
    /// Azimuth the object is turning toward, degrees.
    pub target_rotation:  f32,
    /// Azimuth currently drawn; eases toward `target_rotation`.
    pub shown_rotation:   f32,
    pub camera_distance:  f32,
    pub initial_distance: f32,
    pub min_distance:     f32,
    pub max_distance:     f32,
}

impl ViewState {
    /// Camera distance bounds and starting distance come from `mode`.
    pub fn new(page_count: usize, mode: &ModeConfig) -> Self {
        let (min, max) = (mode.min_camera_distance, mode.max_camera_distance);
        let d = mode.initial_camera_distance.clamp(min, max);
        ViewState {
            page:             0,
            page_count,
            target_rotation:  0.0,
            shown_rotation:   0.0,
            camera_distance:  d,
            initial_distance: d,
            min_distance:     min,
            max_distance:     max,
        }
    }

    /// Advance the rotation animation by one frame.
    pub fn tick(&mut self) {
        let diff = self.target_rotation - self.shown_rotation;
        if diff.abs() < 0.5 {
            self.shown_rotation = self.target_rotation;
        } else {
            self.shown_rotation += diff * 0.15;
        }
    }

    /// Relative magnification, 1.0 at the initial distance.
    pub fn magnification(&self) -> f32 {
        self.initial_distance / self.camera_distance
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ShowcaseView — the dispatch target
// ════════════════════════════════════════════════════════════════════════════

/// Cheap to clone; clones share one [`ViewState`].
#[derive(Clone)]
pub struct ShowcaseView {
    state: Arc<Mutex<ViewState>>,
}

impl ShowcaseView {
    pub fn new(page_count: usize, mode: &ModeConfig) -> Self {
        ShowcaseView { state: Arc::new(Mutex::new(ViewState::new(page_count, mode))) }
    }

    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    pub fn tick(&self) {
        self.lock().tick();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Renderable for ShowcaseView {
    fn rotate(&mut self, angle_deg: f32) -> anyhow::Result<()> {
        if !angle_deg.is_finite() {
            bail!("rotation {} is not finite", angle_deg);
        }
        let a = angle_deg.clamp(-180.0, 180.0);
        debug!("rotate to {:.0}°", a);
        self.lock().target_rotation = a;
        Ok(())
    }

    fn zoom(&mut self, factor: f32) -> anyhow::Result<()> {
        if !(factor.is_finite() && factor > 0.0) {
            bail!("zoom factor {} is not a positive number", factor);
        }
        let mut s = self.lock();
        s.camera_distance = (s.camera_distance / factor).clamp(s.min_distance, s.max_distance);
        debug!("camera distance {:.2}", s.camera_distance);
        Ok(())
    }

    fn reset_view(&mut self) -> anyhow::Result<()> {
        let mut s = self.lock();
        s.target_rotation = 0.0;
        s.shown_rotation = 0.0;
        s.camera_distance = s.initial_distance;
        Ok(())
    }
}

impl Navigation for ShowcaseView {
    fn set_page(&mut self, index: usize) -> anyhow::Result<()> {
        let mut s = self.lock();
        if index >= s.page_count {
            bail!("page {} out of range (have {})", index, s.page_count);
        }
        s.page = index;
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.lock().page_count
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

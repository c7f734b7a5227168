//! Showcase configuration.
//!
//! Every tunable lives in one [`ShowcaseConfig`], read from TOML.  All
//! sections and fields are optional; missing ones take the defaults below.
//!
//! ```toml
//! [gesture]
//! pinch_threshold        = 0.05   # normalized image units
//! displacement_threshold = 0.06
//! min_swipe_speed        = 0.1    # units per second
//! window_size            = 5
//! tracked_landmark       = "wrist"  # or "index_tip"
//!
//! [debounce]
//! cooldown_ms        = 500
//! consistency_frames = 5
//!
//! [mode]
//! initial_mode    = "selection"   # or "auto"
//! idle_timeout_ms = 30000
//! idle_check_ms   = 1000
//! auto_advance_ms = 5000
//! ```
//!
//! After the file, `SHOWCASE__<FIELD>` environment variables override the
//! timing fields and the pinch threshold.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use gesture_pipeline::{DebounceConfig, GestureConfig};

use crate::error::ConfigError;
use crate::mode::InteractionMode;

/// Mode a session enters once it is marked ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialMode {
    Auto,
    #[default]
    Selection,
}

impl From<InitialMode> for InteractionMode {
    fn from(m: InitialMode) -> Self {
        match m {
            InitialMode::Auto      => InteractionMode::Auto,
            InitialMode::Selection => InteractionMode::Selection,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    pub initial_mode:            InitialMode,
    /// No confirmed gesture for this long (outside Auto) reverts to Auto.
    pub idle_timeout_ms:         u64,
    /// How often the idle timeout is checked.
    pub idle_check_ms:           u64,
    /// Page cadence while in Auto.
    pub auto_advance_ms:         u64,
    /// Magnification per zoom-in gesture (> 1).
    pub zoom_in_factor:          f32,
    /// Magnification per zoom-out gesture (between 0 and 1).
    pub zoom_out_factor:         f32,
    pub min_camera_distance:     f32,
    pub max_camera_distance:     f32,
    /// Camera distance restored by a view reset.
    pub initial_camera_distance: f32,
    /// Azimuth the object turns to on a left swipe in inspection.
    pub rotate_left_deg:         f32,
    pub rotate_right_deg:        f32,
}

impl Default for ModeConfig {
    fn default() -> Self {
        ModeConfig {
            initial_mode:            InitialMode::Selection,
            idle_timeout_ms:         30_000,
            idle_check_ms:           1_000,
            auto_advance_ms:         5_000,
            zoom_in_factor:          1.1,
            zoom_out_factor:         0.9,
            min_camera_distance:     2.0,
            max_camera_distance:     15.0,
            initial_camera_distance: 8.0,
            // a quarter turn and three quarters of a turn
            rotate_left_deg:         90.0,
            rotate_right_deg:        -90.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    pub gesture:  GestureConfig,
    pub debounce: DebounceConfig,
    pub mode:     ModeConfig,
}

impl ShowcaseConfig {
    /// Parse and validate TOML text.  No environment overrides.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: ShowcaseConfig = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a TOML file, apply `SHOWCASE__*` overrides, validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cfg: ShowcaseConfig = toml::from_str(&raw)?;
        cfg.apply_overrides(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// [`load`](Self::load) when a path is given, otherwise defaults plus
    /// environment overrides.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let mut cfg = ShowcaseConfig::default();
                cfg.apply_overrides(|key| std::env::var(key).ok());
                cfg.validate()?;
                Ok(cfg)
            }
        }
    }

    /// Override fields from `lookup(key)`.  Unparseable values are logged
    /// and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(key: &str, raw: String) -> Option<T> {
            let parsed = raw.trim().parse().ok();
            if parsed.is_none() {
                warn!("ignoring {}={:?}: not a valid number", key, raw);
            }
            parsed
        }

        let u64_fields: [(&str, &mut u64); 4] = [
            ("SHOWCASE__COOLDOWN_MS",     &mut self.debounce.cooldown_ms),
            ("SHOWCASE__IDLE_TIMEOUT_MS", &mut self.mode.idle_timeout_ms),
            ("SHOWCASE__IDLE_CHECK_MS",   &mut self.mode.idle_check_ms),
            ("SHOWCASE__AUTO_ADVANCE_MS", &mut self.mode.auto_advance_ms),
        ];
        for (key, slot) in u64_fields {
            if let Some(v) = lookup(key).and_then(|raw| parse(key, raw)) {
                *slot = v;
            }
        }

        let key = "SHOWCASE__CONSISTENCY_FRAMES";
        if let Some(v) = lookup(key).and_then(|raw| parse(key, raw)) {
            self.debounce.consistency_frames = v;
        }
        let key = "SHOWCASE__PINCH_THRESHOLD";
        if let Some(v) = lookup(key).and_then(|raw| parse(key, raw)) {
            self.gesture.pinch_threshold = v;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gesture;
        positive("gesture.pinch_threshold", g.pinch_threshold)?;
        positive("gesture.displacement_threshold", g.displacement_threshold)?;
        if !(g.min_swipe_speed.is_finite() && g.min_swipe_speed >= 0.0) {
            return Err(ConfigError::invalid("gesture.min_swipe_speed", "must be zero or positive"));
        }
        if g.window_size < 2 {
            return Err(ConfigError::invalid("gesture.window_size", "needs at least 2 samples"));
        }

        if self.debounce.consistency_frames == 0 {
            return Err(ConfigError::invalid("debounce.consistency_frames", "must be at least 1"));
        }

        let m = &self.mode;
        nonzero("mode.idle_timeout_ms", m.idle_timeout_ms)?;
        nonzero("mode.idle_check_ms", m.idle_check_ms)?;
        nonzero("mode.auto_advance_ms", m.auto_advance_ms)?;
        if !(m.zoom_in_factor.is_finite() && m.zoom_in_factor > 1.0) {
            return Err(ConfigError::invalid("mode.zoom_in_factor", "must be greater than 1"));
        }
        if !(m.zoom_out_factor > 0.0 && m.zoom_out_factor < 1.0) {
            return Err(ConfigError::invalid("mode.zoom_out_factor", "must be between 0 and 1"));
        }
        positive("mode.min_camera_distance", m.min_camera_distance)?;
        if !(m.max_camera_distance.is_finite() && m.max_camera_distance > m.min_camera_distance) {
            return Err(ConfigError::invalid(
                "mode.max_camera_distance",
                "must be greater than min_camera_distance",
            ));
        }
        if !(m.min_camera_distance..=m.max_camera_distance).contains(&m.initial_camera_distance) {
            return Err(ConfigError::invalid(
                "mode.initial_camera_distance",
                "must lie between min and max camera distance",
            ));
        }
        if !(m.rotate_left_deg.is_finite() && m.rotate_right_deg.is_finite()) {
            return Err(ConfigError::invalid("mode.rotate_*_deg", "must be finite"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {}", v)))
    }
}

fn nonzero(field: &'static str, v: u64) -> Result<(), ConfigError> {
    if v == 0 {
        Err(ConfigError::invalid(field, "must be greater than zero"))
    } else {
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

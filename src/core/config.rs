//=========================================================================
// Core Configuration
//=========================================================================
//
// Tunables for the runtime core, loadable from TOML.
//
// Layout:
//   [viewport]     logical screen size (from the host's settings)
//   [collision]    grid dimensions and viewport margin
//   [movement]     gravity / friction scalars and enabled phases
//   [transitions]  default screen fade durations
//
// Missing tables or keys fall back to defaults. Out-of-range values are
// clamped by `validate()` and reported, never rejected.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::geometry::Rect;

//=== ConfigError =========================================================

#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML text could not be parsed into a configuration.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be written back out.
    #[error("serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

//=== Sections ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

impl ViewportConfig {
    pub fn rect(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { width: 1280.0, height: 720.0 }
    }
}

/// Broad-phase grid layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Horizontal cell count.
    pub columns: u32,
    /// Vertical cell count.
    pub rows: u32,
    /// Fraction the viewport is grown by (about its center) before bucketing.
    pub margin: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self { columns: 3, rows: 3, margin: 0.10 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub gravity: f32,
    pub friction: f32,
    pub gravity_enabled: bool,
    pub friction_enabled: bool,
    pub movement_enabled: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            friction: 0.1,
            gravity_enabled: false,
            friction_enabled: false,
            movement_enabled: true,
        }
    }
}

/// Default screen transition durations, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub on_ms: u64,
    pub off_ms: u64,
}

impl TransitionConfig {
    pub fn on_time(&self) -> Duration {
        Duration::from_millis(self.on_ms)
    }

    pub fn off_time(&self) -> Duration {
        Duration::from_millis(self.off_ms)
    }
}

//=== CoreConfig ==========================================================

/// Complete runtime configuration.
///
/// ```
/// use strata_engine::core::config::CoreConfig;
///
/// let config = CoreConfig::from_toml_str(r#"
///     [collision]
///     columns = 4
///     rows = 2
/// "#).unwrap();
///
/// assert_eq!(config.collision.columns, 4);
/// assert_eq!(config.viewport.width, 1280.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub viewport: ViewportConfig,
    pub collision: CollisionConfig,
    pub movement: MovementConfig,
    pub transitions: TransitionConfig,
}

impl CoreConfig {
    /// Parses TOML text, then clamps values via [`CoreConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: CoreConfig = toml::from_str(text)?;
        Ok(config.validate())
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Clamps out-of-range values to usable ones.
    ///
    /// Grid dimensions below 1 become 1, a negative or non-finite margin
    /// becomes 0. Viewport size is left untouched: a degenerate viewport
    /// is a valid (if useless) state handled by the collision grid.
    pub fn validate(mut self) -> Self {
        if self.collision.columns == 0 {
            warn!("collision.columns = 0, clamping to 1");
            self.collision.columns = 1;
        }
        if self.collision.rows == 0 {
            warn!("collision.rows = 0, clamping to 1");
            self.collision.rows = 1;
        }
        if !(self.collision.margin.is_finite() && self.collision.margin >= 0.0) {
            warn!("collision.margin = {}, clamping to 0", self.collision.margin);
            self.collision.margin = 0.0;
        }
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//! Canvas configuration: layout metrics, camera behaviour, render settings.
//!
//! Every field has a default from [`crate::consts`], so a host may supply a
//! partial JSON object (or none at all) and override only what it needs.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::CanvasError;

/// Geometry of a module box in graph units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    pub title_height: f64,
    pub input_height: f64,
    pub arrow_width: f64,
    pub arrow_margin: f64,
    pub module_width: f64,
    /// Auto-flow step as a multiple of `module_width`.
    pub flow_pitch: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            title_height: TITLE_HEIGHT,
            input_height: INPUT_HEIGHT,
            arrow_width: ARROW_WIDTH,
            arrow_margin: ARROW_MARGIN,
            module_width: MODULE_WIDTH,
            flow_pitch: FLOW_PITCH,
        }
    }
}

impl LayoutMetrics {
    /// Height of a module with `input_count` input rows.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn module_height(&self, input_count: usize) -> f64 {
        self.title_height + input_count as f64 * self.input_height
    }
}

/// Pan/zoom limits and interpolation behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub wheel_step: f64,
    pub damping: f64,
    pub snap_epsilon: f64,
    pub fit_span: f64,
    pub fit_min_extent: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            wheel_step: ZOOM_WHEEL_STEP,
            damping: CAMERA_DAMPING,
            snap_epsilon: CAMERA_SNAP_EPSILON,
            fit_span: FIT_SPAN,
            fit_min_extent: FIT_MIN_EXTENT,
        }
    }
}

/// Display-list construction settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub connector_steps: usize,
    pub bevel_factor: f64,
    pub drop_shadows: bool,
    pub outline_width_px: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            connector_steps: CONNECTOR_STEPS,
            bevel_factor: BEVEL_FACTOR,
            drop_shadows: false,
            outline_width_px: OUTLINE_WIDTH_PX,
        }
    }
}

/// Complete canvas configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub layout: LayoutMetrics,
    pub camera: CameraSettings,
    pub render: RenderSettings,
}

impl CanvasConfig {
    /// Parse a (possibly partial) JSON configuration and validate it.
    ///
    /// # Errors
    ///
    /// Returns `Json` for malformed input and `InvalidConfig` when a value is
    /// out of its permitted range.
    pub fn from_json(text: &str) -> Result<Self, CanvasError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value can drive the canvas without degenerate math.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<(), CanvasError> {
        let l = &self.layout;
        positive("layout.title_height", l.title_height)?;
        positive("layout.input_height", l.input_height)?;
        positive("layout.module_width", l.module_width)?;
        positive("layout.flow_pitch", l.flow_pitch)?;
        positive("layout.arrow_width", l.arrow_width)?;
        if l.arrow_width > l.module_width {
            return Err(invalid("layout.arrow_width", "must not exceed module_width"));
        }
        if l.arrow_margin < 0.0 || 2.0 * l.arrow_margin >= l.title_height {
            return Err(invalid("layout.arrow_margin", "must fit twice inside title_height"));
        }

        let c = &self.camera;
        positive("camera.zoom_min", c.zoom_min)?;
        if c.zoom_max < c.zoom_min {
            return Err(invalid("camera.zoom_max", "must be at least zoom_min"));
        }
        if !(c.damping > 0.0 && c.damping <= 1.0) {
            return Err(invalid("camera.damping", "must be in (0, 1]"));
        }
        positive("camera.snap_epsilon", c.snap_epsilon)?;
        positive("camera.fit_span", c.fit_span)?;
        positive("camera.fit_min_extent", c.fit_min_extent)?;

        let r = &self.render;
        if r.connector_steps < CONNECTOR_MIN_STEPS {
            return Err(invalid("render.connector_steps", "must be at least 8"));
        }
        if !(0.0..0.5).contains(&r.bevel_factor) {
            return Err(invalid("render.bevel_factor", "must be in [0, 0.5)"));
        }
        positive("render.outline_width_px", r.outline_width_px)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), CanvasError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a positive finite number"))
    }
}

fn invalid(field: &'static str, reason: &'static str) -> CanvasError {
    CanvasError::InvalidConfig { field, reason }
}

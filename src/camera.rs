#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::{Add, Sub};

use crate::config::CameraSettings;
use crate::geometry::Bounds;

/// A point in either screen or graph space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Damped pan/zoom camera over graph space.
///
/// User actions move the `*_target` values instantly; the `*_current` values
/// are what gets drawn and chase their targets once per [`Camera::tick`].
/// Graph space is y-up and the default view spans two units across the
/// viewport, centred on `-home`.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub home_target: Point,
    pub home_current: Point,
    pub zoom_target: f64,
    pub zoom_current: f64,
    settings: CameraSettings,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

impl Camera {
    #[must_use]
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            home_target: Point::default(),
            home_current: Point::default(),
            zoom_target: 1.0,
            zoom_current: 1.0,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.settings.zoom_min, self.settings.zoom_max)
    }

    /// Nudge the zoom target by `delta`, clamped to the configured limits.
    pub fn zoom_step(&mut self, delta: f64) {
        self.zoom_target = self.clamp_zoom(self.zoom_target + delta);
    }

    /// Return the zoom target to 1.0.
    pub fn zoom_normal(&mut self) {
        self.zoom_target = self.clamp_zoom(1.0);
    }

    /// Centre `bounds` and zoom so its larger side spans the viewport.
    ///
    /// A zero extent is replaced by `fit_min_extent` so a single point never
    /// divides by zero.
    pub fn zoom_to_fit(&mut self, bounds: Bounds) {
        let width = bounds.width().max(self.settings.fit_min_extent);
        let height = bounds.height().max(self.settings.fit_min_extent);
        let center = bounds.center();
        self.home_target = Point::new(-center.x, -center.y);
        self.zoom_target = self.clamp_zoom(self.settings.fit_span / width.max(height));
    }

    /// Move the home target by a graph-space delta. The current home follows on later ticks.
    pub fn pan_by(&mut self, delta: Point) {
        self.home_target = self.home_target + delta;
    }

    /// Advance the current values toward their targets.
    ///
    /// Returns `true` while anything is still converging, so the caller knows
    /// to schedule another frame. Once both values are within `snap_epsilon`
    /// they snap exactly onto their targets and later calls are no-ops.
    #[allow(clippy::float_cmp)]
    pub fn tick(&mut self) -> bool {
        let factor = self.settings.damping;
        let limit = self.settings.snap_epsilon;
        let mut converging = false;

        if self.home_current != self.home_target {
            let delta = self.home_target - self.home_current;
            self.home_current = Point::new(
                self.home_current.x + factor * delta.x,
                self.home_current.y + factor * delta.y,
            );
            let rest = self.home_target - self.home_current;
            if rest.x.abs() < limit && rest.y.abs() < limit {
                self.home_current = self.home_target;
            } else {
                converging = true;
            }
        }

        if self.zoom_current != self.zoom_target {
            self.zoom_current += factor * (self.zoom_target - self.zoom_current);
            if (self.zoom_target - self.zoom_current).abs() < limit {
                self.zoom_current = self.zoom_target;
            } else {
                converging = true;
            }
        }

        converging
    }

    /// Whether the drawn camera still differs from its target.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_converging(&self) -> bool {
        self.home_current != self.home_target || self.zoom_current != self.zoom_target
    }

    /// Convert a screen-space point (CSS pixels, y-down) to graph coordinates
    /// using the camera as currently drawn.
    #[must_use]
    pub fn screen_to_graph(&self, screen: Point, viewport_w: f64, viewport_h: f64) -> Point {
        let ndc = screen_to_ndc(screen, viewport_w, viewport_h);
        Point::new(
            ndc.x / self.zoom_current - self.home_current.x,
            ndc.y / self.zoom_current - self.home_current.y,
        )
    }

    /// Convert a graph-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn graph_to_screen(&self, graph: Point, viewport_w: f64, viewport_h: f64) -> Point {
        let half_w = viewport_w.max(1.0) / 2.0;
        let half_h = viewport_h.max(1.0) / 2.0;
        let ndc_x = (graph.x + self.home_current.x) * self.zoom_current;
        let ndc_y = (graph.y + self.home_current.y) * self.zoom_current;
        Point::new((ndc_x + 1.0) * half_w, (1.0 - ndc_y) * half_h)
    }

    /// Graph-space displacement between two screen points. Home cancels out.
    #[must_use]
    pub fn screen_delta_to_graph(&self, from: Point, to: Point, viewport_w: f64, viewport_h: f64) -> Point {
        let a = screen_to_ndc(from, viewport_w, viewport_h);
        let b = screen_to_ndc(to, viewport_w, viewport_h);
        Point::new((b.x - a.x) / self.zoom_current, (b.y - a.y) / self.zoom_current)
    }

    /// Convert a screen-space length (pixels) to graph units along x.
    #[must_use]
    pub fn screen_dist_to_graph(&self, screen_dist: f64, viewport_w: f64) -> f64 {
        screen_dist / (viewport_w.max(1.0) / 2.0) / self.zoom_current
    }
}

/// Pixel coordinates to normalized device coordinates in [-1, 1], y-up.
fn screen_to_ndc(screen: Point, viewport_w: f64, viewport_h: f64) -> Point {
    let half_w = viewport_w.max(1.0) / 2.0;
    let half_h = viewport_h.max(1.0) / 2.0;
    Point::new(screen.x / half_w - 1.0, 1.0 - screen.y / half_h)
}

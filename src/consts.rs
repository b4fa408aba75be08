//! Shared numeric constants for the graph canvas.
//!
//! These are the defaults behind [`crate::config::CanvasConfig`]. Graph-space
//! units are abstract: a module is one unit wide and the default camera shows
//! two units across the viewport.

// ── Module layout ───────────────────────────────────────────────

/// Height of the title band at the top of every module.
pub const TITLE_HEIGHT: f64 = 0.40;

/// Height of one input row below the title band.
pub const INPUT_HEIGHT: f64 = 0.38;

/// Width of the output arrow strip at the right edge of the title band.
pub const ARROW_WIDTH: f64 = 0.15;

/// Vertical inset of the output arrow inside the title band.
pub const ARROW_MARGIN: f64 = 0.04;

/// Width shared by all modules.
pub const MODULE_WIDTH: f64 = 1.0;

/// Auto-flow step between freshly placed modules, as a multiple of the module width.
pub const FLOW_PITCH: f64 = 1.10;

// ── Camera ──────────────────────────────────────────────────────

/// Smallest permitted zoom factor.
pub const ZOOM_MIN: f64 = 0.1;

/// Largest permitted zoom factor.
pub const ZOOM_MAX: f64 = 10.0;

/// Zoom change applied per wheel notch.
pub const ZOOM_WHEEL_STEP: f64 = 0.10;

/// Fraction of the remaining distance covered per camera tick.
pub const CAMERA_DAMPING: f64 = 0.55;

/// Distance below which the interpolated camera snaps onto its target.
pub const CAMERA_SNAP_EPSILON: f64 = 1e-3;

/// Normalized viewport span used by zoom-to-fit. 2.0 would be edge to edge.
pub const FIT_SPAN: f64 = 1.96;

/// Extent substituted for a zero-sized box in zoom-to-fit.
pub const FIT_MIN_EXTENT: f64 = 1e-3;

// ── Rendering ───────────────────────────────────────────────────

/// Segments per connection curve.
pub const CONNECTOR_STEPS: usize = 12;

/// Fewest segments a connection curve may be sampled with.
pub const CONNECTOR_MIN_STEPS: usize = 8;

/// Corner bevel as a fraction of the rectangle width.
pub const BEVEL_FACTOR: f64 = 0.05;

/// Outline width for module bodies, selection and connections, in screen pixels.
pub const OUTLINE_WIDTH_PX: f64 = 2.5;

/// Width of the input port marker at the left edge of each input row.
pub const PORT_MARKER_WIDTH: f64 = 0.04;

/// Height of the input port marker.
pub const PORT_MARKER_HEIGHT: f64 = 0.05;

/// Horizontal text inset inside a module.
pub const TEXT_INSET: f64 = 0.05;

/// Column count text boxes inside modules are laid out for.
pub const TEXT_COLUMNS: usize = 16;

/// Label shown for modules whose plug-in is not in the catalog.
pub const UNKNOWN_PLUGIN_NAME: &str = "(Unknown)";

//! Rendering: builds a graph-space display list for the current canvas state.
//!
//! [`build_scene`] is pure: it reads the document, placements, selection and
//! interaction state and produces a [`Scene`] of polygons, polylines and text
//! boxes in draw order (module bodies, then connections, then the in-progress
//! connection). The camera is not applied here; a backend maps graph space to
//! pixels when it replays the scene. With the `web` feature, [`paint`] is that
//! backend for a `CanvasRenderingContext2d`.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::camera::Point;
use crate::config::{CanvasConfig, LayoutMetrics};
use crate::consts::{PORT_MARKER_HEIGHT, PORT_MARKER_WIDTH, TEXT_COLUMNS, TEXT_INSET};
use crate::doc::{GraphDocument, ModuleId};
use crate::geometry::{self, Size, TextBox};
use crate::input::InteractionState;
use crate::layout::{Placement, PlacementTable};
use crate::plugin::{PluginId, PluginInfo};
use crate::selection::Selection;

/// Linear RGBA colour, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba()` notation.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn css(&self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("rgba({}, {}, {}, {})", byte(self.r), byte(self.g), byte(self.b), self.a)
    }
}

// ── Palette ─────────────────────────────────────────────────────

pub const BACKGROUND: Color = Color::rgb(0.328, 0.265, 0.328);
pub const FOREGROUND: Color = Color::rgb(0.8, 0.6, 0.8);
pub const FOREGROUND_LIGHT: Color = Color::rgb(0.9, 0.7, 0.9);
pub const BODY: Color = Color::rgb(0.5, 0.3, 0.5);
pub const SELECTED: Color = Color::rgb(0.9, 0.8, 0.9);
pub const INPUT_HIGHLIGHT: Color = Color::rgb(0.7, 0.5, 0.7);
pub const SHADOW: Color = Color::rgba(0.0, 0.0, 0.0, 0.5);
pub const TEXT_SHADOW: Color = Color::rgb(0.0, 0.0, 0.0);

/// Separator and rubber-band lines are thinner than outlines.
const THIN_LINE_PX: f64 = 1.0;
const RUBBER_BAND_PX: f64 = 2.0;

/// One drawing primitive in graph space. Widths are in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FillPolygon { points: Vec<Point>, color: Color },
    /// Closed outline.
    StrokePolygon { points: Vec<Point>, color: Color, width_px: f64 },
    /// Open line through `points`.
    Polyline { points: Vec<Point>, color: Color, width_px: f64 },
    Text { text: TextBox, color: Color, shadow: Color },
}

/// Display list for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub commands: Vec<DrawCmd>,
}

impl Scene {
    fn push(&mut self, cmd: DrawCmd) {
        self.commands.push(cmd);
    }

    /// Open lines in draw order: separators, connections, the rubber band.
    #[must_use]
    pub fn polylines(&self) -> impl Iterator<Item = &[Point]> {
        self.commands.iter().filter_map(|c| match c {
            DrawCmd::Polyline { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }
}

/// Everything a frame is drawn from.
pub struct SceneSource<'a> {
    pub doc: &'a GraphDocument,
    pub plugins: &'a dyn PluginInfo,
    pub placements: &'a PlacementTable,
    pub selection: &'a Selection,
    pub state: &'a InteractionState,
    /// Pointer position in graph space, for the in-progress connection.
    pub pointer: Option<Point>,
    pub config: &'a CanvasConfig,
}

/// Where connections leave a module: the right edge, halfway down the title band.
#[must_use]
pub fn output_anchor(placement: &Placement, metrics: &LayoutMetrics) -> Point {
    Point::new(
        placement.origin.x + placement.size.w,
        placement.origin.y - metrics.title_height / 2.0,
    )
}

/// Where connections enter input row `index`: the left edge, halfway down the row.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn input_anchor(placement: &Placement, metrics: &LayoutMetrics, index: usize) -> Point {
    Point::new(
        placement.origin.x,
        placement.origin.y - metrics.title_height - metrics.input_height * (index as f64 + 0.5),
    )
}

/// Sampled curves for every edge into `target`. Edges whose source has no
/// placement, or whose target has none, are skipped.
#[must_use]
pub fn connections_into(
    doc: &GraphDocument,
    placements: &PlacementTable,
    metrics: &LayoutMetrics,
    target: ModuleId,
    steps: usize,
) -> Vec<Vec<Point>> {
    let Some(to) = placements.get(target) else {
        return Vec::new();
    };
    doc.inbound_edges(target)
        .into_iter()
        .filter_map(|edge| {
            let from = placements.get(edge.source)?;
            Some(geometry::connector(
                output_anchor(from, metrics),
                input_anchor(to, metrics, edge.input),
                steps,
            ))
        })
        .collect()
}

/// Build the display list for one frame.
///
/// Modules are drawn in placement (paint) order and only if the document
/// still lists them; placements awaiting pruning are invisible.
#[must_use]
pub fn build_scene(src: &SceneSource<'_>) -> Scene {
    let mut scene = Scene::default();
    let metrics = &src.config.layout;
    let render = &src.config.render;
    let hover = src.state.hover();

    for placement in src.placements.iter() {
        let Some(plugin) = src.doc.plugin_of(placement.id) else {
            continue;
        };
        draw_module(&mut scene, src, placement, plugin, hover.filter(|h| h.module == placement.id).map(|h| h.input));
    }

    for module in src.doc.module_ids() {
        for points in connections_into(src.doc, src.placements, metrics, module, render.connector_steps) {
            scene.push(DrawCmd::Polyline { points, color: FOREGROUND, width_px: render.outline_width_px });
        }
    }

    if let (Some(source), Some(pointer)) = (src.state.connect_source(), src.pointer)
        && let Some(from) = src.placements.get(source)
    {
        scene.push(DrawCmd::Polyline {
            points: vec![output_anchor(from, metrics), pointer],
            color: FOREGROUND,
            width_px: RUBBER_BAND_PX,
        });
    }

    scene
}

#[allow(clippy::cast_precision_loss)]
fn draw_module(
    scene: &mut Scene,
    src: &SceneSource<'_>,
    placement: &Placement,
    plugin: PluginId,
    hovered_input: Option<usize>,
) {
    let metrics = &src.config.layout;
    let render = &src.config.render;
    let Placement { origin, size, .. } = *placement;
    let bevel = render.bevel_factor;

    if render.drop_shadows {
        scene.push(DrawCmd::FillPolygon {
            points: geometry::shadow_outline(origin, size, bevel).to_vec(),
            color: SHADOW,
        });
    }
    let outline = geometry::bevel_outline(origin, size, bevel).to_vec();
    scene.push(DrawCmd::FillPolygon { points: outline.clone(), color: BODY });
    scene.push(DrawCmd::StrokePolygon { points: outline, color: FOREGROUND, width_px: render.outline_width_px });

    let separator_y = origin.y - metrics.title_height;
    scene.push(DrawCmd::Polyline {
        points: vec![Point::new(origin.x, separator_y), Point::new(origin.x + size.w, separator_y)],
        color: FOREGROUND,
        width_px: THIN_LINE_PX,
    });

    let text_w = size.w - 2.0 * TEXT_INSET;
    scene.push(DrawCmd::Text {
        text: geometry::layout_text_box(
            Point::new(origin.x + TEXT_INSET, origin.y),
            Size::new(text_w, metrics.title_height),
            src.plugins.display_name(plugin),
            TEXT_COLUMNS,
            1,
        ),
        color: FOREGROUND,
        shadow: TEXT_SHADOW,
    });

    if !src.plugins.is_sink(plugin) {
        let arrow = geometry::arrow_right(
            Point::new(origin.x + size.w - metrics.arrow_width, origin.y - metrics.arrow_margin),
            Size::new(metrics.arrow_width, metrics.title_height - 2.0 * metrics.arrow_margin),
        );
        scene.push(DrawCmd::FillPolygon { points: arrow.to_vec(), color: FOREGROUND_LIGHT });
    }

    if let Some(row) = hovered_input {
        let row_origin = Point::new(origin.x, separator_y - row as f64 * metrics.input_height);
        scene.push(DrawCmd::FillPolygon {
            points: geometry::bevel_outline(row_origin, Size::new(size.w, metrics.input_height), bevel).to_vec(),
            color: INPUT_HIGHLIGHT,
        });
    }

    for index in 0..src.plugins.input_count(plugin) {
        let row_top = separator_y - index as f64 * metrics.input_height;
        let marker_origin =
            Point::new(origin.x, row_top - metrics.input_height / 2.0 + PORT_MARKER_HEIGHT / 2.0);
        scene.push(DrawCmd::FillPolygon {
            points: geometry::bevel_outline(marker_origin, Size::new(PORT_MARKER_WIDTH, PORT_MARKER_HEIGHT), bevel)
                .to_vec(),
            color: FOREGROUND,
        });
        let label = src.plugins.input(plugin, index).map_or("", |spec| spec.name.as_str());
        scene.push(DrawCmd::Text {
            text: geometry::layout_text_box(
                Point::new(origin.x + TEXT_INSET, row_top),
                Size::new(text_w, metrics.input_height),
                label,
                TEXT_COLUMNS,
                1,
            ),
            color: FOREGROUND,
            shadow: TEXT_SHADOW,
        });
    }

    if src.selection.contains(placement.id) {
        scene.push(DrawCmd::StrokePolygon {
            points: geometry::bevel_outline(origin, size, bevel).to_vec(),
            color: SELECTED,
            width_px: render.outline_width_px,
        });
    }
}

// =============================================================
// Browser backend
// =============================================================

#[cfg(feature = "web")]
pub use web::paint;

#[cfg(feature = "web")]
mod web {
    use wasm_bindgen::JsValue;
    use web_sys::CanvasRenderingContext2d;

    use super::{BACKGROUND, DrawCmd, Scene};
    use crate::camera::{Camera, Point};

    /// Nominal font size text is set at before scaling into its box.
    const FONT_PX: f64 = 100.0;

    /// Replay `scene` onto a 2D context through `camera`.
    ///
    /// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
    pub fn paint(
        ctx: &CanvasRenderingContext2d,
        scene: &Scene,
        camera: &Camera,
        viewport_w: f64,
        viewport_h: f64,
        dpr: f64,
    ) -> Result<(), JsValue> {
        let half_w = viewport_w.max(1.0) / 2.0;
        let half_h = viewport_h.max(1.0) / 2.0;

        ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        ctx.set_fill_style_str(&BACKGROUND.css());
        ctx.fill_rect(0.0, 0.0, viewport_w, viewport_h);

        // Graph space is y-up with the viewport spanning [-1, 1] at zoom 1.
        ctx.translate(half_w, half_h)?;
        ctx.scale(half_w * camera.zoom_current, -half_h * camera.zoom_current)?;
        ctx.translate(camera.home_current.x, camera.home_current.y)?;
        let px = 1.0 / (half_w * camera.zoom_current);

        for cmd in &scene.commands {
            match cmd {
                DrawCmd::FillPolygon { points, color } => {
                    trace_path(ctx, points, true);
                    ctx.set_fill_style_str(&color.css());
                    ctx.fill();
                }
                DrawCmd::StrokePolygon { points, color, width_px } => {
                    trace_path(ctx, points, true);
                    ctx.set_stroke_style_str(&color.css());
                    ctx.set_line_width(width_px * px);
                    ctx.stroke();
                }
                DrawCmd::Polyline { points, color, width_px } => {
                    trace_path(ctx, points, false);
                    ctx.set_stroke_style_str(&color.css());
                    ctx.set_line_width(width_px * px);
                    ctx.stroke();
                }
                DrawCmd::Text { text, color, shadow } => {
                    if text.text.is_empty() || text.ascent <= 0.0 {
                        continue;
                    }
                    let scale = text.ascent / FONT_PX;
                    for (offset, fill) in [(text.shadow_offset, shadow), (Point::default(), color)] {
                        ctx.save();
                        ctx.translate(text.baseline.x + offset.x, text.baseline.y + offset.y)?;
                        ctx.scale(scale, -scale)?;
                        ctx.set_font(&format!("{FONT_PX}px monospace"));
                        ctx.set_fill_style_str(&fill.css());
                        ctx.fill_text(&text.text, 0.0, 0.0)?;
                        ctx.restore();
                    }
                }
            }
        }
        Ok(())
    }

    fn trace_path(ctx: &CanvasRenderingContext2d, points: &[Point], close: bool) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        ctx.begin_path();
        ctx.move_to(first.x, first.y);
        for p in rest {
            ctx.line_to(p.x, p.y);
        }
        if close {
            ctx.close_path();
        }
    }
}

//! Pure geometry for the graph canvas: boxes, bevelled outlines, Bezier
//! connectors, and boxed text layout.
//!
//! All coordinates are graph space, y-up. A box is described by its top-left
//! `origin` and a `size` extending right and *down*.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::camera::Point;

/// Width and height of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    #[must_use]
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

/// Axis-aligned bounding box, `min` bottom-left and `max` top-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Bounds of a box with top-left `origin` extending down by `size.h`.
    #[must_use]
    pub fn from_box(origin: Point, size: Size) -> Self {
        Self {
            min: Point::new(origin.x, origin.y - size.h),
            max: Point::new(origin.x + size.w, origin.y),
        }
    }

    /// Smallest bounds covering both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min.x + self.max.x) * 0.5, (self.min.y + self.max.y) * 0.5)
    }

    /// Strict interior test; points on the edge are outside.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }
}

/// Eight-vertex outline of a rectangle with chamfered corners.
///
/// The bevel is `size.w * factor`. Vertices run from the bottom-left corner
/// clockwise round to the bottom edge, suitable for a fan fill or a closed loop.
#[must_use]
pub fn bevel_outline(origin: Point, size: Size, factor: f64) -> [Point; 8] {
    let bevel = size.w * factor;
    let lx = origin.x;
    let rx = origin.x + size.w;
    let ty = origin.y;
    let by = origin.y - size.h;
    [
        Point::new(lx + bevel, by),
        Point::new(lx, by + bevel),
        Point::new(lx, ty - bevel),
        Point::new(lx + bevel, ty),
        Point::new(rx - bevel, ty),
        Point::new(rx, ty - bevel),
        Point::new(rx, by + bevel),
        Point::new(rx - bevel, by),
    ]
}

/// Outline of the drop shadow behind a bevelled box: the same shape pushed
/// one bevel right and down.
#[must_use]
pub fn shadow_outline(origin: Point, size: Size, factor: f64) -> [Point; 8] {
    let bevel = size.w * factor;
    bevel_outline(Point::new(origin.x + bevel, origin.y - bevel), size, factor)
}

/// Right-pointing triangle filling the box at `pos` (top-left) of `size`.
#[must_use]
pub fn arrow_right(pos: Point, size: Size) -> [Point; 3] {
    [
        pos,
        Point::new(pos.x + size.w, pos.y - size.h / 2.0),
        Point::new(pos.x, pos.y - size.h),
    ]
}

/// Point on the cubic Bezier curve with control points `a`..`d` at `t` in [0, 1].
#[must_use]
pub fn bezier(a: Point, b: Point, c: Point, d: Point, t: f64) -> Point {
    let omt = 1.0 - t;
    let w0 = omt * omt * omt;
    let w1 = 3.0 * t * omt * omt;
    let w2 = 3.0 * t * t * omt;
    let w3 = t * t * t;
    Point::new(
        a.x * w0 + b.x * w1 + c.x * w2 + d.x * w3,
        a.y * w0 + b.y * w1 + c.y * w2 + d.y * w3,
    )
}

/// Sample an S-shaped connector from `start` to `end` into `steps` segments.
///
/// The interior control points sit at `(end.x, start.y)` and
/// `(start.x, end.y)`, which keeps both ends horizontal whatever the
/// vertical offset. The result holds `steps + 1` points, first and last
/// exactly `start` and `end`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn connector(start: Point, end: Point, steps: usize) -> Vec<Point> {
    let steps = steps.max(1);
    let c1 = Point::new(end.x, start.y);
    let c2 = Point::new(start.x, end.y);
    let mut points = Vec::with_capacity(steps + 1);
    points.push(start);
    for i in 1..steps {
        let t = i as f64 / steps as f64;
        points.push(bezier(start, c1, c2, end, t));
    }
    points.push(end);
    points
}

// =============================================================
// Boxed text
// =============================================================

/// Advance width of one glyph in the stroke font's design units.
const FONT_ADVANCE: f64 = 104.76;
/// Ascent above the baseline, padded slightly, in design units.
const FONT_ASCENT: f64 = 119.05 + 8.0;
/// Descent below the baseline in design units.
const FONT_DESCENT: f64 = 33.33;
/// Drop-shadow offset in design units.
const FONT_SHADOW: (f64, f64) = (8.0, -6.0);

/// Placement of a single line of monospaced text fitted into a box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub text: String,
    /// Left end of the baseline.
    pub baseline: Point,
    /// Horizontal advance per character.
    pub advance: f64,
    /// Distance from baseline to the top of the line.
    pub ascent: f64,
    /// Distance from baseline to the bottom of the line.
    pub descent: f64,
    /// Offset of the drop shadow relative to the text.
    pub shadow_offset: Point,
}

/// Fit `text` into the box at `pos` (top-left) of `size`.
///
/// The box is divided into `columns` character cells across and `lines`
/// rows down; the glyph scale is derived from the cell size, so a string
/// longer than `columns` overruns to the right rather than shrinking.
/// `columns == 0` sizes the cells to the string itself.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn layout_text_box(pos: Point, size: Size, text: &str, columns: usize, lines: usize) -> TextBox {
    let columns = if columns == 0 { text.chars().count().max(1) } else { columns };
    let lines = lines.max(1);
    let scale_x = size.w / (columns as f64 * FONT_ADVANCE);
    let scale_y = size.h / (lines as f64 * (FONT_ASCENT + FONT_DESCENT));
    TextBox {
        text: text.to_owned(),
        baseline: Point::new(pos.x, pos.y - FONT_ASCENT * scale_y),
        advance: FONT_ADVANCE * scale_x,
        ascent: FONT_ASCENT * scale_y,
        descent: FONT_DESCENT * scale_y,
        shadow_offset: Point::new(FONT_SHADOW.0 * scale_x, FONT_SHADOW.1 * scale_y),
    }
}

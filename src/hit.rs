#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::config::LayoutMetrics;
use crate::doc::{GraphDocument, ModuleId};
use crate::layout::PlacementTable;
use crate::plugin::PluginInfo;

/// Which part of a module was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// Title band or an input row, outside the output arrow.
    Body,
    /// The output arrow at the right of the title band.
    Output,
    /// Input row `index`, counted from zero below the title band.
    Input(usize),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub module: ModuleId,
    pub part: HitPart,
}

/// Address of one module input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    pub module: ModuleId,
    pub input: usize,
}

/// Topmost module under `point`.
#[must_use]
pub fn module_at(placements: &PlacementTable, point: Point) -> Option<ModuleId> {
    placements.module_at(point)
}

/// Whether `point` lies in the output arrow strip of module `id`.
///
/// The strip is `arrow_width` wide at the right edge of the title band, inset
/// vertically by `arrow_margin`. Unknown ids never hit. Callers are
/// responsible for skipping sink modules, which draw no arrow.
#[must_use]
pub fn output_arrow(placements: &PlacementTable, metrics: &LayoutMetrics, point: Point, id: ModuleId) -> bool {
    let Some(p) = placements.get(id) else {
        return false;
    };
    let right = p.origin.x + p.size.w;
    point.x > right - metrics.arrow_width
        && point.x < right
        && point.y < p.origin.y - metrics.arrow_margin
        && point.y > p.origin.y - metrics.title_height + metrics.arrow_margin
}

/// Input row of module `id` under `point`, if the point is below the title band.
///
/// Rows past `input_count` and unknown ids are no hit.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn input_row(
    placements: &PlacementTable,
    metrics: &LayoutMetrics,
    point: Point,
    id: ModuleId,
    input_count: usize,
) -> Option<usize> {
    let p = placements.get(id)?;
    let offset = p.origin.y - point.y;
    if offset <= metrics.title_height {
        return None;
    }
    let row = ((offset - metrics.title_height) / metrics.input_height).floor() as usize;
    (row < input_count).then_some(row)
}

/// Resolve `point` to a module and the part of it under the point.
#[must_use]
pub fn hit_test<P>(
    placements: &PlacementTable,
    doc: &GraphDocument,
    plugins: &P,
    metrics: &LayoutMetrics,
    point: Point,
) -> Option<Hit>
where
    P: PluginInfo + ?Sized,
{
    let module = placements.module_at(point)?;
    let plugin = doc.plugin_of(module)?;
    if !plugins.is_sink(plugin) && output_arrow(placements, metrics, point, module) {
        return Some(Hit { module, part: HitPart::Output });
    }
    let part = input_row(placements, metrics, point, module, plugins.input_count(plugin))
        .map_or(HitPart::Body, HitPart::Input);
    Some(Hit { module, part })
}

/// The input port under `point`, for connect-drag hover.
#[must_use]
pub fn port_at<P>(
    placements: &PlacementTable,
    doc: &GraphDocument,
    plugins: &P,
    metrics: &LayoutMetrics,
    point: Point,
) -> Option<PortRef>
where
    P: PluginInfo + ?Sized,
{
    match hit_test(placements, doc, plugins, metrics, point)? {
        Hit { module, part: HitPart::Input(input) } => Some(PortRef { module, input }),
        _ => None,
    }
}

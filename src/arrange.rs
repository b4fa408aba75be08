//! Selection geometry: align to a shared edge, distribute evenly, bounds.
//!
//! These operate on placements only; they emit no intents since placement is
//! canvas-local state. Degenerate inputs (too few modules, modules without a
//! placement) are no-ops rather than errors.

#[cfg(test)]
#[path = "arrange_test.rs"]
mod arrange_test;

use serde::{Deserialize, Serialize};

use crate::doc::{GraphDocument, ModuleId};
use crate::geometry::Bounds;
use crate::layout::{Placement, PlacementTable};
use crate::selection::Selection;

/// Edge to align a selection on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Axis to distribute a selection along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Align every selected module to the matching edge of the first one.
///
/// Only the coordinate along the aligned axis changes. Returns how many
/// modules moved; fewer than two selected is a no-op.
pub fn align(placements: &mut PlacementTable, selection: &Selection, edge: Edge) -> usize {
    if selection.len() < 2 {
        return 0;
    }
    let Some(reference) = selection.first().and_then(|id| placements.get(id)).copied() else {
        return 0;
    };
    let mut moved = 0;
    for id in selection.iter().skip(1) {
        let Some(p) = placements.get_mut(id) else {
            continue;
        };
        match edge {
            Edge::Left => p.origin.x = reference.origin.x,
            Edge::Right => p.origin.x = reference.origin.x + reference.size.w - p.size.w,
            Edge::Top => p.origin.y = reference.origin.y,
            Edge::Bottom => p.origin.y = reference.origin.y - reference.size.h + p.size.h,
        }
        moved += 1;
    }
    moved
}

/// Spread the selection evenly along `axis`, keeping the first and last
/// selected modules fixed.
///
/// The free span between the first module's far edge and the last module's
/// near edge, less the interior modules' own extents, is split into
/// `count - 1` equal margins. Interior modules are then laid out in
/// selection order. Vertical distribution runs downward since graph space is
/// y-up. Returns how many modules moved; fewer than three placed modules is a
/// no-op.
#[allow(clippy::cast_precision_loss)]
pub fn distribute(placements: &mut PlacementTable, selection: &Selection, axis: Axis) -> usize {
    let members: Vec<Placement> = selection.iter().filter_map(|id| placements.get(id)).copied().collect();
    if members.len() < 3 {
        return 0;
    }
    let (first, last) = (members[0], members[members.len() - 1]);
    let interior = &members[1..members.len() - 1];

    let sign = match axis {
        Axis::Horizontal => 1.0,
        Axis::Vertical => -1.0,
    };

    let occupied: f64 = interior.iter().map(|p| extent(p, axis)).sum();
    let span = (position(&first, axis) + sign * extent(&first, axis) - position(&last, axis)).abs();
    let margin = (span - occupied) / (members.len() - 1) as f64;

    let mut cursor = position(&first, axis) + sign * (extent(&first, axis) + margin);
    for member in interior {
        if let Some(p) = placements.get_mut(member.id) {
            match axis {
                Axis::Horizontal => p.origin.x = cursor,
                Axis::Vertical => p.origin.y = cursor,
            }
        }
        cursor += sign * (extent(member, axis) + margin);
    }
    interior.len()
}

fn position(p: &Placement, axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => p.origin.x,
        Axis::Vertical => p.origin.y,
    }
}

fn extent(p: &Placement, axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => p.size.w,
        Axis::Vertical => p.size.h,
    }
}

/// Bounding box of `ids`, or of every document module when `ids` is empty.
///
/// Only document modules with a placement contribute, so stale placements
/// never widen the box. `None` when nothing contributes.
#[must_use]
pub fn bounds_of(placements: &PlacementTable, doc: &GraphDocument, ids: &[ModuleId]) -> Option<Bounds> {
    if ids.is_empty() {
        placements.bounds_of(doc.module_ids())
    } else {
        placements.bounds_of(ids.iter().copied().filter(|id| doc.contains(*id)))
    }
}

//! Spatial index: where each module sits in graph space.
//!
//! Placements are owned by the canvas, not the document. They are created the
//! first time a module is painted (auto-flowed along a single row), survive
//! document refreshes, and are pruned by [`PlacementTable::reconcile`] once
//! their module disappears.
//!
//! Table order is paint order. Hit-testing scans it back to front, so the
//! topmost module wins where modules overlap, and [`PlacementTable::raise`]
//! brings a picked module to the top.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::trace;

use crate::camera::Point;
use crate::config::LayoutMetrics;
use crate::doc::{GraphDocument, ModuleId};
use crate::geometry::{Bounds, Size};
use crate::plugin::PluginInfo;

/// A module's box: top-left `origin` extending right by `size.w` and down by `size.h`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub id: ModuleId,
    pub origin: Point,
    pub size: Size,
}

impl Placement {
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::from_box(self.origin, self.size)
    }

    /// Strict interior test: `x0 < x < x0+w` and `y0-h < y < y0`.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }
}

/// Placements keyed by module id, in paint order.
#[derive(Debug, Clone, Default)]
pub struct PlacementTable {
    placements: IndexMap<ModuleId, Placement>,
}

impl PlacementTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: ModuleId) -> Option<&Placement> {
        self.placements.get(&id)
    }

    pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut Placement> {
        self.placements.get_mut(&id)
    }

    #[must_use]
    pub fn contains(&self, id: ModuleId) -> bool {
        self.placements.contains_key(&id)
    }

    /// Placements in paint order (bottom first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Placement> {
        self.placements.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Drop placements whose module is not in `ids`. Existing placements are
    /// untouched and nothing is created. Returns how many were dropped.
    pub fn reconcile<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = ModuleId>,
    {
        let live: HashSet<ModuleId> = ids.into_iter().collect();
        let before = self.placements.len();
        self.placements.retain(|id, _| live.contains(id));
        before - self.placements.len()
    }

    /// Return the placement for `id`, creating it at `default_origin` if the
    /// module has none yet. The size is refreshed either way since it derives
    /// from plug-in metadata that may have changed.
    pub fn ensure_placement(&mut self, id: ModuleId, default_origin: Point, size: Size) -> &Placement {
        let placement = self
            .placements
            .entry(id)
            .or_insert(Placement { id, origin: default_origin, size });
        placement.size = size;
        placement
    }

    /// The paint-time layout pass.
    ///
    /// Walks the document in order with a flow cursor starting at (0, 0). A
    /// module that already has a placement moves the cursor to its origin;
    /// one that has none is placed at the cursor. The cursor then steps right
    /// by `flow_pitch * module_width`, so new modules land just right of
    /// their predecessor. Returns how many placements were created.
    pub fn sync<P>(&mut self, doc: &GraphDocument, plugins: &P, metrics: &LayoutMetrics) -> usize
    where
        P: PluginInfo + ?Sized,
    {
        let mut cursor = Point::default();
        let mut created = 0;
        for module in &doc.modules {
            let size = Size::new(metrics.module_width, metrics.module_height(plugins.input_count(module.plugin)));
            let existed = self.contains(module.id);
            let origin = self.ensure_placement(module.id, cursor, size).origin;
            if existed {
                cursor = origin;
            } else {
                trace!(module = module.id, x = origin.x, y = origin.y, "seeded placement");
                created += 1;
            }
            cursor.x += metrics.flow_pitch * metrics.module_width;
        }
        created
    }

    /// Move a placement's origin by `delta`. Returns false for unknown ids.
    pub fn translate(&mut self, id: ModuleId, delta: Point) -> bool {
        let Some(placement) = self.placements.get_mut(&id) else {
            return false;
        };
        placement.origin = placement.origin + delta;
        true
    }

    /// Move `id` to the top of the paint order.
    pub fn raise(&mut self, id: ModuleId) {
        if let Some(index) = self.placements.get_index_of(&id) {
            let last = self.placements.len() - 1;
            self.placements.move_index(index, last);
        }
    }

    /// Topmost module whose box strictly contains `point`.
    #[must_use]
    pub fn module_at(&self, point: Point) -> Option<ModuleId> {
        self.placements.values().rev().find(|p| p.contains(point)).map(|p| p.id)
    }

    /// Bounding box of the given modules' placements; ids without one are skipped.
    #[must_use]
    pub fn bounds_of<I>(&self, ids: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = ModuleId>,
    {
        ids.into_iter()
            .filter_map(|id| self.get(id))
            .map(Placement::bounds)
            .reduce(Bounds::union)
    }
}

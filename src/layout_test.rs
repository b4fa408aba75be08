#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::ModuleRecord;
use crate::plugin::{InputKind, InputSpec, PluginCatalog, PluginDesc};

// =============================================================
// Helpers
// =============================================================

fn doc_of(ids: &[ModuleId]) -> GraphDocument {
    GraphDocument::new(ids.iter().map(|&id| ModuleRecord { id, plugin: 1, sets: Vec::new() }).collect())
}

fn two_input_catalog() -> PluginCatalog {
    let input = |name: &str| InputSpec { name: name.into(), kind: InputKind::Real64, range: None, enums: Vec::new() };
    PluginCatalog::new(vec![PluginDesc { id: 1, name: "p".into(), sink: false, inputs: vec![input("a"), input("b")] }])
}

fn unit() -> Size {
    Size::new(1.0, 1.0)
}

fn table_with(entries: &[(ModuleId, f64, f64)]) -> PlacementTable {
    let mut table = PlacementTable::new();
    for &(id, x, y) in entries {
        table.ensure_placement(id, Point::new(x, y), unit());
    }
    table
}

// =============================================================
// ensure_placement
// =============================================================

#[test]
fn ensure_creates_at_default_origin() {
    let mut table = PlacementTable::new();
    let p = *table.ensure_placement(3, Point::new(2.0, -1.0), unit());
    assert_eq!(p.id, 3);
    assert_eq!(p.origin, Point::new(2.0, -1.0));
    assert_eq!(table.len(), 1);
}

#[test]
fn ensure_keeps_origin_and_refreshes_size() {
    let mut table = table_with(&[(3, 2.0, -1.0)]);
    let p = *table.ensure_placement(3, Point::new(9.0, 9.0), Size::new(1.0, 2.0));
    assert_eq!(p.origin, Point::new(2.0, -1.0));
    assert_eq!(p.size, Size::new(1.0, 2.0));
}

// =============================================================
// reconcile
// =============================================================

#[test]
fn reconcile_drops_absent_and_keeps_present() {
    let mut table = table_with(&[(1, 0.0, 0.0), (2, 5.0, 0.0), (3, 9.0, 0.0)]);
    assert_eq!(table.reconcile([1, 3]), 1);
    assert!(!table.contains(2));
    assert_eq!(table.get(3).map(|p| p.origin), Some(Point::new(9.0, 0.0)));
}

#[test]
fn reconcile_never_creates() {
    let mut table = table_with(&[(1, 0.0, 0.0)]);
    table.reconcile([1, 2, 3]);
    assert_eq!(table.len(), 1);
}

#[test]
fn reconcile_is_idempotent() {
    let mut table = table_with(&[(1, 0.0, 0.0), (2, 5.0, 0.0), (3, 9.0, 0.0)]);
    table.reconcile([3, 1]);
    let once: Vec<Placement> = table.iter().copied().collect();
    assert_eq!(table.reconcile([3, 1]), 0);
    let twice: Vec<Placement> = table.iter().copied().collect();
    assert_eq!(once, twice);
}

// =============================================================
// sync (auto-flow)
// =============================================================

#[test]
fn sync_flows_new_modules_along_a_row() {
    let mut table = PlacementTable::new();
    let created = table.sync(&doc_of(&[0, 1, 2]), &two_input_catalog(), &LayoutMetrics::default());
    assert_eq!(created, 3);
    let xs: Vec<f64> = table.iter().map(|p| p.origin.x).collect();
    assert!((xs[1] - 1.1).abs() < 1e-12);
    assert!((xs[2] - 2.2).abs() < 1e-12);
    assert!(table.iter().all(|p| p.origin.y == 0.0));
}

#[test]
fn sync_sizes_from_input_count() {
    let mut table = PlacementTable::new();
    table.sync(&doc_of(&[0]), &two_input_catalog(), &LayoutMetrics::default());
    let Some(p) = table.get(0) else {
        panic!("no placement seeded");
    };
    assert_eq!(p.size.w, 1.0);
    assert!((p.size.h - (0.40 + 2.0 * 0.38)).abs() < 1e-12);
}

#[test]
fn sync_places_newcomer_after_moved_predecessor() {
    let mut table = table_with(&[(0, 5.0, 3.0)]);
    table.sync(&doc_of(&[0, 1]), &two_input_catalog(), &LayoutMetrics::default());
    let Some(p) = table.get(1) else {
        panic!("no placement seeded");
    };
    assert!((p.origin.x - 6.1).abs() < 1e-12);
    assert_eq!(p.origin.y, 3.0);
}

#[test]
fn sync_leaves_existing_origins_alone() {
    let mut table = PlacementTable::new();
    let doc = doc_of(&[0, 1]);
    let catalog = two_input_catalog();
    table.sync(&doc, &catalog, &LayoutMetrics::default());
    table.translate(1, Point::new(0.0, -4.0));
    assert_eq!(table.sync(&doc, &catalog, &LayoutMetrics::default()), 0);
    assert_eq!(table.get(1).map(|p| p.origin.y), Some(-4.0));
}

// =============================================================
// Hit scan and paint order
// =============================================================

#[test]
fn module_at_is_strict() {
    let table = table_with(&[(1, 0.0, 0.0)]);
    assert_eq!(table.module_at(Point::new(0.5, -0.5)), Some(1));
    assert_eq!(table.module_at(Point::new(0.0, -0.5)), None);
    assert_eq!(table.module_at(Point::new(0.5, -1.0)), None);
}

#[test]
fn disjoint_placements_never_share_a_point() {
    let table = table_with(&[(1, 0.0, 0.0), (2, 1.1, 0.0), (3, 0.0, -1.5)]);
    for i in 0..40 {
        for j in 0..40 {
            let p = Point::new(f64::from(i) * 0.06, -f64::from(j) * 0.07);
            let hits = table.iter().filter(|pl| pl.contains(p)).count();
            assert!(hits <= 1, "{p:?} hit {hits} placements");
        }
    }
}

#[test]
fn overlap_resolves_to_topmost() {
    let mut table = table_with(&[(1, 0.0, 0.0), (2, 0.5, 0.0)]);
    let overlap = Point::new(0.75, -0.5);
    assert_eq!(table.module_at(overlap), Some(2));
    table.raise(1);
    assert_eq!(table.module_at(overlap), Some(1));
    assert_eq!(table.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 1]);
}

#[test]
fn translate_unknown_is_false() {
    let mut table = table_with(&[(1, 0.0, 0.0)]);
    assert!(table.translate(1, Point::new(1.0, 1.0)));
    assert!(!table.translate(7, Point::new(1.0, 1.0)));
    assert_eq!(table.get(1).map(|p| p.origin), Some(Point::new(1.0, 1.0)));
}

#[test]
fn bounds_of_skips_unplaced() {
    let table = table_with(&[(1, 0.0, 0.0), (2, 3.0, 2.0)]);
    let Some(b) = table.bounds_of([1, 2, 9]) else {
        panic!("expected bounds");
    };
    assert_eq!(b.min, Point::new(0.0, -1.0));
    assert_eq!(b.max, Point::new(4.0, 2.0));
    assert!(table.bounds_of([9]).is_none());
}

use super::*;

// =============================================================
// Helpers
// =============================================================

fn module(id: ModuleId, plugin: PluginId, sets: Vec<SetRecord>) -> ModuleRecord {
    ModuleRecord { id, plugin, sets }
}

fn link(input: usize, source: ModuleId) -> SetRecord {
    SetRecord { input, value: InputValue::Module(source) }
}

fn sample() -> GraphDocument {
    GraphDocument::new(vec![
        module(0, 1, Vec::new()),
        module(1, 1, vec![SetRecord { input: 0, value: InputValue::Real64(2.5) }, link(1, 0)]),
        module(4, 2, vec![link(0, 1)]),
    ])
}

// =============================================================
// Queries
// =============================================================

#[test]
fn module_ids_in_document_order() {
    assert_eq!(sample().module_ids().collect::<Vec<_>>(), vec![0, 1, 4]);
}

#[test]
fn plugin_of_known_and_unknown() {
    let doc = sample();
    assert_eq!(doc.plugin_of(4), Some(2));
    assert_eq!(doc.plugin_of(9), None);
    assert!(!doc.contains(9));
}

#[test]
fn inbound_edges_only_module_values() {
    let doc = sample();
    assert_eq!(doc.inbound_edges(1), vec![InboundEdge { source: 0, input: 1 }]);
    assert!(doc.inbound_edges(0).is_empty());
}

#[test]
fn inbound_edges_of_unknown_module_is_empty() {
    assert!(sample().inbound_edges(42).is_empty());
}

#[test]
fn input_value_lookup() {
    let doc = sample();
    assert_eq!(doc.input_value(1, 0), Some(&InputValue::Real64(2.5)));
    assert_eq!(doc.input_value(1, 3), None);
}

// =============================================================
// JSON
// =============================================================

#[test]
fn from_json_decodes_tagged_values() {
    let text = r#"{"modules": [
        {"id": 3, "plugin": 1, "sets": [
            {"input": 0, "value": {"type": "real64_vec3", "value": [1.0, 2.0, 3.0]}},
            {"input": 1, "value": {"type": "module", "value": 0}}
        ]},
        {"id": 0, "plugin": 2}
    ]}"#;
    let Ok(doc) = GraphDocument::from_json(text) else {
        panic!("document rejected");
    };
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.input_value(3, 0), Some(&InputValue::Real64Vec3([1.0, 2.0, 3.0])));
    assert_eq!(doc.inbound_edges(3), vec![InboundEdge { source: 0, input: 1 }]);
    assert!(doc.module(0).is_some_and(|m| m.sets.is_empty()));
}

#[test]
fn from_json_rejects_garbage() {
    assert!(matches!(GraphDocument::from_json("[1, 2"), Err(CanvasError::Json(_))));
}

#[test]
fn intent_serializes_with_op_tag() {
    let intent = Intent::ConnectInput { graph: 1, module: 2, input: 0, source: 3 };
    let Ok(value) = serde_json::to_value(&intent) else {
        panic!("intent failed to serialize");
    };
    assert_eq!(
        value,
        serde_json::json!({"op": "connect_input", "graph": 1, "module": 2, "input": 0, "source": 3})
    );
}

// =============================================================
// Loopback apply
// =============================================================

#[test]
fn apply_create_uses_next_id() {
    let mut doc = sample();
    assert!(doc.apply(&Intent::CreateModule { graph: 0, plugin: 3 }));
    assert_eq!(doc.modules.last().map(|m| (m.id, m.plugin)), Some((5, 3)));
}

#[test]
fn apply_create_on_empty_starts_at_zero() {
    let mut doc = GraphDocument::default();
    doc.apply(&Intent::CreateModule { graph: 0, plugin: 1 });
    assert_eq!(doc.module_ids().collect::<Vec<_>>(), vec![0]);
}

#[test]
fn apply_destroy_leaves_dangling_references() {
    let mut doc = sample();
    assert!(doc.apply(&Intent::DestroyModule { graph: 0, module: 0 }));
    assert!(!doc.contains(0));
    assert_eq!(doc.inbound_edges(1), vec![InboundEdge { source: 0, input: 1 }]);
    assert!(!doc.apply(&Intent::DestroyModule { graph: 0, module: 0 }));
}

#[test]
fn apply_connect_replaces_existing_binding() {
    let mut doc = sample();
    doc.apply(&Intent::ConnectInput { graph: 0, module: 1, input: 0, source: 4 });
    assert_eq!(doc.input_value(1, 0), Some(&InputValue::Module(4)));
    assert_eq!(doc.module(1).map(|m| m.sets.len()), Some(2));
}

#[test]
fn apply_set_then_clear() {
    let mut doc = sample();
    let set = Intent::SetInput { graph: 0, module: 0, input: 2, value: InputValue::Boolean(true) };
    assert!(doc.apply(&set));
    assert_eq!(doc.input_value(0, 2), Some(&InputValue::Boolean(true)));
    assert!(doc.apply(&Intent::ClearInput { graph: 0, module: 0, input: 2 }));
    assert_eq!(doc.input_value(0, 2), None);
    assert!(!doc.apply(&Intent::ClearInput { graph: 0, module: 0, input: 2 }));
}

#[test]
fn apply_to_unknown_module_is_noop() {
    let mut doc = sample();
    let before = doc.clone();
    assert!(!doc.apply(&Intent::ConnectInput { graph: 0, module: 77, input: 0, source: 0 }));
    assert_eq!(doc, before);
}

#[test]
fn scalar_views() {
    assert_eq!(InputValue::Uint32(3).as_scalar(), Some(3.0));
    assert_eq!(InputValue::Real32(0.5).as_scalar(), Some(0.5));
    assert_eq!(InputValue::String("x".into()).as_scalar(), None);
}

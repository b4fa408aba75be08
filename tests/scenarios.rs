//! End-to-end flows through the public API: a host binding a graph, feeding
//! pointer input, and looping intents back through a local document.
#![allow(clippy::float_cmp)]

use graph_canvas::arrange::Axis;
use graph_canvas::camera::Point;
use graph_canvas::doc::{GraphDocument, InboundEdge, Intent, ModuleId};
use graph_canvas::engine::{Action, EngineCore};
use graph_canvas::input::{Button, Modifiers, WheelDelta};
use graph_canvas::plugin::PluginCatalog;

const GRAPH: u32 = 1;

const CATALOG: &str = r#"{
    "plugins": [
        {"id": 10, "name": "sphere", "inputs": [
            {"name": "radius", "kind": "real64", "range": {"min": 0.0}},
            {"name": "center", "kind": "real64_vec3"}
        ]},
        {"id": 11, "name": "transform", "inputs": [
            {"name": "matrix", "kind": "real64_vec4"},
            {"name": "geometry", "kind": "module"}
        ]},
        {"id": 2, "name": "node-output", "sink": true, "inputs": [
            {"name": "input", "kind": "module"}
        ]}
    ]
}"#;

const DOCUMENT: &str = r#"{
    "modules": [
        {"id": 0, "plugin": 10},
        {"id": 1, "plugin": 11},
        {"id": 2, "plugin": 2}
    ]
}"#;

fn init_tracing() {
    // Another test may have installed the subscriber already.
    let _ = tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).with_test_writer().try_init();
}

/// Host state: the canvas plus the local document standing in for the engine.
struct Host {
    canvas: EngineCore,
    doc: GraphDocument,
    selections: Vec<Vec<ModuleId>>,
}

impl Host {
    fn new() -> Self {
        init_tracing();
        let Ok(doc) = GraphDocument::from_json(DOCUMENT) else {
            panic!("document fixture rejected");
        };
        let Ok(plugins) = PluginCatalog::from_json(CATALOG) else {
            panic!("catalog fixture rejected");
        };
        let mut canvas = EngineCore::new();
        canvas.set_viewport(800.0, 600.0, 1.0);
        canvas.set_plugins(plugins);
        let mut host = Self { canvas, doc: doc.clone(), selections: Vec::new() };
        let actions = host.canvas.set_graph(GRAPH, doc);
        host.process(actions);
        host
    }

    /// Forward intents to the local document and refresh the canvas, the way
    /// a host relays them to the engine and waits for its update.
    fn process(&mut self, actions: Vec<Action>) {
        let mut changed = false;
        for action in actions {
            match action {
                Action::Intent(intent) => changed |= self.doc.apply(&intent),
                Action::SelectionChanged(ids) => self.selections.push(ids),
                Action::RenderNeeded => {}
            }
        }
        if changed {
            let refresh = self.canvas.set_graph(GRAPH, self.doc.clone());
            self.process(refresh);
        }
    }

    fn screen(&self, gx: f64, gy: f64) -> Point {
        self.canvas.camera().graph_to_screen(Point::new(gx, gy), 800.0, 600.0)
    }

    fn press(&mut self, gx: f64, gy: f64, modifiers: Modifiers) {
        let at = self.screen(gx, gy);
        let actions = self.canvas.on_pointer_down(at, Button::Primary, modifiers);
        self.process(actions);
    }

    fn drag_to(&mut self, gx: f64, gy: f64) {
        let at = self.screen(gx, gy);
        let actions = self.canvas.on_pointer_move(at, Modifiers::default());
        self.process(actions);
    }

    fn release(&mut self, gx: f64, gy: f64) {
        let at = self.screen(gx, gy);
        let actions = self.canvas.on_pointer_up(at, Button::Primary, Modifiers::default());
        self.process(actions);
    }

    fn click(&mut self, gx: f64, gy: f64, modifiers: Modifiers) {
        self.press(gx, gy, modifiers);
        self.release(gx, gy);
    }

    fn origin_x(&self, id: ModuleId) -> f64 {
        self.canvas.placement(id).map_or(f64::NAN, |p| p.origin.x)
    }
}

fn shift() -> Modifiers {
    Modifiers { shift: true, ..Modifiers::default() }
}

#[test]
fn connect_output_to_input_round_trips_through_document() {
    let mut host = Host::new();
    assert!((host.origin_x(1) - 1.1).abs() < 1e-9);

    // Sphere's output arrow, then the transform's second input row.
    host.press(0.95, -0.2, Modifiers::default());
    host.drag_to(1.6, -0.6);
    host.drag_to(1.6, -0.9);
    host.release(1.6, -0.9);

    assert_eq!(host.doc.inbound_edges(1), vec![InboundEdge { source: 0, input: 1 }]);
    assert_eq!(host.canvas.doc().inbound_edges(1), vec![InboundEdge { source: 0, input: 1 }]);
    assert!(host.canvas.state().is_idle());
}

#[test]
fn connected_graph_draws_the_curve() {
    let mut host = Host::new();
    host.press(0.95, -0.2, Modifiers::default());
    host.drag_to(1.6, -0.9);
    host.release(1.6, -0.9);

    let frame = host.canvas.frame();
    let curves: Vec<&[Point]> = frame.scene.polylines().filter(|p| p.len() == 13).collect();
    assert_eq!(curves.len(), 1);
    assert!((curves[0][0].x - 1.0).abs() < 1e-9);
    assert!((curves[0][12].x - 1.1).abs() < 1e-9);
}

#[test]
fn distribute_centres_middle_module() {
    let mut host = Host::new();
    if let Some(p) = host.canvas.placement_mut(2) {
        p.origin = Point::new(10.0, 0.0);
    }
    host.click(0.3, -0.2, Modifiers::default());
    host.click(1.4, -0.2, shift());
    host.click(10.3, -0.2, shift());
    assert_eq!(host.canvas.selection().to_vec(), vec![0, 1, 2]);

    let actions = host.canvas.distribute(Axis::Horizontal);
    host.process(actions);
    assert!((host.origin_x(1) - 5.0).abs() < 1e-9);
    assert_eq!(host.origin_x(0), 0.0);
    assert_eq!(host.origin_x(2), 10.0);
}

#[test]
fn empty_click_clears_selection_exactly_once() {
    let mut host = Host::new();
    host.click(0.3, -0.2, Modifiers::default());
    assert_eq!(host.selections, vec![vec![0]]);

    host.click(-0.5, 0.5, Modifiers::default());
    assert_eq!(host.selections, vec![vec![0], Vec::new()]);
    assert!(host.canvas.selection().is_empty());
}

#[test]
fn destroy_selection_removes_modules_and_their_placements() {
    let mut host = Host::new();
    host.click(1.4, -0.2, Modifiers::default());
    let actions = host.canvas.destroy_selection();
    host.process(actions);

    assert!(!host.doc.contains(1));
    assert!(host.canvas.placement(1).is_none());
    assert_eq!(host.selections.last(), Some(&Vec::new()));
}

#[test]
fn created_module_flows_in_after_the_last() {
    let mut host = Host::new();
    let actions = host.canvas.create_module(10);
    assert!(matches!(actions.as_slice(), [Action::Intent(Intent::CreateModule { graph: GRAPH, plugin: 10 })]));
    host.process(actions);

    assert!((host.origin_x(3) - 3.3).abs() < 1e-9);
}

#[test]
fn zoom_is_clamped_and_settles() {
    let mut host = Host::new();
    for _ in 0..300 {
        let actions = host.canvas.on_wheel(Point::new(400.0, 300.0), WheelDelta { dx: 0.0, dy: -1.0 }, Modifiers::default());
        host.process(actions);
    }
    assert_eq!(host.canvas.camera().zoom_target, 10.0);

    let mut frames = 0;
    while host.canvas.frame().keep_ticking {
        frames += 1;
        assert!(frames < 200, "camera failed to settle");
    }
    assert_eq!(host.canvas.camera().zoom_current, 10.0);
    assert!(!host.canvas.camera().is_converging());
}

#[test]
fn zoom_to_fit_frames_whole_graph() {
    let mut host = Host::new();
    let actions = host.canvas.zoom_to_fit();
    host.process(actions);
    while host.canvas.frame().keep_ticking {}

    // Every module's top-left corner lands inside the viewport.
    for id in 0..3 {
        let Some(p) = host.canvas.placement(id).copied() else {
            panic!("module {id} has no placement");
        };
        let s = host.canvas.camera().graph_to_screen(p.origin, 800.0, 600.0);
        assert!(s.x >= 0.0 && s.x <= 800.0 && s.y >= 0.0 && s.y <= 600.0, "{id} at {s:?}");
    }
}

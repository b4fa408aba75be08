#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info};

use crate::arrange::{self, Axis, Edge};
use crate::camera::{Camera, Point};
use crate::config::CanvasConfig;
use crate::doc::{GraphDocument, GraphId, InputValue, Intent, ModuleId};
use crate::error::CanvasError;
use crate::hit::{self, Hit, HitPart, PortRef};
use crate::input::{Button, DragPoints, InteractionState, Modifiers, WheelDelta};
use crate::layout::{Placement, PlacementTable};
use crate::plugin::{InputKind, PluginCatalog, PluginId, PluginInfo};
use crate::render::{self, Scene, SceneSource};
use crate::selection::Selection;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// An edit for the engine. The canvas does not apply it; the host
    /// forwards it and later calls [`EngineCore::set_graph`] with the result.
    Intent(Intent),
    /// The selection changed; carries the new selection in order.
    SelectionChanged(Vec<ModuleId>),
    RenderNeeded,
}

/// Output of one [`EngineCore::frame`] call.
#[derive(Debug, Clone)]
pub struct Frame {
    pub scene: Scene,
    /// Camera to draw the scene through.
    pub camera: Camera,
    /// The camera is still converging; schedule another frame.
    pub keep_ticking: bool,
}

/// Core engine state: all logic that doesn't depend on a canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    config: CanvasConfig,
    graph: Option<GraphId>,
    doc: GraphDocument,
    plugins: PluginCatalog,
    placements: PlacementTable,
    selection: Selection,
    state: InteractionState,
    pub camera: Camera,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(CanvasConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a core from an already validated configuration.
    #[must_use]
    pub fn with_config(config: CanvasConfig) -> Self {
        Self {
            config,
            graph: None,
            doc: GraphDocument::default(),
            plugins: PluginCatalog::default(),
            placements: PlacementTable::new(),
            selection: Selection::new(),
            state: InteractionState::Idle,
            camera: Camera::new(config.camera),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }

    // --- Data inputs ---

    /// Bind a graph, or refresh the bound one with a new document.
    ///
    /// Placements of vanished modules are pruned and new ones are flowed in;
    /// the selection loses vanished members. A gesture in progress survives
    /// unless what it drags is gone. Switching to a different graph starts
    /// from an empty layout and selection.
    pub fn set_graph(&mut self, graph: GraphId, doc: GraphDocument) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.graph.is_some_and(|g| g != graph) {
            self.placements = PlacementTable::new();
            if self.selection.clear() {
                actions.push(Action::SelectionChanged(Vec::new()));
            }
            self.transition(InteractionState::Idle);
        }
        self.graph = Some(graph);
        self.doc = doc;

        let pruned = self.placements.reconcile(self.doc.module_ids());
        let doc = &self.doc;
        if self.selection.retain(|id| doc.contains(id)) {
            actions.push(Action::SelectionChanged(self.selection.to_vec()));
        }
        self.degrade_gesture();
        let seeded = self.placements.sync(&self.doc, &self.plugins, &self.config.layout);

        info!(graph, modules = self.doc.len(), pruned, seeded, "graph bound");
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Replace the plug-in catalog. Module sizes follow on the next layout pass.
    pub fn set_plugins(&mut self, plugins: PluginCatalog) -> Vec<Action> {
        self.plugins = plugins;
        self.placements.sync(&self.doc, &self.plugins, &self.config.layout);
        vec![Action::RenderNeeded]
    }

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if !self.state.is_idle() {
            return Vec::new();
        }
        let drag = DragPoints::at(screen_pt);
        match button {
            Button::Secondary => return Vec::new(),
            Button::Middle => {
                self.transition(InteractionState::Panning { drag });
                return Vec::new();
            }
            Button::Primary if modifiers.pans() => {
                self.transition(InteractionState::Panning { drag });
                return Vec::new();
            }
            Button::Primary => {}
        }

        let point = self.to_graph(screen_pt);
        match hit::hit_test(&self.placements, &self.doc, &self.plugins, &self.config.layout, point) {
            Some(Hit { module, part: HitPart::Output }) => {
                self.transition(InteractionState::ConnectingOutput { source: module, drag, hover: None });
                vec![Action::RenderNeeded]
            }
            Some(Hit { module, .. }) => {
                if modifiers.extends_selection() {
                    self.selection.toggle(module);
                } else {
                    self.selection.replace(module);
                }
                self.placements.raise(module);
                self.transition(InteractionState::MovingSelection { drag });
                vec![Action::SelectionChanged(self.selection.to_vec()), Action::RenderNeeded]
            }
            None => {
                if modifiers.extends_selection() || !self.selection.clear() {
                    return Vec::new();
                }
                vec![Action::SelectionChanged(Vec::new()), Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let (vw, vh) = (self.viewport_width, self.viewport_height);
        match &mut self.state {
            InteractionState::Idle => Vec::new(),
            InteractionState::Panning { drag } => {
                let prev = drag.advance(screen_pt);
                let delta = self.camera.screen_delta_to_graph(prev, screen_pt, vw, vh);
                self.camera.pan_by(delta);
                vec![Action::RenderNeeded]
            }
            InteractionState::MovingSelection { drag } => {
                let prev = drag.advance(screen_pt);
                let delta = self.camera.screen_delta_to_graph(prev, screen_pt, vw, vh);
                for id in self.selection.iter() {
                    self.placements.translate(id, delta);
                }
                vec![Action::RenderNeeded]
            }
            InteractionState::ConnectingOutput { drag, hover, .. } => {
                drag.advance(screen_pt);
                let point = self.camera.screen_to_graph(screen_pt, vw, vh);
                *hover = hit::port_at(&self.placements, &self.doc, &self.plugins, &self.config.layout, point);
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let finished = std::mem::take(&mut self.state);
        if finished.is_idle() {
            return Vec::new();
        }
        debug!(from = finished.name(), to = "idle", "interaction transition");

        let mut actions = Vec::new();
        if let (InteractionState::ConnectingOutput { source, hover: Some(port), .. }, Some(graph)) =
            (&finished, self.graph)
        {
            let intent = Intent::ConnectInput { graph, module: port.module, input: port.input, source: *source };
            debug!(?intent, "connect requested");
            actions.push(Action::Intent(intent));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Scrolling up zooms in by one wheel step, down zooms out.
    pub fn on_wheel(&mut self, _screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        let step = self.camera.settings().wheel_step;
        if delta.dy < 0.0 {
            self.camera.zoom_step(step);
        } else if delta.dy > 0.0 {
            self.camera.zoom_step(-step);
        } else {
            return Vec::new();
        }
        vec![Action::RenderNeeded]
    }

    // --- Camera commands ---

    pub fn zoom_step(&mut self, delta: f64) -> Vec<Action> {
        self.camera.zoom_step(delta);
        vec![Action::RenderNeeded]
    }

    pub fn zoom_normal(&mut self) -> Vec<Action> {
        self.camera.zoom_normal();
        vec![Action::RenderNeeded]
    }

    /// Fit the selection, or the whole graph when nothing is selected.
    /// Does nothing when no module has a placement.
    pub fn zoom_to_fit(&mut self) -> Vec<Action> {
        let ids = self.selection.to_vec();
        let Some(bounds) = arrange::bounds_of(&self.placements, &self.doc, &ids) else {
            return Vec::new();
        };
        self.camera.zoom_to_fit(bounds);
        debug!(zoom = self.camera.zoom_target, "zoom to fit");
        vec![Action::RenderNeeded]
    }

    // --- Selection transforms ---

    pub fn align(&mut self, edge: Edge) -> Vec<Action> {
        let moved = arrange::align(&mut self.placements, &self.selection, edge);
        debug!(?edge, moved, "align selection");
        if moved == 0 { Vec::new() } else { vec![Action::RenderNeeded] }
    }

    pub fn distribute(&mut self, axis: Axis) -> Vec<Action> {
        let moved = arrange::distribute(&mut self.placements, &self.selection, axis);
        debug!(?axis, moved, "distribute selection");
        if moved == 0 { Vec::new() } else { vec![Action::RenderNeeded] }
    }

    // --- Edits ---

    /// Request a new module. Nothing is emitted until a graph is bound.
    pub fn create_module(&mut self, plugin: PluginId) -> Vec<Action> {
        let Some(graph) = self.graph else {
            return Vec::new();
        };
        let intent = Intent::CreateModule { graph, plugin };
        debug!(?intent, "create requested");
        vec![Action::Intent(intent)]
    }

    /// Request destruction of every selected module and clear the selection.
    pub fn destroy_selection(&mut self) -> Vec<Action> {
        let Some(graph) = self.graph else {
            return Vec::new();
        };
        if self.selection.is_empty() {
            return Vec::new();
        }
        let mut actions: Vec<Action> = self
            .selection
            .iter()
            .map(|module| Action::Intent(Intent::DestroyModule { graph, module }))
            .collect();
        debug!(count = actions.len(), "destroy requested");
        self.selection.clear();
        actions.push(Action::SelectionChanged(Vec::new()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Request a new value for one input, checked against the plug-in's
    /// input schema first.
    ///
    /// # Errors
    ///
    /// Returns `NoGraph` before a graph is bound, `ModuleNotFound` for an
    /// unknown module (or unknown connection source), `InputOutOfRange` past
    /// the plug-in's inputs, `InputKindMismatch` when the value has the wrong
    /// kind, and `InputValueRejected` when it falls outside the input's range
    /// or enum.
    pub fn set_input(&self, module: ModuleId, input: usize, value: InputValue) -> Result<Action, CanvasError> {
        let graph = self.graph.ok_or(CanvasError::NoGraph)?;
        let plugin = self.checked_input(module, input)?;
        if let Some(spec) = self.plugins.input(plugin, input) {
            if !spec.kind.matches(&value) {
                return Err(CanvasError::InputKindMismatch { module, input, expected: spec.kind });
            }
            if !spec.accepts(&value) {
                return Err(CanvasError::InputValueRejected { module, input });
            }
        }
        if let InputValue::Module(source) = value
            && !self.doc.contains(source)
        {
            return Err(CanvasError::ModuleNotFound(source));
        }

        let intent = match value {
            InputValue::Module(source) => Intent::ConnectInput { graph, module, input, source },
            value => Intent::SetInput { graph, module, input, value },
        };
        debug!(?intent, "input edit requested");
        Ok(Action::Intent(intent))
    }

    /// Request that an input return to its default (unbound) state.
    ///
    /// # Errors
    ///
    /// Same lookup errors as [`EngineCore::set_input`].
    pub fn clear_input(&self, module: ModuleId, input: usize) -> Result<Action, CanvasError> {
        let graph = self.graph.ok_or(CanvasError::NoGraph)?;
        self.checked_input(module, input)?;
        Ok(Action::Intent(Intent::ClearInput { graph, module, input }))
    }

    fn checked_input(&self, module: ModuleId, input: usize) -> Result<PluginId, CanvasError> {
        let plugin = self.doc.plugin_of(module).ok_or(CanvasError::ModuleNotFound(module))?;
        let count = self.plugins.input_count(plugin);
        if input >= count {
            return Err(CanvasError::InputOutOfRange { module, input, count });
        }
        Ok(plugin)
    }

    // --- Render ---

    /// Run the layout pass, advance the camera, and build the display list.
    pub fn frame(&mut self) -> Frame {
        self.placements.sync(&self.doc, &self.plugins, &self.config.layout);
        let keep_ticking = self.camera.tick();
        let pointer = self.state.drag().map(|d| self.to_graph(d.current));
        let scene = render::build_scene(&SceneSource {
            doc: &self.doc,
            plugins: &self.plugins,
            placements: &self.placements,
            selection: &self.selection,
            state: &self.state,
            pointer,
            config: &self.config,
        });
        Frame { scene, camera: self.camera, keep_ticking }
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn placement(&self, id: ModuleId) -> Option<&Placement> {
        self.placements.get(id)
    }

    /// Mutable placement, for hosts that restore a saved layout.
    pub fn placement_mut(&mut self, id: ModuleId) -> Option<&mut Placement> {
        self.placements.get_mut(id)
    }

    #[must_use]
    pub fn hover(&self) -> Option<PortRef> {
        self.state.hover()
    }

    #[must_use]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    #[must_use]
    pub fn graph(&self) -> Option<GraphId> {
        self.graph
    }

    #[must_use]
    pub fn doc(&self) -> &GraphDocument {
        &self.doc
    }

    #[must_use]
    pub fn plugins(&self) -> &PluginCatalog {
        &self.plugins
    }

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Kind of an input as the catalog describes it.
    #[must_use]
    pub fn input_kind(&self, module: ModuleId, input: usize) -> Option<InputKind> {
        let plugin = self.doc.plugin_of(module)?;
        self.plugins.input(plugin, input).map(|spec| spec.kind)
    }

    // --- Internals ---

    fn to_graph(&self, screen: Point) -> Point {
        self.camera.screen_to_graph(screen, self.viewport_width, self.viewport_height)
    }

    fn transition(&mut self, next: InteractionState) {
        if self.state.name() != next.name() {
            debug!(from = self.state.name(), to = next.name(), "interaction transition");
        }
        self.state = next;
    }

    /// Fit the gesture in progress to a refreshed document.
    fn degrade_gesture(&mut self) {
        let next = match &self.state {
            InteractionState::ConnectingOutput { source, .. } if !self.doc.contains(*source) => {
                Some(InteractionState::Idle)
            }
            InteractionState::ConnectingOutput { source, drag, hover: Some(port) }
                if !self.doc.contains(port.module) =>
            {
                Some(InteractionState::ConnectingOutput { source: *source, drag: *drag, hover: None })
            }
            InteractionState::MovingSelection { .. } if self.selection.is_empty() => Some(InteractionState::Idle),
            _ => None,
        };
        if let Some(next) = next {
            self.transition(next);
        }
    }
}

// =============================================================
// Browser wrapper
// =============================================================

#[cfg(feature = "web")]
pub use web::Engine;

#[cfg(feature = "web")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use super::{Action, EngineCore};
    use crate::camera::Point;
    use crate::config::CanvasConfig;
    use crate::doc::{GraphDocument, GraphId};
    use crate::input::{Button, Modifiers, WheelDelta};
    use crate::plugin::PluginCatalog;
    use crate::render;

    /// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
    pub struct Engine {
        canvas: HtmlCanvasElement,
        pub core: EngineCore,
    }

    impl Engine {
        #[must_use]
        pub fn new(canvas: HtmlCanvasElement, config: CanvasConfig) -> Self {
            Self { canvas, core: EngineCore::with_config(config) }
        }

        pub fn set_graph(&mut self, graph: GraphId, doc: GraphDocument) -> Vec<Action> {
            self.core.set_graph(graph, doc)
        }

        pub fn set_plugins(&mut self, plugins: PluginCatalog) -> Vec<Action> {
            self.core.set_plugins(plugins)
        }

        /// Update viewport dimensions and resize the backing store to device pixels.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
            self.core.set_viewport(width_css, height_css, dpr);
            self.canvas.set_width((width_css * dpr).round().max(1.0) as u32);
            self.canvas.set_height((height_css * dpr).round().max(1.0) as u32);
        }

        pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
            self.core.on_pointer_down(screen_pt, button, modifiers)
        }

        pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
            self.core.on_pointer_move(screen_pt, modifiers)
        }

        pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
            self.core.on_pointer_up(screen_pt, button, modifiers)
        }

        pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
            self.core.on_wheel(screen_pt, delta, modifiers)
        }

        /// Draw one frame. Returns whether the host should request another.
        ///
        /// # Errors
        ///
        /// Returns `Err` if the 2D context is unavailable or a draw call fails.
        pub fn render(&mut self) -> Result<bool, JsValue> {
            let frame = self.core.frame();
            let ctx = self.context()?;
            render::paint(
                &ctx,
                &frame.scene,
                &frame.camera,
                self.core.viewport_width,
                self.core.viewport_height,
                self.core.dpr,
            )?;
            Ok(frame.keep_ticking)
        }

        fn context(&self) -> Result<CanvasRenderingContext2d, JsValue> {
            self.canvas
                .get_context("2d")?
                .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
                .dyn_into::<CanvasRenderingContext2d>()
                .map_err(JsValue::from)
        }
    }
}

//! Document model: the engine-owned graph as the canvas receives it, and the
//! edit intents the canvas sends back.
//!
//! The canvas never mutates a [`GraphDocument`] it has been given; it reads
//! module ids, plug-in references and inbound edges from it. Edits travel the
//! other way as [`Intent`]s. [`GraphDocument::apply`] exists for hosts that
//! need a local loopback standing in for the engine (offline use, tests).

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};

use crate::error::CanvasError;
use crate::plugin::PluginId;

/// Identifier of a module within a graph, assigned by the engine.
pub type ModuleId = u32;

/// Identifier of a graph, assigned by the engine.
pub type GraphId = u32;

/// A value bound to a module input, tagged by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InputValue {
    Boolean(bool),
    Uint32(u32),
    Real32(f32),
    Real64(f64),
    Real64Vec3([f64; 3]),
    Real64Vec4([f64; 4]),
    /// Connection from another module's output.
    Module(ModuleId),
    String(String),
}

impl InputValue {
    /// Numeric value of a scalar input, for range checks.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Uint32(v) => Some(f64::from(*v)),
            Self::Real32(v) => Some(f64::from(*v)),
            Self::Real64(v) => Some(*v),
            _ => None,
        }
    }
}

/// Binding of one input to a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    pub input: usize,
    pub value: InputValue,
}

/// A module as listed in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub id: ModuleId,
    pub plugin: PluginId,
    #[serde(default)]
    pub sets: Vec<SetRecord>,
}

/// An edge into a module: `source`'s output feeds input `input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEdge {
    pub source: ModuleId,
    pub input: usize,
}

/// The graph document, modules in engine order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
}

/// An edit request for the engine. The canvas emits these; it never applies them itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Intent {
    CreateModule { graph: GraphId, plugin: PluginId },
    DestroyModule { graph: GraphId, module: ModuleId },
    SetInput { graph: GraphId, module: ModuleId, input: usize, value: InputValue },
    ClearInput { graph: GraphId, module: ModuleId, input: usize },
    /// Feed `source`'s output into input `input` of `module`.
    ConnectInput { graph: GraphId, module: ModuleId, input: usize, source: ModuleId },
}

impl GraphDocument {
    #[must_use]
    pub fn new(modules: Vec<ModuleRecord>) -> Self {
        Self { modules }
    }

    /// Decode a document of the form `{"modules": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns `Json` if the text is not a valid document.
    pub fn from_json(text: &str) -> Result<Self, CanvasError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Module ids in document order.
    pub fn module_ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.modules.iter().map(|m| m.id)
    }

    #[must_use]
    pub fn module(&self, id: ModuleId) -> Option<&ModuleRecord> {
        self.modules.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ModuleId) -> bool {
        self.module(id).is_some()
    }

    #[must_use]
    pub fn plugin_of(&self, id: ModuleId) -> Option<PluginId> {
        self.module(id).map(|m| m.plugin)
    }

    /// Edges feeding `id`, in the order the document declares them.
    /// Unknown modules have none.
    #[must_use]
    pub fn inbound_edges(&self, id: ModuleId) -> Vec<InboundEdge> {
        let Some(module) = self.module(id) else {
            return Vec::new();
        };
        module
            .sets
            .iter()
            .filter_map(|set| match set.value {
                InputValue::Module(source) => Some(InboundEdge { source, input: set.input }),
                _ => None,
            })
            .collect()
    }

    /// Value currently bound to an input, if any.
    #[must_use]
    pub fn input_value(&self, id: ModuleId, input: usize) -> Option<&InputValue> {
        self.module(id)?
            .sets
            .iter()
            .find(|s| s.input == input)
            .map(|s| &s.value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Apply an intent locally, the way the engine would. Returns whether
    /// the document changed.
    ///
    /// Created modules get the next id above the current maximum. Destroying
    /// a module leaves references to it in place; the renderer skips them.
    pub fn apply(&mut self, intent: &Intent) -> bool {
        match intent {
            Intent::CreateModule { plugin, .. } => {
                let id = self.modules.iter().map(|m| m.id.saturating_add(1)).max().unwrap_or(0);
                self.modules.push(ModuleRecord { id, plugin: *plugin, sets: Vec::new() });
                true
            }
            Intent::DestroyModule { module, .. } => {
                let before = self.modules.len();
                self.modules.retain(|m| m.id != *module);
                self.modules.len() != before
            }
            Intent::SetInput { module, input, value, .. } => self.bind(*module, *input, value.clone()),
            Intent::ConnectInput { module, input, source, .. } => {
                self.bind(*module, *input, InputValue::Module(*source))
            }
            Intent::ClearInput { module, input, .. } => {
                let Some(record) = self.modules.iter_mut().find(|m| m.id == *module) else {
                    return false;
                };
                let before = record.sets.len();
                record.sets.retain(|s| s.input != *input);
                record.sets.len() != before
            }
        }
    }

    fn bind(&mut self, module: ModuleId, input: usize, value: InputValue) -> bool {
        let Some(record) = self.modules.iter_mut().find(|m| m.id == module) else {
            return false;
        };
        if let Some(set) = record.sets.iter_mut().find(|s| s.input == input) {
            set.value = value;
        } else {
            record.sets.push(SetRecord { input, value });
        }
        true
    }
}

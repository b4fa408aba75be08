//! Plug-in metadata: the read-only description of what each module computes.
//!
//! The canvas itself only needs a plug-in's display name, its input count,
//! and whether it is a sink (has no output). The richer per-input schema
//! (kind, range, enum labels) is carried for input editors and for
//! validating [`crate::doc::Intent::SetInput`] requests.

#[cfg(test)]
#[path = "plugin_test.rs"]
mod plugin_test;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::consts::UNKNOWN_PLUGIN_NAME;
use crate::doc::InputValue;
use crate::error::CanvasError;

/// Identifier of a plug-in in the engine's catalog.
pub type PluginId = u32;

/// The value kind an input accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Boolean,
    Uint32,
    /// A `uint32` restricted to labelled values.
    Uint32Enum,
    Real32,
    Real64,
    Real64Vec3,
    Real64Vec4,
    /// Reference to another module's output.
    Module,
    String,
}

impl InputKind {
    /// Whether `value` has the representation this kind carries.
    #[must_use]
    pub fn matches(self, value: &InputValue) -> bool {
        matches!(
            (self, value),
            (Self::Boolean, InputValue::Boolean(_))
                | (Self::Uint32 | Self::Uint32Enum, InputValue::Uint32(_))
                | (Self::Real32, InputValue::Real32(_))
                | (Self::Real64, InputValue::Real64(_))
                | (Self::Real64Vec3, InputValue::Real64Vec3(_))
                | (Self::Real64Vec4, InputValue::Real64Vec4(_))
                | (Self::Module, InputValue::Module(_))
                | (Self::String, InputValue::String(_))
        )
    }
}

/// Default and limits for a numeric input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<InputValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// One labelled value of a `uint32` enum input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumItem {
    pub value: u32,
    pub label: String,
}

/// Schema of a single plug-in input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub name: String,
    pub kind: InputKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<InputRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumItem>,
}

impl InputSpec {
    /// Whether `value` fits this input's kind, range, and enum labels.
    #[must_use]
    pub fn accepts(&self, value: &InputValue) -> bool {
        if !self.kind.matches(value) {
            return false;
        }
        if let InputValue::Uint32(v) = value
            && !self.enums.is_empty()
            && !self.enums.iter().any(|e| e.value == *v)
        {
            return false;
        }
        let Some(range) = &self.range else {
            return true;
        };
        let Some(scalar) = value.as_scalar() else {
            return true;
        };
        range.min.is_none_or(|min| scalar >= min) && range.max.is_none_or(|max| scalar <= max)
    }
}

/// Description of one plug-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDesc {
    pub id: PluginId,
    pub name: String,
    /// Sinks consume values but expose no output.
    #[serde(default)]
    pub sink: bool,
    #[serde(default)]
    pub inputs: Vec<InputSpec>,
}

/// Read-only plug-in lookups the canvas depends on.
pub trait PluginInfo {
    /// Display name, or `None` for a plug-in the catalog does not know.
    fn name(&self, plugin: PluginId) -> Option<&str>;

    /// Number of inputs. Unknown plug-ins have none.
    fn input_count(&self, plugin: PluginId) -> usize;

    /// Whether the plug-in has no output.
    fn is_sink(&self, plugin: PluginId) -> bool;

    /// Schema of input `index`.
    fn input(&self, plugin: PluginId, index: usize) -> Option<&InputSpec>;

    /// Name to draw in a module's title band.
    fn display_name(&self, plugin: PluginId) -> &str {
        self.name(plugin).unwrap_or(UNKNOWN_PLUGIN_NAME)
    }
}

#[derive(Deserialize)]
struct CatalogDoc {
    #[serde(default)]
    plugins: Vec<PluginDesc>,
}

/// In-memory plug-in catalog keyed by id, in the order the engine listed them.
#[derive(Debug, Clone, Default)]
pub struct PluginCatalog {
    plugins: IndexMap<PluginId, PluginDesc>,
}

impl PluginCatalog {
    #[must_use]
    pub fn new(plugins: Vec<PluginDesc>) -> Self {
        Self { plugins: plugins.into_iter().map(|p| (p.id, p)).collect() }
    }

    /// Decode a catalog of the form `{"plugins": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns `Json` if the text is not a valid catalog.
    pub fn from_json(text: &str) -> Result<Self, CanvasError> {
        let doc: CatalogDoc = serde_json::from_str(text)?;
        Ok(Self::new(doc.plugins))
    }

    /// Insert or replace a plug-in description.
    pub fn insert(&mut self, desc: PluginDesc) {
        self.plugins.insert(desc.id, desc);
    }

    #[must_use]
    pub fn get(&self, plugin: PluginId) -> Option<&PluginDesc> {
        self.plugins.get(&plugin)
    }

    /// `(name, id)` pairs in catalog order, for building a "create module" menu.
    pub fn entries(&self) -> impl Iterator<Item = (&str, PluginId)> {
        self.plugins.values().map(|p| (p.name.as_str(), p.id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl PluginInfo for PluginCatalog {
    fn name(&self, plugin: PluginId) -> Option<&str> {
        self.get(plugin).map(|p| p.name.as_str())
    }

    fn input_count(&self, plugin: PluginId) -> usize {
        self.get(plugin).map_or(0, |p| p.inputs.len())
    }

    fn is_sink(&self, plugin: PluginId) -> bool {
        self.get(plugin).is_some_and(|p| p.sink)
    }

    fn input(&self, plugin: PluginId, index: usize) -> Option<&InputSpec> {
        self.get(plugin).and_then(|p| p.inputs.get(index))
    }
}

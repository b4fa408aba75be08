//! Interactive editor core for a node-based dataflow graph.
//!
//! The crate renders a graph of modules (boxes with a title band, a row per
//! input, and an output arrow) and the connections between them, and turns
//! raw pointer and wheel input into pan/zoom, selection, drag-to-move, and
//! drag-to-connect gestures. The graph itself is owned elsewhere: the canvas
//! reads a [`doc::GraphDocument`] and plug-in metadata, and reports edits
//! back as [`engine::Action`]s carrying [`doc::Intent`]s for the host to
//! forward. Module placement, selection and the camera are canvas-local.
//!
//! Everything except the optional `web` feature is plain Rust and testable
//! without a browser.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`] and, with `web`, the canvas-owning `Engine` |
//! | [`doc`] | Graph document, input values and edit intents |
//! | [`plugin`] | Plug-in metadata trait and deserializable catalog |
//! | [`layout`] | Placement table: where each module sits, auto-flow seeding |
//! | [`camera`] | Damped pan/zoom camera and coordinate conversions |
//! | [`input`] | Input event types and the interaction state machine |
//! | [`hit`] | Hit-testing modules, output arrows and input rows |
//! | [`selection`] | Ordered module selection |
//! | [`arrange`] | Align, distribute and bounds over the selection |
//! | [`geometry`] | Bevelled boxes, Bezier connectors, boxed text |
//! | [`render`] | Display-list construction and the browser backend |
//! | [`config`] | Serde-loaded layout, camera and render settings |
//! | [`error`] | [`error::CanvasError`] for the fallible boundaries |
//! | [`consts`] | Default metrics and limits |

pub mod arrange;
pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod layout;
pub mod plugin;
pub mod render;
pub mod selection;

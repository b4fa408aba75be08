//! Input model: modifier keys, mouse buttons, and the interaction state machine.
//!
//! `InteractionState` is the active gesture tracked between pointer-down and
//! pointer-up. Each variant carries exactly the context its mode needs, so a
//! hover target can only exist while connecting and a gesture never outlives
//! the pointer-up that ends it. The transitions themselves live on
//! [`crate::engine::EngineCore`], which owns the state alongside the camera,
//! placements, and selection it mutates.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::ModuleId;
use crate::hit::PortRef;

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Pointer-down should pan instead of picking.
    #[must_use]
    pub fn pans(self) -> bool {
        self.ctrl
    }

    /// Picking toggles membership instead of replacing the selection.
    #[must_use]
    pub fn extends_selection(self) -> bool {
        self.shift
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click). Always pans.
    Middle,
    /// Right mouse button. Ignored by the canvas.
    Secondary,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Screen-space pointer positions recorded over one gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPoints {
    /// Where the pointer went down.
    pub anchor: Point,
    /// Position at the previous event; deltas are measured from here.
    pub last: Point,
    /// Position at the latest event.
    pub current: Point,
}

impl DragPoints {
    #[must_use]
    pub fn at(screen: Point) -> Self {
        Self { anchor: screen, last: screen, current: screen }
    }

    /// Record a new pointer position and return the previous one.
    pub fn advance(&mut self, screen: Point) -> Point {
        let prev = self.current;
        self.last = prev;
        self.current = screen;
        prev
    }
}

/// The gesture in progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging the camera.
    Panning { drag: DragPoints },
    /// Dragging every selected module.
    MovingSelection { drag: DragPoints },
    /// Dragging a connection out of `source`'s output.
    ConnectingOutput {
        source: ModuleId,
        drag: DragPoints,
        /// Input currently under the pointer, highlighted while dragging.
        hover: Option<PortRef>,
    },
}

impl InteractionState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Pointer positions of the active gesture.
    #[must_use]
    pub fn drag(&self) -> Option<&DragPoints> {
        match self {
            Self::Idle => None,
            Self::Panning { drag } | Self::MovingSelection { drag } | Self::ConnectingOutput { drag, .. } => {
                Some(drag)
            }
        }
    }

    /// Hovered input while connecting.
    #[must_use]
    pub fn hover(&self) -> Option<PortRef> {
        match self {
            Self::ConnectingOutput { hover, .. } => *hover,
            _ => None,
        }
    }

    /// Source module while connecting.
    #[must_use]
    pub fn connect_source(&self) -> Option<ModuleId> {
        match self {
            Self::ConnectingOutput { source, .. } => Some(*source),
            _ => None,
        }
    }

    /// Short mode name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Panning { .. } => "panning",
            Self::MovingSelection { .. } => "moving_selection",
            Self::ConnectingOutput { .. } => "connecting_output",
        }
    }
}

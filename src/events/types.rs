//! Overlay events for inter-thread communication.
//!
//! Events flow from producers (the activation hook, the platform window
//! host, menu hit-testing) through the [`super::EventBus`] to the overlay
//! coordinator, which drains them once per tick. Pure Rust, fully testable.

use crate::model::Point;
use crate::ui::ControlId;

/// Events drained by the overlay coordinator once per render tick.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    // === Input Events ===
    /// The activation key completed a down edge (one per physical press).
    KeyPressed,

    /// Left mouse button pressed at a point in overlay coordinates.
    PointerDown(Point),

    /// A character was typed while the overlay had input focus.
    CharInput(char),

    /// Left arrow pressed: move the focused text box cursor left.
    CursorLeft,

    /// Right arrow pressed: move the focused text box cursor right.
    CursorRight,

    // === Control Events ===
    /// An interactive button was hit-tested successfully.
    ButtonClicked(ControlId),

    // === Lifecycle Events ===
    /// The tracked foreign window is gone; the overlay must tear down.
    TargetClosed,
}

impl OverlayEvent {
    /// True for events that mutate a focused control rather than the
    /// overlay itself.
    pub fn is_edit_event(&self) -> bool {
        matches!(
            self,
            OverlayEvent::CharInput(_) | OverlayEvent::CursorLeft | OverlayEvent::CursorRight
        )
    }

    /// Human-readable description for logging.
    pub fn description(&self) -> &'static str {
        match self {
            OverlayEvent::KeyPressed => "activation key pressed",
            OverlayEvent::PointerDown(_) => "pointer down",
            OverlayEvent::CharInput(_) => "character input",
            OverlayEvent::CursorLeft => "cursor left",
            OverlayEvent::CursorRight => "cursor right",
            OverlayEvent::ButtonClicked(_) => "button clicked",
            OverlayEvent::TargetClosed => "tracked window closed",
        }
    }
}

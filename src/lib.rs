//! scrim — a transparent, click-through overlay that tracks another
//! application's window and hosts draggable menu panels.
//!
//! The core (model, events, ui, overlay) is pure Rust behind trait seams
//! for the platform window service, the renderer and text metrics, so the
//! whole interaction engine runs under normal integration tests. The
//! Windows implementations (Win32 + Direct2D + DirectWrite) live in
//! [`platform::windows`].

pub mod error;
pub mod events;
pub mod input;
pub mod model;
pub mod overlay;
pub mod platform;
pub mod render;
pub mod ui;

// Re-export the host-facing surface for convenience
pub use error::OverlayError;
pub use events::{EventBus, EventPublisher, OverlayEvent};
pub use model::{Color, OverlayOptions, Point, Rect, Size, TextStyle};
pub use overlay::{clamp_drag_position, FocusHandle, Overlay};
pub use platform::{StyleFlags, WindowId, WindowService};
pub use render::{Canvas, RenderSurface, Renderer, SharedSurface, TextMetrics};
pub use ui::{Button, Control, ControlId, Label, Menu, TextBox};

/// Clamp a value to [lo, hi]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

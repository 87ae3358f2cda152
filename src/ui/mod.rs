//! Menus and the controls they own.
//!
//! Pure except for the `Canvas`/`TextMetrics` seams, so the whole
//! interaction state machine runs under normal integration tests.

pub mod control;
pub mod menu;
pub mod textbox;

pub use control::{Button, Control, ControlId, Label};
pub use menu::Menu;
pub use textbox::TextBox;

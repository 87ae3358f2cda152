//! Layout, timing and style constants.
//!
//! Layout multipliers are a design choice, not load-bearing, but they must
//! stay stable: hit-testing recomputes the same boxes the draw pass used.

use super::geometry::Color;

// === Layout ===

/// Inner padding added around a control's measured text.
pub const CONTROL_PADDING: f32 = 10.0;

/// Corner radius for buttons, text boxes and menu backgrounds.
pub const CORNER_RADIUS: f32 = 5.0;

/// Margin between the menu border and its controls, on all sides.
pub const MENU_MARGIN: f32 = 10.0;

/// Vertical spacing between stacked controls.
pub const CONTROL_SPACING: f32 = 10.0;

/// Height of the menu header strip (name + pin indicator).
pub const HEADER_HEIGHT: f32 = 24.0;

/// Radius of the pin indicator circle in the header.
pub const PIN_RADIUS: f32 = 6.0;

/// Distance from the header's right edge to the pin circle center.
pub const PIN_INSET: f32 = 12.0;

/// Number of characters visible in a text box viewport.
pub const TEXTBOX_VIEWPORT: usize = 8;

/// Frames between cursor blink flips while a text box is focused.
pub const BLINK_INTERVAL_TICKS: u32 = 30;

/// A menu dragged off-screen to the left always keeps this many pixels
/// reachable (the lower drag bound is `DRAG_LEFT_MARGIN - menu width`).
pub const DRAG_LEFT_MARGIN: f32 = 20.0;

// === Timing Defaults ===

/// Foreign-window tracking interval in milliseconds.
pub const DEFAULT_TRACK_INTERVAL_MS: u64 = 200;

/// Activation-hook key polling interval in milliseconds.
pub const DEFAULT_HOOK_INTERVAL_MS: u64 = 10;

/// Render tick interval in milliseconds (~60 FPS).
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Drag-session position update interval in milliseconds.
pub const DEFAULT_DRAG_INTERVAL_MS: u64 = 10;

/// Repeat interval for a held delete key in milliseconds.
pub const DEFAULT_DELETE_REPEAT_MS: u64 = 60;

// === Timing Limits ===

/// Minimum accepted polling interval; anything shorter burns a core.
pub const MIN_INTERVAL_MS: u64 = 1;

/// Maximum accepted polling interval.
pub const MAX_INTERVAL_MS: u64 = 5_000;

// === Key Codes ===
// Virtual-key codes, matching the Win32 VK_* values so the core stays
// platform-neutral while the Windows service passes them straight through.

/// Left mouse button.
pub const KEY_LBUTTON: u16 = 0x01;

/// Backspace (delete-before-cursor).
pub const KEY_BACK: u16 = 0x08;

/// Left arrow.
pub const KEY_LEFT: u16 = 0x25;

/// Right arrow.
pub const KEY_RIGHT: u16 = 0x27;

/// Insert, the default activation key.
pub const KEY_INSERT: u16 = 0x2D;

// === Extended Window Style Bits ===
// Matching WS_EX_* values; see `platform::WindowService`.

/// Layered window (required for per-pixel alpha).
pub const EX_STYLE_LAYERED: u32 = 0x0008_0000;

/// Click-through window (pointer input passes to the window beneath).
pub const EX_STYLE_TRANSPARENT: u32 = 0x0000_0020;

// === Palette ===

/// Menu panel background.
pub const MENU_BACKGROUND: Color = Color::rgba(0.08, 0.08, 0.1, 0.85);

/// Menu and control border.
pub const MENU_BORDER: Color = Color::BLACK;

/// Header strip fill.
pub const HEADER_FILL: Color = Color::rgba(0.16, 0.16, 0.2, 0.95);

/// Button fill.
pub const BUTTON_FILL: Color = Color::rgba(0.27, 0.27, 0.27, 1.0);

/// Text box fill.
pub const TEXTBOX_FILL: Color = Color::rgba(0.08, 0.08, 0.2, 0.9);

/// Pin indicator while pinned.
pub const PIN_ACTIVE: Color = Color::rgba(0.9, 0.75, 0.2, 1.0);

/// Pin indicator while unpinned.
pub const PIN_INACTIVE: Color = Color::rgba(0.5, 0.5, 0.5, 1.0);

/// Text cursor color.
pub const CURSOR_COLOR: Color = Color::WHITE;

//! Platform services consumed by the overlay core.
//!
//! The core depends only on the semantics of the [`WindowService`]
//! operations, not on their calling convention; the Win32 implementation
//! lives in [`windows`] and tests substitute an in-memory fake.

#[cfg(target_os = "windows")]
pub mod windows;

use crate::model::constants::{EX_STYLE_LAYERED, EX_STYLE_TRANSPARENT};
use crate::model::{Point, Rect};

/// Opaque window identifier (an `HWND` on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub isize);

/// Extended window style bits.
///
/// Values match the Win32 `WS_EX_*` constants the overlay cares about, so
/// the Windows service passes them through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleFlags(pub u32);

impl StyleFlags {
    pub const LAYERED: StyleFlags = StyleFlags(EX_STYLE_LAYERED);
    pub const TRANSPARENT: StyleFlags = StyleFlags(EX_STYLE_TRANSPARENT);

    pub fn with(self, other: StyleFlags) -> StyleFlags {
        StyleFlags(self.0 | other.0)
    }

    pub fn without(self, other: StyleFlags) -> StyleFlags {
        StyleFlags(self.0 & !other.0)
    }

    pub fn contains(self, other: StyleFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// The click-through combination applied while the overlay is inactive.
    pub fn click_through(self) -> StyleFlags {
        self.with(StyleFlags::LAYERED).with(StyleFlags::TRANSPARENT)
    }
}

/// Low-level window and input queries.
///
/// All operations are synchronous and polling-friendly; the overlay's
/// loops call them on fixed intervals rather than waiting for callbacks.
pub trait WindowService: Send + Sync {
    /// Current rectangle of `window` in screen coordinates, or `None` once
    /// the window no longer exists (the owning process exited).
    fn window_rect(&self, window: WindowId) -> Option<Rect>;

    /// Move/resize `window` to `rect`. Best-effort; a vanished window is
    /// reported by the next `window_rect` poll instead.
    fn move_window(&self, window: WindowId, rect: Rect);

    /// Read the extended style bits of `window`.
    fn ex_style(&self, window: WindowId) -> StyleFlags;

    /// Replace the extended style bits of `window`.
    fn set_ex_style(&self, window: WindowId, style: StyleFlags);

    /// Give `window` foreground focus.
    fn set_foreground(&self, window: WindowId);

    /// Raw key state for a virtual-key code: true while physically down.
    fn key_down(&self, key: u16) -> bool;

    /// Current cursor position in screen coordinates.
    fn cursor_pos(&self) -> Point;
}

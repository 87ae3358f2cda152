//! Runtime options for an overlay.
//!
//! Hosts construct these directly or deserialize them from a config file;
//! all fields have sensible defaults and `validate()` clamps out-of-range
//! values instead of rejecting them.

use serde::{Deserialize, Serialize};

use super::constants::*;

/// Construction-time options for [`crate::Overlay`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    /// Virtual-key code of the activation key toggling overlay
    /// interactivity. Defaults to Insert.
    pub activation_key: u16,
    /// Foreign-window tracking interval in milliseconds.
    pub track_interval_ms: u64,
    /// Activation-hook key polling interval in milliseconds.
    pub hook_interval_ms: u64,
    /// Render tick interval in milliseconds.
    pub frame_interval_ms: u64,
    /// Drag-session position update interval in milliseconds.
    pub drag_interval_ms: u64,
    /// Repeat interval for a held delete key in milliseconds.
    pub delete_repeat_ms: u64,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            activation_key: KEY_INSERT,
            track_interval_ms: DEFAULT_TRACK_INTERVAL_MS,
            hook_interval_ms: DEFAULT_HOOK_INTERVAL_MS,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            drag_interval_ms: DEFAULT_DRAG_INTERVAL_MS,
            delete_repeat_ms: DEFAULT_DELETE_REPEAT_MS,
        }
    }
}

impl OverlayOptions {
    /// Clamp every interval into `[MIN_INTERVAL_MS, MAX_INTERVAL_MS]`.
    ///
    /// Out-of-range values are silently corrected, never reported: a
    /// mistuned interval should degrade to a usable one, not fail startup.
    pub fn validate(&mut self) {
        self.track_interval_ms = self.track_interval_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        self.hook_interval_ms = self.hook_interval_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        self.frame_interval_ms = self.frame_interval_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        self.drag_interval_ms = self.drag_interval_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        self.delete_repeat_ms = self.delete_repeat_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
    }
}

//! Error type for overlay operations.
//!
//! Most boundary conditions in this crate (cursor positions, drag
//! coordinates, mistuned intervals) are clamped silently; errors are
//! reserved for platform failures and lifecycle problems.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    /// The tracked foreign window no longer exists.
    #[error("tracked window is gone")]
    TargetWindowGone,

    /// No render surface is currently published (e.g. mid-rebuild at
    /// startup, or after teardown).
    #[error("render surface unavailable")]
    SurfaceUnavailable,

    /// A platform window/graphics call failed.
    #[error("platform call failed: {0}")]
    Platform(String),
}

#[cfg(target_os = "windows")]
impl From<windows::core::Error> for OverlayError {
    fn from(err: windows::core::Error) -> Self {
        OverlayError::Platform(err.message())
    }
}

//! Pure data model: geometry, constants and runtime options.
//!
//! No FFI and no window-system types live here, so everything in this
//! module is exercised by normal integration tests.

pub mod constants;
pub mod geometry;
pub mod options;

pub use geometry::{Color, Point, Rect, Size, TextStyle};
pub use options::OverlayOptions;

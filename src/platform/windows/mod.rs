//! Windows implementation using Win32, Direct2D and DirectWrite.
//!
//! - `window_service`: user32 pass-through for the `WindowService` trait
//! - `renderer`: layered-window surfaces drawn with Direct2D
//! - `text`: DirectWrite-backed text measurement
//! - `host`: overlay window creation and the message pump

pub mod host;
pub mod renderer;
pub mod text;
pub mod window_service;

pub use host::{create_overlay, run};
pub use renderer::D2dRenderer;
pub use text::DwriteMetrics;
pub use window_service::Win32WindowService;

//! Rendering seams: drawing, surfaces and text measurement.
//!
//! The overlay core never talks to a graphics API directly. It draws
//! through [`Canvas`], measures text through [`TextMetrics`] and owns
//! surfaces through [`SharedSurface`]. The Windows implementations live in
//! `platform::windows`; tests substitute recording fakes.

use std::sync::{Arc, Mutex};

use crate::error::OverlayError;
use crate::model::{Color, Point, Rect, Size, TextStyle};

/// Per-frame drawing context.
///
/// Implementations batch these calls between a begin/present pair managed
/// by [`RenderSurface::frame`].
pub trait Canvas {
    /// Clear the whole surface to fully transparent.
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_round_rect(&mut self, rect: Rect, radius: f32, color: Color);
    fn stroke_round_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Color);
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Point, radius: f32, width: f32, color: Color);
    fn line(&mut self, from: Point, to: Point, width: f32, color: Color);
    fn text(&mut self, text: &str, origin: Point, style: &TextStyle);
}

/// A GPU-backed drawable surface of fixed pixel dimensions.
///
/// Surfaces cannot be resized in place; when the tracked window changes
/// size the tracking loop builds a replacement and swaps it in.
pub trait RenderSurface: Send {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Run one frame: begin drawing, hand the canvas to `draw`, then
    /// flush/present.
    fn frame(&mut self, draw: &mut dyn FnMut(&mut dyn Canvas)) -> Result<(), OverlayError>;
}

/// Allocates render surfaces. Owned by the tracking loop after overlay
/// construction.
pub trait Renderer: Send {
    fn create_surface(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn RenderSurface>, OverlayError>;
}

/// Measures the bounding box of styled text.
pub trait TextMetrics: Send + Sync {
    fn measure(&self, text: &str, style: &TextStyle) -> Size;
}

/// Single-slot surface holder shared between the tracking loop (writer)
/// and the render pass (reader).
///
/// Replacement swaps the boxed surface under the lock, so a reader either
/// sees the old surface or the new one, never a partially built one. The
/// render pass borrows the surface for the duration of one frame only.
#[derive(Clone)]
pub struct SharedSurface {
    slot: Arc<Mutex<Option<Box<dyn RenderSurface>>>>,
}

impl SharedSurface {
    /// Create an empty holder; `frame` fails until a surface is published.
    pub fn empty() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Publish a new surface, dropping the previous one.
    pub fn replace(&self, surface: Box<dyn RenderSurface>) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(surface);
    }

    /// Drop the current surface, if any. Used during teardown.
    pub fn clear(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    /// Dimensions of the current surface.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().map(|s| (s.width(), s.height()))
    }

    /// Draw one frame against the current surface.
    pub fn frame(&self, draw: &mut dyn FnMut(&mut dyn Canvas)) -> Result<(), OverlayError> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        match slot.as_mut() {
            Some(surface) => surface.frame(draw),
            None => Err(OverlayError::SurfaceUnavailable),
        }
    }
}

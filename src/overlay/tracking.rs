//! Foreign-window tracking loop.
//!
//! A background thread polls the tracked window's rectangle on a fixed
//! interval. Position changes reposition the overlay window; size changes
//! additionally rebuild the render surface, because the renderer cannot
//! resize a surface in place. The replacement surface is published through
//! [`SharedSurface`], so the render pass never observes a half-built one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::events::{EventPublisher, OverlayEvent};
use crate::model::Rect;
use crate::platform::{WindowId, WindowService};
use crate::render::{Renderer, SharedSurface};

/// Outcome of comparing the last observed rectangle with the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackUpdate {
    Unchanged,
    /// Position changed, size identical: reposition only.
    Moved,
    /// Size changed (possibly with a move): reposition and rebuild the
    /// render surface.
    Resized,
}

/// Classify a tracking observation. Surface rebuilds trigger only on size
/// change, never on a pure move.
pub fn compare_rects(last: Rect, current: Rect) -> TrackUpdate {
    if last == current {
        TrackUpdate::Unchanged
    } else if last.same_size(&current) {
        TrackUpdate::Moved
    } else {
        TrackUpdate::Resized
    }
}

/// One tracking-loop iteration's worth of state.
///
/// Separate from the thread so a single tick can be driven directly in
/// tests against fake services and renderers.
pub struct Tracker {
    service: Arc<dyn WindowService>,
    renderer: Box<dyn Renderer>,
    target: WindowId,
    window: WindowId,
    surface: SharedSurface,
    overlay_rect: Arc<Mutex<Rect>>,
    events: EventPublisher,
    last: Rect,
}

impl Tracker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        service: Arc<dyn WindowService>,
        renderer: Box<dyn Renderer>,
        target: WindowId,
        window: WindowId,
        surface: SharedSurface,
        overlay_rect: Arc<Mutex<Rect>>,
        events: EventPublisher,
        initial: Rect,
    ) -> Self {
        Self {
            service,
            renderer,
            target,
            window,
            surface,
            overlay_rect,
            events,
            last: initial,
        }
    }

    /// Run one tracking iteration. Returns false once the tracked window
    /// is gone and teardown has been signalled.
    pub fn tick(&mut self) -> bool {
        let Some(rect) = self.service.window_rect(self.target) else {
            log::info!("tracked window gone, signalling teardown");
            self.events.publish(OverlayEvent::TargetClosed);
            return false;
        };

        match compare_rects(self.last, rect) {
            TrackUpdate::Unchanged => return true,
            TrackUpdate::Moved => {
                self.service.move_window(self.window, rect);
            }
            TrackUpdate::Resized => {
                self.service.move_window(self.window, rect);
                let width = rect.width().max(1.0) as u32;
                let height = rect.height().max(1.0) as u32;
                match self.renderer.create_surface(width, height) {
                    Ok(surface) => {
                        self.surface.replace(surface);
                        log::debug!("render surface rebuilt at {width}x{height}");
                    }
                    // Keep the stale surface; the next size change retries.
                    Err(e) => log::warn!("surface rebuild failed: {e}"),
                }
            }
        }

        let mut shared = self.overlay_rect.lock().unwrap_or_else(|e| e.into_inner());
        *shared = rect;
        drop(shared);
        self.last = rect;
        true
    }
}

/// Spawn the tracking thread. It exits when `stop` is set or the tracked
/// window disappears, within one interval either way.
pub(crate) fn spawn(
    mut tracker: Tracker,
    interval: Duration,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("scrim-tracker".into())
        .spawn(move || {
            log::debug!("tracking loop started");
            loop {
                if stop.load(Ordering::SeqCst) {
                    break;
                }
                if !tracker.tick() {
                    break;
                }
                thread::sleep(interval);
            }
            log::debug!("tracking loop stopped");
        })
        .expect("failed to spawn tracking thread")
}

//! Overlay coordinator.
//!
//! Owns the render surface, the tracking loop and the activation hook,
//! routes pointer/keyboard events to menus and controls, and toggles the
//! window between its normal and click-through styles.

pub mod tracking;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::clamp;
use crate::error::OverlayError;
use crate::events::{EventBus, EventPublisher, OverlayEvent};
use crate::input::ActivationHook;
use crate::model::constants::{DRAG_LEFT_MARGIN, KEY_BACK, KEY_LBUTTON};
use crate::model::{OverlayOptions, Point, Rect, Size};
use crate::platform::{StyleFlags, WindowId, WindowService};
use crate::render::{Renderer, SharedSurface, TextMetrics};
use crate::ui::{Control, ControlId, Menu};

use tracking::Tracker;

/// Weak reference to the currently focused control.
///
/// Resolved by name + id on every use; if the menu or control has been
/// removed in the meantime the handle silently degrades to "no focus".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusHandle {
    pub menu: String,
    pub control: ControlId,
}

/// Clamp a dragged menu position to the overlay's bounds.
///
/// The horizontal lower bound keeps at least `DRAG_LEFT_MARGIN` pixels of
/// the menu reachable instead of letting it slide fully off-screen to the
/// left; the remaining bounds are the overlay's own extents.
pub fn clamp_drag_position(candidate: Point, menu_width: f32, overlay: Size) -> Point {
    Point::new(
        clamp(candidate.x, DRAG_LEFT_MARGIN - menu_width, overlay.width),
        clamp(candidate.y, 0.0, overlay.height),
    )
}

enum PointerAction {
    TogglePin(usize),
    BeginDrag(String, Point),
    Dispatch(usize),
    Miss,
}

/// The transparent, always-on-top window tracking a foreign window.
///
/// Created once per tracked window; disposed when that window goes away or
/// via [`shutdown`](Self::shutdown).
pub struct Overlay {
    service: Arc<dyn WindowService>,
    metrics: Arc<dyn TextMetrics>,
    target: WindowId,
    window: WindowId,
    options: OverlayOptions,
    surface: SharedSurface,
    menus: Arc<Mutex<Vec<Menu>>>,
    overlay_rect: Arc<Mutex<Rect>>,
    bus: EventBus,
    publisher: EventPublisher,
    hook: ActivationHook,
    original_style: StyleFlags,
    active: bool,
    focus: Option<FocusHandle>,
    click_handlers: HashMap<ControlId, Box<dyn FnMut() + Send>>,
    last_delete: Option<Instant>,
    dragging: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
    tracker_thread: Option<JoinHandle<()>>,
    torn_down: bool,
}

impl Overlay {
    /// Create an overlay tracking `target`, rendering into `window`.
    ///
    /// Queries the target's rectangle, sizes the overlay window and its
    /// first render surface to match, snapshots the original window style,
    /// switches to click-through (overlays start inactive) and spawns the
    /// tracking loop and activation hook.
    pub fn new(
        target: WindowId,
        window: WindowId,
        service: Arc<dyn WindowService>,
        mut renderer: Box<dyn Renderer>,
        metrics: Arc<dyn TextMetrics>,
        mut options: OverlayOptions,
    ) -> Result<Self, OverlayError> {
        options.validate();

        let rect = service
            .window_rect(target)
            .ok_or(OverlayError::TargetWindowGone)?;
        service.move_window(window, rect);

        let surface = SharedSurface::empty();
        let initial =
            renderer.create_surface(rect.width().max(1.0) as u32, rect.height().max(1.0) as u32)?;
        surface.replace(initial);

        let original_style = service.ex_style(window);
        service.set_ex_style(window, original_style.click_through());

        let bus = EventBus::new();
        let publisher = bus.publisher();
        let overlay_rect = Arc::new(Mutex::new(rect));
        let stop = Arc::new(AtomicBool::new(false));

        let hook = ActivationHook::spawn(
            options.activation_key,
            Duration::from_millis(options.hook_interval_ms),
            Arc::clone(&service),
            bus.publisher(),
        );

        let tracker = Tracker::new(
            Arc::clone(&service),
            renderer,
            target,
            window,
            surface.clone(),
            Arc::clone(&overlay_rect),
            bus.publisher(),
            rect,
        );
        let tracker_thread = tracking::spawn(
            tracker,
            Duration::from_millis(options.track_interval_ms),
            Arc::clone(&stop),
        );

        log::info!(
            "overlay created for target {:?} at {}x{}",
            target,
            rect.width(),
            rect.height()
        );

        Ok(Self {
            service,
            metrics,
            target,
            window,
            options,
            surface,
            menus: Arc::new(Mutex::new(Vec::new())),
            overlay_rect,
            bus,
            publisher,
            hook,
            original_style,
            active: false,
            focus: None,
            click_handlers: HashMap::new(),
            last_delete: None,
            dragging: Arc::new(AtomicBool::new(false)),
            stop,
            tracker_thread: Some(tracker_thread),
            torn_down: false,
        })
    }

    /// Publisher for feeding input events from the window host.
    pub fn events(&self) -> EventPublisher {
        self.publisher.clone()
    }

    /// Text metrics shared with menus created for this overlay.
    pub fn metrics(&self) -> Arc<dyn TextMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Validated options the overlay was created with.
    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    /// Whether the overlay is currently interactive (not click-through).
    pub fn active(&self) -> bool {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.load(Ordering::SeqCst)
    }

    pub fn focused_control(&self) -> Option<&FocusHandle> {
        self.focus.as_ref()
    }

    /// True until teardown has been requested or completed.
    pub fn is_running(&self) -> bool {
        !self.stop.load(Ordering::SeqCst)
    }

    /// Current render surface dimensions. Tracks the last observed size of
    /// the foreign window.
    pub fn surface_dimensions(&self) -> Option<(u32, u32)> {
        self.surface.dimensions()
    }

    // === Menus ===

    /// Convenience constructor wiring the overlay's text metrics in.
    pub fn create_menu(&self, name: impl Into<String>, position: Point) -> Menu {
        Menu::new(name, position, Arc::clone(&self.metrics))
    }

    pub fn add_menu(&self, menu: Menu) {
        let mut menus = self.lock_menus();
        menus.push(menu);
    }

    /// Remove every menu with the given name. Returns true if any matched.
    pub fn remove_menu(&self, name: &str) -> bool {
        let mut menus = self.lock_menus();
        let before = menus.len();
        menus.retain(|m| m.name() != name);
        menus.len() != before
    }

    pub fn clear_menus(&self) {
        self.lock_menus().clear();
    }

    /// Run `f` against the named menu, if present.
    pub fn with_menu<R>(&self, name: &str, f: impl FnOnce(&mut Menu) -> R) -> Option<R> {
        let mut menus = self.lock_menus();
        menus.iter_mut().find(|m| m.name() == name).map(f)
    }

    /// Register a callback fired when the given button is clicked.
    /// At most one callback per control; re-registering replaces it.
    pub fn on_click(&mut self, control: ControlId, handler: impl FnMut() + Send + 'static) {
        self.click_handlers.insert(control, Box::new(handler));
    }

    fn lock_menus(&self) -> MutexGuard<'_, Vec<Menu>> {
        self.menus.lock().unwrap_or_else(|e| e.into_inner())
    }

    // === Event Loop ===

    /// Drive the overlay until teardown, ticking at the frame interval.
    pub fn run(&mut self) {
        let interval = Duration::from_millis(self.options.frame_interval_ms);
        while self.is_running() {
            self.tick();
            thread::sleep(interval);
        }
        self.shutdown();
    }

    /// One frame: drain events, poll held keys, advance blink state and
    /// render. Hosts embedding their own message pump call this directly.
    pub fn tick(&mut self) {
        for event in self.bus.drain() {
            self.handle_event(event);
        }
        self.poll_delete_repeat();
        {
            let mut menus = self.lock_menus();
            for menu in menus.iter_mut() {
                menu.tick();
            }
        }
        self.render_frame();
    }

    fn handle_event(&mut self, event: OverlayEvent) {
        log::trace!("event: {}", event.description());
        match event {
            OverlayEvent::KeyPressed => self.toggle_active(),
            OverlayEvent::PointerDown(p) => self.pointer_down(p),
            OverlayEvent::CharInput(c) => {
                if !c.is_control() {
                    self.with_focused_textbox(|t| t.insert_char(c));
                }
            }
            OverlayEvent::CursorLeft => self.with_focused_textbox(|t| t.move_cursor_left()),
            OverlayEvent::CursorRight => self.with_focused_textbox(|t| t.move_cursor_right()),
            OverlayEvent::ButtonClicked(id) => {
                if let Some(handler) = self.click_handlers.get_mut(&id) {
                    handler();
                }
            }
            OverlayEvent::TargetClosed => self.shutdown(),
        }
    }

    // === Activation ===

    /// Two-state toggle driven by the activation hook. Active restores the
    /// original focusable style and takes foreground; inactive switches to
    /// click-through and hands foreground back to the tracked window.
    fn toggle_active(&mut self) {
        self.active = !self.active;
        if self.active {
            self.service.set_ex_style(self.window, self.original_style);
            self.service.set_foreground(self.window);
        } else {
            self.service
                .set_ex_style(self.window, self.original_style.click_through());
            self.service.set_foreground(self.target);
        }
        log::debug!(
            "overlay {}",
            if self.active { "activated" } else { "deactivated" }
        );
    }

    // === Pointer Routing ===

    fn pointer_down(&mut self, p: Point) {
        let action = {
            let menus = self.lock_menus();
            let mut action = PointerAction::Miss;
            for (i, menu) in menus.iter().enumerate() {
                if menu.pin_hit(p) {
                    action = PointerAction::TogglePin(i);
                    break;
                }
                if menu.header_hit(p) {
                    action = PointerAction::BeginDrag(menu.name().to_string(), menu.position());
                    break;
                }
                if menu.bounds().contains(p) {
                    action = PointerAction::Dispatch(i);
                    break;
                }
            }
            action
        };

        match action {
            PointerAction::TogglePin(i) => {
                let mut menus = self.lock_menus();
                if let Some(menu) = menus.get_mut(i) {
                    let pinned = menu.toggle_pin();
                    log::debug!("menu '{}' pinned: {pinned}", menu.name());
                }
            }
            PointerAction::BeginDrag(name, menu_pos) => {
                let grab = Point::new(p.x - menu_pos.x, p.y - menu_pos.y);
                self.start_drag(name, grab);
            }
            PointerAction::Dispatch(i) => {
                let (name, hit) = {
                    let mut menus = self.lock_menus();
                    match menus.get_mut(i) {
                        Some(menu) => {
                            let hit = menu.control_hit(p, &self.publisher);
                            (menu.name().to_string(), hit)
                        }
                        None => return,
                    }
                };
                match hit {
                    Some(id) => {
                        // Global mutual exclusion: only one focused text
                        // box across all menus.
                        let mut menus = self.lock_menus();
                        for menu in menus.iter_mut() {
                            if menu.name() != name {
                                menu.defocus_all();
                            }
                        }
                        drop(menus);
                        self.focus = Some(FocusHandle {
                            menu: name,
                            control: id,
                        });
                    }
                    None => {
                        // A dead-area hit clears focus everywhere, so no
                        // menu keeps drawing a cursor that gets no input.
                        let mut menus = self.lock_menus();
                        for menu in menus.iter_mut() {
                            menu.defocus_all();
                        }
                        drop(menus);
                        self.focus = None;
                    }
                }
            }
            PointerAction::Miss => {
                let mut menus = self.lock_menus();
                for menu in menus.iter_mut() {
                    menu.defocus_all();
                }
                drop(menus);
                self.focus = None;
            }
        }
    }

    /// Spawn the transient drag loop. While the left button stays down it
    /// clamps the candidate position to the overlay bounds and updates the
    /// menu at the drag interval; it exits on button release, overlay
    /// teardown or the dragged menu being removed, observed at the same
    /// cadence. The menu is resolved by name each iteration so removals of
    /// other menus mid-drag cannot redirect the drag.
    fn start_drag(&mut self, name: String, grab: Point) {
        if self.dragging.swap(true, Ordering::SeqCst) {
            return;
        }

        let menus = Arc::clone(&self.menus);
        let service = Arc::clone(&self.service);
        let overlay_rect = Arc::clone(&self.overlay_rect);
        let dragging = Arc::clone(&self.dragging);
        let stop = Arc::clone(&self.stop);
        let interval = Duration::from_millis(self.options.drag_interval_ms);

        let spawned = thread::Builder::new()
            .name("scrim-drag".into())
            .spawn(move || {
                while !stop.load(Ordering::SeqCst) && service.key_down(KEY_LBUTTON) {
                    let rect = *overlay_rect.lock().unwrap_or_else(|e| e.into_inner());
                    let cursor = service.cursor_pos();
                    let local = Point::new(cursor.x - rect.left, cursor.y - rect.top);
                    let candidate = Point::new(local.x - grab.x, local.y - grab.y);

                    let mut menus = menus.lock().unwrap_or_else(|e| e.into_inner());
                    let Some(menu) = menus.iter_mut().find(|m| m.name() == name) else {
                        break;
                    };
                    let clamped = clamp_drag_position(candidate, menu.width(), rect.size());
                    menu.set_position(clamped);
                    drop(menus);

                    thread::sleep(interval);
                }
                dragging.store(false, Ordering::SeqCst);
            });

        if spawned.is_err() {
            log::warn!("failed to spawn drag thread");
            self.dragging.store(false, Ordering::SeqCst);
        }
    }

    // === Keyboard Routing ===

    /// Delete-repeat is polled against the raw key state rather than the
    /// windowing framework's key repeat, which proved unreliable here. The
    /// raw state is global, so the poll runs only while the overlay is
    /// interactive; otherwise keys typed into the tracked window would
    /// edit the focused text box.
    fn poll_delete_repeat(&mut self) {
        if !self.active || self.focus.is_none() {
            return;
        }
        if !self.service.key_down(KEY_BACK) {
            self.last_delete = None;
            return;
        }
        let now = Instant::now();
        let due = match self.last_delete {
            None => true,
            Some(at) => {
                now.duration_since(at) >= Duration::from_millis(self.options.delete_repeat_ms)
            }
        };
        if due {
            self.with_focused_textbox(|t| t.delete_back());
            self.last_delete = Some(now);
        }
    }

    /// Resolve the focus handle and apply `f` to the text box it points
    /// at. A handle that no longer resolves is dropped as "no focus".
    fn with_focused_textbox(&mut self, f: impl FnOnce(&mut crate::ui::TextBox)) {
        let Some(handle) = self.focus.clone() else {
            return;
        };
        let resolved = {
            let mut menus = self.lock_menus();
            let textbox = menus
                .iter_mut()
                .find(|m| m.name() == handle.menu)
                .and_then(|m| m.control_mut(handle.control));
            match textbox {
                Some(Control::TextBox(t)) => {
                    f(t);
                    true
                }
                _ => false,
            }
        };
        if !resolved {
            self.focus = None;
        }
    }

    // === Render Pass ===

    /// Clear to transparent, draw every menu that is pinned or, while the
    /// overlay is active, all of them, in menu-list order; then present.
    fn render_frame(&mut self) {
        let active = self.active;
        let menus = Arc::clone(&self.menus);
        let result = self.surface.frame(&mut |canvas| {
            canvas.clear();
            let menus = menus.lock().unwrap_or_else(|e| e.into_inner());
            for menu in menus.iter() {
                if menu.pinned() || active {
                    menu.draw(canvas);
                }
            }
        });
        if let Err(e) = result {
            log::trace!("frame skipped: {e}");
        }
    }

    // === Teardown ===

    /// Orderly teardown: stop the hook and tracking loop, restore the
    /// original window style and drop the render surface. Each step is
    /// best-effort and independent; the call is idempotent.
    pub fn shutdown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.stop.store(true, Ordering::SeqCst);

        self.hook.stop();
        if let Some(thread) = self.tracker_thread.take() {
            if thread.join().is_err() {
                log::warn!("tracking thread panicked");
            }
        }
        self.service.set_ex_style(self.window, self.original_style);
        self.surface.clear();
        log::info!("overlay torn down");
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        self.shutdown();
    }
}

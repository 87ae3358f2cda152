//! Shared fakes for the integration tests: a fixed-size text measurer, an
//! in-memory window service and a recording renderer.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use scrim::{
    Canvas, OverlayError, Point, Rect, RenderSurface, Renderer, Size, StyleFlags, TextMetrics,
    TextStyle, WindowId, WindowService,
};

/// Every string measures 40x12, so layout is exactly predictable.
pub struct FixedMetrics;

impl TextMetrics for FixedMetrics {
    fn measure(&self, _text: &str, _style: &TextStyle) -> Size {
        Size::new(40.0, 12.0)
    }
}

#[derive(Default)]
struct ServiceState {
    rect: Option<Rect>,
    moved: Vec<(WindowId, Rect)>,
    styles: HashMap<isize, StyleFlags>,
    foreground: Vec<WindowId>,
    keys_down: HashSet<u16>,
    cursor: Point,
}

/// In-memory window service. The "foreign window" rectangle, key states
/// and cursor are plain fields the test mutates between ticks.
pub struct MockWindowService {
    state: Mutex<ServiceState>,
}

impl MockWindowService {
    pub fn new(rect: Rect) -> Self {
        Self {
            state: Mutex::new(ServiceState {
                rect: Some(rect),
                ..Default::default()
            }),
        }
    }

    pub fn set_rect(&self, rect: Option<Rect>) {
        self.state.lock().unwrap().rect = rect;
    }

    pub fn press_key(&self, key: u16) {
        self.state.lock().unwrap().keys_down.insert(key);
    }

    pub fn release_key(&self, key: u16) {
        self.state.lock().unwrap().keys_down.remove(&key);
    }

    pub fn set_cursor(&self, p: Point) {
        self.state.lock().unwrap().cursor = p;
    }

    pub fn moves(&self) -> Vec<(WindowId, Rect)> {
        self.state.lock().unwrap().moved.clone()
    }

    pub fn style_of(&self, window: WindowId) -> StyleFlags {
        self.state
            .lock()
            .unwrap()
            .styles
            .get(&window.0)
            .copied()
            .unwrap_or(StyleFlags::LAYERED)
    }

    pub fn foreground_calls(&self) -> Vec<WindowId> {
        self.state.lock().unwrap().foreground.clone()
    }
}

impl WindowService for MockWindowService {
    fn window_rect(&self, _window: WindowId) -> Option<Rect> {
        self.state.lock().unwrap().rect
    }

    fn move_window(&self, window: WindowId, rect: Rect) {
        self.state.lock().unwrap().moved.push((window, rect));
    }

    fn ex_style(&self, window: WindowId) -> StyleFlags {
        self.style_of(window)
    }

    fn set_ex_style(&self, window: WindowId, style: StyleFlags) {
        self.state.lock().unwrap().styles.insert(window.0, style);
    }

    fn set_foreground(&self, window: WindowId) {
        self.state.lock().unwrap().foreground.push(window);
    }

    fn key_down(&self, key: u16) -> bool {
        self.state.lock().unwrap().keys_down.contains(&key)
    }

    fn cursor_pos(&self) -> Point {
        self.state.lock().unwrap().cursor
    }
}

pub struct TestSurface {
    width: u32,
    height: u32,
    frames: Arc<AtomicU32>,
}

impl RenderSurface for TestSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn frame(&mut self, draw: &mut dyn FnMut(&mut dyn Canvas)) -> Result<(), OverlayError> {
        self.frames.fetch_add(1, Ordering::SeqCst);
        let mut canvas = NullCanvas;
        draw(&mut canvas);
        Ok(())
    }
}

struct NullCanvas;

impl Canvas for NullCanvas {
    fn clear(&mut self) {}
    fn fill_rect(&mut self, _rect: Rect, _color: scrim::Color) {}
    fn fill_round_rect(&mut self, _rect: Rect, _radius: f32, _color: scrim::Color) {}
    fn stroke_round_rect(&mut self, _rect: Rect, _radius: f32, _width: f32, _color: scrim::Color) {}
    fn fill_circle(&mut self, _center: Point, _radius: f32, _color: scrim::Color) {}
    fn stroke_circle(&mut self, _center: Point, _radius: f32, _width: f32, _color: scrim::Color) {}
    fn line(&mut self, _from: Point, _to: Point, _width: f32, _color: scrim::Color) {}
    fn text(&mut self, _text: &str, _origin: Point, _style: &TextStyle) {}
}

/// Renderer recording every surface allocation. Shared counters let the
/// test assert how many rebuilds the tracking loop triggered.
pub struct MockRenderer {
    pub created: Arc<Mutex<Vec<(u32, u32)>>>,
    pub frames: Arc<AtomicU32>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self {
            created: Arc::new(Mutex::new(Vec::new())),
            frames: Arc::new(AtomicU32::new(0)),
        }
    }
}

impl Renderer for MockRenderer {
    fn create_surface(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn RenderSurface>, OverlayError> {
        self.created.lock().unwrap().push((width, height));
        Ok(Box::new(TestSurface {
            width,
            height,
            frames: Arc::clone(&self.frames),
        }))
    }
}

/// Poll `cond` until it holds or `timeout` elapses. Background loops in
/// these tests run on millisecond intervals; waiting beats fixed sleeps.
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}

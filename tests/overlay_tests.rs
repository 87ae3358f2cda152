//! End-to-end coordinator scenarios against in-memory platform fakes:
//! construction, activation toggling, tracking, pointer/keyboard routing,
//! dragging and teardown.

mod helpers;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use helpers::{wait_until, FixedMetrics, MockRenderer, MockWindowService};
use scrim::input::ActivationHook;
use scrim::model::constants::{KEY_BACK, KEY_INSERT, KEY_LBUTTON};
use scrim::overlay::tracking::Tracker;
use scrim::{
    Button, Control, EventBus, Overlay, OverlayEvent, OverlayOptions, Point, Rect, Renderer,
    SharedSurface, StyleFlags, TextBox, TextStyle, WindowId, WindowService,
};

const TARGET: WindowId = WindowId(1);
const WINDOW: WindowId = WindowId(2);

/// Millisecond intervals so background loops react within a few polls.
fn fast_options() -> OverlayOptions {
    OverlayOptions {
        track_interval_ms: 1,
        hook_interval_ms: 1,
        frame_interval_ms: 1,
        drag_interval_ms: 1,
        delete_repeat_ms: 1,
        ..Default::default()
    }
}

fn fixture(rect: Rect) -> (Overlay, Arc<MockWindowService>, Arc<Mutex<Vec<(u32, u32)>>>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let service = Arc::new(MockWindowService::new(rect));
    let renderer = MockRenderer::new();
    let created = Arc::clone(&renderer.created);
    let overlay = Overlay::new(
        TARGET,
        WINDOW,
        service.clone(),
        Box::new(renderer),
        Arc::new(FixedMetrics),
        fast_options(),
    )
    .expect("overlay construction");
    (overlay, service, created)
}

#[test]
fn construction_sizes_surface_and_goes_click_through() {
    let rect = Rect::new(100.0, 100.0, 900.0, 700.0);
    let (overlay, service, created) = fixture(rect);

    assert_eq!(overlay.surface_dimensions(), Some((800, 600)));
    assert_eq!(created.lock().unwrap().first(), Some(&(800, 600)));
    assert!(service.moves().contains(&(WINDOW, rect)));

    let style = service.style_of(WINDOW);
    assert!(style.contains(StyleFlags::LAYERED));
    assert!(style.contains(StyleFlags::TRANSPARENT));
    assert!(!overlay.active());
}

#[test]
fn construction_fails_when_target_is_gone() {
    let service = Arc::new(MockWindowService::new(Rect::new(0.0, 0.0, 10.0, 10.0)));
    service.set_rect(None);
    let result = Overlay::new(
        TARGET,
        WINDOW,
        service,
        Box::new(MockRenderer::new()),
        Arc::new(FixedMetrics),
        fast_options(),
    );
    assert!(result.is_err());
}

#[test]
fn activation_key_toggles_style_and_foreground() {
    let (mut overlay, service, _) = fixture(Rect::new(0.0, 0.0, 800.0, 600.0));
    let events = overlay.events();

    events.publish(OverlayEvent::KeyPressed);
    overlay.tick();
    assert!(overlay.active());
    let style = service.style_of(WINDOW);
    assert!(style.contains(StyleFlags::LAYERED));
    assert!(!style.contains(StyleFlags::TRANSPARENT));
    assert_eq!(service.foreground_calls().last(), Some(&WINDOW));

    events.publish(OverlayEvent::KeyPressed);
    overlay.tick();
    assert!(!overlay.active());
    assert!(service.style_of(WINDOW).contains(StyleFlags::TRANSPARENT));
    assert_eq!(service.foreground_calls().last(), Some(&TARGET));
}

#[test]
fn button_click_reaches_the_subscribed_callback() {
    let (mut overlay, _, _) = fixture(Rect::new(0.0, 0.0, 800.0, 600.0));

    let mut menu = overlay.create_menu("panel", Point::new(100.0, 100.0));
    let button = menu.add_control(Button::new("go", TextStyle::default()).interactive(true));
    overlay.add_menu(menu);

    let fired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&fired);
    overlay.on_click(button, move || flag.store(true, Ordering::SeqCst));

    // Button box is (110,124)-(170,146). The click event lands on the
    // first tick; the published ButtonClicked is handled on the next.
    overlay.events().publish(OverlayEvent::PointerDown(Point::new(140.0, 130.0)));
    overlay.tick();
    overlay.tick();
    assert!(fired.load(Ordering::SeqCst));
}

#[test]
fn typing_edits_the_focused_textbox() {
    let (mut overlay, _, _) = fixture(Rect::new(0.0, 0.0, 800.0, 600.0));

    let mut menu = overlay.create_menu("input", Point::new(0.0, 0.0));
    let textbox = menu.add_control(TextBox::new("", TextStyle::default()));
    overlay.add_menu(menu);
    let events = overlay.events();

    // Text box occupies (10,24)-(70,46).
    events.publish(OverlayEvent::PointerDown(Point::new(20.0, 30.0)));
    overlay.tick();
    assert!(overlay.focused_control().is_some());

    events.publish(OverlayEvent::CharInput('h'));
    events.publish(OverlayEvent::CharInput('i'));
    events.publish(OverlayEvent::CursorLeft);
    events.publish(OverlayEvent::CharInput('!'));
    overlay.tick();

    assert_eq!(textbox_text(&overlay, "input", textbox), Some("h!i".to_string()));
}

#[test]
fn held_delete_repeats_against_the_focused_textbox() {
    let (mut overlay, service, _) = fixture(Rect::new(0.0, 0.0, 800.0, 600.0));

    let mut menu = overlay.create_menu("input", Point::new(0.0, 0.0));
    let textbox = menu.add_control(TextBox::new("abc", TextStyle::default()));
    overlay.add_menu(menu);

    // Delete-repeat only runs while the overlay is interactive.
    overlay.events().publish(OverlayEvent::KeyPressed);
    overlay.events().publish(OverlayEvent::PointerDown(Point::new(20.0, 30.0)));
    overlay.tick();
    assert!(overlay.active());

    // First deletion fires on the tick that sees the key down.
    service.press_key(KEY_BACK);
    overlay.tick();
    assert_eq!(textbox_text(&overlay, "input", textbox), Some("ab".to_string()));

    // Still held past the repeat interval: delete again.
    std::thread::sleep(Duration::from_millis(5));
    overlay.tick();
    assert_eq!(textbox_text(&overlay, "input", textbox), Some("a".to_string()));

    service.release_key(KEY_BACK);
    overlay.tick();
    assert_eq!(textbox_text(&overlay, "input", textbox), Some("a".to_string()));
}

#[test]
fn held_delete_is_ignored_while_click_through() {
    let (mut overlay, service, _) = fixture(Rect::new(0.0, 0.0, 800.0, 600.0));

    let mut menu = overlay.create_menu("input", Point::new(0.0, 0.0));
    let textbox = menu.add_control(TextBox::new("abc", TextStyle::default()));
    overlay.add_menu(menu);

    overlay.events().publish(OverlayEvent::PointerDown(Point::new(20.0, 30.0)));
    overlay.tick();
    assert!(!overlay.active());

    // Backspace typed into the tracked window must not edit the overlay.
    service.press_key(KEY_BACK);
    overlay.tick();
    std::thread::sleep(Duration::from_millis(5));
    overlay.tick();
    assert_eq!(textbox_text(&overlay, "input", textbox), Some("abc".to_string()));

    service.release_key(KEY_BACK);
}

#[test]
fn dead_area_click_in_another_menu_defocuses_everything() {
    let (mut overlay, _, _) = fixture(Rect::new(0.0, 0.0, 800.0, 600.0));

    let mut first = overlay.create_menu("input", Point::new(0.0, 0.0));
    let textbox = first.add_control(TextBox::new("", TextStyle::default()));
    overlay.add_menu(first);
    let second = overlay.create_menu("other", Point::new(300.0, 0.0));
    overlay.add_menu(second);
    let events = overlay.events();

    events.publish(OverlayEvent::PointerDown(Point::new(20.0, 30.0)));
    overlay.tick();
    assert!(overlay.focused_control().is_some());
    assert_eq!(textbox_focused(&overlay, "input", textbox), Some(true));

    // Bottom margin of "other": inside its bounds, on no control.
    events.publish(OverlayEvent::PointerDown(Point::new(305.0, 30.0)));
    overlay.tick();
    assert!(overlay.focused_control().is_none());
    assert_eq!(textbox_focused(&overlay, "input", textbox), Some(false));
}

#[test]
fn edits_after_control_removal_drop_focus_silently() {
    let (mut overlay, _, _) = fixture(Rect::new(0.0, 0.0, 800.0, 600.0));

    let mut menu = overlay.create_menu("input", Point::new(0.0, 0.0));
    menu.add_control(TextBox::new("", TextStyle::default()));
    overlay.add_menu(menu);
    let events = overlay.events();

    events.publish(OverlayEvent::PointerDown(Point::new(20.0, 30.0)));
    overlay.tick();
    assert!(overlay.focused_control().is_some());

    overlay.with_menu("input", |m| m.clear_controls());
    events.publish(OverlayEvent::CharInput('x'));
    overlay.tick();
    assert!(overlay.focused_control().is_none());
}

#[test]
fn header_drag_moves_the_menu_within_bounds() {
    let (mut overlay, service, _) = fixture(Rect::new(0.0, 0.0, 800.0, 600.0));

    let menu = overlay.create_menu("panel", Point::new(100.0, 100.0));
    overlay.add_menu(menu);

    // Grab the header at (110,105), 10x5 into the menu, then move the
    // cursor so the candidate position lands at (200,200).
    service.press_key(KEY_LBUTTON);
    service.set_cursor(Point::new(210.0, 205.0));
    overlay.events().publish(OverlayEvent::PointerDown(Point::new(110.0, 105.0)));
    overlay.tick();
    assert!(overlay.is_dragging());

    let moved = wait_until(Duration::from_secs(1), || {
        overlay.with_menu("panel", |m| m.position()) == Some(Point::new(200.0, 200.0))
    });
    assert!(moved);

    service.release_key(KEY_LBUTTON);
    assert!(wait_until(Duration::from_secs(1), || !overlay.is_dragging()));
}

#[test]
fn drag_stays_on_its_menu_when_an_earlier_menu_is_removed() {
    let (mut overlay, service, _) = fixture(Rect::new(0.0, 0.0, 800.0, 600.0));

    let first = overlay.create_menu("first", Point::new(300.0, 300.0));
    overlay.add_menu(first);
    let second = overlay.create_menu("second", Point::new(100.0, 100.0));
    overlay.add_menu(second);

    // Grab the second menu's header at (110,105).
    service.press_key(KEY_LBUTTON);
    service.set_cursor(Point::new(110.0, 105.0));
    overlay.events().publish(OverlayEvent::PointerDown(Point::new(110.0, 105.0)));
    overlay.tick();
    assert!(overlay.is_dragging());

    // Removing an unrelated menu mid-drag must not redirect or end the
    // drag session.
    assert!(overlay.remove_menu("first"));
    service.set_cursor(Point::new(210.0, 205.0));
    let moved = wait_until(Duration::from_secs(1), || {
        overlay.with_menu("second", |m| m.position()) == Some(Point::new(200.0, 200.0))
    });
    assert!(moved);
    assert!(overlay.is_dragging());

    service.release_key(KEY_LBUTTON);
    assert!(wait_until(Duration::from_secs(1), || !overlay.is_dragging()));
}

#[test]
fn pin_click_toggles_without_starting_a_drag() {
    let (mut overlay, _, _) = fixture(Rect::new(0.0, 0.0, 800.0, 600.0));

    let menu = overlay.create_menu("panel", Point::new(100.0, 100.0));
    overlay.add_menu(menu);

    // Empty "panel" menu is 60 wide; pin circle centre is (148,112).
    overlay.events().publish(OverlayEvent::PointerDown(Point::new(148.0, 112.0)));
    overlay.tick();
    assert!(!overlay.is_dragging());
    assert_eq!(overlay.with_menu("panel", |m| m.pinned()), Some(true));

    overlay.events().publish(OverlayEvent::PointerDown(Point::new(148.0, 112.0)));
    overlay.tick();
    assert_eq!(overlay.with_menu("panel", |m| m.pinned()), Some(false));
}

#[test]
fn vanished_target_tears_the_overlay_down() {
    let (mut overlay, service, _) = fixture(Rect::new(0.0, 0.0, 800.0, 600.0));
    assert!(overlay.is_running());

    service.set_rect(None);
    let stopped = wait_until(Duration::from_secs(2), || {
        overlay.tick();
        !overlay.is_running()
    });
    assert!(stopped);
}

#[test]
fn shutdown_restores_style_and_is_idempotent() {
    let (mut overlay, service, _) = fixture(Rect::new(0.0, 0.0, 800.0, 600.0));

    overlay.shutdown();
    assert!(!overlay.is_running());
    assert_eq!(service.style_of(WINDOW), StyleFlags::LAYERED);
    assert!(overlay.surface_dimensions().is_none());

    overlay.shutdown();
    assert!(!overlay.is_running());
}

#[test]
fn tracker_repositions_without_rebuilding_on_a_pure_move() {
    let initial = Rect::new(100.0, 100.0, 900.0, 700.0);
    let service = Arc::new(MockWindowService::new(initial));
    let mut renderer = MockRenderer::new();
    let created = Arc::clone(&renderer.created);

    let surface = SharedSurface::empty();
    surface.replace(renderer.create_surface(800, 600).expect("initial surface"));
    let overlay_rect = Arc::new(Mutex::new(initial));
    let bus = EventBus::new();

    let mut tracker = Tracker::new(
        service.clone() as Arc<dyn WindowService>,
        Box::new(renderer),
        TARGET,
        WINDOW,
        surface.clone(),
        Arc::clone(&overlay_rect),
        bus.publisher(),
        initial,
    );

    assert!(tracker.tick());
    assert!(service.moves().is_empty());

    let moved_rect = Rect::new(50.0, 50.0, 850.0, 650.0);
    service.set_rect(Some(moved_rect));
    assert!(tracker.tick());
    assert_eq!(service.moves(), vec![(WINDOW, moved_rect)]);
    assert_eq!(created.lock().unwrap().len(), 1);
    assert_eq!(surface.dimensions(), Some((800, 600)));
    assert_eq!(*overlay_rect.lock().unwrap(), moved_rect);

    let resized_rect = Rect::new(50.0, 50.0, 750.0, 550.0);
    service.set_rect(Some(resized_rect));
    assert!(tracker.tick());
    assert_eq!(created.lock().unwrap().last(), Some(&(700, 500)));
    assert_eq!(surface.dimensions(), Some((700, 500)));

    service.set_rect(None);
    assert!(!tracker.tick());
    assert_eq!(bus.drain(), vec![OverlayEvent::TargetClosed]);
}

#[test]
fn activation_hook_fires_once_per_down_edge() {
    let service = Arc::new(MockWindowService::new(Rect::new(0.0, 0.0, 10.0, 10.0)));
    let bus = EventBus::new();
    let mut hook = ActivationHook::spawn(
        KEY_INSERT,
        Duration::from_millis(1),
        service.clone(),
        bus.publisher(),
    );

    let mut seen = Vec::new();
    service.press_key(KEY_INSERT);
    assert!(wait_until(Duration::from_secs(1), || {
        seen.extend(bus.drain());
        !seen.is_empty()
    }));

    // Holding the key must not fire again.
    std::thread::sleep(Duration::from_millis(30));
    seen.extend(bus.drain());
    assert_eq!(seen, vec![OverlayEvent::KeyPressed]);

    service.release_key(KEY_INSERT);
    std::thread::sleep(Duration::from_millis(10));
    service.press_key(KEY_INSERT);
    assert!(wait_until(Duration::from_secs(1), || {
        seen.extend(bus.drain());
        seen.len() == 2
    }));

    hook.stop();
    assert!(!hook.is_running());
    hook.stop();
}

fn textbox_text(overlay: &Overlay, menu: &str, id: u32) -> Option<String> {
    overlay
        .with_menu(menu, |m| match m.control_mut(id) {
            Some(Control::TextBox(t)) => Some(t.text().to_string()),
            _ => None,
        })
        .flatten()
}

fn textbox_focused(overlay: &Overlay, menu: &str, id: u32) -> Option<bool> {
    overlay
        .with_menu(menu, |m| match m.control_mut(id) {
            Some(Control::TextBox(t)) => Some(t.is_focused()),
            _ => None,
        })
        .flatten()
}

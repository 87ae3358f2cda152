//! Overlay window host: window class, wndproc and message pump.
//!
//! Creates the layered, topmost overlay window for a target HWND, wires
//! the Win32 service, Direct2D renderer and DirectWrite metrics into an
//! [`Overlay`], and pumps messages while ticking the overlay. Input
//! messages are forwarded into the event bus; the wndproc publishes and
//! the overlay tick drains.

use std::cell::RefCell;
use std::sync::{Arc, Once};
use std::time::Duration;

use windows::core::w;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Direct2D::{
    D2D1CreateFactory, ID2D1Factory, D2D1_FACTORY_TYPE_MULTI_THREADED,
};
use windows::Win32::Graphics::DirectWrite::{
    DWriteCreateFactory, IDWriteFactory, DWRITE_FACTORY_TYPE_SHARED,
};
use windows::Win32::System::Com::{CoInitializeEx, COINIT_APARTMENTTHREADED};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DispatchMessageW, LoadCursorW, PeekMessageW, PostQuitMessage,
    RegisterClassW, ShowWindow, TranslateMessage, CS_HREDRAW, CS_VREDRAW, IDC_ARROW, MSG,
    PM_REMOVE, SW_SHOW, WM_CHAR, WM_DESTROY, WM_KEYDOWN, WM_LBUTTONDOWN, WM_QUIT, WNDCLASSW,
    WS_EX_LAYERED, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_POPUP,
};

use crate::error::OverlayError;
use crate::events::{EventPublisher, OverlayEvent};
use crate::model::constants::{KEY_LEFT, KEY_RIGHT};
use crate::model::{OverlayOptions, Point};
use crate::overlay::Overlay;
use crate::platform::{WindowId, WindowService};

use super::renderer::D2dRenderer;
use super::text::DwriteMetrics;
use super::window_service::Win32WindowService;

thread_local! {
    static PUBLISHER: RefCell<Option<EventPublisher>> = const { RefCell::new(None) };
}

static REGISTER_CLASS: Once = Once::new();

/// Create an overlay for the window `target`, ready to [`run`].
///
/// The overlay window is created layered and topmost but without the
/// click-through bit; the coordinator snapshots that style as "normal"
/// and applies click-through itself while inactive.
pub fn create_overlay(target: WindowId, options: OverlayOptions) -> Result<Overlay, OverlayError> {
    unsafe {
        // Repeat calls report RPC_E_CHANGED_MODE at worst; COM stays usable.
        let _ = CoInitializeEx(None, COINIT_APARTMENTTHREADED);

        let d2d: ID2D1Factory = D2D1CreateFactory(D2D1_FACTORY_TYPE_MULTI_THREADED, None)?;
        let dwrite: IDWriteFactory = DWriteCreateFactory(DWRITE_FACTORY_TYPE_SHARED)?;

        let instance = GetModuleHandleW(None)?;
        let class_name = w!("ScrimOverlay");

        REGISTER_CLASS.call_once(|| {
            let wc = WNDCLASSW {
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(wndproc),
                hInstance: instance.into(),
                hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
                lpszClassName: class_name,
                ..Default::default()
            };
            RegisterClassW(&wc);
        });

        let service: Arc<dyn WindowService> = Arc::new(Win32WindowService::new());
        let rect = service
            .window_rect(target)
            .ok_or(OverlayError::TargetWindowGone)?;

        let ex_style = WS_EX_LAYERED | WS_EX_TOPMOST | WS_EX_TOOLWINDOW;
        let hwnd = CreateWindowExW(
            ex_style,
            class_name,
            w!("scrim overlay"),
            WS_POPUP,
            rect.left as i32,
            rect.top as i32,
            rect.width() as i32,
            rect.height() as i32,
            None,
            None,
            Some(instance.into()),
            None,
        )?;
        let _ = ShowWindow(hwnd, SW_SHOW);

        let renderer = Box::new(D2dRenderer::new(hwnd, d2d, dwrite.clone()));
        let metrics = Arc::new(DwriteMetrics::new(dwrite));

        let overlay = Overlay::new(
            target,
            WindowId(hwnd.0 as isize),
            service,
            renderer,
            metrics,
            options,
        )?;

        PUBLISHER.with(|p| *p.borrow_mut() = Some(overlay.events()));
        Ok(overlay)
    }
}

/// Pump Win32 messages and tick the overlay until teardown.
///
/// Blocks the calling thread; this is the `run()` the host hands control
/// to after wiring up menus and click subscriptions.
pub fn run(overlay: &mut Overlay) {
    let interval = Duration::from_millis(overlay.options().frame_interval_ms);
    let mut msg = MSG::default();
    while overlay.is_running() {
        unsafe {
            while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                if msg.message == WM_QUIT {
                    overlay.shutdown();
                    return;
                }
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
        overlay.tick();
        std::thread::sleep(interval);
    }
    overlay.shutdown();
}

fn publish(event: OverlayEvent) {
    PUBLISHER.with(|p| {
        if let Some(publisher) = p.borrow().as_ref() {
            publisher.publish(event);
        }
    });
}

extern "system" fn wndproc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_LBUTTONDOWN => {
            // Client coordinates match overlay coordinates: the overlay
            // window covers the tracked window exactly.
            let x = (lparam.0 & 0xFFFF) as u16 as i16 as f32;
            let y = ((lparam.0 >> 16) & 0xFFFF) as u16 as i16 as f32;
            publish(OverlayEvent::PointerDown(Point::new(x, y)));
            LRESULT(0)
        }

        WM_CHAR => {
            if let Some(c) = char::from_u32(wparam.0 as u32) {
                publish(OverlayEvent::CharInput(c));
            }
            LRESULT(0)
        }

        WM_KEYDOWN => {
            match wparam.0 as u16 {
                KEY_LEFT => publish(OverlayEvent::CursorLeft),
                KEY_RIGHT => publish(OverlayEvent::CursorRight),
                _ => {}
            }
            LRESULT(0)
        }

        WM_DESTROY => {
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }

        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

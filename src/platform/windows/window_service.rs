//! Win32 implementation of the platform window service.
//!
//! Thin, stateless pass-through to user32. Failures surface as `None` or
//! are swallowed; the overlay's polling loops recover on their next tick.

use windows::Win32::Foundation::{HWND, POINT, RECT};
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetWindowLongW, GetWindowRect, IsWindow, SetForegroundWindow, SetWindowLongW,
    SetWindowPos, GWL_EXSTYLE, SWP_NOACTIVATE, SWP_NOZORDER,
};

use crate::model::{Point, Rect};
use crate::platform::{StyleFlags, WindowId, WindowService};

fn hwnd(window: WindowId) -> HWND {
    HWND(window.0 as *mut core::ffi::c_void)
}

/// Stateless Win32 window service.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32WindowService;

impl Win32WindowService {
    pub fn new() -> Self {
        Self
    }
}

impl WindowService for Win32WindowService {
    fn window_rect(&self, window: WindowId) -> Option<Rect> {
        unsafe {
            if !IsWindow(Some(hwnd(window))).as_bool() {
                return None;
            }
            let mut rect = RECT::default();
            GetWindowRect(hwnd(window), &mut rect).ok()?;
            Some(Rect::new(
                rect.left as f32,
                rect.top as f32,
                rect.right as f32,
                rect.bottom as f32,
            ))
        }
    }

    fn move_window(&self, window: WindowId, rect: Rect) {
        unsafe {
            let _ = SetWindowPos(
                hwnd(window),
                None,
                rect.left as i32,
                rect.top as i32,
                rect.width() as i32,
                rect.height() as i32,
                SWP_NOACTIVATE | SWP_NOZORDER,
            );
        }
    }

    fn ex_style(&self, window: WindowId) -> StyleFlags {
        unsafe { StyleFlags(GetWindowLongW(hwnd(window), GWL_EXSTYLE) as u32) }
    }

    fn set_ex_style(&self, window: WindowId, style: StyleFlags) {
        unsafe {
            SetWindowLongW(hwnd(window), GWL_EXSTYLE, style.0 as i32);
        }
    }

    fn set_foreground(&self, window: WindowId) {
        unsafe {
            let _ = SetForegroundWindow(hwnd(window));
        }
    }

    fn key_down(&self, key: u16) -> bool {
        // High bit: the key is physically down right now.
        unsafe { (GetAsyncKeyState(key as i32) as u16 & 0x8000) != 0 }
    }

    fn cursor_pos(&self) -> Point {
        let mut point = POINT::default();
        unsafe {
            let _ = GetCursorPos(&mut point);
        }
        Point::new(point.x as f32, point.y as f32)
    }
}

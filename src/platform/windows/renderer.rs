//! Direct2D overlay rendering.
//!
//! Each surface owns an ARGB DIB section bound to a Direct2D DC render
//! target. A frame draws into the bitmap and presents it with
//! `UpdateLayeredWindow`, giving per-pixel alpha over whatever the
//! overlay covers. Surfaces are fixed-size; the tracking loop allocates a
//! replacement when the tracked window's size changes.

use windows::core::w;
use windows::Win32::Foundation::{COLORREF, HWND, POINT, RECT, SIZE};
use windows::Win32::Graphics::Direct2D::Common::{
    D2D1_ALPHA_MODE_PREMULTIPLIED, D2D1_COLOR_F, D2D1_PIXEL_FORMAT, D2D_RECT_F,
};
use windows::Win32::Graphics::Direct2D::{
    ID2D1Factory, ID2D1RenderTarget, D2D1_ANTIALIAS_MODE_PER_PRIMITIVE,
    D2D1_DRAW_TEXT_OPTIONS_NONE, D2D1_ELLIPSE, D2D1_RENDER_TARGET_PROPERTIES,
    D2D1_RENDER_TARGET_TYPE_DEFAULT, D2D1_RENDER_TARGET_USAGE_NONE, D2D1_ROUNDED_RECT,
};
use windows::Win32::Graphics::DirectWrite::{
    IDWriteFactory, DWRITE_FONT_STRETCH_NORMAL, DWRITE_FONT_STYLE_NORMAL,
    DWRITE_FONT_WEIGHT_NORMAL,
};
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT_B8G8R8A8_UNORM;
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleDC, CreateDIBSection, DeleteDC, DeleteObject, GetDC, ReleaseDC, SelectObject,
    BITMAPINFO, BITMAPINFOHEADER, BI_RGB, BLENDFUNCTION, DIB_RGB_COLORS, HBITMAP, HDC, HGDIOBJ,
};
use windows::Win32::UI::WindowsAndMessaging::{UpdateLayeredWindow, ULW_ALPHA};
use windows_numerics::Vector2;

use crate::error::OverlayError;
use crate::model::{Color, Point, Rect, TextStyle};
use crate::render::{Canvas, RenderSurface, Renderer};

fn d2d_color(c: Color) -> D2D1_COLOR_F {
    D2D1_COLOR_F {
        r: c.r,
        g: c.g,
        b: c.b,
        a: c.a,
    }
}

fn d2d_rect(r: Rect) -> D2D_RECT_F {
    D2D_RECT_F {
        left: r.left,
        top: r.top,
        right: r.right,
        bottom: r.bottom,
    }
}

/// Allocates layered-window surfaces for one overlay window.
pub struct D2dRenderer {
    hwnd: HWND,
    d2d: ID2D1Factory,
    dwrite: IDWriteFactory,
}

// The renderer moves into the tracking thread after construction. The
// Direct2D factory is created multi-threaded and the DirectWrite shared
// factory is free-threaded.
unsafe impl Send for D2dRenderer {}

impl D2dRenderer {
    pub fn new(hwnd: HWND, d2d: ID2D1Factory, dwrite: IDWriteFactory) -> Self {
        Self { hwnd, d2d, dwrite }
    }
}

impl Renderer for D2dRenderer {
    fn create_surface(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn RenderSurface>, OverlayError> {
        unsafe {
            let screen_dc = GetDC(None);
            let mem_dc = CreateCompatibleDC(Some(screen_dc));

            let bmi = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: width as i32,
                    biHeight: -(height as i32), // Top-down
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                ..Default::default()
            };

            let mut bits: *mut std::ffi::c_void = std::ptr::null_mut();
            let bitmap = CreateDIBSection(Some(mem_dc), &bmi, DIB_RGB_COLORS, &mut bits, None, 0);
            ReleaseDC(None, screen_dc);

            let bitmap = match bitmap {
                Ok(b) if !bits.is_null() => b,
                Ok(b) => {
                    let _ = DeleteObject(b.into());
                    let _ = DeleteDC(mem_dc);
                    return Err(OverlayError::Platform("empty DIB section".into()));
                }
                Err(e) => {
                    let _ = DeleteDC(mem_dc);
                    return Err(e.into());
                }
            };
            let old_bitmap = SelectObject(mem_dc, bitmap.into());

            let rt_props = D2D1_RENDER_TARGET_PROPERTIES {
                r#type: D2D1_RENDER_TARGET_TYPE_DEFAULT,
                pixelFormat: D2D1_PIXEL_FORMAT {
                    format: DXGI_FORMAT_B8G8R8A8_UNORM,
                    alphaMode: D2D1_ALPHA_MODE_PREMULTIPLIED,
                },
                dpiX: 96.0,
                dpiY: 96.0,
                usage: D2D1_RENDER_TARGET_USAGE_NONE,
                minLevel: Default::default(),
            };

            let dc_rt = match self.d2d.CreateDCRenderTarget(&rt_props) {
                Ok(rt) => rt,
                Err(e) => {
                    SelectObject(mem_dc, old_bitmap);
                    let _ = DeleteObject(bitmap.into());
                    let _ = DeleteDC(mem_dc);
                    return Err(e.into());
                }
            };

            let bind_rect = RECT {
                left: 0,
                top: 0,
                right: width as i32,
                bottom: height as i32,
            };
            if let Err(e) = dc_rt.BindDC(mem_dc, &bind_rect) {
                SelectObject(mem_dc, old_bitmap);
                let _ = DeleteObject(bitmap.into());
                let _ = DeleteDC(mem_dc);
                return Err(e.into());
            }

            let rt: ID2D1RenderTarget = dc_rt.into();
            rt.SetAntialiasMode(D2D1_ANTIALIAS_MODE_PER_PRIMITIVE);

            Ok(Box::new(D2dSurface {
                hwnd: self.hwnd,
                rt,
                dwrite: self.dwrite.clone(),
                mem_dc,
                bitmap,
                old_bitmap,
                width,
                height,
            }))
        }
    }
}

/// A fixed-size ARGB surface presented via `UpdateLayeredWindow`.
pub struct D2dSurface {
    hwnd: HWND,
    rt: ID2D1RenderTarget,
    dwrite: IDWriteFactory,
    mem_dc: HDC,
    bitmap: HBITMAP,
    old_bitmap: HGDIOBJ,
    width: u32,
    height: u32,
}

// Created on the tracking thread, drawn from the render tick; access is
// serialized by the SharedSurface lock.
unsafe impl Send for D2dSurface {}

impl RenderSurface for D2dSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn frame(&mut self, draw: &mut dyn FnMut(&mut dyn Canvas)) -> Result<(), OverlayError> {
        unsafe {
            self.rt.BeginDraw();
            {
                let mut canvas = D2dCanvas {
                    rt: &self.rt,
                    dwrite: &self.dwrite,
                };
                draw(&mut canvas);
            }
            self.rt.EndDraw(None, None)?;

            // Present: blend the bitmap into the layered window.
            let screen_dc = GetDC(None);
            let pt_src = POINT { x: 0, y: 0 };
            let size = SIZE {
                cx: self.width as i32,
                cy: self.height as i32,
            };
            let blend = BLENDFUNCTION {
                BlendOp: 0,
                BlendFlags: 0,
                SourceConstantAlpha: 255,
                AlphaFormat: 1, // AC_SRC_ALPHA
            };
            let result = UpdateLayeredWindow(
                self.hwnd,
                Some(screen_dc),
                None, // Position is owned by the tracking loop
                Some(&size),
                Some(self.mem_dc),
                Some(&pt_src),
                COLORREF(0),
                Some(&blend),
                ULW_ALPHA,
            );
            ReleaseDC(None, screen_dc);
            result?;
        }
        Ok(())
    }
}

impl Drop for D2dSurface {
    fn drop(&mut self) {
        unsafe {
            SelectObject(self.mem_dc, self.old_bitmap);
            let _ = DeleteObject(self.bitmap.into());
            let _ = DeleteDC(self.mem_dc);
        }
    }
}

/// Per-frame drawing context over a bound DC render target.
struct D2dCanvas<'a> {
    rt: &'a ID2D1RenderTarget,
    dwrite: &'a IDWriteFactory,
}

impl D2dCanvas<'_> {
    fn brush(
        &self,
        color: Color,
    ) -> Option<windows::Win32::Graphics::Direct2D::ID2D1SolidColorBrush> {
        unsafe { self.rt.CreateSolidColorBrush(&d2d_color(color), None).ok() }
    }
}

impl Canvas for D2dCanvas<'_> {
    fn clear(&mut self) {
        unsafe {
            self.rt.Clear(Some(&d2d_color(Color::TRANSPARENT)));
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if let Some(brush) = self.brush(color) {
            unsafe {
                self.rt.FillRectangle(&d2d_rect(rect), &brush);
            }
        }
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        if let Some(brush) = self.brush(color) {
            let rr = D2D1_ROUNDED_RECT {
                rect: d2d_rect(rect),
                radiusX: radius,
                radiusY: radius,
            };
            unsafe {
                self.rt.FillRoundedRectangle(&rr, &brush);
            }
        }
    }

    fn stroke_round_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Color) {
        if let Some(brush) = self.brush(color) {
            let rr = D2D1_ROUNDED_RECT {
                rect: d2d_rect(rect),
                radiusX: radius,
                radiusY: radius,
            };
            unsafe {
                self.rt.DrawRoundedRectangle(&rr, &brush, width, None);
            }
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        if let Some(brush) = self.brush(color) {
            let ellipse = D2D1_ELLIPSE {
                point: Vector2::new(center.x, center.y),
                radiusX: radius,
                radiusY: radius,
            };
            unsafe {
                self.rt.FillEllipse(&ellipse, &brush);
            }
        }
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, width: f32, color: Color) {
        if let Some(brush) = self.brush(color) {
            let ellipse = D2D1_ELLIPSE {
                point: Vector2::new(center.x, center.y),
                radiusX: radius,
                radiusY: radius,
            };
            unsafe {
                self.rt.DrawEllipse(&ellipse, &brush, width, None);
            }
        }
    }

    fn line(&mut self, from: Point, to: Point, width: f32, color: Color) {
        if let Some(brush) = self.brush(color) {
            unsafe {
                self.rt.DrawLine(
                    Vector2::new(from.x, from.y),
                    Vector2::new(to.x, to.y),
                    &brush,
                    width,
                    None,
                );
            }
        }
    }

    fn text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        let Some(brush) = self.brush(style.color) else {
            return;
        };
        unsafe {
            let format = match self.dwrite.CreateTextFormat(
                w!("Segoe UI"),
                None,
                DWRITE_FONT_WEIGHT_NORMAL,
                DWRITE_FONT_STYLE_NORMAL,
                DWRITE_FONT_STRETCH_NORMAL,
                style.font_size,
                w!("en-us"),
            ) {
                Ok(f) => f,
                Err(e) => {
                    log::warn!("text format creation failed: {e}");
                    return;
                }
            };
            let utf16: Vec<u16> = text.encode_utf16().collect();
            if let Ok(layout) = self
                .dwrite
                .CreateTextLayout(&utf16, &format, f32::MAX, f32::MAX)
            {
                self.rt.DrawTextLayout(
                    Vector2::new(origin.x, origin.y),
                    &layout,
                    &brush,
                    D2D1_DRAW_TEXT_OPTIONS_NONE,
                );
            }
        }
    }
}

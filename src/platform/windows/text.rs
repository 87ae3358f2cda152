//! DirectWrite text measurement.

use windows::core::w;
use windows::Win32::Graphics::DirectWrite::{
    IDWriteFactory, IDWriteTextFormat, DWRITE_FONT_STRETCH_NORMAL, DWRITE_FONT_STYLE_NORMAL,
    DWRITE_FONT_WEIGHT_NORMAL, DWRITE_TEXT_METRICS,
};

use crate::model::{Size, TextStyle};
use crate::render::TextMetrics;

/// Text metrics provider backed by a shared DirectWrite factory.
pub struct DwriteMetrics {
    factory: IDWriteFactory,
}

// Shared DirectWrite factories are free-threaded; the wrapper only issues
// read-style calls (format creation, layout measurement).
unsafe impl Send for DwriteMetrics {}
unsafe impl Sync for DwriteMetrics {}

impl DwriteMetrics {
    pub fn new(factory: IDWriteFactory) -> Self {
        Self { factory }
    }

    fn text_format(&self, style: &TextStyle) -> windows::core::Result<IDWriteTextFormat> {
        unsafe {
            self.factory.CreateTextFormat(
                w!("Segoe UI"),
                None,
                DWRITE_FONT_WEIGHT_NORMAL,
                DWRITE_FONT_STYLE_NORMAL,
                DWRITE_FONT_STRETCH_NORMAL,
                style.font_size,
                w!("en-us"),
            )
        }
    }
}

impl TextMetrics for DwriteMetrics {
    fn measure(&self, text: &str, style: &TextStyle) -> Size {
        let measured = (|| -> windows::core::Result<Size> {
            let format = self.text_format(style)?;
            let utf16: Vec<u16> = text.encode_utf16().collect();
            unsafe {
                let layout =
                    self.factory
                        .CreateTextLayout(&utf16, &format, f32::MAX, f32::MAX)?;
                let mut metrics = DWRITE_TEXT_METRICS::default();
                layout.GetMetrics(&mut metrics)?;
                Ok(Size::new(metrics.width, metrics.height))
            }
        })();

        match measured {
            Ok(size) => size,
            // Fall back to a rough monospace estimate so layout never
            // collapses to zero when DirectWrite misbehaves.
            Err(e) => {
                log::warn!("text measurement failed: {e}");
                Size::new(
                    text.chars().count() as f32 * style.font_size * 0.6,
                    style.font_size * 1.3,
                )
            }
        }
    }
}

//! Controls hosted by a menu: labels, buttons and text boxes.
//!
//! The variant set is closed by design. Pointer and keyboard routing match
//! on it exhaustively, so adding a new control kind is a compile-time
//! visible change at every dispatch point.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::model::constants::*;
use crate::model::{Point, Rect, Size, TextStyle};
use crate::render::{Canvas, TextMetrics};

use super::textbox::TextBox;

/// Process-unique control identifier.
///
/// Click subscriptions and the focus handle refer to controls by id, never
/// by owning reference, so removing a control can't leave a dangling
/// pointer; a stale id simply stops resolving.
pub type ControlId = u32;

static NEXT_CONTROL_ID: AtomicU32 = AtomicU32::new(1);

pub(crate) fn next_control_id() -> ControlId {
    NEXT_CONTROL_ID.fetch_add(1, Ordering::Relaxed)
}

/// Static text. Never interactive.
#[derive(Debug, Clone)]
pub struct Label {
    id: ControlId,
    text: String,
    style: TextStyle,
}

impl Label {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            id: next_control_id(),
            text: text.into(),
            style,
        }
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_style(&mut self, style: TextStyle) {
        self.style = style;
    }
}

/// A clickable rounded button.
///
/// Buttons are not hit-tested unless explicitly marked interactive; a
/// decorative button stays inert.
#[derive(Debug, Clone)]
pub struct Button {
    id: ControlId,
    text: String,
    style: TextStyle,
    interactive: bool,
}

impl Button {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            id: next_control_id(),
            text: text.into(),
            style,
            interactive: false,
        }
    }

    /// Builder-style toggle for hit-testing participation.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// A drawable, optionally interactive unit owned by exactly one menu.
#[derive(Debug, Clone)]
pub enum Control {
    Label(Label),
    Button(Button),
    TextBox(TextBox),
}

impl Control {
    pub fn id(&self) -> ControlId {
        match self {
            Control::Label(l) => l.id(),
            Control::Button(b) => b.id(),
            Control::TextBox(t) => t.id(),
        }
    }

    /// Whether pointer routing considers this control at all.
    pub fn is_interactive(&self) -> bool {
        match self {
            Control::Label(_) => false,
            Control::Button(b) => b.is_interactive(),
            Control::TextBox(_) => true,
        }
    }

    /// Measured bounding box including component padding. Pure: the same
    /// text, style and metrics always yield the same box, which keeps
    /// hit-testing idempotent against the draw pass.
    pub fn size(&self, metrics: &dyn TextMetrics) -> Size {
        match self {
            Control::Label(l) => metrics.measure(&l.text, &l.style),
            Control::Button(b) => {
                let text = metrics.measure(&b.text, &b.style);
                Size::new(
                    text.width + 2.0 * CONTROL_PADDING,
                    text.height + CONTROL_PADDING,
                )
            }
            Control::TextBox(t) => {
                // Fixed width: the widest glyph repeated across the viewport.
                let slot = "W".repeat(TEXTBOX_VIEWPORT);
                let text = metrics.measure(&slot, t.style());
                Size::new(
                    text.width + 2.0 * CONTROL_PADDING,
                    text.height + CONTROL_PADDING,
                )
            }
        }
    }

    /// Draw at `origin` (the control's top-left in overlay coordinates).
    pub fn draw(&self, origin: Point, canvas: &mut dyn Canvas, metrics: &dyn TextMetrics) {
        let size = self.size(metrics);
        let rect = Rect::from_origin_size(origin, size);
        match self {
            Control::Label(l) => {
                canvas.text(&l.text, origin, &l.style);
            }
            Control::Button(b) => {
                canvas.fill_round_rect(rect, CORNER_RADIUS, BUTTON_FILL);
                canvas.stroke_round_rect(rect, CORNER_RADIUS, 1.0, MENU_BORDER);
                canvas.text(
                    &b.text,
                    Point::new(origin.x + CONTROL_PADDING, origin.y + CONTROL_PADDING / 2.0),
                    &b.style,
                );
            }
            Control::TextBox(t) => {
                canvas.fill_round_rect(rect, CORNER_RADIUS, TEXTBOX_FILL);
                canvas.stroke_round_rect(rect, CORNER_RADIUS, 1.0, MENU_BORDER);
                let text_origin =
                    Point::new(origin.x + CONTROL_PADDING, origin.y + CONTROL_PADDING / 2.0);
                canvas.text(&t.visible_text(), text_origin, t.style());

                if t.is_focused() && t.cursor_visible() {
                    let inner_width = size.width - 2.0 * CONTROL_PADDING;
                    let slot_width = inner_width / TEXTBOX_VIEWPORT as f32;
                    let x = text_origin.x + t.cursor_column() as f32 * slot_width;
                    canvas.line(
                        Point::new(x, rect.top + 3.0),
                        Point::new(x, rect.bottom - 3.0),
                        1.0,
                        CURSOR_COLOR,
                    );
                }
            }
        }
    }
}

impl From<Label> for Control {
    fn from(label: Label) -> Self {
        Control::Label(label)
    }
}

impl From<Button> for Control {
    fn from(button: Button) -> Self {
        Control::Button(button)
    }
}

impl From<TextBox> for Control {
    fn from(textbox: TextBox) -> Self {
        Control::TextBox(textbox)
    }
}

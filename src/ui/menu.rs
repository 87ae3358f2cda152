//! A positioned, draggable panel owning an ordered list of controls.
//!
//! The menu's derived rectangle and header strip are recomputed on every
//! mutation (control add/remove/clear, position change); they are never
//! stored stale. Hit-testing and drawing share the same layout routine so
//! a hit point always lands on the box that was painted.

use std::sync::Arc;

use crate::events::{EventPublisher, OverlayEvent};
use crate::model::constants::*;
use crate::model::{Point, Rect, Size, TextStyle};
use crate::render::{Canvas, TextMetrics};

use super::control::{Control, ControlId};

pub struct Menu {
    name: String,
    position: Point,
    pinned: bool,
    controls: Vec<Control>,
    bounds: Rect,
    header: Rect,
    header_style: TextStyle,
    metrics: Arc<dyn TextMetrics>,
}

impl Menu {
    pub fn new(name: impl Into<String>, position: Point, metrics: Arc<dyn TextMetrics>) -> Self {
        let mut menu = Self {
            name: name.into(),
            position,
            pinned: false,
            controls: Vec::new(),
            bounds: Rect::default(),
            header: Rect::default(),
            header_style: TextStyle::default(),
            metrics,
        };
        menu.recompute_bounds();
        menu
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Menu bounds in overlay coordinates, including header and margins.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The header strip (name + pin indicator) at the top of the menu.
    pub fn header_rect(&self) -> Rect {
        self.header
    }

    pub fn width(&self) -> f32 {
        self.bounds.width()
    }

    pub fn pinned(&self) -> bool {
        self.pinned
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }

    /// Flip the pin flag, returning the new state.
    pub fn toggle_pin(&mut self) -> bool {
        self.pinned = !self.pinned;
        self.pinned
    }

    // === Controls ===

    /// Append a control, returning its id for subscriptions and lookups.
    pub fn add_control(&mut self, control: impl Into<Control>) -> ControlId {
        let control = control.into();
        let id = control.id();
        self.controls.push(control);
        self.recompute_bounds();
        id
    }

    /// Remove a control by id. Returns true if it was present.
    pub fn remove_control(&mut self, id: ControlId) -> bool {
        let before = self.controls.len();
        self.controls.retain(|c| c.id() != id);
        let removed = self.controls.len() != before;
        if removed {
            self.recompute_bounds();
        }
        removed
    }

    pub fn clear_controls(&mut self) {
        self.controls.clear();
        self.recompute_bounds();
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control_mut(&mut self, id: ControlId) -> Option<&mut Control> {
        self.controls.iter_mut().find(|c| c.id() == id)
    }

    /// Move the menu's top-left anchor.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
        self.recompute_bounds();
    }

    // === Layout ===

    /// Recompute `bounds` and `header` from the name and stacked controls.
    ///
    /// Width wraps the wider of the header name and the widest control plus
    /// side margins; height is the header strip plus each control with
    /// inter-control spacing and a bottom margin.
    fn recompute_bounds(&mut self) {
        let name_size = self.metrics.measure(&self.name, &self.header_style);
        let mut width = name_size.width;
        let mut height = HEADER_HEIGHT;
        for control in &self.controls {
            let size = control.size(self.metrics.as_ref());
            width = width.max(size.width);
            height += size.height + CONTROL_SPACING;
        }
        self.bounds = Rect::from_origin_size(
            self.position,
            Size::new(width + 2.0 * MENU_MARGIN, height + MENU_MARGIN),
        );
        self.header = Rect::new(
            self.bounds.left,
            self.bounds.top,
            self.bounds.right,
            self.bounds.top + HEADER_HEIGHT,
        );
    }

    /// Bounding boxes of all controls in layout order. Non-interactive
    /// controls still occupy a slot so the running offset stays aligned
    /// with the draw pass.
    fn control_boxes(&self) -> Vec<Rect> {
        let mut boxes = Vec::with_capacity(self.controls.len());
        let x = self.bounds.left + MENU_MARGIN;
        let mut y = self.bounds.top + HEADER_HEIGHT;
        for control in &self.controls {
            let size = control.size(self.metrics.as_ref());
            boxes.push(Rect::from_origin_size(Point::new(x, y), size));
            y += size.height + CONTROL_SPACING;
        }
        boxes
    }

    fn pin_center(&self) -> Point {
        Point::new(
            self.header.right - PIN_INSET,
            self.header.top + HEADER_HEIGHT / 2.0,
        )
    }

    // === Hit Testing ===

    /// Point inside the pin indicator circle at the header's right edge.
    pub fn pin_hit(&self, p: Point) -> bool {
        let center = self.pin_center();
        let dx = p.x - center.x;
        let dy = p.y - center.y;
        dx * dx + dy * dy <= PIN_RADIUS * PIN_RADIUS
    }

    /// Point inside the header strip, excluding the pin circle. Header and
    /// pin hits are mutually exclusive for any point.
    pub fn header_hit(&self, p: Point) -> bool {
        self.header.contains(p) && !self.pin_hit(p)
    }

    /// Route a pointer-down at `p` through the control list.
    ///
    /// Walks controls in layout order, skipping non-interactive ones. The
    /// first interactive control containing `p` wins: a button publishes
    /// exactly one click and yields no focus; a text box takes focus and is
    /// returned. If nothing is hit, every text box in the menu loses focus.
    pub fn control_hit(&mut self, p: Point, events: &EventPublisher) -> Option<ControlId> {
        let boxes = self.control_boxes();
        for (i, rect) in boxes.iter().enumerate() {
            if !self.controls[i].is_interactive() || !rect.contains(p) {
                continue;
            }
            match &mut self.controls[i] {
                Control::Button(button) => {
                    events.publish(OverlayEvent::ButtonClicked(button.id()));
                    return None;
                }
                Control::TextBox(textbox) => {
                    textbox.set_focused(true);
                    let id = textbox.id();
                    // At most one focused text box per menu.
                    for control in &mut self.controls {
                        if control.id() != id {
                            if let Control::TextBox(other) = control {
                                other.set_focused(false);
                            }
                        }
                    }
                    return Some(id);
                }
                // Labels report non-interactive above; the variant set is
                // closed, so this arm is unreachable by construction.
                Control::Label(_) => unreachable!("labels are never interactive"),
            }
        }
        self.defocus_all();
        None
    }

    /// Clear focus from every text box in the menu.
    pub fn defocus_all(&mut self) {
        for control in &mut self.controls {
            if let Control::TextBox(textbox) = control {
                textbox.set_focused(false);
            }
        }
    }

    /// Advance the blink cycle of any focused text box by one frame.
    pub fn tick(&mut self) {
        for control in &mut self.controls {
            if let Control::TextBox(textbox) = control {
                textbox.tick_blink();
            }
        }
    }

    // === Drawing ===

    /// Render background, border, header strip, name, pin indicator and
    /// each control at its stacked offset.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_round_rect(self.bounds, CORNER_RADIUS, MENU_BACKGROUND);
        canvas.fill_rect(self.header, HEADER_FILL);
        canvas.stroke_round_rect(self.bounds, CORNER_RADIUS, 1.0, MENU_BORDER);

        let name_origin = Point::new(self.header.left + MENU_MARGIN, self.header.top + 4.0);
        canvas.text(&self.name, name_origin, &self.header_style);

        let pin = self.pin_center();
        if self.pinned {
            canvas.fill_circle(pin, PIN_RADIUS, PIN_ACTIVE);
        } else {
            canvas.stroke_circle(pin, PIN_RADIUS, 1.5, PIN_INACTIVE);
        }

        let boxes = self.control_boxes();
        for (control, rect) in self.controls.iter().zip(boxes) {
            control.draw(rect.origin(), canvas, self.metrics.as_ref());
        }
    }
}

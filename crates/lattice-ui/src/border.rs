//! Stroke-and-fill frame around a single child.

use std::cell::RefCell;
use std::rc::Rc;

use lattice_core::{
    Canvas, Children, Color, Element, ElementBase, ElementRef, Paint, PaintHandle, Rect, Size,
    into_ref, paint,
};

/// Draws an optional fill and an optional stroke, and insets its child by
/// the stroke width on every side so content never sits under the stroke.
pub struct Border {
    base: ElementBase,
    children: Children,
    stroke_width: f32,
    stroke: Option<PaintHandle>,
    fill: Option<PaintHandle>,
    corner_radius: f32,
}

impl Border {
    pub fn new() -> Rc<RefCell<Border>> {
        into_ref(Border {
            base: ElementBase::new(),
            children: Children::new(),
            stroke_width: 0.0,
            stroke: None,
            fill: None,
            corner_radius: 0.0,
        })
    }

    pub fn set_child(&mut self, child: ElementRef) {
        self.children.clear(&mut self.base);
        self.children.add(&mut self.base, child);
    }

    pub fn child(&self) -> Option<&ElementRef> {
        self.children.get(0)
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn set_stroke(&mut self, color: Color, width: f32) {
        if let Some(handle) = self.stroke.take() {
            paint::release(handle);
        }
        self.stroke = Some(paint::acquire(Paint::stroke(color, width)));
        if self.stroke_width != width {
            self.stroke_width = width;
            self.base.invalidate_measure();
        }
    }

    pub fn clear_stroke(&mut self) {
        if let Some(handle) = self.stroke.take() {
            paint::release(handle);
        }
        if self.stroke_width != 0.0 {
            self.stroke_width = 0.0;
            self.base.invalidate_measure();
        }
    }

    /// Fill color is paint-only; the handle value is swapped in place.
    pub fn set_fill(&mut self, color: Color) {
        match self.fill {
            Some(handle) => paint::update(handle, Paint::fill(color)),
            None => self.fill = Some(paint::acquire(Paint::fill(color))),
        }
    }

    pub fn set_corner_radius(&mut self, radius: f32) {
        self.corner_radius = radius;
    }
}

impl Element for Border {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn children(&self) -> &[ElementRef] {
        self.children.as_slice()
    }

    fn is_layout_container(&self) -> bool {
        true
    }

    fn measure_content(&mut self, available: Size, dont_stretch: bool) -> Size {
        let d = 2.0 * self.stroke_width;
        let inner = Size::new(
            (available.width - d).max(0.0),
            (available.height - d).max(0.0),
        );
        let child = match self.children.get(0) {
            Some(child) => child.borrow_mut().measure(inner, dont_stretch),
            None => Size::ZERO,
        };
        Size::new(child.width + d, child.height + d)
    }

    fn arrange_content(&mut self, content: Rect) {
        if let Some(child) = self.children.get(0) {
            child.borrow_mut().arrange(content.inset(self.stroke_width));
        }
    }

    fn render_content(&mut self, canvas: &mut dyn Canvas) {
        let bounds = self.base.bounds();
        if let Some(fill) = self.fill {
            canvas.draw_round_rect(bounds, self.corner_radius, paint::resolve(fill));
        }
        if let Some(stroke) = self.stroke {
            if self.stroke_width > 0.0 {
                // Stroke centered on the inset midline stays inside bounds.
                canvas.draw_round_rect(
                    bounds.inset(self.stroke_width * 0.5),
                    self.corner_radius,
                    paint::resolve(stroke),
                );
            }
        }
    }

    fn dispose_content(&mut self) {
        if let Some(handle) = self.stroke.take() {
            paint::release(handle);
        }
        if let Some(handle) = self.fill.take() {
            paint::release(handle);
        }
        self.children.dispose_all();
    }
}

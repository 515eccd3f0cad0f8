//! Single-line text leaf.

use std::cell::RefCell;
use std::rc::Rc;

use lattice_core::{
    Canvas, Color, Element, ElementBase, HAlign, Size, VAlign, into_ref,
};

/// Width of an average glyph as a fraction of the font size. The core has no
/// shaper; hosts that do real text measurement substitute their own leaf.
pub const GLYPH_WIDTH_FACTOR: f32 = 0.6;

/// Line height as a fraction of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.3;

pub struct Label {
    base: ElementBase,
    text: String,
    font_size: f32,
    color: Color,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Rc<RefCell<Label>> {
        let mut base = ElementBase::new();
        base.set_h_align(HAlign::Start);
        base.set_v_align(VAlign::Start);
        into_ref(Label {
            base,
            text: text.into(),
            font_size: 16.0,
            color: Color::WHITE,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text;
            self.base.invalidate_measure();
        }
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: f32) {
        if self.font_size != size {
            self.font_size = size;
            self.base.invalidate_measure();
        }
    }

    /// Text color is paint-only; it never changes layout.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl Element for Label {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn measure_content(&mut self, _available: Size, _dont_stretch: bool) -> Size {
        let glyphs = self.text.chars().count() as f32;
        Size::new(
            glyphs * self.font_size * GLYPH_WIDTH_FACTOR,
            self.font_size * LINE_HEIGHT_FACTOR,
        )
    }

    fn render_content(&mut self, canvas: &mut dyn Canvas) {
        canvas.draw_text(
            &self.text,
            self.base.position(),
            self.font_size,
            self.color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_core::{Point, Rect};

    #[test]
    fn label_measures_from_text_and_font_size() {
        let label = Label::new("abcde");
        let outer = label.borrow_mut().measure(Size::new(500.0, 100.0), false);
        assert_eq!(outer.width, 5.0 * 16.0 * GLYPH_WIDTH_FACTOR);
        assert_eq!(outer.height, 16.0 * LINE_HEIGHT_FACTOR);
    }

    #[test]
    fn text_change_invalidates_measure() {
        let label = Label::new("ab");
        label.borrow_mut().measure(Size::new(500.0, 100.0), false);
        assert!(!label.borrow().base().needs_measure());

        label.borrow_mut().set_text("abcd");
        assert!(label.borrow().base().needs_measure());

        let outer = label.borrow_mut().measure(Size::new(500.0, 100.0), false);
        assert_eq!(outer.width, 4.0 * 16.0 * GLYPH_WIDTH_FACTOR);
    }

    #[test]
    fn renders_text_at_arranged_position() {
        use lattice_core::{DisplayItem, RecordedCanvas};

        let label = Label::new("hi");
        label.borrow_mut().measure(Size::new(500.0, 100.0), false);
        label
            .borrow_mut()
            .arrange(Rect::new(10.0, 20.0, 500.0, 100.0));

        let mut canvas = RecordedCanvas::new();
        label.borrow_mut().render(&mut canvas);
        match &canvas.items[0] {
            DisplayItem::Text { text, origin, .. } => {
                assert_eq!(text, "hi");
                assert_eq!(*origin, Point::new(10.0, 20.0));
            }
            other => panic!("expected text item, got {other:?}"),
        }
    }
}

//! Clipped viewport over oversized content.
//!
//! The content child is measured against an unbounded constraint on each
//! enabled axis and arranged once at its natural size; scrolling pans it
//! with a visual offset instead of re-arranging, so a scroll tick costs one
//! property write. Offsets re-clamp whenever the content or viewport size
//! changes.

use std::cell::RefCell;
use std::rc::Rc;

use lattice_core::{
    Canvas, Capabilities, Children, Element, ElementBase, ElementRef, Hit, Point, Rect, Size,
    into_ref,
};

pub struct ScrollView {
    base: ElementBase,
    children: Children,
    horizontal: bool,
    vertical: bool,
    h_offset: f32,
    v_offset: f32,
    content_size: Size,
    corner_radius: f32,
    scrolling: bool,
}

impl ScrollView {
    /// Vertical scrolling enabled, horizontal disabled.
    pub fn new() -> Rc<RefCell<ScrollView>> {
        into_ref(ScrollView {
            base: ElementBase::new(),
            children: Children::new(),
            horizontal: false,
            vertical: true,
            h_offset: 0.0,
            v_offset: 0.0,
            content_size: Size::ZERO,
            corner_radius: 0.0,
            scrolling: false,
        })
    }

    pub fn set_content(&mut self, content: ElementRef) {
        self.children.clear(&mut self.base);
        self.children.add(&mut self.base, content);
    }

    pub fn content(&self) -> Option<&ElementRef> {
        self.children.get(0)
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn set_horizontal_enabled(&mut self, enabled: bool) {
        if self.horizontal != enabled {
            self.horizontal = enabled;
            self.base.invalidate_measure();
        }
    }

    pub fn set_vertical_enabled(&mut self, enabled: bool) {
        if self.vertical != enabled {
            self.vertical = enabled;
            self.base.invalidate_measure();
        }
    }

    pub fn set_corner_radius(&mut self, radius: f32) {
        self.corner_radius = radius;
    }

    pub fn horizontal_offset(&self) -> f32 {
        self.h_offset
    }

    pub fn vertical_offset(&self) -> f32 {
        self.v_offset
    }

    pub fn set_horizontal_offset(&mut self, offset: f32) {
        self.h_offset = offset;
        self.apply_offsets(self.base.size());
    }

    pub fn set_vertical_offset(&mut self, offset: f32) {
        self.v_offset = offset;
        self.apply_offsets(self.base.size());
    }

    /// Clamp both offsets to the scrollable range under `viewport` and pan
    /// the content by the result.
    fn apply_offsets(&mut self, viewport: Size) {
        let max_h = (self.content_size.width - viewport.width).max(0.0);
        let max_v = (self.content_size.height - viewport.height).max(0.0);
        self.h_offset = self.h_offset.clamp(0.0, max_h);
        self.v_offset = self.v_offset.clamp(0.0, max_v);
        if let Some(content) = self.children.get(0) {
            content
                .borrow_mut()
                .base_mut()
                .set_visual_offset(Point::new(-self.h_offset, -self.v_offset));
        }
    }
}

impl Element for ScrollView {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn children(&self) -> &[ElementRef] {
        self.children.as_slice()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SCROLL
    }

    /// Drag deltas move the content with the pointer.
    fn handle_scroll(&mut self, dx: f32, dy: f32) {
        if self.horizontal {
            self.h_offset -= dx;
        }
        if self.vertical {
            self.v_offset -= dy;
        }
        self.apply_offsets(self.base.size());
    }

    fn set_scrolling(&mut self, scrolling: bool) {
        self.scrolling = scrolling;
    }

    fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    fn measure_content(&mut self, available: Size, dont_stretch: bool) -> Size {
        let content_avail = Size::new(
            if self.horizontal {
                f32::INFINITY
            } else {
                available.width
            },
            if self.vertical {
                f32::INFINITY
            } else {
                available.height
            },
        );
        self.content_size = match self.children.get(0) {
            Some(content) => content.borrow_mut().measure(content_avail, dont_stretch),
            None => Size::ZERO,
        };

        // The viewport takes the offered space; it never shrinks to content
        // on an enabled axis. Unbounded offers fall back to content size.
        let viewport = Size::new(
            if available.width.is_finite() {
                available.width
            } else {
                self.content_size.width
            },
            if available.height.is_finite() {
                available.height
            } else {
                self.content_size.height
            },
        );
        self.apply_offsets(viewport);
        viewport
    }

    fn arrange_content(&mut self, content: Rect) {
        if let Some(child) = self.children.get(0) {
            let natural = child.borrow().base().outer_size();
            let slot = Rect::from_origin_size(content.origin(), natural.max(content.size()));
            child.borrow_mut().arrange(slot);
        }
        self.apply_offsets(content.size());
    }

    /// Clip everything to the viewport; the panned content draws through the
    /// child's own visual offset.
    fn render(&mut self, canvas: &mut dyn Canvas) {
        if !self.base.is_visible() {
            return;
        }
        let offset = self.base.visual_offset();
        let shifted = offset != Point::ZERO;
        if shifted {
            canvas.save();
            canvas.translate(offset.x, offset.y);
        }
        canvas.push_clip(self.base.bounds(), self.corner_radius);
        self.render_content(canvas);
        for child in self.children.iter() {
            child.borrow_mut().render(canvas);
        }
        canvas.pop_clip();
        if shifted {
            canvas.restore();
        }
    }

    /// A hit that lands on pass-through content (layout containers,
    /// capability-free leaves) resolves to the scroll view itself, so drags
    /// on content still scroll. Interactive descendants keep winning.
    fn hit_test(&self, point: Point) -> Hit {
        if !self.base.is_visible() {
            return Hit::Miss;
        }
        let p = point - self.base.visual_offset();
        if !self.base.bounds().contains(p) {
            return Hit::Miss;
        }
        for child in self.children.iter().rev() {
            let resolved = match child.borrow().hit_test(p) {
                Hit::Miss => continue,
                Hit::This => child.clone(),
                Hit::Child(e) => e,
            };
            let passthrough = {
                let node = resolved.borrow();
                node.is_layout_container() || node.capabilities().is_empty()
            };
            if passthrough {
                return Hit::This;
            }
            return Hit::Child(resolved);
        }
        Hit::This
    }

    fn dispose_content(&mut self) {
        self.children.dispose_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_core::{HAlign, VAlign};
    use std::rc::Rc;

    use crate::stack::Stack;

    fn tall_content(height: f32) -> ElementRef {
        let label = crate::Label::new("");
        label
            .borrow_mut()
            .base_mut()
            .set_desired_size(Some(Size::new(50.0, height)));
        label
    }

    fn viewport(h: f32) -> Rc<RefCell<ScrollView>> {
        let scroll = ScrollView::new();
        scroll.borrow_mut().base_mut().set_h_align(HAlign::Start);
        scroll.borrow_mut().base_mut().set_v_align(VAlign::Start);
        scroll.borrow_mut().set_content(tall_content(h));
        scroll
    }

    #[test]
    fn content_measures_unbounded_on_the_scroll_axis() {
        let scroll = viewport(500.0);
        let outer = scroll.borrow_mut().measure(Size::new(100.0, 100.0), false);
        assert_eq!(outer, Size::new(100.0, 100.0));
        assert_eq!(scroll.borrow().content_size(), Size::new(50.0, 500.0));
    }

    #[test]
    fn offsets_clamp_to_scrollable_range() {
        let scroll = viewport(500.0);
        scroll.borrow_mut().measure(Size::new(100.0, 100.0), false);
        scroll
            .borrow_mut()
            .arrange(Rect::new(0.0, 0.0, 100.0, 100.0));

        scroll.borrow_mut().set_vertical_offset(10_000.0);
        assert_eq!(scroll.borrow().vertical_offset(), 400.0);

        scroll.borrow_mut().set_vertical_offset(-50.0);
        assert_eq!(scroll.borrow().vertical_offset(), 0.0);

        // Horizontal is disabled and the content fits; it stays pinned.
        scroll.borrow_mut().set_horizontal_offset(30.0);
        assert_eq!(scroll.borrow().horizontal_offset(), 0.0);
    }

    #[test]
    fn scrolling_pans_content_without_relayout() {
        let scroll = viewport(500.0);
        scroll.borrow_mut().measure(Size::new(100.0, 100.0), false);
        scroll
            .borrow_mut()
            .arrange(Rect::new(0.0, 0.0, 100.0, 100.0));

        scroll.borrow_mut().handle_scroll(0.0, -60.0);
        assert_eq!(scroll.borrow().vertical_offset(), 60.0);

        let content = scroll.borrow().content().unwrap().clone();
        assert_eq!(
            content.borrow().base().visual_offset(),
            Point::new(0.0, -60.0)
        );
        assert!(!scroll.borrow().base().needs_measure());
    }

    #[test]
    fn shorter_content_cannot_scroll() {
        let scroll = viewport(80.0);
        scroll.borrow_mut().measure(Size::new(100.0, 100.0), false);
        scroll
            .borrow_mut()
            .arrange(Rect::new(0.0, 0.0, 100.0, 100.0));

        scroll.borrow_mut().handle_scroll(0.0, -60.0);
        assert_eq!(scroll.borrow().vertical_offset(), 0.0);
    }

    #[test]
    fn hits_on_layout_content_belong_to_the_scroll_view() {
        let scroll = ScrollView::new();
        scroll.borrow_mut().base_mut().set_h_align(HAlign::Start);
        scroll.borrow_mut().base_mut().set_v_align(VAlign::Start);
        let stack = Stack::vertical();
        stack.borrow_mut().add_child(tall_content(500.0));
        scroll.borrow_mut().set_content(stack);

        scroll.borrow_mut().measure(Size::new(100.0, 100.0), false);
        scroll
            .borrow_mut()
            .arrange(Rect::new(0.0, 0.0, 100.0, 100.0));

        // Beside the 50-wide label: blank stack area.
        let hit = scroll.borrow().hit_test(Point::new(80.0, 10.0));
        assert!(matches!(hit, Hit::This));
    }

    #[test]
    fn scrolled_content_hit_tests_through_the_offset() {
        use crate::toolbar::ToolButton;

        // 200 of filler, then an interactive button at y 200..236.
        let scroll = ScrollView::new();
        scroll.borrow_mut().base_mut().set_h_align(HAlign::Start);
        scroll.borrow_mut().base_mut().set_v_align(VAlign::Start);
        let stack = Stack::vertical();
        stack.borrow_mut().add_child(tall_content(200.0));
        stack.borrow_mut().add_child(ToolButton::new());
        scroll.borrow_mut().set_content(stack);

        scroll.borrow_mut().measure(Size::new(100.0, 100.0), false);
        scroll
            .borrow_mut()
            .arrange(Rect::new(0.0, 0.0, 100.0, 100.0));

        // Unscrolled, the point sits on filler: the scroll view keeps it.
        let hit = scroll.borrow().hit_test(Point::new(10.0, 80.0));
        assert!(matches!(hit, Hit::This));

        // Scrolled to the bottom, the same point maps onto the button.
        scroll.borrow_mut().set_vertical_offset(136.0);
        let hit = scroll.borrow().hit_test(Point::new(10.0, 80.0));
        assert!(matches!(hit, Hit::Child(_)));
    }
}

//! Sequential flow container.

use std::cell::RefCell;
use std::rc::Rc;

use lattice_core::{
    Children, Element, ElementBase, ElementRef, Rect, Size, into_ref,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Lays children out one after another along the main axis. The main-axis
/// extent is the sum of child outer sizes, the cross-axis extent the maximum;
/// each child gets the full cross extent as its slot and resolves its own
/// alignment inside it.
pub struct Stack {
    base: ElementBase,
    children: Children,
    axis: Axis,
}

impl Stack {
    pub fn new(axis: Axis) -> Rc<RefCell<Stack>> {
        into_ref(Stack {
            base: ElementBase::new(),
            children: Children::new(),
            axis,
        })
    }

    pub fn horizontal() -> Rc<RefCell<Stack>> {
        Self::new(Axis::Horizontal)
    }

    pub fn vertical() -> Rc<RefCell<Stack>> {
        Self::new(Axis::Vertical)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn add_child(&mut self, child: ElementRef) {
        self.children.add(&mut self.base, child);
    }

    pub fn insert_child(&mut self, index: usize, child: ElementRef) {
        self.children.insert(&mut self.base, index, child);
    }

    pub fn remove_child(&mut self, child: &ElementRef) -> bool {
        self.children.remove(&mut self.base, child)
    }

    pub fn clear_children(&mut self) {
        self.children.clear(&mut self.base);
    }
}

impl Element for Stack {
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
        let mut main = 0.0f32;
        let mut cross = 0.0f32;
        for child in self.children.iter() {
            let outer = child.borrow_mut().measure(available, dont_stretch);
            match self.axis {
                Axis::Horizontal => {
                    main += outer.width;
                    cross = cross.max(outer.height);
                }
                Axis::Vertical => {
                    main += outer.height;
                    cross = cross.max(outer.width);
                }
            }
        }
        match self.axis {
            Axis::Horizontal => Size::new(main, cross),
            Axis::Vertical => Size::new(cross, main),
        }
    }

    fn arrange_content(&mut self, content: Rect) {
        let mut cursor = match self.axis {
            Axis::Horizontal => content.x,
            Axis::Vertical => content.y,
        };
        for child in self.children.iter() {
            let outer = child.borrow().base().outer_size();
            let slot = match self.axis {
                Axis::Horizontal => Rect::new(cursor, content.y, outer.width, content.h),
                Axis::Vertical => Rect::new(content.x, cursor, content.w, outer.height),
            };
            child.borrow_mut().arrange(slot);
            cursor += match self.axis {
                Axis::Horizontal => outer.width,
                Axis::Vertical => outer.height,
            };
        }
    }

    fn dispose_content(&mut self) {
        self.children.dispose_all();
    }
}

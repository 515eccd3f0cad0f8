//! The element protocol.
//!
//! Every node in the tree implements [`Element`]: a retained object with a
//! measure → arrange → render → hit-test contract. The provided methods own
//! the shared parts of that contract (margin accounting, alignment, stretch,
//! the measure cache, visual offsets, child walks); concrete elements plug in
//! through the `*_content` hooks.
//!
//! Phase ordering is strict: `size` is only valid after `measure`,
//! `position` only after `arrange`. The render service re-runs both every
//! frame, so invalidation just marks nodes dirty and lets the next tick pick
//! the change up — setters never re-measure reentrantly.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use bitflags::bitflags;

use crate::canvas::Canvas;
use crate::context::UiContext;
use crate::geometry::{Margin, Point, Rect, Size};
use crate::input::Key;

pub type ElementRef = Rc<RefCell<dyn Element>>;
pub type WeakElementRef = Weak<RefCell<dyn Element>>;

/// Wrap a concrete element and wire up its self-reference, so children it
/// adopts later can point back at it.
pub fn into_ref<T: Element>(element: T) -> Rc<RefCell<T>> {
    let rc = Rc::new(RefCell::new(element));
    let dyn_rc: Rc<RefCell<dyn Element>> = rc.clone();
    let weak: Weak<RefCell<dyn Element>> = Rc::downgrade(&dyn_rc);
    rc.borrow_mut().base_mut().self_ref = Some(weak);
    rc
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Dirty: u8 {
        const MEASURE = 1 << 0;
        const ARRANGE = 1 << 1;
    }
}

bitflags! {
    /// Input capabilities an element may expose. The dispatcher queries these
    /// instead of downcasting; the matching behavior methods on [`Element`]
    /// default to no-ops, so an unset flag and an unimplemented method agree.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        /// Invokes a command on click release.
        const PRESS = 1 << 0;
        /// Accepts key/char input and selection focus.
        const TEXT = 1 << 1;
        /// Flips a boolean on activation.
        const TOGGLE = 1 << 2;
        /// Consumes drag deltas as scroll motion.
        const SCROLL = 1 << 3;
        /// Consumes drag deltas as a value change.
        const DRAG = 1 << 4;
        /// Participates in tab order.
        const FOCUS = 1 << 5;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HAlign {
    Start,
    Center,
    End,
    #[default]
    Stretch,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VAlign {
    Start,
    Center,
    End,
    #[default]
    Stretch,
}

/// Result of a hit-test walk. `This` means the receiver itself; the parent
/// that holds the receiver's `Rc` resolves it into `Child` on the way out,
/// so callers end up with a handle they can capture.
pub enum Hit {
    Miss,
    This,
    Child(ElementRef),
}

impl Hit {
    pub fn is_miss(&self) -> bool {
        matches!(self, Hit::Miss)
    }
}

/// Shared retained state for every element.
pub struct ElementBase {
    position: Point,
    size: Size,
    desired_size: Option<Size>,
    margin: Margin,
    h_align: HAlign,
    v_align: VAlign,
    visible: bool,
    visual_offset: Point,
    parent: Option<WeakElementRef>,
    pub(crate) self_ref: Option<WeakElementRef>,
    dirty: Dirty,
    last_measure_input: Option<(Size, bool)>,
}

impl Default for ElementBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementBase {
    pub fn new() -> Self {
        ElementBase {
            position: Point::ZERO,
            size: Size::ZERO,
            desired_size: None,
            margin: Margin::ZERO,
            h_align: HAlign::default(),
            v_align: VAlign::default(),
            visible: true,
            visual_offset: Point::ZERO,
            parent: None,
            self_ref: None,
            dirty: Dirty::all(),
            last_measure_input: None,
        }
    }

    /// Resolved top-left, valid after `arrange`.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Content size, valid after `measure`.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Content size plus margin, i.e. what the parent sees.
    pub fn outer_size(&self) -> Size {
        self.size.inflate(self.margin)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn margin(&self) -> Margin {
        self.margin
    }

    pub fn set_margin(&mut self, margin: Margin) {
        if self.margin != margin {
            self.margin = margin;
            self.invalidate_measure();
        }
    }

    pub fn desired_size(&self) -> Option<Size> {
        self.desired_size
    }

    /// Explicit size override; `None` sizes to content.
    pub fn set_desired_size(&mut self, size: Option<Size>) {
        if self.desired_size != size {
            self.desired_size = size;
            self.invalidate_measure();
        }
    }

    pub fn h_align(&self) -> HAlign {
        self.h_align
    }

    pub fn set_h_align(&mut self, align: HAlign) {
        if self.h_align != align {
            self.h_align = align;
            self.invalidate_measure();
        }
    }

    pub fn v_align(&self) -> VAlign {
        self.v_align
    }

    pub fn set_v_align(&mut self, align: VAlign) {
        if self.v_align != align {
            self.v_align = align;
            self.invalidate_measure();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Visibility affects render and hit-testing only; invisible elements
    /// still measure so their siblings keep stable layout.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn visual_offset(&self) -> Point {
        self.visual_offset
    }

    /// Paint-time translation; does not invalidate layout.
    pub fn set_visual_offset(&mut self, offset: Point) {
        self.visual_offset = offset;
    }

    pub fn parent(&self) -> Option<ElementRef> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Point a child back at this element. Used by child-list management.
    pub fn adopt(&self, child: &ElementRef) {
        child.borrow_mut().base_mut().parent = self.self_ref.clone();
    }

    pub fn orphan(child: &ElementRef) {
        child.borrow_mut().base_mut().parent = None;
    }

    pub fn needs_measure(&self) -> bool {
        self.dirty.contains(Dirty::MEASURE)
    }

    /// Mark this node's cached measure stale and propagate upward, since a
    /// child size change can change ancestor layout. Marks only; the actual
    /// re-measure happens on the next frame tick, which also makes the
    /// propagation loop-proof.
    pub fn invalidate_measure(&mut self) {
        self.dirty.insert(Dirty::MEASURE | Dirty::ARRANGE);
        self.last_measure_input = None;

        let mut up = self.parent.clone();
        while let Some(weak) = up {
            let Some(rc) = weak.upgrade() else { break };
            // An ancestor mid-layout is already recomputing; skip it.
            let Ok(mut node) = rc.try_borrow_mut() else { break };
            let base = node.base_mut();
            if base.dirty.contains(Dirty::MEASURE) {
                break; // already propagated through here
            }
            base.dirty.insert(Dirty::MEASURE | Dirty::ARRANGE);
            base.last_measure_input = None;
            up = base.parent.clone();
        }
    }

    pub fn invalidate_arrange(&mut self) {
        self.dirty.insert(Dirty::ARRANGE);
    }
}

pub trait Element: 'static {
    fn base(&self) -> &ElementBase;
    fn base_mut(&mut self) -> &mut ElementBase;

    /// Children in insertion order, which is also back-to-front paint order.
    fn children(&self) -> &[ElementRef] {
        &[]
    }

    /// True for pass-through containers (stack/grid/toolbar). ScrollView
    /// uses this to keep scroll-gesture ownership at the scroll boundary.
    fn is_layout_container(&self) -> bool {
        false
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    // Capability behavior. Defaults are no-ops; a capability mismatch at
    // input time is the normal path, not an error.

    fn invoke(&mut self, _ctx: &UiContext) {}

    fn toggle(&mut self) {}

    fn handle_scroll(&mut self, _dx: f32, _dy: f32) {}

    fn set_scrolling(&mut self, _scrolling: bool) {}

    fn is_scrolling(&self) -> bool {
        false
    }

    fn handle_drag(&mut self, _dx: f32, _dy: f32) {}

    fn key_input(&mut self, _key: Key) {}

    fn char_input(&mut self, _ch: char) {}

    fn set_selected(&mut self, _selected: bool) {}

    /// Content measurement against the margin-deflated constraint. Leaves
    /// default to zero size.
    fn measure_content(&mut self, _available: Size, _dont_stretch: bool) -> Size {
        Size::ZERO
    }

    /// Position children inside the resolved content rect (absolute
    /// coordinates). Must not re-measure.
    fn arrange_content(&mut self, _content: Rect) {}

    /// Paint this element's own visuals; children are painted afterwards by
    /// the provided `render`.
    fn render_content(&mut self, _canvas: &mut dyn Canvas) {}

    /// Release pooled resources owned directly by this element. The provided
    /// `dispose` recurses into children first.
    fn dispose_content(&mut self) {}

    /// Compute the desired size under `available` (which may be infinite for
    /// scroll content). Returns the outer size including margin; the content
    /// size lands in `base().size()`. Idempotent while clean: the result is
    /// cached against `(available, dont_stretch)`.
    ///
    /// `dont_stretch` suppresses Stretch expansion, for measuring inside a
    /// surface that sizes to content (overflow menus).
    fn measure(&mut self, available: Size, dont_stretch: bool) -> Size {
        {
            let base = self.base();
            if !base.dirty.contains(Dirty::MEASURE)
                && base.last_measure_input == Some((available, dont_stretch))
            {
                return base.outer_size();
            }
        }

        let margin = self.base().margin;
        let inner = available.deflate(margin);

        let explicit = self.base().desired_size;
        let mut size = match explicit {
            // The explicit size wins, but the content hook still runs so
            // containers measure their children against the fixed extent.
            Some(fixed) => {
                self.measure_content(fixed, dont_stretch);
                fixed
            }
            None => self.measure_content(inner, dont_stretch),
        };

        // An explicit desired size wins over Stretch expansion.
        if !dont_stretch && explicit.is_none() {
            let base = self.base();
            if base.h_align == HAlign::Stretch && inner.width.is_finite() {
                size.width = size.width.max(inner.width);
            }
            if base.v_align == VAlign::Stretch && inner.height.is_finite() {
                size.height = size.height.max(inner.height);
            }
        }

        let base = self.base_mut();
        base.size = size;
        base.last_measure_input = Some((available, dont_stretch));
        base.dirty.remove(Dirty::MEASURE);
        base.dirty.insert(Dirty::ARRANGE);
        size.inflate(margin)
    }

    /// Place this element inside `bounds` (the margin-inclusive slot the
    /// parent allocated) and recurse into children. Returns the resolved
    /// position. Reads sizes written by `measure`; never re-measures.
    fn arrange(&mut self, bounds: Rect) -> Point {
        let (pos, size) = {
            let base = self.base();
            let slot = bounds.deflate(base.margin);
            let mut size = base.size;
            if base.desired_size.is_none() {
                if base.h_align == HAlign::Stretch {
                    size.width = slot.w;
                }
                if base.v_align == VAlign::Stretch {
                    size.height = slot.h;
                }
            }
            let x = match base.h_align {
                HAlign::Start | HAlign::Stretch => slot.x,
                HAlign::Center => slot.x + (slot.w - size.width) * 0.5,
                HAlign::End => slot.x + slot.w - size.width,
            };
            let y = match base.v_align {
                VAlign::Start | VAlign::Stretch => slot.y,
                VAlign::Center => slot.y + (slot.h - size.height) * 0.5,
                VAlign::End => slot.y + slot.h - size.height,
            };
            (Point::new(x, y), size)
        };

        {
            let base = self.base_mut();
            base.position = pos;
            base.size = size;
            base.dirty.remove(Dirty::ARRANGE);
        }

        self.arrange_content(Rect::from_origin_size(pos, size));
        pos
    }

    /// Paint self, then visible children in insertion order (later children
    /// paint over earlier ones). Invisible elements skip entirely.
    fn render(&mut self, canvas: &mut dyn Canvas) {
        if !self.base().visible {
            return;
        }
        let offset = self.base().visual_offset;
        let shifted = offset != Point::ZERO;
        if shifted {
            canvas.save();
            canvas.translate(offset.x, offset.y);
        }
        self.render_content(canvas);
        for child in self.children() {
            child.borrow_mut().render(canvas);
        }
        if shifted {
            canvas.restore();
        }
    }

    /// Find the topmost element at `point`. Children are searched in reverse
    /// insertion order so the visually topmost sibling wins; the visual
    /// offset is inverted before testing, which is what makes scrolled
    /// content hit-testable without re-arranging.
    fn hit_test(&self, point: Point) -> Hit {
        let base = self.base();
        if !base.visible {
            return Hit::Miss;
        }
        let p = point - base.visual_offset;
        if !base.bounds().contains(p) {
            return Hit::Miss;
        }
        for child in self.children().iter().rev() {
            match child.borrow().hit_test(p) {
                Hit::Miss => {}
                Hit::This => return Hit::Child(child.clone()),
                hit @ Hit::Child(_) => return hit,
            }
        }
        Hit::This
    }

    /// Deterministic teardown: children first, then this element's own
    /// pooled resources. There is no collector behind paint handles.
    fn dispose(&mut self) {
        for child in self.children() {
            child.borrow_mut().dispose();
        }
        self.dispose_content();
    }
}

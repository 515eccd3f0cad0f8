//! Transient surfaces above the page.
//!
//! Overlays (dropdown lists, overflow menus) are not children of the page
//! tree; they live in a flat registry and render after the full page in
//! registration order, so they always paint above page content but below the
//! modal popup, if any. Registration is tied to the owning control's
//! open/close state; there is no weak-reference sweep.

use std::cell::RefCell;
use std::rc::Rc;

use crate::canvas::Canvas;
use crate::element::{ElementRef, Hit};
use crate::error::Error;
use crate::geometry::{Point, Rect, Size};

pub trait Overlay {
    fn is_open(&self) -> bool;

    /// Paint the overlay. The screen-space rect is recomputed here each
    /// frame, not cached, since the owner can move under scrolling.
    fn render(&mut self, canvas: &mut dyn Canvas, window: Size);

    fn hit_test(&self, point: Point) -> Hit;

    /// Whether a press at `point` should close this overlay (outside both
    /// the overlay's rect and its owner control).
    fn wants_dismiss(&self, point: Point) -> bool;

    fn dismiss(&mut self);
}

pub type OverlayRef = Rc<RefCell<dyn Overlay>>;

#[derive(Default)]
pub struct OverlayStack {
    overlays: Vec<OverlayRef>,
    popup: Option<ElementRef>,
}

impl OverlayStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, overlay: OverlayRef) -> Result<(), Error> {
        if self.overlays.iter().any(|o| Rc::ptr_eq(o, &overlay)) {
            return Err(Error::DuplicateOverlay);
        }
        self.overlays.push(overlay);
        Ok(())
    }

    pub fn unregister(&mut self, overlay: &OverlayRef) {
        self.overlays.retain(|o| !Rc::ptr_eq(o, overlay));
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty() && self.popup.is_none()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Modal surface above all overlays. While set, it owns hit-testing.
    pub fn set_popup(&mut self, popup: ElementRef) {
        self.popup = Some(popup);
    }

    pub fn clear_popup(&mut self) {
        self.popup = None;
    }

    pub fn popup(&self) -> Option<ElementRef> {
        self.popup.clone()
    }

    /// Paint open overlays in registration order, then the popup.
    pub fn render(&mut self, canvas: &mut dyn Canvas, window: Size) {
        for overlay in &self.overlays {
            let mut o = overlay.borrow_mut();
            if o.is_open() {
                o.render(canvas, window);
            }
        }
        if let Some(popup) = &self.popup {
            popup.borrow_mut().render(canvas);
        }
    }

    /// Topmost overlay hit, searching newest registration first.
    pub fn hit_test(&self, point: Point) -> Hit {
        for overlay in self.overlays.iter().rev() {
            let o = overlay.borrow();
            if !o.is_open() {
                continue;
            }
            match o.hit_test(point) {
                Hit::Miss => {}
                hit => return hit,
            }
        }
        Hit::Miss
    }

    /// Close every open overlay that considers `point` outside itself, then
    /// drop closed overlays from the registry.
    pub fn dismiss_outside(&mut self, point: Point) {
        for overlay in &self.overlays {
            let mut o = overlay.borrow_mut();
            if o.is_open() && o.wants_dismiss(point) {
                o.dismiss();
            }
        }
        self.prune_closed();
    }

    /// Drop overlays whose owner has closed them.
    pub fn prune_closed(&mut self) {
        self.overlays.retain(|o| o.borrow().is_open());
    }
}

/// Minimum gap kept between an overlay and the window edges.
pub const WINDOW_EDGE_MARGIN: f32 = 4.0;

/// Place `content` against `anchor` inside `window`: open downward unless
/// the space below is too small *and* there is more room above, then flip
/// upward; clamp horizontally so the overlay never leaves the window.
pub fn anchored_rect(window: Size, anchor: Rect, content: Size) -> Rect {
    let below = window.height - anchor.bottom();
    let above = anchor.y;
    let open_up = below < content.height && above > below;

    let y = if open_up {
        (anchor.y - content.height).max(WINDOW_EDGE_MARGIN)
    } else {
        anchor.bottom()
    };

    let mut x = anchor.x;
    if x + content.width > window.width - WINDOW_EDGE_MARGIN {
        x = window.width - WINDOW_EDGE_MARGIN - content.width;
    }
    x = x.max(WINDOW_EDGE_MARGIN);

    Rect::from_origin_size(Point::new(x, y), content)
}

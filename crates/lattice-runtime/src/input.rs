//! Pointer and keyboard dispatch.
//!
//! A small state machine over the hit-test results: `pressed` between down
//! and up, with a capture slot for drag-style gestures and a focus slot for
//! text input. Capture is decided at press time and never re-hit-tested mid
//! drag, so a scroll gesture cannot slip onto a neighboring control when the
//! pointer briefly leaves the scrollable area.

use std::rc::Rc;

use lattice_core::{Capabilities, ElementRef, Hit, Key, Point, UiContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CaptureKind {
    Scroll,
    Drag,
}

pub struct InputService {
    ctx: UiContext,
    root: Option<ElementRef>,
    pressed: bool,
    last_point: Point,
    capture: Option<(ElementRef, CaptureKind)>,
    focused: Option<ElementRef>,
}

impl InputService {
    pub fn new(ctx: UiContext) -> Self {
        InputService {
            ctx,
            root: None,
            pressed: false,
            last_point: Point::ZERO,
            capture: None,
            focused: None,
        }
    }

    pub fn set_root(&mut self, root: ElementRef) {
        self.root = Some(root);
    }

    pub fn focused(&self) -> Option<ElementRef> {
        self.focused.clone()
    }

    /// Hit source order: the modal popup owns all input while present, then
    /// open overlays newest-first, then the page.
    fn hit(&self, point: Point) -> Option<ElementRef> {
        {
            let overlays = self.ctx.overlays.borrow();
            if let Some(popup) = overlays.popup() {
                return match popup.borrow().hit_test(point) {
                    Hit::Miss => None,
                    Hit::This => Some(popup.clone()),
                    Hit::Child(e) => Some(e),
                };
            }
            match overlays.hit_test(point) {
                Hit::Miss => {}
                // An overlay surface hit with no element behind it swallows
                // the event.
                Hit::This => return None,
                Hit::Child(e) => return Some(e),
            }
        }
        let root = self.root.as_ref()?;
        match root.borrow().hit_test(point) {
            Hit::Miss => None,
            Hit::This => Some(root.clone()),
            Hit::Child(e) => Some(e),
        }
    }

    pub fn pointer_down(&mut self, point: Point) {
        if self.pressed {
            return;
        }
        self.pressed = true;
        self.last_point = point;

        // Presses outside an open overlay close it before anything else
        // sees the event.
        self.ctx.overlays.borrow_mut().dismiss_outside(point);

        if let Some(target) = self.hit(point) {
            let caps = target.borrow().capabilities();
            if caps.contains(Capabilities::SCROLL) {
                target.borrow_mut().set_scrolling(true);
                self.capture = Some((target, CaptureKind::Scroll));
            } else if caps.contains(Capabilities::DRAG) {
                self.capture = Some((target, CaptureKind::Drag));
            }
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        let delta = point - self.last_point;
        self.last_point = point;
        if !self.pressed {
            return;
        }
        if let Some((target, kind)) = &self.capture {
            match kind {
                CaptureKind::Scroll => target.borrow_mut().handle_scroll(delta.x, delta.y),
                CaptureKind::Drag => target.borrow_mut().handle_drag(delta.x, delta.y),
            }
        }
    }

    pub fn pointer_up(&mut self, point: Point) {
        if !self.pressed {
            return;
        }
        self.pressed = false;
        self.last_point = point;

        if let Some((target, CaptureKind::Scroll)) = self.capture.take() {
            target.borrow_mut().set_scrolling(false);
        }

        let Some(target) = self.hit(point) else {
            self.blur();
            return;
        };
        // The capability checks are independent; an element may satisfy
        // several.
        let caps = target.borrow().capabilities();
        if caps.contains(Capabilities::PRESS) {
            target.borrow_mut().invoke(&self.ctx);
        }
        if caps.contains(Capabilities::TEXT) {
            let already = self
                .focused
                .as_ref()
                .is_some_and(|f| Rc::ptr_eq(f, &target));
            if !already {
                self.blur();
                target.borrow_mut().set_selected(true);
                self.ctx.keyboard.show();
                self.focused = Some(target.clone());
            }
        } else {
            self.blur();
        }
        if caps.contains(Capabilities::TOGGLE) {
            target.borrow_mut().toggle();
        }
    }

    /// Wheel deltas go to the innermost scroll-capable element under the
    /// pointer, climbing parent links past leaves and plain containers.
    pub fn mouse_wheel(&mut self, point: Point, dx: f32, dy: f32) {
        let mut node = self.hit(point);
        while let Some(e) = node {
            if e.borrow().capabilities().contains(Capabilities::SCROLL) {
                e.borrow_mut().handle_scroll(dx, dy);
                return;
            }
            node = e.borrow().base().parent();
        }
    }

    pub fn key_input(&mut self, key: Key) {
        if let Some(focused) = &self.focused {
            focused.borrow_mut().key_input(key);
        }
    }

    pub fn char_input(&mut self, ch: char) {
        if let Some(focused) = &self.focused {
            focused.borrow_mut().char_input(ch);
        }
    }

    fn blur(&mut self) {
        if let Some(old) = self.focused.take() {
            old.borrow_mut().set_selected(false);
            self.ctx.keyboard.hide();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use lattice_core::{
        Element, ElementBase, KeyboardDevice, Rect, Size, into_ref,
    };
    use lattice_ui::{ScrollView, Stack, ToolButton};

    struct CountingKeyboard {
        shows: Cell<u32>,
        hides: Cell<u32>,
    }

    impl KeyboardDevice for CountingKeyboard {
        fn show(&self) {
            self.shows.set(self.shows.get() + 1);
        }
        fn hide(&self) {
            self.hides.set(self.hides.get() + 1);
        }
    }

    /// Text-capable box recording selection and received input.
    struct TextBox {
        base: ElementBase,
        selected: bool,
        received: Vec<char>,
        keys: Vec<Key>,
    }

    impl TextBox {
        fn new(rect: Rect) -> Rc<RefCell<TextBox>> {
            let boxed = into_ref(TextBox {
                base: ElementBase::new(),
                selected: false,
                received: Vec::new(),
                keys: Vec::new(),
            });
            boxed
                .borrow_mut()
                .base_mut()
                .set_desired_size(Some(rect.size()));
            boxed.borrow_mut().measure(rect.size(), false);
            boxed.borrow_mut().arrange(rect);
            boxed
        }
    }

    impl Element for TextBox {
        fn base(&self) -> &ElementBase {
            &self.base
        }
        fn base_mut(&mut self) -> &mut ElementBase {
            &mut self.base
        }
        fn capabilities(&self) -> Capabilities {
            Capabilities::TEXT | Capabilities::FOCUS
        }
        fn set_selected(&mut self, selected: bool) {
            self.selected = selected;
        }
        fn key_input(&mut self, key: Key) {
            self.keys.push(key);
        }
        fn char_input(&mut self, ch: char) {
            self.received.push(ch);
        }
    }

    fn keyboard_ctx(window: Size) -> (UiContext, Rc<CountingKeyboard>) {
        let keyboard = Rc::new(CountingKeyboard {
            shows: Cell::new(0),
            hides: Cell::new(0),
        });
        let platform = Rc::new(lattice_core::Headless::new(window));
        (UiContext::new(platform, keyboard.clone()), keyboard)
    }

    fn scroll_page(window: Size) -> (ElementRef, Rc<RefCell<ScrollView>>) {
        let scroll = ScrollView::new();
        let content = lattice_ui::Label::new("");
        content
            .borrow_mut()
            .base_mut()
            .set_desired_size(Some(Size::new(50.0, 1000.0)));
        scroll.borrow_mut().set_content(content);

        let scroll_dyn: ElementRef = scroll.clone();
        scroll_dyn.borrow_mut().measure(window, false);
        scroll_dyn
            .borrow_mut()
            .arrange(Rect::from_origin_size(Point::ZERO, window));
        (scroll_dyn, scroll)
    }

    #[test]
    fn press_captures_scroll_and_moves_aggregate() {
        let window = Size::new(100.0, 100.0);
        let ctx = UiContext::headless(window);
        let (page, scroll) = scroll_page(window);

        let mut input = InputService::new(ctx);
        input.set_root(page);

        input.pointer_down(Point::new(50.0, 90.0));
        assert!(scroll.borrow().is_scrolling());

        input.pointer_move(Point::new(50.0, 70.0));
        input.pointer_move(Point::new(50.0, 55.0));
        input.pointer_move(Point::new(50.0, 40.0));
        assert_eq!(scroll.borrow().vertical_offset(), 50.0);

        input.pointer_up(Point::new(50.0, 40.0));
        assert!(!scroll.borrow().is_scrolling());
    }

    #[test]
    fn capture_holds_when_the_pointer_leaves_the_target() {
        let window = Size::new(100.0, 100.0);
        let ctx = UiContext::headless(window);
        let (page, scroll) = scroll_page(window);

        let mut input = InputService::new(ctx);
        input.set_root(page);

        input.pointer_down(Point::new(50.0, 90.0));
        // Far outside the scroll view; the delta still lands on it.
        input.pointer_move(Point::new(400.0, 60.0));
        assert_eq!(scroll.borrow().vertical_offset(), 30.0);
    }

    #[test]
    fn nested_press_is_ignored() {
        let window = Size::new(100.0, 100.0);
        let ctx = UiContext::headless(window);
        let (page, scroll) = scroll_page(window);

        let mut input = InputService::new(ctx);
        input.set_root(page);

        input.pointer_down(Point::new(50.0, 90.0));
        input.pointer_down(Point::new(10.0, 10.0));
        input.pointer_move(Point::new(50.0, 80.0));
        // Only the first press counts; the second neither re-captures nor
        // resets the delta origin.
        assert!(scroll.borrow().is_scrolling());

        input.pointer_up(Point::new(50.0, 80.0));
        input.pointer_up(Point::new(50.0, 80.0));
        assert!(!scroll.borrow().is_scrolling());
    }

    #[test]
    fn release_invokes_press_capable_target() {
        let window = Size::new(100.0, 100.0);
        let ctx = UiContext::headless(window);

        let invoked = Rc::new(Cell::new(0u32));
        let button = ToolButton::new();
        {
            let invoked = invoked.clone();
            button.borrow_mut().set_on_press(move |_| {
                invoked.set(invoked.get() + 1);
            });
        }
        let page: ElementRef = button.clone();
        page.borrow_mut().measure(window, false);
        page.borrow_mut()
            .arrange(Rect::from_origin_size(Point::ZERO, window));

        let mut input = InputService::new(ctx);
        input.set_root(page);
        input.pointer_down(Point::new(10.0, 10.0));
        input.pointer_up(Point::new(10.0, 10.0));
        assert_eq!(invoked.get(), 1);
    }

    #[test]
    fn release_toggles_toggleable_target() {
        let window = Size::new(100.0, 100.0);
        let ctx = UiContext::headless(window);

        let button = ToolButton::new();
        button.borrow_mut().set_toggleable(true);
        let page: ElementRef = button.clone();
        page.borrow_mut().measure(window, false);
        page.borrow_mut()
            .arrange(Rect::from_origin_size(Point::ZERO, window));

        let mut input = InputService::new(ctx);
        input.set_root(page);
        input.pointer_down(Point::new(10.0, 10.0));
        input.pointer_up(Point::new(10.0, 10.0));
        assert!(button.borrow().is_toggled());
    }

    #[test]
    fn focus_transition_drives_the_keyboard() {
        let window = Size::new(200.0, 100.0);
        let (ctx, keyboard) = keyboard_ctx(window);

        let stack = Stack::horizontal();
        let first = TextBox::new(Rect::new(0.0, 0.0, 50.0, 50.0));
        let second = TextBox::new(Rect::new(50.0, 0.0, 50.0, 50.0));
        stack.borrow_mut().add_child(first.clone());
        stack.borrow_mut().add_child(second.clone());
        let page: ElementRef = stack.clone();
        page.borrow_mut().measure(window, false);
        page.borrow_mut()
            .arrange(Rect::from_origin_size(Point::ZERO, window));

        let mut input = InputService::new(ctx);
        input.set_root(page);

        input.pointer_down(Point::new(10.0, 10.0));
        input.pointer_up(Point::new(10.0, 10.0));
        assert!(first.borrow().selected);
        assert_eq!(keyboard.shows.get(), 1);

        // Same control again: no transition.
        input.pointer_down(Point::new(10.0, 10.0));
        input.pointer_up(Point::new(10.0, 10.0));
        assert_eq!(keyboard.shows.get(), 1);
        assert_eq!(keyboard.hides.get(), 0);

        input.pointer_down(Point::new(60.0, 10.0));
        input.pointer_up(Point::new(60.0, 10.0));
        assert!(!first.borrow().selected);
        assert!(second.borrow().selected);
        assert_eq!(keyboard.shows.get(), 2);
        assert_eq!(keyboard.hides.get(), 1);

        // Blank page area clears focus.
        input.pointer_down(Point::new(150.0, 90.0));
        input.pointer_up(Point::new(150.0, 90.0));
        assert!(!second.borrow().selected);
        assert_eq!(keyboard.hides.get(), 2);
    }

    #[test]
    fn key_and_char_input_reach_only_the_focused_control() {
        let window = Size::new(200.0, 100.0);
        let (ctx, _) = keyboard_ctx(window);

        let text = TextBox::new(Rect::new(0.0, 0.0, 50.0, 50.0));
        let page: ElementRef = text.clone();

        let mut input = InputService::new(ctx);
        input.set_root(page);

        // Nothing focused yet: events drop.
        input.char_input('x');
        assert!(text.borrow().received.is_empty());

        input.pointer_down(Point::new(10.0, 10.0));
        input.pointer_up(Point::new(10.0, 10.0));
        input.char_input('a');
        input.key_input(Key::Backspace);
        assert_eq!(text.borrow().received, vec!['a']);
        assert_eq!(text.borrow().keys, vec![Key::Backspace]);
    }

    #[test]
    fn wheel_routes_to_the_enclosing_scroll_view() {
        let window = Size::new(100.0, 100.0);
        let ctx = UiContext::headless(window);

        let scroll = ScrollView::new();
        let stack = Stack::vertical();
        let filler = lattice_ui::Label::new("");
        filler
            .borrow_mut()
            .base_mut()
            .set_desired_size(Some(Size::new(100.0, 1000.0)));
        stack.borrow_mut().add_child(filler);
        scroll.borrow_mut().set_content(stack);

        let page: ElementRef = scroll.clone();
        page.borrow_mut().measure(window, false);
        page.borrow_mut()
            .arrange(Rect::from_origin_size(Point::ZERO, window));

        let mut input = InputService::new(ctx);
        input.set_root(page);

        input.mouse_wheel(Point::new(50.0, 50.0), 0.0, -40.0);
        assert_eq!(scroll.borrow().vertical_offset(), 40.0);
    }

    #[test]
    fn wheel_climbs_parent_links_from_a_leaf() {
        let window = Size::new(100.0, 100.0);
        let ctx = UiContext::headless(window);

        let scroll = ScrollView::new();
        let tall = lattice_ui::Label::new("");
        tall.borrow_mut()
            .base_mut()
            .set_desired_size(Some(Size::new(100.0, 1000.0)));
        let stack = Stack::vertical();
        stack.borrow_mut().add_child(ToolButton::new());
        stack.borrow_mut().add_child(tall);
        scroll.borrow_mut().set_content(stack);

        let page: ElementRef = scroll.clone();
        page.borrow_mut().measure(window, false);
        page.borrow_mut()
            .arrange(Rect::from_origin_size(Point::ZERO, window));

        // The button is an interactive leaf, so the scroll view's hit rule
        // passes it through; the wheel climbs parent links back to the
        // scroll view.
        let mut input = InputService::new(ctx);
        input.set_root(page);
        input.mouse_wheel(Point::new(10.0, 10.0), 0.0, -25.0);
        assert_eq!(scroll.borrow().vertical_offset(), 25.0);
    }

    #[test]
    fn outside_press_dismisses_open_overlays() {
        use lattice_core::{Canvas, Hit, Overlay, OverlayRef};

        struct Closable {
            open: bool,
            rect: Rect,
        }
        impl Overlay for Closable {
            fn is_open(&self) -> bool {
                self.open
            }
            fn render(&mut self, _canvas: &mut dyn Canvas, _window: Size) {}
            fn hit_test(&self, point: Point) -> Hit {
                if self.open && self.rect.contains(point) {
                    Hit::This
                } else {
                    Hit::Miss
                }
            }
            fn wants_dismiss(&self, point: Point) -> bool {
                self.open && !self.rect.contains(point)
            }
            fn dismiss(&mut self) {
                self.open = false;
            }
        }

        let window = Size::new(100.0, 100.0);
        let ctx = UiContext::headless(window);
        let overlay = Rc::new(RefCell::new(Closable {
            open: true,
            rect: Rect::new(20.0, 20.0, 40.0, 40.0),
        }));
        {
            let handle: OverlayRef = overlay.clone();
            ctx.overlays.borrow_mut().register(handle).unwrap();
        }

        let mut input = InputService::new(ctx.clone());

        // Inside: stays open, event swallowed by the surface.
        input.pointer_down(Point::new(30.0, 30.0));
        input.pointer_up(Point::new(30.0, 30.0));
        assert!(overlay.borrow().open);

        input.pointer_down(Point::new(90.0, 90.0));
        assert!(!overlay.borrow().open);
        assert_eq!(ctx.overlays.borrow().overlay_count(), 0);
    }
}

//! Toolbar with automatic overflow.
//!
//! A [`Toolbar`] holds [`ToolbarGroup`]s of [`ToolButton`]s in a fixed-height
//! bar. Measure decides how many groups fit; the rest collapse behind an
//! overflow button whose press opens an [`OverflowMenu`] overlay anchored to
//! it. Collapsed groups stay in the toolbar's child list (hidden) and are
//! re-shown inside the menu surface while it is open.

use std::cell::RefCell;
use std::rc::Rc;

use lattice_core::{
    Canvas, Capabilities, Children, Color, Element, ElementBase, ElementRef, Hit, ImageHandle,
    Overlay, OverlayRef, Paint, PaintHandle, Point, Rect, Size, UiContext, anchored_rect,
    into_ref, paint,
};

pub const TOOLBAR_HEIGHT: f32 = 48.0;

const BUTTON_SIZE: f32 = 36.0;
const GROUP_PADDING: f32 = 4.0;
const GROUP_GAP: f32 = 8.0;
const MENU_PADDING: f32 = 6.0;

/// Icon button. Presses invoke the command; toggleable buttons additionally
/// flip and render a highlight.
pub struct ToolButton {
    base: ElementBase,
    icon: Option<ImageHandle>,
    highlight: PaintHandle,
    toggleable: bool,
    toggled: bool,
    on_press: Option<Rc<dyn Fn(&UiContext)>>,
}

impl ToolButton {
    pub fn new() -> Rc<RefCell<ToolButton>> {
        into_ref(ToolButton {
            base: ElementBase::new(),
            icon: None,
            highlight: paint::acquire(Paint::fill(Color::WHITE.with_alpha(48))),
            toggleable: false,
            toggled: false,
            on_press: None,
        })
    }

    pub fn set_icon(&mut self, icon: ImageHandle) {
        self.icon = Some(icon);
    }

    pub fn set_toggleable(&mut self, toggleable: bool) {
        self.toggleable = toggleable;
    }

    pub fn is_toggled(&self) -> bool {
        self.toggled
    }

    pub fn set_on_press(&mut self, f: impl Fn(&UiContext) + 'static) {
        self.on_press = Some(Rc::new(f));
    }
}

impl Element for ToolButton {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::PRESS | Capabilities::FOCUS;
        if self.toggleable {
            caps |= Capabilities::TOGGLE;
        }
        caps
    }

    fn invoke(&mut self, ctx: &UiContext) {
        if let Some(f) = self.on_press.clone() {
            f(ctx);
        }
    }

    fn toggle(&mut self) {
        if self.toggleable {
            self.toggled = !self.toggled;
        }
    }

    fn measure_content(&mut self, _available: Size, _dont_stretch: bool) -> Size {
        Size::new(BUTTON_SIZE, BUTTON_SIZE)
    }

    fn render_content(&mut self, canvas: &mut dyn Canvas) {
        let bounds = self.base.bounds();
        if self.toggled {
            canvas.draw_round_rect(bounds, 4.0, paint::resolve(self.highlight));
        }
        if let Some(icon) = self.icon {
            canvas.draw_image(icon, bounds.inset(6.0));
        }
    }

    fn dispose_content(&mut self) {
        paint::release(self.highlight);
    }
}

/// A row of buttons on a shared rounded background.
pub struct ToolbarGroup {
    base: ElementBase,
    children: Children,
    background: PaintHandle,
}

impl ToolbarGroup {
    pub fn new() -> Rc<RefCell<ToolbarGroup>> {
        into_ref(ToolbarGroup {
            base: ElementBase::new(),
            children: Children::new(),
            background: paint::acquire(Paint::fill(Color::WHITE.with_alpha(16))),
        })
    }

    pub fn add_button(&mut self, button: ElementRef) {
        self.children.add(&mut self.base, button);
    }

    pub fn set_background(&mut self, color: Color) {
        paint::update(self.background, Paint::fill(color));
    }
}

impl Element for ToolbarGroup {
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
        let inner = Size::new(
            (available.width - 2.0 * GROUP_PADDING).max(0.0),
            (available.height - 2.0 * GROUP_PADDING).max(0.0),
        );
        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for child in self.children.iter() {
            let outer = child.borrow_mut().measure(inner, dont_stretch);
            width += outer.width;
            height = height.max(outer.height);
        }
        Size::new(width + 2.0 * GROUP_PADDING, height + 2.0 * GROUP_PADDING)
    }

    fn arrange_content(&mut self, content: Rect) {
        let inner = content.inset(GROUP_PADDING);
        let mut x = inner.x;
        for child in self.children.iter() {
            let outer = child.borrow().base().outer_size();
            child
                .borrow_mut()
                .arrange(Rect::new(x, inner.y, outer.width, inner.h));
            x += outer.width;
        }
    }

    fn render_content(&mut self, canvas: &mut dyn Canvas) {
        canvas.draw_round_rect(self.base.bounds(), 6.0, paint::resolve(self.background));
    }

    fn dispose_content(&mut self) {
        paint::release(self.background);
        self.children.dispose_all();
    }
}

/// Overlay listing the groups that did not fit in the bar, stacked
/// vertically under (or above) the overflow button.
pub struct OverflowMenu {
    open: bool,
    anchor: Rect,
    items: Vec<ElementRef>,
    rect: Rect,
    background: PaintHandle,
}

impl OverflowMenu {
    fn new() -> Rc<RefCell<OverflowMenu>> {
        Rc::new(RefCell::new(OverflowMenu {
            open: false,
            anchor: Rect::default(),
            items: Vec::new(),
            rect: Rect::default(),
            background: paint::acquire(Paint::fill(Color::from_hex("#2b2b31"))),
        }))
    }
}

impl Drop for OverflowMenu {
    fn drop(&mut self) {
        paint::release(self.background);
    }
}

impl Overlay for OverflowMenu {
    fn is_open(&self) -> bool {
        self.open
    }

    fn render(&mut self, canvas: &mut dyn Canvas, window: Size) {
        // Natural sizes only; the menu surface sizes to content.
        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for item in &self.items {
            let outer = item.borrow_mut().measure(Size::UNBOUNDED, true);
            width = width.max(outer.width);
            height += outer.height;
        }
        let content = Size::new(width + 2.0 * MENU_PADDING, height + 2.0 * MENU_PADDING);
        self.rect = anchored_rect(window, self.anchor, content);

        canvas.draw_round_rect(self.rect, 6.0, paint::resolve(self.background));
        let mut y = self.rect.y + MENU_PADDING;
        for item in &self.items {
            let outer = item.borrow().base().outer_size();
            let mut node = item.borrow_mut();
            node.base_mut().set_visible(true);
            node.arrange(Rect::new(self.rect.x + MENU_PADDING, y, width, outer.height));
            node.render(canvas);
            y += outer.height;
        }
    }

    fn hit_test(&self, point: Point) -> Hit {
        if !self.open || !self.rect.contains(point) {
            return Hit::Miss;
        }
        for item in self.items.iter().rev() {
            match item.borrow().hit_test(point) {
                Hit::Miss => {}
                Hit::This => return Hit::Child(item.clone()),
                hit @ Hit::Child(_) => return hit,
            }
        }
        // The menu surface itself swallows the press.
        Hit::This
    }

    fn wants_dismiss(&self, point: Point) -> bool {
        self.open && !self.rect.contains(point) && !self.anchor.contains(point)
    }

    fn dismiss(&mut self) {
        self.open = false;
        self.items.clear();
    }
}

/// Fixed-height bar of icon groups. The overflow button is the last child so
/// the default render and hit-test walks cover it.
pub struct Toolbar {
    base: ElementBase,
    children: Children,
    background: PaintHandle,
    menu: Rc<RefCell<OverflowMenu>>,
    visible_groups: usize,
}

impl Toolbar {
    pub fn new() -> Rc<RefCell<Toolbar>> {
        let menu = OverflowMenu::new();
        let toolbar = into_ref(Toolbar {
            base: ElementBase::new(),
            children: Children::new(),
            background: paint::acquire(Paint::fill(Color::from_hex("#1e1e23"))),
            menu: menu.clone(),
            visible_groups: 0,
        });

        let overflow = ToolButton::new();
        overflow.borrow_mut().set_on_press(move |ctx| {
            let open = menu.borrow().is_open();
            if open {
                menu.borrow_mut().dismiss();
                let overlay: OverlayRef = menu.clone();
                ctx.overlays.borrow_mut().unregister(&overlay);
            } else {
                menu.borrow_mut().open = true;
                let overlay: OverlayRef = menu.clone();
                if let Err(err) = ctx.overlays.borrow_mut().register(overlay) {
                    log::warn!("overflow menu: {err}");
                }
            }
        });
        {
            let mut bar = toolbar.borrow_mut();
            let Toolbar { base, children, .. } = &mut *bar;
            children.add(base, overflow);
        }
        toolbar
    }

    pub fn add_group(&mut self, group: ElementRef) {
        let before_button = self.children.len().saturating_sub(1);
        self.children.insert(&mut self.base, before_button, group);
    }

    pub fn group_count(&self) -> usize {
        self.children.len().saturating_sub(1)
    }

    /// Groups currently shown in the bar itself, decided during measure.
    pub fn visible_group_count(&self) -> usize {
        self.visible_groups
    }

    pub fn is_overflowing(&self) -> bool {
        self.visible_groups < self.group_count()
    }

    pub fn menu(&self) -> Rc<RefCell<OverflowMenu>> {
        self.menu.clone()
    }

    fn overflow_button(&self) -> &ElementRef {
        self.children
            .get(self.children.len() - 1)
            .expect("toolbar always holds its overflow button")
    }
}

impl Element for Toolbar {
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

    fn measure_content(&mut self, available: Size, _dont_stretch: bool) -> Size {
        let bar = Size::new(f32::INFINITY, TOOLBAR_HEIGHT);
        let group_count = self.group_count();

        let button_width = self
            .overflow_button()
            .borrow_mut()
            .measure(bar, true)
            .width;

        let mut widths = Vec::with_capacity(group_count);
        let mut total = 0.0f32;
        for i in 0..group_count {
            let child = self.children.get(i).expect("index within group range");
            let w = child.borrow_mut().measure(bar, true).width;
            if i > 0 {
                total += GROUP_GAP;
            }
            total += w;
            widths.push(w);
        }

        if total <= available.width {
            self.visible_groups = group_count;
        } else {
            let budget = available.width - button_width - GROUP_GAP;
            let mut used = 0.0f32;
            let mut fit = 0usize;
            for (i, w) in widths.iter().enumerate() {
                let gap = if i > 0 { GROUP_GAP } else { 0.0 };
                if used + gap + w > budget {
                    break;
                }
                used += gap + w;
                fit = i + 1;
            }
            self.visible_groups = fit;
        }

        let width = if available.width.is_finite() {
            available.width
        } else {
            total + GROUP_GAP + button_width
        };
        Size::new(width, TOOLBAR_HEIGHT)
    }

    fn arrange_content(&mut self, content: Rect) {
        let overflowing = self.is_overflowing();
        let mut x = content.x;
        for i in 0..self.group_count() {
            let child = self.children.get(i).expect("index within group range");
            let mut node = child.borrow_mut();
            let shown = i < self.visible_groups;
            node.base_mut().set_visible(shown);
            if shown {
                let w = node.base().outer_size().width;
                node.arrange(Rect::new(x, content.y, w, content.h));
                x += w + GROUP_GAP;
            }
        }

        let button = self.overflow_button().clone();
        {
            let mut node = button.borrow_mut();
            node.base_mut().set_visible(overflowing);
            let w = node.base().outer_size().width;
            node.arrange(Rect::new(content.right() - w, content.y, w, content.h));
        }

        let mut menu = self.menu.borrow_mut();
        menu.anchor = button.borrow().base().bounds();
        if overflowing {
            menu.items = (self.visible_groups..self.group_count())
                .filter_map(|i| self.children.get(i).cloned())
                .collect();
        } else if menu.open {
            // The bar widened; nothing is collapsed anymore.
            menu.dismiss();
        }
    }

    fn render_content(&mut self, canvas: &mut dyn Canvas) {
        canvas.draw_rect(self.base.bounds(), paint::resolve(self.background));
    }

    fn dispose_content(&mut self) {
        paint::release(self.background);
        self.menu.borrow_mut().dismiss();
        self.children.dispose_all();
    }
}

//! Environment services, passed explicitly.
//!
//! Elements that need the window size, the keyboard, or the overlay stack
//! receive a [`UiContext`] at the call sites that need it (command
//! invocation, overlay rendering) instead of reaching into a global locator.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::geometry::Size;
use crate::input::{KeyboardDevice, NullKeyboard};
use crate::overlay::OverlayStack;

/// Facts about the host environment the layout/overlay logic needs.
pub trait Platform {
    fn window_size(&self) -> Size;

    fn display_density(&self) -> f32 {
        1.0
    }

    fn open_url(&self, url: &str);
}

/// Platform for headless rendering and tests: a settable window size and a
/// logged `open_url`.
pub struct Headless {
    size: Cell<Size>,
}

impl Headless {
    pub fn new(size: Size) -> Self {
        Headless {
            size: Cell::new(size),
        }
    }

    pub fn set_window_size(&self, size: Size) {
        self.size.set(size);
    }
}

impl Platform for Headless {
    fn window_size(&self) -> Size {
        self.size.get()
    }

    fn open_url(&self, url: &str) {
        log::info!("open_url (headless): {url}");
    }
}

#[derive(Clone)]
pub struct UiContext {
    pub platform: Rc<dyn Platform>,
    pub keyboard: Rc<dyn KeyboardDevice>,
    pub overlays: Rc<RefCell<OverlayStack>>,
}

impl UiContext {
    pub fn new(platform: Rc<dyn Platform>, keyboard: Rc<dyn KeyboardDevice>) -> Self {
        UiContext {
            platform,
            keyboard,
            overlays: Rc::new(RefCell::new(OverlayStack::new())),
        }
    }

    /// Context with a headless platform and a null keyboard.
    pub fn headless(window: Size) -> Self {
        Self::new(Rc::new(Headless::new(window)), Rc::new(NullKeyboard))
    }
}

//! Input event vocabulary and the keyboard boundary.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Non-character keys forwarded to text-capable controls. Character input
/// arrives separately through `char_input`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Enter,
    Tab,
    Escape,
}

/// Host-side keyboard (on-screen or IME). The dispatcher shows it when a
/// text control gains selection and hides it when selection leaves.
pub trait KeyboardDevice {
    fn show(&self);
    fn hide(&self);
}

/// Keyboard that does nothing; for headless hosts and tests that do not
/// care about focus side effects.
pub struct NullKeyboard;

impl KeyboardDevice for NullKeyboard {
    fn show(&self) {}
    fn hide(&self) {}
}

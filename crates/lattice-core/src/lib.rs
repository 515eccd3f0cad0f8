//! # Element tree, layout protocol, and input boundary
//!
//! Lattice is a retained-mode core: the application builds a tree of
//! [`Element`]s once and mutates it through setters; every frame the render
//! service walks it with three strictly ordered passes:
//!
//! - **measure** — top-down constraint, bottom-up desired sizes. `size()` is
//!   only valid afterwards.
//! - **arrange** — top-down placement using the measured sizes. `position()`
//!   is only valid afterwards.
//! - **render** — paint through an opaque [`Canvas`], children over parents,
//!   later siblings over earlier ones.
//!
//! Hit-testing walks the same tree in reverse paint order so the visually
//! topmost element wins. Property setters that affect sizing mark the node
//! dirty and propagate the mark to ancestors; nothing re-measures until the
//! next frame tick.
//!
//! ```rust
//! use lattice_core::*;
//!
//! struct Swatch {
//!     base: ElementBase,
//! }
//!
//! impl Element for Swatch {
//!     fn base(&self) -> &ElementBase { &self.base }
//!     fn base_mut(&mut self) -> &mut ElementBase { &mut self.base }
//!     fn measure_content(&mut self, _avail: Size, _dont_stretch: bool) -> Size {
//!         Size::new(24.0, 24.0)
//!     }
//! }
//!
//! let swatch = into_ref(Swatch { base: ElementBase::new() });
//! swatch.borrow_mut().measure(Size::new(100.0, 100.0), false);
//! assert_eq!(swatch.borrow().base().size(), Size::new(24.0, 24.0));
//! ```
//!
//! Everything here is single-threaded by contract: `Rc`/`RefCell` ownership,
//! a thread-local paint pool, no locking. Hosts that complete work on other
//! threads must marshal the resulting property writes back onto the UI
//! thread; the types enforce it.

pub mod canvas;
pub mod color;
pub mod container;
pub mod context;
pub mod element;
pub mod error;
pub mod geometry;
pub mod input;
pub mod overlay;
pub mod paint;


pub use canvas::*;
pub use color::*;
pub use container::*;
pub use context::*;
pub use element::*;
pub use error::Error;
pub use geometry::*;
pub use input::*;
pub use overlay::*;
pub use paint::{Paint, PaintHandle, PaintStyle};

//! # Frame orchestration and input dispatch
//!
//! The host owns the loop; these services own the protocol:
//!
//! - [`RenderService`] runs measure → arrange → render (page, then overlays)
//!   against the installed root, once per host frame.
//! - [`InputService`] turns raw pointer/key events into capability calls on
//!   the hit element: press capture for scroll gestures, release-time command
//!   invocation, text focus transitions, wheel routing.
//!
//! Both hold the same [`UiContext`](lattice_core::UiContext), so overlays
//! opened by input are picked up by the next rendered frame.

pub mod input;
pub mod render;

pub use input::InputService;
pub use render::RenderService;

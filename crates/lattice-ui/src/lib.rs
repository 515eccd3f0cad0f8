//! # Layout containers and chrome controls
//!
//! Concrete [`Element`](lattice_core::Element) implementations on top of
//! `lattice-core`:
//!
//! - [`Stack`] — sequential flow along one axis.
//! - [`Grid`] — absolute / weighted / content-sized tracks with spans.
//! - [`ScrollView`] — clipped viewport panning oversized content.
//! - [`Border`] — a stroke-and-fill frame around a single child.
//! - [`Toolbar`] — icon groups with automatic overflow into a menu.
//!
//! All of these participate in the standard measure → arrange → render
//! protocol; none of them override the provided `measure`/`arrange`, only
//! the `*_content` hooks, so margin, alignment, and the measure cache behave
//! identically everywhere.

pub mod border;
pub mod grid;
pub mod label;
pub mod scroll;
pub mod stack;
pub mod toolbar;

pub use border::Border;
pub use grid::{Grid, Track, TrackMode};
pub use label::Label;
pub use scroll::ScrollView;
pub use stack::{Axis, Stack};
pub use toolbar::{ToolButton, Toolbar, ToolbarGroup};

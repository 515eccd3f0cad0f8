//! Drawing surface abstraction.
//!
//! The render pass paints through an opaque [`Canvas`]; the core never
//! creates or owns the surface. [`RecordedCanvas`] is the in-tree
//! implementation: it captures draw calls as [`DisplayItem`]s for headless
//! rendering, tests, and backends that replay a display list.

use crate::color::Color;
use crate::geometry::{Point, Rect};
use crate::paint::Paint;

/// Opaque handle to a decoded image owned by the host's image registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u64);

pub trait Canvas {
    fn draw_rect(&mut self, rect: Rect, paint: Paint);
    fn draw_round_rect(&mut self, rect: Rect, radius: f32, paint: Paint);
    fn draw_text(&mut self, text: &str, origin: Point, size: f32, color: Color);
    fn draw_image(&mut self, image: ImageHandle, rect: Rect);

    /// Push a (possibly rounded) clip; drawing outside it is discarded until
    /// the matching [`Canvas::pop_clip`].
    fn push_clip(&mut self, rect: Rect, radius: f32);
    fn pop_clip(&mut self);

    /// Save the transform state; restore pops back to the matching save.
    fn save(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn restore(&mut self);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DisplayItem {
    Rect {
        rect: Rect,
        radius: f32,
        paint: Paint,
    },
    Text {
        text: String,
        origin: Point,
        size: f32,
        color: Color,
    },
    Image {
        image: ImageHandle,
        rect: Rect,
    },
    PushClip {
        rect: Rect,
        radius: f32,
    },
    PopClip,
}

/// Records draw calls with translations already applied, so the resulting
/// display list is in absolute coordinates.
#[derive(Default)]
pub struct RecordedCanvas {
    pub items: Vec<DisplayItem>,
    offset: Point,
    saves: Vec<Point>,
}

impl RecordedCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.offset = Point::ZERO;
        self.saves.clear();
    }

    fn shift(&self, rect: Rect) -> Rect {
        rect.translate(self.offset.x, self.offset.y)
    }
}

impl Canvas for RecordedCanvas {
    fn draw_rect(&mut self, rect: Rect, paint: Paint) {
        self.items.push(DisplayItem::Rect {
            rect: self.shift(rect),
            radius: 0.0,
            paint,
        });
    }

    fn draw_round_rect(&mut self, rect: Rect, radius: f32, paint: Paint) {
        self.items.push(DisplayItem::Rect {
            rect: self.shift(rect),
            radius,
            paint,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, size: f32, color: Color) {
        self.items.push(DisplayItem::Text {
            text: text.to_owned(),
            origin: origin + self.offset,
            size,
            color,
        });
    }

    fn draw_image(&mut self, image: ImageHandle, rect: Rect) {
        self.items.push(DisplayItem::Image {
            image,
            rect: self.shift(rect),
        });
    }

    fn push_clip(&mut self, rect: Rect, radius: f32) {
        self.items.push(DisplayItem::PushClip {
            rect: self.shift(rect),
            radius,
        });
    }

    fn pop_clip(&mut self) {
        self.items.push(DisplayItem::PopClip);
    }

    fn save(&mut self) {
        self.saves.push(self.offset);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.offset.x += dx;
        self.offset.y += dy;
    }

    fn restore(&mut self) {
        if let Some(prev) = self.saves.pop() {
            self.offset = prev;
        } else {
            log::warn!("canvas restore without matching save");
        }
    }
}

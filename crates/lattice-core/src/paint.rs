//! Pooled paint objects.
//!
//! Backends map a [`Paint`] onto a native drawing handle, which has no
//! garbage collector behind it. Elements therefore hold [`PaintHandle`]s
//! acquired from a refcounted pool: acquire in the constructor or setter,
//! swap (release + acquire) when the value changes, release in `dispose`.
//! The pool is thread-local; the whole layout/render path runs on one
//! thread.

use std::cell::RefCell;

use slotmap::{SlotMap, new_key_type};

use crate::color::Color;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintStyle {
    Fill,
    Stroke { width: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub style: PaintStyle,
}

impl Paint {
    pub fn fill(color: Color) -> Self {
        Paint {
            color,
            style: PaintStyle::Fill,
        }
    }

    pub fn stroke(color: Color, width: f32) -> Self {
        Paint {
            color,
            style: PaintStyle::Stroke { width },
        }
    }
}

new_key_type! {
    pub struct PaintHandle;
}

struct PoolEntry {
    paint: Paint,
    refs: u32,
}

#[derive(Default)]
struct PaintPool {
    entries: SlotMap<PaintHandle, PoolEntry>,
}

thread_local! {
    static POOL: RefCell<PaintPool> = RefCell::new(PaintPool::default());
}

/// Acquire a pooled paint with refcount 1.
pub fn acquire(paint: Paint) -> PaintHandle {
    POOL.with(|p| p.borrow_mut().entries.insert(PoolEntry { paint, refs: 1 }))
}

/// Bump the refcount of an existing handle (shared ownership across
/// elements). No-op on a stale handle.
pub fn retain(handle: PaintHandle) {
    POOL.with(|p| {
        if let Some(e) = p.borrow_mut().entries.get_mut(handle) {
            e.refs += 1;
        } else {
            log::warn!("paint retain on released handle {handle:?}");
        }
    });
}

/// Drop one reference; the entry is freed when the count reaches zero.
/// Double release is logged and ignored.
pub fn release(handle: PaintHandle) {
    POOL.with(|p| {
        let mut pool = p.borrow_mut();
        match pool.entries.get_mut(handle) {
            Some(e) if e.refs > 1 => e.refs -= 1,
            Some(_) => {
                pool.entries.remove(handle);
            }
            None => log::warn!("paint release on already-released handle {handle:?}"),
        }
    });
}

/// Resolve a handle to its paint value. Stale handles resolve to a
/// transparent fill so a teardown-ordering slip draws nothing instead of
/// drawing garbage.
pub fn resolve(handle: PaintHandle) -> Paint {
    POOL.with(|p| {
        p.borrow()
            .entries
            .get(handle)
            .map(|e| e.paint)
            .unwrap_or_else(|| {
                log::warn!("paint resolve on released handle {handle:?}");
                Paint::fill(Color::TRANSPARENT)
            })
    })
}

/// Replace the value behind a handle in place (e.g. a color setter that does
/// not change sharing). Keeps the refcount.
pub fn update(handle: PaintHandle, paint: Paint) {
    POOL.with(|p| {
        if let Some(e) = p.borrow_mut().entries.get_mut(handle) {
            e.paint = paint;
        } else {
            log::warn!("paint update on released handle {handle:?}");
        }
    });
}

/// Number of live pool entries. Test hook for leak checks.
pub fn live_count() -> usize {
    POOL.with(|p| p.borrow().entries.len())
}

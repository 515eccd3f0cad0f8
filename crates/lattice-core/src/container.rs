//! Child-list management shared by layout containers.

use smallvec::SmallVec;

use crate::element::{ElementBase, ElementRef};

/// Ordered children. Insertion order is paint order and (for stacks)
/// positioning order. Every mutation wires/unwires the parent link and
/// invalidates the owner's measure cache.
#[derive(Default)]
pub struct Children {
    items: SmallVec<[ElementRef; 4]>,
}

impl Children {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[ElementRef] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ElementRef> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ElementRef> {
        self.items.get(index)
    }

    pub fn add(&mut self, owner: &mut ElementBase, child: ElementRef) {
        owner.adopt(&child);
        self.items.push(child);
        owner.invalidate_measure();
    }

    pub fn insert(&mut self, owner: &mut ElementBase, index: usize, child: ElementRef) {
        owner.adopt(&child);
        self.items.insert(index.min(self.items.len()), child);
        owner.invalidate_measure();
    }

    /// Remove by identity. Returns false when the child is not present.
    pub fn remove(&mut self, owner: &mut ElementBase, child: &ElementRef) -> bool {
        let Some(i) = self.items.iter().position(|c| std::rc::Rc::ptr_eq(c, child)) else {
            return false;
        };
        let removed = self.items.remove(i);
        ElementBase::orphan(&removed);
        owner.invalidate_measure();
        true
    }

    pub fn clear(&mut self, owner: &mut ElementBase) {
        for child in &self.items {
            ElementBase::orphan(child);
        }
        self.items.clear();
        owner.invalidate_measure();
    }

    /// Dispose every child and drop them. Used from `dispose_content`.
    pub fn dispose_all(&mut self) {
        for child in &self.items {
            child.borrow_mut().dispose();
            ElementBase::orphan(child);
        }
        self.items.clear();
    }
}

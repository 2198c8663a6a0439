// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered set of selected shapes

use crate::keys::ShapeKey;

/// Selected shapes in selection order, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    shapes: Vec<ShapeKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: ShapeKey) -> bool {
        self.shapes.contains(&key)
    }

    /// Returns `false` if `key` was already selected
    pub fn insert(&mut self, key: ShapeKey) -> bool {
        if self.contains(key) {
            return false;
        }
        self.shapes.push(key);
        true
    }

    /// Returns `false` if `key` was not selected
    pub fn remove(&mut self, key: ShapeKey) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|k| *k != key);
        self.shapes.len() != before
    }

    /// Flip membership; returns whether `key` is now selected
    pub fn toggle(&mut self, key: ShapeKey) -> bool {
        if self.remove(key) {
            false
        } else {
            self.shapes.push(key);
            true
        }
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = ShapeKey> + '_ {
        self.shapes.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<ShapeKey> {
        self.shapes.clone()
    }

    pub fn retain(&mut self, f: impl FnMut(&ShapeKey) -> bool) {
        self.shapes.retain(f);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_toggle_and_dedup() {
        let mut arena: SlotMap<ShapeKey, ()> = SlotMap::with_key();
        let (a, b) = (arena.insert(()), arena.insert(()));

        let mut selection = Selection::new();
        assert!(selection.insert(a));
        assert!(!selection.insert(a));
        assert!(selection.toggle(b));
        assert_eq!(selection.to_vec(), vec![a, b]);
        assert!(!selection.toggle(a));
        assert_eq!(selection.len(), 1);
        assert!(selection.contains(b));
        assert!(!selection.remove(a));
    }
}

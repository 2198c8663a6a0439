// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded undo/redo log.
//!
//! Entries store plain endpoint positions, never geometry: replaying an
//! entry goes back through the editor's single geometry-recompute path.
//! Entries refer to shapes by [`ShapeKey`]; a key whose shape has since been
//! removed is stale and the editor skips it on replay.

use std::collections::VecDeque;

use floorcraft_core::{Point2D, ShapeKind};

use crate::keys::ShapeKey;
use crate::shape::Endpoint;

/// Old and new endpoints of one shape moved by a group drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragMove {
    pub shape: ShapeKey,
    pub from: (Point2D, Point2D),
    pub to: (Point2D, Point2D),
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    /// A shape was committed
    Add {
        shape: ShapeKey,
        kind: ShapeKind,
        start: Point2D,
        end: Point2D,
    },
    /// One or more shapes were translated together
    Drag { moves: Vec<DragMove> },
    /// A single handle was dragged
    Edit {
        shape: ShapeKey,
        endpoint: Endpoint,
        from: Point2D,
        to: Point2D,
    },
}

impl HistoryEntry {
    pub fn references(&self, key: ShapeKey) -> bool {
        match self {
            HistoryEntry::Add { shape, .. } | HistoryEntry::Edit { shape, .. } => *shape == key,
            HistoryEntry::Drag { moves } => moves.iter().any(|m| m.shape == key),
        }
    }

    fn remap(&mut self, old: ShapeKey, new: ShapeKey) {
        match self {
            HistoryEntry::Add { shape, .. } | HistoryEntry::Edit { shape, .. } => {
                if *shape == old {
                    *shape = new;
                }
            }
            HistoryEntry::Drag { moves } => {
                for m in moves.iter_mut().filter(|m| m.shape == old) {
                    m.shape = new;
                }
            }
        }
    }

    /// Drop every mention of `key`; returns `false` if nothing meaningful is left
    fn forget(&mut self, key: ShapeKey) -> bool {
        match self {
            HistoryEntry::Add { shape, .. } | HistoryEntry::Edit { shape, .. } => *shape != key,
            HistoryEntry::Drag { moves } => {
                moves.retain(|m| m.shape != key);
                !moves.is_empty()
            }
        }
    }

    fn scale(&mut self, factor: f64) {
        match self {
            HistoryEntry::Add { start, end, .. } => {
                *start = start.scale(factor);
                *end = end.scale(factor);
            }
            HistoryEntry::Drag { moves } => {
                for m in moves {
                    m.from = (m.from.0.scale(factor), m.from.1.scale(factor));
                    m.to = (m.to.0.scale(factor), m.to.1.scale(factor));
                }
            }
            HistoryEntry::Edit { from, to, .. } => {
                *from = from.scale(factor);
                *to = to.scale(factor);
            }
        }
    }

    fn is_edit_of(&self, key: ShapeKey) -> bool {
        matches!(self, HistoryEntry::Edit { shape, .. } if *shape == key)
    }
}

/// Undo and redo stacks with a fixed undo depth
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(capacity.min(64)),
            redo: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a new user action. Clears the redo stack.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.redo.clear();
        self.push_undo(entry);
    }

    /// Push onto the undo stack without touching redo, evicting the oldest
    /// entry past capacity
    pub(crate) fn push_undo(&mut self, entry: HistoryEntry) {
        if self.capacity == 0 {
            return;
        }
        self.undo.push_back(entry);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
    }

    pub(crate) fn push_redo(&mut self, entry: HistoryEntry) {
        self.redo.push(entry);
    }

    pub(crate) fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.undo.pop_back()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redo.pop()
    }

    /// Remove `Edit` entries for `key` from both stacks
    pub(crate) fn remove_edits_for(&mut self, key: ShapeKey) {
        self.undo.retain(|e| !e.is_edit_of(key));
        self.redo.retain(|e| !e.is_edit_of(key));
    }

    /// Point every entry at `new` instead of `old`
    pub(crate) fn remap(&mut self, old: ShapeKey, new: ShapeKey) {
        for entry in self.undo.iter_mut().chain(self.redo.iter_mut()) {
            entry.remap(old, new);
        }
    }

    /// Purge every reference to a deleted shape
    pub(crate) fn forget(&mut self, key: ShapeKey) {
        self.undo.retain_mut(|e| e.forget(key));
        self.redo.retain_mut(|e| e.forget(key));
    }

    /// Rescale stored positions about the origin
    pub(crate) fn scale(&mut self, factor: f64) {
        for entry in self.undo.iter_mut().chain(self.redo.iter_mut()) {
            entry.scale(factor);
        }
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Undo entries, oldest first
    pub fn undo_entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.undo.iter()
    }
}

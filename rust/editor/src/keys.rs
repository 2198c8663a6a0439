// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based storage.
//!
//! Shapes and handles live in `slotmap::SlotMap`s owned by the editor. Keys
//! are generational: a key to a deleted shape never aliases a shape created
//! later, so history entries and selections can detect stale references.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a committed or in-progress shape.
    pub struct ShapeKey;

    /// Key for a draggable endpoint handle.
    pub struct HandleKey;
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorcraft Editor
//!
//! Interactive 2D floor-plan editing: walls, doors and windows drawn as
//! directed segments with draggable endpoint handles, live measurement
//! labels, rectangle multi-select and a bounded undo/redo log.
//!
//! Shapes and handles are stored in slot-map arenas owned by a single
//! [`SceneEditor`]; everything else (selection, history, labels) refers to
//! them by generational key. The [`LayoutEngine`] turns named segment lists
//! into shapes by replaying them through the editor's own draw sequence, and
//! [`persistence`] saves and reloads drawings the same way.

pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod hit_test;
pub mod keys;
pub mod labels;
pub mod layout;
pub mod persistence;
pub mod selection;
pub mod shape;

pub use config::{EditorConfig, LayoutConfig};
pub use editor::{EditorState, Mode, SceneEditor};
pub use error::{Error, Result};
pub use history::{DragMove, History, HistoryEntry};
pub use keys::{HandleKey, ShapeKey};
pub use labels::{MeasurementLabel, Placement, TextBox};
pub use layout::{replay_shape, AnchorTable, LayoutEngine, Replay, ReplayStep, ReplaySummary};
pub use persistence::{
    load_drawing, load_shapes, save_drawing, serialize_shapes, LoadReport, SavedDrawing,
    StoredShape,
};
pub use selection::Selection;
pub use shape::{compute_geometry, door_rotation, DoorArc, Endpoint, Handle, Line, Shape, ShapeGeometry};

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON save/load for drawings.
//!
//! The stored form is an array of `{ "type", "start": {x, y}, "end": {x, y} }`
//! objects in commit order. Loading replays each entry through the same draw
//! sequence interactive drawing uses, so stored data passes the same commit
//! rules as user input.

use floorcraft_core::{Point2D, ShapeKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::editor::{Mode, SceneEditor};
use crate::error::Result;
use crate::layout::replay_shape;

/// One serialized shape. `kind` holds the raw type string so unknown types
/// survive parsing and can be skipped individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredShape {
    #[serde(rename = "type")]
    pub kind: String,
    pub start: Point2D,
    pub end: Point2D,
}

impl StoredShape {
    pub fn new(kind: ShapeKind, start: Point2D, end: Point2D) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            start,
            end,
        }
    }
}

/// A drawing plus the metadata shown in a drawings list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SavedDrawing {
    pub shapes: Vec<StoredShape>,
    pub title: String,
    pub description: String,
    /// Encoded preview image, opaque to this crate
    pub thumbnail: String,
}

impl SavedDrawing {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Counts from a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub committed: usize,
    /// Entries the editor rejected as too short
    pub discarded: usize,
    /// Entries with an unknown `type`
    pub skipped: usize,
}

/// Committed shapes of `editor` in stored form
pub fn stored_shapes(editor: &SceneEditor) -> Vec<StoredShape> {
    editor
        .snapshot()
        .into_iter()
        .map(|s| StoredShape::new(s.kind, s.start, s.end))
        .collect()
}

pub fn serialize_shapes(editor: &SceneEditor) -> Result<String> {
    Ok(serde_json::to_string(&stored_shapes(editor))?)
}

pub fn save_drawing(
    editor: &SceneEditor,
    title: impl Into<String>,
    description: impl Into<String>,
    thumbnail: impl Into<String>,
) -> SavedDrawing {
    SavedDrawing {
        shapes: stored_shapes(editor),
        title: title.into(),
        description: description.into(),
        thumbnail: thumbnail.into(),
    }
}

/// Parse a stored shape array and replace the editor's contents with it.
///
/// The editor is left untouched when `json` does not parse.
pub fn load_shapes(editor: &mut SceneEditor, json: &str) -> Result<LoadReport> {
    let shapes: Vec<StoredShape> = serde_json::from_str(json)?;
    Ok(load_stored(editor, &shapes))
}

/// Replace the editor's contents with a saved drawing's shapes
pub fn load_drawing(editor: &mut SceneEditor, drawing: &SavedDrawing) -> LoadReport {
    load_stored(editor, &drawing.shapes)
}

pub fn load_stored(editor: &mut SceneEditor, shapes: &[StoredShape]) -> LoadReport {
    editor.clear_all();
    let mut report = LoadReport::default();

    for (index, stored) in shapes.iter().enumerate() {
        let kind: ShapeKind = match stored.kind.parse() {
            Ok(kind) => kind,
            Err(_) => {
                warn!(index, kind = %stored.kind, "skipping stored shape of unknown type");
                report.skipped += 1;
                continue;
            }
        };
        match replay_shape(editor, kind, stored.start, stored.end) {
            Some(_) => report.committed += 1,
            None => report.discarded += 1,
        }
    }

    editor.set_mode(Mode::Idle);
    debug!(?report, "loaded drawing");
    report
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan source in, building scene out
//!
//! Every source goes through a [`SceneEditor`] so the shapes reaching the
//! generator obey the same commit rules as hand-drawn ones.

use crate::config::CliConfig;
use crate::error::Result;
use crate::generator::generate_scene;
use crate::types::GeneratedScene;
use floorcraft_core::parse_plan;
use floorcraft_editor::persistence::{load_stored, StoredShape};
use floorcraft_editor::{load_drawing, EditorConfig, LayoutConfig, LayoutEngine, SavedDrawing, SceneEditor};
use tracing::debug;

/// How a plan source was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Saved drawing object with metadata
    Drawing,
    /// Bare array of stored shapes
    Shapes,
    /// Array of `[start, end, name, kind, length, angle]` tuples
    PlanText,
}

/// Replay `source` into a fresh editor.
///
/// A JSON object is read as a saved drawing and a JSON array of stored
/// shapes is loaded directly. Anything else is parsed as plan text and laid
/// out without pauses.
pub fn load_editor(source: &str, config: EditorConfig) -> Result<(SceneEditor, SourceFormat)> {
    let mut editor = SceneEditor::new(config);

    if source.trim_start().starts_with('{') {
        let drawing = SavedDrawing::from_json(source)?;
        let report = load_drawing(&mut editor, &drawing);
        debug!(?report, title = %drawing.title, "loaded saved drawing");
        return Ok((editor, SourceFormat::Drawing));
    }

    if let Ok(shapes) = serde_json::from_str::<Vec<StoredShape>>(source) {
        let report = load_stored(&mut editor, &shapes);
        debug!(?report, "loaded stored shapes");
        return Ok((editor, SourceFormat::Shapes));
    }

    let segments = parse_plan(source)?;
    let mut layout = LayoutEngine::new(LayoutConfig::immediate());
    layout.draw_plan_now(&mut editor, &segments);
    Ok((editor, SourceFormat::PlanText))
}

/// Load `source` onto the configured canvas and synthesize its building
pub fn convert(source: &str, config: &CliConfig) -> Result<Option<GeneratedScene>> {
    let editor_config = EditorConfig::default().with_canvas(config.canvas_width, config.canvas_height);
    let (editor, format) = load_editor(source, editor_config)?;
    debug!(?format, shapes = editor.shape_count(), "plan loaded");

    generate_scene(
        &editor.snapshot(),
        (config.canvas_width, config.canvas_height),
        &config.params,
    )
}

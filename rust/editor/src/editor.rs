// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The scene editor: single owner of every shape in a drawing session.
//!
//! ## Storage
//!
//! Shapes and handles live in slot maps with generational keys. A shape
//! refers to its two handles by [`HandleKey`], each handle points back at its
//! owner, and measurement labels sit in a side table keyed by [`ShapeKey`].
//! The commit order is kept separately so an in-progress drawing can own
//! real handles without being part of the plan yet.
//!
//! ## Interaction
//!
//! Pointer input is three events (`pointer_down`, `pointer_move`,
//! `pointer_up`) interpreted according to the current [`Mode`]:
//!
//! - `Draw(kind)`: down starts a shape, move previews it, up commits it
//!   unless it is shorter than `min_commit_length`.
//! - `Select`: down inside the selection bounds starts a group drag, down
//!   on a handle starts a handle drag, down on a shape toggles it, and down
//!   on empty canvas starts a rectangle selection.
//!
//! The same draw sequence is exposed as [`SceneEditor::start_drawing`],
//! [`SceneEditor::continue_drawing`] and [`SceneEditor::stop_drawing`] for
//! auto-layout replay and drawing loads.

use floorcraft_core::{BoundingBox, PlanShape, Point2D, ShapeKind};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::config::EditorConfig;
use crate::history::{DragMove, History, HistoryEntry};
use crate::hit_test::circle_intersects_rect;
use crate::keys::{HandleKey, ShapeKey};
use crate::labels::{LabelStyle, MeasurementLabel};
use crate::selection::Selection;
use crate::shape::{compute_geometry, Endpoint, Handle, Shape};

/// What pointer-down does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Pointer input is ignored
    #[default]
    Idle,
    /// Pointer input draws new shapes of this kind
    Draw(ShapeKind),
    /// Pointer input selects, drags and edits existing shapes
    Select,
}

/// Observable editor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Drawing(ShapeKind),
    Dragging,
    SelectingRect,
    Select,
}

#[derive(Debug, Clone)]
struct GroupDrag {
    last: Point2D,
    /// Shape under the pointer when the drag began
    pressed: Option<ShapeKey>,
    moved: bool,
    before: Vec<(ShapeKey, Point2D, Point2D)>,
}

#[derive(Debug, Clone, Default)]
enum Interaction {
    #[default]
    Idle,
    Drawing {
        shape: ShapeKey,
    },
    GroupDrag(GroupDrag),
    HandleDrag {
        handle: HandleKey,
        from: Point2D,
    },
    SelectingRect {
        anchor: Point2D,
        current: Point2D,
    },
}

/// Interactive 2D floor-plan editor.
///
/// # Example
///
/// ```
/// use floorcraft_core::{Point2D, ShapeKind};
/// use floorcraft_editor::{Mode, SceneEditor};
///
/// let mut editor = SceneEditor::default();
/// editor.set_mode(Mode::Draw(ShapeKind::Wall));
/// editor.pointer_down(Point2D::new(0.0, 0.0));
/// editor.pointer_move(Point2D::new(60.0, 0.0));
/// editor.pointer_up(Point2D::new(90.0, 0.0));
///
/// assert_eq!(editor.shape_count(), 1);
/// assert!(editor.undo());
/// assert_eq!(editor.shape_count(), 0);
/// ```
#[derive(Debug)]
pub struct SceneEditor {
    config: EditorConfig,
    pixels_per_unit: f64,
    mode: Mode,
    interaction: Interaction,

    shapes: SlotMap<ShapeKey, Shape>,
    handles: SlotMap<HandleKey, Handle>,
    order: Vec<ShapeKey>,
    labels: FxHashMap<ShapeKey, MeasurementLabel>,
    labels_visible: bool,

    selection: Selection,
    history: History,
}

impl Default for SceneEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl SceneEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            pixels_per_unit: config.pixels_per_unit,
            history: History::new(config.history_depth),
            config,
            mode: Mode::Idle,
            interaction: Interaction::Idle,
            shapes: SlotMap::with_key(),
            handles: SlotMap::with_key(),
            order: Vec::new(),
            labels: FxHashMap::default(),
            labels_visible: true,
            selection: Selection::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ========================================================================
    // Mode and state
    // ========================================================================

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch modes, finishing or abandoning whatever interaction is active.
    ///
    /// An in-progress drawing is discarded. Entering a draw mode clears the
    /// selection.
    pub fn set_mode(&mut self, mode: Mode) {
        self.end_interaction();
        if matches!(mode, Mode::Draw(_)) {
            self.clear_selection();
        }
        self.mode = mode;
    }

    pub fn state(&self) -> EditorState {
        match &self.interaction {
            Interaction::Drawing { shape } => self
                .shapes
                .get(*shape)
                .map(|s| EditorState::Drawing(s.kind))
                .unwrap_or(EditorState::Idle),
            Interaction::GroupDrag(_) | Interaction::HandleDrag { .. } => EditorState::Dragging,
            Interaction::SelectingRect { .. } => EditorState::SelectingRect,
            Interaction::Idle => match self.mode {
                Mode::Select => EditorState::Select,
                _ => EditorState::Idle,
            },
        }
    }

    // ========================================================================
    // Pointer events
    // ========================================================================

    pub fn pointer_down(&mut self, p: Point2D) {
        match self.mode {
            Mode::Draw(kind) => {
                self.start_drawing(kind, p);
            }
            Mode::Select => {
                self.end_interaction();
                self.select_pointer_down(p);
            }
            Mode::Idle => {}
        }
    }

    pub fn pointer_move(&mut self, p: Point2D) {
        match std::mem::take(&mut self.interaction) {
            Interaction::Drawing { shape } => {
                self.interaction = Interaction::Drawing { shape };
                self.continue_drawing(p);
            }
            Interaction::GroupDrag(mut drag) => {
                self.drag_to(&mut drag, p);
                self.interaction = Interaction::GroupDrag(drag);
            }
            Interaction::HandleDrag { handle, from } => {
                self.move_handle(handle, p);
                self.interaction = Interaction::HandleDrag { handle, from };
            }
            Interaction::SelectingRect { anchor, .. } => {
                self.interaction = Interaction::SelectingRect { anchor, current: p };
            }
            Interaction::Idle => {}
        }
    }

    pub fn pointer_up(&mut self, p: Point2D) {
        match std::mem::take(&mut self.interaction) {
            Interaction::Drawing { shape } => {
                self.interaction = Interaction::Drawing { shape };
                self.stop_drawing(p);
            }
            Interaction::GroupDrag(mut drag) => {
                self.drag_to(&mut drag, p);
                if drag.moved {
                    self.finish_group_drag(drag.before);
                } else {
                    // A click without movement
                    match drag.pressed {
                        Some(shape) => {
                            self.toggle_selection(shape);
                        }
                        None => self.clear_selection(),
                    }
                }
            }
            Interaction::HandleDrag { handle, from } => {
                self.move_handle(handle, p);
                self.finish_handle_drag(handle, from);
            }
            Interaction::SelectingRect { anchor, .. } => {
                self.select_in_rect(BoundingBox::from_corners(anchor, p));
            }
            Interaction::Idle => {}
        }
    }

    fn select_pointer_down(&mut self, p: Point2D) {
        if let Some((handle, from)) = self
            .handle_at(&p)
            .and_then(|h| self.handles.get(h).map(|handle| (h, handle.position)))
        {
            self.interaction = Interaction::HandleDrag { handle, from };
        } else if self.selection_bounds().is_some_and(|b| b.contains(&p)) {
            let before = self
                .selection
                .iter()
                .filter_map(|k| self.endpoints(k).map(|(s, e)| (k, s, e)))
                .collect();
            self.interaction = Interaction::GroupDrag(GroupDrag {
                last: p,
                pressed: self.shape_at(&p),
                moved: false,
                before,
            });
        } else if let Some(shape) = self.shape_at(&p) {
            self.toggle_selection(shape);
        } else {
            self.clear_selection();
            self.interaction = Interaction::SelectingRect {
                anchor: p,
                current: p,
            };
        }
    }

    fn drag_to(&mut self, drag: &mut GroupDrag, p: Point2D) {
        let (dx, dy) = (p.x - drag.last.x, p.y - drag.last.y);
        drag.last = p;
        if dx != 0.0 || dy != 0.0 {
            drag.moved = true;
            self.translate_selected(dx, dy);
        }
    }

    fn finish_group_drag(&mut self, before: Vec<(ShapeKey, Point2D, Point2D)>) {
        let moves: Vec<DragMove> = before
            .into_iter()
            .filter_map(|(shape, start, end)| {
                let to = self.endpoints(shape)?;
                (to != (start, end)).then_some(DragMove {
                    shape,
                    from: (start, end),
                    to,
                })
            })
            .collect();
        if !moves.is_empty() {
            debug!(shapes = moves.len(), "recorded group drag");
            self.history.record(HistoryEntry::Drag { moves });
        }
    }

    fn finish_handle_drag(&mut self, handle: HandleKey, from: Point2D) {
        let Some(h) = self.handles.get(handle) else {
            return;
        };
        if h.position != from {
            let entry = HistoryEntry::Edit {
                shape: h.owner,
                endpoint: h.role,
                from,
                to: h.position,
            };
            self.history.record(entry);
        }
    }

    /// Close out the active interaction as if the pointer had been released
    /// where it last was. In-progress drawings are discarded.
    fn end_interaction(&mut self) {
        match std::mem::take(&mut self.interaction) {
            Interaction::Drawing { shape } => {
                debug!("abandoning in-progress drawing");
                self.remove_shape(shape);
            }
            Interaction::GroupDrag(drag) => {
                if drag.moved {
                    self.finish_group_drag(drag.before);
                }
            }
            Interaction::HandleDrag { handle, from } => self.finish_handle_drag(handle, from),
            Interaction::SelectingRect { .. } | Interaction::Idle => {}
        }
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Begin a zero-length shape at `p`. Any drawing already in progress is
    /// discarded.
    pub fn start_drawing(&mut self, kind: ShapeKind, p: Point2D) -> ShapeKey {
        self.end_interaction();
        let shape = self.insert_shape(kind, p, p);
        self.interaction = Interaction::Drawing { shape };
        shape
    }

    /// Move the free end of the drawing in progress. Returns `false` when
    /// nothing is being drawn.
    pub fn continue_drawing(&mut self, p: Point2D) -> bool {
        let Interaction::Drawing { shape } = self.interaction else {
            return false;
        };
        match self.shapes.get(shape) {
            Some(s) => {
                let end = s.end;
                self.move_handle(end, p)
            }
            None => false,
        }
    }

    /// Finish the drawing in progress at `p`.
    ///
    /// Returns the committed shape, or `None` if nothing was being drawn or
    /// the shape was too short and has been discarded.
    pub fn stop_drawing(&mut self, p: Point2D) -> Option<ShapeKey> {
        let Interaction::Drawing { shape } = self.interaction else {
            return None;
        };
        self.continue_drawing(p);
        self.interaction = Interaction::Idle;

        let (start, end) = self.endpoints(shape)?;
        let kind = self.shapes.get(shape)?.kind;
        let length = start.distance_to(&end);
        if length <= self.config.min_commit_length {
            debug!(%kind, length, "discarding degenerate draw");
            self.remove_shape(shape);
            return None;
        }

        self.order.push(shape);
        self.history.record(HistoryEntry::Add {
            shape,
            kind,
            start,
            end,
        });
        debug!(%kind, length, "committed shape");
        Some(shape)
    }

    /// The shape currently being drawn, if any
    pub fn drawing_shape(&self) -> Option<ShapeKey> {
        match self.interaction {
            Interaction::Drawing { shape } => Some(shape),
            _ => None,
        }
    }

    // ========================================================================
    // Scale, deletion
    // ========================================================================

    pub fn pixels_per_unit(&self) -> f64 {
        self.pixels_per_unit
    }

    /// Change the canvas scale, rescaling every handle about the origin.
    ///
    /// Non-positive and non-finite values are ignored.
    pub fn set_scale(&mut self, pixels_per_unit: f64) {
        if !(pixels_per_unit.is_finite() && pixels_per_unit > 0.0) {
            warn!(pixels_per_unit, "ignoring invalid scale");
            return;
        }
        let factor = pixels_per_unit / self.pixels_per_unit;
        self.pixels_per_unit = pixels_per_unit;
        if factor == 1.0 {
            return;
        }

        for handle in self.handles.values_mut() {
            handle.position = handle.position.scale(factor);
        }
        self.history.scale(factor);

        let keys: Vec<ShapeKey> = self.shapes.keys().collect();
        for key in keys {
            self.refresh(key);
        }
        debug!(pixels_per_unit, factor, "rescaled scene");
    }

    /// Remove every selected shape. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let keys = self.selection.to_vec();
        self.selection.clear();

        let mut removed = 0;
        for key in keys {
            if self.remove_shape(key) {
                self.history.forget(key);
                removed += 1;
            }
        }
        debug!(removed, "deleted selection");
        removed
    }

    /// Drop every shape, label, selection and history entry
    pub fn clear_all(&mut self) {
        self.interaction = Interaction::Idle;
        self.shapes.clear();
        self.handles.clear();
        self.order.clear();
        self.labels.clear();
        self.selection.clear();
        self.history.clear();
    }

    // ========================================================================
    // Labels
    // ========================================================================

    pub fn labels_visible(&self) -> bool {
        self.labels_visible
    }

    pub fn set_labels_visible(&mut self, visible: bool) {
        self.labels_visible = visible;
    }

    /// Flip label visibility; returns the new state
    pub fn toggle_labels(&mut self) -> bool {
        self.labels_visible = !self.labels_visible;
        self.labels_visible
    }

    /// Label of a shape, whether or not labels are currently shown
    pub fn label(&self, key: ShapeKey) -> Option<&MeasurementLabel> {
        self.labels.get(&key)
    }

    /// Labels to render: none while hidden
    pub fn visible_labels(&self) -> impl Iterator<Item = (ShapeKey, &MeasurementLabel)> {
        let visible = self.labels_visible;
        self.labels
            .iter()
            .filter(move |_| visible)
            .map(|(k, l)| (*k, l))
    }

    // ========================================================================
    // Undo / redo
    // ========================================================================

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Revert the latest entry. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.end_interaction();
        let Some(entry) = self.history.pop_undo() else {
            return false;
        };

        match &entry {
            HistoryEntry::Add { shape, .. } => {
                self.remove_shape(*shape);
                self.history.remove_edits_for(*shape);
            }
            HistoryEntry::Drag { moves } => {
                for m in moves {
                    self.set_endpoints(m.shape, m.from);
                }
            }
            HistoryEntry::Edit {
                shape,
                endpoint,
                from,
                ..
            } => {
                self.set_endpoint(*shape, *endpoint, *from);
            }
        }

        debug!(?entry, "undo");
        self.history.push_redo(entry);
        true
    }

    /// Re-apply the latest undone entry. Returns `false` if there was nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        self.end_interaction();
        let Some(mut entry) = self.history.pop_redo() else {
            return false;
        };

        match &mut entry {
            HistoryEntry::Add {
                shape,
                kind,
                start,
                end,
            } => {
                let rebuilt = self.insert_shape(*kind, *start, *end);
                self.order.push(rebuilt);
                self.history.remap(*shape, rebuilt);
                *shape = rebuilt;
            }
            HistoryEntry::Drag { moves } => {
                for m in moves.iter() {
                    self.set_endpoints(m.shape, m.to);
                }
            }
            HistoryEntry::Edit {
                shape,
                endpoint,
                to,
                ..
            } => {
                self.set_endpoint(*shape, *endpoint, *to);
            }
        }

        debug!(?entry, "redo");
        self.history.push_undo(entry);
        true
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Toggle a committed shape in or out of the selection. Returns whether
    /// it is selected afterwards.
    pub fn toggle_selection(&mut self, key: ShapeKey) -> bool {
        if !self.order.contains(&key) {
            return false;
        }
        let selected = self.selection.toggle(key);
        self.set_highlight(key, selected);
        selected
    }

    pub fn clear_selection(&mut self) {
        for key in self.selection.to_vec() {
            self.set_highlight(key, false);
        }
        self.selection.clear();
    }

    /// Replace the selection with every committed shape whose outline or
    /// handles touch `rect`. Returns the number selected.
    /// The rectangle may be given with its corners in either order.
    pub fn select_in_rect(&mut self, rect: BoundingBox) -> usize {
        let rect = BoundingBox::from_corners(
            Point2D::new(rect.min_x, rect.min_y),
            Point2D::new(rect.max_x, rect.max_y),
        );
        self.clear_selection();
        let hits: Vec<ShapeKey> = self
            .order
            .iter()
            .copied()
            .filter(|&k| self.shape_touches_rect(k, &rect))
            .collect();
        for &key in &hits {
            self.selection.insert(key);
            self.set_highlight(key, true);
        }
        hits.len()
    }

    /// Union of the selected shapes' outlines and handle circles
    pub fn selection_bounds(&self) -> Option<BoundingBox> {
        let r = self.config.handle_radius;
        self.selection
            .iter()
            .filter_map(|key| {
                let shape = self.shapes.get(key)?;
                let (s, e) = self.endpoints(key)?;
                Some(
                    shape
                        .geometry
                        .bounding_box()
                        .union(&BoundingBox::new(s.x - r, s.x + r, s.y - r, s.y + r))
                        .union(&BoundingBox::new(e.x - r, e.x + r, e.y - r, e.y + r)),
                )
            })
            .reduce(|a, b| a.union(&b))
    }

    /// Live rectangle while a rectangle selection is in progress
    pub fn selection_rect(&self) -> Option<BoundingBox> {
        match self.interaction {
            Interaction::SelectingRect { anchor, current } => {
                Some(BoundingBox::from_corners(anchor, current))
            }
            _ => None,
        }
    }

    fn shape_touches_rect(&self, key: ShapeKey, rect: &BoundingBox) -> bool {
        let Some(shape) = self.shapes.get(key) else {
            return false;
        };
        shape.geometry.intersects_rect(rect)
            || [shape.start, shape.end].iter().any(|h| {
                self.handles
                    .get(*h)
                    .is_some_and(|h| circle_intersects_rect(&h.position, self.config.handle_radius, rect))
            })
    }

    fn set_highlight(&mut self, key: ShapeKey, on: bool) {
        let Some(shape) = self.shapes.get_mut(key) else {
            return;
        };
        shape.highlighted = on;
        for h in [shape.start, shape.end] {
            if let Some(handle) = self.handles.get_mut(h) {
                handle.highlighted = on;
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Committed shapes in commit order
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeKey, &Shape)> {
        self.order
            .iter()
            .filter_map(|&k| self.shapes.get(k).map(|s| (k, s)))
    }

    pub fn shape_count(&self) -> usize {
        self.order.len()
    }

    pub fn shape(&self, key: ShapeKey) -> Option<&Shape> {
        self.shapes.get(key)
    }

    pub fn handle(&self, key: HandleKey) -> Option<&Handle> {
        self.handles.get(key)
    }

    /// Current `(start, end)` of a shape
    pub fn endpoints(&self, key: ShapeKey) -> Option<(Point2D, Point2D)> {
        let shape = self.shapes.get(key)?;
        Some((
            self.handles.get(shape.start)?.position,
            self.handles.get(shape.end)?.position,
        ))
    }

    /// Handle positions of every committed shape
    pub fn anchor_positions(&self) -> Vec<Point2D> {
        self.shapes()
            .flat_map(|(_, s)| [s.start, s.end])
            .filter_map(|h| self.handles.get(h).map(|h| h.position))
            .collect()
    }

    /// Committed shapes as plain data, in commit order
    pub fn snapshot(&self) -> Vec<PlanShape> {
        self.shapes()
            .filter_map(|(k, s)| {
                let (start, end) = self.endpoints(k)?;
                Some(PlanShape::new(s.kind, start, end))
            })
            .collect()
    }

    /// Closest committed handle within the handle radius of `p`
    pub fn handle_at(&self, p: &Point2D) -> Option<HandleKey> {
        let radius = self.config.handle_radius;
        self.shapes()
            .flat_map(|(_, s)| [s.start, s.end])
            .filter_map(|h| {
                let d = self.handles.get(h)?.position.distance_to(p);
                (d <= radius).then_some((h, d))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(h, _)| h)
    }

    /// Closest committed shape whose outline lies within pick tolerance of `p`
    pub fn shape_at(&self, p: &Point2D) -> Option<ShapeKey> {
        let tolerance = self.config.pick_tolerance;
        self.shapes()
            .filter_map(|(k, s)| {
                let d = s.geometry.distance_to(p);
                (d <= tolerance).then_some((k, d))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(k, _)| k)
    }

    // ========================================================================
    // Internal mutation
    // ========================================================================

    fn insert_shape(&mut self, kind: ShapeKind, start: Point2D, end: Point2D) -> ShapeKey {
        let handles = &mut self.handles;
        let half_thickness = self.config.window_half_thickness;
        let key = self.shapes.insert_with_key(|key| {
            let start_handle = handles.insert(Handle {
                position: start,
                owner: key,
                role: Endpoint::Start,
                highlighted: false,
            });
            let end_handle = handles.insert(Handle {
                position: end,
                owner: key,
                role: Endpoint::End,
                highlighted: false,
            });
            Shape {
                kind,
                start: start_handle,
                end: end_handle,
                geometry: compute_geometry(kind, start, end, half_thickness),
                highlighted: false,
            }
        });
        self.relabel(key);
        key
    }

    fn remove_shape(&mut self, key: ShapeKey) -> bool {
        let Some(shape) = self.shapes.remove(key) else {
            return false;
        };
        self.handles.remove(shape.start);
        self.handles.remove(shape.end);
        self.labels.remove(&key);
        self.order.retain(|k| *k != key);
        self.selection.remove(key);
        true
    }

    fn move_handle(&mut self, handle: HandleKey, p: Point2D) -> bool {
        let Some(h) = self.handles.get_mut(handle) else {
            return false;
        };
        h.position = p;
        let owner = h.owner;
        self.refresh(owner);
        true
    }

    fn set_endpoint(&mut self, key: ShapeKey, endpoint: Endpoint, p: Point2D) -> bool {
        match self.shapes.get(key) {
            Some(shape) => {
                let handle = shape.handle(endpoint);
                self.move_handle(handle, p)
            }
            None => {
                debug!(?key, "skipping stale history entry");
                false
            }
        }
    }

    fn set_endpoints(&mut self, key: ShapeKey, (start, end): (Point2D, Point2D)) -> bool {
        let Some(shape) = self.shapes.get(key) else {
            debug!(?key, "skipping stale history entry");
            return false;
        };
        let (s, e) = (shape.start, shape.end);
        for (handle, position) in [(s, start), (e, end)] {
            if let Some(h) = self.handles.get_mut(handle) {
                h.position = position;
            }
        }
        self.refresh(key);
        true
    }

    fn translate_selected(&mut self, dx: f64, dy: f64) {
        for key in self.selection.to_vec() {
            if let Some((s, e)) = self.endpoints(key) {
                self.set_endpoints(key, (s.translate(dx, dy), e.translate(dx, dy)));
            }
        }
    }

    /// Recompute geometry and label from the current handle positions
    fn refresh(&mut self, key: ShapeKey) {
        let Some((start, end)) = self.endpoints(key) else {
            return;
        };
        let half_thickness = self.config.window_half_thickness;
        if let Some(shape) = self.shapes.get_mut(key) {
            shape.geometry = compute_geometry(shape.kind, start, end, half_thickness);
        }
        self.relabel(key);
    }

    fn relabel(&mut self, key: ShapeKey) {
        let Some((start, end)) = self.endpoints(key) else {
            return;
        };
        let mut label =
            MeasurementLabel::build(start, end, self.pixels_per_unit, LabelStyle::from(&self.config));
        let others: Vec<BoundingBox> = self
            .labels
            .iter()
            .filter(|(k, _)| **k != key)
            .flat_map(|(_, l)| l.boxes())
            .collect();
        label.resolve_overlap(&others);
        self.labels.insert(key, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    fn draw(editor: &mut SceneEditor, kind: ShapeKind, a: Point2D, b: Point2D) -> Option<ShapeKey> {
        editor.set_mode(Mode::Draw(kind));
        editor.pointer_down(a);
        editor.pointer_move(a.lerp(&b, 0.5));
        let before = editor.shape_count();
        editor.pointer_up(b);
        if editor.shape_count() > before {
            editor.shapes().last().map(|(k, _)| k)
        } else {
            None
        }
    }

    #[test]
    fn test_draw_commits_and_records() {
        let mut editor = SceneEditor::default();
        assert_eq!(editor.state(), EditorState::Idle);

        editor.set_mode(Mode::Draw(ShapeKind::Door));
        editor.pointer_down(p(10.0, 10.0));
        assert_eq!(editor.state(), EditorState::Drawing(ShapeKind::Door));
        editor.pointer_move(p(40.0, 10.0));
        editor.pointer_up(p(70.0, 10.0));

        assert_eq!(editor.shape_count(), 1);
        assert_eq!(editor.history().undo_len(), 1);
        let snapshot = editor.snapshot();
        assert_eq!(snapshot[0].kind, ShapeKind::Door);
        assert_eq!(snapshot[0].end, p(70.0, 10.0));
    }

    #[test]
    fn test_degenerate_draw_is_discarded() {
        let mut editor = SceneEditor::default();
        editor.set_mode(Mode::Draw(ShapeKind::Wall));
        editor.pointer_down(p(5.0, 5.0));
        editor.pointer_up(p(5.5, 5.0));

        assert_eq!(editor.shape_count(), 0);
        assert!(!editor.can_undo());
        assert!(editor.handle_at(&p(5.0, 5.0)).is_none());
        assert!(editor.visible_labels().next().is_none());
    }

    #[test]
    fn test_mode_switch_abandons_drawing() {
        let mut editor = SceneEditor::default();
        editor.set_mode(Mode::Draw(ShapeKind::Wall));
        editor.pointer_down(p(0.0, 0.0));
        editor.pointer_move(p(50.0, 0.0));
        editor.set_mode(Mode::Select);

        assert_eq!(editor.shape_count(), 0);
        assert!(editor.drawing_shape().is_none());
        assert_eq!(editor.state(), EditorState::Select);
    }

    #[test]
    fn test_click_toggles_and_empty_click_clears() {
        let mut editor = SceneEditor::default();
        let wall = draw(&mut editor, ShapeKind::Wall, p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        editor.set_mode(Mode::Select);

        editor.pointer_down(p(50.0, 2.0));
        editor.pointer_up(p(50.0, 2.0));
        assert!(editor.selection().contains(wall));
        assert!(editor.shape(wall).unwrap().highlighted);

        editor.pointer_down(p(300.0, 300.0));
        assert_eq!(editor.state(), EditorState::SelectingRect);
        editor.pointer_up(p(300.0, 300.0));
        assert!(editor.selection().is_empty());
        assert!(!editor.shape(wall).unwrap().highlighted);
    }

    #[test]
    fn test_rectangle_selection() {
        let mut editor = SceneEditor::default();
        let a = draw(&mut editor, ShapeKind::Wall, p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let b = draw(&mut editor, ShapeKind::Window, p(0.0, 200.0), p(100.0, 200.0)).unwrap();
        let c = draw(&mut editor, ShapeKind::Door, p(300.0, 300.0), p(350.0, 300.0)).unwrap();
        editor.set_mode(Mode::Select);

        editor.pointer_down(p(40.0, -50.0));
        editor.pointer_move(p(60.0, 100.0));
        assert!(editor.selection_rect().is_some());
        editor.pointer_up(p(60.0, 250.0));

        assert!(editor.selection().contains(a));
        assert!(editor.selection().contains(b));
        assert!(!editor.selection().contains(c));
    }

    #[test]
    fn test_group_drag_moves_and_undoes() {
        let mut editor = SceneEditor::default();
        let wall = draw(&mut editor, ShapeKind::Window, p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        editor.set_mode(Mode::Select);
        editor.toggle_selection(wall);

        editor.pointer_down(p(50.0, 0.0));
        editor.pointer_move(p(60.0, 10.0));
        assert_eq!(editor.state(), EditorState::Dragging);
        editor.pointer_up(p(70.0, 20.0));

        assert_eq!(editor.endpoints(wall), Some((p(20.0, 20.0), p(120.0, 20.0))));
        assert_eq!(
            editor.shape(wall).unwrap().geometry,
            compute_geometry(ShapeKind::Window, p(20.0, 20.0), p(120.0, 20.0), 5.0)
        );

        assert!(editor.undo());
        assert_eq!(editor.endpoints(wall), Some((p(0.0, 0.0), p(100.0, 0.0))));
        assert!(editor.redo());
        assert_eq!(editor.endpoints(wall), Some((p(20.0, 20.0), p(120.0, 20.0))));
    }

    #[test]
    fn test_handle_drag_records_edit() {
        let mut editor = SceneEditor::default();
        let wall = draw(&mut editor, ShapeKind::Wall, p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        editor.set_mode(Mode::Select);

        editor.pointer_down(p(101.0, 1.0));
        editor.pointer_move(p(120.0, 40.0));
        editor.pointer_up(p(100.0, 50.0));

        assert_eq!(editor.endpoints(wall), Some((p(0.0, 0.0), p(100.0, 50.0))));
        assert!(matches!(
            editor.history().undo_entries().last(),
            Some(HistoryEntry::Edit {
                endpoint: Endpoint::End,
                ..
            })
        ));

        assert!(editor.undo());
        assert_eq!(editor.endpoints(wall), Some((p(0.0, 0.0), p(100.0, 0.0))));
    }

    #[test]
    fn test_handle_drag_wins_over_selected_group() {
        let mut editor = SceneEditor::default();
        let wall = draw(&mut editor, ShapeKind::Wall, p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        editor.set_mode(Mode::Select);
        editor.toggle_selection(wall);

        editor.pointer_down(p(100.0, 0.0));
        assert_eq!(editor.state(), EditorState::Dragging);
        editor.pointer_move(p(100.0, 30.0));
        editor.pointer_up(p(100.0, 60.0));

        assert_eq!(editor.endpoints(wall), Some((p(0.0, 0.0), p(100.0, 60.0))));
        assert!(matches!(
            editor.history().undo_entries().last(),
            Some(HistoryEntry::Edit {
                endpoint: Endpoint::End,
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_rect_selects_like_normal_rect() {
        let mut editor = SceneEditor::default();
        let a = draw(&mut editor, ShapeKind::Wall, p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let b = draw(&mut editor, ShapeKind::Door, p(300.0, 300.0), p(350.0, 300.0)).unwrap();
        editor.set_mode(Mode::Select);

        let inverted = BoundingBox::new(60.0, 40.0, 50.0, -50.0);
        assert_eq!(editor.select_in_rect(inverted), 1);
        assert!(editor.selection().contains(a));
        assert!(!editor.selection().contains(b));
    }

    #[test]
    fn test_labels_at_shared_corner_do_not_overlap() {
        let mut editor = SceneEditor::default();
        let a = draw(&mut editor, ShapeKind::Wall, p(100.0, 100.0), p(200.0, 200.0)).unwrap();
        let b = draw(&mut editor, ShapeKind::Wall, p(300.0, 100.0), p(200.0, 200.0)).unwrap();

        let boxes: Vec<BoundingBox> = [a, b]
            .iter()
            .flat_map(|&k| editor.label(k).unwrap().boxes().collect::<Vec<_>>())
            .collect();
        assert_eq!(boxes.len(), 4);
        for (i, x) in boxes.iter().enumerate() {
            for y in &boxes[i + 1..] {
                assert!(!x.intersects(y), "{x:?} overlaps {y:?}");
            }
        }
    }

    #[test]
    fn test_undo_add_drops_its_edits() {
        let mut editor = SceneEditor::default();
        let wall = draw(&mut editor, ShapeKind::Wall, p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        editor.set_mode(Mode::Select);
        editor.pointer_down(p(100.0, 0.0));
        editor.pointer_up(p(100.0, 30.0));
        assert_eq!(editor.history().undo_len(), 2);

        // Undo the edit, then the add: the redo stack keeps only the add
        assert!(editor.undo());
        assert!(editor.undo());
        assert_eq!(editor.shape_count(), 0);
        assert_eq!(editor.history().redo_len(), 1);

        assert!(editor.redo());
        let (rebuilt, _) = editor.shapes().next().unwrap();
        assert_ne!(rebuilt, wall);
        assert_eq!(editor.endpoints(rebuilt), Some((p(0.0, 0.0), p(100.0, 0.0))));
        assert!(!editor.redo());
    }

    #[test]
    fn test_redo_add_remaps_later_entries() {
        let mut editor = SceneEditor::default();
        draw(&mut editor, ShapeKind::Wall, p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let wall = editor.shapes().next().unwrap().0;
        editor.set_mode(Mode::Select);
        editor.toggle_selection(wall);
        editor.pointer_down(p(50.0, 0.0));
        editor.pointer_up(p(50.0, 40.0));

        assert!(editor.undo()); // drag
        assert!(editor.undo()); // add
        assert!(editor.redo()); // add, with a fresh key
        assert!(editor.redo()); // drag must follow the new key

        let (key, _) = editor.shapes().next().unwrap();
        assert_eq!(editor.endpoints(key), Some((p(0.0, 40.0), p(100.0, 40.0))));
    }

    #[test]
    fn test_delete_selected_purges_history() {
        let mut editor = SceneEditor::default();
        let a = draw(&mut editor, ShapeKind::Wall, p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        draw(&mut editor, ShapeKind::Wall, p(0.0, 100.0), p(100.0, 100.0)).unwrap();
        editor.set_mode(Mode::Select);
        editor.toggle_selection(a);

        assert_eq!(editor.delete_selected(), 1);
        assert_eq!(editor.shape_count(), 1);
        assert!(editor.label(a).is_none());
        assert!(editor.selection().is_empty());
        assert_eq!(editor.history().undo_len(), 1);
        assert!(!editor.toggle_selection(a));
    }

    #[test]
    fn test_set_scale_rescales_about_origin() {
        let mut editor = SceneEditor::default();
        let wall = draw(&mut editor, ShapeKind::Wall, p(30.0, 60.0), p(90.0, 60.0)).unwrap();
        assert_eq!(editor.label(wall).unwrap().length.text, "2.00m");

        editor.set_scale(60.0);
        let (s, e) = editor.endpoints(wall).unwrap();
        assert_relative_eq!(s.x, 60.0);
        assert_relative_eq!(e.y, 120.0);
        // Real-world length is unchanged
        assert_eq!(editor.label(wall).unwrap().length.text, "2.00m");

        editor.set_scale(-1.0);
        editor.set_scale(f64::NAN);
        assert_relative_eq!(editor.pixels_per_unit(), 60.0);
    }

    #[test]
    fn test_label_visibility_is_global() {
        let mut editor = SceneEditor::default();
        let wall = draw(&mut editor, ShapeKind::Wall, p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        assert_eq!(editor.visible_labels().count(), 1);
        assert!(!editor.toggle_labels());
        assert_eq!(editor.visible_labels().count(), 0);
        assert!(editor.label(wall).is_some());
        editor.set_labels_visible(true);
        assert!(editor.labels_visible());
    }

    #[test]
    fn test_clear_all_resets_everything() {
        let mut editor = SceneEditor::default();
        draw(&mut editor, ShapeKind::Wall, p(0.0, 0.0), p(100.0, 0.0));
        editor.clear_all();
        assert_eq!(editor.shape_count(), 0);
        assert!(!editor.can_undo());
        assert!(editor.anchor_positions().is_empty());
    }
}

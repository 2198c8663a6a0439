// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Auto-layout: from named segments to shapes on the canvas.
//!
//! 1. **Resolve**: walk the segments in order, placing each end anchor at
//!    `start + length * (cos angle, sin angle)`. Anchors may be redefined by
//!    later segments; that is how a closed outline snaps back onto itself.
//! 2. **Fit**: scale and offset every anchor so the plan spans a fixed
//!    fraction of the canvas.
//! 3. **Replay**: draw each segment through the editor's own draw sequence,
//!    one step at a time, optionally pausing between steps.
//! 4. **Size check**: shrink everything if the result still overflows.
//!
//! Replay is an explicit stepper. [`Replay::play`] drives it with any
//! caller-supplied async sleep, so the crate does not depend on a runtime.

use std::future::Future;
use std::time::Duration;

use floorcraft_core::{bounding_box, length_to_pixels, BoundingBox, Point2D, Segment, ShapeKind};
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::config::LayoutConfig;
use crate::editor::{Mode, SceneEditor};
use crate::keys::ShapeKey;

/// Named anchor positions in canvas pixels
#[derive(Debug, Clone, Default)]
pub struct AnchorTable {
    anchors: FxHashMap<String, Point2D>,
}

impl AnchorTable {
    pub fn get(&self, name: &str) -> Option<Point2D> {
        self.anchors.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, position: Point2D) {
        self.anchors.insert(name.into(), position);
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point2D)> {
        self.anchors.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        bounding_box(self.anchors.values())
    }

    /// Apply `p * scale + offset` to every anchor
    pub fn transform(&mut self, scale: f64, offset: (f64, f64)) {
        for p in self.anchors.values_mut() {
            *p = p.scale(scale).translate(offset.0, offset.1);
        }
    }

    /// Scale every anchor about the origin
    pub fn scale(&mut self, factor: f64) {
        self.transform(factor, (0.0, 0.0));
    }
}

/// Resolves segment lists and replays them into a [`SceneEditor`]
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
    anchors: AnchorTable,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            anchors: AnchorTable::default(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn anchors(&self) -> &AnchorTable {
        &self.anchors
    }

    /// Rebuild the anchor table by chaining polar offsets.
    ///
    /// The first segment's start anchor is placed at the origin. Any other
    /// start anchor that has not been reached yet is also placed at the
    /// origin, with a warning.
    pub fn resolve(&mut self, segments: &[Segment], pixels_per_unit: f64) -> &AnchorTable {
        self.anchors.clear();
        if let Some(first) = segments.first() {
            self.anchors.insert(first.start.clone(), Point2D::ORIGIN);
        }

        for (index, segment) in segments.iter().enumerate() {
            let start = match self.anchors.get(&segment.start) {
                Some(p) => p,
                None => {
                    warn!(
                        anchor = %segment.start,
                        segment = index,
                        "anchor used before it was defined, placing it at the origin"
                    );
                    self.anchors.insert(segment.start.clone(), Point2D::ORIGIN);
                    Point2D::ORIGIN
                }
            };
            let end = start.polar_offset(
                length_to_pixels(segment.length, pixels_per_unit),
                segment.angle,
            );
            self.anchors.insert(segment.end.clone(), end);
        }

        &self.anchors
    }

    /// Scale and offset the anchors into a `width x height` canvas.
    ///
    /// Returns the applied scale. Zero-extent axes are ignored; a plan with
    /// no extent at all keeps scale 1.
    pub fn fit_to_viewport(&mut self, width: f64, height: f64) -> f64 {
        let Some(bounds) = self.anchors.bounds() else {
            return 1.0;
        };

        let target = self.config.target_fraction;
        let sx = (bounds.width() > f64::EPSILON).then(|| width * target / bounds.width());
        let sy = (bounds.height() > f64::EPSILON).then(|| height * target / bounds.height());
        let scale = match (sx, sy) {
            (Some(a), Some(b)) => a.min(b),
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => 1.0,
        };

        let offset = (
            width * self.config.offset_fraction - bounds.min_x * scale,
            height * self.config.offset_fraction - bounds.min_y * scale,
        );
        self.anchors.transform(scale, offset);
        scale
    }

    /// Clear `editor`, resolve and fit `segments`, and return a replay of them.
    pub fn prepare<'a>(&'a mut self, editor: &mut SceneEditor, segments: &'a [Segment]) -> Replay<'a> {
        editor.clear_all();

        let pixels_per_unit = self.config.pixels_per_unit;
        self.resolve(segments, pixels_per_unit);
        let scale = self.fit_to_viewport(editor.config().canvas_width, editor.config().canvas_height);
        editor.set_scale(pixels_per_unit * scale);
        debug!(
            segments = segments.len(),
            anchors = self.anchors.len(),
            scale,
            "resolved layout"
        );

        Replay {
            segments,
            anchors: &self.anchors,
            next: 0,
            delay: self.config.step_delay,
        }
    }

    /// Shrink the scene if its anchors reach past the canvas.
    ///
    /// Returns the editor's scale afterwards.
    pub fn check_shape_size(&mut self, editor: &mut SceneEditor) -> f64 {
        let (width, height) = (editor.config().canvas_width, editor.config().canvas_height);
        let Some(bounds) = self.anchors.bounds() else {
            return editor.pixels_per_unit();
        };
        if bounds.max_x <= width && bounds.max_y <= height {
            return editor.pixels_per_unit();
        }

        let fx = if bounds.max_x > width { width / bounds.max_x } else { f64::INFINITY };
        let fy = if bounds.max_y > height { height / bounds.max_y } else { f64::INFINITY };
        let factor = fx.min(fy) * self.config.fit_margin;

        self.anchors.scale(factor);
        editor.set_scale(editor.pixels_per_unit() * factor);
        info!(factor, pixels_per_unit = editor.pixels_per_unit(), "shrank oversized layout");
        editor.pixels_per_unit()
    }

    /// Prepare, replay with `sleep` between steps, then run the size check.
    pub async fn draw_plan<S, F>(
        &mut self,
        editor: &mut SceneEditor,
        segments: &[Segment],
        sleep: S,
    ) -> ReplaySummary
    where
        S: FnMut(Duration) -> F,
        F: Future<Output = ()>,
    {
        let summary = self.prepare(editor, segments).play(editor, sleep).await;
        self.check_shape_size(editor);
        info!(
            committed = summary.committed,
            discarded = summary.discarded,
            "layout finished"
        );
        summary
    }

    /// [`LayoutEngine::draw_plan`] without pauses
    pub fn draw_plan_now(&mut self, editor: &mut SceneEditor, segments: &[Segment]) -> ReplaySummary {
        let summary = self.prepare(editor, segments).run_to_end(editor);
        self.check_shape_size(editor);
        info!(
            committed = summary.committed,
            discarded = summary.discarded,
            "layout finished"
        );
        summary
    }
}

/// Draw one shape through the editor's interactive draw sequence.
///
/// Returns the committed key, or `None` if the editor discarded the shape.
pub fn replay_shape(
    editor: &mut SceneEditor,
    kind: ShapeKind,
    start: Point2D,
    end: Point2D,
) -> Option<ShapeKey> {
    editor.set_mode(Mode::Draw(kind));
    editor.start_drawing(kind, start);
    editor.continue_drawing(end);
    editor.stop_drawing(end)
}

/// Outcome of one replayed segment
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayStep {
    pub index: usize,
    pub name: String,
    pub kind: ShapeKind,
    /// `None` when the segment was too short to commit
    pub shape: Option<ShapeKey>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub committed: usize,
    pub discarded: usize,
    pub cancelled: bool,
}

impl ReplaySummary {
    fn record(&mut self, step: &ReplayStep) {
        if step.shape.is_some() {
            self.committed += 1;
        } else {
            self.discarded += 1;
        }
    }
}

/// Segment-by-segment replay of a resolved layout
#[must_use = "a replay draws nothing until it is stepped or played"]
#[derive(Debug)]
pub struct Replay<'a> {
    segments: &'a [Segment],
    anchors: &'a AnchorTable,
    next: usize,
    delay: Duration,
}

impl<'a> Replay<'a> {
    pub fn remaining(&self) -> usize {
        self.segments.len() - self.next
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Draw the next segment, or return `None` when all have been drawn.
    pub fn step(&mut self, editor: &mut SceneEditor) -> Option<ReplayStep> {
        let segment = self.segments.get(self.next)?;
        let index = self.next;
        self.next += 1;

        let start = self.anchors.get(&segment.start).unwrap_or(Point2D::ORIGIN);
        let end = self.anchors.get(&segment.end).unwrap_or(Point2D::ORIGIN);
        let shape = replay_shape(editor, segment.kind, start, end);
        debug!(
            index,
            name = %segment.name,
            kind = %segment.kind,
            committed = shape.is_some(),
            "replayed segment"
        );

        Some(ReplayStep {
            index,
            name: segment.name.clone(),
            kind: segment.kind,
            shape,
        })
    }

    /// Draw every remaining segment immediately
    pub fn run_to_end(mut self, editor: &mut SceneEditor) -> ReplaySummary {
        let mut summary = ReplaySummary::default();
        while let Some(step) = self.step(editor) {
            summary.record(&step);
        }
        editor.set_mode(Mode::Idle);
        summary
    }

    /// Draw every remaining segment, awaiting `sleep(delay)` before each.
    pub async fn play<S, F>(self, editor: &mut SceneEditor, sleep: S) -> ReplaySummary
    where
        S: FnMut(Duration) -> F,
        F: Future<Output = ()>,
    {
        self.play_until(editor, sleep, || false).await
    }

    /// Like [`Replay::play`], stopping between steps once `cancelled`
    /// returns `true`. Shapes already drawn stay in the editor.
    pub async fn play_until<S, F, C>(
        mut self,
        editor: &mut SceneEditor,
        mut sleep: S,
        mut cancelled: C,
    ) -> ReplaySummary
    where
        S: FnMut(Duration) -> F,
        F: Future<Output = ()>,
        C: FnMut() -> bool,
    {
        let mut summary = ReplaySummary::default();
        while self.remaining() > 0 {
            if cancelled() {
                summary.cancelled = true;
                break;
            }
            sleep(self.delay).await;
            if cancelled() {
                summary.cancelled = true;
                break;
            }
            if let Some(step) = self.step(editor) {
                summary.record(&step);
            }
        }
        if summary.cancelled {
            debug!(remaining = self.remaining(), "replay cancelled");
        }
        editor.set_mode(Mode::Idle);
        summary
    }
}

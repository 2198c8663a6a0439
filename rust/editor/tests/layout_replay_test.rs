// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::Cell;
use std::fs;
use std::future::ready;
use std::path::PathBuf;
use std::time::Duration;

use floorcraft_core::{parse_plan, Point2D, Segment, ShapeKind};
use floorcraft_editor::{LayoutConfig, LayoutEngine, SceneEditor};

fn square() -> Vec<Segment> {
    vec![
        Segment::new("A1", "A2", "north", ShapeKind::Wall, 1000.0, 0.0),
        Segment::new("A2", "A3", "east", ShapeKind::Wall, 1000.0, 90.0),
        Segment::new("A3", "A4", "south", ShapeKind::Wall, 1000.0, 180.0),
        Segment::new("A4", "A1", "west", ShapeKind::Wall, 1000.0, 270.0),
    ]
}

fn sample_plan_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("building")
        .join("data")
        .join("kitchen_house.plan")
}

#[test]
fn test_square_layout_closes() {
    let mut engine = LayoutEngine::default();
    let anchors = engine.resolve(&square(), 100.0);

    let a1 = anchors.get("A1").unwrap();
    assert!(a1.approx_eq(&Point2D::ORIGIN, 1e-9), "A1 drifted to {a1:?}");
    assert!(anchors.get("A3").unwrap().approx_eq(&Point2D::new(100.0, 100.0), 1e-9));
}

#[test]
fn test_prepare_and_replay_square() {
    let mut engine = LayoutEngine::new(LayoutConfig::immediate());
    let mut editor = SceneEditor::default();
    let segments = square();

    let summary = engine.prepare(&mut editor, &segments).run_to_end(&mut editor);
    assert_eq!(summary.committed, 4);
    assert_eq!(editor.shape_count(), 4);

    // 100 px square fitted to a quarter of 600 px at 15% offset
    let shapes = editor.snapshot();
    assert!(shapes[0].start.approx_eq(&Point2D::new(120.0, 90.0), 1e-6));
    assert!(shapes[2].start.approx_eq(&Point2D::new(270.0, 240.0), 1e-6));
    assert!(shapes[3].end.approx_eq(&shapes[0].start, 1e-6));

    // Labels keep reporting real-world metres
    let (key, _) = editor.shapes().next().unwrap();
    assert_eq!(editor.label(key).unwrap().length.text, "1.00m");
}

#[tokio::test]
async fn test_play_waits_before_each_step() {
    let mut engine = LayoutEngine::default();
    let mut editor = SceneEditor::default();
    let segments = square();
    let mut sleeps = Vec::new();

    let summary = engine
        .draw_plan(&mut editor, &segments, |delay| {
            sleeps.push(delay);
            ready(())
        })
        .await;

    assert_eq!(summary.committed, 4);
    assert!(!summary.cancelled);
    assert_eq!(sleeps, vec![Duration::from_millis(500); 4]);
}

#[tokio::test]
async fn test_play_until_cancels_between_steps() {
    let mut engine = LayoutEngine::default();
    let mut editor = SceneEditor::default();
    let segments = square();
    let ticks = Cell::new(0);

    let summary = engine
        .prepare(&mut editor, &segments)
        .play_until(
            &mut editor,
            |_| {
                ticks.set(ticks.get() + 1);
                tokio::task::yield_now()
            },
            || ticks.get() >= 3,
        )
        .await;

    assert!(summary.cancelled);
    assert_eq!(summary.committed, 2);
    assert_eq!(editor.shape_count(), 2);
}

#[test]
fn test_sample_house_draws_inside_canvas() {
    let text = fs::read_to_string(sample_plan_path()).expect("sample plan should exist");
    let segments = parse_plan(&text).unwrap();

    let mut engine = LayoutEngine::new(LayoutConfig::immediate());
    let mut editor = SceneEditor::default();
    let summary = engine.draw_plan_now(&mut editor, &segments);

    assert_eq!(summary.committed, 19);
    assert_eq!(summary.discarded, 0);

    let config = editor.config().clone();
    for anchor in editor.anchor_positions() {
        assert!(anchor.x >= 0.0 && anchor.x <= config.canvas_width);
        assert!(anchor.y >= 0.0 && anchor.y <= config.canvas_height);
    }
    let doors = editor
        .snapshot()
        .iter()
        .filter(|s| s.kind == ShapeKind::Door)
        .count();
    assert_eq!(doors, 3);
}

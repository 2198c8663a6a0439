// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use floorcraft_geometry::{Aabb, ClippingProcessor, Mesh, OrientedBox, Point2, SectionSegment};

/// Does any section segment cross the open interval `(lo, hi)` along X?
fn crosses_x(section: &[SectionSegment], lo: f64, hi: f64) -> bool {
    section.iter().any(|(a, b)| {
        let (s_lo, s_hi) = (a.x.min(b.x), a.x.max(b.x));
        s_hi > lo && s_lo < hi
    })
}

fn wall_and_window() -> (Mesh, Mesh) {
    // 10 long, 4 high, 0.3 thick, along +X
    let wall = OrientedBox::along_segment(
        Point2::new(0.0, 0.0),
        Point2::new(10.0, 0.0),
        0.0,
        4.0,
        0.3,
    )
    .unwrap()
    .to_mesh();

    // 2 wide window with a 1.25 sill, cutter slightly thicker than the wall
    let window = OrientedBox::along_segment(
        Point2::new(4.0, 0.0),
        Point2::new(6.0, 0.0),
        1.25,
        1.5,
        0.3 * 1.01,
    )
    .unwrap()
    .to_mesh();

    (wall, window)
}

#[test]
fn test_window_cut_leaves_gap_only_inside_opening() {
    let (wall, window) = wall_and_window();
    let processor = ClippingProcessor::new();
    let cut = processor.subtract_mesh(&wall, &window).unwrap();

    // Outer extent unchanged
    let bounds = Aabb::from_mesh(&cut).unwrap();
    assert!((bounds.size().y - 4.0).abs() < 1e-4);
    assert!((bounds.size().x - 10.0).abs() < 1e-4);

    // Mid-height of the window: nothing spans the opening
    let through = processor.section_at_height(&cut, 2.0);
    assert!(!through.is_empty());
    assert!(!crosses_x(&through, 4.0 + 1e-3, 6.0 - 1e-3));
    assert!(crosses_x(&through, 1.0, 3.0));
    assert!(crosses_x(&through, 7.0, 9.0));

    // Below the sill and above the head the wall is solid across
    assert!(crosses_x(&processor.section_at_height(&cut, 0.6), 4.5, 5.5));
    assert!(crosses_x(&processor.section_at_height(&cut, 3.4), 4.5, 5.5));
}

#[test]
fn test_cut_mesh_is_closed_outward() {
    let (wall, window) = wall_and_window();
    let cut = ClippingProcessor::new().subtract_mesh(&wall, &window).unwrap();

    // Divergence theorem: a closed, outward-wound surface has positive volume
    let volume: f64 = cut
        .triangles()
        .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
        .sum();
    let expected = 10.0 * 4.0 * 0.3 - 2.0 * 1.5 * 0.3;
    assert!((volume - expected).abs() < 1e-2, "volume {}", volume);
}

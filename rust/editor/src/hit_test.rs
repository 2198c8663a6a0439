// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D hit testing for clicks and rectangle selection.
//!
//! All tests are inclusive: touching counts as hitting.

use floorcraft_core::{BoundingBox, Point2D};
use nalgebra::Vector2;

fn vec(from: &Point2D, to: &Point2D) -> Vector2<f64> {
    Vector2::new(to.x - from.x, to.y - from.y)
}

/// Sign of the turn `a -> b -> c`: positive for counter-clockwise
fn orientation(a: &Point2D, b: &Point2D, c: &Point2D) -> f64 {
    vec(a, b).perp(&vec(a, c))
}

fn on_segment(a: &Point2D, b: &Point2D, p: &Point2D) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Whether segments `a1-a2` and `b1-b2` share at least one point
pub fn segments_intersect(a1: &Point2D, a2: &Point2D, b1: &Point2D, b2: &Point2D) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(b1, b2, a1))
        || (d2 == 0.0 && on_segment(b1, b2, a2))
        || (d3 == 0.0 && on_segment(a1, a2, b1))
        || (d4 == 0.0 && on_segment(a1, a2, b2))
}

/// Whether segment `a-b` touches `rect`: an endpoint inside, or an edge crossing
pub fn segment_intersects_rect(a: &Point2D, b: &Point2D, rect: &BoundingBox) -> bool {
    if rect.contains(a) || rect.contains(b) {
        return true;
    }

    let corners = [
        Point2D::new(rect.min_x, rect.min_y),
        Point2D::new(rect.max_x, rect.min_y),
        Point2D::new(rect.max_x, rect.max_y),
        Point2D::new(rect.min_x, rect.max_y),
    ];
    (0..4).any(|i| segments_intersect(a, b, &corners[i], &corners[(i + 1) % 4]))
}

/// Whether a circle overlaps `rect`
pub fn circle_intersects_rect(center: &Point2D, radius: f64, rect: &BoundingBox) -> bool {
    let closest = Point2D::new(
        center.x.clamp(rect.min_x, rect.max_x),
        center.y.clamp(rect.min_y, rect.max_y),
    );
    closest.distance_to(center) <= radius
}

/// Whether two boxes overlap
pub fn rect_intersects_rect(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.intersects(b)
}

/// Shortest distance from `p` to segment `a-b`
pub fn point_segment_distance(p: &Point2D, a: &Point2D, b: &Point2D) -> f64 {
    let ab = vec(a, b);
    let ap = vec(a, p);
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return ap.norm();
    }
    let t = (ap.dot(&ab) / len_sq).clamp(0.0, 1.0);
    (ap - ab * t).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn test_crossing_segments() {
        assert!(segments_intersect(&p(0.0, 0.0), &p(10.0, 10.0), &p(0.0, 10.0), &p(10.0, 0.0)));
        assert!(!segments_intersect(&p(0.0, 0.0), &p(4.0, 4.0), &p(6.0, 0.0), &p(10.0, 0.0)));
    }

    #[test]
    fn test_touching_and_collinear_segments() {
        // Shared endpoint
        assert!(segments_intersect(&p(0.0, 0.0), &p(5.0, 0.0), &p(5.0, 0.0), &p(5.0, 5.0)));
        // Overlapping collinear
        assert!(segments_intersect(&p(0.0, 0.0), &p(5.0, 0.0), &p(3.0, 0.0), &p(8.0, 0.0)));
        // Disjoint collinear
        assert!(!segments_intersect(&p(0.0, 0.0), &p(2.0, 0.0), &p(3.0, 0.0), &p(8.0, 0.0)));
    }

    #[test]
    fn test_segment_through_rect_without_endpoints_inside() {
        let rect = BoundingBox::new(10.0, 20.0, 10.0, 20.0);
        assert!(segment_intersects_rect(&p(0.0, 15.0), &p(30.0, 15.0), &rect));
        assert!(segment_intersects_rect(&p(12.0, 12.0), &p(100.0, 100.0), &rect));
        assert!(!segment_intersects_rect(&p(0.0, 0.0), &p(30.0, 5.0), &rect));
    }

    #[test]
    fn test_circle_rect() {
        let rect = BoundingBox::new(0.0, 10.0, 0.0, 10.0);
        assert!(circle_intersects_rect(&p(13.0, 5.0), 5.0, &rect));
        assert!(!circle_intersects_rect(&p(14.0, 14.0), 5.0, &rect));
        assert!(circle_intersects_rect(&p(5.0, 5.0), 1.0, &rect));
    }

    #[test]
    fn test_point_segment_distance() {
        assert_relative_eq!(point_segment_distance(&p(5.0, 3.0), &p(0.0, 0.0), &p(10.0, 0.0)), 3.0);
        assert_relative_eq!(point_segment_distance(&p(13.0, 4.0), &p(0.0, 0.0), &p(10.0, 0.0)), 5.0);
        assert_relative_eq!(point_segment_distance(&p(3.0, 4.0), &p(0.0, 0.0), &p(0.0, 0.0)), 5.0);
    }
}

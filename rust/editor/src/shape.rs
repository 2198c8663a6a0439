// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape model: walls, doors and windows as directed segments.
//!
//! A shape's rendered outline is never stored independently of its
//! endpoints. [`compute_geometry`] derives it from `(kind, start, end)` and is
//! called on draw, handle drags, group drags, rescaling and undo/redo alike.
//!
//! | Kind   | Outline                                                        |
//! |--------|----------------------------------------------------------------|
//! | Wall   | one line `start -> end`                                        |
//! | Window | two parallel lines offset by the half thickness on either side |
//! | Door   | quarter-circle swing centred at `start`, plus the leaf line    |

use floorcraft_core::{normalize_degrees, to_radians, BoundingBox, Point2D, ShapeKind};

use crate::hit_test::{point_segment_distance, rect_intersects_rect, segment_intersects_rect};
use crate::keys::{HandleKey, ShapeKey};

/// Sweep of every door swing, in degrees
pub const DOOR_SWEEP: f64 = 90.0;

/// A straight stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point2D,
    pub end: Point2D,
}

impl Line {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn distance_to(&self, p: &Point2D) -> f64 {
        point_segment_distance(p, &self.start, &self.end)
    }

    pub fn intersects_rect(&self, rect: &BoundingBox) -> bool {
        segment_intersects_rect(&self.start, &self.end, rect)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_corners(self.start, self.end)
    }
}

/// Circular pie slice describing a door swing.
///
/// Angles are in degrees, canvas convention (+Y down), measured from +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorArc {
    pub center: Point2D,
    pub radius: f64,
    pub rotation: f64,
    pub sweep: f64,
}

impl DoorArc {
    pub fn point_at(&self, degrees: f64) -> Point2D {
        self.center.polar_offset(self.radius, degrees)
    }

    pub fn start_point(&self) -> Point2D {
        self.point_at(self.rotation)
    }

    pub fn end_point(&self) -> Point2D {
        self.point_at(self.rotation + self.sweep)
    }

    /// Whether `degrees` falls inside the swept range
    pub fn contains_angle(&self, degrees: f64) -> bool {
        normalize_degrees(degrees - self.rotation) <= self.sweep
    }

    /// Box around the centre, both arc ends and any axis extreme the arc passes
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bounds = BoundingBox::from_corners(self.center, self.center);
        bounds.expand_to(&self.start_point());
        bounds.expand_to(&self.end_point());
        for axis in [0.0, 90.0, 180.0, 270.0] {
            if self.contains_angle(axis) {
                bounds.expand_to(&self.point_at(axis));
            }
        }
        bounds
    }

    /// Distance to the curved edge or the closing radius at the arc end
    pub fn distance_to(&self, p: &Point2D) -> f64 {
        let closing = point_segment_distance(p, &self.center, &self.end_point());
        let curve = if self.contains_angle(self.center.angle_to(p)) {
            (self.center.distance_to(p) - self.radius).abs()
        } else {
            p.distance_to(&self.start_point())
                .min(p.distance_to(&self.end_point()))
        };
        curve.min(closing)
    }
}

/// Derived outline of a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeGeometry {
    Wall(Line),
    Window([Line; 2]),
    Door { arc: DoorArc, leaf: Line },
}

impl ShapeGeometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeGeometry::Wall(_) => ShapeKind::Wall,
            ShapeGeometry::Window(_) => ShapeKind::Window,
            ShapeGeometry::Door { .. } => ShapeKind::Door,
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            ShapeGeometry::Wall(line) => line.bounding_box(),
            ShapeGeometry::Window([a, b]) => a.bounding_box().union(&b.bounding_box()),
            ShapeGeometry::Door { arc, leaf } => arc.bounding_box().union(&leaf.bounding_box()),
        }
    }

    /// Distance from `p` to the nearest drawn stroke
    pub fn distance_to(&self, p: &Point2D) -> f64 {
        match self {
            ShapeGeometry::Wall(line) => line.distance_to(p),
            ShapeGeometry::Window([a, b]) => a.distance_to(p).min(b.distance_to(p)),
            ShapeGeometry::Door { arc, leaf } => arc.distance_to(p).min(leaf.distance_to(p)),
        }
    }

    /// Rectangle-selection test: exact for lines, box-vs-box for door swings
    pub fn intersects_rect(&self, rect: &BoundingBox) -> bool {
        match self {
            ShapeGeometry::Wall(line) => line.intersects_rect(rect),
            ShapeGeometry::Window([a, b]) => a.intersects_rect(rect) || b.intersects_rect(rect),
            ShapeGeometry::Door { arc, leaf } => {
                rect_intersects_rect(&arc.bounding_box(), rect) || leaf.intersects_rect(rect)
            }
        }
    }
}

/// Door swing rotation in degrees for a threshold running `start -> end`.
///
/// The segment angle is normalized to `[0, 360)` and shifted by 270.
pub fn door_rotation(start: &Point2D, end: &Point2D) -> f64 {
    let mut degrees = start.angle_to(end);
    if degrees < 0.0 {
        degrees += 360.0;
    }
    (degrees + 270.0) % 360.0
}

/// Build the outline of a `kind` shape between two canvas points.
pub fn compute_geometry(
    kind: ShapeKind,
    start: Point2D,
    end: Point2D,
    window_half_thickness: f64,
) -> ShapeGeometry {
    match kind {
        ShapeKind::Wall => ShapeGeometry::Wall(Line::new(start, end)),
        ShapeKind::Window => {
            let angle = (end.y - start.y).atan2(end.x - start.x);
            let (dx, dy) = (
                angle.sin() * window_half_thickness,
                -angle.cos() * window_half_thickness,
            );
            ShapeGeometry::Window([
                Line::new(start.translate(dx, dy), end.translate(dx, dy)),
                Line::new(start.translate(-dx, -dy), end.translate(-dx, -dy)),
            ])
        }
        ShapeKind::Door => {
            let radius = start.distance_to(&end);
            let rotation = door_rotation(&start, &end);
            let r = to_radians(rotation);
            let leaf_end = start.translate(radius * r.cos(), radius * r.sin());
            ShapeGeometry::Door {
                arc: DoorArc {
                    center: start,
                    radius,
                    rotation,
                    sweep: DOOR_SWEEP,
                },
                leaf: Line::new(start, leaf_end),
            }
        }
    }
}

/// Which end of a shape a handle controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    End,
}

/// A live editor shape. Endpoint positions live on its two handles.
#[derive(Debug, Clone)]
pub struct Shape {
    pub kind: ShapeKind,
    pub start: HandleKey,
    pub end: HandleKey,
    pub geometry: ShapeGeometry,
    pub highlighted: bool,
}

impl Shape {
    pub fn handle(&self, endpoint: Endpoint) -> HandleKey {
        match endpoint {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }
}

/// A draggable endpoint marker
#[derive(Debug, Clone)]
pub struct Handle {
    pub position: Point2D,
    pub owner: ShapeKey,
    pub role: Endpoint,
    pub highlighted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn test_door_rotation_cardinal_angles() {
        let origin = Point2D::ORIGIN;
        for angle in [0.0_f64, 90.0, 180.0, 270.0] {
            let end = origin.polar_offset(100.0, angle);
            let expected = (angle + 270.0) % 360.0;
            let got = door_rotation(&origin, &end);
            // 360 and 0 are the same rotation
            let diff = (got - expected).rem_euclid(360.0);
            assert!(diff < 1e-9 || diff > 360.0 - 1e-9, "angle {angle}: {got} vs {expected}");
        }
    }

    #[test]
    fn test_window_lines_are_offset_perpendicular() {
        let geometry = compute_geometry(ShapeKind::Window, p(0.0, 0.0), p(100.0, 0.0), 5.0);
        let ShapeGeometry::Window([a, b]) = geometry else {
            panic!("expected window geometry");
        };
        assert_relative_eq!(a.start.y, -5.0, epsilon = 1e-12);
        assert_relative_eq!(b.start.y, 5.0, epsilon = 1e-12);
        assert_relative_eq!(a.length(), 100.0, epsilon = 1e-12);
        assert_relative_eq!(b.end.x, 100.0, epsilon = 1e-12);
    }

    #[test]
    fn test_door_arc_ends_at_threshold_end() {
        let start = p(10.0, 20.0);
        let end = p(70.0, 20.0);
        let ShapeGeometry::Door { arc, leaf } = compute_geometry(ShapeKind::Door, start, end, 5.0)
        else {
            panic!("expected door geometry");
        };
        assert_relative_eq!(arc.radius, 60.0);
        assert_relative_eq!(arc.rotation, 270.0);
        // Swing sweeps from the leaf round to the threshold end
        assert!(arc.end_point().approx_eq(&end, 1e-9));
        assert!(leaf.end.approx_eq(&p(10.0, -40.0), 1e-9));
    }

    #[test]
    fn test_door_bounding_box_covers_swing() {
        let geometry = compute_geometry(ShapeKind::Door, p(0.0, 0.0), p(10.0, 0.0), 5.0);
        let bounds = geometry.bounding_box();
        assert_relative_eq!(bounds.min_x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.max_x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.min_y, -10.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.max_y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_door_distance_and_rect_hits() {
        let geometry = compute_geometry(ShapeKind::Door, p(0.0, 0.0), p(10.0, 0.0), 5.0);
        // On the curve at 315 degrees
        let on_curve = Point2D::ORIGIN.polar_offset(10.0, 315.0);
        assert!(geometry.distance_to(&on_curve) < 1e-9);
        // Below the threshold the swing is not drawn
        assert!(geometry.distance_to(&p(5.0, 8.0)) > 5.0);

        assert!(geometry.intersects_rect(&BoundingBox::new(8.0, 20.0, -20.0, -8.0)));
        assert!(!geometry.intersects_rect(&BoundingBox::new(20.0, 30.0, 20.0, 30.0)));
    }

    #[test]
    fn test_geometry_kind_matches_input() {
        for kind in ShapeKind::ALL {
            assert_eq!(compute_geometry(kind, p(0.0, 0.0), p(3.0, 4.0), 5.0).kind(), kind);
        }
    }
}

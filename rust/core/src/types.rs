// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan data types shared by the editor and the 3D synthesis engine

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2D point in canvas space (pixels, +Y pointing down)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point reached by walking `length` pixels from `self` along `degrees`
    pub fn polar_offset(&self, length: f64, degrees: f64) -> Self {
        let radians = crate::units::to_radians(degrees);
        Self::new(self.x + length * radians.cos(), self.y + length * radians.sin())
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Direction from `self` to `other` in degrees, in `(-180, 180]`
    pub fn angle_to(&self, other: &Point2D) -> f64 {
        crate::units::to_degrees((other.y - self.y).atan2(other.x - self.x))
    }

    pub fn midpoint(&self, other: &Point2D) -> Self {
        self.lerp(other, 0.5)
    }

    pub fn lerp(&self, other: &Point2D, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Proportional scale about the origin
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn to_nalgebra(&self) -> nalgebra::Point2<f64> {
        nalgebra::Point2::new(self.x, self.y)
    }

    /// Approximate equality, used where coordinates went through trigonometry
    pub fn approx_eq(&self, other: &Point2D, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl From<nalgebra::Point2<f64>> for Point2D {
    fn from(p: nalgebra::Point2<f64>) -> Self {
        Self::new(p.x, p.y)
    }
}

/// The three kinds of plan element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ShapeKind {
    Wall,
    Door,
    Window,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Wall, ShapeKind::Door, ShapeKind::Window];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Wall => "wall",
            ShapeKind::Door => "door",
            ShapeKind::Window => "window",
        }
    }

    /// Doors and windows are cut out of the walls they overlap
    pub fn is_opening(&self) -> bool {
        matches!(self, ShapeKind::Door | ShapeKind::Window)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wall" => Ok(ShapeKind::Wall),
            "door" => Ok(ShapeKind::Door),
            "window" => Ok(ShapeKind::Window),
            other => Err(Error::UnknownShapeKind(other.to_string())),
        }
    }
}

/// Authoring-time description of a plan element.
///
/// Endpoints are anchor names rather than coordinates, so several segments
/// can meet at the same physical point. `length` is in millimetres and
/// `angle` in degrees measured from +X.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    pub start: String,
    pub end: String,
    pub name: String,
    pub kind: ShapeKind,
    pub length: f64,
    pub angle: f64,
}

impl Segment {
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        name: impl Into<String>,
        kind: ShapeKind,
        length: f64,
        angle: f64,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            name: name.into(),
            kind,
            length,
            angle,
        }
    }
}

/// A committed 2D shape reduced to plain data: kind plus canvas endpoints
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanShape {
    pub kind: ShapeKind,
    pub start: Point2D,
    pub end: Point2D,
}

impl PlanShape {
    pub fn new(kind: ShapeKind, start: Point2D, end: Point2D) -> Self {
        Self { kind, start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// Axis-aligned 2D bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Box spanned by two corners given in any order
    pub fn from_corners(a: Point2D, b: Point2D) -> Self {
        Self::new(a.x.min(b.x), a.x.max(b.x), a.y.min(b.y), a.y.max(b.y))
    }

    /// Box of the given size whose top-left corner is `origin`
    pub fn from_origin_size(origin: Point2D, width: f64, height: f64) -> Self {
        Self::new(origin.x, origin.x + width, origin.y, origin.y + height)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn contains(&self, point: &Point2D) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Closed-interval overlap test; touching edges count as intersecting
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    pub fn union(&self, other: &BoundingBox) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.max_x.max(other.max_x),
            self.min_y.min(other.min_y),
            self.max_y.max(other.max_y),
        )
    }

    pub fn expand_to(&mut self, point: &Point2D) {
        self.min_x = self.min_x.min(point.x);
        self.max_x = self.max_x.max(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.min_x + dx, self.max_x + dx, self.min_y + dy, self.max_y + dy)
    }
}

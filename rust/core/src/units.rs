// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Angle and length conversions between plan units and canvas pixels
//!
//! Plan lengths are authored in millimetres. The canvas scale is expressed
//! as pixels per metre.

use crate::types::{BoundingBox, Point2D};

/// Millimetres per metre
pub const MM_PER_UNIT: f64 = 1000.0;

#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

#[inline]
pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Map an angle in degrees into `[0, 360)`
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let d = degrees % 360.0;
    if d < 0.0 {
        d + 360.0
    } else {
        d
    }
}

/// Convert a length in millimetres to canvas pixels
#[inline]
pub fn length_to_pixels(mm_length: f64, pixels_per_unit: f64) -> f64 {
    (mm_length / MM_PER_UNIT) * pixels_per_unit
}

/// Convert a canvas length to metres
#[inline]
pub fn pixels_to_length(pixels: f64, pixels_per_unit: f64) -> f64 {
    pixels / pixels_per_unit
}

/// Bounding box over a point set.
///
/// Returns `None` for an empty input; callers decide what an empty plan means.
pub fn bounding_box<'a, I>(points: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a Point2D>,
{
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let mut bounds = BoundingBox::new(first.x, first.x, first.y, first.y);
    for point in iter {
        bounds.expand_to(point);
    }
    Some(bounds)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar polygon triangulation
//!
//! Polygons coming back from the CSG kernel are planar but arbitrary-sided.
//! They are projected onto their own plane and split into triangles, with
//! earcutr handling the non-convex cases.

use crate::{Error, Point2, Point3, Result, Vector3};

/// Orthonormal 2D frame embedded in a 3D plane
#[derive(Debug, Clone, Copy)]
pub struct PlaneFrame {
    pub origin: Point3<f64>,
    pub u: Vector3<f64>,
    pub v: Vector3<f64>,
}

impl PlaneFrame {
    /// Frame on the plane through `origin` with unit `normal`.
    ///
    /// `(u, v, normal)` is right-handed, so a counter-clockwise 2D loop maps to
    /// a loop wound counter-clockwise around `normal`.
    pub fn new(origin: Point3<f64>, normal: &Vector3<f64>) -> Self {
        // Pick the world axis least aligned with the normal for a stable cross
        let reference = if normal.x.abs() <= normal.y.abs() && normal.x.abs() <= normal.z.abs() {
            Vector3::x()
        } else if normal.y.abs() <= normal.z.abs() {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let u = normal.cross(&reference).normalize();
        let v = normal.cross(&u).normalize();
        Self { origin, u, v }
    }

    #[inline]
    pub fn project(&self, point: &Point3<f64>) -> Point2<f64> {
        let d = point - self.origin;
        Point2::new(d.dot(&self.u), d.dot(&self.v))
    }
}

/// Polygon normal by Newell's method; `None` for degenerate input
pub fn polygon_normal(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    if points.len() < 3 {
        return None;
    }
    let mut normal = Vector3::<f64>::zeros();
    for (i, current) in points.iter().enumerate() {
        let next = &points[(i + 1) % points.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal.try_normalize(1e-12)
}

fn is_convex(points: &[Point2<f64>]) -> bool {
    let n = points.len();
    let mut sign = 0.0f64;
    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];
        let cross = (p1.x - p0.x) * (p2.y - p1.y) - (p1.y - p0.y) * (p2.x - p1.x);
        if cross.abs() > 1e-10 {
            if sign != 0.0 && cross.signum() != sign {
                return false;
            }
            sign = cross.signum();
        }
    }
    true
}

/// Triangulate a simple polygon, returning indices into `points`
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();
    if n < 3 {
        return Err(Error::TriangulationError(format!(
            "polygon has {} vertices, need at least 3",
            n
        )));
    }

    if is_convex(points) {
        return Ok((1..n - 1).flat_map(|i| [0, i, i + 1]).collect());
    }

    let flat: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    earcutr::earcut(&flat, &[], 2).map_err(|e| Error::TriangulationError(format!("{:?}", e)))
}

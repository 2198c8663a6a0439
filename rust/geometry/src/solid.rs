// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Box solids for walls and openings
//!
//! World space is Y-up. Plan coordinates map to the XZ plane, and a box's
//! yaw is a right-handed rotation about +Y.

use crate::error::{Error, Result};
use crate::mesh::{Aabb, Mesh};
use nalgebra::{Isometry3, Point2, Point3, Translation3, UnitQuaternion, Vector3};

/// Corner sign patterns (x, y, z) for each face, counter-clockwise seen from
/// outside, paired with the face's local normal.
const FACES: [([(f64, f64, f64); 4], (f64, f64, f64)); 6] = [
    ([(1., -1., -1.), (1., 1., -1.), (1., 1., 1.), (1., -1., 1.)], (1., 0., 0.)),
    ([(-1., -1., -1.), (-1., -1., 1.), (-1., 1., 1.), (-1., 1., -1.)], (-1., 0., 0.)),
    ([(-1., 1., -1.), (-1., 1., 1.), (1., 1., 1.), (1., 1., -1.)], (0., 1., 0.)),
    ([(-1., -1., -1.), (1., -1., -1.), (1., -1., 1.), (-1., -1., 1.)], (0., -1., 0.)),
    ([(-1., -1., 1.), (1., -1., 1.), (1., 1., 1.), (-1., 1., 1.)], (0., 0., 1.)),
    ([(-1., -1., -1.), (-1., 1., -1.), (1., 1., -1.), (1., -1., -1.)], (0., 0., -1.)),
];

/// Box with its long axis rotated about the vertical.
///
/// `size` is (length along local X, height, thickness along local Z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub center: Point3<f64>,
    pub size: Vector3<f64>,
    pub yaw: f64,
}

impl OrientedBox {
    pub fn new(center: Point3<f64>, size: Vector3<f64>, yaw: f64) -> Self {
        Self { center, size, yaw }
    }

    /// Box running along a plan segment.
    ///
    /// `start`/`end` are world (x, z) coordinates. The box spans
    /// `[base, base + height]` vertically and is rotated by
    /// `-atan2(dz, dx)` so its local X axis follows the segment.
    pub fn along_segment(
        start: Point2<f64>,
        end: Point2<f64>,
        base: f64,
        height: f64,
        thickness: f64,
    ) -> Result<Self> {
        let delta = end - start;
        let length = delta.norm();
        if !(length > 0.0 && height > 0.0 && thickness > 0.0) {
            return Err(Error::InvalidSolid(format!(
                "length {:.3}, height {:.3}, thickness {:.3}",
                length, height, thickness
            )));
        }
        let mid = nalgebra::center(&start, &end);
        Ok(Self::new(
            Point3::new(mid.x, base + height / 2.0, mid.y),
            Vector3::new(length, height, thickness),
            -delta.y.atan2(delta.x),
        ))
    }

    /// Local-to-world placement
    pub fn isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::from(self.center.coords),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.yaw),
        )
    }

    /// The eight corners in world space
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let iso = self.isometry();
        let h = self.size / 2.0;
        let mut corners = [Point3::origin(); 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let sx = if i & 1 == 0 { -1.0 } else { 1.0 };
            let sy = if i & 2 == 0 { -1.0 } else { 1.0 };
            let sz = if i & 4 == 0 { -1.0 } else { 1.0 };
            *corner = iso * Point3::new(sx * h.x, sy * h.y, sz * h.z);
        }
        corners
    }

    pub fn aabb(&self) -> Aabb {
        let corners = self.corners();
        let mut aabb = Aabb::new(corners[0], corners[0]);
        for c in &corners[1..] {
            aabb.expand_to(c);
        }
        aabb
    }

    /// Flat-shaded mesh: 6 faces, 24 vertices, outward normals
    pub fn to_mesh(&self) -> Mesh {
        let iso = self.isometry();
        let h = self.size / 2.0;
        let mut mesh = Mesh::with_capacity(24, 36);

        for (corners, (nx, ny, nz)) in FACES.iter() {
            let normal = iso.rotation * Vector3::new(*nx, *ny, *nz);
            let base = mesh.vertex_count() as u32;
            for &(sx, sy, sz) in corners {
                mesh.add_vertex(iso * Point3::new(sx * h.x, sy * h.y, sz * h.z), normal);
            }
            mesh.add_triangle(base, base + 1, base + 2);
            mesh.add_triangle(base, base + 2, base + 3);
        }

        mesh
    }
}

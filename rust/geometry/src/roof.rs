// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Procedural hip roof
//!
//! The roof is a thin pyramid-like shell over the wall footprint: four eave
//! corners pushed out by the overhang and one apex above the footprint
//! center, duplicated at `+thickness` for the upper surface. The topology is
//! fixed at 10 vertices and 16 triangles.

use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};

/// Index buffer: lower surface, upper surface, then the closing side strips
const ROOF_INDICES: [u32; 48] = [
    // lower surface
    0, 1, 2, 3, 2, 4, 0, 2, 3, 1, 4, 2,
    // upper surface
    5, 7, 6, 8, 9, 7, 5, 8, 7, 6, 7, 9,
    // sides
    0, 5, 1, 1, 5, 6, 1, 6, 4, 4, 6, 9, 4, 9, 3, 3, 9, 8, 3, 8, 0, 0, 8, 5,
];

/// Plan-view rectangle in world X/Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Footprint {
    pub fn new(min_x: f64, max_x: f64, min_z: f64, max_z: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }

    pub fn center_x(&self) -> f64 {
        (self.min_x + self.max_x) / 2.0
    }

    pub fn center_z(&self) -> f64 {
        (self.min_z + self.max_z) / 2.0
    }

    pub fn expand_to(&mut self, x: f64, z: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_z = self.min_z.min(z);
        self.max_z = self.max_z.max(z);
    }
}

/// Roof shape parameters, in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoofParams {
    /// Horizontal distance the eaves extend past the footprint
    pub overhang: f64,
    /// Slope angle in radians
    pub pitch: f64,
    /// Vertical offset between lower and upper surface
    pub thickness: f64,
}

impl Default for RoofParams {
    fn default() -> Self {
        Self {
            overhang: 1000.0,
            pitch: std::f64::consts::PI / 5.0,
            thickness: 5.0,
        }
    }
}

/// Generated roof geometry
#[derive(Debug, Clone)]
pub struct RoofMesh {
    pub mesh: Mesh,
    /// Lower-surface apex
    pub apex: Point3<f64>,
    /// Apex rise above the eave line
    pub ridge_height: f64,
    pub eave_height: f64,
}

/// Ridge rise for a footprint: `max(width, depth) * tan(pitch) / 2`
pub fn ridge_height(footprint: &Footprint, pitch: f64) -> f64 {
    footprint.width().max(footprint.depth()) * pitch.tan() / 2.0
}

/// Build the roof shell resting on `eave_height`
pub fn build_hip_roof(footprint: &Footprint, eave_height: f64, params: &RoofParams) -> RoofMesh {
    let rise = ridge_height(footprint, params.pitch);
    let o = params.overhang;
    let apex = Point3::new(footprint.center_x(), eave_height + rise, footprint.center_z());

    let lower = [
        Point3::new(footprint.min_x - o, eave_height, footprint.min_z - o),
        Point3::new(footprint.max_x + o, eave_height, footprint.min_z - o),
        apex,
        Point3::new(footprint.min_x - o, eave_height, footprint.max_z + o),
        Point3::new(footprint.max_x + o, eave_height, footprint.max_z + o),
    ];
    let lift = Vector3::new(0.0, params.thickness, 0.0);

    let mut mesh = Mesh::with_capacity(10, ROOF_INDICES.len());
    for p in lower.iter().copied().chain(lower.iter().map(|p| *p + lift)) {
        mesh.add_vertex(p, Vector3::y());
    }
    for tri in ROOF_INDICES.chunks_exact(3) {
        mesh.add_triangle(tri[0], tri[1], tri[2]);
    }
    mesh.compute_smooth_normals();

    RoofMesh {
        mesh,
        apex,
        ridge_height: rise,
        eave_height,
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CSG (Constructive Solid Geometry) Operations
//!
//! Boolean subtraction of opening volumes from wall solids, plus planar
//! sectioning used to inspect the result.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::triangulation::{polygon_normal, triangulate_polygon, PlaneFrame};
use csgrs::mesh::{polygon::Polygon, vertex::Vertex, Mesh as CSGMesh};
use nalgebra::{Point3, Vector3};
use std::sync::OnceLock;

/// Plane definition for sectioning
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Point on the plane
    pub point: Point3<f64>,
    /// Normal vector (normalized)
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a new plane
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Horizontal plane at elevation `y`, facing up
    pub fn horizontal(y: f64) -> Self {
        Self::new(Point3::new(0.0, y, 0.0), Vector3::y())
    }

    /// Calculate signed distance from point to plane
    /// Positive = in front, Negative = behind
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.point).dot(&self.normal)
    }

    /// Check if point is in front of plane
    pub fn is_front(&self, point: &Point3<f64>) -> bool {
        self.signed_distance(point) >= 0.0
    }
}

/// A straight piece of a planar cross-section
pub type SectionSegment = (Point3<f64>, Point3<f64>);

/// CSG processor for wall/opening booleans
#[derive(Debug, Clone)]
pub struct ClippingProcessor {
    /// Epsilon for floating point comparisons
    pub epsilon: f64,
}

impl ClippingProcessor {
    /// Create a new clipping processor
    pub fn new() -> Self {
        Self { epsilon: 1e-6 }
    }

    /// Subtract `cutter` from `host` using csgrs boolean difference.
    ///
    /// An empty cutter returns the host unchanged. An empty host, or a result
    /// with no surviving polygons, is reported as an error so the caller can
    /// decide whether to keep the original solid.
    pub fn subtract_mesh(&self, host: &Mesh, cutter: &Mesh) -> Result<Mesh> {
        use csgrs::traits::CSG;

        if cutter.is_empty() {
            return Ok(host.clone());
        }
        if host.is_empty() {
            return Err(Error::EmptyMesh("subtraction host has no geometry".to_string()));
        }

        let host_csg = self.mesh_to_csgrs(host);
        let cutter_csg = self.mesh_to_csgrs(cutter);

        let result = host_csg.difference(&cutter_csg);
        if result.polygons.is_empty() {
            return Err(Error::BooleanError(
                "difference removed the whole solid".to_string(),
            ));
        }

        self.csgrs_to_mesh(&result)
    }

    /// Convert our Mesh format to csgrs Mesh format
    fn mesh_to_csgrs(&self, mesh: &Mesh) -> CSGMesh<()> {
        if mesh.is_empty() {
            return CSGMesh {
                polygons: Vec::new(),
                bounding_box: OnceLock::new(),
                metadata: None,
            };
        }

        let polygons: Vec<Polygon<()>> = mesh
            .triangles()
            .filter_map(|[v0, v1, v2]| {
                // Degenerate triangles would feed NaN normals into the BSP
                let normal = (v1 - v0).cross(&(v2 - v0)).try_normalize(self.epsilon * 1e-4)?;
                Some(Polygon::new(
                    vec![
                        Vertex::new(v0, normal),
                        Vertex::new(v1, normal),
                        Vertex::new(v2, normal),
                    ],
                    None,
                ))
            })
            .collect();

        CSGMesh::from_polygons(&polygons, None)
    }

    /// Convert csgrs Mesh format back to our Mesh format
    fn csgrs_to_mesh(&self, csg_mesh: &CSGMesh<()>) -> Result<Mesh> {
        let mut mesh = Mesh::new();

        for polygon in &csg_mesh.polygons {
            let vertices = &polygon.vertices;
            if vertices.len() < 3 {
                continue;
            }

            let points: Vec<Point3<f64>> = vertices.iter().map(|v| v.pos).collect();

            // Trust the kernel's plane normal, fall back to the loop itself
            let normal = match vertices[0].normal.try_normalize(1e-10) {
                Some(n) if n.iter().all(|c| c.is_finite()) => n,
                _ => match polygon_normal(&points) {
                    Some(n) => n,
                    None => continue,
                },
            };

            let frame = PlaneFrame::new(points[0], &normal);
            let projected: Vec<_> = points.iter().map(|p| frame.project(p)).collect();
            let indices = match triangulate_polygon(&projected) {
                Ok(indices) => indices,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping untriangulable CSG polygon");
                    continue;
                }
            };

            let base = mesh.vertex_count() as u32;
            for point in &points {
                mesh.add_vertex(*point, normal);
            }

            for tri in indices.chunks_exact(3) {
                let (a, b, c) = (tri[0], tri[1], tri[2]);
                let winding = (points[b] - points[a]).cross(&(points[c] - points[a]));
                // Keep every triangle wound counter-clockwise around the outward normal
                if winding.dot(&normal) < 0.0 {
                    mesh.add_triangle(base + a as u32, base + c as u32, base + b as u32);
                } else {
                    mesh.add_triangle(base + a as u32, base + b as u32, base + c as u32);
                }
            }
        }

        if mesh.is_empty() {
            return Err(Error::EmptyMesh("CSG result produced no triangles".to_string()));
        }
        Ok(mesh)
    }

    /// Intersect every triangle of `mesh` with `plane`.
    ///
    /// Triangles lying in the plane contribute nothing.
    pub fn section(&self, mesh: &Mesh, plane: &Plane) -> Vec<SectionSegment> {
        let mut segments = Vec::new();

        for corners in mesh.triangles() {
            let d = corners.map(|p| plane.signed_distance(&p));
            let mut hits: Vec<Point3<f64>> = Vec::with_capacity(2);

            for (i, j) in [(0, 1), (1, 2), (2, 0)] {
                let (di, dj) = (d[i], d[j]);
                if (di >= 0.0) != (dj >= 0.0) {
                    let t = di / (di - dj);
                    hits.push(corners[i] + (corners[j] - corners[i]) * t);
                }
            }

            if let [a, b] = hits[..] {
                if (b - a).norm() > self.epsilon {
                    segments.push((a, b));
                }
            }
        }

        segments
    }

    /// Horizontal cross-section at elevation `y`
    pub fn section_at_height(&self, mesh: &Mesh, y: f64) -> Vec<SectionSegment> {
        self.section(mesh, &Plane::horizontal(y))
    }
}

impl Default for ClippingProcessor {
    fn default() -> Self {
        Self::new()
    }
}

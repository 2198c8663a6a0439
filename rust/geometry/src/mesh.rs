// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use nalgebra::{Point3, Vector3};

/// Triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add a flat-shaded triangle with its own three vertices
    pub fn add_flat_triangle(&mut self, v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) {
        let normal = (v1 - v0)
            .cross(&(v2 - v0))
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::y);
        let base = self.vertex_count() as u32;
        self.add_vertex(v0, normal);
        self.add_vertex(v1, normal);
        self.add_vertex(v2, normal);
        self.add_triangle(base, base + 1, base + 2);
    }

    /// Merge another mesh into this one
    #[inline]
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = (self.positions.len() / 3) as u32;

        self.positions.reserve(other.positions.len());
        self.normals.reserve(other.normals.len());
        self.indices.reserve(other.indices.len());

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex position widened to f64
    #[inline]
    pub fn vertex(&self, index: usize) -> Point3<f64> {
        Point3::new(
            self.positions[index * 3] as f64,
            self.positions[index * 3 + 1] as f64,
            self.positions[index * 3 + 2] as f64,
        )
    }

    /// Stored normal of a vertex widened to f64
    #[inline]
    pub fn normal(&self, index: usize) -> Vector3<f64> {
        Vector3::new(
            self.normals[index * 3] as f64,
            self.normals[index * 3 + 1] as f64,
            self.normals[index * 3 + 2] as f64,
        )
    }

    /// Corner positions of triangle `index`
    #[inline]
    pub fn triangle(&self, index: usize) -> [Point3<f64>; 3] {
        let i0 = self.indices[index * 3] as usize;
        let i1 = self.indices[index * 3 + 1] as usize;
        let i2 = self.indices[index * 3 + 2] as usize;
        [self.vertex(i0), self.vertex(i1), self.vertex(i2)]
    }

    /// Iterate over triangle corner positions
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        (0..self.triangle_count()).map(move |i| self.triangle(i))
    }

    /// Calculate bounds (min, max)
    #[inline]
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }

    /// Move every vertex by `offset`
    pub fn translate(&mut self, offset: Vector3<f64>) {
        self.positions.chunks_exact_mut(3).for_each(|chunk| {
            chunk[0] = (chunk[0] as f64 + offset.x) as f32;
            chunk[1] = (chunk[1] as f64 + offset.y) as f32;
            chunk[2] = (chunk[2] as f64 + offset.z) as f32;
        });
    }

    /// Replace normals with area-weighted smooth vertex normals
    pub fn compute_smooth_normals(&mut self) {
        let vertex_count = self.vertex_count();
        if vertex_count == 0 {
            return;
        }

        let mut normals = vec![Vector3::zeros(); vertex_count];

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let v0 = self.vertex(i0);
            let face = (self.vertex(i1) - v0).cross(&(self.vertex(i2) - v0));
            normals[i0] += face;
            normals[i1] += face;
            normals[i2] += face;
        }

        self.normals.clear();
        self.normals.reserve(vertex_count * 3);
        for normal in normals {
            // Unreferenced vertices keep an up normal instead of NaN
            let n = normal.try_normalize(1e-12).unwrap_or_else(Vector3::y);
            self.normals.push(n.x as f32);
            self.normals.push(n.y as f32);
            self.normals.push(n.z as f32);
        }
    }

    /// Clear the mesh
    #[inline]
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.indices.clear();
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Axis-aligned 3D bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Tight box around a point set, `None` when empty
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f64>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self::new(first, first);
        for p in iter {
            aabb.expand_to(&p);
        }
        Some(aabb)
    }

    /// Bounds of a mesh, `None` for an empty mesh
    pub fn from_mesh(mesh: &Mesh) -> Option<Self> {
        if mesh.is_empty() {
            return None;
        }
        let (min, max) = mesh.bounds();
        Some(Self::new(min.cast::<f64>(), max.cast::<f64>()))
    }

    pub fn expand_to(&mut self, p: &Point3<f64>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn union(&self, other: &Aabb) -> Self {
        Self::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Closed-interval overlap test
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_add_vertex() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.positions, vec![1.0, 2.0, 3.0]);
        assert_eq!(mesh.normals, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = Mesh::new();
        a.add_flat_triangle(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let b = a.clone();
        a.merge(&b);

        assert_eq!(a.vertex_count(), 6);
        assert_eq!(a.triangle_count(), 2);
        assert_eq!(&a.indices[3..], &[3, 4, 5]);
    }

    #[test]
    fn test_flat_triangle_normal_follows_winding() {
        let mut mesh = Mesh::new();
        mesh.add_flat_triangle(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(mesh.normal(0), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_translate_and_bounds() {
        let mut mesh = Mesh::new();
        mesh.add_flat_triangle(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 1.0),
        );
        mesh.translate(Vector3::new(10.0, 0.0, -1.0));

        let (min, max) = mesh.bounds();
        assert_eq!(min, Point3::new(10.0, 0.0, -1.0));
        assert_eq!(max, Point3::new(12.0, 3.0, 0.0));
    }

    #[test]
    fn test_aabb_intersection() {
        let a = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point3::new(0.5, 0.5, 0.5), Point3::new(2.0, 2.0, 2.0));
        let c = Aabb::new(Point3::new(1.5, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.union(&c).max, Point3::new(2.0, 1.0, 1.0));
        assert!(Aabb::from_mesh(&Mesh::new()).is_none());
    }
}

//! Floorcraft Geometry
//!
//! Mesh building blocks for turning a 2D plan into a 3D model: oriented box
//! solids, csgrs-backed boolean subtraction, a procedural hip roof and
//! STL/OBJ/MTL text export. Triangulation uses earcutr and transforms use
//! nalgebra.

pub mod csg;
pub mod error;
pub mod export;
pub mod mesh;
pub mod roof;
pub mod solid;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use csg::{ClippingProcessor, Plane, SectionSegment};
pub use error::{Error, Result};
pub use export::{write_mtl, write_obj, write_stl, ExportPart, Material, Rgb};
pub use mesh::{Aabb, Mesh};
pub use roof::{build_hip_roof, ridge_height, Footprint, RoofMesh, RoofParams};
pub use solid::OrientedBox;
pub use triangulation::triangulate_polygon;

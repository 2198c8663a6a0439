// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Synthesis parameters and the generated building scene

use crate::error::{Error, Result};
use floorcraft_core::ShapeKind;
use floorcraft_geometry::{
    write_mtl, write_obj, write_stl, Aabb, ExportPart, Footprint, Material, Mesh, Rgb, RoofMesh, RoofParams,
};
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Heights, thicknesses and scene scale, in world millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingParams {
    pub wall_height: f64,
    pub wall_thickness: f64,
    pub door_height: f64,
    pub window_height: f64,
    /// Multiplier applied both to the scene extent and to every mapped coordinate
    pub length_scale: f64,
    /// World span both canvas axes map to, before `length_scale`
    pub scene_extent: f64,
    pub roof_overhang: f64,
    /// Roof slope in radians
    pub roof_pitch: f64,
    pub roof_thickness: f64,
    pub roof_visible: bool,
    #[serde(with = "hex_color")]
    pub wall_color: Rgb,
    #[serde(with = "hex_color")]
    pub door_color: Rgb,
    #[serde(with = "hex_color")]
    pub window_color: Rgb,
    #[serde(with = "hex_color")]
    pub roof_color: Rgb,
}

pub const DEFAULT_WALL_COLOR: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
pub const DEFAULT_DOOR_COLOR: Rgb = Rgb::new(0x8B, 0x45, 0x13);
pub const DEFAULT_WINDOW_COLOR: Rgb = Rgb::new(0x00, 0x00, 0xFF);
pub const DEFAULT_ROOF_COLOR: Rgb = Rgb::new(0x80, 0x00, 0x20);

impl Default for BuildingParams {
    fn default() -> Self {
        let roof = RoofParams::default();
        Self {
            wall_height: 4000.0,
            wall_thickness: 300.0,
            door_height: 2000.0,
            window_height: 1500.0,
            length_scale: 1.7,
            scene_extent: 12000.0,
            roof_overhang: roof.overhang,
            roof_pitch: roof.pitch,
            roof_thickness: roof.thickness,
            roof_visible: true,
            wall_color: DEFAULT_WALL_COLOR,
            door_color: DEFAULT_DOOR_COLOR,
            window_color: DEFAULT_WINDOW_COLOR,
            roof_color: DEFAULT_ROOF_COLOR,
        }
    }
}

impl BuildingParams {
    /// Window sill elevation: windows sit centred on the wall height
    pub fn window_sill(&self) -> f64 {
        (self.wall_height - self.window_height) / 2.0
    }

    /// World X units per canvas pixel for a canvas of the given width
    pub fn world_per_pixel(&self, canvas_width: f64) -> f64 {
        self.axis_scale(canvas_width)
    }

    /// World Z units per canvas pixel for a canvas of the given height
    pub fn world_per_pixel_z(&self, canvas_height: f64) -> f64 {
        self.axis_scale(canvas_height)
    }

    fn axis_scale(&self, canvas_span: f64) -> f64 {
        let scale = self.scene_extent * self.length_scale / canvas_span;
        scale * self.length_scale
    }

    pub fn color_of(&self, kind: ShapeKind) -> Rgb {
        match kind {
            ShapeKind::Wall => self.wall_color,
            ShapeKind::Door => self.door_color,
            ShapeKind::Window => self.window_color,
        }
    }

    /// Put every element colour back to its default
    pub fn reset_colors(&mut self) {
        self.wall_color = DEFAULT_WALL_COLOR;
        self.door_color = DEFAULT_DOOR_COLOR;
        self.window_color = DEFAULT_WINDOW_COLOR;
        self.roof_color = DEFAULT_ROOF_COLOR;
    }

    pub fn roof_params(&self) -> RoofParams {
        RoofParams {
            overhang: self.roof_overhang,
            pitch: self.roof_pitch,
            thickness: self.roof_thickness,
        }
    }

    /// Reject values that cannot produce solids
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("wall height", self.wall_height),
            ("wall thickness", self.wall_thickness),
            ("door height", self.door_height),
            ("window height", self.window_height),
            ("length scale", self.length_scale),
            ("scene extent", self.scene_extent),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidParams(format!("{} must be positive, got {}", name, value)));
            }
        }
        Ok(())
    }
}

/// One generated solid, traceable to the plan shape it came from
#[derive(Debug, Clone)]
pub struct Element {
    pub kind: ShapeKind,
    /// Object name used on export, e.g. `wall_3`
    pub name: String,
    /// Index into the input shape list
    pub source: usize,
    /// World (x, z) endpoints
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub mesh: Mesh,
    pub color: Rgb,
}

impl Element {
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_mesh(&self.mesh)
    }
}

/// Perspective camera placement framing a footprint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub near: f64,
    pub far: f64,
}

impl CameraRig {
    /// Look down at the footprint from behind its far edge
    pub fn frame(footprint: &Footprint, height: f64) -> Self {
        let width = footprint.width();
        let depth = footprint.depth();
        let span = width.max(depth);
        let (cx, cz) = (footprint.center_x(), footprint.center_z());

        Self {
            position: Point3::new(cx, span, footprint.max_z + depth),
            target: Point3::new(cx, 0.0, cz),
            near: 1.0,
            far: 3.0 * span.max(height),
        }
    }
}

/// The full 3D scene rebuilt from a plan
#[derive(Debug, Clone)]
pub struct GeneratedScene {
    pub walls: Vec<Element>,
    /// Door and window panels
    pub openings: Vec<Element>,
    /// `None` when the plan has no walls
    pub roof: Option<RoofMesh>,
    pub roof_visible: bool,
    pub roof_color: Rgb,
    pub footprint: Footprint,
    pub camera: CameraRig,
    pub max_wall_height: f64,
}

impl GeneratedScene {
    pub fn element_count(&self) -> usize {
        self.walls.len() + self.openings.len()
    }

    /// Flip roof visibility, returning the new state
    pub fn toggle_roof(&mut self) -> bool {
        self.roof_visible = !self.roof_visible;
        self.roof_visible
    }

    /// Walls, then openings, then the roof if shown. Each part uses the
    /// material named after its element kind.
    pub fn visible_meshes(&self) -> Vec<ExportPart<'_>> {
        let mut parts: Vec<ExportPart<'_>> = self
            .walls
            .iter()
            .chain(&self.openings)
            .map(|e| ExportPart::new(&e.name, &e.mesh).with_material(e.kind.as_str()))
            .collect();
        if let Some(roof) = self.roof.as_ref().filter(|_| self.roof_visible) {
            parts.push(ExportPart::new("roof", &roof.mesh).with_material("roof"));
        }
        parts
    }

    /// Recolour every element and the roof from `params` without rebuilding
    pub fn apply_colors(&mut self, params: &BuildingParams) {
        for element in self.walls.iter_mut().chain(&mut self.openings) {
            element.color = params.color_of(element.kind);
        }
        self.roof_color = params.roof_color;
    }

    /// One material per element kind present in the visible scene
    pub fn materials(&self) -> Vec<Material<'static>> {
        let mut materials: Vec<Material<'static>> = Vec::new();
        for element in self.walls.iter().chain(&self.openings) {
            let name = element.kind.as_str();
            if !materials.iter().any(|m| m.name == name) {
                materials.push(Material {
                    name,
                    diffuse: element.color,
                });
            }
        }
        if self.roof.is_some() && self.roof_visible {
            materials.push(Material {
                name: "roof",
                diffuse: self.roof_color,
            });
        }
        materials
    }

    /// Bounds of everything visible
    pub fn bounds(&self) -> Option<Aabb> {
        self.visible_meshes()
            .iter()
            .filter_map(|part| Aabb::from_mesh(part.mesh))
            .reduce(|a, b| a.union(&b))
    }

    pub fn triangle_count(&self) -> usize {
        self.visible_meshes()
            .iter()
            .map(|part| part.mesh.triangle_count())
            .sum()
    }

    pub fn write_stl<W: Write>(&self, out: &mut W, solid_name: &str) -> io::Result<()> {
        write_stl(out, solid_name, &self.visible_meshes())
    }

    /// Write OBJ text; with `mtllib` set, parts reference the materials of
    /// [`write_mtl`](Self::write_mtl)
    pub fn write_obj<W: Write>(&self, out: &mut W, mtllib: Option<&str>) -> io::Result<()> {
        write_obj(out, mtllib, &self.visible_meshes())
    }

    pub fn write_mtl<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_mtl(out, &self.materials())
    }

    pub fn summary(&self) -> SceneSummary {
        let count = |kind: ShapeKind| self.openings.iter().filter(|e| e.kind == kind).count();
        SceneSummary {
            walls: self.walls.len(),
            doors: count(ShapeKind::Door),
            windows: count(ShapeKind::Window),
            triangles: self.triangle_count(),
            footprint_width: self.footprint.width(),
            footprint_depth: self.footprint.depth(),
            max_wall_height: self.max_wall_height,
            ridge_height: self.roof.as_ref().map(|r| r.ridge_height),
            colors: self.materials().iter().map(|m| (m.name.to_string(), m.diffuse.to_string())).collect(),
        }
    }
}

/// Counts and dimensions of a generated scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSummary {
    pub walls: usize,
    pub doors: usize,
    pub windows: usize,
    pub triangles: usize,
    pub footprint_width: f64,
    pub footprint_depth: f64,
    pub max_wall_height: f64,
    pub ridge_height: Option<f64>,
    /// `#RRGGBB` per material name
    pub colors: BTreeMap<String, String>,
}

/// `#RRGGBB` strings for colour fields
mod hex_color {
    use floorcraft_geometry::Rgb;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Rgb, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(color)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgb, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

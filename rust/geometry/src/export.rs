// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ASCII STL, Wavefront OBJ and MTL writers
//!
//! Scenes are already Y-up, so coordinates are written as-is.

use crate::error::Error;
use crate::mesh::Mesh;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// 8-bit sRGB colour written as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to `0.0..=1.0`, as MTL expects
    pub fn to_unit(self) -> [f64; 3] {
        [self.r, self.g, self.b].map(|c| c as f64 / 255.0)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    /// Accepts `#RRGGBB` or `RRGGBB`, any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidColor(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Flat diffuse material referenced from OBJ output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material<'a> {
    pub name: &'a str,
    pub diffuse: Rgb,
}

/// A named mesh to export
#[derive(Debug, Clone, Copy)]
pub struct ExportPart<'a> {
    pub name: &'a str,
    pub mesh: &'a Mesh,
    /// Material name emitted as `usemtl` when a material library is given
    pub material: Option<&'a str>,
}

impl<'a> ExportPart<'a> {
    pub fn new(name: &'a str, mesh: &'a Mesh) -> Self {
        Self {
            name,
            mesh,
            material: None,
        }
    }

    pub fn with_material(mut self, material: &'a str) -> Self {
        self.material = Some(material);
        self
    }

    fn object_name(&self) -> String {
        if self.name.is_empty() {
            "part".to_string()
        } else {
            object_name(self.name)
        }
    }
}

fn object_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Write every part into a single ASCII STL solid.
///
/// Facet normals come from triangle winding; zero-area triangles are skipped.
pub fn write_stl<W: Write>(out: &mut W, solid_name: &str, parts: &[ExportPart<'_>]) -> io::Result<()> {
    let solid_name = object_name(solid_name);
    writeln!(out, "solid {}", solid_name)?;

    for part in parts {
        for [v0, v1, v2] in part.mesh.triangles() {
            let Some(n) = (v1 - v0).cross(&(v2 - v0)).try_normalize(1e-12) else {
                continue;
            };
            writeln!(out, "  facet normal {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
            writeln!(out, "    outer loop")?;
            for v in [v0, v1, v2] {
                writeln!(out, "      vertex {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
            }
            writeln!(out, "    endloop")?;
            writeln!(out, "  endfacet")?;
        }
    }

    writeln!(out, "endsolid {}", solid_name)
}

/// Write every part as its own OBJ object with shared global indices.
///
/// With `mtllib` set, the library is referenced up front and each part with a
/// material gets a `usemtl` line.
pub fn write_obj<W: Write>(out: &mut W, mtllib: Option<&str>, parts: &[ExportPart<'_>]) -> io::Result<()> {
    writeln!(out, "# Generated by floorcraft")?;
    writeln!(out, "# Coordinate system: Y-up (OBJ convention)")?;
    if let Some(lib) = mtllib {
        writeln!(out, "mtllib {}", lib)?;
    }
    writeln!(out)?;

    let mut vertex_offset: u32 = 0;

    for part in parts {
        writeln!(out, "o {}", part.object_name())?;
        if let (Some(_), Some(material)) = (mtllib, part.material) {
            writeln!(out, "usemtl {}", object_name(material))?;
        }

        for chunk in part.mesh.positions.chunks_exact(3) {
            writeln!(out, "v {:.6} {:.6} {:.6}", chunk[0], chunk[1], chunk[2])?;
        }
        for chunk in part.mesh.normals.chunks_exact(3) {
            writeln!(out, "vn {:.6} {:.6} {:.6}", chunk[0], chunk[1], chunk[2])?;
        }
        for tri in part.mesh.indices.chunks_exact(3) {
            let (a, b, c) = (
                tri[0] + vertex_offset + 1,
                tri[1] + vertex_offset + 1,
                tri[2] + vertex_offset + 1,
            );
            writeln!(out, "f {}//{} {}//{} {}//{}", a, a, b, b, c, c)?;
        }

        vertex_offset += part.mesh.vertex_count() as u32;
        writeln!(out)?;
    }

    Ok(())
}

/// Write a material library with one flat diffuse colour per material
pub fn write_mtl<W: Write>(out: &mut W, materials: &[Material<'_>]) -> io::Result<()> {
    writeln!(out, "# Generated by floorcraft")?;
    for material in materials {
        let [r, g, b] = material.diffuse.to_unit();
        writeln!(out)?;
        writeln!(out, "newmtl {}", object_name(material.name))?;
        writeln!(out, "Ka 0.000000 0.000000 0.000000")?;
        writeln!(out, "Kd {:.6} {:.6} {:.6}", r, g, b)?;
        writeln!(out, "d 1.000000")?;
        writeln!(out, "illum 1")?;
    }
    Ok(())
}

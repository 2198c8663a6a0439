// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 3D building generation from committed plan shapes
//!
//! The scene is rebuilt from scratch on every call in two passes: all walls
//! first, then every door and window is cut out of whichever walls its
//! volume touches. Cutting only after every wall exists lets an opening that
//! straddles a junction cut both walls.

use crate::error::{Error, Result};
use crate::types::{BuildingParams, CameraRig, Element, GeneratedScene};
use floorcraft_core::{PlanShape, Point2D, ShapeKind};
use floorcraft_geometry::{build_hip_roof, Aabb, ClippingProcessor, Footprint, OrientedBox};
use nalgebra::Point2;
use tracing::{debug, info, warn};

/// Cutters are slightly thicker than the wall so no sliver faces survive
const CUTTER_THICKNESS_FACTOR: f64 = 1.01;

/// Door cutters reach this fraction of their height below the ground plane
const DOOR_CUTTER_SINK: f64 = 0.01;

/// Generate a building from `shapes` drawn on a canvas of `canvas` (width, height) pixels.
///
/// Returns `Ok(None)` when there is nothing to build.
pub fn generate_scene(
    shapes: &[PlanShape],
    canvas: (f64, f64),
    params: &BuildingParams,
) -> Result<Option<GeneratedScene>> {
    if shapes.is_empty() {
        debug!("no shapes to convert");
        return Ok(None);
    }

    let (canvas_width, canvas_height) = canvas;
    if !(canvas_width > 0.0 && canvas_height > 0.0) {
        return Err(Error::InvalidCanvas {
            width: canvas_width,
            height: canvas_height,
        });
    }
    params.validate()?;

    let (scale_x, scale_z) = (params.world_per_pixel(canvas_width), params.world_per_pixel_z(canvas_height));
    let to_world = |p: &Point2D| Point2::new(p.x * scale_x, p.y * scale_z);

    // Pass 1: walls
    let mut walls = Vec::new();
    let mut extent: Option<Footprint> = None;

    for (index, shape) in shapes.iter().enumerate() {
        if shape.kind != ShapeKind::Wall {
            continue;
        }
        let (start, end) = (to_world(&shape.start), to_world(&shape.end));
        let solid = match OrientedBox::along_segment(start, end, 0.0, params.wall_height, params.wall_thickness) {
            Ok(solid) => solid,
            Err(e) => {
                warn!(index, error = %e, "skipping degenerate wall");
                continue;
            }
        };

        for p in [start, end] {
            expand(&mut extent, p.x, p.y);
        }

        walls.push(Element {
            kind: ShapeKind::Wall,
            name: format!("wall_{}", walls.len() + 1),
            source: index,
            start,
            end,
            mesh: solid.to_mesh(),
            color: params.wall_color,
        });
    }

    // Pass 2: openings
    let clipper = ClippingProcessor::new();
    let mut openings = Vec::new();
    let mut cuts = 0usize;

    for (index, shape) in shapes.iter().enumerate() {
        let Some((base, height)) = opening_span(shape.kind, params) else {
            continue;
        };
        let (start, end) = (to_world(&shape.start), to_world(&shape.end));
        let panel = match OrientedBox::along_segment(start, end, base, height, params.wall_thickness) {
            Ok(panel) => panel,
            Err(e) => {
                warn!(index, kind = %shape.kind, error = %e, "skipping degenerate opening");
                continue;
            }
        };

        let (cut_base, cut_height) = match shape.kind {
            ShapeKind::Door => (-height * DOOR_CUTTER_SINK, height * (1.0 + DOOR_CUTTER_SINK)),
            _ => (base, height),
        };
        let cutter = OrientedBox::along_segment(
            start,
            end,
            cut_base,
            cut_height,
            params.wall_thickness * CUTTER_THICKNESS_FACTOR,
        )?;
        let cutter_bounds = cutter.aabb();
        let cutter_mesh = cutter.to_mesh();

        for wall in &mut walls {
            let hit = Aabb::from_mesh(&wall.mesh).is_some_and(|b| b.intersects(&cutter_bounds));
            if !hit {
                continue;
            }
            match clipper.subtract_mesh(&wall.mesh, &cutter_mesh) {
                Ok(mesh) => {
                    wall.mesh = mesh;
                    cuts += 1;
                }
                Err(e) => {
                    warn!(wall = %wall.name, opening = index, error = %e, "opening subtraction failed, keeping wall");
                }
            }
        }

        let ordinal = openings.iter().filter(|o: &&Element| o.kind == shape.kind).count() + 1;
        openings.push(Element {
            kind: shape.kind,
            name: format!("{}_{}", shape.kind, ordinal),
            source: index,
            start,
            end,
            mesh: panel.to_mesh(),
            color: params.color_of(shape.kind),
        });
    }

    if walls.is_empty() && openings.is_empty() {
        debug!(shapes = shapes.len(), "no buildable shapes");
        return Ok(None);
    }

    // Rescan final wall meshes so subtraction artifacts count toward the footprint
    let mut max_wall_height: f64 = 0.0;
    for bounds in walls.iter().filter_map(Element::bounds) {
        expand(&mut extent, bounds.min.x, bounds.min.z);
        expand(&mut extent, bounds.max.x, bounds.max.z);
        max_wall_height = max_wall_height.max(bounds.max.y);
    }

    // Openings alone still need something to frame
    if extent.is_none() {
        for bounds in openings.iter().filter_map(Element::bounds) {
            expand(&mut extent, bounds.min.x, bounds.min.z);
            expand(&mut extent, bounds.max.x, bounds.max.z);
        }
    }
    let footprint = extent.unwrap_or_else(|| Footprint::new(0.0, 0.0, 0.0, 0.0));

    let roof = (!walls.is_empty()).then(|| build_hip_roof(&footprint, max_wall_height, &params.roof_params()));
    let camera = CameraRig::frame(&footprint, max_wall_height);

    info!(
        walls = walls.len(),
        openings = openings.len(),
        cuts,
        width = footprint.width(),
        depth = footprint.depth(),
        "generated building scene"
    );

    Ok(Some(GeneratedScene {
        walls,
        openings,
        roof,
        roof_visible: params.roof_visible,
        roof_color: params.roof_color,
        footprint,
        camera,
        max_wall_height,
    }))
}

/// Vertical (base, height) of an opening panel, `None` for walls
fn opening_span(kind: ShapeKind, params: &BuildingParams) -> Option<(f64, f64)> {
    match kind {
        ShapeKind::Door => Some((0.0, params.door_height)),
        ShapeKind::Window => Some((params.window_sill(), params.window_height)),
        ShapeKind::Wall => None,
    }
}

fn expand(extent: &mut Option<Footprint>, x: f64, z: f64) {
    match extent {
        Some(footprint) => footprint.expand_to(x, z),
        None => *extent = Some(Footprint::new(x, x, z, z)),
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: Convert a floor plan into a 3D building (OBJ or STL output)
//!
//! The input is either plan text (an array of
//! `[start, end, name, kind, length, angle]` tuples) or a saved drawing in
//! JSON. Defaults come from `FLOORCRAFT_*` environment variables; flags
//! override them. OBJ output gets a material library written beside it.

use anyhow::{bail, Context, Result};
use clap::Parser;
use floorcraft_building::{convert, CliConfig};
use floorcraft_geometry::Rgb;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plan-to-3d")]
#[command(about = "Convert a 2D floor plan into a 3D building", long_about = None)]
struct Cli {
    /// Plan text file or saved drawing (.json)
    input: PathBuf,

    /// Output file (format determined by extension: .obj, .stl)
    #[arg(short, long, default_value = "building.obj")]
    output: PathBuf,

    /// Wall height in millimetres
    #[arg(long)]
    wall_height: Option<f64>,

    /// Wall thickness in millimetres
    #[arg(long)]
    wall_thickness: Option<f64>,

    /// Door height in millimetres
    #[arg(long)]
    door_height: Option<f64>,

    /// Window height in millimetres
    #[arg(long)]
    window_height: Option<f64>,

    /// Canvas width in pixels the plan is laid out on
    #[arg(long)]
    canvas_width: Option<f64>,

    /// Canvas height in pixels the plan is laid out on
    #[arg(long)]
    canvas_height: Option<f64>,

    /// Wall colour as #RRGGBB
    #[arg(long, value_name = "HEX")]
    wall_color: Option<Rgb>,

    /// Door colour as #RRGGBB
    #[arg(long, value_name = "HEX")]
    door_color: Option<Rgb>,

    /// Window colour as #RRGGBB
    #[arg(long, value_name = "HEX")]
    window_color: Option<Rgb>,

    /// Roof colour as #RRGGBB
    #[arg(long, value_name = "HEX")]
    roof_color: Option<Rgb>,

    /// Start from the default colours, ignoring FLOORCRAFT_*_COLOR
    #[arg(long)]
    reset_colors: bool,

    /// Leave the roof out of the export
    #[arg(long)]
    no_roof: bool,

    /// Print a JSON summary of the generated scene
    #[arg(long)]
    summary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Obj,
    Stl,
}

impl OutputFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("obj") => Ok(OutputFormat::Obj),
            Some("stl") => Ok(OutputFormat::Stl),
            _ => bail!("unsupported output format for {}: use .obj or .stl", path.display()),
        }
    }
}

impl Cli {
    /// Environment defaults with command-line overrides applied
    fn config(&self) -> CliConfig {
        let mut config = CliConfig::from_env();
        let params = &mut config.params;
        if let Some(v) = self.wall_height {
            params.wall_height = v;
        }
        if let Some(v) = self.wall_thickness {
            params.wall_thickness = v;
        }
        if let Some(v) = self.door_height {
            params.door_height = v;
        }
        if let Some(v) = self.window_height {
            params.window_height = v;
        }
        if self.reset_colors {
            params.reset_colors();
        }
        for (flag, color) in [
            (self.wall_color, &mut params.wall_color),
            (self.door_color, &mut params.door_color),
            (self.window_color, &mut params.window_color),
            (self.roof_color, &mut params.roof_color),
        ] {
            if let Some(v) = flag {
                *color = v;
            }
        }
        if self.no_roof {
            params.roof_visible = false;
        }
        if let Some(v) = self.canvas_width {
            config.canvas_width = v;
        }
        if let Some(v) = self.canvas_height {
            config.canvas_height = v;
        }
        config
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("floorcraft=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from_path(&cli.output)?;
    let config = cli.config();

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("cannot read plan '{}'", cli.input.display()))?;

    let Some(scene) = convert(&source, &config)
        .with_context(|| format!("cannot convert '{}'", cli.input.display()))?
    else {
        tracing::warn!(input = %cli.input.display(), "plan has no shapes, nothing written");
        return Ok(());
    };

    let file = fs::File::create(&cli.output)
        .with_context(|| format!("cannot create '{}'", cli.output.display()))?;
    let mut out = BufWriter::new(file);
    match format {
        OutputFormat::Obj => {
            let mtl_path = cli.output.with_extension("mtl");
            let mtllib = mtl_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("building.mtl")
                .to_string();
            let mut mtl = BufWriter::new(
                fs::File::create(&mtl_path)
                    .with_context(|| format!("cannot create '{}'", mtl_path.display()))?,
            );
            scene.write_mtl(&mut mtl)?;
            mtl.flush()?;
            scene.write_obj(&mut out, Some(&mtllib))?
        }
        OutputFormat::Stl => {
            let name = cli
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("building");
            scene.write_stl(&mut out, name)?
        }
    }
    out.flush()?;

    tracing::info!(
        output = %cli.output.display(),
        elements = scene.element_count(),
        triangles = scene.triangle_count(),
        roof = scene.roof_visible,
        "wrote building"
    );

    if cli.summary {
        println!("{}", serde_json::to_string_pretty(&scene.summary())?);
    }

    Ok(())
}

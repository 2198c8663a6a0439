// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 3D building synthesis from 2D floor plans
//!
//! This crate turns the committed shapes of a floor plan into a building:
//! 1. Walls extruded as boxes along their plan segments
//! 2. Doors and windows subtracted from every wall they touch
//! 3. A footprint rescanned from the final wall meshes
//! 4. A hip roof over the footprint and a camera framing it
//!
//! # Usage
//!
//! ```rust,ignore
//! use floorcraft_building::{generate_scene, BuildingParams};
//!
//! let shapes = editor.snapshot();
//! if let Some(scene) = generate_scene(&shapes, (800.0, 600.0), &BuildingParams::default())? {
//!     scene.write_obj(&mut std::io::stdout(), None)?;
//! }
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod types;

// Re-export commonly used types and functions
pub use config::CliConfig;
pub use error::{Error, Result};
pub use generator::generate_scene;
pub use pipeline::{convert, load_editor, SourceFormat};
pub use types::{BuildingParams, CameraRig, Element, GeneratedScene, SceneSummary};

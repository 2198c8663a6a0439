// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for building synthesis
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a plan into a building
#[derive(Error, Debug)]
pub enum Error {
    /// The canvas the plan was drawn on has no usable extent
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },

    /// Synthesis parameters that cannot produce a solid
    #[error("Invalid building parameters: {0}")]
    InvalidParams(String),

    /// Plan text failed to parse
    #[error(transparent)]
    Core(#[from] floorcraft_core::Error),

    /// Drawing JSON failed to load
    #[error(transparent)]
    Editor(#[from] floorcraft_editor::Error),

    #[error(transparent)]
    Geometry(#[from] floorcraft_geometry::Error),

    #[error("Export failed: {0}")]
    Io(#[from] std::io::Error),
}

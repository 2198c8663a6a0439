// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorcraft Core
//!
//! Plan data model shared by the Floorcraft editor and 3D synthesis crates.
//!
//! ## Overview
//!
//! - **Types**: [`Point2D`], [`ShapeKind`], authoring-time [`Segment`]s and
//!   committed [`PlanShape`]s
//! - **Units**: angle conversion, millimetre to pixel scaling and
//!   [`bounding_box`]
//! - **Plan text**: a [nom](https://docs.rs/nom) parser for the array-of-tuples
//!   format returned by text-to-plan services
//!
//! ## Quick Start
//!
//! ```rust
//! use floorcraft_core::{parse_plan, ShapeKind};
//!
//! let segments = parse_plan(r#"[["A1", "A2", "north wall", "wall", 4000, 0]]"#).unwrap();
//! assert_eq!(segments[0].kind, ShapeKind::Wall);
//! assert_eq!(segments[0].length, 4000.0);
//! ```

pub mod error;
pub mod plan_parser;
pub mod types;
pub mod units;

pub use error::{Error, Result};
pub use plan_parser::parse_plan;
pub use types::{BoundingBox, PlanShape, Point2D, Segment, ShapeKind};
pub use units::{
    bounding_box, length_to_pixels, normalize_degrees, pixels_to_length, to_degrees, to_radians,
};

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for editor operations.
//!
//! Most editor misuse is not an error: degenerate draws, undo underflow and
//! stale keys are no-ops reported through `Option`/`bool` returns.

/// Result type alias for editor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or saving drawings.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The plan data model rejected its input.
    #[error(transparent)]
    Core(#[from] floorcraft_core::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

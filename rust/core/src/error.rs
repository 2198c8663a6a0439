// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for plan data handling.

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading plan data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The plan text could not be parsed into segment tuples.
    #[error("malformed plan text: {0}")]
    MalformedPlan(String),

    /// A shape kind name did not match wall, door or window.
    #[error("unknown shape kind: {0:?}")]
    UnknownShapeKind(String),
}

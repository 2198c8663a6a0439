use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug)]
pub enum Error {
    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Invalid solid dimensions: {0}")]
    InvalidSolid(String),

    #[error("Empty mesh: {0}")]
    EmptyMesh(String),

    #[error("Boolean operation failed: {0}")]
    BooleanError(String),

    #[error("Invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),
}

//! Error types for vfem operations.

use thiserror::Error;

/// Result type alias using vfem Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during model construction, assembly and solving.
#[derive(Error, Debug)]
pub enum Error {
    /// Element-related errors.
    #[error("element error: {0}")]
    Element(String),

    /// Mesh-related errors.
    #[error("mesh error: {0}")]
    Mesh(String),

    /// A node index that does not exist in the mesh.
    #[error("invalid node reference in {context}: node {node} out of bounds (mesh has {n_nodes} nodes)")]
    InvalidNodeReference {
        node: usize,
        n_nodes: usize,
        context: &'static str,
    },

    /// Vector or matrix sizes that do not match the model's degrees of freedom.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Inverted or collapsed element.
    #[error("degenerate geometry: element {element} has Jacobian determinant {det:e} at integration point {point}")]
    DegenerateGeometry { element: usize, point: usize, det: f64 },

    /// Assembly errors.
    #[error("assembly error: {0}")]
    Assembly(String),

    /// Solver errors.
    #[error("solver error: {0}")]
    Solver(String),

    /// Matrix singularity or conditioning issues.
    #[error("singular matrix: {0}")]
    SingularMatrix(String),
}

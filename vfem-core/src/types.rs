//! Core data types for FEA operations.
//!
//! Geometric primitives shared by the element library, the mesh and the
//! assembler.

use nalgebra::Vector3;

/// A point in 3D space. Planar problems leave `z` at zero.
pub type Point3 = Vector3<f64>;

/// A parametric point (ξ, η, ζ) in an element's reference domain.
///
/// Planar element families ignore the third coordinate.
pub type NaturalCoords = [f64; 3];

/// Number of independent strain components for a spatial dimension
/// (3 for plane problems, 6 for Voigt notation in 3D).
pub fn strain_components(dim: usize) -> usize {
    dim * (dim + 1) / 2
}

//! 4-node tetrahedron (Tet4).
//!
//! The Tet4 is the simplest 3D solid element with:
//! - 4 nodes at vertices
//! - Constant strain/stress within element
//! - Single integration point at centroid
//!
//! # Shape Functions
//!
//! Parametric coordinates (ξ, η, ζ) on the unit tetrahedron:
//! - Node 1: (0, 0, 0) -> N1 = 1 - ξ - η - ζ
//! - Node 2: (1, 0, 0) -> N2 = ξ
//! - Node 3: (0, 1, 0) -> N3 = η
//! - Node 4: (0, 0, 1) -> N4 = ζ
//!
//! # Limitations
//!
//! - Volumetric locking in nearly incompressible materials (ν → 0.5)
//! - Low accuracy - requires fine meshes
//! - Only the centroid rule is available; it integrates this element
//!   exactly but is not a general tetrahedral quadrature

use crate::element::gauss::{gauss_tet, GaussPoint};
use crate::types::NaturalCoords;

/// Number of nodes.
pub(crate) const N_NODES: usize = 4;

/// Node positions in natural coordinates.
pub(crate) const NODE_COORDS: [NaturalCoords; N_NODES] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];

/// Evaluate shape functions at (ξ, η, ζ).
pub(crate) fn shape(p: &NaturalCoords) -> [f64; N_NODES] {
    let (xi, eta, zeta) = (p[0], p[1], p[2]);
    [1.0 - xi - eta - zeta, xi, eta, zeta]
}

/// Shape function derivatives, one row per parametric axis (ξ, η, ζ).
pub(crate) fn dshape(_p: &NaturalCoords) -> [[f64; N_NODES]; 3] {
    [
        [-1.0, 1.0, 0.0, 0.0],
        [-1.0, 0.0, 1.0, 0.0],
        [-1.0, 0.0, 0.0, 1.0],
    ]
}

/// Centroid rule with weight 1/6.
pub(crate) fn quadrature() -> Vec<GaussPoint> {
    gauss_tet(1)
}

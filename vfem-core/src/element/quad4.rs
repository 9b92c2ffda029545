//! 4-node bilinear quadrilateral (Quad4).
//!
//! # Node Numbering
//!
//! ```text
//!  4---------3
//!  |         |
//!  |         |
//!  |         |
//!  1---------2
//! ```
//!
//! Corner nodes 1..4 (local indices 0..3) at (-1,-1), (1,-1), (1,1), (-1,1).
//!
//! # Shape Functions
//!
//! ```text
//! N_i = (1/4)(1 + ξ_i*ξ)(1 + η_i*η)
//! ```
//!
//! Integrated with the 2×2 Gauss rule.

use crate::element::gauss::{gauss_quad, GaussPoint};
use crate::types::NaturalCoords;

/// Number of nodes.
pub(crate) const N_NODES: usize = 4;

/// Node positions in natural coordinates.
pub(crate) const NODE_COORDS: [NaturalCoords; N_NODES] = [
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
];

/// Evaluate shape functions at (ξ, η).
pub(crate) fn shape(p: &NaturalCoords) -> [f64; N_NODES] {
    let (xi, eta) = (p[0], p[1]);
    NODE_COORDS.map(|[xi_i, eta_i, _]| 0.25 * (1.0 + xi_i * xi) * (1.0 + eta_i * eta))
}

/// Shape function derivatives: row 0 is ∂N/∂ξ, row 1 is ∂N/∂η.
pub(crate) fn dshape(p: &NaturalCoords) -> [[f64; N_NODES]; 2] {
    let (xi, eta) = (p[0], p[1]);
    [
        NODE_COORDS.map(|[xi_i, eta_i, _]| 0.25 * xi_i * (1.0 + eta_i * eta)),
        NODE_COORDS.map(|[xi_i, eta_i, _]| 0.25 * eta_i * (1.0 + xi_i * xi)),
    ]
}

/// 2×2 Gauss rule at ±1/√3, unit weights.
pub(crate) fn quadrature() -> Vec<GaussPoint> {
    gauss_quad(2)
}

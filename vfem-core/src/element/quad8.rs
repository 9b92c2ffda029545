//! 8-node serendipity quadrilateral (Quad8).
//!
//! The Quad8 element is a higher-order 2D element with serendipity shape functions:
//! - 8 nodes: 4 corner nodes + 4 mid-edge nodes
//! - Quadratic displacement along edges
//! - 3×3 Gauss quadrature for integration (9 points)
//!
//! # Node Numbering
//!
//! ```text
//!  4----7----3
//!  |         |
//!  8         6
//!  |         |
//!  1----5----2
//! ```
//!
//! - Corner nodes: 1, 2, 3, 4 (local indices 0, 1, 2, 3)
//! - Mid-edge nodes: 5 (edge 1-2), 6 (edge 2-3), 7 (edge 3-4), 8 (edge 4-1) (local indices 4, 5, 6, 7)
//!
//! # Shape Functions (Serendipity)
//!
//! Corner nodes (i = 1..4):
//! ```text
//! N_i = (1/4)(1 + ξ_i*ξ)(1 + η_i*η)(ξ_i*ξ + η_i*η - 1)
//! ```
//!
//! Mid-side nodes on ξ = 0 (nodes 5, 7):
//! ```text
//! N_i = (1/2)(1 - ξ²)(1 + η_i*η)
//! ```
//!
//! Mid-side nodes on η = 0 (nodes 6, 8):
//! ```text
//! N_i = (1/2)(1 + ξ_i*ξ)(1 - η²)
//! ```

use crate::element::gauss::{gauss_quad, GaussPoint};
use crate::types::NaturalCoords;

/// Number of nodes.
pub(crate) const N_NODES: usize = 8;

/// Node positions in natural coordinates.
pub(crate) const NODE_COORDS: [NaturalCoords; N_NODES] = [
    [-1.0, -1.0, 0.0], // Node 1 (corner)
    [1.0, -1.0, 0.0],  // Node 2 (corner)
    [1.0, 1.0, 0.0],   // Node 3 (corner)
    [-1.0, 1.0, 0.0],  // Node 4 (corner)
    [0.0, -1.0, 0.0],  // Node 5 (mid-edge 1-2)
    [1.0, 0.0, 0.0],   // Node 6 (mid-edge 2-3)
    [0.0, 1.0, 0.0],   // Node 7 (mid-edge 3-4)
    [-1.0, 0.0, 0.0],  // Node 8 (mid-edge 4-1)
];

/// Evaluate shape functions at (ξ, η).
pub(crate) fn shape(p: &NaturalCoords) -> [f64; N_NODES] {
    let (xi, eta) = (p[0], p[1]);
    let xi2 = xi * xi;
    let eta2 = eta * eta;

    [
        0.25 * (1.0 - xi) * (1.0 - eta) * (-xi - eta - 1.0),
        0.25 * (1.0 + xi) * (1.0 - eta) * (xi - eta - 1.0),
        0.25 * (1.0 + xi) * (1.0 + eta) * (xi + eta - 1.0),
        0.25 * (1.0 - xi) * (1.0 + eta) * (-xi + eta - 1.0),
        0.5 * (1.0 - xi2) * (1.0 - eta),
        0.5 * (1.0 + xi) * (1.0 - eta2),
        0.5 * (1.0 - xi2) * (1.0 + eta),
        0.5 * (1.0 - xi) * (1.0 - eta2),
    ]
}

/// Shape function derivatives: row 0 is ∂N/∂ξ, row 1 is ∂N/∂η.
pub(crate) fn dshape(p: &NaturalCoords) -> [[f64; N_NODES]; 2] {
    let (xi, eta) = (p[0], p[1]);

    [
        [
            0.25 * (1.0 - eta) * (2.0 * xi + eta),
            0.25 * (1.0 - eta) * (2.0 * xi - eta),
            0.25 * (1.0 + eta) * (2.0 * xi + eta),
            0.25 * (1.0 + eta) * (2.0 * xi - eta),
            -xi * (1.0 - eta),
            0.5 * (1.0 - eta * eta),
            -xi * (1.0 + eta),
            -0.5 * (1.0 - eta * eta),
        ],
        [
            0.25 * (1.0 - xi) * (xi + 2.0 * eta),
            0.25 * (1.0 + xi) * (-xi + 2.0 * eta),
            0.25 * (1.0 + xi) * (xi + 2.0 * eta),
            0.25 * (1.0 - xi) * (-xi + 2.0 * eta),
            -0.5 * (1.0 - xi * xi),
            -(1.0 + xi) * eta,
            0.5 * (1.0 - xi * xi),
            -(1.0 - xi) * eta,
        ],
    ]
}

/// 3×3 Gauss rule, weights are products of {5/9, 8/9, 5/9}.
pub(crate) fn quadrature() -> Vec<GaussPoint> {
    gauss_quad(3)
}

//! 6-node quadratic triangle (Tri6).
//!
//! The Tri6 element is a higher-order 2D element with quadratic shape functions:
//! - 6 nodes: 3 corner nodes + 3 mid-edge nodes
//! - Linear strain variation within element
//! - 3-point interior Gauss rule
//!
//! # Node Numbering
//!
//! ```text
//!  η
//!  3
//!  |\
//!  6 5
//!  |  \
//!  1-4-2  ξ
//! ```
//!
//! - Corner nodes: 1, 2, 3 (local indices 0, 1, 2) at (0,0), (1,0), (0,1)
//! - Mid-edge nodes: 4 (edge 1-2), 5 (edge 2-3), 6 (edge 3-1) (local indices 3, 4, 5)
//!
//! # Shape Functions
//!
//! With area coordinates L1 = 1 - ξ - η, L2 = ξ, L3 = η:
//!
//! ```text
//! N1 = L1 * (2*L1 - 1)   (corner 1)
//! N2 = L2 * (2*L2 - 1)   (corner 2)
//! N3 = L3 * (2*L3 - 1)   (corner 3)
//! N4 = 4 * L1 * L2       (mid-edge 1-2)
//! N5 = 4 * L2 * L3       (mid-edge 2-3)
//! N6 = 4 * L3 * L1       (mid-edge 3-1)
//! ```

use crate::element::gauss::{gauss_tri, GaussPoint};
use crate::types::NaturalCoords;

/// Number of nodes.
pub(crate) const N_NODES: usize = 6;

/// Node positions in natural coordinates.
pub(crate) const NODE_COORDS: [NaturalCoords; N_NODES] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.5, 0.0, 0.0],
    [0.5, 0.5, 0.0],
    [0.0, 0.5, 0.0],
];

/// Evaluate shape functions at (ξ, η).
pub(crate) fn shape(p: &NaturalCoords) -> [f64; N_NODES] {
    let l1 = 1.0 - p[0] - p[1];
    let l2 = p[0];
    let l3 = p[1];

    [
        l1 * (2.0 * l1 - 1.0),
        l2 * (2.0 * l2 - 1.0),
        l3 * (2.0 * l3 - 1.0),
        4.0 * l1 * l2,
        4.0 * l2 * l3,
        4.0 * l3 * l1,
    ]
}

/// Shape function derivatives: row 0 is ∂N/∂ξ, row 1 is ∂N/∂η.
///
/// Obtained from the area-coordinate derivatives through
/// ∂/∂ξ = ∂/∂L2 - ∂/∂L1 and ∂/∂η = ∂/∂L3 - ∂/∂L1.
pub(crate) fn dshape(p: &NaturalCoords) -> [[f64; N_NODES]; 2] {
    let l1 = 1.0 - p[0] - p[1];
    let l2 = p[0];
    let l3 = p[1];

    [
        [
            1.0 - 4.0 * l1,
            4.0 * l2 - 1.0,
            0.0,
            4.0 * (l1 - l2),
            4.0 * l3,
            -4.0 * l3,
        ],
        [
            1.0 - 4.0 * l1,
            0.0,
            4.0 * l3 - 1.0,
            -4.0 * l2,
            4.0 * l2,
            4.0 * (l1 - l3),
        ],
    ]
}

/// Three-point interior rule, exact for the quadratic integrand of a
/// straight-sided element.
pub(crate) fn quadrature() -> Vec<GaussPoint> {
    gauss_tri(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tri6_shape_functions_at_nodes() {
        // Shape function N_i should be 1 at node i and 0 at other nodes
        for (i, node) in NODE_COORDS.iter().enumerate() {
            let n = shape(node);
            for (j, value) in n.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(*value, expected, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_tri6_derivatives_sum_to_zero() {
        let d = dshape(&[0.2, 0.3, 0.0]);
        for row in d {
            let sum: f64 = row.iter().sum();
            assert_relative_eq!(sum, 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_tri6_quadrature() {
        let rule = quadrature();
        assert_eq!(rule.len(), 3);
        assert_relative_eq!(rule[1].xi(), 2.0 / 3.0);
        assert_relative_eq!(rule[1].eta(), 1.0 / 6.0);
    }
}

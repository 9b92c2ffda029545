//! 3-node linear triangle (Tri3).
//!
//! The Tri3 is the constant strain triangle:
//! - 3 corner nodes
//! - Linear shape functions, constant derivatives
//! - Single integration point at the centroid
//!
//! # Node Numbering
//!
//! ```text
//!  η
//!  3
//!  |\
//!  | \
//!  |  \
//!  1---2  ξ
//! ```
//!
//! Nodes 1, 2, 3 (local indices 0, 1, 2) sit at (0,0), (1,0), (0,1).
//!
//! # Shape Functions
//!
//! ```text
//! N1 = 1 - ξ - η
//! N2 = ξ
//! N3 = η
//! ```

use crate::element::gauss::{gauss_tri, GaussPoint};
use crate::types::NaturalCoords;

/// Number of nodes.
pub(crate) const N_NODES: usize = 3;

/// Node positions in natural coordinates.
pub(crate) const NODE_COORDS: [NaturalCoords; N_NODES] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
];

/// Evaluate shape functions at (ξ, η).
pub(crate) fn shape(p: &NaturalCoords) -> [f64; N_NODES] {
    let (xi, eta) = (p[0], p[1]);
    [1.0 - xi - eta, xi, eta]
}

/// Shape function derivatives: row 0 is ∂N/∂ξ, row 1 is ∂N/∂η.
pub(crate) fn dshape(_p: &NaturalCoords) -> [[f64; N_NODES]; 2] {
    [[-1.0, 1.0, 0.0], [-1.0, 0.0, 1.0]]
}

/// One-point centroid rule.
pub(crate) fn quadrature() -> Vec<GaussPoint> {
    gauss_tri(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tri3_shape_functions_at_nodes() {
        for (i, node) in NODE_COORDS.iter().enumerate() {
            let n = shape(node);
            for (j, value) in n.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(*value, expected, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_tri3_centroid_values() {
        let n = shape(&[1.0 / 3.0, 1.0 / 3.0, 0.0]);
        for value in n {
            assert_relative_eq!(value, 1.0 / 3.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_tri3_quadrature() {
        let rule = quadrature();
        assert_eq!(rule.len(), 1);
        assert_relative_eq!(rule[0].weight, 0.5);
    }
}

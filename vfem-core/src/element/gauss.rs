//! Gauss quadrature rules for numerical integration.
//!
//! This module provides the quadrature rules used by the element library:
//! - 1D Gauss-Legendre rules on [-1, 1]
//! - Tensor-product rules on the reference square [-1, 1]²
//! - Interior rules on the reference triangle (0,0), (1,0), (0,1)
//! - The centroid rule on the reference tetrahedron
//!
//! Every rule stores true quadrature weights: they sum to the measure of the
//! reference domain (2, 4, 1/2 and 1/6 respectively).
//!
//! # Usage
//!
//! ```
//! use vfem_core::element::gauss::{gauss_quad, gauss_tri};
//!
//! // 2x2 rule on the reference square
//! let area: f64 = gauss_quad(2).iter().map(|gp| gp.weight).sum();
//! assert!((area - 4.0).abs() < 1e-14);
//!
//! // 3-point rule on the reference triangle
//! for gp in gauss_tri(3) {
//!     assert!(gp.xi() + gp.eta() <= 1.0);
//! }
//! ```

use crate::types::NaturalCoords;

/// A Gauss quadrature point with natural coordinates and weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussPoint {
    /// Natural coordinates [ξ, η, ζ]. Unused trailing coordinates are zero.
    pub coords: NaturalCoords,
    /// Integration weight.
    pub weight: f64,
}

impl GaussPoint {
    /// Create a new Gauss point.
    pub fn new(coords: NaturalCoords, weight: f64) -> Self {
        Self { coords, weight }
    }

    /// Get ξ (first natural coordinate).
    #[inline]
    pub fn xi(&self) -> f64 {
        self.coords[0]
    }

    /// Get η (second natural coordinate).
    #[inline]
    pub fn eta(&self) -> f64 {
        self.coords[1]
    }

    /// Get ζ (third natural coordinate).
    #[inline]
    pub fn zeta(&self) -> f64 {
        self.coords[2]
    }
}

/// 1D Gauss-Legendre quadrature points and weights.
///
/// Returns (point, weight) pairs for integration on [-1, 1].
///
/// # Panics
///
/// Panics if `n` is not in 1..=3.
pub fn gauss_1d(n: usize) -> Vec<(f64, f64)> {
    match n {
        1 => vec![(0.0, 2.0)],
        2 => {
            let p = 1.0 / 3.0_f64.sqrt();
            vec![(-p, 1.0), (p, 1.0)]
        }
        3 => {
            let p = (3.0 / 5.0_f64).sqrt();
            vec![(-p, 5.0 / 9.0), (0.0, 8.0 / 9.0), (p, 5.0 / 9.0)]
        }
        _ => panic!("gauss_1d: n must be 1, 2, or 3, got {}", n),
    }
}

/// Quadrilateral Gauss quadrature points for 2D elements.
///
/// Tensor product of 1D Gauss-Legendre rules on ξ, η ∈ [-1, 1], ordered
/// row-major with ξ as the outer loop. Returns n² points.
///
/// # Panics
///
/// Panics if `n` is not 1, 2, or 3.
pub fn gauss_quad(n: usize) -> Vec<GaussPoint> {
    if !(1..=3).contains(&n) {
        panic!("gauss_quad: n must be 1, 2, or 3, got {}", n);
    }

    let rule_1d = gauss_1d(n);
    let mut points = Vec::with_capacity(n * n);

    for &(xi, w_xi) in &rule_1d {
        for &(eta, w_eta) in &rule_1d {
            points.push(GaussPoint::new([xi, eta, 0.0], w_xi * w_eta));
        }
    }

    points
}

/// Triangle Gauss quadrature points for 2D elements.
///
/// Points are parametric (ξ, η) on the unit triangle with vertices
/// (0,0), (1,0), (0,1). Weights sum to 1/2, the triangle's area.
///
/// # Integration Order
///
/// - n=1: centroid, exact for degree 1
/// - n=3: interior points (1/6,1/6), (2/3,1/6), (1/6,2/3), exact for degree 2
///
/// # Panics
///
/// Panics if `n` is not 1 or 3.
pub fn gauss_tri(n: usize) -> Vec<GaussPoint> {
    match n {
        1 => vec![GaussPoint::new([1.0 / 3.0, 1.0 / 3.0, 0.0], 0.5)],
        3 => {
            let w = 1.0 / 6.0;
            vec![
                GaussPoint::new([1.0 / 6.0, 1.0 / 6.0, 0.0], w),
                GaussPoint::new([2.0 / 3.0, 1.0 / 6.0, 0.0], w),
                GaussPoint::new([1.0 / 6.0, 2.0 / 3.0, 0.0], w),
            ]
        }
        _ => panic!("gauss_tri: n must be 1 or 3, got {}", n),
    }
}

/// Tetrahedral Gauss quadrature points.
///
/// Points are parametric (ξ, η, ζ) on the unit tetrahedron with vertices
/// (0,0,0), (1,0,0), (0,1,0), (0,0,1). Weights sum to 1/6, its volume.
///
/// Only the centroid rule is provided. It is exact for the constant
/// strain field of the linear tetrahedron.
///
/// # Panics
///
/// Panics if `n` is not 1.
pub fn gauss_tet(n: usize) -> Vec<GaussPoint> {
    match n {
        1 => vec![GaussPoint::new([0.25, 0.25, 0.25], 1.0 / 6.0)],
        _ => panic!("gauss_tet: n must be 1, got {}", n),
    }
}

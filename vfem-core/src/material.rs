//! Material property definitions.
//!
//! Isotropic linear elastic materials. The constitutive (D) matrix relates
//! strains to stresses in Voigt notation: 3×3 under plane stress for planar
//! problems, 6×6 for 3D solids.

use crate::error::{Error, Result};
use nalgebra::{DMatrix, Matrix3, Matrix6};

/// Isotropic linear elastic material.
///
/// Construction does not validate the constants. A Poisson's ratio of ±1
/// (or ½ in 3D) yields infinite entries in the D matrix, which then surface
/// as a solver failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Young's modulus E.
    pub youngs_modulus: f64,
    /// Poisson's ratio ν (dimensionless).
    pub poissons_ratio: f64,
}

impl Material {
    /// Create a new isotropic linear elastic material.
    ///
    /// # Arguments
    ///
    /// * `youngs_modulus` - Young's modulus E
    /// * `poissons_ratio` - Poisson's ratio ν
    pub fn new(youngs_modulus: f64, poissons_ratio: f64) -> Self {
        Self {
            youngs_modulus,
            poissons_ratio,
        }
    }

    /// Shear modulus G = E / (2(1 + ν)).
    pub fn shear_modulus(&self) -> f64 {
        self.youngs_modulus / (2.0 * (1.0 + self.poissons_ratio))
    }

    /// Lamé's first parameter λ = Eν / ((1+ν)(1-2ν)).
    pub fn lame_lambda(&self) -> f64 {
        let e = self.youngs_modulus;
        let nu = self.poissons_ratio;
        e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu))
    }

    /// Lamé's second parameter μ = G (shear modulus).
    pub fn lame_mu(&self) -> f64 {
        self.shear_modulus()
    }

    /// 3D constitutive matrix for isotropic linear elasticity.
    ///
    /// Returns the 6x6 matrix D such that σ = D * ε with strain ordering
    /// [ε_xx, ε_yy, ε_zz, γ_xy, γ_yz, γ_xz].
    pub fn constitutive_3d(&self) -> Matrix6<f64> {
        let lambda = self.lame_lambda();
        let mu = self.lame_mu();
        let c11 = lambda + 2.0 * mu;

        #[rustfmt::skip]
        let d = Matrix6::new(
            c11,    lambda, lambda, 0.0, 0.0, 0.0,
            lambda, c11,    lambda, 0.0, 0.0, 0.0,
            lambda, lambda, c11,    0.0, 0.0, 0.0,
            0.0,    0.0,    0.0,    mu,  0.0, 0.0,
            0.0,    0.0,    0.0,    0.0, mu,  0.0,
            0.0,    0.0,    0.0,    0.0, 0.0, mu,
        );
        d
    }

    /// Plane stress constitutive matrix (for 2D elements).
    ///
    /// Returns a 3x3 matrix for [σ_xx, σ_yy, τ_xy] = D * [ε_xx, ε_yy, γ_xy].
    pub fn constitutive_plane_stress(&self) -> Matrix3<f64> {
        let e = self.youngs_modulus;
        let nu = self.poissons_ratio;

        let factor = e / (1.0 - nu * nu);

        #[rustfmt::skip]
        let d = Matrix3::new(
            factor,      factor * nu, 0.0,
            factor * nu, factor,      0.0,
            0.0,         0.0,         factor * (1.0 - nu) / 2.0,
        );
        d
    }

    /// Plane strain constitutive matrix (ε_zz = 0), used by membranes
    /// lifted into 3D.
    ///
    /// Returns a 3x3 matrix for [σ_11, σ_22, τ_12] = D * [ε_11, ε_22, γ_12].
    pub fn constitutive_plane_strain(&self) -> Matrix3<f64> {
        let lambda = self.lame_lambda();
        let mu = self.lame_mu();
        let c11 = lambda + 2.0 * mu;

        #[rustfmt::skip]
        let d = Matrix3::new(
            c11,    lambda, 0.0,
            lambda, c11,    0.0,
            0.0,    0.0,    mu,
        );
        d
    }

    /// Constitutive matrix for a spatial dimension: plane stress for 2,
    /// full 3D elasticity for 3.
    pub fn stiffness_matrix(&self, dim: usize) -> Result<DMatrix<f64>> {
        match dim {
            2 => Ok(DMatrix::from_iterator(
                3,
                3,
                self.constitutive_plane_stress().iter().copied(),
            )),
            3 => Ok(DMatrix::from_iterator(
                6,
                6,
                self.constitutive_3d().iter().copied(),
            )),
            _ => Err(Error::DimensionMismatch(format!(
                "no constitutive matrix for dimension {}",
                dim
            ))),
        }
    }
}

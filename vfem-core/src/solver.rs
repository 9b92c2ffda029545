//! Linear system solvers.
//!
//! Provides direct solvers for the assembled system Ku = f and the
//! [`Solver`] driver that takes a [`Model`] through assembly, constraint
//! elimination, solution and displacement accounting.
//!
//! # Solver Backends
//!
//! - [`FaerCholeskySolver`]: Sparse Cholesky factorization using the faer library.
//!   Best for symmetric positive definite (SPD) matrices, which stiffness matrices
//!   are after constraint application.
//! - [`DenseLuSolver`]: nalgebra dense LU, for small problems and cross-checking.

use crate::error::{Error, Result};
use crate::model::{Configuration, Model};
use crate::sparse::{mul_vec, norm, CsrMatrix};
use faer::linalg::cholesky::llt::factor::LltError;
use faer::prelude::*;
use faer::sparse::linalg::solvers::{Llt, SymbolicLlt};
use faer::sparse::linalg::LltError as SparseLltError;
use faer::sparse::{SparseColMat, Triplet};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

/// Linear solver interface.
pub trait LinearSolver: Send + Sync {
    /// Solve the linear system Ax = b.
    ///
    /// # Arguments
    ///
    /// * `matrix` - System matrix (K)
    /// * `rhs` - Right-hand side vector (f)
    ///
    /// # Returns
    ///
    /// Solution vector (u)
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>>;

    /// Solver name for diagnostics.
    fn name(&self) -> &str;
}

fn check_system(matrix: &CsrMatrix, rhs: &[f64]) -> Result<()> {
    if matrix.nrows() != matrix.ncols() {
        return Err(Error::Solver(format!(
            "matrix must be square, got {}x{}",
            matrix.nrows(),
            matrix.ncols()
        )));
    }
    if matrix.nrows() != rhs.len() {
        return Err(Error::DimensionMismatch(format!(
            "RHS has {} entries, matrix has {} rows",
            rhs.len(),
            matrix.nrows()
        )));
    }
    Ok(())
}

/// Dense LU solver using nalgebra.
///
/// Converts the matrix to dense storage, so only suitable for small problems.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenseLuSolver;

impl DenseLuSolver {
    pub fn new() -> Self {
        Self
    }
}

impl LinearSolver for DenseLuSolver {
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>> {
        check_system(matrix, rhs)?;
        if rhs.is_empty() {
            return Ok(vec![]);
        }

        let dense = DMatrix::from(matrix);
        let b = DVector::from_column_slice(rhs);

        let solution = dense
            .lu()
            .solve(&b)
            .ok_or_else(|| Error::SingularMatrix("LU factorization failed".into()))?;

        Ok(solution.as_slice().to_vec())
    }

    fn name(&self) -> &str {
        "nalgebra dense LU"
    }
}

/// Convert an nalgebra-sparse CSR matrix to faer's CSC format.
///
/// Built from faer `Triplet`s, which faer sorts into columns.
fn csr_to_faer_csc(csr: &CsrMatrix) -> Result<SparseColMat<usize, f64>> {
    let triplets: Vec<Triplet<usize, usize, f64>> = csr
        .triplet_iter()
        .map(|(row, col, &val)| Triplet { row, col, val })
        .collect();

    SparseColMat::try_new_from_triplets(csr.nrows(), csr.ncols(), &triplets)
        .map_err(|e| Error::Solver(format!("failed to build faer CSC matrix: {:?}", e)))
}

/// Sparse Cholesky solver using the faer library.
///
/// Uses faer's sparse LLᵀ (Cholesky) factorization, which is efficient for
/// the symmetric positive definite matrices that arise from constrained
/// stiffness matrices. Only the lower triangle is read.
#[derive(Debug, Default, Clone, Copy)]
pub struct FaerCholeskySolver;

impl FaerCholeskySolver {
    /// Create a new sparse Cholesky solver.
    pub fn new() -> Self {
        Self
    }
}

impl LinearSolver for FaerCholeskySolver {
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>> {
        check_system(matrix, rhs)?;
        let n = rhs.len();
        if n == 0 {
            return Ok(vec![]);
        }

        let csc = csr_to_faer_csc(matrix)?;
        let csc_ref = csc.as_ref();

        // Symbolic analysis (ordering, fill-in prediction)
        let symbolic = SymbolicLlt::try_new(csc_ref.symbolic(), faer::Side::Lower)
            .map_err(|e| Error::Solver(format!("symbolic Cholesky analysis failed: {:?}", e)))?;

        // Numeric factorization
        let llt = Llt::try_new_with_symbolic(symbolic, csc_ref, faer::Side::Lower).map_err(
            |e| match e {
                SparseLltError::Generic(err) => {
                    Error::Solver(format!("sparse Cholesky error: {:?}", err))
                }
                SparseLltError::Numeric(LltError::NonPositivePivot { index }) => {
                    Error::SingularMatrix(format!(
                        "matrix is not positive definite at pivot {}",
                        index
                    ))
                }
            },
        )?;

        let mut x = faer::Mat::from_fn(n, 1, |i, _| rhs[i]);
        llt.solve_in_place(x.as_mut());

        Ok((0..n).map(|i| x[(i, 0)]).collect())
    }

    fn name(&self) -> &str {
        "faer sparse Cholesky (LLᵀ)"
    }
}

/// Linear solver backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolverType {
    /// Sparse Cholesky via faer.
    #[default]
    Cholesky,
    /// Dense LU via nalgebra.
    DenseLu,
}

/// Instantiate the backend for a solver type.
pub fn select_solver(solver_type: SolverType) -> Box<dyn LinearSolver> {
    match solver_type {
        SolverType::Cholesky => Box::new(FaerCholeskySolver::new()),
        SolverType::DenseLu => Box::new(DenseLuSolver::new()),
    }
}

/// Solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Backend used for the linear solve.
    pub solver_type: SolverType,
    /// Maximum relative residual `‖Ku - f‖ / max(‖f‖, 1)`.
    /// `None` skips the check.
    pub residual_tolerance: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            solver_type: SolverType::Cholesky,
            residual_tolerance: Some(1e-8),
        }
    }
}

impl SolverConfig {
    /// Dense LU with the default tolerance, for cross-checking small models.
    pub fn dense() -> Self {
        Self {
            solver_type: SolverType::DenseLu,
            ..Default::default()
        }
    }

    /// Sparse Cholesky without the residual check.
    pub fn unchecked() -> Self {
        Self {
            residual_tolerance: None,
            ..Default::default()
        }
    }
}

/// Solution statistics.
#[derive(Debug, Clone)]
pub struct SolveStats {
    /// Solver name used.
    pub solver: String,
    /// Number of DOFs in the system.
    pub n_dofs: usize,
    /// Stored non-zeros of the constrained stiffness matrix.
    pub nnz: usize,
    /// Relative residual `‖Ku - f‖ / max(‖f‖, 1)`.
    pub residual: f64,
    /// Wall-clock time in seconds.
    pub time_seconds: f64,
}

/// Result of a model solve.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Nodal displacements ordered by node then axis.
    pub displacements: Vec<f64>,
    pub stats: SolveStats,
}

impl Solution {
    /// Displacement components of one node.
    pub fn node_displacement(&self, node: usize, dim: usize) -> Option<&[f64]> {
        self.displacements.get(node * dim..(node + 1) * dim)
    }
}

/// Drives a [`Model`] from assembly to deformed geometry.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Assemble, constrain and solve the model, then move its nodes by the
    /// computed displacements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SingularMatrix`] for an under-constrained system or a
    /// non-finite solution and [`Error::Solver`] when the residual exceeds
    /// the configured tolerance. The model is left unchanged on error.
    pub fn solve(&self, model: &mut Model) -> Result<Solution> {
        if model.configuration() == Configuration::Deformed {
            warn!("solving a model that has already been deformed; stiffness uses current coordinates");
        }

        let start = Instant::now();
        let backend = select_solver(self.config.solver_type);

        let mut stiffness = model.build_global_stiffness()?;
        model.apply_constraints(&mut stiffness)?;
        let loads = model.constrained_loads();

        check_diagonal(&stiffness)?;

        let displacements = backend.solve(&stiffness, &loads)?;

        if let Some(dof) = displacements.iter().position(|u| !u.is_finite()) {
            return Err(Error::SingularMatrix(format!(
                "non-finite displacement at DOF {}",
                dof
            )));
        }

        let residual_vec: Vec<f64> = mul_vec(&stiffness, &displacements)
            .iter()
            .zip(&loads)
            .map(|(ku, f)| ku - f)
            .collect();
        let residual = norm(&residual_vec) / norm(&loads).max(1.0);

        if let Some(tolerance) = self.config.residual_tolerance {
            if residual > tolerance {
                return Err(Error::Solver(format!(
                    "relative residual {:e} exceeds tolerance {:e}",
                    residual, tolerance
                )));
            }
        }

        model.account_displacements(&displacements)?;

        let stats = SolveStats {
            solver: backend.name().to_string(),
            n_dofs: model.n_dofs(),
            nnz: stiffness.nnz(),
            residual,
            time_seconds: start.elapsed().as_secs_f64(),
        };

        info!(
            solver = %stats.solver,
            dofs = stats.n_dofs,
            nnz = stats.nnz,
            residual = stats.residual,
            seconds = stats.time_seconds,
            "solved model"
        );

        Ok(Solution {
            displacements,
            stats,
        })
    }
}

/// A DOF with no stiffness after constraint elimination cannot be solved for.
fn check_diagonal(matrix: &CsrMatrix) -> Result<()> {
    for (i, row) in matrix.row_iter().enumerate() {
        let diagonal = row
            .col_indices()
            .iter()
            .position(|&c| c == i)
            .map_or(0.0, |k| row.values()[k]);
        if !(diagonal > 0.0) {
            return Err(Error::SingularMatrix(format!(
                "DOF {} has no stiffness (diagonal {}); add a constraint",
                i, diagonal
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::TripletMatrix;
    use approx::assert_relative_eq;

    fn spd_3x3() -> CsrMatrix {
        // [4 1 0; 1 3 1; 0 1 2]
        let mut triplet = TripletMatrix::new(3, 3);
        for (r, c, v) in [
            (0, 0, 4.0),
            (0, 1, 1.0),
            (1, 0, 1.0),
            (1, 1, 3.0),
            (1, 2, 1.0),
            (2, 1, 1.0),
            (2, 2, 2.0),
        ] {
            triplet.add(r, c, v);
        }
        triplet.to_csr().unwrap()
    }

    #[test]
    fn test_dense_lu_simple() {
        // Simple 2x2 system: [2 1; 1 3] * [x; y] = [1; 2]
        // Solution: x = 1/5, y = 3/5
        let mut triplet = TripletMatrix::new(2, 2);
        triplet.add(0, 0, 2.0);
        triplet.add(0, 1, 1.0);
        triplet.add(1, 0, 1.0);
        triplet.add(1, 1, 3.0);

        let matrix = triplet.to_csr().unwrap();
        let solution = DenseLuSolver::new().solve(&matrix, &[1.0, 2.0]).unwrap();

        assert_relative_eq!(solution[0], 0.2, epsilon = 1e-10);
        assert_relative_eq!(solution[1], 0.6, epsilon = 1e-10);
    }

    #[test]
    fn test_backends_agree() {
        let matrix = spd_3x3();
        let rhs = [1.0, -2.0, 0.5];

        let lu = DenseLuSolver::new().solve(&matrix, &rhs).unwrap();
        let llt = FaerCholeskySolver::new().solve(&matrix, &rhs).unwrap();

        for (a, b) in lu.iter().zip(&llt) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }

        let ku = mul_vec(&matrix, &llt);
        for (a, b) in ku.iter().zip(&rhs) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_empty_system() {
        let matrix = TripletMatrix::new(0, 0).to_csr().unwrap();
        assert!(FaerCholeskySolver::new().solve(&matrix, &[]).unwrap().is_empty());
        assert!(DenseLuSolver::new().solve(&matrix, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_rhs_size_mismatch() {
        let matrix = spd_3x3();
        assert!(matches!(
            FaerCholeskySolver::new().solve(&matrix, &[1.0]),
            Err(Error::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_indefinite_matrix_is_singular() {
        // [1 2; 2 1] has eigenvalues 3 and -1
        let mut triplet = TripletMatrix::new(2, 2);
        triplet.add(0, 0, 1.0);
        triplet.add(0, 1, 2.0);
        triplet.add(1, 0, 2.0);
        triplet.add(1, 1, 1.0);
        let matrix = triplet.to_csr().unwrap();

        assert!(matches!(
            FaerCholeskySolver::new().solve(&matrix, &[1.0, 1.0]),
            Err(Error::SingularMatrix(_))
        ));
    }

    #[test]
    fn test_zero_pivot_lu() {
        let mut triplet = TripletMatrix::new(2, 2);
        triplet.add(0, 0, 1.0);
        triplet.add(1, 1, 0.0);
        let matrix = triplet.to_csr().unwrap();

        assert!(matches!(
            DenseLuSolver::new().solve(&matrix, &[1.0, 1.0]),
            Err(Error::SingularMatrix(_))
        ));
        assert!(matches!(check_diagonal(&matrix), Err(Error::SingularMatrix(_))));
    }

    #[test]
    fn test_select_solver() {
        assert_eq!(
            select_solver(SolverType::Cholesky).name(),
            FaerCholeskySolver::new().name()
        );
        assert_eq!(
            select_solver(SolverType::DenseLu).name(),
            DenseLuSolver::new().name()
        );
    }

    #[test]
    fn test_config_presets() {
        let config = SolverConfig::default();
        assert_eq!(config.solver_type, SolverType::Cholesky);
        assert_eq!(config.residual_tolerance, Some(1e-8));

        assert_eq!(SolverConfig::dense().solver_type, SolverType::DenseLu);
        assert_eq!(SolverConfig::unchecked().residual_tolerance, None);
    }
}

//! Sparse matrix operations.
//!
//! Global matrices are accumulated as triplets (COO format) and finalized
//! into CSR (Compressed Sparse Row), which is what constraint elimination and
//! the solvers consume.

use crate::error::{Error, Result};
use nalgebra::DMatrix;
use nalgebra_sparse::coo::CooMatrix;
use nalgebra_sparse::csr::CsrMatrix as NalgebraCsr;

/// Compressed Sparse Row matrix.
pub type CsrMatrix = NalgebraCsr<f64>;

/// Builder for assembling a sparse matrix from triplets (COO format).
///
/// Accumulates (row, col, value) triplets and converts to CSR when complete.
/// Every triplet is kept, including explicit zeros, so the sparsity pattern
/// depends only on the connectivity.
#[derive(Debug, Clone)]
pub struct TripletMatrix {
    n_rows: usize,
    n_cols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl TripletMatrix {
    /// Create a new triplet matrix builder.
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self::with_capacity(n_rows, n_cols, 0)
    }

    /// Create with estimated capacity.
    pub fn with_capacity(n_rows: usize, n_cols: usize, nnz_estimate: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            rows: Vec::with_capacity(nnz_estimate),
            cols: Vec::with_capacity(nnz_estimate),
            values: Vec::with_capacity(nnz_estimate),
        }
    }

    /// Add a value at (row, col). Duplicates are summed during conversion.
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.n_rows, "Row index out of bounds");
        debug_assert!(col < self.n_cols, "Column index out of bounds");

        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
    }

    /// Add a dense submatrix at the specified DOF indices.
    ///
    /// This is the core operation for finite element assembly.
    pub fn add_submatrix(&mut self, dof_indices: &[usize], submatrix: &DMatrix<f64>) {
        let n = dof_indices.len();
        debug_assert_eq!(submatrix.nrows(), n);
        debug_assert_eq!(submatrix.ncols(), n);

        for (i, &row) in dof_indices.iter().enumerate() {
            for (j, &col) in dof_indices.iter().enumerate() {
                self.add(row, col, submatrix[(i, j)]);
            }
        }
    }

    /// Number of stored triplets.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Convert to CSR format, summing duplicate entries.
    pub fn to_csr(self) -> Result<CsrMatrix> {
        let coo = CooMatrix::try_from_triplets(
            self.n_rows,
            self.n_cols,
            self.rows,
            self.cols,
            self.values,
        )
        .map_err(|e| Error::Assembly(format!("invalid triplet data: {}", e)))?;

        Ok(CsrMatrix::from(&coo))
    }
}

/// Row/column elimination of fixed DOFs.
///
/// Every stored entry in a flagged row or column becomes zero and the
/// flagged diagonal becomes one. Flagged diagonals missing from the
/// sparsity pattern are inserted first.
///
/// `fixed` holds one flag per row of a square matrix.
pub fn eliminate_dofs(matrix: &mut CsrMatrix, fixed: &[bool]) -> Result<()> {
    debug_assert_eq!(matrix.nrows(), fixed.len());

    let missing: Vec<usize> = matrix
        .row_iter()
        .enumerate()
        .filter(|(i, row)| fixed[*i] && !row.col_indices().contains(i))
        .map(|(i, _)| i)
        .collect();

    if !missing.is_empty() {
        let mut triplet =
            TripletMatrix::with_capacity(matrix.nrows(), matrix.ncols(), matrix.nnz() + missing.len());
        for (row, col, &value) in matrix.triplet_iter() {
            triplet.add(row, col, value);
        }
        for &dof in &missing {
            triplet.add(dof, dof, 0.0);
        }
        *matrix = triplet.to_csr()?;
    }

    for (row, col, value) in matrix.triplet_iter_mut() {
        if fixed[row] || fixed[col] {
            *value = if row == col { 1.0 } else { 0.0 };
        }
    }
    Ok(())
}

/// Sparse matrix-vector product `y = A x`.
pub fn mul_vec(matrix: &CsrMatrix, x: &[f64]) -> Vec<f64> {
    debug_assert_eq!(matrix.ncols(), x.len());
    matrix
        .row_iter()
        .map(|row| {
            row.col_indices()
                .iter()
                .zip(row.values())
                .map(|(&j, &v)| v * x[j])
                .sum()
        })
        .collect()
}

/// Euclidean norm.
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

//! Linear solver facade.
//!
//! Solves the assembled system Kx = f with a sparse LU factorization from the
//! faer library. The Lagrange-bordered stiffness matrix is symmetric but
//! indefinite, so a Cholesky backend is not applicable; LU with partial
//! pivoting handles the saddle-point structure.
//!
//! The three phases - symbolic analysis of the nonzero pattern, numeric
//! factorization, and back-substitution - are timed separately, and a failure
//! reports the phase that detected it.

use crate::error::{Error, Phase, Result};
use crate::sparse::CsrMatrix;
use faer::prelude::*;
use faer::sparse::linalg::solvers::{Lu, SymbolicLu};
use faer::sparse::{SparseColMat, SymbolicSparseColMat};
use std::time::Instant;

/// Elapsed milliseconds of the three solver phases.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveTimings {
    /// Fill-reducing ordering from the nonzero pattern.
    pub symbolic_ms: u64,
    /// Numeric LU factorization.
    pub factorization_ms: u64,
    /// Back-substitution.
    pub solve_ms: u64,
}

/// Direct solver interface: analyze, factor, and solve in one call.
pub trait DirectSolver {
    /// Solve Kx = f, returning the solution and the per-phase timings.
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<(Vec<f64>, SolveTimings)>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}

/// Convert a CSR matrix to faer's sparse column (CSC) format.
///
/// Each CSR row is scattered into per-column buckets; iterating the rows in
/// order leaves every column's row indices sorted, which is what faer's
/// unchecked constructor requires.
fn csr_to_faer_csc(csr: &CsrMatrix) -> SparseColMat<usize, f64> {
    let nrows = csr.nrows();
    let ncols = csr.ncols();

    let row_offsets = csr.row_offsets();
    let col_indices = csr.col_indices();
    let values = csr.values();

    let mut col_counts = vec![0usize; ncols];
    for &col in col_indices {
        col_counts[col] += 1;
    }

    let mut col_offsets = vec![0usize; ncols + 1];
    for i in 0..ncols {
        col_offsets[i + 1] = col_offsets[i] + col_counts[i];
    }

    let nnz = values.len();
    let mut csc_row_indices = vec![0usize; nnz];
    let mut csc_values = vec![0.0f64; nnz];
    let mut col_positions = col_offsets[..ncols].to_vec();

    for row in 0..nrows {
        for idx in row_offsets[row]..row_offsets[row + 1] {
            let col = col_indices[idx];
            let pos = col_positions[col];
            csc_row_indices[pos] = row;
            csc_values[pos] = values[idx];
            col_positions[col] += 1;
        }
    }

    // SAFETY: offsets are cumulative counts and row indices are sorted per column
    unsafe {
        SparseColMat::new(
            SymbolicSparseColMat::new_unchecked(nrows, ncols, col_offsets, None, csc_row_indices),
            csc_values,
        )
    }
}

/// Sparse LU solver backed by faer.
pub struct FaerLuSolver;

impl FaerLuSolver {
    /// Create a new sparse LU solver.
    pub fn new() -> Self {
        Self
    }
}

impl Default for FaerLuSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectSolver for FaerLuSolver {
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<(Vec<f64>, SolveTimings)> {
        let n = matrix.nrows();
        if n == 0 {
            return Ok((vec![], SolveTimings::default()));
        }

        if n != matrix.ncols() {
            return Err(Error::Numeric {
                phase: Phase::Symbolic,
                detail: "matrix must be square".to_string(),
            });
        }

        if n != rhs.len() {
            return Err(Error::Numeric {
                phase: Phase::Solve,
                detail: format!("RHS has length {} but the system has order {n}", rhs.len()),
            });
        }

        let csc = csr_to_faer_csc(matrix);
        let csc_ref = csc.as_ref();

        let mut timings = SolveTimings::default();

        let start = Instant::now();
        let symbolic = SymbolicLu::try_new(csc_ref.symbolic()).map_err(|e| Error::Numeric {
            phase: Phase::Symbolic,
            detail: format!("{e:?}"),
        })?;
        timings.symbolic_ms = start.elapsed().as_millis() as u64;

        let start = Instant::now();
        let lu = Lu::try_new_with_symbolic(symbolic, csc_ref).map_err(|e| Error::Numeric {
            phase: Phase::Factorization,
            detail: format!("{e:?}"),
        })?;
        timings.factorization_ms = start.elapsed().as_millis() as u64;

        let start = Instant::now();
        let mut x = faer::Mat::from_fn(n, 1, |i, _| rhs[i]);
        lu.solve_in_place(x.as_mut());
        timings.solve_ms = start.elapsed().as_millis() as u64;

        let solution: Vec<f64> = (0..n).map(|i| x[(i, 0)]).collect();
        if solution.iter().any(|v| !v.is_finite()) {
            return Err(Error::Numeric {
                phase: Phase::Solve,
                detail: "solution contains non-finite values; the system is numerically singular"
                    .to_string(),
            });
        }

        Ok((solution, timings))
    }

    fn name(&self) -> &str {
        "faer sparse LU"
    }
}

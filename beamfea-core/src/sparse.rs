//! Sparse matrix assembly.
//!
//! The global stiffness matrix is accumulated as (row, col, value) triplets
//! and compressed to CSR exactly once. Duplicate coordinates sum during the
//! compression, which the element scatter and the tie springs rely on.

use crate::element::Matrix12;
use crate::model::DOFS_PER_NODE;
use nalgebra_sparse::csr::CsrMatrix as NalgebraCsr;

/// Compressed Sparse Row matrix.
pub type CsrMatrix = NalgebraCsr<f64>;

/// Builder accumulating (row, col, value) triplets (COO format).
pub struct TripletMatrix {
    n_rows: usize,
    n_cols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl TripletMatrix {
    /// Create an empty builder for an `n_rows` x `n_cols` matrix.
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self::with_capacity(n_rows, n_cols, 0)
    }

    /// Create with an estimated triplet capacity.
    pub fn with_capacity(n_rows: usize, n_cols: usize, nnz_estimate: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            rows: Vec::with_capacity(nnz_estimate),
            cols: Vec::with_capacity(nnz_estimate),
            values: Vec::with_capacity(nnz_estimate),
        }
    }

    /// Add a value at (row, col). Duplicates sum during compression.
    ///
    /// Exact zeros are skipped so that unrestrained zero-stiffness rows stay
    /// structurally empty.
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.n_rows, "row index out of bounds");
        debug_assert!(col < self.n_cols, "column index out of bounds");

        if value != 0.0 {
            self.rows.push(row);
            self.cols.push(col);
            self.values.push(value);
        }
    }

    /// Scatter a rotated 12x12 element matrix into the node blocks of `n1`
    /// and `n2`: local rows/cols 0..6 map to `6*n1..`, 6..12 to `6*n2..`.
    pub fn add_element_block(&mut self, n1: usize, n2: usize, k: &Matrix12) {
        let offsets = [DOFS_PER_NODE * n1, DOFS_PER_NODE * n2];
        for i in 0..2 * DOFS_PER_NODE {
            let row = offsets[i / DOFS_PER_NODE] + i % DOFS_PER_NODE;
            for j in 0..2 * DOFS_PER_NODE {
                let col = offsets[j / DOFS_PER_NODE] + j % DOFS_PER_NODE;
                self.add(row, col, k[(i, j)]);
            }
        }
    }

    /// Number of stored triplets.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Compress to CSR, summing duplicate entries.
    pub fn to_csr(self) -> CsrMatrix {
        use nalgebra_sparse::coo::CooMatrix;

        let coo = CooMatrix::try_from_triplets(
            self.n_rows,
            self.n_cols,
            self.rows,
            self.cols,
            self.values,
        )
        .expect("triplet indices are checked on insertion");

        CsrMatrix::from(&coo)
    }
}

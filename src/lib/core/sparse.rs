//! Sparse matrix utilities for column-major (cell-major) count data

use crate::core::error::{MaestroError, Result};
use itertools::Itertools;
use nalgebra_sparse::{CooMatrix, CscMatrix};

pub struct SparseOps;

impl SparseOps {
    /// Create a CSC matrix from `(row, col, value)` triplets.
    ///
    /// Duplicate coordinates are summed by the COO to CSC conversion.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: Vec<(usize, usize, f64)>,
    ) -> Result<CscMatrix<f64>> {
        if nrows == 0 || ncols == 0 || triplets.is_empty() {
            return Ok(CscMatrix::zeros(nrows, ncols));
        }

        for &(row, col, _) in &triplets {
            if row >= nrows || col >= ncols {
                return Err(MaestroError::Format(format!(
                    "Index ({}, {}) exceeds matrix dimensions ({}, {})",
                    row, col, nrows, ncols
                )));
            }
        }

        let (row_indices, col_indices, values): (Vec<_>, Vec<_>, Vec<_>) =
            triplets.into_iter().multiunzip();

        let coo = CooMatrix::try_from_triplets(nrows, ncols, row_indices, col_indices, values)
            .map_err(|e| MaestroError::SparseMatrix(format!("COO creation failed: {:?}", e)))?;

        Ok(CscMatrix::from(&coo))
    }

    /// Create a CSC matrix from raw compressed-column buffers, as stored in
    /// 10x containers. Row indices within a column need not be sorted.
    pub fn from_csc_parts(
        nrows: usize,
        ncols: usize,
        col_offsets: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<CscMatrix<f64>> {
        if col_offsets.len() != ncols + 1 {
            return Err(MaestroError::DimensionMismatch {
                expected: format!("{} column offsets", ncols + 1),
                actual: format!("{} column offsets", col_offsets.len()),
            });
        }
        if ncols == 0 {
            return Ok(CscMatrix::zeros(nrows, 0));
        }

        CscMatrix::try_from_unsorted_csc_data(nrows, ncols, col_offsets, row_indices, values)
            .map_err(MaestroError::from)
    }

    /// Per-column totals and strictly positive entry counts in one pass over
    /// the stored entries.
    pub fn column_stats(matrix: &CscMatrix<f64>) -> (Vec<f64>, Vec<usize>) {
        let mut totals = Vec::with_capacity(matrix.ncols());
        let mut positives = Vec::with_capacity(matrix.ncols());

        for col in matrix.col_iter() {
            let (sum, nonzero) = col
                .values()
                .iter()
                .fold((0.0f64, 0usize), |(sum, nonzero), &val| {
                    (sum + val, nonzero + usize::from(val > 0.0))
                });
            totals.push(sum);
            positives.push(nonzero);
        }

        (totals, positives)
    }

    /// Keep the columns whose mask entry is `true`, preserving their order.
    /// Rows are untouched.
    pub fn select_columns(matrix: &CscMatrix<f64>, keep: &[bool]) -> Result<CscMatrix<f64>> {
        if keep.len() != matrix.ncols() {
            return Err(MaestroError::DimensionMismatch {
                expected: format!("mask of length {}", matrix.ncols()),
                actual: format!("mask of length {}", keep.len()),
            });
        }

        let nrows = matrix.nrows();
        let new_ncols = keep.iter().filter(|&&k| k).count();
        if new_ncols == 0 {
            return Ok(CscMatrix::zeros(nrows, 0));
        }

        let mut new_col_offsets = Vec::with_capacity(new_ncols + 1);
        let mut new_row_indices = Vec::new();
        let mut new_values = Vec::new();
        new_col_offsets.push(0);

        for (col, _) in matrix.col_iter().zip(keep).filter(|(_, &k)| k) {
            new_row_indices.extend_from_slice(col.row_indices());
            new_values.extend_from_slice(col.values());
            new_col_offsets.push(new_row_indices.len());
        }

        CscMatrix::try_from_csc_data(
            nrows,
            new_ncols,
            new_col_offsets,
            new_row_indices,
            new_values,
        )
        .map_err(|e| {
            MaestroError::SparseMatrix(format!("Failed to create filtered matrix: {:?}", e))
        })
    }

    /// Get matrix density statistics
    pub fn get_density_stats(matrix: &CscMatrix<f64>) -> (f64, usize, usize) {
        let total_elements = matrix.nrows() * matrix.ncols();
        let nnz = matrix.nnz();
        let density = if total_elements > 0 {
            nnz as f64 / total_elements as f64
        } else {
            0.0
        };
        (density, nnz, total_elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CscMatrix<f64> {
        // 3 features x 4 cells
        SparseOps::from_triplets(
            3,
            4,
            vec![
                (0, 0, 2.0),
                (2, 0, 1.0),
                (1, 1, 5.0),
                (0, 3, 0.0),
                (1, 3, 3.5),
                (2, 3, 1.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn column_stats_count_only_positive_entries() {
        let (totals, positives) = SparseOps::column_stats(&sample());
        assert_eq!(totals, vec![3.0, 5.0, 0.0, 4.5]);
        assert_eq!(positives, vec![2, 1, 0, 2]);
    }

    #[test]
    fn select_columns_preserves_rows_and_order() {
        let matrix = sample();
        let filtered = SparseOps::select_columns(&matrix, &[true, false, false, true]).unwrap();
        assert_eq!(filtered.nrows(), 3);
        assert_eq!(filtered.ncols(), 2);

        let entries: Vec<(usize, usize, f64)> = filtered
            .triplet_iter()
            .filter(|(_, _, &v)| v != 0.0)
            .map(|(r, c, &v)| (r, c, v))
            .collect();
        assert_eq!(
            entries,
            vec![(0, 0, 2.0), (2, 0, 1.0), (1, 1, 3.5), (2, 1, 1.0)]
        );
    }

    #[test]
    fn select_no_columns_keeps_rows() {
        let filtered = SparseOps::select_columns(&sample(), &[false; 4]).unwrap();
        assert_eq!(filtered.nrows(), 3);
        assert_eq!(filtered.ncols(), 0);
        assert_eq!(filtered.nnz(), 0);
    }

    #[test]
    fn select_columns_rejects_wrong_mask_length() {
        assert!(SparseOps::select_columns(&sample(), &[true, false]).is_err());
    }

    #[test]
    fn out_of_range_triplet_is_a_format_error() {
        let err = SparseOps::from_triplets(2, 2, vec![(2, 0, 1.0)]).unwrap_err();
        assert!(matches!(err, MaestroError::Format(_)));
    }

    #[test]
    fn csc_parts_accept_unsorted_rows() {
        let matrix =
            SparseOps::from_csc_parts(3, 2, vec![0, 2, 3], vec![2, 0, 1], vec![4.0, 1.0, 7.0])
                .unwrap();
        let (totals, positives) = SparseOps::column_stats(&matrix);
        assert_eq!(totals, vec![5.0, 7.0]);
        assert_eq!(positives, vec![2, 1]);
    }

    #[test]
    fn density_counts_stored_entries() {
        let matrix =
            SparseOps::from_triplets(2, 4, vec![(0, 0, 1.0), (1, 2, 2.0)]).unwrap();
        let (density, nnz, total) = SparseOps::get_density_stats(&matrix);
        assert_eq!(total, 8);
        assert_eq!(nnz, 2);
        assert!((density - 0.25).abs() < 1e-12);
    }
}

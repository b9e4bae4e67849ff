//! Threshold-based cell filtering

use super::stats::CellStats;
use crate::core::error::Result;
use crate::core::sparse::SparseOps;
use crate::pipeline::matrix::CountMatrix;

/// Minimum cell quality. Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QcCutoffs {
    /// A cell needs strictly more total counts than this.
    pub count: u64,
    /// A cell needs strictly more detected features than this.
    pub gene: u64,
}

impl Default for QcCutoffs {
    fn default() -> Self {
        Self {
            count: 1000,
            gene: 500,
        }
    }
}

impl QcCutoffs {
    #[inline]
    pub fn passes(&self, count: f64, genes: usize) -> bool {
        count > self.count as f64 && genes as u64 > self.gene
    }

    /// Pass/fail per cell, in column order.
    pub fn mask(&self, stats: &CellStats) -> Vec<bool> {
        stats
            .counts
            .iter()
            .zip(&stats.features)
            .map(|(&count, &genes)| self.passes(count, genes))
            .collect()
    }
}

/// Restrict a count matrix to the cells whose mask entry is `true`.
///
/// Features are kept unchanged; barcodes follow their columns.
pub fn select_cells(counts: &CountMatrix, keep: &[bool]) -> Result<CountMatrix> {
    let matrix = SparseOps::select_columns(counts.matrix(), keep)?;
    let barcodes = counts
        .barcodes()
        .iter()
        .zip(keep)
        .filter(|(_, &k)| k)
        .map(|(barcode, _)| barcode.clone())
        .collect();
    CountMatrix::new(matrix, counts.features().to_vec(), barcodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_excluded() {
        let cutoffs = QcCutoffs::default();
        assert!(!cutoffs.passes(1000.0, 600));
        assert!(!cutoffs.passes(1500.0, 500));
        assert!(cutoffs.passes(1000.5, 501));
        assert!(cutoffs.passes(1001.0, 501));
    }

    #[test]
    fn mask_follows_column_order() {
        let stats = CellStats {
            counts: vec![1500.0, 800.0, 2000.0, 1100.0],
            features: vec![600, 400, 10, 501],
        };
        let mask = QcCutoffs { count: 1000, gene: 500 }.mask(&stats);
        assert_eq!(mask, vec![true, false, false, true]);
    }

    #[test]
    fn select_cells_keeps_features() {
        let matrix =
            SparseOps::from_triplets(2, 3, vec![(0, 0, 1.0), (1, 1, 2.0), (0, 2, 3.0)]).unwrap();
        let counts = CountMatrix::new(
            matrix,
            vec!["A".into(), "A".into()],
            vec!["c1".into(), "c2".into(), "c3".into()],
        )
        .unwrap();

        let kept = select_cells(&counts, &[false, true, true]).unwrap();
        assert_eq!(kept.features(), ["A", "A"]);
        assert_eq!(kept.barcodes(), ["c2", "c3"]);
        assert_eq!(SparseOps::column_stats(kept.matrix()).0, vec![2.0, 3.0]);

        let none = select_cells(&counts, &[false; 3]).unwrap();
        assert_eq!(none.n_features(), 2);
        assert_eq!(none.n_cells(), 0);
    }
}

//! Per-cell summary statistics

use crate::core::error::{MaestroError, Result};
use crate::core::io::get_writer;
use crate::core::sparse::SparseOps;
use crate::pipeline::matrix::CountMatrix;
use log::debug;
use std::path::Path;

pub const STAT_HEADER: [&str; 3] = ["Cell", "Count", "Gene"];

/// Total count and number of detected features for every cell, in column
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct CellStats {
    pub counts: Vec<f64>,
    pub features: Vec<usize>,
}

impl CellStats {
    /// One pass over the stored entries; a feature is detected when its
    /// count is strictly positive.
    pub fn compute(counts: &CountMatrix) -> Self {
        let (totals, detected) = SparseOps::column_stats(counts.matrix());
        debug!("Computed statistics for {} cells", totals.len());
        Self {
            counts: totals,
            features: detected,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Write `Cell\tCount\tGene` plus one row per barcode. Counts are truncated
/// to integers.
pub fn write_stat_report<P: AsRef<Path>>(
    path: P,
    barcodes: &[String],
    stats: &CellStats,
) -> Result<()> {
    if barcodes.len() != stats.len() {
        return Err(MaestroError::DimensionMismatch {
            expected: format!("{} barcodes", stats.len()),
            actual: format!("{} barcodes", barcodes.len()),
        });
    }

    let mut writer = get_writer(path)?;
    writer.write_record(STAT_HEADER)?;
    for ((barcode, &count), &genes) in barcodes.iter().zip(&stats.counts).zip(&stats.features) {
        let count = (count.trunc() as u64).to_string();
        let genes = genes.to_string();
        writer.write_record([barcode.as_str(), count.as_str(), genes.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

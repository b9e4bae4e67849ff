//! Cell quality control for count matrices
//!
//! Computes per-cell totals and detected-feature counts, writes them as a
//! diagnostic report for every cell, then keeps only the cells above both
//! cutoffs and stores them as a 10x container.
//!
//! # Key Components
//!
//! - [`stats`]: per-cell statistics and the tab-separated report
//! - [`filter`]: cutoffs and column selection

pub mod filter;
pub mod stats;

pub use filter::{select_cells, QcCutoffs};
pub use stats::{write_stat_report, CellStats};

use crate::core::error::Result;
use crate::core::sparse::SparseOps;
use crate::pipeline::matrix::{write_10x_h5, ContentType, CountMatrix};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Locations of the two files produced by [`filter_cells`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QcOutputs {
    pub stat_report: PathBuf,
    pub filtered_matrix: PathBuf,
}

impl QcOutputs {
    /// `<directory>/<outprefix>_count_gene_stat.txt` and
    /// `<directory>/<outprefix>_filtered_gene_count.h5`.
    pub fn new<P: AsRef<Path>>(directory: P, outprefix: &str) -> Self {
        let directory = directory.as_ref();
        Self {
            stat_report: directory.join(format!("{}_count_gene_stat.txt", outprefix)),
            filtered_matrix: directory.join(format!("{}_filtered_gene_count.h5", outprefix)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QcSummary {
    pub total_cells: usize,
    pub passed_cells: usize,
    pub features: usize,
}

/// Run cell quality control on a loaded matrix.
///
/// The report is written before filtering, so a failure while writing the
/// container leaves the report behind.
pub fn filter_cells(
    counts: &CountMatrix,
    cutoffs: QcCutoffs,
    genome: &str,
    outputs: &QcOutputs,
) -> Result<QcSummary> {
    if counts.n_cells() == 0 {
        warn!("Input matrix has no cells");
    }

    let (density, nnz, total) = SparseOps::get_density_stats(counts.matrix());
    debug!(
        "Input matrix holds {} of {} entries (density {:.4})",
        nnz, total, density
    );

    let stats = CellStats::compute(counts);
    info!("Writing cell statistics: {}", outputs.stat_report.display());
    write_stat_report(&outputs.stat_report, counts.barcodes(), &stats)?;

    let keep = cutoffs.mask(&stats);
    let filtered = select_cells(counts, &keep)?;
    info!(
        "{} of {} cells passed (count > {}, genes > {})",
        filtered.n_cells(),
        counts.n_cells(),
        cutoffs.count,
        cutoffs.gene
    );

    write_10x_h5(&outputs.filtered_matrix, &filtered, genome, ContentType::Gene)?;

    Ok(QcSummary {
        total_cells: counts.n_cells(),
        passed_cells: filtered.n_cells(),
        features: filtered.n_features(),
    })
}

//! MatrixMarket triplet matrices with feature and barcode side files
//!
//! This is the layout written by CellRanger (`matrix.mtx`, `features.tsv`,
//! `barcodes.tsv`, optionally gzipped) and by STARsolo.

use super::{parse_count, ContentType, CountMatrix, MatrixLoader};
use crate::core::error::{MaestroError, Result};
use crate::core::io::{get_reader, open_text_reader};
use crate::core::sparse::SparseOps;
use log::{debug, info};
use std::io::BufRead;
use std::path::{Path, PathBuf};

pub struct MtxLoader {
    matrix: PathBuf,
    features: PathBuf,
    barcodes: PathBuf,
    gene_column: usize,
    content: ContentType,
}

impl MtxLoader {
    pub fn new<P: AsRef<Path>>(
        matrix: P,
        features: P,
        barcodes: P,
        gene_column: usize,
        content: ContentType,
    ) -> Self {
        Self {
            matrix: matrix.as_ref().to_path_buf(),
            features: features.as_ref().to_path_buf(),
            barcodes: barcodes.as_ref().to_path_buf(),
            gene_column,
            content,
        }
    }
}

impl MatrixLoader for MtxLoader {
    fn load(&self) -> Result<CountMatrix> {
        if self.gene_column == 0 {
            return Err(MaestroError::Config(
                "gene column is 1-based and must be at least 1".to_string(),
            ));
        }

        info!("Reading MatrixMarket matrix: {}", self.matrix.display());
        let matrix = read_matrix_market(open_text_reader(&self.matrix)?)?;

        info!("Reading features: {}", self.features.display());
        let features = read_features(&self.features, self.gene_column, self.content)?;

        info!("Reading barcodes: {}", self.barcodes.display());
        let barcodes = read_barcodes(&self.barcodes)?;

        CountMatrix::new(matrix, features, barcodes)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MtxField {
    Integer,
    Real,
    Pattern,
}

fn parse_banner(line: &str) -> Result<MtxField> {
    let tokens: Vec<String> = line
        .split_whitespace()
        .map(|t| t.to_ascii_lowercase())
        .collect();
    if tokens.len() != 5 || tokens[0] != "%%matrixmarket" || tokens[1] != "matrix" {
        return Err(MaestroError::Format(format!(
            "Invalid MatrixMarket header: '{}'",
            line
        )));
    }
    if tokens[2] != "coordinate" {
        return Err(MaestroError::Format(format!(
            "Only coordinate MatrixMarket files are supported, found '{}'",
            tokens[2]
        )));
    }
    if tokens[4] != "general" {
        return Err(MaestroError::Format(format!(
            "Only general MatrixMarket symmetry is supported, found '{}'",
            tokens[4]
        )));
    }
    match tokens[3].as_str() {
        "integer" => Ok(MtxField::Integer),
        "real" => Ok(MtxField::Real),
        "pattern" => Ok(MtxField::Pattern),
        other => Err(MaestroError::Format(format!(
            "Unsupported MatrixMarket field type '{}'",
            other
        ))),
    }
}

fn parse_usize(token: Option<&str>, what: &str, line: &str) -> Result<usize> {
    token
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(|| MaestroError::Format(format!("Invalid {} in line '{}'", what, line)))
}

/// Parse a coordinate MatrixMarket stream into a CSC matrix.
pub fn read_matrix_market<R: BufRead>(reader: R) -> Result<nalgebra_sparse::CscMatrix<f64>> {
    let mut lines = reader.lines();

    let banner = lines
        .next()
        .ok_or_else(|| MaestroError::Format("MatrixMarket file is empty".to_string()))??;
    let field = parse_banner(&banner)?;

    let mut size: Option<(usize, usize, usize)> = None;
    let mut triplets = Vec::new();

    for line in lines {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        let mut tokens = trimmed.split_whitespace();

        let (nrows, ncols, nnz) = match size {
            None => {
                let nrows = parse_usize(tokens.next(), "row count", trimmed)?;
                let ncols = parse_usize(tokens.next(), "column count", trimmed)?;
                let nnz = parse_usize(tokens.next(), "entry count", trimmed)?;
                size = Some((nrows, ncols, nnz));
                triplets.reserve(nnz);
                continue;
            }
            Some(dims) => dims,
        };

        let row = parse_usize(tokens.next(), "row index", trimmed)?;
        let col = parse_usize(tokens.next(), "column index", trimmed)?;
        if row == 0 || col == 0 || row > nrows || col > ncols {
            return Err(MaestroError::Format(format!(
                "Entry ({}, {}) outside matrix of size {} x {}",
                row, col, nrows, ncols
            )));
        }
        let value = match field {
            MtxField::Pattern => 1.0,
            MtxField::Integer | MtxField::Real => tokens
                .next()
                .and_then(parse_count)
                .ok_or_else(|| {
                    MaestroError::Format(format!("Invalid value in line '{}'", trimmed))
                })?,
        };
        if triplets.len() == nnz {
            return Err(MaestroError::Format(format!(
                "MatrixMarket file has more than the declared {} entries",
                nnz
            )));
        }
        triplets.push((row - 1, col - 1, value));
    }

    let (nrows, ncols, nnz) = size.ok_or_else(|| {
        MaestroError::Format("MatrixMarket file has no size line".to_string())
    })?;
    if triplets.len() != nnz {
        return Err(MaestroError::Format(format!(
            "MatrixMarket file declares {} entries but contains {}",
            nnz,
            triplets.len()
        )));
    }

    debug!(
        "Parsed MatrixMarket matrix {} x {} with {} entries",
        nrows, ncols, nnz
    );
    SparseOps::from_triplets(nrows, ncols, triplets)
}

/// Read feature names from a TSV side file.
///
/// Gene data take the 1-based `gene_column`; peak data join the first three
/// columns (`chrom`, `start`, `end`) with underscores.
pub fn read_features<P: AsRef<Path>>(
    path: P,
    gene_column: usize,
    content: ContentType,
) -> Result<Vec<String>> {
    if gene_column == 0 {
        return Err(MaestroError::Config(
            "gene column is 1-based and must be at least 1".to_string(),
        ));
    }
    let mut reader = get_reader(path, false)?;
    let mut features = Vec::new();

    for (line_no, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let name = match content {
            ContentType::Gene => record
                .get(gene_column - 1)
                .map(|f| f.trim().to_string())
                .ok_or_else(|| {
                    MaestroError::Format(format!(
                        "Feature line {} has {} columns, gene column {} requested",
                        line_no + 1,
                        record.len(),
                        gene_column
                    ))
                })?,
            ContentType::Peak => {
                if record.len() < 3 {
                    return Err(MaestroError::Format(format!(
                        "Peak line {} has {} columns, expected chrom, start and end",
                        line_no + 1,
                        record.len()
                    )));
                }
                record
                    .iter()
                    .take(3)
                    .map(str::trim)
                    .collect::<Vec<_>>()
                    .join("_")
            }
        };
        features.push(name);
    }

    Ok(features)
}

/// Read one barcode per line.
pub fn read_barcodes<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let reader = open_text_reader(path)?;
    let mut barcodes = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let barcode = line.trim();
        if !barcode.is_empty() {
            barcodes.push(barcode.to_string());
        }
    }
    Ok(barcodes)
}

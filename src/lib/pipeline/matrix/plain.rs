//! Dense plain-text count tables
//!
//! Layout: the first row holds the cell barcodes, the first column the
//! feature names and every other cell a count. The header may or may not
//! carry a corner label; R's `write.table` omits it, pandas writes it.
//!
//! Names are rewritten with two heuristics for RSEM/STAR style outputs:
//! features keep only the part after the last `_` (`ENSG00000141510_TP53`
//! becomes `TP53`), barcodes keep the file stem after the last `/` with any
//! `.genes.results` suffix dropped.

use super::{parse_count, CountMatrix, MatrixLoader};
use crate::core::error::{MaestroError, Result};
use crate::core::io::open_text_reader;
use crate::core::sparse::SparseOps;
use log::{debug, info};
use std::io::BufRead;
use std::path::{Path, PathBuf};

const RSEM_SUFFIX: &str = ".genes.results";

pub struct PlainLoader {
    path: PathBuf,
}

impl PlainLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl MatrixLoader for PlainLoader {
    fn load(&self) -> Result<CountMatrix> {
        info!("Reading plain-text count matrix: {}", self.path.display());
        let reader = open_text_reader(&self.path)?;
        let table = parse_table(reader)?;

        let features = table
            .features
            .iter()
            .map(|name| clean_feature_name(name))
            .collect();
        let barcodes = table
            .barcodes
            .iter()
            .map(|name| clean_barcode_name(name))
            .collect();

        CountMatrix::new(table.matrix, features, barcodes)
    }
}

struct RawTable {
    matrix: nalgebra_sparse::CscMatrix<f64>,
    features: Vec<String>,
    barcodes: Vec<String>,
}

/// Split a line on tabs, or on runs of whitespace when it has no tab.
fn split_fields(line: &str, tab_delimited: bool) -> Vec<&str> {
    if tab_delimited {
        line.split('\t').collect()
    } else {
        line.split_whitespace().collect()
    }
}

fn parse_table<R: BufRead>(reader: R) -> Result<RawTable> {
    let mut lines = reader.lines();

    let header_line = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => {
                return Err(MaestroError::Format(
                    "Plain-text matrix is empty".to_string(),
                ))
            }
        }
    };
    let header_line = header_line.trim_end_matches(['\r', '\n']);
    let tab_delimited = header_line.contains('\t');
    let header = split_fields(header_line, tab_delimited);

    let mut features = Vec::new();
    let mut triplets = Vec::new();
    let mut row_width: Option<usize> = None;

    for (row, line) in lines.enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_fields(line, tab_delimited);
        match row_width {
            None => row_width = Some(fields.len()),
            Some(width) if width != fields.len() => {
                return Err(MaestroError::Format(format!(
                    "Row {} ('{}') has {} fields, expected {}",
                    row + 2,
                    fields[0],
                    fields.len(),
                    width
                )));
            }
            Some(_) => {}
        }

        let feature_idx = features.len();
        features.push(fields[0].to_string());
        for (col, value) in fields[1..].iter().enumerate() {
            let count = parse_count(value).ok_or_else(|| MaestroError::InvalidCount {
                value: value.to_string(),
                row: feature_idx,
                col,
            })?;
            if count != 0.0 {
                triplets.push((feature_idx, col, count));
            }
        }
    }

    let n_cells = match row_width {
        Some(width) => width - 1,
        None => header.len().saturating_sub(1),
    };
    let barcodes: Vec<String> = if header.len() == n_cells + 1 {
        header[1..].iter().map(|s| s.to_string()).collect()
    } else if header.len() == n_cells {
        header.iter().map(|s| s.to_string()).collect()
    } else {
        return Err(MaestroError::DimensionMismatch {
            expected: format!("{} barcodes in header", n_cells),
            actual: format!("{} header fields", header.len()),
        });
    };

    debug!(
        "Parsed plain-text table with {} features, {} cells and {} non-zero entries",
        features.len(),
        barcodes.len(),
        triplets.len()
    );

    let matrix = SparseOps::from_triplets(features.len(), barcodes.len(), triplets)?;
    Ok(RawTable {
        matrix,
        features,
        barcodes,
    })
}

/// Remove one layer of surrounding quote characters.
pub fn strip_quotes(name: &str) -> &str {
    let name = name.trim();
    let name = name
        .strip_prefix('"')
        .or_else(|| name.strip_prefix('\''))
        .unwrap_or(name);
    name.strip_suffix('"')
        .or_else(|| name.strip_suffix('\''))
        .unwrap_or(name)
}

/// Keep the part of a feature name after its last underscore.
pub fn clean_feature_name(name: &str) -> String {
    let name = strip_quotes(name);
    name.rsplit('_').next().unwrap_or(name).to_string()
}

/// Keep the file name part of a barcode, without the RSEM results suffix.
pub fn clean_barcode_name(name: &str) -> String {
    let name = strip_quotes(name);
    let base = name.rsplit('/').next().unwrap_or(name);
    match base.find(RSEM_SUFFIX) {
        Some(pos) => base[..pos].to_string(),
        None => base.to_string(),
    }
}

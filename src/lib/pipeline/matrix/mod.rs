//! Count matrix loading for single-cell data
//!
//! Every supported on-disk encoding is normalised into a [`CountMatrix`]: a
//! feature × cell sparse matrix in CSC layout with positionally aligned
//! feature and barcode names.
//!
//! # Key Components
//!
//! - [`plain`]: dense tab/whitespace-delimited tables
//! - [`mtx`]: MatrixMarket triplets with separate feature and barcode files
//! - [`h5`]: 10x Genomics style HDF5 containers (read and write)

pub mod h5;
pub mod mtx;
pub mod plain;

use crate::core::error::{MaestroError, Result};
use nalgebra_sparse::CscMatrix;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub use h5::{read_10x_h5, write_10x_h5, H5Loader, H5Matrix};
pub use mtx::MtxLoader;
pub use plain::PlainLoader;

/// A feature × cell count matrix with aligned row and column names.
#[derive(Debug, Clone)]
pub struct CountMatrix {
    matrix: CscMatrix<f64>,
    features: Vec<String>,
    barcodes: Vec<String>,
}

impl CountMatrix {
    /// Bundle a matrix with its names, checking that both name lists match
    /// the matrix dimensions.
    pub fn new(
        matrix: CscMatrix<f64>,
        features: Vec<String>,
        barcodes: Vec<String>,
    ) -> Result<Self> {
        if matrix.nrows() != features.len() {
            return Err(MaestroError::DimensionMismatch {
                expected: format!("{} features (matrix rows)", matrix.nrows()),
                actual: format!("{} feature names", features.len()),
            });
        }
        if matrix.ncols() != barcodes.len() {
            return Err(MaestroError::DimensionMismatch {
                expected: format!("{} barcodes (matrix columns)", matrix.ncols()),
                actual: format!("{} barcode names", barcodes.len()),
            });
        }
        Ok(Self {
            matrix,
            features,
            barcodes,
        })
    }

    #[inline]
    pub fn matrix(&self) -> &CscMatrix<f64> {
        &self.matrix
    }

    #[inline]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    #[inline]
    pub fn barcodes(&self) -> &[String] {
        &self.barcodes
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.matrix.nrows()
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.matrix.ncols()
    }
}

/// On-disk encoding of an input count matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixFormat {
    H5,
    Mtx,
    Plain,
}

impl FromStr for MatrixFormat {
    type Err = MaestroError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "h5" => Ok(MatrixFormat::H5),
            "mtx" => Ok(MatrixFormat::Mtx),
            "plain" => Ok(MatrixFormat::Plain),
            _ => Err(MaestroError::Config(format!(
                "Unsupported matrix format: '{}'. Valid formats: h5, mtx, plain",
                s
            ))),
        }
    }
}

impl fmt::Display for MatrixFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatrixFormat::H5 => write!(f, "h5"),
            MatrixFormat::Mtx => write!(f, "mtx"),
            MatrixFormat::Plain => write!(f, "plain"),
        }
    }
}

impl MatrixFormat {
    pub const VARIANTS: &'static [&'static str] = &["h5", "mtx", "plain"];

    /// Select the loader for this encoding.
    pub fn loader(&self, inputs: &MatrixInputs) -> Box<dyn MatrixLoader> {
        match self {
            MatrixFormat::H5 => Box::new(H5Loader::new(&inputs.matrix)),
            MatrixFormat::Mtx => Box::new(MtxLoader::new(
                &inputs.matrix,
                &inputs.feature,
                &inputs.barcode,
                inputs.gene_column,
                inputs.content,
            )),
            MatrixFormat::Plain => Box::new(PlainLoader::new(&inputs.matrix)),
        }
    }
}

/// Reference genome label written into 10x containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Species {
    GRCh38,
    GRCm38,
}

impl Species {
    pub const VARIANTS: &'static [&'static str] = &["GRCh38", "GRCm38"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::GRCh38 => "GRCh38",
            Species::GRCm38 => "GRCm38",
        }
    }
}

impl FromStr for Species {
    type Err = MaestroError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GRCh38" => Ok(Species::GRCh38),
            "GRCm38" => Ok(Species::GRCm38),
            _ => Err(MaestroError::Config(format!(
                "Unsupported species: '{}'. Valid species: GRCh38, GRCm38",
                s
            ))),
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of feature stored in the matrix rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentType {
    Gene,
    Peak,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Gene => "Gene",
            ContentType::Peak => "Peak",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input locations for [`MatrixFormat::loader`]. `feature`, `barcode`,
/// `gene_column` and `content` only matter for the MatrixMarket encoding.
#[derive(Debug, Clone)]
pub struct MatrixInputs {
    pub matrix: PathBuf,
    pub feature: PathBuf,
    pub barcode: PathBuf,
    /// 1-based column of the feature file holding the feature name.
    pub gene_column: usize,
    pub content: ContentType,
}

impl MatrixInputs {
    pub fn new<P: Into<PathBuf>>(matrix: P) -> Self {
        Self {
            matrix: matrix.into(),
            feature: PathBuf::from("features.tsv"),
            barcode: PathBuf::from("barcodes.tsv"),
            gene_column: 2,
            content: ContentType::Gene,
        }
    }
}

/// Parse one count cell. Counts must be finite and non-negative.
pub(crate) fn parse_count(token: &str) -> Option<f64> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Common contract of every input encoding.
pub trait MatrixLoader {
    /// Read the matrix and its names. Names are always decoded text.
    fn load(&self) -> Result<CountMatrix>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_formats() {
        assert_eq!(MatrixFormat::from_str("h5").unwrap(), MatrixFormat::H5);
        assert_eq!(MatrixFormat::from_str("mtx").unwrap(), MatrixFormat::Mtx);
        assert_eq!(MatrixFormat::from_str("plain").unwrap(), MatrixFormat::Plain);
        assert_eq!(MatrixFormat::Plain.to_string(), "plain");
    }

    #[test]
    fn unsupported_format_is_a_configuration_error() {
        let err = MatrixFormat::from_str("loom").unwrap_err();
        assert!(matches!(err, MaestroError::Config(_)));
        assert!(MatrixFormat::from_str("").is_err());
    }

    #[test]
    fn species_round_trips_through_text() {
        for name in Species::VARIANTS {
            assert_eq!(Species::from_str(name).unwrap().to_string(), *name);
        }
        assert!(Species::from_str("hg19").is_err());
    }

    #[test]
    fn counts_must_be_finite_and_non_negative() {
        assert_eq!(parse_count("12"), Some(12.0));
        assert_eq!(parse_count(" 0.5 "), Some(0.5));
        assert_eq!(parse_count("0"), Some(0.0));
        for bad in ["NaN", "inf", "-inf", "1e400", "-4", "abc", ""] {
            assert_eq!(parse_count(bad), None, "{} accepted", bad);
        }
    }

    #[test]
    fn count_matrix_rejects_misaligned_names() {
        let matrix = CscMatrix::zeros(2, 3);
        let err = CountMatrix::new(
            matrix.clone(),
            vec!["a".into()],
            vec!["x".into(), "y".into(), "z".into()],
        )
        .unwrap_err();
        assert!(matches!(err, MaestroError::DimensionMismatch { .. }));

        assert!(CountMatrix::new(
            matrix,
            vec!["a".into(), "b".into()],
            vec!["x".into(), "y".into()]
        )
        .is_err());
    }
}

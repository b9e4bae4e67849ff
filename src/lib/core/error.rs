//! Error types for the MAESTRO library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaestroError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Sparse matrix error: {0}")]
    SparseMatrix(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid count value '{value}' at row {row}, column {col}")]
    InvalidCount {
        value: String,
        row: usize,
        col: usize,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MaestroError>;

impl From<nalgebra_sparse::SparseFormatError> for MaestroError {
    fn from(err: nalgebra_sparse::SparseFormatError) -> Self {
        MaestroError::SparseMatrix(format!("Sparse format error: {:?}", err))
    }
}

impl From<hdf5::types::StringError> for MaestroError {
    fn from(err: hdf5::types::StringError) -> Self {
        MaestroError::Format(format!("Invalid string for HDF5 storage: {}", err))
    }
}

/// Returns `true` if any cause in the chain is a broken pipe, whether raised
/// directly or wrapped in [`MaestroError::Io`].
pub fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        let io_err = cause
            .downcast_ref::<std::io::Error>()
            .or_else(|| match cause.downcast_ref::<MaestroError>() {
                Some(MaestroError::Io(inner)) => Some(inner),
                _ => None,
            });
        io_err
            .map(|e| e.kind() == std::io::ErrorKind::BrokenPipe)
            .unwrap_or(false)
    })
}

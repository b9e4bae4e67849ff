//! 10x Genomics style HDF5 count containers
//!
//! Written layout (CellRanger v3 feature-barcode matrix):
//!
//! ```text
//! /matrix/barcodes
//! /matrix/data                 f32, CSC order
//! /matrix/indices              i64 row index per entry
//! /matrix/indptr               i64 column offsets, ncols + 1
//! /matrix/shape                i64 [nrows, ncols]
//! /matrix/features/_all_tag_keys
//! /matrix/features/feature_type
//! /matrix/features/genome
//! /matrix/features/id
//! /matrix/features/name
//! ```
//!
//! The reader also accepts the CellRanger v2 layout, where the same matrix
//! datasets live in a group named after the genome and feature names are in
//! `gene_names`.

use super::{ContentType, CountMatrix, MatrixLoader};
use crate::core::error::{MaestroError, Result};
use crate::core::fs::make_parent_dirs;
use crate::core::sparse::SparseOps;
use hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{File, Group, H5Type};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

const NAME_LEN: usize = 256;
type FA256 = FixedAscii<NAME_LEN>;

/// Elements per chunk of the compressed 1-D datasets.
const CHUNK_LEN: usize = 1 << 16;

const MATRIX_GROUP: &str = "matrix";
const FEATURES_GROUP: &str = "features";

/// A matrix read from a container together with its genome label.
#[derive(Debug, Clone)]
pub struct H5Matrix {
    pub counts: CountMatrix,
    pub genome: String,
}

pub struct H5Loader {
    path: PathBuf,
}

impl H5Loader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl MatrixLoader for H5Loader {
    fn load(&self) -> Result<CountMatrix> {
        info!("Reading 10x HDF5 matrix: {}", self.path.display());
        let H5Matrix { counts, genome } = read_10x_h5(&self.path)?;
        debug!("Container genome label: '{}'", genome);
        Ok(counts)
    }
}

fn read_usize_1d(group: &Group, name: &str) -> Result<Vec<usize>> {
    group
        .dataset(name)?
        .read_1d::<i64>()?
        .iter()
        .map(|&v| {
            usize::try_from(v).map_err(|_| {
                MaestroError::Format(format!("Negative value {} in dataset '{}'", v, name))
            })
        })
        .collect()
}

/// Read a string dataset stored as fixed-length or variable-length text.
fn read_strings(group: &Group, name: &str) -> Result<Vec<String>> {
    let ds = group.dataset(name)?;
    let strings: Vec<String> = match ds.dtype()?.to_descriptor()? {
        TypeDescriptor::FixedAscii(len) | TypeDescriptor::FixedUnicode(len)
            if len > NAME_LEN =>
        {
            return Err(MaestroError::Format(format!(
                "Dataset '{}' holds {}-byte strings, at most {} are supported",
                name, len, NAME_LEN
            )))
        }
        TypeDescriptor::FixedAscii(_) => ds
            .read_1d::<FA256>()?
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        TypeDescriptor::FixedUnicode(_) => ds
            .read_1d::<FixedUnicode<NAME_LEN>>()?
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        TypeDescriptor::VarLenAscii => ds
            .read_1d::<VarLenAscii>()?
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        TypeDescriptor::VarLenUnicode => ds
            .read_1d::<VarLenUnicode>()?
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        other => {
            return Err(MaestroError::Format(format!(
                "Dataset '{}' is not a string dataset ({:?})",
                name, other
            )))
        }
    };
    Ok(strings)
}

fn read_csc(group: &Group) -> Result<nalgebra_sparse::CscMatrix<f64>> {
    let shape = read_usize_1d(group, "shape")?;
    if shape.len() != 2 {
        return Err(MaestroError::Format(format!(
            "Matrix shape must have 2 entries, found {}",
            shape.len()
        )));
    }
    let (nrows, ncols) = (shape[0], shape[1]);

    let values = group.dataset("data")?.read_1d::<f64>()?.to_vec();
    let row_indices = read_usize_1d(group, "indices")?;
    let col_offsets = read_usize_1d(group, "indptr")?;

    SparseOps::from_csc_parts(nrows, ncols, col_offsets, row_indices, values)
}

/// Locate the v2 genome group: the first top-level group holding a `data`
/// dataset.
fn find_legacy_group(file: &File) -> Result<Option<(String, Group)>> {
    for name in file.member_names()? {
        if let Ok(group) = file.group(&name) {
            if group.link_exists("data") {
                return Ok(Some((name, group)));
            }
        }
    }
    Ok(None)
}

/// Read a 10x container, returning the matrix, decoded names and genome tag.
pub fn read_10x_h5<P: AsRef<Path>>(path: P) -> Result<H5Matrix> {
    let path = path.as_ref();
    let file = File::open(path)?;

    if file.link_exists(MATRIX_GROUP) {
        let group = file.group(MATRIX_GROUP)?;
        let matrix = read_csc(&group)?;
        let barcodes = read_strings(&group, "barcodes")?;

        let features_group = group.group(FEATURES_GROUP)?;
        let features = if features_group.link_exists("name") {
            read_strings(&features_group, "name")?
        } else {
            read_strings(&features_group, "id")?
        };
        let genome = if features_group.link_exists("genome") {
            read_strings(&features_group, "genome")?
                .into_iter()
                .next()
                .unwrap_or_default()
        } else {
            String::new()
        };

        let counts = CountMatrix::new(matrix, features, barcodes)?;
        return Ok(H5Matrix { counts, genome });
    }

    match find_legacy_group(&file)? {
        Some((genome, group)) => {
            warn!(
                "{} uses the legacy per-genome layout (genome '{}')",
                path.display(),
                genome
            );
            let matrix = read_csc(&group)?;
            let barcodes = read_strings(&group, "barcodes")?;
            let features = if group.link_exists("gene_names") {
                read_strings(&group, "gene_names")?
            } else {
                read_strings(&group, "genes")?
            };
            let counts = CountMatrix::new(matrix, features, barcodes)?;
            Ok(H5Matrix { counts, genome })
        }
        None => Err(MaestroError::Format(format!(
            "{} holds neither a '/{}' group nor a per-genome matrix group",
            path.display(),
            MATRIX_GROUP
        ))),
    }
}

/// Write a chunked, deflate-compressed 1-D dataset. Empty data gets a plain
/// zero-length dataset since chunk sizes must be positive.
fn write_1d<T: H5Type>(group: &Group, name: &str, data: &[T]) -> Result<()> {
    if data.is_empty() {
        group.new_dataset::<T>().shape(0).create(name)?;
    } else {
        group
            .new_dataset_builder()
            .with_data(data)
            .chunk(data.len().min(CHUNK_LEN))
            .deflate(1)
            .create(name)?;
    }
    Ok(())
}

fn to_fixed_ascii(names: &[String]) -> Result<Vec<FA256>> {
    names
        .iter()
        .map(|name| FA256::from_ascii(name.as_bytes()).map_err(MaestroError::from))
        .collect()
}

/// Write a count matrix as a 10x container tagged with `genome` and the
/// feature `content` type. Any existing file at `path` is replaced.
///
/// Values are stored as `f32`, so integer counts survive a round trip
/// exactly only up to 2^24 (16,777,216); larger or fractional values are
/// rounded to the nearest `f32`.
pub fn write_10x_h5<P: AsRef<Path>>(
    path: P,
    counts: &CountMatrix,
    genome: &str,
    content: ContentType,
) -> Result<()> {
    let path = path.as_ref();
    make_parent_dirs(path)?;

    let matrix = counts.matrix();
    let n_features = counts.n_features();
    info!(
        "Writing 10x HDF5 matrix with {} features × {} cells to {}",
        n_features,
        counts.n_cells(),
        path.display()
    );

    let barcodes = to_fixed_ascii(counts.barcodes())?;
    let features = to_fixed_ascii(counts.features())?;
    let genome_tag = FA256::from_ascii(genome.as_bytes())?;
    let content_tag = FA256::from_ascii(content.as_str().as_bytes())?;

    let values: Vec<f32> = matrix.values().iter().map(|&v| v as f32).collect();
    let indices: Vec<i64> = matrix.row_indices().iter().map(|&i| i as i64).collect();
    let indptr: Vec<i64> = matrix.col_offsets().iter().map(|&o| o as i64).collect();
    let shape = [matrix.nrows() as i64, matrix.ncols() as i64];

    let file = File::create(path)?;
    let group = file.create_group(MATRIX_GROUP)?;
    write_1d(&group, "barcodes", &barcodes)?;
    write_1d(&group, "data", &values)?;
    write_1d(&group, "indices", &indices)?;
    write_1d(&group, "indptr", &indptr)?;
    write_1d(&group, "shape", &shape)?;

    let features_group = group.create_group(FEATURES_GROUP)?;
    write_1d(
        &features_group,
        "_all_tag_keys",
        &[FA256::from_ascii(b"genome")?],
    )?;
    write_1d(&features_group, "feature_type", &vec![content_tag; n_features])?;
    write_1d(&features_group, "genome", &vec![genome_tag; n_features])?;
    write_1d(&features_group, "id", &features)?;
    write_1d(&features_group, "name", &features)?;

    file.flush()?;
    Ok(())
}

//! MAESTRO: Model-based AnalysEs of Single-cell Transcriptome and RegulOme
//!
//! Library half of the `maestro` command line tool. It loads single-cell count
//! matrices from the common on-disk encodings, runs per-cell quality control
//! and prepares Snakemake workflow directories.
//!
//! # Modules
//!
//! - [`core`]: errors, filesystem and delimited I/O helpers, sparse matrix operations
//! - [`pipeline`]: matrix loading, cell quality control and workflow initialisation

pub mod core;
pub mod pipeline;

//! MAESTRO - Model-based AnalysEs of Single-cell Transcriptome and RegulOme
//!
//! Command line entry point for single-cell quality control and workflow
//! set-up.
//!
//! # Tools
//!
//! - `scrna-qc`: compute per-cell statistics and keep cells above the count and gene cutoffs
//! - `scatac-init`: prepare a scATAC-seq Snakemake workflow directory
//! - `scrna-init`: prepare a scRNA-seq Snakemake workflow directory
//! - `integrate-init`: prepare a scRNA/scATAC integration workflow directory
//!
//! # Usage
//!
//! ```bash
//! # Filter a 10x HDF5 matrix
//! maestro scrna-qc --format h5 --matrix raw_feature_bc_matrix.h5 -d out --outprefix pbmc
//!
//! # Filter a MatrixMarket matrix with its feature and barcode files
//! maestro scrna-qc --format mtx --matrix matrix.mtx --feature features.tsv --barcode barcodes.tsv
//!
//! # Set up a scRNA-seq workflow
//! maestro scrna-init --platform 10x-genomics --fastq-dir /data/fastq --workflow-dir /opt/maestro/Snakemake
//! ```

extern crate maestro_lib;
pub mod commands;
use anyhow::Result;
use env_logger::Env;
use log::*;
use maestro_lib::core::error;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case", author, about)]
/// Single-cell quality control and workflow set-up with MAESTRO
struct Args {
    #[structopt(subcommand)]
    subcommand: Subcommand,
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
enum Subcommand {
    /// Filter cells of a count matrix by total counts and detected genes
    ScrnaQc(commands::ScrnaQcArgs),
    /// Initialise a scATAC-seq workflow directory
    ScatacInit(commands::ScatacInitArgs),
    /// Initialise a scRNA-seq workflow directory
    ScrnaInit(commands::ScrnaInitArgs),
    /// Initialise a scRNA-seq / scATAC-seq integration workflow directory
    IntegrateInit(commands::IntegrateInitArgs),
}

impl Subcommand {
    fn run(self) -> Result<()> {
        match self {
            Subcommand::ScrnaQc(args) => commands::run_scrna_qc(args)?,
            Subcommand::ScatacInit(args) => commands::run_scatac_init(args)?,
            Subcommand::ScrnaInit(args) => commands::run_scrna_init(args)?,
            Subcommand::IntegrateInit(args) => commands::run_integrate_init(args)?,
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(err) = Args::from_args().subcommand.run() {
        if error::is_broken_pipe(&err) {
            std::process::exit(0);
        }
        error!("{}", err);
        std::process::exit(1);
    }
    Ok(())
}

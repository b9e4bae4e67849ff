use maestro_lib::pipeline::matrix::{ContentType, MatrixFormat, MatrixInputs, Species};
use maestro_lib::pipeline::qc::{QcCutoffs, QcOutputs};
use std::path::PathBuf;
use structopt::StructOpt;

/// CLI arguments for the `scrna-qc` subcommand.
#[derive(Debug, Clone, StructOpt)]
#[structopt(name = "scrna-qc", rename_all = "kebab-case")]
pub struct ScrnaQcArgs {
    /// Encoding of the input count matrix.
    #[structopt(long, possible_values = MatrixFormat::VARIANTS)]
    pub format: MatrixFormat,

    /// Count matrix: a 10x HDF5 container, a MatrixMarket file or a plain table.
    #[structopt(long, parse(from_os_str))]
    pub matrix: PathBuf,

    /// Feature file accompanying a MatrixMarket matrix.
    #[structopt(long, default_value = "features.tsv", parse(from_os_str))]
    pub feature: PathBuf,

    /// 1-based column of the feature file holding gene names.
    #[structopt(long, default_value = "2")]
    pub gene_column: usize,

    /// Barcode file accompanying a MatrixMarket matrix.
    #[structopt(long, default_value = "barcodes.tsv", parse(from_os_str))]
    pub barcode: PathBuf,

    /// Genome tag written into the filtered container.
    #[structopt(long, default_value = "GRCh38", possible_values = Species::VARIANTS)]
    pub species: Species,

    /// Cells need strictly more total counts than this to pass.
    #[structopt(long, default_value = "1000")]
    pub count_cutoff: u64,

    /// Cells need strictly more detected genes than this to pass.
    #[structopt(long, default_value = "500")]
    pub gene_cutoff: u64,

    /// Output directory, created when missing.
    #[structopt(long, short = "d", default_value = "MAESTRO", parse(from_os_str))]
    pub directory: PathBuf,

    /// Prefix of the output file names.
    #[structopt(long, default_value = "10x-genomics")]
    pub outprefix: String,
}

/// Normalised configuration derived from [`ScrnaQcArgs`].
#[derive(Debug, Clone)]
pub struct ScrnaQcConfig {
    pub format: MatrixFormat,
    pub inputs: MatrixInputs,
    pub species: Species,
    pub cutoffs: QcCutoffs,
    pub directory: PathBuf,
    pub outputs: QcOutputs,
}

impl From<ScrnaQcArgs> for ScrnaQcConfig {
    fn from(args: ScrnaQcArgs) -> ScrnaQcConfig {
        let outputs = QcOutputs::new(&args.directory, &args.outprefix);
        ScrnaQcConfig {
            format: args.format,
            inputs: MatrixInputs {
                matrix: args.matrix,
                feature: args.feature,
                barcode: args.barcode,
                gene_column: args.gene_column,
                content: ContentType::Gene,
            },
            species: args.species,
            cutoffs: QcCutoffs {
                count: args.count_cutoff,
                gene: args.gene_cutoff,
            },
            directory: args.directory,
            outputs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_arguments() {
        let args =
            ScrnaQcArgs::from_iter_safe(&["scrna-qc", "--format", "h5", "--matrix", "raw.h5"])
                .unwrap();

        assert_eq!(args.format, MatrixFormat::H5);
        assert_eq!(args.matrix, PathBuf::from("raw.h5"));
        assert_eq!(args.feature, PathBuf::from("features.tsv"));
        assert_eq!(args.barcode, PathBuf::from("barcodes.tsv"));
        assert_eq!(args.gene_column, 2);
        assert_eq!(args.species, Species::GRCh38);
        assert_eq!(args.count_cutoff, 1000);
        assert_eq!(args.gene_cutoff, 500);
        assert_eq!(args.directory, PathBuf::from("MAESTRO"));
        assert_eq!(args.outprefix, "10x-genomics");
    }

    #[test]
    fn format_is_required_and_checked() {
        assert!(ScrnaQcArgs::from_iter_safe(&["scrna-qc", "--matrix", "raw.h5"]).is_err());
        assert!(ScrnaQcArgs::from_iter_safe(&[
            "scrna-qc", "--format", "loom", "--matrix", "raw.loom"
        ])
        .is_err());
        assert!(ScrnaQcArgs::from_iter_safe(&[
            "scrna-qc", "--format", "h5", "--matrix", "raw.h5", "--species", "hg19"
        ])
        .is_err());
    }

    #[test]
    fn config_builds_output_paths() {
        let args = ScrnaQcArgs::from_iter_safe(&[
            "scrna-qc",
            "--format",
            "mtx",
            "--matrix",
            "matrix.mtx",
            "-d",
            "out",
            "--outprefix",
            "pbmc",
            "--count-cutoff",
            "200",
            "--species",
            "GRCm38",
        ])
        .unwrap();
        let config: ScrnaQcConfig = args.into();

        assert_eq!(config.cutoffs, QcCutoffs { count: 200, gene: 500 });
        assert_eq!(config.species, Species::GRCm38);
        assert_eq!(config.inputs.content, ContentType::Gene);
        assert_eq!(
            config.outputs.stat_report,
            PathBuf::from("out/pbmc_count_gene_stat.txt")
        );
        assert_eq!(
            config.outputs.filtered_matrix,
            PathBuf::from("out/pbmc_filtered_gene_count.h5")
        );
    }
}

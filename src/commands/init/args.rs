use maestro_lib::pipeline::matrix::Species;
use maestro_lib::pipeline::workflow::{
    AtacPlatform, IntegrateConfig, LisaMode, RegulatorMethod, RnaPlatform, ScatacConfig,
    ScrnaConfig,
};
use std::path::PathBuf;
use structopt::StructOpt;

/// Output location shared by every `*-init` subcommand.
#[derive(Debug, Clone, StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct InitTarget {
    /// Workflow directory to create.
    #[structopt(long, short = "d", default_value = "MAESTRO", parse(from_os_str))]
    pub directory: PathBuf,

    /// Prefix of the files the workflow will produce.
    #[structopt(long, default_value = "MAESTRO")]
    pub outprefix: String,

    /// Directory holding the scATAC, scRNA and integrate Snakefiles.
    #[structopt(long, env = "MAESTRO_WORKFLOW_DIR", parse(from_os_str))]
    pub workflow_dir: Option<PathBuf>,
}

/// A rendered workflow configuration and where to put it.
#[derive(Debug, Clone)]
pub struct InitRequest<C> {
    pub config: C,
    pub directory: PathBuf,
    pub workflow_dir: Option<PathBuf>,
}

impl<C> InitRequest<C> {
    fn new(config: C, target: InitTarget) -> Self {
        InitRequest {
            config,
            directory: target.directory,
            workflow_dir: target.workflow_dir,
        }
    }
}

/// CLI arguments for the `scatac-init` subcommand.
#[derive(Debug, Clone, StructOpt)]
#[structopt(name = "scatac-init", rename_all = "kebab-case")]
pub struct ScatacInitArgs {
    /// Library platform.
    #[structopt(long, default_value = "10x-genomics", possible_values = AtacPlatform::VARIANTS)]
    pub platform: AtacPlatform,

    /// Directory containing the fastq files.
    #[structopt(long)]
    pub fastq_dir: Option<String>,

    /// Sample prefix of the fastq files.
    #[structopt(long)]
    pub fastq_prefix: Option<String>,

    #[structopt(long, default_value = "GRCh38", possible_values = Species::VARIANTS)]
    pub species: Species,

    /// Number of cores the workflow may use.
    #[structopt(long, default_value = "8")]
    pub cores: usize,

    #[structopt(flatten)]
    pub target: InitTarget,

    /// Minimum fragment count for a cell to be kept.
    #[structopt(long, default_value = "1000")]
    pub count_cutoff: u64,

    /// Minimum fraction of reads in peaks for a cell to be kept.
    #[structopt(long, default_value = "0.2")]
    pub frip_cutoff: f64,

    /// Annotation directory for GIGGLE.
    #[structopt(long)]
    pub giggleannotation: Option<String>,

    /// Genome fasta used for mapping.
    #[structopt(long)]
    pub fasta: Option<String>,

    /// Cell barcode whitelist.
    #[structopt(long)]
    pub whitelist: Option<String>,

    /// Use a user supplied peak file.
    #[structopt(long)]
    pub custompeak: bool,

    /// Peak file used with --custompeak.
    #[structopt(long)]
    pub custompeak_file: Option<String>,

    /// Call peaks from short fragments as well.
    #[structopt(long)]
    pub shortpeak: bool,

    /// Gene distance for regulatory potential scoring.
    #[structopt(long, default_value = "10000")]
    pub genedistance: u64,

    /// Annotate clusters with a user supplied signature file.
    #[structopt(long)]
    pub signature: bool,

    /// Signature file used with --signature.
    #[structopt(long)]
    pub signature_file: Option<String>,
}

impl From<ScatacInitArgs> for InitRequest<ScatacConfig> {
    fn from(args: ScatacInitArgs) -> InitRequest<ScatacConfig> {
        let config = ScatacConfig {
            fastq_dir: args.fastq_dir.unwrap_or_default(),
            fastq_prefix: args.fastq_prefix.unwrap_or_default(),
            species: args.species,
            platform: args.platform,
            outprefix: args.target.outprefix.clone(),
            whitelist: args.whitelist.unwrap_or_default(),
            cores: args.cores,
            count_cutoff: args.count_cutoff,
            frip_cutoff: args.frip_cutoff,
            signature: args.signature,
            signature_file: args.signature_file.unwrap_or_default(),
            custom_peaks: args.custompeak,
            custom_peaks_file: args.custompeak_file.unwrap_or_default(),
            short_peaks: args.shortpeak,
            gene_distance: args.genedistance,
            giggle_annotation: args.giggleannotation.unwrap_or_default(),
            fasta: args.fasta.unwrap_or_default(),
        };
        InitRequest::new(config, args.target)
    }
}

/// CLI arguments for the `scrna-init` subcommand.
#[derive(Debug, Clone, StructOpt)]
#[structopt(name = "scrna-init", rename_all = "kebab-case")]
pub struct ScrnaInitArgs {
    /// Library platform.
    #[structopt(long, default_value = "10x-genomics", possible_values = RnaPlatform::VARIANTS)]
    pub platform: RnaPlatform,

    /// Directory containing the fastq files.
    #[structopt(long)]
    pub fastq_dir: Option<String>,

    /// Sample prefix of the fastq files.
    #[structopt(long)]
    pub fastq_prefix: Option<String>,

    /// Fastq file holding barcode reads (Dropseq).
    #[structopt(long)]
    pub fastq_barcode: Option<String>,

    /// Fastq file holding transcript reads (Dropseq).
    #[structopt(long)]
    pub fastq_transcript: Option<String>,

    #[structopt(long, default_value = "GRCh38", possible_values = Species::VARIANTS)]
    pub species: Species,

    /// Number of cores the workflow may use.
    #[structopt(long, default_value = "8")]
    pub cores: usize,

    /// Run RSeQC quality control.
    #[structopt(long)]
    pub rseqc: bool,

    #[structopt(flatten)]
    pub target: InitTarget,

    /// Minimum UMI count for a cell to be kept.
    #[structopt(long, default_value = "1000")]
    pub count_cutoff: u64,

    /// Minimum detected gene count for a cell to be kept.
    #[structopt(long, default_value = "500")]
    pub gene_cutoff: u64,

    /// STAR genome index.
    #[structopt(long)]
    pub mapindex: Option<String>,

    /// RSEM reference (Smartseq2).
    #[structopt(long)]
    pub rsem: Option<String>,

    /// Cell barcode whitelist.
    #[structopt(long)]
    pub whitelist: Option<String>,

    /// 1-based start of the cell barcode in the barcode read.
    #[structopt(long, default_value = "1")]
    pub barcode_start: u32,

    #[structopt(long, default_value = "16")]
    pub barcode_length: u32,

    /// 1-based start of the UMI in the barcode read.
    #[structopt(long, default_value = "17")]
    pub umi_start: u32,

    #[structopt(long, default_value = "10")]
    pub umi_length: u32,

    /// Driver regulator prediction method.
    #[structopt(long, default_value = "LISA", possible_values = RegulatorMethod::VARIANTS)]
    pub method: RegulatorMethod,

    /// RABIT library directory.
    #[structopt(long)]
    pub rabitlib: Option<String>,

    #[structopt(long, default_value = "local", possible_values = LisaMode::VARIANTS)]
    pub lisamode: LisaMode,

    /// Conda environment providing LISA.
    #[structopt(long, default_value = "lisa")]
    pub lisaenv: String,

    /// Conda installation directory.
    #[structopt(long)]
    pub condadir: Option<String>,

    /// Annotate clusters with a user supplied signature file.
    #[structopt(long)]
    pub signature: bool,

    /// Signature file used with --signature.
    #[structopt(long)]
    pub signature_file: Option<String>,
}

impl From<ScrnaInitArgs> for InitRequest<ScrnaConfig> {
    fn from(args: ScrnaInitArgs) -> InitRequest<ScrnaConfig> {
        let config = ScrnaConfig {
            fastq_dir: args.fastq_dir.unwrap_or_default(),
            fastq_prefix: args.fastq_prefix.unwrap_or_default(),
            species: args.species,
            platform: args.platform,
            outprefix: args.target.outprefix.clone(),
            rseqc: args.rseqc,
            cores: args.cores,
            count_cutoff: args.count_cutoff,
            gene_cutoff: args.gene_cutoff,
            signature: args.signature,
            signature_file: args.signature_file.unwrap_or_default(),
            method: args.method,
            rabit_lib: args.rabitlib.unwrap_or_default(),
            lisa_mode: args.lisamode,
            lisa_env: args.lisaenv,
            conda_dir: args.condadir.unwrap_or_default(),
            map_index: args.mapindex.unwrap_or_default(),
            rsem: args.rsem.unwrap_or_default(),
            whitelist: args.whitelist.unwrap_or_default(),
            barcode_start: args.barcode_start,
            barcode_length: args.barcode_length,
            umi_start: args.umi_start,
            umi_length: args.umi_length,
            fastq_barcode: args.fastq_barcode.unwrap_or_default(),
            fastq_transcript: args.fastq_transcript.unwrap_or_default(),
        };
        InitRequest::new(config, args.target)
    }
}

/// CLI arguments for the `integrate-init` subcommand.
#[derive(Debug, Clone, StructOpt)]
#[structopt(name = "integrate-init", rename_all = "kebab-case")]
pub struct IntegrateInitArgs {
    /// Analysed scRNA-seq object.
    #[structopt(long)]
    pub rna_object: Option<String>,

    /// Analysed scATAC-seq object.
    #[structopt(long)]
    pub atac_object: Option<String>,

    #[structopt(flatten)]
    pub target: InitTarget,
}

impl From<IntegrateInitArgs> for InitRequest<IntegrateConfig> {
    fn from(args: IntegrateInitArgs) -> InitRequest<IntegrateConfig> {
        let config = IntegrateConfig {
            rna_object: args.rna_object.unwrap_or_default(),
            atac_object: args.atac_object.unwrap_or_default(),
            outprefix: args.target.outprefix.clone(),
        };
        InitRequest::new(config, args.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatac_defaults() {
        let args = ScatacInitArgs::from_iter_safe(&[
            "scatac-init",
            "--fastq-dir",
            "/data/fastq",
            "--workflow-dir",
            "/opt/maestro",
        ])
        .unwrap();
        let request: InitRequest<ScatacConfig> = args.into();

        assert_eq!(request.directory, PathBuf::from("MAESTRO"));
        assert_eq!(request.workflow_dir, Some(PathBuf::from("/opt/maestro")));
        let config = request.config;
        assert_eq!(config.platform, AtacPlatform::TenX);
        assert_eq!(config.fastq_dir, "/data/fastq");
        assert_eq!(config.fastq_prefix, "");
        assert_eq!(config.cores, 8);
        assert_eq!(config.count_cutoff, 1000);
        assert!((config.frip_cutoff - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.gene_distance, 10000);
        assert_eq!(config.outprefix, "MAESTRO");
        assert!(!config.custom_peaks);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn scrna_options_map_onto_config() {
        let args = ScrnaInitArgs::from_iter_safe(&[
            "scrna-init",
            "--platform",
            "Dropseq",
            "--fastq-barcode",
            "r1.fastq",
            "--fastq-transcript",
            "r2.fastq",
            "--method",
            "RABIT",
            "--barcode-length",
            "12",
            "--umi-start",
            "13",
            "--umi-length",
            "8",
            "-d",
            "dropseq",
            "--outprefix",
            "sample",
        ])
        .unwrap();
        let request: InitRequest<ScrnaConfig> = args.into();

        assert_eq!(request.directory, PathBuf::from("dropseq"));
        let config = request.config;
        assert_eq!(config.platform, RnaPlatform::Dropseq);
        assert_eq!(config.method, RegulatorMethod::Rabit);
        assert_eq!(config.lisa_mode, LisaMode::Local);
        assert_eq!(config.lisa_env, "lisa");
        assert_eq!(config.fastq_barcode, "r1.fastq");
        assert_eq!(config.fastq_transcript, "r2.fastq");
        assert_eq!(config.barcode_start, 1);
        assert_eq!(config.barcode_length, 12);
        assert_eq!(config.umi_start, 13);
        assert_eq!(config.umi_length, 8);
        assert_eq!(config.gene_cutoff, 500);
        assert_eq!(config.outprefix, "sample");
    }

    #[test]
    fn rejects_unknown_platform() {
        assert!(ScatacInitArgs::from_iter_safe(&["scatac-init", "--platform", "Smartseq2"]).is_err());
        assert!(ScrnaInitArgs::from_iter_safe(&["scrna-init", "--lisamode", "remote"]).is_err());
    }

    #[test]
    fn integrate_objects_are_carried_through() {
        let args = IntegrateInitArgs::from_iter_safe(&[
            "integrate-init",
            "--rna-object",
            "rna.rds",
            "--atac-object",
            "atac.rds",
        ])
        .unwrap();
        let request: InitRequest<IntegrateConfig> = args.into();
        assert_eq!(request.config.rna_object, "rna.rds");
        assert_eq!(request.config.atac_object, "atac.rds");
        assert_eq!(request.config.outprefix, "MAESTRO");
    }
}

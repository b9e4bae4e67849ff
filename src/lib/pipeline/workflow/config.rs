//! Workflow configuration values rendered into `config.yaml`
//!
//! Key names match the variables the Snakemake workflows read.

use crate::core::error::{MaestroError, Result};
use crate::pipeline::matrix::Species;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

macro_rules! cli_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const VARIANTS: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = MaestroError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(MaestroError::Config(format!(
                        "Invalid {}: '{}'. Valid values: {}",
                        stringify!($name),
                        s,
                        Self::VARIANTS.join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

cli_enum!(
    /// Single-cell ATAC-seq library platform.
    AtacPlatform {
        TenX => "10x-genomics",
        SciAtac => "sci-ATAC-seq",
        Microfluidic => "microfluidic",
    }
);

cli_enum!(
    /// Single-cell RNA-seq library platform.
    RnaPlatform {
        TenX => "10x-genomics",
        Dropseq => "Dropseq",
        Smartseq2 => "Smartseq2",
    }
);

cli_enum!(
    /// Driver regulator prediction method.
    RegulatorMethod {
        Rabit => "RABIT",
        Lisa => "LISA",
    }
);

cli_enum!(
    LisaMode {
        Local => "local",
        Web => "web",
    }
);

#[derive(Debug, Clone, Serialize)]
pub struct ScatacConfig {
    #[serde(rename = "fastqdir")]
    pub fastq_dir: String,
    #[serde(rename = "fastqprefix")]
    pub fastq_prefix: String,
    pub species: Species,
    pub platform: AtacPlatform,
    pub outprefix: String,
    pub whitelist: String,
    pub cores: usize,
    #[serde(rename = "count")]
    pub count_cutoff: u64,
    #[serde(rename = "frip")]
    pub frip_cutoff: f64,
    pub signature: bool,
    #[serde(rename = "signaturefile")]
    pub signature_file: String,
    #[serde(rename = "custompeaks")]
    pub custom_peaks: bool,
    #[serde(rename = "custompeaksloc")]
    pub custom_peaks_file: String,
    #[serde(rename = "shortpeaks")]
    pub short_peaks: bool,
    #[serde(rename = "genedistance")]
    pub gene_distance: u64,
    #[serde(rename = "giggleannotation")]
    pub giggle_annotation: String,
    pub fasta: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrnaConfig {
    #[serde(rename = "fastqdir")]
    pub fastq_dir: String,
    #[serde(rename = "fastqprefix")]
    pub fastq_prefix: String,
    pub species: Species,
    pub platform: RnaPlatform,
    pub outprefix: String,
    pub rseqc: bool,
    pub cores: usize,
    #[serde(rename = "count")]
    pub count_cutoff: u64,
    #[serde(rename = "gene")]
    pub gene_cutoff: u64,
    pub signature: bool,
    #[serde(rename = "signaturefile")]
    pub signature_file: String,
    pub method: RegulatorMethod,
    #[serde(rename = "rabitlib")]
    pub rabit_lib: String,
    #[serde(rename = "lisamode")]
    pub lisa_mode: LisaMode,
    #[serde(rename = "lisaenv")]
    pub lisa_env: String,
    #[serde(rename = "condadir")]
    pub conda_dir: String,
    #[serde(rename = "mapindex")]
    pub map_index: String,
    pub rsem: String,
    pub whitelist: String,
    #[serde(rename = "barcodestart")]
    pub barcode_start: u32,
    #[serde(rename = "barcodelength")]
    pub barcode_length: u32,
    #[serde(rename = "umistart")]
    pub umi_start: u32,
    #[serde(rename = "umilength")]
    pub umi_length: u32,
    #[serde(rename = "barcode")]
    pub fastq_barcode: String,
    #[serde(rename = "transcript")]
    pub fastq_transcript: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrateConfig {
    #[serde(rename = "rnaobject")]
    pub rna_object: String,
    #[serde(rename = "atacobject")]
    pub atac_object: String,
    pub outprefix: String,
}

fn require_if(flag: bool, value: &str, flag_name: &str, value_name: &str) -> Result<()> {
    if flag && value.trim().is_empty() {
        return Err(MaestroError::Config(format!(
            "{} is set but no {} was given",
            flag_name, value_name
        )));
    }
    Ok(())
}

fn require_cores(cores: usize) -> Result<()> {
    if cores == 0 {
        return Err(MaestroError::Config(
            "cores must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

impl ScatacConfig {
    pub fn validate(&self) -> Result<()> {
        require_cores(self.cores)?;
        require_if(
            self.custom_peaks,
            &self.custom_peaks_file,
            "--custompeak",
            "--custompeak-file",
        )?;
        require_if(
            self.signature,
            &self.signature_file,
            "--signature",
            "--signature-file",
        )
    }
}

impl ScrnaConfig {
    pub fn validate(&self) -> Result<()> {
        require_cores(self.cores)?;
        require_if(
            self.signature,
            &self.signature_file,
            "--signature",
            "--signature-file",
        )
    }
}

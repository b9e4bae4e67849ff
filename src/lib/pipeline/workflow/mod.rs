//! Workflow directory initialisation
//!
//! Each workflow directory receives a `config.yaml` rendered from a typed
//! configuration and a copy of the workflow's `Snakefile`. Snakefiles are
//! looked up under `<workflow_dir>/<kind>/Snakefile`.

pub mod config;

pub use config::{
    AtacPlatform, IntegrateConfig, LisaMode, RegulatorMethod, RnaPlatform, ScatacConfig,
    ScrnaConfig,
};

use crate::core::error::{MaestroError, Result};
use crate::core::fs::make_output_dir;
use log::info;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.yaml";
pub const SNAKEFILE: &str = "Snakefile";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowKind {
    ScAtac,
    ScRna,
    Integrate,
}

impl WorkflowKind {
    /// Subdirectory of the workflow definitions holding this kind's files.
    pub fn dir_name(&self) -> &'static str {
        match self {
            WorkflowKind::ScAtac => "scATAC",
            WorkflowKind::ScRna => "scRNA",
            WorkflowKind::Integrate => "integrate",
        }
    }

    pub fn snakefile<P: AsRef<Path>>(&self, workflow_dir: P) -> PathBuf {
        workflow_dir.as_ref().join(self.dir_name()).join(SNAKEFILE)
    }
}

/// Files written by [`init_workflow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOutputs {
    pub config: PathBuf,
    pub snakefile: PathBuf,
}

/// Create `directory`, write its `config.yaml` and copy the Snakefile.
pub fn init_workflow<C: Serialize>(
    kind: WorkflowKind,
    config: &C,
    directory: &Path,
    workflow_dir: &Path,
) -> Result<InitOutputs> {
    let source = kind.snakefile(workflow_dir);
    if !source.is_file() {
        return Err(MaestroError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Snakefile not found: {}", source.display()),
        )));
    }

    make_output_dir(directory)?;

    let config_path = directory.join(CONFIG_FILE);
    info!("Writing {} workflow config: {}", kind.dir_name(), config_path.display());
    let mut writer = BufWriter::new(File::create(&config_path)?);
    serde_yaml::to_writer(&mut writer, config)?;
    writer.flush()?;

    let target = directory.join(SNAKEFILE);
    info!("Copying {} to {}", source.display(), target.display());
    fs::copy(&source, &target)?;

    Ok(InitOutputs {
        config: config_path,
        snakefile: target,
    })
}

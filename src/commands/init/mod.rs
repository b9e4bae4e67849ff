mod args;

use anyhow::Result;
use log::info;
use maestro_lib::pipeline::workflow::{
    init_workflow, IntegrateConfig, ScatacConfig, ScrnaConfig, WorkflowKind,
};
use serde::Serialize;

use crate::commands::common;

pub use args::{InitRequest, InitTarget, IntegrateInitArgs, ScatacInitArgs, ScrnaInitArgs};

fn run_init<C: Serialize>(kind: WorkflowKind, request: InitRequest<C>) -> Result<()> {
    let workflow_dir = common::resolve_workflow_dir(request.workflow_dir)?;
    info!(
        "Initialising {} workflow in {:?}",
        kind.dir_name(),
        request.directory
    );
    let outputs = init_workflow(kind, &request.config, &request.directory, &workflow_dir)?;
    info!(
        "Workflow ready: {:?}, {:?}",
        outputs.config, outputs.snakefile
    );
    Ok(())
}

/// Execute the `scatac-init` command.
pub fn run_scatac_init(args: ScatacInitArgs) -> Result<()> {
    let request: InitRequest<ScatacConfig> = args.into();
    request.config.validate()?;
    run_init(WorkflowKind::ScAtac, request)
}

/// Execute the `scrna-init` command.
pub fn run_scrna_init(args: ScrnaInitArgs) -> Result<()> {
    let request: InitRequest<ScrnaConfig> = args.into();
    request.config.validate()?;
    run_init(WorkflowKind::ScRna, request)
}

/// Execute the `integrate-init` command.
pub fn run_integrate_init(args: IntegrateInitArgs) -> Result<()> {
    let request: InitRequest<IntegrateConfig> = args.into();
    run_init(WorkflowKind::Integrate, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use structopt::StructOpt;
    use tempfile::tempdir;

    #[test]
    fn scrna_init_writes_workflow_directory() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let workflows = tmp.path().join("workflows");
        fs::create_dir_all(workflows.join("scRNA"))?;
        fs::write(workflows.join("scRNA").join("Snakefile"), "# scRNA\n")?;
        let target = tmp.path().join("pbmc");

        let workflows_arg = workflows.to_string_lossy().into_owned();
        let target_arg = target.to_string_lossy().into_owned();
        let args = ScrnaInitArgs::from_iter_safe(&[
            "scrna-init",
            "--workflow-dir",
            workflows_arg.as_str(),
            "-d",
            target_arg.as_str(),
            "--species",
            "GRCm38",
        ])?;
        run_scrna_init(args)?;

        assert_eq!(fs::read_to_string(target.join("Snakefile"))?, "# scRNA\n");
        let yaml = fs::read_to_string(target.join("config.yaml"))?;
        assert!(yaml.contains("species: GRCm38"));
        assert!(yaml.contains("lisaenv: lisa"));
        Ok(())
    }

    #[test]
    fn signature_without_file_is_rejected() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let target = tmp.path().join("atac");
        let workflows_arg = tmp.path().to_string_lossy().into_owned();
        let target_arg = target.to_string_lossy().into_owned();
        let args = ScatacInitArgs::from_iter_safe(&[
            "scatac-init",
            "--workflow-dir",
            workflows_arg.as_str(),
            "-d",
            target_arg.as_str(),
            "--signature",
        ])?;

        assert!(run_scatac_init(args).is_err());
        assert!(!target.exists());
        Ok(())
    }
}

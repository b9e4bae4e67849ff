use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Pick the directory holding the workflow Snakefiles: the `--workflow-dir`
/// option, which structopt already fills from `MAESTRO_WORKFLOW_DIR` when the
/// flag is absent.
pub fn resolve_workflow_dir(workflow_dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = workflow_dir.ok_or_else(|| {
        anyhow!("No workflow directory given; pass --workflow-dir or set MAESTRO_WORKFLOW_DIR")
    })?;
    if !dir.is_dir() {
        return Err(anyhow!(
            "Workflow directory {} does not exist",
            dir.display()
        ));
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_workflow_dir_is_an_error() {
        assert!(resolve_workflow_dir(None).is_err());
        assert!(resolve_workflow_dir(Some(PathBuf::from("/nonexistent/maestro"))).is_err());
    }

    #[test]
    fn existing_workflow_dir_is_returned() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let dir = resolve_workflow_dir(Some(tmp.path().to_path_buf()))?;
        assert_eq!(dir, tmp.path());
        Ok(())
    }
}

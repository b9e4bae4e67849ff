mod args;

use anyhow::Result;
use log::info;
use maestro_lib::core::fs::make_output_dir;
use maestro_lib::pipeline::qc::filter_cells;

pub use args::{ScrnaQcArgs, ScrnaQcConfig};

/// Execute the `scrna-qc` command end-to-end.
pub fn run_scrna_qc(args: ScrnaQcArgs) -> Result<()> {
    let config: ScrnaQcConfig = args.into();

    info!(
        "Running maestro scrna-qc on {:?} ({} format)",
        config.inputs.matrix, config.format
    );
    make_output_dir(&config.directory)?;

    let counts = config.format.loader(&config.inputs).load()?;
    info!(
        "Loaded {} features × {} cells",
        counts.n_features(),
        counts.n_cells()
    );

    let summary = filter_cells(
        &counts,
        config.cutoffs,
        config.species.as_str(),
        &config.outputs,
    )?;

    info!(
        "scrna-qc complete: kept {} of {} cells -> {:?}",
        summary.passed_cells, summary.total_cells, config.outputs.filtered_matrix
    );
    Ok(())
}

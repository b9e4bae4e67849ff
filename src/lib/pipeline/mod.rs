pub mod matrix;
pub mod qc;
pub mod workflow;

pub mod prelude {
    pub use super::matrix::{
        read_10x_h5, write_10x_h5, ContentType, CountMatrix, MatrixFormat, MatrixInputs,
        MatrixLoader, Species,
    };
    pub use super::qc::{filter_cells, QcCutoffs, QcOutputs, QcSummary};
    pub use super::workflow::{init_workflow, InitOutputs, WorkflowKind};
}

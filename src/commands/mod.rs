pub mod common;
pub mod init;
pub mod scrna_qc;

pub use init::{
    run_integrate_init, run_scatac_init, run_scrna_init, IntegrateInitArgs, ScatacInitArgs,
    ScrnaInitArgs,
};
pub use scrna_qc::{run_scrna_qc, ScrnaQcArgs};

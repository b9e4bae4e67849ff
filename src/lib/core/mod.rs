pub mod error;
pub mod fs;
pub mod io;
pub mod sparse;

pub mod prelude {
    pub use super::error::{is_broken_pipe, MaestroError, Result};
    pub use super::fs::{is_gzipped, make_output_dir, make_parent_dirs};
    pub use super::io::{get_reader, get_writer, open_text_reader};
    pub use super::sparse::SparseOps;
}

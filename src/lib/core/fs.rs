use crate::core::error::Result;
use log::debug;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// Create an output directory and any missing parents.
///
/// An existing directory is not an error. Any other failure, including the
/// path already existing as a regular file, is returned unchanged.
pub fn make_output_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    if dir.is_dir() {
        debug!("Output directory {} already exists", dir.display());
        return Ok(());
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Create parent directories for a path when missing.
pub fn make_parent_dirs<P: AsRef<Path>>(path: P) -> Result<()> {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => make_output_dir(parent),
        _ => Ok(()),
    }
}

/// Detect whether a path uses a gzip-compatible extension.
pub fn is_gzipped<P: AsRef<Path>>(path: P) -> bool {
    matches!(
        path.as_ref().extension().unwrap_or_else(|| OsStr::new("")),
        ext if ext == "gz" || ext == "gzip" || ext == "bgzf"
    )
}
